//! Socket URL template shared by the client and the relay router.

use crate::domain::{ChannelName, ClientId};

/// Router pattern the relay mounts its WebSocket handler on.
pub const REALTIME_ROUTE: &str = "/realtime/{uuid}/{channel}/";

/// Default `host:port` of the relay.
pub const DEFAULT_HOST: &str = "localhost:8080";

/// Path part of the socket URL: `/realtime/<client-id>/<channel>/`.
pub fn realtime_path(client_id: &ClientId, channel: &ChannelName) -> String {
    format!("/realtime/{client_id}/{channel}/")
}

/// Full socket URL: `ws://<host>/realtime/<client-id>/<channel>/`.
pub fn realtime_url(host: &str, client_id: &ClientId, channel: &ChannelName) -> String {
    format!("ws://{host}{}", realtime_path(client_id, channel))
}
