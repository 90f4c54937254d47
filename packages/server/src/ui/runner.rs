//! Router construction and server lifecycle.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use realtime_shared::route::REALTIME_ROUTE;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    infrastructure::repository::InMemoryChannelRepository,
    ui::{
        handler::{health_check, index, list_channels, publish_message, websocket_handler},
        signal::shutdown_signal,
        state::AppState,
    },
};

/// Build the application router around `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health_check))
        .route("/api/channels", get(list_channels))
        .route("/api/channels/{channel}/messages", post(publish_message))
        .route(REALTIME_ROUTE, get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// Open sockets receive a normal close frame once shutdown starts.
pub async fn serve<F>(
    listener: TcpListener,
    config: &ServerConfig,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let repository = Arc::new(InMemoryChannelRepository::with_capacity(
        config.channel_capacity,
    ));
    let state = Arc::new(AppState::new(repository));
    let app = build_router(state.clone());

    tracing::info!("listening on {}", listener.local_addr()?);

    let shutdown_tx = state.shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("Closing open sockets");
            shutdown_tx.send_replace(true);
        })
        .await
}

/// Bind `config.host:config.port` and serve until Ctrl-C / SIGTERM.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    serve(listener, &config, shutdown_signal()).await
}
