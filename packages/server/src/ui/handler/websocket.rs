//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Path, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ChannelName, ClientId},
    ui::state::AppState,
    usecase::{JoinChannelUseCase, JoinError, LeaveChannelUseCase, PublishMessageUseCase},
};

/// How long a closing socket waits for the client's close reply
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path((uuid, channel)): Path<(String, String)>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> Domain Models
    let client_id = ClientId::new(uuid.clone()).map_err(|_| {
        tracing::warn!("Invalid client id: '{}'", uuid);
        StatusCode::BAD_REQUEST
    })?;
    let channel = ChannelName::new(channel.clone()).map_err(|_| {
        tracing::warn!("Invalid channel name: '{}'", channel);
        StatusCode::BAD_REQUEST
    })?;

    tracing::info!("handle uuid={} channel={}", client_id, channel);

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    let join_usecase = JoinChannelUseCase::new(state.repository.clone());
    match join_usecase
        .execute(channel.clone(), client_id.clone(), tx)
        .await
    {
        Ok(()) => {
            tracing::info!("Client '{}' subscribed to '{}'", client_id, channel);

            let failed = (state.clone(), channel.clone(), client_id.clone());
            Ok(ws
                .on_failed_upgrade(move |e| {
                    let (state, channel, client_id) = failed;
                    tracing::warn!("Upgrade failed for '{}': {}", client_id, e);
                    tokio::spawn(async move {
                        let leave_usecase = LeaveChannelUseCase::new(state.repository.clone());
                        if let Err(e) = leave_usecase.execute(&channel, &client_id).await {
                            tracing::warn!(
                                "Failed to remove '{}' from '{}': {}",
                                client_id,
                                channel,
                                e
                            );
                        }
                    });
                })
                .on_upgrade(move |socket| handle_socket(socket, state, channel, client_id, rx)))
        }
        Err(JoinError::DuplicateClientId(id)) => {
            tracing::warn!(
                "Client '{}' is already subscribed to '{}'. Rejecting connection.",
                id,
                channel
            );
            Err(StatusCode::CONFLICT)
        }
        Err(JoinError::ChannelCapacityExceeded) => {
            tracing::warn!("Channel '{}' is full. Rejecting '{}'", channel, client_id);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    channel: ChannelName,
    client_id: ClientId,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();

    // Tell everyone on the channel (the newcomer included) who is here now
    broadcast_subscribers(&state, &channel).await;

    let publish_usecase = PublishMessageUseCase::new(state.repository.clone());
    let recv_channel = channel.clone();
    let recv_client_id = client_id.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("Connection closed with exception: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::info!("Received from '{}': {}", recv_client_id, text.as_str());
                    if let Err(e) = publish_usecase
                        .execute(&recv_channel, Some(&recv_client_id), text.as_str())
                        .await
                    {
                        tracing::warn!("Dropped frame from '{}': {}", recv_client_id, e);
                    }
                }
                Message::Close(_) => {
                    // The stream ends on the next read, after the close reply is flushed
                    tracing::info!("Client '{}' requested close", recv_client_id);
                }
                _ => {}
            }
        }
    });

    let mut shutdown = state.shutdown.subscribe();

    // Spawn a task to forward channel messages to this client
    let mut send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(msg) => {
                        if sender.send(Message::Text(msg.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
                _ = shutdown.changed() => {
                    let frame = CloseFrame {
                        code: close_code::NORMAL,
                        reason: "Server shutdown".into(),
                    };
                    let _ = sender.send(Message::Close(Some(frame))).await;
                    break;
                }
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => {
            // Let the client answer a close frame before dropping the socket
            if tokio::time::timeout(CLOSE_TIMEOUT, &mut recv_task).await.is_err() {
                recv_task.abort();
            }
        }
    };

    let leave_usecase = LeaveChannelUseCase::new(state.repository.clone());
    match leave_usecase.execute(&channel, &client_id).await {
        Ok(remaining) => {
            tracing::info!("Client '{}' left '{}'", client_id, channel);
            if !remaining.is_empty() {
                broadcast_subscribers(&state, &channel).await;
            }
        }
        Err(e) => {
            tracing::warn!("Failed to remove '{}' from '{}': {}", client_id, channel, e);
        }
    }
}

/// Send the channel's current subscriber list to all of its subscribers
async fn broadcast_subscribers(state: &AppState, channel: &ChannelName) {
    let join_usecase = JoinChannelUseCase::new(state.repository.clone());
    let publish_usecase = PublishMessageUseCase::new(state.repository.clone());

    let subscribers = join_usecase.build_subscribers_message(channel).await;
    if let Err(e) = publish_usecase
        .broadcast_subscribers(channel, &subscribers)
        .await
    {
        tracing::warn!("Failed to broadcast subscribers of '{}': {}", channel, e);
    }
}
