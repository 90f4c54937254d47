//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use realtime_shared::time::timestamp_to_jst_rfc3339;
use serde_json::Value;

use crate::{
    domain::ChannelName,
    infrastructure::dto::http::{ChannelSummaryDto, PublishResponseDto, SubscriberDto},
    ui::state::AppState,
    usecase::PublishMessageUseCase,
};

/// Greeting at the root path
pub async fn index() -> &'static str {
    "Realtime, hello!"
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of open channels with their subscribers
pub async fn list_channels(State(state): State<Arc<AppState>>) -> Json<Vec<ChannelSummaryDto>> {
    let channels = state.repository.list_channels().await;

    let summaries = channels
        .into_iter()
        .map(|channel| ChannelSummaryDto {
            name: channel.name.into_string(),
            subscribers: channel
                .subscribers
                .iter()
                .map(|s| SubscriberDto {
                    client_id: s.id.as_str().to_string(),
                    joined_at: timestamp_to_jst_rfc3339(s.joined_at.value()),
                })
                .collect(),
            created_at: timestamp_to_jst_rfc3339(channel.created_at.value()),
        })
        .collect();

    Json(summaries)
}

/// Publish a JSON object into a channel from outside any socket
pub async fn publish_message(
    State(state): State<Arc<AppState>>,
    Path(channel): Path<String>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<PublishResponseDto>), StatusCode> {
    let channel = ChannelName::new(channel.clone()).map_err(|_| {
        tracing::warn!("Invalid channel name: '{}'", channel);
        StatusCode::BAD_REQUEST
    })?;

    let usecase = PublishMessageUseCase::new(state.repository.clone());
    match usecase.execute_value(&channel, None, payload).await {
        Ok(delivered) => Ok((StatusCode::ACCEPTED, Json(PublishResponseDto { delivered }))),
        Err(e) => {
            tracing::warn!("Rejected message for '{}': {}", channel, e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}
