//! HTTP API response DTOs for the relay.

use serde::{Deserialize, Serialize};

/// Channel summary for the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSummaryDto {
    pub name: String,
    pub subscribers: Vec<SubscriberDto>,
    pub created_at: String, // ISO 8601
}

/// Subscriber detail within a channel summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriberDto {
    pub client_id: String,
    pub joined_at: String, // ISO 8601
}

/// Result of publishing through the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishResponseDto {
    /// Number of subscribers the message was handed to
    pub delivered: usize,
}
