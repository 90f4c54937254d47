//! UseCase 層のエラー定義

use thiserror::Error;

/// チャンネル参加のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinError {
    #[error("Client '{0}' is already subscribed to this channel")]
    DuplicateClientId(String),

    #[error("Channel capacity exceeded")]
    ChannelCapacityExceeded,
}

/// チャンネル離脱のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LeaveError {
    #[error("Client '{0}' is not subscribed to this channel")]
    NotSubscribed(String),
}

/// メッセージ配信のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// 受信したフレームが JSON として解釈できない
    #[error("bad message: not valid JSON ({0})")]
    InvalidJson(String),

    /// JSON だがオブジェクトではない
    #[error("bad message: expected a JSON object")]
    NotAnObject,
}
