//! UseCase: チャンネル参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinChannelUseCase::execute() メソッド
//! - 購読者リストメッセージの構築
//!
//! ### なぜこのテストが必要か
//! - 重複した client_id での参加を防ぐ
//! - Repository のエラーが UI 層向けのエラーに正しく変換されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規購読者の参加
//! - 異常系：重複した client_id、チャンネルの容量超過
//! - エッジケース：存在しないチャンネルの購読者リスト（空）

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::{
    domain::{ChannelError, ChannelName, ChannelRepository, ClientId, RepositoryError, Timestamp},
    infrastructure::dto::websocket::SubscribersMessage,
};

use super::error::JoinError;

/// チャンネル参加のユースケース
pub struct JoinChannelUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChannelRepository>,
}

impl JoinChannelUseCase {
    /// 新しい JoinChannelUseCase を作成
    pub fn new(repository: Arc<dyn ChannelRepository>) -> Self {
        Self { repository }
    }

    /// チャンネル参加を実行
    ///
    /// # Arguments
    ///
    /// * `channel` - 参加するチャンネル
    /// * `client_id` - 参加するクライアントの ID
    /// * `sender` - このクライアント宛てのメッセージ送信チャンネル
    pub async fn execute(
        &self,
        channel: ChannelName,
        client_id: ClientId,
        sender: UnboundedSender<String>,
    ) -> Result<(), JoinError> {
        self.repository
            .add_subscriber(channel, client_id, sender, Timestamp::now())
            .await
            .map_err(|e| match e {
                RepositoryError::Channel(ChannelError::DuplicateSubscriber(id)) => {
                    JoinError::DuplicateClientId(id)
                }
                _ => JoinError::ChannelCapacityExceeded,
            })
    }

    /// 購読者リストメッセージを構築（参加順）
    pub async fn build_subscribers_message(&self, channel: &ChannelName) -> SubscribersMessage {
        let uuids = self
            .repository
            .subscriber_ids(channel)
            .await
            .into_iter()
            .map(ClientId::into_string)
            .collect();

        SubscribersMessage { uuids }
    }
}
