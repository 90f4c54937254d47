//! UseCase: チャンネル離脱処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveChannelUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 離脱後の購読者リストが残りの購読者に通知できる形で返ることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：購読者の離脱
//! - エッジケース：最後の購読者の離脱（残りなし）
//! - 異常系：参加していない購読者の離脱

use std::sync::Arc;

use crate::domain::{ChannelName, ChannelRepository, ClientId};

use super::error::LeaveError;

/// チャンネル離脱のユースケース
pub struct LeaveChannelUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChannelRepository>,
}

impl LeaveChannelUseCase {
    /// 新しい LeaveChannelUseCase を作成
    pub fn new(repository: Arc<dyn ChannelRepository>) -> Self {
        Self { repository }
    }

    /// チャンネル離脱を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ClientId>)` - 残っている購読者（参加順）
    /// * `Err(LeaveError)` - 参加していなかった
    pub async fn execute(
        &self,
        channel: &ChannelName,
        client_id: &ClientId,
    ) -> Result<Vec<ClientId>, LeaveError> {
        self.repository
            .remove_subscriber(channel, client_id)
            .await
            .map_err(|_| LeaveError::NotSubscribed(client_id.to_string()))?;

        Ok(self.repository.subscriber_ids(channel).await)
    }
}
