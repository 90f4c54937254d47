//! UseCase: メッセージ配信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PublishMessageUseCase::execute() / execute_value() / broadcast_subscribers()
//! - 配信前のスタンプ処理（`uuid` と `time` の付与）
//!
//! ### なぜこのテストが必要か
//! - 送信者を含むチャンネルの全購読者に届くことを保証
//! - オブジェクト以外の JSON や壊れた JSON は配信されないことを保証
//! - クライアントが送った `uuid` はサーバー側の値で上書きされる
//!
//! ### どのような状況を想定しているか
//! - 正常系：購読者全員への配信
//! - 異常系：JSON でないフレーム、オブジェクトでない JSON
//! - エッジケース：購読者のいないチャンネル（配信数 0）

use std::sync::Arc;

use realtime_shared::time::{clock_label, get_jst_timestamp};
use serde_json::Value;

use crate::{
    domain::{ChannelName, ChannelRepository, ClientId},
    infrastructure::dto::websocket::{SENDER_KEY, SubscribersMessage, TIME_KEY},
};

use super::error::PublishError;

/// メッセージ配信のユースケース
pub struct PublishMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChannelRepository>,
}

impl PublishMessageUseCase {
    /// 新しい PublishMessageUseCase を作成
    pub fn new(repository: Arc<dyn ChannelRepository>) -> Self {
        Self { repository }
    }

    /// 受信したテキストフレームを配信
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 配信できた購読者数
    /// * `Err(PublishError)` - フレームが JSON オブジェクトではない
    pub async fn execute(
        &self,
        channel: &ChannelName,
        from: Option<&ClientId>,
        raw: &str,
    ) -> Result<usize, PublishError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| PublishError::InvalidJson(e.to_string()))?;
        self.execute_value(channel, from, value).await
    }

    /// 解析済みの JSON 値を配信
    pub async fn execute_value(
        &self,
        channel: &ChannelName,
        from: Option<&ClientId>,
        value: Value,
    ) -> Result<usize, PublishError> {
        let frame = stamp(value, from, clock_label(get_jst_timestamp()))?;
        Ok(self.deliver(channel, &frame).await)
    }

    /// 購読者リストをサーバー発のメッセージとして配信
    pub async fn broadcast_subscribers(
        &self,
        channel: &ChannelName,
        message: &SubscribersMessage,
    ) -> Result<usize, PublishError> {
        let value = serde_json::to_value(message)
            .map_err(|e| PublishError::InvalidJson(e.to_string()))?;
        self.execute_value(channel, None, value).await
    }

    /// チャンネルの全購読者（送信者を含む）に送る
    async fn deliver(&self, channel: &ChannelName, frame: &str) -> usize {
        let senders = self.repository.subscriber_senders(channel).await;
        tracing::info!(
            "Sending message to {} subscribers of '{}'",
            senders.len(),
            channel
        );

        let mut delivered = 0;
        for (client_id, sender) in senders {
            if sender.send(frame.to_string()).is_ok() {
                delivered += 1;
            } else {
                tracing::warn!("Failed to send message to client '{}'", client_id);
            }
        }
        delivered
    }
}

/// `uuid` に送信者（サーバー発なら null）、`time` に時刻ラベルを書き込む
fn stamp(mut value: Value, from: Option<&ClientId>, time: String) -> Result<String, PublishError> {
    let Value::Object(map) = &mut value else {
        return Err(PublishError::NotAnObject);
    };

    let sender = from.map_or(Value::Null, |id| Value::String(id.to_string()));
    map.insert(SENDER_KEY.to_string(), sender);
    map.insert(TIME_KEY.to_string(), Value::String(time));

    Ok(value.to_string())
}
