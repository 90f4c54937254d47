//! InMemory Channel Repository 実装
//!
//! ドメイン層が定義する ChannelRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! チャンネル（購読者リスト）と購読者ごとの送信チャンネルは同じロックで守り、
//! 片方だけが更新された状態が外から見えないようにしています。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::domain::{
    Channel, ChannelName, ChannelRepository, ClientId, DEFAULT_SUBSCRIBER_CAPACITY,
    RepositoryError, Subscriber, Timestamp,
};

#[derive(Default)]
struct Store {
    /// Channel ドメインモデル
    channels: HashMap<ChannelName, Channel>,
    /// 購読者ごとの WebSocket 送信チャンネル
    senders: HashMap<(ChannelName, ClientId), UnboundedSender<String>>,
}

/// インメモリ Channel Repository 実装
pub struct InMemoryChannelRepository {
    store: Mutex<Store>,
    /// 新しく作るチャンネルの購読者上限
    capacity: usize,
}

impl InMemoryChannelRepository {
    /// 新しい InMemoryChannelRepository を作成
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SUBSCRIBER_CAPACITY)
    }

    /// チャンネルごとの購読者上限を指定して作成
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: Mutex::new(Store::default()),
            capacity,
        }
    }
}

impl Default for InMemoryChannelRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelRepository for InMemoryChannelRepository {
    async fn add_subscriber(
        &self,
        channel: ChannelName,
        client_id: ClientId,
        sender: UnboundedSender<String>,
        joined_at: Timestamp,
    ) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().await;

        let is_new_channel = !store.channels.contains_key(&channel);
        let entry = store
            .channels
            .entry(channel.clone())
            .or_insert_with(|| Channel::with_capacity(channel.clone(), joined_at, self.capacity));

        if let Err(e) = entry.add_subscriber(Subscriber::new(client_id.clone(), joined_at)) {
            if is_new_channel {
                store.channels.remove(&channel);
            }
            return Err(e.into());
        }

        if is_new_channel {
            tracing::info!("Opened new channel '{}'", channel);
        }
        store.senders.insert((channel, client_id), sender);
        Ok(())
    }

    async fn remove_subscriber(
        &self,
        channel: &ChannelName,
        client_id: &ClientId,
    ) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().await;

        let entry = store
            .channels
            .get_mut(channel)
            .ok_or_else(|| RepositoryError::ChannelNotFound(channel.to_string()))?;

        if !entry.remove_subscriber(client_id) {
            return Err(RepositoryError::SubscriberNotFound(client_id.to_string()));
        }
        if entry.is_empty() {
            store.channels.remove(channel);
            tracing::info!("Closed empty channel '{}'", channel);
        }

        store.senders.remove(&(channel.clone(), client_id.clone()));
        Ok(())
    }

    async fn subscriber_ids(&self, channel: &ChannelName) -> Vec<ClientId> {
        let store = self.store.lock().await;
        store
            .channels
            .get(channel)
            .map(Channel::subscriber_ids)
            .unwrap_or_default()
    }

    async fn subscriber_senders(
        &self,
        channel: &ChannelName,
    ) -> Vec<(ClientId, UnboundedSender<String>)> {
        let store = self.store.lock().await;
        let Some(entry) = store.channels.get(channel) else {
            return Vec::new();
        };

        entry
            .subscribers
            .iter()
            .filter_map(|s| {
                store
                    .senders
                    .get(&(channel.clone(), s.id.clone()))
                    .map(|sender| (s.id.clone(), sender.clone()))
            })
            .collect()
    }

    async fn list_channels(&self) -> Vec<Channel> {
        let store = self.store.lock().await;
        let mut channels: Vec<Channel> = store.channels.values().cloned().collect();
        channels.sort_by(|a, b| a.name.cmp(&b.name));
        channels
    }
}
