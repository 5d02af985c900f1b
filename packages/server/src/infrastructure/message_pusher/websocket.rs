//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - `GroupEvent` を JSON テキストフレームにエンコード
//! - クライアントへのメッセージ送信（push_to, broadcast, broadcast_all）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 送信はチャンネルへの enqueue のみで、ネットワーク I/O は接続ごとの送信タスクが行います。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, GroupEvent, MessagePushError, MessagePusher, PusherChannel},
    infrastructure::dto::conversion::encode_event,
};

fn encode(event: &GroupEvent) -> Result<String, MessagePushError> {
    encode_event(event).map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
}

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new(Arc::new(Mutex::new(HashMap::new())));
/// pusher.register_client(connection_id.clone(), tx).await;
/// pusher.push_to(&connection_id, &GroupEvent::RoundUpdated(Round(1))).await?;
/// ```
pub struct WebSocketMessagePusher {
    /// Key: ConnectionId / Value: PusherChannel
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

impl WebSocketMessagePusher {
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Connection '{}' registered to MessagePusher", connection);
        clients.insert(connection, sender);
    }

    async fn unregister_client(&self, connection: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection);
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection);
    }

    async fn push_to(
        &self,
        connection: &ConnectionId,
        event: &GroupEvent,
    ) -> Result<(), MessagePushError> {
        let content = encode(event)?;
        let clients = self.clients.lock().await;

        if let Some(sender) = clients.get(connection) {
            sender
                .send(content)
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed {} to connection '{}'", event.name(), connection);
            Ok(())
        } else {
            Err(MessagePushError::ConnectionNotFound(
                connection.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &GroupEvent,
    ) -> Result<(), MessagePushError> {
        let content = encode(event)?;
        let clients = self.clients.lock().await;

        for target in targets {
            if let Some(sender) = clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.clone()) {
                    tracing::warn!("Failed to push message to connection '{}': {}", target, e);
                } else {
                    tracing::debug!("Broadcasted {} to connection '{}'", event.name(), target);
                }
            } else {
                tracing::warn!(
                    "Connection '{}' not found during broadcast, skipping",
                    target
                );
            }
        }

        Ok(())
    }

    async fn broadcast_all(&self, event: &GroupEvent) -> Result<(), MessagePushError> {
        let content = encode(event)?;
        let clients = self.clients.lock().await;

        for (connection, sender) in clients.iter() {
            if let Err(e) = sender.send(content.clone()) {
                tracing::warn!(
                    "Failed to push message to connection '{}': {}",
                    connection,
                    e
                );
            }
        }
        tracing::debug!(
            "Broadcasted {} to {} connection(s)",
            event.name(),
            clients.len()
        );

        Ok(())
    }
}
