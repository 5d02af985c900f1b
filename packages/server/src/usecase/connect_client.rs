//! UseCase: クライアント接続処理
//!
//! トランスポート層から新しい接続を受け取り、ConnectionId を割り当てて送信チャンネルを登録します。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionIdFactory, MessagePusher, PusherChannel};

pub struct ConnectClientUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 新しい ConnectionId を割り当て、送信チャンネルを登録する
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection = ConnectionIdFactory::generate();
        self.message_pusher
            .register_client(connection.clone(), sender)
            .await;
        tracing::info!("Connection '{}' registered", connection);
        connection
    }
}
