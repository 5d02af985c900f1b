//! MessagePusher trait 定義
//!
//! 接続中のクライアントへのイベント送信（通知）を抽象化します。
//! 送信は fire-and-forget で、再送や受信確認は行いません。
//! イベントのエンコード（ワイヤーフォーマット）は実装側の責務です。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, GroupEvent, MessagePushError};

/// クライアントへの送信チャンネル（エンコード済みのテキストフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続と送信チャンネルを登録
    async fn register_client(&self, connection: ConnectionId, sender: PusherChannel);

    /// 接続の登録を解除
    async fn unregister_client(&self, connection: &ConnectionId);

    /// 1 つの接続に送信（ToCaller）
    async fn push_to(
        &self,
        connection: &ConnectionId,
        event: &GroupEvent,
    ) -> Result<(), MessagePushError>;

    /// 指定した接続群に送信（ToGroup）。一部の送信失敗は許容する。
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &GroupEvent,
    ) -> Result<(), MessagePushError>;

    /// 接続中の全クライアントに送信（ToAll）
    async fn broadcast_all(&self, event: &GroupEvent) -> Result<(), MessagePushError>;
}
