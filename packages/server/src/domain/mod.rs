//! Domain 層
//!
//! グループ単位のスコアボード状態と、それを扱うためのインターフェースを定義します。
//!
//! - `value_object`: GroupName / ConnectionId / Timestamp
//! - `entity`: GroupState と各フィールドグループ（Score / Timer / Round）
//! - `event`: クライアントへ送るイベント（GroupEvent）
//! - `policy`: グループ数・接続数・寿命の上限（GroupLimits）
//! - `repository`: ConnectionRegistry / GroupStateRepository trait
//! - `message_pusher`: MessagePusher trait
//! - `error`: ドメインのエラー型

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod policy;
pub mod repository;
pub mod value_object;

pub use entity::{GroupState, GroupStateUpdate, Round, Score, Timer};
pub use error::{MessagePushError, RegistryError, RepositoryError, ValueObjectError};
pub use event::GroupEvent;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use policy::GroupLimits;
pub use repository::{ConnectionRegistry, GroupStateRepository};
pub use value_object::{ConnectionId, ConnectionIdFactory, GroupName, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
#[cfg(test)]
pub use repository::{MockConnectionRegistry, MockGroupStateRepository};
