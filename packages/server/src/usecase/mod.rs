//! UseCase 層
//!
//! Session Gateway（UI 層）から呼び出されるアプリケーションの操作を定義します。
//! 各ユースケースはドメイン層の trait にだけ依存します。

mod are_clients_connected;
mod connect_client;
mod counter;
mod disconnect_client;
mod dispatcher;
mod error;
mod get_groups;
mod group_lifecycle;
mod join_group;
mod leave_group;
mod update_group_state;

pub use are_clients_connected::AreClientsConnectedUseCase;
pub use connect_client::ConnectClientUseCase;
pub use counter::CounterUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use dispatcher::BroadcastDispatcher;
pub use error::{GetGroupError, JoinGroupError, LeaveGroupError, UpdateGroupError};
pub use get_groups::{GetGroupsUseCase, GroupOverview};
pub use group_lifecycle::{Admission, GroupLifecycleManager, JoinPermit, RejectReason};
pub use join_group::JoinGroupUseCase;
pub use leave_group::LeaveGroupUseCase;
pub use update_group_state::UpdateGroupStateUseCase;
