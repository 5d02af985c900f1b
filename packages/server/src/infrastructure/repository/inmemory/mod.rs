//! InMemory 実装
//!
//! どちらの実装も `DashMap`（シャード単位のロック）を使い、
//! 無関係なグループ同士の操作が 1 つのグローバルロックで直列化されないようにしています。

mod connection_registry;
mod group_state;

pub use connection_registry::InMemoryConnectionRegistry;
pub use group_state::InMemoryGroupStateRepository;
