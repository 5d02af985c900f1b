//! Repository 実装
//!
//! - `inmemory`: プロセスメモリ上の実装（再起動で全て失われる）

pub mod inmemory;

pub use inmemory::{InMemoryConnectionRegistry, InMemoryGroupStateRepository};
