//! UI 層（Session Gateway）
//!
//! WebSocket / HTTP の受け口。クライアントのメッセージをユースケースの呼び出しに変換します。

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, router};
pub use state::AppState;
