//! UseCase: グループを持たないカウンター（IncrementCounter / ResetCounter）
//!
//! プロセス全体で 1 つのカウンターを共有し、変更のたびに接続中の全クライアントへ
//! `ReceiveCount` をブロードキャストします（ToAll）。

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use crate::domain::GroupEvent;

use super::dispatcher::BroadcastDispatcher;

pub struct CounterUseCase {
    count: AtomicI64,
    dispatcher: Arc<BroadcastDispatcher>,
}

impl CounterUseCase {
    pub fn new(dispatcher: Arc<BroadcastDispatcher>) -> Self {
        Self {
            count: AtomicI64::new(0),
            dispatcher,
        }
    }

    pub fn current(&self) -> i64 {
        self.count.load(Ordering::SeqCst)
    }

    /// カウンターを 1 増やし、新しい値を全クライアントに送る
    pub async fn increment(&self) -> i64 {
        let count = self.count.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        self.dispatcher.to_all(&GroupEvent::CountChanged(count)).await;
        count
    }

    /// カウンターを 0 に戻し、全クライアントに送る
    pub async fn reset(&self) -> i64 {
        self.count.store(0, Ordering::SeqCst);
        self.dispatcher.to_all(&GroupEvent::CountChanged(0)).await;
        0
    }
}
