//! Helpers shared by the integration tests: an in-process server on an
//! ephemeral port plus a thin WebSocket client.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use scoreline_server::{
    domain::{GroupLimits, Timer},
    ui::{AppState, router},
};
use scoreline_shared::time::SystemClock;
use serde_json::Value;
use tokio::{net::TcpListener, net::TcpStream, time::timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE_TIMEOUT: Duration = Duration::from_millis(200);

pub async fn spawn_server(limits: GroupLimits) -> SocketAddr {
    let state = Arc::new(AppState::in_memory(
        Arc::new(SystemClock),
        limits,
        Timer::default(),
    ));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    addr
}

pub async fn connect(addr: SocketAddr) -> WsClient {
    let (ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    ws
}

pub async fn send(ws: &mut WsClient, message: Value) {
    ws.send(Message::text(message.to_string())).await.unwrap();
}

/// Next JSON event, skipping control frames.
pub async fn recv(ws: &mut WsClient) -> Value {
    loop {
        let msg = timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for an event")
            .expect("stream closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Assert that no event arrives within a short window.
pub async fn assert_silent(ws: &mut WsClient) {
    if let Ok(Some(Ok(Message::Text(text)))) = timeout(SILENCE_TIMEOUT, ws.next()).await {
        panic!("unexpected event: {}", text.as_str());
    }
}

/// Join a group and consume the three snapshot events.
pub async fn join(ws: &mut WsClient, group: &str) -> [Value; 3] {
    send(ws, serde_json::json!({"type": "JoinGroup", "groupName": group})).await;
    [recv(ws).await, recv(ws).await, recv(ws).await]
}
