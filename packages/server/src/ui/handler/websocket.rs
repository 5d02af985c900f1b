//! WebSocket connection handlers (Session Gateway).

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, GroupStateUpdate, Round, Score, Timer},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Every event addressed to this connection (snapshot, group broadcast, error)
/// goes through the channel, so delivery order per connection is the enqueue order.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive events
    let (tx, rx) = mpsc::unbounded_channel();
    let connection = state.connect_client_usecase.execute(tx).await;
    tracing::info!("Connection '{}' established", connection);

    let state_clone = state.clone();
    let connection_clone = connection.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", connection_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    match serde_json::from_str::<ClientMessage>(text.as_str()) {
                        Ok(message) => {
                            handle_client_message(&state_clone, &connection_clone, message).await
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Ignoring unparseable frame from '{}': {}",
                                connection_clone,
                                e
                            );
                        }
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    let send_task = pusher_loop(rx, sender);
    wait_for_session_end(recv_task, send_task).await;

    let left = state.disconnect_client_usecase.execute(&connection).await;
    tracing::info!(
        "Connection '{}' closed, removed from {} group(s)",
        connection,
        left.len()
    );
}

/// Wait until either task completes, then abort the other and wait for it to stop.
///
/// An aborted task may still be running on another worker. When this returns,
/// neither task can touch the registry any more, so disconnect cleanup is final.
async fn wait_for_session_end(mut recv_task: JoinHandle<()>, mut send_task: JoinHandle<()>) {
    tokio::select! {
        _ = &mut recv_task => {
            send_task.abort();
            let _ = send_task.await;
        }
        _ = &mut send_task => {
            recv_task.abort();
            let _ = recv_task.await;
        }
    };
}

/// Route one inbound message to its use case.
///
/// Nothing here closes the connection: rejected or ignored operations are logged
/// and, for join rejections, reported back to the caller with an `Error` event.
async fn handle_client_message(state: &AppState, connection: &ConnectionId, message: ClientMessage) {
    match message {
        ClientMessage::JoinGroup { group_name } => {
            if let Err(e) = state
                .join_group_usecase
                .execute(connection, &group_name)
                .await
            {
                tracing::warn!("JoinGroup from '{}' rejected: {}", connection, e);
                state
                    .join_group_usecase
                    .report_rejection(connection, &e)
                    .await;
            }
        }
        ClientMessage::LeaveGroup { group_name } => {
            if let Err(e) = state
                .leave_group_usecase
                .execute(connection, &group_name)
                .await
            {
                tracing::warn!("LeaveGroup from '{}' ignored: {}", connection, e);
            }
        }
        ClientMessage::UpdateScore {
            group_name,
            team1_score,
            team2_score,
            team1_penalty,
            team2_penalty,
        } => {
            let score = Score {
                team1_score,
                team2_score,
                team1_penalty,
                team2_penalty,
            };
            update_group_state(state, connection, &group_name, GroupStateUpdate::Score(score))
                .await;
        }
        ClientMessage::UpdateTimer {
            group_name,
            minutes,
            seconds,
            is_running,
        } => {
            let timer = Timer {
                minutes,
                seconds,
                is_running,
            };
            update_group_state(state, connection, &group_name, GroupStateUpdate::Timer(timer))
                .await;
        }
        ClientMessage::UpdateRound { group_name, round } => {
            update_group_state(
                state,
                connection,
                &group_name,
                GroupStateUpdate::Round(Round(round)),
            )
            .await;
        }
        ClientMessage::AreClientsConnected { group_name } => {
            state
                .are_clients_connected_usecase
                .reply_to(connection, &group_name)
                .await;
        }
        ClientMessage::IncrementCounter => {
            state.counter_usecase.increment().await;
        }
        ClientMessage::ResetCounter => {
            state.counter_usecase.reset().await;
        }
    }
}

async fn update_group_state(
    state: &AppState,
    connection: &ConnectionId,
    group_name: &str,
    update: GroupStateUpdate,
) {
    if let Err(e) = state
        .update_group_state_usecase
        .execute(group_name, update)
        .await
    {
        tracing::warn!("Update from '{}' ignored: {}", connection, e);
    }
}
