//! `GET /ws/{connection_id}`: one WebSocket per client connection, able to
//! subscribe to any number of jobs' progress broadcasts via the Progress Hub.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use tokio::sync::broadcast;

use crate::progress::{ClientMessage, ServerMessage};

use super::state::AppState;

pub async fn ws_upgrade(
    ws: WebSocketUpgrade,
    Path(connection_id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, connection_id, state))
}

async fn handle_socket(mut socket: WebSocket, connection_id: String, state: AppState) {
    tracing::debug!(connection_id, "websocket connection opened");

    let mut subscription: Option<broadcast::Receiver<ServerMessage>> = None;

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::Subscribe { job_id }) => {
                                subscription = Some(state.progress.subscribe(&job_id));
                            }
                            Ok(ClientMessage::Ping) => {
                                if send(&mut socket, &ServerMessage::Pong).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::debug!(connection_id, error = %e, "ignoring unrecognized client message");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(connection_id, error = %e, "websocket read error");
                        break;
                    }
                    _ => {}
                }
            }
            progress = recv_subscription(&mut subscription) => {
                match progress {
                    Some(message) => {
                        if send(&mut socket, &message).await.is_err() {
                            break;
                        }
                    }
                    None => {
                        subscription = None;
                    }
                }
            }
        }
    }

    tracing::debug!(connection_id, "websocket connection closed");
}

async fn recv_subscription(subscription: &mut Option<broadcast::Receiver<ServerMessage>>) -> Option<ServerMessage> {
    match subscription {
        Some(rx) => match rx.recv().await {
            Ok(message) => Some(message),
            Err(_) => None,
        },
        None => std::future::pending().await,
    }
}

async fn send(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), axum::Error> {
    let text = serde_json::to_string(message).unwrap_or_default();
    socket.send(Message::Text(text.into())).await
}
