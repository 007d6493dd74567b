use crate::app_state::AppState;
use crate::game::message::WsMessage;

use anyhow::Result;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

#[axum::debug_handler]
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl axum::response::IntoResponse {
    info!("🔗 WebSocket connection attempt received!");

    ws.on_upgrade(move |socket| async move {
        if let Err(e) = handle_socket(socket, state).await {
            error!("❌ WebSocket processing failed: {}", e);
        }
    })
}

async fn send(socket: &mut WebSocket, message: &WsMessage) -> Result<()> {
    let text = serde_json::to_string(message)?;
    socket.send(Message::Text(text.into())).await?;
    Ok(())
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) -> Result<()> {
    let mut rx = state.tx.subscribe();
    let mut subscribed_game_id: Option<String> = None;

    info!("✅ WebSocket connection established.");

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                let msg = match incoming {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        warn!("WebSocket connection lost: {}", e);
                        break;
                    }
                    None => {
                        warn!("WebSocket connection lost.");
                        break;
                    }
                };

                match msg {
                    Message::Text(text) => {
                        debug!("📩 Received WebSocket message: {}", text.as_str());

                        match serde_json::from_str::<WsMessage>(text.as_str()) {
                            Ok(WsMessage::Subscribe { game_id }) => {
                                info!("✅ Socket subscribed to game {}", game_id);
                                let game_state = state.snapshot(&game_id).await;
                                send(&mut socket, &WsMessage::UpdateState {
                                    game_id: game_id.clone(),
                                    game_state,
                                })
                                .await?;
                                subscribed_game_id = Some(game_id);
                            }
                            Ok(other) => {
                                warn!("⚠️ Unexpected message from client: {:?}", other);
                            }
                            Err(e) => {
                                error!("❌ Failed to parse WebSocket message: {}", e);
                                send(&mut socket, &WsMessage::Error {
                                    message: "Malformed message".to_string(),
                                })
                                .await?;
                            }
                        }
                    }
                    Message::Ping(data) => {
                        socket.send(Message::Pong(data)).await?;
                    }
                    Message::Pong(_) => {}
                    Message::Close(reason) => {
                        info!("WebSocket closed: {:?}", reason);
                        break;
                    }
                    Message::Binary(_) => warn!("⚠️ Ignoring binary WebSocket frame."),
                }
            }

            update = rx.recv() => {
                let (game_id, game_state) = match update {
                    Ok(update) => update,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("⚠️ WebSocket fell behind, skipped {} updates.", skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if subscribed_game_id.as_deref() == Some(game_id.as_str()) {
                    debug!("📤 Sending update for game {}", game_id);
                    if let Err(e) = send(&mut socket, &WsMessage::UpdateState { game_id, game_state }).await {
                        error!("❌ Failed to send game update: {}", e);
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
