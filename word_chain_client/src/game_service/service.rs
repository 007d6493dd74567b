use crate::game_service::model::{
    ErrorResponse, GameState, LifecycleResponse, PlayerId, TurnResponse, WsMessage,
};

use anyhow::{anyhow, bail, Result};
use eframe::egui;
use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;

#[derive(Clone)]
pub struct GameService {
    client: reqwest::Client,
    server_url: String,
    game_id: String,
    game: Arc<Mutex<GameState>>,
}

impl GameService {
    pub fn new(server_url: String, game_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
            game_id,
            game: Arc::new(Mutex::new(GameState::default())),
        }
    }

    pub fn get_game(&self) -> Arc<Mutex<GameState>> {
        Arc::clone(&self.game)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.server_url, path)
    }

    fn game_query(&self) -> [(&'static str, &str); 1] {
        [("gameId", self.game_id.as_str())]
    }

    fn websocket_url(&self) -> String {
        format!(
            "{}/ws",
            self.server_url
                .replace("http://", "ws://")
                .replace("https://", "wss://")
        )
    }

    async fn store(&self, state: &GameState) {
        *self.game.lock().await = state.clone();
    }

    /// Reads a JSON body, turning the server's `{error}` replies into errors.
    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        match response.json::<ErrorResponse>().await {
            Ok(body) => bail!(body.error),
            Err(_) => Err(anyhow!("Server answered {}", status)),
        }
    }

    pub async fn fetch_state(&self) -> Result<GameState> {
        let response = self
            .client
            .get(self.api_url("game/state"))
            .query(&self.game_query())
            .send()
            .await?;
        let state: GameState = Self::read(response).await?;
        self.store(&state).await;
        Ok(state)
    }

    pub async fn start_game(&self) -> Result<GameState> {
        let response = self
            .client
            .post(self.api_url("game/start"))
            .query(&self.game_query())
            .send()
            .await?;
        let body: LifecycleResponse = Self::read(response).await?;
        self.store(&body.game_state).await;
        info!("✅ Game {} started", self.game_id);
        Ok(body.game_state)
    }

    pub async fn reset_game(&self) -> Result<GameState> {
        let response = self
            .client
            .post(self.api_url("game/reset"))
            .query(&self.game_query())
            .send()
            .await?;
        let body: LifecycleResponse = Self::read(response).await?;
        self.store(&body.game_state).await;
        info!("✅ Game {} reset", self.game_id);
        Ok(body.game_state)
    }

    /// Plays a word. The server checks the structure and the dictionary.
    pub async fn play_word(&self, word: &str, player_id: PlayerId) -> Result<TurnResponse> {
        info!("📤 Playing '{}' for player {}", word, player_id);
        let response = self
            .client
            .post(self.api_url("game/play-word"))
            .query(&self.game_query())
            .json(&json!({ "word": word, "playerId": player_id }))
            .send()
            .await?;
        let body: TurnResponse = Self::read(response).await?;
        self.store(&body.game_state).await;
        Ok(body)
    }

    pub async fn report_timeout(&self, player_id: PlayerId) -> Result<TurnResponse> {
        info!("⏰ Reporting timeout for player {}", player_id);
        let response = self
            .client
            .post(self.api_url("game/timeout"))
            .query(&self.game_query())
            .json(&json!({ "playerId": player_id }))
            .send()
            .await?;
        let body: TurnResponse = Self::read(response).await?;
        self.store(&body.game_state).await;
        Ok(body)
    }

    /// Keeps a WebSocket subscription open, reconnecting a few times when it
    /// drops, so changes made from other windows show up here.
    pub async fn listen(self: Arc<Self>, ctx: egui::Context) {
        let mut attempt = 0;

        while attempt < MAX_RECONNECT_ATTEMPTS {
            match self.listen_once(&ctx).await {
                Ok(()) => {
                    warn!("WebSocket closed by server.");
                    attempt = 0;
                }
                Err(e) => {
                    attempt += 1;
                    error!("❌ WebSocket attempt {} failed: {}", attempt, e);
                }
            }
            tokio::time::sleep(Duration::from_secs(2)).await;
        }

        error!("❌ Reached max reconnection attempts.");
    }

    async fn listen_once(&self, ctx: &egui::Context) -> Result<()> {
        let (stream, _) = connect_async(self.websocket_url()).await?;
        let (mut write, mut read) = stream.split();

        let subscribe = WsMessage::Subscribe {
            game_id: self.game_id.clone(),
        };
        write
            .send(Message::Text(serde_json::to_string(&subscribe)?.into()))
            .await?;
        info!("✅ Subscribed to game {}", self.game_id);

        while let Some(message) = read.next().await {
            match message? {
                Message::Text(text) => match serde_json::from_str::<WsMessage>(text.as_str()) {
                    Ok(WsMessage::UpdateState { game_state, .. }) => {
                        debug!("📩 State update, turn {}", game_state.turn);
                        self.store(&game_state).await;
                        ctx.request_repaint();
                    }
                    Ok(WsMessage::Error { message }) => error!("⚠️ Server error: {}", message),
                    Ok(other) => warn!("⚠️ Unexpected frame: {:?}", other),
                    Err(e) => error!("⚠️ Unreadable frame {}: {}", text.as_str(), e),
                },
                Message::Ping(data) => write.send(Message::Pong(data)).await?,
                Message::Close(_) => break,
                _ => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let service = GameService::new("https://example.com/".to_string(), "lounge".to_string());
        assert_eq!(service.websocket_url(), "wss://example.com/ws");
        assert_eq!(
            service.api_url("game/state"),
            "https://example.com/api/game/state"
        );
    }

    #[test]
    fn test_game_id_is_encoded() {
        let service = GameService::new("http://localhost:4000".to_string(), "a&b c".to_string());
        let request = service
            .client
            .get(service.api_url("game/state"))
            .query(&service.game_query())
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://localhost:4000/api/game/state?gameId=a%26b+c"
        );
        assert_eq!(request.url().query_pairs().next().unwrap().1, "a&b c");
    }
}
