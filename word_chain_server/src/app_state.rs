use crate::dictionary::Dictionary;
use crate::game::models::{GameRules, GameState};
use crate::session::GameSession;

use std::{collections::HashMap, sync::Arc};
use tokio::sync::broadcast;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

/// Game the plain `/api/game/*` routes act on when no id is given.
pub const DEFAULT_GAME_ID: &str = "default";

pub type SharedSession = Arc<Mutex<GameSession>>;

#[derive(Clone)]
pub struct AppState {
    pub games: Arc<RwLock<HashMap<String, SharedSession>>>,
    pub tx: broadcast::Sender<(String, GameState)>,
    pub dictionary: Arc<dyn Dictionary>,
    pub rules: GameRules,
}

impl AppState {
    pub fn new(
        tx: broadcast::Sender<(String, GameState)>,
        dictionary: Arc<dyn Dictionary>,
        rules: GameRules,
    ) -> Self {
        AppState {
            games: Arc::new(RwLock::new(HashMap::new())),
            tx,
            dictionary,
            rules,
        }
    }

    /// Returns the session for `game_id` if one was ever started.
    pub async fn find(&self, game_id: &str) -> Option<SharedSession> {
        self.games.read().await.get(game_id).map(Arc::clone)
    }

    /// Current state of `game_id`. Unknown ids read as a fresh lobby
    /// without creating a session.
    pub async fn snapshot(&self, game_id: &str) -> GameState {
        match self.find(game_id).await {
            Some(session) => session.lock().await.state.clone(),
            None => GameState::new(self.rules.clone(), false),
        }
    }

    /// Returns the session for `game_id`, creating a lobby one if needed.
    pub async fn session(&self, game_id: &str) -> SharedSession {
        if let Some(session) = self.find(game_id).await {
            return session;
        }

        let mut games = self.games.write().await;
        let session = games.entry(game_id.to_string()).or_insert_with(|| {
            info!("🆕 Creating new game with ID: {}", game_id);
            Arc::new(Mutex::new(GameSession::new(self.rules.clone())))
        });
        Arc::clone(session)
    }

    /// Pushes a state to every WebSocket subscribed to `game_id`.
    pub fn publish(&self, game_id: &str, state: &GameState) {
        // No subscribers is fine.
        let _ = self.tx.send((game_id.to_string(), state.clone()));
    }
}
