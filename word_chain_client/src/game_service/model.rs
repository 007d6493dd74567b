use serde::{Deserialize, Serialize};

pub type PlayerId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}

/// Client-side view of the server's game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub players: Vec<Player>,
    pub current_player: PlayerId,
    pub used_words: Vec<String>,
    pub last_word: String,
    pub game_started: bool,
    pub game_over: bool,
    pub winner: Option<PlayerId>,
    #[serde(default)]
    pub turn: u64,
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            players: Vec::new(),
            current_player: 1,
            used_words: Vec::new(),
            last_word: String::new(),
            game_started: false,
            game_over: false,
            winner: None,
            turn: 0,
        }
    }
}

impl GameState {
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_name(&self, id: PlayerId) -> String {
        self.player(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("Player {id}"))
    }

    /// Letter the next word has to start with, upper-cased.
    pub fn required_letter(&self) -> Option<char> {
        self.last_word
            .chars()
            .last()
            .and_then(|c| c.to_uppercase().next())
    }

    pub fn in_progress(&self) -> bool {
        self.game_started && !self.game_over
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleResponse {
    pub game_state: GameState,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    pub meaning: Option<String>,
    pub message: String,
    pub game_state: GameState,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WsMessage {
    #[serde(rename_all = "camelCase")]
    Subscribe { game_id: String },
    #[serde(rename_all = "camelCase")]
    UpdateState {
        game_id: String,
        game_state: GameState,
    },
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_server_state() {
        let raw = r#"{
            "players": [
                {"id": 1, "name": "Player 1", "score": 2},
                {"id": 2, "name": "Player 2", "score": 0}
            ],
            "currentPlayer": 2,
            "usedWords": ["plane", "eagle"],
            "lastWord": "eagle",
            "gameStarted": true,
            "gameOver": false,
            "winner": null,
            "turn": 3,
            "rules": {"playerNames": ["Player 1", "Player 2"], "minWordLen": 4, "targetScore": null}
        }"#;

        let state: GameState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.player_name(2), "Player 2");
        assert_eq!(state.required_letter(), Some('E'));
        assert!(state.in_progress());
        assert_eq!(state.turn, 3);
    }

    #[test]
    fn test_update_frame() {
        let raw = r#"{"type":"UPDATE_STATE","gameId":"default","gameState":{
            "players":[],"currentPlayer":1,"usedWords":[],"lastWord":"",
            "gameStarted":false,"gameOver":false,"winner":null}}"#;

        match serde_json::from_str::<WsMessage>(raw).unwrap() {
            WsMessage::UpdateState { game_id, game_state } => {
                assert_eq!(game_id, "default");
                assert_eq!(game_state.required_letter(), None);
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}
