use serde::{Deserialize, Serialize};

use super::models::{GameState, PendingWord, PlayerId};
use super::validator::Violation;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameQuery {
    pub game_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitWordRequest {
    pub word: String,
    pub player_id: PlayerId,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmWordRequest {
    pub ticket: PendingWord,
    pub is_valid_meaning: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeoutRequest {
    pub player_id: PlayerId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateWordRequest {
    pub word: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleResponse {
    pub message: &'static str,
    pub game_state: GameState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitWordResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_structure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<PendingWord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Violation>,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_state: Option<GameState>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Violation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    pub message: &'static str,
    pub game_state: GameState,
}

/// Frames exchanged over `/ws`.
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
