use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::game::models::PlayerId;

/// Rejections that leave the game untouched. The caller has to fix the
/// request, repeating it will not help.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("Not your turn")]
    NotYourTurn(PlayerId),
    #[error("Game not in progress")]
    GameNotInProgress,
    #[error("Stale or unknown confirmation ticket")]
    StaleTicket,
    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Turn(#[from] TurnError),
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
