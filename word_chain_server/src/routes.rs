use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::game::handlers;
use crate::ws_socket::ws_handler;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/game/state", get(handlers::get_state))
        .route("/api/game/start", post(handlers::start_game))
        .route("/api/game/reset", post(handlers::reset_game))
        .route("/api/game/submit-word", post(handlers::submit_word))
        .route("/api/game/confirm-word", post(handlers::confirm_word))
        .route("/api/game/play-word", post(handlers::play_word))
        .route("/api/game/timeout", post(handlers::timeout))
        .route("/api/word/validate", post(handlers::validate_word))
        .route("/health", get(handlers::health))
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
