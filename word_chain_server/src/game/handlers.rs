use axum::extract::{Query, State};
use axum::Json;

use crate::app_state::{AppState, DEFAULT_GAME_ID};
use crate::dictionary::WordLookup;
use crate::error::{ApiError, TurnError};
use crate::game::engine::{SubmitOutcome, INVALID_WORD_MESSAGE, VALID_STRUCTURE_MESSAGE};
use crate::game::message::{
    ConfirmWordRequest, GameQuery, LifecycleResponse, SubmitWordRequest, SubmitWordResponse,
    TimeoutRequest, TurnResponse, ValidateWordRequest,
};
use crate::game::models::GameState;
use crate::game::validator::normalize;
use crate::session;

use std::sync::Arc;
use tracing::{error, info};

fn game_id(query: &GameQuery) -> &str {
    query.game_id.as_deref().unwrap_or(DEFAULT_GAME_ID)
}

pub async fn get_state(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameQuery>,
) -> Json<GameState> {
    Json(state.snapshot(game_id(&query)).await)
}

pub async fn start_game(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameQuery>,
) -> Json<LifecycleResponse> {
    let game_id = game_id(&query);
    info!("📥 Received START request - Game ID: {}", game_id);

    let session = state.session(game_id).await;
    let mut guard = session.lock().await;
    guard.state.start();
    guard.touch();
    let game_state = guard.state.clone();
    drop(guard);

    state.publish(game_id, &game_state);
    Json(LifecycleResponse {
        message: "Game started",
        game_state,
    })
}

pub async fn reset_game(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameQuery>,
) -> Json<LifecycleResponse> {
    let game_id = game_id(&query);
    info!("📥 Received RESET request - Game ID: {}", game_id);

    let game_state = match state.find(game_id).await {
        Some(session) => {
            let mut guard = session.lock().await;
            guard.state.reset();
            guard.touch();
            guard.state.clone()
        }
        None => GameState::new(state.rules.clone(), false),
    };

    state.publish(game_id, &game_state);
    Json(LifecycleResponse {
        message: "Game reset",
        game_state,
    })
}

pub async fn submit_word(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameQuery>,
    Json(req): Json<SubmitWordRequest>,
) -> Result<Json<SubmitWordResponse>, ApiError> {
    let game_id = game_id(&query);
    info!(
        "📥 SUBMIT request - Game ID: {}, Player: {}, Word: {}",
        game_id, req.player_id, req.word
    );

    let session = state
        .find(game_id)
        .await
        .ok_or(TurnError::GameNotInProgress)?;
    let mut guard = session.lock().await;
    let outcome = guard.state.submit_word(&req.word, req.player_id).map_err(|e| {
        error!("❌ Submit rejected: {}", e);
        e
    })?;
    guard.touch();

    let response = match outcome {
        SubmitOutcome::Rejected { violations } => {
            let game_state = guard.state.clone();
            drop(guard);
            state.publish(game_id, &game_state);
            SubmitWordResponse {
                success: false,
                valid_structure: None,
                word: None,
                ticket: None,
                errors: violations,
                message: INVALID_WORD_MESSAGE,
                game_state: Some(game_state),
            }
        }
        SubmitOutcome::NeedsMeaning(ticket) => SubmitWordResponse {
            success: true,
            valid_structure: Some(true),
            word: Some(ticket.word.clone()),
            ticket: Some(ticket),
            errors: Vec::new(),
            message: VALID_STRUCTURE_MESSAGE,
            game_state: None,
        },
    };

    Ok(Json(response))
}

pub async fn confirm_word(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameQuery>,
    Json(req): Json<ConfirmWordRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    let game_id = game_id(&query);
    info!(
        "📥 CONFIRM request - Game ID: {}, Player: {}, Word: {}, Valid: {}",
        game_id, req.ticket.player_id, req.ticket.word, req.is_valid_meaning
    );

    let session = state
        .find(game_id)
        .await
        .ok_or(TurnError::GameNotInProgress)?;
    let mut guard = session.lock().await;
    let outcome = guard
        .state
        .confirm_word(&req.ticket, req.is_valid_meaning)
        .map_err(|e| {
            error!("❌ Confirm rejected: {}", e);
            e
        })?;
    guard.touch();
    let game_state = guard.state.clone();
    drop(guard);

    state.publish(game_id, &game_state);
    Ok(Json(TurnResponse {
        success: outcome.success,
        errors: Vec::new(),
        meaning: None,
        message: outcome.message,
        game_state,
    }))
}

pub async fn play_word(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameQuery>,
    Json(req): Json<SubmitWordRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    let game_id = game_id(&query);
    info!(
        "📥 PLAY request - Game ID: {}, Player: {}, Word: {}",
        game_id, req.player_id, req.word
    );

    let outcome = session::play_word(&state, game_id, &req.word, req.player_id)
        .await
        .map_err(|e| {
            error!("❌ Play rejected: {}", e);
            e
        })?;

    Ok(Json(TurnResponse {
        success: outcome.success,
        errors: outcome.violations,
        meaning: outcome.meaning,
        message: outcome.message,
        game_state: outcome.game_state,
    }))
}

pub async fn timeout(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameQuery>,
    Json(req): Json<TimeoutRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    let game_id = game_id(&query);
    info!(
        "📥 TIMEOUT request - Game ID: {}, Player: {}",
        game_id, req.player_id
    );

    let session = state
        .find(game_id)
        .await
        .ok_or(TurnError::GameNotInProgress)?;
    let mut guard = session.lock().await;
    let outcome = guard.state.timeout(req.player_id).map_err(|e| {
        error!("❌ Timeout rejected: {}", e);
        e
    })?;
    guard.touch();
    let game_state = guard.state.clone();
    drop(guard);

    state.publish(game_id, &game_state);
    Ok(Json(TurnResponse {
        success: outcome.success,
        errors: Vec::new(),
        meaning: None,
        message: outcome.message,
        game_state,
    }))
}

/// Dictionary lookup on its own, for clients running the two-step flow.
pub async fn validate_word(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ValidateWordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let word = normalize(&req.word);
    if word.is_empty() {
        return Err(ApiError::BadRequest("Word is required".to_string()));
    }

    let WordLookup {
        is_valid,
        meaning,
        message,
    } = state.dictionary.lookup(&word).await;

    let mut body = serde_json::json!({ "isValid": is_valid, "word": word });
    if let Some(meaning) = meaning {
        body["meaning"] = meaning.into();
    }
    if let Some(message) = message {
        body["message"] = message.into();
    }
    Ok(Json(body))
}

pub async fn health() -> &'static str {
    "ok"
}
