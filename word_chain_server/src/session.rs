//! Per-game session state and the one-shot word flow.

use std::time::{Duration, SystemTime};
use tracing::{debug, info};

use crate::app_state::AppState;
use crate::error::TurnError;
use crate::game::engine::{SubmitOutcome, INVALID_WORD_MESSAGE};
use crate::game::models::{GameRules, GameState, PlayerId};
use crate::game::validator::Violation;

#[derive(Debug, Clone)]
pub struct GameSession {
    pub state: GameState,
    pub last_activity: SystemTime,
}

impl GameSession {
    pub fn new(rules: GameRules) -> Self {
        GameSession {
            state: GameState::new(rules, false),
            last_activity: SystemTime::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = SystemTime::now();
    }

    /// Whether the session saw activity within `idle_limit`.
    pub fn is_active(&self, idle_limit: Duration) -> bool {
        self.last_activity.elapsed().unwrap_or(idle_limit) < idle_limit
    }
}

#[derive(Debug, Clone)]
pub struct PlayOutcome {
    pub success: bool,
    pub violations: Vec<Violation>,
    pub meaning: Option<String>,
    pub message: &'static str,
    pub game_state: GameState,
}

/// Runs a whole turn for `word`: structure check, dictionary lookup and
/// confirmation with the server's own verdict.
///
/// The session lock is released while the dictionary is consulted. If the
/// turn ends some other way in the meantime (a timeout, say) the late
/// confirmation fails with [`TurnError`] and nothing is changed.
pub async fn play_word(
    app: &AppState,
    game_id: &str,
    word: &str,
    player_id: PlayerId,
) -> Result<PlayOutcome, TurnError> {
    let session = app
        .find(game_id)
        .await
        .ok_or(TurnError::GameNotInProgress)?;

    let ticket = {
        let mut guard = session.lock().await;
        let outcome = guard.state.submit_word(word, player_id)?;
        guard.touch();

        match outcome {
            SubmitOutcome::Rejected { violations } => {
                let game_state = guard.state.clone();
                drop(guard);
                app.publish(game_id, &game_state);
                return Ok(PlayOutcome {
                    success: false,
                    violations,
                    meaning: None,
                    message: INVALID_WORD_MESSAGE,
                    game_state,
                });
            }
            SubmitOutcome::NeedsMeaning(ticket) => ticket,
        }
    };

    let lookup = app.dictionary.lookup(&ticket.word).await;
    debug!(
        "Dictionary verdict for '{}': valid={}",
        ticket.word, lookup.is_valid
    );

    let mut guard = session.lock().await;
    let outcome = guard.state.confirm_word(&ticket, lookup.is_valid)?;
    guard.touch();
    let game_state = guard.state.clone();
    drop(guard);

    info!(
        "Game {}: player {} played '{}' -> {}",
        game_id, player_id, ticket.word, outcome.message
    );
    app.publish(game_id, &game_state);

    Ok(PlayOutcome {
        success: outcome.success,
        violations: Vec::new(),
        meaning: lookup.meaning,
        message: outcome.message,
        game_state,
    })
}
