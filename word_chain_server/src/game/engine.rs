//! Turn transitions for a word chain game.
//!
//! Every transition either fails with a [`TurnError`] and leaves the state as
//! it was, or completes and returns an outcome. Submitting a structurally
//! valid word is the one exception: it only records a [`PendingWord`] ticket
//! and the turn completes later through [`GameState::confirm_word`].

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::models::{GameState, PendingWord, PlayerId};
use super::validator::{normalize, validate_structure, Violation};
use crate::error::TurnError;

pub const INVALID_WORD_MESSAGE: &str = "Invalid word! Lost 1 point.";
pub const VALID_STRUCTURE_MESSAGE: &str = "Word structure is valid. Please validate meaning.";
pub const WORD_ACCEPTED_MESSAGE: &str = "Word accepted! +1 point";
pub const INVALID_MEANING_MESSAGE: &str = "Invalid word meaning! -1 point";
pub const TIMEOUT_MESSAGE: &str = "Time out! -1 point.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The word broke at least one rule. The turn is over.
    Rejected { violations: Vec<Violation> },
    /// The word needs a meaning check before the turn can complete.
    NeedsMeaning(PendingWord),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnOutcome {
    pub success: bool,
    pub message: &'static str,
}

impl GameState {
    pub fn start(&mut self) {
        *self = GameState::new(self.rules.clone(), true);
        info!(
            "Game started. {} players, {:?} to move.",
            self.players.len(),
            self.current_player
        );
    }

    pub fn reset(&mut self) {
        *self = GameState::new(self.rules.clone(), false);
        debug!("Game reset to lobby.");
    }

    pub fn submit_word(
        &mut self,
        word: &str,
        player_id: PlayerId,
    ) -> Result<SubmitOutcome, TurnError> {
        self.ensure_turn(player_id)?;

        let word = normalize(word);
        let violations = validate_structure(&word, self);

        if !violations.is_empty() {
            debug!(
                "Word '{}' from player {} rejected: {:?}",
                word, player_id, violations
            );
            self.pending = None;
            self.penalize(player_id);
            self.finish_turn();
            return Ok(SubmitOutcome::Rejected { violations });
        }

        let ticket = PendingWord {
            id: Uuid::new_v4(),
            word,
            player_id,
            turn: self.turn,
        };
        debug!(
            "Word '{}' from player {} awaits meaning check (ticket {}).",
            ticket.word, player_id, ticket.id
        );
        self.pending = Some(ticket.clone());

        Ok(SubmitOutcome::NeedsMeaning(ticket))
    }

    pub fn confirm_word(
        &mut self,
        ticket: &PendingWord,
        is_valid_meaning: bool,
    ) -> Result<TurnOutcome, TurnError> {
        self.ensure_turn(ticket.player_id)?;

        if self.pending.as_ref() != Some(ticket) {
            debug!("Confirmation rejected: ticket {} is not pending.", ticket.id);
            return Err(TurnError::StaleTicket);
        }
        self.pending = None;

        let message = if is_valid_meaning {
            if let Some(player) = self.player_mut(ticket.player_id) {
                player.score = player.score.saturating_add(1);
            }
            self.used_words.push(ticket.word.clone());
            self.last_word = ticket.word.clone();
            info!("Player {} played '{}'.", ticket.player_id, ticket.word);
            WORD_ACCEPTED_MESSAGE
        } else {
            self.penalize(ticket.player_id);
            debug!(
                "Word '{}' from player {} has no meaning.",
                ticket.word, ticket.player_id
            );
            INVALID_MEANING_MESSAGE
        };

        self.finish_turn();

        Ok(TurnOutcome {
            success: is_valid_meaning,
            message,
        })
    }

    pub fn timeout(&mut self, player_id: PlayerId) -> Result<TurnOutcome, TurnError> {
        self.ensure_turn(player_id)?;

        self.pending = None;
        self.penalize(player_id);
        debug!("Player {} ran out of time.", player_id);
        self.finish_turn();

        Ok(TurnOutcome {
            success: false,
            message: TIMEOUT_MESSAGE,
        })
    }

    fn ensure_turn(&self, player_id: PlayerId) -> Result<(), TurnError> {
        if !self.is_in_progress() {
            debug!("Turn rejected: game is not in progress.");
            return Err(TurnError::GameNotInProgress);
        }
        if self.player(player_id).is_none() {
            debug!("Turn rejected: no player {}.", player_id);
            return Err(TurnError::UnknownPlayer(player_id));
        }
        if self.current_player != player_id {
            debug!("Turn rejected: not player {}'s turn.", player_id);
            return Err(TurnError::NotYourTurn(player_id));
        }
        Ok(())
    }

    fn penalize(&mut self, player_id: PlayerId) {
        if let Some(player) = self.player_mut(player_id) {
            player.score = player.score.saturating_sub(1);
        }
    }

    fn finish_turn(&mut self) {
        self.turn += 1;

        if let Some(winner) = self.check_winner() {
            self.game_over = true;
            self.winner = Some(winner);
            info!("Game over: player {} wins.", winner);
            return;
        }

        self.current_player = self.next_player_id(self.current_player);
        debug!("Turn switched: now player {}'s turn.", self.current_player);
    }

    fn check_winner(&self) -> Option<PlayerId> {
        let target = self.rules.target_score?;
        self.players
            .iter()
            .find(|p| p.score >= target)
            .map(|p| p.id)
    }
}
