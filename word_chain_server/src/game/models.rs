use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PlayerId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}

/// Settings fixed for the lifetime of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRules {
    /// Seating order. Ids are assigned from 1 in this order.
    pub player_names: Vec<String>,
    pub min_word_len: usize,
    /// First player to reach this score wins. `None` keeps the game running
    /// until it is reset.
    pub target_score: Option<u32>,
}

impl Default for GameRules {
    fn default() -> Self {
        GameRules {
            player_names: vec!["Player 1".to_string(), "Player 2".to_string()],
            min_word_len: 4,
            target_score: None,
        }
    }
}

/// Confirmation ticket handed out when a word passes the structure rules.
///
/// The turn only completes once the same ticket is presented back together
/// with the meaning verdict. A ticket is bound to the turn it was issued in,
/// so it goes stale as soon as that turn ends some other way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingWord {
    pub id: Uuid,
    pub word: String,
    pub player_id: PlayerId,
    pub turn: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    InProgress,
    Over,
}

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
    /// Completed turns since the game started.
    pub turn: u64,
    pub rules: GameRules,
    #[serde(skip)]
    pub pending: Option<PendingWord>,
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new(GameRules::default(), false)
    }
}

impl GameState {
    pub fn new(rules: GameRules, started: bool) -> Self {
        let players: Vec<Player> = rules
            .player_names
            .iter()
            .enumerate()
            .map(|(seat, name)| Player {
                id: seat as PlayerId + 1,
                name: name.clone(),
                score: 0,
            })
            .collect();
        let current_player = players.first().map(|p| p.id).unwrap_or(1);

        GameState {
            players,
            current_player,
            used_words: Vec::new(),
            last_word: String::new(),
            game_started: started,
            game_over: false,
            winner: None,
            turn: 0,
            rules,
            pending: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match (self.game_started, self.game_over) {
            (_, true) => Phase::Over,
            (true, false) => Phase::InProgress,
            (false, false) => Phase::NotStarted,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.phase() == Phase::InProgress
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn score_of(&self, id: PlayerId) -> Option<u32> {
        self.player(id).map(|p| p.score)
    }

    /// Next player in seating order after `id`, wrapping around.
    pub fn next_player_id(&self, id: PlayerId) -> PlayerId {
        match self.players.iter().position(|p| p.id == id) {
            Some(seat) => self.players[(seat + 1) % self.players.len()].id,
            None => self.players.first().map(|p| p.id).unwrap_or(id),
        }
    }
}
