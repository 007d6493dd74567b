pub mod engine;
pub mod handlers;
pub mod message;
pub mod models;
pub mod validator;

pub use engine::{SubmitOutcome, TurnOutcome};
pub use models::{GameRules, GameState, PendingWord, Phase, Player, PlayerId};
pub use validator::{validate_structure, Violation};
