use serde::{Serialize, Serializer};
use std::fmt;

use super::models::GameState;

/// A broken word rule. Several can apply to the same candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    TooShort { min: usize },
    WrongStart { required: char },
    AlreadyUsed,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TooShort { min } => write!(f, "Word must be at least {min} letters long"),
            Violation::WrongStart { required } => {
                write!(f, "Word must start with '{}'", required.to_uppercase())
            }
            Violation::AlreadyUsed => write!(f, "Word has already been used"),
        }
    }
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Case-folds and trims a submitted word.
pub fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Checks length, chain start and uniqueness, reporting every rule the word
/// breaks. Does not look at whose turn it is.
pub fn validate_structure(word: &str, state: &GameState) -> Vec<Violation> {
    let word = normalize(word);
    let mut violations = Vec::new();

    let min = state.rules.min_word_len;
    if word.chars().count() < min {
        violations.push(Violation::TooShort { min });
    }

    if let Some(required) = state.last_word.chars().last() {
        if word.chars().next() != Some(required) {
            violations.push(Violation::WrongStart { required });
        }
    }

    if state.used_words.iter().any(|used| *used == word) {
        violations.push(Violation::AlreadyUsed);
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_after(words: &[&str]) -> GameState {
        let mut state = GameState::default();
        state.game_started = true;
        state.used_words = words.iter().map(|w| w.to_string()).collect();
        state.last_word = words.last().map(|w| w.to_string()).unwrap_or_default();
        state
    }

    #[test]
    fn test_first_word_only_needs_length() {
        let state = state_after(&[]);
        assert!(validate_structure("plane", &state).is_empty());
        assert_eq!(
            validate_structure("bat", &state),
            vec![Violation::TooShort { min: 4 }]
        );
    }

    #[test]
    fn test_chain_start_is_case_insensitive() {
        let state = state_after(&["tiger"]);
        assert!(validate_structure("Rhino", &state).is_empty());
        assert_eq!(
            validate_structure("snake", &state),
            vec![Violation::WrongStart { required: 'r' }]
        );
    }

    #[test]
    fn test_reuse_detected_regardless_of_case() {
        let state = state_after(&["plane", "eagle"]);
        assert!(validate_structure("EAGLE", &state).contains(&Violation::AlreadyUsed));
    }

    #[test]
    fn test_reports_every_violation() {
        let state = state_after(&["tree", "eat"]);
        let violations = validate_structure("eat", &state);
        assert_eq!(
            violations,
            vec![
                Violation::TooShort { min: 4 },
                Violation::WrongStart { required: 't' },
                Violation::AlreadyUsed,
            ]
        );
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        let state = state_after(&[]);
        assert!(validate_structure("  plane \n", &state).is_empty());
        assert_eq!(
            validate_structure("   ", &state),
            vec![Violation::TooShort { min: 4 }]
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            Violation::TooShort { min: 4 }.to_string(),
            "Word must be at least 4 letters long"
        );
        assert_eq!(
            Violation::WrongStart { required: 'r' }.to_string(),
            "Word must start with 'R'"
        );
        assert_eq!(
            serde_json::to_value(Violation::AlreadyUsed).unwrap(),
            serde_json::json!("Word has already been used")
        );
    }
}
