use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::dictionary::DEFAULT_DICTIONARY_URL;
use crate::game::models::GameRules;

/// Server settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub dictionary_url: String,
    pub dictionary_timeout: Duration,
    pub rules: GameRules,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = GameRules::default();

        let player_names = match get("PLAYER_NAMES") {
            Some(names) => names
                .split(',')
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
            None => defaults.player_names,
        };
        if player_names.len() < 2 {
            bail!("PLAYER_NAMES needs at least two names");
        }

        let target_score = parsed::<u32>(get("TARGET_SCORE"), "TARGET_SCORE")?;
        if target_score == Some(0) {
            bail!("TARGET_SCORE must be positive");
        }

        let min_word_len =
            parsed::<usize>(get("MIN_WORD_LEN"), "MIN_WORD_LEN")?.unwrap_or(defaults.min_word_len);
        let timeout_secs =
            parsed::<u64>(get("DICTIONARY_TIMEOUT_SECS"), "DICTIONARY_TIMEOUT_SECS")?.unwrap_or(5);

        Ok(Config {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed::<u16>(get("PORT"), "PORT")?.unwrap_or(3000),
            dictionary_url: get("DICTIONARY_URL")
                .unwrap_or_else(|| DEFAULT_DICTIONARY_URL.to_string()),
            dictionary_timeout: Duration::from_secs(timeout_secs),
            rules: GameRules {
                player_names,
                min_word_len,
                target_score,
            },
        })
    }
}

fn parsed<T>(value: Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .map(|v| v.parse::<T>().with_context(|| format!("invalid {key}: {v:?}")))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.dictionary_url, DEFAULT_DICTIONARY_URL);
        assert_eq!(config.dictionary_timeout, Duration::from_secs(5));
        assert_eq!(config.rules, GameRules::default());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "8080"),
            ("PLAYER_NAMES", "Ada, Grace ,Linus"),
            ("TARGET_SCORE", "10"),
            ("MIN_WORD_LEN", "5"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rules.player_names, vec!["Ada", "Grace", "Linus"]);
        assert_eq!(config.rules.target_score, Some(10));
        assert_eq!(config.rules.min_word_len, 5);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("PLAYER_NAMES", "Solo")]).is_err());
        assert!(config(&[("TARGET_SCORE", "0")]).is_err());
    }
}
