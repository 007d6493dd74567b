//! Meaning checks for words that already passed the structure rules.
//!
//! A lookup never fails from the caller's point of view: network trouble,
//! odd responses and unknown words all come back as an invalid word, so a
//! turn can always be completed.

use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev";
const FALLBACK_MEANING: &str = "Valid English word";
const NOT_FOUND_MESSAGE: &str = "Word not found in dictionary";
const UNAVAILABLE_MESSAGE: &str = "Dictionary service unavailable";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordLookup {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WordLookup {
    pub fn found(meaning: impl Into<String>) -> Self {
        WordLookup {
            is_valid: true,
            meaning: Some(meaning.into()),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        WordLookup {
            is_valid: false,
            meaning: None,
            message: Some(message.into()),
        }
    }
}

#[async_trait]
pub trait Dictionary: Send + Sync {
    /// Looks up a lowercase word.
    async fn lookup(&self, word: &str) -> WordLookup;
}

/// Client for the Free Dictionary API (`/api/v2/entries/en/{word}`).
#[derive(Debug, Clone)]
pub struct FreeDictionaryClient {
    base_url: reqwest::Url,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    definition: String,
}

impl FreeDictionaryClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = reqwest::Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid dictionary URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            bail!("Dictionary URL cannot take a path: {base_url}");
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(FreeDictionaryClient { base_url, client })
    }

    /// The word always lands in a single, percent-encoded path segment.
    fn entry_url(&self, word: &str) -> reqwest::Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "v2", "entries", "en"])
                .push(word);
        }
        url
    }
}

#[async_trait]
impl Dictionary for FreeDictionaryClient {
    async fn lookup(&self, word: &str) -> WordLookup {
        let url = self.entry_url(word);
        debug!("Looking up '{}' at {}", word, url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Dictionary request for '{}' failed: {}", word, e);
                return WordLookup::rejected(UNAVAILABLE_MESSAGE);
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return WordLookup::rejected(NOT_FOUND_MESSAGE);
        }
        if !status.is_success() {
            warn!("Dictionary answered {} for '{}'", status, word);
            return WordLookup::rejected(UNAVAILABLE_MESSAGE);
        }

        match response.json::<Vec<Entry>>().await {
            Ok(entries) => {
                let meaning = entries
                    .into_iter()
                    .next()
                    .and_then(|entry| entry.meanings.into_iter().next())
                    .and_then(|meaning| meaning.definitions.into_iter().next())
                    .map(|d| d.definition)
                    .unwrap_or_else(|| FALLBACK_MEANING.to_string());
                WordLookup::found(meaning)
            }
            Err(e) => {
                warn!("Unreadable dictionary entry for '{}': {}", word, e);
                WordLookup::rejected(UNAVAILABLE_MESSAGE)
            }
        }
    }
}

/// Fixed word list, for offline play and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticDictionary {
    words: HashMap<String, String>,
}

impl StaticDictionary {
    pub fn new<I, W, M>(entries: I) -> Self
    where
        I: IntoIterator<Item = (W, M)>,
        W: Into<String>,
        M: Into<String>,
    {
        StaticDictionary {
            words: entries
                .into_iter()
                .map(|(word, meaning)| (word.into().to_lowercase(), meaning.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl Dictionary for StaticDictionary {
    async fn lookup(&self, word: &str) -> WordLookup {
        match self.words.get(&word.to_lowercase()) {
            Some(meaning) => WordLookup::found(meaning.clone()),
            None => WordLookup::rejected(NOT_FOUND_MESSAGE),
        }
    }
}
