//! The Free Dictionary client against a local stand-in server.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use word_chain_server::app_state::{AppState, DEFAULT_GAME_ID};
use word_chain_server::dictionary::{Dictionary, FreeDictionaryClient, WordLookup};
use word_chain_server::game::GameRules;
use word_chain_server::session::play_word;

async fn entry(Path(word): Path<String>) -> impl IntoResponse {
    match word.as_str() {
        "plane" => (
            StatusCode::OK,
            Json(json!([{
                "word": "plane",
                "meanings": [{
                    "partOfSpeech": "noun",
                    "definitions": [
                        { "definition": "A flat surface" },
                        { "definition": "An aeroplane" }
                    ]
                }]
            }])),
        ),
        "bare" => (StatusCode::OK, Json(json!([{ "word": "bare" }]))),
        "garbled" => (StatusCode::OK, Json(json!({ "unexpected": true }))),
        "broken" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "boom" })),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "title": "No Definitions Found" })),
        ),
    }
}

async fn spawn_fake_dictionary() -> String {
    let app = Router::new().route("/api/v2/entries/en/{word}", get(entry));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> FreeDictionaryClient {
    FreeDictionaryClient::new(base_url, Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_first_definition_is_used() {
    let dictionary = client(&spawn_fake_dictionary().await);
    assert_eq!(
        dictionary.lookup("plane").await,
        WordLookup::found("A flat surface")
    );
}

#[tokio::test]
async fn test_entry_without_definitions_is_still_valid() {
    let dictionary = client(&spawn_fake_dictionary().await);
    assert_eq!(
        dictionary.lookup("bare").await,
        WordLookup::found("Valid English word")
    );
}

#[tokio::test]
async fn test_unknown_word() {
    let dictionary = client(&spawn_fake_dictionary().await);
    assert_eq!(
        dictionary.lookup("plxne").await,
        WordLookup::rejected("Word not found in dictionary")
    );
}

#[tokio::test]
async fn test_service_failures_count_as_invalid() {
    let dictionary = client(&spawn_fake_dictionary().await);
    assert!(!dictionary.lookup("broken").await.is_valid);
    assert!(!dictionary.lookup("garbled").await.is_valid);

    // Nothing listens on the discard port.
    let unreachable = client("http://127.0.0.1:9");
    let lookup = unreachable.lookup("plane").await;
    assert!(!lookup.is_valid);
    assert_eq!(lookup.meaning, None);
}

#[tokio::test]
async fn test_unreachable_dictionary_still_completes_turn() {
    let (tx, _) = broadcast::channel(16);
    let app = AppState::new(
        tx,
        Arc::new(client("http://127.0.0.1:9")),
        GameRules::default(),
    );
    app.session(DEFAULT_GAME_ID).await.lock().await.state.start();

    let outcome = play_word(&app, DEFAULT_GAME_ID, "plane", 1).await.unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.game_state.current_player, 2);
    assert!(outcome.game_state.used_words.is_empty());
    assert_eq!(outcome.game_state.turn, 1);
}

#[tokio::test]
async fn test_word_is_looked_up_whole() {
    let dictionary = client(&spawn_fake_dictionary().await);

    for word in ["plane#x", "plane?x", "zzzz/../plane"] {
        let lookup = dictionary.lookup(word).await;
        assert!(!lookup.is_valid, "{word} matched another entry");
        assert_eq!(lookup.message.as_deref(), Some("Word not found in dictionary"));
    }
}

#[tokio::test]
async fn test_made_up_word_scores_nothing() {
    let (tx, _) = broadcast::channel(16);
    let app = AppState::new(
        tx,
        Arc::new(client(&spawn_fake_dictionary().await)),
        GameRules::default(),
    );
    app.session(DEFAULT_GAME_ID).await.lock().await.state.start();

    let outcome = play_word(&app, DEFAULT_GAME_ID, "plane#xyzq", 1).await.unwrap();

    assert!(!outcome.success);
    assert!(outcome.game_state.used_words.is_empty());
    assert_eq!(outcome.game_state.last_word, "");
    assert_eq!(outcome.game_state.score_of(1), Some(0));
}
