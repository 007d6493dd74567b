//! State updates pushed over the WebSocket.

use futures_util::{SinkExt, Stream, StreamExt};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use word_chain_server::app_state::AppState;
use word_chain_server::dictionary::StaticDictionary;
use word_chain_server::game::GameRules;
use word_chain_server::routes;

async fn spawn_server() -> String {
    spawn_server_with_state().await.0
}

async fn spawn_server_with_state() -> (String, Arc<AppState>) {
    let dictionary = StaticDictionary::new([("plane", "A flat surface")]);
    let (tx, _) = broadcast::channel(16);
    let state = Arc::new(AppState::new(tx, Arc::new(dictionary), GameRules::default()));
    let app = routes::router(Arc::clone(&state));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr.to_string(), state)
}

async fn next_json<S>(stream: &mut S) -> Value
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await
            .expect("timed out waiting for update")
            .expect("socket closed")
            .unwrap();
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

#[tokio::test]
async fn test_subscriber_receives_updates() {
    let addr = spawn_server().await;
    let (mut socket, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();

    socket
        .send(Message::Text(
            json!({ "type": "SUBSCRIBE", "gameId": "default" })
                .to_string()
                .into(),
        ))
        .await
        .unwrap();

    let snapshot = next_json(&mut socket).await;
    assert_eq!(snapshot["type"], "UPDATE_STATE");
    assert_eq!(snapshot["gameState"]["gameStarted"], false);

    let client = reqwest::Client::new();
    client
        .post(format!("http://{addr}/api/game/start"))
        .send()
        .await
        .unwrap();
    let started = next_json(&mut socket).await;
    assert_eq!(started["gameId"], "default");
    assert_eq!(started["gameState"]["gameStarted"], true);

    client
        .post(format!("http://{addr}/api/game/play-word"))
        .json(&json!({ "word": "plane", "playerId": 1 }))
        .send()
        .await
        .unwrap();
    let played = next_json(&mut socket).await;
    assert_eq!(played["gameState"]["lastWord"], "plane");
    assert_eq!(played["gameState"]["currentPlayer"], 2);
}

#[tokio::test]
async fn test_other_games_not_forwarded() {
    let addr = spawn_server().await;
    let (mut socket, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();

    socket
        .send(Message::Text(
            json!({ "type": "SUBSCRIBE", "gameId": "lounge" })
                .to_string()
                .into(),
        ))
        .await
        .unwrap();
    next_json(&mut socket).await;

    let client = reqwest::Client::new();
    client
        .post(format!("http://{addr}/api/game/start"))
        .send()
        .await
        .unwrap();
    client
        .post(format!("http://{addr}/api/game/start?gameId=lounge"))
        .send()
        .await
        .unwrap();

    let update = next_json(&mut socket).await;
    assert_eq!(update["gameId"], "lounge");
}

#[tokio::test]
async fn test_dropped_client_releases_subscription() {
    let (addr, state) = spawn_server_with_state().await;
    let (mut socket, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();

    socket
        .send(Message::Text(
            json!({ "type": "SUBSCRIBE", "gameId": "quiet" })
                .to_string()
                .into(),
        ))
        .await
        .unwrap();
    next_json(&mut socket).await;
    assert_eq!(state.tx.receiver_count(), 1);

    // Gone without a close frame, and nothing is published for "quiet".
    drop(socket);

    tokio::time::timeout(Duration::from_secs(5), async {
        while state.tx.receiver_count() > 0 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("socket task kept its subscription");
    assert!(state.games.read().await.is_empty());
}
