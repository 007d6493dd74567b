use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use word_chain_server::app_state::AppState;
use word_chain_server::cleanup::cleanup_inactive_games;
use word_chain_server::config::Config;
use word_chain_server::dictionary::FreeDictionaryClient;
use word_chain_server::routes;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    info!("Loaded configuration: {:?}", config);

    let dictionary = FreeDictionaryClient::new(&config.dictionary_url, config.dictionary_timeout)
        .context("Failed to build dictionary client")?;

    let (tx, _) = broadcast::channel(500);
    let app_state = Arc::new(AppState::new(
        tx,
        Arc::new(dictionary),
        config.rules.clone(),
    ));

    let app = routes::router(Arc::clone(&app_state));

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", config.host, config.port))?;

    info!("Server is running on {}", listener.local_addr()?);

    tokio::spawn(cleanup_inactive_games(Arc::clone(&app_state)));
    if let Err(e) = axum::serve(listener, app).await {
        error!("❌ Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
