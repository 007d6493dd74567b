mod game_app;
mod game_service;

use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use game_app::GameApp;
use game_service::GameService;

/// Desktop client for the word chain server.
#[derive(Parser, Debug)]
#[command(name = "word_chain_client", version)]
struct Args {
    /// Base URL of the game server.
    #[arg(long, default_value = "http://localhost:3000")]
    server_url: String,

    /// Game to join.
    #[arg(long, default_value = "default")]
    game_id: String,

    /// Seconds each player gets per turn.
    #[arg(long, default_value_t = 30)]
    turn_seconds: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    info!("Connecting to {} (game {})", args.server_url, args.game_id);

    let service = Arc::new(GameService::new(args.server_url, args.game_id));
    let app = GameApp::new(service, Duration::from_secs(args.turn_seconds));

    eframe::run_native(
        "Word Chain",
        eframe::NativeOptions::default(),
        Box::new(move |cc| {
            app.connect(cc.egui_ctx.clone());
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow!("UI error: {e}"))
}
