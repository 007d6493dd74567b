use crate::app_state::AppState;

use std::{sync::Arc, time::Duration};
use tracing::info;

pub const IDLE_LIMIT: Duration = Duration::from_secs(1200);
const SWEEP_INTERVAL: Duration = Duration::from_secs(600);

pub async fn cleanup_inactive_games(app_state: Arc<AppState>) {
    loop {
        tokio::time::sleep(SWEEP_INTERVAL).await;
        remove_idle_games(&app_state, IDLE_LIMIT).await;
    }
}

/// Drops sessions idle for `idle_limit` and returns how many remain.
/// Sessions locked by an in-flight request are kept.
pub async fn remove_idle_games(app_state: &AppState, idle_limit: Duration) -> usize {
    let mut games = app_state.games.write().await;
    let before_cleanup = games.len();

    games.retain(|_, session| match session.try_lock() {
        Ok(session) => session.is_active(idle_limit),
        Err(_) => true,
    });

    if before_cleanup != games.len() {
        info!("Cleaned up inactive games. Remaining: {}", games.len());
    }
    games.len()
}
