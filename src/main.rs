use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use time::OffsetDateTime;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use bbc_casino::auth::session::SessionManager;
use bbc_casino::config::Config;
use bbc_casino::http::{self, AppState};
use bbc_casino::store::Store;
use bbc_casino::telemetry;

const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init()?;
    let config = Config::from_env()?;

    let store = Arc::new(Store::new());
    if config.seed_demo {
        let seeding = Arc::clone(&store);
        tokio::task::spawn_blocking(move || seeding.seed_demo_accounts())
            .await?
            .context("seeding demo accounts")?;
    }

    let state = AppState::new(store, &config);
    let shutdown = CancellationToken::new();
    let pruner = tokio::spawn(prune_sessions(Arc::clone(&state.sessions), shutdown.clone()));

    let app = http::router(state, &config);
    let listener = TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, static_dir = %config.static_dir.display(), "listening");

    let token = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("shutting down"),
                _ = token.cancelled() => {}
            }
        })
        .await?;

    shutdown.cancel();
    pruner.await?;
    Ok(())
}

async fn prune_sessions(sessions: Arc<SessionManager>, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval(PRUNE_INTERVAL);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                let pruned = sessions.prune_expired(OffsetDateTime::now_utc());
                if pruned > 0 {
                    debug!(pruned, live = sessions.len(), "pruned expired sessions");
                }
            }
        }
    }
}
