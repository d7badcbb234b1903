//! Punchup HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use punchup::arena::Arena;
use punchup::catalog::Catalog;
use punchup::config::Config;
use punchup::gateway::{AppState, create_router_with_state};
use punchup::store::RatingStore;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        data_dir = %config.data_dir.display(),
        lock_mode = ?config.lock_mode,
        "Punchup starting"
    );

    let catalog = Arc::new(Catalog::load(&config.models_path(), &config.jokes_path())?);
    if catalog.index().is_empty() {
        anyhow::bail!("no joke category has two or more models; nothing to pair");
    }

    let store = Arc::new(RatingStore::new(
        config.state_path(),
        catalog.models().to_vec(),
        config.lock_mode,
    ));

    // Touch the state once so startup fails loudly on a broken document
    // instead of every request failing later.
    let state = store.read()?;
    tracing::info!(
        models = state.ratings.len(),
        total_votes = state.total_votes,
        "rating state loaded"
    );

    let arena = Arc::new(Arena::new(catalog, store));
    let app = create_router_with_state(AppState::new(arena));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Punchup shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
