//! Development server.
//!
//! Wires the lifecycle core to in-memory stores and console
//! collaborators, runs the withdrawal processor in the background, and
//! serves the HTTP surface.

use std::sync::Arc;

use backoffice_core::providers::{ConsoleEmailProvider, ConsolePaymentProvider};
use backoffice_core::stores::{MemoryAccountStore, MemoryRequestStore, MemoryWithdrawalStore};
use backoffice_core::{CredentialPolicy, Environment, WithdrawalConfig};
use backoffice_web::{app_router, AppState};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let env = Environment::new(
        MemoryRequestStore::new(),
        MemoryAccountStore::new(),
        MemoryWithdrawalStore::new(),
        ConsoleEmailProvider::new(),
        ConsolePaymentProvider::new(),
        WithdrawalConfig::default(),
        CredentialPolicy::default(),
    );

    // One processor instance shared between the background loop and the
    // manual tick endpoint, so ticks never overlap.
    let processor = env.withdrawal_processor();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let processor_task = {
        let processor = processor.clone();
        tokio::spawn(async move { processor.run(shutdown_rx).await })
    };

    let state = Arc::new(AppState::new(&env, processor));
    let app = app_router(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "backoffice server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    info!("http server stopped; stopping withdrawal processor");
    let _ = shutdown_tx.send(true);
    processor_task.await?;

    Ok(())
}
