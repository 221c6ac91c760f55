//! Settlement risk service.
//!
//! Loads configuration, starts the periodic evaluation loop and serves the
//! REST API until SIGINT or SIGTERM.

use anyhow::{Context, Result};
use settlement_risk::api::rest::{AppState, create_router};
use settlement_risk::application::services::{Notifier, RiskEngine, run_evaluation_loop};
use settlement_risk::config::AppConfig;
use settlement_risk::infrastructure::notifications::{LogNotifier, SmtpNotifier};
use settlement_risk::infrastructure::persistence::InMemoryTradeStore;
use settlement_risk::infrastructure::telemetry::init_tracing;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging).context("failed to initialize tracing")?;

    info!(
        parameters = %config.risk.name,
        interval_secs = config.evaluation.interval_secs,
        "Starting settlement risk service"
    );

    let notifier: Arc<dyn Notifier> = match &config.smtp {
        Some(smtp) => {
            info!(relay = %smtp.host, port = smtp.port, "Alerts delivered by email");
            Arc::new(SmtpNotifier::new(smtp).context("failed to configure SMTP notifier")?)
        }
        None => {
            warn!("No SMTP relay configured, alerts will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let engine = Arc::new(
        RiskEngine::from_config(&config, Arc::new(InMemoryTradeStore::new()), notifier)
            .context("failed to build risk engine")?,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let evaluation = tokio::spawn(run_evaluation_loop(
        Arc::clone(&engine),
        config.evaluation.interval(),
        shutdown_rx,
    ));

    let app = create_router(Arc::new(AppState::new(engine)));
    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = wait_for_shutdown().await {
                warn!(error = %e, "Signal handler failed, shutting down");
            }
        })
        .await?;

    info!("Requesting shutdown...");
    let _ = shutdown_tx.send(true);
    evaluation.await.context("evaluation loop panicked")?;

    info!("Shutdown complete");
    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C");
    }

    Ok(())
}
