//! # Evaluation Loop
//!
//! Background task running [`RiskEngine::run_cycle`] on a fixed interval.

use crate::application::services::risk_engine::RiskEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};

/// Runs evaluation cycles every `period` until `shutdown` turns `true` or
/// its sender is dropped.
///
/// The first cycle runs immediately. A failing cycle is logged and the loop
/// carries on with the next tick.
pub async fn run_evaluation_loop(
    engine: Arc<RiskEngine>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(
        interval_ms = period.as_millis(),
        "risk evaluation loop started"
    );

    let mut cycles: u64 = 0;
    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            _ = ticker.tick() => {
                cycles = cycles.saturating_add(1);
                if let Err(e) = engine.run_cycle().await {
                    tracing::error!(error = %e, cycle = cycles, "risk evaluation cycle failed");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    tracing::debug!("shutdown sender dropped");
                    break;
                }
            }
        }
    }

    tracing::info!(cycles, "risk evaluation loop stopped");
}
