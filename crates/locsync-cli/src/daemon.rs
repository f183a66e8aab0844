//! Repeats runs on a fixed interval until the process is told to stop.

use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::app::App;
use crate::output::Output;
use crate::run::run_once;

pub(crate) fn interval_from_minutes(minutes: u64) -> Duration {
    Duration::from_secs(minutes.saturating_mul(60))
}

/// Run every `interval` after the initial run has already happened.
///
/// Runs never overlap: a slow run delays the next tick rather than queueing
/// extra ones. Any failed run ends the loop with its error. Ctrl-C or SIGTERM
/// ends it cleanly once the current run has finished.
///
/// # Errors
///
/// Returns the error of the first run that fails.
pub(crate) async fn run(app: &App, interval: Duration) -> anyhow::Result<()> {
    tracing::info!(interval_secs = interval.as_secs(), "running as daemon");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately and stands for the initial run.
    ticker.tick().await;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = &mut shutdown => {
                tracing::info!("shutdown requested; stopping daemon");
                return Ok(());
            }
        }

        let mut output = Output::from_config(&app.config);
        run_once(app, &mut output).await?;
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
