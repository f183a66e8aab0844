//! One sync run: fetch, price and hand every location to the output.

use anyhow::Context;

use crate::app::App;
use crate::output::{Output, StoreOutcome};

/// Counters logged at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub fetched: usize,
    pub stored: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Execute a single run against `output`.
///
/// Opening the output and fetching the location list are fatal. Failures
/// while storing an individual location are logged and counted instead. The
/// output is closed whether or not the fetch succeeded; a failing close is
/// logged.
///
/// # Errors
///
/// Returns an error if the output cannot be opened or the fetch fails.
pub(crate) async fn run_once(app: &App, output: &mut Output) -> anyhow::Result<RunSummary> {
    tracing::info!(output = output.name(), "using output");
    output
        .open()
        .await
        .with_context(|| format!("failed to open output {}", output.name()))?;

    let result = store_all(app, output).await;
    if let Err(e) = output.close().await {
        tracing::warn!(output = output.name(), error = %format!("{e:#}"), "failed to close output");
    }
    let summary = result?;

    tracing::info!(
        fetched = summary.fetched,
        stored = summary.stored,
        skipped = summary.skipped,
        failed = summary.failed,
        "run complete"
    );
    Ok(summary)
}

async fn store_all(app: &App, output: &mut Output) -> anyhow::Result<RunSummary> {
    let config = &app.config;
    tracing::info!(
        countries = ?config.countries,
        types = ?config.location_types.iter().map(|t| t.as_str()).collect::<Vec<_>>(),
        "updating locations"
    );

    for country in &config.countries {
        match app.prices.lookup(country) {
            Some(price) => tracing::info!(
                country = %country,
                cost_per_unit = price.cost_per_unit,
                currency = %price.currency,
                converted_cost_per_unit = price.converted_cost_per_unit,
                display_currency = %app.prices.display_currency(),
                billing_type = %price.billing_type,
                session_fee = price.session_fee,
                "found price"
            ),
            None => tracing::warn!(
                country = %country,
                "no price configured; locations will be stored with zero cost"
            ),
        }
    }

    let locations = app
        .client
        .countries(&config.countries, &config.location_types)
        .await
        .context("failed to fetch locations")?;

    let mut summary = RunSummary {
        fetched: locations.len(),
        ..RunSummary::default()
    };

    for location in &locations {
        let price = app.prices.price_or_zero(&location.country);
        match output.store(location, &price).await {
            Ok(StoreOutcome::Stored) => summary.stored += 1,
            Ok(StoreOutcome::Skipped) => summary.skipped += 1,
            Err(e) => {
                tracing::error!(
                    nid = %location.nid,
                    title = %location.title,
                    error = %format!("{e:#}"),
                    "failed to store location"
                );
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
