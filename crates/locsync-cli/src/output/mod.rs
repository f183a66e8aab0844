//! Where fetched locations end up: the console or TeslaMate's geofences.

mod console;
mod database;

use anyhow::Context;
use locsync_core::{AppConfig, Location, OutputKind, PriceInfo};

pub(crate) use console::ConsoleOutput;
pub(crate) use database::DatabaseOutput;

#[cfg(test)]
pub(crate) use console::{header, row};
#[cfg(test)]
pub(crate) use database::geofence_for;

/// Result of handing one location to an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StoreOutcome {
    Stored,
    /// Deliberately not written, e.g. a site that is not open yet.
    Skipped,
}

/// A sink for one run. Opened once, fed every location, then closed.
pub(crate) enum Output {
    Console(ConsoleOutput),
    Database(DatabaseOutput),
}

impl Output {
    pub(crate) fn from_config(config: &AppConfig) -> Self {
        match config.output {
            OutputKind::Console => Output::Console(ConsoleOutput::stdout()),
            OutputKind::TeslamateDatabase => Output::Database(DatabaseOutput::new(config.radius)),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Output::Console(_) => "Console",
            Output::Database(_) => "TeslamateDatabase",
        }
    }

    /// # Errors
    ///
    /// Fails when the database output cannot connect; the run must not start.
    pub(crate) async fn open(&mut self) -> anyhow::Result<()> {
        match self {
            Output::Console(console) => {
                console.open();
                Ok(())
            }
            Output::Database(database) => database.open().await,
        }
    }

    /// # Errors
    ///
    /// Per-location failures; callers log them and move on.
    pub(crate) async fn store(
        &mut self,
        location: &Location,
        price: &PriceInfo,
    ) -> anyhow::Result<StoreOutcome> {
        match self {
            Output::Console(console) => Ok(console.store(location, price)),
            Output::Database(database) => database.store(location, price).await,
        }
    }

    /// # Errors
    ///
    /// Fails when buffered console output cannot be flushed.
    pub(crate) async fn close(&mut self) -> anyhow::Result<()> {
        match self {
            Output::Console(console) => console
                .close()
                .context("failed to flush console output"),
            Output::Database(database) => database.close().await,
        }
    }
}
