//! Fixed-width table of locations written to stdout (or any writer).

use std::io::Write;

use locsync_core::{Location, PriceInfo};

use super::StoreOutcome;

pub(crate) struct ConsoleOutput {
    writer: Box<dyn Write + Send>,
}

impl ConsoleOutput {
    pub(crate) fn stdout() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    pub(crate) fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self { writer }
    }

    pub(crate) fn open(&mut self) {
        self.write_line(&header());
    }

    /// Never fails: a broken stdout is logged and the run carries on.
    pub(crate) fn store(&mut self, location: &Location, price: &PriceInfo) -> StoreOutcome {
        self.write_line(&row(location, price));
        StoreOutcome::Stored
    }

    pub(crate) fn close(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.writer, "{line}") {
            tracing::warn!(error = %e, "failed to write console output");
        }
    }
}

pub(crate) fn header() -> String {
    format!(
        "{:<40} {:<15} {:<10} {:<15} {:<15} {:<10} {:>10}",
        "Title", "City", "Country", "Latitude", "Longitude", "Cost", "Unit"
    )
}

pub(crate) fn row(location: &Location, price: &PriceInfo) -> String {
    format!(
        "{:<40} {:<15} {:<10} {:<15} {:<15} {:<10.4} {:>10}",
        location.title,
        location.city,
        location.country,
        location.latitude,
        location.longitude,
        price.converted_cost_per_unit,
        price.billing_type,
    )
}
