//! Exchange-rate table and currency conversion.
//!
//! Rates are stored relative to a single base currency, so converting
//! between two non-base currencies always goes through the base.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    #[error("currency {currency} is not available in the exchange rates")]
    Unavailable { currency: String },
}

/// Currency rates relative to `base`, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExchangeRateTable {
    pub base: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(alias = "Rates")]
    pub rates: HashMap<String, f64>,
}

impl ExchangeRateTable {
    /// Builds a table, adding the base currency at `1.0` when absent.
    #[must_use]
    pub fn new(base: &str, rates: HashMap<String, f64>) -> Self {
        let mut table = Self {
            base: base.to_string(),
            date: None,
            rates,
        };
        table.ensure_base();
        table
    }

    /// Parses the exchange-rate JSON document.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if the document is not a
    /// valid rate table.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let mut table: Self = serde_json::from_str(raw)?;
        table.ensure_base();
        Ok(table)
    }

    /// Reads and parses the exchange-rate file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileIo`] if the file cannot be read, or
    /// [`ConfigError::FileParse`] if it is not a valid rate table.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let table = Self::from_json(&raw).map_err(|e| ConfigError::FileParse {
            path: path.display().to_string(),
            source: e,
        })?;
        tracing::debug!(
            base = %table.base,
            date = table.date.as_deref().unwrap_or("-"),
            currencies = table.rates.len(),
            "loaded exchange rates"
        );
        Ok(table)
    }

    #[must_use]
    pub fn rate(&self, currency: &str) -> Option<f64> {
        self.rates.get(currency).copied()
    }

    /// Returns the rate for `currency` or a [`CurrencyError`] naming it.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::Unavailable`] if the table has no entry.
    pub fn require(&self, currency: &str) -> Result<f64, CurrencyError> {
        self.rate(currency).ok_or_else(|| CurrencyError::Unavailable {
            currency: currency.to_string(),
        })
    }

    fn ensure_base(&mut self) {
        if !self.base.is_empty() {
            self.rates.entry(self.base.clone()).or_insert(1.0);
        }
    }
}

/// Converts `amount` from `from` into `to` through the table's base currency.
///
/// Identical currencies short-circuit without touching the table. No
/// rounding is applied.
///
/// # Errors
///
/// Returns [`CurrencyError::Unavailable`] naming the first missing currency
/// (`to` is checked before `from`).
pub fn convert(
    amount: f64,
    from: &str,
    to: &str,
    rates: &ExchangeRateTable,
) -> Result<f64, CurrencyError> {
    if from == to {
        return Ok(amount);
    }

    let to_rate = rates.require(to)?;
    let from_rate = rates.require(from)?;

    let in_base = amount / from_rate;
    Ok(in_base * to_rate)
}
