//! Per-country charging prices, converted once into the display currency.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::rates::{convert, CurrencyError, ExchangeRateTable};
use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingType {
    #[default]
    PerKwh,
    PerMinute,
}

impl BillingType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BillingType::PerKwh => "per_kwh",
            BillingType::PerMinute => "per_minute",
        }
    }
}

impl std::fmt::Display for BillingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One country's pricing exactly as configured in `prices.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceInput {
    pub cost_per_unit: f64,
    pub currency: String,
    #[serde(default)]
    pub billing_type: BillingType,
    #[serde(default)]
    pub session_fee: f64,
}

/// Values computed from a [`PriceInput`] when the catalog is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedPrice {
    /// `true` when the configured currency differs from the display currency.
    pub foreign_currency: bool,
    /// Cost per unit in the display currency. Equals the raw cost when the
    /// currencies match or conversion failed.
    pub converted_cost_per_unit: f64,
}

/// A non-fatal problem found while building the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogWarning {
    pub country: String,
    pub error: CurrencyError,
}

/// Joined, read-only view of one country's price.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceInfo {
    pub country: String,
    pub billing_type: BillingType,
    pub session_fee: f64,
    pub cost_per_unit: f64,
    pub currency: String,
    pub foreign_currency: bool,
    pub converted_cost_per_unit: f64,
}

impl PriceInfo {
    /// Fallback used for countries missing from the catalog.
    #[must_use]
    pub fn zero(country: &str, display_currency: &str) -> Self {
        Self {
            country: country.to_string(),
            billing_type: BillingType::PerKwh,
            session_fee: 0.0,
            cost_per_unit: 0.0,
            currency: display_currency.to_string(),
            foreign_currency: false,
            converted_cost_per_unit: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PriceCatalog {
    display_currency: String,
    inputs: BTreeMap<String, PriceInput>,
    derived: BTreeMap<String, DerivedPrice>,
}

impl PriceCatalog {
    /// Builds the catalog, converting every foreign-currency entry into
    /// `display_currency`.
    ///
    /// Conversion failures do not abort the build: the affected entry keeps
    /// its unconverted cost and a [`CatalogWarning`] is returned for it.
    #[must_use]
    pub fn build(
        inputs: BTreeMap<String, PriceInput>,
        display_currency: &str,
        rates: &ExchangeRateTable,
    ) -> (Self, Vec<CatalogWarning>) {
        let mut derived = BTreeMap::new();
        let mut warnings = Vec::new();

        for (country, input) in &inputs {
            let mut price = DerivedPrice {
                foreign_currency: false,
                converted_cost_per_unit: input.cost_per_unit,
            };

            if input.currency != display_currency {
                price.foreign_currency = true;
                match convert(input.cost_per_unit, &input.currency, display_currency, rates) {
                    Ok(converted) => price.converted_cost_per_unit = converted,
                    Err(error) => {
                        tracing::warn!(
                            country = %country,
                            currency = %input.currency,
                            display_currency,
                            error = %error,
                            "price left unconverted"
                        );
                        warnings.push(CatalogWarning {
                            country: country.clone(),
                            error,
                        });
                    }
                }
            }

            derived.insert(country.clone(), price);
        }

        let catalog = Self {
            display_currency: display_currency.to_string(),
            inputs,
            derived,
        };
        (catalog, warnings)
    }

    /// Reads `prices.json` and builds the catalog from it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileIo`] or [`ConfigError::FileParse`] if the
    /// file cannot be read or parsed. Currency problems are returned as
    /// warnings, never as errors.
    pub fn load(
        path: &Path,
        display_currency: &str,
        rates: &ExchangeRateTable,
    ) -> Result<(Self, Vec<CatalogWarning>), ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let inputs: BTreeMap<String, PriceInput> =
            serde_json::from_str(&raw).map_err(|e| ConfigError::FileParse {
                path: path.display().to_string(),
                source: e,
            })?;
        Ok(Self::build(inputs, display_currency, rates))
    }

    #[must_use]
    pub fn display_currency(&self) -> &str {
        &self.display_currency
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    #[must_use]
    pub fn derived(&self, country: &str) -> Option<&DerivedPrice> {
        self.derived.get(country)
    }

    #[must_use]
    pub fn lookup(&self, country: &str) -> Option<PriceInfo> {
        let input = self.inputs.get(country)?;
        let derived = self.derived.get(country)?;
        Some(PriceInfo {
            country: country.to_string(),
            billing_type: input.billing_type,
            session_fee: input.session_fee,
            cost_per_unit: input.cost_per_unit,
            currency: input.currency.clone(),
            foreign_currency: derived.foreign_currency,
            converted_cost_per_unit: derived.converted_cost_per_unit,
        })
    }

    /// Like [`Self::lookup`], falling back to [`PriceInfo::zero`].
    #[must_use]
    pub fn price_or_zero(&self, country: &str) -> PriceInfo {
        self.lookup(country)
            .unwrap_or_else(|| PriceInfo::zero(country, &self.display_currency))
    }
}
