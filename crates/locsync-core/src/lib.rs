pub mod app_config;
pub mod config;
pub mod location;
pub mod pricing;
pub mod rates;

pub use app_config::{AppConfig, OutputKind};
pub use config::{load_app_config, load_app_config_with, CliOverrides};
pub use location::{by_country, Location, LocationType, CHARGER_TYPES};
pub use pricing::{BillingType, CatalogWarning, DerivedPrice, PriceCatalog, PriceInfo, PriceInput};
pub use rates::{convert, CurrencyError, ExchangeRateTable};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid {field} \"{value}\" for location {nid}: {reason}")]
    InvalidCoordinate {
        nid: String,
        field: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read file {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse file {path}: {source}")]
    FileParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("required environment variable {0} is not set")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid configuration: {0}")]
    Validation(String),
}
