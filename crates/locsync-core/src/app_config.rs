use std::path::PathBuf;

use serde::Deserialize;

use crate::location::LocationType;

/// Browser-like agent sent to the location directory; the endpoint rejects
/// default HTTP library agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:81.0) Gecko/20100101 Firefox/81.0";

/// Where filtered locations end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum OutputKind {
    #[default]
    Console,
    TeslamateDatabase,
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputKind::Console => write!(f, "Console"),
            OutputKind::TeslamateDatabase => write!(f, "TeslamateDatabase"),
        }
    }
}

impl std::str::FromStr for OutputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Console" => Ok(OutputKind::Console),
            "TeslamateDatabase" => Ok(OutputKind::TeslamateDatabase),
            other => Err(format!(
                "invalid output {other}; valid outputs are: TeslamateDatabase, Console"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub daemon: bool,
    pub interval_minutes: u64,
    pub log_level: String,
    pub output: OutputKind,
    /// Geofence radius in meters for newly inserted database rows.
    pub radius: i32,
    /// Display currency every price is converted into.
    pub currency: String,
    pub countries: Vec<String>,
    pub location_types: Vec<LocationType>,
    /// Directory holding `prices.json` and `exchange_rates.json`.
    pub config_dir: PathBuf,
    pub cache_path: PathBuf,
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            daemon: false,
            interval_minutes: 1440,
            log_level: "info".to_string(),
            output: OutputKind::Console,
            radius: 50,
            currency: "EUR".to_string(),
            countries: Vec::new(),
            location_types: Vec::new(),
            config_dir: PathBuf::from("config"),
            cache_path: PathBuf::from("cache/all-locations.json"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn prices_path(&self) -> PathBuf {
        self.config_dir.join("prices.json")
    }

    #[must_use]
    pub fn exchange_rates_path(&self) -> PathBuf {
        self.config_dir.join("exchange_rates.json")
    }

    /// Whether a daemon loop should follow the first run.
    #[must_use]
    pub fn runs_as_daemon(&self) -> bool {
        self.daemon && self.interval_minutes > 0
    }
}
