use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::app_config::{AppConfig, OutputKind};
use crate::location::LocationType;
use crate::ConfigError;

const CONFIG_FILE_NAME: &str = "config.json";

/// Values given explicitly on the command line. `None` / empty means the
/// flag was not passed and lower layers win.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_dir: Option<PathBuf>,
    pub daemon: Option<bool>,
    pub interval_minutes: Option<u64>,
    pub radius: Option<i32>,
    pub log_level: Option<String>,
    pub currency: Option<String>,
    pub output: Option<OutputKind>,
    pub countries: Vec<String>,
    pub location_types: Vec<LocationType>,
}

/// Shape of `config/config.json`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    daemon: Option<bool>,
    interval_minutes: Option<u64>,
    log_level: Option<String>,
    output: Option<OutputKind>,
    radius: Option<i32>,
    currency: Option<String>,
    countries: Option<Vec<String>>,
    location_types: Option<Vec<LocationType>>,
    cache_path: Option<PathBuf>,
    user_agent: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Load configuration: `config.json`, then `LOCATION_*` environment
/// variables, then explicit CLI flags.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if the config file is missing or malformed, or an
/// env var holds an invalid value.
pub fn load_app_config(cli: &CliOverrides) -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_with(cli, |key| std::env::var(key))
}

/// Same as [`load_app_config`] with an injected env lookup and no `.env`
/// loading.
///
/// # Errors
///
/// See [`load_app_config`].
pub fn load_app_config_with<F>(cli: &CliOverrides, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let config_dir = cli
        .config_dir
        .clone()
        .or_else(|| lookup("LOCATION_CONFIG_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| AppConfig::default().config_dir);

    let file = read_file_config(&config_dir.join(CONFIG_FILE_NAME))?;
    build_app_config(config_dir, file, &lookup, cli)
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::FileParse {
        path: path.display().to_string(),
        source: e,
    })
}

fn build_app_config<F>(
    config_dir: PathBuf,
    file: FileConfig,
    lookup: &F,
    cli: &CliOverrides,
) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = AppConfig::default();

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env_parsed = |var: &str| -> Result<Option<u64>, ConfigError> {
        lookup(var)
            .ok()
            .map(|raw| raw.trim().parse::<u64>().map_err(|e| invalid(var, e.to_string())))
            .transpose()
    };

    let mut config = AppConfig {
        daemon: file.daemon.unwrap_or(defaults.daemon),
        interval_minutes: file.interval_minutes.unwrap_or(defaults.interval_minutes),
        log_level: file.log_level.unwrap_or(defaults.log_level),
        output: file.output.unwrap_or(defaults.output),
        radius: file.radius.unwrap_or(defaults.radius),
        currency: file.currency.unwrap_or(defaults.currency),
        countries: file.countries.unwrap_or_default(),
        location_types: file.location_types.unwrap_or_default(),
        config_dir,
        cache_path: file.cache_path.unwrap_or(defaults.cache_path),
        user_agent: file.user_agent.unwrap_or(defaults.user_agent),
        request_timeout_secs: file
            .request_timeout_secs
            .unwrap_or(defaults.request_timeout_secs),
    };

    // Environment layer.
    if let Ok(raw) = lookup("LOCATION_DAEMON") {
        config.daemon = parse_bool(&raw).ok_or_else(|| {
            invalid("LOCATION_DAEMON", format!("\"{raw}\" is not a boolean"))
        })?;
    }
    if let Some(minutes) = env_parsed("LOCATION_INTERVAL_MINUTES")? {
        config.interval_minutes = minutes;
    }
    if let Ok(level) = lookup("LOCATION_LOG_LEVEL") {
        config.log_level = level;
    }
    if let Ok(raw) = lookup("LOCATION_OUTPUT") {
        config.output = raw
            .parse::<OutputKind>()
            .map_err(|e| invalid("LOCATION_OUTPUT", e))?;
    }
    if let Ok(raw) = lookup("LOCATION_RADIUS") {
        config.radius = raw
            .trim()
            .parse::<i32>()
            .map_err(|e| invalid("LOCATION_RADIUS", e.to_string()))?;
    }
    if let Ok(currency) = lookup("LOCATION_CURRENCY") {
        config.currency = currency;
    }
    if let Ok(raw) = lookup("LOCATION_COUNTRIES") {
        config.countries = split_list(&raw).map(str::to_string).collect();
    }
    if let Ok(raw) = lookup("LOCATION_TYPES") {
        config.location_types = split_list(&raw).map(LocationType::from).collect();
    }
    if let Ok(path) = lookup("LOCATION_CACHE_PATH") {
        config.cache_path = PathBuf::from(path);
    }
    if let Ok(agent) = lookup("LOCATION_USER_AGENT") {
        config.user_agent = agent;
    }
    if let Some(secs) = env_parsed("LOCATION_REQUEST_TIMEOUT_SECS")? {
        config.request_timeout_secs = secs;
    }

    // Command-line layer.
    if let Some(daemon) = cli.daemon {
        config.daemon = daemon;
    }
    if let Some(minutes) = cli.interval_minutes {
        config.interval_minutes = minutes;
    }
    if let Some(radius) = cli.radius {
        config.radius = radius;
    }
    if let Some(level) = &cli.log_level {
        config.log_level.clone_from(level);
    }
    if let Some(currency) = &cli.currency {
        config.currency.clone_from(currency);
    }
    if let Some(output) = cli.output {
        config.output = output;
    }
    if !cli.countries.is_empty() {
        config.countries.clone_from(&cli.countries);
    }
    if !cli.location_types.is_empty() {
        config.location_types.clone_from(&cli.location_types);
    }

    config.log_level = config.log_level.trim().to_lowercase();
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.currency.trim().is_empty() {
        return Err(ConfigError::Validation(
            "currency must be non-empty".to_string(),
        ));
    }
    // geofences.radius is a SMALLINT column.
    if config.radius <= 0 || config.radius > i32::from(i16::MAX) {
        return Err(ConfigError::Validation(format!(
            "radius must be between 1 and {}, got {}",
            i16::MAX,
            config.radius
        )));
    }
    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be positive".to_string(),
        ));
    }
    Ok(())
}

/// `;`-separated list, empty segments dropped.
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(';').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
