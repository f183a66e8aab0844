use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 2;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database connection settings missing: {0} is not set")]
    MissingSetting(String),
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Build the TeslaMate connection URL.
///
/// `DATABASE_URL` wins when present. Otherwise the URL is assembled from
/// `DATABASE_USER`, `DATABASE_PASS`, `DATABASE_HOST` and `DATABASE_NAME`,
/// all of which are then required.
///
/// # Errors
///
/// Returns [`DbError::MissingSetting`] naming the first absent variable.
pub fn database_url_from<F>(lookup: F) -> Result<String, DbError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    if let Ok(url) = lookup("DATABASE_URL") {
        return Ok(url);
    }

    let require =
        |var: &str| lookup(var).map_err(|_| DbError::MissingSetting(var.to_string()));

    let user = require("DATABASE_USER")?;
    let pass = require("DATABASE_PASS")?;
    let host = require("DATABASE_HOST")?;
    let name = require("DATABASE_NAME")?;

    Ok(format!(
        "postgres://{user}:{pass}@{host}/{name}?sslmode=disable"
    ))
}

/// [`database_url_from`] against the process environment.
///
/// # Errors
///
/// See [`database_url_from`].
pub fn database_url_from_env() -> Result<String, DbError> {
    database_url_from(|key| std::env::var(key))
}

/// Connect to a Postgres pool using explicit URL and config.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the connection cannot be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn pool_config_has_sane_defaults() {
        let config = PoolConfig::default();

        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.min_connections, DEFAULT_MIN_CONNECTIONS);
        assert_eq!(config.acquire_timeout_secs, DEFAULT_ACQUIRE_TIMEOUT_SECS);
    }

    #[test]
    fn database_url_prefers_explicit_url() {
        let mut map = HashMap::new();
        map.insert("DATABASE_URL", "postgres://explicit/db");
        map.insert("DATABASE_USER", "ignored");
        assert_eq!(
            database_url_from(lookup_from_map(&map)).unwrap(),
            "postgres://explicit/db"
        );
    }

    #[test]
    fn database_url_is_assembled_from_parts() {
        let mut map = HashMap::new();
        map.insert("DATABASE_USER", "teslamate");
        map.insert("DATABASE_PASS", "secret");
        map.insert("DATABASE_HOST", "db:5432");
        map.insert("DATABASE_NAME", "teslamate");
        assert_eq!(
            database_url_from(lookup_from_map(&map)).unwrap(),
            "postgres://teslamate:secret@db:5432/teslamate?sslmode=disable"
        );
    }

    #[test]
    fn database_url_names_missing_part() {
        let mut map = HashMap::new();
        map.insert("DATABASE_USER", "teslamate");
        map.insert("DATABASE_PASS", "secret");
        let err = database_url_from(lookup_from_map(&map)).unwrap_err();
        assert!(
            matches!(err, DbError::MissingSetting(ref v) if v == "DATABASE_HOST"),
            "expected MissingSetting(DATABASE_HOST), got: {err:?}"
        );
    }
}

pub mod geofences;

pub use geofences::{
    find_geofence_id_by_source_id, get_geofence, insert_geofence, update_geofence, GeofenceRepository,
    GeofenceRow, NewGeofence, PgGeofenceRepository, UpsertOutcome,
};
