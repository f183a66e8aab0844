//! Upsert-by-source-id over any geofence store.

use sqlx::PgPool;

use super::types::NewGeofence;
use crate::DbError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted { id: i64 },
    Updated { id: i64 },
}

impl UpsertOutcome {
    #[must_use]
    pub fn id(self) -> i64 {
        match self {
            UpsertOutcome::Inserted { id } | UpsertOutcome::Updated { id } => id,
        }
    }
}

/// Storage for geofences keyed by the source id embedded in their name.
///
/// The binary only ever uses [`PgGeofenceRepository`]; the trait exists so
/// the output layer can be exercised without a database.
#[allow(async_fn_in_trait)]
pub trait GeofenceRepository {
    async fn find_by_source_id(&self, source_id: &str) -> Result<Option<i64>, DbError>;

    async fn insert(&self, geofence: &NewGeofence) -> Result<i64, DbError>;

    async fn update(&self, id: i64, geofence: &NewGeofence) -> Result<(), DbError>;

    /// Update the geofence already carrying `geofence.source_id`, or insert a
    /// new one.
    ///
    /// Not atomic: two concurrent writers for the same source id can both
    /// insert. Runs are sequential, so this does not happen in practice.
    async fn upsert(&self, geofence: &NewGeofence) -> Result<UpsertOutcome, DbError> {
        match self.find_by_source_id(&geofence.source_id).await? {
            Some(id) => {
                self.update(id, geofence).await?;
                Ok(UpsertOutcome::Updated { id })
            }
            None => {
                let id = self.insert(geofence).await?;
                Ok(UpsertOutcome::Inserted { id })
            }
        }
    }
}

/// [`GeofenceRepository`] backed by the TeslaMate Postgres database.
#[derive(Debug, Clone)]
pub struct PgGeofenceRepository {
    pool: PgPool,
}

impl PgGeofenceRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl GeofenceRepository for PgGeofenceRepository {
    async fn find_by_source_id(&self, source_id: &str) -> Result<Option<i64>, DbError> {
        Ok(super::find_geofence_id_by_source_id(&self.pool, source_id).await?)
    }

    async fn insert(&self, geofence: &NewGeofence) -> Result<i64, DbError> {
        Ok(super::insert_geofence(&self.pool, geofence).await?)
    }

    async fn update(&self, id: i64, geofence: &NewGeofence) -> Result<(), DbError> {
        match super::update_geofence(&self.pool, id, geofence).await? {
            0 => {
                tracing::warn!(id, source_id = %geofence.source_id, "geofence vanished before update");
                Err(DbError::NotFound)
            }
            _ => Ok(()),
        }
    }
}
