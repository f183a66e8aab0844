//! Upserts charger locations into TeslaMate's `geofences` table.

use anyhow::Context;
use locsync_core::{Location, PriceInfo};
use locsync_db::{GeofenceRepository, NewGeofence, PgGeofenceRepository, PoolConfig, UpsertOutcome};

use super::StoreOutcome;

pub(crate) struct DatabaseOutput<R = PgGeofenceRepository> {
    repository: Option<R>,
    radius: i32,
}

impl DatabaseOutput<PgGeofenceRepository> {
    /// Not connected until [`Self::open`] runs.
    pub(crate) fn new(radius: i32) -> Self {
        Self {
            repository: None,
            radius,
        }
    }

    pub(crate) async fn open(&mut self) -> anyhow::Result<()> {
        let url = locsync_db::database_url_from_env()?;
        let pool = locsync_db::connect_pool(&url, PoolConfig::default())
            .await
            .context("failed to connect to the TeslaMate database")?;
        locsync_db::ping(&pool)
            .await
            .context("TeslaMate database did not answer a ping")?;
        tracing::debug!("connected to TeslaMate database");
        self.repository = Some(PgGeofenceRepository::new(pool));
        Ok(())
    }

    pub(crate) async fn close(&mut self) -> anyhow::Result<()> {
        if let Some(repository) = self.repository.take() {
            repository.pool().close().await;
        }
        Ok(())
    }
}

impl<R: GeofenceRepository> DatabaseOutput<R> {
    /// An output that is already open against `repository`.
    #[cfg(test)]
    pub(crate) fn with_repository(repository: R, radius: i32) -> Self {
        Self {
            repository: Some(repository),
            radius,
        }
    }

    #[cfg(test)]
    pub(crate) fn repository(&self) -> Option<&R> {
        self.repository.as_ref()
    }

    /// Upsert one location. Sites that are not open yet are skipped without
    /// touching the database.
    pub(crate) async fn store(
        &mut self,
        location: &Location,
        price: &PriceInfo,
    ) -> anyhow::Result<StoreOutcome> {
        if location.is_open_soon() {
            tracing::debug!(nid = %location.nid, title = %location.title, "skipping location that is not open yet");
            return Ok(StoreOutcome::Skipped);
        }

        let repository = self
            .repository
            .as_ref()
            .context("database output used before it was opened")?;

        let geofence = geofence_for(location, price, self.radius)?;
        let outcome = repository
            .upsert(&geofence)
            .await
            .with_context(|| format!("failed to upsert geofence {}", geofence.stored_name()))?;

        match outcome {
            UpsertOutcome::Inserted { id } => {
                tracing::info!(id, name = %geofence.stored_name(), "inserted geofence");
            }
            UpsertOutcome::Updated { id } => {
                tracing::debug!(id, name = %geofence.stored_name(), "updated geofence");
            }
        }

        Ok(StoreOutcome::Stored)
    }
}

/// Geofence named `"{title}, {city}, {country}"` and keyed by the location's
/// `nid`.
pub(crate) fn geofence_for(
    location: &Location,
    price: &PriceInfo,
    radius: i32,
) -> anyhow::Result<NewGeofence> {
    let (latitude, longitude) = location.coordinates()?;
    Ok(NewGeofence {
        source_id: location.nid.clone(),
        name: format!("{}, {}, {}", location.title, location.city, location.country),
        latitude,
        longitude,
        radius,
        cost_per_unit: price.converted_cost_per_unit,
        session_fee: price.session_fee,
        billing_type: price.billing_type,
    })
}
