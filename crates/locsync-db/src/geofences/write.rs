//! Write operations for the `geofences` table.

use sqlx::PgPool;

use super::types::NewGeofence;

/// Insert a geofence and return its id.
///
/// Timestamps are naive UTC, matching what TeslaMate writes itself.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn insert_geofence(pool: &PgPool, geofence: &NewGeofence) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO geofences \
             (name, latitude, longitude, radius, inserted_at, updated_at, \
              cost_per_unit, session_fee, billing_type) \
         VALUES ($1, $2::float8, $3::float8, $4::int4, \
                 timezone('utc', now()), timezone('utc', now()), \
                 $5::float8, $6::float8, $7::text::billing_type) \
         RETURNING id::int8",
    )
    .bind(geofence.stored_name())
    .bind(geofence.latitude)
    .bind(geofence.longitude)
    .bind(geofence.radius)
    .bind(geofence.cost_per_unit)
    .bind(geofence.session_fee)
    .bind(geofence.billing_type.as_str())
    .fetch_one(pool)
    .await
}

/// Update name, position and pricing of an existing geofence.
///
/// The radius is left alone so manual adjustments in TeslaMate survive.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn update_geofence(
    pool: &PgPool,
    id: i64,
    geofence: &NewGeofence,
) -> Result<u64, sqlx::Error> {
    let rows_affected = sqlx::query(
        "UPDATE geofences SET \
             name          = $2, \
             latitude      = $3::float8, \
             longitude     = $4::float8, \
             updated_at    = timezone('utc', now()), \
             cost_per_unit = $5::float8, \
             session_fee   = $6::float8, \
             billing_type  = $7::text::billing_type \
         WHERE id = $1",
    )
    .bind(id)
    .bind(geofence.stored_name())
    .bind(geofence.latitude)
    .bind(geofence.longitude)
    .bind(geofence.cost_per_unit)
    .bind(geofence.session_fee)
    .bind(geofence.billing_type.as_str())
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected)
}
