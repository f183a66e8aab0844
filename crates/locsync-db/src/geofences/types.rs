//! Row types for the `geofences` table.

use chrono::NaiveDateTime;
use locsync_core::BillingType;

/// Input record for inserting or updating a geofence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGeofence {
    /// Feed `nid`; stored as the `(…)` suffix of the name.
    pub source_id: String,
    /// Display name without the source-id suffix.
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Radius in meters. Only applied on insert.
    pub radius: i32,
    pub cost_per_unit: f64,
    pub session_fee: f64,
    pub billing_type: BillingType,
}

impl NewGeofence {
    /// Name as written to the `name` column.
    #[must_use]
    pub fn stored_name(&self) -> String {
        format!("{} ({})", self.name, self.source_id)
    }
}

/// A row from the `geofences` table.
///
/// Numeric columns are cast to `float8` in the query; TeslaMate stores them
/// as `NUMERIC`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GeofenceRow {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: i32,
    pub cost_per_unit: Option<f64>,
    pub session_fee: Option<f64>,
    pub billing_type: String,
    pub inserted_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
