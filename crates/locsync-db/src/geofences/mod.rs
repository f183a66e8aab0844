//! Database operations for TeslaMate's `geofences` table.
//!
//! Rows written by locsync embed the feed's source id in the name, e.g.
//! `"Amsterdam Supercharger, Amsterdam, NL (12345)"`. That suffix is the
//! only link between a geofence and its location; TeslaMate owns the schema.

mod read;
mod repository;
mod types;
mod write;

pub use read::{find_geofence_id_by_source_id, get_geofence};
pub use repository::{GeofenceRepository, PgGeofenceRepository, UpsertOutcome};
pub use types::{GeofenceRow, NewGeofence};
pub use write::{insert_geofence, update_geofence};
