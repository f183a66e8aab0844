//! Offline tests for locsync-db row types and the repository contract.
//! These tests do not require a live database connection.

use std::cell::RefCell;

use locsync_core::BillingType;
use locsync_db::{DbError, GeofenceRepository, NewGeofence, UpsertOutcome};

fn geofence(source_id: &str) -> NewGeofence {
    NewGeofence {
        source_id: source_id.to_string(),
        name: "Amsterdam Supercharger, Amsterdam, NL".to_string(),
        latitude: 52.370_216,
        longitude: 4.895_168,
        radius: 50,
        cost_per_unit: 0.28,
        session_fee: 0.0,
        billing_type: BillingType::PerKwh,
    }
}

/// Records every call so the provided `upsert` can be checked without Postgres.
#[derive(Default)]
struct RecordingRepo {
    rows: RefCell<Vec<NewGeofence>>,
    calls: RefCell<Vec<&'static str>>,
}

impl GeofenceRepository for RecordingRepo {
    async fn find_by_source_id(&self, source_id: &str) -> Result<Option<i64>, DbError> {
        self.calls.borrow_mut().push("find");
        Ok(self
            .rows
            .borrow()
            .iter()
            .position(|g| g.source_id == source_id)
            .map(|i| i as i64 + 1))
    }

    async fn insert(&self, geofence: &NewGeofence) -> Result<i64, DbError> {
        self.calls.borrow_mut().push("insert");
        let mut rows = self.rows.borrow_mut();
        rows.push(geofence.clone());
        Ok(rows.len() as i64)
    }

    async fn update(&self, id: i64, geofence: &NewGeofence) -> Result<(), DbError> {
        self.calls.borrow_mut().push("update");
        let index = usize::try_from(id - 1).map_err(|_| DbError::NotFound)?;
        let mut rows = self.rows.borrow_mut();
        let row = rows.get_mut(index).ok_or(DbError::NotFound)?;
        *row = geofence.clone();
        Ok(())
    }
}

#[test]
fn stored_name_embeds_source_id() {
    assert_eq!(
        geofence("12345").stored_name(),
        "Amsterdam Supercharger, Amsterdam, NL (12345)"
    );
}

#[test]
fn upsert_outcome_exposes_id() {
    assert_eq!(UpsertOutcome::Inserted { id: 3 }.id(), 3);
    assert_eq!(UpsertOutcome::Updated { id: 9 }.id(), 9);
}

#[tokio::test]
async fn upsert_inserts_then_updates_same_source_id() {
    let repo = RecordingRepo::default();

    let first = repo.upsert(&geofence("12345")).await.unwrap();
    let mut moved = geofence("12345");
    moved.latitude = 52.0;
    let second = repo.upsert(&moved).await.unwrap();

    assert_eq!(first, UpsertOutcome::Inserted { id: 1 });
    assert_eq!(second, UpsertOutcome::Updated { id: 1 });
    assert_eq!(repo.rows.borrow().len(), 1);
    assert!((repo.rows.borrow()[0].latitude - 52.0).abs() < f64::EPSILON);
    assert_eq!(
        *repo.calls.borrow(),
        vec!["find", "insert", "find", "update"]
    );
}

#[tokio::test]
async fn upsert_distinct_source_ids_insert_separately() {
    let repo = RecordingRepo::default();
    repo.upsert(&geofence("1")).await.unwrap();
    repo.upsert(&geofence("2")).await.unwrap();
    assert_eq!(repo.rows.borrow().len(), 2);
}
