//! Live integration tests for locsync-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh database with the TeslaMate `geofences` subset
//! from `../../migrations`. They need `DATABASE_URL` pointing at a Postgres
//! server the test user may create databases on, so they are ignored by
//! default: `cargo test -p locsync-db -- --ignored`.

use locsync_core::BillingType;
use locsync_db::{
    find_geofence_id_by_source_id, get_geofence, GeofenceRepository, NewGeofence,
    PgGeofenceRepository, UpsertOutcome,
};

fn geofence(source_id: &str, title: &str) -> NewGeofence {
    NewGeofence {
        source_id: source_id.to_string(),
        name: format!("{title}, Amsterdam, NL"),
        latitude: 52.370_216,
        longitude: 4.895_168,
        radius: 50,
        cost_per_unit: 0.28,
        session_fee: 1.5,
        billing_type: BillingType::PerKwh,
    }
}

async fn count_geofences(pool: &sqlx::PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM geofences")
        .fetch_one(pool)
        .await
        .expect("count failed")
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn upsert_same_source_id_inserts_once_then_updates(pool: sqlx::PgPool) {
    let repo = PgGeofenceRepository::new(pool.clone());

    let first = repo
        .upsert(&geofence("12345", "Amsterdam Supercharger"))
        .await
        .expect("first upsert failed");
    let mut renamed = geofence("12345", "Amsterdam Supercharger V3");
    renamed.billing_type = BillingType::PerMinute;
    renamed.radius = 999;
    let second = repo.upsert(&renamed).await.expect("second upsert failed");

    assert!(matches!(first, UpsertOutcome::Inserted { .. }));
    assert_eq!(second, UpsertOutcome::Updated { id: first.id() });
    assert_eq!(count_geofences(&pool).await, 1);

    let row = get_geofence(&pool, first.id())
        .await
        .expect("get_geofence failed")
        .expect("row should exist");
    assert_eq!(row.name, "Amsterdam Supercharger V3, Amsterdam, NL (12345)");
    assert_eq!(row.billing_type, "per_minute");
    assert_eq!(row.radius, 50, "update must keep the original radius");
    assert!((row.latitude - 52.370_216).abs() < 1e-6);
    assert_eq!(row.session_fee, Some(1.5));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn find_matches_only_exact_source_id_suffix(pool: sqlx::PgPool) {
    let repo = PgGeofenceRepository::new(pool.clone());
    repo.upsert(&geofence("12345", "Amsterdam")).await.unwrap();

    assert!(find_geofence_id_by_source_id(&pool, "12345")
        .await
        .unwrap()
        .is_some());
    assert!(find_geofence_id_by_source_id(&pool, "2345")
        .await
        .unwrap()
        .is_none());
    assert!(find_geofence_id_by_source_id(&pool, "1234_")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn hand_made_geofences_are_left_alone(pool: sqlx::PgPool) {
    sqlx::query(
        "INSERT INTO geofences (name, latitude, longitude, radius, inserted_at, updated_at) \
         VALUES ('Home', 52.0, 4.0, 20, now(), now())",
    )
    .execute(&pool)
    .await
    .unwrap();

    let repo = PgGeofenceRepository::new(pool.clone());
    let outcome = repo.upsert(&geofence("777", "Delft")).await.unwrap();

    assert!(matches!(outcome, UpsertOutcome::Inserted { .. }));
    assert_eq!(count_geofences(&pool).await, 2);
}
