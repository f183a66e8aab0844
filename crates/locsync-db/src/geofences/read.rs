//! Read operations for the `geofences` table.

use sqlx::PgPool;

use super::types::GeofenceRow;

/// `LIKE` pattern matching names that end in `(<source_id>)`, with the
/// source id's own wildcards escaped.
pub(super) fn source_id_pattern(source_id: &str) -> String {
    let mut escaped = String::with_capacity(source_id.len());
    for c in source_id.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("%({escaped})")
}

/// Find the first geofence whose name carries `source_id` as its suffix.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn find_geofence_id_by_source_id(
    pool: &PgPool,
    source_id: &str,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT id::int8 FROM geofences \
         WHERE name LIKE $1 \
         ORDER BY id \
         LIMIT 1",
    )
    .bind(source_id_pattern(source_id))
    .fetch_optional(pool)
    .await
}

/// Fetch a single geofence by primary key.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_geofence(pool: &PgPool, id: i64) -> Result<Option<GeofenceRow>, sqlx::Error> {
    sqlx::query_as::<_, GeofenceRow>(
        "SELECT id::int8 AS id, name, \
                latitude::float8 AS latitude, longitude::float8 AS longitude, \
                radius::int4 AS radius, \
                cost_per_unit::float8 AS cost_per_unit, session_fee::float8 AS session_fee, \
                billing_type::text AS billing_type, \
                inserted_at, updated_at \
         FROM geofences \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_wraps_source_id_in_parentheses() {
        assert_eq!(source_id_pattern("12345"), "%(12345)");
    }

    #[test]
    fn pattern_escapes_like_wildcards() {
        assert_eq!(source_id_pattern("a_b%c"), "%(a\\_b\\%c)");
        assert_eq!(source_id_pattern("x\\y"), "%(x\\\\y)");
    }
}
