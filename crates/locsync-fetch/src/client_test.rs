use super::*;
use crate::cache::MemoryCache;

fn client(base_url: &str) -> Result<LocationClient, FetchError> {
    LocationClient::with_base_url(5, "locsync-test/0.1", base_url, Box::new(MemoryCache::default()))
}

#[test]
fn locations_url_appends_path_to_bare_origin() {
    assert_eq!(
        LocationClient::locations_url("http://127.0.0.1:8080").unwrap(),
        "http://127.0.0.1:8080/all-locations"
    );
}

#[test]
fn locations_url_keeps_existing_path_prefix() {
    assert_eq!(
        LocationClient::locations_url("http://mirror.example.com/tesla/").unwrap(),
        "http://mirror.example.com/tesla/all-locations"
    );
    assert_eq!(
        LocationClient::locations_url("http://mirror.example.com/tesla").unwrap(),
        "http://mirror.example.com/tesla/all-locations"
    );
}

#[test]
fn locations_url_rejects_invalid_base() {
    let err = LocationClient::locations_url("not a url").unwrap_err();
    assert!(
        matches!(err, FetchError::InvalidBaseUrl { .. }),
        "expected InvalidBaseUrl, got: {err:?}"
    );
}

#[test]
fn new_targets_production_endpoint() {
    let client =
        LocationClient::new(10, "locsync-test/0.1", Box::new(MemoryCache::default())).unwrap();
    assert_eq!(client.url(), LOCATION_URL);
}

#[test]
fn with_base_url_exposes_resolved_url() {
    let client = client("http://localhost:9").unwrap();
    assert_eq!(client.url(), "http://localhost:9/all-locations");
}
