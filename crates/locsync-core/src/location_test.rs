use serde_json::json;

use super::*;

fn location(nid: &str, country: &str, types: &[&str]) -> Location {
    Location {
        nid: nid.to_string(),
        title: format!("Site {nid}"),
        country: country.to_string(),
        location_type: types.iter().map(|t| LocationType::from(*t)).collect(),
        ..Location::default()
    }
}

fn countries(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| (*c).to_string()).collect()
}

#[test]
fn deserializes_feed_record() {
    let raw = json!({
        "nid": "12345",
        "location_id": "amsterdamsupercharger",
        "title": "Amsterdam Supercharger",
        "city": "Amsterdam",
        "country": "NL",
        "latitude": "52.370216",
        "longitude": "4.895168",
        "location_type": ["supercharger", "store"],
        "open_soon": "",
        "is_gallery": false,
        "emails": [{"label": "x", "email": "x@example.com"}]
    });

    let loc: Location = serde_json::from_value(raw).unwrap();
    assert_eq!(loc.nid, "12345");
    assert_eq!(loc.country, "NL");
    assert_eq!(
        loc.location_type,
        vec![LocationType::Supercharger, LocationType::Store]
    );
    assert!(!loc.is_open_soon());
}

#[test]
fn null_and_missing_strings_become_empty() {
    let raw = json!({
        "nid": "1",
        "title": null,
        "location_type": null
    });

    let loc: Location = serde_json::from_value(raw).unwrap();
    assert_eq!(loc.title, "");
    assert_eq!(loc.city, "");
    assert!(loc.location_type.is_empty());
}

#[test]
fn null_flags_and_null_tags_are_tolerated() {
    let raw = json!([{
        "nid": "1",
        "title": "Utrecht Supercharger",
        "country": "NL",
        "location_type": ["supercharger", null],
        "is_gallery": null,
        "sales_representative": null
    }]);

    let locations: Vec<Location> = serde_json::from_value(raw).unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].location_type, vec![LocationType::Supercharger]);
    assert!(!locations[0].is_gallery);
    assert!(!locations[0].sales_representative);
}

#[test]
fn location_type_display_honours_width() {
    assert_eq!(format!("[{:>8}]", LocationType::Store), "[   store]");
    assert_eq!(format!("[{:<8}]", LocationType::Store), "[store   ]");
}

#[test]
fn numeric_coordinates_are_accepted() {
    let raw = json!({"nid": "1", "latitude": 52.5, "longitude": -3.25});
    let loc: Location = serde_json::from_value(raw).unwrap();
    assert_eq!(loc.coordinates().unwrap(), (52.5, -3.25));
}

#[test]
fn unknown_location_type_is_preserved() {
    let raw = json!({"nid": "1", "location_type": ["party bus"]});
    let loc: Location = serde_json::from_value(raw).unwrap();
    assert_eq!(
        loc.location_type,
        vec![LocationType::Other("party bus".to_string())]
    );
    assert_eq!(loc.location_type[0].to_string(), "party bus");
}

#[test]
fn location_type_strings_round_trip_through_from() {
    for t in [
        "delivery",
        "destination charger",
        "logistics",
        "sales representative",
        "service",
        "standard charger",
        "store",
        "supercharger",
    ] {
        assert_eq!(LocationType::from(t).as_str(), t);
        assert!(!matches!(LocationType::from(t), LocationType::Other(_)));
    }
}

#[test]
fn has_charger_for_each_charger_type() {
    assert!(location("1", "NL", &["supercharger"]).has_charger());
    assert!(location("2", "NL", &["standard charger"]).has_charger());
    assert!(location("3", "NL", &["destination charger", "store"]).has_charger());
    assert!(!location("4", "NL", &["store", "service"]).has_charger());
    assert!(!location("5", "NL", &[]).has_charger());
}

#[test]
fn store_only_location_excluded_by_supercharger_filter() {
    let store = location("1", "NL", &["store"]);
    assert!(!store.has_any(&[LocationType::Supercharger]));
    assert!(store.has_any(&[LocationType::Store]));

    let both = location("2", "NL", &["store", "supercharger"]);
    assert!(both.has_any(&[LocationType::Supercharger]));
}

#[test]
fn open_soon_flag() {
    let mut loc = location("1", "NL", &["supercharger"]);
    loc.open_soon = "1".to_string();
    assert!(loc.is_open_soon());
    loc.open_soon = "0".to_string();
    assert!(!loc.is_open_soon());
}

#[test]
fn coordinates_parse_decimal_strings() {
    let mut loc = location("1", "NL", &[]);
    loc.latitude = "52.370216".to_string();
    loc.longitude = " 4.895168 ".to_string();
    let (lat, lng) = loc.coordinates().unwrap();
    assert!((lat - 52.370_216).abs() < 1e-9);
    assert!((lng - 4.895_168).abs() < 1e-9);
}

#[test]
fn coordinates_reject_garbage_and_out_of_range() {
    let mut loc = location("9", "NL", &[]);
    loc.latitude = "north".to_string();
    loc.longitude = "4.0".to_string();
    let err = loc.coordinates().unwrap_err();
    assert!(
        matches!(err, CoreError::InvalidCoordinate { field: "latitude", ref nid, .. } if nid == "9"),
        "expected latitude error, got: {err:?}"
    );

    loc.latitude = "10.0".to_string();
    loc.longitude = "181.5".to_string();
    let err = loc.coordinates().unwrap_err();
    assert!(matches!(
        err,
        CoreError::InvalidCoordinate {
            field: "longitude",
            ..
        }
    ));

    loc.longitude = String::new();
    assert!(loc.coordinates().is_err());
}

#[test]
fn by_country_keeps_input_order() {
    let input = vec![
        location("1", "NL", &[]),
        location("2", "DE", &[]),
        location("3", "NO", &[]),
        location("4", "NL", &[]),
    ];

    let out = by_country(input, &countries(&["NL", "DE"]));
    let ids: Vec<&str> = out.iter().map(|l| l.nid.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "4"]);
    assert!(out.iter().all(|l| l.country == "NL" || l.country == "DE"));
}

#[test]
fn by_country_is_case_sensitive() {
    let input = vec![location("1", "NL", &[])];
    assert!(by_country(input, &countries(&["nl"])).is_empty());
}

#[test]
fn by_country_without_matches_is_empty() {
    let input = vec![location("1", "NL", &[]), location("2", "DE", &[])];
    assert!(by_country(input, &countries(&["SE"])).is_empty());
    assert!(by_country(Vec::new(), &countries(&["NL"])).is_empty());
}
