//! Location records from the Tesla location directory feed.

use serde::{Deserialize, Deserializer, Serialize};

use crate::CoreError;

/// A location tag from the feed's `location_type` array.
///
/// Unknown tags are kept as [`LocationType::Other`] so a new tag upstream
/// never fails the whole parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LocationType {
    Delivery,
    DestinationCharger,
    Logistics,
    SalesRepresentative,
    Service,
    StandardCharger,
    Store,
    Supercharger,
    Other(String),
}

/// Tags that make a location count as a charging site.
pub const CHARGER_TYPES: [LocationType; 3] = [
    LocationType::Supercharger,
    LocationType::StandardCharger,
    LocationType::DestinationCharger,
];

impl LocationType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            LocationType::Delivery => "delivery",
            LocationType::DestinationCharger => "destination charger",
            LocationType::Logistics => "logistics",
            LocationType::SalesRepresentative => "sales representative",
            LocationType::Service => "service",
            LocationType::StandardCharger => "standard charger",
            LocationType::Store => "store",
            LocationType::Supercharger => "supercharger",
            LocationType::Other(s) => s,
        }
    }
}

impl From<String> for LocationType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "delivery" => LocationType::Delivery,
            "destination charger" => LocationType::DestinationCharger,
            "logistics" => LocationType::Logistics,
            "sales representative" => LocationType::SalesRepresentative,
            "service" => LocationType::Service,
            "standard charger" => LocationType::StandardCharger,
            "store" => LocationType::Store,
            "supercharger" => LocationType::Supercharger,
            _ => LocationType::Other(s),
        }
    }
}

impl From<&str> for LocationType {
    fn from(s: &str) -> Self {
        LocationType::from(s.to_string())
    }
}

impl From<LocationType> for String {
    fn from(t: LocationType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One site from the location directory.
///
/// Only the fields the pipeline reads are modelled; everything else in the
/// feed is ignored. String fields that are `null` or absent become empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Stable source identifier, embedded in geofence names.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub nid: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub location_id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub common_name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub address: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub address_line_1: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub address_line_2: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub city: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub province_state: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub postal_code: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub country: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub region: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub sub_region: String,
    /// Decimal string, e.g. `"52.370216"`.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub latitude: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub longitude: String,
    #[serde(default, deserialize_with = "types_or_empty")]
    pub location_type: Vec<LocationType>,
    /// `"1"` while the site is announced but not yet operational.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub open_soon: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub hours: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub directions_link: String,
    #[serde(default, deserialize_with = "bool_or_false")]
    pub is_gallery: bool,
    #[serde(default, deserialize_with = "bool_or_false")]
    pub sales_representative: bool,
}

impl Location {
    /// Returns `true` if any of this location's tags is in `types`.
    #[must_use]
    pub fn has_any(&self, types: &[LocationType]) -> bool {
        self.location_type.iter().any(|t| types.contains(t))
    }

    #[must_use]
    pub fn has_charger(&self) -> bool {
        self.has_any(&CHARGER_TYPES)
    }

    #[must_use]
    pub fn is_open_soon(&self) -> bool {
        self.open_soon == "1"
    }

    /// Parses `(latitude, longitude)` from the feed's decimal strings.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] if either value is not a
    /// finite number or falls outside the valid WGS84 range.
    pub fn coordinates(&self) -> Result<(f64, f64), CoreError> {
        let lat = parse_coordinate(&self.nid, "latitude", &self.latitude, 90.0)?;
        let lng = parse_coordinate(&self.nid, "longitude", &self.longitude, 180.0)?;
        Ok((lat, lng))
    }
}

fn parse_coordinate(
    nid: &str,
    field: &'static str,
    raw: &str,
    bound: f64,
) -> Result<f64, CoreError> {
    let invalid = |reason: String| CoreError::InvalidCoordinate {
        nid: nid.to_string(),
        field,
        value: raw.to_string(),
        reason,
    };

    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| invalid(e.to_string()))?;
    if !value.is_finite() || value.abs() > bound {
        return Err(invalid(format!("must be within ±{bound}")));
    }
    Ok(value)
}

/// Keeps locations whose `country` exactly matches one of `countries`,
/// in input order.
#[must_use]
pub fn by_country(locations: Vec<Location>, countries: &[String]) -> Vec<Location> {
    locations
        .into_iter()
        .filter(|l| countries.iter().any(|c| *c == l.country))
        .collect()
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => if b { "1" } else { "0" }.to_string(),
        _ => String::new(),
    })
}

fn types_or_empty<'de, D>(deserializer: D) -> Result<Vec<LocationType>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Option::<Vec<Option<LocationType>>>::deserialize(deserializer)?;
    Ok(tags.into_iter().flatten().flatten().collect())
}

fn bool_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[path = "location_test.rs"]
mod tests;
