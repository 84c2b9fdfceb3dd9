//! Core data types shared by the fetcher, the filter and the HTTP layer
//!
//! Upstream types mirror the WAQI `map/bounds` envelope loosely: every field a
//! station may omit or mistype is kept as raw JSON so one bad record never
//! poisons the rest of the response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rectangular lat/lon region used to scope the upstream query and the
/// synthetic fallback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// `latMin,lonMin,latMax,lonMax`, the corner order WAQI expects
    #[must_use]
    pub fn to_latlng_param(&self) -> String {
        format!(
            "{},{},{},{}",
            self.lat_min, self.lon_min, self.lat_max, self.lon_max
        )
    }
}

/// Lowercase place-name fragments that mark a station as "in the region"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleKeywords(Vec<String>);

impl LocaleKeywords {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }
        Self(normalized)
    }

    /// Case-insensitive substring test; any keyword suffices
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.0.iter().any(|keyword| name.contains(keyword.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Immutable description of the area this process serves
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub bounds: BoundingBox,
    pub keywords: LocaleKeywords,
}

/// Top-level WAQI response: `{"status": "ok", "data": [...]}`
#[derive(Debug, Deserialize)]
pub struct BoundsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// One station as reported by WAQI
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStation {
    #[serde(default)]
    pub aqi: Value,
    #[serde(default)]
    pub lat: Value,
    #[serde(default)]
    pub lon: Value,
    /// `None` for both an absent and a null `station`
    #[serde(default)]
    pub station: Option<StationInfo>,
}

impl RawStation {
    /// Station display name, empty when WAQI left it out
    pub fn name(&self) -> &str {
        self.station
            .as_ref()
            .and_then(|station| station.name.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StationInfo {
    #[serde(default)]
    pub name: Option<String>,
}

/// A point as served to the map front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirPoint {
    /// Upstream value verbatim on the live path, a number on the synthetic one
    pub lat: Value,
    pub lon: Value,
    pub aqi: i64,
    pub name: String,
}

/// Points for one request, tagged with where they came from
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    /// Filtered WAQI stations
    Live(Vec<AirPoint>),
    /// Randomly generated stand-in data
    Synthetic(Vec<AirPoint>),
}

impl Dataset {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Dataset::Synthetic(_))
    }

    pub fn points(&self) -> &[AirPoint] {
        match self {
            Dataset::Live(points) | Dataset::Synthetic(points) => points,
        }
    }

    pub fn into_points(self) -> Vec<AirPoint> {
        match self {
            Dataset::Live(points) | Dataset::Synthetic(points) => points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_latlng_param_uses_waqi_corner_order() {
        let bounds = BoundingBox::new(24.0, 46.0, 123.0, 146.0);
        assert_eq!(bounds.to_latlng_param(), "24,123,46,146");

        let fractional = BoundingBox::new(24.5, 46.25, 123.0, 146.75);
        assert_eq!(fractional.to_latlng_param(), "24.5,123,46.25,146.75");
    }

    #[test]
    fn test_keywords_are_normalized() {
        let keywords = LocaleKeywords::new(["Tokyo", " osaka ", "", "TOKYO"]);
        assert_eq!(keywords.iter().collect::<Vec<_>>(), vec!["tokyo", "osaka"]);
    }

    #[test]
    fn test_keywords_match_substrings_case_insensitively() {
        let keywords = LocaleKeywords::new(["tokyo", "nara"]);
        assert!(keywords.matches("tokyo station"));
        assert!(keywords.matches("Shinjuku, TOKYO"));
        assert!(keywords.matches("nara-shi"));
        assert!(!keywords.matches("paris"));
        assert!(!keywords.matches(""));
    }

    #[test]
    fn test_raw_station_tolerates_missing_fields() {
        let station: RawStation = serde_json::from_value(json!({"aqi": "42"})).unwrap();
        assert_eq!(station.aqi, json!("42"));
        assert!(station.lat.is_null());
        assert_eq!(station.name(), "");

        let station: RawStation =
            serde_json::from_value(json!({"aqi": 5, "station": {"name": null}})).unwrap();
        assert_eq!(station.name(), "");

        let station: RawStation = serde_json::from_value(
            json!({"aqi": 5, "lat": 35.6, "lon": 139.7, "station": {"name": "Kobe", "time": "2024-01-01"}}),
        )
        .unwrap();
        assert_eq!(station.name(), "Kobe");
    }

    #[test]
    fn test_air_point_serializes_in_client_field_order() {
        let point = AirPoint {
            lat: json!(35.6),
            lon: json!(139.7),
            aqi: 42,
            name: "Tokyo Station".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&point).unwrap(),
            r#"{"lat":35.6,"lon":139.7,"aqi":42,"name":"Tokyo Station"}"#
        );
    }

    #[test]
    fn test_dataset_accessors() {
        let live = Dataset::Live(vec![]);
        assert!(!live.is_synthetic());
        assert!(live.points().is_empty());

        let synthetic = Dataset::Synthetic(vec![AirPoint {
            lat: json!(30.0),
            lon: json!(130.0),
            aqi: 50,
            name: "Synthetic".to_string(),
        }]);
        assert!(synthetic.is_synthetic());
        assert_eq!(synthetic.points().len(), 1);
        assert_eq!(synthetic.into_points()[0].aqi, 50);
    }
}
