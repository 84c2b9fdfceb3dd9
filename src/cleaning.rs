//! Station filtering and reshaping
//!
//! Turns the raw WAQI station list into the points the map draws. Pure and
//! deterministic: the same input always yields the same output.

use serde_json::Value;
use tracing::trace;

use crate::models::{AirPoint, LocaleKeywords, RawStation};

/// Filter and reshape raw stations, preserving upstream order.
///
/// A station survives when its `aqi` coerces to an integer and its name
/// contains one of `keywords`. Coordinates are passed through untouched.
pub fn clean_stations(raw: &[RawStation], keywords: &LocaleKeywords) -> Vec<AirPoint> {
    raw.iter()
        .filter_map(|station| clean_station(station, keywords))
        .collect()
}

fn clean_station(station: &RawStation, keywords: &LocaleKeywords) -> Option<AirPoint> {
    let Some(aqi) = coerce_aqi(&station.aqi) else {
        trace!(aqi = %station.aqi, "Dropping station with non-integer AQI");
        return None;
    };

    let name = station.name().to_lowercase();
    if !keywords.matches(&name) {
        return None;
    }

    Some(AirPoint {
        lat: station.lat.clone(),
        lon: station.lon.clone(),
        aqi,
        name: title_case(&name),
    })
}

/// Coerce WAQI's loosely typed AQI into an integer.
///
/// WAQI reports `"-"` for stations without a current reading, so anything
/// that is not an integer-looking string or a finite number yields `None`.
/// Floats truncate toward zero. Booleans are rejected rather than read as 0/1.
pub fn coerce_aqi(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Capitalise the first cased letter of every word and lowercase the rest,
/// where a word starts at any cased letter not preceded by another cased one.
/// Uncased scripts such as kanji pass through and break words.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_cased = false;

    for c in text.chars() {
        let cased = c.is_lowercase() || c.is_uppercase();
        if !cased {
            result.push(c);
        } else if previous_is_cased {
            result.extend(c.to_lowercase());
        } else {
            result.extend(c.to_uppercase());
        }
        previous_is_cased = cased;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn japan() -> LocaleKeywords {
        LocaleKeywords::new([
            "japan", "tokyo", "osaka", "kyoto", "nagoya", "sapporo", "fukuoka", "yokohama",
            "nara", "kobe", "hiroshima", "sendai", "okinawa",
        ])
    }

    fn stations(value: Value) -> Vec<RawStation> {
        serde_json::from_value(value).unwrap()
    }

    #[rstest]
    #[case(json!("42"), Some(42))]
    #[case(json!(" 42 "), Some(42))]
    #[case(json!("+7"), Some(7))]
    #[case(json!("-3"), Some(-3))]
    #[case(json!(42), Some(42))]
    #[case(json!(42.9), Some(42))]
    #[case(json!(-1.5), Some(-1))]
    #[case(json!("-"), None)]
    #[case(json!("42.5"), None)]
    #[case(json!("not-a-number"), None)]
    #[case(json!(""), None)]
    #[case(json!(null), None)]
    #[case(json!(true), None)]
    #[case(json!([1]), None)]
    fn test_coerce_aqi(#[case] input: Value, #[case] expected: Option<i64>) {
        assert_eq!(coerce_aqi(&input), expected);
    }

    #[rstest]
    #[case("tokyo station", "Tokyo Station")]
    #[case("osaka-shi", "Osaka-Shi")]
    #[case("kyoto (jp)", "Kyoto (Jp)")]
    #[case("sapporo, hokkaido 2", "Sapporo, Hokkaido 2")]
    #[case("", "")]
    #[case("NAGOYA", "Nagoya")]
    #[case("東京tokyo station", "東京Tokyo Station")]
    #[case("大阪OSAKA", "大阪Osaka")]
    fn test_title_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(title_case(input), expected);
    }

    #[test]
    fn test_matching_station_is_reshaped() {
        let raw = stations(json!([
            {"aqi": "42", "lat": 35.6, "lon": 139.7, "station": {"name": "tokyo station"}}
        ]));

        let cleaned = clean_stations(&raw, &japan());

        assert_eq!(
            serde_json::to_value(&cleaned).unwrap(),
            json!([{"lat": 35.6, "lon": 139.7, "aqi": 42, "name": "Tokyo Station"}])
        );
    }

    #[test]
    fn test_non_numeric_aqi_is_discarded() {
        let raw = stations(json!([
            {"aqi": "not-a-number", "lat": 1, "lon": 1, "station": {"name": "tokyo"}}
        ]));

        assert!(clean_stations(&raw, &japan()).is_empty());
    }

    #[test]
    fn test_station_outside_locale_is_discarded() {
        let raw = stations(json!([
            {"aqi": "50", "lat": 1, "lon": 1, "station": {"name": "paris"}}
        ]));

        assert!(clean_stations(&raw, &japan()).is_empty());
    }

    #[test]
    fn test_missing_station_name_never_matches() {
        let raw = stations(json!([
            {"aqi": 30, "lat": 35.0, "lon": 135.0},
            {"aqi": 30, "lat": 35.0, "lon": 135.0, "station": {}}
        ]));

        assert!(clean_stations(&raw, &japan()).is_empty());
    }

    #[test]
    fn test_coordinates_pass_through_unchanged() {
        let raw = stations(json!([
            {"aqi": 12, "lat": "34.69", "station": {"name": "Kobe Port"}}
        ]));

        let cleaned = clean_stations(&raw, &japan());

        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].lat, json!("34.69"));
        assert!(cleaned[0].lon.is_null());
        assert_eq!(cleaned[0].name, "Kobe Port");
    }

    #[test]
    fn test_mixed_input_keeps_order_and_invariants() {
        let raw = stations(json!([
            {"aqi": "61", "lat": 43.06, "lon": 141.35, "station": {"name": "Sapporo, Hokkaido"}},
            {"aqi": "-", "lat": 35.0, "lon": 135.7, "station": {"name": "Kyoto"}},
            {"aqi": 88, "lat": 37.56, "lon": 126.97, "station": {"name": "Seoul"}},
            {"aqi": 17.4, "lat": 26.21, "lon": 127.68, "station": {"name": "NAHA, OKINAWA"}}
        ]));
        let keywords = japan();

        let cleaned = clean_stations(&raw, &keywords);

        let names: Vec<&str> = cleaned.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Sapporo, Hokkaido", "Naha, Okinawa"]);
        assert_eq!(cleaned[1].aqi, 17);
        for point in &cleaned {
            assert!(keywords.matches(&point.name.to_lowercase()));
        }
    }

    #[test]
    fn test_cleaning_is_deterministic() {
        let raw = stations(json!([
            {"aqi": "42", "lat": 35.6, "lon": 139.7, "station": {"name": "tokyo station"}},
            {"aqi": "77", "lat": 34.7, "lon": 135.5, "station": {"name": "Osaka"}}
        ]));

        assert_eq!(clean_stations(&raw, &japan()), clean_stations(&raw, &japan()));
    }
}
