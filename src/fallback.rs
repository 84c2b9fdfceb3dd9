//! Synthetic stand-in data for when WAQI has nothing usable

use std::ops::RangeInclusive;

use rand::RngExt;
use serde_json::Value;

use crate::models::{AirPoint, BoundingBox};

/// Number of points in every synthetic dataset
pub const FALLBACK_POINT_COUNT: usize = 250;

/// AQI values drawn for synthetic points
pub const FALLBACK_AQI_RANGE: RangeInclusive<i64> = 20..=160;

/// Name carried by every synthetic point
pub const SYNTHETIC_NAME: &str = "Synthetic";

/// Generate [`FALLBACK_POINT_COUNT`] points spread uniformly over `bounds`.
pub fn generate_fallback(bounds: &BoundingBox) -> Vec<AirPoint> {
    generate_fallback_with(bounds, &mut rand::rng())
}

/// Same as [`generate_fallback`], drawing from the supplied generator.
pub fn generate_fallback_with<R: RngExt>(
    bounds: &BoundingBox,
    rng: &mut R,
) -> Vec<AirPoint> {
    (0..FALLBACK_POINT_COUNT)
        .map(|_| AirPoint {
            lat: Value::from(rng.random_range(bounds.lat_min..=bounds.lat_max)),
            lon: Value::from(rng.random_range(bounds.lon_min..=bounds.lon_max)),
            aqi: rng.random_range(FALLBACK_AQI_RANGE),
            name: SYNTHETIC_NAME.to_string(),
        })
        .collect()
}
