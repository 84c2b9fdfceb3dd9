//! `AirMap` - air quality map backend
//!
//! Proxies the WAQI sensor network for one fixed region, filters stations by
//! locale keywords and falls back to synthetic data so the map always has
//! something to draw.

pub mod api;
pub mod cleaning;
pub mod config;
pub mod error;
pub mod fallback;
pub mod logging;
pub mod models;
pub mod service;
pub mod waqi;
pub mod web;

// Re-export core types for public API
pub use cleaning::{clean_stations, coerce_aqi, title_case};
pub use config::AirMapConfig;
pub use error::AirMapError;
pub use fallback::{FALLBACK_POINT_COUNT, generate_fallback};
pub use models::{AirPoint, BoundingBox, Dataset, LocaleKeywords, RawStation, Region};
pub use service::AirQualityService;
pub use waqi::{StationSource, WaqiClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AirMapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
