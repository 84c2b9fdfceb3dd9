//! Request orchestration: fetch, filter, fall back

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::cleaning::clean_stations;
use crate::fallback::generate_fallback;
use crate::models::{Dataset, Region};
use crate::waqi::StationSource;

/// Produces the point list served by `GET /api/air`
pub struct AirQualityService {
    source: Arc<dyn StationSource>,
    region: Region,
}

impl AirQualityService {
    pub fn new(source: Arc<dyn StationSource>, region: Region) -> Self {
        Self { source, region }
    }

    /// Fetch and filter live stations, substituting synthetic data when the
    /// upstream fails or nothing survives the filter. Never fails.
    pub async fn dataset(&self) -> Dataset {
        let raw = match self.source.fetch_stations(&self.region.bounds).await {
            Ok(raw) => raw,
            Err(e) if e.is_upstream() => {
                warn!(error = %e, "WAQI unavailable, serving synthetic data");
                Vec::new()
            }
            Err(e) => {
                error!(error = %e, "Station lookup failed, serving synthetic data");
                Vec::new()
            }
        };

        let cleaned = clean_stations(&raw, &self.region.keywords);
        info!(
            matched = cleaned.len(),
            received = raw.len(),
            "Filtered WAQI stations to region"
        );

        if cleaned.is_empty() {
            Dataset::Synthetic(generate_fallback(&self.region.bounds))
        } else {
            Dataset::Live(cleaned)
        }
    }
}
