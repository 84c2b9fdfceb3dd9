//! WAQI (World Air Quality Index) map-bounds client
//!
//! One GET per call, bounded by the configured timeout. Every failure comes
//! back as an [`AirMapError`] so the caller can decide to serve fallback data;
//! nothing here retries.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::UpstreamConfig;
use crate::error::AirMapError;
use crate::models::{BoundingBox, BoundsResponse, RawStation};

const USER_AGENT: &str = concat!("AirMap/", env!("CARGO_PKG_VERSION"));

/// Anything that can list stations inside a bounding box
#[async_trait]
pub trait StationSource: Send + Sync {
    async fn fetch_stations(&self, bounds: &BoundingBox) -> crate::Result<Vec<RawStation>>;
}

/// WAQI HTTP client
pub struct WaqiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl WaqiClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn from_config(config: &UpstreamConfig) -> crate::Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.token.clone(),
            Duration::from_secs(config.timeout_seconds.into()),
        )
    }

    /// Full request URL for `bounds`, token included
    pub fn bounds_url(&self, bounds: &BoundingBox) -> String {
        format!(
            "{}/map/bounds/?latlng={}&token={}",
            self.base_url,
            bounds.to_latlng_param(),
            urlencoding::encode(&self.token)
        )
    }
}

#[async_trait]
impl StationSource for WaqiClient {
    #[instrument(skip(self), fields(latlng = %bounds.to_latlng_param()))]
    async fn fetch_stations(&self, bounds: &BoundingBox) -> crate::Result<Vec<RawStation>> {
        let start_time = Instant::now();

        let response = self
            .client
            .get(self.bounds_url(bounds))
            .send()
            .await?
            .error_for_status()?;
        let envelope: BoundsResponse = response.json().await?;

        let stations = parse_envelope(envelope)?;

        info!(
            "Received {} stations from WAQI in {:.3}s",
            stations.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(stations)
    }
}

/// Extract the station list from a decoded WAQI envelope.
///
/// Absent or null `data` is an empty list. Malformed records are dropped one
/// by one rather than failing the whole response: elements that are not
/// station-shaped (a mistyped `station`, say) are skipped here, and a null
/// `station` reads as a nameless record that the keyword filter drops.
pub fn parse_envelope(envelope: BoundsResponse) -> crate::Result<Vec<RawStation>> {
    if envelope.status.as_deref() == Some("error") {
        let message = match envelope.data {
            Value::String(message) => message,
            Value::Null => "no reason given".to_string(),
            other => other.to_string(),
        };
        warn!("WAQI returned an error status: {}", message);
        return Err(AirMapError::rejected(message));
    }

    let items = match envelope.data {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => {
            return Err(AirMapError::malformed(format!(
                "expected `data` to be a list, got {}",
                json_kind(&other)
            )));
        }
    };

    let total = items.len();
    let stations: Vec<RawStation> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawStation>(item) {
            Ok(station) => Some(station),
            Err(e) => {
                debug!("Skipping unreadable station record: {}", e);
                None
            }
        })
        .collect();

    if stations.len() < total {
        debug!("Skipped {} of {} station records", total - stations.len(), total);
    }

    Ok(stations)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
