//! JSON API consumed by the map front end

use std::sync::Arc;

use axum::{Router, extract::State, response::Json, routing::get};

use crate::models::AirPoint;
use crate::service::AirQualityService;

pub fn router(service: Arc<AirQualityService>) -> Router {
    Router::new()
        .route("/air", get(get_air))
        .with_state(service)
}

/// Always 200: upstream trouble is absorbed by the synthetic fallback.
async fn get_air(State(service): State<Arc<AirQualityService>>) -> Json<Vec<AirPoint>> {
    let dataset = service.dataset().await;
    tracing::debug!(
        points = dataset.points().len(),
        synthetic = dataset.is_synthetic(),
        "Serving air quality points"
    );
    Json(dataset.into_points())
}
