use axum::{extract::State, Json};

use crate::http::response::{CarEntry, CarsResponse, HealthResponse};
use crate::http::server::AppState;

/// Flattened make/model list. Populates the catalog on first use.
pub async fn get_cars(State(state): State<AppState>) -> Json<CarsResponse> {
    state.catalog.ensure_populated();

    let car_models = state
        .catalog
        .models()
        .into_iter()
        .map(CarEntry::from)
        .collect();

    Json(CarsResponse { car_models })
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
