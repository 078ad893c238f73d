use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Deserialize;

use crate::engine::proximity;
use crate::error::AppError;
use crate::models::account::Account;
use crate::models::location::GeoPoint;
use crate::state::AppState;

const API_KEY_HEADER: &str = "x-api-key";
const DEFAULT_RADIUS_KM: f64 = 10.0;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/internal/couriers/available", get(available_couriers))
}

#[derive(Deserialize)]
pub struct AvailableCouriersQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
}

/// Machine-to-machine listing of couriers in `Active` status, consumed by
/// the external proximity-matching process. Guarded by a static API key
/// rather than a user session. With `lat`/`lng` the listing is narrowed to
/// couriers near that point.
async fn available_couriers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailableCouriersQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<Account>>, AppError> {
    let presented = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if presented != Some(state.internal_api_key.as_str()) {
        return Err(AppError::AccessDenied);
    }

    let couriers = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => {
            let center = GeoPoint { lat, lng };
            let radius_km = query.radius_km.unwrap_or(DEFAULT_RADIUS_KM);
            proximity::available_couriers_near(&state, &center, radius_km)
        }
        _ => proximity::available_couriers(&state),
    };

    Ok(Json(couriers))
}
