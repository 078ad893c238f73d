pub mod admin;
pub mod couriers;
pub mod distributors;
pub mod internal;
pub mod public;
pub mod ws;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(couriers::router())
        .merge(distributors::router())
        .merge(public::router())
        .merge(admin::router())
        .merge(internal::router())
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    couriers: usize,
    shipments: usize,
    documents: usize,
    reviews: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let couriers = state
        .accounts
        .iter()
        .filter(|entry| entry.value().is_courier())
        .count();

    Json(HealthResponse {
        status: "ok",
        couriers,
        shipments: state.shipments.len(),
        documents: state.documents.len(),
        reviews: state.reviews.len(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}
