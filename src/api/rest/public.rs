use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::engine::rating;
use crate::engine::tracking::{self, TrackingInfo};
use crate::error::AppError;
use crate::models::review::{Review, ReviewerKind};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/track/:code", get(track))
        .route("/track/:code/note", post(add_delivery_note))
        .route("/track/:code/reviews", post(add_review))
}

#[derive(Deserialize)]
pub struct DeliveryNoteRequest {
    pub note: String,
}

#[derive(Deserialize)]
pub struct AddReviewRequest {
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

async fn track(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<TrackingInfo>, AppError> {
    Ok(Json(tracking::track(&state, &code)?))
}

async fn add_delivery_note(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Json(payload): Json<DeliveryNoteRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    tracking::add_delivery_note(&state, &code, payload.note)?;
    Ok(Json(MessageResponse {
        message: "delivery note added",
    }))
}

async fn add_review(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Json(payload): Json<AddReviewRequest>,
) -> Result<Json<Review>, AppError> {
    let review = rating::add_review(
        &state,
        &code,
        payload.rating,
        payload.comment,
        ReviewerKind::Recipient,
    )?;
    Ok(Json(review))
}
