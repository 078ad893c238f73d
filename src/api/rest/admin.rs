use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::activation;
use crate::error::AppError;
use crate::models::document::Document;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/documents/pending", get(pending_documents))
        .route("/documents/:id/approve", post(approve_document))
        .route("/documents/:id/reject", post(reject_document))
}

#[derive(Deserialize)]
pub struct RejectDocumentRequest {
    pub reason: String,
}

async fn pending_documents(State(state): State<Arc<AppState>>) -> Json<Vec<Document>> {
    Json(activation::pending_documents(&state))
}

async fn approve_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, AppError> {
    Ok(Json(activation::approve(&state, id)?))
}

async fn reject_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectDocumentRequest>,
) -> Result<Json<Document>, AppError> {
    if payload.reason.trim().is_empty() {
        return Err(AppError::BadRequest("reason cannot be empty".to_string()));
    }

    Ok(Json(activation::reject(&state, id, payload.reason)?))
}
