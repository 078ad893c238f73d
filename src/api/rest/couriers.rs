use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::dashboard::{self, CourierDashboard};
use crate::engine::offers::{self, Offer};
use crate::engine::{activation, availability, dispatch, lifecycle};
use crate::error::AppError;
use crate::models::account::{Account, CourierStatus, RoleProfile, VehicleType};
use crate::models::document::{Document, DocumentType};
use crate::models::location::LocationInput;
use crate::models::shipment::{Shipment, ShipmentStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/couriers", post(register_courier))
        .route("/couriers/:id/status", patch(update_status))
        .route("/couriers/:id/dashboard", get(courier_dashboard))
        .route("/couriers/:id/offers", get(list_offers))
        .route(
            "/couriers/:id/offers/:shipment_id/accept",
            post(accept_offer),
        )
        .route(
            "/couriers/:id/shipments/:shipment_id/status",
            post(update_shipment_status),
        )
        .route("/couriers/:id/documents", post(upload_document))
}

#[derive(Deserialize)]
pub struct RegisterCourierRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub vehicle: VehicleType,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: CourierStatus,
    pub location: LocationInput,
}

#[derive(Deserialize)]
pub struct UpdateShipmentStatusRequest {
    pub status: ShipmentStatus,
}

#[derive(Deserialize)]
pub struct UploadDocumentRequest {
    pub doc_type: DocumentType,
    pub file_url: String,
}

async fn register_courier(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterCourierRequest>,
) -> Result<Json<Account>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    // Couriers stay disabled until every verification document is approved.
    let account = Account {
        id: Uuid::new_v4(),
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        enabled: false,
        role: RoleProfile::Courier {
            status: CourierStatus::Offline,
            vehicle: payload.vehicle,
            location: None,
        },
        registered_at: Utc::now(),
    };

    state.accounts.insert(account.id, account.clone());
    Ok(Json(account))
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Account>, AppError> {
    let account = availability::set_status(&state, id, payload.status, payload.location)?;
    Ok(Json(account))
}

async fn courier_dashboard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourierDashboard>, AppError> {
    Ok(Json(dashboard::courier_dashboard(&state, id)?))
}

async fn list_offers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Offer>>, AppError> {
    Ok(Json(offers::list_offers(&state, id)?))
}

async fn accept_offer(
    State(state): State<Arc<AppState>>,
    Path((id, shipment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Shipment>, AppError> {
    Ok(Json(dispatch::accept_offer(&state, shipment_id, id)?))
}

async fn update_shipment_status(
    State(state): State<Arc<AppState>>,
    Path((id, shipment_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateShipmentStatusRequest>,
) -> Result<Json<Shipment>, AppError> {
    Ok(Json(lifecycle::advance(
        &state,
        shipment_id,
        id,
        payload.status,
    )?))
}

async fn upload_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UploadDocumentRequest>,
) -> Result<Json<Document>, AppError> {
    if payload.file_url.trim().is_empty() {
        return Err(AppError::BadRequest("file_url cannot be empty".to_string()));
    }

    Ok(Json(activation::upload(
        &state,
        id,
        payload.doc_type,
        payload.file_url,
    )?))
}
