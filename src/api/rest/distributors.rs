use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::dashboard::{self, DistributorDashboard};
use crate::engine::{lifecycle, tracking};
use crate::error::AppError;
use crate::models::account::{Account, RoleProfile};
use crate::models::location::LocationInput;
use crate::models::shipment::{Measure, Shipment, ShipmentStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/distributors", post(register_distributor))
        .route("/distributors/:id/dashboard", get(distributor_dashboard))
        .route(
            "/distributors/:id/shipments",
            post(create_shipment).get(list_shipments),
        )
        .route("/distributors/:id/shipments/:shipment_id", get(get_shipment))
        .route(
            "/distributors/:id/shipments/:shipment_id/cancel",
            post(cancel_shipment),
        )
}

#[derive(Deserialize)]
pub struct RegisterDistributorRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Deserialize)]
pub struct CreateShipmentRequest {
    pub pickup: LocationInput,
    pub dropoff: LocationInput,
    pub measure: Measure,
    pub phone_number: String,
    #[serde(default)]
    pub description: Option<String>,
}

async fn register_distributor(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterDistributorRequest>,
) -> Result<Json<Account>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    // Distributor accounts are not document-gated.
    let account = Account {
        id: Uuid::new_v4(),
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        enabled: true,
        role: RoleProfile::Distributor,
        registered_at: Utc::now(),
    };

    state.accounts.insert(account.id, account.clone());
    Ok(Json(account))
}

fn owned_distributor(state: &AppState, id: Uuid) -> Result<Account, AppError> {
    state
        .accounts
        .get(&id)
        .map(|entry| entry.value().clone())
        .filter(|account| matches!(account.role, RoleProfile::Distributor))
        .ok_or_else(|| AppError::NotFound(format!("distributor {id} not found")))
}

async fn distributor_dashboard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DistributorDashboard>, AppError> {
    Ok(Json(dashboard::distributor_dashboard(&state, id)?))
}

async fn create_shipment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateShipmentRequest>,
) -> Result<Json<Shipment>, AppError> {
    owned_distributor(&state, id)?;

    if payload.phone_number.trim().is_empty() {
        return Err(AppError::BadRequest(
            "phone_number cannot be empty".to_string(),
        ));
    }

    let now = Utc::now();
    let shipment_id = Uuid::new_v4();
    let tracking_code = tracking::register_tracking_code(&state, shipment_id);

    let shipment = Shipment {
        id: shipment_id,
        pickup: payload.pickup.into_location(now),
        dropoff: payload.dropoff.into_location(now),
        measure: payload.measure,
        status: ShipmentStatus::Created,
        phone_number: payload.phone_number,
        description: payload.description,
        tracking_code,
        picked_up_at: None,
        delivered_at: None,
        distributor_id: id,
        assigned_courier: None,
        created_at: now,
        updated_at: now,
    };

    state.shipments.insert(shipment.id, shipment.clone());
    Ok(Json(shipment))
}

async fn list_shipments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Shipment>>, AppError> {
    owned_distributor(&state, id)?;

    let shipments = state
        .shipments
        .iter()
        .filter(|entry| entry.value().distributor_id == id)
        .map(|entry| entry.value().clone())
        .collect();

    Ok(Json(shipments))
}

async fn get_shipment(
    State(state): State<Arc<AppState>>,
    Path((id, shipment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Shipment>, AppError> {
    owned_distributor(&state, id)?;

    let shipment = state
        .shipments
        .get(&shipment_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("shipment {shipment_id} not found")))?;

    if shipment.distributor_id != id {
        return Err(AppError::NotAllowed(
            "shipment does not belong to this distributor".to_string(),
        ));
    }

    Ok(Json(shipment))
}

async fn cancel_shipment(
    State(state): State<Arc<AppState>>,
    Path((id, shipment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Shipment>, AppError> {
    owned_distributor(&state, id)?;
    Ok(Json(lifecycle::cancel(&state, shipment_id, id)?))
}
