use serde::Serialize;
use uuid::Uuid;

use crate::engine::rating;
use crate::error::AppError;
use crate::models::account::RoleProfile;
use crate::models::shipment::{Shipment, ShipmentStatus};
use crate::state::AppState;

const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct CourierDashboard {
    pub courier_id: Uuid,
    pub name: String,
    pub average_rating: f64,
    pub total_deliveries: usize,
    pub active_deliveries: usize,
    pub current_shipments: Vec<Shipment>,
    pub recent_shipments: Vec<Shipment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributorDashboard {
    pub distributor_id: Uuid,
    pub name: String,
    pub total_shipments: usize,
    pub active_shipments: usize,
    pub delivered_shipments: usize,
    pub current_shipments: Vec<Shipment>,
    pub recent_shipments: Vec<Shipment>,
}

fn recent_delivered(mut delivered: Vec<Shipment>) -> Vec<Shipment> {
    delivered.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    delivered.truncate(RECENT_LIMIT);
    delivered
}

pub fn courier_dashboard(state: &AppState, courier_id: Uuid) -> Result<CourierDashboard, AppError> {
    let account = state
        .accounts
        .get(&courier_id)
        .map(|entry| entry.value().clone())
        .filter(|account| account.is_courier())
        .ok_or_else(|| AppError::NotFound(format!("courier {courier_id} not found")))?;

    let mine: Vec<Shipment> = state
        .shipments
        .iter()
        .filter(|entry| entry.value().assigned_courier == Some(courier_id))
        .map(|entry| entry.value().clone())
        .collect();

    let current: Vec<Shipment> = mine
        .iter()
        .filter(|shipment| {
            matches!(
                shipment.status,
                ShipmentStatus::Assigned | ShipmentStatus::PickedUp
            )
        })
        .cloned()
        .collect();

    let delivered: Vec<Shipment> = mine
        .iter()
        .filter(|shipment| shipment.status == ShipmentStatus::Delivered)
        .cloned()
        .collect();

    Ok(CourierDashboard {
        courier_id,
        name: account.name,
        average_rating: rating::average_rating(state, courier_id),
        total_deliveries: delivered.len(),
        active_deliveries: current.len(),
        current_shipments: current,
        recent_shipments: recent_delivered(delivered),
    })
}

pub fn distributor_dashboard(
    state: &AppState,
    distributor_id: Uuid,
) -> Result<DistributorDashboard, AppError> {
    let account = state
        .accounts
        .get(&distributor_id)
        .map(|entry| entry.value().clone())
        .filter(|account| matches!(account.role, RoleProfile::Distributor))
        .ok_or_else(|| AppError::NotFound(format!("distributor {distributor_id} not found")))?;

    let mine: Vec<Shipment> = state
        .shipments
        .iter()
        .filter(|entry| entry.value().distributor_id == distributor_id)
        .map(|entry| entry.value().clone())
        .collect();

    let current: Vec<Shipment> = mine
        .iter()
        .filter(|shipment| {
            matches!(
                shipment.status,
                ShipmentStatus::Created | ShipmentStatus::Assigned | ShipmentStatus::PickedUp
            )
        })
        .cloned()
        .collect();

    let delivered: Vec<Shipment> = mine
        .iter()
        .filter(|shipment| shipment.status == ShipmentStatus::Delivered)
        .cloned()
        .collect();

    Ok(DistributorDashboard {
        distributor_id,
        name: account.name,
        total_shipments: mine.len(),
        active_shipments: current.len(),
        delivered_shipments: delivered.len(),
        current_shipments: current,
        recent_shipments: recent_delivered(delivered),
    })
}
