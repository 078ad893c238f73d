use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::geo::haversine_km;
use crate::models::location::Location;
use crate::models::shipment::{Shipment, ShipmentStatus};
use crate::state::AppState;

const AVERAGE_SPEED_KMH: f64 = 40.0;

/// Public view of a shipment, keyed by its tracking code. No authentication
/// sits in front of this.
#[derive(Debug, Clone, Serialize)]
pub struct TrackingInfo {
    pub tracking_code: String,
    pub status: ShipmentStatus,
    /// The courier's last known position while one is assigned; the pickup
    /// point before that.
    pub current_location: Location,
    pub destination: Location,
    pub courier_name: Option<String>,
    pub courier_phone: Option<String>,
    /// Minutes to the dropoff at a flat 40 km/h, only while in transit.
    pub eta_minutes: Option<f64>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub delivery_note: Option<String>,
}

fn shipment_by_code(state: &AppState, code: &str) -> Result<Shipment, AppError> {
    let shipment_id = state
        .tracking_index
        .get(code)
        .map(|entry| *entry.value())
        .ok_or_else(|| AppError::NotFound(format!("no shipment with tracking code {code}")))?;

    state
        .shipments
        .get(&shipment_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("shipment {shipment_id} not found")))
}

pub fn track(state: &AppState, code: &str) -> Result<TrackingInfo, AppError> {
    let shipment = shipment_by_code(state, code)?;

    let courier = shipment
        .assigned_courier
        .and_then(|id| state.accounts.get(&id).map(|entry| entry.value().clone()));

    let courier_position = courier
        .as_ref()
        .and_then(|account| account.courier_location().cloned());

    let eta_minutes = if shipment.status == ShipmentStatus::PickedUp {
        courier_position.as_ref().map(|position| {
            haversine_km(&position.point, &shipment.dropoff.point) / AVERAGE_SPEED_KMH * 60.0
        })
    } else {
        None
    };

    let current_location = courier_position.unwrap_or_else(|| shipment.pickup.clone());

    Ok(TrackingInfo {
        tracking_code: shipment.tracking_code,
        status: shipment.status,
        current_location,
        destination: shipment.dropoff,
        courier_name: courier.as_ref().map(|account| account.name.clone()),
        courier_phone: courier.as_ref().map(|account| account.phone.clone()),
        eta_minutes,
        delivered_at: shipment.delivered_at,
        delivery_note: shipment.description,
    })
}

/// Overwrites the shipment description, which doubles as the latest
/// delivery note on the public tracking page.
pub fn add_delivery_note(state: &AppState, code: &str, note: String) -> Result<Shipment, AppError> {
    let shipment_id = state
        .tracking_index
        .get(code)
        .map(|entry| *entry.value())
        .ok_or_else(|| AppError::NotFound(format!("no shipment with tracking code {code}")))?;

    let mut entry = state
        .shipments
        .get_mut(&shipment_id)
        .ok_or_else(|| AppError::NotFound(format!("shipment {shipment_id} not found")))?;

    entry.description = Some(note);
    entry.updated_at = Utc::now();

    Ok(entry.clone())
}

/// Reserves a fresh 8-character tracking code for `shipment_id` and returns
/// it. Loops on the vanishingly rare collision.
pub fn register_tracking_code(state: &AppState, shipment_id: Uuid) -> String {
    loop {
        let code = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        match state.tracking_index.entry(code.clone()) {
            Entry::Vacant(vacant) => {
                vacant.insert(shipment_id);
                return code;
            }
            Entry::Occupied(_) => continue,
        }
    }
}
