use serde::Serialize;
use uuid::Uuid;

use crate::engine::proximity;
use crate::error::AppError;
use crate::geo::haversine_km;
use crate::models::account::CourierStatus;
use crate::models::location::Location;
use crate::models::shipment::Measure;
use crate::state::AppState;

/// Fixed search radius for courier-facing offer listings.
pub const OFFER_RADIUS_KM: f64 = 10.0;

const BASE_FARE: f64 = 20.0;
const PER_KM_RATE: f64 = 2.5;

/// A candidate shipment projected for one courier. Nothing is reserved by
/// listing it; another courier may claim the shipment first.
#[derive(Debug, Clone, Serialize)]
pub struct Offer {
    pub shipment_id: Uuid,
    pub pickup: Location,
    pub dropoff: Location,
    pub measure: Measure,
    pub distributor_name: String,
    pub distance_to_pickup_km: f64,
    pub total_distance_km: f64,
    pub estimated_earning: f64,
}

pub fn estimated_earning(total_distance_km: f64) -> f64 {
    BASE_FARE + total_distance_km * PER_KM_RATE
}

/// Pending shipments within [`OFFER_RADIUS_KM`] of the courier's position.
///
/// A disabled courier is refused outright; a courier who is off shift or has
/// never reported a position simply sees an empty list.
pub fn list_offers(state: &AppState, courier_id: Uuid) -> Result<Vec<Offer>, AppError> {
    let courier = state
        .accounts
        .get(&courier_id)
        .map(|entry| entry.value().clone())
        .filter(|account| account.is_courier())
        .ok_or_else(|| AppError::NotFound(format!("courier {courier_id} not found")))?;

    if !courier.enabled {
        return Err(AppError::UserNotActive);
    }

    let on_shift = matches!(
        courier.courier_status(),
        Some(CourierStatus::Active | CourierStatus::DestinationBased)
    );
    if !on_shift {
        return Ok(Vec::new());
    }

    let Some(position) = courier.courier_location() else {
        return Ok(Vec::new());
    };

    let offers = proximity::pending_shipments_near(state, &position.point, OFFER_RADIUS_KM)
        .into_iter()
        .map(|shipment| {
            let distance_to_pickup_km =
                haversine_km(&position.point, &shipment.pickup.point);
            let total_distance_km =
                haversine_km(&shipment.pickup.point, &shipment.dropoff.point);

            let distributor_name = state
                .accounts
                .get(&shipment.distributor_id)
                .map(|entry| entry.value().name.clone())
                .unwrap_or_default();

            Offer {
                shipment_id: shipment.id,
                pickup: shipment.pickup,
                dropoff: shipment.dropoff,
                measure: shipment.measure,
                distributor_name,
                distance_to_pickup_km,
                total_distance_km,
                estimated_earning: estimated_earning(total_distance_km),
            }
        })
        .collect();

    Ok(offers)
}
