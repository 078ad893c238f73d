use crate::geo::haversine_km;
use crate::models::account::{Account, CourierStatus, RoleProfile};
use crate::models::location::GeoPoint;
use crate::models::shipment::{Shipment, ShipmentStatus};
use crate::state::AppState;

// Slightly below the true km-per-degree so the box never clips a point the
// exact distance check would keep.
const KM_PER_DEGREE: f64 = 110.0;

fn within_radius(center: &GeoPoint, radius_km: f64, candidate: &GeoPoint) -> bool {
    let lat_window = radius_km / KM_PER_DEGREE;
    let lng_window = radius_km / (KM_PER_DEGREE * center.lat.to_radians().cos().abs().max(0.01));

    if (candidate.lat - center.lat).abs() > lat_window {
        return false;
    }
    if (candidate.lng - center.lng).abs() > lng_window {
        return false;
    }

    haversine_km(center, candidate) <= radius_km
}

/// Shipments still waiting for a courier whose pickup point lies within
/// `radius_km` of `center`. Unordered.
pub fn pending_shipments_near(state: &AppState, center: &GeoPoint, radius_km: f64) -> Vec<Shipment> {
    state
        .shipments
        .iter()
        .filter(|entry| {
            let shipment = entry.value();
            shipment.status == ShipmentStatus::Created
                && within_radius(center, radius_km, &shipment.pickup.point)
        })
        .map(|entry| entry.value().clone())
        .collect()
}

/// Couriers currently in `Active` status with a known position within
/// `radius_km` of `center`. Unordered.
pub fn available_couriers_near(state: &AppState, center: &GeoPoint, radius_km: f64) -> Vec<Account> {
    state
        .accounts
        .iter()
        .filter(|entry| match &entry.value().role {
            RoleProfile::Courier { status, location, .. } => {
                *status == CourierStatus::Active
                    && location
                        .as_ref()
                        .is_some_and(|loc| within_radius(center, radius_km, &loc.point))
            }
            RoleProfile::Distributor => false,
        })
        .map(|entry| entry.value().clone())
        .collect()
}

/// Every courier in `Active` status, regardless of position. Consumed by the
/// internal machine-to-machine listing.
pub fn available_couriers(state: &AppState) -> Vec<Account> {
    state
        .accounts
        .iter()
        .filter(|entry| entry.value().courier_status() == Some(CourierStatus::Active))
        .map(|entry| entry.value().clone())
        .collect()
}
