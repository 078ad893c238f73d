use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::engine::notify::{self, Notification};
use crate::error::AppError;
use crate::models::shipment::{Shipment, ShipmentStatus};
use crate::state::AppState;

/// Moves an assigned shipment forward: `Assigned -> PickedUp` or
/// `PickedUp -> Delivered`, stamping the matching timestamp. Every other
/// `(current, target)` pair is rejected, as is a courier who does not own
/// the shipment.
pub fn advance(
    state: &AppState,
    shipment_id: Uuid,
    courier_id: Uuid,
    target: ShipmentStatus,
) -> Result<Shipment, AppError> {
    let updated = {
        let mut entry = state
            .shipments
            .get_mut(&shipment_id)
            .ok_or_else(|| AppError::NotFound(format!("shipment {shipment_id} not found")))?;

        if entry.assigned_courier != Some(courier_id) {
            return Err(AppError::NotAllowed(
                "shipment does not belong to this courier".to_string(),
            ));
        }

        validate_transition(entry.status, target)?;

        let now = Utc::now();
        entry.status = target;
        match target {
            ShipmentStatus::PickedUp => entry.picked_up_at = Some(now),
            ShipmentStatus::Delivered => entry.delivered_at = Some(now),
            _ => {}
        }
        entry.updated_at = now;
        entry.clone()
    };

    notify::enqueue(
        state,
        Notification::ShipmentStatusChanged {
            shipment_id: updated.id,
            tracking_code: updated.tracking_code.clone(),
            status: updated.status,
            distributor_id: updated.distributor_id,
        },
    );

    info!(
        shipment_id = %updated.id,
        courier_id = %courier_id,
        status = ?updated.status,
        "shipment status advanced"
    );

    Ok(updated)
}

fn validate_transition(current: ShipmentStatus, target: ShipmentStatus) -> Result<(), AppError> {
    match (current, target) {
        (ShipmentStatus::Assigned, ShipmentStatus::PickedUp)
        | (ShipmentStatus::PickedUp, ShipmentStatus::Delivered) => Ok(()),
        _ => Err(AppError::NotAllowed(format!(
            "cannot move shipment from {current:?} to {target:?}"
        ))),
    }
}

/// Cancels a shipment on behalf of its owning distributor. Legal only while
/// the shipment is still `Created` or `Assigned`.
pub fn cancel(
    state: &AppState,
    shipment_id: Uuid,
    distributor_id: Uuid,
) -> Result<Shipment, AppError> {
    let updated = {
        let mut entry = state
            .shipments
            .get_mut(&shipment_id)
            .ok_or_else(|| AppError::NotFound(format!("shipment {shipment_id} not found")))?;

        if entry.distributor_id != distributor_id {
            return Err(AppError::NotAllowed(
                "shipment does not belong to this distributor".to_string(),
            ));
        }

        match entry.status {
            ShipmentStatus::Created | ShipmentStatus::Assigned => {}
            _ => {
                return Err(AppError::NotAllowed(
                    "shipment cannot be cancelled in its current state".to_string(),
                ));
            }
        }

        entry.status = ShipmentStatus::Cancelled;
        // A courier reference only lives while the shipment is assigned,
        // picked up or delivered.
        entry.assigned_courier = None;
        entry.updated_at = Utc::now();
        entry.clone()
    };

    notify::enqueue(
        state,
        Notification::ShipmentStatusChanged {
            shipment_id: updated.id,
            tracking_code: updated.tracking_code.clone(),
            status: updated.status,
            distributor_id: updated.distributor_id,
        },
    );

    info!(shipment_id = %updated.id, "shipment cancelled");

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{advance, cancel};
    use crate::error::AppError;
    use crate::models::location::{GeoPoint, Location};
    use crate::models::shipment::{Measure, Shipment, ShipmentStatus, SizeClass};
    use crate::state::AppState;

    const DISTRIBUTOR: u128 = 900;
    const COURIER: u128 = 1;
    const OTHER_COURIER: u128 = 2;

    fn location(lat: f64, lng: f64) -> Location {
        Location {
            point: GeoPoint { lat, lng },
            address: None,
            city: None,
            district: None,
            postal_code: None,
            updated_at: Utc::now(),
        }
    }

    fn shipment_in(status: ShipmentStatus) -> Shipment {
        let assigned_courier = match status {
            ShipmentStatus::Assigned | ShipmentStatus::PickedUp | ShipmentStatus::Delivered => {
                Some(Uuid::from_u128(COURIER))
            }
            _ => None,
        };

        Shipment {
            id: Uuid::from_u128(10),
            pickup: location(40.05, 29.05),
            dropoff: location(40.2, 29.2),
            measure: Measure {
                weight: Some(3.0),
                width: None,
                length: None,
                height: None,
                size: SizeClass::Medium,
            },
            status,
            phone_number: "+90-555-000".to_string(),
            description: None,
            tracking_code: "CODE0010".to_string(),
            picked_up_at: None,
            delivered_at: None,
            distributor_id: Uuid::from_u128(DISTRIBUTOR),
            assigned_courier,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn state_with(status: ShipmentStatus) -> (crate::state::AppState, Uuid) {
        let (state, _rx) = AppState::new(16, 16, "test-key");
        let shipment = shipment_in(status);
        let id = shipment.id;
        state.shipments.insert(id, shipment);
        (state, id)
    }

    const ALL: [ShipmentStatus; 5] = [
        ShipmentStatus::Created,
        ShipmentStatus::Assigned,
        ShipmentStatus::PickedUp,
        ShipmentStatus::Delivered,
        ShipmentStatus::Cancelled,
    ];

    #[test]
    fn only_the_two_forward_pairs_are_accepted() {
        for current in ALL {
            for target in ALL {
                let (state, id) = state_with(current);
                let result = advance(&state, id, Uuid::from_u128(COURIER), target);

                let legal = matches!(
                    (current, target),
                    (ShipmentStatus::Assigned, ShipmentStatus::PickedUp)
                        | (ShipmentStatus::PickedUp, ShipmentStatus::Delivered)
                );

                if legal {
                    assert!(result.is_ok(), "{current:?} -> {target:?} should be legal");
                } else {
                    assert!(
                        matches!(result, Err(AppError::NotAllowed(_))),
                        "{current:?} -> {target:?} should be rejected"
                    );
                }
            }
        }
    }

    #[test]
    fn pickup_and_delivery_stamp_their_timestamps() {
        let (state, id) = state_with(ShipmentStatus::Assigned);
        let courier = Uuid::from_u128(COURIER);

        let picked = advance(&state, id, courier, ShipmentStatus::PickedUp).unwrap();
        assert!(picked.picked_up_at.is_some());
        assert!(picked.delivered_at.is_none());

        let delivered = advance(&state, id, courier, ShipmentStatus::Delivered).unwrap();
        assert!(delivered.picked_up_at.is_some());
        assert!(delivered.delivered_at.is_some());
    }

    #[test]
    fn non_owning_courier_is_rejected() {
        let (state, id) = state_with(ShipmentStatus::Assigned);
        let result = advance(
            &state,
            id,
            Uuid::from_u128(OTHER_COURIER),
            ShipmentStatus::PickedUp,
        );
        assert!(matches!(result, Err(AppError::NotAllowed(_))));
    }

    #[test]
    fn cancel_is_legal_from_created_and_assigned_only() {
        for status in ALL {
            let (state, id) = state_with(status);
            let result = cancel(&state, id, Uuid::from_u128(DISTRIBUTOR));

            match status {
                ShipmentStatus::Created | ShipmentStatus::Assigned => {
                    let cancelled = result.unwrap();
                    assert_eq!(cancelled.status, ShipmentStatus::Cancelled);
                    assert!(cancelled.assigned_courier.is_none());
                }
                _ => {
                    assert!(
                        matches!(result, Err(AppError::NotAllowed(_))),
                        "cancel from {status:?} should be rejected"
                    );
                }
            }
        }
    }

    #[test]
    fn cancel_checks_ownership() {
        let (state, id) = state_with(ShipmentStatus::Created);
        let result = cancel(&state, id, Uuid::from_u128(12345));
        assert!(matches!(result, Err(AppError::NotAllowed(_))));
    }

    #[test]
    fn unknown_shipment_is_not_found() {
        let (state, _id) = state_with(ShipmentStatus::Created);
        let result = advance(
            &state,
            Uuid::from_u128(999),
            Uuid::from_u128(COURIER),
            ShipmentStatus::PickedUp,
        );
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
