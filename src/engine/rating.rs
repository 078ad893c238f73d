use chrono::Utc;
use dashmap::mapref::entry::Entry;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::review::{Review, ReviewerKind};
use crate::models::shipment::ShipmentStatus;
use crate::state::AppState;

/// Records the single post-delivery review for a shipment, identified by its
/// public tracking code.
pub fn add_review(
    state: &AppState,
    tracking_code: &str,
    rating: u8,
    comment: Option<String>,
    reviewer: ReviewerKind,
) -> Result<Review, AppError> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::BadRequest(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    let shipment_id = state
        .tracking_index
        .get(tracking_code)
        .map(|entry| *entry.value())
        .ok_or_else(|| {
            AppError::NotFound(format!("no shipment with tracking code {tracking_code}"))
        })?;

    let shipment = state
        .shipments
        .get(&shipment_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("shipment {shipment_id} not found")))?;

    if shipment.status != ShipmentStatus::Delivered {
        return Err(AppError::NotAllowed(
            "shipment has not been delivered yet".to_string(),
        ));
    }

    let courier_id = shipment.assigned_courier.ok_or_else(|| {
        AppError::NotAllowed("no courier assigned to this shipment".to_string())
    })?;

    let review = match state.reviews.entry(shipment_id) {
        Entry::Occupied(_) => {
            return Err(AppError::NotAllowed(
                "shipment has already been reviewed".to_string(),
            ));
        }
        Entry::Vacant(vacant) => {
            let review = Review {
                id: Uuid::new_v4(),
                shipment_id,
                courier_id,
                rating,
                comment,
                reviewer,
                created_at: Utc::now(),
            };
            vacant.insert(review.clone());
            review
        }
    };

    let average = average_rating(state, courier_id);
    state
        .metrics
        .courier_rating
        .with_label_values(&[&courier_id.to_string()])
        .set(average);

    info!(
        shipment_id = %shipment_id,
        courier_id = %courier_id,
        rating,
        "review recorded"
    );

    Ok(review)
}

/// Arithmetic mean of a courier's review ratings; 0.0 with no reviews.
pub fn average_rating(state: &AppState, courier_id: Uuid) -> f64 {
    let (sum, count) = state
        .reviews
        .iter()
        .filter(|entry| entry.value().courier_id == courier_id)
        .fold((0u32, 0u32), |(sum, count), entry| {
            (sum + u32::from(entry.value().rating), count + 1)
        });

    if count == 0 {
        0.0
    } else {
        f64::from(sum) / f64::from(count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{add_review, average_rating};
    use crate::error::AppError;
    use crate::models::location::{GeoPoint, Location};
    use crate::models::review::ReviewerKind;
    use crate::models::shipment::{Measure, Shipment, ShipmentStatus, SizeClass};
    use crate::state::AppState;

    const COURIER: u128 = 1;

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

    fn shipment(id_seed: u128, status: ShipmentStatus, with_courier: bool) -> Shipment {
        Shipment {
            id: Uuid::from_u128(id_seed),
            pickup: location(40.05, 29.05),
            dropoff: location(40.2, 29.2),
            measure: Measure {
                weight: Some(1.0),
                width: None,
                length: None,
                height: None,
                size: SizeClass::Small,
            },
            status,
            phone_number: "+90-555-000".to_string(),
            description: None,
            tracking_code: format!("CODE{id_seed:04}"),
            picked_up_at: None,
            delivered_at: None,
            distributor_id: Uuid::from_u128(900),
            assigned_courier: with_courier.then(|| Uuid::from_u128(COURIER)),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn insert(state: &AppState, shipment: Shipment) -> String {
        let code = shipment.tracking_code.clone();
        state.tracking_index.insert(code.clone(), shipment.id);
        state.shipments.insert(shipment.id, shipment);
        code
    }

    #[test]
    fn review_before_delivery_is_rejected() {
        let (state, _rx) = AppState::new(16, 16, "test-key");
        let code = insert(&state, shipment(10, ShipmentStatus::PickedUp, true));

        let err = add_review(&state, &code, 5, None, ReviewerKind::Recipient).unwrap_err();
        assert!(matches!(err, AppError::NotAllowed(_)));
    }

    #[test]
    fn delivered_shipment_without_courier_is_rejected() {
        let (state, _rx) = AppState::new(16, 16, "test-key");
        let code = insert(&state, shipment(10, ShipmentStatus::Delivered, false));

        let err = add_review(&state, &code, 4, None, ReviewerKind::Recipient).unwrap_err();
        assert!(matches!(err, AppError::NotAllowed(_)));
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let (state, _rx) = AppState::new(16, 16, "test-key");
        let code = insert(&state, shipment(10, ShipmentStatus::Delivered, true));

        for rating in [0u8, 6, 200] {
            let err =
                add_review(&state, &code, rating, None, ReviewerKind::Recipient).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }

    #[test]
    fn one_review_per_shipment() {
        let (state, _rx) = AppState::new(16, 16, "test-key");
        let code = insert(&state, shipment(10, ShipmentStatus::Delivered, true));

        add_review(&state, &code, 5, None, ReviewerKind::Recipient).unwrap();
        let err = add_review(&state, &code, 1, None, ReviewerKind::Recipient).unwrap_err();
        assert!(matches!(err, AppError::NotAllowed(_)));
    }

    #[test]
    fn average_reflects_all_reviews_and_defaults_to_zero() {
        let (state, _rx) = AppState::new(16, 16, "test-key");
        let courier_id = Uuid::from_u128(COURIER);

        assert_eq!(average_rating(&state, courier_id), 0.0);

        let first = insert(&state, shipment(10, ShipmentStatus::Delivered, true));
        let second = insert(&state, shipment(11, ShipmentStatus::Delivered, true));

        add_review(&state, &first, 5, Some("quick".to_string()), ReviewerKind::Recipient)
            .unwrap();
        add_review(&state, &second, 2, None, ReviewerKind::Distributor).unwrap();

        assert_eq!(average_rating(&state, courier_id), 3.5);
    }

    #[test]
    fn unknown_tracking_code_is_not_found() {
        let (state, _rx) = AppState::new(16, 16, "test-key");
        let err = add_review(&state, "NOPE0000", 5, None, ReviewerKind::Recipient).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
