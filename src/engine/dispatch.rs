use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::engine::notify::{self, Notification};
use crate::error::AppError;
use crate::models::shipment::{Shipment, ShipmentStatus};
use crate::state::AppState;

/// Broadcast to websocket subscribers when a shipment is claimed.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchEvent {
    pub shipment_id: Uuid,
    pub courier_id: Uuid,
    pub tracking_code: String,
    pub assigned_at: DateTime<Utc>,
}

/// Exclusive accept: claims a `Created` shipment for one courier.
///
/// The status check and the write happen under the store's entry guard for
/// the shipment, so of two concurrent callers exactly one sees `Created`;
/// the loser gets `NotAllowed`.
pub fn accept_offer(
    state: &AppState,
    shipment_id: Uuid,
    courier_id: Uuid,
) -> Result<Shipment, AppError> {
    let courier = state
        .accounts
        .get(&courier_id)
        .map(|entry| entry.value().clone())
        .filter(|account| account.is_courier())
        .ok_or_else(|| AppError::NotFound(format!("courier {courier_id} not found")))?;

    if !courier.enabled {
        return Err(AppError::UserNotActive);
    }

    let start = Instant::now();

    let updated = {
        let mut entry = state
            .shipments
            .get_mut(&shipment_id)
            .ok_or_else(|| AppError::NotFound(format!("shipment {shipment_id} not found")))?;

        if entry.status != ShipmentStatus::Created {
            record_outcome(state, start, "rejected");
            return Err(AppError::NotAllowed(
                "shipment is not available for acceptance".to_string(),
            ));
        }

        entry.assigned_courier = Some(courier_id);
        entry.status = ShipmentStatus::Assigned;
        entry.updated_at = Utc::now();
        entry.clone()
    };

    record_outcome(state, start, "success");

    let event = DispatchEvent {
        shipment_id: updated.id,
        courier_id,
        tracking_code: updated.tracking_code.clone(),
        assigned_at: updated.updated_at,
    };
    let _ = state.dispatch_events_tx.send(event);

    notify::enqueue(
        state,
        Notification::ShipmentAssigned {
            shipment_id: updated.id,
            tracking_code: updated.tracking_code.clone(),
            courier_id,
            distributor_id: updated.distributor_id,
        },
    );

    info!(
        shipment_id = %updated.id,
        courier_id = %courier_id,
        "shipment assigned"
    );

    Ok(updated)
}

fn record_outcome(state: &AppState, start: Instant, outcome: &str) {
    let elapsed = start.elapsed().as_secs_f64();
    state
        .metrics
        .dispatch_latency_seconds
        .with_label_values(&[outcome])
        .observe(elapsed);
    state
        .metrics
        .dispatch_total
        .with_label_values(&[outcome])
        .inc();
}
