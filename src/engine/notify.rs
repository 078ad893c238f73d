use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::document::DocumentType;
use crate::models::shipment::ShipmentStatus;
use crate::state::AppState;

/// Outbound messages triggered by domain operations. Delivery happens off
/// the request path; a failure here never fails the operation that raised
/// the notification.
#[derive(Debug, Clone)]
pub enum Notification {
    ShipmentAssigned {
        shipment_id: Uuid,
        tracking_code: String,
        courier_id: Uuid,
        distributor_id: Uuid,
    },
    ShipmentStatusChanged {
        shipment_id: Uuid,
        tracking_code: String,
        status: ShipmentStatus,
        distributor_id: Uuid,
    },
    DocumentRejected {
        document_id: Uuid,
        owner: Uuid,
        doc_type: DocumentType,
        reason: String,
    },
}

pub fn enqueue(state: &AppState, notification: Notification) {
    match state.notify_tx.try_send(notification) {
        Ok(()) => state.metrics.notifications_in_queue.inc(),
        Err(err) => warn!(error = %err, "notification dropped"),
    }
}

pub async fn run_notification_worker(state: Arc<AppState>, mut rx: mpsc::Receiver<Notification>) {
    info!("notification worker started");

    while let Some(notification) = rx.recv().await {
        state.metrics.notifications_in_queue.dec();

        if let Err(err) = deliver(&notification) {
            warn!(error = %err, "notification delivery failed");
        }
    }

    warn!("notification worker stopped: queue channel closed");
}

// The actual mail relay lives outside this service; delivery here is the
// hand-off log line.
fn deliver(notification: &Notification) -> Result<(), String> {
    match notification {
        Notification::ShipmentAssigned {
            shipment_id,
            tracking_code,
            courier_id,
            distributor_id,
        } => {
            info!(
                shipment_id = %shipment_id,
                tracking_code = %tracking_code,
                courier_id = %courier_id,
                distributor_id = %distributor_id,
                "assignment notification dispatched"
            );
        }
        Notification::ShipmentStatusChanged {
            shipment_id,
            tracking_code,
            status,
            distributor_id,
        } => {
            info!(
                shipment_id = %shipment_id,
                tracking_code = %tracking_code,
                status = ?status,
                distributor_id = %distributor_id,
                "status notification dispatched"
            );
        }
        Notification::DocumentRejected {
            document_id,
            owner,
            doc_type,
            reason,
        } => {
            info!(
                document_id = %document_id,
                owner = %owner,
                doc_type = ?doc_type,
                reason = %reason,
                "rejection notification dispatched"
            );
        }
    }

    Ok(())
}
