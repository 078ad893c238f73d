use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReviewerKind {
    Recipient,
    Distributor,
}

/// Post-delivery rating for the courier who carried a shipment. Exactly one
/// review may exist per shipment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub courier_id: Uuid,
    pub rating: u8,
    pub comment: Option<String>,
    pub reviewer: ReviewerKind,
    pub created_at: DateTime<Utc>,
}
