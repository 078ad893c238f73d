use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::location::Location;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShipmentStatus {
    Created,
    Assigned,
    PickedUp,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measure {
    pub weight: Option<f64>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub height: Option<f64>,
    pub size: SizeClass,
}

/// A single parcel movement request from pickup to dropoff.
///
/// `assigned_courier` is `Some` exactly while the status is one of
/// Assigned, PickedUp or Delivered; a shipment is claimed by at most one
/// courier over its whole life.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub id: Uuid,
    pub pickup: Location,
    pub dropoff: Location,
    pub measure: Measure,
    pub status: ShipmentStatus,
    pub phone_number: String,
    /// Free-text description; the public delivery-note write path
    /// overwrites this same field.
    pub description: Option<String>,
    /// Public tracking token, unique across shipments.
    pub tracking_code: String,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub distributor_id: Uuid,
    pub assigned_courier: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
