use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::location::Location;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CourierStatus {
    Inactive,
    Active,
    DestinationBased,
    Offline,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VehicleType {
    Motorcycle,
    Car,
    Van,
    Truck,
}

/// Role-specific payload, selected by the `role` tag. Capability checks are
/// plain predicates over the tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum RoleProfile {
    Courier {
        status: CourierStatus,
        vehicle: VehicleType,
        location: Option<Location>,
    },
    Distributor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Couriers start disabled and are flipped on by document verification;
    /// distributors are enabled from registration.
    pub enabled: bool,
    #[serde(flatten)]
    pub role: RoleProfile,
    pub registered_at: DateTime<Utc>,
}

impl Account {
    pub fn is_courier(&self) -> bool {
        matches!(self.role, RoleProfile::Courier { .. })
    }

    /// Only courier accounts sit behind the document-verification gate.
    pub fn requires_document_gate(&self) -> bool {
        self.is_courier()
    }

    pub fn courier_status(&self) -> Option<CourierStatus> {
        match &self.role {
            RoleProfile::Courier { status, .. } => Some(*status),
            RoleProfile::Distributor => None,
        }
    }

    pub fn courier_location(&self) -> Option<&Location> {
        match &self.role {
            RoleProfile::Courier { location, .. } => location.as_ref(),
            RoleProfile::Distributor => None,
        }
    }
}
