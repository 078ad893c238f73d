use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A point plus whatever address detail the caller supplied. Shipments own
/// two of these (pickup and dropoff); a courier owns at most one, overwritten
/// in place on every status update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    #[serde(flatten)]
    pub point: GeoPoint,
    pub address: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub postal_code: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationInput {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

impl LocationInput {
    pub fn into_location(self, now: DateTime<Utc>) -> Location {
        Location {
            point: GeoPoint {
                lat: self.lat,
                lng: self.lng,
            },
            address: self.address,
            city: self.city,
            district: self.district,
            postal_code: self.postal_code,
            updated_at: now,
        }
    }
}
