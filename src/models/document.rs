use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocumentType {
    DriversLicense,
    VehicleRegistration,
    IdentityCard,
    CriminalRecord,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

/// An uploaded verification document. Approved is terminal; a rejected
/// document stays Rejected and is superseded by uploading a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub owner: Uuid,
    pub doc_type: DocumentType,
    /// Opaque reference into the file store; uploads themselves are handled
    /// outside this service.
    pub file_url: String,
    pub status: VerificationStatus,
    pub rejection_reason: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}
