use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::notify::{self, Notification};
use crate::error::AppError;
use crate::models::document::{Document, DocumentType, VerificationStatus};
use crate::state::AppState;

/// Registers an uploaded document reference for a courier account. The file
/// itself lives in external storage; only the reference is kept here.
pub fn upload(
    state: &AppState,
    owner_id: Uuid,
    doc_type: DocumentType,
    file_url: String,
) -> Result<Document, AppError> {
    let owner = state
        .accounts
        .get(&owner_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("account {owner_id} not found")))?;

    if !owner.requires_document_gate() {
        return Err(AppError::NotAllowed(
            "only courier accounts carry verification documents".to_string(),
        ));
    }

    let document = Document {
        id: Uuid::new_v4(),
        owner: owner_id,
        doc_type,
        file_url,
        status: VerificationStatus::Pending,
        rejection_reason: None,
        uploaded_at: Utc::now(),
        verified_at: None,
    };

    state.documents.insert(document.id, document.clone());
    Ok(document)
}

/// The admin review queue: every document still awaiting a verdict.
pub fn pending_documents(state: &AppState) -> Vec<Document> {
    state
        .documents
        .iter()
        .filter(|entry| entry.value().status == VerificationStatus::Pending)
        .map(|entry| entry.value().clone())
        .collect()
}

/// Approves one document, then enables the owning account once its whole
/// document set is approved. Activation is never revoked afterwards.
pub fn approve(state: &AppState, document_id: Uuid) -> Result<Document, AppError> {
    let document = {
        let mut entry = state
            .documents
            .get_mut(&document_id)
            .ok_or_else(|| AppError::NotFound(format!("document {document_id} not found")))?;

        entry.status = VerificationStatus::Approved;
        entry.rejection_reason = None;
        entry.verified_at = Some(Utc::now());
        entry.clone()
    };

    info!(document_id = %document_id, owner = %document.owner, "document approved");

    activate_if_fully_verified(state, document.owner);

    Ok(document)
}

fn activate_if_fully_verified(state: &AppState, owner: Uuid) {
    let statuses: Vec<VerificationStatus> = state
        .documents
        .iter()
        .filter(|entry| entry.value().owner == owner)
        .map(|entry| entry.value().status)
        .collect();

    if statuses.is_empty()
        || statuses
            .iter()
            .any(|status| *status != VerificationStatus::Approved)
    {
        return;
    }

    if let Some(mut account) = state.accounts.get_mut(&owner) {
        if account.requires_document_gate() && !account.enabled {
            account.enabled = true;
            info!(account_id = %owner, "all documents approved, account activated");
        }
    }
}

/// Rejects one document with a reason. The owner keeps any activation
/// already granted; only the document itself is marked.
pub fn reject(state: &AppState, document_id: Uuid, reason: String) -> Result<Document, AppError> {
    let document = {
        let mut entry = state
            .documents
            .get_mut(&document_id)
            .ok_or_else(|| AppError::NotFound(format!("document {document_id} not found")))?;

        entry.status = VerificationStatus::Rejected;
        entry.rejection_reason = Some(reason.clone());
        entry.verified_at = Some(Utc::now());
        entry.clone()
    };

    warn!(document_id = %document_id, reason = %reason, "document rejected");

    notify::enqueue(
        state,
        Notification::DocumentRejected {
            document_id: document.id,
            owner: document.owner,
            doc_type: document.doc_type,
            reason,
        },
    );

    Ok(document)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{approve, pending_documents, reject, upload};
    use crate::error::AppError;
    use crate::models::account::{Account, CourierStatus, RoleProfile, VehicleType};
    use crate::models::document::{DocumentType, VerificationStatus};
    use crate::state::AppState;

    fn courier(id_seed: u128) -> Account {
        Account {
            id: Uuid::from_u128(id_seed),
            name: "test-courier".to_string(),
            email: "courier@example.com".to_string(),
            phone: "+90-555-111".to_string(),
            enabled: false,
            role: RoleProfile::Courier {
                status: CourierStatus::Offline,
                vehicle: VehicleType::Car,
                location: None,
            },
            registered_at: Utc::now(),
        }
    }

    fn distributor(id_seed: u128) -> Account {
        Account {
            id: Uuid::from_u128(id_seed),
            name: "test-distributor".to_string(),
            email: "distributor@example.com".to_string(),
            phone: "+90-555-222".to_string(),
            enabled: true,
            role: RoleProfile::Distributor,
            registered_at: Utc::now(),
        }
    }

    const REQUIRED: [DocumentType; 3] = [
        DocumentType::DriversLicense,
        DocumentType::VehicleRegistration,
        DocumentType::IdentityCard,
    ];

    #[test]
    fn account_enables_exactly_when_the_last_document_is_approved() {
        let (state, _rx) = AppState::new(16, 16, "test-key");
        let account = courier(1);
        state.accounts.insert(account.id, account.clone());

        let docs: Vec<_> = REQUIRED
            .iter()
            .map(|doc_type| {
                upload(&state, account.id, *doc_type, "file://doc".to_string()).unwrap()
            })
            .collect();

        approve(&state, docs[0].id).unwrap();
        approve(&state, docs[1].id).unwrap();
        assert!(!state.accounts.get(&account.id).unwrap().enabled);

        approve(&state, docs[2].id).unwrap();
        assert!(state.accounts.get(&account.id).unwrap().enabled);
    }

    #[test]
    fn an_account_with_no_documents_is_never_enabled_by_approval() {
        let (state, _rx) = AppState::new(16, 16, "test-key");
        let lone = courier(1);
        let other = courier(2);
        state.accounts.insert(lone.id, lone.clone());
        state.accounts.insert(other.id, other.clone());

        // Approving another courier's document must not touch `lone`.
        let doc = upload(&state, other.id, DocumentType::IdentityCard, "f".to_string()).unwrap();
        approve(&state, doc.id).unwrap();

        assert!(!state.accounts.get(&lone.id).unwrap().enabled);
        assert!(state.accounts.get(&other.id).unwrap().enabled);
    }

    #[test]
    fn a_pending_or_rejected_document_blocks_activation() {
        let (state, _rx) = AppState::new(16, 16, "test-key");
        let account = courier(1);
        state.accounts.insert(account.id, account.clone());

        let approved =
            upload(&state, account.id, DocumentType::DriversLicense, "f".to_string()).unwrap();
        let rejected =
            upload(&state, account.id, DocumentType::CriminalRecord, "f".to_string()).unwrap();

        approve(&state, approved.id).unwrap();
        reject(&state, rejected.id, "illegible scan".to_string()).unwrap();

        assert!(!state.accounts.get(&account.id).unwrap().enabled);

        let stored = state.documents.get(&rejected.id).unwrap();
        assert_eq!(stored.status, VerificationStatus::Rejected);
        assert_eq!(stored.rejection_reason.as_deref(), Some("illegible scan"));
        assert!(stored.verified_at.is_some());
    }

    #[test]
    fn rejection_after_activation_does_not_revoke() {
        let (state, _rx) = AppState::new(16, 16, "test-key");
        let account = courier(1);
        state.accounts.insert(account.id, account.clone());

        let doc =
            upload(&state, account.id, DocumentType::DriversLicense, "f".to_string()).unwrap();
        approve(&state, doc.id).unwrap();
        assert!(state.accounts.get(&account.id).unwrap().enabled);

        // A replacement upload that later gets rejected leaves the account on.
        let replacement =
            upload(&state, account.id, DocumentType::DriversLicense, "f2".to_string()).unwrap();
        reject(&state, replacement.id, "expired".to_string()).unwrap();

        assert!(state.accounts.get(&account.id).unwrap().enabled);
    }

    #[test]
    fn distributors_do_not_carry_documents() {
        let (state, _rx) = AppState::new(16, 16, "test-key");
        let account = distributor(1);
        state.accounts.insert(account.id, account.clone());

        let err = upload(&state, account.id, DocumentType::IdentityCard, "f".to_string())
            .unwrap_err();
        assert!(matches!(err, AppError::NotAllowed(_)));
    }

    #[test]
    fn pending_queue_shrinks_as_verdicts_land() {
        let (state, _rx) = AppState::new(16, 16, "test-key");
        let account = courier(1);
        state.accounts.insert(account.id, account.clone());

        let a = upload(&state, account.id, DocumentType::DriversLicense, "f".to_string()).unwrap();
        let b = upload(&state, account.id, DocumentType::IdentityCard, "f".to_string()).unwrap();
        assert_eq!(pending_documents(&state).len(), 2);

        approve(&state, a.id).unwrap();
        reject(&state, b.id, "blurry".to_string()).unwrap();
        assert!(pending_documents(&state).is_empty());
    }

    #[test]
    fn unknown_document_is_not_found() {
        let (state, _rx) = AppState::new(16, 16, "test-key");
        assert!(matches!(
            approve(&state, Uuid::from_u128(5)),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            reject(&state, Uuid::from_u128(5), "x".to_string()),
            Err(AppError::NotFound(_))
        ));
    }
}
