use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::account::{Account, CourierStatus, RoleProfile};
use crate::models::location::LocationInput;
use crate::state::AppState;

/// Overwrites a courier's operational status and last known position.
///
/// Any status is reachable from any other; the location record is created
/// on the first update and replaced in place afterwards.
pub fn set_status(
    state: &AppState,
    courier_id: Uuid,
    new_status: CourierStatus,
    position: LocationInput,
) -> Result<Account, AppError> {
    let mut entry = state
        .accounts
        .get_mut(&courier_id)
        .ok_or_else(|| AppError::NotFound(format!("courier {courier_id} not found")))?;

    let RoleProfile::Courier { status, location, .. } = &mut entry.role else {
        return Err(AppError::NotFound(format!("courier {courier_id} not found")));
    };

    *status = new_status;
    *location = Some(position.into_location(Utc::now()));

    Ok(entry.clone())
}
