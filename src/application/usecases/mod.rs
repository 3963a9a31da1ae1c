pub mod cancel_callback;
pub mod complete_callback;
pub mod create_callback;
pub mod get_callback;
pub mod list_callbacks;
pub mod schedule_callback;

use uuid::Uuid;

use crate::domain::{
    errors::DomainError,
    models::{Actor, CallbackRequest, CallbackStatus},
    policies::{CallbackOperation, authorize},
    repositories::CallbackRequestRepository,
};

async fn load_authorized(
    repo: &dyn CallbackRequestRepository,
    request_id: Uuid,
    actor: &Actor,
    operation: CallbackOperation,
) -> Result<CallbackRequest, DomainError> {
    let request = repo
        .find_by_id(request_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("callback request {request_id}")))?;

    if !authorize(actor, &request, operation) {
        return Err(DomainError::Unauthorized);
    }
    Ok(request)
}

/// Persists a transition that was applied in memory, failing if the stored
/// status moved away from `expected` in the meantime.
async fn commit_transition(
    repo: &dyn CallbackRequestRepository,
    request: &CallbackRequest,
    expected: CallbackStatus,
) -> Result<(), DomainError> {
    if repo.save_if_status(request, expected).await? {
        return Ok(());
    }
    let current = repo
        .find_by_id(request.id)
        .await?
        .map(|stored| stored.status)
        .unwrap_or(expected);
    Err(DomainError::invalid_transition(current, request.status))
}
