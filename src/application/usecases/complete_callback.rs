use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    errors::DomainError,
    models::{Actor, CallbackRequest, CallbackStatus},
    policies::CallbackOperation,
    repositories::CallbackRequestRepository,
};

use super::{commit_transition, load_authorized};

pub struct CompleteCallbackUseCase {
    callbacks: Arc<dyn CallbackRequestRepository>,
}

impl CompleteCallbackUseCase {
    pub fn new(callbacks: Arc<dyn CallbackRequestRepository>) -> Self {
        Self { callbacks }
    }

    pub async fn execute(&self, request_id: Uuid, actor: &Actor) -> Result<CallbackRequest, DomainError> {
        let mut record = load_authorized(
            self.callbacks.as_ref(),
            request_id,
            actor,
            CallbackOperation::Complete,
        )
        .await?;

        record.complete(Utc::now())?;
        commit_transition(self.callbacks.as_ref(), &record, CallbackStatus::Scheduled).await?;

        info!(request_id = %record.id, call_id = ?record.call_id, "callback request completed");
        Ok(record)
    }
}
