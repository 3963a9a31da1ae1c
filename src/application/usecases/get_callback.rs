use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    errors::DomainError,
    models::{Actor, CallbackRequest},
    policies::CallbackOperation,
    repositories::CallbackRequestRepository,
};

use super::load_authorized;

pub struct GetCallbackUseCase {
    callbacks: Arc<dyn CallbackRequestRepository>,
}

impl GetCallbackUseCase {
    pub fn new(callbacks: Arc<dyn CallbackRequestRepository>) -> Self {
        Self { callbacks }
    }

    pub async fn execute(&self, request_id: Uuid, actor: &Actor) -> Result<CallbackRequest, DomainError> {
        load_authorized(
            self.callbacks.as_ref(),
            request_id,
            actor,
            CallbackOperation::View,
        )
        .await
    }
}
