use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    errors::DomainError,
    models::{Actor, CallbackRequest},
    policies::CallbackOperation,
    repositories::CallbackRequestRepository,
};

use super::{commit_transition, load_authorized};

pub struct CancelCallbackUseCase {
    callbacks: Arc<dyn CallbackRequestRepository>,
}

pub struct CancelCallbackRequest {
    pub request_id: Uuid,
    pub actor: Actor,
    pub reason: Option<String>,
}

impl CancelCallbackUseCase {
    pub fn new(callbacks: Arc<dyn CallbackRequestRepository>) -> Self {
        Self { callbacks }
    }

    // An already-placed provider call is left alone.
    pub async fn execute(&self, request: CancelCallbackRequest) -> Result<CallbackRequest, DomainError> {
        let mut record = load_authorized(
            self.callbacks.as_ref(),
            request.request_id,
            &request.actor,
            CallbackOperation::Cancel,
        )
        .await?;

        let reason = request
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| request.actor.default_cancellation_reason().to_string());

        let previous = record.status;
        record.cancel(reason, Utc::now())?;
        commit_transition(self.callbacks.as_ref(), &record, previous).await?;

        info!(
            request_id = %record.id,
            from = %previous,
            role = ?request.actor.role,
            "callback request cancelled"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::testing::{FakeVoiceProvider, Fixture},
        domain::models::CallbackStatus,
    };

    fn cancel(actor: Actor, request_id: Uuid, reason: Option<&str>) -> CancelCallbackRequest {
        CancelCallbackRequest {
            request_id,
            actor,
            reason: reason.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn student_cancels_pending_with_default_reason() {
        let fx = Fixture::new(FakeVoiceProvider::succeeding()).await;
        let pending = fx.pending_request().await;
        let uc = CancelCallbackUseCase::new(fx.callbacks.clone());

        let cancelled = uc
            .execute(cancel(fx.student_actor(), pending.id, None))
            .await
            .unwrap();

        assert_eq!(cancelled.status, CallbackStatus::Cancelled);
        assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Cancelled by student"));
    }

    #[tokio::test]
    async fn teacher_cancels_scheduled_with_reason() {
        let fx = Fixture::new(FakeVoiceProvider::succeeding()).await;
        let pending = fx.pending_request().await;
        fx.scheduler.place_call(pending.id).await.unwrap();
        let uc = CancelCallbackUseCase::new(fx.callbacks.clone());

        let cancelled = uc
            .execute(cancel(fx.teacher_actor(), pending.id, Some("  Out sick  ")))
            .await
            .unwrap();

        assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Out sick"));
        let stored = fx.callbacks.find_by_id(pending.id).await.unwrap().unwrap();
        assert_eq!(stored.status, CallbackStatus::Cancelled);
        assert!(stored.call_id.is_some());
    }

    #[tokio::test]
    async fn blank_reason_falls_back_to_role_default() {
        let fx = Fixture::new(FakeVoiceProvider::succeeding()).await;
        let pending = fx.pending_request().await;
        let uc = CancelCallbackUseCase::new(fx.callbacks.clone());

        let cancelled = uc
            .execute(cancel(fx.teacher_actor(), pending.id, Some("   ")))
            .await
            .unwrap();

        assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Cancelled by teacher"));
    }

    #[tokio::test]
    async fn terminal_records_cannot_be_cancelled() {
        let fx = Fixture::new(FakeVoiceProvider::succeeding()).await;
        let pending = fx.pending_request().await;
        let uc = CancelCallbackUseCase::new(fx.callbacks.clone());

        uc.execute(cancel(fx.student_actor(), pending.id, None))
            .await
            .unwrap();
        let err = uc
            .execute(cancel(fx.teacher_actor(), pending.id, Some("again")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::InvalidTransition {
                current: CallbackStatus::Cancelled,
                requested: CallbackStatus::Cancelled
            }
        ));
        let stored = fx.callbacks.find_by_id(pending.id).await.unwrap().unwrap();
        assert_eq!(stored.cancellation_reason.as_deref(), Some("Cancelled by student"));
    }

    #[tokio::test]
    async fn completed_records_cannot_be_cancelled() {
        let fx = Fixture::new(FakeVoiceProvider::succeeding()).await;
        let pending = fx.pending_request().await;
        let mut completed = fx.scheduler.place_call(pending.id).await.unwrap();
        completed.complete(Utc::now()).unwrap();
        fx.callbacks
            .save_if_status(&completed, CallbackStatus::Scheduled)
            .await
            .unwrap();

        let err = CancelCallbackUseCase::new(fx.callbacks.clone())
            .execute(cancel(fx.student_actor(), pending.id, None))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::InvalidTransition {
                current: CallbackStatus::Completed,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn foreign_student_is_unauthorized() {
        let fx = Fixture::new(FakeVoiceProvider::succeeding()).await;
        let pending = fx.pending_request().await;

        let err = CancelCallbackUseCase::new(fx.callbacks.clone())
            .execute(cancel(
                Actor::student(Uuid::new_v4(), Uuid::new_v4()),
                pending.id,
                None,
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Unauthorized));
        let stored = fx.callbacks.find_by_id(pending.id).await.unwrap().unwrap();
        assert_eq!(stored.status, CallbackStatus::Pending);
    }
}
