use std::sync::Arc;

use uuid::Uuid;

use crate::{
    application::services::call_scheduler::CallScheduler,
    domain::{
        errors::DomainError,
        models::{Actor, CallbackRequest},
        policies::CallbackOperation,
        repositories::CallbackRequestRepository,
    },
};

use super::load_authorized;

pub struct ScheduleCallbackUseCase {
    callbacks: Arc<dyn CallbackRequestRepository>,
    scheduler: Arc<CallScheduler>,
}

impl ScheduleCallbackUseCase {
    pub fn new(callbacks: Arc<dyn CallbackRequestRepository>, scheduler: Arc<CallScheduler>) -> Self {
        Self {
            callbacks,
            scheduler,
        }
    }

    /// Provider failures come back as a retryable error with the record untouched;
    /// re-invoking is the caller's decision.
    pub async fn execute(&self, request_id: Uuid, actor: &Actor) -> Result<CallbackRequest, DomainError> {
        load_authorized(
            self.callbacks.as_ref(),
            request_id,
            actor,
            CallbackOperation::Schedule,
        )
        .await?;

        self.scheduler.place_call(request_id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{
        application::testing::{FakeVoiceProvider, Fixture},
        domain::models::CallbackStatus,
    };

    fn use_case(fx: &Fixture) -> ScheduleCallbackUseCase {
        ScheduleCallbackUseCase::new(fx.callbacks.clone(), fx.scheduler.clone())
    }

    #[tokio::test]
    async fn assigned_teacher_schedules() {
        let fx = Fixture::new(FakeVoiceProvider::succeeding()).await;
        let pending = fx.pending_request().await;

        let scheduled = use_case(&fx)
            .execute(pending.id, &fx.teacher_actor())
            .await
            .unwrap();

        assert_eq!(scheduled.status, CallbackStatus::Scheduled);
        assert!(scheduled.call_id.is_some());
        assert_eq!(fx.provider.placed(), 1);
    }

    #[tokio::test]
    async fn student_may_not_schedule() {
        let fx = Fixture::new(FakeVoiceProvider::succeeding()).await;
        let pending = fx.pending_request().await;

        let err = use_case(&fx)
            .execute(pending.id, &fx.student_actor())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Unauthorized));
        assert_eq!(fx.provider.attempts(), 0);
    }

    #[tokio::test]
    async fn non_pending_records_are_left_unchanged() {
        let fx = Fixture::new(FakeVoiceProvider::succeeding()).await;
        let uc = use_case(&fx);

        let mut cancelled = fx.pending_request().await;
        cancelled.cancel("Cancelled by student".to_string(), Utc::now()).unwrap();
        fx.callbacks
            .save_if_status(&cancelled, CallbackStatus::Pending)
            .await
            .unwrap();

        let err = uc.execute(cancelled.id, &fx.teacher_actor()).await.unwrap_err();

        assert!(matches!(
            err,
            DomainError::InvalidTransition {
                current: CallbackStatus::Cancelled,
                requested: CallbackStatus::Scheduled
            }
        ));
        let stored = fx.callbacks.find_by_id(cancelled.id).await.unwrap().unwrap();
        assert_eq!(stored.status, CallbackStatus::Cancelled);
        assert_eq!(stored.updated_at, cancelled.updated_at);
        assert_eq!(fx.provider.attempts(), 0);
    }

    #[tokio::test]
    async fn scheduling_twice_places_one_call() {
        let fx = Fixture::new(FakeVoiceProvider::succeeding()).await;
        let pending = fx.pending_request().await;
        let uc = use_case(&fx);
        let teacher = fx.teacher_actor();

        let first = uc.execute(pending.id, &teacher).await.unwrap();
        let second = uc.execute(pending.id, &teacher).await;

        assert!(matches!(second, Err(DomainError::InvalidTransition { .. })));
        assert_eq!(fx.provider.attempts(), 1);
        let stored = fx.callbacks.find_by_id(pending.id).await.unwrap().unwrap();
        assert_eq!(stored.call_id, first.call_id);
    }

    #[tokio::test]
    async fn provider_failure_is_retryable() {
        let fx = Fixture::new(FakeVoiceProvider::failing("503 from provider")).await;
        let pending = fx.pending_request().await;

        let err = use_case(&fx)
            .execute(pending.id, &fx.teacher_actor())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::ExternalProvider(_)));
        let stored = fx.callbacks.find_by_id(pending.id).await.unwrap().unwrap();
        assert_eq!(stored.status, CallbackStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_request_is_not_found() {
        let fx = Fixture::new(FakeVoiceProvider::succeeding()).await;
        let err = use_case(&fx)
            .execute(Uuid::new_v4(), &fx.teacher_actor())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
