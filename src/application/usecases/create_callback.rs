use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    application::services::call_scheduler::CallScheduler,
    domain::{
        errors::DomainError,
        models::{Actor, CallbackRequest, NewCallbackRequest, Role},
        repositories::{CallbackRequestRepository, RosterRepository},
        value_objects::PhoneNumber,
    },
};

pub struct CreateCallbackUseCase {
    callbacks: Arc<dyn CallbackRequestRepository>,
    roster: Arc<dyn RosterRepository>,
    scheduler: Arc<CallScheduler>,
}

pub struct CreateCallbackRequest {
    pub actor: Actor,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub subject: String,
    pub message: String,
    pub requested_date: DateTime<Utc>,
    pub phone_number: String,
    pub immediate_call: bool,
}

/// What happened to the best-effort call that may follow creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    NotRequested,
    Placed { call_id: String },
    Warning { reason: String },
}

/// The persisted record is always present; the call outcome never turns a
/// successful creation into a failure.
#[derive(Debug, Clone)]
pub struct CreateCallbackResponse {
    pub request: CallbackRequest,
    pub call: CallOutcome,
}

impl CreateCallbackUseCase {
    pub fn new(
        callbacks: Arc<dyn CallbackRequestRepository>,
        roster: Arc<dyn RosterRepository>,
        scheduler: Arc<CallScheduler>,
    ) -> Self {
        Self {
            callbacks,
            roster,
            scheduler,
        }
    }

    pub async fn execute(
        &self,
        request: CreateCallbackRequest,
    ) -> Result<CreateCallbackResponse, DomainError> {
        let subject = required("subject", &request.subject)?;
        let message = required("message", &request.message)?;
        let phone_number = PhoneNumber::parse(&request.phone_number)?;

        let acting_for_self = request.actor.role == Role::Student
            && request.actor.student_id == Some(request.student_id);
        if !(acting_for_self || request.actor.role == Role::Admin) {
            return Err(DomainError::Unauthorized);
        }

        self.ensure_assignment(request.student_id, request.teacher_id)
            .await?;

        let record = CallbackRequest::new(
            NewCallbackRequest {
                student_id: request.student_id,
                teacher_id: request.teacher_id,
                subject,
                message,
                requested_date: request.requested_date,
                phone_number,
                immediate_call: request.immediate_call,
            },
            Utc::now(),
        );
        self.callbacks.insert(&record).await?;
        info!(
            request_id = %record.id,
            student_id = %record.student_id,
            teacher_id = %record.teacher_id,
            immediate_call = record.immediate_call,
            "callback request created"
        );

        if !record.immediate_call {
            return Ok(CreateCallbackResponse {
                request: record,
                call: CallOutcome::NotRequested,
            });
        }

        match self.scheduler.place_call(record.id).await {
            Ok(scheduled) => {
                let call_id = scheduled.call_id.clone().unwrap_or_default();
                Ok(CreateCallbackResponse {
                    request: scheduled,
                    call: CallOutcome::Placed { call_id },
                })
            }
            Err(err) => {
                warn!(request_id = %record.id, error = %err, "immediate call was not placed");
                // The record may have moved on while the call was in flight.
                let current = self
                    .callbacks
                    .find_by_id(record.id)
                    .await
                    .ok()
                    .flatten()
                    .unwrap_or(record);
                Ok(CreateCallbackResponse {
                    request: current,
                    call: CallOutcome::Warning {
                        reason: err.to_string(),
                    },
                })
            }
        }
    }

    async fn ensure_assignment(&self, student_id: Uuid, teacher_id: Uuid) -> Result<(), DomainError> {
        if self.roster.find_student(student_id).await?.is_none() {
            return Err(DomainError::NotFound(format!("student {student_id}")));
        }
        if self.roster.find_teacher(teacher_id).await?.is_none() {
            return Err(DomainError::NotFound(format!("teacher {teacher_id}")));
        }
        if !self.roster.is_assigned(student_id, teacher_id).await? {
            return Err(DomainError::Unauthorized);
        }
        Ok(())
    }
}

fn required(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{field}: must not be empty")));
    }
    Ok(trimmed.to_string())
}
