use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{errors::DomainError, value_objects::PhoneNumber};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallbackStatus {
    Pending,
    Scheduled,
    Completed,
    Cancelled,
}

impl CallbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackStatus::Pending => "PENDING",
            CallbackStatus::Scheduled => "SCHEDULED",
            CallbackStatus::Completed => "COMPLETED",
            CallbackStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(CallbackStatus::Pending),
            "SCHEDULED" => Some(CallbackStatus::Scheduled),
            "COMPLETED" => Some(CallbackStatus::Completed),
            "CANCELLED" => Some(CallbackStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CallbackStatus::Completed | CallbackStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: CallbackStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (CallbackStatus::Pending, CallbackStatus::Scheduled)
                | (CallbackStatus::Pending, CallbackStatus::Cancelled)
                | (CallbackStatus::Scheduled, CallbackStatus::Cancelled | CallbackStatus::Completed)
        )
    }
}

impl fmt::Display for CallbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackRequest {
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub subject: String,
    pub message: String,
    pub requested_date: DateTime<Utc>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub phone_number: PhoneNumber,
    pub call_id: Option<String>,
    pub cancellation_reason: Option<String>,
    pub status: CallbackStatus,
    pub immediate_call: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Already-validated input for a fresh request.
#[derive(Debug, Clone)]
pub struct NewCallbackRequest {
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub subject: String,
    pub message: String,
    pub requested_date: DateTime<Utc>,
    pub phone_number: PhoneNumber,
    pub immediate_call: bool,
}

impl CallbackRequest {
    pub fn new(input: NewCallbackRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id: input.student_id,
            teacher_id: input.teacher_id,
            subject: input.subject,
            message: input.message,
            requested_date: input.requested_date,
            scheduled_date: None,
            completed_date: None,
            phone_number: input.phone_number,
            call_id: None,
            cancellation_reason: None,
            status: CallbackStatus::Pending,
            immediate_call: input.immediate_call,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_scheduled(&mut self, call_id: String, at: DateTime<Utc>) -> Result<(), DomainError> {
        self.ensure_can_move_to(CallbackStatus::Scheduled)?;
        if call_id.trim().is_empty() {
            return Err(DomainError::Validation(
                "call_id: a scheduled request needs the provider call id".to_string(),
            ));
        }
        self.status = CallbackStatus::Scheduled;
        self.call_id = Some(call_id);
        self.scheduled_date = Some(at);
        self.updated_at = at;
        Ok(())
    }

    pub fn cancel(&mut self, reason: String, at: DateTime<Utc>) -> Result<(), DomainError> {
        self.ensure_can_move_to(CallbackStatus::Cancelled)?;
        self.status = CallbackStatus::Cancelled;
        self.cancellation_reason = Some(reason);
        self.updated_at = at;
        Ok(())
    }

    pub fn complete(&mut self, at: DateTime<Utc>) -> Result<(), DomainError> {
        self.ensure_can_move_to(CallbackStatus::Completed)?;
        self.status = CallbackStatus::Completed;
        self.completed_date = Some(at);
        self.updated_at = at;
        Ok(())
    }

    fn ensure_can_move_to(&self, next: CallbackStatus) -> Result<(), DomainError> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(DomainError::invalid_transition(self.status, next))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> CallbackRequest {
        CallbackRequest::new(
            NewCallbackRequest {
                student_id: Uuid::new_v4(),
                teacher_id: Uuid::new_v4(),
                subject: "Help".to_string(),
                message: "Recursion is confusing".to_string(),
                requested_date: Utc::now(),
                phone_number: PhoneNumber::parse("8639391665").unwrap(),
                immediate_call: false,
            },
            Utc::now(),
        )
    }

    #[test]
    fn new_requests_start_pending_without_dates() {
        let request = pending();
        assert_eq!(request.status, CallbackStatus::Pending);
        assert!(request.scheduled_date.is_none());
        assert!(request.completed_date.is_none());
        assert!(request.call_id.is_none());
    }

    #[test]
    fn scheduling_sets_call_id_and_date() {
        let mut request = pending();
        let now = Utc::now();
        request.mark_scheduled("call-1".to_string(), now).unwrap();
        assert_eq!(request.status, CallbackStatus::Scheduled);
        assert_eq!(request.call_id.as_deref(), Some("call-1"));
        assert_eq!(request.scheduled_date, Some(now));
    }

    #[test]
    fn scheduling_rejects_blank_call_id() {
        let mut request = pending();
        let err = request.mark_scheduled("  ".to_string(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(request.status, CallbackStatus::Pending);
    }

    #[test]
    fn completing_requires_scheduled() {
        let mut request = pending();
        let err = request.complete(Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidTransition {
                current: CallbackStatus::Pending,
                requested: CallbackStatus::Completed
            }
        ));
        assert!(request.completed_date.is_none());

        request.mark_scheduled("call-1".to_string(), Utc::now()).unwrap();
        request.complete(Utc::now()).unwrap();
        assert_eq!(request.status, CallbackStatus::Completed);
        assert!(request.completed_date.is_some());
    }

    #[test]
    fn terminal_states_reject_everything() {
        for status in [CallbackStatus::Completed, CallbackStatus::Cancelled] {
            assert!(status.is_terminal());
            for next in [
                CallbackStatus::Pending,
                CallbackStatus::Scheduled,
                CallbackStatus::Completed,
                CallbackStatus::Cancelled,
            ] {
                assert!(!status.can_transition_to(next), "{status} -> {next}");
            }
        }
    }

    #[test]
    fn cancel_allowed_from_pending_and_scheduled_only() {
        let mut request = pending();
        request.cancel("no longer needed".to_string(), Utc::now()).unwrap();
        assert_eq!(request.cancellation_reason.as_deref(), Some("no longer needed"));
        assert!(request.cancel("again".to_string(), Utc::now()).is_err());
        assert_eq!(request.cancellation_reason.as_deref(), Some("no longer needed"));

        let mut scheduled = pending();
        scheduled.mark_scheduled("call-2".to_string(), Utc::now()).unwrap();
        scheduled.cancel("teacher away".to_string(), Utc::now()).unwrap();
        assert_eq!(scheduled.status, CallbackStatus::Cancelled);
    }

    #[test]
    fn status_strings_round_trip() {
        assert_eq!(CallbackStatus::from_str("SCHEDULED"), Some(CallbackStatus::Scheduled));
        assert_eq!(CallbackStatus::from_str("scheduled"), None);
        assert_eq!(CallbackStatus::Cancelled.as_str(), "CANCELLED");
    }
}
