use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    application::services::voice::{OutboundCall, VoiceCallProvider},
    domain::{
        errors::DomainError,
        models::{CallbackRequest, CallbackStatus},
        repositories::{CallbackRequestRepository, RosterRepository},
    },
};

/// Places the provider call for a PENDING request and records the result.
///
/// Used by explicit scheduling and by the immediate-call path of creation.
/// At most one call per request id is in flight within this process.
pub struct CallScheduler {
    callbacks: Arc<dyn CallbackRequestRepository>,
    roster: Arc<dyn RosterRepository>,
    provider: Arc<dyn VoiceCallProvider>,
    default_knowledge_base: Option<String>,
    in_flight: Mutex<HashSet<Uuid>>,
}

impl CallScheduler {
    pub fn new(
        callbacks: Arc<dyn CallbackRequestRepository>,
        roster: Arc<dyn RosterRepository>,
        provider: Arc<dyn VoiceCallProvider>,
        default_knowledge_base: Option<String>,
    ) -> Self {
        Self {
            callbacks,
            roster,
            provider,
            default_knowledge_base,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub async fn place_call(&self, request_id: Uuid) -> Result<CallbackRequest, DomainError> {
        let _claim = self.claim(request_id)?;

        // Read under the claim: a duplicate after a successful schedule sees SCHEDULED here.
        let mut request = self
            .callbacks
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("callback request {request_id}")))?;

        if request.status != CallbackStatus::Pending {
            return Err(DomainError::invalid_transition(
                request.status,
                CallbackStatus::Scheduled,
            ));
        }

        let teacher = self
            .roster
            .find_teacher(request.teacher_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("teacher {}", request.teacher_id)))?;

        let call = OutboundCall::for_request(&request, &teacher, self.default_knowledge_base.as_deref());

        let placed = self.provider.place_call(&call).await.map_err(|err| {
            warn!(request_id = %request_id, error = %err, "voice provider rejected call");
            DomainError::ExternalProvider(err.to_string())
        })?;

        request.mark_scheduled(placed.call_id.clone(), Utc::now())?;

        if !self
            .callbacks
            .save_if_status(&request, CallbackStatus::Pending)
            .await?
        {
            let current = self
                .callbacks
                .find_by_id(request_id)
                .await?
                .map(|stored| stored.status)
                .unwrap_or(CallbackStatus::Pending);
            warn!(
                request_id = %request_id,
                call_id = %placed.call_id,
                current = %current,
                "request changed while the call was being placed; provider call is orphaned"
            );
            return Err(DomainError::invalid_transition(current, CallbackStatus::Scheduled));
        }

        info!(
            request_id = %request_id,
            call_id = %placed.call_id,
            provider_status = %placed.status,
            "callback call scheduled"
        );
        Ok(request)
    }

    fn claim(&self, request_id: Uuid) -> Result<InFlightClaim<'_>, DomainError> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(request_id) {
            warn!(request_id = %request_id, "call already being placed for request");
            return Err(DomainError::CallInProgress(request_id));
        }
        Ok(InFlightClaim {
            in_flight: &self.in_flight,
            request_id,
        })
    }
}

struct InFlightClaim<'a> {
    in_flight: &'a Mutex<HashSet<Uuid>>,
    request_id: Uuid,
}

impl Drop for InFlightClaim<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.request_id);
    }
}
