use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::models::{CallbackRequest, Teacher};

/// Everything the provider needs to dial out for one callback request.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundCall {
    pub phone_number: String,
    pub task: String,
    pub first_sentence: String,
    pub knowledge_base: Option<String>,
    pub metadata: CallMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallMetadata {
    pub callback_request_id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
}

/// Provider acknowledgement that the call was queued, not that it finished.
#[derive(Debug, Clone)]
pub struct PlacedCall {
    pub call_id: String,
    pub status: String,
}

#[async_trait]
pub trait VoiceCallProvider: Send + Sync {
    async fn place_call(&self, call: &OutboundCall) -> anyhow::Result<PlacedCall>;
}

impl OutboundCall {
    pub fn for_request(
        request: &CallbackRequest,
        teacher: &Teacher,
        default_knowledge_base: Option<&str>,
    ) -> Self {
        let knowledge_base = teacher
            .knowledge_base_id
            .clone()
            .or_else(|| default_knowledge_base.map(str::to_string));

        let task = format!(
            "You are a teaching assistant calling a student on behalf of Professor {teacher}. \
             The student asked for help with \"{subject}\" and wrote: \"{message}\". \
             Answer their questions using Professor {teacher}'s knowledge base, explain step by step, \
             check that the student understood, and tell them that anything you cannot resolve \
             will be passed back to the professor.",
            teacher = teacher.name,
            subject = request.subject,
            message = request.message,
        );
        let first_sentence = format!(
            "Hello, I'm calling on behalf of Professor {} about your question on {}.",
            teacher.name, request.subject
        );

        Self {
            phone_number: request.phone_number.as_e164().to_string(),
            task,
            first_sentence,
            knowledge_base,
            metadata: CallMetadata {
                callback_request_id: request.id,
                student_id: request.student_id,
                teacher_id: request.teacher_id,
            },
        }
    }
}
