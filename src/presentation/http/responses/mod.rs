use poem_openapi::Object;
use uuid::Uuid;

use crate::presentation::models::CallbackStatusKind;

#[derive(Object)]
pub struct CallbackRequestDto {
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub subject: String,
    pub message: String,
    pub phone_number: String,
    pub status: CallbackStatusKind,
    pub immediate_call: bool,
    pub call_id: Option<String>,
    pub cancellation_reason: Option<String>,
    pub requested_date: String,
    pub scheduled_date: Option<String>,
    pub completed_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Object)]
pub struct CreateCallbackResponseDto {
    pub request: CallbackRequestDto,
    /// Set when the immediate call was placed.
    pub call_id: Option<String>,
    /// Set when the immediate call failed; the request itself was still created.
    pub warning: Option<String>,
}
