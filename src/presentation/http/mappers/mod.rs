use crate::{
    application::usecases::create_callback::{CallOutcome, CreateCallbackResponse},
    domain::models::CallbackRequest,
    presentation::http::responses::{CallbackRequestDto, CreateCallbackResponseDto},
};

pub fn map_callback(request: &CallbackRequest) -> CallbackRequestDto {
    CallbackRequestDto {
        id: request.id,
        student_id: request.student_id,
        teacher_id: request.teacher_id,
        subject: request.subject.clone(),
        message: request.message.clone(),
        phone_number: request.phone_number.to_string(),
        status: request.status.into(),
        immediate_call: request.immediate_call,
        call_id: request.call_id.clone(),
        cancellation_reason: request.cancellation_reason.clone(),
        requested_date: request.requested_date.to_rfc3339(),
        scheduled_date: request.scheduled_date.map(|d| d.to_rfc3339()),
        completed_date: request.completed_date.map(|d| d.to_rfc3339()),
        created_at: request.created_at.to_rfc3339(),
        updated_at: request.updated_at.to_rfc3339(),
    }
}

pub fn map_created(response: &CreateCallbackResponse) -> CreateCallbackResponseDto {
    let (call_id, warning) = match &response.call {
        CallOutcome::NotRequested => (None, None),
        CallOutcome::Placed { call_id } => (Some(call_id.clone()), None),
        CallOutcome::Warning { reason } => (None, Some(reason.clone())),
    };
    CreateCallbackResponseDto {
        request: map_callback(&response.request),
        call_id,
        warning,
    }
}
