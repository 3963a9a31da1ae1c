use std::sync::Arc;

use chrono::Utc;
use poem::{Error as PoemError, Result as PoemResult, http::StatusCode};
use poem_openapi::{
    OpenApi,
    param::{Path, Query},
    payload::Json,
};
use uuid::Uuid;

use crate::{
    application::usecases::{
        cancel_callback::CancelCallbackRequest, create_callback::CreateCallbackRequest,
        list_callbacks::ListCallbacksQuery,
    },
    domain::errors::DomainError,
    presentation::{
        http::{
            endpoints::root::{ApiState, EndpointsTags},
            mappers::{map_callback, map_created},
            requests::{CancelCallbackRequestDto, CreateCallbackRequestDto},
            responses::{CallbackRequestDto, CreateCallbackResponseDto},
            security::JwtAuth,
        },
        models::CallbackStatusKind,
    },
};

#[derive(Clone)]
pub struct CallbackEndpoints {
    state: Arc<ApiState>,
}

impl CallbackEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl CallbackEndpoints {
    #[oai(path = "/callbacks", method = "post", tag = EndpointsTags::Callbacks)]
    pub async fn create_callback(
        &self,
        auth: JwtAuth,
        request: Json<CreateCallbackRequestDto>,
    ) -> PoemResult<Json<CreateCallbackResponseDto>> {
        let actor = auth.into_actor(&self.state.jwt)?;
        let request = request.0;
        let student_id = request
            .student_id
            .or(actor.student_id)
            .ok_or_else(|| bad_request("student_id is required"))?;

        let payload = CreateCallbackRequest {
            actor,
            student_id,
            teacher_id: request.teacher_id,
            subject: request.subject,
            message: request.message,
            requested_date: request.requested_date.unwrap_or_else(Utc::now),
            phone_number: request.phone_number,
            immediate_call: request.immediate_call,
        };

        let response = self
            .state
            .create_callback_usecase
            .execute(payload)
            .await
            .map_err(domain_error)?;

        Ok(Json(map_created(&response)))
    }

    #[oai(path = "/callbacks", method = "get", tag = EndpointsTags::Callbacks)]
    pub async fn list_callbacks(
        &self,
        auth: JwtAuth,
        student_id: Query<Option<Uuid>>,
        teacher_id: Query<Option<Uuid>>,
        status: Query<Option<CallbackStatusKind>>,
    ) -> PoemResult<Json<Vec<CallbackRequestDto>>> {
        let actor = auth.into_actor(&self.state.jwt)?;
        let query = ListCallbacksQuery {
            student_id: student_id.0,
            teacher_id: teacher_id.0,
            status: status.0.map(Into::into),
        };

        let requests = self
            .state
            .list_callbacks_usecase
            .execute(&actor, query)
            .await
            .map_err(domain_error)?;

        Ok(Json(requests.iter().map(map_callback).collect()))
    }

    #[oai(path = "/callbacks/:id", method = "get", tag = EndpointsTags::Callbacks)]
    pub async fn get_callback(
        &self,
        auth: JwtAuth,
        id: Path<Uuid>,
    ) -> PoemResult<Json<CallbackRequestDto>> {
        let actor = auth.into_actor(&self.state.jwt)?;

        let request = self
            .state
            .get_callback_usecase
            .execute(id.0, &actor)
            .await
            .map_err(domain_error)?;

        Ok(Json(map_callback(&request)))
    }

    #[oai(
        path = "/callbacks/:id/schedule",
        method = "post",
        tag = EndpointsTags::Callbacks,
    )]
    pub async fn schedule_callback(
        &self,
        auth: JwtAuth,
        id: Path<Uuid>,
    ) -> PoemResult<Json<CallbackRequestDto>> {
        let actor = auth.into_actor(&self.state.jwt)?;

        let request = self
            .state
            .schedule_callback_usecase
            .execute(id.0, &actor)
            .await
            .map_err(domain_error)?;

        Ok(Json(map_callback(&request)))
    }

    #[oai(
        path = "/callbacks/:id/cancel",
        method = "post",
        tag = EndpointsTags::Callbacks,
    )]
    pub async fn cancel_callback(
        &self,
        auth: JwtAuth,
        id: Path<Uuid>,
        request: Json<CancelCallbackRequestDto>,
    ) -> PoemResult<Json<CallbackRequestDto>> {
        let actor = auth.into_actor(&self.state.jwt)?;

        let cancelled = self
            .state
            .cancel_callback_usecase
            .execute(CancelCallbackRequest {
                request_id: id.0,
                actor,
                reason: request.0.reason,
            })
            .await
            .map_err(domain_error)?;

        Ok(Json(map_callback(&cancelled)))
    }

    #[oai(
        path = "/callbacks/:id/complete",
        method = "post",
        tag = EndpointsTags::Callbacks,
    )]
    pub async fn complete_callback(
        &self,
        auth: JwtAuth,
        id: Path<Uuid>,
    ) -> PoemResult<Json<CallbackRequestDto>> {
        let actor = auth.into_actor(&self.state.jwt)?;

        let request = self
            .state
            .complete_callback_usecase
            .execute(id.0, &actor)
            .await
            .map_err(domain_error)?;

        Ok(Json(map_callback(&request)))
    }
}

fn domain_error(err: DomainError) -> PoemError {
    let status = match &err {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized => StatusCode::FORBIDDEN,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::InvalidTransition { .. } | DomainError::CallInProgress(_) => StatusCode::CONFLICT,
        DomainError::ExternalProvider(_) => StatusCode::BAD_GATEWAY,
        DomainError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if let DomainError::Other(inner) = &err {
        tracing::error!(error = ?inner, "callback request failed");
        return PoemError::from_string("internal error", status);
    }
    PoemError::from_string(err.to_string(), status)
}

fn bad_request(message: &str) -> PoemError {
    PoemError::from_string(message, StatusCode::BAD_REQUEST)
}
