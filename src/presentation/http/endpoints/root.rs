use std::sync::Arc;

use poem_openapi::Tags;

use crate::application::{
    services::jwt::JwtService,
    usecases::{
        cancel_callback::CancelCallbackUseCase, complete_callback::CompleteCallbackUseCase,
        create_callback::CreateCallbackUseCase, get_callback::GetCallbackUseCase,
        list_callbacks::ListCallbacksUseCase, schedule_callback::ScheduleCallbackUseCase,
    },
};

#[derive(Clone)]
pub struct ApiState {
    pub create_callback_usecase: Arc<CreateCallbackUseCase>,
    pub schedule_callback_usecase: Arc<ScheduleCallbackUseCase>,
    pub cancel_callback_usecase: Arc<CancelCallbackUseCase>,
    pub complete_callback_usecase: Arc<CompleteCallbackUseCase>,
    pub get_callback_usecase: Arc<GetCallbackUseCase>,
    pub list_callbacks_usecase: Arc<ListCallbacksUseCase>,
    pub jwt: JwtService,
}

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
    Callbacks,
}
