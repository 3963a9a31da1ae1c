use poem_openapi::Enum;

use crate::domain::models::CallbackStatus;

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum CallbackStatusKind {
    #[oai(rename = "PENDING")]
    Pending,
    #[oai(rename = "SCHEDULED")]
    Scheduled,
    #[oai(rename = "COMPLETED")]
    Completed,
    #[oai(rename = "CANCELLED")]
    Cancelled,
}

impl From<CallbackStatusKind> for CallbackStatus {
    fn from(value: CallbackStatusKind) -> Self {
        match value {
            CallbackStatusKind::Pending => CallbackStatus::Pending,
            CallbackStatusKind::Scheduled => CallbackStatus::Scheduled,
            CallbackStatusKind::Completed => CallbackStatus::Completed,
            CallbackStatusKind::Cancelled => CallbackStatus::Cancelled,
        }
    }
}

impl From<CallbackStatus> for CallbackStatusKind {
    fn from(value: CallbackStatus) -> Self {
        match value {
            CallbackStatus::Pending => CallbackStatusKind::Pending,
            CallbackStatus::Scheduled => CallbackStatusKind::Scheduled,
            CallbackStatus::Completed => CallbackStatusKind::Completed,
            CallbackStatus::Cancelled => CallbackStatusKind::Cancelled,
        }
    }
}
