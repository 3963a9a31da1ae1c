use chrono::{DateTime, Utc};
use poem_openapi::Object;
use uuid::Uuid;

#[derive(Object, Debug)]
pub struct CreateCallbackRequestDto {
    /// Defaults to the caller's own student id.
    pub student_id: Option<Uuid>,
    pub teacher_id: Uuid,
    #[oai(validator(max_length = 200))]
    pub subject: String,
    #[oai(validator(max_length = 4096))]
    pub message: String,
    /// Defaults to now.
    pub requested_date: Option<DateTime<Utc>>,
    #[oai(validator(max_length = 32))]
    pub phone_number: String,
    #[oai(default = "default_immediate_call")]
    pub immediate_call: bool,
}

fn default_immediate_call() -> bool {
    true
}

#[derive(Object, Debug, Default)]
pub struct CancelCallbackRequestDto {
    #[oai(validator(max_length = 500))]
    pub reason: Option<String>,
}
