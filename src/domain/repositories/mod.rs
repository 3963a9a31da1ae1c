use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::{CallbackRequest, CallbackStatus, Student, Teacher};

#[async_trait]
pub trait CallbackRequestRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<CallbackRequest>>;

    /// Newest requested date first.
    async fn find_by_student(&self, student_id: Uuid) -> anyhow::Result<Vec<CallbackRequest>>;

    /// Newest requested date first.
    async fn find_by_teacher(&self, teacher_id: Uuid) -> anyhow::Result<Vec<CallbackRequest>>;

    async fn insert(&self, request: &CallbackRequest) -> anyhow::Result<()>;

    /// Writes `request` only while the stored status still equals `expected`.
    /// Returns `false` when the stored row had already moved on (or is gone).
    async fn save_if_status(
        &self,
        request: &CallbackRequest,
        expected: CallbackStatus,
    ) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait RosterRepository: Send + Sync {
    async fn find_student(&self, id: Uuid) -> anyhow::Result<Option<Student>>;
    async fn find_teacher(&self, id: Uuid) -> anyhow::Result<Option<Teacher>>;
    async fn is_assigned(&self, student_id: Uuid, teacher_id: Uuid) -> anyhow::Result<bool>;
}
