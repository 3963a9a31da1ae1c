use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    errors::DomainError,
    models::{Actor, CallbackRequest, CallbackStatus, Role},
    repositories::CallbackRequestRepository,
};

pub struct ListCallbacksUseCase {
    callbacks: Arc<dyn CallbackRequestRepository>,
}

#[derive(Debug, Default, Clone)]
pub struct ListCallbacksQuery {
    pub student_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub status: Option<CallbackStatus>,
}

impl ListCallbacksUseCase {
    pub fn new(callbacks: Arc<dyn CallbackRequestRepository>) -> Self {
        Self { callbacks }
    }

    pub async fn for_student(&self, student_id: Uuid) -> Result<Vec<CallbackRequest>, DomainError> {
        Ok(self.callbacks.find_by_student(student_id).await?)
    }

    pub async fn for_teacher(&self, teacher_id: Uuid) -> Result<Vec<CallbackRequest>, DomainError> {
        Ok(self.callbacks.find_by_teacher(teacher_id).await?)
    }

    /// Students and teachers always see their own requests; the other id
    /// and the status only narrow that list. Administrators must pick a side.
    pub async fn execute(
        &self,
        actor: &Actor,
        query: ListCallbacksQuery,
    ) -> Result<Vec<CallbackRequest>, DomainError> {
        let requests = match actor.role {
            Role::Student => {
                let own = actor.student_id.ok_or(DomainError::Unauthorized)?;
                if query.student_id.is_some_and(|id| id != own) {
                    return Err(DomainError::Unauthorized);
                }
                self.for_student(own).await?
            }
            Role::Teacher => {
                let own = actor.teacher_id.ok_or(DomainError::Unauthorized)?;
                if query.teacher_id.is_some_and(|id| id != own) {
                    return Err(DomainError::Unauthorized);
                }
                self.for_teacher(own).await?
            }
            Role::Admin => match (query.student_id, query.teacher_id) {
                (Some(student_id), _) => self.for_student(student_id).await?,
                (None, Some(teacher_id)) => self.for_teacher(teacher_id).await?,
                (None, None) => {
                    return Err(DomainError::Validation(
                        "student_id or teacher_id is required".to_string(),
                    ));
                }
            },
        };

        Ok(requests
            .into_iter()
            .filter(|r| query.student_id.is_none_or(|id| r.student_id == id))
            .filter(|r| query.teacher_id.is_none_or(|id| r.teacher_id == id))
            .filter(|r| query.status.is_none_or(|status| r.status == status))
            .collect())
    }
}
