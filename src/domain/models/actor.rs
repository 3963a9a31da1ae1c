use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

/// The already-authenticated principal behind a request.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
    pub student_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
}

impl Actor {
    pub fn student(user_id: Uuid, student_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Student,
            student_id: Some(student_id),
            teacher_id: None,
        }
    }

    pub fn teacher(user_id: Uuid, teacher_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Teacher,
            student_id: None,
            teacher_id: Some(teacher_id),
        }
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Admin,
            student_id: None,
            teacher_id: None,
        }
    }

    pub fn default_cancellation_reason(&self) -> &'static str {
        match self.role {
            Role::Student => "Cancelled by student",
            Role::Teacher => "Cancelled by teacher",
            Role::Admin => "Cancelled by administrator",
        }
    }
}
