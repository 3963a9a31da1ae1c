use crate::domain::models::{Actor, CallbackRequest, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOperation {
    View,
    Schedule,
    Cancel,
    Complete,
}

/// Single allow/deny decision shared by every lifecycle operation.
pub fn authorize(actor: &Actor, request: &CallbackRequest, operation: CallbackOperation) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Teacher => actor.teacher_id == Some(request.teacher_id),
        Role::Student => {
            actor.student_id == Some(request.student_id)
                && matches!(operation, CallbackOperation::View | CallbackOperation::Cancel)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{models::NewCallbackRequest, value_objects::PhoneNumber};

    fn request(student_id: Uuid, teacher_id: Uuid) -> CallbackRequest {
        CallbackRequest::new(
            NewCallbackRequest {
                student_id,
                teacher_id,
                subject: "Exam".to_string(),
                message: "Question about grading".to_string(),
                requested_date: Utc::now(),
                phone_number: PhoneNumber::parse("8639391665").unwrap(),
                immediate_call: false,
            },
            Utc::now(),
        )
    }

    const ALL: [CallbackOperation; 4] = [
        CallbackOperation::View,
        CallbackOperation::Schedule,
        CallbackOperation::Cancel,
        CallbackOperation::Complete,
    ];

    #[test]
    fn assigned_teacher_may_do_everything() {
        let teacher_id = Uuid::new_v4();
        let record = request(Uuid::new_v4(), teacher_id);
        let actor = Actor::teacher(Uuid::new_v4(), teacher_id);
        assert!(ALL.iter().all(|op| authorize(&actor, &record, *op)));
    }

    #[test]
    fn other_teacher_may_do_nothing() {
        let record = request(Uuid::new_v4(), Uuid::new_v4());
        let actor = Actor::teacher(Uuid::new_v4(), Uuid::new_v4());
        assert!(ALL.iter().all(|op| !authorize(&actor, &record, *op)));
    }

    #[test]
    fn requesting_student_may_view_and_cancel_only() {
        let student_id = Uuid::new_v4();
        let record = request(student_id, Uuid::new_v4());
        let actor = Actor::student(Uuid::new_v4(), student_id);
        assert!(authorize(&actor, &record, CallbackOperation::View));
        assert!(authorize(&actor, &record, CallbackOperation::Cancel));
        assert!(!authorize(&actor, &record, CallbackOperation::Schedule));
        assert!(!authorize(&actor, &record, CallbackOperation::Complete));
    }

    #[test]
    fn foreign_student_is_denied() {
        let record = request(Uuid::new_v4(), Uuid::new_v4());
        let actor = Actor::student(Uuid::new_v4(), Uuid::new_v4());
        assert!(!authorize(&actor, &record, CallbackOperation::View));
        assert!(!authorize(&actor, &record, CallbackOperation::Cancel));
    }

    #[test]
    fn admin_may_do_everything() {
        let record = request(Uuid::new_v4(), Uuid::new_v4());
        let actor = Actor::admin(Uuid::new_v4());
        assert!(ALL.iter().all(|op| authorize(&actor, &record, *op)));
    }
}
