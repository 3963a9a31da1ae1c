use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use crate::domain::{
    models::{CallbackRequest, CallbackStatus, Student, Teacher},
    repositories::{CallbackRequestRepository, RosterRepository},
    value_objects::PhoneNumber,
};

pub type PgPool = Pool<Postgres>;

const CALLBACK_COLUMNS: &str = r#"
    id, student_id, teacher_id, subject, message, requested_date, scheduled_date,
    completed_date, phone_number, call_id, cancellation_reason, status,
    immediate_call, created_at, updated_at
"#;

#[derive(Clone)]
pub struct PostgresCallbackRequestRepository {
    pool: PgPool,
}

impl PostgresCallbackRequestRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }

    async fn list_where(&self, column: &str, id: Uuid) -> anyhow::Result<Vec<CallbackRequest>> {
        let rows = sqlx::query_as::<_, CallbackRequestRecord>(&format!(
            "SELECT {CALLBACK_COLUMNS} FROM callback_requests WHERE {column} = $1 ORDER BY requested_date DESC"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(CallbackRequest::try_from).collect()
    }
}

#[async_trait]
impl CallbackRequestRepository for PostgresCallbackRequestRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<CallbackRequest>> {
        let record = sqlx::query_as::<_, CallbackRequestRecord>(&format!(
            "SELECT {CALLBACK_COLUMNS} FROM callback_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        record.map(CallbackRequest::try_from).transpose()
    }

    async fn find_by_student(&self, student_id: Uuid) -> anyhow::Result<Vec<CallbackRequest>> {
        self.list_where("student_id", student_id).await
    }

    async fn find_by_teacher(&self, teacher_id: Uuid) -> anyhow::Result<Vec<CallbackRequest>> {
        self.list_where("teacher_id", teacher_id).await
    }

    async fn insert(&self, request: &CallbackRequest) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO callback_requests (
                id, student_id, teacher_id, subject, message, requested_date, scheduled_date,
                completed_date, phone_number, call_id, cancellation_reason, status,
                immediate_call, created_at, updated_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15)
            "#,
        )
        .bind(request.id)
        .bind(request.student_id)
        .bind(request.teacher_id)
        .bind(&request.subject)
        .bind(&request.message)
        .bind(request.requested_date)
        .bind(request.scheduled_date)
        .bind(request.completed_date)
        .bind(request.phone_number.as_e164())
        .bind(&request.call_id)
        .bind(&request.cancellation_reason)
        .bind(request.status.as_str())
        .bind(request.immediate_call)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save_if_status(
        &self,
        request: &CallbackRequest,
        expected: CallbackStatus,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE callback_requests
            SET status = $3,
                scheduled_date = $4,
                completed_date = $5,
                call_id = $6,
                cancellation_reason = $7,
                updated_at = $8
            WHERE id = $1
              AND status = $2
            "#,
        )
        .bind(request.id)
        .bind(expected.as_str())
        .bind(request.status.as_str())
        .bind(request.scheduled_date)
        .bind(request.completed_date)
        .bind(&request.call_id)
        .bind(&request.cancellation_reason)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}

#[derive(Clone)]
pub struct PostgresRosterRepository {
    pool: PgPool,
}

impl PostgresRosterRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl RosterRepository for PostgresRosterRepository {
    async fn find_student(&self, id: Uuid) -> anyhow::Result<Option<Student>> {
        let record = sqlx::query_as::<_, StudentRecord>(
            r#"SELECT id, name, email FROM students WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record.map(Student::from))
    }

    async fn find_teacher(&self, id: Uuid) -> anyhow::Result<Option<Teacher>> {
        let record = sqlx::query_as::<_, TeacherRecord>(
            r#"SELECT id, name, email, knowledge_base_id FROM teachers WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record.map(Teacher::from))
    }

    async fn is_assigned(&self, student_id: Uuid, teacher_id: Uuid) -> anyhow::Result<bool> {
        let assigned: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM student_teachers
                WHERE student_id = $1 AND teacher_id = $2
            )
            "#,
        )
        .bind(student_id)
        .bind(teacher_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(assigned)
    }
}

#[derive(FromRow)]
struct CallbackRequestRecord {
    id: Uuid,
    student_id: Uuid,
    teacher_id: Uuid,
    subject: String,
    message: String,
    requested_date: DateTime<Utc>,
    scheduled_date: Option<DateTime<Utc>>,
    completed_date: Option<DateTime<Utc>>,
    phone_number: String,
    call_id: Option<String>,
    cancellation_reason: Option<String>,
    status: String,
    immediate_call: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CallbackRequestRecord> for CallbackRequest {
    type Error = anyhow::Error;

    fn try_from(value: CallbackRequestRecord) -> Result<Self, Self::Error> {
        let status = CallbackStatus::from_str(&value.status)
            .ok_or_else(|| anyhow::anyhow!("unknown callback status {}", value.status))?;
        let phone_number = PhoneNumber::parse(&value.phone_number)
            .map_err(|err| anyhow::anyhow!("stored phone number for {} is invalid: {err}", value.id))?;
        Ok(Self {
            id: value.id,
            student_id: value.student_id,
            teacher_id: value.teacher_id,
            subject: value.subject,
            message: value.message,
            requested_date: value.requested_date,
            scheduled_date: value.scheduled_date,
            completed_date: value.completed_date,
            phone_number,
            call_id: value.call_id,
            cancellation_reason: value.cancellation_reason,
            status,
            immediate_call: value.immediate_call,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[derive(FromRow)]
struct StudentRecord {
    id: Uuid,
    name: String,
    email: String,
}

impl From<StudentRecord> for Student {
    fn from(value: StudentRecord) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
        }
    }
}

#[derive(FromRow)]
struct TeacherRecord {
    id: Uuid,
    name: String,
    email: String,
    knowledge_base_id: Option<String>,
}

impl From<TeacherRecord> for Teacher {
    fn from(value: TeacherRecord) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            knowledge_base_id: value.knowledge_base_id,
        }
    }
}
