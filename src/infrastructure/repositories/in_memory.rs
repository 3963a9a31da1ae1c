use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::{Context, bail};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    models::{CallbackRequest, CallbackStatus, Student, Teacher},
    repositories::{CallbackRequestRepository, RosterRepository},
};

#[derive(Default)]
pub struct InMemoryCallbackRequestRepository {
    requests: Arc<RwLock<HashMap<Uuid, CallbackRequest>>>,
}

impl InMemoryCallbackRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filtered(&self, keep: impl Fn(&CallbackRequest) -> bool) -> Vec<CallbackRequest> {
        let requests = self.requests.read().await;
        let mut matching: Vec<CallbackRequest> =
            requests.values().filter(|&r| keep(r)).cloned().collect();
        matching.sort_by(|a, b| b.requested_date.cmp(&a.requested_date));
        matching
    }
}

#[async_trait]
impl CallbackRequestRepository for InMemoryCallbackRequestRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<CallbackRequest>> {
        let requests = self.requests.read().await;
        Ok(requests.get(&id).cloned())
    }

    async fn find_by_student(&self, student_id: Uuid) -> anyhow::Result<Vec<CallbackRequest>> {
        Ok(self.filtered(|r| r.student_id == student_id).await)
    }

    async fn find_by_teacher(&self, teacher_id: Uuid) -> anyhow::Result<Vec<CallbackRequest>> {
        Ok(self.filtered(|r| r.teacher_id == teacher_id).await)
    }

    async fn insert(&self, request: &CallbackRequest) -> anyhow::Result<()> {
        let mut requests = self.requests.write().await;
        if requests.contains_key(&request.id) {
            anyhow::bail!("callback request {} already exists", request.id);
        }
        requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn save_if_status(
        &self,
        request: &CallbackRequest,
        expected: CallbackStatus,
    ) -> anyhow::Result<bool> {
        let mut requests = self.requests.write().await;
        match requests.get_mut(&request.id) {
            Some(stored) if stored.status == expected => {
                *stored = request.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryRosterRepository {
    students: Arc<RwLock<HashMap<Uuid, Student>>>,
    teachers: Arc<RwLock<HashMap<Uuid, Teacher>>>,
    assignments: Arc<RwLock<HashSet<(Uuid, Uuid)>>>,
}

impl InMemoryRosterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_student(&self, student: Student) {
        self.students.write().await.insert(student.id, student);
    }

    pub async fn add_teacher(&self, teacher: Teacher) {
        self.teachers.write().await.insert(teacher.id, teacher);
    }

    pub async fn assign(&self, student_id: Uuid, teacher_id: Uuid) {
        self.assignments.write().await.insert((student_id, teacher_id));
    }

    /// Loads a roster; every assignment must name a student and a teacher from the same seed.
    pub async fn seed(&self, seed: RosterSeed) -> anyhow::Result<()> {
        for assignment in &seed.assignments {
            if !seed.students.iter().any(|s| s.id == assignment.student_id) {
                bail!("assignment references unknown student {}", assignment.student_id);
            }
            if !seed.teachers.iter().any(|t| t.id == assignment.teacher_id) {
                bail!("assignment references unknown teacher {}", assignment.teacher_id);
            }
        }

        for student in seed.students {
            self.add_student(student).await;
        }
        for teacher in seed.teachers {
            self.add_teacher(teacher).await;
        }
        for assignment in seed.assignments {
            self.assign(assignment.student_id, assignment.teacher_id).await;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RosterSeed {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Deserialize)]
pub struct Assignment {
    pub student_id: Uuid,
    pub teacher_id: Uuid,
}

impl RosterSeed {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("invalid roster seed")
    }
}

#[async_trait]
impl RosterRepository for InMemoryRosterRepository {
    async fn find_student(&self, id: Uuid) -> anyhow::Result<Option<Student>> {
        Ok(self.students.read().await.get(&id).cloned())
    }

    async fn find_teacher(&self, id: Uuid) -> anyhow::Result<Option<Teacher>> {
        Ok(self.teachers.read().await.get(&id).cloned())
    }

    async fn is_assigned(&self, student_id: Uuid, teacher_id: Uuid) -> anyhow::Result<bool> {
        Ok(self
            .assignments
            .read()
            .await
            .contains(&(student_id, teacher_id)))
    }
}
