//! Fixtures shared by the use-case tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    application::services::{
        call_scheduler::CallScheduler,
        voice::{OutboundCall, PlacedCall, VoiceCallProvider},
    },
    domain::{
        models::{Actor, CallbackRequest, NewCallbackRequest, Student, Teacher},
        repositories::CallbackRequestRepository,
        value_objects::PhoneNumber,
    },
    infrastructure::repositories::in_memory::{
        InMemoryCallbackRequestRepository, InMemoryRosterRepository,
    },
};

pub struct FakeVoiceProvider {
    fail_with: Option<String>,
    delay: Option<Duration>,
    placed: AtomicUsize,
    calls: Mutex<Vec<OutboundCall>>,
}

impl FakeVoiceProvider {
    pub fn succeeding() -> Self {
        Self {
            fail_with: None,
            delay: None,
            placed: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            ..Self::succeeding()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::succeeding()
        }
    }

    pub fn attempts(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn placed(&self) -> usize {
        self.placed.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<OutboundCall> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl VoiceCallProvider for FakeVoiceProvider {
    async fn place_call(&self, call: &OutboundCall) -> anyhow::Result<PlacedCall> {
        self.calls.lock().unwrap().push(call.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = &self.fail_with {
            anyhow::bail!("{reason}");
        }
        let n = self.placed.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PlacedCall {
            call_id: format!("call-{n}"),
            status: "queued".to_string(),
        })
    }
}

pub struct Fixture {
    pub callbacks: Arc<InMemoryCallbackRequestRepository>,
    pub roster: Arc<InMemoryRosterRepository>,
    pub provider: Arc<FakeVoiceProvider>,
    pub scheduler: Arc<CallScheduler>,
    pub student: Student,
    pub teacher: Teacher,
}

impl Fixture {
    /// One student assigned to one teacher.
    pub async fn new(provider: FakeVoiceProvider) -> Self {
        let callbacks = Arc::new(InMemoryCallbackRequestRepository::new());
        let roster = Arc::new(InMemoryRosterRepository::new());
        let provider = Arc::new(provider);

        let student = Student {
            id: Uuid::new_v4(),
            name: "Grace Hopper".to_string(),
            email: "grace@example.edu".to_string(),
        };
        let teacher = Teacher {
            id: Uuid::new_v4(),
            name: "Alan Turing".to_string(),
            email: "alan@example.edu".to_string(),
            knowledge_base_id: Some("kb-turing".to_string()),
        };
        roster.add_student(student.clone()).await;
        roster.add_teacher(teacher.clone()).await;
        roster.assign(student.id, teacher.id).await;

        let scheduler = Arc::new(CallScheduler::new(
            callbacks.clone(),
            roster.clone(),
            provider.clone(),
            None,
        ));

        Self {
            callbacks,
            roster,
            provider,
            scheduler,
            student,
            teacher,
        }
    }

    pub fn student_actor(&self) -> Actor {
        Actor::student(Uuid::new_v4(), self.student.id)
    }

    pub fn teacher_actor(&self) -> Actor {
        Actor::teacher(Uuid::new_v4(), self.teacher.id)
    }

    pub async fn pending_request(&self) -> CallbackRequest {
        let request = CallbackRequest::new(
            NewCallbackRequest {
                student_id: self.student.id,
                teacher_id: self.teacher.id,
                subject: "Help".to_string(),
                message: "I am stuck on problem set 3".to_string(),
                requested_date: Utc::now(),
                phone_number: PhoneNumber::parse("8639391665").unwrap(),
                immediate_call: false,
            },
            Utc::now(),
        );
        self.callbacks.insert(&request).await.unwrap();
        request
    }
}
