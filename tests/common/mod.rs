//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use proffy::models::{NewSubjectOffering, NewTutorProfile};
use proffy::schedule::RawScheduleSlot;
use proffy::storage::{SharedClassRepository, SqliteClassRepository};
use proffy::{AvailabilityMatcher, RegistrationCoordinator};

/// Matcher and coordinator sharing one in-memory SQLite store
pub struct TestStore {
    pub repo: SharedClassRepository,
    pub matcher: AvailabilityMatcher,
    pub coordinator: RegistrationCoordinator,
}

pub fn sqlite_store() -> TestStore {
    let repo: SharedClassRepository =
        Arc::new(SqliteClassRepository::in_memory().expect("in-memory SQLite"));
    TestStore {
        matcher: AvailabilityMatcher::new(repo.clone()),
        coordinator: RegistrationCoordinator::new(repo.clone()),
        repo,
    }
}

pub fn profile(name: &str) -> NewTutorProfile {
    NewTutorProfile {
        name: name.to_string(),
        avatar: format!("https://avatars.example.com/{}.png", name.to_lowercase()),
        whatsapp: "5511999990000".to_string(),
        bio: format!("{name} teaches with patience."),
    }
}

pub fn offering(subject: &str, cost: f64) -> NewSubjectOffering {
    NewSubjectOffering::new(subject, cost)
}

pub fn slot(week_day: i64, from: &str, to: &str) -> RawScheduleSlot {
    RawScheduleSlot::new(week_day, from, to)
}
