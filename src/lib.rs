//! proffy - tutor availability search and registration
//!
//! Tutors publish a weekly schedule for a subject they teach; students search
//! for tutors available at a given weekday and time.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`schedule`] - Weekdays, clock times and half-open schedule slots
//! - [`models`] - Tutor profiles, subject offerings and search listings
//! - [`storage`] - Transactional relational store (SQLite, in-memory mock)
//! - [`matcher`] - Availability matcher (read-only search)
//! - [`registration`] - Registration coordinator (atomic multi-entity insert)
//! - [`api`] - Thin HTTP transport over the two operations
//! - [`config`] - Configuration management and settings
//!
//! # Example
//!
//! ```
//! use proffy::prelude::*;
//!
//! let repo = create_mock_repository();
//! let coordinator = RegistrationCoordinator::new(repo.clone());
//! let matcher = AvailabilityMatcher::new(repo);
//!
//! coordinator.register_tutor(
//!     &NewTutorProfile::new("Ana"),
//!     &NewSubjectOffering::new("Math", 50.0),
//!     &[RawScheduleSlot::new(1, "08:00", "10:00")],
//! )?;
//!
//! let found = matcher.find_available(&SearchFilters::new("Math", 1, "09:00"))?;
//! assert_eq!(found.len(), 1);
//! # Ok::<(), proffy::error::Error>(())
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod matcher;
pub mod models;
pub mod registration;
pub mod schedule;
pub mod storage;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, RegistrationError, Result, SearchError};
    pub use crate::matcher::{AvailabilityMatcher, AvailabilityQuery, SearchFilters};
    pub use crate::models::{ClassListing, NewSubjectOffering, NewTutorProfile};
    pub use crate::registration::{RegistrationCoordinator, RegistrationRequest};
    pub use crate::schedule::{RawScheduleSlot, ScheduleSlot, Weekday};
    pub use crate::storage::{create_mock_repository, ClassRepository, SharedClassRepository};
}

// Direct re-exports for convenience
pub use matcher::AvailabilityMatcher;
pub use registration::RegistrationCoordinator;
