//! Core data structures
//!
//! Tutors, the subjects they offer, and the listing pair returned by
//! availability searches.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generated identity of a stored tutor profile
///
/// Treat as an opaque handle; only uniqueness is guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub(crate) i64);

/// Generated identity of a stored subject offering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub(crate) i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user#{}", self.0)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class#{}", self.0)
    }
}

/// Tutor profile as submitted for registration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTutorProfile {
    pub name: String,
    pub avatar: String,
    pub whatsapp: String,
    pub bio: String,
}

impl NewTutorProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Stored tutor profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorProfile {
    pub id: UserId,
    pub name: String,
    pub avatar: String,
    pub whatsapp: String,
    pub bio: String,
}

/// Subject offering as submitted for registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubjectOffering {
    pub subject: String,
    pub cost: f64,
}

impl NewSubjectOffering {
    pub fn new(subject: impl Into<String>, cost: f64) -> Self {
        Self {
            subject: subject.into(),
            cost,
        }
    }
}

/// Stored subject offering, owned by exactly one tutor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectOffering {
    pub id: ClassId,
    pub user_id: UserId,
    pub subject: String,
    pub cost: f64,
}

/// A matching offering together with the tutor who published it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassListing {
    pub tutor: TutorProfile,
    pub offering: SubjectOffering,
}
