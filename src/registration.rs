//! Registration coordinator
//!
//! Creates a tutor profile, its subject offering and the offering's weekly
//! schedule slots as one atomic unit of work.
//!
//! Each call moves through
//!
//! ```text
//! Pending ──begin──▶ InTransaction ──commit──▶ Committed
//!                          │
//!                          └──any failure──▶ RolledBack
//! ```
//!
//! The transaction handle is owned by the call, and every non-success path
//! either rolls it back explicitly or drops it (which also rolls back).
//! No retries happen here.

use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;
use crate::models::{NewSubjectOffering, NewTutorProfile};
use crate::schedule::{RawScheduleSlot, ScheduleSlot};
use crate::storage::{SharedClassRepository, StoreError, StoreTransaction};

/// Per-call registration state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Pending,
    InTransaction,
    Committed,
    RolledBack,
}

impl RegistrationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::RolledBack)
    }
}

/// Everything needed to register one tutor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub profile: NewTutorProfile,
    pub offering: NewSubjectOffering,
    pub schedule: Vec<RawScheduleSlot>,
}

/// Atomic multi-entity writer over a class repository
#[derive(Clone)]
pub struct RegistrationCoordinator {
    repo: SharedClassRepository,
}

impl RegistrationCoordinator {
    pub fn new(repo: SharedClassRepository) -> Self {
        Self { repo }
    }

    /// Register a request built elsewhere (e.g. deserialized from JSON)
    pub fn register(&self, request: &RegistrationRequest) -> Result<(), RegistrationError> {
        self.register_tutor(&request.profile, &request.offering, &request.schedule)
    }

    /// Persist profile, offering and slots, or nothing at all
    ///
    /// Identical payloads registered twice create two independent tutors.
    pub fn register_tutor(
        &self,
        profile: &NewTutorProfile,
        offering: &NewSubjectOffering,
        slots: &[RawScheduleSlot],
    ) -> Result<(), RegistrationError> {
        validate(offering, slots)?;

        let mut state = RegistrationState::Pending;
        tracing::debug!(?state, tutor = %profile.name, "Registration requested");

        let mut tx = self.repo.begin().map_err(|e| {
            // Nothing was opened, so there is nothing to roll back
            tracing::error!(error = %e, "Failed to begin registration transaction");
            RegistrationError::RegistrationFailed
        })?;
        state = RegistrationState::InTransaction;
        tracing::debug!(?state, "Registration transaction opened");

        match insert_all(tx.as_mut(), profile, offering, slots) {
            Ok(()) => match tx.commit() {
                Ok(()) => {
                    state = RegistrationState::Committed;
                    tracing::info!(
                        ?state,
                        tutor = %profile.name,
                        subject = %offering.subject,
                        slots = slots.len(),
                        "Tutor registered"
                    );
                    Ok(())
                }
                Err(e) => {
                    // The handle was consumed; its drop already rolled back
                    state = RegistrationState::RolledBack;
                    tracing::warn!(?state, error = %e, "Commit failed, registration rolled back");
                    Err(RegistrationError::RegistrationFailed)
                }
            },
            Err(cause) => {
                match tx.rollback() {
                    Ok(()) => tracing::warn!(
                        error = %cause,
                        "Registration failed, transaction rolled back"
                    ),
                    Err(rollback_err) => tracing::error!(
                        error = %cause,
                        rollback_error = %rollback_err,
                        "Registration failed and rollback could not be confirmed, store state ambiguous"
                    ),
                }
                state = RegistrationState::RolledBack;
                tracing::debug!(?state, "Registration finished");
                Err(RegistrationError::RegistrationFailed)
            }
        }
    }
}

/// Request checks that must pass before a transaction is opened
fn validate(offering: &NewSubjectOffering, slots: &[RawScheduleSlot]) -> Result<(), RegistrationError> {
    if slots.is_empty() {
        return Err(RegistrationError::validation(
            "at least one schedule slot is required",
        ));
    }

    if offering.subject.trim().is_empty() {
        return Err(RegistrationError::validation("subject must not be empty"));
    }

    if !offering.cost.is_finite() || offering.cost < 0.0 {
        return Err(RegistrationError::validation(
            "cost must be a non-negative number",
        ));
    }

    Ok(())
}

/// Failure inside the transaction, kept for the operator log only
#[derive(Debug, thiserror::Error)]
enum InsertError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("schedule slot {index}: {source}")]
    Slot {
        index: usize,
        source: crate::schedule::ScheduleError,
    },
}

fn insert_all(
    tx: &mut dyn StoreTransaction,
    profile: &NewTutorProfile,
    offering: &NewSubjectOffering,
    slots: &[RawScheduleSlot],
) -> Result<(), InsertError> {
    let user_id = tx.insert_profile(profile)?;
    let class_id = tx.insert_offering(user_id, offering)?;

    let converted = slots
        .iter()
        .enumerate()
        .map(|(index, raw)| ScheduleSlot::try_from(raw).map_err(|source| InsertError::Slot { index, source }))
        .collect::<Result<Vec<_>, _>>()?;

    tx.insert_slots(class_id, &converted)?;

    tracing::debug!(%user_id, %class_id, slots = converted.len(), "Registration rows staged");
    Ok(())
}
