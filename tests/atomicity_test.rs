//! Registration is all-or-nothing

mod common;

use std::sync::Arc;
use std::thread;

use common::{offering, profile, slot, sqlite_store};
use proffy::error::RegistrationError;
use proffy::storage::{
    ClassRepository, FailPoint, MockClassRepository, SharedClassRepository, SqliteClassRepository,
    StoreStats,
};
use proffy::{AvailabilityMatcher, RegistrationCoordinator};

#[test]
fn test_malformed_slot_leaves_nothing_visible() {
    let store = sqlite_store();

    let result = store.coordinator.register_tutor(
        &profile("Ana"),
        &offering("Math", 50.0),
        &[slot(1, "08:00", "10:00"), slot(1, "10:00", "09:00")],
    );

    assert_eq!(result, Err(RegistrationError::RegistrationFailed));
    assert_eq!(store.repo.stats().unwrap(), StoreStats::default());
    assert!(store
        .matcher
        .find_available_at("Math", 1, "09:00")
        .unwrap()
        .is_empty());
}

#[test]
fn test_invalid_weekday_in_slot_rolls_back() {
    let store = sqlite_store();

    let result = store.coordinator.register_tutor(
        &profile("Ana"),
        &offering("Math", 50.0),
        &[slot(7, "08:00", "10:00")],
    );

    assert_eq!(result, Err(RegistrationError::RegistrationFailed));
    assert_eq!(store.repo.stats().unwrap(), StoreStats::default());
}

#[test]
fn test_failed_registration_does_not_affect_earlier_commits() {
    let store = sqlite_store();

    store
        .coordinator
        .register_tutor(&profile("Ana"), &offering("Math", 50.0), &[slot(1, "08:00", "10:00")])
        .unwrap();
    let failed = store.coordinator.register_tutor(
        &profile("Bruno"),
        &offering("Math", 40.0),
        &[slot(1, "08:00", "99:00")],
    );
    assert!(failed.is_err());

    let found = store.matcher.find_available_at("Math", 1, "09:00").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].tutor.name, "Ana");
    assert_eq!(
        store.repo.stats().unwrap(),
        StoreStats {
            profiles: 1,
            offerings: 1,
            slots: 1
        }
    );
}

#[test]
fn test_store_failures_surface_as_registration_failed() {
    for point in [
        FailPoint::Begin,
        FailPoint::InsertProfile,
        FailPoint::InsertOffering,
        FailPoint::InsertSlots,
        FailPoint::Commit,
    ] {
        let mock = Arc::new(MockClassRepository::failing_at(point));
        let coordinator = RegistrationCoordinator::new(mock.clone());
        let matcher = AvailabilityMatcher::new(mock.clone());

        let result = coordinator.register_tutor(
            &profile("Ana"),
            &offering("Math", 50.0),
            &[slot(1, "08:00", "10:00")],
        );

        assert_eq!(result, Err(RegistrationError::RegistrationFailed), "{point:?}");
        assert!(matcher.find_available_at("Math", 1, "09:00").unwrap().is_empty());
        assert_eq!(mock.stats().unwrap(), StoreStats::default());

        // The same store accepts the request once the failure clears
        mock.set_fail_point(None);
        coordinator
            .register_tutor(&profile("Ana"), &offering("Math", 50.0), &[slot(1, "08:00", "10:00")])
            .unwrap();
        assert_eq!(matcher.find_available_at("Math", 1, "09:00").unwrap().len(), 1);
    }
}

#[test]
fn test_concurrent_registrations_are_isolated() {
    let dir = tempfile::TempDir::new().unwrap();
    let repo: SharedClassRepository =
        Arc::new(SqliteClassRepository::new(dir.path().join("proffy.db")).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let coordinator = RegistrationCoordinator::new(repo.clone());
            thread::spawn(move || {
                // Odd workers submit a malformed slot after a valid one
                let slots = if i % 2 == 0 {
                    vec![slot(2, "10:00", "12:00")]
                } else {
                    vec![slot(2, "10:00", "12:00"), slot(2, "12:00", "11:00")]
                };
                coordinator.register_tutor(&profile(&format!("Tutor{i}")), &offering("Physics", 30.0), &slots)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 4);

    let matcher = AvailabilityMatcher::new(repo.clone());
    let found = matcher.find_available_at("Physics", 2, "11:00").unwrap();
    assert_eq!(found.len(), 4);
    assert_eq!(
        repo.stats().unwrap(),
        StoreStats {
            profiles: 4,
            offerings: 4,
            slots: 4
        }
    );
}
