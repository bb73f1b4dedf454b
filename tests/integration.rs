//! End-to-end tests: register tutors, then search for them

mod common;

use common::{offering, profile, slot, sqlite_store};
use proffy::error::{RegistrationError, SearchError};
use proffy::matcher::SearchFilters;

#[test]
fn test_register_then_search_scenario() {
    let store = sqlite_store();

    store
        .coordinator
        .register_tutor(
            &profile("Ana"),
            &offering("Math", 50.0),
            &[slot(1, "08:00", "10:00")],
        )
        .expect("registration should commit");

    let found = store
        .matcher
        .find_available(&SearchFilters::new("Math", 1, "09:00"))
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].tutor.name, "Ana");
    assert_eq!(found[0].offering.subject, "Math");
    assert_eq!(found[0].offering.cost, 50.0);

    // End of the interval is excluded
    let at_end = store
        .matcher
        .find_available(&SearchFilters::new("Math", 1, "10:00"))
        .unwrap();
    assert!(at_end.is_empty());

    let wrong_day = store
        .matcher
        .find_available(&SearchFilters::new("Math", 2, "09:00"))
        .unwrap();
    assert!(wrong_day.is_empty());
}

#[test]
fn test_identical_payloads_create_independent_tutors() {
    let store = sqlite_store();
    let slots = [slot(3, "14:00", "18:00")];

    for _ in 0..2 {
        store
            .coordinator
            .register_tutor(&profile("Ana"), &offering("Math", 50.0), &slots)
            .unwrap();
    }

    let found = store.matcher.find_available_at("Math", 3, "15:00").unwrap();
    assert_eq!(found.len(), 2);
    assert_ne!(found[0].tutor.id, found[1].tutor.id);
    assert_ne!(found[0].offering.id, found[1].offering.id);
}

#[test]
fn test_multiple_slots_and_tutors() {
    let store = sqlite_store();

    store
        .coordinator
        .register_tutor(
            &profile("Ana"),
            &offering("Math", 50.0),
            &[slot(1, "08:00", "10:00"), slot(3, "19:00", "21:30")],
        )
        .unwrap();
    store
        .coordinator
        .register_tutor(
            &profile("Bruno"),
            &offering("Math", 80.0),
            &[slot(3, "20:00", "22:00")],
        )
        .unwrap();
    store
        .coordinator
        .register_tutor(
            &profile("Carla"),
            &offering("Chemistry", 60.0),
            &[slot(3, "00:00", "24:00")],
        )
        .unwrap();

    let names = |day: i64, time: &str| -> Vec<String> {
        store
            .matcher
            .find_available_at("Math", day, time)
            .unwrap()
            .into_iter()
            .map(|listing| listing.tutor.name)
            .collect()
    };

    assert_eq!(names(1, "08:00"), vec!["Ana"]);
    assert_eq!(names(3, "19:30"), vec!["Ana"]);
    assert_eq!(names(3, "21:00"), vec!["Ana", "Bruno"]);
    assert_eq!(names(3, "21:30"), vec!["Bruno"]);
    assert!(names(3, "22:00").is_empty());

    let chemistry = store.matcher.find_available_at("Chemistry", 3, "23:59").unwrap();
    assert_eq!(chemistry.len(), 1);
}

#[test]
fn test_error_kinds_are_distinct_from_empty_results() {
    let store = sqlite_store();

    let missing = store.matcher.find_available(&SearchFilters {
        subject: None,
        ..SearchFilters::new("Math", 1, "09:00")
    });
    assert!(matches!(missing, Err(SearchError::InvalidInput { field: "subject", .. })));

    let empty = store.matcher.find_available(&SearchFilters::new("Math", 1, "09:00"));
    assert_eq!(empty, Ok(Vec::new()));

    let no_slots = store
        .coordinator
        .register_tutor(&profile("Ana"), &offering("Math", 50.0), &[]);
    assert!(matches!(no_slots, Err(RegistrationError::Validation { .. })));
}
