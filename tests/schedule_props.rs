//! Property tests for half-open slot matching

mod common;

use proffy::schedule::{MinuteOfDay, ScheduleSlot, SlotPredicate, Weekday, MINUTES_PER_DAY};
use proptest::prelude::*;

fn clock(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Valid `(from, to)` pairs with `from < to <= 1440`
fn interval() -> impl Strategy<Value = (u16, u16)> {
    (0..MINUTES_PER_DAY).prop_flat_map(|from| (Just(from), (from + 1)..=MINUTES_PER_DAY))
}

proptest! {
    #[test]
    fn slot_matches_exactly_its_half_open_range(
        day in 0i64..=6,
        (from, to) in interval(),
        minute in 0u16..=MINUTES_PER_DAY,
    ) {
        let weekday = Weekday::new(day).unwrap();
        let slot = ScheduleSlot::from_clock(weekday, &clock(from), &clock(to)).unwrap();
        let predicate = SlotPredicate::new(weekday, MinuteOfDay::new(minute).unwrap());

        prop_assert_eq!(predicate.matches(&slot), from <= minute && minute < to);
    }

    #[test]
    fn slot_never_matches_other_weekdays(
        day in 0i64..=6,
        other in 0i64..=6,
        (from, to) in interval(),
    ) {
        prop_assume!(day != other);
        let slot = ScheduleSlot::from_clock(Weekday::new(day).unwrap(), &clock(from), &clock(to)).unwrap();
        let predicate = SlotPredicate::new(Weekday::new(other).unwrap(), MinuteOfDay::new(from).unwrap());

        prop_assert!(!predicate.matches(&slot));
    }

    #[test]
    fn clock_conversion_is_hours_times_sixty_plus_minutes(h in 0u16..24, m in 0u16..60) {
        let parsed: MinuteOfDay = format!("{h:02}:{m:02}").parse().unwrap();
        prop_assert_eq!(parsed.value(), h * 60 + m);
    }
}

#[test]
fn test_registered_slot_boundaries_through_store() {
    let store = common::sqlite_store();
    store
        .coordinator
        .register_tutor(
            &common::profile("Ana"),
            &common::offering("Math", 50.0),
            &[common::slot(4, "13:30", "13:45")],
        )
        .unwrap();

    for minute in (13 * 60)..(14 * 60) {
        let found = store
            .matcher
            .find_available_at("Math", 4, &clock(minute))
            .unwrap();
        let expected = (810..825).contains(&minute);
        assert_eq!(!found.is_empty(), expected, "minute {minute}");
    }
}
