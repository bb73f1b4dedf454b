//! Weekly schedule primitives
//!
//! Availability is modelled as recurring weekly windows. A window is a weekday
//! plus a half-open minute-of-day interval `[from, to)`.
//!
//! # Example
//!
//! ```
//! use proffy::schedule::{MinuteOfDay, ScheduleSlot, SlotPredicate, Weekday};
//!
//! let slot = ScheduleSlot::from_clock(Weekday::new(1)?, "08:00", "10:00")?;
//! let at_nine = SlotPredicate::new(Weekday::new(1)?, "09:00".parse::<MinuteOfDay>()?);
//! assert!(at_nine.matches(&slot));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minutes in one day; the exclusive upper bound of any slot
pub const MINUTES_PER_DAY: u16 = 1440;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while building schedule values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Time string is not a `HH:MM` clock time
    #[error("invalid clock time '{0}', expected HH:MM")]
    InvalidTime(String),

    /// Weekday outside 0-6
    #[error("invalid weekday {0}, must be 0-6")]
    InvalidWeekday(i64),

    /// Slot interval does not satisfy `0 <= from < to <= 1440`
    #[error("invalid slot interval [{from}, {to})")]
    InvalidInterval { from: u16, to: u16 },
}

// ============================================================================
// Weekday
// ============================================================================

/// Day of the week, 0 through 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Weekday(u8);

impl Weekday {
    /// Create a weekday, rejecting values outside 0-6
    pub fn new(value: i64) -> Result<Self, ScheduleError> {
        match value {
            0..=6 => Ok(Self(value as u8)),
            _ => Err(ScheduleError::InvalidWeekday(value)),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Weekday {
    type Error = ScheduleError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Weekday> for u8 {
    fn from(day: Weekday) -> Self {
        day.0
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Minute of day
// ============================================================================

/// Minutes since midnight, 0 through 1440 inclusive
///
/// 1440 only ever appears as the exclusive end of a slot that runs until
/// midnight; parsed from `"24:00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub fn new(minutes: u16) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl FromStr for MinuteOfDay {
    type Err = ScheduleError;

    /// Parse a clock time as `hours * 60 + minutes`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static CLOCK_RE: OnceLock<Regex> = OnceLock::new();

        let re = CLOCK_RE
            .get_or_init(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("Invalid regex pattern"));

        let invalid = || ScheduleError::InvalidTime(s.to_string());
        let caps = re.captures(s.trim()).ok_or_else(invalid)?;

        let hours: u16 = caps[1].parse().map_err(|_| invalid())?;
        let minutes: u16 = caps[2].parse().map_err(|_| invalid())?;

        if minutes > 59 || hours > 24 || (hours == 24 && minutes != 0) {
            return Err(invalid());
        }

        Ok(Self(hours * 60 + minutes))
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

// ============================================================================
// Slots
// ============================================================================

/// Schedule slot as submitted by a caller, with clock-time strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawScheduleSlot {
    pub week_day: i64,
    pub from: String,
    pub to: String,
}

impl RawScheduleSlot {
    pub fn new(week_day: i64, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            week_day,
            from: from.into(),
            to: to.into(),
        }
    }
}

/// One weekly availability window `[from, to)` on a weekday
///
/// Overlapping slots for the same offering are allowed and stored as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleSlot {
    pub(crate) weekday: Weekday,
    pub(crate) from: u16,
    pub(crate) to: u16,
}

impl ScheduleSlot {
    /// Create a slot, enforcing `from < to <= 1440`
    pub fn new(weekday: Weekday, from: MinuteOfDay, to: MinuteOfDay) -> Result<Self, ScheduleError> {
        if from >= to {
            return Err(ScheduleError::InvalidInterval {
                from: from.value(),
                to: to.value(),
            });
        }

        Ok(Self {
            weekday,
            from: from.value(),
            to: to.value(),
        })
    }

    /// Create a slot from clock-time strings
    pub fn from_clock(weekday: Weekday, from: &str, to: &str) -> Result<Self, ScheduleError> {
        Self::new(weekday, from.parse()?, to.parse()?)
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn from_minute(&self) -> u16 {
        self.from
    }

    pub fn to_minute(&self) -> u16 {
        self.to
    }

    /// Half-open containment: `from <= minute < to`
    pub fn contains(&self, minute: MinuteOfDay) -> bool {
        self.from <= minute.value() && minute.value() < self.to
    }
}

impl TryFrom<&RawScheduleSlot> for ScheduleSlot {
    type Error = ScheduleError;

    fn try_from(raw: &RawScheduleSlot) -> Result<Self, Self::Error> {
        Self::from_clock(Weekday::new(raw.week_day)?, &raw.from, &raw.to)
    }
}

// ============================================================================
// Predicate
// ============================================================================

/// Structured availability predicate: weekday equality and half-open containment
///
/// Storage backends evaluate this instead of building query text from caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPredicate {
    weekday: Weekday,
    minute: MinuteOfDay,
}

impl SlotPredicate {
    pub fn new(weekday: Weekday, minute: MinuteOfDay) -> Self {
        Self { weekday, minute }
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn minute(&self) -> MinuteOfDay {
        self.minute
    }

    /// Check whether a slot covers this weekday and minute
    pub fn matches(&self, slot: &ScheduleSlot) -> bool {
        slot.weekday == self.weekday && slot.contains(self.minute)
    }
}
