//! Availability matcher
//!
//! Resolves "who teaches `subject` on `weekday` at `time`" queries. Filters
//! arrive as optional raw strings from the transport layer and are validated
//! into an [`AvailabilityQuery`] before the store is touched.

use serde::Deserialize;

use crate::error::SearchError;
use crate::models::ClassListing;
use crate::schedule::{MinuteOfDay, SlotPredicate, Weekday};
use crate::storage::SharedClassRepository;

/// Raw search filters as received from a caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchFilters {
    pub subject: Option<String>,
    pub week_day: Option<String>,
    pub time: Option<String>,
}

impl SearchFilters {
    pub fn new(
        subject: impl Into<String>,
        week_day: impl ToString,
        time: impl Into<String>,
    ) -> Self {
        Self {
            subject: Some(subject.into()),
            week_day: Some(week_day.to_string()),
            time: Some(time.into()),
        }
    }
}

/// Validated availability query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub subject: String,
    pub predicate: SlotPredicate,
}

impl AvailabilityQuery {
    /// Build a query from typed values, parsing `time` as `HH:MM`
    pub fn new(subject: &str, weekday: i64, time: &str) -> Result<Self, SearchError> {
        if subject.trim().is_empty() {
            return Err(SearchError::missing("subject"));
        }
        let weekday = Weekday::new(weekday).map_err(|e| SearchError::invalid("week_day", e))?;
        let minute = time
            .parse::<MinuteOfDay>()
            .map_err(|e| SearchError::invalid("time", e))?;

        Ok(Self {
            subject: subject.to_string(),
            predicate: SlotPredicate::new(weekday, minute),
        })
    }
}

impl TryFrom<&SearchFilters> for AvailabilityQuery {
    type Error = SearchError;

    fn try_from(filters: &SearchFilters) -> Result<Self, Self::Error> {
        let subject = present(&filters.subject, "subject")?;
        let week_day = present(&filters.week_day, "week_day")?;
        let time = present(&filters.time, "time")?;

        let week_day: i64 = week_day
            .trim()
            .parse()
            .map_err(|_| SearchError::invalid("week_day", format!("'{week_day}' is not an integer")))?;

        Self::new(subject, week_day, time)
    }
}

fn present<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, SearchError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(SearchError::missing(field)),
    }
}

/// Read-only availability search over a class repository
#[derive(Clone)]
pub struct AvailabilityMatcher {
    repo: SharedClassRepository,
}

impl AvailabilityMatcher {
    pub fn new(repo: SharedClassRepository) -> Self {
        Self { repo }
    }

    /// Find tutors whose published schedule covers the filtered weekday and time
    ///
    /// Returns `InvalidInput` for missing or unparseable filters; no matches is
    /// an empty `Ok`.
    pub fn find_available(&self, filters: &SearchFilters) -> Result<Vec<ClassListing>, SearchError> {
        let query = AvailabilityQuery::try_from(filters)?;
        self.run(&query)
    }

    /// Typed entry point: `subject`, weekday 0-6 and a `HH:MM` time
    pub fn find_available_at(
        &self,
        subject: &str,
        weekday: i64,
        time: &str,
    ) -> Result<Vec<ClassListing>, SearchError> {
        let query = AvailabilityQuery::new(subject, weekday, time)?;
        self.run(&query)
    }

    /// Run an already validated query
    pub fn run(&self, query: &AvailabilityQuery) -> Result<Vec<ClassListing>, SearchError> {
        let listings = self
            .repo
            .find_available(&query.subject, &query.predicate)
            .map_err(|e| {
                tracing::error!(error = %e, subject = %query.subject, "Availability query failed");
                SearchError::QueryFailed
            })?;

        tracing::debug!(
            subject = %query.subject,
            week_day = %query.predicate.weekday(),
            time = %query.predicate.minute(),
            matches = listings.len(),
            "Availability search completed"
        );

        Ok(listings)
    }
}
