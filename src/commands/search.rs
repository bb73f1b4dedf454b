use anyhow::{Context, Result};

use proffy::config::Config;
use proffy::matcher::AvailabilityMatcher;
use proffy::storage::open_repository;

/// Print tutors available for `subject` at `week_day` and `time`
pub fn search(config: &Config, subject: &str, week_day: i64, time: &str) -> Result<()> {
    let repo = open_repository(&config.database).context("Failed to open database")?;
    let matcher = AvailabilityMatcher::new(repo);

    let listings = matcher
        .find_available_at(subject, week_day, time)
        .context("Search failed")?;

    if listings.is_empty() {
        println!("No tutors available for {subject} on day {week_day} at {time}");
        return Ok(());
    }

    println!("{} tutor(s) available:", listings.len());
    for listing in &listings {
        println!(
            "  {:<24} {:<16} cost {:>8.2}  whatsapp {}",
            listing.tutor.name,
            listing.offering.subject,
            listing.offering.cost,
            listing.tutor.whatsapp
        );
    }

    Ok(())
}
