use std::path::Path;

use anyhow::{Context, Result};

use proffy::config::Config;
use proffy::registration::{RegistrationCoordinator, RegistrationRequest};
use proffy::storage::open_repository;

/// Register a tutor described by a JSON request file
pub fn register(config: &Config, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read request file: {}", file.display()))?;
    let request: RegistrationRequest = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse request file: {}", file.display()))?;

    let repo = open_repository(&config.database).context("Failed to open database")?;
    let coordinator = RegistrationCoordinator::new(repo);

    coordinator
        .register(&request)
        .context("Registration was not persisted")?;

    println!(
        "Registered {} teaching {} ({} schedule slot(s))",
        request.profile.name,
        request.offering.subject,
        request.schedule.len()
    );
    Ok(())
}
