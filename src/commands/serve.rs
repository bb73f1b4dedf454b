use anyhow::{Context, Result};

use proffy::api::ApiServer;
use proffy::config::Config;
use proffy::storage::open_repository;

/// Serve the HTTP API until Ctrl-C
pub async fn serve(config: Config) -> Result<()> {
    let repo = open_repository(&config.database).with_context(|| {
        format!(
            "Failed to open database: {}",
            config.database.sqlite_path.display()
        )
    })?;

    let server = ApiServer::new(repo, config.server.clone());

    println!("Proffy API");
    println!("==========");
    println!("  Database: {}", config.database.sqlite_path.display());
    println!("  Listening: http://{}", config.server.bind_address);
    println!();
    println!("Endpoints:");
    println!("  GET  /health   - Health check");
    println!("  GET  /classes  - Search available tutors (subject, week_day, time)");
    println!("  POST /classes  - Register a tutor with schedule");
    println!();

    server
        .start_with_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
