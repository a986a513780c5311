use anyhow::{Context, Result};
use aria_reservations::{
    config,
    handoff::SystemOpener,
    reservation::{FormAction, FormOutcome, ReservationForm, ReservationInput},
};
use serde_json::json;
use std::{io::Read, sync::Arc};
use tracing::info;

/// Exit status when the reservation fails validation.
const EXIT_REJECTED: i32 = 2;

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            )
        })?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Determine log level: environment variable overrides config
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logs.level.clone());

    if let Err(e) = validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))?,
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let mut form = ReservationForm::new(&config, Arc::new(SystemOpener));
    info!(
        "✨ Aria Restaurant reservation desk ready (earliest date {})",
        form.min_date()
    );

    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("failed to read reservation from stdin")?;
    let input: ReservationInput =
        serde_json::from_str(&raw).context("reservation must be a JSON object")?;

    form.fill(input);
    match form.dispatch(FormAction::Submit) {
        FormOutcome::Sent(message) => {
            for notice in form.notices().active() {
                info!("{}", notice.text);
            }
            let output = json!({ "status": form.state(), "message": message });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        FormOutcome::Rejected(errors) => {
            let output = json!({ "status": form.state(), "errors": errors });
            println!("{}", serde_json::to_string_pretty(&output)?);
            std::process::exit(EXIT_REJECTED);
        }
        FormOutcome::Edited | FormOutcome::Cleared => {}
    }

    Ok(())
}
