//! The `check` command: converter binaries and venue configuration.

use lunchvote_core::{AppConfig, ConfigError};
use lunchvote_scraper::{missing_commands, ConverterCommands};

/// # Errors
///
/// Returns an error when a converter is missing or a venue failed to register.
pub(crate) fn run_check(config: &AppConfig, config_errors: &[ConfigError]) -> anyhow::Result<()> {
    let converters = ConverterCommands::new(&config.pdftotext_bin, &config.antiword_bin);
    let missing = missing_commands(&converters.programs());

    for command in &missing {
        println!("missing converter: {command}");
    }
    for error in config_errors {
        println!("venue configuration error: {error}");
    }

    if !missing.is_empty() || !config_errors.is_empty() {
        anyhow::bail!(
            "{} missing converters, {} venue configuration errors",
            missing.len(),
            config_errors.len()
        );
    }

    println!("ok: {} found", converters.programs().join(", "));
    Ok(())
}
