use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parsing and validation over an arbitrary env lookup, so tests can feed a
/// plain `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("LUNCHVOTE_ENV", "development"));
    let log_level = or_default("LUNCHVOTE_LOG_LEVEL", "info");
    let venues_path = lookup("LUNCHVOTE_VENUES_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let fetch_timeout_secs = parse_u64("LUNCHVOTE_FETCH_TIMEOUT_SECS", "30")?;
    if fetch_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "LUNCHVOTE_FETCH_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default("LUNCHVOTE_USER_AGENT", "lunchvote/0.1 (menu-scraper)");
    let max_concurrent_venues = parse_usize("LUNCHVOTE_MAX_CONCURRENT_VENUES", "4")?;
    let max_retries = parse_u32("LUNCHVOTE_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("LUNCHVOTE_RETRY_BACKOFF_BASE_SECS", "2")?;
    let pdftotext_bin = or_default("LUNCHVOTE_PDFTOTEXT_BIN", "pdftotext");
    let antiword_bin = or_default("LUNCHVOTE_ANTIWORD_BIN", "antiword");

    Ok(AppConfig {
        env,
        log_level,
        venues_path,
        fetch_timeout_secs,
        user_agent,
        max_concurrent_venues,
        max_retries,
        retry_backoff_base_secs,
        pdftotext_bin,
        antiword_bin,
    })
}

/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
