//! The `scrape` and `venues` commands.
//!
//! Per-venue failures are logged by the scraper and counted in the batch
//! summary; only a run where no venue could be attempted is an error.

use std::time::Duration;

use chrono::NaiveDate;
use lunchvote_core::{AppConfig, ConfigError, MenuResult};
use lunchvote_scraper::{
    ConvertingSource, ExtractionAttempt, MenuScraper, ResultSink, VenueRegistry,
};

/// Builds the venue registry, applying `venues.yaml` overrides when
/// configured. Venues that fail validation are left out and returned.
///
/// # Errors
///
/// Returns an error if the overrides file cannot be read or is invalid.
pub(crate) fn load_registry(
    config: &AppConfig,
) -> anyhow::Result<(VenueRegistry, Vec<ConfigError>)> {
    let overrides = match &config.venues_path {
        Some(path) => Some(lunchvote_core::load_venue_overrides(path)?),
        None => None,
    };
    Ok(VenueRegistry::builtin(overrides.as_ref()))
}

/// Upper bound for one venue's download plus conversion, retries included.
pub(crate) fn acquisition_timeout(config: &AppConfig) -> Duration {
    let attempts = u64::from(config.max_retries) + 1;
    let backoff: u64 = (0..config.max_retries)
        .map(|n| config.retry_backoff_base_secs.saturating_mul(1u64 << n.min(62)))
        .fold(0, u64::saturating_add);
    Duration::from_secs(
        config
            .fetch_timeout_secs
            .saturating_mul(attempts)
            .saturating_add(backoff)
            .saturating_add(config.fetch_timeout_secs),
    )
}

/// Prints each menu as one JSON line on stdout.
struct JsonLinesSink;

impl ResultSink for JsonLinesSink {
    fn accept(&self, keyword: &str, result: &MenuResult) {
        match serde_json::to_string(result) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(venue = keyword, error = %e, "failed to serialize menu"),
        }
    }
}

/// Runs the extraction batch for `date` (default today).
///
/// # Errors
///
/// Returns an error if `venue_filter` names no registered venue or the HTTP
/// client cannot be built.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    registry: &VenueRegistry,
    venue_filter: Option<&str>,
    date: Option<NaiveDate>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let venues = match venue_filter {
        Some(keyword) => vec![registry
            .get(keyword)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("venue '{keyword}' is not registered"))?],
        None => registry.venues().to_vec(),
    };
    if venues.is_empty() {
        anyhow::bail!("no venues registered; check the venues file");
    }

    let attempt = date.map_or_else(ExtractionAttempt::today, ExtractionAttempt::for_date);

    if dry_run {
        let keywords: Vec<&str> = venues
            .iter()
            .map(|v| v.descriptor().statistics_keyword.as_str())
            .collect();
        println!(
            "dry-run: would extract {} for {} venues: [{}]",
            attempt.target,
            venues.len(),
            keywords.join(", ")
        );
        return Ok(());
    }

    let source = ConvertingSource::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build document source: {e}"))?;
    let scraper = MenuScraper::new(source, acquisition_timeout(config));

    let summary = scraper
        .run_batch(&venues, &attempt, config.max_concurrent_venues, &JsonLinesSink)
        .await;

    if summary.succeeded == 0 && summary.rejected > 0 {
        tracing::warn!(
            rejected = summary.rejected,
            "no venue produced a menu"
        );
    }
    Ok(())
}

pub(crate) fn print_venues(registry: &VenueRegistry) {
    for venue in registry.venues() {
        let d = venue.descriptor();
        println!(
            "{:<24} {:<24} {}{}",
            d.statistics_keyword,
            d.title,
            d.data_source,
            if d.lookahead_safe { "" } else { " (same day only)" }
        );
    }
}
