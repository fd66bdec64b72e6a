use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Static identity and scheduling policy of one venue.
///
/// Built once at startup and validated before the venue is registered;
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueDescriptor {
    pub title: String,
    pub title_notifier: Option<String>,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub url: String,
    /// Machine-readable menu document (PDF/Word).
    pub data_source: String,
    /// Human-readable menu reference.
    pub menu_url: String,
    pub statistics_keyword: String,
    /// Weekdays without a lunch menu, 0 = Sunday .. 6 = Saturday.
    pub no_menu_days: Vec<u8>,
    /// `true` when the published document already covers upcoming days.
    pub lookahead_safe: bool,
    pub price_nested_info: Option<Vec<String>>,
}

impl VenueDescriptor {
    #[must_use]
    pub fn is_no_menu_day(&self, weekday_index: u8) -> bool {
        self.no_menu_days.contains(&weekday_index)
    }

    /// Returns a copy pointing at another data source.
    #[must_use]
    pub fn with_data_source(&self, data_source: &str) -> Self {
        Self {
            data_source: data_source.to_string(),
            ..self.clone()
        }
    }

    /// Checks the fields a venue cannot run without.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDescriptor`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |reason: String| ConfigError::InvalidDescriptor {
            venue: if self.statistics_keyword.is_empty() {
                self.title.clone()
            } else {
                self.statistics_keyword.clone()
            },
            reason,
        };

        if self.title.trim().is_empty() {
            return Err(fail("title must be non-empty".to_string()));
        }
        if !is_valid_keyword(&self.statistics_keyword) {
            return Err(fail(format!(
                "statistics keyword '{}' must be non-empty lowercase ascii, digits, '-' or '_'",
                self.statistics_keyword
            )));
        }
        if !is_http_url(&self.data_source) {
            return Err(fail(format!(
                "data source '{}' is not an http(s) URL",
                self.data_source
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude)
        {
            return Err(fail(format!(
                "coordinates ({}, {}) out of range",
                self.latitude, self.longitude
            )));
        }
        if let Some(day) = self.no_menu_days.iter().find(|d| **d > 6) {
            return Err(fail(format!("no-menu day {day} is not a weekday index 0..=6")));
        }
        if self.no_menu_days.len() >= 7 && (0..=6).all(|d| self.no_menu_days.contains(&d)) {
            return Err(fail("every weekday is a no-menu day".to_string()));
        }
        if let Some(labels) = &self.price_nested_info {
            if labels.is_empty() {
                return Err(fail("nested price labels are empty".to_string()));
            }
            let mut seen = HashSet::new();
            for label in labels {
                if label.trim().is_empty() {
                    return Err(fail("nested price label must be non-empty".to_string()));
                }
                if !seen.insert(label.to_lowercase()) {
                    return Err(fail(format!("duplicate nested price label '{label}'")));
                }
            }
        }
        Ok(())
    }
}

fn is_valid_keyword(keyword: &str) -> bool {
    !keyword.is_empty()
        && keyword
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

fn is_http_url(url: &str) -> bool {
    url::Url::parse(url).is_ok_and(|parsed| {
        matches!(parsed.scheme(), "http" | "https")
            && parsed.host_str().is_some_and(|host| !host.is_empty())
    })
}

/// Operator override for a built-in venue, keyed by statistics keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueOverride {
    pub statistics_keyword: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub data_source: Option<String>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct VenuesFile {
    #[serde(default)]
    pub venues: Vec<VenueOverride>,
}

impl VenuesFile {
    #[must_use]
    pub fn find(&self, statistics_keyword: &str) -> Option<&VenueOverride> {
        self.venues
            .iter()
            .find(|v| v.statistics_keyword == statistics_keyword)
    }
}

/// Load and validate venue overrides from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_venue_overrides(path: &Path) -> Result<VenuesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::VenuesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let venues_file: VenuesFile = serde_yaml::from_str(&content)?;

    validate_overrides(&venues_file)?;

    Ok(venues_file)
}

fn validate_overrides(venues_file: &VenuesFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for venue in &venues_file.venues {
        if venue.statistics_keyword.trim().is_empty() {
            return Err(ConfigError::Validation(
                "venue statistics_keyword must be non-empty".to_string(),
            ));
        }

        if !seen.insert(venue.statistics_keyword.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate venue override: '{}'",
                venue.statistics_keyword
            )));
        }

        if let Some(source) = &venue.data_source {
            if !is_http_url(source) {
                return Err(ConfigError::Validation(format!(
                    "venue '{}' data_source '{source}' is not an http(s) URL",
                    venue.statistics_keyword
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "venues_test.rs"]
mod tests;
