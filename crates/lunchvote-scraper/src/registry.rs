//! The set of venues a batch runs over.

use std::sync::Arc;

use lunchvote_core::{ConfigError, VenuesFile};

use crate::strategy::VenueStrategy;
use crate::venues;

/// Validated venues, keyed by statistics keyword, in registration order.
#[derive(Default)]
pub struct VenueRegistry {
    venues: Vec<Arc<dyn VenueStrategy>>,
}

impl VenueRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `venue` after validating its descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDescriptor`] for an invalid descriptor and
    /// [`ConfigError::Validation`] when the keyword is already registered.
    pub fn register(&mut self, venue: Arc<dyn VenueStrategy>) -> Result<(), ConfigError> {
        let descriptor = venue.descriptor();
        descriptor.validate()?;
        if self.get(&descriptor.statistics_keyword).is_some() {
            return Err(ConfigError::Validation(format!(
                "duplicate venue keyword: '{}'",
                descriptor.statistics_keyword
            )));
        }
        self.venues.push(venue);
        Ok(())
    }

    /// Registry of the built-in venues with `overrides` applied.
    ///
    /// Disabled venues are skipped. A venue that fails to build is left out
    /// and its error returned alongside the registry, so one broken entry
    /// does not take the others down.
    #[must_use]
    pub fn builtin(overrides: Option<&VenuesFile>) -> (Self, Vec<ConfigError>) {
        let mut registry = Self::new();
        let mut errors = Vec::new();

        for (mut descriptor, build) in venues::builtin() {
            let keyword = descriptor.statistics_keyword.clone();
            if let Some(o) = overrides.and_then(|file| file.find(&keyword)) {
                if !o.enabled {
                    tracing::info!(venue = %keyword, "venue disabled by override");
                    continue;
                }
                if let Some(source) = &o.data_source {
                    tracing::debug!(venue = %keyword, data_source = %source, "data source overridden");
                    descriptor = descriptor.with_data_source(source);
                }
            }

            match build(descriptor).and_then(|venue| registry.register(venue)) {
                Ok(()) => {}
                Err(e) => {
                    tracing::error!(venue = %keyword, error = %e, "venue not registered");
                    errors.push(e);
                }
            }
        }

        if let Some(file) = overrides {
            for o in &file.venues {
                if registry.get(&o.statistics_keyword).is_none() && o.enabled {
                    tracing::warn!(venue = %o.statistics_keyword, "override for unknown venue ignored");
                }
            }
        }

        (registry, errors)
    }

    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&Arc<dyn VenueStrategy>> {
        self.venues
            .iter()
            .find(|v| v.descriptor().statistics_keyword == keyword)
    }

    #[must_use]
    pub fn venues(&self) -> &[Arc<dyn VenueStrategy>] {
        &self.venues
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.venues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }
}
