pub mod app_config;
pub mod config;
pub mod menu;
pub mod venues;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use menu::{MenuItem, MenuResult, Prices};
pub use venues::{load_venue_overrides, VenueDescriptor, VenueOverride, VenuesFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read venues file {path}: {source}")]
    VenuesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse venues file: {0}")]
    VenuesFileParse(#[from] serde_yaml::Error),

    #[error("venues file validation failed: {0}")]
    Validation(String),

    #[error("invalid descriptor for venue '{venue}': {reason}")]
    InvalidDescriptor { venue: String, reason: String },

    #[error("invalid pattern for venue '{venue}': {reason}")]
    InvalidPattern { venue: String, reason: String },
}
