use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide settings for a scrape run.
///
/// Only the acquisition step is networked, so most knobs here bound how
/// documents are fetched and converted.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Optional `venues.yaml` with per-venue overrides.
    pub venues_path: Option<PathBuf>,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_venues: usize,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub pdftotext_bin: String,
    pub antiword_bin: String,
}
