//! Document acquisition: download a venue's published menu and turn it into
//! plain text with an external converter.

mod convert;
mod deps;

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use crate::error::AcquisitionError;
use crate::rate_limit::retry_with_backoff;

pub use convert::ConverterCommands;
pub use deps::missing_commands;

/// Fetches a document by URL and returns its text.
///
/// Implementations must yield UTF-8 text whose line breaks follow the
/// convention the venue profiles expect (`\n` for the bundled converters).
pub trait DocumentSource: Send + Sync {
    fn fetch_and_convert(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<String, AcquisitionError>> + Send;
}

/// Format of a published document, derived from the URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Word,
    PlainText,
}

impl DocumentFormat {
    /// Unknown extensions are treated as PDF, which is what venues publish.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError::InvalidUrl`] when `url` does not parse.
    pub fn from_url(url: &str) -> Result<Self, AcquisitionError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| AcquisitionError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        let path = parsed.path().to_lowercase();
        Ok(if path.ends_with(".doc") {
            DocumentFormat::Word
        } else if path.ends_with(".txt") {
            DocumentFormat::PlainText
        } else {
            DocumentFormat::Pdf
        })
    }
}

/// Downloads documents over HTTP and converts them with `pdftotext` or
/// `antiword`.
///
/// Transient download errors (429, network failures, 5xx) are retried with
/// exponential backoff; conversion errors are not.
pub struct ConvertingSource {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
    converters: ConverterCommands,
}

impl ConvertingSource {
    /// # Errors
    ///
    /// Returns [`AcquisitionError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
        converters: ConverterCommands,
    ) -> Result<Self, AcquisitionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
            converters,
        })
    }

    /// # Errors
    ///
    /// Returns [`AcquisitionError::Http`] if the `reqwest::Client` cannot be built.
    pub fn from_config(config: &lunchvote_core::AppConfig) -> Result<Self, AcquisitionError> {
        Self::new(
            config.fetch_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
            ConverterCommands::new(&config.pdftotext_bin, &config.antiword_bin),
        )
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, AcquisitionError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self.client.get(url).send().await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(AcquisitionError::RateLimited {
                    domain: extract_domain(url),
                    retry_after_secs,
                });
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(AcquisitionError::NotFound {
                    url: url.to_owned(),
                });
            }

            if !status.is_success() {
                return Err(AcquisitionError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            Ok(response.bytes().await?.to_vec())
        })
        .await
    }
}

impl DocumentSource for ConvertingSource {
    async fn fetch_and_convert(&self, url: &str) -> Result<String, AcquisitionError> {
        let format = DocumentFormat::from_url(url)?;
        let bytes = self.download(url).await?;
        tracing::debug!(url, bytes = bytes.len(), ?format, "downloaded menu document");

        let text = match format {
            DocumentFormat::PlainText => String::from_utf8_lossy(&bytes).into_owned(),
            DocumentFormat::Pdf => self.converters.pdf_to_text(&bytes).await?,
            DocumentFormat::Word => self.converters.word_to_text(&bytes).await?,
        };

        if text.trim().is_empty() {
            return Err(AcquisitionError::EmptyDocument {
                url: url.to_owned(),
            });
        }
        Ok(text)
    }
}

/// Hostname of `url` for error messages; the full string if it does not parse.
fn extract_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}
