//! Extraction attempts and batch orchestration.
//!
//! [`MenuScraper::parse_data_source`] runs the fixed skeleton for one venue:
//! cheap schedule checks first, then acquisition under a timeout, then the
//! venue's [`VenueStrategy::build_menu`]. Every failure ends in
//! [`ExtractionOutcome::NoData`] with the reason logged; nothing aborts a batch.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use lunchvote_core::MenuResult;

use crate::acquisition::DocumentSource;
use crate::calendar::CalendarDay;
use crate::error::{AcquisitionError, CalendarError, ExtractionError};
use crate::strategy::VenueStrategy;

/// The day a menu is wanted for, and the day the attempt runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionAttempt {
    pub target: CalendarDay,
    pub today: NaiveDate,
}

impl ExtractionAttempt {
    #[must_use]
    pub fn new(target: CalendarDay, today: NaiveDate) -> Self {
        Self { target, today }
    }

    /// Attempt for the current local day.
    #[must_use]
    pub fn today() -> Self {
        let today = chrono::Local::now().date_naive();
        Self::new(CalendarDay::from_date(today), today)
    }

    /// Attempt for `date`, run today.
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        Self::new(CalendarDay::from_date(date), chrono::Local::now().date_naive())
    }

    /// Attempt for the local day containing `timestamp`, run today.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidTimestamp`] when `timestamp` is out of range.
    pub fn for_timestamp(timestamp: i64) -> Result<Self, CalendarError> {
        Ok(Self::new(
            CalendarDay::from_timestamp(timestamp)?,
            chrono::Local::now().date_naive(),
        ))
    }

    #[must_use]
    pub fn is_lookahead(&self) -> bool {
        self.target.date() > self.today
    }
}

#[derive(Debug)]
pub enum NoDataReason {
    /// The venue never serves a lunch menu on this weekday.
    NoMenuDay,
    /// The venue's document cannot be trusted for future days yet.
    NotYetPublished,
    Rejected(ExtractionError),
}

impl fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoDataReason::NoMenuDay => f.write_str("no menu on this weekday"),
            NoDataReason::NotYetPublished => f.write_str("future day at a venue that is not lookahead-safe"),
            NoDataReason::Rejected(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Debug)]
pub enum ExtractionOutcome {
    Success(MenuResult),
    NoData(NoDataReason),
}

impl ExtractionOutcome {
    #[must_use]
    pub fn menu(&self) -> Option<&MenuResult> {
        match self {
            ExtractionOutcome::Success(menu) => Some(menu),
            ExtractionOutcome::NoData(_) => None,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Success(_))
    }
}

/// Receives every successful extraction of a batch.
pub trait ResultSink: Send + Sync {
    fn accept(&self, keyword: &str, result: &MenuResult);
}

/// Collects results in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    results: Mutex<Vec<(String, MenuResult)>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn into_results(self) -> Vec<(String, MenuResult)> {
        self.results
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultSink for MemorySink {
    fn accept(&self, keyword: &str, result: &MenuResult) {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((keyword.to_string(), result.clone()));
    }
}

/// Per-outcome counts of one batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub no_menu_day: usize,
    pub not_yet_published: usize,
    pub rejected: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &ExtractionOutcome) {
        self.attempted += 1;
        match outcome {
            ExtractionOutcome::Success(_) => self.succeeded += 1,
            ExtractionOutcome::NoData(NoDataReason::NoMenuDay) => self.no_menu_day += 1,
            ExtractionOutcome::NoData(NoDataReason::NotYetPublished) => {
                self.not_yet_published += 1;
            }
            ExtractionOutcome::NoData(NoDataReason::Rejected(_)) => self.rejected += 1,
        }
    }
}

pub struct MenuScraper<S> {
    source: S,
    acquisition_timeout: Duration,
}

impl<S: DocumentSource> MenuScraper<S> {
    #[must_use]
    pub fn new(source: S, acquisition_timeout: Duration) -> Self {
        Self {
            source,
            acquisition_timeout,
        }
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs one extraction attempt for `venue`.
    ///
    /// No-menu weekdays and unsafe lookahead return before anything is
    /// fetched.
    pub async fn parse_data_source(
        &self,
        venue: &dyn VenueStrategy,
        attempt: &ExtractionAttempt,
    ) -> ExtractionOutcome {
        let descriptor = venue.descriptor();
        let keyword = descriptor.statistics_keyword.as_str();
        let day = attempt.target;

        if descriptor.is_no_menu_day(day.weekday_index()) {
            tracing::debug!(venue = keyword, %day, "no-menu weekday, skipping fetch");
            return ExtractionOutcome::NoData(NoDataReason::NoMenuDay);
        }

        if !descriptor.lookahead_safe && attempt.is_lookahead() {
            tracing::debug!(
                venue = keyword,
                %day,
                today = %attempt.today,
                "venue is not lookahead-safe, skipping fetch"
            );
            return ExtractionOutcome::NoData(NoDataReason::NotYetPublished);
        }

        let result = match self.acquire(&descriptor.data_source).await {
            Ok(text) => {
                tracing::debug!(venue = keyword, %day, chars = text.len(), "document converted");
                venue.build_menu(&text, day)
            }
            Err(e) => Err(ExtractionError::Acquisition(e)),
        };

        match result {
            Ok(menu) => {
                tracing::debug!(venue = keyword, %day, prices = menu.prices.len(), "menu extracted");
                ExtractionOutcome::Success(menu)
            }
            Err(e) => {
                tracing::warn!(venue = keyword, %day, reason = %e, "no menu data");
                ExtractionOutcome::NoData(NoDataReason::Rejected(e))
            }
        }
    }

    async fn acquire(&self, url: &str) -> Result<String, AcquisitionError> {
        tokio::time::timeout(self.acquisition_timeout, self.source.fetch_and_convert(url))
            .await
            .map_err(|_| AcquisitionError::Timeout {
                url: url.to_string(),
                timeout_secs: self.acquisition_timeout.as_secs(),
            })?
    }

    /// Runs `attempt` for every venue, at most `max_concurrent` at a time,
    /// handing each successful menu to `sink`.
    pub async fn run_batch(
        &self,
        venues: &[Arc<dyn VenueStrategy>],
        attempt: &ExtractionAttempt,
        max_concurrent: usize,
        sink: &dyn ResultSink,
    ) -> BatchSummary {
        let outcomes: Vec<(&Arc<dyn VenueStrategy>, ExtractionOutcome)> = stream::iter(venues)
            .map(|venue| async move { (venue, self.parse_data_source(venue.as_ref(), attempt).await) })
            .buffer_unordered(max_concurrent.max(1))
            .collect()
            .await;

        let mut summary = BatchSummary::default();
        for (venue, outcome) in &outcomes {
            summary.record(outcome);
            if let ExtractionOutcome::Success(menu) = outcome {
                sink.accept(&venue.descriptor().statistics_keyword, menu);
            }
        }

        tracing::info!(
            day = %attempt.target,
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            no_menu_day = summary.no_menu_day,
            not_yet_published = summary.not_yet_published,
            rejected = summary.rejected,
            "batch finished"
        );
        summary
    }
}
