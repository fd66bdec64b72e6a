pub mod acquisition;
pub mod calendar;
pub mod date_range;
pub mod error;
pub mod integrity;
pub mod prices;
mod rate_limit;
pub mod registry;
pub mod runner;
pub mod segment;
pub mod strategy;
pub mod venues;

pub use acquisition::{
    missing_commands, ConverterCommands, ConvertingSource, DocumentFormat, DocumentSource,
};
pub use calendar::{CalendarDay, Locale};
pub use date_range::{DateRangeFormat, DateRangeValidator};
pub use error::{AcquisitionError, CalendarError, ExtractionError};
pub use integrity::TemplateIntegrity;
pub use prices::{FlatExtraction, PriceExtractor};
pub use registry::VenueRegistry;
pub use runner::{
    BatchSummary, ExtractionAttempt, ExtractionOutcome, MemorySink, MenuScraper, NoDataReason,
    ResultSink,
};
pub use segment::DaySegmenter;
pub use strategy::{categorize, ExtractionProfile, ProfileSettings, VenueStrategy};
pub use venues::{GasthausMargareten, Waldviertlerhof};
