//! Validity-window detection.
//!
//! Menu documents print the period they are valid for ("16.03. - 20.03.2026",
//! "16. - 20. März 2026"). A document is only trusted for a day when one of
//! those periods covers it; a document without a recognisable period is
//! rejected outright.

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};

use crate::calendar::{CalendarDay, Locale};
use crate::error::ExtractionError;

/// How a venue prints its validity window.
///
/// `Custom` patterns must use the named groups `sd`, `ed` (days), `sm`/`smn`
/// and `em`/`emn` (numeric or named months) and optionally `sy`, `ey`.
#[derive(Debug, Clone)]
pub enum DateRangeFormat {
    /// `16.03. - 20.03.2026`, `16.3.2026 bis Freitag, 20.3.2026`
    NumericDotted,
    /// `16. - 20. März 2026`, `30. März - 3. April`
    MonthName,
    Custom(String),
}

impl DateRangeFormat {
    fn pattern(&self, locale: Locale) -> String {
        const DASH: &str = r"\s*(?:-|–|—|bis|to|until)\s*(?:\p{L}+,?\s*)?";
        match self {
            DateRangeFormat::NumericDotted => format!(
                r"(?i)\b(?P<sd>\d{{1,2}})\.\s*(?P<sm>\d{{1,2}})\.?\s*(?P<sy>\d{{4}}|\d{{2}}\b)?{DASH}\b(?P<ed>\d{{1,2}})\.\s*(?P<em>\d{{1,2}})\.?\s*(?P<ey>\d{{4}}|\d{{2}}\b)?"
            ),
            DateRangeFormat::MonthName => {
                let months = locale.month_alternation();
                format!(
                    r"(?i)\b(?P<sd>\d{{1,2}})\.?\s*(?:(?P<smn>{months})\b\.?\s*)?(?P<sy>\d{{4}})?{DASH}\b(?P<ed>\d{{1,2}})\.?\s*(?P<emn>{months})\b\.?\s*(?P<ey>\d{{4}})?"
                )
            }
            DateRangeFormat::Custom(pattern) => pattern.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DateRangeValidator {
    locale: Locale,
    patterns: Vec<Regex>,
}

impl DateRangeValidator {
    /// # Errors
    ///
    /// Returns the regex error of the first format that does not compile.
    pub fn new(locale: Locale, formats: &[DateRangeFormat]) -> Result<Self, regex::Error> {
        let patterns = formats
            .iter()
            .map(|f| Regex::new(&f.pattern(locale)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { locale, patterns })
    }

    /// `true` when some validity window in `text` covers `day`.
    #[must_use]
    pub fn validate(&self, text: &str, day: CalendarDay) -> bool {
        self.check(text, day).is_ok()
    }

    /// Like [`Self::validate`] but reports what was found on rejection.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::DateRangeRejected`] when no window is found
    /// or none covers `day`.
    pub fn check(&self, text: &str, day: CalendarDay) -> Result<(), ExtractionError> {
        let date = day.date();
        let ranges = self.find_ranges(text, date.year());

        if ranges
            .iter()
            .any(|(start, end)| *start <= date && date <= *end)
        {
            return Ok(());
        }

        let detail = if ranges.is_empty() {
            "no validity range found".to_string()
        } else {
            let found = ranges
                .iter()
                .map(|(s, e)| format!("{s}..{e}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("found {found}")
        };
        Err(ExtractionError::DateRangeRejected {
            day: day.to_string(),
            detail,
        })
    }

    /// Every well-formed window in `text`.
    ///
    /// Windows without an end year are resolved against `reference_year` and
    /// the year after it, so a yearless `29.12. - 02.01.` still covers both
    /// sides of New Year.
    #[must_use]
    pub fn find_ranges(&self, text: &str, reference_year: i32) -> Vec<(NaiveDate, NaiveDate)> {
        let mut ranges = Vec::new();
        for pattern in &self.patterns {
            for caps in pattern.captures_iter(text) {
                let Some(parts) = RangeParts::from_captures(&caps, self.locale) else {
                    continue;
                };
                ranges.extend(parts.resolve(reference_year));
                if parts.end_year.is_none() {
                    ranges.extend(parts.resolve(reference_year + 1));
                }
            }
        }
        ranges.sort_unstable();
        ranges.dedup();
        ranges
    }
}

struct RangeParts {
    start_day: u32,
    start_month: Option<u32>,
    start_year: Option<i32>,
    end_day: u32,
    end_month: u32,
    end_year: Option<i32>,
}

impl RangeParts {
    fn from_captures(caps: &Captures<'_>, locale: Locale) -> Option<Self> {
        let number = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u32>().ok());
        let year = |name: &str| {
            caps.name(name)
                .and_then(|m| m.as_str().parse::<i32>().ok())
                .map(normalize_year)
        };
        let month = |numeric: &str, named: &str| {
            number(numeric).or_else(|| {
                caps.name(named)
                    .and_then(|m| locale.month_number(m.as_str()))
            })
        };

        Some(Self {
            start_day: number("sd")?,
            start_month: month("sm", "smn"),
            start_year: year("sy"),
            end_day: number("ed")?,
            end_month: month("em", "emn")?,
            end_year: year("ey"),
        })
    }

    fn resolve(&self, reference_year: i32) -> Option<(NaiveDate, NaiveDate)> {
        let end_year = self.end_year.unwrap_or(reference_year);
        let start_month = self.start_month.unwrap_or(self.end_month);
        let start_year = self.start_year.unwrap_or(if start_month > self.end_month {
            end_year - 1
        } else {
            end_year
        });

        let start = NaiveDate::from_ymd_opt(start_year, start_month, self.start_day)?;
        let end = NaiveDate::from_ymd_opt(end_year, self.end_month, self.end_day)?;
        (start <= end).then_some((start, end))
    }
}

fn normalize_year(year: i32) -> i32 {
    if year < 100 {
        2000 + year
    } else {
        year
    }
}
