//! Weekday and week arithmetic plus the locale tables used to recognise day
//! headings and month names in converted menu documents.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Weekday};

use crate::error::CalendarError;

/// Language of a venue's documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    German,
    English,
}

const GERMAN_DAYS: [&str; 7] = [
    "Sonntag",
    "Montag",
    "Dienstag",
    "Mittwoch",
    "Donnerstag",
    "Freitag",
    "Samstag",
];

const ENGLISH_DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

// Austrian documents mix standard and regional month spellings.
const GERMAN_MONTHS: [&[&str]; 12] = [
    &["jänner", "januar", "jan"],
    &["feber", "februar", "feb"],
    &["märz", "maerz", "mär", "mrz"],
    &["april", "apr"],
    &["mai"],
    &["juni", "jun"],
    &["juli", "jul"],
    &["august", "aug"],
    &["september", "sept", "sep"],
    &["oktober", "okt"],
    &["november", "nov"],
    &["dezember", "dez"],
];

const ENGLISH_MONTHS: [&[&str]; 12] = [
    &["january", "jan"],
    &["february", "feb"],
    &["march", "mar"],
    &["april", "apr"],
    &["may"],
    &["june", "jun"],
    &["july", "jul"],
    &["august", "aug"],
    &["september", "sept", "sep"],
    &["october", "oct"],
    &["november", "nov"],
    &["december", "dec"],
];

impl Locale {
    /// Full day name for a weekday index (0 = Sunday).
    #[must_use]
    pub fn day_name(self, weekday_index: u8) -> &'static str {
        let names = match self {
            Locale::German => &GERMAN_DAYS,
            Locale::English => &ENGLISH_DAYS,
        };
        names[usize::from(weekday_index % 7)]
    }

    /// Spellings that identify the weekday as a heading: the full name, the
    /// two- or three-letter abbreviation, and the abbreviation with a dot.
    #[must_use]
    pub fn day_variants(self, weekday_index: u8) -> Vec<String> {
        let name = self.day_name(weekday_index);
        let abbrev_len = match self {
            Locale::German => 2,
            Locale::English => 3,
        };
        let abbrev: String = name.chars().take(abbrev_len).collect();
        vec![name.to_string(), format!("{abbrev}."), abbrev]
    }

    /// Month number (1..=12) for a lowercase month token.
    #[must_use]
    pub fn month_number(self, token: &str) -> Option<u32> {
        let table = match self {
            Locale::German => &GERMAN_MONTHS,
            Locale::English => &ENGLISH_MONTHS,
        };
        let lower = token.trim_end_matches('.').to_lowercase();
        table
            .iter()
            .position(|names| names.contains(&lower.as_str()))
            .and_then(|idx| u32::try_from(idx + 1).ok())
    }

    /// Regex alternation of every month spelling, longest first.
    #[must_use]
    pub fn month_alternation(self) -> String {
        let table = match self {
            Locale::German => &GERMAN_MONTHS,
            Locale::English => &ENGLISH_MONTHS,
        };
        let mut names: Vec<&str> = table.iter().flat_map(|names| names.iter().copied()).collect();
        names.sort_by_key(|n| std::cmp::Reverse(n.chars().count()));
        names
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// A calendar day in the process-local time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    date: NaiveDate,
}

impl CalendarDay {
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Resolves a unix timestamp (seconds) to the local calendar day.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidTimestamp`] when chrono cannot
    /// represent the instant.
    pub fn from_timestamp(timestamp: i64) -> Result<Self, CalendarError> {
        let utc = DateTime::from_timestamp(timestamp, 0)
            .ok_or(CalendarError::InvalidTimestamp(timestamp))?;
        Ok(Self {
            date: utc.with_timezone(&Local).date_naive(),
        })
    }

    #[must_use]
    pub fn date(self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn weekday(self) -> Weekday {
        self.date.weekday()
    }

    /// Weekday index with 0 = Sunday .. 6 = Saturday.
    #[must_use]
    pub fn weekday_index(self) -> u8 {
        // num_days_from_sunday is always < 7
        u8::try_from(self.date.weekday().num_days_from_sunday()).unwrap_or(0)
    }

    #[must_use]
    pub fn today_variants(self, locale: Locale) -> Vec<String> {
        locale.day_variants(self.weekday_index())
    }

    /// Monday and Sunday of the ISO week containing this day.
    #[must_use]
    pub fn week_bounds(self) -> (NaiveDate, NaiveDate) {
        let offset = i64::from(self.date.weekday().num_days_from_monday());
        let monday = self.date - Duration::days(offset);
        (monday, monday + Duration::days(6))
    }

    /// [`Self::week_bounds`] rendered as `YYYY-MM-DD`.
    #[must_use]
    pub fn week_range_iso(self) -> (String, String) {
        let (start, end) = self.week_bounds();
        (
            start.format("%Y-%m-%d").to_string(),
            end.format("%Y-%m-%d").to_string(),
        )
    }
}

impl std::fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}
