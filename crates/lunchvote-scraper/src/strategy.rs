//! The per-venue extraction strategy.
//!
//! [`VenueStrategy`] is a template method: the default hooks run the shared
//! pipeline (validity window, template integrity, day segmentation, prices)
//! from the venue's [`ExtractionProfile`], and a venue overrides only the
//! hooks where its documents deviate.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use lunchvote_core::{ConfigError, MenuItem, MenuResult, Prices, VenueDescriptor};
use regex::Regex;

use crate::calendar::{CalendarDay, Locale};
use crate::date_range::{DateRangeFormat, DateRangeValidator};
use crate::error::ExtractionError;
use crate::integrity::TemplateIntegrity;
use crate::prices::PriceExtractor;
use crate::segment::DaySegmenter;

/// Parsing rules of one venue's document template.
#[derive(Debug, Clone)]
pub struct ExtractionProfile {
    pub locale: Locale,
    pub date_range: DateRangeValidator,
    pub integrity: TemplateIntegrity,
    pub segmenter: DaySegmenter,
    pub prices: PriceExtractor,
}

/// Builder input for [`ExtractionProfile`]; keeps venue modules declarative.
#[derive(Debug, Clone)]
pub struct ProfileSettings<'a> {
    pub locale: Locale,
    /// Line-break convention of the converter output.
    pub separator: &'a str,
    pub date_formats: &'a [DateRangeFormat],
    pub holiday_markers: &'a [&'a str],
    pub starter_markers: &'a [&'a str],
    pub expected_markers: usize,
    pub stop_markers: &'a [&'a str],
    pub price_patterns: &'a [&'a str],
}

impl ExtractionProfile {
    /// Compiles a profile for the venue identified by `venue`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] when a date or price pattern
    /// does not compile.
    pub fn build(venue: &str, settings: &ProfileSettings<'_>) -> Result<Self, ConfigError> {
        let invalid = |e: regex::Error| ConfigError::InvalidPattern {
            venue: venue.to_string(),
            reason: e.to_string(),
        };

        let boundaries = (0..7)
            .flat_map(|i| settings.locale.day_variants(i))
            .collect();
        let stop_markers = settings
            .stop_markers
            .iter()
            .map(ToString::to_string)
            .collect();

        Ok(Self {
            locale: settings.locale,
            date_range: DateRangeValidator::new(settings.locale, settings.date_formats)
                .map_err(invalid)?,
            integrity: TemplateIntegrity::new(
                settings.holiday_markers,
                settings.starter_markers,
                settings.expected_markers,
            )
            .with_separator(settings.separator),
            segmenter: DaySegmenter::new(settings.separator, boundaries, stop_markers),
            prices: PriceExtractor::new(settings.price_patterns).map_err(invalid)?,
        })
    }
}

pub trait VenueStrategy: Send + Sync {
    fn descriptor(&self) -> &VenueDescriptor;

    fn profile(&self) -> &ExtractionProfile;

    /// Headings that mark the block of `day` in this venue's documents.
    fn today_variants(&self, day: CalendarDay) -> Vec<String> {
        day.today_variants(self.profile().locale)
    }

    /// # Errors
    ///
    /// [`ExtractionError::DateRangeRejected`] when no printed window covers `day`.
    fn validate_date_range(&self, text: &str, day: CalendarDay) -> Result<(), ExtractionError> {
        self.profile().date_range.check(text, day)
    }

    /// # Errors
    ///
    /// [`ExtractionError::TemplateMismatch`] when the marker count is off.
    fn check_template(&self, text: &str) -> Result<(), ExtractionError> {
        self.profile().integrity.check(text)
    }

    /// # Errors
    ///
    /// [`ExtractionError::SegmentationMiss`] when `day` has no block or the
    /// block only holds a holiday placeholder.
    fn segment_day(&self, text: &str, day: CalendarDay) -> Result<Vec<String>, ExtractionError> {
        let profile = self.profile();
        let miss = |note: &str| ExtractionError::SegmentationMiss {
            day: format!("{} ({day}){note}", profile.locale.day_name(day.weekday_index())),
        };

        let block = profile
            .segmenter
            .segment(text, &self.today_variants(day))
            .ok_or_else(|| miss(""))?;
        if block.iter().all(|line| profile.integrity.is_holiday(line)) {
            return Err(miss(", closed"));
        }
        Ok(block)
    }

    /// Price patterns in effect on `day`.
    fn price_extractor(&self, _day: CalendarDay) -> &PriceExtractor {
        &self.profile().prices
    }

    /// Assigns categories to the food lines of one day.
    fn menu_items(&self, foods: Vec<String>, _day: CalendarDay) -> Vec<MenuItem> {
        categorize(foods, self.profile())
    }

    /// Runs validation, segmentation and price extraction over a converted
    /// document. Nothing is returned unless every step succeeds.
    ///
    /// # Errors
    ///
    /// Returns the first [`ExtractionError`] any step produced.
    fn build_menu(&self, text: &str, day: CalendarDay) -> Result<MenuResult, ExtractionError> {
        self.validate_date_range(text, day)?;
        self.check_template(text)?;

        let block = self.segment_day(text, day)?;
        let extractor = self.price_extractor(day);

        let (foods, prices) = match &self.descriptor().price_nested_info {
            Some(labels) => {
                let nested = extractor.extract_nested(text, labels)?;
                let foods = block
                    .iter()
                    .map(|line| extractor.split_line(line).0)
                    .filter(|food| !food.is_empty())
                    .collect();
                (foods, Prices::Nested(nested))
            }
            None => {
                let flat = extractor.extract_flat(&block)?;
                (flat.foods, Prices::Flat(flat.prices))
            }
        };

        let items = self.menu_items(foods, day);
        if items.is_empty() {
            return Err(ExtractionError::SegmentationMiss {
                day: format!("{day} (block held only prices)"),
            });
        }
        if let Prices::Flat(flat) = &prices {
            if flat.len() != items.len() {
                return Err(ExtractionError::PriceExtractionMiss {
                    context: format!("{} prices for {} menu items", flat.len(), items.len()),
                });
            }
        }

        let mut days = BTreeMap::new();
        days.insert(day.date(), items);
        Ok(MenuResult {
            venue: self.descriptor().statistics_keyword.clone(),
            days,
            prices,
        })
    }
}

/// Default categories: an explicit `Label: food` prefix wins, starter lines
/// become the locale's starter category, everything else is a numbered main.
#[must_use]
pub fn categorize(foods: Vec<String>, profile: &ExtractionProfile) -> Vec<MenuItem> {
    let (starter, main) = match profile.locale {
        Locale::German => ("Suppe", "Hauptspeise"),
        Locale::English => ("Starter", "Main"),
    };

    let mut mains = 0usize;
    foods
        .into_iter()
        .map(|food| {
            if let Some((category, rest)) = labeled(&food) {
                return MenuItem {
                    category: category.to_string(),
                    food: rest.to_string(),
                };
            }
            if profile.integrity.is_starter(&food) {
                return MenuItem {
                    category: starter.to_string(),
                    food,
                };
            }
            mains += 1;
            let category = if mains == 1 {
                main.to_string()
            } else {
                format!("{main} {mains}")
            };
            MenuItem { category, food }
        })
        .collect()
}

static LABELED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\p{L}[\p{L}\d \-]{0,24}):\s+(\S.*)$").expect("valid regex")
});

fn labeled(food: &str) -> Option<(&str, &str)> {
    let caps = LABELED_RE.captures(food)?;
    Some((caps.get(1)?.as_str().trim(), caps.get(2)?.as_str().trim()))
}
