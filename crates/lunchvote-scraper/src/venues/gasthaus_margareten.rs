//! Gasthaus Margareten.
//!
//! Weekly Word document, prices printed on the dish line. The Friday fish
//! dish is typed with a decimal point (`11.50`) instead of a comma.

use chrono::Weekday;
use lunchvote_core::{ConfigError, VenueDescriptor};

use crate::calendar::{CalendarDay, Locale};
use crate::date_range::DateRangeFormat;
use crate::prices::PriceExtractor;
use crate::strategy::{ExtractionProfile, ProfileSettings, VenueStrategy};

const COMMA_PRICE: &str = r"\b\d{1,2},\d{2}\b";
const POINT_PRICE: &str = r"\b\d{1,2}\.\d{2}\b";

pub struct GasthausMargareten {
    descriptor: VenueDescriptor,
    profile: ExtractionProfile,
    friday_prices: PriceExtractor,
}

impl GasthausMargareten {
    pub const KEYWORD: &'static str = "gasthaus-margareten";

    #[must_use]
    pub fn default_descriptor() -> VenueDescriptor {
        VenueDescriptor {
            title: "Gasthaus Margareten".to_string(),
            title_notifier: None,
            address: "Margaretenstraße 77, 1050 Wien".to_string(),
            latitude: 48.190_412,
            longitude: 16.356_120,
            url: "https://www.gasthaus-margareten.at/".to_string(),
            data_source: "https://www.gasthaus-margareten.at/downloads/mittagsmenue.doc"
                .to_string(),
            menu_url: "https://www.gasthaus-margareten.at/speisekarte/".to_string(),
            statistics_keyword: Self::KEYWORD.to_string(),
            no_menu_days: vec![0, 6],
            lookahead_safe: false,
            price_nested_info: None,
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] when the descriptor is invalid.
    pub fn from_descriptor(descriptor: VenueDescriptor) -> Result<Self, ConfigError> {
        descriptor.validate()?;
        let profile = ExtractionProfile::build(
            &descriptor.statistics_keyword,
            &ProfileSettings {
                locale: Locale::German,
                separator: "\n",
                date_formats: &[DateRangeFormat::MonthName],
                holiday_markers: &["ruhetag", "geschlossen"],
                starter_markers: &["suppe"],
                expected_markers: 5,
                stop_markers: &["Alle Preise", "Preise"],
                price_patterns: &[COMMA_PRICE],
            },
        )?;
        let friday_prices = PriceExtractor::new(&[COMMA_PRICE, POINT_PRICE]).map_err(|e| {
            ConfigError::InvalidPattern {
                venue: descriptor.statistics_keyword.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            descriptor,
            profile,
            friday_prices,
        })
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] if the built-in descriptor fails validation.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_descriptor(Self::default_descriptor())
    }
}

impl VenueStrategy for GasthausMargareten {
    fn descriptor(&self) -> &VenueDescriptor {
        &self.descriptor
    }

    fn profile(&self) -> &ExtractionProfile {
        &self.profile
    }

    fn price_extractor(&self, day: CalendarDay) -> &PriceExtractor {
        if day.weekday() == Weekday::Fri {
            &self.friday_prices
        } else {
            &self.profile.prices
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use lunchvote_core::Prices;

    use super::*;
    use crate::error::ExtractionError;

    const WEEK: &str = "\
Gasthaus Margareten - Mittagsmenü
16. - 20. März 2026

Montag
Kürbiscremesuppe 3,50
Wiener Schnitzel mit Erdäpfelsalat 10,90
Dienstag
Frittatensuppe 3,50
Faschierter Braten mit Püree 9,50
Mittwoch
Tomatensuppe 3,50
Vegetarisch: Spinatknödel mit Parmesan 8,90 €
Donnerstag
Rindsuppe mit Nudeln 3,90
Backhendl mit Gurkensalat 10,50
Freitag
Fischsuppe 3,90
Gebackener Karpfen mit Erdäpfelsalat 11.50

Alle Preise in Euro inkl. MwSt.
";

    fn day(d: u32) -> CalendarDay {
        CalendarDay::from_date(NaiveDate::from_ymd_opt(2026, 3, d).unwrap())
    }

    #[test]
    fn wednesday_flat_prices_and_labeled_dish() {
        let venue = GasthausMargareten::new().unwrap();
        let menu = venue.build_menu(WEEK, day(18)).unwrap();

        let items = menu.items_for(day(18).date()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category, "Suppe");
        assert_eq!(items[1].category, "Vegetarisch");
        assert_eq!(items[1].food, "Spinatknödel mit Parmesan");
        assert_eq!(
            menu.prices,
            Prices::Flat(vec!["3,50".to_string(), "8,90".to_string()])
        );
    }

    #[test]
    fn friday_reads_point_prices() {
        let venue = GasthausMargareten::new().unwrap();
        let menu = venue.build_menu(WEEK, day(20)).unwrap();
        assert_eq!(
            menu.prices,
            Prices::Flat(vec!["3,90".to_string(), "11.50".to_string()])
        );
        assert_eq!(
            menu.items_for(day(20).date()).unwrap()[1].food,
            "Gebackener Karpfen mit Erdäpfelsalat"
        );
    }

    #[test]
    fn point_price_outside_friday_is_a_miss() {
        let text = WEEK.replace("Püree 9,50", "Püree 9.50");
        let err = GasthausMargareten::new()
            .unwrap()
            .build_menu(&text, day(17))
            .unwrap_err();
        assert!(matches!(err, ExtractionError::PriceExtractionMiss { .. }));
    }

    #[test]
    fn each_dish_is_paired_with_its_price() {
        let venue = GasthausMargareten::new().unwrap();
        let menu = venue.build_menu(WEEK, day(16)).unwrap();
        let items = menu.items_for(day(16).date()).unwrap();
        let Prices::Flat(prices) = &menu.prices else {
            panic!("expected flat prices, got {:?}", menu.prices);
        };
        let pairs: Vec<(&str, &str)> = items
            .iter()
            .zip(prices)
            .map(|(item, price)| (item.food.as_str(), price.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Kürbiscremesuppe", "3,50"),
                ("Wiener Schnitzel mit Erdäpfelsalat", "10,90"),
            ]
        );
    }

    #[test]
    fn unpriced_soup_is_a_miss() {
        let text = WEEK.replace("Tomatensuppe 3,50", "Tomatensuppe");
        let err = GasthausMargareten::new()
            .unwrap()
            .build_menu(&text, day(18))
            .unwrap_err();
        assert!(matches!(err, ExtractionError::PriceExtractionMiss { .. }));
    }

    #[test]
    fn not_lookahead_safe() {
        assert!(!GasthausMargareten::default_descriptor().lookahead_safe);
    }

    #[test]
    fn closed_day_is_a_miss() {
        let text = WEEK.replace(
            "Rindsuppe mit Nudeln 3,90\nBackhendl mit Gurkensalat 10,50",
            "Ruhetag",
        );
        let err = GasthausMargareten::new()
            .unwrap()
            .build_menu(&text, day(19))
            .unwrap_err();
        assert!(matches!(err, ExtractionError::SegmentationMiss { .. }));
    }
}
