//! Waldviertlerhof, Schönbrunner Straße.
//!
//! One weekly PDF with a soup and a main per weekday and a single price line
//! (`Menü / Tagesteller / Fischmenü Freitag`) below Friday.

use chrono::Weekday;
use lunchvote_core::{ConfigError, MenuItem, VenueDescriptor};

use crate::calendar::{CalendarDay, Locale};
use crate::date_range::DateRangeFormat;
use crate::strategy::{categorize, ExtractionProfile, ProfileSettings, VenueStrategy};

pub struct Waldviertlerhof {
    descriptor: VenueDescriptor,
    profile: ExtractionProfile,
}

impl Waldviertlerhof {
    pub const KEYWORD: &'static str = "waldviertlerhof";

    /// Soups plus closed-day placeholders of a regular week.
    pub const EXPECTED_MARKERS: usize = 5;

    #[must_use]
    pub fn default_descriptor() -> VenueDescriptor {
        VenueDescriptor {
            title: "Waldviertlerhof".to_string(),
            title_notifier: None,
            address: "Schönbrunnerstrasse 20, 1050 Wien".to_string(),
            latitude: 48.193_692,
            longitude: 16.358_687,
            url: "http://www.waldviertlerhof.at/".to_string(),
            data_source: "http://www.waldviertlerhof.at/assets/w4h_mittagsmenue.pdf".to_string(),
            menu_url: "http://www.waldviertlerhof.at/assets/w4h_speisen_getränke2.pdf".to_string(),
            statistics_keyword: Self::KEYWORD.to_string(),
            no_menu_days: vec![0, 6],
            lookahead_safe: true,
            price_nested_info: Some(vec![
                "Menü".to_string(),
                "Tagesteller".to_string(),
                "Fischmenü Freitag".to_string(),
            ]),
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
                date_formats: &[DateRangeFormat::NumericDotted],
                holiday_markers: &["feiertag", "geschlossen", "ruhetag"],
                starter_markers: &["suppe"],
                expected_markers: Self::EXPECTED_MARKERS,
                stop_markers: &["Menü", "Tagesteller", "Fischmenü", "Preise"],
                price_patterns: &[r"\b\d{1,2},\d{2}\b"],
            },
        )?;
        Ok(Self {
            descriptor,
            profile,
        })
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] if the built-in descriptor fails validation.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_descriptor(Self::default_descriptor())
    }
}

impl VenueStrategy for Waldviertlerhof {
    fn descriptor(&self) -> &VenueDescriptor {
        &self.descriptor
    }

    fn profile(&self) -> &ExtractionProfile {
        &self.profile
    }

    // headings are always spelled out
    fn today_variants(&self, day: CalendarDay) -> Vec<String> {
        vec![Locale::German.day_name(day.weekday_index()).to_string()]
    }

    fn menu_items(&self, foods: Vec<String>, day: CalendarDay) -> Vec<MenuItem> {
        let mut items = categorize(foods, &self.profile);
        if day.weekday() == Weekday::Fri {
            if let Some(fish) = items
                .iter_mut()
                .rev()
                .find(|item| item.category.starts_with("Hauptspeise"))
            {
                fish.category = "Fischmenü".to_string();
            }
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use lunchvote_core::Prices;

    use super::*;
    use crate::error::ExtractionError;

    const WEEK: &str = "\
Waldviertlerhof
Mittagsmenü 16.03. - 20.03.2026

MONTAG
Frittatensuppe
Schweinsbraten mit Serviettenknödel
DIENSTAG
Grießnockerlsuppe
Rindsgulasch mit Semmel
MITTWOCH
Leberknödelsuppe
Gebackene Hühnerleber mit Petersilkartoffeln
DONNERSTAG
Gemüsesuppe
Krautfleckerl mit grünem Salat
FREITAG
Fischsuppe
Gebratenes Zanderfilet mit Erdäpfelsalat

Menü 8,90   Tagesteller 7,50   Fischmenü Freitag 11,00
";

    fn day(d: u32) -> CalendarDay {
        CalendarDay::from_date(NaiveDate::from_ymd_opt(2026, 3, d).unwrap())
    }

    #[test]
    fn default_descriptor_is_valid() {
        let venue = Waldviertlerhof::new().unwrap();
        assert_eq!(venue.descriptor().statistics_keyword, "waldviertlerhof");
        assert!(venue.descriptor().is_no_menu_day(0));
        assert!(venue.descriptor().is_no_menu_day(6));
        assert!(venue.descriptor().lookahead_safe);
    }

    #[test]
    fn only_full_day_name_is_a_heading() {
        let venue = Waldviertlerhof::new().unwrap();
        assert_eq!(venue.today_variants(day(18)), vec!["Mittwoch"]);
    }

    #[test]
    fn wednesday_menu_with_nested_prices() {
        let venue = Waldviertlerhof::new().unwrap();
        let menu = venue.build_menu(WEEK, day(18)).unwrap();

        let items = menu.items_for(day(18).date()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category, "Suppe");
        assert_eq!(items[0].food, "Leberknödelsuppe");
        assert_eq!(items[1].category, "Hauptspeise");

        assert_eq!(menu.prices.get("Menü"), Some("8,90"));
        assert_eq!(menu.prices.get("Tagesteller"), Some("7,50"));
        assert_eq!(menu.prices.get("Fischmenü Freitag"), Some("11,00"));
        assert!(matches!(menu.prices, Prices::Nested(_)));
    }

    #[test]
    fn friday_main_is_the_fish_menu() {
        let venue = Waldviertlerhof::new().unwrap();
        let menu = venue.build_menu(WEEK, day(20)).unwrap();
        let items = menu.items_for(day(20).date()).unwrap();
        assert_eq!(items[1].category, "Fischmenü");
        assert_eq!(items[1].food, "Gebratenes Zanderfilet mit Erdäpfelsalat");
    }

    #[test]
    fn holiday_keeps_the_marker_count() {
        let text = WEEK.replace("Grießnockerlsuppe\nRindsgulasch mit Semmel", "Feiertag");
        let venue = Waldviertlerhof::new().unwrap();
        assert!(venue.build_menu(&text, day(18)).is_ok());
        // the holiday placeholder is not a menu
        assert!(venue.build_menu(&text, day(17)).is_err());
    }

    #[test]
    fn extra_soup_is_rejected() {
        let text = WEEK.replace("Krautfleckerl", "Knoblauchsuppe\nKrautfleckerl");
        let err = Waldviertlerhof::new()
            .unwrap()
            .build_menu(&text, day(18))
            .unwrap_err();
        assert!(matches!(err, ExtractionError::TemplateMismatch { found: 6, .. }));
    }

    #[test]
    fn next_week_is_out_of_range() {
        let err = Waldviertlerhof::new()
            .unwrap()
            .build_menu(WEEK, day(25))
            .unwrap_err();
        assert!(matches!(err, ExtractionError::DateRangeRejected { .. }));
    }
}
