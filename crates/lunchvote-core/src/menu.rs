//! Extraction output handed to the voting/persistence side.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One line of a day's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub category: String,
    pub food: String,
}

/// Prices published alongside the menu.
///
/// `Flat` is aligned positionally with the day's items. `Nested` is used by
/// venues that publish a fixed set of price tiers, keyed by tier label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prices {
    Flat(Vec<String>),
    Nested(BTreeMap<String, String>),
}

impl Prices {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Prices::Flat(list) => list.len(),
            Prices::Nested(map) => map.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a nested price by label. Always `None` for flat prices.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        match self {
            Prices::Flat(_) => None,
            Prices::Nested(map) => map.get(label).map(String::as_str),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuResult {
    /// Statistics keyword of the venue that produced this result.
    pub venue: String,
    pub days: BTreeMap<NaiveDate, Vec<MenuItem>>,
    pub prices: Prices,
}

impl MenuResult {
    #[must_use]
    pub fn items_for(&self, day: NaiveDate) -> Option<&[MenuItem]> {
        self.days.get(&day).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_prices_lookup_by_label() {
        let mut map = BTreeMap::new();
        map.insert("Menü".to_string(), "8,90".to_string());
        let prices = Prices::Nested(map);
        assert_eq!(prices.get("Menü"), Some("8,90"));
        assert_eq!(prices.get("Tagesteller"), None);
        assert_eq!(prices.len(), 1);
    }

    #[test]
    fn flat_prices_have_no_labels() {
        let prices = Prices::Flat(vec!["3,50".to_string()]);
        assert_eq!(prices.get("3,50"), None);
        assert!(!prices.is_empty());
    }

    #[test]
    fn menu_result_serializes_days_as_iso_dates() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
        let mut days = BTreeMap::new();
        days.insert(
            day,
            vec![MenuItem {
                category: "Suppe".to_string(),
                food: "Leberknödelsuppe".to_string(),
            }],
        );
        let result = MenuResult {
            venue: "waldviertlerhof".to_string(),
            days,
            prices: Prices::Flat(vec!["3,50".to_string()]),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["days"]["2026-03-18"][0]["food"], "Leberknödelsuppe");
        assert_eq!(json["prices"]["flat"][0], "3,50");
        assert_eq!(result.items_for(day).map(<[MenuItem]>::len), Some(1));
    }
}
