//! Regex-driven price extraction.
//!
//! A venue supplies one or more alternative patterns (`\d,\d\d` next to
//! `\d.\d\d` and the like). Matches from all patterns are merged by position
//! so alternative spellings in the same document keep their reading order.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExtractionError;

#[derive(Debug, Clone)]
pub struct PriceExtractor {
    patterns: Vec<Regex>,
}

/// A day block split into dishes and their prices, aligned by index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlatExtraction {
    pub foods: Vec<String>,
    pub prices: Vec<String>,
}

impl PriceExtractor {
    /// # Errors
    ///
    /// Returns the regex error of the first pattern that does not compile.
    pub fn new(patterns: &[&str]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Price tokens in `text` as `(start, end)` byte spans, in reading order.
    /// Where alternative patterns overlap, the earliest and then longest match wins.
    fn spans(&self, text: &str) -> Vec<(usize, usize)> {
        let mut spans: Vec<(usize, usize)> = self
            .patterns
            .iter()
            .flat_map(|p| p.find_iter(text).map(|m| (m.start(), m.end())))
            .collect();
        spans.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
        for span in spans {
            if merged.last().is_some_and(|last| span.0 < last.1) {
                continue;
            }
            merged.push(span);
        }
        merged
    }

    /// All price tokens in `text`, in reading order.
    #[must_use]
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.spans(text)
            .into_iter()
            .map(|(start, end)| &text[start..end])
            .collect()
    }

    /// Separates a menu line into its food text and price tokens.
    ///
    /// Currency noise left behind (`€`, `EUR`, separators) is stripped from
    /// the food text; a line that held only a price yields an empty string.
    #[must_use]
    pub fn split_line(&self, line: &str) -> (String, Vec<String>) {
        let spans = self.spans(line);
        let prices = spans
            .iter()
            .map(|(start, end)| line[*start..*end].to_string())
            .collect();

        let mut food = String::with_capacity(line.len());
        let mut cursor = 0;
        for (start, end) in &spans {
            food.push_str(&line[cursor..*start]);
            food.push(' ');
            cursor = *end;
        }
        food.push_str(&line[cursor..]);

        (clean_food_text(&food), prices)
    }

    /// Pairs every dish of a block with its price.
    ///
    /// A dish line carries its price, or the price follows on the next
    /// price-only line. Extra prices on a dish line are ignored, so `foods`
    /// and `prices` always have the same length.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PriceExtractionMiss`] when a dish has no
    /// price, a price has no dish, or the block holds no price at all.
    pub fn extract_flat(&self, lines: &[String]) -> Result<FlatExtraction, ExtractionError> {
        let miss = |context: String| ExtractionError::PriceExtractionMiss { context };

        let mut extraction = FlatExtraction::default();
        let mut unpriced: Option<String> = None;
        for line in lines {
            let (food, prices) = self.split_line(line);
            let price = prices.first().cloned();
            if prices.len() > 1 {
                tracing::debug!(line = %line, prices = prices.len(), "keeping first price of line");
            }

            if food.is_empty() {
                let Some(price) = price else { continue };
                let dish = unpriced
                    .take()
                    .ok_or_else(|| miss(format!("price {price} follows no dish")))?;
                extraction.foods.push(dish);
                extraction.prices.push(price);
                continue;
            }

            if let Some(dish) = unpriced.take() {
                return Err(miss(format!("no price for '{dish}'")));
            }
            match price {
                Some(price) => {
                    extraction.foods.push(food);
                    extraction.prices.push(price);
                }
                None => unpriced = Some(food),
            }
        }

        if let Some(dish) = unpriced {
            return Err(miss(format!("no price for '{dish}'")));
        }
        if extraction.prices.is_empty() {
            return Err(miss(format!("no price token in {} block lines", lines.len())));
        }
        Ok(extraction)
    }

    /// Finds one price per label.
    ///
    /// Each label is looked up at a word boundary; its price is the first
    /// token between the label and the next label on the same line (or the
    /// line end). When any label cannot be resolved that way, all tokens of
    /// the document are assigned to the labels in order, provided there are
    /// exactly as many tokens as labels.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PriceExtractionMiss`] when neither strategy
    /// yields a price for every label.
    pub fn extract_nested(
        &self,
        text: &str,
        labels: &[String],
    ) -> Result<BTreeMap<String, String>, ExtractionError> {
        let label_patterns = labels
            .iter()
            .map(|label| Regex::new(&format!(r"(?i)\b{}", regex::escape(label))))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ExtractionError::PriceExtractionMiss {
                context: format!("unusable nested label: {e}"),
            })?;

        let label_starts: Vec<usize> = label_patterns
            .iter()
            .flat_map(|p| p.find_iter(text).map(|m| m.start()))
            .collect();

        let mut found = BTreeMap::new();
        for (label, pattern) in labels.iter().zip(&label_patterns) {
            let price = pattern.find_iter(text).find_map(|m| {
                let span = label_span(text, m.end(), &label_starts);
                self.find_all(span).first().map(|p| (*p).to_string())
            });
            match price {
                Some(price) => {
                    found.insert(label.clone(), price);
                }
                None => break,
            }
        }
        if found.len() == labels.len() {
            return Ok(found);
        }

        let all = self.find_all(text);
        if all.len() == labels.len() {
            tracing::debug!(
                labels = labels.len(),
                "nested labels not found inline; assigning prices by position"
            );
            return Ok(labels
                .iter()
                .cloned()
                .zip(all.into_iter().map(str::to_string))
                .collect());
        }

        Err(ExtractionError::PriceExtractionMiss {
            context: format!(
                "resolved {} of {} nested labels; document holds {} price tokens",
                found.len(),
                labels.len(),
                all.len()
            ),
        })
    }
}

/// From `from` to the next label start on the same line, or the line end.
fn label_span<'t>(text: &'t str, from: usize, label_starts: &[usize]) -> &'t str {
    let line_end = text[from..].find('\n').map_or(text.len(), |i| from + i);
    let end = label_starts
        .iter()
        .copied()
        .filter(|start| *start >= from && *start < line_end)
        .min()
        .unwrap_or(line_end);
    &text[from..end]
}

static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)€|\bEUR\b|\bEuro\b").expect("valid regex"));

fn clean_food_text(raw: &str) -> String {
    let without_currency = CURRENCY_RE.replace_all(raw, " ");
    let collapsed = without_currency.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | '/' | '|' | '.' | ',' | ':' | ';'))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comma_prices() -> PriceExtractor {
        PriceExtractor::new(&[r"\b\d{1,2},\d{2}\b"]).unwrap()
    }

    fn labels(v: &[&str]) -> Vec<String> {
        v.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn alternative_patterns_merge_in_reading_order() {
        let extractor = PriceExtractor::new(&[r"\d,\d\d", r"\d\.\d\d"]).unwrap();
        assert_eq!(
            extractor.find_all("Suppe 3.50 Gulasch 8,90 Strudel 4.20"),
            vec!["3.50", "8,90", "4.20"]
        );
    }

    #[test]
    fn overlapping_alternatives_keep_longest() {
        let extractor = PriceExtractor::new(&[r"\d,\d\d", r"\d{1,2},\d\d"]).unwrap();
        assert_eq!(extractor.find_all("Fischmenü 11,00"), vec!["11,00"]);
    }

    #[test]
    fn split_line_strips_price_and_currency() {
        let (food, prices) = comma_prices().split_line("Zwiebelrostbraten mit Bratkartoffeln € 12,90");
        assert_eq!(food, "Zwiebelrostbraten mit Bratkartoffeln");
        assert_eq!(prices, vec!["12,90"]);
    }

    #[test]
    fn price_only_line_has_no_food() {
        let (food, prices) = comma_prices().split_line("EUR 9,50.-");
        assert_eq!(food, "");
        assert_eq!(prices, vec!["9,50"]);
    }

    #[test]
    fn flat_extraction_pairs_dishes_with_prices() {
        let lines = labels(&["Gemüsecremesuppe 3,50", "Kalbsrahmgulasch", "9,80 €"]);
        let extraction = comma_prices().extract_flat(&lines).unwrap();
        let pairs: Vec<(&str, &str)> = extraction
            .foods
            .iter()
            .zip(&extraction.prices)
            .map(|(f, p)| (f.as_str(), p.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("Gemüsecremesuppe", "3,50"), ("Kalbsrahmgulasch", "9,80")]
        );
    }

    #[test]
    fn flat_extraction_keeps_first_price_of_a_line() {
        let lines = labels(&["Schnitzel klein 8,90 groß 11,90"]);
        let extraction = comma_prices().extract_flat(&lines).unwrap();
        assert_eq!(extraction.foods, vec!["Schnitzel klein groß"]);
        assert_eq!(extraction.prices, vec!["8,90"]);
    }

    #[test]
    fn dish_without_price_is_a_miss() {
        let lines = labels(&["Tomatensuppe", "Spinatknödel mit Parmesan 8,90"]);
        let err = comma_prices().extract_flat(&lines).unwrap_err();
        assert!(err.to_string().contains("no price for 'Tomatensuppe'"));
    }

    #[test]
    fn trailing_dish_without_price_is_a_miss() {
        let lines = labels(&["Tomatensuppe 3,50", "Spinatknödel"]);
        assert!(comma_prices().extract_flat(&lines).is_err());
    }

    #[test]
    fn price_without_dish_is_a_miss() {
        let lines = labels(&["Tomatensuppe 3,50", "4,20"]);
        let err = comma_prices().extract_flat(&lines).unwrap_err();
        assert!(err.to_string().contains("follows no dish"));
    }

    #[test]
    fn flat_extraction_without_prices_is_a_miss() {
        let lines = labels(&["Gemüsecremesuppe", "Kalbsrahmgulasch"]);
        let err = comma_prices().extract_flat(&lines).unwrap_err();
        assert!(matches!(err, ExtractionError::PriceExtractionMiss { .. }));
    }

    #[test]
    fn nested_labels_on_separate_lines() {
        let text = "Standard: 9,50\nDaily-plate: 7,20\nFish-menu-Friday: 11,00";
        let map = comma_prices()
            .extract_nested(text, &labels(&["Standard", "Daily-plate", "Fish-menu-Friday"]))
            .unwrap();
        assert_eq!(map.get("Standard").map(String::as_str), Some("9,50"));
        assert_eq!(map.get("Daily-plate").map(String::as_str), Some("7,20"));
        assert_eq!(map.get("Fish-menu-Friday").map(String::as_str), Some("11,00"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn nested_labels_sharing_one_line() {
        let text = "Menü 8,90 / Tagesteller 7,50 / Fischmenü Freitag 11,20";
        let map = comma_prices()
            .extract_nested(text, &labels(&["Menü", "Tagesteller", "Fischmenü Freitag"]))
            .unwrap();
        assert_eq!(map["Menü"], "8,90");
        assert_eq!(map["Tagesteller"], "7,50");
        assert_eq!(map["Fischmenü Freitag"], "11,20");
    }

    #[test]
    fn nested_label_skips_occurrence_without_price() {
        let text = "Menü\nSuppe\nMenü 8,90\nTagesteller 7,50";
        let map = comma_prices()
            .extract_nested(text, &labels(&["Menü", "Tagesteller"]))
            .unwrap();
        assert_eq!(map["Menü"], "8,90");
    }

    #[test]
    fn nested_falls_back_to_positional_prices() {
        let text = "Menü / Tagesteller / Fischmenü Freitag\n8,90 7,50 11,20";
        let map = comma_prices()
            .extract_nested(text, &labels(&["Menü", "Tagesteller", "Fischmenü Freitag"]))
            .unwrap();
        assert_eq!(map["Menü"], "8,90");
        assert_eq!(map["Fischmenü Freitag"], "11,20");
    }

    #[test]
    fn nested_with_wrong_token_count_is_a_miss() {
        let text = "Menü / Tagesteller\n8,90";
        let err = comma_prices()
            .extract_nested(text, &labels(&["Menü", "Tagesteller"]))
            .unwrap_err();
        assert!(err.to_string().contains("resolved 0 of 2"));
    }
}
