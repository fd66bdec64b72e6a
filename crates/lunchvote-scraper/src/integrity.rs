//! Structural sanity check against silent template drift.
//!
//! A venue's weekly document has a fixed shape: every served day opens with a
//! starter line and every closed day carries a holiday placeholder instead.
//! Counting both and comparing against the venue's constant catches redesigned
//! or truncated documents before any content is trusted.

use crate::error::ExtractionError;

#[derive(Debug, Clone)]
pub struct TemplateIntegrity {
    holiday_markers: Vec<String>,
    starter_markers: Vec<String>,
    expected_total: usize,
    separator: String,
}

impl TemplateIntegrity {
    #[must_use]
    pub fn new(holiday_markers: &[&str], starter_markers: &[&str], expected_total: usize) -> Self {
        let lower = |markers: &[&str]| markers.iter().map(|m| m.to_lowercase()).collect();
        Self {
            holiday_markers: lower(holiday_markers),
            starter_markers: lower(starter_markers),
            expected_total,
            separator: "\n".to_string(),
        }
    }

    /// Counts units split on `separator` instead of newlines.
    #[must_use]
    pub fn with_separator(mut self, separator: &str) -> Self {
        if !separator.is_empty() {
            self.separator = separator.to_string();
        }
        self
    }

    /// Lines carrying a holiday/closed placeholder.
    #[must_use]
    pub fn holiday_count(&self, text: &str) -> usize {
        count_lines_with(text, &self.separator, &self.holiday_markers)
    }

    /// Lines carrying a starter-course marker.
    #[must_use]
    pub fn starter_count(&self, text: &str) -> usize {
        count_lines_with(text, &self.separator, &self.starter_markers)
    }

    #[must_use]
    pub fn is_starter(&self, line: &str) -> bool {
        line_has_marker(&line.to_lowercase(), &self.starter_markers)
    }

    #[must_use]
    pub fn is_holiday(&self, line: &str) -> bool {
        line_has_marker(&line.to_lowercase(), &self.holiday_markers)
    }

    /// # Errors
    ///
    /// Returns [`ExtractionError::TemplateMismatch`] when holiday plus starter
    /// lines differ from the expected total.
    pub fn check(&self, text: &str) -> Result<(), ExtractionError> {
        let found = self.holiday_count(text) + self.starter_count(text);
        if found == self.expected_total {
            Ok(())
        } else {
            Err(ExtractionError::TemplateMismatch {
                expected: self.expected_total,
                found,
            })
        }
    }
}

fn count_lines_with(text: &str, separator: &str, markers: &[String]) -> usize {
    text.split(separator)
        .map(str::to_lowercase)
        .filter(|line| line_has_marker(line, markers))
        .count()
}

fn line_has_marker(lower_line: &str, markers: &[String]) -> bool {
    markers.iter().any(|m| lower_line.contains(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waldviertlerhof_rules() -> TemplateIntegrity {
        TemplateIntegrity::new(&["feiertag", "geschlossen"], &["suppe"], 5)
    }

    const FULL_WEEK: &str = "\
MONTAG
Frittatensuppe
Schweinsbraten
DIENSTAG
Grießnockerlsuppe
Rindsgulasch
MITTWOCH
Leberknödelsuppe
Hühnerleber
DONNERSTAG
Gemüsesuppe
Krautfleckerl
FREITAG
Fischsuppe
Zanderfilet";

    #[test]
    fn full_week_has_five_starters() {
        let rules = waldviertlerhof_rules();
        assert_eq!(rules.starter_count(FULL_WEEK), 5);
        assert_eq!(rules.holiday_count(FULL_WEEK), 0);
        assert!(rules.check(FULL_WEEK).is_ok());
    }

    #[test]
    fn holiday_replaces_a_starter() {
        let text = FULL_WEEK.replace("Fischsuppe\nZanderfilet", "Feiertag - Geschlossen");
        let rules = waldviertlerhof_rules();
        assert_eq!(rules.starter_count(&text), 4);
        // one line, counted once even with two markers
        assert_eq!(rules.holiday_count(&text), 1);
        assert!(rules.check(&text).is_ok());
    }

    #[test]
    fn added_course_is_a_mismatch() {
        let text = format!("{FULL_WEEK}\nKürbiscremesuppe");
        let err = waldviertlerhof_rules().check(&text).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::TemplateMismatch {
                expected: 5,
                found: 6
            }
        ));
    }

    #[test]
    fn truncated_document_is_a_mismatch() {
        let truncated: String = FULL_WEEK.lines().take(6).collect::<Vec<_>>().join("\n");
        assert!(waldviertlerhof_rules().check(&truncated).is_err());
    }

    #[test]
    fn markers_match_case_insensitively() {
        let rules = waldviertlerhof_rules();
        assert_eq!(rules.starter_count("KNOBLAUCHSUPPE\nsuppe"), 2);
        assert!(rules.is_starter("Tagessuppe"));
        assert!(!rules.is_starter("Schnitzel"));
        assert!(rules.is_holiday("Heute GESCHLOSSEN"));
    }

    #[test]
    fn counts_units_of_the_configured_separator() {
        let text = "Mon|Pea soup|Tue|Leek soup|Wed|Onion soup|Thu|Closed|Fri|Fish soup";
        let rules = TemplateIntegrity::new(&["closed"], &["soup"], 5).with_separator("|");
        assert_eq!(rules.starter_count(text), 4);
        assert_eq!(rules.holiday_count(text), 1);
        assert!(rules.check(text).is_ok());

        // the whole document is one newline-delimited line
        let by_line = TemplateIntegrity::new(&["closed"], &["soup"], 5);
        assert!(by_line.check(text).is_err());
    }

    #[test]
    fn crlf_separator_counts_each_line() {
        let text = FULL_WEEK.replace('\n', "\r\n");
        let rules = waldviertlerhof_rules().with_separator("\r\n");
        assert_eq!(rules.starter_count(&text), 5);
        assert!(rules.check(&text).is_ok());
    }

    #[test]
    fn empty_document_fails() {
        assert!(waldviertlerhof_rules().check("").is_err());
    }
}
