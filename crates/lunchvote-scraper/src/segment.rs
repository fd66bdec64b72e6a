//! Cuts the block belonging to one weekday out of a converted document.

use std::sync::LazyLock;

use regex::Regex;

/// Splits documents into lines and finds day blocks.
///
/// `boundaries` are headings that end a block (every weekday spelling of the
/// locale); `stop_markers` are venue-specific lines that also end it, such as
/// a price footer below the last day.
#[derive(Debug, Clone)]
pub struct DaySegmenter {
    separator: String,
    boundaries: Vec<String>,
    stop_markers: Vec<String>,
}

impl DaySegmenter {
    #[must_use]
    pub fn new(separator: &str, boundaries: Vec<String>, stop_markers: Vec<String>) -> Self {
        Self {
            separator: separator.to_string(),
            boundaries,
            stop_markers,
        }
    }

    /// Non-empty, trimmed lines of `text`.
    #[must_use]
    pub fn lines<'t>(&self, text: &'t str) -> Vec<&'t str> {
        text.split(self.separator.as_str())
            .map(|line| line.trim_matches(|c: char| c.is_whitespace() || c == '\u{c}'))
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Lines of the first block headed by one of `day_variants`.
    ///
    /// Content trailing the heading on the same line is kept unless it is only
    /// a date. Returns `None` when no heading matches or the block is empty.
    #[must_use]
    pub fn segment(&self, text: &str, day_variants: &[String]) -> Option<Vec<String>> {
        let lines = self.lines(text);
        let (start, rest) = lines
            .iter()
            .enumerate()
            .find_map(|(idx, line)| match_heading(line, day_variants).map(|rest| (idx, rest)))?;

        let mut block = Vec::new();
        let trailing = strip_heading_date(rest);
        if trailing.chars().any(char::is_alphabetic) {
            block.push(trailing.to_string());
        }

        for line in &lines[start + 1..] {
            if match_heading(line, &self.boundaries).is_some()
                || match_heading(line, &self.stop_markers).is_some()
            {
                break;
            }
            block.push((*line).to_string());
        }

        if block.is_empty() {
            None
        } else {
            Some(block)
        }
    }
}

/// If `line` starts with one of `variants` (case-insensitive, followed by a
/// non-letter), returns the remainder after the variant. Bare abbreviations
/// need a stricter follower, see `ends_abbreviated_heading`.
pub(crate) fn match_heading<'l>(line: &'l str, variants: &[String]) -> Option<&'l str> {
    let trimmed = line.trim_start();
    variants
        .iter()
        .find_map(|variant| strip_prefix_ignore_case(trimmed, variant))
}

fn strip_prefix_ignore_case<'l>(line: &'l str, prefix: &str) -> Option<&'l str> {
    if prefix.is_empty() {
        return None;
    }
    let mut line_chars = line.char_indices();
    let mut end = 0usize;
    for expected in prefix.chars() {
        let (idx, actual) = line_chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        end = idx + actual.len_utf8();
    }
    let rest = &line[end..];
    let accepted = if is_bare_abbreviation(prefix) {
        ends_abbreviated_heading(rest)
    } else {
        !rest.chars().next().is_some_and(char::is_alphabetic)
    };
    accepted.then_some(rest)
}

// "Mo", "Wed": short enough to open an ordinary word such as "Sun-dried".
fn is_bare_abbreviation(prefix: &str) -> bool {
    prefix.chars().count() <= 3 && !prefix.ends_with('.')
}

/// A bare abbreviation is a heading only when followed by `.`, `:`, `,`, the
/// end of the line, or whitespace leading to a date.
fn ends_abbreviated_heading(rest: &str) -> bool {
    match rest.chars().next() {
        None | Some('.' | ':' | ',') => true,
        Some(c) if c.is_whitespace() => rest
            .trim_start()
            .chars()
            .next()
            .is_none_or(|c| c.is_ascii_digit()),
        Some(_) => false,
    }
}

// Date and punctuation trailing a day heading, e.g. ", 18.03.2026 -".
static HEADING_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s,:;.\-–]*(?:\d{1,2}\.\s*(?:\d{1,2}\.?\s*(?:\d{2,4})?)?)?[\s,:;.\-–]*")
        .expect("valid regex")
});

fn strip_heading_date(rest: &str) -> &str {
    HEADING_DATE_RE
        .find(rest)
        .map_or(rest, |m| &rest[m.end()..])
        .trim_end()
}
