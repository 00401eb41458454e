//! Splits notes text into dated entries and blank-line separated sections.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use super::daily_entry::{DailyEntry, DATE_FORMAT};
use super::section::Section;

pub(super) static RE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}/\d{1,2}/\d{4})\b").unwrap());

/// The result of parsing one notes document.
#[derive(Debug, Default)]
pub struct ParsedNotes {
    /// Sections found before the first date line.
    pub preamble: Vec<Section>,
    pub entries: Vec<DailyEntry>,
}

/// Returns the `MM/DD/YYYY` date found anywhere in `line`.
pub fn date_from_line(line: &str) -> Option<NaiveDate> {
    let found = RE_DATE.captures(line.trim())?;
    NaiveDate::parse_from_str(&found[1], DATE_FORMAT).ok()
}

/// Parses notes text.
///
/// A line holding a date starts a new entry, a blank line closes the section
/// being collected, every other line is added to it.
pub fn parse_daily_entries(content: &str) -> ParsedNotes {
    let mut parsed = ParsedNotes::default();
    let mut current: Option<(DailyEntry, Vec<Section>)> = None;
    let mut lines: Vec<&str> = Vec::new();

    fn flush(lines: &mut Vec<&str>, into: &mut Vec<Section>) {
        if !lines.is_empty() {
            into.push(Section::new(lines.join("\n")));
            lines.clear();
        }
    }

    for line in content.lines() {
        if let Some(date) = date_from_line(line) {
            match current.take() {
                Some((entry, mut sections)) => {
                    flush(&mut lines, &mut sections);
                    parsed.entries.push(entry.with_sections(sections));
                }
                None => flush(&mut lines, &mut parsed.preamble),
            }
            current = Some((DailyEntry::new(date).with_header(line), Vec::new()));
        } else if line.trim().is_empty() {
            match current.as_mut() {
                Some((_, sections)) => flush(&mut lines, sections),
                None => flush(&mut lines, &mut parsed.preamble),
            }
        } else {
            lines.push(line);
        }
    }

    match current {
        Some((entry, mut sections)) => {
            flush(&mut lines, &mut sections);
            parsed.entries.push(entry.with_sections(sections));
        }
        None => flush(&mut lines, &mut parsed.preamble),
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_from_line() {
        let expected = NaiveDate::from_ymd_opt(2025, 7, 1);
        assert_eq!(date_from_line("07/01/2025"), expected);
        assert_eq!(date_from_line("Tuesday 7/1/2025 - rainy"), expected);
        assert_eq!(date_from_line("  07/01/2025  "), expected);
        assert_eq!(date_from_line("no date here"), None);
        assert_eq!(date_from_line("13/45/2025"), None);
        assert_eq!(date_from_line("07/01/25"), None);
    }

    #[test]
    fn test_parse_entries_and_sections() {
        let text = "07/01/2025\n\n== breakfast\neggs\ntoast\n\n== lunch\nrice\n\n07/02/2025\n\nlazy day\n";
        let parsed = parse_daily_entries(text);

        assert!(parsed.preamble.is_empty());
        assert_eq!(parsed.entries.len(), 2);

        let first = &parsed.entries[0];
        assert_eq!(first.date(), NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(first.sections().len(), 2);
        assert_eq!(first.sections()[0].content(), "== breakfast\neggs\ntoast");
        assert_eq!(first.meals().count(), 2);

        let second = &parsed.entries[1];
        assert_eq!(second.sections().len(), 1);
        assert_eq!(second.sections()[0].content(), "lazy day");
    }

    #[test]
    fn test_parse_without_dates_yields_no_entries() {
        let parsed = parse_daily_entries("just some text\n\nmore text");
        assert!(parsed.entries.is_empty());
        assert_eq!(parsed.preamble.len(), 2);
        assert!(parse_daily_entries("").entries.is_empty());
    }

    #[test]
    fn test_open_section_closes_at_next_date() {
        let parsed = parse_daily_entries("07/01/2025\nnote a\n07/02/2025\nnote b");
        assert_eq!(parsed.entries[0].sections()[0].content(), "note a");
        assert_eq!(parsed.entries[1].sections()[0].content(), "note b");
    }

    #[test]
    fn test_whitespace_only_lines_separate_sections() {
        let parsed = parse_daily_entries("07/01/2025\nnote a\n   \nnote b");
        assert_eq!(parsed.entries[0].sections().len(), 2);
    }

    #[test]
    fn test_header_line_is_kept() {
        let parsed = parse_daily_entries("# Tuesday 07/01/2025\n\nnote");
        assert_eq!(parsed.entries[0].header(), "# Tuesday 07/01/2025");
    }

    #[test]
    fn test_preamble_before_first_date() {
        let parsed = parse_daily_entries("# July\ntags: food\n\n07/01/2025\nnote");
        assert_eq!(parsed.preamble.len(), 1);
        assert_eq!(parsed.preamble[0].content(), "# July\ntags: food");
        assert_eq!(parsed.entries.len(), 1);
    }
}
