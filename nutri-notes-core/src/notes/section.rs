//! Blank-line separated blocks of a daily entry and their structural roles.

use sha2::{Digest, Sha256};

use super::table::{
    header_starts_with, BreakdownTable, DAILY_TOTAL_FIRST_COLUMN, MEAL_BREAKDOWN_FIRST_COLUMN,
};

const LINK_OPENER: &str = "[[";
const ANCHOR_HEADING: &str = "######";
const EMPHASIS_MARKER: &str = "==";
const ANCHOR_ID_PREFIX: char = '^';

/// How the first line of a meal section is decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealHeading {
    /// `[[notes/file.md#^anchor|breakfast]]`
    Link,
    /// `###### breakfast`
    Heading,
    /// `== breakfast ==`
    Emphasis,
}

/// The structural role of a [`Section`], assigned once when it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionRole {
    /// A named meal followed by its description lines.
    Meal { name: String, heading: MealHeading },
    /// A `######` heading followed by a single `^id` line. Links in the notes
    /// point at it and the breakdown table of the meal follows it.
    Anchor { name: String, id: String },
    /// A well formed per-meal breakdown table.
    Breakdown(BreakdownTable),
    /// The per-day totals table.
    DailyBreakdown,
    /// A lone link line, such as the link to the daily totals.
    BreakdownLink,
    /// Anything else; kept verbatim.
    Content,
}

/// An immutable block of one or more lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    content: String,
    role: SectionRole,
}

impl Section {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let role = classify(&content);
        Self { content, role }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn role(&self) -> &SectionRole {
        &self.role
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.lines()
    }

    pub fn first_line(&self) -> &str {
        self.content.lines().next().unwrap_or_default()
    }

    pub fn is_meal(&self) -> bool {
        matches!(self.role, SectionRole::Meal { .. })
    }

    pub fn is_anchor(&self) -> bool {
        matches!(self.role, SectionRole::Anchor { .. })
    }

    pub fn is_daily_breakdown(&self) -> bool {
        matches!(self.role, SectionRole::DailyBreakdown)
    }

    pub fn has_breakdown_link(&self) -> bool {
        match &self.role {
            SectionRole::BreakdownLink => true,
            SectionRole::Meal { heading, .. } => *heading == MealHeading::Link,
            _ => false,
        }
    }

    pub fn meal_name(&self) -> Option<&str> {
        match &self.role {
            SectionRole::Meal { name, .. } | SectionRole::Anchor { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn breakdown(&self) -> Option<&BreakdownTable> {
        match &self.role {
            SectionRole::Breakdown(table) => Some(table),
            _ => None,
        }
    }

    /// The back-reference id hosted by an anchor section.
    pub fn anchor_id(&self) -> Option<&str> {
        match &self.role {
            SectionRole::Anchor { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Description lines of a meal flattened into one sentence.
    pub fn meal_description(&self) -> Option<String> {
        self.is_meal()
            .then(|| self.lines().skip(1).collect::<Vec<_>>().join("."))
    }

    /// Hash of the meal's description lines, used to tell whether a stored
    /// breakdown still matches the text it was computed from.
    pub fn fingerprint(&self) -> Option<String> {
        self.is_meal()
            .then(|| fingerprint(&self.lines().skip(1).collect::<String>()))
    }
}

/// First 16 bytes of the SHA-256 of `text`, hex encoded.
pub fn fingerprint(text: &str) -> String {
    let hash = Sha256::digest(text.as_bytes());
    hash[..16].iter().map(|b| format!("{:02x}", b)).collect()
}

fn classify(content: &str) -> SectionRole {
    let first = content.lines().next().unwrap_or_default();
    let trimmed = first.trim();
    let line_count = content.lines().count();

    let heading = if trimmed.starts_with(LINK_OPENER) {
        Some(MealHeading::Link)
    } else if trimmed.starts_with(ANCHOR_HEADING) {
        Some(MealHeading::Heading)
    } else if trimmed.starts_with(EMPHASIS_MARKER) {
        Some(MealHeading::Emphasis)
    } else {
        None
    };

    if heading == Some(MealHeading::Heading) && line_count == 2 {
        let id = content.lines().nth(1).unwrap_or_default().trim();
        if id.starts_with(ANCHOR_ID_PREFIX) {
            return SectionRole::Anchor {
                name: meal_name(trimmed, MealHeading::Heading),
                id: id.to_string(),
            };
        }
    }

    if let Some(heading) = heading {
        if line_count >= 2 {
            return SectionRole::Meal {
                name: meal_name(trimmed, heading),
                heading,
            };
        }
    }

    if header_starts_with(first, MEAL_BREAKDOWN_FIRST_COLUMN) {
        if let Some(table) = BreakdownTable::parse(content) {
            return SectionRole::Breakdown(table);
        }
    } else if header_starts_with(first, DAILY_TOTAL_FIRST_COLUMN) {
        return SectionRole::DailyBreakdown;
    }

    if heading == Some(MealHeading::Link) {
        return SectionRole::BreakdownLink;
    }

    SectionRole::Content
}

fn meal_name(first: &str, heading: MealHeading) -> String {
    let name = match heading {
        MealHeading::Link => {
            let inner = first.strip_prefix(LINK_OPENER).unwrap_or(first);
            let target = inner.split("]]").next().unwrap_or_default();
            target.rsplit('|').next().unwrap_or_default()
        }
        MealHeading::Heading => first.trim_matches(|c| c == '#' || c == ' '),
        MealHeading::Emphasis => first,
    };
    name.trim_matches(|c| c == ' ' || c == '=').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealBreakdown, MealEntry};

    #[test]
    fn test_emphasis_meal() {
        let section = Section::new("== breakfast ==\n2 eggs, toast\ncoffee");
        assert!(section.is_meal());
        assert_eq!(section.meal_name(), Some("breakfast"));
        assert_eq!(
            section.meal_description(),
            Some("2 eggs, toast.coffee".to_string())
        );
        assert!(!section.has_breakdown_link());
        assert_eq!(section.anchor_id(), None);
    }

    #[test]
    fn test_linked_meal_takes_name_after_last_pipe() {
        let section = Section::new("[[n101/07 July.md#^lunch-07-01-2025|lunch]]\nrice, beans");
        assert_eq!(
            section.role(),
            &SectionRole::Meal {
                name: "lunch".to_string(),
                heading: MealHeading::Link
            }
        );
        assert!(section.has_breakdown_link());
    }

    #[test]
    fn test_linked_meal_name_stops_at_closing_brackets() {
        let section = Section::new("[[n101/x.md#^a|lunch]] at noon\nrice");
        assert_eq!(section.meal_name(), Some("lunch"));

        let bare = Section::new("[[lunch]]\nrice");
        assert_eq!(bare.meal_name(), Some("lunch"));
    }

    #[test]
    fn test_heading_meal_and_anchor() {
        let anchor = Section::new("###### dinner\n^dinner-07-01-2025");
        assert_eq!(
            anchor.role(),
            &SectionRole::Anchor {
                name: "dinner".to_string(),
                id: "^dinner-07-01-2025".to_string()
            }
        );
        assert!(anchor.is_anchor());
        assert!(!anchor.is_meal());
        assert_eq!(anchor.meal_name(), Some("dinner"));
        assert_eq!(anchor.anchor_id(), Some("^dinner-07-01-2025"));
        assert_eq!(anchor.fingerprint(), None);

        let meal = Section::new("###### dinner\nsteak\nbroccoli");
        assert!(meal.is_meal());
        assert!(!meal.is_anchor());
        assert_eq!(meal.anchor_id(), None);

        let short_meal = Section::new("###### dinner\nsteak");
        assert!(short_meal.is_meal());
        assert_eq!(short_meal.anchor_id(), None);
    }

    #[test]
    fn test_single_line_headings_are_not_meals() {
        assert_eq!(Section::new("== breakfast").role(), &SectionRole::Content);
        assert_eq!(Section::new("###### lonely").role(), &SectionRole::Content);
        assert_eq!(
            Section::new("[[n101/07 July.md#^daily-breakdown-07-01-2025|daily-breakdown]]").role(),
            &SectionRole::BreakdownLink
        );
    }

    #[test]
    fn test_breakdown_table_section() {
        let table = BreakdownTable::meal(
            MealBreakdown::new(vec![MealEntry::new("Water")]),
            "abcd",
        );
        let section = Section::new(table.to_markdown());
        assert_eq!(section.breakdown(), Some(&table));
    }

    #[test]
    fn test_malformed_breakdown_table_is_content() {
        let section = Section::new(
            "| Food Item (abcd) | Calories |\n|---|---|\n| Water | lots | 0 | 0 | 0 | 0 | 0 | 0 |",
        );
        assert_eq!(section.role(), &SectionRole::Content);
        assert!(section.breakdown().is_none());
    }

    #[test]
    fn test_daily_breakdown_section() {
        let table = BreakdownTable::daily_total(MealBreakdown::new(vec![MealEntry::new("tea")]));
        let section = Section::new(table.to_markdown());
        assert!(section.is_daily_breakdown());
    }

    #[test]
    fn test_plain_content() {
        let section = Section::new("Slept badly.\nWalked 10k steps.");
        assert_eq!(section.role(), &SectionRole::Content);
        assert_eq!(section.meal_description(), None);
        assert_eq!(section.fingerprint(), None);
    }

    #[test]
    fn test_fingerprint_ignores_heading_and_tracks_description() {
        let plain = Section::new("== snack\npeach\napricot");
        let linked = Section::new("[[n101/x.md#^snack-07-01-2025|snack]]\npeach\napricot");
        let edited = Section::new("== snack\npeach\napricot - updated");

        assert_eq!(plain.fingerprint(), linked.fingerprint());
        assert_ne!(plain.fingerprint(), edited.fingerprint());
        assert_eq!(plain.fingerprint().unwrap().len(), 32);
    }

    #[test]
    fn test_fingerprint_concatenates_without_separator() {
        assert_eq!(fingerprint("peachapricot"), fingerprint(&["peach", "apricot"].concat()));
        assert_eq!(
            Section::new("== snack\npeach\napricot").fingerprint(),
            Some(fingerprint("peachapricot"))
        );
    }
}
