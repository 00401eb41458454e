use chrono::NaiveDate;

use super::section::Section;
use super::table::BreakdownTable;

pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// One dated entry of a notes document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyEntry {
    date: NaiveDate,
    /// The line the date was found on, written back unchanged.
    header: String,
    sections: Vec<Section>,
}

impl DailyEntry {
    /// Creates an empty entry headed by the bare `MM/DD/YYYY` date.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            header: date.format(DATE_FORMAT).to_string(),
            sections: Vec::new(),
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Returns a copy of this entry holding `sections` instead.
    pub fn with_sections(&self, sections: Vec<Section>) -> Self {
        Self {
            date: self.date,
            header: self.header.clone(),
            sections,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn meals(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.is_meal())
    }

    /// Index of the first section equal to `section`.
    pub fn position_of(&self, section: &Section) -> Option<usize> {
        self.sections.iter().position(|s| s == section)
    }

    /// Index of the first anchor section named `meal_name`.
    pub fn anchor_position(&self, meal_name: &str) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.is_anchor() && s.meal_name() == Some(meal_name))
    }

    /// The breakdown table directly following the section at `index`, if any.
    pub fn breakdown_after(&self, index: usize) -> Option<&BreakdownTable> {
        self.sections.get(index + 1).and_then(Section::breakdown)
    }

    /// The breakdown stored for `meal`, provided it was computed from the
    /// meal's current text.
    pub fn current_breakdown_for(&self, meal: &Section) -> Option<&BreakdownTable> {
        let name = meal.meal_name()?;
        let fingerprint = meal.fingerprint()?;
        let table = self.breakdown_after(self.anchor_position(name)?)?;
        (table.fingerprint == fingerprint).then_some(table)
    }

    pub fn to_markdown(&self) -> String {
        std::iter::once(self.header.as_str())
            .chain(self.sections.iter().map(Section::content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealBreakdown, MealEntry};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    fn table_for(meal: &Section) -> Section {
        let breakdown = MealBreakdown::new(vec![MealEntry::new("Peach")]);
        Section::new(BreakdownTable::meal(breakdown, meal.fingerprint().unwrap()).to_markdown())
    }

    #[test]
    fn test_new_entry_markdown_is_the_date() {
        assert_eq!(DailyEntry::new(date()).to_markdown(), "07/01/2025");
    }

    #[test]
    fn test_markdown_keeps_header_and_sections() {
        let entry = DailyEntry::new(date())
            .with_header("Tuesday 07/01/2025")
            .with_sections(vec![Section::new("== tea\ngreen tea"), Section::new("Tired.")]);
        assert_eq!(
            entry.to_markdown(),
            "Tuesday 07/01/2025\n\n== tea\ngreen tea\n\nTired."
        );
        assert_eq!(entry.meals().count(), 1);
    }

    #[test]
    fn test_current_breakdown_matches_fingerprint() {
        let meal = Section::new("== snack\npeach");
        let companion = DailyEntry::new(date()).with_sections(vec![
            Section::new("###### snack\n^snack-07-01-2025"),
            table_for(&meal),
        ]);

        assert!(companion.current_breakdown_for(&meal).is_some());

        let edited = Section::new("== snack\npeach and cream");
        assert!(companion.current_breakdown_for(&edited).is_none());
    }

    #[test]
    fn test_breakdown_must_follow_anchor_directly() {
        let meal = Section::new("== snack\npeach");
        let companion = DailyEntry::new(date()).with_sections(vec![
            Section::new("###### snack\n^snack-07-01-2025"),
            Section::new("note in between"),
            table_for(&meal),
        ]);

        assert_eq!(companion.anchor_position("snack"), Some(0));
        assert!(companion.breakdown_after(0).is_none());
        assert!(companion.current_breakdown_for(&meal).is_none());
    }

    #[test]
    fn test_breakdown_after_last_section() {
        let entry =
            DailyEntry::new(date()).with_sections(vec![Section::new("###### tea\n^tea-07-01-2025")]);
        assert!(entry.breakdown_after(0).is_none());
        assert!(entry.breakdown_after(5).is_none());
    }
}
