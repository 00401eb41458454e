//! Merge engine over a notes document and its breakdown document.
//!
//! The notes document is written by a person; the breakdown document is
//! owned by this crate. A meal in the notes links to an anchor in the
//! breakdown document, and the anchor is followed directly by the meal's
//! breakdown table. Every day in the breakdown document ends with the daily
//! anchor and the daily totals table.

use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::Path;

use super::daily_entry::DailyEntry;
use super::document::NotesDocument;
use super::layout::{CompanionLayout, DAILY_BREAKDOWN};
use super::section::{Section, SectionRole};
use super::table::BreakdownTable;
use crate::error::NotesError;
use crate::models::{MealBreakdown, MealEntry};

/// A meal section paired with its breakdown, if the breakdown is current.
pub type MealWithBreakdown = (Section, Option<BreakdownTable>);

/// Both documents of one notes file, held in memory for a single run.
#[derive(Debug, Clone)]
pub struct NotesStore {
    source: NotesDocument,
    companion: NotesDocument,
    layout: CompanionLayout,
}

impl NotesStore {
    pub fn new(source: NotesDocument, companion: NotesDocument, layout: CompanionLayout) -> Self {
        Self {
            source,
            companion,
            layout,
        }
    }

    pub fn from_markdown(source: &str, companion: &str, layout: CompanionLayout) -> Self {
        Self::new(
            NotesDocument::parse(source),
            NotesDocument::parse(companion),
            layout,
        )
    }

    /// Reads `notes_file` and its breakdown document, if there is one yet.
    pub fn load(notes_file: &Path, collection_dir: &str) -> Result<Self, NotesError> {
        let layout = CompanionLayout::for_notes_file(notes_file, collection_dir);
        let companion_path = layout.companion_path(notes_file);

        let source =
            fs::read_to_string(notes_file).map_err(|e| NotesError::io(notes_file, e))?;
        let companion = match fs::read_to_string(&companion_path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(NotesError::io(companion_path, e)),
        };

        Ok(Self::from_markdown(&source, &companion, layout))
    }

    pub fn layout(&self) -> &CompanionLayout {
        &self.layout
    }

    pub fn source(&self) -> &NotesDocument {
        &self.source
    }

    pub fn companion(&self) -> &NotesDocument {
        &self.companion
    }

    pub fn source_dates(&self) -> Vec<NaiveDate> {
        self.source.dates()
    }

    /// Every meal of `date` in the notes, with its breakdown when the stored
    /// table was computed from the meal's current text.
    pub fn meal_breakdowns(&self, date: NaiveDate) -> Result<Vec<MealWithBreakdown>, NotesError> {
        let entry = self.source.get(date).ok_or(NotesError::UnknownDate(date))?;
        let companion = self.companion.get(date);

        Ok(entry
            .meals()
            .map(|meal| {
                let current = companion.and_then(|c| c.current_breakdown_for(meal)).cloned();
                (meal.clone(), current)
            })
            .collect())
    }

    pub fn all_meals_have_breakdowns(&self, date: NaiveDate) -> Result<bool, NotesError> {
        Ok(self
            .meal_breakdowns(date)?
            .iter()
            .all(|(_, breakdown)| breakdown.is_some()))
    }

    /// Drops everything the breakdown document holds for `date`.
    pub fn clear_breakdowns(&mut self, date: NaiveDate) {
        self.companion.insert(DailyEntry::new(date));
    }

    /// Links `meal` to its anchor and stores `breakdown` under that anchor.
    pub fn add_meal_breakdown(
        &mut self,
        date: NaiveDate,
        meal: &Section,
        breakdown: &MealBreakdown,
    ) -> Result<(), NotesError> {
        self.link_meal(date, meal)?;
        self.apply_breakdown(date, meal, breakdown)
    }

    /// Rewrites the heading of `meal` into a link to its anchor and makes
    /// sure the entry links to the daily totals once.
    ///
    /// The link is always rewritten so a moved breakdown document is picked up.
    pub fn link_meal(&mut self, date: NaiveDate, meal: &Section) -> Result<(), NotesError> {
        let entry = self.source.get(date).ok_or(NotesError::UnknownDate(date))?;
        let (name, index) = match (meal.meal_name(), entry.position_of(meal)) {
            (Some(name), Some(index)) => (name, index),
            _ => {
                return Err(NotesError::MealNotFound {
                    date,
                    meal: meal.first_line().to_string(),
                })
            }
        };

        let mut sections = entry.sections().to_vec();
        let linked: Vec<String> = std::iter::once(self.layout.breakdown_link(date, name))
            .chain(meal.lines().skip(1).map(str::to_string))
            .collect();
        sections[index] = Section::new(linked.join("\n"));

        let daily_link = Section::new(self.layout.breakdown_link(date, DAILY_BREAKDOWN));
        let existing = sections.iter().position(|s| {
            matches!(s.role(), SectionRole::BreakdownLink)
                && s.content().contains(DAILY_BREAKDOWN)
        });
        match existing {
            Some(i) => sections[i] = daily_link,
            None => sections.push(daily_link),
        }

        let updated = entry.with_sections(sections);
        self.source.insert(updated);
        Ok(())
    }

    /// Stores `breakdown` right after the anchor of `meal` and regenerates the
    /// daily totals.
    pub fn apply_breakdown(
        &mut self,
        date: NaiveDate,
        meal: &Section,
        breakdown: &MealBreakdown,
    ) -> Result<(), NotesError> {
        let (name, fingerprint) = match (meal.meal_name(), meal.fingerprint()) {
            (Some(name), Some(fingerprint)) => (name, fingerprint),
            _ => {
                return Err(NotesError::MealNotFound {
                    date,
                    meal: meal.first_line().to_string(),
                })
            }
        };

        let entry = self
            .companion
            .get(date)
            .cloned()
            .unwrap_or_else(|| DailyEntry::new(date));
        let mut sections = entry.sections().to_vec();
        strip_daily_breakdown(date, &mut sections)?;

        let title = CompanionLayout::anchor_title(name);
        let anchor = match sections
            .iter()
            .position(|s| s.is_anchor() && s.meal_name() == Some(name))
        {
            Some(i) => i,
            None => {
                sections.push(Section::new(format!(
                    "{}\n{}",
                    title,
                    CompanionLayout::anchor_id(date, name)
                )));
                sections.len() - 1
            }
        };

        let table = Section::new(BreakdownTable::meal(breakdown.clone(), fingerprint).to_markdown());
        let at = anchor + 1;
        if sections.get(at).is_some_and(|s| s.breakdown().is_some()) {
            sections[at] = table;
        } else {
            sections.insert(at, table);
        }

        let totals = meal_totals(date, &sections)?;
        sections.push(Section::new(format!(
            "{}\n{}",
            CompanionLayout::anchor_title(DAILY_BREAKDOWN),
            CompanionLayout::anchor_id(date, DAILY_BREAKDOWN)
        )));
        sections.push(Section::new(
            BreakdownTable::daily_total(MealBreakdown::new(totals)).to_markdown(),
        ));

        self.companion.insert(entry.with_sections(sections));
        Ok(())
    }

    /// Renders the notes and the breakdown document.
    pub fn to_markdown(&self) -> (String, String) {
        (self.source.to_markdown(), self.companion.to_markdown())
    }

    /// Writes the notes to `notes_file` and the breakdown document to
    /// `companion_file`, creating its directory when needed.
    pub fn write(&self, notes_file: &Path, companion_file: &Path) -> Result<(), NotesError> {
        let (source, companion) = self.to_markdown();
        fs::write(notes_file, source).map_err(|e| NotesError::io(notes_file, e))?;

        if let Some(dir) = companion_file.parent() {
            fs::create_dir_all(dir).map_err(|e| NotesError::io(dir, e))?;
        }
        fs::write(companion_file, companion).map_err(|e| NotesError::io(companion_file, e))?;
        Ok(())
    }
}

/// Removes a trailing daily anchor + totals pair.
fn strip_daily_breakdown(date: NaiveDate, sections: &mut Vec<Section>) -> Result<(), NotesError> {
    if !sections.last().is_some_and(Section::is_daily_breakdown) {
        return Ok(());
    }
    let len = sections.len();
    if len < 2 || !sections[len - 2].is_anchor() {
        return Err(NotesError::structure(
            date,
            "daily breakdown table is not preceded by its anchor",
        ));
    }
    sections.truncate(len - 2);
    Ok(())
}

/// One total entry per breakdown table, named after the anchor above it.
fn meal_totals(date: NaiveDate, sections: &[Section]) -> Result<Vec<MealEntry>, NotesError> {
    let mut totals = Vec::new();
    for (i, section) in sections.iter().enumerate() {
        let Some(table) = section.breakdown() else {
            continue;
        };
        let name = i
            .checked_sub(1)
            .map(|p| &sections[p])
            .filter(|s| s.is_anchor())
            .and_then(Section::meal_name)
            .ok_or_else(|| {
                NotesError::structure(
                    date,
                    format!("breakdown table #{} is not preceded by an anchor", i + 1),
                )
            })?;
        totals.push(table.breakdown.total_as_entry(name));
    }
    Ok(totals)
}
