//! The enrichment run: find meals without a current breakdown, ask the
//! analyzer for them and merge the answers into the breakdown document.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::analyzer::MealAnalyzer;
use crate::error::NotesError;
use crate::models::MealBreakdown;
use crate::notes::{NotesStore, Section};

/// Optional knobs of [`NotesEnricher::enrich`].
#[derive(Debug, Clone, Default)]
pub struct EnrichOptions {
    /// Only look at this day.
    pub only_date: Option<NaiveDate>,
    /// Write the rewritten notes here instead of over the notes file.
    pub write_notes_to: Option<PathBuf>,
    /// Recompute breakdowns that are still current.
    pub override_existing: bool,
}

impl EnrichOptions {
    pub fn with_only_date(mut self, date: NaiveDate) -> Self {
        self.only_date = Some(date);
        self
    }

    pub fn with_write_notes_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.write_notes_to = Some(path.into());
        self
    }

    pub fn with_override_existing(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }
}

/// Adds nutrient breakdowns to a notes file.
pub struct NotesEnricher<A> {
    analyzer: A,
}

impl<A: MealAnalyzer> NotesEnricher<A> {
    pub fn new(analyzer: A) -> Self {
        Self { analyzer }
    }

    /// Enriches `notes_file` and returns whether anything was recomputed.
    ///
    /// Nothing is written when nothing was recomputed. A day for which the
    /// analyzer answers with the wrong number of breakdowns is left as it was.
    pub fn enrich(
        &self,
        notes_file: &Path,
        knowledge_base: &str,
        collection_dir: &str,
        options: &EnrichOptions,
    ) -> Result<bool, NotesError> {
        let mut store = NotesStore::load(notes_file, collection_dir)?;
        let mut enriched = false;

        for date in store.source_dates() {
            if options.only_date.is_some_and(|only| only != date) {
                tracing::debug!("Skipping {}", date);
                continue;
            }
            enriched |= self.enrich_day(&mut store, date, knowledge_base, options.override_existing)?;
        }

        if !enriched {
            tracing::info!(
                "No new meals and breakdowns, skipping {}",
                notes_file.display()
            );
            return Ok(false);
        }

        let destination = options.write_notes_to.as_deref().unwrap_or(notes_file);
        let companion = store.layout().companion_path(notes_file);
        store.write(destination, &companion)?;
        tracing::info!(
            "Wrote {} and {}",
            destination.display(),
            companion.display()
        );

        Ok(true)
    }

    fn enrich_day(
        &self,
        store: &mut NotesStore,
        date: NaiveDate,
        knowledge_base: &str,
        override_existing: bool,
    ) -> Result<bool, NotesError> {
        if !override_existing && store.all_meals_have_breakdowns(date)? {
            tracing::info!("{} already has all meal breakdowns, skipping.", date);
            return Ok(false);
        }

        let meals = store.meal_breakdowns(date)?;
        let pending: Vec<&Section> = meals
            .iter()
            .filter(|(_, existing)| override_existing || existing.is_none())
            .map(|(meal, _)| meal)
            .collect();
        if pending.is_empty() {
            return Ok(false);
        }

        let descriptions: Vec<String> = pending
            .iter()
            .filter_map(|meal| meal.meal_description())
            .collect();
        tracing::info!(
            date = %date,
            meals = pending.len(),
            "Requesting meal breakdowns"
        );

        let computed = self.analyzer.meal_breakdowns(&descriptions, knowledge_base)?;
        if computed.len() != pending.len() {
            tracing::error!(
                "{} Wanted breakdowns for {} meals, but got {} breakdowns from the analyzer",
                date,
                pending.len(),
                computed.len()
            );
            return Ok(false);
        }

        let mut computed = computed.into_iter().map(|b| consistent_sugars(date, b));
        let resolved: Vec<(Section, MealBreakdown)> = meals
            .into_iter()
            .filter_map(|(meal, existing)| match existing {
                Some(table) if !override_existing => Some((meal, table.breakdown)),
                _ => computed.next().map(|breakdown| (meal, breakdown)),
            })
            .collect();

        store.clear_breakdowns(date);
        for (meal, breakdown) in &resolved {
            store.add_meal_breakdown(date, meal, breakdown)?;
        }

        Ok(true)
    }
}

fn consistent_sugars(date: NaiveDate, breakdown: MealBreakdown) -> MealBreakdown {
    breakdown
        .entries
        .into_iter()
        .map(|entry| {
            if !entry.has_consistent_sugars() {
                tracing::warn!(
                    "{} {}: added sugars {}g exceed total sugars {}g, clamping",
                    date,
                    entry.item,
                    entry.added_sugars_g,
                    entry.sugars_g
                );
            }
            entry.with_consistent_sugars()
        })
        .collect::<Vec<_>>()
        .into()
}
