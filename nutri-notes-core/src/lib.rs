//! Nutri Notes Core Library
//!
//! Parses daily food notes, keeps a companion document of per-meal nutrient
//! breakdowns in sync with them and asks a [`MealAnalyzer`] only for meals
//! whose text changed.

pub mod analyzer;
pub mod enrich;
pub mod error;
pub mod knowledge_base;
pub mod models;
pub mod notes;

pub use analyzer::{AnalyzerError, MealAnalyzer};
pub use enrich::{EnrichOptions, NotesEnricher};
pub use error::NotesError;
pub use knowledge_base::load_knowledge_base;
pub use models::{MealBreakdown, MealEntry};
pub use notes::{
    BreakdownTable, CompanionLayout, DailyEntry, NotesDocument, NotesStore, Section, SectionRole,
    DAILY_BREAKDOWN, DATE_FORMAT,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
