//! Notes documents: parsing, section roles, breakdown tables and merging.
//!
//! # Document structure
//!
//! A notes document is plain text split into dated entries. Each entry
//! starts at a line holding an `MM/DD/YYYY` date and is made of blank-line
//! separated sections:
//!
//! ```text
//! 07/01/2025
//!
//! == breakfast
//! 2 eggs, toast
//!
//! Slept well.
//! ```
//!
//! Breakdowns are kept in a second document with the same layout, owned by
//! [`NotesStore`].

mod daily_entry;
mod document;
mod layout;
mod parser;
mod section;
mod store;
mod table;

pub use daily_entry::{DailyEntry, DATE_FORMAT};
pub use document::NotesDocument;
pub use layout::{CompanionLayout, DAILY_BREAKDOWN};
pub use parser::{date_from_line, parse_daily_entries, ParsedNotes};
pub use section::{fingerprint, MealHeading, Section, SectionRole};
pub use store::{MealWithBreakdown, NotesStore};
pub use table::{
    BreakdownTable, DAILY_TOTAL_FIRST_COLUMN, KNOWLEDGE_BASE_MARKER, MEAL_BREAKDOWN_FIRST_COLUMN,
};
