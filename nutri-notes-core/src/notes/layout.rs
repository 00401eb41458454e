//! Where the breakdown document lives and how the two documents link to
//! each other.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Name of the anchor that hosts the daily totals table.
pub const DAILY_BREAKDOWN: &str = "daily-breakdown";

/// Relation between a notes file and its breakdown document.
///
/// The breakdown document has the same file name as the notes file and sits
/// in the `collection_dir` subdirectory next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionLayout {
    collection_dir: String,
    file_name: String,
}

impl CompanionLayout {
    pub fn new(collection_dir: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            collection_dir: collection_dir.into(),
            file_name: file_name.into(),
        }
    }

    pub fn for_notes_file(notes_file: &Path, collection_dir: impl Into<String>) -> Self {
        let file_name = notes_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(collection_dir, file_name)
    }

    pub fn collection_dir(&self) -> &str {
        &self.collection_dir
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Path of the breakdown document belonging to `notes_file`.
    pub fn companion_path(&self, notes_file: &Path) -> PathBuf {
        notes_file
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&self.collection_dir)
            .join(&self.file_name)
    }

    /// `^<meal>-<MM-DD-YYYY>`
    pub fn anchor_id(date: NaiveDate, meal_name: &str) -> String {
        format!("^{}-{}", meal_name, date.format("%m-%d-%Y"))
    }

    pub fn anchor_title(meal_name: &str) -> String {
        format!("###### {}", meal_name)
    }

    /// Link from the notes file to the anchor of `meal_name`.
    pub fn breakdown_link(&self, date: NaiveDate, meal_name: &str) -> String {
        format!(
            "[[{}/{}#{}|{}]]",
            self.collection_dir,
            self.file_name,
            Self::anchor_id(date, meal_name),
            meal_name
        )
    }
}
