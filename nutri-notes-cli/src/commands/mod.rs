mod config_cmd;
mod enrich;
mod status;

pub use config_cmd::ConfigCommand;
pub use enrich::EnrichCommand;
pub use status::StatusCommand;

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use nutri_notes_core::DATE_FORMAT;
use std::path::{Path, PathBuf};

use crate::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Parses a `MM/DD/YYYY` command line date.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| format!("Invalid date '{}', expected MM/DD/YYYY", s))
}

/// Notes file of the month of `date`: `<notes_dir>/<YYYY>/<MM Month>.md`.
pub fn monthly_notes_file(notes_dir: &Path, date: NaiveDate) -> PathBuf {
    notes_dir
        .join(date.year().to_string())
        .join(date.format("%m %B.md").to_string())
}

/// Knowledge base of the year of `date`:
/// `<notes_dir>/<YYYY>/<nutrition_dir>/knowledge_base.md`.
pub fn knowledge_base_file(notes_dir: &Path, nutrition_dir: &str, date: NaiveDate) -> PathBuf {
    notes_dir
        .join(date.year().to_string())
        .join(nutrition_dir)
        .join("knowledge_base.md")
}

/// Positional directories shared by the commands working on a notes file.
#[derive(clap::Args)]
pub struct NotesLocation {
    /// Root directory of the daily notes (defaults to notes_dir from config)
    pub notes_dir: Option<PathBuf>,

    /// Subdirectory holding the breakdown documents (defaults to nutrition_dir from config)
    pub nutrition_dir: Option<String>,

    /// Notes file to use instead of the one of the current month
    #[arg(long)]
    pub notes_file: Option<PathBuf>,
}

impl NotesLocation {
    pub fn notes_dir(&self, config: &Config) -> PathBuf {
        self.notes_dir
            .clone()
            .unwrap_or_else(|| config.notes_dir.value.clone())
    }

    pub fn nutrition_dir(&self, config: &Config) -> String {
        self.nutrition_dir
            .clone()
            .unwrap_or_else(|| config.nutrition_dir.value.clone())
    }

    /// The notes file to work on; it has to exist.
    pub fn notes_file(
        &self,
        config: &Config,
        today: NaiveDate,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let notes_file = self
            .notes_file
            .clone()
            .unwrap_or_else(|| monthly_notes_file(&self.notes_dir(config), today));
        if !notes_file.exists() {
            return Err(format!("The notes file {} couldn't be found", notes_file.display()).into());
        }
        Ok(notes_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("07/01/2025"),
            Ok(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())
        );
        assert!(parse_date("2025-07-01").is_err());
        assert!(parse_date("13/45/2025").is_err());
    }

    #[test]
    fn test_monthly_notes_file() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
        assert_eq!(
            monthly_notes_file(Path::new("/vault/daily"), date),
            PathBuf::from("/vault/daily/2025/07 July.md")
        );
    }

    #[test]
    fn test_knowledge_base_file() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        assert_eq!(
            knowledge_base_file(Path::new("/vault/daily"), "n101", date),
            PathBuf::from("/vault/daily/2025/n101/knowledge_base.md")
        );
    }
}
