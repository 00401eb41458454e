use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::daily_entry::DailyEntry;
use super::parser::parse_daily_entries;
use super::section::Section;

/// A parsed notes document: entries keyed (and written) by date.
#[derive(Debug, Clone, Default)]
pub struct NotesDocument {
    preamble: Vec<Section>,
    entries: BTreeMap<NaiveDate, DailyEntry>,
}

impl NotesDocument {
    /// Parses notes text.
    ///
    /// When a date occurs twice, the later entry replaces the earlier one.
    pub fn parse(content: &str) -> Self {
        let parsed = parse_daily_entries(content);
        let mut entries = BTreeMap::new();
        for entry in parsed.entries {
            let date = entry.date();
            if entries.insert(date, entry).is_some() {
                tracing::warn!("Duplicate entry for {}, keeping the last one", date);
            }
        }
        Self {
            preamble: parsed.preamble,
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyEntry> {
        self.entries.get(&date)
    }

    /// Entries in ascending date order.
    pub fn entries(&self) -> impl Iterator<Item = &DailyEntry> {
        self.entries.values()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.entries.keys().copied().collect()
    }

    /// Stores `entry`, replacing any entry for the same date.
    pub fn insert(&mut self, entry: DailyEntry) -> Option<DailyEntry> {
        self.entries.insert(entry.date(), entry)
    }

    pub fn to_markdown(&self) -> String {
        let blocks: Vec<String> = self
            .preamble
            .iter()
            .map(|s| s.content().to_string())
            .chain(self.entries.values().map(DailyEntry::to_markdown))
            .collect();

        if blocks.is_empty() {
            String::new()
        } else {
            blocks.join("\n\n") + "\n"
        }
    }
}
