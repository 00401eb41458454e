//! Markdown table codec for meal breakdowns.
//!
//! A per-meal table looks like:
//!
//! ```text
//! | Food Item (3f2a...) | Calories | Carbs (g) | Sugars (g) | Protein (g) | Fat (g) | Fiber (g) | Sodium (mg) |
//! |-----------|----------|-----------|------------|-------------|---------|-----------|-------------|
//! | Eggs | 140 | 1 | 1(0) | 12 | 10 | 0 | 140 |
//! ```
//!
//! The daily table uses `Meal` as its first column, one row per meal and a
//! bold `TOTAL` row. Sugars are written as `total(added)`.

use regex::Regex;
use std::sync::LazyLock;

use super::parser::RE_DATE;
use crate::models::{MealBreakdown, MealEntry};

pub const MEAL_BREAKDOWN_FIRST_COLUMN: &str = "Food Item";
pub const DAILY_TOTAL_FIRST_COLUMN: &str = "Meal";
pub const KNOWLEDGE_BASE_MARKER: &str = "[found in kbs]";

const COLUMNS: &str =
    "Calories | Carbs (g) | Sugars (g) | Protein (g) | Fat (g) | Fiber (g) | Sodium (mg) |";
const SEPARATOR: &str =
    "|-----------|----------|-----------|------------|-------------|---------|-----------|-------------|";
const FIELD_COUNT: usize = 8;

static RE_FINGERPRINT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((.*)\)").unwrap());
static RE_SUGARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\((\d+)\)$").unwrap());

/// A breakdown rendered as (or parsed from) a markdown table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownTable {
    pub breakdown: MealBreakdown,
    /// Fingerprint of the meal text the breakdown was computed from.
    /// Always empty for the daily table.
    pub fingerprint: String,
    pub is_daily_total: bool,
}

impl BreakdownTable {
    pub fn meal(breakdown: MealBreakdown, fingerprint: impl Into<String>) -> Self {
        Self {
            breakdown,
            fingerprint: fingerprint.into(),
            is_daily_total: false,
        }
    }

    pub fn daily_total(breakdown: MealBreakdown) -> Self {
        Self {
            breakdown,
            fingerprint: String::new(),
            is_daily_total: true,
        }
    }

    pub fn to_markdown(&self) -> String {
        let first_column = if self.is_daily_total {
            DAILY_TOTAL_FIRST_COLUMN.to_string()
        } else {
            format!("{} ({})", MEAL_BREAKDOWN_FIRST_COLUMN, self.fingerprint)
        };

        let mut lines = vec![
            format!("| {} | {}", first_column, COLUMNS),
            SEPARATOR.to_string(),
        ];
        for entry in &self.breakdown.entries {
            lines.push(entry_row(entry));
        }

        if self.is_daily_total {
            let total = self.breakdown.total_as_entry("TOTAL");
            lines.push(format!(
                "| **{}** | **{}** | **{}** | **{}({})** | **{}** | **{}** | **{}** | **{}** |",
                total.item,
                total.calories,
                total.carbs_g,
                total.sugars_g,
                total.added_sugars_g,
                total.protein_g,
                total.fat_g,
                total.fiber_g,
                total.sodium_mg
            ));
        }

        lines.join("\n")
    }

    /// Parses a per-meal table.
    ///
    /// Returns `None` for anything that is not a well formed per-meal table:
    /// fewer than two lines, a different header, a row without exactly eight
    /// cells or a non-numeric amount.
    pub fn parse(table: &str) -> Option<Self> {
        let lines: Vec<&str> = table.lines().collect();
        if lines.len() < 2 || !header_starts_with(lines[0], MEAL_BREAKDOWN_FIRST_COLUMN) {
            return None;
        }

        let fingerprint = lines[0]
            .split('|')
            .nth(1)
            .and_then(|cell| RE_FINGERPRINT.captures(cell))
            .map(|c| c[1].to_string())
            .unwrap_or_default();

        let entries = lines[2..]
            .iter()
            .map(|line| parse_row(line))
            .collect::<Option<Vec<_>>>()?;

        Some(Self::meal(MealBreakdown::new(entries), fingerprint))
    }
}

/// Returns true if `line` is a table row whose first cell starts with `label`.
pub fn header_starts_with(line: &str, label: &str) -> bool {
    line.trim_start()
        .strip_prefix('|')
        .map(|rest| rest.trim_start().starts_with(label))
        .unwrap_or(false)
}

/// The item name as a table row stores it.
///
/// Rows are single lines of `|` separated cells, items are trimmed on parse
/// and the knowledge base marker is reserved, so all of these are folded:
/// `|` becomes `/`, whitespace runs (line breaks included) become one space
/// and the marker is dropped. Date tokens are written with dashes so a row
/// never starts a new daily entry.
pub fn normalize_item(item: &str) -> String {
    let mut item = collapse_whitespace(&item.replace('|', "/"));
    // collapsing can rebuild a marker from two halves
    while item.contains(KNOWLEDGE_BASE_MARKER) {
        item = collapse_whitespace(&item.replace(KNOWLEDGE_BASE_MARKER, " "));
    }
    while RE_DATE.is_match(&item) {
        item = RE_DATE
            .replace_all(&item, |c: &regex::Captures| c[0].replace('/', "-"))
            .into_owned();
    }
    item
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn entry_row(entry: &MealEntry) -> String {
    let item = normalize_item(&entry.item);
    let item = if entry.used_knowledge_base {
        format!("{} {}", item, KNOWLEDGE_BASE_MARKER)
    } else {
        item
    };
    format!(
        "| {} | {} | {} | {}({}) | {} | {} | {} | {} |",
        item,
        entry.calories,
        entry.carbs_g,
        entry.sugars_g,
        entry.added_sugars_g,
        entry.protein_g,
        entry.fat_g,
        entry.fiber_g,
        entry.sodium_mg
    )
}

fn parse_row(line: &str) -> Option<MealEntry> {
    let cells: Vec<&str> = line.split('|').collect();
    if cells.len() != FIELD_COUNT + 2 {
        return None;
    }
    let fields: Vec<&str> = cells[1..=FIELD_COUNT].iter().map(|c| c.trim()).collect();
    let number = |i: usize| fields[i].parse::<u32>().ok();

    let (sugars_g, added_sugars_g): (u32, u32) = match RE_SUGARS.captures(fields[3]) {
        Some(c) => (c[1].parse().ok()?, c[2].parse().ok()?),
        None => (number(3)?, 0),
    };

    let used_knowledge_base = fields[0].contains(KNOWLEDGE_BASE_MARKER);
    let item = if used_knowledge_base {
        fields[0].replace(KNOWLEDGE_BASE_MARKER, "").trim().to_string()
    } else {
        fields[0].to_string()
    };

    Some(MealEntry {
        item,
        calories: number(1)?,
        carbs_g: number(2)?,
        sugars_g,
        added_sugars_g,
        protein_g: number(4)?,
        fat_g: number(5)?,
        fiber_g: number(6)?,
        sodium_mg: number(7)?,
        used_knowledge_base,
    })
}
