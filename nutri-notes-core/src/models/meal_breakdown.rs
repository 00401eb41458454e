use serde::{Deserialize, Serialize};

use super::meal_entry::MealEntry;

/// The food items a meal was broken down into, in display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MealBreakdown {
    pub entries: Vec<MealEntry>,
}

impl MealBreakdown {
    pub fn new(entries: Vec<MealEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sums every entry into a single entry named `title`.
    ///
    /// The synthetic entry never counts as a knowledge base hit. Sums saturate
    /// at `u32::MAX`.
    pub fn total_as_entry(&self, title: impl Into<String>) -> MealEntry {
        self.entries.iter().fold(MealEntry::new(title), |mut total, e| {
            total.calories = total.calories.saturating_add(e.calories);
            total.carbs_g = total.carbs_g.saturating_add(e.carbs_g);
            total.sugars_g = total.sugars_g.saturating_add(e.sugars_g);
            total.added_sugars_g = total.added_sugars_g.saturating_add(e.added_sugars_g);
            total.protein_g = total.protein_g.saturating_add(e.protein_g);
            total.fat_g = total.fat_g.saturating_add(e.fat_g);
            total.fiber_g = total.fiber_g.saturating_add(e.fiber_g);
            total.sodium_mg = total.sodium_mg.saturating_add(e.sodium_mg);
            total
        })
    }
}

impl From<Vec<MealEntry>> for MealBreakdown {
    fn from(entries: Vec<MealEntry>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(item: &str, n: u32) -> MealEntry {
        MealEntry {
            calories: n * 100,
            carbs_g: n * 10,
            sugars_g: n * 2,
            added_sugars_g: n,
            protein_g: n * 3,
            fat_g: n * 4,
            fiber_g: n * 5,
            sodium_mg: n * 50,
            ..MealEntry::new(item).with_knowledge_base(true)
        }
    }

    #[test]
    fn test_total_as_entry_sums_fields() {
        let breakdown = MealBreakdown::new(vec![entry("Eggs", 1), entry("Bread", 2)]);
        let total = breakdown.total_as_entry("breakfast");

        assert_eq!(total.item, "breakfast");
        assert_eq!(total.calories, 300);
        assert_eq!(total.carbs_g, 30);
        assert_eq!(total.sugars_g, 6);
        assert_eq!(total.added_sugars_g, 3);
        assert_eq!(total.protein_g, 9);
        assert_eq!(total.fat_g, 12);
        assert_eq!(total.fiber_g, 15);
        assert_eq!(total.sodium_mg, 150);
        assert!(!total.used_knowledge_base);
        assert!(total.has_consistent_sugars());
    }

    #[test]
    fn test_total_of_empty_breakdown() {
        let total = MealBreakdown::default().total_as_entry("nothing");
        assert_eq!(total, MealEntry::new("nothing"));
    }

    #[test]
    fn test_total_saturates_instead_of_overflowing() {
        let huge = MealEntry {
            calories: u32::MAX,
            sugars_g: u32::MAX,
            added_sugars_g: u32::MAX - 1,
            ..MealEntry::new("Lard")
        };
        let breakdown = MealBreakdown::new(vec![huge.clone(), huge, entry("Eggs", 1)]);
        let total = breakdown.total_as_entry("lunch");

        assert_eq!(total.calories, u32::MAX);
        assert_eq!(total.sugars_g, u32::MAX);
        assert_eq!(total.added_sugars_g, u32::MAX);
        assert_eq!(total.carbs_g, 10);
        assert!(total.has_consistent_sugars());
    }

    #[test]
    fn test_breakdown_json_roundtrip() {
        let breakdown: MealBreakdown = vec![entry("Rice", 1)].into();
        let json = serde_json::to_string(&breakdown).unwrap();
        let parsed: MealBreakdown = serde_json::from_str(&json).unwrap();
        assert_eq!(breakdown, parsed);
    }
}
