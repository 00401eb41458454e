use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One food item of a meal with its nutrient amounts.
///
/// `added_sugars_g` is the added/free part of `sugars_g` and is expected to
/// never exceed it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MealEntry {
    pub item: String,
    #[serde(deserialize_with = "non_negative_rounded")]
    pub calories: u32,
    #[serde(deserialize_with = "non_negative_rounded")]
    pub carbs_g: u32,
    #[serde(deserialize_with = "non_negative_rounded")]
    pub sugars_g: u32,
    #[serde(default, deserialize_with = "non_negative_rounded")]
    pub added_sugars_g: u32,
    #[serde(deserialize_with = "non_negative_rounded")]
    pub protein_g: u32,
    #[serde(deserialize_with = "non_negative_rounded")]
    pub fat_g: u32,
    #[serde(deserialize_with = "non_negative_rounded")]
    pub fiber_g: u32,
    #[serde(deserialize_with = "non_negative_rounded")]
    pub sodium_mg: u32,
    #[serde(default)]
    pub used_knowledge_base: bool,
}

impl MealEntry {
    /// Creates an entry with every nutrient set to zero.
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            calories: 0,
            carbs_g: 0,
            sugars_g: 0,
            added_sugars_g: 0,
            protein_g: 0,
            fat_g: 0,
            fiber_g: 0,
            sodium_mg: 0,
            used_knowledge_base: false,
        }
    }

    pub fn with_knowledge_base(mut self, used: bool) -> Self {
        self.used_knowledge_base = used;
        self
    }

    /// Returns true if the added sugars do not exceed the total sugars.
    pub fn has_consistent_sugars(&self) -> bool {
        self.added_sugars_g <= self.sugars_g
    }

    /// Clamps `added_sugars_g` down to `sugars_g`.
    pub fn with_consistent_sugars(mut self) -> Self {
        self.added_sugars_g = self.added_sugars_g.min(self.sugars_g);
        self
    }
}

impl fmt::Display for MealEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} kcal, {}g carbs, {}({})g sugars, {}g protein, {}g fat, {}g fiber, {}mg sodium",
            self.item,
            self.calories,
            self.carbs_g,
            self.sugars_g,
            self.added_sugars_g,
            self.protein_g,
            self.fat_g,
            self.fiber_g,
            self.sodium_mg
        )
    }
}

// Analyzers occasionally answer with fractions or negative zero.
fn non_negative_rounded<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(serde::de::Error::custom(format!(
            "invalid nutrient amount: {}",
            value
        )));
    }
    Ok(value.round().clamp(0.0, u32::MAX as f64) as u32)
}
