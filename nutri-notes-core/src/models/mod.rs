mod meal_breakdown;
mod meal_entry;

pub use meal_breakdown::MealBreakdown;
pub use meal_entry::MealEntry;
