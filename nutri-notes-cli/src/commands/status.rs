use chrono::{Local, NaiveDate};
use clap::Args;
use nutri_notes_core::{NotesError, NotesStore, DATE_FORMAT};
use serde::Serialize;

use super::{parse_date, NotesLocation, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct StatusCommand {
    #[command(flatten)]
    pub location: NotesLocation,

    /// Only show this day (MM/DD/YYYY)
    #[arg(long, value_parser = parse_date)]
    pub only_date: Option<NaiveDate>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DayStatus {
    pub date: String,
    pub meals: Vec<MealStatus>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct MealStatus {
    pub name: String,
    /// Whether the stored breakdown matches the meal text
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
}

impl StatusCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let today = Local::now().date_naive();
        let notes_file = self.location.notes_file(config, today)?;
        let store = NotesStore::load(&notes_file, &self.location.nutrition_dir(config))?;
        let days = meal_status(&store, self.only_date)?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&days)?);
            }
            OutputFormat::Text => {
                println!("{}", notes_file.display());
                if days.is_empty() {
                    println!("\nNo daily entries found.");
                }
                for day in &days {
                    println!("\n{}", day.date);
                    if day.meals.is_empty() {
                        println!("  (no meals)");
                    }
                    for meal in &day.meals {
                        match meal.calories {
                            Some(calories) => println!("  {:<20} {:>6} kcal", meal.name, calories),
                            None => println!("  {:<20} {:>11}", meal.name, "pending"),
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Reports every meal of the notes and whether its breakdown is current.
pub fn meal_status(
    store: &NotesStore,
    only_date: Option<NaiveDate>,
) -> Result<Vec<DayStatus>, NotesError> {
    let mut days = Vec::new();
    for date in store.source_dates() {
        if only_date.is_some_and(|only| only != date) {
            continue;
        }
        let meals = store
            .meal_breakdowns(date)?
            .into_iter()
            .map(|(meal, breakdown)| MealStatus {
                name: meal.meal_name().unwrap_or_default().to_string(),
                current: breakdown.is_some(),
                calories: breakdown.map(|t| t.breakdown.total_as_entry("total").calories),
            })
            .collect();
        days.push(DayStatus {
            date: date.format(DATE_FORMAT).to_string(),
            meals,
        });
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutri_notes_core::{CompanionLayout, MealBreakdown, MealEntry};

    const NOTES: &str = "\
07/01/2025

== breakfast
2 eggs

== lunch
rice and beans

07/02/2025

walked 5 miles
";

    fn store() -> NotesStore {
        let mut store =
            NotesStore::from_markdown(NOTES, "", CompanionLayout::new("n101", "07 July.md"));
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let (breakfast, _) = store.meal_breakdowns(date).unwrap().remove(0);
        let breakdown = MealBreakdown::new(vec![
            MealEntry {
                calories: 140,
                ..MealEntry::new("Eggs")
            },
            MealEntry {
                calories: 5,
                ..MealEntry::new("Salt")
            },
        ]);
        store.add_meal_breakdown(date, &breakfast, &breakdown).unwrap();
        store
    }

    #[test]
    fn test_meal_status() {
        let days = meal_status(&store(), None).unwrap();
        assert_eq!(
            days,
            vec![
                DayStatus {
                    date: "07/01/2025".to_string(),
                    meals: vec![
                        MealStatus {
                            name: "breakfast".to_string(),
                            current: true,
                            calories: Some(145),
                        },
                        MealStatus {
                            name: "lunch".to_string(),
                            current: false,
                            calories: None,
                        },
                    ],
                },
                DayStatus {
                    date: "07/02/2025".to_string(),
                    meals: vec![],
                },
            ]
        );
    }

    #[test]
    fn test_meal_status_only_date() {
        let only = NaiveDate::from_ymd_opt(2025, 7, 2);
        let days = meal_status(&store(), only).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, "07/02/2025");
    }

    #[test]
    fn test_json_omits_unknown_calories() {
        let days = meal_status(&store(), None).unwrap();
        let json = serde_json::to_string(&days[0].meals[1]).unwrap();
        assert_eq!(json, r#"{"name":"lunch","current":false}"#);
    }
}
