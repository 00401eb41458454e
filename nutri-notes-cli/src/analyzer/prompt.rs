//! Prompt shared by every provider and decoding of its reply.

use nutri_notes_core::{AnalyzerError, MealBreakdown};

/// Separator between meal descriptions inside the prompt.
pub const DESCRIPTION_SEPARATOR: &str = "|||";

const TEMPLATE: &str = r#"Break each of the meal descriptions below down into individual food items with their nutritional values.
Meal descriptions are separated ONLY by '|||'. A description may contain several lines, commas and periods and is still a single meal, e.g. `1 1/4 cup cooked pinto beans, 3/4 cup cooked rice.1 rotisserie chicken thigh` is ONE meal.

Meal descriptions: {meal_descriptions}

Knowledge base: {knowledge_base}

Instructions:
- Return exactly one breakdown per meal description, in the same order.
- Use realistic portion sizes; assume standard servings when none is given.
- Include every item mentioned, beverages and condiments too.
- Use a knowledge base recipe only when the description names the recipe or clearly describes the whole dish, never because a single ingredient matches. When a recipe appears more than once, use the last one.
- When a recipe is used, list each of its ingredients as a separate item scaled to the servings eaten, put the scaled quantity in the item name and set used_knowledge_base to true for those items.
- sugars_g is total sugars, added_sugars_g only added/free sugars and never more than sugars_g.
- Base estimates on USDA data or common nutrition databases. All amounts are integers without units, negligible amounts are 0.

Reply with a JSON array and nothing else. Each element is one breakdown:
{"entries": [{"item": string, "calories": int, "carbs_g": int, "sugars_g": int, "added_sugars_g": int, "protein_g": int, "fat_g": int, "fiber_g": int, "sodium_mg": int, "used_knowledge_base": bool}]}"#;

/// Builds the prompt asking for one breakdown per description.
pub fn build_prompt(descriptions: &[String], knowledge_base: &str) -> String {
    TEMPLATE
        .replace(
            "{meal_descriptions}",
            &descriptions.join(DESCRIPTION_SEPARATOR),
        )
        .replace("{knowledge_base}", knowledge_base)
}

/// Decodes the JSON array of breakdowns from a model reply.
///
/// Code fences and prose around the array are ignored.
pub fn parse_breakdowns(reply: &str) -> Result<Vec<MealBreakdown>, AnalyzerError> {
    let body = extract_json_array(reply).ok_or_else(|| {
        AnalyzerError::InvalidResponse(format!("no JSON array in reply: {}", preview(reply)))
    })?;
    serde_json::from_str(body).map_err(|e| AnalyzerError::InvalidResponse(e.to_string()))
}

fn extract_json_array(reply: &str) -> Option<&str> {
    let body = match reply.find("```") {
        Some(fence) => {
            let after = &reply[fence + 3..];
            // skip the language tag
            let after = after.find('\n').map(|i| &after[i + 1..]).unwrap_or(after);
            after.find("```").map(|end| &after[..end]).unwrap_or(after)
        }
        None => reply,
    };

    let start = body.find('[')?;
    let end = body.rfind(']')?;
    (end > start).then(|| &body[start..=end])
}

fn preview(reply: &str) -> String {
    reply.chars().take(80).collect()
}
