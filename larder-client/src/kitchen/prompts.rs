//! Prompt text and response schemas for each kitchen operation.

use larder::basic_models::{Temperature, UserFilters};
use serde_json::{json, Value};
use strum::VariantNames;

lazy_static::lazy_static! {
    /// A list of recipes, as the model must write them.
    pub static ref RECIPE_SCHEMA: Value = json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "title": { "type": "string", "description": "Name of the dish" },
                "description": { "type": "string", "description": "Short description of the dish" },
                "cookingTimeMinutes": { "type": "integer", "description": "Cooking time in minutes" },
                "instructions": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Step by step instructions"
                },
                "ingredients": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "description": "Ingredient name" },
                            "amount": { "type": "string", "description": "Quantity" },
                            "isAvailable": { "type": "boolean", "description": "true if the ingredient is on hand" }
                        },
                        "required": ["name", "amount", "isAvailable"]
                    }
                },
                "isVegan": { "type": "boolean" },
                "isKosher": { "type": "boolean" },
                "temperature": {
                    "type": "string",
                    "enum": Temperature::VARIANTS,
                    "description": "How the dish is served"
                }
            },
            "required": [
                "title", "description", "cookingTimeMinutes", "instructions",
                "ingredients", "isVegan", "isKosher", "temperature"
            ]
        }
    });

    /// Spelling corrections for an ingredient list.
    pub static ref CORRECTIONS_SCHEMA: Value = json!({
        "type": "object",
        "properties": {
            "corrections": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "original": { "type": "string" },
                        "suggested": { "type": "string" },
                        "reason": { "type": "string" }
                    },
                    "required": ["original", "suggested", "reason"]
                }
            }
        },
        "required": ["corrections"]
    });
}

/// Drop lines left empty by unused placeholders.
fn tidy(prompt: String) -> String {
    prompt
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn validate_ingredients(ingredients: &[String]) -> String {
    let template = include_str!("../prompts/validate-ingredients.md");
    tidy(template.replace("{ingredients}", &ingredients.join(", ")))
}

pub fn generate_recipes(filters: &UserFilters, language: &str) -> String {
    let mut constraints = vec![];
    if filters.vegan_only {
        constraints.push("Every recipe must be vegan.".to_string());
    }
    if filters.kosher_only {
        constraints.push("Every recipe must be kosher.".to_string());
    }
    if let Some(temperature) = filters.temperature {
        constraints.push(format!("Every dish must be served {temperature}."));
    }
    if let Some(minutes) = filters.max_cooking_time_minutes {
        constraints.push(format!("No recipe may take longer than {minutes} minutes."));
    }

    // Ingredients are user text, so they go in last and are never re-scanned
    let template = include_str!("../prompts/generate-recipes.md");
    tidy(
        template
            .replace("{count}", &filters.recipe_count.to_string())
            .replace("{constraints}", &constraints.join("\n"))
            .replace("{language}", language)
            .replace("{ingredients}", &filters.available_ingredients.join(", ")),
    )
}

pub fn illustrate_recipe(title: &str) -> String {
    let template = include_str!("../prompts/illustrate-recipe.md");
    tidy(template.replace("{title}", title))
}
