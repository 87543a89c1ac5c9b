use larder::basic_models::{GeneratedRecipe, IngredientCorrection, Recipe, UserFilters};
use serde::Deserialize;

use super::{prompts, FacadeError, GenerateTransport, RecipeAssistant};

#[derive(Deserialize)]
struct CorrectionsReply {
    #[serde(default)]
    corrections: Vec<IngredientCorrection>,
}

/// Id for the `index`th recipe of a batch generated at `timestamp_millis`.
pub fn recipe_id(index: usize, timestamp_millis: i64) -> String {
    format!("recipe-{index}-{timestamp_millis}")
}

impl<T: GenerateTransport> RecipeAssistant<T> {
    /// Ask the model which ingredients look misspelled.
    ///
    /// An empty list is answered locally without calling the proxy.
    pub async fn try_validate_ingredients(
        &self,
        ingredients: &[String],
    ) -> Result<Vec<IngredientCorrection>, FacadeError> {
        if ingredients.is_empty() {
            return Ok(vec![]);
        }
        let reply: CorrectionsReply = self
            .generate_json(
                prompts::validate_ingredients(ingredients),
                &prompts::CORRECTIONS_SCHEMA,
            )
            .await?;
        tracing::info!(
            "{} corrections for {} ingredients",
            reply.corrections.len(),
            ingredients.len()
        );
        Ok(reply.corrections)
    }

    /// Like [`Self::try_validate_ingredients`], but a failure just means
    /// "no corrections".
    pub async fn validate_ingredients(&self, ingredients: &[String]) -> Vec<IngredientCorrection> {
        self.try_validate_ingredients(ingredients)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Ingredient validation failed: {e}");
                vec![]
            })
    }

    /// Generate recipes for `filters`.
    ///
    /// Failures are returned, never replaced with an empty list, so callers
    /// can tell "nothing matched" apart from "the request failed".
    pub async fn generate_recipes(&self, filters: &UserFilters) -> Result<Vec<Recipe>, FacadeError> {
        tracing::info!("Generating {} recipes ..", filters.recipe_count);
        let generated: Vec<GeneratedRecipe> = self
            .generate_json(
                prompts::generate_recipes(filters, &self.config.output_language),
                &prompts::RECIPE_SCHEMA,
            )
            .await
            .inspect_err(|e| tracing::error!("Recipe generation failed: {e}"))?;

        if generated.len() != filters.recipe_count as usize {
            tracing::warn!(
                "Asked for {} recipes, model returned {}",
                filters.recipe_count,
                generated.len()
            );
        }

        let timestamp = chrono::Utc::now().timestamp_millis();
        Ok(generated
            .into_iter()
            .enumerate()
            .map(|(index, recipe)| Recipe::from_generated(recipe_id(index, timestamp), recipe))
            .collect())
    }
}
