use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Whether a dish is served warm or cold.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Temperature {
    Warm,
    Cold,
}

impl Serialize for Temperature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Temperature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("unknown temperature {raw:?}, expected warm or cold"))
        })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
    pub is_available: bool,
}

/// A recipe exactly as the model writes it, before it is given an id.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedRecipe {
    pub title: String,
    pub description: String,
    pub cooking_time_minutes: u32,
    pub instructions: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub is_vegan: bool,
    pub is_kosher: bool,
    pub temperature: Temperature,
}

#[derive(Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cooking_time_minutes: u32,
    pub instructions: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub is_vegan: bool,
    pub is_kosher: bool,
    pub temperature: Temperature,
}

impl Recipe {
    pub fn from_generated(id: String, generated: GeneratedRecipe) -> Self {
        Self {
            id,
            title: generated.title,
            description: generated.description,
            cooking_time_minutes: generated.cooking_time_minutes,
            instructions: generated.instructions,
            ingredients: generated.ingredients,
            is_vegan: generated.is_vegan,
            is_kosher: generated.is_kosher,
            temperature: generated.temperature,
        }
    }
}

impl std::fmt::Debug for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recipe")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("cooking_time_minutes", &self.cooking_time_minutes)
            .field("instructions", &self.instructions.len())
            .field("ingredients", &self.ingredients.len())
            .field("is_vegan", &self.is_vegan)
            .field("is_kosher", &self.is_kosher)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct IngredientCorrection {
    pub original: String,
    pub suggested: String,
    pub reason: String,
}

/// What the caller wants cooked, and from what.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserFilters {
    pub recipe_count: u32,
    pub available_ingredients: Vec<String>,
    #[serde(default)]
    pub vegan_only: bool,
    #[serde(default)]
    pub kosher_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Temperature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cooking_time_minutes: Option<u32>,
}
