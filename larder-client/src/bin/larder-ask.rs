use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use base64::Engine;
use clap::{Parser, Subcommand};
use larder::basic_models::{Temperature, UserFilters};
use larder_client::kitchen::{AssistantConfig, RecipeAssistant, DEFAULT_MODEL};

/// Ask the kitchen assistant for help, through a larder-server proxy
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// URL of the generation proxy
    #[arg(long, default_value = "http://localhost:3000")]
    server: String,
    /// Model used for corrections and recipes
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
    /// Model used for recipe photos
    #[arg(long, default_value = DEFAULT_MODEL)]
    image_model: String,
    /// Language to write recipes in
    #[arg(long, default_value = "English")]
    language: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a list of ingredients for spelling mistakes
    Validate {
        /// Ingredients, as typed
        #[arg(required = true)]
        ingredients: Vec<String>,
    },
    /// Suggest recipes from the ingredients on hand
    Recipes {
        /// How many recipes to ask for
        #[arg(short, long, default_value_t = 3)]
        count: u32,
        /// Only vegan recipes
        #[arg(long)]
        vegan: bool,
        /// Only kosher recipes
        #[arg(long)]
        kosher: bool,
        /// Serve warm or cold
        #[arg(long)]
        temperature: Option<Temperature>,
        /// Longest acceptable cooking time
        #[arg(long)]
        max_minutes: Option<u32>,
        /// Also photograph each recipe, saving the images into this directory
        #[arg(long)]
        illustrate: Option<PathBuf>,
        /// Ingredients on hand
        #[arg(required = true)]
        ingredients: Vec<String>,
    },
    /// Photograph a dish by name
    Image {
        /// Name of the dish
        #[arg(long)]
        title: String,
        /// Where to save the photo
        #[arg(long, default_value = "dish.png")]
        out: PathBuf,
    },
}

/// Decode the base64 payload of a `data:` URL.
fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let (_, payload) = data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .ok_or_else(|| anyhow!("Not a base64 data URL"))?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .context("Decoding image")
}

fn save_data_url(data_url: &str, path: &Path) -> Result<()> {
    let bytes = decode_data_url(data_url)?;
    std::fs::write(path, bytes).with_context(|| format!("Writing {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let assistant = RecipeAssistant::connect(
        &args.server,
        AssistantConfig {
            text_model: args.model,
            image_model: args.image_model,
            output_language: args.language,
        },
    );

    match args.command {
        Command::Validate { ingredients } => {
            let corrections = assistant.try_validate_ingredients(&ingredients).await?;
            if corrections.is_empty() {
                println!("All ingredients look fine.");
            } else {
                println!("{}", serde_json::to_string_pretty(&corrections)?);
            }
        }
        Command::Recipes {
            count,
            vegan,
            kosher,
            temperature,
            max_minutes,
            illustrate,
            ingredients,
        } => {
            let filters = UserFilters {
                recipe_count: count,
                available_ingredients: ingredients,
                vegan_only: vegan,
                kosher_only: kosher,
                temperature,
                max_cooking_time_minutes: max_minutes,
            };
            let recipes = assistant
                .generate_recipes(&filters)
                .await
                .context("Generating recipes")?;
            println!("{}", serde_json::to_string_pretty(&recipes)?);

            if let Some(dir) = illustrate {
                std::fs::create_dir_all(&dir)?;
                for recipe in &recipes {
                    let image = assistant.generate_recipe_image(recipe).await;
                    if image.is_empty() {
                        println!("No photo for {}", recipe.title);
                        continue;
                    }
                    let path = dir.join(format!("{}.png", recipe.id));
                    save_data_url(&image, &path)?;
                    println!("Saved photo of {} to {}", recipe.title, path.display());
                }
            }
        }
        Command::Image { title, out } => {
            let image = assistant
                .try_generate_dish_image(&title)
                .await
                .context("Generating photo")?
                .ok_or_else(|| anyhow!("The model answered without a photo of {title}"))?;
            save_data_url(&image, &out)?;
            println!("Saved photo of {} to {}", title, out.display());
        }
    }
    Ok(())
}
