use larder::basic_models::Recipe;

use super::{prompts, FacadeError, GenerateTransport, RecipeAssistant};

impl<T: GenerateTransport> RecipeAssistant<T> {
    /// Ask for a photo of the finished dish.
    ///
    /// Returns the first inline image as a `data:` URL, or `None` when the
    /// model answered without one. No response schema is sent: the payload
    /// is an image, not JSON.
    pub async fn try_generate_recipe_image(
        &self,
        recipe: &Recipe,
    ) -> Result<Option<String>, FacadeError> {
        self.try_generate_dish_image(&recipe.title).await
    }

    /// Same as [`Self::try_generate_recipe_image`] when all you have is the name.
    pub async fn try_generate_dish_image(&self, title: &str) -> Result<Option<String>, FacadeError> {
        let response = self
            .generate_free(prompts::illustrate_recipe(title), &self.config.image_model)
            .await?;
        let image = response.inline_images()?.next().map(|d| d.to_data_url());
        if image.is_none() {
            tracing::info!("No image returned for {:?}", title);
        }
        Ok(image)
    }

    /// Like [`Self::try_generate_recipe_image`], but every failure, and a
    /// missing image, comes back as an empty string.
    pub async fn generate_recipe_image(&self, recipe: &Recipe) -> String {
        match self.try_generate_recipe_image(recipe).await {
            Ok(image) => image.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Image generation failed for {:?}: {e}", recipe.title);
                String::new()
            }
        }
    }
}
