//! # Recipe Parser
//!
//! Turns the raw content returned by the completion endpoint into a [`Recipe`].
//!
//! Decoding is strict: a missing required field or a wrong type fails with
//! [`IngestionError::DecodingFailure`]. Mapping is lenient in exactly one place:
//! an unrecognized difficulty becomes [`Difficulty::Medium`].
//!
//! ## Usage
//!
//! ```rust
//! use recipeasy_ingest::recipe_parser::parse_recipe;
//!
//! let content = r#"{"name":"Toast","description":"Crispy","cookingTimeMinutes":3,
//!     "difficulty":"easy","ingredients":[{"name":"bread","amount":1,"unit":"slice"}],
//!     "steps":[{"orderIndex":0,"description":"Toast the bread"}],"notes":""}"#;
//!
//! let recipe = parse_recipe(content)?;
//! assert!(recipe.is_ai_generated);
//! # Ok::<(), recipeasy_ingest::ingestion_errors::IngestionError>(())
//! ```

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::ai_payload::{IngredientPayload, RecipePayload, StepPayload};
use crate::ingestion_errors::IngestionError;
use crate::recipe_model::{CookingStep, Difficulty, Ingredient, Recipe};

/// Parse model output into a recipe stamped with the current time
pub fn parse_recipe(content: &str) -> Result<Recipe, IngestionError> {
    parse_recipe_at(content, Utc::now())
}

/// Parse model output into a recipe whose timestamps are both `now`
pub fn parse_recipe_at(content: &str, now: DateTime<Utc>) -> Result<Recipe, IngestionError> {
    let payload = decode_payload(content)?;
    let recipe = recipe_from_payload(payload, now);

    let duplicates = recipe.duplicate_step_indices();
    if !duplicates.is_empty() {
        // Kept as-is; orderIndex from the model is authoritative
        warn!(
            "Recipe '{}' has duplicate step order indices: {:?}",
            recipe.name, duplicates
        );
    }

    debug!(
        "Parsed recipe '{}' with {} ingredients and {} steps",
        recipe.name,
        recipe.ingredients.len(),
        recipe.steps.len()
    );
    Ok(recipe)
}

/// Strictly decode the payload shape
pub fn decode_payload(content: &str) -> Result<RecipePayload, IngestionError> {
    serde_json::from_str::<RecipePayload>(content).map_err(|e| {
        warn!("Generated content does not match the recipe payload: {e}");
        IngestionError::from(e)
    })
}

/// Map a decoded payload into a recipe
pub fn recipe_from_payload(payload: RecipePayload, now: DateTime<Utc>) -> Recipe {
    let mut recipe = Recipe::new_at(&payload.name, now);

    recipe.description = payload.description;
    recipe.cooking_time_minutes = payload.cooking_time_minutes;
    recipe.difficulty = Difficulty::from_token(&payload.difficulty);
    recipe.notes = payload.notes.unwrap_or_default();
    recipe.ingredients = payload.ingredients.into_iter().map(ingredient_from_payload).collect();
    recipe.steps = payload.steps.into_iter().map(step_from_payload).collect();
    recipe.is_ai_generated = true;

    recipe
}

fn ingredient_from_payload(payload: IngredientPayload) -> Ingredient {
    Ingredient {
        name: payload.name,
        amount: payload.amount,
        unit: payload.unit,
        notes: payload.notes,
    }
}

fn step_from_payload(payload: StepPayload) -> CookingStep {
    CookingStep {
        order_index: payload.order_index,
        description: payload.description,
        duration_minutes: payload.duration_minutes,
        notes: payload.notes,
    }
}
