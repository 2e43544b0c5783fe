//! # Recipeasy Ingest
//!
//! Turns unstructured recipe input (a free-text prompt, a web page's HTML, or
//! text extracted from a PDF) into a structured [`recipe_model::Recipe`] by way
//! of a hosted chat-completion endpoint.

pub mod ai_payload;
pub mod completion_client;
pub mod ingestion;
pub mod ingestion_config;
pub mod ingestion_errors;
pub mod localization;
pub mod prompt_builder;
pub mod recipe_model;
pub mod recipe_parser;
pub mod sources;
pub mod text_cleaning;

pub use ingestion::RecipeIngestor;
pub use ingestion_errors::IngestionError;
pub use recipe_model::{CookingStep, Difficulty, Ingredient, Recipe};
