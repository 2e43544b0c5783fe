//! # Recipe Ingestion Facade
//!
//! One entry point per input channel. Each call runs prompt building, one
//! completion request and payload parsing in sequence, stops at the first
//! failing stage and returns that stage's error unchanged.
//!
//! The ingestor holds no mutable state. It can be shared behind an `Arc` and
//! called concurrently; the API key is passed per call and only read.

use std::time::Duration;
use tracing::{error, info, instrument};

use crate::completion_client::{CompletionClient, CompletionTransport, ReqwestTransport};
use crate::ingestion_config::IngestConfig;
use crate::ingestion_errors::IngestionError;
use crate::prompt_builder::{Channel, CompletionRequest, PromptBuilder, RecipePreferences};
use crate::recipe_model::Recipe;
use crate::recipe_parser::parse_recipe;

/// Turns free text, HTML or PDF text into a [`Recipe`]
#[derive(Debug, Clone)]
pub struct RecipeIngestor<T = ReqwestTransport> {
    prompts: PromptBuilder,
    client: CompletionClient<T>,
}

impl RecipeIngestor<ReqwestTransport> {
    /// Build an ingestor talking HTTP as described by `config`
    pub fn from_config(config: &IngestConfig) -> anyhow::Result<Self> {
        let transport = match config.request_timeout_secs {
            Some(secs) => ReqwestTransport::with_timeout(Duration::from_secs(secs))?,
            None => ReqwestTransport::new(),
        };
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: CompletionTransport> RecipeIngestor<T> {
    /// Build an ingestor on top of an arbitrary transport
    pub fn with_transport(config: &IngestConfig, transport: T) -> Self {
        Self {
            prompts: PromptBuilder::new(config.generation.clone()),
            client: CompletionClient::new(&config.endpoint, transport),
        }
    }

    pub fn client(&self) -> &CompletionClient<T> {
        &self.client
    }

    /// Generate a recipe from a free-text description
    pub async fn from_prompt(&self, text: &str, api_key: &str) -> Result<Recipe, IngestionError> {
        self.ingest(Channel::Prompt, text, api_key).await
    }

    /// Generate a recipe from a free-text description and generation preferences
    pub async fn from_prompt_with_preferences(
        &self,
        text: &str,
        preferences: &RecipePreferences,
        api_key: &str,
    ) -> Result<Recipe, IngestionError> {
        let request = self.prompts.build_with_preferences(text, preferences);
        self.run(Channel::Prompt, &request, api_key).await
    }

    /// Extract a recipe from the raw HTML of a web page
    pub async fn from_html(&self, raw_html: &str, api_key: &str) -> Result<Recipe, IngestionError> {
        self.ingest(Channel::Html, raw_html, api_key).await
    }

    /// Extract a recipe from text pulled out of a PDF document
    pub async fn from_pdf_text(
        &self,
        extracted_text: &str,
        api_key: &str,
    ) -> Result<Recipe, IngestionError> {
        self.ingest(Channel::PdfText, extracted_text, api_key).await
    }

    /// Run the pipeline for `context` arriving through `channel`
    pub async fn ingest(
        &self,
        channel: Channel,
        context: &str,
        api_key: &str,
    ) -> Result<Recipe, IngestionError> {
        let request = self.prompts.build(channel, context);
        self.run(channel, &request, api_key).await
    }

    #[instrument(level = "info", skip_all, fields(channel = %channel))]
    async fn run(
        &self,
        channel: Channel,
        request: &CompletionRequest,
        api_key: &str,
    ) -> Result<Recipe, IngestionError> {
        info!("Starting recipe ingestion");

        let outcome = match self.client.complete(api_key, request).await {
            Ok(content) => parse_recipe(&content),
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(recipe) => info!(
                recipe = %recipe.name,
                ingredients = recipe.ingredients.len(),
                steps = recipe.steps.len(),
                "Recipe ingestion succeeded"
            ),
            Err(e) => error!(kind = e.error_key(), "Recipe ingestion failed: {e}"),
        }

        outcome
    }
}
