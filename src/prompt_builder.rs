//! # Prompt Builder Module
//!
//! Composes the typed chat-completion request for one ingestion call: a fixed
//! system instruction describing the required JSON output, a channel-specific
//! user message, the generation parameters and, when enabled, a `json_schema`
//! response format mirroring the recipe payload.
//!
//! Building a request is a pure transformation. Generation parameters are
//! validated when the configuration is loaded, so it cannot fail.

use lazy_static::lazy_static;
use log::debug;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::fmt;

use crate::ingestion_config::GenerationSettings;
use crate::text_cleaning::{clean_html, normalize_pdf_text};

/// Name under which the output schema is registered with the endpoint
pub const SCHEMA_NAME: &str = "recipe";

/// Role description and exact output shape sent as the system message
pub const SYSTEM_INSTRUCTION: &str = r#"You are a helpful cooking assistant. Generate detailed recipes with exact measurements, step-by-step instructions, and cooking tips.
Respond only with JSON in the following format:
{
    "name": "Recipe Name",
    "description": "Brief description",
    "cookingTimeMinutes": 30,
    "difficulty": "easy|medium|hard",
    "ingredients": [
        {
            "name": "Ingredient name",
            "amount": 2.0,
            "unit": "cups",
            "notes": "optional notes"
        }
    ],
    "steps": [
        {
            "orderIndex": 0,
            "description": "Step description",
            "durationMinutes": 5,
            "notes": "optional notes"
        }
    ],
    "notes": "Additional tips and notes"
}"#;

const HTML_INSTRUCTION: &str = "Extract the recipe from this HTML and format it as JSON. \
Ensure the difficulty is set accordingly. Here's the webpage content:";

const PDF_INSTRUCTION: &str = "Extract the recipe from this raw text and format it as JSON. \
Ensure the difficulty is set accordingly. Here's the content:";

const RETURN_JSON_ONLY: &str = "Return only valid JSON in the format described.";

lazy_static! {
    static ref RECIPE_SCHEMA: Value = json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "description": { "type": "string" },
            "cookingTimeMinutes": { "type": "integer", "minimum": 1 },
            "difficulty": { "type": "string", "enum": ["easy", "medium", "hard"] },
            "ingredients": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "amount": { "type": "number", "minimum": 0 },
                        "unit": { "type": "string" },
                        "notes": { "type": "string" }
                    },
                    "required": ["name", "amount", "unit"]
                }
            },
            "steps": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "orderIndex": { "type": "integer", "minimum": 0 },
                        "description": { "type": "string" },
                        "durationMinutes": { "type": "integer", "minimum": 1 },
                        "notes": { "type": "string" }
                    },
                    "required": ["orderIndex", "description"]
                }
            },
            "notes": { "type": "string" }
        },
        "required": ["name", "description", "cookingTimeMinutes", "difficulty", "ingredients", "steps"]
    });
}

/// JSON schema of the recipe payload
pub fn recipe_schema() -> Value {
    RECIPE_SCHEMA.clone()
}

/// Input source feeding the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Free-text description of the wanted recipe
    Prompt,
    /// Raw HTML of a recipe web page
    Html,
    /// Text extracted from a PDF document
    PdfText,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Prompt => "prompt",
            Channel::Html => "html",
            Channel::PdfText => "pdf_text",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dietary restriction a generated recipe must respect
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DietaryRestriction {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
}

impl DietaryRestriction {
    pub fn label(&self) -> &'static str {
        match self {
            DietaryRestriction::Vegetarian => "Vegetarian",
            DietaryRestriction::Vegan => "Vegan",
            DietaryRestriction::GlutenFree => "Gluten-Free",
            DietaryRestriction::DairyFree => "Dairy-Free",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CookingTimePreference {
    #[default]
    Any,
    /// Under 30 minutes
    Quick,
    /// 30 to 60 minutes
    Medium,
    /// Over an hour
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CuisinePreference {
    #[default]
    Any,
    Italian,
    Asian,
    Mexican,
    Mediterranean,
}

impl CuisinePreference {
    pub fn label(&self) -> &'static str {
        match self {
            CuisinePreference::Any => "Any Cuisine",
            CuisinePreference::Italian => "Italian",
            CuisinePreference::Asian => "Asian",
            CuisinePreference::Mexican => "Mexican",
            CuisinePreference::Mediterranean => "Mediterranean",
        }
    }
}

/// Constraints prepended to a free-text prompt
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipePreferences {
    pub dietary_restrictions: BTreeSet<DietaryRestriction>,
    pub cooking_time: CookingTimePreference,
    pub cuisine: CuisinePreference,
}

impl RecipePreferences {
    pub fn with_restriction(mut self, restriction: DietaryRestriction) -> Self {
        self.dietary_restrictions.insert(restriction);
        self
    }

    pub fn with_cooking_time(mut self, cooking_time: CookingTimePreference) -> Self {
        self.cooking_time = cooking_time;
        self
    }

    pub fn with_cuisine(mut self, cuisine: CuisinePreference) -> Self {
        self.cuisine = cuisine;
        self
    }

    /// Sentence prefix describing the preferences, empty when there are none
    ///
    /// ```rust
    /// use recipeasy_ingest::prompt_builder::{CuisinePreference, DietaryRestriction, RecipePreferences};
    ///
    /// let prefs = RecipePreferences::default()
    ///     .with_restriction(DietaryRestriction::Vegan)
    ///     .with_cuisine(CuisinePreference::Italian);
    /// assert_eq!(prefs.prompt_prefix(), "Must be Vegan. Should be Italian cuisine. ");
    /// ```
    pub fn prompt_prefix(&self) -> String {
        let mut components: Vec<String> = Vec::new();

        if !self.dietary_restrictions.is_empty() {
            let restrictions = self
                .dietary_restrictions
                .iter()
                .map(|r| r.label())
                .collect::<Vec<&str>>()
                .join(", ");
            components.push(format!("Must be {restrictions}"));
        }

        match self.cooking_time {
            CookingTimePreference::Any => {}
            CookingTimePreference::Quick => {
                components.push("Should take less than 30 minutes to prepare".to_string())
            }
            CookingTimePreference::Medium => {
                components.push("Should take between 30-60 minutes to prepare".to_string())
            }
            CookingTimePreference::Long => {
                components.push("Can take over an hour to prepare".to_string())
            }
        }

        if self.cuisine != CuisinePreference::Any {
            components.push(format!("Should be {} cuisine", self.cuisine.label()));
        }

        if components.is_empty() {
            String::new()
        } else {
            format!("{}. ", components.join(". "))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub strict: bool,
    pub schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
    pub json_schema: JsonSchemaFormat,
}

impl ResponseFormat {
    /// `json_schema` response format carrying the recipe payload schema
    pub fn recipe_schema() -> Self {
        Self {
            kind: "json_schema".to_string(),
            json_schema: JsonSchemaFormat {
                name: SCHEMA_NAME.to_string(),
                // strict mode would require notes and durations to be mandatory
                strict: false,
                schema: recipe_schema(),
            },
        }
    }
}

/// Outbound chat-completion request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl CompletionRequest {
    /// Content of the user message
    pub fn user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// Builds completion requests from channel input
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    settings: GenerationSettings,
}

impl PromptBuilder {
    pub fn new(settings: GenerationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Build the request for `context` arriving through `channel`
    pub fn build(&self, channel: Channel, context: &str) -> CompletionRequest {
        self.assemble(channel, Self::user_message(channel, context, None))
    }

    /// Build a free-text prompt request with generation preferences
    pub fn build_with_preferences(
        &self,
        text: &str,
        preferences: &RecipePreferences,
    ) -> CompletionRequest {
        self.assemble(
            Channel::Prompt,
            Self::user_message(Channel::Prompt, text, Some(preferences)),
        )
    }

    fn user_message(
        channel: Channel,
        context: &str,
        preferences: Option<&RecipePreferences>,
    ) -> String {
        match channel {
            Channel::Prompt => {
                let prefix = preferences.map(|p| p.prompt_prefix()).unwrap_or_default();
                format!("{prefix}{context}")
            }
            Channel::Html => {
                format!("{HTML_INSTRUCTION}\n\n{}\n\n{RETURN_JSON_ONLY}", clean_html(context))
            }
            Channel::PdfText => format!(
                "{PDF_INSTRUCTION}\n\n{}\n\n{RETURN_JSON_ONLY}",
                normalize_pdf_text(context)
            ),
        }
    }

    fn assemble(&self, channel: Channel, user_content: String) -> CompletionRequest {
        debug!(
            "Building {} request with {} characters of context",
            channel,
            user_content.len()
        );

        let response_format = if self.settings.structured_output {
            Some(ResponseFormat::recipe_schema())
        } else {
            None
        };

        CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                ChatMessage {
                    role: Role::User,
                    content: user_content,
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            response_format,
        }
    }
}
