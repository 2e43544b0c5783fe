//! # AI Payload Types
//!
//! Transient shapes exchanged with the completion endpoint: the response
//! envelope, the provider error envelope, and the recipe payload the model is
//! instructed to emit inside its message content. None of these are persisted.

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

/// Successful chat-completion response; only `choices[0]` is consumed
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionEnvelope {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub content: String,
}

impl CompletionEnvelope {
    /// Content of the first choice, if the endpoint produced one
    pub fn into_first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
    }
}

/// Error body returned by the provider on some failures
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderErrorEnvelope {
    pub error: ProviderError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderError {
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// String or number depending on the provider
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

/// Recipe as the model is asked to emit it
///
/// Every field is required except the notes and the step duration. The
/// top-level `notes` is accepted as optional even though the model is told to
/// always send it; a missing value becomes an empty string on the recipe.
/// The difficulty stays a raw token until it is mapped into the model enum.
///
/// Integer fields also accept whole floats such as `25.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePayload {
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "whole_number")]
    pub cooking_time_minutes: u32,
    pub difficulty: String,
    pub ingredients: Vec<IngredientPayload>,
    pub steps: Vec<StepPayload>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientPayload {
    pub name: String,
    pub amount: f64,
    pub unit: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPayload {
    #[serde(deserialize_with = "whole_number")]
    pub order_index: u32,
    pub description: String,
    #[serde(default, deserialize_with = "optional_whole_number")]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Non-negative integer that fits in a `u32`, written as `25` or `25.0`
fn whole_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    number_to_u32::<D::Error>(&number)
}

fn optional_whole_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Number>::deserialize(deserializer)? {
        Some(number) => number_to_u32::<D::Error>(&number).map(Some),
        None => Ok(None),
    }
}

fn number_to_u32<E: de::Error>(number: &Number) -> Result<u32, E> {
    let converted = match number.as_u64() {
        Some(value) => u32::try_from(value).ok(),
        None => number
            .as_f64()
            .filter(|value| value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(value))
            .map(|value| value as u32),
    };

    converted.ok_or_else(|| {
        let shown = number.to_string();
        E::invalid_value(Unexpected::Other(&shown), &"a non-negative whole number")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_content() {
        let envelope: CompletionEnvelope = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"one"}},{"message":{"content":"two"}}]}"#,
        )
        .unwrap();
        assert_eq!(envelope.into_first_content().as_deref(), Some("one"));
    }

    #[test]
    fn test_empty_choices() {
        let envelope: CompletionEnvelope = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(envelope.into_first_content(), None);
    }

    #[test]
    fn test_provider_error_with_numeric_code() {
        let envelope: ProviderErrorEnvelope = serde_json::from_str(
            r#"{"error":{"message":"bad model","type":"invalid_request_error","code":404}}"#,
        )
        .unwrap();
        assert_eq!(envelope.error.message, "bad model");
        assert_eq!(envelope.error.kind.as_deref(), Some("invalid_request_error"));
        assert_eq!(envelope.error.code, Some(serde_json::json!(404)));
    }

    #[test]
    fn test_payload_optional_fields() {
        let payload: RecipePayload = serde_json::from_str(
            r#"{"name":"Toast","description":"","cookingTimeMinutes":3,"difficulty":"easy",
                "ingredients":[{"name":"bread","amount":1,"unit":"slice"}],
                "steps":[{"orderIndex":0,"description":"Toast it"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.notes, None);
        assert_eq!(payload.ingredients[0].notes, None);
        assert_eq!(payload.steps[0].duration_minutes, None);
    }

    #[test]
    fn test_whole_floats_are_accepted_for_integer_fields() {
        let payload: RecipePayload = serde_json::from_str(
            r#"{"name":"Toast","description":"","cookingTimeMinutes":25.0,"difficulty":"easy",
                "ingredients":[],"steps":[{"orderIndex":0.0,"description":"Toast it","durationMinutes":3.0}]}"#,
        )
        .unwrap();
        assert_eq!(payload.cooking_time_minutes, 25);
        assert_eq!(payload.steps[0].order_index, 0);
        assert_eq!(payload.steps[0].duration_minutes, Some(3));
    }

    #[test]
    fn test_null_duration_is_absent() {
        let step: StepPayload =
            serde_json::from_str(r#"{"orderIndex":1,"description":"Rest","durationMinutes":null}"#)
                .unwrap();
        assert_eq!(step.duration_minutes, None);
    }

    #[test]
    fn test_fractional_negative_and_oversized_numbers_are_rejected() {
        for raw in ["25.5", "-1", "-1.0", "4294967296", "\"25\""] {
            let json = format!(r#"{{"orderIndex":{raw},"description":"Rest"}}"#);
            assert!(
                serde_json::from_str::<StepPayload>(&json).is_err(),
                "orderIndex {raw} should be rejected"
            );
        }
    }
}
