//! # Ingestion Configuration Module
//!
//! This module defines configuration structures for the ingestion pipeline,
//! including endpoint and generation settings, their environment overrides,
//! and the selection of which API key a call should use.

use anyhow::{bail, Context, Result};
use log::debug;
use std::env;
use std::str::FromStr;

// Constants for ingestion configuration
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Generation parameters attached to every completion request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Model identifier sent to the endpoint
    pub model: String,
    /// Sampling temperature, 0.0 to 2.0
    pub temperature: f32,
    /// Token ceiling for the generated answer
    pub max_tokens: u32,
    /// Whether to attach a `json_schema` response format
    pub structured_output: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            structured_output: true,
        }
    }
}

/// Configuration for the ingestion pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    /// Chat-completion endpoint URL
    pub endpoint: String,
    /// Generation parameters
    pub generation: GenerationSettings,
    /// Transport timeout in seconds; `None` keeps the HTTP client's default
    pub request_timeout_secs: Option<u64>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            generation: GenerationSettings::default(),
            request_timeout_secs: None,
        }
    }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Invalid value for {name}: {raw:?}"))
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("Invalid value for {name}: {raw:?} (expected true or false)"),
    }
}

impl IngestConfig {
    /// Build a configuration from `RECIPEASY_*` environment variables
    ///
    /// Unset variables keep their defaults. Call `dotenv::dotenv()` first to
    /// pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = lookup("RECIPEASY_ENDPOINT") {
            config.endpoint = endpoint.trim().to_string();
        }
        if let Some(model) = lookup("RECIPEASY_MODEL") {
            config.generation.model = model.trim().to_string();
        }
        if let Some(raw) = lookup("RECIPEASY_TEMPERATURE") {
            config.generation.temperature = parse_var("RECIPEASY_TEMPERATURE", &raw)?;
        }
        if let Some(raw) = lookup("RECIPEASY_MAX_TOKENS") {
            config.generation.max_tokens = parse_var("RECIPEASY_MAX_TOKENS", &raw)?;
        }
        if let Some(raw) = lookup("RECIPEASY_STRUCTURED_OUTPUT") {
            config.generation.structured_output =
                parse_flag("RECIPEASY_STRUCTURED_OUTPUT", &raw)?;
        }
        if let Some(raw) = lookup("RECIPEASY_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs =
                Some(parse_var("RECIPEASY_REQUEST_TIMEOUT_SECS", &raw)?);
        }

        config.validate()?;
        debug!(
            "Loaded ingestion config: endpoint={}, model={}, structured_output={}",
            config.endpoint, config.generation.model, config.generation.structured_output
        );
        Ok(config)
    }

    /// Reject settings the completion endpoint could never accept
    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            bail!("Endpoint must be an http(s) URL, got {:?}", self.endpoint);
        }
        if self.generation.model.is_empty() {
            bail!("Model name must not be empty");
        }
        let temperature = self.generation.temperature;
        if !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
            bail!("Temperature must be between 0 and {MAX_TEMPERATURE}, got {temperature}");
        }
        if self.generation.max_tokens == 0 {
            bail!("Token ceiling must be greater than zero");
        }
        if self.request_timeout_secs == Some(0) {
            bail!("Request timeout must be greater than zero seconds");
        }
        Ok(())
    }
}

/// Subscription state as reported by the entitlement layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Subscribed,
    NotSubscribed,
    /// Status has not been resolved yet
    Unknown,
}

/// Pick the API key a call should use
///
/// Subscribers use the bundled key, everyone else their own. While the status is
/// unknown the user's key wins if one is set.
pub fn select_api_key<'a>(
    status: SubscriptionStatus,
    user_key: &'a str,
    subscriber_key: &'a str,
) -> &'a str {
    match status {
        SubscriptionStatus::Subscribed => subscriber_key,
        SubscriptionStatus::NotSubscribed => user_key,
        SubscriptionStatus::Unknown => {
            if user_key.is_empty() {
                subscriber_key
            } else {
                user_key
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.generation.temperature, 0.7);
        assert_eq!(config.generation.max_tokens, 2048);
        assert!(config.generation.structured_output);
        assert_eq!(config.request_timeout_secs, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = IngestConfig::from_lookup(lookup_from(&[
            ("RECIPEASY_ENDPOINT", "http://localhost:8080/v1/chat/completions"),
            ("RECIPEASY_MODEL", "gpt-4o"),
            ("RECIPEASY_TEMPERATURE", "0.2"),
            ("RECIPEASY_MAX_TOKENS", "512"),
            ("RECIPEASY_STRUCTURED_OUTPUT", "off"),
            ("RECIPEASY_REQUEST_TIMEOUT_SECS", "45"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint, "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.generation.model, "gpt-4o");
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.generation.max_tokens, 512);
        assert!(!config.generation.structured_output);
        assert_eq!(config.request_timeout_secs, Some(45));
    }

    #[test]
    fn test_from_lookup_empty_keeps_defaults() {
        let config = IngestConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, IngestConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(IngestConfig::from_lookup(lookup_from(&[("RECIPEASY_TEMPERATURE", "hot")])).is_err());
        assert!(IngestConfig::from_lookup(lookup_from(&[("RECIPEASY_TEMPERATURE", "2.5")])).is_err());
        assert!(IngestConfig::from_lookup(lookup_from(&[("RECIPEASY_MAX_TOKENS", "0")])).is_err());
        assert!(IngestConfig::from_lookup(lookup_from(&[("RECIPEASY_ENDPOINT", "ftp://x")])).is_err());
        assert!(IngestConfig::from_lookup(lookup_from(&[("RECIPEASY_MODEL", "  ")])).is_err());
        assert!(IngestConfig::from_lookup(lookup_from(&[("RECIPEASY_STRUCTURED_OUTPUT", "maybe")])).is_err());
        assert!(IngestConfig::from_lookup(lookup_from(&[("RECIPEASY_REQUEST_TIMEOUT_SECS", "0")])).is_err());
    }

    #[test]
    fn test_select_api_key() {
        assert_eq!(select_api_key(SubscriptionStatus::Subscribed, "user", "sub"), "sub");
        assert_eq!(select_api_key(SubscriptionStatus::NotSubscribed, "user", "sub"), "user");
        assert_eq!(select_api_key(SubscriptionStatus::NotSubscribed, "", "sub"), "");
        assert_eq!(select_api_key(SubscriptionStatus::Unknown, "user", "sub"), "user");
        assert_eq!(select_api_key(SubscriptionStatus::Unknown, "", "sub"), "sub");
    }
}
