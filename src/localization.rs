use anyhow::{anyhow, Result};
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

use crate::ingestion_errors::IngestionError;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Message files compiled into the binary, keyed by language
const RESOURCES: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en/main.ftl")),
    ("fr", include_str!("../locales/fr/main.ftl")),
];

/// Localization manager for user-facing ingestion messages
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a localization manager with every bundled language loaded
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for (language, source) in RESOURCES {
            let locale: LanguageIdentifier = language.parse()?;
            bundles.insert(language.to_string(), Self::create_bundle(locale, source)?);
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(
        locale: LanguageIdentifier,
        source: &str,
    ) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new(vec![locale.clone()]);
        // No bidi isolation marks around arguments; output goes to plain terminals
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid message file for {locale}: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Conflicting messages for {locale}: {errors:?}"))?;

        Ok(bundle)
    }

    /// Languages with a loaded bundle
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.bundles.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    /// Resolve a language code such as "fr-CA" to a loaded bundle, else English
    fn bundle_for(&self, language_code: Option<&str>) -> Option<&FluentBundle<FluentResource>> {
        let requested = language_code
            .and_then(|code| code.split(['-', '_']).next())
            .map(|primary| primary.to_lowercase());

        requested
            .and_then(|primary| self.bundles.get(&primary))
            .or_else(|| self.bundles.get(DEFAULT_LANGUAGE))
    }

    /// Get a localized message with simple string arguments
    pub fn get_message(&self, key: &str, language_code: Option<&str>, args: &[(&str, &str)]) -> String {
        let Some(bundle) = self.bundle_for(language_code) else {
            return format!("Missing translation: {key}");
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {key}"),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {key}"),
        };

        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, *value);
        }

        let mut errors = vec![];
        bundle
            .format_pattern(pattern, Some(&fluent_args), &mut errors)
            .to_string()
    }

    /// Message to show the user for a failed ingestion
    pub fn user_message(&self, error: &IngestionError, language_code: Option<&str>) -> String {
        let detail = error.detail().unwrap_or_default();
        self.get_message(error.error_key(), language_code, &[("detail", detail)])
    }
}
