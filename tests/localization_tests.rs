//! # Localization Tests
//!
//! This module contains unit tests for the localization functionality,
//! testing message retrieval, argument formatting and language fallback.

use recipeasy_ingest::ingestion_errors::IngestionError;
use recipeasy_ingest::localization::LocalizationManager;

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_localization() -> LocalizationManager {
        LocalizationManager::new().expect("Failed to create localization manager")
    }

    #[test]
    fn test_get_message_existing_key() {
        let manager = setup_localization();

        let message = manager.get_message("ingestion-started", Some("en"), &[]);
        assert_eq!(message, "Generating your recipe...");
    }

    #[test]
    fn test_get_message_nonexistent_key() {
        let manager = setup_localization();

        let message = manager.get_message("nonexistent-key", Some("en"), &[]);
        assert!(message.starts_with("Missing translation:"));
    }

    #[test]
    fn test_get_message_unsupported_language() {
        let manager = setup_localization();

        let message = manager.get_message("ingestion-started", Some("de"), &[]);
        // Should fall back to English
        assert_eq!(message, "Generating your recipe...");
    }

    #[test]
    fn test_get_message_without_language() {
        let manager = setup_localization();

        let message = manager.get_message("ingestion-started", None, &[]);
        assert_eq!(message, "Generating your recipe...");
    }

    #[test]
    fn test_get_message_with_args() {
        let manager = setup_localization();

        let english = manager.get_message("ingestion-succeeded", Some("en"), &[("name", "Veggie Pasta")]);
        let french = manager.get_message("ingestion-succeeded", Some("fr"), &[("name", "Veggie Pasta")]);

        assert_eq!(english, "Recipe \"Veggie Pasta\" is ready.");
        assert!(french.contains("Veggie Pasta"));
        assert!(french.starts_with("La recette"));
    }

    #[test]
    fn test_every_error_kind_has_a_message_in_every_language() {
        let manager = setup_localization();
        let errors = [
            IngestionError::MissingCredential,
            IngestionError::InvalidCredential,
            IngestionError::QuotaExceeded,
            IngestionError::ServerFailure,
            IngestionError::TransportFailure("timed out".to_string()),
            IngestionError::RemoteRejected("Invalid model".to_string()),
            IngestionError::MalformedResponse,
            IngestionError::DecodingFailure("missing field `name`".to_string()),
        ];

        for language in manager.languages() {
            for error in &errors {
                let message = manager.user_message(error, Some(language));
                assert!(
                    !message.starts_with("Missing"),
                    "{language} has no message for {}",
                    error.error_key()
                );
            }
        }
    }

    #[test]
    fn test_user_message_includes_detail() {
        let manager = setup_localization();

        let error = IngestionError::RemoteRejected("Invalid model".to_string());
        assert_eq!(
            manager.user_message(&error, Some("en")),
            "The recipe service rejected the request: Invalid model"
        );

        let error = IngestionError::TransportFailure("timed out".to_string());
        assert!(manager.user_message(&error, Some("fr")).ends_with("timed out"));
    }

    #[test]
    fn test_user_message_in_french() {
        let manager = setup_localization();

        let message = manager.user_message(&IngestionError::QuotaExceeded, Some("fr-FR"));
        assert!(message.starts_with("Le quota de l'API est dépassé"));
    }
}
