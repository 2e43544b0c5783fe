//! # Ingestion Error Types Module
//!
//! This module defines the fixed error taxonomy shared by every stage of the
//! recipe ingestion pipeline. Each stage either succeeds or produces exactly one
//! of these kinds, and the ingestion facade forwards them unchanged.

use thiserror::Error;

/// Message used when the completion endpoint answers without any choice.
pub const NO_RECIPE_GENERATED: &str = "No recipe generated";

/// Terminal failure of a single ingestion call
///
/// None of these are retried inside the pipeline. The caller decides whether to
/// re-invoke, for instance after asking the user for a different API key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestionError {
    /// The API key was empty; no request was sent
    #[error("No API key configured")]
    MissingCredential,
    /// The endpoint rejected the API key (HTTP 401)
    #[error("The API key was rejected by the completion endpoint")]
    InvalidCredential,
    /// The account ran out of quota or hit the rate limit (HTTP 429)
    #[error("API quota exceeded")]
    QuotaExceeded,
    /// The endpoint failed on its side (HTTP 5xx)
    #[error("The completion endpoint failed to process the request")]
    ServerFailure,
    /// DNS, connection, timeout or body read failure
    #[error("Network error: {0}")]
    TransportFailure(String),
    /// The endpoint answered with an error envelope, or with no choices
    #[error("Request rejected: {0}")]
    RemoteRejected(String),
    /// The endpoint answered with a body that matches no known envelope
    #[error("Malformed response from the completion endpoint")]
    MalformedResponse,
    /// The model's content did not match the recipe payload shape
    #[error("Could not decode the generated recipe: {0}")]
    DecodingFailure(String),
}

impl IngestionError {
    /// Stable identifier of the error kind, used as the localization key
    pub fn error_key(&self) -> &'static str {
        match self {
            IngestionError::MissingCredential => "error-missing-credential",
            IngestionError::InvalidCredential => "error-invalid-credential",
            IngestionError::QuotaExceeded => "error-quota-exceeded",
            IngestionError::ServerFailure => "error-server-failure",
            IngestionError::TransportFailure(_) => "error-transport-failure",
            IngestionError::RemoteRejected(_) => "error-remote-rejected",
            IngestionError::MalformedResponse => "error-malformed-response",
            IngestionError::DecodingFailure(_) => "error-decoding-failure",
        }
    }

    /// Free-form detail carried by the error, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            IngestionError::TransportFailure(detail)
            | IngestionError::RemoteRejected(detail)
            | IngestionError::DecodingFailure(detail) => Some(detail),
            _ => None,
        }
    }

    /// Whether asking the user for another API key could resolve the failure
    pub fn is_credential_problem(&self) -> bool {
        matches!(
            self,
            IngestionError::MissingCredential | IngestionError::InvalidCredential
        )
    }
}

impl From<serde_json::Error> for IngestionError {
    fn from(err: serde_json::Error) -> Self {
        IngestionError::DecodingFailure(err.to_string())
    }
}
