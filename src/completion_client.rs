//! # Completion Client Module
//!
//! Sends one completion request to the hosted chat-completion endpoint and
//! classifies the outcome into the fixed [`IngestionError`] taxonomy.
//!
//! The HTTP exchange sits behind the [`CompletionTransport`] trait. Production
//! code uses [`ReqwestTransport`]; tests use [`FakeTransport`], which answers
//! with a canned reply and counts how often it was called.
//!
//! There are no retries. Dropping the future returned by
//! [`CompletionClient::complete`] cancels the in-flight request.

use async_trait::async_trait;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::ai_payload::{CompletionEnvelope, ProviderErrorEnvelope};
use crate::ingestion_errors::{IngestionError, NO_RECIPE_GENERATED};
use crate::prompt_builder::CompletionRequest;

/// Raw HTTP answer of the endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

/// Performs the POST of a completion request
///
/// Implementations report DNS, connection, timeout and body-read problems as
/// [`IngestionError::TransportFailure`] and every HTTP answer, whatever its
/// status, as an [`HttpReply`].
#[async_trait]
pub trait CompletionTransport: Send + Sync + fmt::Debug {
    async fn post_json(
        &self,
        endpoint: &str,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<HttpReply, IngestionError>;
}

#[async_trait]
impl<T: CompletionTransport + ?Sized> CompletionTransport for Arc<T> {
    async fn post_json(
        &self,
        endpoint: &str,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<HttpReply, IngestionError> {
        (**self).post_json(endpoint, api_key, request).await
    }
}

/// Transport backed by a shared `reqwest` client
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a transport whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CompletionTransport for ReqwestTransport {
    async fn post_json(
        &self,
        endpoint: &str,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<HttpReply, IngestionError> {
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| IngestionError::TransportFailure(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| IngestionError::TransportFailure(e.to_string()))?;

        Ok(HttpReply { status, body })
    }
}

/// Map an HTTP answer to the content of the first choice or a classified error
pub fn classify_reply(reply: &HttpReply) -> Result<String, IngestionError> {
    match reply.status {
        200..=299 => {
            let envelope: CompletionEnvelope = serde_json::from_str(&reply.body).map_err(|e| {
                warn!(error = %e, "Completion envelope could not be decoded");
                IngestionError::MalformedResponse
            })?;
            envelope
                .into_first_content()
                .ok_or_else(|| IngestionError::RemoteRejected(NO_RECIPE_GENERATED.to_string()))
        }
        401 => Err(IngestionError::InvalidCredential),
        429 => Err(IngestionError::QuotaExceeded),
        500..=599 => Err(IngestionError::ServerFailure),
        status => match serde_json::from_str::<ProviderErrorEnvelope>(&reply.body) {
            Ok(envelope) => {
                debug!(
                    status,
                    kind = envelope.error.kind.as_deref().unwrap_or(""),
                    "Endpoint returned an error envelope"
                );
                Err(IngestionError::RemoteRejected(envelope.error.message))
            }
            Err(_) => Err(IngestionError::MalformedResponse),
        },
    }
}

/// Client for the chat-completion endpoint
#[derive(Debug, Clone)]
pub struct CompletionClient<T = ReqwestTransport> {
    endpoint: String,
    transport: T,
}

impl<T: CompletionTransport> CompletionClient<T> {
    pub fn new(endpoint: &str, transport: T) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            transport,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request` and return the raw content of the first choice
    ///
    /// An empty `api_key` fails with [`IngestionError::MissingCredential`]
    /// before anything is sent.
    pub async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<String, IngestionError> {
        if api_key.is_empty() {
            warn!("Refusing to call the completion endpoint without an API key");
            return Err(IngestionError::MissingCredential);
        }

        debug!(endpoint = %self.endpoint, model = %request.model, "Sending completion request");
        let reply = self
            .transport
            .post_json(&self.endpoint, api_key, request)
            .await?;

        info!(status = reply.status, bytes = reply.body.len(), "Completion endpoint answered");
        classify_reply(&reply)
    }
}

/// In-memory transport answering every call with the same outcome
#[derive(Debug)]
pub struct FakeTransport {
    outcome: Result<HttpReply, IngestionError>,
    calls: AtomicUsize,
    last_api_key: Mutex<Option<String>>,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl FakeTransport {
    /// Answer every call with `status` and `body`
    pub fn replying(status: u16, body: &str) -> Self {
        Self::with_outcome(Ok(HttpReply::new(status, body)))
    }

    /// Answer with a successful envelope whose first choice carries `content`
    pub fn with_content(content: &str) -> Self {
        let body = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        });
        Self::replying(200, &body.to_string())
    }

    /// Fail every call at the transport level with `cause`
    pub fn failing(cause: &str) -> Self {
        Self::with_outcome(Err(IngestionError::TransportFailure(cause.to_string())))
    }

    fn with_outcome(outcome: Result<HttpReply, IngestionError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_api_key: Mutex::new(None),
            last_request: Mutex::new(None),
        }
    }

    /// Number of requests that reached this transport
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_api_key(&self) -> Option<String> {
        self.last_api_key
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CompletionTransport for FakeTransport {
    async fn post_json(
        &self,
        _endpoint: &str,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<HttpReply, IngestionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_api_key.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(api_key.to_string());
        *self.last_request.lock().unwrap_or_else(PoisonError::into_inner) = Some(request.clone());
        self.outcome.clone()
    }
}
