use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

pub mod error;
pub mod suggestion;

pub use error::NetworkFailure;
pub use suggestion::{IssueKind, Suggestion};

use suggestion::{ErrorEnvelope, SuggestRequest, SuggestResponse};

/// The interface for any suggestion backend.
///
/// The fetcher only ever talks to this trait, so tests can swap in a fake
/// transport.
#[async_trait]
pub trait SuggestionBackend: Send + Sync {
    async fn suggest(&self, content: &str) -> Result<Vec<Suggestion>, NetworkFailure>;
}

/// Direct HTTP client for the `/api/ai/suggest` endpoint.
pub struct SuggestionClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for SuggestionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SuggestionClient {
    pub fn new(base_url: &str) -> Self {
        info!("Suggestion client targeting: {}", base_url);

        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            timeout: None,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Bound every request at the transport level.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/ai/suggest", self.base_url)
    }

    fn map_send_error(&self, err: reqwest::Error) -> NetworkFailure {
        match self.timeout {
            Some(limit) if err.is_timeout() => NetworkFailure::Timeout(limit),
            _ => NetworkFailure::from(err),
        }
    }
}

/// Pull a human-readable message out of a failed response body.
pub fn failure_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.message,
        Err(_) => body.chars().take(200).collect(),
    }
}

#[async_trait]
impl SuggestionBackend for SuggestionClient {
    async fn suggest(&self, content: &str) -> Result<Vec<Suggestion>, NetworkFailure> {
        let url = self.endpoint();

        let mut req = self.http.post(&url).json(&SuggestRequest { content });
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(limit) = self.timeout {
            req = req.timeout(limit);
        }

        let resp = req.send().await.map_err(|e| self.map_send_error(e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            return Err(NetworkFailure::Status {
                status: status.as_u16(),
                message: failure_message(&text),
            });
        }

        let parsed: SuggestResponse = serde_json::from_str(&text)
            .map_err(|e| NetworkFailure::Malformed(e.to_string()))?;

        debug!(count = parsed.suggestions.len(), "suggestions received");
        Ok(parsed.suggestions)
    }
}
