use async_trait::async_trait;
use drafter_neural::{failure_message, NetworkFailure};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::info;

use super::model::{Draft, DraftData, Template};

/// The CRUD-style document service the store talks to.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    async fn get_templates(&self) -> Result<Vec<Template>, NetworkFailure>;
    async fn save_draft(&self, draft: &DraftData) -> Result<Draft, NetworkFailure>;
}

pub struct HttpDocumentClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for HttpDocumentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDocumentClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl HttpDocumentClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        info!("Document client targeting: {}", base_url);

        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn read_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, NetworkFailure> {
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(NetworkFailure::Status {
                status: status.as_u16(),
                message: failure_message(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| NetworkFailure::Malformed(e.to_string()))
    }
}

#[async_trait]
impl DocumentApi for HttpDocumentClient {
    async fn get_templates(&self) -> Result<Vec<Template>, NetworkFailure> {
        let req = self.authorize(self.http.get(self.url("/api/templates")));
        Self::read_json(req).await
    }

    async fn save_draft(&self, draft: &DraftData) -> Result<Draft, NetworkFailure> {
        let req = self.authorize(self.http.post(self.url("/api/documents/drafts")).json(draft));
        Self::read_json(req).await
    }
}
