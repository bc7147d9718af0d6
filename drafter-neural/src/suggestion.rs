use serde::{Deserialize, Serialize};

/// The category of issue the suggestion service flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    Clarity,
    Compliance,
    Ambiguity,
    Completeness,
}

/// A server-proposed edit: replace `context` with `replacement`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Substring expected to occur in the text the suggestion was computed from.
    pub context: String,
    pub replacement: String,
    /// Display-only rationale.
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<IssueKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Suggestion {
    pub fn new(
        context: impl Into<String>,
        replacement: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            context: context.into(),
            replacement: replacement.into(),
            reason: reason.into(),
            issue_type: None,
            confidence: None,
        }
    }

    pub fn with_issue(mut self, kind: IssueKind, confidence: f32) -> Self {
        self.issue_type = Some(kind);
        self.confidence = Some(confidence);
        self
    }

    /// True when `context` still anchors somewhere in `text`.
    pub fn is_applicable(&self, text: &str) -> bool {
        !self.context.is_empty() && text.contains(&self.context)
    }
}

/// Request body for `POST /api/ai/suggest`.
#[derive(Debug, Serialize)]
pub(crate) struct SuggestRequest<'a> {
    pub content: &'a str,
}

/// Response body for `POST /api/ai/suggest`.
#[derive(Debug, Deserialize)]
pub(crate) struct SuggestResponse {
    pub suggestions: Vec<Suggestion>,
}

/// Error envelope the backend returns on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[allow(dead_code)]
    pub error_code: Option<String>,
    pub message: String,
}
