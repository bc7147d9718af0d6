use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    /// Placeholder variables the template expects to be filled.
    #[serde(default)]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    #[default]
    Draft,
    Finalized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub id: Uuid,
    pub template_id: Uuid,
    pub content: String,
    #[serde(default)]
    pub status: DraftStatus,
    pub updated_at: DateTime<Utc>,
}

/// Payload for saving a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftData {
    pub template_id: Uuid,
    pub content: String,
}

impl Draft {
    pub fn is_finalized(&self) -> bool {
        self.status == DraftStatus::Finalized
    }
}
