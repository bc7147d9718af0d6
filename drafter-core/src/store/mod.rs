// drafter-core/src/store/mod.rs

use tracing::{debug, warn};

pub mod client;
pub mod model;

pub use client::{DocumentApi, HttpDocumentClient};
pub use model::{Draft, DraftData, DraftStatus, Template};

// ════════════════════════════════════════════════════════════════════
// State
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentState {
    pub templates: Vec<Template>,
    pub current_draft: Option<Draft>,
    pub status: Status,
    pub error: Option<String>,
}

// ════════════════════════════════════════════════════════════════════
// Actions
// ════════════════════════════════════════════════════════════════════

/// Lifecycle of one async operation.
#[derive(Debug, Clone, PartialEq)]
pub enum AsyncPhase<T> {
    Pending,
    Fulfilled(T),
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FetchTemplates(AsyncPhase<Vec<Template>>),
    SaveDraft(AsyncPhase<Draft>),
    SetCurrentDraft(Option<Draft>),
}

/// Pure state transition.
pub fn reduce(state: &mut DocumentState, action: Action) {
    match action {
        Action::FetchTemplates(phase) => match phase {
            AsyncPhase::Pending => state.status = Status::Loading,
            AsyncPhase::Fulfilled(templates) => {
                state.templates = templates;
                state.status = Status::Succeeded;
                state.error = None;
            }
            AsyncPhase::Rejected(message) => {
                state.status = Status::Failed;
                state.error = Some(message);
            }
        },
        Action::SaveDraft(phase) => match phase {
            AsyncPhase::Pending => state.status = Status::Loading,
            AsyncPhase::Fulfilled(draft) => {
                state.current_draft = Some(draft);
                state.status = Status::Succeeded;
                state.error = None;
            }
            // The unsaved draft stays current so the user can retry.
            AsyncPhase::Rejected(message) => {
                state.status = Status::Failed;
                state.error = Some(message);
            }
        },
        Action::SetCurrentDraft(draft) => state.current_draft = draft,
    }
}

// ════════════════════════════════════════════════════════════════════
// Store
// ════════════════════════════════════════════════════════════════════

/// Holds the document state and runs async operations against a
/// [`DocumentApi`], dispatching pending/fulfilled/rejected actions.
#[derive(Debug, Default)]
pub struct DocumentStore {
    state: DocumentState,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        debug!(?action, "document store dispatch");
        reduce(&mut self.state, action);
    }

    pub fn set_current_draft(&mut self, draft: Option<Draft>) {
        self.dispatch(Action::SetCurrentDraft(draft));
    }

    pub async fn fetch_templates(&mut self, api: &dyn DocumentApi) {
        self.dispatch(Action::FetchTemplates(AsyncPhase::Pending));
        let phase = match api.get_templates().await {
            Ok(templates) => AsyncPhase::Fulfilled(templates),
            Err(e) => {
                warn!("Failed to fetch templates: {}", e);
                AsyncPhase::Rejected(e.to_string())
            }
        };
        self.dispatch(Action::FetchTemplates(phase));
    }

    pub async fn save_draft(&mut self, api: &dyn DocumentApi, data: DraftData) {
        self.dispatch(Action::SaveDraft(AsyncPhase::Pending));
        let phase = match api.save_draft(&data).await {
            Ok(draft) => AsyncPhase::Fulfilled(draft),
            Err(e) => {
                warn!("Failed to save draft: {}", e);
                AsyncPhase::Rejected(e.to_string())
            }
        };
        self.dispatch(Action::SaveDraft(phase));
    }
}
