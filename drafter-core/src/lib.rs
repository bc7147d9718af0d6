pub mod applier;
pub mod config;
pub mod fetcher;
pub mod store;
pub mod util;

// Re-export the main types so callers can just use `drafter_core::SuggestionFetcher`
pub use applier::{apply_suggestion, apply_suggestion_all, apply_with, ApplyMode, StaleSuggestion};
pub use config::DrafterConfig;
pub use fetcher::{FetchState, FetcherConfig, FetcherError, SuggestionFetcher};
pub use store::{DocumentStore, DocumentState};

pub use drafter_neural::{NetworkFailure, Suggestion, SuggestionBackend, SuggestionClient};
