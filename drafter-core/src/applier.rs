use drafter_neural::Suggestion;
use thiserror::Error;

/// The suggestion's `context` no longer occurs in the text it is being
/// applied to. The text was edited after the suggestion was computed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Suggestion is stale: {context:?} no longer occurs in the text")]
pub struct StaleSuggestion {
    pub context: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApplyMode {
    /// Replace the leftmost occurrence only.
    #[default]
    First,
    /// Replace every non-overlapping occurrence.
    All,
}

/// Replace the first occurrence of `suggestion.context` in `text`.
pub fn apply_suggestion(text: &str, suggestion: &Suggestion) -> Result<String, StaleSuggestion> {
    apply_with(ApplyMode::First, text, suggestion)
}

/// Replace every occurrence of `suggestion.context` in `text`.
pub fn apply_suggestion_all(
    text: &str,
    suggestion: &Suggestion,
) -> Result<String, StaleSuggestion> {
    apply_with(ApplyMode::All, text, suggestion)
}

pub fn apply_with(
    mode: ApplyMode,
    text: &str,
    suggestion: &Suggestion,
) -> Result<String, StaleSuggestion> {
    // An empty context would match at offset 0 and silently prepend.
    if !suggestion.is_applicable(text) {
        return Err(StaleSuggestion {
            context: suggestion.context.clone(),
        });
    }

    let out = match mode {
        ApplyMode::First => text.replacen(&suggestion.context, &suggestion.replacement, 1),
        ApplyMode::All => text.replace(&suggestion.context, &suggestion.replacement),
    };
    Ok(out)
}
