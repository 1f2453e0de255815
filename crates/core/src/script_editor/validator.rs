//! Pre-submit validation and payload normalization.

use crate::script::ScriptPayload;
use crate::script_editor::draft::ScriptDraft;

/// Why a draft cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File name is required")]
    MissingFileName,

    /// Only the name is checked; descriptions are optional.
    #[error("Parameter at position {index} must have a name")]
    InvalidParameter { index: usize },
}

/// Check a draft and build the request payload from it.
///
/// Empty tag and runner rows are dropped rather than rejected so a
/// half-filled form can still be saved.
pub fn validate(draft: &ScriptDraft) -> Result<ScriptPayload, ValidationError> {
    let file_name = draft.file_name().trim();
    if file_name.is_empty() {
        return Err(ValidationError::MissingFileName);
    }

    if let Some(index) = draft
        .parameter_list()
        .iter()
        .position(|p| p.name.trim().is_empty())
    {
        return Err(ValidationError::InvalidParameter { index });
    }

    Ok(ScriptPayload {
        file_name: file_name.to_string(),
        description: draft.description().trim().to_string(),
        status: draft.status(),
        param: non_empty_trimmed(draft.parameter_list().iter().map(|p| p.name.as_str())),
        tag: non_empty_trimmed(draft.tag_list().iter().map(String::as_str)),
        runner: non_empty_trimmed(draft.runner_list().iter().map(String::as_str)),
    })
}

fn non_empty_trimmed<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
