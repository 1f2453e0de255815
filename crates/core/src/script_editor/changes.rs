//! Unsaved-change detection between a draft and the last server copy.
//!
//! Comparison is order-sensitive: reordering a list counts as a change.

use serde::Serialize;

use crate::script_editor::draft::ScriptDraft;

/// A draft field that can differ from the server copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    FileName,
    Description,
    Status,
    Parameters,
    Tags,
    Runners,
}

impl DraftField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FileName => "file_name",
            Self::Description => "description",
            Self::Status => "status",
            Self::Parameters => "parameters",
            Self::Tags => "tags",
            Self::Runners => "runners",
        }
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields whose draft value differs from the baseline, in form order.
pub fn changed_fields(working: &ScriptDraft, baseline: &ScriptDraft) -> Vec<DraftField> {
    let checks = [
        (DraftField::FileName, working.file_name() != baseline.file_name()),
        (DraftField::Description, working.description() != baseline.description()),
        (DraftField::Status, working.status() != baseline.status()),
        (DraftField::Parameters, working.parameter_list() != baseline.parameter_list()),
        (DraftField::Tags, working.tag_list() != baseline.tag_list()),
        (DraftField::Runners, working.runner_list() != baseline.runner_list()),
    ];

    checks
        .into_iter()
        .filter_map(|(field, differs)| differs.then_some(field))
        .collect()
}

/// Whether discarding `working` would lose edits.
pub fn has_unsaved_changes(working: &ScriptDraft, baseline: &ScriptDraft) -> bool {
    working != baseline
}
