//! The working copy of a script's editable fields.

use crate::script::{Parameter, ScriptDetail};
use crate::script_editor::list_editor::ListEditor;

/// A single scalar field update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarField {
    FileName(String),
    Description(String),
    Status(bool),
}

/// Editable copy of a script's mutable fields.
///
/// A draft owns all of its lists, so edits never reach the fetched
/// [`ScriptDetail`] it was built from (and a later refetch never reaches
/// the draft).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDraft {
    file_name: String,
    description: String,
    status: bool,
    parameters: Vec<Parameter>,
    tags: Vec<String>,
    runners: Vec<String>,
}

impl ScriptDraft {
    /// Empty draft for the create form. New scripts start active.
    pub fn blank() -> Self {
        Self {
            file_name: String::new(),
            description: String::new(),
            status: true,
            parameters: Vec::new(),
            tags: Vec::new(),
            runners: Vec::new(),
        }
    }

    /// Build a draft from a fetched script.
    pub fn from_detail(detail: &ScriptDetail) -> Self {
        Self {
            file_name: detail.script.file_name.clone(),
            description: detail.script.description.clone(),
            status: detail.script.status,
            parameters: detail.parameters.clone(),
            tags: detail.script.tag.clone(),
            runners: detail.script.runner.clone(),
        }
    }

    pub fn set_field(&mut self, value: ScalarField) {
        match value {
            ScalarField::FileName(v) => self.file_name = v,
            ScalarField::Description(v) => self.description = v,
            ScalarField::Status(v) => self.status = v,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> bool {
        self.status
    }

    pub fn parameter_list(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn tag_list(&self) -> &[String] {
        &self.tags
    }

    pub fn runner_list(&self) -> &[String] {
        &self.runners
    }

    pub fn parameters(&mut self) -> ListEditor<'_, Parameter> {
        ListEditor::new(&mut self.parameters)
    }

    pub fn tags(&mut self) -> ListEditor<'_, String> {
        ListEditor::new(&mut self.tags)
    }

    pub fn runners(&mut self) -> ListEditor<'_, String> {
        ListEditor::new(&mut self.runners)
    }

    /// Assign a runner picked from the suggestion list.
    ///
    /// Unlike the plain list editors this refuses empty names and names
    /// already assigned. Returns whether the runner was added.
    pub fn add_runner_from_suggestion(&mut self, name: &str) -> bool {
        if name.is_empty() || self.runners.iter().any(|r| r == name) {
            return false;
        }
        self.runners.push(name.to_string());
        true
    }
}
