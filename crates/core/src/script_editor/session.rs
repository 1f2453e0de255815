//! Edit/create session for a single script.
//!
//! [`ScriptEditor`] owns the last fetched script, the change-detection
//! baseline derived from it, the working draft while in edit mode, and the
//! submit state. Saving goes through a single-slot gate:
//!
//! ```text
//! Idle -> Validating -> Submitting -> Succeeded
//!           |               |
//!           v               v
//!         Idle            Failed (draft kept, save allowed again)
//! ```
//!
//! [`ScriptEditor::save`] drives the whole cycle against a
//! [`ScriptBackend`]. Callers that dispatch the request themselves use the
//! split [`request_save`](ScriptEditor::request_save) /
//! [`complete_save`](ScriptEditor::complete_save) pair; the in-flight flag
//! set by `request_save` rejects a second save until `complete_save` runs.

use serde::Serialize;

use crate::backend::ScriptBackend;
use crate::error::CoreError;
use crate::runner_info::RunnerInfo;
use crate::script::{Parameter, Script, ScriptDetail, ScriptPayload};
use crate::script_editor::changes::{changed_fields, has_unsaved_changes, DraftField};
use crate::script_editor::draft::ScriptDraft;
use crate::script_editor::validator::{validate, ValidationError};
use crate::types::ScriptId;

/// Confirmation text shown before discarding unsaved edits.
pub const DISCARD_CHANGES_PROMPT: &str =
    "You have unsaved changes. Are you sure you want to cancel?";

/// Confirmation text shown before deleting a script.
pub fn delete_prompt(file_name: &str) -> String {
    format!("Are you sure you want to delete script \"{file_name}\"? This action cannot be undone.")
}

// ---------------------------------------------------------------------------
// State and outcomes
// ---------------------------------------------------------------------------

/// What a session saves into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    /// Edit an existing script (`PUT /scripts/{id}`).
    Update { script_id: ScriptId },
    /// Create a new script (`POST /scripts`).
    Create,
}

/// Submit coordinator state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "message", rename_all = "snake_case")]
pub enum SubmitPhase {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed(String),
}

/// Where a validated payload has to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    Update(ScriptId),
    Create,
}

/// A save that passed validation and is waiting to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    pub target: SaveTarget,
    pub payload: ScriptPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The request succeeded. For updates, `refreshed` tells whether the
    /// follow-up fetch replaced the baseline.
    Saved { refreshed: bool },
    /// Another save was still in flight; nothing was sent.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// Edits were dropped and the draft reset to the server copy.
    Discarded,
    /// The user declined the discard confirmation.
    Kept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

/// How an error should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Banner next to the form; the user keeps working.
    Inline,
    /// Modal notice that must be acknowledged.
    Blocking,
}

/// Errors from session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to load script: {0}")]
    Fetch(CoreError),

    #[error("Script not found: {0}")]
    NotFound(ScriptId),

    #[error("Failed to save script: {0}")]
    Submit(CoreError),

    #[error("Failed to delete script: {0}")]
    Delete(CoreError),

    #[error("A save is already in progress")]
    Busy,

    #[error("No save is pending")]
    NoPendingSave,

    #[error("Discard unsaved changes before reloading")]
    UnsavedChanges,

    #[error("Not in edit mode")]
    NotEditing,

    #[error("Script has not been loaded")]
    NotLoaded,

    #[error("Operation is not available when creating a script")]
    CreateMode,

    #[error("Script has been deleted")]
    Ended,
}

impl EditorError {
    /// Destructive actions and detail loads get a blocking notice;
    /// everything else is reported inline.
    pub fn surface(&self) -> Surface {
        match self {
            Self::Fetch(_) | Self::NotFound(_) | Self::Delete(_) => Surface::Blocking,
            _ => Surface::Inline,
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptEditor
// ---------------------------------------------------------------------------

/// Reconciler for one script's edit or create session.
#[derive(Debug)]
pub struct ScriptEditor {
    mode: EditorMode,
    detail: Option<ScriptDetail>,
    baseline: ScriptDraft,
    working: Option<ScriptDraft>,
    phase: SubmitPhase,
    in_flight: bool,
    ended: bool,
    runner_suggestions: Vec<RunnerInfo>,
}

impl ScriptEditor {
    /// Session for an existing script. Call [`load`](Self::load) or
    /// [`initialize`](Self::initialize) before editing.
    pub fn for_script(script_id: impl Into<ScriptId>) -> Self {
        Self::with_mode(EditorMode::Update {
            script_id: script_id.into(),
        })
    }

    /// Session for a new script. The blank draft is editable immediately.
    pub fn for_create() -> Self {
        let mut editor = Self::with_mode(EditorMode::Create);
        editor.working = Some(ScriptDraft::blank());
        editor
    }

    fn with_mode(mode: EditorMode) -> Self {
        Self {
            mode,
            detail: None,
            baseline: ScriptDraft::blank(),
            working: None,
            phase: SubmitPhase::Idle,
            in_flight: false,
            ended: false,
            runner_suggestions: Vec::new(),
        }
    }

    // ---- accessors ----

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn script_id(&self) -> Option<&str> {
        match &self.mode {
            EditorMode::Update { script_id } => Some(script_id),
            EditorMode::Create => None,
        }
    }

    pub fn script(&self) -> Option<&Script> {
        self.detail.as_ref().map(|d| &d.script)
    }

    pub fn parameters(&self) -> &[Parameter] {
        self.detail
            .as_ref()
            .map(|d| d.parameters.as_slice())
            .unwrap_or_default()
    }

    pub fn phase(&self) -> &SubmitPhase {
        &self.phase
    }

    /// Whether a save request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn is_editing(&self) -> bool {
        self.working.is_some()
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// The current draft, if in edit mode.
    pub fn working(&self) -> Option<&ScriptDraft> {
        self.working.as_ref()
    }

    /// Mutable access to the draft for field and list edits. Refused while
    /// a save is in flight.
    pub fn working_mut(&mut self) -> Result<&mut ScriptDraft, EditorError> {
        self.ensure_open()?;
        if self.in_flight {
            return Err(EditorError::Busy);
        }
        self.working.as_mut().ok_or(EditorError::NotEditing)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.working
            .as_ref()
            .is_some_and(|w| has_unsaved_changes(w, &self.baseline))
    }

    /// Fields the draft has changed relative to the server copy.
    pub fn changed_fields(&self) -> Vec<DraftField> {
        self.working
            .as_ref()
            .map(|w| changed_fields(w, &self.baseline))
            .unwrap_or_default()
    }

    // ---- runner suggestions ----

    pub fn set_runner_suggestions(&mut self, runners: Vec<RunnerInfo>) {
        self.runner_suggestions = runners;
    }

    /// Suggested runners not yet assigned in the draft.
    pub fn available_runners(&self) -> Vec<&RunnerInfo> {
        let assigned = self.working.as_ref().map(ScriptDraft::runner_list);
        self.runner_suggestions
            .iter()
            .filter(|r| !assigned.is_some_and(|list| list.contains(&r.name)))
            .collect()
    }

    // ---- lifecycle ----

    /// Adopt a fetched script as the server copy.
    ///
    /// Replaces the change-detection baseline and leaves edit mode. Refused
    /// while a save is in flight or while the draft has unsaved edits; cancel
    /// the edit first.
    pub fn initialize(&mut self, detail: ScriptDetail) -> Result<(), EditorError> {
        self.ensure_replaceable()?;
        self.adopt(detail);
        Ok(())
    }

    fn adopt(&mut self, detail: ScriptDetail) {
        self.baseline = ScriptDraft::from_detail(&detail);
        self.detail = Some(detail);
        self.working = None;
    }

    fn ensure_replaceable(&self) -> Result<(), EditorError> {
        self.ensure_open()?;
        if self.in_flight {
            return Err(EditorError::Busy);
        }
        if self.has_unsaved_changes() {
            return Err(EditorError::UnsavedChanges);
        }
        Ok(())
    }

    /// Drop the draft and any submit status. Create sessions get a fresh
    /// blank draft.
    ///
    /// Also releases the submit slot. [`save`](Self::save) is not cancel
    /// safe: if its future is dropped mid-request the session stays busy
    /// until `reset` is called.
    pub fn reset(&mut self) {
        self.in_flight = false;
        self.working = match self.mode {
            EditorMode::Update { .. } => None,
            EditorMode::Create => {
                self.baseline = ScriptDraft::blank();
                Some(ScriptDraft::blank())
            }
        };
        self.phase = SubmitPhase::Idle;
    }

    /// Fetch the script and adopt it as the server copy.
    pub async fn load<B>(&mut self, backend: &B) -> Result<&ScriptDetail, EditorError>
    where
        B: ScriptBackend + ?Sized,
    {
        self.ensure_replaceable()?;
        let script_id = match &self.mode {
            EditorMode::Update { script_id } => script_id.clone(),
            EditorMode::Create => return Err(EditorError::CreateMode),
        };

        tracing::debug!(script_id = %script_id, "Loading script");

        let detail = backend
            .fetch_script(&script_id)
            .await
            .map_err(|e| match e {
                CoreError::NotFound { .. } => EditorError::NotFound(script_id.clone()),
                other => {
                    tracing::warn!(script_id = %script_id, error = %other, "Script load failed");
                    EditorError::Fetch(other)
                }
            })?;

        self.adopt(detail);
        self.detail.as_ref().ok_or(EditorError::NotLoaded)
    }

    /// Enter edit mode with a fresh draft of the server copy.
    pub fn begin_edit(&mut self) -> Result<(), EditorError> {
        self.ensure_open()?;
        if self.working.is_some() {
            return Ok(());
        }
        let detail = self.detail.as_ref().ok_or(EditorError::NotLoaded)?;
        self.working = Some(ScriptDraft::from_detail(detail));
        self.phase = SubmitPhase::Idle;
        Ok(())
    }

    /// Leave edit mode, asking `confirm` first if the draft has edits.
    ///
    /// `confirm` is called at most once, only when there is something to
    /// lose. Cancelling while a save is in flight is refused.
    pub fn request_cancel<F>(&mut self, confirm: F) -> Result<CancelOutcome, EditorError>
    where
        F: FnOnce(&str) -> bool,
    {
        self.ensure_open()?;
        if self.in_flight {
            return Err(EditorError::Busy);
        }
        let working = self.working.as_ref().ok_or(EditorError::NotEditing)?;

        if has_unsaved_changes(working, &self.baseline) && !confirm(DISCARD_CHANGES_PROMPT) {
            return Ok(CancelOutcome::Kept);
        }

        self.reset();
        Ok(CancelOutcome::Discarded)
    }

    // ---- saving ----

    /// Validate the draft and claim the submit slot.
    ///
    /// On success the session is `Submitting` and the returned payload must
    /// be dispatched and then reported through
    /// [`complete_save`](Self::complete_save).
    pub fn request_save(&mut self) -> Result<PendingSave, EditorError> {
        self.ensure_open()?;
        if self.in_flight {
            tracing::debug!("Save ignored, previous save still in flight");
            return Err(EditorError::Busy);
        }
        let working = self.working.as_ref().ok_or(EditorError::NotEditing)?;

        self.phase = SubmitPhase::Validating;
        let payload = match validate(working) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(error = %e, "Save rejected by validation");
                self.phase = SubmitPhase::Idle;
                return Err(e.into());
            }
        };

        let target = match &self.mode {
            EditorMode::Update { script_id } => SaveTarget::Update(script_id.clone()),
            EditorMode::Create => SaveTarget::Create,
        };

        tracing::info!(
            file_name = %payload.file_name,
            changed = ?changed_fields(working, &self.baseline),
            "Submitting script",
        );

        self.in_flight = true;
        self.phase = SubmitPhase::Submitting;
        Ok(PendingSave { target, payload })
    }

    /// Record the result of a dispatched save and release the submit slot.
    ///
    /// Failure keeps the draft so the user can retry. Success on a create
    /// session resets to a blank draft; update sessions stay in edit mode
    /// until the caller refreshes via [`initialize`](Self::initialize).
    /// Without a pending [`request_save`](Self::request_save) nothing
    /// changes and [`EditorError::NoPendingSave`] is returned.
    pub fn complete_save(&mut self, result: Result<(), CoreError>) -> Result<(), EditorError> {
        if !self.in_flight {
            return Err(EditorError::NoPendingSave);
        }
        self.in_flight = false;
        match result {
            Ok(()) => {
                self.phase = SubmitPhase::Succeeded;
                if self.mode == EditorMode::Create {
                    self.baseline = ScriptDraft::blank();
                    self.working = Some(ScriptDraft::blank());
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Script save failed");
                self.phase = SubmitPhase::Failed(e.to_string());
                Err(EditorError::Submit(e))
            }
        }
    }

    /// Validate, submit, and on success refresh from the backend.
    ///
    /// Exactly one write request is issued per call that gets past
    /// validation. A call made while another save is in flight returns
    /// [`SaveOutcome::Ignored`] without touching the backend.
    pub async fn save<B>(&mut self, backend: &B) -> Result<SaveOutcome, EditorError>
    where
        B: ScriptBackend + ?Sized,
    {
        let pending = match self.request_save() {
            Ok(pending) => pending,
            Err(EditorError::Busy) => return Ok(SaveOutcome::Ignored),
            Err(e) => return Err(e),
        };

        let result = match &pending.target {
            SaveTarget::Update(script_id) => {
                backend.update_script(script_id, &pending.payload).await
            }
            SaveTarget::Create => backend.create_script(&pending.payload).await.map(|_| ()),
        };
        self.complete_save(result)?;

        let SaveTarget::Update(script_id) = pending.target else {
            return Ok(SaveOutcome::Saved { refreshed: false });
        };

        match backend.fetch_script(&script_id).await {
            Ok(detail) => {
                self.adopt(detail);
                tracing::info!(script_id = %script_id, "Script updated");
                Ok(SaveOutcome::Saved { refreshed: true })
            }
            Err(e) => {
                tracing::warn!(
                    script_id = %script_id,
                    error = %e,
                    "Script saved but refresh failed",
                );
                self.working = None;
                Ok(SaveOutcome::Saved { refreshed: false })
            }
        }
    }

    // ---- deletion ----

    /// Delete the script after a blocking confirmation.
    ///
    /// A successful delete ends the session; every later operation returns
    /// [`EditorError::Ended`].
    pub async fn delete<B, F>(&mut self, backend: &B, confirm: F) -> Result<DeleteOutcome, EditorError>
    where
        B: ScriptBackend + ?Sized,
        F: FnOnce(&str) -> bool,
    {
        self.ensure_open()?;
        if self.in_flight {
            return Err(EditorError::Busy);
        }
        let script_id = match &self.mode {
            EditorMode::Update { script_id } => script_id.clone(),
            EditorMode::Create => return Err(EditorError::CreateMode),
        };
        let file_name = self
            .script()
            .map(|s| s.file_name.clone())
            .ok_or(EditorError::NotLoaded)?;

        if !confirm(&delete_prompt(&file_name)) {
            return Ok(DeleteOutcome::Declined);
        }

        backend.delete_script(&script_id).await.map_err(|e| {
            tracing::warn!(script_id = %script_id, error = %e, "Script delete failed");
            EditorError::Delete(e)
        })?;

        tracing::info!(script_id = %script_id, file_name = %file_name, "Script deleted");
        self.ended = true;
        self.working = None;
        Ok(DeleteOutcome::Deleted)
    }

    fn ensure_open(&self) -> Result<(), EditorError> {
        if self.ended {
            Err(EditorError::Ended)
        } else {
            Ok(())
        }
    }
}
