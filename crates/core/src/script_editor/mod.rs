//! Script edit/create reconciler.
//!
//! Builds a working draft from a fetched script, edits its scalar fields
//! and lists, validates and normalizes it into a [`ScriptPayload`], detects
//! unsaved changes, and submits through a single-slot gate. Nothing in here
//! touches the network directly; requests go through
//! [`ScriptBackend`](crate::backend::ScriptBackend).
//!
//! [`ScriptPayload`]: crate::script::ScriptPayload

pub mod changes;
pub mod draft;
pub mod list_editor;
pub mod session;
pub mod validator;

pub use changes::{changed_fields, has_unsaved_changes, DraftField};
pub use draft::{ScalarField, ScriptDraft};
pub use list_editor::{ListEditor, ParameterField};
pub use session::{
    CancelOutcome, DeleteOutcome, EditorError, EditorMode, PendingSave, SaveOutcome, SaveTarget,
    ScriptEditor, SubmitPhase, Surface,
};
pub use validator::{validate, ValidationError};
