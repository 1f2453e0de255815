//! Command execution for the `jobdash` binary.
//!
//! Listings go straight to [`DashboardApi`]. Script create/edit/delete run
//! through a [`ScriptEditor`] session so the CLI shares validation,
//! change tracking, and submit gating with any other front end.

use std::io::Write;

use serde::Serialize;

use jobdash_core::error::CoreError;
use jobdash_core::script::{Parameter, ParameterType, Script, ScriptDetail, ScriptPayload};
use jobdash_core::script_editor::{
    validate, DeleteOutcome, DraftField, EditorError, SaveOutcome, ScalarField, ScriptDraft,
    ScriptEditor, Surface,
};

use crate::api::{ApiError, DashboardApi};
use crate::cli::{Command, CreateArgs, EditArgs, OutputFormat};
use crate::config::{ClientConfig, ConfigError};
use crate::render;

/// Errors surfaced by a CLI command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("Invalid parameter '{arg}': {reason}")]
    InvalidParam { arg: String, reason: String },

    #[error("{field} '{value}' is not on this script")]
    NotAssigned { field: &'static str, value: String },

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn surface(&self) -> Surface {
        match self {
            Self::Editor(e) => e.surface(),
            _ => Surface::Inline,
        }
    }
}

/// Run one command, writing results to `out`.
///
/// `confirm` answers yes/no prompts (delete confirmation).
pub async fn run<W, C>(
    api: &DashboardApi,
    config: &ClientConfig,
    command: Command,
    format: OutputFormat,
    out: &mut W,
    mut confirm: C,
) -> Result<(), CliError>
where
    W: Write,
    C: FnMut(&str) -> bool,
{
    match command {
        Command::Jobs => {
            let jobs = api.list_jobs().await?;
            emit(out, format, &jobs, || render::jobs_table(&jobs))
        }
        Command::Runners { suggestions: false } => {
            let runners = api.list_runners().await?;
            emit(out, format, &runners, || render::runners_table(&runners))
        }
        Command::Runners { suggestions: true } => {
            let runners = api.runner_suggestions().await?;
            emit(out, format, &runners, || render::runner_suggestions(&runners))
        }
        Command::Scripts => {
            let scripts = api.list_scripts().await?;
            emit(out, format, &scripts, || render::scripts_table(&scripts))
        }
        Command::Logs { no_sample } => {
            let listing = api
                .list_logs_or_sample(config.sample_logs_fallback && !no_sample)
                .await?;
            emit(out, format, &listing.logs, || {
                render::logs_text(&listing.logs, listing.sample_reason.as_deref())
            })
        }
        Command::Show { script_id } => show(api, &script_id, format, out).await,
        Command::Create(args) => create(api, args, out).await,
        Command::Edit(args) => edit(api, args, format, out).await,
        Command::Delete { script_id, yes } => {
            let mut editor = ScriptEditor::for_script(script_id);
            editor.load(api).await?;
            let outcome = editor
                .delete(api, |prompt| yes || confirm(prompt))
                .await?;
            match outcome {
                DeleteOutcome::Deleted => writeln!(out, "Script deleted.")?,
                DeleteOutcome::Declined => writeln!(out, "Delete cancelled.")?,
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Script commands
// ---------------------------------------------------------------------------

async fn show<W: Write>(
    api: &DashboardApi,
    script_id: &str,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), CliError> {
    let mut editor = ScriptEditor::for_script(script_id);
    let detail = editor.load(api).await?;
    let body = serde_json::json!({
        "script": detail.script,
        "parameters": detail.parameters,
    });
    emit(out, format, &body, || render::script_detail(detail))
}

async fn create<W: Write>(
    api: &DashboardApi,
    args: CreateArgs,
    out: &mut W,
) -> Result<(), CliError> {
    let mut editor = ScriptEditor::for_create();
    {
        let draft = editor.working_mut()?;
        draft.set_field(ScalarField::FileName(args.file_name));
        draft.set_field(ScalarField::Description(args.description));
        draft.set_field(ScalarField::Status(!args.inactive));
        for arg in &args.params {
            draft.parameters().add(parse_param_arg(arg)?);
        }
        for tag in args.tags {
            draft.tags().add(tag);
        }
        for runner in &args.runners {
            draft.add_runner_from_suggestion(runner);
        }
    }

    let pending = editor.request_save()?;
    let (result, created) = match api.create_script(&pending.payload).await {
        Ok(body) => (Ok(()), body),
        Err(e) => (Err(CoreError::from(e)), serde_json::Value::Null),
    };
    editor.complete_save(result)?;

    writeln!(out, "Script created.")?;
    if !created.is_null() {
        writeln!(out, "{}", serde_json::to_string_pretty(&created)?)?;
    }
    Ok(())
}

async fn edit<W: Write>(
    api: &DashboardApi,
    args: EditArgs,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), CliError> {
    let mut editor = ScriptEditor::for_script(args.script_id.clone());
    editor.load(api).await?;

    if !args.add_runner.is_empty() {
        match api.runner_suggestions().await {
            Ok(runners) => editor.set_runner_suggestions(runners),
            Err(e) => tracing::warn!(error = %e, "Runner suggestions unavailable"),
        }
    }
    let known_runners: Vec<String> = editor
        .available_runners()
        .into_iter()
        .map(|r| r.name.clone())
        .collect();

    editor.begin_edit()?;
    let skipped = apply_edits(editor.working_mut()?, &args)?;
    for name in &args.add_runner {
        if !known_runners.is_empty() && !known_runners.contains(name) && !skipped.contains(name) {
            tracing::warn!(runner = %name, "Runner is not among registered runners");
        }
    }

    let mut report = EditReport {
        changed: editor.changed_fields(),
        skipped_runners: skipped,
        outcome: EditOutcome::DryRun,
        payload: None,
        script: None,
        parameters: None,
    };

    if args.dry_run {
        let draft = editor.working().ok_or(EditorError::NotEditing)?;
        report.payload = Some(validate(draft).map_err(EditorError::from)?);
        editor.request_cancel(|_| true)?;
    } else {
        report.outcome = match editor.save(api).await? {
            SaveOutcome::Saved { refreshed: true } => EditOutcome::Updated,
            SaveOutcome::Saved { refreshed: false } => EditOutcome::UpdatedNotReloaded,
            SaveOutcome::Ignored => EditOutcome::Ignored,
        };
        if report.outcome == EditOutcome::Updated {
            report.script = editor.script().cloned();
            report.parameters = Some(editor.parameters().to_vec());
        }
    }

    emit(out, format, &report, || render_edit_report(&report))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum EditOutcome {
    DryRun,
    Updated,
    UpdatedNotReloaded,
    Ignored,
}

/// Result of `jobdash edit`, printed as text or as one JSON object.
#[derive(Debug, Serialize)]
struct EditReport {
    changed: Vec<DraftField>,
    skipped_runners: Vec<String>,
    outcome: EditOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<ScriptPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    script: Option<Script>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<Vec<Parameter>>,
}

fn render_edit_report(report: &EditReport) -> String {
    let mut text = String::new();
    for name in &report.skipped_runners {
        text.push_str(&format!("Runner '{name}' is already assigned, skipped.\n"));
    }
    text.push_str(&render::changed_fields(&report.changed));
    text.push('\n');

    match report.outcome {
        EditOutcome::DryRun => {
            if let Some(payload) = &report.payload {
                text.push_str(&serde_json::to_string_pretty(payload).unwrap_or_default());
                text.push('\n');
            }
        }
        EditOutcome::Updated => {
            text.push_str("Script updated.\n");
            if let Some(script) = &report.script {
                text.push_str(&render::script_detail(&ScriptDetail {
                    script: script.clone(),
                    parameters: report.parameters.clone().unwrap_or_default(),
                }));
            }
        }
        EditOutcome::UpdatedNotReloaded => {
            text.push_str("Script updated, but reloading it failed.\n");
        }
        EditOutcome::Ignored => text.push_str("A save is already in progress.\n"),
    }
    text
}

/// Apply edit flags to the draft. Removals run before additions, each list
/// from the highest index down. Returns runner names skipped as duplicates.
fn apply_edits(draft: &mut ScriptDraft, args: &EditArgs) -> Result<Vec<String>, CliError> {
    if let Some(name) = &args.file_name {
        draft.set_field(ScalarField::FileName(name.clone()));
    }
    if let Some(description) = &args.description {
        draft.set_field(ScalarField::Description(description.clone()));
    }
    if let Some(status) = args.status {
        draft.set_field(ScalarField::Status(status));
    }

    let param_names: Vec<String> = draft.parameter_list().iter().map(|p| p.name.clone()).collect();
    for index in indices_to_remove(&param_names, &args.remove_param, "Parameter")? {
        draft.parameters().remove(index);
    }
    for index in indices_to_remove(draft.tag_list(), &args.remove_tag, "Tag")? {
        draft.tags().remove(index);
    }
    for index in indices_to_remove(draft.runner_list(), &args.remove_runner, "Runner")? {
        draft.runners().remove(index);
    }

    for arg in &args.add_param {
        draft.parameters().add(parse_param_arg(arg)?);
    }
    for tag in &args.add_tag {
        draft.tags().add(tag.clone());
    }
    let skipped = args
        .add_runner
        .iter()
        .filter(|name| !draft.add_runner_from_suggestion(name))
        .cloned()
        .collect();

    Ok(skipped)
}

/// Indices of every entry matching one of `names`, highest first.
fn indices_to_remove(
    items: &[String],
    names: &[String],
    field: &'static str,
) -> Result<Vec<usize>, CliError> {
    let mut indices = Vec::new();
    for name in names {
        let before = indices.len();
        indices.extend(
            items
                .iter()
                .enumerate()
                .filter(|(_, item)| *item == name)
                .map(|(i, _)| i),
        );
        if indices.len() == before {
            return Err(CliError::NotAssigned {
                field,
                value: name.clone(),
            });
        }
    }
    indices.sort_unstable_by(|a, b| b.cmp(a));
    indices.dedup();
    Ok(indices)
}

/// Parse `NAME[:TYPE[:required|optional]]`.
fn parse_param_arg(arg: &str) -> Result<Parameter, CliError> {
    let invalid = |reason: &str| CliError::InvalidParam {
        arg: arg.to_string(),
        reason: reason.to_string(),
    };

    let mut parts = arg.splitn(3, ':');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(invalid("name is empty"));
    }

    let kind = match parts.next().map(str::trim) {
        None | Some("") => ParameterType::String,
        Some(raw) => ParameterType::parse(raw)
            .ok_or_else(|| invalid("type must be string, number, boolean, array, or object"))?,
    };

    let required = match parts.next().map(str::trim) {
        None | Some("") | Some("optional") => false,
        Some("required") => true,
        Some(_) => return Err(invalid("expected 'required' or 'optional'")),
    };

    Ok(Parameter {
        name: name.to_string(),
        kind,
        required,
        description: String::new(),
    })
}

fn emit<W, T, F>(out: &mut W, format: OutputFormat, value: &T, table: F) -> Result<(), CliError>
where
    W: Write,
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(value)?)?,
        OutputFormat::Table => write!(out, "{}", table())?,
    }
    Ok(())
}
