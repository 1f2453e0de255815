//! Integration tests for `DashboardApi` and script sessions against a fake
//! job API served over real HTTP.

mod common;

use assert_matches::assert_matches;
use serde_json::json;

use common::{script_json, spawn, FakeApi};
use jobdash_client::api::ApiError;
use jobdash_client::cli::{Command, OutputFormat};
use jobdash_client::commands;
use jobdash_client::config::ClientConfig;
use jobdash_core::error::CoreError;
use jobdash_core::script::ParameterType;
use jobdash_core::script_editor::{
    DeleteOutcome, EditorError, SaveOutcome, ScalarField, ScriptEditor, Surface,
};

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lists_jobs_from_data_key() {
    let mut state = FakeApi::default();
    state.jobs.push(json!({
        "ID": 3,
        "RunnerID": "r-1",
        "MsgID": "m-3",
        "Status": "done",
        "RequestPayload": "{}",
        "ResponsePayload": "ok",
        "Timeout": false,
        "created_at": "2024-03-15T10:30:00Z"
    }));
    let (api, _) = spawn(state).await;

    let jobs = api.list_jobs().await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, 3);
    assert_eq!(jobs[0].msg_id, "m-3");
}

#[tokio::test]
async fn lists_scripts_with_numeric_ids_and_legacy_params() {
    let state = FakeApi::default().with_script(json!({
        "script_id": 12,
        "file_name": "probe.sh",
        "param": ["host", "port"],
        "status": true,
        "tag": ["net"],
        "runner": []
    }));
    let (api, _) = spawn(state).await;

    let scripts = api.list_scripts().await.unwrap();
    assert_eq!(scripts[0].script_id, "12");
    assert_eq!(scripts[0].param_names(), vec!["host", "port"]);
}

#[tokio::test]
async fn runner_listing_and_suggestions_accept_data_shape() {
    let state = FakeApi {
        runners_body: json!({
            "data": [
                { "id": "r-1", "hostname": "edge-1", "ip": "10.0.0.1", "tags": "gpu, linux" },
                { "id": 7, "hostname": "edge-2", "ip": "10.0.0.2", "tags": "" }
            ]
        }),
        ..Default::default()
    };
    let (api, _) = spawn(state).await;

    let runners = api.list_runners().await.unwrap();
    assert_eq!(runners.len(), 2);
    assert_eq!(runners[0].tag_list(), vec!["gpu", "linux"]);
    assert_eq!(runners[1].id, "7");

    let suggestions = api.runner_suggestions().await.unwrap();
    let names: Vec<&str> = suggestions.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["r-1", "7"]);
    assert_eq!(suggestions[0].hostname.as_deref(), Some("edge-1"));
}

#[tokio::test]
async fn runner_suggestions_from_bare_name_array() {
    let state = FakeApi {
        runners_body: json!(["edge-1", "edge-2"]),
        ..Default::default()
    };
    let (api, _) = spawn(state).await;

    let suggestions = api.runner_suggestions().await.unwrap();
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[1].name, "edge-2");
}

#[tokio::test]
async fn logs_fall_back_to_samples_on_server_error() {
    let state = FakeApi {
        logs_status: Some(500),
        ..Default::default()
    };
    let (api, _) = spawn(state).await;

    let listing = api.list_logs_or_sample(true).await.unwrap();
    assert_eq!(listing.logs.len(), 3);
    assert_eq!(listing.sample_reason.as_deref(), Some("HTTP error! status: 500"));

    let err = api.list_logs_or_sample(false).await.unwrap_err();
    assert_matches!(err, ApiError::Http { status: 500, .. });
}

#[tokio::test]
async fn logs_are_returned_when_available() {
    let state = FakeApi {
        logs: vec![json!({ "msg_id": "m-1", "runner_id": "r-1", "logs": "a\nb", "status": "success" })],
        ..Default::default()
    };
    let (api, _) = spawn(state).await;

    let listing = api.list_logs_or_sample(true).await.unwrap();
    assert!(listing.sample_reason.is_none());
    assert_eq!(listing.logs[0].logs.lines().count(), 2);
}

// ---------------------------------------------------------------------------
// Script detail and writes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn script_detail_uses_response_parameters() {
    let state = FakeApi::default()
        .with_script(script_json("5", "deploy.sh"))
        .with_parameters(
            "5",
            vec![json!({ "name": "version", "type": "number", "required": true, "description": "Build" })],
        );
    let (api, _) = spawn(state).await;

    let detail = api.get_script("5").await.unwrap();
    assert_eq!(detail.script.file_name, "deploy.sh");
    assert_eq!(detail.parameters[0].kind, ParameterType::Number);
    assert!(detail.parameters[0].required);
}

#[tokio::test]
async fn missing_script_is_not_found() {
    let (api, _) = spawn(FakeApi::default()).await;

    let err = api.get_script("404").await.unwrap_err();
    assert_matches!(err, ApiError::NotFound { ref script_id } if script_id == "404");
}

#[tokio::test]
async fn write_failure_reports_status_and_body() {
    let state = FakeApi {
        write_status: Some(503),
        ..Default::default()
    }
    .with_script(script_json("5", "deploy.sh"));
    let (api, _) = spawn(state).await;

    let err = api.delete_script("5").await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP error! status: 503");
    assert_matches!(err, ApiError::Http { status: 503, ref body } if body.contains("Service Unavailable"));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let api = jobdash_client::api::DashboardApi::new(
        &ClientConfig::default().with_base_url("http://127.0.0.1:1"),
    )
    .unwrap();

    let err = api.list_jobs().await.unwrap_err();
    assert_matches!(CoreError::from(err), CoreError::Network(_));
}

// ---------------------------------------------------------------------------
// Script sessions over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn edit_session_saves_and_refreshes() {
    let state = FakeApi::default().with_script(json!({
        "script_id": "9",
        "file_name": "backup.sh",
        "description": "nightly",
        "param": ["target"],
        "status": true,
        "tag": ["db"],
        "runner": ["edge-1"]
    }));
    let (api, shared) = spawn(state).await;

    let mut editor = ScriptEditor::for_script("9");
    editor.load(&api).await.unwrap();
    editor.begin_edit().unwrap();
    {
        let draft = editor.working_mut().unwrap();
        draft.set_field(ScalarField::Description("  weekly  ".into()));
        draft.tags().add(" archive ".into());
        draft.runners().add_blank();
    }

    let outcome = editor.save(&api).await.unwrap();
    assert_eq!(outcome, SaveOutcome::Saved { refreshed: true });
    assert!(!editor.is_editing());

    let guard = shared.lock().unwrap();
    assert_eq!(
        guard.last_body,
        Some(json!({
            "file_name": "backup.sh",
            "description": "weekly",
            "status": true,
            "param": ["target"],
            "tag": ["db", "archive"],
            "runner": ["edge-1"]
        }))
    );
    assert_eq!(
        guard.requests,
        vec!["GET /scripts/9", "PUT /scripts/9", "GET /scripts/9"]
    );
    drop(guard);

    let script = editor.script().unwrap();
    assert_eq!(script.description, "weekly");
    assert_eq!(script.tag, vec!["db", "archive"]);
}

#[tokio::test]
async fn failed_save_keeps_draft_for_retry() {
    let state = FakeApi {
        write_status: Some(500),
        ..Default::default()
    }
    .with_script(script_json("9", "backup.sh"));
    let (api, shared) = spawn(state).await;

    let mut editor = ScriptEditor::for_script("9");
    editor.load(&api).await.unwrap();
    editor.begin_edit().unwrap();
    editor.working_mut().unwrap().tags().add("x".into());

    let err = editor.save(&api).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to save script: HTTP error! status: 500");
    assert_eq!(err.surface(), Surface::Inline);
    assert!(editor.has_unsaved_changes());

    shared.lock().unwrap().write_status = None;
    assert_eq!(
        editor.save(&api).await.unwrap(),
        SaveOutcome::Saved { refreshed: true }
    );
    assert_eq!(shared.lock().unwrap().requests_matching("PUT "), 2);
}

#[tokio::test]
async fn delete_session_confirms_then_ends() {
    let state = FakeApi::default().with_script(script_json("4", "cleanup.sh"));
    let (api, shared) = spawn(state).await;

    let mut editor = ScriptEditor::for_script("4");
    editor.load(&api).await.unwrap();

    let declined = editor.delete(&api, |_| false).await.unwrap();
    assert_eq!(declined, DeleteOutcome::Declined);
    assert_eq!(shared.lock().unwrap().requests_matching("DELETE "), 0);

    let mut prompt = String::new();
    let deleted = editor
        .delete(&api, |msg| {
            prompt = msg.to_string();
            true
        })
        .await
        .unwrap();
    assert_eq!(deleted, DeleteOutcome::Deleted);
    assert!(prompt.contains("\"cleanup.sh\""));
    assert!(shared.lock().unwrap().scripts.is_empty());
    assert_matches!(editor.begin_edit(), Err(EditorError::Ended));
}

#[tokio::test]
async fn load_of_missing_script_is_blocking_not_found() {
    let (api, _) = spawn(FakeApi::default()).await;

    let mut editor = ScriptEditor::for_script("77");
    let err = editor.load(&api).await.unwrap_err();
    assert_matches!(err, EditorError::NotFound(ref id) if id == "77");
    assert_eq!(err.surface(), Surface::Blocking);
}

// ---------------------------------------------------------------------------
// CLI commands
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_command_posts_validated_payload() {
    let (api, shared) = spawn(FakeApi::default()).await;
    let cli = <jobdash_client::cli::Cli as clap::Parser>::try_parse_from([
        "jobdash",
        "create",
        "--file-name",
        " report.sh ",
        "--param",
        "day:number:required",
        "--tag",
        "daily",
        "--runner",
        "edge-1",
        "--runner",
        "edge-1",
        "--inactive",
    ])
    .unwrap();

    let mut out = Vec::new();
    commands::run(&api, &ClientConfig::default(), cli.command, OutputFormat::Table, &mut out, |_| true)
        .await
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Script created."));
    assert!(text.contains("new-1"));
    assert_eq!(
        shared.lock().unwrap().last_body,
        Some(json!({
            "file_name": "report.sh",
            "description": "",
            "status": false,
            "param": ["day"],
            "tag": ["daily"],
            "runner": ["edge-1"]
        }))
    );
}

#[tokio::test]
async fn edit_dry_run_sends_nothing() {
    let state = FakeApi::default().with_script(script_json("2", "a.sh"));
    let (api, shared) = spawn(state).await;
    let cli = <jobdash_client::cli::Cli as clap::Parser>::try_parse_from([
        "jobdash", "edit", "2", "--add-tag", "new", "--dry-run",
    ])
    .unwrap();

    let mut out = Vec::new();
    commands::run(&api, &ClientConfig::default(), cli.command, OutputFormat::Table, &mut out, |_| true)
        .await
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Changed: tags"));
    assert!(text.contains("\"new\""));
    assert_eq!(shared.lock().unwrap().requests, vec!["GET /scripts/2"]);
}

#[tokio::test]
async fn delete_command_respects_declined_prompt() {
    let state = FakeApi::default().with_script(script_json("2", "a.sh"));
    let (api, shared) = spawn(state).await;
    let command = Command::Delete {
        script_id: "2".into(),
        yes: false,
    };

    let mut out = Vec::new();
    commands::run(&api, &ClientConfig::default(), command, OutputFormat::Table, &mut out, |_| false)
        .await
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "Delete cancelled.\n");
    assert_eq!(shared.lock().unwrap().requests_matching("DELETE "), 0);
}

#[tokio::test]
async fn edit_with_json_output_prints_one_json_document() {
    let state = FakeApi::default().with_script(script_json("2", "a.sh"));
    let (api, shared) = spawn(state).await;
    let cli = <jobdash_client::cli::Cli as clap::Parser>::try_parse_from([
        "jobdash", "edit", "2", "--add-tag", "new", "-o", "json",
    ])
    .unwrap();

    let mut out = Vec::new();
    commands::run(&api, &ClientConfig::default(), cli.command, cli.output, &mut out, |_| true)
        .await
        .unwrap();

    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["outcome"], "updated");
    assert_eq!(report["changed"], json!(["tags"]));
    assert_eq!(report["script"]["tag"], json!(["new"]));
    assert_eq!(shared.lock().unwrap().requests_matching("PUT "), 1);
}
