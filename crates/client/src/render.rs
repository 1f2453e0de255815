//! Plain-text rendering for listings, script details, and notices.
//!
//! Every function returns a `String` so output can be asserted on directly.

use std::fmt::Write;

use jobdash_core::listing::{format_timestamp, Job, LogEntry, Runner};
use jobdash_core::runner_info::RunnerInfo;
use jobdash_core::script::{status_label, Script, ScriptDetail};
use jobdash_core::script_editor::{DraftField, Surface};

/// Payloads longer than this are cut in the jobs table.
const PAYLOAD_PREVIEW_CHARS: usize = 40;

pub fn jobs_table(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return "No jobs found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<34} {:<10} {:<8} {:<20} REQUEST",
        "ID", "RUNNER", "STATUS", "TIMEOUT", "CREATED"
    );
    let _ = writeln!(out, "{}", "-".repeat(110));
    for job in jobs {
        let _ = writeln!(
            out,
            "{:<6} {:<34} {:<10} {:<8} {:<20} {}",
            job.id,
            job.runner_id,
            job.status,
            if job.timeout { "yes" } else { "no" },
            format_timestamp(&job.created_at),
            preview(&job.request_payload),
        );
    }
    out
}

pub fn runners_table(runners: &[Runner]) -> String {
    if runners.is_empty() {
        return "No runners found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<34} {:<24} {:<16} TAGS", "ID", "HOSTNAME", "IP");
    let _ = writeln!(out, "{}", "-".repeat(90));
    for runner in runners {
        let _ = writeln!(
            out,
            "{:<34} {:<24} {:<16} {}",
            runner.id,
            runner.hostname,
            runner.ip,
            runner.tag_list().join(", "),
        );
    }
    out
}

pub fn runner_suggestions(runners: &[RunnerInfo]) -> String {
    if runners.is_empty() {
        return "No runner suggestions available.\n".to_string();
    }

    let mut out = String::new();
    for runner in runners {
        match &runner.hostname {
            Some(host) => {
                let _ = writeln!(out, "{} ({host})", runner.name);
            }
            None => {
                let _ = writeln!(out, "{}", runner.name);
            }
        }
    }
    out
}

pub fn scripts_table(scripts: &[Script]) -> String {
    if scripts.is_empty() {
        return "No scripts found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<28} {:<9} {:<24} {:<24} PARAMS",
        "ID", "FILE", "STATUS", "TAGS", "RUNNERS"
    );
    let _ = writeln!(out, "{}", "-".repeat(110));
    for script in scripts {
        let _ = writeln!(
            out,
            "{:<8} {:<28} {:<9} {:<24} {:<24} {}",
            script.script_id,
            script.file_name,
            status_label(script.status),
            script.tag.join(", "),
            script.runner.join(", "),
            script.param_names().join(", "),
        );
    }
    out
}

/// Log records, newest first as returned, with output lines indented.
pub fn logs_text(logs: &[LogEntry], sample_reason: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(reason) = sample_reason {
        let _ = writeln!(out, "Showing sample logs ({reason})");
        let _ = writeln!(out);
    }
    if logs.is_empty() {
        out.push_str("No logs found.\n");
        return out;
    }

    for entry in logs {
        let _ = writeln!(out, "{} [{}] runner {}", entry.msg_id, entry.status, entry.runner_id);
        let _ = writeln!(
            out,
            "  {} -> {}",
            format_timestamp(&entry.created_at),
            format_timestamp(&entry.updated_at)
        );
        if !entry.message.is_empty() {
            let _ = writeln!(out, "  {}", entry.message);
        }
        for line in entry.logs.lines() {
            let _ = writeln!(out, "    {line}");
        }
        let _ = writeln!(out);
    }
    out
}

pub fn script_detail(detail: &ScriptDetail) -> String {
    let script = &detail.script;
    let mut out = String::new();
    let _ = writeln!(out, "Script ID:   {}", script.script_id);
    let _ = writeln!(out, "File:        {}", script.file_name);
    let _ = writeln!(out, "Status:      {}", status_label(script.status));
    if !script.description.is_empty() {
        let _ = writeln!(out, "Description: {}", script.description);
    }
    let _ = writeln!(out, "Tags:        {}", dash_if_empty(&script.tag.join(", ")));
    let _ = writeln!(out, "Runners:     {}", dash_if_empty(&script.runner.join(", ")));
    if !script.created_at.is_empty() {
        let _ = writeln!(out, "Created:     {}", format_timestamp(&script.created_at));
    }
    if !script.updated_at.is_empty() {
        let _ = writeln!(out, "Updated:     {}", format_timestamp(&script.updated_at));
    }

    let _ = writeln!(out);
    if detail.parameters.is_empty() {
        out.push_str("Parameters:  none\n");
        return out;
    }
    let _ = writeln!(out, "Parameters:");
    let _ = writeln!(out, "  {:<20} {:<8} {:<9} DESCRIPTION", "NAME", "TYPE", "REQUIRED");
    for param in &detail.parameters {
        let _ = writeln!(
            out,
            "  {:<20} {:<8} {:<9} {}",
            param.name,
            param.kind,
            if param.required { "yes" } else { "no" },
            param.description,
        );
    }
    out
}

pub fn changed_fields(fields: &[DraftField]) -> String {
    if fields.is_empty() {
        return "No changes.".to_string();
    }
    let names: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
    format!("Changed: {}", names.join(", "))
}

/// Render an error message for its surface. Blocking notices are framed so
/// they stand apart from regular output.
pub fn notice(surface: Surface, message: &str) -> String {
    match surface {
        Surface::Inline => format!("error: {message}\n"),
        Surface::Blocking => {
            let rule = "=".repeat(message.chars().count().max(20));
            format!("{rule}\n{message}\n{rule}\n")
        }
    }
}

fn preview(payload: &str) -> String {
    if payload.chars().count() <= PAYLOAD_PREVIEW_CHARS {
        return payload.to_string();
    }
    let cut: String = payload.chars().take(PAYLOAD_PREVIEW_CHARS).collect();
    format!("{cut}...")
}

fn dash_if_empty(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
