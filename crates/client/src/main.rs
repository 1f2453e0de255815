//! `jobdash` -- operator console for the job execution API.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                 | Description                        |
//! |------------------------|----------|-------------------------|------------------------------------|
//! | `API_BASE_URL`         | no       | `http://localhost:5000` | Job API base URL                   |
//! | `REQUEST_TIMEOUT_SECS` | no       | `30`                    | Per-request timeout                |
//! | `SAMPLE_LOGS_FALLBACK` | no       | `true`                  | Show sample logs when fetch fails  |
//! | `RUST_LOG`             | no       | `jobdash=info,...`      | Log filter                         |

use std::io::{BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobdash_client::api::DashboardApi;
use jobdash_client::cli::Cli;
use jobdash_client::commands::{self, CliError};
use jobdash_client::config::ClientConfig;
use jobdash_client::render;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "jobdash=info,jobdash_client=info,jobdash_core=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("{}", render::notice(e.surface(), &e.to_string()));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }

    tracing::debug!(base_url = %config.base_url, "Using job API");

    let api = DashboardApi::new(&config)?;
    let mut stdout = std::io::stdout().lock();
    commands::run(&api, &config, cli.command, cli.output, &mut stdout, confirm_on_stdin).await
}

/// Ask a yes/no question on the terminal. Anything but `y`/`yes` declines.
fn confirm_on_stdin(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = std::io::stderr().flush();

    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
