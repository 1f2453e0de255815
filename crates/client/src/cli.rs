//! Command-line arguments for the `jobdash` binary.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "jobdash")]
#[command(version)]
#[command(about = "Operator console for the job execution API")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Job API base URL (overrides API_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format for listings, script details and edit reports
    #[arg(long, short = 'o', global = true, default_value = "table")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

// =============================================================================
// Commands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List dispatched jobs
    Jobs,

    /// List registered runners
    Runners {
        /// Show the names offered when assigning runners to a script
        #[arg(long)]
        suggestions: bool,
    },

    /// List scripts
    Scripts,

    /// List execution logs
    Logs {
        /// Fail instead of showing sample logs when the API is unreachable
        #[arg(long)]
        no_sample: bool,
    },

    /// Show one script with its parameters
    Show {
        /// Script ID
        script_id: String,
    },

    /// Create a new script
    Create(CreateArgs),

    /// Edit an existing script and save the result
    Edit(EditArgs),

    /// Delete a script
    Delete {
        /// Script ID
        script_id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

// =============================================================================
// Create / Edit Arguments
// =============================================================================

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Script file name
    #[arg(long)]
    pub file_name: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Parameter as NAME[:TYPE[:required]] (repeatable)
    #[arg(long = "param")]
    pub params: Vec<String>,

    /// Tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Runner name (repeatable)
    #[arg(long = "runner")]
    pub runners: Vec<String>,

    /// Create the script as inactive
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Script ID
    pub script_id: String,

    #[arg(long)]
    pub file_name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Set the active flag
    #[arg(long)]
    pub status: Option<bool>,

    /// Append a parameter as NAME[:TYPE[:required]] (repeatable)
    #[arg(long)]
    pub add_param: Vec<String>,

    /// Remove the parameter with this name (repeatable)
    #[arg(long)]
    pub remove_param: Vec<String>,

    #[arg(long)]
    pub add_tag: Vec<String>,

    #[arg(long)]
    pub remove_tag: Vec<String>,

    /// Assign a runner; duplicates are skipped (repeatable)
    #[arg(long)]
    pub add_runner: Vec<String>,

    #[arg(long)]
    pub remove_runner: Vec<String>,

    /// Validate and print the payload without saving
    #[arg(long)]
    pub dry_run: bool,
}
