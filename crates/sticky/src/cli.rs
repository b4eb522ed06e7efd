use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sticky-comment",
    version,
    about = "Post or update a single status comment on a pull request"
)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a TOML config file
    #[arg(long, env = "STICKY_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// GitHub token (overrides the github-token input and GITHUB_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// Repository holding the pull request (overrides GITHUB_REPOSITORY)
    #[arg(long, value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// Pull request or issue number (defaults to the one in the triggering event)
    #[arg(long, short = 'n')]
    pub number: Option<u64>,

    /// Revision shown in the comment (overrides GITHUB_SHA)
    #[arg(long)]
    pub sha: Option<String>,

    /// GitHub REST API base URL (overrides GITHUB_API_URL)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Account id whose comment is updated in place
    #[arg(long, value_name = "ID")]
    pub identity: Option<u64>,

    /// Look up the managed comment and report what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}
