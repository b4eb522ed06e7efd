mod cli;
mod color;
mod config;
mod context;
mod logging;
mod message;
mod output;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, OutputFormat};
use comment_core::{CommentReconciler, CommentStore, ReconcileError, Reconciled};
use comment_mock::MockClient;
use config::{Config, Settings};
use github_backend::GitHubClient;
use output::{output_error, output_failure, output_plan, output_success};
use report::{StepOutputs, FAILURE_PREFIX};
use std::process::ExitCode;
use tracing::{debug, info};

/// Job failed during a remote call
const EXIT_FAILED: u8 = 1;
/// Configuration fault, raised before any remote call
const EXIT_CONFIG: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(color::init(cli.color));

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            output_error(&e, cli.format);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let store = match connect(&settings) {
        Ok(store) => store,
        Err(e) => {
            output_error(&e, cli.format);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    run(store.as_ref(), &settings, &cli)
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.merge_with_cli(cli);
    config.into_settings()
}

/// Build the comment store: the scenario mock when requested, GitHub otherwise
fn connect(settings: &Settings) -> Result<Box<dyn CommentStore>> {
    if let Some(path) = comment_mock::get_mock_file() {
        debug!(path = %path.display(), "using mock comment store");
        let client = MockClient::new(&path)
            .with_context(|| format!("Failed to load mock scenario: {}", path.display()))?;
        return Ok(Box::new(client));
    }

    debug!(api_url = %settings.api_url, "using GitHub comment store");
    Ok(Box::new(GitHubClient::with_base_url(
        &settings.api_url,
        &settings.credential,
    )))
}

fn run(store: &dyn CommentStore, settings: &Settings, cli: &Cli) -> ExitCode {
    let body = message::render_body(settings.sha.as_deref());
    let reconciler = CommentReconciler::new(store, settings.identity);
    info!(
        discussion = %settings.discussion,
        identity = settings.identity,
        dry_run = cli.dry_run,
        "reconciling managed comment"
    );

    if cli.dry_run {
        return match reconciler.locate(&settings.discussion) {
            Ok(existing) => {
                output_plan(existing.as_ref(), &settings.discussion, &body, cli.format);
                ExitCode::SUCCESS
            }
            Err(e) => report_failure(&e, cli.format),
        };
    }

    match reconciler.reconcile(&settings.discussion, &body) {
        Ok(outcome) => {
            if let Err(e) = record_outputs(&StepOutputs::from_env(), &outcome) {
                output_error(&e, cli.format);
                return ExitCode::from(EXIT_FAILED);
            }
            output_success(&outcome, &settings.discussion, cli.format);
            ExitCode::SUCCESS
        }
        Err(e) => report_failure(&e, cli.format),
    }
}

fn record_outputs(outputs: &StepOutputs, outcome: &Reconciled) -> Result<()> {
    outputs.set("results", outcome.action())?;
    outputs.set("comment-id", &outcome.comment().id.to_string())
}

fn report_failure(err: &ReconcileError, format: OutputFormat) -> ExitCode {
    output_failure(&format!("{}{}", FAILURE_PREFIX, err), format);
    ExitCode::from(EXIT_FAILED)
}
