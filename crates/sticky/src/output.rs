use crate::cli::OutputFormat;
use crate::report;
use colored::Colorize;
use comment_core::{Comment, DiscussionRef, Reconciled};
use serde::Serialize;

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
struct JsonOutcome<'a> {
    success: bool,
    action: &'a str,
    discussion: String,
    comment_id: Option<u64>,
    dry_run: bool,
}

pub fn output_success(outcome: &Reconciled, discussion: &DiscussionRef, format: OutputFormat) {
    let comment = outcome.comment();
    match format {
        OutputFormat::Json => print_json(&JsonOutcome {
            success: true,
            action: outcome.action(),
            discussion: discussion.to_string(),
            comment_id: Some(comment.id),
            dry_run: false,
        }),
        OutputFormat::Text => {
            let verb = match outcome {
                Reconciled::Created(_) => "Created".green().bold(),
                Reconciled::Updated(_) => "Updated".cyan().bold(),
            };
            println!(
                "{} comment {} on {}",
                verb,
                comment.id,
                discussion.to_string().bold()
            );
        }
    }
}

/// Report what a dry run would have done
pub fn output_plan(
    existing: Option<&Comment>,
    discussion: &DiscussionRef,
    body: &str,
    format: OutputFormat,
) {
    let action = if existing.is_some() { "update" } else { "create" };
    match format {
        OutputFormat::Json => print_json(&JsonOutcome {
            success: true,
            action,
            discussion: discussion.to_string(),
            comment_id: existing.map(|c| c.id),
            dry_run: true,
        }),
        OutputFormat::Text => {
            match existing {
                Some(comment) => println!(
                    "{} would update comment {} on {}",
                    "Dry run:".yellow().bold(),
                    comment.id,
                    discussion.to_string().bold()
                ),
                None => println!(
                    "{} would create a comment on {}",
                    "Dry run:".yellow().bold(),
                    discussion.to_string().bold()
                ),
            }
            println!("  {}: {}", "Body".dimmed(), body);
        }
    }
}

/// Configuration and local errors, printed to stderr
pub fn output_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: "error".to_string(),
                message: format!("{:#}", err),
            };
            serde_json::to_string_pretty(&json_err).unwrap_or_else(|_| {
                format!(r#"{{"error": true, "message": "{}"}}"#, err)
            })
        }
        OutputFormat::Text => format!("{}: {:#}", "Error".red().bold(), err),
    };
    eprintln!("{}", message);
}

/// Remote failures: the workflow error command, plus a JSON document in JSON mode
pub fn output_failure(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            eprintln!("{}", report::error_command(message));
            print_json(&JsonError {
                error: true,
                code: "failed".to_string(),
                message: message.to_string(),
            });
        }
        OutputFormat::Text => report::set_failed(message),
    }
}

fn print_json<T: Serialize>(value: &T) {
    if let Ok(json) = serde_json::to_string_pretty(value) {
        println!("{}", json);
    }
}
