//! GitHub Actions reporting: step outputs and workflow commands
//!
//! Outputs are appended to the file named by `GITHUB_OUTPUT`. Failures are
//! printed as an `::error::` workflow command so the runner annotates the job.

use anyhow::{bail, Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

/// Prefix of every reported failure
pub const FAILURE_PREFIX: &str = "Action failed with error: ";

/// Step outputs destination
pub struct StepOutputs {
    path: Option<PathBuf>,
}

impl StepOutputs {
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os(OUTPUT_FILE_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Record `name=value`. Without an output file the value is only logged.
    /// Values must be single-line.
    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        match &self.path {
            Some(path) => append_output(path, name, value),
            None => {
                debug!(name, value, "no {} file, output not recorded", OUTPUT_FILE_ENV);
                Ok(())
            }
        }
    }
}

fn append_output(path: &Path, name: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        bail!("Step output '{}' must be a single line", name);
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open step output file: {}", path.display()))?;

    writeln!(file, "{name}={value}")
        .with_context(|| format!("Failed to write step output file: {}", path.display()))
}

/// Escape a message for use as workflow command data
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// The `::error::` command for a failure message
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Mark the job failed. The caller sets the non-zero exit status.
pub fn set_failed(message: &str) {
    println!("{}", error_command(message));
}

/// Whether the runner has step debug logging enabled
pub fn runner_debug() -> bool {
    std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1")
}
