/// Fixed greeting of the managed comment
pub const MESSAGE_PREFIX: &str = "Hello from actions/github-script!";

/// Shown when the run has no revision to report
pub const UNKNOWN_SHA: &str = "unknown";

/// Render the comment body for a revision
pub fn render_body(sha: Option<&str>) -> String {
    let sha = sha.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(UNKNOWN_SHA);
    format!("{} ({})", MESSAGE_PREFIX, sha)
}
