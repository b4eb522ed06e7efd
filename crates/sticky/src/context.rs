//! Triggering event context
//!
//! GitHub Actions writes the webhook payload of the triggering event to the file
//! named by `GITHUB_EVENT_PATH`. Only the discussion number is read from it.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub issue: Option<NumberedItem>,
    #[serde(default)]
    pub pull_request: Option<NumberedItem>,
    #[serde(default)]
    pub number: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct NumberedItem {
    pub number: u64,
}

impl EventPayload {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event payload: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse event payload: {}", path.display()))
    }

    /// Issue number first, then pull request, then the top-level `number`
    pub fn discussion_number(&self) -> Option<u64> {
        self.issue
            .as_ref()
            .or(self.pull_request.as_ref())
            .map(|item| item.number)
            .or(self.number)
    }
}

/// Resolve the discussion number from the event payload file
pub fn number_from_event(event_path: Option<&Path>) -> Result<u64> {
    let path = event_path.ok_or_else(|| {
        anyhow!("Pull request number not configured. Pass --number or run from a pull_request or issues event")
    })?;

    EventPayload::load(path)?.discussion_number().ok_or_else(|| {
        anyhow!(
            "Event payload {} has no issue or pull request number. Pass --number",
            path.display()
        )
    })
}
