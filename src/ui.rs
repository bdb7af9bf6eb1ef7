// Terminal output and prompts: the sync progress bar, response printing and
// the interactive token prompt used when no token was configured.

use std::io::IsTerminal;
use std::path::Path;

use anyhow::Result;
use dialoguer::{Confirm, Password};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use crate::config::save_token;
use crate::sync::SyncReport;

/// Progress bar for the thumbnail loop. Its length is set once the asset
/// count is known.
pub fn sync_progress() -> ProgressBar {
    let bar = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} assets [{elapsed_precise}]")
    {
        bar.set_style(style);
    }
    bar
}

pub fn print_sync_report(report: &SyncReport) {
    println!(
        "Synced {} assets ({} thumbnails downloaded, {} cached, {} without thumbnail) -> {}",
        report.assets,
        report.downloaded,
        report.cached,
        report.without_thumbnail,
        report.snapshot.display()
    );
}

/// Pretty-print the service response as-is.
pub fn print_response(response: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}

/// Ask for a token when none was given by flag, environment or saved file.
/// Returns `None` without prompting when stdin is not a terminal.
pub fn prompt_token(token_file: Option<&Path>) -> Result<Option<String>> {
    if !std::io::stdin().is_terminal() {
        return Ok(None);
    }
    // `Password` hides input in terminal.
    let token: String = Password::new().with_prompt("CloudLabel token").interact()?;
    if token.is_empty() {
        return Ok(None);
    }
    if let Some(path) = token_file {
        let save = Confirm::new()
            .with_prompt(format!("Save token to {}?", path.display()))
            .default(false)
            .interact()?;
        if save {
            save_token(path, &token)?;
        }
    }
    Ok(Some(token))
}
