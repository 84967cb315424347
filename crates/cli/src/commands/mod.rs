pub mod build;
pub mod init;
pub mod preview;
pub mod validate;

use anyhow::{Context, Result};
use gatefold_core::{Release, parse_release_toml};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "gatefold.toml";

/// Load gatefold.toml from a release directory
pub fn load_release(path: &Path) -> Result<Release> {
    if !path.exists() {
        anyhow::bail!(
            "Release directory does not exist: {}\nRun 'gatefold init {}' first",
            path.display(),
            path.display()
        );
    }

    let config_path = path.join(CONFIG_FILE);
    if !config_path.exists() {
        anyhow::bail!(
            "{} not found in {}\nRun 'gatefold init {}' first",
            CONFIG_FILE,
            path.display(),
            path.display()
        );
    }

    parse_release_toml(&config_path).with_context(|| format!("Failed to parse {}", CONFIG_FILE))
}

/// Read the liner notes markdown, if the release has any
pub fn read_liner_notes(path: &Path, release: &Release) -> Result<Option<String>> {
    let Some(notes) = &release.metadata.liner_notes else {
        return Ok(None);
    };
    let notes_path = path.join(notes);
    let markdown = fs::read_to_string(&notes_path)
        .with_context(|| format!("Failed to read liner notes {}", notes_path.display()))?;
    Ok(Some(markdown))
}
