use crate::error::{Error, Result};
use crate::types::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Longest allowed pause before the idle label returns after a track ends
const MAX_RESTORE_DELAY_MS: u32 = 10_000;

/// Raw TOML configuration structure
/// This matches the gatefold.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    release: RawReleaseMetadata,
    #[serde(default)]
    artwork: RawArtwork,
    #[serde(default)]
    player: PlayerConfig,
    #[serde(default)]
    track: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
struct RawReleaseMetadata {
    title: String,
    artist: String,
    release_date: Option<String>, // Parse as NaiveDate
    summary: Option<String>,
    liner_notes: Option<String>, // Convert to PathBuf
}

#[derive(Debug, Default, Deserialize)]
struct RawArtwork {
    cover: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    file: String, // Convert to PathBuf
    title: String,
    label: Option<String>,
    id: Option<String>,
    duration: Option<String>, // Parse as Duration (format: "MM:SS")
}

/// Parse gatefold.toml from a file path
pub fn parse_release_toml<P: AsRef<Path>>(path: P) -> Result<Release> {
    let content = fs::read_to_string(path)?;
    parse_release_toml_str(&content)
}

/// Parse gatefold.toml from a string (useful for testing)
pub fn parse_release_toml_str(content: &str) -> Result<Release> {
    let raw: RawConfig = toml::from_str(content)?;

    let release_date = raw
        .release
        .release_date
        .as_deref()
        .map(|date| {
            chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|e| Error::ConfigParse(format!("Invalid release_date: {}", e)))
        })
        .transpose()?;

    let liner_notes = raw
        .release
        .liner_notes
        .as_deref()
        .map(|notes| validate_path(notes, "release.liner_notes"))
        .transpose()?;

    let metadata = ReleaseMetadata {
        title: raw.release.title,
        artist: raw.release.artist,
        release_date,
        summary: raw.release.summary,
        liner_notes,
    };

    let artwork = Artwork {
        cover: raw
            .artwork
            .cover
            .as_deref()
            .map(|cover| validate_path(cover, "artwork.cover"))
            .transpose()?,
    };

    validate_player(&raw.player)?;

    let tracks = raw
        .track
        .into_iter()
        .map(|t| {
            let duration = t.duration.as_deref().map(parse_duration).transpose()?;
            let file = validate_path(&t.file, "track.file")?;
            let label = t
                .label
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| t.title.clone());
            let id = t
                .id
                .filter(|i| !i.trim().is_empty())
                .unwrap_or_else(|| slug(&t.title));

            Ok(Track {
                file,
                title: t.title,
                label,
                id,
                duration,
            })
        })
        .collect::<Result<Vec<Track>>>()?;

    ensure_unique_ids(&tracks)?;

    Ok(Release {
        metadata,
        artwork,
        player: raw.player,
        tracks,
    })
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths, parent directory references (`..`) and empty
/// paths so a gatefold.toml cannot point outside its release directory.
///
/// # Examples
///
/// ```text
/// validate_path("audio/track.flac", "file")  → Ok(PathBuf)
/// validate_path("/etc/passwd", "file")  → Err("Absolute paths not allowed...")
/// validate_path("../../../etc/passwd", "file")  → Err("Parent directory references...")
/// ```
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    let path = Path::new(path_str);

    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(Error::ConfigParse(format!(
                "Parent directory references (..) not allowed in '{}': '{}'",
                field_name, path_str
            )));
        }
    }

    Ok(path.to_path_buf())
}

fn validate_player(player: &PlayerConfig) -> Result<()> {
    if player.restore_delay_ms > MAX_RESTORE_DELAY_MS {
        return Err(Error::InvalidData(format!(
            "player.restore_delay_ms must be at most {} (got {})",
            MAX_RESTORE_DELAY_MS, player.restore_delay_ms
        )));
    }

    for (name, selector) in player.selectors.entries() {
        if selector.trim().is_empty() {
            return Err(Error::InvalidData(format!(
                "Empty selector in 'player.selectors.{}'",
                name
            )));
        }
    }

    Ok(())
}

/// Two tracks sharing an id would make a click on one toggle the other.
fn ensure_unique_ids(tracks: &[Track]) -> Result<()> {
    let mut seen = HashSet::new();
    for track in tracks {
        if !seen.insert(track.id.as_str()) {
            return Err(Error::InvalidData(format!(
                "Duplicate track id '{}' (track '{}'); set a distinct `id`",
                track.id, track.title
            )));
        }
    }
    Ok(())
}

/// Parse duration string in format "MM:SS" or "M:SS"
fn parse_duration(s: &str) -> Result<std::time::Duration> {
    let (minutes, seconds) = s.split_once(':').ok_or_else(|| {
        Error::ConfigParse(format!("Invalid duration format '{}', expected MM:SS", s))
    })?;

    let minutes: u64 = minutes
        .parse()
        .map_err(|_| Error::ConfigParse(format!("Invalid minutes in duration '{}'", s)))?;

    let seconds: u64 = seconds
        .parse()
        .map_err(|_| Error::ConfigParse(format!("Invalid seconds in duration '{}'", s)))?;

    if seconds >= 60 {
        return Err(Error::ConfigParse(format!(
            "Seconds must be < 60 in duration '{}'",
            s
        )));
    }

    Ok(std::time::Duration::from_secs(minutes * 60 + seconds))
}
