// Release directory checks: files exist, audio decodes, artwork is usable
use gatefold_core::types::{Release, format_duration};
use lofty::prelude::*;
use lofty::probe::Probe;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

const AUDIO_EXTENSIONS: &[&str] = &["flac", "wav", "mp3", "ogg"];
/// Covers smaller than this look soft on the sleeve
const MIN_COVER_EDGE: u32 = 500;
/// Allowed difference between a configured and a probed duration
const DURATION_TOLERANCE: Duration = Duration::from_secs(2);

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check every file a release refers to, relative to `dir`.
pub fn validate_release(dir: &Path, release: &Release) -> ValidationReport {
    let mut report = ValidationReport::default();

    if release.tracks.is_empty() {
        report.warnings.push("No tracks configured".to_string());
    }

    for track in &release.tracks {
        let path = dir.join(&track.file);
        if !path.is_file() {
            report
                .errors
                .push(format!("Audio file not found: {}", track.file.display()));
            continue;
        }

        match probe_duration(&path) {
            Ok(probed) => {
                report.info.push(format!(
                    "{} ({})",
                    track.title,
                    format_duration(Some(probed))
                ));
                if let Some(configured) = track.duration
                    && configured.abs_diff(probed) > DURATION_TOLERANCE
                {
                    report.warnings.push(format!(
                        "Duration of '{}' is set to {} but the file is {}",
                        track.title,
                        format_duration(Some(configured)),
                        format_duration(Some(probed))
                    ));
                }
            }
            Err(e) => report.errors.push(format!(
                "Unreadable audio file {}: {}",
                track.file.display(),
                e
            )),
        }
    }

    if let Some(cover) = &release.artwork.cover {
        check_cover(&dir.join(cover), cover, &mut report);
    } else {
        report
            .warnings
            .push("No cover art configured; the sleeve will be blank".to_string());
    }

    if let Some(notes) = &release.metadata.liner_notes
        && !dir.join(notes).is_file()
    {
        report
            .errors
            .push(format!("Liner notes not found: {}", notes.display()));
    }

    for stray in unreferenced_audio(dir, release) {
        report.warnings.push(format!(
            "Audio file not listed in gatefold.toml: {}",
            stray.display()
        ));
    }

    tracing::debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validated release"
    );

    report
}

fn probe_duration(path: &Path) -> anyhow::Result<Duration> {
    let tagged_file = Probe::open(path)?.read()?;
    Ok(tagged_file.properties().duration())
}

fn check_cover(path: &Path, configured: &Path, report: &mut ValidationReport) {
    if !path.is_file() {
        report
            .errors
            .push(format!("Cover art not found: {}", configured.display()));
        return;
    }

    match image::image_dimensions(path) {
        Ok((width, height)) => {
            report
                .info
                .push(format!("Cover art {}x{}", width, height));
            if width != height {
                report.warnings.push(format!(
                    "Cover art is {}x{}; square artwork fits the sleeve best",
                    width, height
                ));
            }
            if width.min(height) < MIN_COVER_EDGE {
                report.warnings.push(format!(
                    "Cover art is smaller than {}px on its short edge",
                    MIN_COVER_EDGE
                ));
            }
        }
        Err(e) => report.errors.push(format!(
            "Unreadable cover art {}: {}",
            configured.display(),
            e
        )),
    }
}

/// Audio files under `audio/` that no track refers to
fn unreferenced_audio(dir: &Path, release: &Release) -> Vec<PathBuf> {
    let referenced: HashSet<PathBuf> = release.tracks.iter().map(|t| t.file.clone()).collect();

    let mut stray: Vec<PathBuf> = WalkDir::new(dir.join("audio"))
        .max_depth(2)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.to_string_lossy().to_lowercase().as_str()))
        })
        .filter_map(|e| e.path().strip_prefix(dir).ok().map(Path::to_path_buf))
        .filter(|relative| !referenced.contains(relative))
        .collect();

    stray.sort();
    stray
}
