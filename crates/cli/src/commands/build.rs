use anyhow::{Context, Result};
use gatefold_generator::{PageOptions, render_page};
use gatefold_validator::validate_release;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{load_release, read_liner_notes};

/// Build static site for deployment
pub async fn run(
    path: PathBuf,
    output: PathBuf,
    pkg: Option<PathBuf>,
    audio_base_url: Option<String>,
) -> Result<()> {
    println!("🔨 Building gatefold page...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    let release = load_release(&path)?;

    println!("✓ Loaded: {}", release.metadata.title);
    println!("  Artist: {}", release.metadata.artist);
    println!("  Tracks: {}", release.tracks.len());
    println!();

    let report = validate_release(&path, &release);
    for warning in &report.warnings {
        println!("   ⚠ {}", warning);
    }
    if !report.is_ok() {
        for error in &report.errors {
            eprintln!("   ✗ {}", error);
        }
        anyhow::bail!(
            "Release has {} error(s); run 'gatefold validate {}' for details",
            report.errors.len(),
            path.display()
        );
    }

    fs::create_dir_all(&output).context("Failed to create output directory")?;

    // Audio is served from elsewhere when a base URL is given
    if audio_base_url.is_none() {
        println!("🎵 Copying audio files...");
        for track in &release.tracks {
            copy_release_file(&path, &output, &track.file)?;
        }
        println!("   ✓ Copied {} audio files", release.tracks.len());
    }

    if let Some(cover) = &release.artwork.cover {
        println!("🎨 Copying artwork...");
        copy_release_file(&path, &output, cover)?;
        println!("   ✓ Copied cover art");
    }

    println!("📄 Generating index.html...");
    let liner_notes = read_liner_notes(&path, &release)?;
    let options = PageOptions {
        audio_base_url: audio_base_url.as_deref(),
        liner_notes: liner_notes.as_deref(),
        ..PageOptions::default()
    };
    let html = render_page(&release, &options);
    fs::write(output.join("index.html"), html).context("Failed to write index.html")?;
    println!("   ✓ Generated index.html");

    match pkg {
        Some(pkg) => {
            println!("🎮 Copying player module...");
            let copied = copy_dir(&pkg, &output.join("pkg"))?;
            println!("   ✓ Copied {} files from {}", copied, pkg.display());
        }
        None => {
            println!("   ⚠ No --pkg given; build the player into the output with:");
            println!(
                "     wasm-pack build crates/web --target web --out-dir {}",
                output.join("pkg").display()
            );
        }
    }

    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", output.display());
    println!();
    println!("To test locally:");
    println!("   cd {} && python3 -m http.server 8000", output.display());
    println!();

    Ok(())
}

/// Copy one release file to the same relative path under `output`.
///
/// Page URLs are the release-relative paths, so the layout must be kept.
fn copy_release_file(release_dir: &Path, output: &Path, relative: &Path) -> Result<()> {
    let src = release_dir.join(relative);
    let dst = output.join(relative);
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::copy(&src, &dst).with_context(|| format!("Failed to copy {}", src.display()))?;
    Ok(())
}

/// Recursively copy `src` into `dst`, returning the number of files copied
fn copy_dir(src: &Path, dst: &Path) -> Result<usize> {
    if !src.is_dir() {
        anyhow::bail!("Player module directory does not exist: {}", src.display());
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).into_iter() {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src)?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
            copied += 1;
        }
    }

    tracing::debug!(src = %src.display(), dst = %dst.display(), copied, "copied directory");
    Ok(copied)
}
