use super::load_release;
use gatefold_validator::validate_release;
use std::path::PathBuf;

pub async fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating release at: {}", path.display());

    let release = load_release(&path)?;

    println!("✓ gatefold.toml valid");
    println!(
        "  Release: {} by {}",
        release.metadata.title, release.metadata.artist
    );
    println!("  Tracks: {}", release.tracks.len());

    let report = validate_release(&path, &release);
    for line in &report.info {
        println!("  • {}", line);
    }
    for warning in &report.warnings {
        println!("⚠ {}", warning);
    }
    for error in &report.errors {
        eprintln!("✗ {}", error);
    }

    if !report.is_ok() {
        anyhow::bail!("Validation failed with {} error(s)", report.errors.len());
    }

    println!("\n✓ Release is ready to build");
    Ok(())
}
