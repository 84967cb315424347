use anyhow::{Context, Result};
use chrono::Local;
use gatefold_core::parse_release_toml_str;
use gatefold_core::types::slug;
use lofty::prelude::*;
use lofty::probe::Probe;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::CONFIG_FILE;

const AUDIO_EXTENSIONS: &[&str] = &["flac", "wav", "mp3", "ogg"];
const COVER_ART_NAMES: &[&str] = &[
    "cover.jpg",
    "cover.png",
    "artwork.jpg",
    "artwork.png",
    "folder.jpg",
    "folder.png",
    "album.jpg",
    "album.png",
];
const MAX_SCAN_DEPTH: usize = 2;

/// Quote-safe text for a TOML basic string.
///
/// The template is written by hand to keep its comments, so values are
/// escaped here instead of going through the toml serializer.
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[derive(Debug)]
struct DetectedTrack {
    path: PathBuf,
    title: String,
    duration: Option<String>,
}

/// Initialize a release directory with smart defaults.
///
/// Scans for audio files and cover art, copies them into `audio/` and
/// `artwork/`, and writes a gatefold.toml with track titles derived from
/// filenames, probed durations, and a liner notes template.
///
/// # Errors
///
/// Returns an error if the directory doesn't exist, gatefold.toml already
/// exists in it, or a file operation fails.
pub async fn run(path: PathBuf, artist: Option<String>, title: Option<String>) -> Result<()> {
    println!("Initializing release directory: {}", path.display());

    if !path.exists() {
        anyhow::bail!(
            "Directory '{}' does not exist. Create it first: mkdir {}",
            path.display(),
            path.display()
        );
    }

    let config_path = path.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!(
            "{} already exists at {}\nHint: Delete it first or use a different directory",
            CONFIG_FILE,
            config_path.display()
        );
    }

    println!("\nLooking for audio and artwork...");

    let audio_files = scan_audio_files(&path)?;
    match audio_files.len() {
        0 => println!("⚠ No audio files; add [[track]] entries later"),
        n => println!("✓ {} audio file(s)", n),
    }

    let cover_art = detect_cover_art(&path)?;
    match &cover_art {
        Some(cover) => println!("✓ Sleeve art: {}", cover.display()),
        None => println!("⚠ No cover art; the sleeve will be blank"),
    }

    let tracks = extract_track_metadata(&audio_files)?;

    create_directory_structure(&path)?;
    let cover_dest = organize_files(&path, &audio_files, cover_art.as_deref())?;

    generate_release_toml(
        &path,
        &tracks,
        cover_dest.as_deref(),
        artist.as_deref(),
        title.as_deref(),
    )?;
    generate_notes_template(&path)?;

    println!("\n✓ Release directory ready");
    println!("\n  {}/", path.display());
    println!("  ├── gatefold.toml        ← release, player and track settings");
    println!("  ├── artwork/");
    if let Some(cover) = &cover_dest {
        println!("  │   └── {}", cover.file_name().unwrap_or_default().to_string_lossy());
    }
    println!("  ├── audio/");
    for track in &tracks {
        println!(
            "  │   └── {}",
            track.path.file_name().unwrap_or_default().to_string_lossy()
        );
    }
    println!("  └── notes/");
    println!("      └── album.md         ← inner sleeve text");

    println!("\nThen:");
    println!("  gatefold validate {}", path.display());
    println!("  gatefold preview {} --pkg <wasm-pack output>", path.display());

    Ok(())
}

/// Audio files at most `MAX_SCAN_DEPTH` levels deep, sorted by path
fn scan_audio_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut audio_files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(MAX_SCAN_DEPTH)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path().extension().is_some_and(|ext| {
                AUDIO_EXTENSIONS.contains(&ext.to_string_lossy().to_lowercase().as_str())
            })
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    audio_files.sort();

    Ok(audio_files)
}

fn detect_cover_art(dir: &Path) -> Result<Option<PathBuf>> {
    // Well-known names win over whatever image happens to be there
    for name in COVER_ART_NAMES {
        let path = dir.join(name);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    // Fallback: first JPG or PNG at the top level
    for entry in WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(ext) = entry.path().extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if ext_lower == "jpg" || ext_lower == "jpeg" || ext_lower == "png" {
                return Ok(Some(entry.path().to_path_buf()));
            }
        }
    }

    Ok(None)
}

fn extract_track_metadata(audio_files: &[PathBuf]) -> Result<Vec<DetectedTrack>> {
    let mut tracks = Vec::new();

    for (idx, path) in audio_files.iter().enumerate() {
        let title = extract_track_title(path, idx + 1);

        let duration = match Probe::open(path)
            .context("Failed to open audio file")?
            .read()
        {
            Ok(tagged_file) => {
                let secs = tagged_file.properties().duration().as_secs();
                Some(format!("{}:{:02}", secs / 60, secs % 60))
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not probe audio file");
                None
            }
        };

        tracks.push(DetectedTrack {
            path: path.clone(),
            title,
            duration,
        });
    }

    Ok(tracks)
}

/// Track title from a filename, e.g. `03_night-drive.ogg` → "Night Drive".
///
/// The leading number and any `track` prefix are dropped and each word is
/// capitalized. Names that are only a number become "Track <position>".
fn extract_track_title(path: &Path, position: usize) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();

    let is_separator = |c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace();
    let rest = stem.trim_start_matches(|c: char| c.is_ascii_digit() || is_separator(c));
    let rest = rest
        .strip_prefix("track")
        .or_else(|| rest.strip_prefix("Track"))
        .unwrap_or(rest)
        .trim_start_matches(is_separator);

    if rest.chars().all(|c| c.is_ascii_digit() || is_separator(c)) {
        return format!("Track {}", position);
    }

    rest.split(is_separator)
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Record label text for the n-th track: A1, A2, ... for the first half, B1, ... after
fn side_label(index: usize, total: usize, title: &str) -> String {
    let side_length = total.div_ceil(2).max(1);
    let (side, position) = if index < side_length {
        ('A', index + 1)
    } else {
        ('B', index - side_length + 1)
    };
    format!("{}{} {}", side, position, title)
}

fn create_directory_structure(base: &Path) -> Result<()> {
    fs::create_dir_all(base.join("artwork"))?;
    fs::create_dir_all(base.join("audio"))?;
    fs::create_dir_all(base.join("notes"))?;
    Ok(())
}

/// Copy audio into `audio/` and the cover into `artwork/`.
///
/// Returns the cover's path relative to `base`.
fn organize_files(
    base: &Path,
    audio_files: &[PathBuf],
    cover_art: Option<&Path>,
) -> Result<Option<PathBuf>> {
    for audio_file in audio_files {
        let filename = audio_file
            .file_name()
            .context("Audio path has no filename")?;
        let dest = base.join("audio").join(filename);
        if !is_same_file(audio_file, &dest) {
            fs::copy(audio_file, &dest).context("Failed to copy audio file")?;
        }
    }

    let Some(cover_path) = cover_art else {
        return Ok(None);
    };

    let ext = cover_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("jpg")
        .to_lowercase();
    let relative = PathBuf::from("artwork").join(format!("cover.{}", ext));
    let dest = base.join(&relative);
    if !is_same_file(cover_path, &dest) {
        fs::copy(cover_path, &dest).context("Failed to copy cover art")?;
    }

    Ok(Some(relative))
}

/// Only compares when the destination exists to avoid canonicalization errors
fn is_same_file(src: &Path, dest: &Path) -> bool {
    dest.exists()
        && matches!(
            (src.canonicalize(), dest.canonicalize()),
            (Ok(a), Ok(b)) if a == b
        )
}

fn generate_release_toml(
    base: &Path,
    tracks: &[DetectedTrack],
    cover: Option<&Path>,
    artist: Option<&str>,
    title: Option<&str>,
) -> Result<()> {
    let today = Local::now().format("%Y-%m-%d").to_string();

    let artist_name = toml_escape_string(artist.unwrap_or("Artist Name"));
    let release_title = toml_escape_string(title.unwrap_or("My Album"));
    let artist_comment = if artist.is_some() {
        ""
    } else {
        "  # TODO: Set artist name"
    };
    let title_comment = if title.is_some() {
        ""
    } else {
        "  # TODO: Set release title"
    };

    let mut toml = format!(
        "# Generated by gatefold init\n\
# Edit this file to customize your release page\n\
\n\
[release]\n\
title = \"{release_title}\"{title_comment}\n\
artist = \"{artist_name}\"{artist_comment}\n\
release_date = \"{today}\"  # TODO: Set release date\n\
summary = \"Description of this release\"  # TODO: Add summary\n\
liner_notes = \"notes/album.md\"\n\
\n"
    );

    match cover {
        Some(cover) => {
            let cover = toml_escape_string(&cover.to_string_lossy().replace('\\', "/"));
            toml.push_str(&format!("[artwork]\ncover = \"{}\"\n\n", cover));
        }
        None => toml.push_str("# [artwork]\n# cover = \"artwork/cover.jpg\"\n\n"),
    }

    toml.push_str(
        r##"[player]
# label_mode = "auto"      # auto | text | cover | off
# scrub = true
# time_readout = true
# spin = true
# reveal_on_click = true
# restore_delay_ms = 700

"##,
    );

    if tracks.is_empty() {
        toml.push_str(
            r##"# Add tracks here as you add audio files
# [[track]]
# file = "audio/01-track-name.flac"
# title = "Track Name"
# label = "A1 Track Name"  # Optional, shown on the record label
# duration = "5:23"

"##,
        );
    } else {
        toml.push_str("# Auto-detected tracks (edit titles and labels as needed)\n");
        for (idx, track) in tracks.iter().enumerate() {
            let filename = track
                .path
                .file_name()
                .context("Track path has no filename")?
                .to_string_lossy();
            toml.push_str("[[track]]\n");
            toml.push_str(&format!("file = \"audio/{}\"\n", toml_escape_string(&filename)));
            toml.push_str(&format!("title = \"{}\"\n", toml_escape_string(&track.title)));
            toml.push_str(&format!(
                "label = \"{}\"\n",
                toml_escape_string(&side_label(idx, tracks.len(), &track.title))
            ));
            // Filenames can share a title; keep ids distinct
            toml.push_str(&format!(
                "id = \"{}-{}\"\n",
                idx + 1,
                toml_escape_string(&slug(&track.title))
            ));
            if let Some(ref duration) = track.duration {
                toml.push_str(&format!("duration = \"{}\"  # Auto-detected\n", duration));
            }
            toml.push('\n');
        }
    }

    parse_release_toml_str(&toml)
        .context("Generated gatefold.toml is invalid - this is a bug in the template generator")?;

    fs::write(base.join(CONFIG_FILE), toml)?;

    Ok(())
}

fn generate_notes_template(base: &Path) -> Result<()> {
    let path = base.join("notes").join("album.md");
    if path.exists() {
        return Ok(());
    }

    let template = r##"# Liner Notes

Write about your release here. This is markdown, so you can use:

- **Bold** and *italic* text
- Lists and links

## Recording

Describe how you made this record...

## Credits

Thanks to...
"##;

    fs::write(path, template)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn release_dir_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"not really audio").unwrap();
        }
        dir
    }

    fn detected(name: &str, title: &str) -> DetectedTrack {
        DetectedTrack {
            path: PathBuf::from(name),
            title: title.to_string(),
            duration: Some("5:23".to_string()),
        }
    }

    #[test]
    fn test_extract_track_title_strips_numbering() {
        let cases = [
            ("01-needle-drop.flac", "Needle Drop"),
            ("02_run_out_groove.wav", "Run Out Groove"),
            ("03 - Locked Groove.mp3", "Locked Groove"),
            ("04.inner-sleeve.ogg", "Inner Sleeve"),
        ];
        for (name, expected) in cases {
            assert_eq!(extract_track_title(Path::new(name), 1), expected, "{}", name);
        }
    }

    #[test]
    fn test_extract_track_title_falls_back_to_position() {
        assert_eq!(extract_track_title(Path::new("07.flac"), 7), "Track 7");
        assert_eq!(extract_track_title(Path::new("Track 02.mp3"), 2), "Track 2");
        assert_eq!(extract_track_title(Path::new("track_12.wav"), 3), "Track 3");
        assert_eq!(
            extract_track_title(Path::new("HIDDEN-TRACK.flac"), 9),
            "Hidden Track"
        );
    }

    #[test]
    fn test_side_label() {
        assert_eq!(side_label(0, 4, "One"), "A1 One");
        assert_eq!(side_label(1, 4, "Two"), "A2 Two");
        assert_eq!(side_label(2, 4, "Three"), "B1 Three");
        assert_eq!(side_label(2, 3, "Three"), "B1 Three");
        assert_eq!(side_label(0, 1, "Solo"), "A1 Solo");
    }

    #[test]
    fn test_scan_audio_files_finds_supported_formats() {
        let dir = release_dir_with(&[
            "track1.flac",
            "track2.WAV",
            "track3.mp3",
            "track4.ogg",
            "notes.txt",
        ]);
        let result = scan_audio_files(dir.path()).unwrap();
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_scan_audio_files_respects_max_depth() {
        let dir = release_dir_with(&["a.flac", "one/b.flac", "one/two/c.flac"]);
        let result = scan_audio_files(dir.path()).unwrap();
        let names: Vec<_> = result
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["a.flac", "b.flac"]);
    }

    #[test]
    fn test_detect_cover_art_priority_and_fallback() {
        let dir = TempDir::new().unwrap();
        assert!(detect_cover_art(dir.path()).unwrap().is_none());

        fs::write(dir.path().join("scan.png"), b"img").unwrap();
        assert_eq!(
            detect_cover_art(dir.path()).unwrap(),
            Some(dir.path().join("scan.png"))
        );

        fs::write(dir.path().join("folder.jpg"), b"img").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"img").unwrap();
        assert_eq!(
            detect_cover_art(dir.path()).unwrap(),
            Some(dir.path().join("cover.jpg"))
        );
    }

    #[test]
    fn test_organize_files_copies_and_skips_in_place() {
        let dir = release_dir_with(&["01-a.flac", "audio/02-b.flac"]);
        fs::write(dir.path().join("Cover.PNG"), b"img").unwrap();
        create_directory_structure(dir.path()).unwrap();

        let audio = vec![dir.path().join("01-a.flac"), dir.path().join("audio/02-b.flac")];
        let cover = organize_files(dir.path(), &audio, Some(&dir.path().join("Cover.PNG"))).unwrap();

        assert!(dir.path().join("audio/01-a.flac").is_file());
        assert!(dir.path().join("audio/02-b.flac").is_file());
        assert_eq!(cover, Some(PathBuf::from("artwork/cover.png")));
        assert!(dir.path().join("artwork/cover.png").is_file());
    }

    #[test]
    fn test_generate_release_toml_empty_tracks() {
        let dir = TempDir::new().unwrap();
        generate_release_toml(dir.path(), &[], None, None, None).unwrap();

        let content = fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        let release = parse_release_toml_str(&content).unwrap();
        assert_eq!(release.metadata.title, "My Album");
        assert!(release.tracks.is_empty());
        assert!(release.artwork.cover.is_none());
    }

    #[test]
    fn test_generate_release_toml_with_tracks() {
        let dir = TempDir::new().unwrap();
        let tracks = vec![
            detected("audio/01-hum.flac", "Hum"),
            detected("audio/02-hum.flac", "Hum"),
        ];
        generate_release_toml(
            dir.path(),
            &tracks,
            Some(Path::new("artwork/cover.jpg")),
            Some("Artist"),
            Some("Disc A"),
        )
        .unwrap();

        let content = fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        let release = parse_release_toml_str(&content).unwrap();
        assert_eq!(release.metadata.artist, "Artist");
        assert_eq!(release.tracks.len(), 2);
        assert_eq!(release.tracks[0].id, "1-hum");
        assert_eq!(release.tracks[1].id, "2-hum");
        assert_eq!(release.tracks[0].label, "A1 Hum");
        assert_eq!(release.tracks[1].label, "B1 Hum");
        assert_eq!(release.tracks[0].duration.unwrap().as_secs(), 323);
        assert_eq!(
            release.artwork.cover.as_deref(),
            Some(Path::new("artwork/cover.jpg"))
        );
    }

    #[test]
    fn test_generate_release_toml_with_special_characters() {
        let dir = TempDir::new().unwrap();
        generate_release_toml(
            dir.path(),
            &[detected("audio/01.flac", "Say \"Hi\"\\")],
            None,
            Some("The \"Quoted\" Band"),
            Some("Back\\slash\nNewline"),
        )
        .unwrap();

        let content = fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        let release = parse_release_toml_str(&content).unwrap();
        assert_eq!(release.metadata.artist, "The \"Quoted\" Band");
        assert_eq!(release.metadata.title, "Back\\slash\nNewline");
        assert_eq!(release.tracks[0].title, "Say \"Hi\"\\");
    }

    #[test]
    fn test_generate_notes_template_keeps_existing() {
        let dir = TempDir::new().unwrap();
        create_directory_structure(dir.path()).unwrap();
        fs::write(dir.path().join("notes/album.md"), "mine").unwrap();

        generate_notes_template(dir.path()).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("notes/album.md")).unwrap(),
            "mine"
        );
    }

    #[test]
    fn test_toml_escape_string() {
        assert_eq!(toml_escape_string(r#"12" single"#), r#"12\" single"#);
        assert_eq!(toml_escape_string(r"C:\rips"), r"C:\\rips");
        assert_eq!(toml_escape_string("side a\tside b\n"), r"side a\tside b\n");
        assert_eq!(toml_escape_string("Plain"), "Plain");
    }

    #[tokio::test]
    async fn test_run_refuses_existing_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
        let err = run(dir.path().to_path_buf(), None, None).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_run_on_empty_directory() {
        let dir = TempDir::new().unwrap();
        run(dir.path().to_path_buf(), Some("Artist".into()), None)
            .await
            .unwrap();
        assert!(dir.path().join(CONFIG_FILE).is_file());
        assert!(dir.path().join("notes/album.md").is_file());
        assert!(dir.path().join("audio").is_dir());
    }
}
