use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Label shown when a track element carries no `data-label`
pub const UNKNOWN_TRACK_LABEL: &str = "Unknown track";

/// Complete release configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub metadata: ReleaseMetadata,
    pub artwork: Artwork,
    pub player: PlayerConfig,
    pub tracks: Vec<Track>,
}

/// Release metadata printed on the sleeve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseMetadata {
    pub title: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liner_notes: Option<PathBuf>,
}

/// Artwork files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artwork {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<PathBuf>,
}

impl Artwork {
    /// Cover path as a relative URL, e.g. `artwork/cover.jpg`
    pub fn cover_url_path(&self) -> Option<String> {
        self.cover.as_deref().map(url_path)
    }
}

/// Individual track on the release
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub file: PathBuf,
    pub title: String,
    /// Text mirrored onto the record label while the track plays
    pub label: String,
    /// Key that tells "same track" (toggle) from "other track" (switch)
    pub id: String,
    /// Length from `duration = "M:SS"`; `init` fills it in from the audio file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
}

impl Track {
    /// Audio path as a relative URL, e.g. `audio/disc1/01.flac`.
    ///
    /// Built pages keep the release layout, so nested files stay distinct.
    pub fn url_path(&self) -> String {
        url_path(&self.file)
    }
}

/// A relative release path joined with `/` on every platform
pub fn url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// What a clicked track element refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRef {
    pub src: String,
    pub label: String,
    pub id: String,
}

impl TrackRef {
    /// Build a reference from raw element attributes.
    ///
    /// Returns `None` without a source. An empty label falls back to
    /// [`UNKNOWN_TRACK_LABEL`] and an empty id falls back to the label.
    pub fn from_attributes(src: Option<&str>, label: Option<&str>, id: Option<&str>) -> Option<Self> {
        let src = src.filter(|s| !s.is_empty())?;
        let label = label
            .filter(|l| !l.is_empty())
            .unwrap_or(UNKNOWN_TRACK_LABEL)
            .to_string();
        let id = id
            .filter(|i| !i.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| label.clone());

        Some(Self {
            src: src.to_string(),
            label,
            id,
        })
    }
}

/// How the record label mirrors the active track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    /// Use whichever of the text label and cover image exist on the page
    #[default]
    Auto,
    /// Swap the record label text
    Text,
    /// Show the sleeve cover on the record
    Cover,
    Off,
}

impl LabelMode {
    pub fn uses_text(self) -> bool {
        matches!(self, LabelMode::Auto | LabelMode::Text)
    }

    pub fn uses_cover(self) -> bool {
        matches!(self, LabelMode::Auto | LabelMode::Cover)
    }

    /// What the record label shows when it should read `text`
    pub fn record_label(self, text: &str) -> RecordLabel<'_> {
        RecordLabel {
            text: self.uses_text().then_some(text),
            mirror_cover: self.uses_cover(),
        }
    }
}

/// Record label update for one [`LabelMode`]; missing page elements are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLabel<'a> {
    /// New text for the label element
    pub text: Option<&'a str>,
    /// Copy the sleeve artwork onto the record cover
    pub mirror_cover: bool,
}

/// Idle record label: the configured text, else the element's `data-base`,
/// else its own trimmed text. Blank candidates are skipped.
pub fn resolve_base_label(
    configured: Option<&str>,
    data_base: Option<&str>,
    text: Option<&str>,
) -> String {
    configured
        .filter(|c| !c.trim().is_empty())
        .or_else(|| data_base.filter(|b| !b.trim().is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| text.unwrap_or_default().trim().to_string())
}

/// Player behaviour, shared by the page generator and the browser binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub label_mode: LabelMode,
    pub scrub: bool,
    pub time_readout: bool,
    pub spin: bool,
    pub reveal_on_click: bool,
    /// Delay before the idle label comes back after a track ends
    pub restore_delay_ms: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_label: Option<String>,
    pub messages: Messages,
    pub selectors: Selectors,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            label_mode: LabelMode::Auto,
            scrub: true,
            time_readout: true,
            spin: true,
            reveal_on_click: true,
            restore_delay_ms: 700,
            base_label: None,
            messages: Messages::default(),
            selectors: Selectors::default(),
        }
    }
}

impl PlayerConfig {
    pub fn restore_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.restore_delay_ms))
    }
}

/// Status line templates; `{label}` is replaced by the track label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub now_playing: String,
    pub paused: String,
    pub finished: String,
    pub retry: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            now_playing: "Now playing: {label}".to_string(),
            paused: "Paused: {label}".to_string(),
            finished: "Finished: {label}".to_string(),
            retry: "Tap again to play: {label}".to_string(),
        }
    }
}

impl Messages {
    pub fn render(template: &str, label: &str) -> String {
        template.replace("{label}", label)
    }
}

/// DOM lookups used to find the player's elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub tracks: String,
    pub now_title: String,
    pub time_readout: String,
    pub scrub: String,
    pub record: String,
    pub record_label: String,
    pub record_cover: String,
    pub sleeve_cover: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            tracks: "[data-audio]".to_string(),
            now_title: "#nowTitle".to_string(),
            time_readout: "#timeReadout".to_string(),
            scrub: "#progressRange".to_string(),
            record: "#record".to_string(),
            record_label: "#recordLabel".to_string(),
            record_cover: "#recordCover".to_string(),
            sleeve_cover: ".cover img".to_string(),
        }
    }
}

impl Selectors {
    /// (field name, selector) pairs, for validation messages
    pub fn entries(&self) -> [(&'static str, &str); 8] {
        [
            ("tracks", &self.tracks),
            ("now_title", &self.now_title),
            ("time_readout", &self.time_readout),
            ("scrub", &self.scrub),
            ("record", &self.record),
            ("record_label", &self.record_label),
            ("record_cover", &self.record_cover),
            ("sleeve_cover", &self.sleeve_cover),
        ]
    }
}

/// Format a playback position as `m:ss`.
///
/// Non-finite input renders as `0:00` and negative input is clamped to zero.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "0:00".to_string();
    }
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// `elapsed / total` readout
pub fn format_readout(elapsed: f64, duration: f64) -> String {
    format!("{} / {}", format_time(elapsed), format_time(duration))
}

/// Scrub bar position in percent; 0 when the duration is unknown or zero.
pub fn scrub_percent(elapsed: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 {
        return 0.0;
    }
    (elapsed / duration) * 100.0
}

/// Helper to format a known track length as M:SS
pub fn format_duration(duration: Option<Duration>) -> String {
    match duration {
        Some(d) => {
            let total_secs = d.as_secs();
            format!("{}:{:02}", total_secs / 60, total_secs % 60)
        }
        None => "--:--".to_string(),
    }
}

/// Get a URL-safe slug from a title
pub fn slug(title: &str) -> String {
    title
        .to_lowercase()
        .replace(char::is_whitespace, "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect()
}
