use gatefold_core::types::{PlayerConfig, Release, Selectors, format_duration};

/// HTML-escape a string to prevent XSS attacks
///
/// Escapes: & < > " '
pub fn html_escape(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#x27;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Options that differ between preview and build
#[derive(Debug, Clone)]
pub struct PageOptions<'a> {
    /// Adds the SSE reload script and the preview badge
    pub is_preview: bool,
    /// Optional CDN base URL for audio files (e.g., "https://cdn.example.com").
    /// Without one, audio and artwork URLs are relative to the page.
    pub audio_base_url: Option<&'a str>,
    /// Liner notes markdown, already read from disk
    pub liner_notes: Option<&'a str>,
    /// URL of the wasm-bindgen JS module, relative so sites work under a subpath
    pub player_module: &'a str,
}

impl Default for PageOptions<'_> {
    fn default() -> Self {
        Self {
            is_preview: false,
            audio_base_url: None,
            liner_notes: None,
            player_module: "./pkg/gatefold_web.js",
        }
    }
}

/// Element ids used in the generated markup.
///
/// Simple `#id` selectors from the config name the elements; anything else
/// falls back to the default id so the embedded config still matches.
struct PageIds {
    now_title: String,
    time_readout: String,
    scrub: String,
    record: String,
    record_label: String,
    record_cover: String,
}

impl PageIds {
    fn from_selectors(selectors: &Selectors) -> Self {
        let defaults = Selectors::default();
        let pick = |configured: &str, default: &str| {
            simple_id(configured)
                .or_else(|| simple_id(default))
                .unwrap_or_default()
                .to_string()
        };

        Self {
            now_title: pick(&selectors.now_title, &defaults.now_title),
            time_readout: pick(&selectors.time_readout, &defaults.time_readout),
            scrub: pick(&selectors.scrub, &defaults.scrub),
            record: pick(&selectors.record, &defaults.record),
            record_label: pick(&selectors.record_label, &defaults.record_label),
            record_cover: pick(&selectors.record_cover, &defaults.record_cover),
        }
    }

    fn selectors(&self) -> Selectors {
        Selectors {
            now_title: format!("#{}", self.now_title),
            time_readout: format!("#{}", self.time_readout),
            scrub: format!("#{}", self.scrub),
            record: format!("#{}", self.record),
            record_label: format!("#{}", self.record_label),
            record_cover: format!("#{}", self.record_cover),
            ..Selectors::default()
        }
    }
}

fn simple_id(selector: &str) -> Option<&str> {
    let id = selector.trim().strip_prefix('#')?;
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(id)
}

/// Serialize the player config for a `<script type="application/json">` block.
///
/// `<` is written as `\u003c` so the JSON can never close the script element.
pub fn player_config_json(config: &PlayerConfig) -> String {
    serde_json::to_string(config)
        .unwrap_or_else(|_| "{}".to_string())
        .replace('<', "\\u003c")
}

/// Generate the complete HTML for a gatefold release page
///
/// This template is shared between preview and build commands to ensure
/// what you see in preview is exactly what gets deployed.
pub fn render_page(release: &Release, options: &PageOptions<'_>) -> String {
    let ids = PageIds::from_selectors(&release.player.selectors);
    let player = PlayerConfig {
        selectors: ids.selectors(),
        ..release.player.clone()
    };

    let tracks_html: String = release
        .tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let path = track.url_path();
            let audio_url = match options.audio_base_url {
                Some(base_url) => format!("{}/{}", base_url.trim_end_matches('/'), path),
                None => path,
            };

            format!(
                r#"
            <div class="track reveal" role="button" tabindex="0" data-audio="{}" data-label="{}" data-id="{}">
                <span class="track-number">{:02}</span>
                <span class="track-title hidden">{}</span>
                <span class="track-duration hidden">{}</span>
            </div>"#,
                html_escape(&audio_url),
                html_escape(&track.label),
                html_escape(&track.id),
                i + 1,
                html_escape(&track.title),
                format_duration(track.duration)
            )
        })
        .collect();

    let cover_url = release.artwork.cover_url_path().map(|c| html_escape(&c));

    let sleeve_html = match &cover_url {
        Some(cover) => format!(
            r#"<div class="cover"><img src="{}" alt="Sleeve cover"></div>"#,
            cover
        ),
        None => r#"<div class="cover cover-blank"></div>"#.to_string(),
    };

    let record_cover_html = match &cover_url {
        Some(cover) => format!(
            r#"<img id="{}" class="record-cover" src="{}" alt="">"#,
            ids.record_cover, cover
        ),
        None => String::new(),
    };

    let base_label = html_escape(
        release
            .player
            .base_label
            .as_deref()
            .unwrap_or(&release.metadata.title),
    );

    let readout_html = if player.time_readout {
        format!(r#"<div id="{}" class="time-readout">0:00 / 0:00</div>"#, ids.time_readout)
    } else {
        String::new()
    };

    let scrub_html = if player.scrub {
        format!(
            r#"<input id="{}" class="scrub" type="range" min="0" max="100" step="0.1" value="0" aria-label="Seek">"#,
            ids.scrub
        )
    } else {
        String::new()
    };

    let release_date_html = release
        .metadata
        .release_date
        .map(|d| format!(r#"<p class="release-date">{}</p>"#, d.format("%B %-d, %Y")))
        .unwrap_or_default();

    let summary_html = release
        .metadata
        .summary
        .as_deref()
        .map(|s| format!(r#"<p class="summary">{}</p>"#, html_escape(s)))
        .unwrap_or_default();

    let notes_html = options
        .liner_notes
        .map(|md| {
            format!(
                r#"<section class="liner-notes">{}</section>"#,
                crate::notes::render_liner_notes(md)
            )
        })
        .unwrap_or_default();

    // Preview badge only shown in preview mode
    let preview_badge = if options.is_preview {
        r#"<div class="preview-badge">PREVIEW MODE - Live Reload Active</div>"#
    } else {
        ""
    };

    // Hot reload script only in preview mode
    let reload_script = if options.is_preview {
        r#"<script>
        const eventSource = new EventSource('/_reload');
        eventSource.onmessage = () => location.reload();
        eventSource.onerror = () => eventSource.close();
    </script>"#
    } else {
        ""
    };

    let footer_text = if options.is_preview {
        "Generated by gatefold • Press Ctrl+C to stop preview"
    } else {
        "Generated by gatefold"
    };

    let escaped_title = html_escape(&release.metadata.title);
    let escaped_artist = html_escape(&release.metadata.artist);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - {artist}</title>
    <style>{css}</style>
</head>
<body>
    {preview_badge}
    <main class="gatefold">
        <section class="sleeve">
            {sleeve_html}
            <h1>{title}</h1>
            <p class="artist">{artist}</p>
            {release_date_html}
            {summary_html}
        </section>
        <section class="inner">
            <div id="{record_id}" class="record">
                <div class="record-label">
                    {record_cover_html}
                    <strong id="{record_label_id}" data-base="{base_label}">{base_label}</strong>
                </div>
            </div>
            <div class="now-playing">
                <div id="{now_title_id}" class="now-title">Choose a track</div>
                {readout_html}
                {scrub_html}
            </div>
            <div class="tracks">{tracks_html}
            </div>
        </section>
        {notes_html}
    </main>
    <footer>{footer_text}</footer>
    <script type="application/json" id="gatefold-config">{config_json}</script>
    <script type="module">
        import init from '{player_module}';
        init();
    </script>
    {reload_script}
</body>
</html>
"#,
        title = escaped_title,
        artist = escaped_artist,
        css = PAGE_CSS,
        record_id = ids.record,
        record_label_id = ids.record_label,
        now_title_id = ids.now_title,
        config_json = player_config_json(&player),
        player_module = html_escape(options.player_module),
    )
}

const PAGE_CSS: &str = r#"
        :root {
            --sleeve: #1d1b19;
            --paper: #efe6d8;
            --ink: #2b2622;
            --accent: #c8553d;
        }

        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: Georgia, "Times New Roman", serif;
            line-height: 1.6;
            color: var(--ink);
            background: var(--sleeve);
            padding: 2rem;
        }

        .preview-badge {
            background: var(--accent);
            color: #fff;
            padding: 0.5rem 1rem;
            border-radius: 4px;
            display: inline-block;
            margin-bottom: 1.5rem;
            font-family: sans-serif;
            font-weight: bold;
        }

        .gatefold {
            max-width: 1100px;
            margin: 0 auto;
            display: grid;
            grid-template-columns: 1fr 1fr;
            background: var(--paper);
            box-shadow: 0 12px 40px rgba(0, 0, 0, 0.6);
        }

        .sleeve, .inner { padding: 2rem; }
        .sleeve { border-right: 2px solid rgba(0, 0, 0, 0.15); }

        .cover img, .cover-blank {
            width: 100%;
            aspect-ratio: 1;
            object-fit: cover;
            display: block;
            margin-bottom: 1rem;
        }
        .cover-blank { background: linear-gradient(135deg, #3a332d, #14110f); }

        h1 { font-size: 2.2rem; }
        .artist { font-size: 1.3rem; opacity: 0.8; }
        .release-date { opacity: 0.6; font-size: 0.9rem; }
        .summary { margin-top: 1rem; }

        .record {
            width: 280px;
            height: 280px;
            margin: 0 auto 1.5rem;
            border-radius: 50%;
            background: repeating-radial-gradient(circle, #111 0 2px, #1c1c1c 2px 4px);
            display: flex;
            align-items: center;
            justify-content: center;
        }
        .record.spinning { animation: spin 1.8s linear infinite; }
        @keyframes spin { to { transform: rotate(360deg); } }

        .record-label {
            width: 110px;
            height: 110px;
            border-radius: 50%;
            background: var(--accent);
            color: #fff;
            overflow: hidden;
            position: relative;
            display: flex;
            align-items: center;
            justify-content: center;
            text-align: center;
            font-size: 0.75rem;
            padding: 0.5rem;
        }
        .record-cover {
            position: absolute;
            inset: 0;
            width: 100%;
            height: 100%;
            object-fit: cover;
        }

        .now-playing { margin-bottom: 1rem; font-family: sans-serif; }
        .now-title { font-weight: bold; }
        .time-readout { font-variant-numeric: tabular-nums; opacity: 0.7; }
        .scrub { width: 100%; accent-color: var(--accent); }

        .track {
            display: grid;
            grid-template-columns: 3rem 1fr 4rem;
            gap: 1rem;
            padding: 0.75rem 0.5rem;
            border-bottom: 1px solid rgba(0, 0, 0, 0.1);
            cursor: pointer;
        }
        .track:hover { background: rgba(0, 0, 0, 0.05); }
        .track-number { font-weight: bold; opacity: 0.5; }
        .track-duration { text-align: right; opacity: 0.6; }
        .track.reveal .hidden { visibility: hidden; }
        .track.revealed .hidden { visibility: visible; }

        .liner-notes {
            grid-column: 1 / -1;
            padding: 2rem;
            border-top: 2px solid rgba(0, 0, 0, 0.15);
        }
        .liner-notes h1, .liner-notes h2 { margin: 1rem 0 0.5rem; }
        .liner-notes p, .liner-notes ul { margin-bottom: 0.75rem; }
        .liner-notes ul { padding-left: 1.5rem; }

        footer {
            text-align: center;
            color: var(--paper);
            opacity: 0.5;
            margin-top: 2rem;
            font-family: sans-serif;
            font-size: 0.8rem;
        }

        @media (max-width: 800px) {
            .gatefold { grid-template-columns: 1fr; }
            .sleeve { border-right: none; }
        }
"#;
