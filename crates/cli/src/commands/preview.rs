use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    response::{
        Html, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use gatefold_generator::{PageOptions, html_escape, render_page};
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use super::{load_release, read_liner_notes};

#[derive(Clone)]
struct AppState {
    release_path: PathBuf,
    reload_tx: broadcast::Sender<()>,
}

/// Start preview server with hot reload for local development.
///
/// Serves the generated page at `/` and the wasm player module from `pkg`
/// when given. Every other path is a file in the release directory, matching
/// the release-relative audio and artwork URLs on the page. A reload is pushed
/// over SSE whenever a file in the release directory changes.
pub async fn run(path: PathBuf, port: u16, pkg: Option<PathBuf>) -> Result<()> {
    println!("🎵 Starting preview server...");
    println!("   Release: {}", path.display());

    let release = load_release(&path)?;

    println!("   ✓ Loaded: {}", release.metadata.title);
    println!("   ✓ Artist: {}", release.metadata.artist);
    println!("   ✓ Tracks: {}", release.tracks.len());

    let (reload_tx, _) = broadcast::channel::<()>(100);

    let state = AppState {
        release_path: path.clone(),
        reload_tx: reload_tx.clone(),
    };

    let mut app = Router::new()
        .route("/", get(index_handler))
        .route("/_reload", get(sse_handler));

    match &pkg {
        Some(pkg) => {
            if !pkg.is_dir() {
                anyhow::bail!("Player module directory does not exist: {}", pkg.display());
            }
            app = app.nest_service("/pkg", ServeDir::new(pkg));
            println!("   ✓ Player: {}", pkg.display());
        }
        None => {
            println!("   ⚠ No --pkg given; the page will load without the player module");
        }
    }

    let app = app
        .fallback_service(ServeDir::new(&path))
        .with_state(state);

    let watcher_path = path.clone();
    let watcher_tx = reload_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = watch_files(watcher_path, watcher_tx).await {
            tracing::error!(error = %e, "file watcher stopped");
            eprintln!("File watcher error: {}", e);
        }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("\n🚀 Preview ready at: http://localhost:{}", port);
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Whether a change to `path` should trigger a reload
fn is_relevant_change(path: &Path) -> bool {
    let filename = path.file_name().unwrap_or_default().to_string_lossy();
    !filename.starts_with('.') && !filename.ends_with('~')
}

/// Watch for file changes and trigger reload
async fn watch_files(path: PathBuf, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    watcher.watch(&path, RecursiveMode::Recursive)?;

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {
                if event.paths.iter().any(|p| is_relevant_change(p)) {
                    tracing::info!(paths = ?event.paths, "release changed");
                    println!("   📝 File changed, reloading...");
                    let _ = reload_tx.send(());
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// SSE endpoint for hot reload
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let mut rx = state.reload_tx.subscribe();

    let stream = async_stream::stream! {
        loop {
            if rx.recv().await.is_ok() {
                yield Ok(Event::default().data("reload"));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Main index page handler
///
/// The release is re-read on every request so edits show up on reload.
async fn index_handler(State(state): State<AppState>) -> Response {
    match render_preview(&state.release_path) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "preview render failed");
            Html(error_page(&format!("{:#}", e))).into_response()
        }
    }
}

fn render_preview(path: &Path) -> Result<String> {
    let release = load_release(path)?;
    let liner_notes = read_liner_notes(path, &release)?;
    let options = PageOptions {
        is_preview: true,
        liner_notes: liner_notes.as_deref(),
        ..PageOptions::default()
    };
    Ok(render_page(&release, &options))
}

fn error_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><title>Error</title></head><body>
<h1>Configuration Error</h1>
<pre>{}</pre>
<script>
    const eventSource = new EventSource('/_reload');
    eventSource.onmessage = () => location.reload();
</script>
</body></html>"#,
        html_escape(message)
    )
}
