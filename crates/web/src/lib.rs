//! Browser binding for the gatefold player.
//!
//! Pages generated by `gatefold build` embed the player config as JSON in
//! `<script type="application/json" id="gatefold-config">` and load this
//! module; the player mounts itself once the DOM is ready. Pages without the
//! config script can call [`mount`] directly.

mod app;
mod audio;
mod dom;

pub use app::App;
pub use audio::{MediaListeners, WebAudio};
pub use dom::DomView;

use gatefold_core::PlayerConfig;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{console, window};

pub const CONFIG_ELEMENT_ID: &str = "gatefold-config";

/// Parse an embedded player config; an empty document means defaults.
pub fn parse_config(json: &str) -> Result<PlayerConfig, serde_json::Error> {
    if json.trim().is_empty() {
        return Ok(PlayerConfig::default());
    }
    serde_json::from_str(json)
}

/// Handle to a mounted player
#[wasm_bindgen]
pub struct GatefoldPlayer {
    app: Rc<App>,
}

#[wasm_bindgen]
impl GatefoldPlayer {
    /// Stop playback and restore the idle label
    pub fn unload(&self) {
        self.app.unload();
    }
}

/// Mount a player on the current page with a JSON config.
#[wasm_bindgen]
pub fn mount(config_json: &str) -> Result<GatefoldPlayer, JsValue> {
    let config = parse_config(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    mount_with_config(config).map(|app| GatefoldPlayer { app })
}

fn mount_with_config(config: PlayerConfig) -> Result<Rc<App>, JsValue> {
    let window = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    App::mount(&window, &document, config)
}

/// Mount from the embedded config, if the page has one.
fn auto_mount() {
    let Some(document) = window().and_then(|w| w.document()) else {
        return;
    };
    let Some(script) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
        return;
    };

    let config = match parse_config(&script.text_content().unwrap_or_default()) {
        Ok(config) => config,
        Err(err) => {
            console::warn_1(&format!("gatefold: invalid player config, using defaults: {}", err).into());
            PlayerConfig::default()
        }
    };

    // Mounted players stay alive through their page listeners
    if let Err(err) = mount_with_config(config) {
        console::error_2(&"gatefold: mount failed".into(), &err);
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let Some(document) = window().and_then(|w| w.document()) else {
        return Ok(());
    };

    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(auto_mount);
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    } else {
        auto_mount();
    }

    Ok(())
}
