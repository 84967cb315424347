use gatefold_core::{LabelMode, PlayerConfig, PlayerView, TrackRef, resolve_base_label};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlImageElement, HtmlInputElement};

const SPIN_CLASS: &str = "spinning";
const REVEAL_CLASS: &str = "revealed";
const BASE_ATTRIBUTE: &str = "data-base";

/// Track element attributes
const AUDIO_ATTRIBUTE: &str = "data-audio";
const LABEL_ATTRIBUTE: &str = "data-label";
const ID_ATTRIBUTE: &str = "data-id";

/// The player's page elements, looked up once at mount.
///
/// Every element is optional; updates for a missing one are skipped. Track
/// attributes are read again on every click, so pages may rewrite them.
pub struct DomView {
    mode: LabelMode,
    now_title: Option<Element>,
    time_readout: Option<Element>,
    scrub: Option<HtmlInputElement>,
    record: Option<Element>,
    record_label: Option<Element>,
    record_cover: Option<HtmlImageElement>,
    sleeve_cover: Option<HtmlImageElement>,
    base_label: String,
    tracks: Vec<Element>,
}

impl DomView {
    pub fn locate(document: &Document, config: &PlayerConfig) -> Self {
        let selectors = &config.selectors;
        let find = |selector: &str| document.query_selector(selector).ok().flatten();

        let record_label = find(&selectors.record_label);
        let base_label = record_label
            .as_ref()
            .map(|el| capture_base_label(el, config.base_label.as_deref()))
            .unwrap_or_default();

        Self {
            mode: config.label_mode,
            now_title: find(&selectors.now_title),
            time_readout: find(&selectors.time_readout),
            scrub: find(&selectors.scrub).and_then(|el| el.dyn_into().ok()),
            record: find(&selectors.record),
            record_label,
            record_cover: find(&selectors.record_cover).and_then(|el| el.dyn_into().ok()),
            sleeve_cover: find(&selectors.sleeve_cover).and_then(|el| el.dyn_into().ok()),
            base_label,
            tracks: find_tracks(document, &selectors.tracks),
        }
    }

    pub fn track_elements(&self) -> &[Element] {
        &self.tracks
    }

    pub fn scrub_input(&self) -> Option<&HtmlInputElement> {
        self.scrub.as_ref()
    }

    fn apply_label(&self, text: &str) {
        let update = self.mode.record_label(text);
        if let (Some(text), Some(el)) = (update.text, &self.record_label) {
            el.set_text_content(Some(text));
        }
        if update.mirror_cover {
            self.mirror_sleeve();
        }
    }

    /// Point the record cover at the sleeve artwork
    fn mirror_sleeve(&self) {
        if let (Some(cover), Some(sleeve)) = (&self.record_cover, &self.sleeve_cover) {
            cover.set_src(&sleeve.src());
        }
    }
}

impl PlayerView for DomView {
    fn set_status(&mut self, text: &str) {
        if let Some(el) = &self.now_title {
            el.set_text_content(Some(text));
        }
    }

    fn set_time_readout(&mut self, text: &str) {
        if let Some(el) = &self.time_readout {
            el.set_text_content(Some(text));
        }
    }

    fn set_scrub_value(&mut self, percent: f64) {
        if let Some(input) = &self.scrub {
            input.set_value(&percent.to_string());
        }
    }

    fn set_spinning(&mut self, on: bool) {
        if let Some(record) = &self.record {
            let _ = record.class_list().toggle_with_force(SPIN_CLASS, on);
        }
    }

    fn show_track_label(&mut self, label: &str) {
        self.apply_label(label);
    }

    fn show_idle_label(&mut self) {
        self.apply_label(&self.base_label);
    }

    fn reveal_track(&mut self, track: &TrackRef) {
        for el in &self.tracks {
            if track_ref(el).is_some_and(|candidate| candidate.id == track.id) {
                let _ = el.class_list().add_1(REVEAL_CLASS);
            }
        }
    }
}

/// Resolve the idle label and write it back to `data-base`.
fn capture_base_label(el: &Element, configured: Option<&str>) -> String {
    let base = resolve_base_label(
        configured,
        el.get_attribute(BASE_ATTRIBUTE).as_deref(),
        el.text_content().as_deref(),
    );
    let _ = el.set_attribute(BASE_ATTRIBUTE, &base);
    base
}

/// The track an element currently points at; `None` without `data-audio`.
pub fn track_ref(el: &Element) -> Option<TrackRef> {
    TrackRef::from_attributes(
        el.get_attribute(AUDIO_ATTRIBUTE).as_deref(),
        el.get_attribute(LABEL_ATTRIBUTE).as_deref(),
        el.get_attribute(ID_ATTRIBUTE).as_deref(),
    )
}

fn find_tracks(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}
