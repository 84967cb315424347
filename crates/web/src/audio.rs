// Native audio element as the player's playback handle.
use gatefold_core::{MediaEvent, PlayRejected, PlaybackHandle};
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

#[derive(Clone)]
pub struct WebAudio {
    element: HtmlAudioElement,
}

impl WebAudio {
    pub fn open(src: &str) -> Result<Self, JsValue> {
        let element = HtmlAudioElement::new_with_src(src)?;
        element.set_preload("metadata");
        Ok(Self { element })
    }

    pub fn element(&self) -> &HtmlAudioElement {
        &self.element
    }

    /// Ask the browser to start playback. Autoplay policy may reject this.
    pub async fn start(&self) -> Result<(), PlayRejected> {
        let promise = self.element.play().map_err(|_| PlayRejected)?;
        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|_| PlayRejected)
    }
}

impl PlaybackHandle for WebAudio {
    fn paused(&self) -> bool {
        self.element.paused()
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn duration(&self) -> f64 {
        self.element.duration()
    }

    fn pause(&mut self) {
        let _ = self.element.pause();
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
    }
}

type Callback = Closure<dyn FnMut()>;

/// Media notification listeners on one audio element.
///
/// Dropping the guard detaches every listener.
pub struct MediaListeners {
    target: HtmlAudioElement,
    callbacks: Vec<(&'static str, Callback)>,
}

impl MediaListeners {
    pub fn attach(audio: &WebAudio, on_event: impl Fn(MediaEvent) + 'static) -> Self {
        let target = audio.element().clone();
        let on_event: Rc<dyn Fn(MediaEvent)> = Rc::new(on_event);

        let callbacks = MediaEvent::ALL
            .into_iter()
            .map(|event| {
                let on_event = on_event.clone();
                let callback = Closure::wrap(Box::new(move || on_event(event)) as Box<dyn FnMut()>);
                let _ = target
                    .add_event_listener_with_callback(event.name(), callback.as_ref().unchecked_ref());
                (event.name(), callback)
            })
            .collect();

        Self { target, callbacks }
    }
}

impl Drop for MediaListeners {
    fn drop(&mut self) {
        for (name, callback) in &self.callbacks {
            let _ = self
                .target
                .remove_event_listener_with_callback(name, callback.as_ref().unchecked_ref());
        }
    }
}
