use crate::audio::{MediaListeners, WebAudio};
use crate::dom::{DomView, track_ref};
use gatefold_core::{ClickOutcome, MediaEvent, PlayTicket, Player, PlayerConfig, TrackRef};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{console, Document, Window};

/// One mounted player and the listeners of its current handle.
///
/// The player is never borrowed across an await; async completions
/// re-borrow it and report through tickets.
pub struct App {
    player: RefCell<Player<WebAudio, DomView>>,
    listeners: RefCell<Option<MediaListeners>>,
}

impl App {
    /// Locate the page elements, wire clicks, scrubbing and unload.
    ///
    /// Page-level listeners live as long as the page.
    pub fn mount(window: &Window, document: &Document, config: PlayerConfig) -> Result<Rc<Self>, JsValue> {
        let scrub_enabled = config.scrub;
        let view = DomView::locate(document, &config);
        let tracks = view.track_elements().to_vec();
        let scrub = view.scrub_input().cloned();

        let mut player = Player::new(config, view);
        player.mount();

        let app = Rc::new(Self {
            player: RefCell::new(player),
            listeners: RefCell::new(None),
        });

        for element in tracks {
            let app = app.clone();
            let target = element.clone();
            let on_click = Closure::wrap(Box::new(move || {
                if let Some(track) = track_ref(&target) {
                    app.on_track_click(track);
                }
            }) as Box<dyn FnMut()>);
            element.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
            on_click.forget();
        }

        if scrub_enabled && let Some(input) = scrub {
            let app = app.clone();
            let target = input.clone();
            let on_input = Closure::wrap(Box::new(move || {
                app.player.borrow_mut().scrub(target.value_as_number());
            }) as Box<dyn FnMut()>);
            input.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
            on_input.forget();
        }

        {
            let app = app.clone();
            let on_unload = Closure::wrap(Box::new(move || {
                app.player.borrow_mut().unload();
                app.listeners.borrow_mut().take();
            }) as Box<dyn FnMut()>);
            window.add_event_listener_with_callback("beforeunload", on_unload.as_ref().unchecked_ref())?;
            on_unload.forget();
        }

        Ok(app)
    }

    pub fn unload(&self) {
        self.player.borrow_mut().unload();
        self.listeners.borrow_mut().take();
    }

    fn on_track_click(self: &Rc<Self>, track: TrackRef) {
        let outcome = self.player.borrow_mut().click(track, WebAudio::open);
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                // The previous handle was already stopped and dropped
                self.listeners.borrow_mut().take();
                console::warn_2(&"gatefold: could not open audio".into(), &err);
                return;
            }
        };

        if let ClickOutcome::Start(_) = outcome {
            self.watch_active_handle();
        }
        if let Some(ticket) = outcome.play_ticket() {
            self.start_playback(ticket);
        }
    }

    /// Replace the media listeners with ones bound to the new handle
    fn watch_active_handle(self: &Rc<Self>) {
        let (audio, generation) = {
            let player = self.player.borrow();
            (player.handle().cloned(), player.generation())
        };
        let Some(audio) = audio else {
            return;
        };

        let weak = Rc::downgrade(self);
        let listeners = MediaListeners::attach(&audio, move |event| {
            if let Some(app) = weak.upgrade() {
                app.on_media_event(generation, event);
            }
        });
        *self.listeners.borrow_mut() = Some(listeners);
    }

    fn start_playback(self: &Rc<Self>, ticket: PlayTicket) {
        let Some(audio) = self.player.borrow().handle().cloned() else {
            return;
        };
        let weak = Rc::downgrade(self);
        wasm_bindgen_futures::spawn_local(async move {
            let result = audio.start().await;
            if let Some(app) = weak.upgrade() {
                app.player.borrow_mut().play_settled(ticket, result);
            }
        });
    }

    fn on_media_event(self: &Rc<Self>, generation: u64, event: MediaEvent) {
        let restore = self.player.borrow_mut().on_media_event(generation, event);
        let Some(ticket) = restore else {
            return;
        };

        let weak = Rc::downgrade(self);
        let delay_ms = u32::try_from(ticket.delay.as_millis()).unwrap_or(u32::MAX);
        wasm_bindgen_futures::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(delay_ms).await;
            if let Some(app) = weak.upgrade() {
                app.player.borrow_mut().restore_label(ticket);
            }
        });
    }
}
