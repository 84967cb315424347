//! Playback state machine for a gatefold player.
//!
//! The player owns at most one playback handle and mirrors its state into a
//! [`PlayerView`]. It never awaits anything itself: starting playback and the
//! delayed label restore hand back tickets, and the caller reports their
//! completion once the host resolves them. Each ticket and each media
//! notification carries the generation of the handle it belongs to, so
//! completions for a handle that has since been replaced are dropped.

use crate::types::{format_readout, scrub_percent, Messages, PlayerConfig, TrackRef};
use std::fmt;
use std::time::Duration;

/// A loaded, playable audio resource.
///
/// Starting playback is asynchronous on every host and happens outside the
/// player; see [`ClickOutcome`].
pub trait PlaybackHandle {
    fn paused(&self) -> bool;
    /// Elapsed position in seconds
    fn current_time(&self) -> f64;
    /// Total length in seconds; NaN or infinite while unknown
    fn duration(&self) -> f64;
    fn pause(&mut self);
    fn set_current_time(&mut self, seconds: f64);
}

/// The player's output surface. Implementations skip updates for elements
/// that do not exist.
pub trait PlayerView {
    fn set_status(&mut self, text: &str);
    fn set_time_readout(&mut self, text: &str);
    fn set_scrub_value(&mut self, percent: f64);
    fn set_spinning(&mut self, on: bool);
    /// Mirror the active track onto the record label or cover
    fn show_track_label(&mut self, label: &str);
    /// Put the record label or cover back to its base state
    fn show_idle_label(&mut self);
    fn reveal_track(&mut self, track: &TrackRef);
}

/// Native notifications from the active playback handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    LoadedMetadata,
    TimeUpdate,
    Play,
    Pause,
    Ended,
}

impl MediaEvent {
    pub const ALL: [MediaEvent; 5] = [
        MediaEvent::LoadedMetadata,
        MediaEvent::TimeUpdate,
        MediaEvent::Play,
        MediaEvent::Pause,
        MediaEvent::Ended,
    ];

    /// DOM event name
    pub fn name(self) -> &'static str {
        match self {
            MediaEvent::LoadedMetadata => "loadedmetadata",
            MediaEvent::TimeUpdate => "timeupdate",
            MediaEvent::Play => "play",
            MediaEvent::Pause => "pause",
            MediaEvent::Ended => "ended",
        }
    }
}

/// The host refused to start playback, typically an autoplay restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayRejected;

impl fmt::Display for PlayRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "playback start was rejected")
    }
}

impl std::error::Error for PlayRejected {}

/// A pending playback start for one handle generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayTicket {
    generation: u64,
}

impl PlayTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A delayed label restore scheduled when a track ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreTicket {
    generation: u64,
    pub delay: Duration,
}

/// What a click asks the caller to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A new handle was created; start it and report via [`Player::play_settled`]
    Start(PlayTicket),
    /// The active handle is paused; start it again and report back
    Resume(PlayTicket),
    /// The active handle was playing and is now paused
    Paused,
}

impl ClickOutcome {
    pub fn play_ticket(&self) -> Option<PlayTicket> {
        match self {
            ClickOutcome::Start(ticket) | ClickOutcome::Resume(ticket) => Some(*ticket),
            ClickOutcome::Paused => None,
        }
    }
}

struct Active<H> {
    track: TrackRef,
    handle: H,
}

pub struct Player<H, V> {
    config: PlayerConfig,
    view: V,
    active: Option<Active<H>>,
    generation: u64,
}

impl<H: PlaybackHandle, V: PlayerView> Player<H, V> {
    pub fn new(config: PlayerConfig, view: V) -> Self {
        Self {
            config,
            view,
            active: None,
            generation: 0,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Generation of the current handle; bumped on every new handle and on unload
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.track.id.as_str())
    }

    pub fn handle(&self) -> Option<&H> {
        self.active.as_ref().map(|a| &a.handle)
    }

    pub fn handle_mut(&mut self) -> Option<&mut H> {
        self.active.as_mut().map(|a| &mut a.handle)
    }

    /// Initial page state: idle label, no spin.
    pub fn mount(&mut self) {
        self.set_spinning(false);
        self.view.show_idle_label();
    }

    /// Handle a click on a track element.
    ///
    /// Clicking the active track toggles it. Any other track stops and
    /// discards the active handle, then `open` creates the new one.
    pub fn click<F, E>(&mut self, track: TrackRef, open: F) -> Result<ClickOutcome, E>
    where
        F: FnOnce(&str) -> Result<H, E>,
    {
        if self.config.reveal_on_click {
            self.view.reveal_track(&track);
        }

        if let Some(active) = self.active.as_mut()
            && active.track.id == track.id
        {
            if active.handle.paused() {
                tracing::debug!(id = %track.id, "resume requested");
                return Ok(ClickOutcome::Resume(PlayTicket {
                    generation: self.generation,
                }));
            }

            active.handle.pause();
            let status = Messages::render(&self.config.messages.paused, &active.track.label);
            self.set_spinning(false);
            self.view.set_status(&status);
            tracing::debug!(id = %track.id, "paused");
            return Ok(ClickOutcome::Paused);
        }

        self.stop();
        // Drop the old handle before opening the next one
        self.active = None;

        let handle = open(&track.src)?;
        self.generation += 1;
        tracing::debug!(id = %track.id, src = %track.src, generation = self.generation, "switched track");

        let status = Messages::render(&self.config.messages.now_playing, &track.label);
        self.view.set_status(&status);
        if self.config.scrub {
            self.view.set_scrub_value(0.0);
        }
        if self.config.time_readout {
            self.view.set_time_readout(&format_readout(0.0, 0.0));
        }
        self.view.show_track_label(&track.label);

        self.active = Some(Active { track, handle });

        Ok(ClickOutcome::Start(PlayTicket {
            generation: self.generation,
        }))
    }

    /// Report the result of a start requested by [`Player::click`].
    ///
    /// A rejection is not an error: the disc stays still and the status
    /// line asks for another click.
    pub fn play_settled(&mut self, ticket: PlayTicket, result: Result<(), PlayRejected>) {
        if ticket.generation != self.generation {
            tracing::debug!(ticket = ticket.generation, current = self.generation, "stale play result");
            return;
        }
        let Some(label) = self.active.as_ref().map(|a| a.track.label.clone()) else {
            return;
        };

        match result {
            Ok(()) => {
                self.set_spinning(true);
                let status = Messages::render(&self.config.messages.now_playing, &label);
                self.view.set_status(&status);
                self.view.show_track_label(&label);
            }
            Err(PlayRejected) => {
                tracing::debug!(%label, "playback start rejected");
                self.set_spinning(false);
                let status = Messages::render(&self.config.messages.retry, &label);
                self.view.set_status(&status);
            }
        }
    }

    /// Mirror a native notification from the handle of `generation`.
    ///
    /// Returns a restore ticket when the track has ended.
    pub fn on_media_event(&mut self, generation: u64, event: MediaEvent) -> Option<RestoreTicket> {
        if generation != self.generation || self.active.is_none() {
            return None;
        }

        match event {
            MediaEvent::LoadedMetadata | MediaEvent::TimeUpdate => {
                self.sync();
                None
            }
            MediaEvent::Play => {
                self.set_spinning(true);
                None
            }
            MediaEvent::Pause => {
                self.set_spinning(false);
                None
            }
            MediaEvent::Ended => {
                self.set_spinning(false);
                if let Some(active) = &self.active {
                    let status =
                        Messages::render(&self.config.messages.finished, &active.track.label);
                    self.view.set_status(&status);
                }
                self.sync();
                Some(RestoreTicket {
                    generation: self.generation,
                    delay: self.config.restore_delay(),
                })
            }
        }
    }

    /// Fire a restore scheduled by an `Ended` notification.
    ///
    /// Skipped when another track has started or the ended track is playing again.
    pub fn restore_label(&mut self, ticket: RestoreTicket) {
        if ticket.generation != self.generation {
            return;
        }
        if self.active.as_ref().is_some_and(|a| !a.handle.paused()) {
            return;
        }
        self.view.show_idle_label();
    }

    /// Seek from the scrub control. `value` is a percentage of the duration.
    pub fn scrub(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let duration = active.handle.duration();
        if !duration.is_finite() || duration <= 0.0 {
            return;
        }

        let target = ((value / 100.0) * duration).clamp(0.0, duration);
        active.handle.set_current_time(target);
        self.sync();
    }

    /// The page is going away: stop playback and show the idle label.
    pub fn unload(&mut self) {
        self.stop();
        self.active = None;
        self.generation += 1;
        self.view.show_idle_label();
    }

    /// Pause and rewind the active handle, keeping the label as it is.
    fn stop(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.handle.pause();
        active.handle.set_current_time(0.0);
        self.set_spinning(false);
        self.sync();
    }

    /// Render the readout and scrub position from the active handle.
    fn sync(&mut self) {
        let Some(active) = self.active.as_ref() else {
            return;
        };
        let elapsed = active.handle.current_time();
        let duration = active.handle.duration();

        if self.config.time_readout {
            self.view.set_time_readout(&format_readout(elapsed, duration));
        }
        if self.config.scrub {
            self.view.set_scrub_value(scrub_percent(elapsed, duration));
        }
    }

    fn set_spinning(&mut self, on: bool) {
        if self.config.spin {
            self.view.set_spinning(on);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Debug)]
    struct MockHandle {
        src: String,
        paused: bool,
        time: f64,
        duration: f64,
        journal: Option<Rc<RefCell<Vec<String>>>>,
    }

    impl MockHandle {
        fn open(src: &str) -> Result<Self, Infallible> {
            Ok(Self {
                src: src.to_string(),
                paused: true,
                time: 0.0,
                duration: f64::NAN,
                journal: None,
            })
        }

        fn note(&self, entry: String) {
            if let Some(journal) = &self.journal {
                journal.borrow_mut().push(entry);
            }
        }
    }

    impl PlaybackHandle for MockHandle {
        fn paused(&self) -> bool {
            self.paused
        }
        fn current_time(&self) -> f64 {
            self.time
        }
        fn duration(&self) -> f64 {
            self.duration
        }
        fn pause(&mut self) {
            self.note(format!("{} pause", self.src));
            self.paused = true;
        }
        fn set_current_time(&mut self, seconds: f64) {
            self.note(format!("{} seek {}", self.src, seconds));
            self.time = seconds;
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Label {
        Idle,
        Track(String),
    }

    #[derive(Debug)]
    struct RecordingView {
        status: String,
        readout: Option<String>,
        scrub: Option<f64>,
        spinning: bool,
        label: Label,
        revealed: Vec<String>,
    }

    impl Default for RecordingView {
        fn default() -> Self {
            Self {
                status: String::new(),
                readout: None,
                scrub: None,
                spinning: false,
                label: Label::Track("stale".to_string()),
                revealed: Vec::new(),
            }
        }
    }

    impl PlayerView for RecordingView {
        fn set_status(&mut self, text: &str) {
            self.status = text.to_string();
        }
        fn set_time_readout(&mut self, text: &str) {
            self.readout = Some(text.to_string());
        }
        fn set_scrub_value(&mut self, percent: f64) {
            self.scrub = Some(percent);
        }
        fn set_spinning(&mut self, on: bool) {
            self.spinning = on;
        }
        fn show_track_label(&mut self, label: &str) {
            self.label = Label::Track(label.to_string());
        }
        fn show_idle_label(&mut self) {
            self.label = Label::Idle;
        }
        fn reveal_track(&mut self, track: &TrackRef) {
            self.revealed.push(track.id.clone());
        }
    }

    type TestPlayer = Player<MockHandle, RecordingView>;

    fn player() -> TestPlayer {
        let mut player = Player::new(PlayerConfig::default(), RecordingView::default());
        player.mount();
        player
    }

    fn track(id: &str) -> TrackRef {
        TrackRef {
            src: format!("audio/{id}.mp3"),
            label: format!("Track {id}"),
            id: id.to_string(),
        }
    }

    /// Click and let the host start playback successfully.
    fn click_and_play(player: &mut TestPlayer, id: &str) -> ClickOutcome {
        let outcome = player.click(track(id), MockHandle::open).unwrap();
        if let Some(ticket) = outcome.play_ticket() {
            player.handle_mut().unwrap().paused = false;
            let generation = player.generation();
            player.play_settled(ticket, Ok(()));
            player.on_media_event(generation, MediaEvent::Play);
        }
        outcome
    }

    #[test]
    fn test_mount_shows_idle_label() {
        let player = player();
        assert_eq!(player.view().label, Label::Idle);
        assert!(!player.view().spinning);
        assert!(player.handle().is_none());
    }

    #[test]
    fn test_first_click_starts_new_handle() {
        let mut player = player();
        let outcome = player.click(track("a1"), MockHandle::open).unwrap();

        assert!(matches!(outcome, ClickOutcome::Start(_)));
        assert_eq!(player.current_id(), Some("a1"));
        assert_eq!(player.handle().unwrap().src, "audio/a1.mp3");
        assert_eq!(player.view().status, "Now playing: Track a1");
        assert_eq!(player.view().readout.as_deref(), Some("0:00 / 0:00"));
        assert_eq!(player.view().scrub, Some(0.0));
        assert_eq!(player.view().label, Label::Track("Track a1".to_string()));
        assert_eq!(player.view().revealed, vec!["a1".to_string()]);

        player.handle_mut().unwrap().paused = false;
        player.play_settled(outcome.play_ticket().unwrap(), Ok(()));
        assert!(player.view().spinning);
    }

    #[test]
    fn test_click_active_track_toggles_without_new_handle() {
        let mut player = player();
        click_and_play(&mut player, "a1");
        let generation = player.generation();
        player.handle_mut().unwrap().time = 42.0;

        let outcome = player.click(track("a1"), MockHandle::open).unwrap();
        assert_eq!(outcome, ClickOutcome::Paused);
        assert!(player.handle().unwrap().paused);
        assert!(!player.view().spinning);
        assert_eq!(player.view().status, "Paused: Track a1");
        assert_eq!(player.generation(), generation);
        assert_eq!(player.handle().unwrap().time, 42.0);

        let outcome = player.click(track("a1"), MockHandle::open).unwrap();
        let ClickOutcome::Resume(ticket) = outcome else {
            panic!("expected resume, got {outcome:?}");
        };
        assert_eq!(ticket.generation(), generation);
        player.handle_mut().unwrap().paused = false;
        player.play_settled(ticket, Ok(()));

        assert!(player.view().spinning);
        assert_eq!(player.view().status, "Now playing: Track a1");
        assert_eq!(player.handle().unwrap().time, 42.0);
        assert_eq!(player.generation(), generation);
    }

    #[test]
    fn test_click_other_track_stops_previous() {
        let mut player = player();
        click_and_play(&mut player, "a1");
        let first_generation = player.generation();
        player.handle_mut().unwrap().time = 90.0;

        let outcome = player.click(track("b1"), MockHandle::open).unwrap();
        assert!(matches!(outcome, ClickOutcome::Start(_)));
        assert_eq!(player.current_id(), Some("b1"));
        assert_eq!(player.handle().unwrap().src, "audio/b1.mp3");
        assert_eq!(player.handle().unwrap().time, 0.0);
        assert!(player.generation() > first_generation);
        assert!(!player.view().spinning);
        assert_eq!(player.view().readout.as_deref(), Some("0:00 / 0:00"));
        assert_eq!(player.view().label, Label::Track("Track b1".to_string()));
    }

    #[test]
    fn test_switch_pauses_and_rewinds_old_handle() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let mut player = player();
        let first = player
            .click(track("a1"), |src| {
                Ok::<_, Infallible>(MockHandle {
                    journal: Some(journal.clone()),
                    ..MockHandle::open(src)?
                })
            })
            .unwrap();
        player.handle_mut().unwrap().paused = false;
        player.play_settled(first.play_ticket().unwrap(), Ok(()));
        player.handle_mut().unwrap().time = 90.0;

        player.click(track("b1"), MockHandle::open).unwrap();
        assert_eq!(
            *journal.borrow(),
            ["audio/a1.mp3 pause", "audio/a1.mp3 seek 0"]
        );
        assert!(!player.view().spinning);
    }

    #[test]
    fn test_failed_open_leaves_player_idle() {
        let mut player = player();
        click_and_play(&mut player, "a1");

        let result = player.click(track("b1"), |_| Err("no audio"));
        assert_eq!(result, Err("no audio"));
        assert!(player.handle().is_none());
        assert!(player.current_id().is_none());
        assert!(!player.view().spinning);
    }

    #[test]
    fn test_autoplay_rejection_sets_retry_hint() {
        let mut player = player();
        let outcome = player.click(track("a1"), MockHandle::open).unwrap();
        player.play_settled(outcome.play_ticket().unwrap(), Err(PlayRejected));

        assert!(!player.view().spinning);
        assert_eq!(player.view().status, "Tap again to play: Track a1");
        assert_eq!(player.current_id(), Some("a1"));

        // The next click on the same track retries on the same handle
        let generation = player.generation();
        let outcome = player.click(track("a1"), MockHandle::open).unwrap();
        assert!(matches!(outcome, ClickOutcome::Resume(_)));
        assert_eq!(player.generation(), generation);
    }

    #[test]
    fn test_resume_rejection_sets_retry_hint() {
        let mut player = player();
        click_and_play(&mut player, "a1");
        let generation = player.generation();
        player.handle_mut().unwrap().time = 42.0;

        assert_eq!(
            player.click(track("a1"), MockHandle::open).unwrap(),
            ClickOutcome::Paused
        );
        let outcome = player.click(track("a1"), MockHandle::open).unwrap();
        let ClickOutcome::Resume(ticket) = outcome else {
            panic!("expected resume, got {outcome:?}");
        };
        player.play_settled(ticket, Err(PlayRejected));

        assert!(!player.view().spinning);
        assert_eq!(player.view().status, "Tap again to play: Track a1");
        assert_eq!(player.generation(), generation);
        assert_eq!(player.current_id(), Some("a1"));
        assert_eq!(player.handle().unwrap().time, 42.0);
    }

    #[test]
    fn test_stale_play_result_is_ignored() {
        let mut player = player();
        let first = player.click(track("a1"), MockHandle::open).unwrap();
        player.click(track("b1"), MockHandle::open).unwrap();

        player.play_settled(first.play_ticket().unwrap(), Ok(()));
        assert!(!player.view().spinning);
        assert_eq!(player.view().status, "Now playing: Track b1");

        player.play_settled(first.play_ticket().unwrap(), Err(PlayRejected));
        assert_eq!(player.view().status, "Now playing: Track b1");
    }

    #[test]
    fn test_media_events_mirror_spin_state() {
        let mut player = player();
        click_and_play(&mut player, "a1");
        let generation = player.generation();

        player.on_media_event(generation, MediaEvent::Pause);
        assert!(!player.view().spinning);
        player.on_media_event(generation, MediaEvent::Play);
        assert!(player.view().spinning);
    }

    #[test]
    fn test_stale_media_events_are_ignored() {
        let mut player = player();
        click_and_play(&mut player, "a1");
        let old = player.generation();
        click_and_play(&mut player, "b1");
        assert!(player.view().spinning);

        // The old element reports its pause after the switch
        assert!(player.on_media_event(old, MediaEvent::Pause).is_none());
        assert!(player.view().spinning);
        assert!(player.on_media_event(old, MediaEvent::Ended).is_none());
        assert_eq!(player.view().status, "Now playing: Track b1");
    }

    #[test]
    fn test_time_update_renders_readout_and_scrub() {
        let mut player = player();
        click_and_play(&mut player, "a1");
        let generation = player.generation();

        let handle = player.handle_mut().unwrap();
        handle.duration = 200.0;
        handle.time = 50.0;
        player.on_media_event(generation, MediaEvent::TimeUpdate);
        assert_eq!(player.view().readout.as_deref(), Some("0:50 / 3:20"));
        assert_eq!(player.view().scrub, Some(25.0));

        player.handle_mut().unwrap().duration = f64::INFINITY;
        player.on_media_event(generation, MediaEvent::LoadedMetadata);
        assert_eq!(player.view().readout.as_deref(), Some("0:50 / 0:00"));
        assert_eq!(player.view().scrub.map(|v| v.to_string()).as_deref(), Some("0"));
    }

    #[test]
    fn test_disabled_readout_and_scrub_are_not_rendered() {
        let config = PlayerConfig {
            scrub: false,
            time_readout: false,
            spin: false,
            ..PlayerConfig::default()
        };
        let mut player = Player::new(config, RecordingView::default());
        click_and_play(&mut player, "a1");
        let generation = player.generation();
        player.on_media_event(generation, MediaEvent::TimeUpdate);

        assert!(player.view().readout.is_none());
        assert!(player.view().scrub.is_none());
        assert!(!player.view().spinning);
    }

    #[test]
    fn test_scrub_seeks_by_percentage() {
        let mut player = player();
        click_and_play(&mut player, "a1");
        player.handle_mut().unwrap().duration = 200.0;

        player.scrub(25.0);
        assert_eq!(player.handle().unwrap().time, 50.0);
        assert_eq!(player.view().readout.as_deref(), Some("0:50 / 3:20"));

        player.scrub(150.0);
        assert_eq!(player.handle().unwrap().time, 200.0);

        player.scrub(f64::NAN);
        assert_eq!(player.handle().unwrap().time, 200.0);
    }

    #[test]
    fn test_scrub_without_duration_does_nothing() {
        let mut player = player();
        player.scrub(50.0);
        assert!(player.view().readout.is_none());

        click_and_play(&mut player, "a1");
        player.handle_mut().unwrap().time = 3.0;
        player.scrub(50.0);
        assert_eq!(player.handle().unwrap().time, 3.0);

        player.handle_mut().unwrap().duration = 0.0;
        player.scrub(50.0);
        assert_eq!(player.handle().unwrap().time, 3.0);
    }

    #[test]
    fn test_end_of_track_restores_idle_label_after_delay() {
        let mut player = player();
        click_and_play(&mut player, "a1");
        let generation = player.generation();
        player.handle_mut().unwrap().paused = true;

        let ticket = player
            .on_media_event(generation, MediaEvent::Ended)
            .expect("ended schedules a restore");
        assert_eq!(ticket.delay, Duration::from_millis(700));
        assert!(!player.view().spinning);
        assert_eq!(player.view().status, "Finished: Track a1");
        assert_eq!(player.view().label, Label::Track("Track a1".to_string()));

        player.restore_label(ticket);
        assert_eq!(player.view().label, Label::Idle);
    }

    #[test]
    fn test_restore_skipped_when_new_track_started() {
        let mut player = player();
        click_and_play(&mut player, "a1");
        let generation = player.generation();
        player.handle_mut().unwrap().paused = true;
        let ticket = player.on_media_event(generation, MediaEvent::Ended).unwrap();

        click_and_play(&mut player, "b1");
        player.restore_label(ticket);
        assert_eq!(player.view().label, Label::Track("Track b1".to_string()));
    }

    #[test]
    fn test_restore_skipped_when_replayed() {
        let mut player = player();
        click_and_play(&mut player, "a1");
        let generation = player.generation();
        player.handle_mut().unwrap().paused = true;
        let ticket = player.on_media_event(generation, MediaEvent::Ended).unwrap();

        let outcome = click_and_play(&mut player, "a1");
        assert!(matches!(outcome, ClickOutcome::Resume(_)));
        player.restore_label(ticket);
        assert_eq!(player.view().label, Label::Track("Track a1".to_string()));
    }

    #[test]
    fn test_unload_stops_and_restores() {
        let mut player = player();
        click_and_play(&mut player, "a1");
        let generation = player.generation();

        player.unload();
        assert!(player.handle().is_none());
        assert!(!player.view().spinning);
        assert_eq!(player.view().label, Label::Idle);
        assert!(player.on_media_event(generation, MediaEvent::Play).is_none());
        assert!(!player.view().spinning);
    }

    #[test]
    fn test_reveal_can_be_disabled() {
        let config = PlayerConfig {
            reveal_on_click: false,
            ..PlayerConfig::default()
        };
        let mut player = Player::new(config, RecordingView::default());
        player.click(track("a1"), MockHandle::open).unwrap();
        assert!(player.view().revealed.is_empty());
    }

    #[test]
    fn test_media_event_names() {
        let names: Vec<_> = MediaEvent::ALL.iter().map(|e| e.name()).collect();
        assert_eq!(names, ["loadedmetadata", "timeupdate", "play", "pause", "ended"]);
    }
}
