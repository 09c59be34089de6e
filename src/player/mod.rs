//! player/mod.rs
//!
//! The playback controller: one mounted player surface, one bound episode,
//! one underlying media element.
//!
//! This folder contains ONLY controller concerns:
//! - player state + inputs ('state')
//! - update logic ('update')
//! - caption synthesis ('captions')
//! - download/share affordances ('share')
//! - small pure helpers ('util')
//!
//! The host renders from the accessors, feeds widget events in through
//! [`Player::apply`], and calls [`Player::tick`] on a timer (a few times a
//! second is plenty) to drain element events and drive the controls
//! auto-hide countdown.

pub mod captions;
pub mod share;
pub mod state;
mod update;
pub mod util;

use std::sync::mpsc::Receiver;

use crate::core::element::{self, ElementCommand, ElementEvent, ElementHandle};
use crate::core::tracker::{self, TrackerConfig, TrackerHandle};
use crate::core::types::{Episode, Viewer};

use captions::{CaptionTrack, Cue};
use share::{DownloadRequest, ShareContext};
use state::{Notice, Phase, PlayerInput, Surface};

/// The playback controller for one mounted player surface.
///
/// All of the transport state the host renders lives here, deliberately
/// separate from whatever the underlying element believes: commands flow
/// down through the element handle, corrections flow back as events.
pub struct Player {
    // Collaborators
    pub(crate) element: ElementHandle,
    element_events: Receiver<ElementEvent>,
    pub(crate) tracker: TrackerHandle,

    // Session
    pub(crate) surface: Surface,
    pub(crate) viewer: Viewer,
    pub(crate) episode: Option<Episode>,
    pub(crate) captions: Option<CaptionTrack>,

    // Transport
    pub(crate) phase: Phase,
    /// Intended state; optimistic, corrected by StartRejected.
    pub(crate) is_playing: bool,
    pub(crate) position_secs: f64,
    /// None until the element reports metadata (or the episode carries a
    /// hint).
    pub(crate) duration_secs: Option<f64>,
    /// Last audible volume; survives mute round trips.
    pub(crate) volume: f32,
    pub(crate) muted: bool,
    /// Whether the current mute came from dragging the volume to zero.
    pub(crate) muted_by_volume: bool,
    pub(crate) rate: f32,
    pub(crate) captions_on: bool,
    /// Confirmed-only; flips on FullscreenEntered/Exited events.
    pub(crate) fullscreen: bool,
    pub(crate) controls_visible: bool,
    pub(crate) controls_hide_at: Option<std::time::Instant>,
    /// At most one view registration per playback session.
    pub(crate) view_registered: bool,
    pub(crate) liked: bool,

    pub(crate) notice: Option<Notice>,
}

impl Player {
    /// Wire a player to an element you run yourself (see
    /// [`element::channel`]) and a tracker handle.
    pub fn new(
        surface: Surface,
        viewer: Viewer,
        element: ElementHandle,
        element_events: Receiver<ElementEvent>,
        tracker: TrackerHandle,
    ) -> Self {
        Self {
            element,
            element_events,
            tracker,
            surface,
            viewer,
            episode: None,
            captions: None,
            phase: Phase::Idle,
            is_playing: false,
            position_secs: 0.0,
            duration_secs: None,
            volume: 1.0,
            muted: false,
            muted_by_volume: false,
            rate: 1.0,
            captions_on: false,
            fullscreen: false,
            controls_visible: true,
            controls_hide_at: None,
            view_registered: false,
            liked: false,
            notice: None,
        }
    }

    /// The batteries-included setup: the rodio audio element plus the HTTP
    /// engagement worker, on the mini-player surface.
    pub fn desktop_audio(viewer: Viewer, tracker_config: TrackerConfig) -> Self {
        let (element, element_events) = element::start_element();
        let tracker = tracker::start_tracker(tracker_config);
        Self::new(
            Surface::mini_audio(),
            viewer,
            element,
            element_events,
            tracker,
        )
    }

    /// Handle one input. This is the whole command surface; widgets map
    /// clicks to [`PlayerInput`]s and nothing else mutates the player.
    pub fn apply(&mut self, input: PlayerInput) {
        update::update(self, input);
    }

    /// Drain pending element events into the state machine.
    pub fn drain_events(&mut self) {
        let rx = &self.element_events;
        let mut drained: Vec<ElementEvent> = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            drained.push(ev);
        }

        for ev in drained {
            self.apply(PlayerInput::Element(ev));
        }
    }

    /// Periodic host tick: drains events, then advances the controls
    /// auto-hide countdown.
    pub fn tick(&mut self) {
        self.drain_events();
        self.apply(PlayerInput::Tick);
    }

    /// Unmount: stop the element and release it. Dropping the player after
    /// this cannot mutate anything; there is no player left to mutate.
    pub fn shutdown(self) {
        self.element.send(ElementCommand::Shutdown);
    }

    // Side affordances (stateless with respect to transport)

    /// The download action for the bound episode, if any.
    pub fn download(&self) -> Option<DownloadRequest> {
        self.episode.as_ref().map(share::download_request)
    }

    /// Share `page_url` through the host platform, clipboard as fallback.
    /// The outcome lands in [`Player::take_notice`].
    pub fn share(&mut self, ctx: &ShareContext, page_url: &str) {
        self.notice = Some(share::share_link(ctx, page_url));
    }

    // Accessors (the UI renders from these)

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_secs
    }

    /// Transport label, e.g. "1:15".
    pub fn position_label(&self) -> String {
        util::format_timestamp(self.position_secs)
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn captions_enabled(&self) -> bool {
        self.captions_on
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn episode(&self) -> Option<&Episode> {
        self.episode.as_ref()
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn liked(&self) -> bool {
        self.liked
    }

    pub fn caption_track(&self) -> Option<&CaptionTrack> {
        self.captions.as_ref()
    }

    /// The caption line to overlay right now, or None when captions are off
    /// or between cues.
    pub fn current_caption(&self) -> Option<&Cue> {
        if !self.captions_on {
            return None;
        }
        self.captions.as_ref()?.cue_at(self.position_secs)
    }

    /// Take the pending transient notice, if any. The host toasts it and
    /// moves on; notices never block playback.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}
