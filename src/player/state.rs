//! player/state.rs
//! Player data definitions: phases, surface capabilities, inputs, notices.
//! Pure data used by mod.rs + the update modules.

use std::time::Duration;

use crate::core::element::ElementEvent;
use crate::core::types::Episode;

/// Seek step the EduCast transport buttons use.
pub const DEFAULT_SKIP_SECS: f64 = 10.0;

/// A play starting before this offset counts as a fresh start (a "view"),
/// not a resume from pause.
pub(crate) const VIEW_THRESHOLD_SECS: f64 = 1.0;

/// Inactivity window before the video controls hide during playback.
pub(crate) const CONTROLS_HIDE_AFTER: Duration = Duration::from_secs(3);

/// Speed steps offered by the audio mini-player.
pub const AUDIO_RATES: [f32; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// Speed steps offered by the full video player. Finer grained, but still a
/// fixed menu.
pub const VIDEO_RATES: [f32; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];

/// Where the transport is on the playback axis.
///
/// `Ended` is re-enterable: a seek drops back to `Paused`, a play goes
/// straight to `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No resource bound.
    Idle,
    /// Resource bound, metadata not in yet.
    Loading,
    Paused,
    Playing,
    Ended,
}

/// What the mounted surface can do. One state machine serves both EduCast
/// surfaces; these flags are the only difference between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub has_video: bool,
    pub has_captions: bool,
    pub has_fullscreen: bool,
}

impl Surface {
    /// The audio mini-player docked at the bottom of the page.
    pub fn mini_audio() -> Self {
        Self {
            has_video: false,
            has_captions: false,
            has_fullscreen: false,
        }
    }

    /// The full-screen-capable video player.
    pub fn full_video() -> Self {
        Self {
            has_video: true,
            has_captions: true,
            has_fullscreen: true,
        }
    }

    /// The speed menu this surface offers.
    pub fn rates(&self) -> &'static [f32] {
        if self.has_video {
            &VIDEO_RATES
        } else {
            &AUDIO_RATES
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient, non-blocking message for the host to toast and drop.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub(crate) fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub(crate) fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub(crate) fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Input = "something happened".
///
/// Commands come from the host's widgets; `Element` wraps everything the
/// underlying media resource reports back. The router in `update` matches on
/// these and mutates the player accordingly.
#[derive(Debug, Clone)]
pub enum PlayerInput {
    /// Bind a new episode; resets the playback session.
    Load(Episode),
    TogglePlay,
    /// Absolute position in seconds; clamped to the known duration.
    Seek(f64),
    /// Relative jump in seconds (negative = back).
    Skip(f64),
    /// 0.0..=1.0; zero mutes.
    SetVolume(f32),
    ToggleMute,
    /// Must be one of the surface's enumerated rates.
    SetRate(f32),
    ToggleCaptions,
    ToggleFullscreen,
    /// Pointer moved over the video surface; wakes the controls.
    PointerMoved,
    /// Periodic host tick: drives the controls auto-hide deadline.
    Tick,
    /// Collapse the video surface down to the audio mini-player.
    Minimize,
    ToggleLike,
    /// An event from the underlying media element.
    Element(ElementEvent),
}
