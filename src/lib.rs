//! EduCast playback core
//!
//! # What this crate is
//! The headless playback controller behind EduCast's two player surfaces:
//! the audio mini-player docked on every page, and the full video player.
//! Professors publish episodes; this crate is the part that plays them,
//! counts the view, and keeps the transport widgets honest.
//!
//! # How it works (simple mental model)
//! Think "message loop", split across a seam:
//!
//! - [`Player`] = the abstract transport state (what the UI renders)
//! - [`PlayerInput`] = "something happened" (button pressed, element event)
//! - `apply(input)` = handles that thing and updates state
//! - the media element = a separate thread (or the host's own machinery)
//!   that owns the actual resource, driven over a command channel
//!
//! The player is optimistic about play/pause (flip now, roll back if the
//! element rejects the start) and strict about fullscreen (flip only when
//! the platform confirms). Element events are the only path by which the
//! resource corrects the abstract state.
//!
//! # Concurrency model
//! The controller itself is single-threaded; call it from the host's UI
//! loop. The desktop audio element and the engagement worker each run on
//! their own thread and talk through channels. Nothing here blocks on the
//! network or the audio device.
//!
//! ```no_run
//! use educast_player::{Player, PlayerInput, TrackerConfig, Viewer};
//!
//! let mut player = Player::desktop_audio(
//!     Viewer::User("student-17".into()),
//!     TrackerConfig::default(),
//! );
//!
//! # let episode: educast_player::Episode = todo!();
//! player.apply(PlayerInput::Load(episode));
//! player.apply(PlayerInput::TogglePlay);
//!
//! // From the host's timer, a few times a second:
//! player.tick();
//! ```

pub mod core;
pub mod player;

pub use crate::core::element::{
    ElementCommand, ElementEvent, ElementHandle, MediaSource, channel as element_channel,
    start_element,
};
pub use crate::core::tracker::{
    TrackerConfig, TrackerHandle, TrackerRequest, channel as tracker_channel, start_tracker,
};
pub use crate::core::types::{Episode, MediaKind, Viewer};
pub use crate::player::Player;
pub use crate::player::captions::{CaptionTrack, Cue};
pub use crate::player::share::{DownloadRequest, PlatformHook, ShareContext};
pub use crate::player::state::{
    AUDIO_RATES, DEFAULT_SKIP_SECS, Notice, NoticeLevel, Phase, PlayerInput, Surface, VIDEO_RATES,
};
pub use crate::player::util::format_timestamp;
