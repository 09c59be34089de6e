//! core/element/mod.rs
//! The media element seam.
//!
//! The player controller never touches rodio/symphonia directly. It talks to
//! "an element": anything that accepts [`ElementCommand`]s and reports back
//! with [`ElementEvent`]s. The desktop audio engine in this module is one
//! such element; a host embedding the crate in a video shell wires its own
//! through [`channel`].
//!
//! Events are the only legitimate channel by which the resource pushes
//! corrections back into the player's abstract state. Nothing polls the
//! element's internal clock.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

mod decoder;
mod engine;

pub use engine::AudioEngine;

/// Where the media bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    Local(PathBuf),
    Remote(String),
}

impl MediaSource {
    /// Classify an episode's `media_url`. Anything that is not http(s) is
    /// treated as a local path.
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("http://") || url.starts_with("https://") {
            MediaSource::Remote(url.to_owned())
        } else {
            MediaSource::Local(PathBuf::from(url))
        }
    }
}

/// Commands the player issues to the element.
#[derive(Debug, PartialEq)]
pub enum ElementCommand {
    /// Bind a new resource. Replaces whatever was loaded before; the element
    /// answers with `Loaded` (or `Error`) once metadata is known.
    Load { source: MediaSource },
    Play,
    Pause,
    /// Seconds.
    Seek(f64),
    /// Effective output volume, 0.0..=1.0. Mute is applied player-side by
    /// sending 0.0 here while the stored volume stays untouched.
    SetVolume(f32),
    SetRate(f32),
    SetCaptionsVisible(bool),
    EnterFullscreen,
    ExitFullscreen,
    Shutdown,
}

/// Events the element reports back.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementEvent {
    /// Metadata is in; `None` when the container hides its length.
    Loaded { duration_secs: Option<f64> },
    /// Periodic position report while playing (and after seeks).
    Position { secs: f64 },
    Ended,
    /// The asynchronous start request was rejected (autoplay policy, decode
    /// failure, missing media). The player rolls its optimistic state back.
    StartRejected(String),
    FullscreenEntered,
    FullscreenExited,
    /// Fullscreen request rejected by the platform; logged, never surfaced.
    FullscreenRejected(String),
    Error(String),
}

/// Clonable command sender for one element instance.
#[derive(Clone)]
pub struct ElementHandle {
    command_tx: Sender<ElementCommand>,
}

impl ElementHandle {
    /// Best-effort send. If the element died, the command is dropped.
    pub fn send(&self, cmd: ElementCommand) {
        let _ = self.command_tx.send(cmd);
    }
}

/// A handle plus the raw command receiver.
///
/// This is the seam custom elements (and tests) plug into: hold the receiver,
/// service the commands, feed events back through your own channel.
pub fn channel() -> (ElementHandle, Receiver<ElementCommand>) {
    let (command_tx, command_rx) = mpsc::channel();
    (ElementHandle { command_tx }, command_rx)
}

/// Spawns the desktop audio engine thread and returns:
/// - ElementHandle (store in the player)
/// - Receiver<ElementEvent> (drain from the host's tick)
pub fn start_element() -> (ElementHandle, Receiver<ElementEvent>) {
    let (handle, command_rx) = channel();
    let (event_tx, event_rx) = mpsc::channel::<ElementEvent>();

    thread::spawn(move || {
        let mut engine = match AudioEngine::new(event_tx.clone()) {
            Ok(e) => e,
            Err(msg) => {
                let _ = event_tx.send(ElementEvent::Error(msg));
                return;
            }
        };

        engine.run(command_rx);
    });

    (handle, event_rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_source_classification() {
        assert_eq!(
            MediaSource::from_url("https://media.educast.test/a.mp3"),
            MediaSource::Remote("https://media.educast.test/a.mp3".into())
        );
        assert_eq!(
            MediaSource::from_url("http://host/b.ogg"),
            MediaSource::Remote("http://host/b.ogg".into())
        );
        assert_eq!(
            MediaSource::from_url("/var/media/c.wav"),
            MediaSource::Local(PathBuf::from("/var/media/c.wav"))
        );
    }

    #[test]
    fn handle_survives_dead_receiver() {
        let (handle, rx) = channel();
        drop(rx);
        // Must not panic; the element is simply gone.
        handle.send(ElementCommand::Play);
    }
}
