//! core/element/engine.rs
//! Desktop audio element (rodio owner).
//!
//! Owns:
//! - OutputStream (must stay alive)
//! - Sink (per bound episode)
//! - command loop + periodic position ticks
//!
//! Emits ElementEvent back via a channel. No player imports.
//!
//! Semantics match the element contract the player is written against:
//! binding media leaves it paused until an explicit Play, a failed start is
//! reported as StartRejected rather than a crash, and seeks rebuild the
//! decode pipeline at the target offset. This is an audio-only surface, so
//! fullscreen requests are rejected and caption visibility is a no-op.

use std::sync::mpsc::Receiver;
use std::sync::mpsc::Sender;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, trace, warn};

use super::decoder::{self, MediaInput, SharedBytes};
use super::{ElementCommand, ElementEvent, MediaSource};

const TICK_MS: u64 = 200;
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

struct LoadedMedia {
    input: MediaInput,
    duration_secs: Option<f64>,
}

pub struct AudioEngine {
    // Keep this alive for the lifetime of the engine!
    stream: OutputStream,

    // Current playback
    sink: Option<Sink>,
    media: Option<LoadedMedia>,
    /// Source offset the current sink was built at; the reported position is
    /// this plus the sink's own progress.
    base_offset_secs: f64,
    playing: bool,

    // Sticky across rebinds; reapplied to every new sink.
    volume: f32,
    rate: f32,

    // Event channel
    event_tx: Sender<ElementEvent>,
}

impl AudioEngine {
    pub fn new(event_tx: Sender<ElementEvent>) -> Result<Self, String> {
        // rodio 0.21.x: build/open the default output stream via
        // OutputStreamBuilder.
        let stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| format!("failed to init default audio output: {e}"))?;

        Ok(Self {
            stream,
            sink: None,
            media: None,
            base_offset_secs: 0.0,
            playing: false,
            volume: 1.0,
            rate: 1.0,
            event_tx,
        })
    }

    pub fn run(&mut self, command_rx: Receiver<ElementCommand>) {
        let tick = Duration::from_millis(TICK_MS);

        loop {
            match command_rx.recv_timeout(tick) {
                Ok(cmd) => {
                    if self.handle_command(cmd) {
                        break;
                    }
                    while let Ok(cmd) = command_rx.try_recv() {
                        if self.handle_command(cmd) {
                            return;
                        }
                    }
                }
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            }

            self.tick();
        }

        self.unbind();
    }

    fn handle_command(&mut self, cmd: ElementCommand) -> bool {
        match cmd {
            ElementCommand::Load { source } => self.load(source),
            ElementCommand::Play => self.start(),
            ElementCommand::Pause => {
                if let Some(sink) = &self.sink {
                    sink.pause();
                }
                self.playing = false;
            }
            ElementCommand::Seek(secs) => self.seek(secs),
            ElementCommand::SetVolume(v) => {
                self.volume = v.clamp(0.0, 1.0);
                if let Some(sink) = &self.sink {
                    sink.set_volume(self.volume);
                }
            }
            ElementCommand::SetRate(r) => {
                if r > 0.0 {
                    self.rate = r;
                    // Speed changes apply to the live sink without touching
                    // its position.
                    if let Some(sink) = &self.sink {
                        sink.set_speed(self.rate);
                    }
                }
            }
            ElementCommand::SetCaptionsVisible(_) => {
                trace!("audio element has no caption overlay");
            }
            ElementCommand::EnterFullscreen => {
                let _ = self.event_tx.send(ElementEvent::FullscreenRejected(
                    "audio element has no fullscreen surface".into(),
                ));
            }
            ElementCommand::ExitFullscreen => {
                trace!("audio element has no fullscreen surface");
            }
            ElementCommand::Shutdown => return true,
        }

        false
    }

    fn tick(&mut self) {
        let Some(sink) = &self.sink else {
            return;
        };

        if sink.empty() {
            if self.media.is_some() {
                // Drained to the end: unbind the sink, rewind, tell the
                // player.
                self.sink = None;
                self.playing = false;
                self.base_offset_secs = 0.0;
                let _ = self.event_tx.send(ElementEvent::Ended);
            }
            return;
        }

        if self.playing {
            let mut secs = self.base_offset_secs + sink.get_pos().as_secs_f64();
            if let Some(duration) = self.media.as_ref().and_then(|m| m.duration_secs) {
                secs = secs.min(duration);
            }
            let _ = self.event_tx.send(ElementEvent::Position { secs });
        }
    }

    fn load(&mut self, source: MediaSource) {
        self.unbind();

        let input = match resolve(source) {
            Ok(input) => input,
            Err(msg) => {
                warn!("load failed: {msg}");
                let _ = self.event_tx.send(ElementEvent::Error(msg));
                return;
            }
        };

        let duration_secs = match decoder::probe_duration(&input) {
            Ok(d) => d,
            Err(e) => {
                let msg = format!("media probe failed: {e}");
                warn!("{msg}");
                let _ = self.event_tx.send(ElementEvent::Error(msg));
                return;
            }
        };

        debug!(?duration_secs, "media bound");
        self.media = Some(LoadedMedia {
            input,
            duration_secs,
        });

        let _ = self.event_tx.send(ElementEvent::Loaded { duration_secs });
    }

    fn start(&mut self) {
        if self.playing {
            return;
        }

        let Some(media) = &self.media else {
            let _ = self
                .event_tx
                .send(ElementEvent::StartRejected("no media loaded".into()));
            return;
        };

        // Resuming a paused sink is cheap; otherwise build a fresh source at
        // the current offset.
        if let Some(sink) = &self.sink {
            if !sink.empty() {
                sink.play();
                self.playing = true;
                return;
            }
        }

        match decoder::open_at(&media.input, self.base_offset_secs) {
            Ok((source, _)) => {
                let sink = self.new_sink();
                sink.append(source);
                sink.play();
                self.sink = Some(sink);
                self.playing = true;
            }
            Err(e) => {
                let _ = self
                    .event_tx
                    .send(ElementEvent::StartRejected(e.to_string()));
            }
        }
    }

    fn seek(&mut self, secs: f64) {
        let Some(media) = &self.media else {
            return;
        };

        let mut target = secs.max(0.0);
        if let Some(duration) = media.duration_secs {
            target = target.min(duration);
        }

        if self.sink.is_some() {
            // Rebuild the decode pipeline at the target offset, preserving
            // the play/pause state.
            match decoder::open_at(&media.input, target) {
                Ok((source, _)) => {
                    let sink = self.new_sink();
                    if !self.playing {
                        sink.pause();
                    }
                    sink.append(source);
                    if self.playing {
                        sink.play();
                    }
                    self.sink = Some(sink);
                }
                Err(e) => {
                    warn!("seek rebuild failed: {e}");
                    let _ = self.event_tx.send(ElementEvent::Error(e.to_string()));
                    return;
                }
            }
        }

        self.base_offset_secs = target;
        let _ = self.event_tx.send(ElementEvent::Position { secs: target });
    }

    fn new_sink(&self) -> Sink {
        // rodio 0.21.x: Sink is created from the stream's mixer.
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        sink.set_speed(self.rate);
        sink
    }

    fn unbind(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.media = None;
        self.base_offset_secs = 0.0;
        self.playing = false;
    }
}

fn resolve(source: MediaSource) -> Result<MediaInput, String> {
    match source {
        MediaSource::Local(path) => {
            if !path.is_file() {
                return Err(format!("no such media file: {}", path.display()));
            }
            Ok(MediaInput::File(path))
        }
        MediaSource::Remote(url) => {
            let bytes = fetch_remote(&url)?;
            Ok(MediaInput::Bytes {
                data: SharedBytes(std::sync::Arc::new(bytes)),
                hint: url_extension(&url),
            })
        }
    }
}

/// Fetch the whole resource up front. Streaming decode is out of scope for
/// this element; episodes are lecture-sized, not livestreams.
fn fetch_remote(url: &str) -> Result<Vec<u8>, String> {
    async_std::task::block_on(async {
        let fetch = async {
            let mut response = surf::get(url).await.map_err(|e| e.to_string())?;
            if !response.status().is_success() {
                return Err(format!("media fetch failed: HTTP {}", response.status()));
            }
            response.body_bytes().await.map_err(|e| e.to_string())
        };

        match async_std::future::timeout(FETCH_TIMEOUT, fetch).await {
            Ok(result) => result,
            Err(_) => Err(format!("media fetch timed out: {url}")),
        }
    })
}

/// Extension of the URL's path component, query/fragment stripped.
fn url_extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next()?;
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_owned())
}
