//! core/element/decoder.rs
//! Media decoding utilities (Symphonia) -> rodio::Source.
//!
//! The engine replays and seeks by rebuilding a source at an offset, so the
//! input must be cheap to reopen. Local files reopen from disk; remote media
//! is fetched once and decoded out of a shared byte buffer.

use std::fs::File;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rodio::Source;

use symphonia::core::audio::{AudioBufferRef, SampleBuffer, Signal, SignalSpec};
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::{Time, TimeBase};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("open failed: {0}")]
    Open(std::io::Error),
    #[error("format probe failed: {0}")]
    Probe(SymphoniaError),
    #[error("no supported audio track found")]
    NoTrack,
    #[error("decoder init failed: {0}")]
    DecoderInit(SymphoniaError),
    #[error("seek failed: {0}")]
    Seek(SymphoniaError),
    #[error("decode read error: {0}")]
    Read(SymphoniaError),
}

/// Reference-counted media bytes that can back any number of cursors.
#[derive(Debug, Clone)]
pub struct SharedBytes(pub Arc<Vec<u8>>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

/// Decodable input: a path we reopen, or bytes we already hold.
#[derive(Debug, Clone)]
pub enum MediaInput {
    File(PathBuf),
    Bytes {
        data: SharedBytes,
        /// Extension hint carried over from the URL, e.g. "mp3".
        hint: Option<String>,
    },
}

impl MediaInput {
    fn extension_hint(&self) -> Option<String> {
        match self {
            MediaInput::File(path) => path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_owned),
            MediaInput::Bytes { hint, .. } => hint.clone(),
        }
    }
}

/// Construct a new seekable rodio Source from `input`, starting at
/// `start_secs`. Also reports the container duration when the format
/// declares one.
pub fn open_at(
    input: &MediaInput,
    start_secs: f64,
) -> Result<(SymphoniaSource, Option<f64>), DecodeError> {
    let mss = match input {
        MediaInput::File(path) => {
            let file = File::open(path).map_err(DecodeError::Open)?;
            MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default())
        }
        MediaInput::Bytes { data, .. } => MediaSourceStream::new(
            Box::new(Cursor::new(data.clone())),
            MediaSourceStreamOptions::default(),
        ),
    };

    let mut hint = Hint::new();
    if let Some(ext) = input.extension_hint() {
        hint.with_extension(&ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(DecodeError::Probe)?;

    let mut format = probed.format;

    let track = format.default_track().ok_or(DecodeError::NoTrack)?;
    let track_id = track.id;

    // Clone codec params so we can seek (mutable borrow of format) without
    // borrow conflicts.
    let codec_params = track.codec_params.clone();

    let duration_secs = duration_from_params(codec_params.time_base, codec_params.n_frames);

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(DecodeError::DecoderInit)?;

    if start_secs > 0.0 {
        let time = Time::from(Duration::from_secs_f64(start_secs));
        let seek_to = SeekTo::Time {
            time,
            track_id: Some(track_id),
        };

        format
            .seek(SeekMode::Accurate, seek_to)
            .map_err(DecodeError::Seek)?;

        // After seek, safest is to reset decoder state by recreating it.
        decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(DecodeError::DecoderInit)?;
    }

    let src = SymphoniaSource::new(format, decoder, track_id);
    Ok((src, duration_secs))
}

/// Probe `input` for its duration without keeping a decode pipeline around.
pub fn probe_duration(input: &MediaInput) -> Result<Option<f64>, DecodeError> {
    open_at(input, 0.0).map(|(_, duration)| duration)
}

fn duration_from_params(time_base: Option<TimeBase>, n_frames: Option<u64>) -> Option<f64> {
    let tb = time_base?;
    let frames = n_frames?;

    // Time is { seconds: u64, frac: f64 } in symphonia 0.5.x.
    let t = tb.calc_time(frames);
    Some(t.seconds as f64 + t.frac)
}

/// A streaming rodio Source backed by Symphonia.
pub struct SymphoniaSource {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,

    // Output format for rodio
    sample_rate: u32,
    channels: u16,

    // Interleaved f32 samples ready to be yielded
    out: Vec<f32>,
    out_pos: usize,

    ended: bool,
}

impl SymphoniaSource {
    fn new(format: Box<dyn FormatReader>, decoder: Box<dyn Decoder>, track_id: u32) -> Self {
        let mut this = Self {
            format,
            decoder,
            track_id,
            sample_rate: 44100,
            channels: 2,
            out: Vec::new(),
            out_pos: 0,
            ended: false,
        };

        // Prime once so sample_rate/channels become correct ASAP.
        let _ = this.fill_out_buffer();

        this
    }

    fn fill_out_buffer(&mut self) -> Result<(), DecodeError> {
        if self.ended {
            return Ok(());
        }

        self.out.clear();
        self.out_pos = 0;

        loop {
            let packet = match self.format.next_packet() {
                Ok(p) => p,
                Err(SymphoniaError::IoError(_)) => {
                    self.ended = true;
                    return Ok(());
                }
                Err(SymphoniaError::ResetRequired) => {
                    self.decoder.reset();
                    continue;
                }
                Err(e) => return Err(DecodeError::Read(e)),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(d) => d,
                Err(SymphoniaError::IoError(_)) => {
                    self.ended = true;
                    return Ok(());
                }
                Err(SymphoniaError::DecodeError(_)) => {
                    // Corrupt packet; skip.
                    continue;
                }
                Err(SymphoniaError::ResetRequired) => {
                    self.decoder.reset();
                    continue;
                }
                Err(e) => return Err(DecodeError::Read(e)),
            };

            match decoded {
                AudioBufferRef::F32(buf) => {
                    // NOTE: buf is Cow<AudioBuffer<f32>>; methods are from the
                    // Signal trait.
                    self.sample_rate = buf.spec().rate;
                    self.channels = buf.spec().channels.count() as u16;

                    let frames = buf.frames();
                    let chans = buf.spec().channels.count();

                    self.out.reserve(frames * chans);
                    for f in 0..frames {
                        for c in 0..chans {
                            self.out.push(buf.chan(c)[f]);
                        }
                    }
                    return Ok(());
                }
                other => {
                    let spec = SignalSpec::new(other.spec().rate, other.spec().channels.clone());
                    self.sample_rate = spec.rate;
                    self.channels = spec.channels.count() as u16;

                    let frames = other.frames();
                    let chans = spec.channels.count();

                    let mut sbuf = SampleBuffer::<f32>::new(frames as u64, spec);
                    sbuf.copy_interleaved_ref(other);

                    self.out.reserve(frames * chans);
                    self.out.extend_from_slice(sbuf.samples());
                    return Ok(());
                }
            }
        }
    }
}

impl Iterator for SymphoniaSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.out_pos >= self.out.len() {
            if self.ended {
                return None;
            }
            if self.fill_out_buffer().is_err() {
                self.ended = true;
                return None;
            }
            if self.out.is_empty() && self.ended {
                return None;
            }
        }

        let s = self.out.get(self.out_pos).copied();
        self.out_pos += 1;
        s
    }
}

impl Source for SymphoniaSource {
    // rodio 0.21 uses current_span_len (not current_frame_len).
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}
