//! player/captions.rs
//! Caption cues synthesized from episode transcripts.
//!
//! EduCast stores a flat transcript per episode, not cue files. The overlay
//! needs timed cues, so we split the transcript into sentences and spread
//! them across the known duration, each cue weighted by its character count
//! (long sentences stay on screen longer).

/// One timed overlay line.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub start_secs: f64,
    pub end_secs: f64,
    pub text: String,
}

/// A synthesized caption track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptionTrack {
    cues: Vec<Cue>,
}

impl CaptionTrack {
    /// Split `transcript` into sentence cues across `duration_secs`.
    /// An empty transcript or unknown/zero duration yields an empty track.
    pub fn from_transcript(transcript: &str, duration_secs: f64) -> Self {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Self::default();
        }

        let sentences = split_sentences(transcript);
        if sentences.is_empty() {
            return Self::default();
        }

        let total_chars: usize = sentences.iter().map(|s| s.chars().count()).sum();
        if total_chars == 0 {
            return Self::default();
        }

        let mut cues = Vec::with_capacity(sentences.len());
        let mut cursor = 0.0_f64;

        for (i, sentence) in sentences.iter().enumerate() {
            let weight = sentence.chars().count() as f64 / total_chars as f64;
            let end = if i == sentences.len() - 1 {
                // Rounding must not leave a gap before the end of media.
                duration_secs
            } else {
                cursor + weight * duration_secs
            };

            cues.push(Cue {
                start_secs: cursor,
                end_secs: end,
                text: sentence.clone(),
            });
            cursor = end;
        }

        Self { cues }
    }

    /// The cue covering `secs`, if any.
    pub fn cue_at(&self, secs: f64) -> Option<&Cue> {
        if !secs.is_finite() {
            return None;
        }
        self.cues
            .iter()
            .find(|cue| secs >= cue.start_secs && secs < cue.end_secs)
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

/// Sentence terminators end a cue; whatever trails without one becomes the
/// final cue.
fn split_sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            push_trimmed(&mut out, &mut current);
        }
    }
    push_trimmed(&mut out, &mut current);

    out
}

fn push_trimmed(out: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    current.clear();
}
