//! Core data types shared between the engine side and the player controller.
//!
//! Rule of thumb:
//! - These structs should be "boring bags of data"
//! - No playback code
//! - No network code
//!
//! They mirror the JSON records the EduCast backend serves, which is why
//! everything here derives serde. The player never mutates an `Episode`;
//! it is immutable for the lifetime of a playback session.

use serde::{Deserialize, Serialize};

/// What kind of media an episode carries.
///
/// The kind decides which player surface the host mounts (audio mini-player
/// vs. full video player) and which fallback file extension a download gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

/// One playable unit: a published podcast or video episode.
///
/// We use `Option` for fields the backend may omit:
/// - older uploads have no thumbnail
/// - transcripts are professor-provided and frequently missing
/// - `duration_secs` is a hint from upload time; the element's own metadata
///   probe is authoritative once the media loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,

    /// Where the media bytes live (local path or http(s) URL).
    pub media_url: String,
    pub kind: MediaKind,

    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Raw transcript text; caption cues are synthesized from this.
    #[serde(default)]
    pub transcript: Option<String>,
    /// Duration hint in seconds, recorded at upload time.
    #[serde(default)]
    pub duration_secs: Option<f64>,

    /// The publishing professor's account id.
    pub author_id: String,
}

impl Episode {
    /// True when the episode can feed a caption overlay.
    pub fn has_transcript(&self) -> bool {
        self.transcript
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }
}

/// Who is watching: an authenticated student/professor, or nobody in
/// particular. Engagement calls attach this identity; the player itself
/// never reaches into a session global for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Viewer {
    User(String),
    Anonymous,
}

impl Viewer {
    /// The id string engagement payloads carry.
    pub fn id(&self) -> &str {
        match self {
            Viewer::User(id) => id,
            Viewer::Anonymous => "anonymous",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episode_round_trips_through_json() {
        let json = r#"{
            "id": "ep-101",
            "title": "Week 1: Ownership",
            "media_url": "https://media.educast.test/ep-101.mp3",
            "kind": "audio",
            "author_id": "prof-9"
        }"#;

        let ep: Episode = serde_json::from_str(json).unwrap();
        assert_eq!(ep.id, "ep-101");
        assert_eq!(ep.kind, MediaKind::Audio);
        assert_eq!(ep.description, "");
        assert!(ep.transcript.is_none());
        assert!(!ep.has_transcript());

        let back = serde_json::to_string(&ep).unwrap();
        let again: Episode = serde_json::from_str(&back).unwrap();
        assert_eq!(ep, again);
    }

    #[test]
    fn blank_transcript_counts_as_missing() {
        let ep = Episode {
            id: "e".into(),
            title: "t".into(),
            description: String::new(),
            media_url: "u".into(),
            kind: MediaKind::Video,
            thumbnail_url: None,
            transcript: Some("   \n".into()),
            duration_secs: None,
            author_id: "a".into(),
        };
        assert!(!ep.has_transcript());
    }

    #[test]
    fn viewer_ids() {
        assert_eq!(Viewer::User("u-3".into()).id(), "u-3");
        assert_eq!(Viewer::Anonymous.id(), "anonymous");
    }
}
