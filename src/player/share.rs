//! player/share.rs
//! Download/share side affordances.
//!
//! Neither of these is part of the transport state machine. `download` is a
//! pure function of the episode; `share` degrades from the platform share
//! hook to clipboard copy and reports the outcome as a notice. Playback
//! state is untouchable from here by construction: nothing in this module
//! sees it.

use tracing::debug;

use crate::core::types::{Episode, MediaKind};
use crate::player::state::Notice;

/// A browser-style "save this URL under this name" action for the host to
/// perform.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    pub url: String,
    pub filename: String,
}

/// Host-provided platform capability: hand it a URL, it either does its
/// thing or explains why not.
pub type PlatformHook = Box<dyn Fn(&str) -> Result<(), String> + Send>;

/// The platform hooks `share` degrades through.
pub struct ShareContext {
    /// Native share sheet, when the platform has one.
    pub share: Option<PlatformHook>,
    /// Clipboard copy; the fallback of last resort.
    pub copy_link: PlatformHook,
}

impl ShareContext {
    /// A context for platforms without a share sheet.
    pub fn clipboard_only(copy_link: PlatformHook) -> Self {
        Self {
            share: None,
            copy_link,
        }
    }
}

/// Build the download action for an episode.
pub(crate) fn download_request(episode: &Episode) -> DownloadRequest {
    DownloadRequest {
        url: episode.media_url.clone(),
        filename: format!(
            "{}.{}",
            sanitize_filename(&episode.title),
            media_extension(episode)
        ),
    }
}

/// Share `url`, preferring the native sheet, falling back to the clipboard.
/// Always resolves to a notice; never panics, never propagates.
pub(crate) fn share_link(ctx: &ShareContext, url: &str) -> Notice {
    if let Some(share) = &ctx.share {
        match share(url) {
            Ok(()) => return Notice::info("Shared"),
            Err(e) => {
                // Treat a failing sheet like a missing one.
                debug!("share sheet unavailable, copying instead: {e}");
            }
        }
    }

    match (ctx.copy_link)(url) {
        Ok(()) => Notice::info("Link copied to clipboard"),
        Err(e) => Notice::error(format!("Couldn't copy link: {e}")),
    }
}

/// Extension from the media URL's path, or a default by kind.
fn media_extension(episode: &Episode) -> String {
    let path = episode
        .media_url
        .split(['?', '#'])
        .next()
        .unwrap_or(&episode.media_url);

    if let Some(file) = path.rsplit('/').next()
        && let Some((stem, ext)) = file.rsplit_once('.')
        && !stem.is_empty()
        && !ext.is_empty()
    {
        return ext.to_ascii_lowercase();
    }

    match episode.kind {
        MediaKind::Audio => "mp3".into(),
        MediaKind::Video => "mp4".into(),
    }
}

/// Keep titles filesystem-friendly without mangling them beyond recognition.
fn sanitize_filename(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        "episode".into()
    } else {
        trimmed.to_string()
    }
}
