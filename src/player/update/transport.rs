//! player/update/transport.rs
//! The playback axis: load/play/seek/skip plus element event reconciliation.
//!
//! Design goals:
//! - The player's fields are the source of truth for rendering; element
//!   events are the only channel that corrects them.
//! - Play is optimistic: `is_playing` flips immediately and rolls back if
//!   the element rejects the start. A flickering play icon is cheap; a
//!   stuck one is not.

use std::time::Instant;

use tracing::{debug, warn};

use crate::core::element::{ElementCommand, ElementEvent, MediaSource};
use crate::core::types::Episode;
use crate::player::Player;
use crate::player::captions::CaptionTrack;
use crate::player::state::{Notice, Phase};
use crate::player::update::{engagement, overlay, volume};
use crate::player::util::clamp_position;

pub(crate) fn load(player: &mut Player, episode: Episode) {
    if episode.media_url.trim().is_empty() {
        warn!("refusing to load episode {:?}: empty media url", episode.id);
        player.notice = Some(Notice::error("This episode has no playable media."));
        return;
    }

    debug!("binding episode {:?}", episode.id);

    // A new resource is a new playback session.
    player.phase = Phase::Loading;
    player.is_playing = false;
    player.position_secs = 0.0;
    // Upload-time hint; overwritten once the element reports metadata.
    player.duration_secs = episode.duration_secs;
    player.view_registered = false;
    player.liked = false;
    player.captions = None;
    player.captions_on = false;
    overlay::controls_cancel(player);

    player.element.send(ElementCommand::Load {
        source: MediaSource::from_url(&episode.media_url),
    });
    // Volume and rate are session-sticky; re-push them so a freshly bound
    // element agrees with what the widgets show.
    player
        .element
        .send(ElementCommand::SetVolume(volume::effective_volume(player)));
    player.element.send(ElementCommand::SetRate(player.rate));

    player.episode = Some(episode);
}

pub(crate) fn toggle_play(player: &mut Player) {
    match player.phase {
        Phase::Idle | Phase::Loading => {
            debug!("play toggle ignored: no playable resource yet");
        }
        Phase::Playing => {
            player.is_playing = false;
            player.phase = Phase::Paused;
            player.element.send(ElementCommand::Pause);
            overlay::controls_cancel(player);
        }
        Phase::Paused | Phase::Ended => {
            // Optimistic: the element's start request is async and may still
            // reject (StartRejected rolls this back).
            player.is_playing = true;
            player.phase = Phase::Playing;
            player.element.send(ElementCommand::Play);
            engagement::register_view_if_fresh(player);
            overlay::controls_arm(player, Instant::now());
        }
    }
}

pub(crate) fn seek(player: &mut Player, secs: f64) {
    if player.phase == Phase::Idle {
        return;
    }

    let target = clamp_position(secs, player.duration_secs);
    player.position_secs = target;
    player.element.send(ElementCommand::Seek(target));

    // Seeking out of the end state lands on the paused side of the axis.
    if player.phase == Phase::Ended {
        player.phase = Phase::Paused;
    }
}

pub(crate) fn skip(player: &mut Player, delta: f64) {
    if player.phase == Phase::Idle || !delta.is_finite() {
        return;
    }
    seek(player, player.position_secs + delta);
}

pub(crate) fn handle_element(player: &mut Player, event: ElementEvent) {
    match event {
        ElementEvent::Loaded { duration_secs } => {
            if let Some(d) = duration_secs {
                player.duration_secs = Some(d);
            }
            // A seek issued before metadata arrived must survive it; clamp
            // instead of resetting.
            player.position_secs = clamp_position(player.position_secs, player.duration_secs);

            if player.phase == Phase::Loading {
                player.phase = Phase::Paused;
            }

            build_caption_track(player);
        }

        ElementEvent::Position { secs } => {
            // Last write wins.
            player.position_secs = clamp_position(secs, player.duration_secs);
        }

        ElementEvent::Ended => {
            player.is_playing = false;
            player.phase = Phase::Ended;
            player.position_secs = 0.0;
            // Replaying from here is a distinct playback session.
            player.view_registered = false;
            player.element.send(ElementCommand::Seek(0.0));
            overlay::controls_cancel(player);
        }

        ElementEvent::StartRejected(reason) => {
            warn!("playback start rejected: {reason}");
            player.is_playing = false;
            if player.phase == Phase::Playing {
                player.phase = Phase::Paused;
            }
            player.notice = Some(Notice::warning(format!("Playback couldn't start: {reason}")));
            overlay::controls_cancel(player);
        }

        ElementEvent::FullscreenEntered => overlay::fullscreen_entered(player),
        ElementEvent::FullscreenExited => overlay::fullscreen_exited(player),
        ElementEvent::FullscreenRejected(reason) => overlay::fullscreen_rejected(&reason),

        ElementEvent::Error(message) => {
            warn!("element error: {message}");
            player.is_playing = false;
            if player.phase == Phase::Playing {
                player.phase = Phase::Paused;
            }
            player.notice = Some(Notice::warning(format!("Playback error: {message}")));
            overlay::controls_cancel(player);
        }
    }
}

/// Captions need both a transcript and a known duration; build the track as
/// soon as we have the pair.
fn build_caption_track(player: &mut Player) {
    if !player.surface.has_captions || player.captions.is_some() {
        return;
    }
    let Some(duration) = player.duration_secs else {
        return;
    };
    let Some(transcript) = player.episode.as_ref().and_then(|e| e.transcript.as_deref()) else {
        return;
    };

    let track = CaptionTrack::from_transcript(transcript, duration);
    if !track.is_empty() {
        player.captions = Some(track);
    }
}
