//! player/update/overlay.rs
//! Video-surface chrome: captions, fullscreen, controls auto-hide, and the
//! collapse down to the mini-player.
//!
//! Fullscreen is the one confirmed-only transition in the player: the
//! platform request can reject (gesture requirements, embedded contexts),
//! and a wrong fullscreen indicator is far more jarring than a wrong play
//! icon. So `fullscreen` only flips when the element confirms.

use std::time::Instant;

use tracing::{debug, warn};

use crate::core::element::ElementCommand;
use crate::player::Player;
use crate::player::state::{CONTROLS_HIDE_AFTER, Surface};

pub(crate) fn toggle_captions(player: &mut Player) {
    let has_track = player.surface.has_captions
        && player.episode.as_ref().is_some_and(|e| e.has_transcript());

    if !has_track {
        // No track, no toggle: state stays put and the element hears
        // nothing.
        debug!("caption toggle ignored: no caption track");
        return;
    }

    player.captions_on = !player.captions_on;
    player
        .element
        .send(ElementCommand::SetCaptionsVisible(player.captions_on));
}

pub(crate) fn toggle_fullscreen(player: &mut Player) {
    if !player.surface.has_fullscreen {
        debug!("fullscreen toggle ignored: surface has no fullscreen");
        return;
    }

    // Request only; `fullscreen` flips when the platform confirms.
    if player.fullscreen {
        player.element.send(ElementCommand::ExitFullscreen);
    } else {
        player.element.send(ElementCommand::EnterFullscreen);
    }
}

pub(crate) fn fullscreen_entered(player: &mut Player) {
    if player.surface.has_fullscreen {
        player.fullscreen = true;
    }
}

pub(crate) fn fullscreen_exited(player: &mut Player) {
    player.fullscreen = false;
}

/// Non-essential feature, so a rejection is logged and nothing more; the
/// indicator was never flipped.
pub(crate) fn fullscreen_rejected(reason: &str) {
    warn!("fullscreen request rejected: {reason}");
}

/// Pointer movement wakes the controls and, while playing, restarts the
/// inactivity countdown.
pub(crate) fn pointer_moved(player: &mut Player, now: Instant) {
    if !player.surface.has_video {
        return;
    }

    player.controls_visible = true;
    if player.is_playing {
        player.controls_hide_at = Some(now + CONTROLS_HIDE_AFTER);
    }
}

/// Playback started: show the controls and arm the countdown.
pub(crate) fn controls_arm(player: &mut Player, now: Instant) {
    player.controls_visible = true;
    if player.surface.has_video {
        player.controls_hide_at = Some(now + CONTROLS_HIDE_AFTER);
    }
}

/// Paused/ended/failed: controls stay up, countdown off.
pub(crate) fn controls_cancel(player: &mut Player) {
    player.controls_visible = true;
    player.controls_hide_at = None;
}

/// Host tick: hide the controls once the countdown lapses mid-playback.
pub(crate) fn tick_controls(player: &mut Player, now: Instant) {
    if !player.is_playing {
        return;
    }
    if let Some(deadline) = player.controls_hide_at
        && now >= deadline
    {
        player.controls_visible = false;
        player.controls_hide_at = None;
    }
}

/// Collapse to the docked mini-player. Transport state and the bound episode
/// survive; the video-only chrome does not.
pub(crate) fn minimize(player: &mut Player) {
    if !player.surface.has_video {
        return;
    }

    debug!("minimizing to the audio surface");

    if player.fullscreen {
        // Tearing the surface down exits fullscreen with it; no
        // confirmation to wait for.
        player.element.send(ElementCommand::ExitFullscreen);
        player.fullscreen = false;
    }
    if player.captions_on {
        player.captions_on = false;
        player.element.send(ElementCommand::SetCaptionsVisible(false));
    }
    player.captions = None;
    controls_cancel(player);

    player.surface = Surface::mini_audio();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::element::ElementEvent;
    use crate::player::state::{CONTROLS_HIDE_AFTER, Phase, PlayerInput};
    use crate::player::testkit::{drain_commands, episode, rig};
    use std::time::Duration;

    fn video_player_with_transcript() -> (
        crate::player::Player,
        std::sync::mpsc::Receiver<ElementCommand>,
    ) {
        let (mut player, commands, _requests) = rig(Surface::full_video());
        let mut ep = episode("ep-1", Some(120.0));
        ep.transcript = Some("Hello. World.".into());
        player.apply(PlayerInput::Load(ep));
        player.apply(PlayerInput::Element(ElementEvent::Loaded {
            duration_secs: Some(120.0),
        }));
        drain_commands(&commands);
        (player, commands)
    }

    #[test]
    fn caption_toggle_without_transcript_is_a_no_op() {
        let (mut player, commands, _requests) = rig(Surface::full_video());
        player.apply(PlayerInput::Load(episode("ep-1", Some(60.0))));
        player.apply(PlayerInput::Element(ElementEvent::Loaded {
            duration_secs: Some(60.0),
        }));
        drain_commands(&commands);

        player.apply(PlayerInput::ToggleCaptions);

        assert!(!player.captions_enabled());
        assert!(drain_commands(&commands).is_empty());
    }

    #[test]
    fn caption_toggle_flips_and_reaches_the_element() {
        let (mut player, commands) = video_player_with_transcript();

        player.apply(PlayerInput::ToggleCaptions);
        assert!(player.captions_enabled());
        assert_eq!(
            drain_commands(&commands),
            vec![ElementCommand::SetCaptionsVisible(true)]
        );

        player.apply(PlayerInput::ToggleCaptions);
        assert!(!player.captions_enabled());
    }

    #[test]
    fn fullscreen_waits_for_confirmation() {
        let (mut player, commands) = video_player_with_transcript();

        player.apply(PlayerInput::ToggleFullscreen);
        // Requested, not yet granted.
        assert!(!player.is_fullscreen());
        assert_eq!(
            drain_commands(&commands),
            vec![ElementCommand::EnterFullscreen]
        );

        player.apply(PlayerInput::Element(ElementEvent::FullscreenEntered));
        assert!(player.is_fullscreen());

        player.apply(PlayerInput::ToggleFullscreen);
        assert_eq!(
            drain_commands(&commands),
            vec![ElementCommand::ExitFullscreen]
        );
        player.apply(PlayerInput::Element(ElementEvent::FullscreenExited));
        assert!(!player.is_fullscreen());
    }

    #[test]
    fn fullscreen_rejection_changes_nothing() {
        let (mut player, commands) = video_player_with_transcript();

        player.apply(PlayerInput::ToggleFullscreen);
        drain_commands(&commands);
        player.apply(PlayerInput::Element(ElementEvent::FullscreenRejected(
            "needs a user gesture".into(),
        )));

        assert!(!player.is_fullscreen());
        // Logged only, never toasted.
        assert!(player.take_notice().is_none());
    }

    #[test]
    fn audio_surface_never_requests_fullscreen() {
        let (mut player, commands, _requests) = rig(Surface::mini_audio());
        player.apply(PlayerInput::ToggleFullscreen);
        assert!(drain_commands(&commands).is_empty());
    }

    #[test]
    fn controls_hide_after_inactivity_only_while_playing() {
        let (mut player, _commands) = video_player_with_transcript();
        let start = Instant::now();

        player.apply(PlayerInput::TogglePlay);
        assert!(player.controls_visible());

        // Countdown not lapsed yet.
        tick_controls(&mut player, start + Duration::from_millis(500));
        assert!(player.controls_visible());

        tick_controls(&mut player, start + CONTROLS_HIDE_AFTER + Duration::from_secs(1));
        assert!(!player.controls_visible());

        // Pointer movement brings them back and re-arms.
        pointer_moved(&mut player, start + Duration::from_secs(10));
        assert!(player.controls_visible());

        // Pausing cancels the countdown; controls stay up forever.
        player.apply(PlayerInput::TogglePlay);
        tick_controls(&mut player, start + Duration::from_secs(1000));
        assert!(player.controls_visible());
    }

    #[test]
    fn minimize_keeps_transport_and_drops_the_chrome() {
        let (mut player, commands) = video_player_with_transcript();

        player.apply(PlayerInput::TogglePlay);
        player.apply(PlayerInput::Element(ElementEvent::Position { secs: 42.0 }));
        player.apply(PlayerInput::ToggleCaptions);
        player.apply(PlayerInput::ToggleFullscreen);
        player.apply(PlayerInput::Element(ElementEvent::FullscreenEntered));
        drain_commands(&commands);

        player.apply(PlayerInput::Minimize);

        // Transport and identity survive.
        assert!(player.is_playing());
        assert_eq!(player.phase(), Phase::Playing);
        assert_eq!(player.position_secs(), 42.0);
        assert!(player.episode().is_some());

        // Chrome is gone.
        assert!(!player.is_fullscreen());
        assert!(!player.captions_enabled());
        assert!(player.caption_track().is_none());
        assert_eq!(player.surface(), Surface::mini_audio());

        let sent = drain_commands(&commands);
        assert!(sent.contains(&ElementCommand::ExitFullscreen));
        assert!(sent.contains(&ElementCommand::SetCaptionsVisible(false)));
    }
}
