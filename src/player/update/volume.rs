//! player/update/volume.rs
//! Volume, mute, and playback rate.
//!
//! Mute is independent of the stored volume: the slider value survives a
//! mute/unmute round trip, and what the element hears is always
//! `effective_volume` (0 while muted). The one coupling, straight from the
//! EduCast UI: dragging the volume to zero mutes, and dragging it back up
//! undoes that particular mute.

use tracing::debug;

use crate::core::element::ElementCommand;
use crate::player::Player;

/// What the element should actually output right now.
pub(crate) fn effective_volume(player: &Player) -> f32 {
    if player.muted { 0.0 } else { player.volume }
}

pub(crate) fn set_volume(player: &mut Player, v: f32) {
    if !v.is_finite() {
        return;
    }
    let v = v.clamp(0.0, 1.0);

    if v == 0.0 {
        player.muted = true;
        player.muted_by_volume = true;
    } else {
        // Keep the last audible volume for unmute restoration.
        player.volume = v;
        if player.muted_by_volume {
            player.muted = false;
            player.muted_by_volume = false;
        }
    }

    player
        .element
        .send(ElementCommand::SetVolume(effective_volume(player)));
}

pub(crate) fn toggle_mute(player: &mut Player) {
    player.muted = !player.muted;
    player.muted_by_volume = false;
    player
        .element
        .send(ElementCommand::SetVolume(effective_volume(player)));
}

pub(crate) fn set_rate(player: &mut Player, rate: f32) {
    let allowed = player.surface.rates().iter().any(|&r| (r - rate).abs() < 1e-3);
    if !allowed {
        debug!("rate {rate} not in this surface's menu; ignored");
        return;
    }

    player.rate = rate;
    // Applies to ongoing playback immediately; the element never resets its
    // position for a rate change.
    player.element.send(ElementCommand::SetRate(rate));
}
