//! player/update/mod.rs
//! Update logic (router).
//! Mutates the player in response to `PlayerInput` events.

use std::time::Instant;

use crate::player::Player;
use crate::player::state::PlayerInput;

mod engagement;
mod overlay;
mod transport;
mod volume;

pub(crate) fn update(player: &mut Player, input: PlayerInput) {
    match input {
        // Transport
        PlayerInput::Load(episode) => transport::load(player, episode),
        PlayerInput::TogglePlay => transport::toggle_play(player),
        PlayerInput::Seek(secs) => transport::seek(player, secs),
        PlayerInput::Skip(delta) => transport::skip(player, delta),

        // Audio
        PlayerInput::SetVolume(v) => volume::set_volume(player, v),
        PlayerInput::ToggleMute => volume::toggle_mute(player),
        PlayerInput::SetRate(r) => volume::set_rate(player, r),

        // Overlay (video surface)
        PlayerInput::ToggleCaptions => overlay::toggle_captions(player),
        PlayerInput::ToggleFullscreen => overlay::toggle_fullscreen(player),
        PlayerInput::PointerMoved => overlay::pointer_moved(player, Instant::now()),
        PlayerInput::Tick => overlay::tick_controls(player, Instant::now()),
        PlayerInput::Minimize => overlay::minimize(player),

        // Engagement
        PlayerInput::ToggleLike => engagement::toggle_like(player),

        // The element pushing corrections back into the abstract state
        PlayerInput::Element(event) => transport::handle_element(player, event),
    }
}
