//! player/update/engagement.rs
//! The view-registration protocol and the like toggle.
//!
//! A "view" means a fresh start: the first play of a session that begins
//! near zero. Pause/resume cycles do not count again; a replay after the
//! episode ended does (Ended re-arms the flag, as does binding a new
//! episode). Requests go out fire-and-forget; the tracker worker owns
//! delivery and failure is never our problem here.

use tracing::debug;

use crate::core::tracker::TrackerRequest;
use crate::player::Player;
use crate::player::state::VIEW_THRESHOLD_SECS;

/// Called on every play-start; sends at most one view per playback session.
pub(crate) fn register_view_if_fresh(player: &mut Player) {
    if player.view_registered {
        return;
    }
    // Resuming from deeper in is a continuation, not a new view.
    if player.position_secs >= VIEW_THRESHOLD_SECS {
        return;
    }
    let Some(episode) = &player.episode else {
        return;
    };

    player.view_registered = true;
    debug!("registering view for {:?}", episode.id);
    player.tracker.send(TrackerRequest::RegisterView {
        episode_id: episode.id.clone(),
        viewer: player.viewer.clone(),
    });
}

pub(crate) fn toggle_like(player: &mut Player) {
    let Some(episode) = &player.episode else {
        debug!("like toggle ignored: nothing loaded");
        return;
    };

    player.liked = !player.liked;
    player.tracker.send(TrackerRequest::SetLiked {
        episode_id: episode.id.clone(),
        viewer: player.viewer.clone(),
        liked: player.liked,
    });
}

#[cfg(test)]
mod tests {
    use crate::core::element::ElementEvent;
    use crate::core::tracker::TrackerRequest;
    use crate::core::types::Viewer;
    use crate::player::state::{PlayerInput, Surface};
    use crate::player::testkit::{episode, rig};

    fn loaded_player() -> (
        crate::player::Player,
        std::sync::mpsc::Receiver<TrackerRequest>,
    ) {
        let (mut player, _commands, requests) = rig(Surface::mini_audio());
        player.apply(PlayerInput::Load(episode("ep-7", Some(300.0))));
        player.apply(PlayerInput::Element(ElementEvent::Loaded {
            duration_secs: Some(300.0),
        }));
        (player, requests)
    }

    #[test]
    fn one_view_per_session_no_matter_how_many_pauses() {
        let (mut player, requests) = loaded_player();

        for _ in 0..5 {
            player.apply(PlayerInput::TogglePlay); // play
            player.apply(PlayerInput::TogglePlay); // pause
        }

        let views: Vec<_> = std::iter::from_fn(|| requests.try_recv().ok()).collect();
        assert_eq!(views.len(), 1);
        assert!(matches!(&views[0], TrackerRequest::RegisterView { episode_id, .. } if episode_id == "ep-7"));
    }

    #[test]
    fn resuming_from_deep_in_the_episode_is_not_a_view() {
        let (mut player, requests) = loaded_player();

        // A hypothetical session that starts by scrubbing forward first.
        player.apply(PlayerInput::Seek(120.0));
        player.apply(PlayerInput::TogglePlay);

        assert!(requests.try_recv().is_err());
    }

    #[test]
    fn replay_after_ended_counts_again() {
        let (mut player, requests) = loaded_player();

        player.apply(PlayerInput::TogglePlay);
        assert!(requests.try_recv().is_ok());

        player.apply(PlayerInput::Element(ElementEvent::Ended));
        player.apply(PlayerInput::TogglePlay);

        // Distinct playback session, second view.
        assert!(matches!(
            requests.try_recv(),
            Ok(TrackerRequest::RegisterView { .. })
        ));
        assert!(requests.try_recv().is_err());
    }

    #[test]
    fn loading_a_new_episode_rearms_registration() {
        let (mut player, requests) = loaded_player();

        player.apply(PlayerInput::TogglePlay);
        assert!(requests.try_recv().is_ok());

        player.apply(PlayerInput::Load(episode("ep-8", Some(60.0))));
        player.apply(PlayerInput::Element(ElementEvent::Loaded {
            duration_secs: Some(60.0),
        }));
        player.apply(PlayerInput::TogglePlay);

        assert!(matches!(
            requests.try_recv(),
            Ok(TrackerRequest::RegisterView { episode_id, .. }) if episode_id == "ep-8"
        ));
    }

    #[test]
    fn a_failed_start_does_not_double_count_the_view() {
        let (mut player, requests) = loaded_player();

        player.apply(PlayerInput::TogglePlay);
        player.apply(PlayerInput::Element(ElementEvent::StartRejected(
            "blocked".into(),
        )));
        player.apply(PlayerInput::TogglePlay);

        let views: Vec<_> = std::iter::from_fn(|| requests.try_recv().ok()).collect();
        assert_eq!(views.len(), 1);
    }

    #[test]
    fn like_toggles_flow_through_with_identity() {
        let (mut player, requests) = loaded_player();

        player.apply(PlayerInput::ToggleLike);
        player.apply(PlayerInput::ToggleLike);

        assert_eq!(
            requests.try_recv().unwrap(),
            TrackerRequest::SetLiked {
                episode_id: "ep-7".into(),
                viewer: Viewer::User("student-1".into()),
                liked: true,
            }
        );
        assert!(matches!(
            requests.try_recv().unwrap(),
            TrackerRequest::SetLiked { liked: false, .. }
        ));
    }

    #[test]
    fn like_without_an_episode_is_ignored() {
        let (mut player, _commands, requests) = rig(Surface::mini_audio());
        player.apply(PlayerInput::ToggleLike);
        assert!(requests.try_recv().is_err());
    }
}
