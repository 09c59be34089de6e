//! core/tracker.rs
//! Engagement side calls (views, likes) to the EduCast API.
//!
//! Strictly fire-and-forget: the player hands a request to the worker thread
//! and moves on. Delivery failures are logged and swallowed; they are never
//! retried and never touch playback state. The API applies its own
//! per-viewer uniqueness rules server-side; this worker does not second
//! guess them.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use super::types::Viewer;

/// Where and how to reach the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// E.g. `https://educast.example.edu/api`.
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".into(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// One engagement notification.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerRequest {
    RegisterView { episode_id: String, viewer: Viewer },
    SetLiked {
        episode_id: String,
        viewer: Viewer,
        liked: bool,
    },
}

#[derive(Debug, Error)]
enum DeliveryError {
    #[error("{0}")]
    Http(String),
    #[error("HTTP {0}")]
    BadStatus(surf::StatusCode),
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

/// Clonable request sender for the engagement worker.
#[derive(Clone)]
pub struct TrackerHandle {
    request_tx: Sender<TrackerRequest>,
}

impl TrackerHandle {
    /// Best-effort send. If the worker died, the request is dropped.
    pub fn send(&self, req: TrackerRequest) {
        let _ = self.request_tx.send(req);
    }
}

/// A handle plus the raw request receiver, for tests and hosts that deliver
/// engagement through their own transport.
pub fn channel() -> (TrackerHandle, Receiver<TrackerRequest>) {
    let (request_tx, request_rx) = mpsc::channel();
    (TrackerHandle { request_tx }, request_rx)
}

/// Spawns the delivery thread and returns the handle to store in the player.
pub fn start_tracker(config: TrackerConfig) -> TrackerHandle {
    let (handle, request_rx) = channel();

    thread::spawn(move || {
        while let Ok(req) = request_rx.recv() {
            if let Err(e) = deliver(&config, &req) {
                warn!("engagement request dropped: {e} ({req:?})");
            }
        }
    });

    handle
}

fn deliver(config: &TrackerConfig, req: &TrackerRequest) -> Result<(), DeliveryError> {
    let base = config.base_url.trim_end_matches('/');

    let (url, payload) = match req {
        TrackerRequest::RegisterView { episode_id, viewer } => (
            format!("{base}/episodes/{episode_id}/views"),
            json!({ "viewer": viewer.id() }),
        ),
        TrackerRequest::SetLiked {
            episode_id,
            viewer,
            liked,
        } => (
            format!("{base}/episodes/{episode_id}/likes"),
            json!({ "viewer": viewer.id(), "liked": liked }),
        ),
    };

    let timeout = Duration::from_secs(config.timeout_secs);

    async_std::task::block_on(async {
        let post = async {
            let body =
                surf::Body::from_json(&payload).map_err(|e| DeliveryError::Http(e.to_string()))?;
            let response = surf::post(&url)
                .body(body)
                .await
                .map_err(|e| DeliveryError::Http(e.to_string()))?;

            if !response.status().is_success() {
                return Err(DeliveryError::BadStatus(response.status()));
            }

            debug!("delivered {req:?}");
            Ok(())
        };

        match async_std::future::timeout(timeout, post).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::TimedOut(timeout)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_fill_in() {
        let config: TrackerConfig =
            serde_json::from_str(r#"{ "base_url": "https://educast.test/api" }"#).unwrap();
        assert_eq!(config.base_url, "https://educast.test/api");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn handle_survives_dead_receiver() {
        let (handle, rx) = channel();
        drop(rx);
        handle.send(TrackerRequest::RegisterView {
            episode_id: "ep".into(),
            viewer: Viewer::Anonymous,
        });
    }

    #[test]
    fn requests_arrive_in_order() {
        let (handle, rx) = channel();
        handle.send(TrackerRequest::RegisterView {
            episode_id: "ep-1".into(),
            viewer: Viewer::User("u".into()),
        });
        handle.send(TrackerRequest::SetLiked {
            episode_id: "ep-1".into(),
            viewer: Viewer::User("u".into()),
            liked: true,
        });

        let first = rx.try_recv().unwrap();
        assert!(matches!(first, TrackerRequest::RegisterView { .. }));
        let second = rx.try_recv().unwrap();
        assert!(matches!(second, TrackerRequest::SetLiked { liked: true, .. }));
        assert!(rx.try_recv().is_err());
    }
}
