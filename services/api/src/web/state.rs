//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-viewer feed sessions.

use crate::config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use swipe_feed_core::seed::placeholder_cards;
use swipe_feed_core::{FeedController, FeedStore, ProfileSource, Viewer};
use tokio::sync::Mutex;
use tracing::info;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub feeds: Arc<FeedRegistry>,
}

impl AppState {
    pub fn new(profiles: Arc<dyn ProfileSource>, config: Arc<Config>) -> Self {
        Self {
            feeds: Arc::new(FeedRegistry::new(profiles, config)),
        }
    }
}

//=========================================================================================
// FeedRegistry (One Feed per Viewer)
//=========================================================================================

struct Session {
    controller: Arc<FeedController>,
    last_seen: Instant,
}

/// Owns one feed controller per viewer id. A feed lives until the viewer
/// signs out, sits idle past `session_idle_timeout`, or is the least recently
/// used one when `max_sessions` is reached.
pub struct FeedRegistry {
    profiles: Arc<dyn ProfileSource>,
    config: Arc<Config>,
    sessions: Mutex<HashMap<String, Session>>,
}

impl FeedRegistry {
    pub fn new(profiles: Arc<dyn ProfileSource>, config: Arc<Config>) -> Self {
        Self {
            profiles,
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the viewer's feed, creating it on first use. Idle sessions are
    /// swept on every call.
    pub async fn session(&self, viewer: &Viewer) -> Arc<FeedController> {
        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();

        let idle_timeout = self.config.session_idle_timeout;
        let before = sessions.len();
        sessions.retain(|_, s| now.duration_since(s.last_seen) < idle_timeout);
        if sessions.len() < before {
            info!(evicted = before - sessions.len(), "Dropped idle feed sessions");
        }

        if !sessions.contains_key(&viewer.id) && sessions.len() >= self.config.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, s)| s.last_seen)
                .map(|(id, _)| id.clone());
            if let Some(id) = oldest {
                sessions.remove(&id);
                info!(viewer_id = %id, "Session limit reached; dropped least recent feed");
            }
        }

        let session = sessions.entry(viewer.id.clone()).or_insert_with(|| {
            info!(viewer_id = %viewer.id, "Creating feed session");
            let store = if self.config.seed_placeholders {
                FeedStore::with_seed(placeholder_cards())
            } else {
                FeedStore::new()
            };
            Session {
                controller: Arc::new(FeedController::new(
                    Arc::new(Mutex::new(store)),
                    self.profiles.clone(),
                    self.config.feed,
                )),
                last_seen: now,
            }
        });
        session.last_seen = now;
        session.controller.clone()
    }

    /// Returns the viewer's feed after recording the viewer's current identity,
    /// which resets the feed on a role switch and fetches pages as needed.
    pub async fn bound_session(&self, viewer: &Viewer) -> Arc<FeedController> {
        let controller = self.session(viewer).await;
        controller.set_viewer(Some(viewer.clone())).await;
        controller
    }

    /// Drops the viewer's feed. Returns whether one existed.
    pub async fn end_session(&self, viewer_id: &str) -> bool {
        let removed = self.sessions.lock().await.remove(viewer_id);
        if let Some(session) = &removed {
            session.controller.set_viewer(None).await;
            info!(viewer_id = %viewer_id, "Feed session ended");
        }
        removed.is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
