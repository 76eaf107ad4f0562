//! crates/swipe_feed_core/src/controller.rs
//!
//! The Feed Controller bridges the viewer's identity to the `ProfileSource`,
//! turns fetched records into cards and decides when the next page is due.
//!
//! A fetch is split into three steps so that the store lock is never held while
//! waiting on the source: `begin_fetch` checks the gates and raises `loading`,
//! the query runs unlocked, and `complete_fetch` applies (or discards) the page
//! and lowers `loading` again.

use crate::domain::{RawProfileRecord, Role, SwipeDirection, Viewer};
use crate::ports::{PortResult, ProfileSource};
use crate::store::{FeedError, FeedSnapshot, FeedStore};
use crate::transform::transform_page;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// The store as shared between the controller and the rendering layer.
pub type SharedFeed = Arc<Mutex<FeedStore>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    /// Records requested per page. A shorter page means the source is exhausted.
    pub page_size: usize,
    /// Remaining buffered cards at or below which the next page is requested.
    pub low_water: usize,
    /// Cards handed to the renderer for the layered stack.
    pub visible_depth: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            low_water: 2,
            visible_depth: 3,
        }
    }
}

/// Why `ensure_fed` returned without querying the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    InFlight,
    Exhausted,
    /// More than `low_water` cards are still buffered.
    BufferFull,
    NoViewer,
    RoleUnresolved,
    UnknownRole(String),
}

/// The result of one `ensure_fed` call. Failures are absorbed into the store's
/// flags; this value only reports what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Skipped(SkipReason),
    Applied {
        received: usize,
        appended: usize,
        exhausted: bool,
    },
    /// The feed was reset or rebound while the request was in flight.
    Discarded,
    Failed,
}

/// Snapshot of everything a request needs, taken when it is issued.
#[derive(Debug, Clone)]
struct FetchTicket {
    generation: u64,
    viewer: Viewer,
    counterpart: Role,
    offset: usize,
    limit: usize,
}

pub struct FeedController {
    feed: SharedFeed,
    source: Arc<dyn ProfileSource>,
    config: FeedConfig,
}

impl FeedController {
    pub fn new(feed: SharedFeed, source: Arc<dyn ProfileSource>, config: FeedConfig) -> Self {
        Self {
            feed,
            source,
            config,
        }
    }

    pub fn feed(&self) -> SharedFeed {
        self.feed.clone()
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Requests the next page for `viewer` unless a fetch is already in flight,
    /// the source is exhausted, or the viewer cannot be served.
    ///
    /// Pages keep being requested while the buffer stays at or below the
    /// low-water mark, so a page whose records were all dropped does not
    /// strand the feed. Consecutive applied pages are reported as one outcome.
    pub async fn ensure_fed(&self, viewer: Option<&Viewer>) -> FetchOutcome {
        let mut outcome = self.fetch_page(viewer).await;
        while let FetchOutcome::Applied {
            received,
            appended,
            exhausted: false,
        } = outcome
        {
            if !self.feed.lock().await.needs_more(self.config.low_water) {
                break;
            }
            outcome = match self.fetch_page(viewer).await {
                FetchOutcome::Applied {
                    received: more,
                    appended: added,
                    exhausted,
                } => FetchOutcome::Applied {
                    received: received + more,
                    appended: appended + added,
                    exhausted,
                },
                FetchOutcome::Skipped(_) => break,
                other => return other,
            };
        }
        outcome
    }

    async fn fetch_page(&self, viewer: Option<&Viewer>) -> FetchOutcome {
        let ticket = {
            let mut feed = self.feed.lock().await;
            match self.begin_fetch(&mut feed, viewer) {
                Ok(ticket) => ticket,
                Err(reason) => {
                    debug!(?reason, "Skipping feed fetch");
                    return FetchOutcome::Skipped(reason);
                }
            }
        };

        debug!(
            counterpart = %ticket.counterpart,
            offset = ticket.offset,
            limit = ticket.limit,
            "Requesting profile page"
        );
        let result = self
            .source
            .query(ticket.counterpart, &ticket.viewer.id, ticket.offset, ticket.limit)
            .await;

        let mut feed = self.feed.lock().await;
        Self::complete_fetch(&mut feed, ticket, result)
    }

    fn begin_fetch(
        &self,
        feed: &mut FeedStore,
        viewer: Option<&Viewer>,
    ) -> Result<FetchTicket, SkipReason> {
        if feed.is_loading() {
            return Err(SkipReason::InFlight);
        }
        if !feed.has_more() {
            return Err(SkipReason::Exhausted);
        }
        let viewer = viewer.ok_or(SkipReason::NoViewer)?;
        let role = match viewer.resolved_role() {
            None => return Err(SkipReason::RoleUnresolved),
            Some(Ok(role)) => role,
            Some(Err(unknown)) => {
                warn!(viewer_id = %viewer.id, role = %unknown.0, "No feed for unknown role");
                feed.set_has_more(false);
                return Err(SkipReason::UnknownRole(unknown.0));
            }
        };

        if feed.adopt_viewer(viewer) {
            debug!(viewer_id = %viewer.id, "Feed bound to requesting viewer");
        }
        feed.set_loading(true);
        Ok(FetchTicket {
            generation: feed.generation(),
            viewer: viewer.clone(),
            counterpart: role.counterpart(),
            offset: feed.source_offset(),
            limit: self.config.page_size,
        })
    }

    fn complete_fetch(
        feed: &mut FeedStore,
        ticket: FetchTicket,
        result: PortResult<Vec<RawProfileRecord>>,
    ) -> FetchOutcome {
        if feed.generation() != ticket.generation {
            info!(viewer_id = %ticket.viewer.id, "Discarding page fetched before a reset");
            return FetchOutcome::Discarded;
        }
        feed.set_loading(false);
        if feed.viewer().is_some_and(|bound| *bound != ticket.viewer) {
            info!(viewer_id = %ticket.viewer.id, "Discarding page fetched for another viewer");
            return FetchOutcome::Discarded;
        }

        let records = match result {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Profile query failed; no more cards this session");
                feed.set_has_more(false);
                if feed.is_seeded() {
                    feed.set_cards(Vec::new());
                }
                return FetchOutcome::Failed;
            }
        };

        let received = records.len();
        feed.advance_source_offset(received);
        let cards = transform_page(records, ticket.counterpart, &ticket.viewer.id);
        let appended = if feed.awaiting_first_page() {
            let count = cards.len();
            feed.set_cards(cards);
            count
        } else {
            feed.add_cards(cards)
        };

        let exhausted = received < ticket.limit;
        if exhausted {
            feed.set_has_more(false);
        }
        info!(received, appended, exhausted, "Applied profile page");
        FetchOutcome::Applied {
            received,
            appended,
            exhausted,
        }
    }

    /// Records a viewer transition (sign-in, sign-out, role switch). The feed is
    /// reset when the identity or role changed, and fed when it is still empty.
    pub async fn set_viewer(&self, viewer: Option<Viewer>) -> FetchOutcome {
        let needs_first_page = {
            let mut feed = self.feed.lock().await;
            if feed.bind_viewer(viewer.clone()) {
                info!("Viewer changed; feed reset");
            }
            feed.awaiting_first_page()
        };
        if needs_first_page {
            self.ensure_fed(viewer.as_ref()).await
        } else {
            self.top_up().await
        }
    }

    /// Fetches the next page for the bound viewer if the buffer is running low.
    pub async fn top_up(&self) -> FetchOutcome {
        let viewer = {
            let feed = self.feed.lock().await;
            if !feed.needs_more(self.config.low_water) {
                let reason = if feed.is_loading() {
                    SkipReason::InFlight
                } else if !feed.has_more() {
                    SkipReason::Exhausted
                } else {
                    SkipReason::BufferFull
                };
                return FetchOutcome::Skipped(reason);
            }
            feed.viewer().cloned()
        };
        self.ensure_fed(viewer.as_ref()).await
    }

    /// Swipes `card_id` and, now that the cursor moved, tops the buffer up.
    pub async fn swipe(
        &self,
        card_id: &str,
        direction: SwipeDirection,
    ) -> Result<FetchOutcome, FeedError> {
        self.feed.lock().await.swipe_card(card_id, direction)?;
        Ok(self.top_up().await)
    }

    /// Drops everything and starts over from the first page.
    pub async fn refresh(&self) -> FetchOutcome {
        let viewer = {
            let mut feed = self.feed.lock().await;
            feed.reset();
            feed.viewer().cloned()
        };
        self.ensure_fed(viewer.as_ref()).await
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        self.feed.lock().await.snapshot(self.config.visible_depth)
    }
}
