//! crates/swipe_feed_core/src/store.rs
//!
//! The Feed Store: the card queue, the read cursor, swipe decisions and the
//! pagination flags for one viewer session. Every operation is synchronous and
//! performs no I/O; fetching lives in `controller`.

use crate::domain::{Card, Decisions, SwipeDirection, Viewer};
use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

/// Rejections from the store's mutating operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("There is no card waiting to be swiped")]
    NoCurrentCard,
    #[error("Card {got} is not the current card (expected {expected})")]
    CardMismatch { expected: String, got: String },
}

/// Lifecycle of a feed, derived from the store's flags and queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedPhase {
    Empty,
    LoadingFirstPage,
    Ready,
    LoadingMore,
    Exhausted,
}

impl FeedPhase {
    /// Phases reachable from `self` without a reset. A reset may move any
    /// phase back to `Empty`.
    pub fn allowed_transitions(self) -> &'static [FeedPhase] {
        use FeedPhase::*;
        match self {
            Empty => &[LoadingFirstPage, Exhausted],
            LoadingFirstPage => &[Ready, Exhausted],
            Ready => &[LoadingMore],
            LoadingMore => &[Ready, Exhausted],
            Exhausted => &[],
        }
    }

    pub fn can_transition_to(self, next: FeedPhase) -> bool {
        next == FeedPhase::Empty || self == next || self.allowed_transitions().contains(&next)
    }
}

/// What the rendering layer needs to draw the card stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    pub current: Option<Card>,
    pub visible: Vec<Card>,
    pub current_index: usize,
    pub total: usize,
    pub phase: FeedPhase,
    pub loading: bool,
    pub has_more: bool,
}

#[derive(Debug, Clone)]
pub struct FeedStore {
    cards: Vec<Card>,
    current_index: usize,
    swiped: HashSet<String>,
    liked: HashSet<String>,
    passed: HashSet<String>,
    loading: bool,
    has_more: bool,
    /// Raw records consumed from the source; the offset of the next page.
    source_offset: usize,
    /// Incremented by every reset so in-flight pages can be recognised as stale.
    generation: u64,
    viewer: Option<Viewer>,
    seed: Vec<Card>,
    seeded: bool,
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedStore {
    pub fn new() -> Self {
        Self::with_seed(Vec::new())
    }

    /// A store showing `seed` until the first real page arrives. `reset`
    /// restores the same seed.
    pub fn with_seed(seed: Vec<Card>) -> Self {
        Self {
            cards: seed.clone(),
            current_index: 0,
            swiped: HashSet::new(),
            liked: HashSet::new(),
            passed: HashSet::new(),
            loading: false,
            has_more: true,
            source_offset: 0,
            generation: 0,
            viewer: None,
            seeded: !seed.is_empty(),
            seed,
        }
    }

    // --- Mutations ---

    /// Replaces the whole queue and clears cursor and decisions.
    pub fn set_cards(&mut self, cards: Vec<Card>) {
        self.cards.clear();
        self.current_index = 0;
        self.swiped.clear();
        self.liked.clear();
        self.passed.clear();
        self.seeded = false;
        self.append_unique(cards);
    }

    /// Appends a page, keeping cursor and decisions. Cards whose id is already
    /// queued are dropped. Returns how many cards were appended.
    pub fn add_cards(&mut self, cards: Vec<Card>) -> usize {
        self.append_unique(cards)
    }

    fn append_unique(&mut self, cards: Vec<Card>) -> usize {
        let mut known: HashSet<String> = self.cards.iter().map(|c| c.id.clone()).collect();
        let before = self.cards.len();
        for card in cards {
            if known.insert(card.id.clone()) {
                self.cards.push(card);
            } else {
                warn!(card_id = %card.id, "Dropping duplicate card from page");
            }
        }
        self.cards.len() - before
    }

    /// Records a decision on the current card and advances the cursor by one.
    ///
    /// `card_id` must be the id of the current card; anything else is rejected
    /// and leaves the store untouched.
    pub fn swipe_card(
        &mut self,
        card_id: &str,
        direction: SwipeDirection,
    ) -> Result<(), FeedError> {
        let current = self.current().ok_or(FeedError::NoCurrentCard)?;
        if current.id != card_id {
            return Err(FeedError::CardMismatch {
                expected: current.id.clone(),
                got: card_id.to_string(),
            });
        }

        let id = card_id.to_string();
        if direction.is_like() {
            self.liked.insert(id.clone());
        } else {
            self.passed.insert(id.clone());
        }
        self.swiped.insert(id);
        self.current_index += 1;
        Ok(())
    }

    /// Swipes whatever card is current and returns its id.
    pub fn swipe_current(&mut self, direction: SwipeDirection) -> Result<String, FeedError> {
        let id = self
            .current()
            .map(|c| c.id.clone())
            .ok_or(FeedError::NoCurrentCard)?;
        self.swipe_card(&id, direction)?;
        Ok(id)
    }

    /// Restores the initial state. The bound viewer is kept.
    pub fn reset(&mut self) {
        self.cards = self.seed.clone();
        self.seeded = !self.seed.is_empty();
        self.current_index = 0;
        self.swiped.clear();
        self.liked.clear();
        self.passed.clear();
        self.loading = false;
        self.has_more = true;
        self.source_offset = 0;
        self.generation += 1;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }

    /// Records `count` more raw records as consumed from the source.
    pub fn advance_source_offset(&mut self, count: usize) {
        self.source_offset += count;
    }

    /// Binds the feed to `viewer`, resetting it when the identity or role
    /// changed. Returns whether a reset happened.
    pub fn bind_viewer(&mut self, viewer: Option<Viewer>) -> bool {
        if self.viewer == viewer {
            return false;
        }
        self.viewer = viewer;
        self.reset();
        true
    }

    /// Records `viewer` as the bound viewer when none is bound yet. Unlike
    /// `bind_viewer` this never resets the feed.
    pub fn adopt_viewer(&mut self, viewer: &Viewer) -> bool {
        if self.viewer.is_some() {
            return false;
        }
        self.viewer = Some(viewer.clone());
        true
    }

    // --- Reads ---

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> Option<&Card> {
        self.cards.get(self.current_index)
    }

    /// Up to `depth` cards starting at the cursor, front to back.
    pub fn visible(&self, depth: usize) -> &[Card] {
        let end = (self.current_index + depth).min(self.cards.len());
        &self.cards[self.current_index..end]
    }

    /// Looks a queued card up by id, decided or not.
    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Buffered cards not yet decided.
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.current_index
    }

    /// Whether another page should be requested given the low-water mark.
    pub fn needs_more(&self, low_water: usize) -> bool {
        self.remaining() <= low_water && self.has_more && !self.loading
    }

    /// True when the queue holds no fetched cards, only seed content or nothing.
    pub fn awaiting_first_page(&self) -> bool {
        self.cards.is_empty() || self.seeded
    }

    /// Every buffered card has been decided.
    pub fn is_finished(&self) -> bool {
        self.current().is_none()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn source_offset(&self) -> usize {
        self.source_offset
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    pub fn swiped_cards(&self) -> &HashSet<String> {
        &self.swiped
    }

    pub fn liked_cards(&self) -> &HashSet<String> {
        &self.liked
    }

    pub fn passed_cards(&self) -> &HashSet<String> {
        &self.passed
    }

    /// Liked and passed ids in queue order.
    pub fn decisions(&self) -> Decisions {
        let mut decisions = Decisions::default();
        for card in &self.cards[..self.current_index] {
            if self.liked.contains(&card.id) {
                decisions.liked.push(card.id.clone());
            } else if self.passed.contains(&card.id) {
                decisions.passed.push(card.id.clone());
            }
        }
        decisions
    }

    pub fn phase(&self) -> FeedPhase {
        let has_fetched = !self.awaiting_first_page();
        match (self.loading, self.has_more, has_fetched) {
            (true, _, false) => FeedPhase::LoadingFirstPage,
            (true, _, true) => FeedPhase::LoadingMore,
            (false, false, _) => FeedPhase::Exhausted,
            (false, true, false) => FeedPhase::Empty,
            (false, true, true) => FeedPhase::Ready,
        }
    }

    pub fn snapshot(&self, depth: usize) -> FeedSnapshot {
        FeedSnapshot {
            current: self.current().cloned(),
            visible: self.visible(depth).to_vec(),
            current_index: self.current_index,
            total: self.cards.len(),
            phase: self.phase(),
            loading: self.loading,
            has_more: self.has_more,
        }
    }
}
