//! crates/swipe_feed_core/src/ports.rs
//!
//! Defines the service contracts (traits) the feed depends on.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete profile store.

use async_trait::async_trait;
use crate::domain::{RawProfileRecord, Role};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A paginated, queryable store of user profiles.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Returns at most `limit` profiles with the given `role`, skipping the first
    /// `offset` matches and never including `exclude_id`.
    ///
    /// Implementations must return records in a stable order so that increasing
    /// offsets neither skip nor repeat records over an unchanged data set.
    async fn query(
        &self,
        role: Role,
        exclude_id: &str,
        offset: usize,
        limit: usize,
    ) -> PortResult<Vec<RawProfileRecord>>;
}
