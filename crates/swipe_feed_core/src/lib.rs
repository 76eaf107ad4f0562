pub mod controller;
pub mod domain;
pub mod ports;
pub mod seed;
pub mod store;
pub mod transform;

pub use controller::{FeedConfig, FeedController, FetchOutcome, SharedFeed, SkipReason};
pub use domain::{Card, Decisions, RawProfileRecord, Role, SwipeDirection, UnknownRole, Viewer};
pub use ports::{PortError, PortResult, ProfileSource};
pub use store::{FeedError, FeedPhase, FeedSnapshot, FeedStore};
