pub mod middleware;
pub mod rest;
pub mod state;

// Re-export the handlers to make them easily accessible
// to the binary that builds the web server router.
pub use middleware::require_viewer;
pub use rest::{
    card_details_handler, decisions_handler, end_session_handler, get_feed_handler,
    health_handler, refresh_handler, swipe_handler,
};
