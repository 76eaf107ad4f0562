//! services/api/src/web/middleware.rs
//!
//! Viewer extraction for the feed routes.

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use swipe_feed_core::Viewer;
use tracing::warn;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Reads the viewer identity forwarded by the authentication layer in front of
/// this service. The role header is optional while onboarding is incomplete.
pub fn viewer_from_headers(headers: &HeaderMap) -> Option<Viewer> {
    let id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())?;
    let role = headers
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    Some(Viewer::new(id, role))
}

/// Middleware that extracts the viewer and inserts it into request extensions.
///
/// If the user id header is missing, returns 401 Unauthorized.
pub async fn require_viewer(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let viewer = viewer_from_headers(req.headers()).ok_or_else(|| {
        warn!("Rejecting feed request without {}", USER_ID_HEADER);
        StatusCode::UNAUTHORIZED
    })?;

    req.extensions_mut().insert(viewer);
    Ok(next.run(req).await)
}
