//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the feed endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use swipe_feed_core::{Card, FeedPhase, FeedSnapshot, SwipeDirection, Viewer};
use tracing::{info, warn};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        get_feed_handler,
        swipe_handler,
        refresh_handler,
        card_details_handler,
        decisions_handler,
        end_session_handler,
        health_handler,
    ),
    components(
        schemas(FeedView, SwipeRequest, DecisionsResponse)
    ),
    tags(
        (name = "Swipe Feed API", description = "Card feed for matching job seekers and employers.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The card stack as the client should render it.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedView {
    /// The card on top of the stack; absent when there are no more cards.
    #[schema(value_type = Object)]
    pub current: Option<Card>,
    /// The current card followed by the ones layered behind it.
    #[schema(value_type = Vec<Object>)]
    pub visible: Vec<Card>,
    pub current_index: usize,
    pub total: usize,
    #[schema(value_type = String)]
    pub phase: FeedPhase,
    pub loading: bool,
    pub has_more: bool,
}

impl From<FeedSnapshot> for FeedView {
    fn from(snapshot: FeedSnapshot) -> Self {
        Self {
            current: snapshot.current,
            visible: snapshot.visible,
            current_index: snapshot.current_index,
            total: snapshot.total,
            phase: snapshot.phase,
            loading: snapshot.loading,
            has_more: snapshot.has_more,
        }
    }
}

/// A decision on the current card.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRequest {
    pub card_id: String,
    /// `left` to pass, `right` to like.
    #[schema(value_type = String)]
    pub direction: SwipeDirection,
}

#[derive(Serialize, ToSchema)]
pub struct DecisionsResponse {
    pub liked: Vec<String>,
    pub passed: Vec<String>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Returns the viewer's card stack, fetching the first page if needed.
#[utoipa::path(
    get,
    path = "/feed",
    responses(
        (status = 200, description = "Current card stack", body = FeedView),
        (status = 401, description = "Missing x-user-id header")
    ),
    params(
        ("x-user-id" = String, Header, description = "The unique ID of the viewer."),
        ("x-user-role" = Option<String>, Header, description = "job_seeker or employer.")
    )
)]
pub async fn get_feed_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
) -> Json<FeedView> {
    let controller = app_state.feeds.bound_session(&viewer).await;
    Json(controller.snapshot().await.into())
}

/// Records a like or pass on the current card.
#[utoipa::path(
    post,
    path = "/feed/swipe",
    request_body = SwipeRequest,
    responses(
        (status = 200, description = "Card stack after the swipe", body = FeedView),
        (status = 409, description = "The card is not the current card"),
        (status = 401, description = "Missing x-user-id header")
    ),
    params(
        ("x-user-id" = String, Header, description = "The unique ID of the viewer."),
        ("x-user-role" = Option<String>, Header, description = "job_seeker or employer.")
    )
)]
pub async fn swipe_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
    Json(request): Json<SwipeRequest>,
) -> Result<Json<FeedView>, (StatusCode, String)> {
    let controller = app_state.feeds.bound_session(&viewer).await;
    match controller.swipe(&request.card_id, request.direction).await {
        Ok(outcome) => {
            info!(
                viewer_id = %viewer.id,
                card_id = %request.card_id,
                direction = ?request.direction,
                ?outcome,
                "Swipe recorded"
            );
            Ok(Json(controller.snapshot().await.into()))
        }
        Err(e) => {
            warn!(viewer_id = %viewer.id, error = %e, "Swipe rejected");
            Err((StatusCode::CONFLICT, e.to_string()))
        }
    }
}

/// Drops the viewer's feed and starts again from the first page.
#[utoipa::path(
    post,
    path = "/feed/refresh",
    responses(
        (status = 200, description = "Fresh card stack", body = FeedView),
        (status = 401, description = "Missing x-user-id header")
    ),
    params(
        ("x-user-id" = String, Header, description = "The unique ID of the viewer."),
        ("x-user-role" = Option<String>, Header, description = "job_seeker or employer.")
    )
)]
pub async fn refresh_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
) -> Json<FeedView> {
    let controller = app_state.feeds.bound_session(&viewer).await;
    let outcome = controller.refresh().await;
    info!(viewer_id = %viewer.id, ?outcome, "Feed refreshed");
    Json(controller.snapshot().await.into())
}

/// Returns a single queued card for the detail view.
#[utoipa::path(
    get,
    path = "/feed/cards/{id}",
    responses(
        (status = 200, description = "The card as JSON"),
        (status = 404, description = "The card is not in the viewer's feed")
    ),
    params(
        ("id" = String, Path, description = "The card id."),
        ("x-user-id" = String, Header, description = "The unique ID of the viewer.")
    )
)]
pub async fn card_details_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
    Path(card_id): Path<String>,
) -> Result<Json<Card>, (StatusCode, String)> {
    let controller = app_state.feeds.session(&viewer).await;
    let feed = controller.feed();
    let card = feed.lock().await.card(&card_id).cloned();
    card.map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            format!("Card {} not found", card_id),
        )
    })
}

/// Lists the viewer's likes and passes in the order they were made.
#[utoipa::path(
    get,
    path = "/feed/decisions",
    responses(
        (status = 200, description = "Liked and passed card ids", body = DecisionsResponse)
    ),
    params(
        ("x-user-id" = String, Header, description = "The unique ID of the viewer.")
    )
)]
pub async fn decisions_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
) -> Json<DecisionsResponse> {
    let controller = app_state.feeds.session(&viewer).await;
    let decisions = controller.feed().lock().await.decisions();
    Json(DecisionsResponse {
        liked: decisions.liked,
        passed: decisions.passed,
    })
}

/// Ends the viewer's feed session, e.g. on sign-out.
#[utoipa::path(
    delete,
    path = "/feed",
    responses(
        (status = 204, description = "Session ended"),
        (status = 404, description = "No session for this viewer")
    ),
    params(
        ("x-user-id" = String, Header, description = "The unique ID of the viewer.")
    )
)]
pub async fn end_session_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(viewer): Extension<Viewer>,
) -> StatusCode {
    if app_state.feeds.end_session(&viewer.id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
