use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::features::destinations::handlers::{self, DestinationState};

/// Create routes for destinations, drafts and images
///
/// Multipart upload routes accept bodies up to `upload_body_limit` bytes
pub fn routes(state: DestinationState, upload_body_limit: usize) -> Router {
    Router::new()
        .route("/api/destinations", get(handlers::list_destinations))
        .route("/api/destinations/map", get(handlers::get_map))
        .route("/api/destinations/events", get(handlers::stream_events))
        .route(
            "/api/destinations/{id}",
            get(handlers::get_destination)
                .patch(handlers::update_description)
                .delete(handlers::delete_destination),
        )
        .route(
            "/api/destinations/{id}/images",
            post(handlers::append_images).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route(
            "/api/destinations/{id}/images/{position}",
            delete(handlers::remove_image),
        )
        .route("/api/images/{id}", get(handlers::get_image))
        .route("/api/drafts", post(handlers::open_draft))
        .route(
            "/api/drafts/{id}",
            get(handlers::get_draft).delete(handlers::dismiss_draft),
        )
        .route(
            "/api/drafts/{id}/images",
            post(handlers::attach_images).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/api/drafts/{id}/submit", post(handlers::submit_draft))
        .with_state(state)
}
