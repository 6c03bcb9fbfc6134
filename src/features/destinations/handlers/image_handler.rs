use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::destinations::handlers::DestinationState;

/// Fetch the bytes of a photo by its handle
#[utoipa::path(
    get,
    path = "/api/images/{id}",
    params(
        ("id" = Uuid, Path, description = "Image handle ID")
    ),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Image not found")
    ),
    tag = "images"
)]
pub async fn get_image(
    State(state): State<DestinationState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let image = state.destinations.image(id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable".to_string()),
        ],
        image.data,
    ))
}
