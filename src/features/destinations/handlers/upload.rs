use axum::extract::{multipart::MultipartError, Multipart};
use axum::http::StatusCode;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::destinations::models::ImageSelection;
use crate::shared::constants::IMAGE_FIELD_NAME;

fn multipart_error(e: MultipartError) -> AppError {
    debug!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    }
}

/// Collect every `image` part of a multipart body as an unresolved selection
pub async fn read_image_selections(
    mut multipart: Multipart,
    max_images: usize,
) -> Result<Vec<ImageSelection>> {
    let mut selections = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != IMAGE_FIELD_NAME {
            debug!("Ignoring unknown field: {}", field_name);
            continue;
        }

        if selections.len() == max_images {
            return Err(AppError::BadRequest(format!(
                "Too many images. At most {} per upload",
                max_images
            )));
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unnamed".to_string());
        let data = field.bytes().await.map_err(multipart_error)?;

        selections.push(ImageSelection {
            file_name,
            content_type,
            data,
        });
    }

    if selections.is_empty() {
        return Err(AppError::BadRequest(
            "At least one image is required".to_string(),
        ));
    }

    Ok(selections)
}
