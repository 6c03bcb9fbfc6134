use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::destinations::dtos::{
    AttachImagesResponseDto, DeletedResponseDto, DraftResponseDto, SubmitDraftDto,
    SubmitDraftResponseDto, UploadImagesDto,
};
use crate::features::destinations::handlers::upload::read_image_selections;
use crate::features::destinations::handlers::DestinationState;
use crate::shared::types::ApiResponse;

/// Open an add-destination form
#[utoipa::path(
    post,
    path = "/api/drafts",
    responses(
        (status = 201, description = "Draft opened", body = ApiResponse<DraftResponseDto>)
    ),
    tag = "drafts"
)]
pub async fn open_draft(
    State(state): State<DestinationState>,
) -> Result<(StatusCode, Json<ApiResponse<DraftResponseDto>>)> {
    let draft = state.drafts.open().await;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(draft.into())),
    ))
}

/// Get an open draft with its pending photos
#[utoipa::path(
    get,
    path = "/api/drafts/{id}",
    params(
        ("id" = Uuid, Path, description = "Draft ID")
    ),
    responses(
        (status = 200, description = "Draft found", body = ApiResponse<DraftResponseDto>),
        (status = 404, description = "Draft not found")
    ),
    tag = "drafts"
)]
pub async fn get_draft(
    State(state): State<DestinationState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DraftResponseDto>>> {
    let draft = state.drafts.get(id).await?;
    Ok(Json(ApiResponse::ok(draft.into())))
}

/// Attach photos to a draft
///
/// Accepts multipart/form-data with one or more `image` parts.
#[utoipa::path(
    post,
    path = "/api/drafts/{id}/images",
    params(
        ("id" = Uuid, Path, description = "Draft ID")
    ),
    request_body(
        content = UploadImagesDto,
        content_type = "multipart/form-data",
        description = "One or more `image` parts",
    ),
    responses(
        (status = 200, description = "Photos processed", body = ApiResponse<AttachImagesResponseDto>),
        (status = 400, description = "No image or too many images"),
        (status = 404, description = "Draft not found"),
        (status = 409, description = "Draft dismissed during upload"),
        (status = 413, description = "Upload too large")
    ),
    tag = "drafts"
)]
pub async fn attach_images(
    State(state): State<DestinationState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<AttachImagesResponseDto>>> {
    // Fail before reading the body
    state.drafts.get(id).await?;

    let selections = read_image_selections(multipart, state.images.max_images_per_upload).await?;
    let attached = state.drafts.attach(id, selections).await?;

    Ok(Json(ApiResponse::ok(AttachImagesResponseDto::new(
        attached.resolved,
        attached.first_position,
    ))))
}

/// Submit the form: validate, geocode and save
///
/// Saving an address that already exists updates that destination instead of
/// creating a second one.
#[utoipa::path(
    post,
    path = "/api/drafts/{id}/submit",
    params(
        ("id" = Uuid, Path, description = "Draft ID")
    ),
    request_body = SubmitDraftDto,
    responses(
        (status = 201, description = "Destination created", body = ApiResponse<SubmitDraftResponseDto>),
        (status = 200, description = "Existing destination updated", body = ApiResponse<SubmitDraftResponseDto>),
        (status = 400, description = "Missing field or photo"),
        (status = 404, description = "Draft not found"),
        (status = 409, description = "Draft dismissed while geocoding"),
        (status = 422, description = "Address not found"),
        (status = 502, description = "Geocoder unavailable")
    ),
    tag = "drafts"
)]
pub async fn submit_draft(
    State(state): State<DestinationState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<SubmitDraftDto>,
) -> Result<(StatusCode, Json<ApiResponse<SubmitDraftResponseDto>>)> {
    let outcome = state
        .drafts
        .submit(id, dto.address, dto.description)
        .await?;

    let (status, message) = if outcome.created {
        (StatusCode::CREATED, "Destination created")
    } else {
        (StatusCode::OK, "Destination updated")
    };
    Ok((
        status,
        Json(ApiResponse::ok(outcome.into()).with_message(message)),
    ))
}

/// Dismiss the form without saving
#[utoipa::path(
    delete,
    path = "/api/drafts/{id}",
    params(
        ("id" = Uuid, Path, description = "Draft ID")
    ),
    responses(
        (status = 200, description = "Draft dismissed", body = ApiResponse<DeletedResponseDto>),
        (status = 404, description = "Draft not found")
    ),
    tag = "drafts"
)]
pub async fn dismiss_draft(
    State(state): State<DestinationState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedResponseDto>>> {
    state.drafts.dismiss(id).await?;
    Ok(Json(
        ApiResponse::ok(DeletedResponseDto { deleted: true }).with_message("Draft dismissed"),
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::destinations::models::Coordinate;
    use crate::shared::constants::{MSG_ADDRESS_NOT_FOUND, MSG_FIELDS_REQUIRED};
    use crate::shared::test_helpers::{jpeg_bytes, random_description, test_router, StubGeocoder};

    fn server() -> TestServer {
        let geocoder = StubGeocoder::new().with(
            "123 Main St",
            Coordinate::new(39.7817, -89.6501).unwrap(),
        );
        TestServer::new(test_router(geocoder)).unwrap()
    }

    fn photo(name: &str) -> Part {
        Part::bytes(jpeg_bytes())
            .file_name(name.to_string())
            .mime_type("image/jpeg")
    }

    async fn open_draft(server: &TestServer) -> String {
        let response = server.post("/api/drafts").await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn attach(server: &TestServer, draft: &str, names: &[&str]) -> Value {
        let form = names
            .iter()
            .fold(MultipartForm::new(), |form, name| form.add_part("image", photo(name)));
        let response = server
            .post(&format!("/api/drafts/{}/images", draft))
            .multipart(form)
            .await;
        response.assert_status_ok();
        response.json()
    }

    #[tokio::test]
    async fn test_add_destination_flow_creates_then_updates() {
        let server = server();

        let first = open_draft(&server).await;
        attach(&server, &first, &["img1.jpg"]).await;
        let response = server
            .post(&format!("/api/drafts/{}/submit", first))
            .json(&json!({"address": "123 Main St", "description": "Nice view"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["created"], true);
        assert_eq!(body["data"]["destination"]["name"], "123 Main St");
        assert_eq!(body["data"]["destination"]["coordinate"]["latitude"], 39.7817);

        let second = open_draft(&server).await;
        attach(&server, &second, &["img2.jpg"]).await;
        let response = server
            .post(&format!("/api/drafts/{}/submit", second))
            .json(&json!({"address": "123 Main St", "description": "Updated"}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["created"], false);

        let list: Value = server.get("/api/destinations").await.json();
        assert_eq!(list["meta"]["total"], 1);
        let destination = &list["data"][0];
        assert_eq!(destination["description"], "Updated");
        let names: Vec<&str> = destination["images"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["file_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["img1.jpg", "img2.jpg"]);
    }

    #[tokio::test]
    async fn test_attach_reports_skipped_photos() {
        let server = server();
        let draft = open_draft(&server).await;

        let form = MultipartForm::new()
            .add_part("image", photo("beach.jpg"))
            .add_part(
                "image",
                Part::bytes(b"just text".to_vec())
                    .file_name("notes.txt")
                    .mime_type("text/plain"),
            )
            .add_text("caption", "ignored");
        let response = server
            .post(&format!("/api/drafts/{}/images", draft))
            .multipart(form)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["attached"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["skipped"][0]["file_name"], "notes.txt");

        let draft: Value = server.get(&format!("/api/drafts/{}", draft)).await.json();
        assert_eq!(draft["data"]["pending_images"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_attach_rejects_too_many_photos() {
        let server = server();
        let draft = open_draft(&server).await;

        let form = ["a.jpg", "b.jpg", "c.jpg", "d.jpg"]
            .iter()
            .fold(MultipartForm::new(), |form, name| form.add_part("image", photo(name)));
        let response = server
            .post(&format!("/api/drafts/{}/images", draft))
            .multipart(form)
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_submit_errors_map_to_statuses() {
        let server = server();
        let draft = open_draft(&server).await;

        let response = server
            .post(&format!("/api/drafts/{}/submit", draft))
            .json(&json!({"address": "123 Main St", "description": random_description()}))
            .expect_failure()
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], MSG_FIELDS_REQUIRED);

        attach(&server, &draft, &["a.jpg"]).await;
        let response = server
            .post(&format!("/api/drafts/{}/submit", draft))
            .json(&json!({"address": "Nowhere 1", "description": random_description()}))
            .expect_failure()
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["message"], MSG_ADDRESS_NOT_FOUND);

        let list: Value = server.get("/api/destinations").await.json();
        assert_eq!(list["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_dismissed_draft_is_gone() {
        let server = server();
        let draft = open_draft(&server).await;

        server
            .delete(&format!("/api/drafts/{}", draft))
            .await
            .assert_status_ok();

        server
            .get(&format!("/api/drafts/{}", draft))
            .expect_failure()
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .post(&format!("/api/drafts/{}/submit", draft))
            .json(&json!({"address": "123 Main St", "description": "x"}))
            .expect_failure()
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
