use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::api::error::ApiError;
use crate::api::extract::AppPath;
use crate::api::AppState;
use crate::models::{NewPhoto, PhotoSummary};

/// Multipart field carrying the images
const PHOTO_FIELD: &str = "photos";
/// Maximum photos per upload request.
pub const MAX_PHOTOS: usize = 10;

/// `POST /{id}/photos`: store every `photos` part of a multipart body.
pub async fn upload(
    State(state): State<AppState>,
    AppPath(client_id): AppPath<i64>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut multipart = multipart?;
    let mut photos = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        if photos.len() == MAX_PHOTOS {
            return Err(ApiError::BadRequest(format!(
                "Maximum {MAX_PHOTOS} photos per upload"
            )));
        }

        let file_name = field.file_name().unwrap_or("photo").to_string();
        let mime_type = field
            .content_type()
            .map_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string(), str::to_string);
        let data = field.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read upload bytes: {e}");
            ApiError::BadRequest("Failed to read photo data".into())
        })?;

        photos.push(NewPhoto {
            file_name,
            mime_type,
            data: data.to_vec(),
        });
    }

    if photos.is_empty() {
        return Err(ApiError::BadRequest("No photos sent".into()));
    }

    state
        .db
        .add_photos(client_id, &photos)
        .await
        .map_err(|e| ApiError::from_db(e, "Failed to store photos"))?;

    tracing::info!(client_id, count = photos.len(), "photos uploaded");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Photos uploaded successfully" })),
    ))
}

/// `GET /{id}/photos`
pub async fn list(
    State(state): State<AppState>,
    AppPath(client_id): AppPath<i64>,
) -> Result<Json<Vec<PhotoSummary>>, ApiError> {
    let photos = state
        .db
        .list_photos(client_id)
        .await
        .map_err(|e| ApiError::from_db(e, "Failed to list photos"))?;

    Ok(Json(photos))
}

/// `DELETE /photos/{id}`
pub async fn remove(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .db
        .delete_photo(id)
        .await
        .map_err(|e| ApiError::from_db(e, "Failed to delete photo"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /photos/{id}/image`: the stored bytes under their stored content type.
pub async fn image(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let photo = state
        .db
        .photo_content(id)
        .await
        .map_err(|e| ApiError::from_db(e, "Failed to load photo"))?;

    Ok(([(header::CONTENT_TYPE, photo.mime_type)], photo.data))
}
