//! File upload, listing, deletion, and tag handlers.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use bytes::Bytes;
use uuid::Uuid;

use acadhub_core::error::AppError;
use acadhub_entity::file::FileRecordWithOwner;
use acadhub_service::file::delete::DeletionOutcome;
use acadhub_service::file::upload::{UploadOutcome, UploadRequest};

use crate::dto::response::ApiResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

const DEFAULT_MIME: &str = "application/octet-stream";

/// POST /file/upload
///
/// Multipart form: `title`, `subject`, `subjectcode`, `semester`,
/// `tags` (JSON array of strings), and the `file` part itself.
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadOutcome>>, AppError> {
    let mut title = None;
    let mut subject = None;
    let mut subject_code = None;
    let mut semester = None;
    let mut tags: Vec<String> = Vec::new();
    let mut file: Option<(String, String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "title" => title = Some(read_text(field).await?),
            "subject" => subject = Some(read_text(field).await?),
            "subjectcode" => subject_code = Some(read_text(field).await?),
            "semester" => semester = Some(read_text(field).await?),
            "tags" => {
                let raw = read_text(field).await?;
                tags = serde_json::from_str(&raw)
                    .map_err(|_| AppError::validation("Field 'tags' must be a JSON array of strings"))?;
            }
            "file" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::validation("File part is missing a filename"))?;
                let mime_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| DEFAULT_MIME.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Failed to read file part: {e}")))?;
                file = Some((filename, mime_type, data));
            }
            _ => {}
        }
    }

    let (filename, mime_type, data) =
        file.ok_or_else(|| AppError::validation("Missing required part: file"))?;

    let request = UploadRequest {
        filename,
        mime_type,
        data,
        title: title.unwrap_or_default(),
        subject: subject.unwrap_or_default(),
        semester: semester.unwrap_or_default(),
        subject_code: subject_code.unwrap_or_default(),
        tags,
    };

    let outcome = state.upload_service.upload(auth.context(), request).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::validation(format!("Failed to read form field: {e}")))
}

/// GET /file/
pub async fn list_files(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<FileRecordWithOwner>>>, AppError> {
    let files = state.query_service.list_all().await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// GET /file/userfiles
pub async fn list_user_files(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<FileRecordWithOwner>>>, AppError> {
    let files = state.query_service.list_owned(auth.context()).await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// DELETE /file/delete/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletionOutcome>>, AppError> {
    let outcome = state.deletion_service.delete(auth.context(), id).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// GET /file/get-tags
pub async fn get_tags(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    let tags = state.query_service.tag_names().await?;
    Ok(Json(ApiResponse::ok(tags)))
}
