//! Drive blob store client.
//!
//! Talks to a Google-Drive-style REST API: multipart upload into a
//! configured parent folder, a permissions endpoint for public-read
//! grants, field-filtered metadata reads for link resolution, and
//! deletion by object id. Every call is bounded by the configured
//! request timeout so a hanging remote maps to `UploadFailed` /
//! `DeleteFailed` instead of blocking the caller indefinitely.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info};

use acadhub_core::config::drive::DriveConfig;
use acadhub_core::error::{AppError, ErrorKind};
use acadhub_core::result::AppResult;
use acadhub_core::traits::blobstore::{BlobStore, ObjectLinks, StoredObject};

/// Minimum length of a remote object id. Shorter id-character runs inside
/// a URL are path segments or query keys, not object ids.
const MIN_REMOTE_ID_LEN: usize = 25;

/// Boundary for the multipart/related upload body.
const UPLOAD_BOUNDARY: &str = "acadhub_upload_boundary";

/// HTTP client for the remote drive API.
#[derive(Debug, Clone)]
pub struct DriveClient {
    http: reqwest::Client,
    config: DriveConfig,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveLinks {
    web_content_link: Option<String>,
    web_view_link: Option<String>,
}

impl DriveClient {
    /// Create a new drive client from configuration.
    pub fn new(config: DriveConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        info!(
            api_base = %config.api_base,
            parent_folder = %config.parent_folder_id,
            "Initializing drive blob store client"
        );

        Ok(Self { http, config })
    }

    /// Assemble the multipart/related body: a JSON metadata part followed
    /// by the media part.
    fn build_upload_body(&self, data: &Bytes, display_name: &str, mime_type: &str) -> Vec<u8> {
        let metadata = serde_json::json!({
            "name": display_name,
            "parents": [self.config.parent_folder_id],
        });

        let mut body = Vec::with_capacity(data.len() + 512);
        body.extend_from_slice(format!("--{UPLOAD_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
        body.extend_from_slice(metadata.to_string().as_bytes());
        body.extend_from_slice(format!("\r\n--{UPLOAD_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(format!("Content-Type: {mime_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{UPLOAD_BOUNDARY}--\r\n").as_bytes());
        body
    }
}

#[async_trait]
impl BlobStore for DriveClient {
    fn provider_type(&self) -> &str {
        "drive"
    }

    async fn store(
        &self,
        data: Bytes,
        display_name: &str,
        mime_type: &str,
    ) -> AppResult<StoredObject> {
        let url = format!(
            "{}/files?uploadType=multipart&fields=id",
            self.config.upload_base
        );
        let body = self.build_upload_body(&data, display_name, mime_type);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.access_token)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={UPLOAD_BOUNDARY}"),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::UploadFailed,
                    format!("Drive upload request failed: {e}"),
                    e,
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::upload_failed(format!(
                "Drive upload rejected ({status}): {detail}"
            )));
        }

        let file: DriveFile = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::UploadFailed,
                "Drive upload returned an unreadable response",
                e,
            )
        })?;

        debug!(remote_id = %file.id, name = %display_name, "Object stored in drive");

        Ok(StoredObject {
            download_url: self.fallback_download_url(&file.id),
            view_url: Some(self.fallback_view_url(&file.id)),
            remote_id: file.id,
        })
    }

    async fn grant_public_read(&self, remote_id: &str) -> AppResult<()> {
        let url = format!("{}/files/{remote_id}/permissions", self.config.api_base);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.access_token)
            .json(&serde_json::json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Internal,
                    format!("Drive permission request failed: {e}"),
                    e,
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::internal(format!(
                "Drive permission grant rejected ({status})"
            )));
        }

        debug!(remote_id = %remote_id, "Public-read permission granted");
        Ok(())
    }

    async fn resolve_links(&self, remote_id: &str) -> AppResult<ObjectLinks> {
        let url = format!(
            "{}/files/{remote_id}?fields=webContentLink,webViewLink",
            self.config.api_base
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Internal,
                    format!("Drive link resolution failed: {e}"),
                    e,
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::internal(format!(
                "Drive link resolution rejected ({status})"
            )));
        }

        let links: DriveLinks = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Internal,
                "Drive link resolution returned an unreadable response",
                e,
            )
        })?;

        Ok(ObjectLinks {
            download_url: links.web_content_link,
            view_url: links.web_view_link,
        })
    }

    async fn delete_by_id(&self, remote_id: &str) -> AppResult<()> {
        let url = format!("{}/files/{remote_id}", self.config.api_base);

        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::DeleteFailed,
                    format!("Drive delete request failed: {e}"),
                    e,
                )
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(AppError::not_found(format!(
                "Remote object {remote_id} not found"
            ))),
            status if status.is_success() => {
                debug!(remote_id = %remote_id, "Object deleted from drive");
                Ok(())
            }
            status => Err(AppError::delete_failed(format!(
                "Drive delete rejected ({status})"
            ))),
        }
    }

    fn extract_remote_id(&self, file_url: &str) -> Option<String> {
        extract_drive_id(file_url)
    }

    fn fallback_download_url(&self, remote_id: &str) -> String {
        format!(
            "{}/uc?export=download&id={remote_id}",
            self.config.public_base
        )
    }

    fn fallback_view_url(&self, remote_id: &str) -> String {
        format!("{}/file/d/{remote_id}/view", self.config.public_base)
    }
}

/// Recover a remote object id from a stored URL: the first run of 25 or
/// more id characters (alphanumeric, `-`, `_`). Returns `None` when no
/// such run exists, which callers treat as "skip remote deletion".
pub fn extract_drive_id(url: &str) -> Option<String> {
    let mut current = String::new();
    for c in url.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            current.push(c);
        } else {
            if current.len() >= MIN_REMOTE_ID_LEN {
                return Some(current);
            }
            current.clear();
        }
    }
    if current.len() >= MIN_REMOTE_ID_LEN {
        Some(current)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "1HHB4A6YjLc90ZMlUbYcX97Gr51bEldfV";

    #[test]
    fn test_extract_from_download_url() {
        let url = format!("https://drive.google.com/uc?export=download&id={ID}");
        assert_eq!(extract_drive_id(&url).as_deref(), Some(ID));
    }

    #[test]
    fn test_extract_from_view_url() {
        let url = format!("https://drive.google.com/file/d/{ID}/view?usp=drivesdk");
        assert_eq!(extract_drive_id(&url).as_deref(), Some(ID));
    }

    #[test]
    fn test_extract_unrecognized_url() {
        assert_eq!(extract_drive_id("https://example.com/some/short/path"), None);
        assert_eq!(extract_drive_id(""), None);
    }

    #[test]
    fn test_extract_trailing_run() {
        let url = format!("id-at-the-very-end?id={ID}");
        assert_eq!(extract_drive_id(&url).as_deref(), Some(ID));
    }

    #[test]
    fn test_short_runs_are_skipped() {
        // Host and path segments are id characters but too short.
        assert_eq!(
            extract_drive_id("https://drive.google.com/uc?export=download&id=short"),
            None
        );
    }
}
