//! Remote blob store (drive) configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the drive-style remote object store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Base URL of the drive metadata API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Base URL of the drive upload API.
    #[serde(default = "default_upload_base")]
    pub upload_base: String,
    /// Public base URL used for deterministic download/view links.
    #[serde(default = "default_public_base")]
    pub public_base: String,
    /// Bearer token presented on every drive API call.
    ///
    /// Obtaining and refreshing this token (service-account exchange) is
    /// deployment plumbing outside the application core.
    #[serde(default)]
    pub access_token: String,
    /// Remote folder that receives all uploaded objects.
    #[serde(default)]
    pub parent_folder_id: String,
    /// Per-request timeout in seconds for all drive calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

fn default_upload_base() -> String {
    "https://www.googleapis.com/upload/drive/v3".to_string()
}

fn default_public_base() -> String {
    "https://drive.google.com".to_string()
}

fn default_request_timeout() -> u64 {
    60
}
