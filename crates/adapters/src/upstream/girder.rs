// Copyright 2025 ITK Performance Benchmarking Contributors
// SPDX-License-Identifier: Apache-2.0

//! Girder data-management adapter.
//!
//! Uploads benchmark result files into a Girder folder through the Girder
//! REST API.
//!
//! # Example
//!
//! ```ignore
//! use itk_perf_adapters::upstream::girder::{Credentials, GirderClient};
//!
//! let mut client = GirderClient::new(DEFAULT_API_URL)?;
//! client.authenticate(&Credentials::ApiKey(key)).await?;
//! let uploaded = client.upload_directory(folder_id, &results_dir).await?;
//! ```

use super::settings::GirderSettings;
use itk_perf_benchmarks::io::{list_result_files, RESULT_EXTENSION};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Public Kitware data server.
pub const DEFAULT_API_URL: &str = "https://data.kitware.com/api/v1";

/// Folder collecting the performance results on the public data server.
pub const DEFAULT_FOLDER_ID: &str = "5a8ccf9a8d777f06857838d0";

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "Girder-Token";

/// Errors that can occur while talking to Girder.
#[derive(Debug, Error)]
pub enum GirderError {
    /// HTTP transport or status error
    #[error("Girder request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// No API key and no username/password configured
    #[error("No Girder credentials configured: set girder.api_key or girder.username and girder.password")]
    MissingCredentials,

    /// Upload attempted before authentication
    #[error("Not authenticated with Girder")]
    NotAuthenticated,

    /// Reading a local file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Listing the result store failed
    #[error(transparent)]
    Store(#[from] itk_perf_core::Error),
}

/// Result type for Girder operations.
pub type Result<T> = std::result::Result<T, GirderError>;

/// How to obtain a session token.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Personal API key.
    ApiKey(String),
    /// Account login.
    Password { username: String, password: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.write_str("ApiKey(***)"),
            Credentials::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

impl Credentials {
    /// Pick credentials from settings: an API key wins over a login.
    pub fn from_settings(settings: &GirderSettings) -> Result<Self> {
        if let Some(key) = settings.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Ok(Credentials::ApiKey(key.clone()));
        }
        match (&settings.username, &settings.password) {
            (Some(username), Some(password)) => Ok(Credentials::Password {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => Err(GirderError::MissingCredentials),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(rename = "authToken")]
    auth_token: AuthToken,
}

#[derive(Debug, Deserialize)]
struct AuthToken {
    token: String,
}

#[derive(Debug, Deserialize)]
struct UploadSession {
    #[serde(rename = "_id")]
    id: String,
}

/// A file stored in Girder.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    /// Girder file ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// File name.
    #[serde(default)]
    pub name: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
}

/// Girder REST client.
pub struct GirderClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GirderClient {
    /// Create a client for the API rooted at `api_url`.
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("itk-perf/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http(api_url, http))
    }

    /// Create a client over an existing HTTP client.
    pub fn with_http(api_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Full URL of an API route.
    pub fn endpoint(&self, route: &str) -> String {
        format!("{}/{}", self.api_url, route.trim_start_matches('/'))
    }

    /// Whether a session token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(GirderError::NotAuthenticated)
    }

    /// Obtain a session token.
    pub async fn authenticate(&mut self, credentials: &Credentials) -> Result<()> {
        let request = match credentials {
            Credentials::ApiKey(key) => self
                .http
                .post(self.endpoint("api_key/token"))
                .query(&[("key", key.as_str())]),
            Credentials::Password { username, password } => self
                .http
                .get(self.endpoint("user/authentication"))
                .basic_auth(username, Some(password)),
        };
        let response: AuthResponse = request.send().await?.error_for_status()?.json().await?;
        self.token = Some(response.auth_token.token);
        info!(api_url = %self.api_url, "Authenticated with Girder");
        Ok(())
    }

    /// Upload one file into `folder_id`.
    pub async fn upload_file(&self, folder_id: &str, path: &Path) -> Result<UploadedFile> {
        let token = self.token()?;
        let bytes = tokio::fs::read(path).await.map_err(|source| GirderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let size = bytes.len().to_string();

        let init = self
            .http
            .post(self.endpoint("file"))
            .header(TOKEN_HEADER, token)
            .query(&[
                ("parentType", "folder"),
                ("parentId", folder_id),
                ("name", name.as_str()),
                ("size", size.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        // Girder creates empty files directly from the init request.
        if bytes.is_empty() {
            return Ok(init.json().await?);
        }

        let session: UploadSession = init.json().await?;
        debug!(file = %name, upload_id = %session.id, "Upload session opened");

        let file: UploadedFile = self
            .http
            .post(self.endpoint("file/chunk"))
            .header(TOKEN_HEADER, token)
            .query(&[("uploadId", session.id.as_str()), ("offset", "0")])
            .body(bytes)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(file)
    }

    /// Upload every result file of `dir` into `folder_id`, in name order.
    pub async fn upload_directory(&self, folder_id: &str, dir: &Path) -> Result<Vec<UploadedFile>> {
        let files = list_result_files(dir, RESULT_EXTENSION)?;
        info!(dir = %dir.display(), files = files.len(), folder_id, "Uploading results");

        let mut uploaded = Vec::with_capacity(files.len());
        for path in &files {
            let file = self.upload_file(folder_id, path).await?;
            info!(file = %path.display(), id = %file.id, size = file.size, "Uploaded");
            uploaded.push(file);
        }
        Ok(uploaded)
    }
}
