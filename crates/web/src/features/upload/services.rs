//! Where uploaded media ends up: an object-storage bucket when one is
//! configured, local disk otherwise (and whenever the bucket fails).

use std::path::PathBuf;

use axum::body::Bytes;
use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::config::{ObjectStorageConfig, UploadConfig};
use crate::error::{WebError, WebResult};

pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
pub const LOCAL_URL_PREFIX: &str = "/uploads";

pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

pub fn is_allowed_media(content_type: &str) -> bool {
    content_type.starts_with("image/") || content_type.starts_with("video/")
}

/// Replaces everything outside `[A-Za-z0-9_.-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub struct UploadSink {
    local: LocalDisk,
    remote: Option<ObjectStorage>,
}

impl UploadSink {
    pub fn new(config: &UploadConfig) -> std::io::Result<Self> {
        std::fs::create_dir_all(&config.dir)?;

        Ok(Self {
            local: LocalDisk {
                dir: config.dir.clone(),
            },
            remote: config.object_storage.clone().map(ObjectStorage::new),
        })
    }

    pub fn local_dir(&self) -> &PathBuf {
        &self.local.dir
    }

    /// Persists the file and returns a URL it can be fetched from.
    pub async fn store(&self, file: UploadedFile) -> WebResult<String> {
        let stored_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(&file.file_name));

        if let Some(remote) = &self.remote {
            match remote.put(&stored_name, &file).await {
                Ok(url) => return Ok(url),
                Err(e) => {
                    tracing::error!("Object storage upload failed, falling back to local: {}", e)
                }
            }
        }

        self.local.put(&stored_name, &file.bytes).await
    }
}

struct LocalDisk {
    dir: PathBuf,
}

impl LocalDisk {
    async fn put(&self, stored_name: &str, bytes: &Bytes) -> WebResult<String> {
        let path = self.dir.join(stored_name);
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            WebError::InternalServerError(format!("Failed to write {}: {}", path.display(), e))
        })?;

        tracing::info!("Stored upload at {}", path.display());
        Ok(format!("{}/{}", LOCAL_URL_PREFIX, stored_name))
    }
}

struct ObjectStorage {
    client: reqwest::Client,
    config: ObjectStorageConfig,
    bucket_ready: OnceCell<()>,
}

impl ObjectStorage {
    fn new(config: ObjectStorageConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            bucket_ready: OnceCell::new(),
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.service_key)
    }

    // Best effort: the bucket usually exists already and creation then fails.
    async fn ensure_bucket(&self) {
        self.bucket_ready
            .get_or_init(|| async {
                let result = self
                    .client
                    .post(format!("{}/storage/v1/bucket", self.config.url))
                    .header(AUTHORIZATION, self.bearer())
                    .header("apikey", &self.config.service_key)
                    .json(&json!({
                        "id": self.config.bucket,
                        "name": self.config.bucket,
                        "public": true
                    }))
                    .send()
                    .await;

                if let Err(e) = result {
                    tracing::debug!("Bucket creation request failed: {}", e);
                }
            })
            .await;
    }

    async fn put(&self, stored_name: &str, file: &UploadedFile) -> reqwest::Result<String> {
        self.ensure_bucket().await;

        let key = format!("{}-{}", Utc::now().timestamp_millis(), stored_name);
        self.client
            .post(format!(
                "{}/storage/v1/object/{}/{}",
                self.config.url, self.config.bucket, key
            ))
            .header(AUTHORIZATION, self.bearer())
            .header("apikey", &self.config.service_key)
            .header(CONTENT_TYPE, &file.content_type)
            .header("x-upsert", "false")
            .body(file.bytes.clone())
            .send()
            .await?
            .error_for_status()?;

        Ok(format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.url, self.config.bucket, key
        ))
    }
}
