use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Clone)]
pub struct ObjectStorageConfig {
    pub url: String,
    pub service_key: String,
    pub bucket: String,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub object_storage: Option<ObjectStorageConfig>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub allow_open_seed: bool,
    pub upload: UploadConfig,
    pub ping_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: None,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_hours: 24 * 7,
            allow_open_seed: false,
            upload: UploadConfig {
                dir: PathBuf::from("public/uploads"),
                object_storage: None,
            },
            ping_message: "ping".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = match env("PORT") {
            Some(port) => port.parse().context("PORT must be a number")?,
            None => defaults.port,
        };

        let token_ttl_hours = match env("TOKEN_TTL_HOURS") {
            Some(hours) => hours
                .parse()
                .context("TOKEN_TTL_HOURS must be a number")?,
            None => defaults.token_ttl_hours,
        };

        let jwt_secret = env("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set, using the development secret");
            defaults.jwt_secret.clone()
        });

        let object_storage = match (env("SUPABASE_URL"), env("SUPABASE_SERVICE_KEY")) {
            (Some(url), Some(service_key)) => Some(ObjectStorageConfig {
                url: url.trim_end_matches('/').to_string(),
                service_key,
                bucket: env("UPLOAD_BUCKET").unwrap_or_else(|| "media".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            host: env("HOST").unwrap_or(defaults.host),
            port,
            database_url: env("DATABASE_URL"),
            jwt_secret,
            token_ttl_hours,
            allow_open_seed: env("ALLOW_OPEN_SEED").is_some_and(|v| v == "true"),
            upload: UploadConfig {
                dir: env("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.upload.dir),
                object_storage,
            },
            ping_message: env("PING_MESSAGE").unwrap_or(defaults.ping_message),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Empty values count as unset.
fn env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
