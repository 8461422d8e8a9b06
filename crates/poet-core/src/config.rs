//! Configuration module
//!
//! Process configuration is read once from the environment (optionally seeded
//! from a `.env` file) and passed explicitly to the services that need it.
//! Nothing reads configuration globally after startup.

use std::env;
use std::path::PathBuf;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 5000;
const MAX_CONTENT_LENGTH_MB: usize = 16;
const MIN_JWT_SECRET_LEN: usize = 32;
const DEFAULT_UPLOADS_DIR: &str = "local_uploads";
const DEFAULT_UPLOADS_BUCKET: &str = "poet-uploads";
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_ALLOWED_EXTENSIONS: &str = "jpg,jpe,jpeg,png,gif,svg,bmp";

/// HTTP server and environment settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    /// HS256 secret for bearer tokens. When unset every token is rejected and
    /// all callers are anonymous.
    pub jwt_secret: Option<String>,
    pub environment: String,
}

/// Storage settings consumed by the upload storage manager.
///
/// `mode` selects the backend new uploads are written to. The settings of the
/// other backend may also be present so that records written before a
/// migration can still be read back.
#[derive(Clone, Debug, PartialEq)]
pub struct StorageConfig {
    pub mode: StorageBackend,
    pub local_root: Option<PathBuf>,
    pub remote_bucket: Option<String>,
    pub remote_region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub remote_endpoint: Option<String>,
    /// Public host used to derive links; falls back to the AWS virtual-hosted URL.
    pub remote_host: Option<String>,
}

impl StorageConfig {
    /// Local-only storage rooted at `root`.
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self {
            mode: StorageBackend::Local,
            local_root: Some(root.into()),
            remote_bucket: None,
            remote_region: DEFAULT_REGION.to_string(),
            remote_endpoint: None,
            remote_host: None,
        }
    }

    /// Remote-only storage in `bucket`.
    pub fn remote(bucket: impl Into<String>, host: Option<String>) -> Self {
        Self {
            mode: StorageBackend::S3,
            local_root: None,
            remote_bucket: Some(bucket.into()),
            remote_region: DEFAULT_REGION.to_string(),
            remote_endpoint: None,
            remote_host: host,
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.mode {
            StorageBackend::Local => {
                if self.local_root.is_none() {
                    return Err(anyhow::anyhow!(
                        "UPLOADS_DIR must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::S3 => {
                if self.remote_bucket.as_deref().map_or(true, str::is_empty) {
                    return Err(anyhow::anyhow!(
                        "S3_UPLOADS_BUCKET must be set when using S3 storage backend"
                    ));
                }
            }
        }

        if let Some(host) = &self.remote_host {
            if !(host.starts_with("http://") || host.starts_with("https://")) {
                return Err(anyhow::anyhow!(
                    "S3_PUBLIC_HOST must start with http:// or https://"
                ));
            }
        }

        Ok(())
    }
}

/// Limits applied by the uploads resource before anything reaches storage
#[derive(Clone, Debug)]
pub struct UploadLimits {
    pub max_content_length_bytes: usize,
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_content_length_bytes: MAX_CONTENT_LENGTH_MB * 1024 * 1024,
            allowed_extensions: split_list(DEFAULT_ALLOWED_EXTENSIONS),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub storage: StorageConfig,
    pub uploads: UploadLimits,
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());
        let is_production = is_production_name(&environment);

        let cors_origins_str = var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let server_port = match var("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let base = BaseConfig {
            server_port,
            cors_origins: split_list(&cors_origins_str),
            jwt_secret: var("JWT_SECRET"),
            environment,
        };

        let mode = match var("STORAGE_BACKEND") {
            Some(raw) => raw.parse::<StorageBackend>()?,
            None if is_production => StorageBackend::S3,
            None => StorageBackend::Local,
        };

        let local_root = var("UPLOADS_DIR").map(PathBuf::from).or_else(|| {
            (mode == StorageBackend::Local).then(|| PathBuf::from(DEFAULT_UPLOADS_DIR))
        });
        let remote_bucket = var("S3_UPLOADS_BUCKET")
            .or_else(|| (mode == StorageBackend::S3).then(|| DEFAULT_UPLOADS_BUCKET.to_string()));

        let storage = StorageConfig {
            mode,
            local_root,
            remote_bucket,
            remote_region: var("S3_REGION")
                .or_else(|| var("AWS_REGION"))
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            remote_endpoint: var("S3_ENDPOINT"),
            remote_host: var("S3_PUBLIC_HOST"),
        };

        let max_content_length_mb = var("MAX_CONTENT_LENGTH_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_CONTENT_LENGTH_MB);
        let max_content_length_bytes = max_content_length_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_CONTENT_LENGTH_MB is too large"))?;

        let uploads = UploadLimits {
            max_content_length_bytes,
            allowed_extensions: split_list(
                &var("ALLOWED_EXTENSIONS").unwrap_or_else(|| DEFAULT_ALLOWED_EXTENSIONS.to_string()),
            )
            .into_iter()
            .map(|ext| ext.to_lowercase())
            .collect(),
        };

        let config = Config {
            base,
            storage,
            uploads,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if let Some(secret) = &self.base.jwt_secret {
            if secret.len() < MIN_JWT_SECRET_LEN {
                return Err(anyhow::anyhow!(
                    "JWT_SECRET must be at least {} characters long",
                    MIN_JWT_SECRET_LEN
                ));
            }
        }

        if self.uploads.max_content_length_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_CONTENT_LENGTH_MB must be greater than 0"));
        }

        self.storage.validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn jwt_secret(&self) -> Option<&str> {
        self.base.jwt_secret.as_deref()
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
