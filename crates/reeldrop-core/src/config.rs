//! Configuration module
//!
//! Settings are read from the environment (a `.env` file is honored through dotenvy),
//! defaulted where a safe default exists, and validated once at startup. Store
//! credentials are never defaulted: a missing one is a configuration error.

use std::env;

use crate::error::AppError;
use crate::session::SessionIdSource;
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 4000;
const MAX_CHUNK_SIZE_MB: usize = 25;
const MAX_FORM_FIELDS: usize = 8;
const MAX_CHUNK_SIZE_MB_LIMIT: usize = 1024;
const MAX_FORM_FIELDS_LIMIT: usize = 64;
const PRESIGN_TTL_SECS: u64 = 60;
const MAX_PRESIGN_TTL_SECS: u64 = 900;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const DEFAULT_REGION: &str = "auto";

/// Base configuration for the HTTP server
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_concurrency_limit: usize,
    /// Emit log lines as JSON objects instead of the compact console format
    pub log_json: bool,
}

/// Credentials and location of the S3-compatible store
#[derive(Clone)]
pub struct StoreCredentials {
    pub endpoint: String,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub store_endpoint: Option<String>,
    pub store_bucket: Option<String>,
    pub store_access_key_id: Option<String>,
    pub store_secret_access_key: Option<String>,
    pub store_region: String,
    pub local_storage_path: Option<String>,
    // Upload protocol
    pub max_chunk_size_bytes: usize,
    pub max_form_fields: usize,
    pub presign_ttl_secs: u64,
    pub ingest_cors_permissive: bool,
    pub session_id_source: SessionIdSource,
}

fn first_of<F>(lookup: &F, names: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .find_map(|name| lookup(name))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .map(|v| v.to_lowercase())
        .and_then(|v| match v.as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = first_of(&lookup, &["ENVIRONMENT", "APP_ENV"])
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = first_of(&lookup, &["CORS_ORIGINS"])
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: match first_of(&lookup, &["PORT"]) {
                Some(port) => port
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
                None => SERVER_PORT,
            },
            cors_origins,
            environment,
            http_concurrency_limit: first_of(&lookup, &["HTTP_CONCURRENCY_LIMIT"])
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
            log_json: first_of(&lookup, &["LOG_FORMAT"])
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        let storage_backend = match first_of(&lookup, &["STORAGE_BACKEND"]) {
            Some(s) => s.parse()?,
            None => StorageBackend::S3,
        };

        let max_chunk_size_mb = first_of(&lookup, &["MAX_CHUNK_SIZE_MB"])
            .map(|s| {
                s.parse::<usize>()
                    .map_err(|_| anyhow::anyhow!("MAX_CHUNK_SIZE_MB must be a positive integer"))
            })
            .transpose()?
            .unwrap_or(MAX_CHUNK_SIZE_MB);
        let max_chunk_size_bytes = max_chunk_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "MAX_CHUNK_SIZE_MB must be at most {}",
                    MAX_CHUNK_SIZE_MB_LIMIT
                )
            })?;

        let session_id_source = match first_of(&lookup, &["SESSION_ID_SOURCE"]) {
            Some(s) => s.parse()?,
            None => SessionIdSource::detect(),
        };

        let config = Config {
            base,
            storage_backend,
            store_endpoint: first_of(&lookup, &["R2_ENDPOINT", "S3_ENDPOINT"]),
            store_bucket: first_of(&lookup, &["R2_BUCKET", "S3_BUCKET"]),
            store_access_key_id: first_of(&lookup, &["R2_ACCESS_KEY_ID", "AWS_ACCESS_KEY_ID"]),
            store_secret_access_key: first_of(
                &lookup,
                &["R2_SECRET_ACCESS_KEY", "AWS_SECRET_ACCESS_KEY"],
            ),
            store_region: first_of(&lookup, &["R2_REGION", "S3_REGION"])
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            local_storage_path: first_of(&lookup, &["LOCAL_STORAGE_PATH"]),
            max_chunk_size_bytes,
            max_form_fields: first_of(&lookup, &["MAX_FORM_FIELDS"])
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_FORM_FIELDS),
            presign_ttl_secs: first_of(&lookup, &["PRESIGN_TTL_SECS"])
                .map(|s| {
                    s.parse::<u64>()
                        .map_err(|_| anyhow::anyhow!("PRESIGN_TTL_SECS must be a number"))
                })
                .transpose()?
                .unwrap_or(PRESIGN_TTL_SECS),
            ingest_cors_permissive: parse_bool(
                first_of(&lookup, &["INGEST_CORS_PERMISSIVE"]),
                true,
            ),
            session_id_source,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_chunk_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_CHUNK_SIZE_MB must be greater than 0"));
        }

        if self.max_chunk_size_bytes > MAX_CHUNK_SIZE_MB_LIMIT * 1024 * 1024 {
            return Err(anyhow::anyhow!(
                "MAX_CHUNK_SIZE_MB must be at most {}",
                MAX_CHUNK_SIZE_MB_LIMIT
            ));
        }

        if self.max_form_fields < 2 {
            return Err(anyhow::anyhow!(
                "MAX_FORM_FIELDS must allow at least sessionId and idx"
            ));
        }

        if self.max_form_fields > MAX_FORM_FIELDS_LIMIT {
            return Err(anyhow::anyhow!(
                "MAX_FORM_FIELDS must be at most {}",
                MAX_FORM_FIELDS_LIMIT
            ));
        }

        if self.presign_ttl_secs == 0 || self.presign_ttl_secs > MAX_PRESIGN_TTL_SECS {
            return Err(anyhow::anyhow!(
                "PRESIGN_TTL_SECS must be between 1 and {}",
                MAX_PRESIGN_TTL_SECS
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                self.store_credentials()?;
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Store credentials, or a configuration error naming every missing setting.
    pub fn store_credentials(&self) -> Result<StoreCredentials, AppError> {
        let mut missing = Vec::new();
        if self.store_endpoint.is_none() {
            missing.push("R2_ENDPOINT");
        }
        if self.store_bucket.is_none() {
            missing.push("R2_BUCKET");
        }
        if self.store_access_key_id.is_none() {
            missing.push("R2_ACCESS_KEY_ID");
        }
        if self.store_secret_access_key.is_none() {
            missing.push("R2_SECRET_ACCESS_KEY");
        }

        match (
            &self.store_endpoint,
            &self.store_bucket,
            &self.store_access_key_id,
            &self.store_secret_access_key,
        ) {
            (Some(endpoint), Some(bucket), Some(access_key_id), Some(secret_access_key)) => {
                Ok(StoreCredentials {
                    endpoint: endpoint.clone(),
                    bucket: bucket.clone(),
                    access_key_id: access_key_id.clone(),
                    secret_access_key: secret_access_key.clone(),
                    region: self.store_region.clone(),
                })
            }
            _ => Err(AppError::Configuration(format!(
                "Missing env var: {}",
                missing.join(", ")
            ))),
        }
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.base.http_concurrency_limit
    }

    pub fn log_json(&self) -> bool {
        self.base.log_json
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    pub fn max_chunk_size_bytes(&self) -> usize {
        self.max_chunk_size_bytes
    }

    pub fn max_form_fields(&self) -> usize {
        self.max_form_fields
    }

    pub fn presign_ttl_secs(&self) -> u64 {
        self.presign_ttl_secs
    }

    pub fn ingest_cors_permissive(&self) -> bool {
        self.ingest_cors_permissive
    }

    pub fn session_id_source(&self) -> SessionIdSource {
        self.session_id_source
    }
}
