//! Configuration module for the store admin service

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Main application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub blob: BlobSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub uploads: UploadSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Database configuration for PostgreSQL
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
}

/// Blob storage configuration
///
/// Any S3-compatible object store works; `endpoint` selects a non-AWS
/// deployment (R2, MinIO). `public_url_prefix` is the base under which
/// uploaded objects are reachable from the outside.
#[derive(Debug, Clone, Deserialize)]
pub struct BlobSettings {
    pub endpoint: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub public_url_prefix: String,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_region() -> String {
    "auto".to_string()
}

fn default_key_prefix() -> String {
    "uploads".to_string()
}

/// Session token verification settings
///
/// The identity provider signs session tokens with a shared HS256 secret;
/// `issuer` additionally pins the `iss` claim when set.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub session_secret: String,
    pub issuer: Option<String>,
}

/// Upload limits enforced server-side
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

fn default_max_bytes() -> usize {
    4 * 1024 * 1024
}

impl Default for UploadSettings {
    fn default() -> Self {
        UploadSettings {
            max_bytes: default_max_bytes(),
        }
    }
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables (prefixed with ADMIN_)
    /// 2. config/local.toml (gitignored)
    /// 3. config/default.toml
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));

        let builder = Config::builder()
            // Start with default configuration
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Add local overrides (gitignored)
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // Add environment variables (ADMIN_SERVER__PORT, etc.)
            .add_source(
                Environment::with_prefix("ADMIN")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8080,
                workers: None,
            },
            database: DatabaseSettings {
                url: String::new(),
                max_connections: Some(10),
            },
            blob: BlobSettings {
                endpoint: None,
                region: default_region(),
                access_key_id: String::new(),
                secret_access_key: String::new(),
                bucket: "store-admin-assets".to_string(),
                public_url_prefix: String::new(),
                key_prefix: default_key_prefix(),
            },
            auth: AuthSettings {
                session_secret: String::new(),
                issuer: None,
            },
            uploads: UploadSettings::default(),
        }
    }
}
