//! Server configuration loaded from environment variables.
//!
//! Everything except `DATABASE_URL` has a default so a local server starts
//! with the fake media store and no other setup.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaBackend {
    /// In-memory store; uploads vanish on restart.
    Fake,
    Cloudinary(CloudinaryConfig),
}

#[derive(Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Env: `DATABASE_URL` (required)
    pub database_url: String,

    /// Env: `HTTP_ADDR`, default `0.0.0.0:3000`
    pub http_addr: SocketAddr,

    /// Env: `MEDIA_STORE` = `fake` (default) | `cloudinary`.
    /// Cloudinary also needs `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`
    /// and `CLOUDINARY_API_SECRET`.
    pub media_backend: MediaBackend,

    /// Env: `MEDIA_FOLDER`, default `potluck`
    pub media_folder: String,

    /// Upper bound on any single media store call.
    /// Env: `MEDIA_TIMEOUT_SECS`, default 30
    pub media_timeout: Duration,

    /// Env: `MAX_UPLOAD_BYTES`, default 50 MiB
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let http_addr = match lookup("HTTP_ADDR") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "HTTP_ADDR",
                value,
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 3000)),
        };

        let media_backend = match lookup("MEDIA_STORE").as_deref() {
            None | Some("fake") => MediaBackend::Fake,
            Some("cloudinary") => MediaBackend::Cloudinary(CloudinaryConfig {
                cloud_name: lookup("CLOUDINARY_CLOUD_NAME")
                    .ok_or(ConfigError::Missing("CLOUDINARY_CLOUD_NAME"))?,
                api_key: lookup("CLOUDINARY_API_KEY")
                    .ok_or(ConfigError::Missing("CLOUDINARY_API_KEY"))?,
                api_secret: lookup("CLOUDINARY_API_SECRET")
                    .ok_or(ConfigError::Missing("CLOUDINARY_API_SECRET"))?,
            }),
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "MEDIA_STORE",
                    value: other.to_string(),
                })
            }
        };

        let media_folder = lookup("MEDIA_FOLDER").unwrap_or_else(|| "potluck".to_string());

        let media_timeout = Duration::from_secs(parse_or(&lookup, "MEDIA_TIMEOUT_SECS", 30)?);
        let max_upload_bytes = parse_or(&lookup, "MAX_UPLOAD_BYTES", 50 * 1024 * 1024)?;

        Ok(Self {
            database_url,
            http_addr,
            media_backend,
            media_folder,
            media_timeout,
            max_upload_bytes,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[("DATABASE_URL", "postgres://localhost/potluck")]).unwrap();
        assert_eq!(cfg.http_addr.port(), 3000);
        assert_eq!(cfg.media_backend, MediaBackend::Fake);
        assert_eq!(cfg.media_folder, "potluck");
        assert_eq!(cfg.media_timeout, Duration::from_secs(30));
        assert_eq!(cfg.max_upload_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn test_database_url_required() {
        assert_eq!(config(&[]).unwrap_err(), ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn test_cloudinary_requires_credentials() {
        let err = config(&[
            ("DATABASE_URL", "postgres://x"),
            ("MEDIA_STORE", "cloudinary"),
            ("CLOUDINARY_CLOUD_NAME", "demo"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("CLOUDINARY_API_KEY"));

        let cfg = config(&[
            ("DATABASE_URL", "postgres://x"),
            ("MEDIA_STORE", "cloudinary"),
            ("CLOUDINARY_CLOUD_NAME", "demo"),
            ("CLOUDINARY_API_KEY", "key"),
            ("CLOUDINARY_API_SECRET", "hunter2-value"),
        ])
        .unwrap();
        assert!(matches!(cfg.media_backend, MediaBackend::Cloudinary(_)));
        assert!(!format!("{:?}", cfg).contains("hunter2-value"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = config(&[("DATABASE_URL", "postgres://x"), ("HTTP_ADDR", "nope")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "HTTP_ADDR", .. }));

        let err = config(&[
            ("DATABASE_URL", "postgres://x"),
            ("MEDIA_TIMEOUT_SECS", "soon"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "MEDIA_TIMEOUT_SECS", .. }));

        let err = config(&[("DATABASE_URL", "postgres://x"), ("MEDIA_STORE", "s3")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "MEDIA_STORE", .. }));
    }
}
