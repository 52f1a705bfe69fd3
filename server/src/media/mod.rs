//! Media store abstraction for recipe covers and step images/videos.
//!
//! The store is an external collaborator with two operations: upload bytes
//! and destroy by id. [`CloudinaryStore`] talks to the hosted API;
//! [`FakeMediaStore`] keeps everything in memory for development and tests.
//! The replacement workflow built on top of the trait lives in [`attach`].

pub mod attach;
mod cloudinary;
mod fake;
mod validate;

pub use cloudinary::CloudinaryStore;
pub use fake::FakeMediaStore;
pub use validate::{validate_upload, InvalidUpload};

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{MediaBackend, ServerConfig};

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media store request failed: {0}")]
    RequestFailed(String),

    #[error("Media store returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse media store response: {0}")]
    ParseError(String),

    #[error("Media store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Media not found: {0}")]
    NotFound(String),
}

/// Resource type passed to the store. Deletion is not reliably
/// type-agnostic, so callers may need to try more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Auto,
    Image,
    Video,
}

impl ResourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Auto => "auto",
            ResourceType::Image => "image",
            ResourceType::Video => "video",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(ResourceType::Auto),
            "image" => Some(ResourceType::Image),
            "video" => Some(ResourceType::Video),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub folder: String,
    pub content_type: String,
}

/// What the store reports back after a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedMedia {
    pub url: String,
    pub media_id: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub format: Option<String>,
    pub resource_type: ResourceType,
}

/// Trait for media stores, enabling a fake in tests.
#[async_trait]
pub trait MediaStore: Send + Sync + fmt::Debug {
    async fn upload(
        &self,
        data: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<UploadedMedia, MediaError>;

    async fn destroy(&self, media_id: &str, resource_type: ResourceType)
        -> Result<(), MediaError>;

    /// Short name for logs ("cloudinary", "fake").
    fn store_name(&self) -> &'static str;
}

pub fn create_store(config: &ServerConfig) -> Result<Arc<dyn MediaStore>, MediaError> {
    match &config.media_backend {
        MediaBackend::Fake => Ok(Arc::new(FakeMediaStore::default())),
        MediaBackend::Cloudinary(cloudinary) => Ok(Arc::new(CloudinaryStore::new(
            cloudinary.clone(),
            config.media_timeout,
        )?)),
    }
}
