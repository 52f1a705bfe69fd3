//! In-memory media store.
//!
//! Behaves like the hosted store in the ways the attachment workflow cares
//! about: destroy only succeeds when called with the resource type the
//! media was uploaded as, and unknown ids are reported as not found.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use image::ImageReader;
use uuid::Uuid;

use super::{MediaError, MediaStore, ResourceType, UploadOptions, UploadedMedia};

#[derive(Debug, Clone)]
struct StoredMedia {
    resource_type: ResourceType,
    size: usize,
}

#[derive(Debug, Default)]
pub struct FakeMediaStore {
    media: RwLock<HashMap<String, StoredMedia>>,
    destroy_calls: Mutex<Vec<(String, ResourceType)>>,
    fail_uploads: AtomicBool,
    fail_destroys: AtomicBool,
}

#[allow(dead_code)]
impl FakeMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail.
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent destroy fail, whatever the resource type.
    pub fn fail_destroys(&self, fail: bool) {
        self.fail_destroys.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, media_id: &str) -> bool {
        self.media
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(media_id)
    }

    pub fn len(&self) -> usize {
        self.media.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every `(media_id, resource_type)` destroy was called with, in order.
    pub fn destroy_calls(&self) -> Vec<(String, ResourceType)> {
        self.destroy_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

fn image_dimensions(data: &[u8]) -> Option<(i32, i32)> {
    let (w, h) = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()?;
    Some((i32::try_from(w).ok()?, i32::try_from(h).ok()?))
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn upload(
        &self,
        data: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<UploadedMedia, MediaError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(MediaError::RequestFailed(
                "fake upload failure".to_string(),
            ));
        }

        let resource_type = if options.content_type.starts_with("video/") {
            ResourceType::Video
        } else {
            ResourceType::Image
        };
        let format = options
            .content_type
            .split_once('/')
            .map(|(_, sub)| sub.to_string());
        let dimensions = match resource_type {
            ResourceType::Image => image_dimensions(&data),
            _ => None,
        };

        let media_id = format!("{}/{}", options.folder, Uuid::new_v4());
        self.media.write().unwrap_or_else(|e| e.into_inner()).insert(
            media_id.clone(),
            StoredMedia {
                resource_type,
                size: data.len(),
            },
        );

        tracing::debug!(media_id = %media_id, size = data.len(), "Stored media in memory");

        Ok(UploadedMedia {
            url: format!("memory://{}", media_id),
            media_id,
            width: dimensions.map(|(w, _)| w),
            height: dimensions.map(|(_, h)| h),
            format,
            resource_type,
        })
    }

    async fn destroy(
        &self,
        media_id: &str,
        resource_type: ResourceType,
    ) -> Result<(), MediaError> {
        self.destroy_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((media_id.to_string(), resource_type));

        if self.fail_destroys.load(Ordering::SeqCst) {
            return Err(MediaError::RequestFailed(
                "fake destroy failure".to_string(),
            ));
        }

        let mut media = self.media.write().unwrap_or_else(|e| e.into_inner());
        match media.get(media_id) {
            None => Err(MediaError::NotFound(media_id.to_string())),
            Some(stored) if stored.resource_type != resource_type => Err(MediaError::ApiError {
                status: 400,
                message: format!(
                    "resource type {} does not match {} ({} bytes)",
                    resource_type.as_str(),
                    stored.resource_type.as_str(),
                    stored.size
                ),
            }),
            Some(_) => {
                media.remove(media_id);
                Ok(())
            }
        }
    }

    fn store_name(&self) -> &'static str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(content_type: &str) -> UploadOptions {
        UploadOptions {
            folder: "test".to_string(),
            content_type: content_type.to_string(),
        }
    }

    #[tokio::test]
    async fn test_upload_reports_resource_type() {
        let store = FakeMediaStore::new();
        let image = store.upload(b"img".to_vec(), &options("image/png")).await.unwrap();
        let video = store.upload(b"vid".to_vec(), &options("video/mp4")).await.unwrap();

        assert_eq!(image.resource_type, ResourceType::Image);
        assert_eq!(image.format.as_deref(), Some("png"));
        assert_eq!(video.resource_type, ResourceType::Video);
        assert!(video.media_id.starts_with("test/"));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_destroy_requires_matching_type() {
        let store = FakeMediaStore::new();
        let video = store.upload(b"vid".to_vec(), &options("video/mp4")).await.unwrap();

        assert!(store.destroy(&video.media_id, ResourceType::Auto).await.is_err());
        assert!(store.destroy(&video.media_id, ResourceType::Image).await.is_err());
        assert!(store.destroy(&video.media_id, ResourceType::Video).await.is_ok());
        assert!(!store.contains(&video.media_id));
        assert!(matches!(
            store.destroy(&video.media_id, ResourceType::Video).await,
            Err(MediaError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failure_switches() {
        let store = FakeMediaStore::new();
        store.fail_uploads(true);
        assert!(store.upload(b"x".to_vec(), &options("image/png")).await.is_err());
        assert!(store.is_empty());
    }
}
