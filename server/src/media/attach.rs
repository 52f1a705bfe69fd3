//! Replacing the media attached to a recipe cover or step.
//!
//! Upload always happens first. The previous attachment is only touched
//! after the new one is in the store and recorded on the recipe, and
//! failing to delete it never fails the request; an orphaned blob is
//! preferable to a recipe pointing at nothing.

use std::time::Duration;

use tracing::{info, warn};

use super::{MediaError, MediaStore, ResourceType, UploadOptions, UploadedMedia};
use crate::models::{MediaAttachment, StepKind};

/// Order in which deletion is attempted. The store's destroy call only
/// succeeds for the resource type the media was uploaded as, and that type
/// is not recorded alongside the attachment.
pub const DESTROY_ORDER: [ResourceType; 3] =
    [ResourceType::Auto, ResourceType::Image, ResourceType::Video];

pub async fn upload_with_timeout(
    store: &dyn MediaStore,
    data: Vec<u8>,
    options: &UploadOptions,
    timeout: Duration,
) -> Result<UploadedMedia, MediaError> {
    match tokio::time::timeout(timeout, store.upload(data, options)).await {
        Ok(result) => result,
        Err(_) => Err(MediaError::Timeout(timeout)),
    }
}

/// Delete an attachment from the store, trying each resource type in turn.
///
/// Returns whether any attempt succeeded. Attachments without a media id
/// (catalog media) are left alone and count as not deleted.
pub async fn discard(store: &dyn MediaStore, attachment: &MediaAttachment, timeout: Duration) -> bool {
    let Some(media_id) = attachment.media_id.as_deref() else {
        return false;
    };

    for resource_type in DESTROY_ORDER {
        let result = match tokio::time::timeout(timeout, store.destroy(media_id, resource_type)).await
        {
            Ok(result) => result,
            Err(_) => Err(MediaError::Timeout(timeout)),
        };

        match result {
            Ok(()) => {
                info!(
                    media_id,
                    resource_type = resource_type.as_str(),
                    store = store.store_name(),
                    "Deleted previous media"
                );
                return true;
            }
            Err(e) => {
                tracing::debug!(
                    media_id,
                    resource_type = resource_type.as_str(),
                    error = %e,
                    "Media delete attempt failed"
                );
            }
        }
    }

    warn!(
        media_id,
        store = store.store_name(),
        "Could not delete previous media with any resource type; leaving it orphaned"
    );
    false
}

/// Stored attachment plus the step kind implied by what the store reported.
pub fn attachment_from(uploaded: UploadedMedia) -> (MediaAttachment, StepKind) {
    let kind = match uploaded.resource_type {
        ResourceType::Video => StepKind::Video,
        ResourceType::Image | ResourceType::Auto => StepKind::Image,
    };

    let attachment = MediaAttachment {
        url: uploaded.url,
        media_id: Some(uploaded.media_id),
        width: uploaded.width,
        height: uploaded.height,
        format: uploaded.format,
    };

    (attachment, kind)
}

/// Upload `data`, record it with `write`, then discard what it displaced.
///
/// `write` stores the new attachment on the recipe and returns the
/// attachment it replaced, read under the same row lock as the write. If
/// `write` fails the fresh upload is discarded and the previous attachment
/// is left alone, so the recipe never points at a deleted blob.
pub async fn replace_attachment<W, E>(
    store: &dyn MediaStore,
    data: Vec<u8>,
    options: &UploadOptions,
    timeout: Duration,
    write: W,
) -> Result<(MediaAttachment, StepKind), E>
where
    W: FnOnce(&MediaAttachment, StepKind) -> Result<Option<MediaAttachment>, E>,
    E: From<MediaError>,
{
    let uploaded = upload_with_timeout(store, data, options, timeout).await?;
    let (attachment, kind) = attachment_from(uploaded);

    match write(&attachment, kind) {
        Ok(previous) => {
            if let Some(previous) = previous {
                discard(store, &previous, timeout).await;
            }
            Ok((attachment, kind))
        }
        Err(e) => {
            warn!(
                media_id = attachment.media_id.as_deref().unwrap_or_default(),
                "Recording new media failed; discarding the upload"
            );
            discard(store, &attachment, timeout).await;
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::FakeMediaStore;
    use async_trait::async_trait;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn options(content_type: &str) -> UploadOptions {
        UploadOptions {
            folder: "potluck/steps".to_string(),
            content_type: content_type.to_string(),
        }
    }

    async fn attach_first(store: &FakeMediaStore) -> MediaAttachment {
        let (first, kind) = replace_attachment(
            store,
            b"one".to_vec(),
            &options("image/png"),
            TIMEOUT,
            |_, _| Ok::<_, MediaError>(None),
        )
        .await
        .unwrap();
        assert_eq!(kind, StepKind::Image);
        first
    }

    #[tokio::test]
    async fn test_replace_uploads_then_discards_previous() {
        let store = FakeMediaStore::new();
        let first = attach_first(&store).await;

        let (second, kind) = replace_attachment(
            &store,
            b"two".to_vec(),
            &options("video/mp4"),
            TIMEOUT,
            |new, _| {
                assert!(store.contains(first.media_id.as_deref().unwrap()));
                assert!(store.contains(new.media_id.as_deref().unwrap()));
                Ok::<_, MediaError>(Some(first.clone()))
            },
        )
        .await
        .unwrap();

        assert_eq!(kind, StepKind::Video);
        assert_ne!(first.media_id, second.media_id);
        assert!(!store.contains(first.media_id.as_deref().unwrap()));
        assert!(store.contains(second.media_id.as_deref().unwrap()));
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_previous() {
        let store = FakeMediaStore::new();
        let first = attach_first(&store).await;

        store.fail_uploads(true);
        let mut wrote = false;
        let result = replace_attachment(
            &store,
            b"two".to_vec(),
            &options("image/png"),
            TIMEOUT,
            |_, _| {
                wrote = true;
                Ok::<_, MediaError>(Some(first.clone()))
            },
        )
        .await;

        assert!(result.is_err());
        assert!(!wrote);
        assert!(store.contains(first.media_id.as_deref().unwrap()));
        assert!(store.destroy_calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_and_drops_upload() {
        let store = FakeMediaStore::new();
        let first = attach_first(&store).await;

        let result = replace_attachment(
            &store,
            b"two".to_vec(),
            &options("image/png"),
            TIMEOUT,
            |_, _| Err(MediaError::RequestFailed("recipe row is gone".to_string())),
        )
        .await;

        assert!(result.is_err());
        assert!(store.contains(first.media_id.as_deref().unwrap()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_delete_is_swallowed() {
        let store = FakeMediaStore::new();
        let first = attach_first(&store).await;

        store.fail_destroys(true);
        let result = replace_attachment(
            &store,
            b"two".to_vec(),
            &options("image/png"),
            TIMEOUT,
            |_, _| Ok::<_, MediaError>(Some(first.clone())),
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(store.destroy_calls().len(), 3);
    }

    #[tokio::test]
    async fn test_discard_tries_each_resource_type() {
        let store = FakeMediaStore::new();
        let video = store
            .upload(b"clip".to_vec(), &options("video/mp4"))
            .await
            .unwrap();
        let (attachment, _) = attachment_from(video);

        assert!(discard(&store, &attachment, TIMEOUT).await);

        let attempted: Vec<ResourceType> =
            store.destroy_calls().into_iter().map(|(_, rt)| rt).collect();
        assert_eq!(attempted, DESTROY_ORDER.to_vec());
    }

    #[tokio::test]
    async fn test_catalog_media_never_deleted() {
        let store = FakeMediaStore::new();
        let external = MediaAttachment::external("https://cdn.example/a.jpg".to_string());

        assert!(!discard(&store, &external, TIMEOUT).await);
        assert!(store.destroy_calls().is_empty());
    }

    #[derive(Debug)]
    struct StalledStore;

    #[async_trait]
    impl MediaStore for StalledStore {
        async fn upload(
            &self,
            _data: Vec<u8>,
            _options: &UploadOptions,
        ) -> Result<UploadedMedia, MediaError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(MediaError::RequestFailed("unreachable".to_string()))
        }

        async fn destroy(&self, _media_id: &str, _rt: ResourceType) -> Result<(), MediaError> {
            Ok(())
        }

        fn store_name(&self) -> &'static str {
            "stalled"
        }
    }

    #[tokio::test]
    async fn test_upload_times_out() {
        let timeout = Duration::from_millis(20);
        let result =
            upload_with_timeout(&StalledStore, b"x".to_vec(), &options("image/png"), timeout).await;
        assert!(matches!(result, Err(MediaError::Timeout(t)) if t == timeout));
    }
}
