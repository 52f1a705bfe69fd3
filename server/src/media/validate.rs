use image::ImageFormat;
use thiserror::Error;

/// Image formats accepted for covers and step images.
pub const ALLOWED_IMAGE_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidUpload {
    #[error("No file data provided")]
    Empty,

    #[error("File too large. Maximum size is {max} bytes")]
    TooLarge { max: usize },

    #[error("Unsupported media type: {0}. Allowed: JPEG, PNG, GIF, WebP images or video")]
    Unsupported(String),
}

/// Check an incoming upload and settle its content type.
///
/// Videos are trusted by their declared `video/*` type. Everything else must
/// sniff as one of [`ALLOWED_IMAGE_FORMATS`]; the sniffed type wins over
/// whatever the client declared.
pub fn validate_upload(
    data: &[u8],
    declared: Option<&str>,
    max_size: usize,
) -> Result<String, InvalidUpload> {
    if data.is_empty() {
        return Err(InvalidUpload::Empty);
    }
    if data.len() > max_size {
        return Err(InvalidUpload::TooLarge { max: max_size });
    }

    if let Some(content_type) = declared.filter(|ct| ct.starts_with("video/")) {
        return Ok(content_type.to_string());
    }

    match image::guess_format(data) {
        Ok(format) if ALLOWED_IMAGE_FORMATS.contains(&format) => {
            Ok(format.to_mime_type().to_string())
        }
        Ok(format) => Err(InvalidUpload::Unsupported(format!("{:?}", format))),
        Err(_) => Err(InvalidUpload::Unsupported(
            declared.unwrap_or("unknown").to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_png_sniffed_over_declared_type() {
        let ct = validate_upload(PNG_HEADER, Some("application/octet-stream"), 1024).unwrap();
        assert_eq!(ct, "image/png");
    }

    #[test]
    fn test_video_trusted_by_declared_type() {
        let ct = validate_upload(b"\0\0\0\x18ftypmp42", Some("video/mp4"), 1024).unwrap();
        assert_eq!(ct, "video/mp4");
    }

    #[test]
    fn test_rejects_empty_and_oversized() {
        assert_eq!(validate_upload(b"", None, 10), Err(InvalidUpload::Empty));
        assert_eq!(
            validate_upload(PNG_HEADER, None, 4),
            Err(InvalidUpload::TooLarge { max: 4 })
        );
    }

    #[test]
    fn test_rejects_unknown_bytes() {
        let err = validate_upload(b"just some text", Some("text/plain"), 1024).unwrap_err();
        assert_eq!(err, InvalidUpload::Unsupported("text/plain".to_string()));
    }
}
