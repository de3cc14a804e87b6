//! Upload intake validation
//!
//! Extracts the single `file` field from a multipart request and applies the
//! ordered checks: a file is present, the declared media type is JPEG, the
//! payload fits the configured ceiling, and the raw bytes actually start with
//! the JPEG start-of-image marker. The magic-byte check catches mislabeled
//! files the declared media type would let through.

use axum::extract::Multipart;
use snapqa_core::AppError;

use crate::constants::UPLOAD_FIELD;

/// JPEG start-of-image marker.
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// One file pulled out of a multipart request, before validation.
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

/// Extract the upload from multipart form data. `Ok(None)` means the request
/// carried no `file` field; multiple file fields are rejected.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
) -> Result<Option<UploadedFile>, AppError> {
    let mut upload: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == UPLOAD_FIELD {
            if upload.is_some() {
                return Err(AppError::InvalidInput(format!(
                    "Multiple file fields are not allowed; send exactly one field named '{}'",
                    UPLOAD_FIELD
                )));
            }
            let content_type = field.content_type().map(|s: &str| s.to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

            upload = Some(UploadedFile {
                data: data.to_vec(),
                content_type,
            });
        }
    }

    Ok(upload)
}

/// Applies the intake checks in order, short-circuiting on the first failure.
#[derive(Debug, Clone, Copy)]
pub struct IntakeValidator {
    max_bytes: usize,
}

impl IntakeValidator {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Validate the upload and hand back the payload bytes. The rejected
    /// upload is dropped here; nothing outlives the request.
    pub fn validate(&self, upload: Option<UploadedFile>) -> Result<Vec<u8>, AppError> {
        let upload = upload.ok_or(AppError::NoFileUploaded)?;

        validate_content_type(upload.content_type.as_deref())?;
        validate_size(upload.data.len(), self.max_bytes)?;
        validate_jpeg_magic(&upload.data)?;

        Ok(upload.data)
    }
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

fn validate_content_type(content_type: Option<&str>) -> Result<(), AppError> {
    let declared = content_type.ok_or_else(|| {
        AppError::UnsupportedFormat("Only JPEG images are supported".to_string())
    })?;

    if normalize_mime_type(declared).to_lowercase() != "image/jpeg" {
        return Err(AppError::UnsupportedFormat(
            "Only JPEG images are supported".to_string(),
        ));
    }
    Ok(())
}

fn validate_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "Image too large (max {} MB)",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

fn validate_jpeg_magic(data: &[u8]) -> Result<(), AppError> {
    if data.len() < JPEG_MAGIC.len() || data[..JPEG_MAGIC.len()] != JPEG_MAGIC {
        return Err(AppError::MalformedEncoding(
            "File content is not a JPEG image".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 1024;

    fn jpeg_upload(data: Vec<u8>) -> Option<UploadedFile> {
        Some(UploadedFile {
            data,
            content_type: Some("image/jpeg".to_string()),
        })
    }

    fn jpeg_bytes(len: usize) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
        data.resize(len, 0);
        data
    }

    #[test]
    fn test_validate_accepts_jpeg() {
        let validator = IntakeValidator::new(MAX);
        let data = validator.validate(jpeg_upload(jpeg_bytes(16))).unwrap();
        assert_eq!(&data[..3], &JPEG_MAGIC);
    }

    #[test]
    fn test_validate_rejects_missing_file() {
        let validator = IntakeValidator::new(MAX);
        let err = validator.validate(None).unwrap_err();
        assert!(matches!(err, AppError::NoFileUploaded));
    }

    #[test]
    fn test_validate_rejects_non_jpeg_media_type() {
        let validator = IntakeValidator::new(MAX);
        let upload = Some(UploadedFile {
            data: jpeg_bytes(16),
            content_type: Some("image/png".to_string()),
        });
        let err = validator.validate(upload).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_validate_rejects_missing_media_type() {
        let validator = IntakeValidator::new(MAX);
        let upload = Some(UploadedFile {
            data: jpeg_bytes(16),
            content_type: None,
        });
        let err = validator.validate(upload).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_validate_accepts_media_type_with_parameters() {
        let validator = IntakeValidator::new(MAX);
        let upload = Some(UploadedFile {
            data: jpeg_bytes(16),
            content_type: Some("image/jpeg; charset=utf-8".to_string()),
        });
        assert!(validator.validate(upload).is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_payload() {
        let validator = IntakeValidator::new(MAX);
        let err = validator.validate(jpeg_upload(jpeg_bytes(MAX + 1))).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[test]
    fn test_validate_rejects_mislabeled_content() {
        let validator = IntakeValidator::new(MAX);
        // PNG magic bytes declared as image/jpeg
        let upload = Some(UploadedFile {
            data: vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
            content_type: Some("image/jpeg".to_string()),
        });
        let err = validator.validate(upload).unwrap_err();
        assert!(matches!(err, AppError::MalformedEncoding(_)));
    }

    #[test]
    fn test_validate_rejects_truncated_payload() {
        let validator = IntakeValidator::new(MAX);
        let err = validator.validate(jpeg_upload(vec![0xFF, 0xD8])).unwrap_err();
        assert!(matches!(err, AppError::MalformedEncoding(_)));
    }

    #[test]
    fn test_check_order_media_type_before_size() {
        // An upload failing both checks reports the media type first.
        let validator = IntakeValidator::new(MAX);
        let upload = Some(UploadedFile {
            data: jpeg_bytes(MAX + 1),
            content_type: Some("text/plain".to_string()),
        });
        let err = validator.validate(upload).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }
}
