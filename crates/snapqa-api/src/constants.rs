//! API constants
//!
//! Routes and OpenAPI paths share the same versioned prefix.

/// Current API version.
pub const API_VERSION: &str = "v0";

/// Versioned API path prefix.
pub const API_PREFIX: &str = "/api/v0";

/// Multipart field name the ingestion endpoint reads the upload from.
pub const UPLOAD_FIELD: &str = "file";
