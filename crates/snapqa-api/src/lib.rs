//! Snapqa API Library
//!
//! This crate provides the HTTP API handlers, the upload extraction
//! pipeline, and application setup.

pub mod api_doc;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::ErrorResponse;
pub use state::AppState;
