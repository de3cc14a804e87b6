//! HTTP request handlers

pub mod answers;
pub mod debug;
pub mod health;
pub mod upload;
