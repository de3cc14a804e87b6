//! Snapqa database layer
//!
//! Repositories for the append-only answer store, plus the startup schema
//! bootstrap/evolution shim.

pub mod db;

pub use db::schema::ensure_schema;
pub use db::AnswerRepository;
