//! Database repositories for data access layer
//!
//! Each repository is responsible for a specific domain entity and provides
//! the queries the handlers need. Schema bootstrap lives in `schema`.

pub mod answers;
pub mod schema;

pub use answers::AnswerRepository;
