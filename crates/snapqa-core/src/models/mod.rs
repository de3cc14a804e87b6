//! Domain models

mod answer;

pub use answer::{AnswerRecord, AnswerResponse, QnaPair, UploadResponse};
