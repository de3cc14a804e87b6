//! Application state
//!
//! The repository and the vision client are injected capabilities, never
//! globals, so tests can substitute an in-memory store and a stub client.

use std::sync::Arc;

use snapqa_core::Config;
use snapqa_db::AnswerRepository;
use snapqa_vision::VisionClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub answers: AnswerRepository,
    pub vision: Arc<dyn VisionClient>,
}

impl AppState {
    pub fn new(config: Config, answers: AnswerRepository, vision: Arc<dyn VisionClient>) -> Self {
        Self {
            config,
            answers,
            vision,
        }
    }
}
