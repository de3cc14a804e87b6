//! OpenAPI documentation.
//! The spec is served at `/api/openapi.json` and rendered by RapiDoc at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use snapqa_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Snapqa API",
        version = "0.1.0",
        description = "Extracts question/answer pairs from uploaded JPEG images via a multimodal inference service and serves the most recent results. All primary endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::upload::upload_image,
        handlers::answers::list_answers,
        handlers::debug::list_raw_answers,
        handlers::debug::insert_test_answer,
        handlers::health::health,
    ),
    components(schemas(
        models::QnaPair,
        models::AnswerRecord,
        models::AnswerResponse,
        models::UploadResponse,
        handlers::debug::TestAnswerRequest,
        error::ErrorResponse,
    )),
    tags(
        (name = "uploads", description = "Image ingestion and extraction"),
        (name = "answers", description = "Recent extracted answers"),
        (name = "debug", description = "Operational introspection helpers"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;
