// Request handlers
// Thin adapters from JSON bodies to the detector; analysis runs on the blocking pool

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::models::{
    AnalysisInput, BatchDetectRequest, BatchDetectResponse, DetectionResult, HealthResponse,
    SentenceDetectRequest, SentenceDetectionResponse,
};
use crate::services::detection::{
    classify_sentences, detect, detect_batch, neutral_result, validate_text, METHOD,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use std::time::Instant;
use tokio::task::JoinError;
use tracing::{info, warn, Span};

pub const SERVICE_NAME: &str = "DraftScope AI Detection";

/// Run CPU-bound work off the async runtime, keeping the request span.
async fn run_blocking<T, F>(work: F) -> Result<T, JoinError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let span = Span::current();
    tokio::task::spawn_blocking(move || span.in_scope(work)).await
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        method: METHOD,
    })
}

pub async fn detect_text(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisInput>, JsonRejection>,
) -> ApiResult<Json<DetectionResult>> {
    let Json(input) = payload?;
    validate_text(&input.text, &state.config)?;

    info!(
        chars = input.text.len(),
        has_draft = input.previous_text.is_some(),
        "api.detect"
    );

    let config = state.config.clone();
    let result = match run_blocking(move || detect(&input, &config)).await {
        Ok(result) => result?,
        Err(e) => {
            // A panic never fails the caller's submission
            warn!(error = %e, "api.detect_task_failed");
            neutral_result("analysis task failed")
        }
    };

    Ok(Json(result))
}

pub async fn detect_sentences(
    State(state): State<AppState>,
    payload: Result<Json<SentenceDetectRequest>, JsonRejection>,
) -> ApiResult<Json<SentenceDetectionResponse>> {
    let Json(request) = payload?;
    if request.text.trim().is_empty() {
        return Err(ApiError::Validation("Text is required".to_string()));
    }

    let config = state.config.clone();
    let response = run_blocking(move || classify_sentences(&request.text, &config))
        .await
        .map_err(|e| {
            warn!(error = %e, "api.sentences_task_failed");
            ApiError::Internal
        })?;

    info!(
        total = response.total_sentences,
        ai = response.ai_sentences,
        human = response.human_sentences,
        "api.detect_sentences"
    );
    Ok(Json(response))
}

pub async fn detect_batch_texts(
    State(state): State<AppState>,
    payload: Result<Json<BatchDetectRequest>, JsonRejection>,
) -> ApiResult<Json<BatchDetectResponse>> {
    let Json(request) = payload?;
    let size = request.texts.len();
    if size == 0 {
        return Err(ApiError::Validation("texts must not be empty".to_string()));
    }
    if size > state.config.max_batch_size {
        return Err(ApiError::BatchTooLarge {
            size,
            max: state.config.max_batch_size,
        });
    }

    let start = Instant::now();
    let config = state.config.clone();
    let results = match run_blocking(move || detect_batch(&request.texts, &config)).await {
        Ok(results) => results,
        Err(e) => {
            warn!(error = %e, size, "api.batch_task_failed");
            (0..size)
                .map(|_| neutral_result("analysis task failed"))
                .collect()
        }
    };
    let processing_time = start.elapsed().as_millis() as u64;

    info!(size, processing_time, "api.batch");
    Ok(Json(BatchDetectResponse {
        results,
        processing_time,
    }))
}
