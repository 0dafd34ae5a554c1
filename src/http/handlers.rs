//! Route handlers for the crawl/job/engine HTTP surface.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::crawl_engine::{CrawlResult, CrawlStrategy};
use crate::extract;
use crate::intent::{self, RequestType};
use crate::postprocess::clean_crawled_text;

use super::debug_file;
use super::errors::friendly_error;
use super::state::AppState;

fn override_strategy(engine: Option<String>, timeout: Option<u64>, anti_bot_mode: Option<bool>) -> Option<CrawlStrategy> {
    if engine.is_none() && timeout.is_none() && anti_bot_mode.is_none() {
        return None;
    }
    let defaults = CrawlStrategy::default();
    Some(CrawlStrategy {
        engine_priority: engine.map(|e| vec![e]).unwrap_or(defaults.engine_priority),
        timeout: timeout.unwrap_or(defaults.timeout),
        anti_bot_mode: anti_bot_mode.unwrap_or(defaults.anti_bot_mode),
        ..defaults
    })
}

async fn crawl_failure_response(state: &AppState, result: &CrawlResult) -> impl IntoResponse {
    let error = result.error.clone().unwrap_or_default();
    let friendly = friendly_error(&error);
    let debug_file = debug_file::persist(&state.config, &error).await;
    let attempted_engines = result.metadata.get("attempted_engines").cloned().unwrap_or_else(|| json!([]));

    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "message": friendly.message,
            "suggestion": friendly.suggestion,
            "url": result.url,
            "error": friendly.message,
            "detailed_error": error,
            "attempted_engines": attempted_engines,
            "debug_file": debug_file,
        })),
    )
}

#[derive(Debug, Deserialize)]
pub struct SingleCrawlRequest {
    pub url: String,
    pub engine: Option<String>,
    pub timeout: Option<u64>,
    pub anti_bot_mode: Option<bool>,
    pub clean_text: Option<bool>,
    pub job_id: Option<String>,
}

pub async fn crawl_single(State(state): State<AppState>, Json(req): Json<SingleCrawlRequest>) -> impl IntoResponse {
    let strategy = override_strategy(req.engine, req.timeout, req.anti_bot_mode);
    let mut result = state.orchestrator.crawl(&req.url, strategy).await;

    if req.clean_text.unwrap_or(false) && result.is_success() {
        clean_crawled_text(&mut result);
    }

    if !result.is_success() {
        return crawl_failure_response(&state, &result).await.into_response();
    }

    Json(result).into_response()
}

#[derive(Debug, Deserialize)]
pub struct BulkCrawlRequest {
    pub urls: Vec<String>,
    pub max_concurrent: Option<usize>,
    pub timeout: Option<u64>,
    pub clean_text: Option<bool>,
}

pub async fn crawl_bulk(State(state): State<AppState>, Json(req): Json<BulkCrawlRequest>) -> impl IntoResponse {
    let max_concurrent = req.max_concurrent.unwrap_or(state.config.default_max_concurrent);
    let clean_text = req.clean_text.unwrap_or(false);
    let started = state.bulk.submit(req.urls, max_concurrent, clean_text);

    Json(json!({
        "job_id": started.job_id,
        "total_urls": started.total,
        "status": "started",
    }))
}

#[derive(Debug, Deserialize)]
pub struct SmartCrawlRequest {
    pub text: String,
    pub timeout: Option<u64>,
    pub clean_text: Option<bool>,
}

pub async fn crawl_smart(State(state): State<AppState>, Json(req): Json<SmartCrawlRequest>) -> impl IntoResponse {
    let intent = intent::classify(&req.text);

    let Some(url) = intent.urls.first() else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "no URL could be recovered from the request text" })),
        )
            .into_response();
    };

    let strategy = override_strategy(None, req.timeout, None);
    let mut result = state.orchestrator.crawl(url, strategy).await;

    if req.clean_text.unwrap_or(false) && result.is_success() {
        clean_crawled_text(&mut result);
    }

    if !result.is_success() {
        return crawl_failure_response(&state, &result).await.into_response();
    }

    let target = intent.target_content.as_deref().unwrap_or("summary");
    let extraction = extract::extract(target, result.raw_html.as_deref(), &result.text);

    Json(json!({
        "url": result.url,
        "target_content": extraction.target_content,
        "extracted_data": extraction.extracted_data,
        "quality_score": extraction.quality_score,
        "confidence": extraction.confidence,
        "source": result,
    }))
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct UnifiedCrawlRequest {
    pub text: String,
    pub engine: Option<String>,
    pub timeout: Option<u64>,
    pub clean_text: Option<bool>,
    pub job_id: Option<String>,
}

pub async fn crawl_unified(State(state): State<AppState>, Json(req): Json<UnifiedCrawlRequest>) -> impl IntoResponse {
    let intent = intent::classify(&req.text);

    match intent.request_type {
        RequestType::Invalid => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "could not classify request", "intent": intent })),
        )
            .into_response(),
        RequestType::Search | RequestType::BulkSelective => {
            (StatusCode::NOT_IMPLEMENTED, Json(json!({ "message": "not implemented", "intent": intent }))).into_response()
        }
        RequestType::Bulk => {
            let max_concurrent = state.config.default_max_concurrent;
            let started = state.bulk.submit(intent.urls, max_concurrent, req.clean_text.unwrap_or(false));
            Json(json!({ "job_id": started.job_id, "total_urls": started.total, "status": "started" })).into_response()
        }
        RequestType::Single => {
            let Some(url) = intent.urls.first() else {
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "message": "no URL recovered" }))).into_response();
            };
            let strategy = override_strategy(req.engine, req.timeout, None);
            let mut result = state.orchestrator.crawl(url, strategy).await;
            if req.clean_text.unwrap_or(false) && result.is_success() {
                clean_crawled_text(&mut result);
            }
            if !result.is_success() {
                return crawl_failure_response(&state, &result).await.into_response();
            }
            Json(result).into_response()
        }
        RequestType::Selective => {
            let Some(url) = intent.urls.first() else {
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "message": "no URL recovered" }))).into_response();
            };
            let strategy = override_strategy(req.engine, req.timeout, None);
            let mut result = state.orchestrator.crawl(url, strategy).await;
            if req.clean_text.unwrap_or(false) && result.is_success() {
                clean_crawled_text(&mut result);
            }
            if !result.is_success() {
                return crawl_failure_response(&state, &result).await.into_response();
            }
            let target = intent.target_content.as_deref().unwrap_or("summary");
            let extraction = extract::extract(target, result.raw_html.as_deref(), &result.text);
            Json(json!({
                "url": result.url,
                "target_content": extraction.target_content,
                "extracted_data": extraction.extracted_data,
                "quality_score": extraction.quality_score,
                "confidence": extraction.confidence,
                "source": result,
            }))
            .into_response()
        }
    }
}

pub async fn job_status(State(state): State<AppState>, Path(job_id): Path<String>) -> impl IntoResponse {
    let Some(handle) = state.bulk.store().get(&job_id) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "job not found" }))).into_response();
    };
    let job = handle.lock().await;
    Json(json!({
        "job_id": job.job_id,
        "status": job.status,
        "total": job.total,
        "completed": job.completed,
        "success": job.success,
        "failed": job.failed,
        "progress": job.progress,
    }))
    .into_response()
}

pub async fn job_results(State(state): State<AppState>, Path(job_id): Path<String>) -> impl IntoResponse {
    let Some(handle) = state.bulk.store().get(&job_id) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "job not found" }))).into_response();
    };
    let job = handle.lock().await;
    if job.status == crate::bulk::JobStatus::Processing {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "job is still processing" })),
        )
            .into_response();
    }

    Json(json!({
        "summary": {
            "job_id": job.job_id,
            "total": job.total,
            "successful": job.success,
            "failed": job.failed,
            "success_rate": job.success_rate(),
        },
        "results": job.results,
    }))
    .into_response()
}

pub async fn job_download(State(state): State<AppState>, Path(job_id): Path<String>) -> impl IntoResponse {
    let Some(handle) = state.bulk.store().get(&job_id) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "job not found" }))).into_response();
    };
    let result_file = { handle.lock().await.result_file.clone() };
    let Some(path) = result_file else {
        return (StatusCode::CONFLICT, Json(json!({ "message": "job has no persisted summary yet" }))).into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => (StatusCode::OK, bytes).into_response(),
        Err(e) => (StatusCode::NOT_FOUND, Json(json!({ "message": format!("could not read summary file: {e}") }))).into_response(),
    }
}

pub async fn job_cancel(State(state): State<AppState>, Path(job_id): Path<String>) -> impl IntoResponse {
    match state.bulk.cancel(&job_id).await {
        Ok(true) => Json(json!({ "message": "job removed" })).into_response(),
        Ok(false) => Json(json!({ "message": "job still in flight, not removed" })).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, Json(json!({ "message": "job not found" }))).into_response(),
    }
}

pub async fn engines_status(State(state): State<AppState>) -> impl IntoResponse {
    let checks: Vec<_> = state.registry.iter().map(|engine| engine.health_check()).collect();
    Json(json!({ "engines": checks }))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

pub async fn healthz() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}
