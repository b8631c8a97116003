//! Manager API: submissions, status polls and worker results

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use tracing::debug;

use super::health;
use crate::coordinator::Coordinator;
use crate::error::{CrackError, CrackResult};
use crate::models::{CrackHashRequest, CrackHashResponse, PartialResult, StatusQuery, StatusResponse};
use crate::transport::http::{CRACK_PATH, HEALTH_PATH, RESULT_PATH, STATUS_PATH};

pub fn manager_router(coordinator: Arc<Coordinator>) -> Router {
    Router::new()
        .route(CRACK_PATH, post(handle_crack))
        .route(STATUS_PATH, get(handle_status))
        .route(RESULT_PATH, patch(handle_worker_result))
        .route(HEALTH_PATH, get(health))
        .with_state(coordinator)
}

/// Malformed bodies are validation errors, reported like any other 400
fn invalid_body(rejection: JsonRejection) -> CrackError {
    CrackError::Validation(rejection.body_text())
}

async fn handle_crack(
    State(coordinator): State<Arc<Coordinator>>,
    payload: Result<Json<CrackHashRequest>, JsonRejection>,
) -> CrackResult<Json<CrackHashResponse>> {
    let Json(req) = payload.map_err(invalid_body)?;
    debug!(hash = %req.hash, max_length = req.max_length, "handle_crack: called");
    let request_id = coordinator.submit(&req.hash, req.max_length)?;
    Ok(Json(CrackHashResponse { request_id }))
}

async fn handle_status(
    State(coordinator): State<Arc<Coordinator>>,
    Query(query): Query<StatusQuery>,
) -> CrackResult<Json<StatusResponse>> {
    let request_id = query
        .request_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| CrackError::Validation("Missing requestId".to_string()))?;
    Ok(Json(coordinator.query_status(&request_id)?))
}

async fn handle_worker_result(
    State(coordinator): State<Arc<Coordinator>>,
    payload: Result<Json<PartialResult>, JsonRejection>,
) -> CrackResult<StatusCode> {
    let Json(result) = payload.map_err(invalid_body)?;
    coordinator.accept_result(&result.request_id, result.words)?;
    Ok(StatusCode::OK)
}
