//! Worker API: share intake

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::health;
use crate::models::Share;
use crate::search::Worker;
use crate::transport::http::{HEALTH_PATH, TASK_PATH};

pub fn worker_router(worker: Worker) -> Router {
    Router::new()
        .route(TASK_PATH, post(handle_task))
        .route(HEALTH_PATH, get(health))
        .with_state(worker)
}

/// Acknowledge at once; matches are pushed to the manager when the search ends
async fn handle_task(State(worker): State<Worker>, Json(share): Json<Share>) -> StatusCode {
    worker.accept(share);
    StatusCode::ACCEPTED
}
