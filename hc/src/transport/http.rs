//! HTTP transport over reqwest
//!
//! Paths match the manager and worker routers in [`crate::server`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info};

use super::{ResultSink, ShareDispatcher};
use crate::coordinator::RequestStatus;
use crate::error::{CrackError, CrackResult};
use crate::models::{CrackHashRequest, CrackHashResponse, ErrorResponse, PartialResult, Share, StatusResponse};

/// Worker endpoint accepting shares
pub const TASK_PATH: &str = "/internal/api/worker/hash/crack/task";
/// Manager endpoint accepting partial results
pub const RESULT_PATH: &str = "/internal/api/manager/hash/crack/request";
/// Manager endpoint accepting client submissions
pub const CRACK_PATH: &str = "/api/hash/crack";
/// Manager endpoint answering status polls
pub const STATUS_PATH: &str = "/api/hash/status";
pub const HEALTH_PATH: &str = "/health";

/// Default timeout for a single HTTP exchange
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

fn build_client(timeout: Duration) -> CrackResult<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Turn a non-success reply into a typed error, using the `{"error"}` body when present
async fn rejection(response: Response) -> CrackError {
    let status = response.status();
    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
    };
    match status {
        StatusCode::NOT_FOUND => CrackError::NotFound(message),
        StatusCode::BAD_REQUEST => CrackError::Validation(message),
        _ => CrackError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}

/// Dispatches shares to remote workers with POST
pub struct HttpDispatcher {
    http: Client,
    worker_urls: Vec<String>,
}

impl HttpDispatcher {
    pub fn new(worker_urls: Vec<String>, timeout: Duration) -> CrackResult<Self> {
        debug!(?worker_urls, ?timeout, "HttpDispatcher::new: called");
        Ok(Self {
            http: build_client(timeout)?,
            worker_urls,
        })
    }

    async fn send(&self, url: &str, share: &Share) -> CrackResult<()> {
        let response = self.http.post(join_url(url, TASK_PATH)).json(share).send().await?;
        match response.status() {
            StatusCode::OK | StatusCode::ACCEPTED => Ok(()),
            _ => Err(rejection(response).await),
        }
    }
}

#[async_trait]
impl ShareDispatcher for HttpDispatcher {
    fn worker_count(&self) -> usize {
        self.worker_urls.len()
    }

    fn worker_name(&self, worker: usize) -> String {
        self.worker_urls
            .get(worker)
            .cloned()
            .unwrap_or_else(|| format!("worker-{}", worker + 1))
    }

    async fn dispatch(&self, worker: usize, share: Share) -> CrackResult<()> {
        let url = self.worker_urls.get(worker).ok_or_else(|| CrackError::Dispatch {
            worker: self.worker_name(worker),
            message: "no such worker".to_string(),
        })?;
        debug!(%url, request_id = %share.request_id, part = share.part_number, "HttpDispatcher::dispatch: sending share");

        self.send(url, &share).await.map_err(|e| CrackError::Dispatch {
            worker: url.clone(),
            message: e.to_string(),
        })
    }
}

/// Pushes a worker's results to the manager with PATCH
pub struct HttpResultSink {
    http: Client,
    manager_url: String,
}

impl HttpResultSink {
    pub fn new(manager_url: impl Into<String>, timeout: Duration) -> CrackResult<Self> {
        let manager_url = manager_url.into();
        debug!(%manager_url, ?timeout, "HttpResultSink::new: called");
        Ok(Self {
            http: build_client(timeout)?,
            manager_url,
        })
    }
}

#[async_trait]
impl ResultSink for HttpResultSink {
    async fn push(&self, result: PartialResult) -> CrackResult<()> {
        debug!(request_id = %result.request_id, word_count = result.words.len(), "HttpResultSink::push: called");
        let response = self
            .http
            .patch(join_url(&self.manager_url, RESULT_PATH))
            .json(&result)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(rejection(response).await)
        }
    }
}

/// Client for the manager's public API
#[derive(Debug, Clone)]
pub struct ManagerClient {
    http: Client,
    manager_url: String,
}

impl ManagerClient {
    pub fn new(manager_url: impl Into<String>, timeout: Duration) -> CrackResult<Self> {
        Ok(Self {
            http: build_client(timeout)?,
            manager_url: manager_url.into(),
        })
    }

    /// Submit a hash and return the request id
    pub async fn crack(&self, hash: &str, max_length: usize) -> CrackResult<String> {
        debug!(%hash, max_length, "ManagerClient::crack: called");
        let body = CrackHashRequest {
            hash: hash.to_string(),
            max_length,
        };
        let response = self
            .http
            .post(join_url(&self.manager_url, CRACK_PATH))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let reply: CrackHashResponse = response.json().await?;
        info!(request_id = %reply.request_id, "Submitted crack request");
        Ok(reply.request_id)
    }

    /// Fetch the current status once
    pub async fn status(&self, request_id: &str) -> CrackResult<StatusResponse> {
        debug!(%request_id, "ManagerClient::status: called");
        let response = self
            .http
            .get(join_url(&self.manager_url, STATUS_PATH))
            .query(&[("requestId", request_id)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(response.json().await?)
    }

    /// Poll until the request leaves IN_PROGRESS
    pub async fn wait(&self, request_id: &str, poll_interval: Duration) -> CrackResult<StatusResponse> {
        debug!(%request_id, ?poll_interval, "ManagerClient::wait: called");
        loop {
            let status = self.status(request_id).await?;
            if status.status != RequestStatus::InProgress {
                return Ok(status);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}
