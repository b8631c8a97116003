//! Delivery of shares to workers and of results back to the coordinator
//!
//! Two seams keep the coordinator and the workers ignorant of how bytes move:
//! [`ShareDispatcher`] (coordinator to worker) and [`ResultSink`] (worker to
//! coordinator). The in-process implementations use Tokio channels, the
//! networked ones use HTTP via reqwest.

use async_trait::async_trait;

use crate::error::CrackResult;
use crate::models::{PartialResult, Share};

mod channel;
pub mod http;

pub use channel::{ChannelSink, LocalDispatcher, channel_sink};
pub use http::{HttpDispatcher, HttpResultSink, ManagerClient};

/// Hands shares to a fixed set of workers
#[async_trait]
pub trait ShareDispatcher: Send + Sync {
    /// Number of workers; every request is split into this many shares
    fn worker_count(&self) -> usize;

    /// Human-readable name of worker `worker` (0-based) for logs
    fn worker_name(&self, worker: usize) -> String {
        format!("worker-{}", worker + 1)
    }

    /// Deliver `share` to worker `worker` (0-based)
    ///
    /// `Ok` means the worker accepted it for processing, not that the
    /// search finished.
    async fn dispatch(&self, worker: usize, share: Share) -> CrackResult<()>;
}

/// Where a worker pushes the matches of a finished share
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn push(&self, result: PartialResult) -> CrackResult<()>;
}
