//! Share acceptor: runs searches off the caller's path

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::executor::run_share;
use crate::digest::DigestAlgorithm;
use crate::error::CrackResult;
use crate::models::{PartialResult, Share};
use crate::transport::ResultSink;

/// Accepts shares, searches them on the blocking pool and pushes the matches
///
/// There is no cap on concurrently running searches.
#[derive(Clone)]
pub struct Worker {
    sink: Arc<dyn ResultSink>,
    algorithm: DigestAlgorithm,
}

impl Worker {
    pub fn new(sink: Arc<dyn ResultSink>, algorithm: DigestAlgorithm) -> Self {
        Self { sink, algorithm }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Take a share for processing and return at once
    ///
    /// The result, if any, reaches the coordinator only through the sink.
    /// A failed search is logged and reports nothing.
    pub fn accept(&self, share: Share) -> JoinHandle<()> {
        debug!(
            request_id = %share.request_id,
            part = share.part_number,
            parts = share.part_count,
            "Worker::accept: called"
        );
        let sink = Arc::clone(&self.sink);
        let algorithm = self.algorithm;

        tokio::spawn(async move {
            let request_id = share.request_id.clone();
            let part = share.part_number;
            info!(%request_id, part, parts = share.part_count, hash = %share.hash, "Processing share");

            let search = tokio::task::spawn_blocking(move || search(&share, algorithm)).await;
            let words = match search {
                Ok(Ok(words)) => words,
                Ok(Err(e)) => {
                    error!(%request_id, part, error = %e, "Search aborted");
                    return;
                }
                Err(e) => {
                    error!(%request_id, part, error = %e, "Search task panicked");
                    return;
                }
            };

            let result = PartialResult {
                request_id: request_id.clone(),
                words,
            };
            if let Err(e) = sink.push(result).await {
                warn!(%request_id, part, error = %e, "Failed to push result");
            }
        })
    }
}

fn search(share: &Share, algorithm: DigestAlgorithm) -> CrackResult<Vec<String>> {
    let comparator = algorithm.comparator(&share.hash)?;
    run_share(share, &comparator)
}
