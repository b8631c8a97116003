//! In-process transport: workers live in the coordinator's runtime

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use super::{ResultSink, ShareDispatcher};
use crate::digest::DigestAlgorithm;
use crate::error::{CrackError, CrackResult};
use crate::models::{PartialResult, Share};
use crate::search::Worker;

/// Sink that forwards results over a Tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<PartialResult>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<PartialResult>) -> Self {
        Self { tx }
    }
}

/// Create a sink and the receiver the coordinator drains
pub fn channel_sink(buffer: usize) -> (ChannelSink, mpsc::Receiver<PartialResult>) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    (ChannelSink::new(tx), rx)
}

#[async_trait]
impl ResultSink for ChannelSink {
    async fn push(&self, result: PartialResult) -> CrackResult<()> {
        debug!(request_id = %result.request_id, word_count = result.words.len(), "ChannelSink::push: called");
        self.tx.send(result).await.map_err(|_| CrackError::Channel)
    }
}

/// Dispatcher backed by in-process workers sharing one sink
pub struct LocalDispatcher {
    workers: Vec<Worker>,
}

impl LocalDispatcher {
    pub fn new(worker_count: usize, algorithm: DigestAlgorithm, sink: Arc<dyn ResultSink>) -> Self {
        debug!(worker_count, %algorithm, "LocalDispatcher::new: called");
        let workers = (0..worker_count)
            .map(|_| Worker::new(Arc::clone(&sink), algorithm))
            .collect();
        Self { workers }
    }
}

#[async_trait]
impl ShareDispatcher for LocalDispatcher {
    fn worker_count(&self) -> usize {
        self.workers.len()
    }

    fn worker_name(&self, worker: usize) -> String {
        format!("local-{}", worker + 1)
    }

    async fn dispatch(&self, worker: usize, share: Share) -> CrackResult<()> {
        let target = self.workers.get(worker).ok_or_else(|| CrackError::Dispatch {
            worker: self.worker_name(worker),
            message: "no such worker".to_string(),
        })?;
        target.accept(share);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_delivers() {
        let (sink, mut rx) = channel_sink(4);
        sink.push(PartialResult {
            request_id: "req".to_string(),
            words: vec!["ba".to_string()],
        })
        .await
        .unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.request_id, "req");
        assert_eq!(received.words, vec!["ba"]);
    }

    #[tokio::test]
    async fn test_channel_sink_closed_receiver() {
        let (sink, rx) = channel_sink(1);
        drop(rx);
        let result = sink
            .push(PartialResult {
                request_id: "req".to_string(),
                words: vec![],
            })
            .await;
        assert!(matches!(result, Err(CrackError::Channel)));
    }

    #[tokio::test]
    async fn test_local_dispatcher_runs_share_and_pushes() {
        let (sink, mut rx) = channel_sink(4);
        let dispatcher = LocalDispatcher::new(2, DigestAlgorithm::Md5, Arc::new(sink));
        assert_eq!(dispatcher.worker_count(), 2);

        let share = Share {
            request_id: "req".to_string(),
            hash: DigestAlgorithm::Md5.hex_digest("ba"),
            max_length: 2,
            alphabet: "ab".to_string(),
            part_number: 2,
            part_count: 2,
        };
        dispatcher.dispatch(1, share).await.unwrap();

        let result = rx.recv().await.unwrap();
        assert_eq!(result.words, vec!["ba"]);
    }

    #[tokio::test]
    async fn test_local_dispatcher_unknown_worker() {
        let (sink, _rx) = channel_sink(1);
        let dispatcher = LocalDispatcher::new(1, DigestAlgorithm::Md5, Arc::new(sink));
        let share = Share {
            request_id: "req".to_string(),
            hash: "00".to_string(),
            max_length: 1,
            alphabet: "ab".to_string(),
            part_number: 1,
            part_count: 1,
        };
        let err = dispatcher.dispatch(5, share).await.unwrap_err();
        assert!(matches!(err, CrackError::Dispatch { .. }));
    }
}
