//! Request table and lifecycle

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::config::CoordinatorConfig;
use super::record::{MergeOutcome, RecordSnapshot, RequestRecord, RequestStatus};
use crate::combinations::{Alphabet, total_combinations};
use crate::digest::normalize_hex;
use crate::error::{CrackError, CrackResult};
use crate::models::{PartialResult, Share, StatusResponse};
use crate::transport::ShareDispatcher;

type SharedRecord = Arc<Mutex<RequestRecord>>;

fn lock(record: &SharedRecord) -> MutexGuard<'_, RequestRecord> {
    // Every mutation is a single step, so a poisoned record is still consistent
    record.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns every request and drives it from submission to a terminal status
///
/// The table lock is held only to insert or look up a record; each record has
/// its own lock, so results for different requests never contend. Records are
/// never removed.
pub struct Coordinator {
    config: CoordinatorConfig,
    alphabet: Alphabet,
    dispatcher: Arc<dyn ShareDispatcher>,
    requests: RwLock<HashMap<String, SharedRecord>>,
}

impl Coordinator {
    pub fn new(config: CoordinatorConfig, dispatcher: Arc<dyn ShareDispatcher>) -> CrackResult<Arc<Self>> {
        debug!(?config, workers = dispatcher.worker_count(), "Coordinator::new: called");
        let alphabet = Alphabet::new(&config.alphabet)?;
        Ok(Arc::new(Self {
            config,
            alphabet,
            dispatcher,
            requests: RwLock::new(HashMap::new()),
        }))
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn worker_count(&self) -> usize {
        self.dispatcher.worker_count()
    }

    /// Number of requests ever submitted
    pub fn request_count(&self) -> usize {
        self.requests.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Create a request, arm its deadline and fan out one share per worker
    ///
    /// Must run inside a Tokio runtime. Returns as soon as the shares are
    /// handed to background dispatch tasks; a dispatch failure is logged and
    /// leaves that share missing until the deadline turns the request ERROR.
    pub fn submit(&self, hash: &str, max_length: usize) -> CrackResult<String> {
        debug!(%hash, max_length, "submit: called");
        if max_length == 0 {
            return Err(CrackError::Validation("maxLength must be positive".to_string()));
        }
        if self.alphabet.is_empty() {
            return Err(CrackError::Validation("alphabet must not be empty".to_string()));
        }
        let hash = normalize_hex(hash)?;

        let workers = self.dispatcher.worker_count();
        if workers == 0 {
            return Err(CrackError::Validation("no workers configured".to_string()));
        }
        let part_count = u32::try_from(workers)
            .map_err(|_| CrackError::Validation(format!("too many workers: {}", workers)))?;

        // Fails closed before any state exists
        let total = total_combinations(self.alphabet.len(), max_length)?;

        let request_id = Uuid::now_v7().to_string();
        let record = Arc::new(Mutex::new(RequestRecord::new(request_id.clone(), workers)));
        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(request_id.clone(), Arc::clone(&record));

        let deadline = self.spawn_deadline(&request_id, Arc::clone(&record));
        lock(&record).set_deadline(deadline.abort_handle());

        let alphabet = self.alphabet.to_string();
        for part_number in 1..=part_count {
            let share = Share {
                request_id: request_id.clone(),
                hash: hash.clone(),
                max_length,
                alphabet: alphabet.clone(),
                part_number,
                part_count,
            };
            let dispatcher = Arc::clone(&self.dispatcher);
            let worker = (part_number - 1) as usize;
            tokio::spawn(async move {
                let request_id = share.request_id.clone();
                if let Err(e) = dispatcher.dispatch(worker, share).await {
                    warn!(
                        %request_id,
                        part = part_number,
                        worker = %dispatcher.worker_name(worker),
                        error = %e,
                        "Failed to send share to worker"
                    );
                }
            });
        }

        info!(%request_id, %hash, max_length, total, workers, "Request submitted");
        Ok(request_id)
    }

    /// Timer that turns the request ERROR unless it finishes first
    fn spawn_deadline(&self, request_id: &str, record: SharedRecord) -> JoinHandle<()> {
        let timeout = self.config.timeout();
        let request_id = request_id.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let mut record = lock(&record);
            if record.finalize(RequestStatus::Error) {
                warn!(
                    %request_id,
                    received = record.received_shares(),
                    expected = record.expected_shares(),
                    "Request timed out"
                );
            } else {
                debug!(%request_id, status = %record.status(), "deadline: request already terminal");
            }
        })
    }

    fn lookup(&self, request_id: &str) -> CrackResult<SharedRecord> {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(request_id)
            .cloned()
            .ok_or_else(|| CrackError::NotFound(request_id.to_string()))
    }

    /// Merge one share's matches into its request
    ///
    /// Late or duplicate deliveries for a terminal request are acknowledged
    /// and discarded.
    pub fn accept_result(&self, request_id: &str, words: Vec<String>) -> CrackResult<MergeOutcome> {
        debug!(%request_id, word_count = words.len(), "accept_result: called");
        let record = self.lookup(request_id)?;
        let outcome = lock(&record).merge(words);

        match &outcome {
            MergeOutcome::Completed { word_count } => {
                info!(%request_id, word_count, "Request completed");
            }
            MergeOutcome::Recorded { received, expected } => {
                debug!(%request_id, received, expected, "accept_result: share recorded");
            }
            MergeOutcome::Ignored { status } => {
                debug!(%request_id, %status, "accept_result: request already terminal, result discarded");
            }
        }
        Ok(outcome)
    }

    /// Current status; matches only once READY
    pub fn query_status(&self, request_id: &str) -> CrackResult<StatusResponse> {
        debug!(%request_id, "query_status: called");
        let record = self.lookup(request_id)?;
        let response = lock(&record).status_response();
        Ok(response)
    }

    pub fn snapshot(&self, request_id: &str) -> CrackResult<RecordSnapshot> {
        let record = self.lookup(request_id)?;
        let snapshot = lock(&record).snapshot();
        Ok(snapshot)
    }

    /// Drain in-process worker results into [`Coordinator::accept_result`]
    pub fn spawn_result_pump(self: &Arc<Self>, mut rx: mpsc::Receiver<PartialResult>) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(result) = rx.recv().await {
                if let Err(e) = coordinator.accept_result(&result.request_id, result.words) {
                    warn!(request_id = %result.request_id, error = %e, "Dropped worker result");
                }
            }
            debug!("spawn_result_pump: result channel closed");
        })
    }
}
