//! Per-request state and its guarded transitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::AbortHandle;
use tracing::debug;

use crate::models::StatusResponse;

/// Request lifecycle status
///
/// `InProgress` moves to exactly one of `Ready` or `Error`; both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[default]
    InProgress,
    /// Every dispatched share reported
    Ready,
    /// Deadline elapsed first
    Error,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Ready => write!(f, "READY"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// What happened to a pushed partial result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Words appended, more shares outstanding
    Recorded { received: usize, expected: usize },
    /// This result was the last one; the request is now READY
    Completed { word_count: usize },
    /// Record already terminal; nothing changed
    Ignored { status: RequestStatus },
}

/// Read-only summary of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSnapshot {
    pub id: String,
    pub status: RequestStatus,
    pub received_shares: usize,
    pub expected_shares: usize,
    pub word_count: usize,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// State of one crack request
///
/// Mutated only through [`RequestRecord::merge`] and
/// [`RequestRecord::finalize`]; once terminal, neither changes anything.
#[derive(Debug)]
pub struct RequestRecord {
    id: String,
    status: RequestStatus,
    words: Vec<String>,
    expected_shares: usize,
    received_shares: usize,
    created_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    deadline: Option<AbortHandle>,
}

impl RequestRecord {
    pub fn new(id: impl Into<String>, expected_shares: usize) -> Self {
        Self {
            id: id.into(),
            status: RequestStatus::InProgress,
            words: Vec::new(),
            expected_shares,
            received_shares: 0,
            created_at: Utc::now(),
            finished_at: None,
            deadline: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn received_shares(&self) -> usize {
        self.received_shares
    }

    pub fn expected_shares(&self) -> usize {
        self.expected_shares
    }

    /// Attach the deadline timer so early completion can cancel it
    pub fn set_deadline(&mut self, handle: AbortHandle) {
        if self.is_terminal() {
            // Timer already fired or the request completed first
            handle.abort();
            return;
        }
        self.deadline = Some(handle);
    }

    /// Append one share's matches and finalize when every share is in
    pub fn merge(&mut self, words: Vec<String>) -> MergeOutcome {
        debug!(request_id = %self.id, word_count = words.len(), status = %self.status, "merge: called");
        if self.is_terminal() {
            return MergeOutcome::Ignored { status: self.status };
        }

        self.words.extend(words);
        self.received_shares += 1;

        if self.received_shares >= self.expected_shares && self.finalize(RequestStatus::Ready) {
            return MergeOutcome::Completed {
                word_count: self.words.len(),
            };
        }

        MergeOutcome::Recorded {
            received: self.received_shares,
            expected: self.expected_shares,
        }
    }

    /// Compare-and-set out of `InProgress`
    ///
    /// Returns false, changing nothing, when the record is already terminal or
    /// `to` is not a terminal status. The deadline timer is cancelled
    /// fire-and-forget; a timer already past its sleep finds the record
    /// terminal and does nothing.
    pub fn finalize(&mut self, to: RequestStatus) -> bool {
        if self.is_terminal() || !to.is_terminal() {
            debug!(request_id = %self.id, from = %self.status, %to, "finalize: transition refused");
            return false;
        }

        self.status = to;
        self.finished_at = Some(Utc::now());
        if let Some(deadline) = self.deadline.take() {
            deadline.abort();
        }
        debug!(request_id = %self.id, %to, "finalize: transitioned");
        true
    }

    /// Client view; matches are exposed only once READY
    pub fn status_response(&self) -> StatusResponse {
        StatusResponse {
            status: self.status,
            data: match self.status {
                RequestStatus::Ready => Some(self.words.clone()),
                _ => None,
            },
        }
    }

    pub fn snapshot(&self) -> RecordSnapshot {
        RecordSnapshot {
            id: self.id.clone(),
            status: self.status,
            received_shares: self.received_shares,
            expected_shares: self.expected_shares,
            word_count: self.words.len(),
            created_at: self.created_at,
            finished_at: self.finished_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_status_serializes_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&RequestStatus::InProgress).unwrap(), r#""IN_PROGRESS""#);
        assert_eq!(serde_json::to_string(&RequestStatus::Ready).unwrap(), r#""READY""#);
        assert_eq!(serde_json::to_string(&RequestStatus::Error).unwrap(), r#""ERROR""#);
        assert_eq!(RequestStatus::InProgress.to_string(), "IN_PROGRESS");
    }

    #[test]
    fn test_merge_until_ready() {
        let mut record = RequestRecord::new("req", 2);
        assert_eq!(
            record.merge(words(&[])),
            MergeOutcome::Recorded {
                received: 1,
                expected: 2
            }
        );
        assert_eq!(record.status(), RequestStatus::InProgress);

        assert_eq!(record.merge(words(&["ba"])), MergeOutcome::Completed { word_count: 1 });
        assert_eq!(record.status(), RequestStatus::Ready);
        assert_eq!(record.status_response().data, Some(words(&["ba"])));
        assert!(record.snapshot().finished_at.is_some());
    }

    #[test]
    fn test_merge_after_ready_is_ignored() {
        let mut record = RequestRecord::new("req", 1);
        record.merge(words(&["ba"]));

        let outcome = record.merge(words(&["zz"]));
        assert_eq!(
            outcome,
            MergeOutcome::Ignored {
                status: RequestStatus::Ready
            }
        );
        assert_eq!(record.status_response().data, Some(words(&["ba"])));
        assert_eq!(record.received_shares(), 1);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut record = RequestRecord::new("req", 2);
        record.merge(words(&["ba"]));
        record.merge(words(&["ba"]));
        assert_eq!(record.status_response().data, Some(words(&["ba", "ba"])));
    }

    #[test]
    fn test_finalize_is_compare_and_set() {
        let mut record = RequestRecord::new("req", 3);
        assert!(!record.finalize(RequestStatus::InProgress));
        assert!(record.finalize(RequestStatus::Error));
        assert!(!record.finalize(RequestStatus::Ready));
        assert!(!record.finalize(RequestStatus::Error));
        assert_eq!(record.status(), RequestStatus::Error);
    }

    #[test]
    fn test_error_hides_partial_matches() {
        let mut record = RequestRecord::new("req", 2);
        record.merge(words(&["ba"]));
        assert_eq!(record.status_response().data, None);

        record.finalize(RequestStatus::Error);
        let response = record.status_response();
        assert_eq!(response.status, RequestStatus::Error);
        assert_eq!(response.data, None);

        assert_eq!(
            record.merge(words(&["bb"])),
            MergeOutcome::Ignored {
                status: RequestStatus::Error
            }
        );
        assert_eq!(record.snapshot().word_count, 1);
    }

    #[tokio::test]
    async fn test_finalize_cancels_deadline() {
        let timer = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        });
        let mut record = RequestRecord::new("req", 1);
        record.set_deadline(timer.abort_handle());

        record.merge(words(&[]));
        let joined = timer.await;
        assert!(joined.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_set_deadline_on_terminal_record_aborts_timer() {
        let timer = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        });
        let mut record = RequestRecord::new("req", 1);
        record.finalize(RequestStatus::Error);
        record.set_deadline(timer.abort_handle());

        assert!(timer.await.unwrap_err().is_cancelled());
    }
}
