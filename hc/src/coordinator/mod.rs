//! Request coordination
//!
//! The Coordinator owns every crack request. Submission fans shares out to
//! workers and arms a per-request deadline; partial results are merged as they
//! arrive in any order. Both the last result and the deadline go through the
//! same compare-and-set on the record, so exactly one of READY or ERROR wins.

mod config;
mod core;
mod record;

pub use config::CoordinatorConfig;
pub use core::Coordinator;
pub use record::{MergeOutcome, RecordSnapshot, RequestRecord, RequestStatus};
