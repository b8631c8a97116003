//! Hashcrack - distributed brute-force hash cracking
//!
//! A manager accepts a target digest and a maximum candidate length, splits
//! the space of every word over a fixed alphabet into one contiguous share per
//! worker, and collects the words whose digest matches. Each request ends
//! exactly once, READY with its matches or ERROR when the deadline passes.
//!
//! # Core Concepts
//!
//! - **Ranked enumeration**: every candidate has a unique index, shortest words first
//! - **Even shares**: share sizes differ by at most one
//! - **Exactly-once finalization**: the last result and the deadline race on one compare-and-set
//!
//! # Modules
//!
//! - [`combinations`] - Alphabet, indexer and share partitioning
//! - [`digest`] - Hash functions and target comparison
//! - [`search`] - Share search loop and the worker that runs it
//! - [`coordinator`] - Request table and lifecycle
//! - [`transport`] - Share dispatch and result delivery, HTTP or in-process
//! - [`server`] - Axum routers for the manager and workers
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod combinations;
pub mod config;
pub mod coordinator;
pub mod digest;
pub mod error;
pub mod models;
pub mod search;
pub mod server;
pub mod transport;

// Re-export commonly used types
pub use combinations::{Alphabet, index_of_word, shares_range, total_combinations, word_by_index};
pub use config::Config;
pub use coordinator::{Coordinator, CoordinatorConfig, MergeOutcome, RequestStatus};
pub use digest::{DigestAlgorithm, DigestComparator};
pub use error::{CrackError, CrackResult};
pub use search::{Worker, run_share};
