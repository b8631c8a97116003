//! Share execution
//!
//! `run_share` is the synchronous brute-force loop; `Worker` wraps it so a
//! share is acknowledged immediately and its matches arrive later through a
//! `ResultSink`.

mod executor;
mod worker;

pub use executor::run_share;
pub use worker::Worker;
