//! Scheduler implementations.
//!
//! Every scheduler lives in its own file and is exported here.
mod mlfq;
pub use mlfq::{Mlfq, Slice, DEFAULT_SAMPLE_INTERVAL};
