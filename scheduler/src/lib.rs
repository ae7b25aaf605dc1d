//! A multi-level feedback queue scheduler library.
//!
//! This library provides the traits and structures necessary
//! to simulate an MLFQ scheduler one time unit at a time.
//!
//! ```rust
//! use mlfq::{Scheduler, QuantumAssignment, TieBreak};
//!
//! let mut scheduler =
//!     mlfq::mlfq(3, QuantumAssignment::Doubling, Some(50), TieBreak::RoundRobin).unwrap();
//! scheduler.add_process(0, 5, None).unwrap();
//! while !scheduler.is_complete() {
//!     scheduler.step();
//! }
//! println!("{}", scheduler.metrics());
//! ```

mod config;
mod error;
pub mod metrics;
mod policy;
mod process;
mod queue;
mod scheduler;
pub mod snapshot;

pub use crate::config::{Config, Preset, QuantumAssignment};
pub use crate::error::{ConfigError, ProcessError};
pub use crate::metrics::Metrics;
pub use crate::policy::TieBreak;
pub use crate::process::{ProcessSpec, Workload};
pub use crate::queue::Queue;
pub use crate::scheduler::{
    Pid, Process, ProcessState, RunOutcome, Scheduler, SchedulingDecision,
};
pub use crate::snapshot::Snapshot;
pub use schedulers::{Mlfq, Slice, DEFAULT_SAMPLE_INTERVAL};

mod schedulers;

/// Returns an MLFQ scheduler with no processes.
///
/// * `num_queues` - the number of priority levels, queue 0 has the highest
///                  priority.
/// * `quanta` - how many consecutive time units a process may run at each
///              level before it is moved one level down.
/// * `boost_interval` - when set, every queued process is moved back to
///                      queue 0 each time the clock reaches a multiple of
///                      this value.
/// * `tie_break` - where a process whose quantum expired is inserted in the
///                 lowest queue.
pub fn mlfq(
    num_queues: usize,
    quanta: QuantumAssignment,
    boost_interval: Option<usize>,
    tie_break: TieBreak,
) -> Result<Mlfq, ConfigError> {
    Config::new(num_queues, quanta, boost_interval, tie_break).map(Mlfq::new)
}
