use thiserror::Error;

use crate::Pid;

/// Rejected scheduler configuration.
///
/// A configuration is validated when it is built, an engine never sees an
/// invalid one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("at least one queue is required")]
    NoQueues,

    #[error("queue {queue} has a quantum of 0")]
    ZeroQuantum { queue: usize },

    #[error("{found} quanta given for {expected} queues")]
    QuantumCount { expected: usize, found: usize },

    #[error("quantum multiplier must be a finite value >= 1, got {0}")]
    Multiplier(f64),

    #[error("boost interval must be greater than 0")]
    ZeroBoostInterval,

    #[error("unknown tie-break policy `{0}` (expected rr, sjf, fcfs or lwf)")]
    UnknownTieBreak(String),

    #[error("unknown preset `{0}`")]
    UnknownPreset(String),
}

/// Rejected process parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    #[error("arrival time cannot be negative, got {0}")]
    NegativeArrival(i64),

    #[error("burst time must be greater than 0, got {0}")]
    NonPositiveBurst(i64),

    #[error("PID 0 is reserved")]
    ZeroPid,

    #[error("PID {0} is already taken")]
    DuplicatePid(Pid),

    #[error("malformed process `{0}`, expected `arrival:burst`")]
    Malformed(String),

    #[error("unknown process set `{0}` (expected standard, cpu or io)")]
    UnknownWorkload(String),
}
