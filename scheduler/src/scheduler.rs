use std::fmt::{self, Display};
use std::num::NonZeroUsize;
use std::ops::Add;

use serde::Serialize;

use crate::metrics::Metrics;
use crate::snapshot::Snapshot;

/// The PID of a process
///
/// The PID cannot be 0, PIDs start from 1.
#[derive(PartialEq, Eq, Copy, Clone, Hash, Ord, PartialOrd, Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Pid(NonZeroUsize);

impl Pid {
    /// Builds a PID from a raw value.
    ///
    /// # Panics
    ///
    /// Panics if `pid` is 0. Use [`Pid::try_from`] for untrusted input.
    pub fn new(pid: usize) -> Pid {
        match NonZeroUsize::new(pid) {
            Some(pid) => Pid(pid),
            None => panic!("PID 0 is reserved"),
        }
    }

    pub fn get(self) -> usize {
        self.0.get()
    }

    pub(crate) fn first() -> Pid {
        Pid(NonZeroUsize::MIN)
    }
}

impl TryFrom<usize> for Pid {
    type Error = crate::ProcessError;

    fn try_from(pid: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(pid)
            .map(Pid)
            .ok_or(crate::ProcessError::ZeroPid)
    }
}

impl PartialEq<usize> for Pid {
    fn eq(&self, other: &usize) -> bool {
        self.0.get() == *other
    }
}

impl Display for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl Add<usize> for Pid {
    type Output = Pid;

    fn add(self, rhs: usize) -> Self::Output {
        Pid(self.0.saturating_add(rhs))
    }
}

/// What happened to the process that held the CPU during a tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum RunOutcome {
    /// The process keeps the head of its queue and will be selected again.
    Continue,
    /// The process used its last unit of burst time.
    Exit,
    /// The quantum expired and the process moved one level down.
    Demote {
        /// The queue the process was moved to.
        to: usize,
    },
    /// The quantum expired in the lowest queue and the process was put back
    /// according to the tie-break policy.
    Requeue,
}

/// The action taken by the engine for one tick.
///
/// This is returned by the [`Scheduler::step`] function.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum SchedulingDecision {
    /// The process with PID `pid` ran for one time unit at level `queue`.
    Run {
        pid: Pid,
        queue: usize,
        outcome: RunOutcome,
    },
    /// No process was ready, the clock moved anyway.
    Idle,
    /// Every process has terminated. Only the clock moved.
    Done,
}

impl Display for SchedulingDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulingDecision::Run {
                pid,
                queue,
                outcome,
            } => {
                write!(f, "Run {} on queue {}", pid, queue)?;
                match outcome {
                    RunOutcome::Continue => Ok(()),
                    RunOutcome::Exit => write!(f, ", exited"),
                    RunOutcome::Demote { to } => write!(f, ", demoted to queue {}", to),
                    RunOutcome::Requeue => write!(f, ", requeued"),
                }
            }
            SchedulingDecision::Idle => {
                write!(f, "Idle, no process is ready")
            }
            SchedulingDecision::Done => {
                write!(f, "Done, no more processes")
            }
        }
    }
}

/// The state of a process.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ProcessState {
    /// The process has not arrived yet.
    New,

    /// The process is sitting in one of the queues.
    Ready,

    /// The process is currently scheduled.
    Running,

    /// The process has used all of its burst time.
    Terminated,
}

impl Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessState::New => write!(f, "NEW"),
            ProcessState::Ready => write!(f, "READY"),
            ProcessState::Running => write!(f, "RUNNING"),
            ProcessState::Terminated => write!(f, "DONE"),
        }
    }
}

/// The trait that the Process Control Block (PCB) has to implement.
///
/// The PCB can be implemented with any data structure as long as
/// it implements this trait.
pub trait Process {
    /// Return the PID of the process.
    fn pid(&self) -> Pid;

    /// Return the state of the process.
    fn state(&self) -> ProcessState;

    /// The tick at which the process enters queue 0.
    fn arrival(&self) -> usize;

    /// Total CPU time the process needs.
    fn burst(&self) -> usize;

    /// CPU time still needed.
    fn remaining(&self) -> usize;

    /// Index of the queue the process belongs to.
    fn queue(&self) -> usize;

    /// Ticks spent ready but not running.
    fn wait(&self) -> usize;

    /// Latency between arrival and the first dispatch, once dispatched.
    fn response(&self) -> Option<usize>;

    /// The tick at which the remaining time reached 0.
    fn completion(&self) -> Option<usize>;

    /// Completion minus arrival, once terminated.
    fn turnaround(&self) -> Option<usize> {
        self.completion()
            .map(|completion| completion - self.arrival())
    }
}

/// The trait that any scheduler has to implement.
///
/// A scheduler is a purely synchronous state machine: the caller decides when
/// time moves by calling [`Scheduler::step`].
pub trait Scheduler: Send {
    /// Advances the simulation by exactly one time unit.
    fn step(&mut self) -> SchedulingDecision;

    /// Puts every process back to its initial state and empties the queues.
    fn reset(&mut self);

    /// The current tick.
    fn time(&self) -> usize;

    /// Returns `true` once every known process has terminated.
    fn is_complete(&self) -> bool;

    /// Returns the list of processes.
    fn list(&self) -> Vec<&dyn Process>;

    /// Captures the observable state.
    fn snapshot(&self) -> Snapshot;

    /// Aggregates the metrics of the terminated processes.
    fn metrics(&self) -> Metrics;
}
