//! Read-only views of the engine state.

use std::fmt::{self, Display};

use serde::Serialize;

use crate::{Metrics, Pid, Process, ProcessState, Queue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessSnapshot {
    pub pid: Pid,
    pub arrival: usize,
    pub burst: usize,
    pub remaining: usize,
    pub state: ProcessState,
    pub queue: usize,
    pub wait: usize,
    pub response: Option<usize>,
    pub completion: Option<usize>,
    pub turnaround: Option<usize>,
}

impl<P: Process + ?Sized> From<&P> for ProcessSnapshot {
    fn from(process: &P) -> Self {
        ProcessSnapshot {
            pid: process.pid(),
            arrival: process.arrival(),
            burst: process.burst(),
            remaining: process.remaining(),
            state: process.state(),
            queue: process.queue(),
            wait: process.wait(),
            response: process.response(),
            completion: process.completion(),
            turnaround: process.turnaround(),
        }
    }
}

fn optional(value: Option<usize>) -> String {
    value.map_or_else(|| "-".to_string(), |value| value.to_string())
}

impl Display for ProcessSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.pid,
            self.state,
            self.queue,
            self.arrival,
            self.burst,
            self.remaining,
            self.wait,
            optional(self.response),
            optional(self.completion),
            optional(self.turnaround),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueSnapshot {
    pub level: usize,
    pub quantum: usize,
    pub pids: Vec<Pid>,
}

impl From<&Queue> for QueueSnapshot {
    fn from(queue: &Queue) -> Self {
        QueueSnapshot {
            level: queue.level(),
            quantum: queue.quantum().get(),
            pids: queue.iter().collect(),
        }
    }
}

impl Display for QueueSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} (quantum {}): [", self.level, self.quantum)?;
        for (index, pid) in self.pids.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "P{}", pid)?;
        }
        write!(f, "]")
    }
}

/// Priority boost bookkeeping.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct BoostStatus {
    pub enabled: bool,
    pub interval: Option<usize>,
    pub last_boost: Option<usize>,
    /// Ticks until the next boost fires.
    pub next_boost_in: Option<usize>,
}

/// Everything an observer can see after a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub time: usize,
    /// The process that held the CPU during the last tick, if it is still
    /// eligible to continue.
    pub running: Option<Pid>,
    pub processes: Vec<ProcessSnapshot>,
    pub queues: Vec<QueueSnapshot>,
    pub boost: BoostStatus,
    pub metrics: Metrics,
}

impl Snapshot {
    pub fn process(&self, pid: Pid) -> Option<&ProcessSnapshot> {
        self.processes.iter().find(|process| process.pid == pid)
    }

    pub fn queue_of(&self, pid: Pid) -> Option<usize> {
        self.queues
            .iter()
            .find(|queue| queue.pids.contains(&pid))
            .map(|queue| queue.level)
    }
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Time {}", self.time)?;
        writeln!(f, "PID\tSTATE\t\tQUEUE\tARRIVE\tBURST\tREMAIN\tWAIT\tRESP\tDONE\tTAT")?;
        let mut processes = self.processes.iter().collect::<Vec<_>>();
        processes.sort_by_key(|process| process.pid);
        for process in processes {
            writeln!(f, "{}", process)?;
        }
        for queue in &self.queues {
            writeln!(f, "{}", queue)?;
        }
        if self.boost.enabled {
            write!(f, "Boost: last ")?;
            match self.boost.last_boost {
                Some(time) => write!(f, "{}", time)?,
                None => write!(f, "never")?,
            }
            if let Some(next) = self.boost.next_boost_in {
                write!(f, ", next in {}", next)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
