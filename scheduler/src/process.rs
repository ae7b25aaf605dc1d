use std::fmt::{self, Display};
use std::str::FromStr;

use serde::Serialize;

use crate::{Pid, Process, ProcessError, ProcessState};

/// The arrival and burst time of a process that has not been admitted yet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessSpec {
    pub arrival: usize,
    pub burst: usize,
}

impl ProcessSpec {
    /// Validates raw, possibly negative, parameters.
    pub fn new(arrival: i64, burst: i64) -> Result<ProcessSpec, ProcessError> {
        if arrival < 0 {
            return Err(ProcessError::NegativeArrival(arrival));
        }
        if burst <= 0 {
            return Err(ProcessError::NonPositiveBurst(burst));
        }
        Ok(ProcessSpec {
            arrival: arrival as usize,
            burst: burst as usize,
        })
    }

    pub(crate) fn validate(&self) -> Result<(), ProcessError> {
        if self.burst == 0 {
            return Err(ProcessError::NonPositiveBurst(0));
        }
        Ok(())
    }
}

impl From<(usize, usize)> for ProcessSpec {
    fn from((arrival, burst): (usize, usize)) -> Self {
        ProcessSpec { arrival, burst }
    }
}

impl FromStr for ProcessSpec {
    type Err = ProcessError;

    /// Parses `arrival:burst`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ProcessError::Malformed(s.to_string());
        let (arrival, burst) = s.trim().split_once(':').ok_or_else(malformed)?;
        let arrival = arrival.trim().parse::<i64>().map_err(|_| malformed())?;
        let burst = burst.trim().parse::<i64>().map_err(|_| malformed())?;
        ProcessSpec::new(arrival, burst)
    }
}

impl Display for ProcessSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.arrival, self.burst)
    }
}

/// Ready made process sets.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Workload {
    /// Five processes with staggered arrivals and mixed bursts.
    Standard,
    /// Three long running processes.
    CpuIntensive,
    /// Five short processes.
    IoIntensive,
}

impl Workload {
    pub const ALL: [Workload; 3] = [
        Workload::Standard,
        Workload::CpuIntensive,
        Workload::IoIntensive,
    ];

    pub fn specs(&self) -> Vec<ProcessSpec> {
        let raw: &[(usize, usize)] = match self {
            Workload::Standard => &[(0, 20), (5, 12), (10, 8), (15, 16), (20, 5)],
            Workload::CpuIntensive => &[(0, 30), (5, 25), (10, 20)],
            Workload::IoIntensive => &[(0, 3), (2, 2), (4, 4), (6, 3), (8, 2)],
        };
        raw.iter().copied().map(ProcessSpec::from).collect()
    }
}

impl FromStr for Workload {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Workload::Standard),
            "cpu" | "cpu-intensive" => Ok(Workload::CpuIntensive),
            "io" | "io-intensive" => Ok(Workload::IoIntensive),
            _ => Err(ProcessError::UnknownWorkload(s.to_string())),
        }
    }
}

/// Process control block owned by the engine.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PCB {
    pub(crate) pid: Pid,
    pub(crate) arrival: usize,
    pub(crate) burst: usize,
    pub(crate) remaining: usize,
    pub(crate) state: ProcessState,
    pub(crate) queue: usize,
    pub(crate) wait: usize,
    pub(crate) response: Option<usize>,
    pub(crate) completion: Option<usize>,
}

impl PCB {
    pub(crate) fn new(pid: Pid, spec: ProcessSpec) -> Self {
        PCB {
            pid,
            arrival: spec.arrival,
            burst: spec.burst,
            remaining: spec.burst,
            state: ProcessState::New,
            queue: 0,
            wait: 0,
            response: None,
            completion: None,
        }
    }

    /// Back to the fields it had when it was created.
    pub(crate) fn reset(&mut self) {
        *self = PCB::new(
            self.pid,
            ProcessSpec {
                arrival: self.arrival,
                burst: self.burst,
            },
        );
    }
}

impl Process for PCB {
    fn pid(&self) -> Pid {
        self.pid
    }

    fn state(&self) -> ProcessState {
        self.state
    }

    fn arrival(&self) -> usize {
        self.arrival
    }

    fn burst(&self) -> usize {
        self.burst
    }

    fn remaining(&self) -> usize {
        self.remaining
    }

    fn queue(&self) -> usize {
        self.queue
    }

    fn wait(&self) -> usize {
        self.wait
    }

    fn response(&self) -> Option<usize> {
        self.response
    }

    fn completion(&self) -> Option<usize> {
        self.completion
    }
}
