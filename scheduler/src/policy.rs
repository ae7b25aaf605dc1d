//! Ordering rules for the lowest queue.
//!
//! Every non-terminal queue is plain round robin. When a process is put into
//! the lowest queue after its quantum expired, the active [`TieBreak`] decides
//! where it goes.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::Serialize;

use crate::{ConfigError, Process};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TieBreak {
    /// Append to the tail.
    #[default]
    RoundRobin,
    /// Keep the queue sorted by remaining time, shortest first.
    ShortestJobFirst,
    /// Keep the queue sorted by arrival time, earliest first.
    FirstComeFirstServed,
    /// Keep the queue sorted by accumulated wait time, longest first.
    LongestWaitFirst,
}

impl TieBreak {
    pub const ALL: [TieBreak; 4] = [
        TieBreak::RoundRobin,
        TieBreak::ShortestJobFirst,
        TieBreak::FirstComeFirstServed,
        TieBreak::LongestWaitFirst,
    ];

    /// Returns the index before which `arriving` is inserted into `queued`.
    ///
    /// The index equals the number of queued processes for a tail insertion.
    /// Ties keep their current order: the arriving process goes after every
    /// entry it compares equal to.
    pub fn position<'a, P, I>(&self, queued: I, arriving: &P) -> usize
    where
        P: Process + ?Sized + 'a,
        I: IntoIterator<Item = &'a P>,
    {
        let mut len = 0;
        for (index, entry) in queued.into_iter().enumerate() {
            let before = match self {
                TieBreak::RoundRobin => false,
                TieBreak::ShortestJobFirst => entry.remaining() > arriving.remaining(),
                TieBreak::FirstComeFirstServed => entry.arrival() > arriving.arrival(),
                TieBreak::LongestWaitFirst => entry.wait() < arriving.wait(),
            };
            if before {
                return index;
            }
            len = index + 1;
        }
        len
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            TieBreak::RoundRobin => "rr",
            TieBreak::ShortestJobFirst => "sjf",
            TieBreak::FirstComeFirstServed => "fcfs",
            TieBreak::LongestWaitFirst => "lwf",
        }
    }
}

impl Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieBreak::RoundRobin => write!(f, "Round Robin"),
            TieBreak::ShortestJobFirst => write!(f, "Shortest Job First"),
            TieBreak::FirstComeFirstServed => write!(f, "First Come First Served"),
            TieBreak::LongestWaitFirst => write!(f, "Longest Wait First"),
        }
    }
}

impl FromStr for TieBreak {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rr" | "round-robin" => Ok(TieBreak::RoundRobin),
            "sjf" | "shortest-job-first" => Ok(TieBreak::ShortestJobFirst),
            "fcfs" | "first-come-first-served" => Ok(TieBreak::FirstComeFirstServed),
            "lwf" | "longest-wait-first" => Ok(TieBreak::LongestWaitFirst),
            _ => Err(ConfigError::UnknownTieBreak(s.to_string())),
        }
    }
}
