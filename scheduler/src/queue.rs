use std::collections::VecDeque;
use std::num::NonZeroUsize;

use crate::Pid;

/// One level of the feedback cascade.
///
/// The queue only holds PIDs, the process control blocks live in the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Queue {
    level: usize,
    quantum: NonZeroUsize,
    entries: VecDeque<Pid>,
}

impl Queue {
    pub fn new(level: usize, quantum: NonZeroUsize) -> Self {
        Queue {
            level,
            quantum,
            entries: VecDeque::new(),
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn quantum(&self) -> NonZeroUsize {
        self.quantum
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn front(&self) -> Option<Pid> {
        self.entries.front().copied()
    }

    pub fn push_back(&mut self, pid: Pid) {
        self.entries.push_back(pid);
    }

    pub fn pop_front(&mut self) -> Option<Pid> {
        self.entries.pop_front()
    }

    /// Inserts `pid` before the entry at `index`, or at the tail when `index`
    /// is past the end.
    pub fn insert(&mut self, index: usize, pid: Pid) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, pid);
    }

    pub fn remove(&mut self, pid: Pid) -> bool {
        match self.entries.iter().position(|entry| *entry == pid) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.entries.contains(&pid)
    }

    pub fn iter(&self) -> impl Iterator<Item = Pid> + '_ {
        self.entries.iter().copied()
    }

    /// Removes every entry, front to back.
    pub fn drain(&mut self) -> impl Iterator<Item = Pid> + '_ {
        self.entries.drain(..)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
