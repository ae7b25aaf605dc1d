use std::collections::HashMap;
use std::num::NonZeroUsize;

use serde::Serialize;
use tracing::{debug, trace};

use crate::metrics::{self, Metrics};
use crate::process::PCB;
use crate::snapshot::{BoostStatus, ProcessSnapshot, QueueSnapshot, Snapshot};
use crate::ProcessState::{New, Ready, Running, Terminated};
use crate::SchedulingDecision::{Done, Idle, Run};
use crate::{
    Config, Pid, Process, ProcessError, ProcessSpec, Queue, RunOutcome, Scheduler,
    SchedulingDecision,
};

/// Ticks between two throughput samples unless configured otherwise.
pub const DEFAULT_SAMPLE_INTERVAL: usize = 10;

/// A contiguous stretch of CPU time given to one process at one level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub pid: Pid,
    pub queue: usize,
    pub start: usize,
    pub end: usize,
}

/// Multi-level feedback queue engine.
///
/// The engine owns every process control block, queues only hold PIDs.
/// Each call to [`Scheduler::step`] advances the clock by one unit.
pub struct Mlfq {
    config: Config,
    queues: Vec<Queue>,
    processes: Vec<PCB>,
    slots: HashMap<Pid, usize>,
    next_pid: Pid,
    current_time: usize,
    quantum_used: usize,
    running: Option<Pid>,
    last_boost: Option<usize>,
    next_boost: Option<usize>,
    timeline: Vec<Slice>,
    throughput: Vec<(usize, f64)>,
    sample_interval: NonZeroUsize,
}

impl Mlfq {
    pub fn new(config: Config) -> Self {
        let mut mlfq = Mlfq {
            queues: Vec::new(),
            processes: Vec::new(),
            slots: HashMap::new(),
            next_pid: Pid::first(),
            current_time: 0,
            quantum_used: 0,
            running: None,
            last_boost: None,
            next_boost: None,
            timeline: Vec::new(),
            throughput: Vec::new(),
            sample_interval: NonZeroUsize::new(DEFAULT_SAMPLE_INTERVAL)
                .unwrap_or(NonZeroUsize::MIN),
            config,
        };
        mlfq.configure(mlfq.config.clone());
        mlfq
    }

    /// Rebuilds the queue cascade and resets the simulation.
    ///
    /// The process list is kept.
    pub fn configure(&mut self, config: Config) {
        self.queues = config
            .quanta()
            .iter()
            .enumerate()
            .map(|(level, quantum)| Queue::new(level, *quantum))
            .collect();
        self.config = config;
        self.reset();
        debug!(config = %self.config, "configured");
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Adds a process in the [`New`] state.
    ///
    /// Without an explicit `pid` the lowest free PID above the last generated
    /// one is used. Explicit PIDs must be unique.
    pub fn add_process(
        &mut self,
        arrival: usize,
        burst: usize,
        pid: Option<Pid>,
    ) -> Result<Pid, ProcessError> {
        let spec = ProcessSpec { arrival, burst };
        spec.validate()?;
        let pid = match pid {
            Some(pid) if self.slots.contains_key(&pid) => {
                return Err(ProcessError::DuplicatePid(pid))
            }
            Some(pid) => pid,
            None => self.free_pid(),
        };
        self.slots.insert(pid, self.processes.len());
        self.processes.push(PCB::new(pid, spec));
        debug!(%pid, arrival, burst, "process added");
        Ok(pid)
    }

    /// Adds every process of `set`, or none of them if one is invalid.
    pub fn load_set(&mut self, set: &[ProcessSpec]) -> Result<Vec<Pid>, ProcessError> {
        for spec in set {
            spec.validate()?;
        }
        set.iter()
            .map(|spec| self.add_process(spec.arrival, spec.burst, None))
            .collect()
    }

    pub fn process(&self, pid: Pid) -> Option<&dyn Process> {
        self.slots
            .get(&pid)
            .map(|slot| &self.processes[*slot] as &dyn Process)
    }

    pub fn queues(&self) -> &[Queue] {
        &self.queues
    }

    pub fn running(&self) -> Option<Pid> {
        self.running
    }

    pub fn boost_status(&self) -> BoostStatus {
        BoostStatus {
            enabled: self.config.boost_interval().is_some(),
            interval: self.config.boost_interval().map(NonZeroUsize::get),
            last_boost: self.last_boost,
            next_boost_in: self
                .next_boost
                .map(|next| next.saturating_sub(self.current_time)),
        }
    }

    /// Every stretch of CPU time handed out so far, in order.
    pub fn timeline(&self) -> &[Slice] {
        &self.timeline
    }

    /// `(tick, throughput)` pairs recorded every sample interval.
    pub fn throughput_history(&self) -> &[(usize, f64)] {
        &self.throughput
    }

    pub fn set_sample_interval(&mut self, interval: NonZeroUsize) {
        self.sample_interval = interval;
    }

    fn free_pid(&mut self) -> Pid {
        while self.slots.contains_key(&self.next_pid) {
            self.next_pid = self.next_pid + 1;
        }
        let pid = self.next_pid;
        self.next_pid = pid + 1;
        pid
    }

    fn pcb(&self, pid: Pid) -> &PCB {
        &self.processes[self.slots[&pid]]
    }

    fn pcb_mut(&mut self, pid: Pid) -> &mut PCB {
        let slot = self.slots[&pid];
        &mut self.processes[slot]
    }

    fn lowest(&self) -> usize {
        self.queues.len() - 1
    }

    fn boost_due(&self) -> bool {
        match self.config.boost_interval() {
            Some(interval) => self.current_time > 0 && self.current_time % interval.get() == 0,
            None => false,
        }
    }

    /// Moves every queued process to the tail of queue 0.
    fn boost(&mut self) {
        let mut boosted = Vec::new();
        for queue in self.queues.iter_mut().skip(1) {
            boosted.extend(queue.drain());
        }
        for pid in &boosted {
            let pcb = self.pcb_mut(*pid);
            pcb.queue = 0;
            pcb.state = Ready;
            self.queues[0].push_back(*pid);
        }
        self.running = None;
        self.quantum_used = 0;
        self.last_boost = Some(self.current_time);
        self.next_boost = self
            .config
            .boost_interval()
            .map(|interval| self.current_time + interval.get());
        debug!(time = self.current_time, moved = boosted.len(), "priority boost");
    }

    /// Puts every process whose arrival time has come into queue 0.
    ///
    /// A process added after its arrival time has already waited since then.
    fn admit(&mut self) {
        let now = self.current_time;
        for pcb in self.processes.iter_mut() {
            if pcb.state == New && pcb.arrival <= now {
                pcb.state = Ready;
                pcb.queue = 0;
                pcb.wait = now - pcb.arrival;
                self.queues[0].push_back(pcb.pid);
                debug!(pid = %pcb.pid, time = now, "admitted");
            }
        }
    }

    fn select(&self) -> Option<(usize, Pid)> {
        self.queues
            .iter()
            .find_map(|queue| queue.front().map(|pid| (queue.level(), pid)))
    }

    fn record(&mut self, pid: Pid, queue: usize) {
        let now = self.current_time;
        match self.timeline.last_mut() {
            Some(slice) if slice.pid == pid && slice.queue == queue && slice.end == now => {
                slice.end = now + 1;
            }
            _ => self.timeline.push(Slice {
                pid,
                queue,
                start: now,
                end: now + 1,
            }),
        }
    }

    /// Reinserts a process whose quantum expired at `level`.
    fn expire(&mut self, pid: Pid, level: usize) -> RunOutcome {
        self.queues[level].remove(pid);
        let lowest = self.lowest();
        let target = (level + 1).min(lowest);

        self.pcb_mut(pid).queue = target;
        if target == lowest {
            let index = {
                let arriving = self.pcb(pid);
                let queued = self.queues[lowest].iter().map(|entry| self.pcb(entry));
                self.config.tie_break().position(queued, arriving)
            };
            self.queues[lowest].insert(index, pid);
        } else {
            self.queues[target].push_back(pid);
        }

        if target == level {
            debug!(%pid, queue = level, "requeued");
            RunOutcome::Requeue
        } else {
            debug!(%pid, from = level, to = target, "demoted");
            RunOutcome::Demote { to: target }
        }
    }

    /// Moves the clock to the next tick.
    fn advance(&mut self) {
        self.current_time += 1;
        // A boost at the new tick must run before the arrivals of that tick.
        if !self.boost_due() {
            self.admit();
        }
        self.sample();
    }

    fn sample(&mut self) {
        if self.current_time % self.sample_interval.get() != 0 {
            return;
        }
        let completed = self
            .processes
            .iter()
            .filter(|pcb| pcb.state == Terminated)
            .count();
        self.throughput
            .push((self.current_time, completed as f64 / self.current_time as f64));
    }
}

impl Default for Mlfq {
    fn default() -> Self {
        Mlfq::new(Config::default())
    }
}

impl Scheduler for Mlfq {
    fn step(&mut self) -> SchedulingDecision {
        if !self.processes.is_empty() && self.is_complete() {
            self.current_time += 1;
            self.sample();
            return Done;
        }

        if self.boost_due() {
            self.boost();
        }
        self.admit();

        let Some((level, pid)) = self.select() else {
            self.running = None;
            self.quantum_used = 0;
            trace!(time = self.current_time, "idle");
            self.advance();
            return Idle;
        };

        if self.running != Some(pid) {
            self.quantum_used = 0;
        }
        let now = self.current_time;
        let quantum = self.queues[level].quantum().get();
        {
            let pcb = self.pcb_mut(pid);
            if pcb.response.is_none() {
                pcb.response = Some(now - pcb.arrival);
            }
            pcb.state = Running;
            pcb.remaining -= 1;
        }
        self.quantum_used += 1;
        self.record(pid, level);
        trace!(%pid, queue = level, time = now, "dispatched");

        let outcome = if self.pcb(pid).remaining == 0 {
            self.queues[level].remove(pid);
            let pcb = self.pcb_mut(pid);
            pcb.state = Terminated;
            pcb.completion = Some(now + 1);
            pcb.wait = now + 1 - pcb.arrival - pcb.burst;
            self.running = None;
            self.quantum_used = 0;
            debug!(%pid, completion = now + 1, "terminated");
            RunOutcome::Exit
        } else if self.quantum_used >= quantum {
            self.pcb_mut(pid).state = Ready;
            self.running = None;
            self.quantum_used = 0;
            self.expire(pid, level)
        } else {
            self.running = Some(pid);
            RunOutcome::Continue
        };

        for pcb in self.processes.iter_mut() {
            if pcb.state == Ready && pcb.pid != pid {
                pcb.wait += 1;
            }
        }

        if outcome == RunOutcome::Continue {
            self.pcb_mut(pid).state = Ready;
        }
        self.advance();

        Run {
            pid,
            queue: level,
            outcome,
        }
    }

    fn reset(&mut self) {
        for pcb in self.processes.iter_mut() {
            pcb.reset();
        }
        for queue in self.queues.iter_mut() {
            queue.clear();
        }
        self.current_time = 0;
        self.quantum_used = 0;
        self.running = None;
        self.last_boost = None;
        self.next_boost = self.config.boost_interval().map(NonZeroUsize::get);
        self.timeline.clear();
        self.throughput.clear();
    }

    fn time(&self) -> usize {
        self.current_time
    }

    fn is_complete(&self) -> bool {
        self.processes.iter().all(|pcb| pcb.state == Terminated)
    }

    fn list(&self) -> Vec<&dyn Process> {
        self.processes
            .iter()
            .map(|pcb| pcb as &dyn Process)
            .collect()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.current_time,
            running: self.running,
            processes: self.processes.iter().map(ProcessSnapshot::from).collect(),
            queues: self.queues.iter().map(QueueSnapshot::from).collect(),
            boost: self.boost_status(),
            metrics: self.metrics(),
        }
    }

    fn metrics(&self) -> Metrics {
        metrics::aggregate(&self.processes, self.current_time)
    }
}
