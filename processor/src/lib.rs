//! A processor simulation library
//!
//! This is used for driving the schedulers from the [`mlfq`] crate, either
//! tick by tick until they finish or on a wall-clock timer.

use std::fmt::{self, Display};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use mlfq::snapshot::Snapshot;
use mlfq::{Scheduler, SchedulingDecision};
use tracing::info;

mod report;

pub use report::{compare, gantt, write_csv, Comparison};

/// Running iteration log
#[derive(Debug, Clone)]
pub struct Log {
    /// The action taken by the scheduler.
    pub decision: SchedulingDecision,

    /// The state of the scheduler after the tick.
    pub snapshot: Snapshot,
}

impl Log {
    fn new(decision: SchedulingDecision, snapshot: Snapshot) -> Log {
        Log { decision, snapshot }
    }
}

impl Display for Log {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.decision)?;
        write!(f, "{}", self.snapshot)
    }
}

impl PartialEq<Log> for Log {
    fn eq(&self, other: &Log) -> bool {
        self.decision == other.decision && self.snapshot == other.snapshot
    }
}

fn tick<S: Scheduler>(scheduler: &mut S) -> Log {
    let decision = scheduler.step();
    let log = Log::new(decision, scheduler.snapshot());
    #[cfg(feature = "output")]
    println!("{log}");
    log
}

/// The processor simulator.
pub struct Processor;

impl Processor {
    /// Drives `scheduler` until every process has terminated or `max_ticks`
    /// ticks have elapsed.
    ///
    /// The final [`SchedulingDecision::Done`] is not logged.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use mlfq::{Mlfq, Workload};
    /// use mlfq_processor::{format_logs, Processor};
    ///
    /// let mut scheduler = Mlfq::default();
    /// scheduler.load_set(&Workload::IoIntensive.specs()).unwrap();
    /// let logs = Processor::run(&mut scheduler, 1_000);
    ///
    /// println!("{}", format_logs(&logs));
    /// ```
    pub fn run<S: Scheduler>(scheduler: &mut S, max_ticks: usize) -> Vec<Log> {
        let mut logs = vec![];
        for _ in 0..max_ticks {
            if scheduler.is_complete() && !scheduler.list().is_empty() {
                break;
            }
            logs.push(tick(scheduler));
        }
        if scheduler.is_complete() {
            info!(time = scheduler.time(), "all processes terminated");
        } else {
            info!(max_ticks, "tick limit reached");
        }
        logs
    }

    /// Steps `scheduler` on a background thread, once every `interval`.
    ///
    /// The thread stops by itself when every process has terminated.
    pub fn play<S: Scheduler + 'static>(scheduler: S, interval: Duration) -> Playback<S> {
        let shared = Arc::new(Shared {
            scheduler: Mutex::new(scheduler),
            logs: Mutex::new(vec![]),
            paused: (Mutex::new(false), Condvar::new()),
            running: AtomicBool::new(true),
        });

        let worker = shared.clone();
        let handle = thread::spawn(move || {
            info!(?interval, "playback started");
            while worker.wait_unpaused() {
                thread::sleep(interval);
                if !worker.is_running() {
                    break;
                }
                let mut scheduler = worker.scheduler.lock().unwrap_or_else(PoisonError::into_inner);
                if scheduler.is_complete() && !scheduler.list().is_empty() {
                    info!(time = scheduler.time(), "all processes terminated");
                    break;
                }
                let log = tick(&mut *scheduler);
                drop(scheduler);
                worker.logs.lock().unwrap_or_else(PoisonError::into_inner).push(log);
            }
            worker.running.store(false, Ordering::Relaxed);
            info!("playback stopped");
        });

        Playback { shared, handle }
    }
}

struct Shared<S> {
    scheduler: Mutex<S>,
    logs: Mutex<Vec<Log>>,
    paused: (Mutex<bool>, Condvar),
    running: AtomicBool,
}

impl<S> Shared<S> {
    fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Blocks while paused, returns `false` once stopped.
    fn wait_unpaused(&self) -> bool {
        let mut paused = self.paused.0.lock().unwrap_or_else(PoisonError::into_inner);
        while *paused && self.is_running() {
            paused = self
                .paused
                .1
                .wait(paused)
                .unwrap_or_else(PoisonError::into_inner);
        }
        self.is_running()
    }

    fn set_paused(&self, value: bool) {
        *self.paused.0.lock().unwrap_or_else(PoisonError::into_inner) = value;
        self.paused.1.notify_all();
    }
}

/// Handle to a scheduler stepped by a background thread.
pub struct Playback<S: Scheduler + 'static> {
    shared: Arc<Shared<S>>,
    handle: JoinHandle<()>,
}

impl<S: Scheduler + 'static> Playback<S> {
    /// Runs `f` with exclusive access to the scheduler.
    ///
    /// No tick can happen while `f` runs.
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut scheduler = self
            .shared
            .scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut scheduler)
    }

    pub fn pause(&self) {
        self.shared.set_paused(true);
    }

    pub fn resume(&self) {
        self.shared.set_paused(false);
    }

    /// Asks the thread to stop after the current tick.
    pub fn stop(&self) {
        // Held so the flag cannot change between the check and the wait.
        let _paused = self
            .shared
            .paused
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.shared.running.store(false, Ordering::Relaxed);
        self.shared.paused.1.notify_all();
    }

    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    /// Waits for the thread to finish and returns the logs it recorded.
    ///
    /// Call [`Playback::stop`] first unless the scheduler is expected to run
    /// to completion.
    pub fn join(self) -> Vec<Log> {
        if self.handle.join().is_err() {
            info!("playback thread panicked");
        }
        let mut logs = self.shared.logs.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *logs)
    }
}

/// Format the [`Processor`]'s logs to a [`String`].
///
/// * `logs` - the logs returned by the [`Processor`].
///
/// ## Example
///
/// ```rust
/// use mlfq::Mlfq;
/// use mlfq_processor::{format_logs, Processor};
///
/// let mut scheduler = Mlfq::default();
/// scheduler.add_process(0, 3, None).unwrap();
/// let logs = Processor::run(&mut scheduler, 100);
///
/// println!("{}", format_logs(&logs));
/// ```
pub fn format_logs(logs: &[Log]) -> String {
    let mut s = String::new();
    for (iteration, log) in logs.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = fmt::write(
            &mut s,
            format_args!("===== Iteration: {} =====\n{}\n", iteration + 1, log),
        );
    }
    s
}
