use std::fmt::{self, Display};

use serde::Serialize;

use crate::{Process, ProcessState};

/// Aggregate performance figures over the terminated processes.
///
/// Every figure is 0 until a process terminates.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub avg_wait: f64,
    pub avg_turnaround: f64,
    pub avg_response: f64,
    /// Terminated processes per tick.
    pub throughput: f64,
    /// Percentage of ticks spent on the bursts of terminated processes,
    /// capped at 100.
    pub cpu_utilization: f64,
    pub completed: usize,
    pub total: usize,
}

/// Computes [`Metrics`] at tick `current_time`.
pub fn aggregate<'a, P, I>(processes: I, current_time: usize) -> Metrics
where
    P: Process + ?Sized + 'a,
    I: IntoIterator<Item = &'a P>,
{
    let mut metrics = Metrics::default();
    let (mut wait, mut turnaround, mut response, mut busy) = (0, 0, 0, 0);

    for process in processes {
        metrics.total += 1;
        if process.state() != ProcessState::Terminated {
            continue;
        }
        let (Some(completion), Some(first_run)) = (process.completion(), process.response()) else {
            continue;
        };
        let elapsed = completion - process.arrival();
        metrics.completed += 1;
        turnaround += elapsed;
        wait += elapsed - process.burst();
        response += first_run;
        busy += process.burst();
    }

    if metrics.completed == 0 {
        return metrics;
    }

    let count = metrics.completed as f64;
    metrics.avg_wait = wait as f64 / count;
    metrics.avg_turnaround = turnaround as f64 / count;
    metrics.avg_response = response as f64 / count;

    if current_time > 0 {
        metrics.throughput = count / current_time as f64;
        metrics.cpu_utilization = (100.0 * busy as f64 / current_time as f64).min(100.0);
    }

    metrics
}

impl Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Completed:           {}/{}", self.completed, self.total)?;
        writeln!(f, "Avg wait time:       {:.2}", self.avg_wait)?;
        writeln!(f, "Avg turnaround time: {:.2}", self.avg_turnaround)?;
        writeln!(f, "Avg response time:   {:.2}", self.avg_response)?;
        writeln!(f, "Throughput:          {:.4}", self.throughput)?;
        write!(f, "CPU utilization:     {:.2}%", self.cpu_utilization)
    }
}
