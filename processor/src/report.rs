use std::fmt::Write as _;
use std::io::{self, Write};

use mlfq::{
    Config, Metrics, Mlfq, ProcessError, ProcessSpec, ProcessState, Scheduler, Slice, TieBreak,
};

use crate::Processor;

/// Writes the terminated processes and the summary statistics as CSV.
pub fn write_csv<S: Scheduler, W: Write>(scheduler: &S, mut out: W) -> io::Result<()> {
    writeln!(out, "PID,Arrival,Burst,Completion,Turnaround,Wait,Response")?;
    for process in scheduler.list() {
        if process.state() != ProcessState::Terminated {
            continue;
        }
        let (Some(completion), Some(turnaround), Some(response)) =
            (process.completion(), process.turnaround(), process.response())
        else {
            continue;
        };
        writeln!(
            out,
            "{},{},{},{},{},{},{}",
            process.pid(),
            process.arrival(),
            process.burst(),
            completion,
            turnaround,
            process.wait(),
            response
        )?;
    }

    let metrics = scheduler.metrics();
    writeln!(out)?;
    writeln!(out, "Summary Statistics")?;
    writeln!(out, "Total Processes,{}", metrics.total)?;
    writeln!(out, "Completed,{}", metrics.completed)?;
    writeln!(out, "Total Time,{}", scheduler.time())?;
    writeln!(out, "Avg Wait Time,{:.2}", metrics.avg_wait)?;
    writeln!(out, "Avg Turnaround Time,{:.2}", metrics.avg_turnaround)?;
    writeln!(out, "Avg Response Time,{:.2}", metrics.avg_response)?;
    writeln!(out, "Throughput,{:.4}", metrics.throughput)?;
    writeln!(out, "CPU Utilization,{:.2}%", metrics.cpu_utilization)?;
    Ok(())
}

/// Renders a timeline as a one line chart, `| P1 q0 0-1 | P2 q0 1-2 |`.
pub fn gantt(timeline: &[Slice]) -> String {
    let mut chart = String::from("|");
    for slice in timeline {
        let _ = write!(
            chart,
            " P{} q{} {}-{} |",
            slice.pid, slice.queue, slice.start, slice.end
        );
    }
    chart
}

/// The outcome of one tie-break policy on a process set.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub tie_break: TieBreak,
    pub metrics: Metrics,
    pub total_time: usize,
    /// `false` if the tick limit was reached first.
    pub finished: bool,
}

/// Runs `set` under every tie-break policy with the cascade of `config`.
pub fn compare(
    config: &Config,
    set: &[ProcessSpec],
    max_ticks: usize,
) -> Result<Vec<Comparison>, ProcessError> {
    TieBreak::ALL
        .iter()
        .map(|tie_break| {
            let mut scheduler = Mlfq::new(config.clone().with_tie_break(*tie_break));
            scheduler.load_set(set)?;
            Processor::run(&mut scheduler, max_ticks);
            Ok(Comparison {
                tie_break: *tie_break,
                metrics: scheduler.metrics(),
                total_time: scheduler.time(),
                finished: scheduler.is_complete(),
            })
        })
        .collect()
}
