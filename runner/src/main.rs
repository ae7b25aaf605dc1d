use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mlfq::{Config, Mlfq, Preset, ProcessSpec, QuantumAssignment, Scheduler, TieBreak, Workload};
use mlfq_processor::{compare, format_logs, gantt, write_csv, Processor};
use tracing::info;

/// Multi-level feedback queue scheduler simulator
#[derive(Parser, Debug)]
#[command(name = "mlfq")]
struct Cli {
    /// Start from a ready made cascade: standard, fine, coarse or aggressive
    #[arg(
        long,
        env = "MLFQ_PRESET",
        conflicts_with_all = ["queues", "quanta", "base_quantum", "multiplier", "boost", "no_boost"]
    )]
    preset: Option<Preset>,

    /// Number of priority queues
    #[arg(long, env = "MLFQ_QUEUES", default_value_t = 3)]
    queues: usize,

    /// Explicit quantum per queue, highest priority first (e.g. 1,2,4)
    #[arg(
        long,
        env = "MLFQ_QUANTA",
        value_delimiter = ',',
        conflicts_with_all = ["base_quantum", "multiplier"]
    )]
    quanta: Option<Vec<usize>>,

    /// Quantum of queue 0, following queues grow by --multiplier
    #[arg(long, env = "MLFQ_BASE_QUANTUM")]
    base_quantum: Option<usize>,

    /// Growth factor between consecutive quanta
    #[arg(long, env = "MLFQ_MULTIPLIER", default_value_t = 2.0)]
    multiplier: f64,

    /// Priority boost interval
    #[arg(long, env = "MLFQ_BOOST", default_value_t = 100)]
    boost: usize,

    /// Disable the priority boost
    #[arg(long)]
    no_boost: bool,

    /// Lowest queue policy: rr, sjf, fcfs or lwf
    #[arg(long, env = "MLFQ_TIE_BREAK", default_value = "rr")]
    tie_break: TieBreak,

    /// Processes as arrival:burst, repeatable
    #[arg(short, long = "process")]
    processes: Vec<ProcessSpec>,

    /// Ready made process set: standard, cpu or io
    #[arg(long)]
    workload: Option<Workload>,

    /// Stop after this many ticks even if processes remain
    #[arg(long, env = "MLFQ_MAX_TICKS", default_value_t = 10_000)]
    max_ticks: usize,

    /// Print the state after every tick
    #[arg(short, long)]
    verbose: bool,

    /// Print the final state as JSON
    #[arg(long)]
    json: bool,

    /// Write the results to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Run the process set under every tie-break policy and compare
    #[arg(long)]
    compare: bool,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        if let Some(preset) = self.preset {
            return Ok(Config::preset(preset).with_tie_break(self.tie_break));
        }
        let quanta = match (&self.quanta, self.base_quantum) {
            (Some(quanta), _) => QuantumAssignment::Explicit(quanta.clone()),
            (None, Some(base)) => QuantumAssignment::Geometric {
                base,
                multiplier: self.multiplier,
            },
            (None, None) => QuantumAssignment::Doubling,
        };
        let boost = (!self.no_boost).then_some(self.boost);
        Config::new(self.queues, quanta, boost, self.tie_break).context("invalid configuration")
    }

    fn processes(&self) -> Vec<ProcessSpec> {
        let mut processes = self.processes.clone();
        match self.workload {
            Some(workload) => processes.extend(workload.specs()),
            None if processes.is_empty() => processes.extend(Workload::Standard.specs()),
            None => {}
        }
        processes
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    let processes = cli.processes();
    info!(%config, processes = processes.len(), "starting simulation");

    if cli.compare {
        let results = compare(&config, &processes, cli.max_ticks)?;
        println!(
            "{:<24}{:>10}{:>10}{:>10}{:>10}{:>8}",
            "Algorithm", "Avg Wait", "Avg TAT", "Avg Resp", "CPU %", "Time"
        );
        for result in results {
            println!(
                "{:<24}{:>10.2}{:>10.2}{:>10.2}{:>10.2}{:>8}",
                result.tie_break.to_string(),
                result.metrics.avg_wait,
                result.metrics.avg_turnaround,
                result.metrics.avg_response,
                result.metrics.cpu_utilization,
                result.total_time
            );
        }
        return Ok(());
    }

    let mut scheduler = Mlfq::new(config);
    scheduler.load_set(&processes)?;
    let logs = Processor::run(&mut scheduler, cli.max_ticks);

    if cli.verbose {
        println!("{}", format_logs(&logs));
    }

    let snapshot = scheduler.snapshot();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", snapshot);
        println!("{}", gantt(scheduler.timeline()));
        println!("{}", scheduler.metrics());
    }

    if let Some(path) = &cli.csv {
        let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
        write_csv(&scheduler, BufWriter::new(file))?;
        info!(path = %path.display(), "results saved");
    }

    Ok(())
}

// Do not delete this line
#[cfg(test)]
mod tests;
