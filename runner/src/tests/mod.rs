use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;

use mlfq::snapshot::ProcessSnapshot;
use mlfq::ProcessState::{New, Ready, Running, Terminated};
use mlfq::{Config, Mlfq, Pid, QuantumAssignment, SchedulingDecision, TieBreak};
use mlfq_processor::{format_logs, Log};

mod lifecycle;
mod tie_break;

/// Builds a scheduler with explicit quanta and the given `(arrival, burst)`
/// processes, PIDs are assigned from 1 in order.
fn scheduler(
    quanta: &[usize],
    boost: Option<usize>,
    tie_break: TieBreak,
    processes: &[(usize, usize)],
) -> Mlfq {
    let config = Config::new(
        quanta.len(),
        QuantumAssignment::Explicit(quanta.to_vec()),
        boost,
        tie_break,
    )
    .unwrap();
    let mut scheduler = Mlfq::new(config);
    for (arrival, burst) in processes {
        scheduler.add_process(*arrival, *burst, None).unwrap();
    }
    scheduler
}

fn pids(raw: &[usize]) -> Vec<Pid> {
    raw.iter().map(|pid| Pid::new(*pid)).collect()
}

fn write_logs(folder: &str, name: &str, logs: &str) {
    fs::create_dir_all(format!("../outputs/{folder}")).unwrap();
    fs::write(format!("../outputs/{folder}/{name}.log"), logs).unwrap();
}

/// Checks the scheduling invariants over a run, tick by tick.
///
/// With `WRITE_OUTPUT` set the formatted logs are also saved under
/// `outputs/` for inspection.
fn run(folder: &str, name: &str, logs: &[Log]) {
    if env::var("WRITE_OUTPUT").is_ok() {
        write_logs(folder, name, &format_logs(logs));
    }

    let label = format!("{folder}/{name}");
    let mut previous: HashMap<Pid, ProcessSnapshot> = HashMap::new();

    for log in logs {
        let snapshot = &log.snapshot;
        let time = snapshot.time;

        let running = snapshot
            .processes
            .iter()
            .filter(|process| process.state == Running)
            .count();
        assert!(running <= 1, "{label}: {running} processes running at {time}");

        let mut queued = HashSet::new();
        for queue in &snapshot.queues {
            for pid in &queue.pids {
                assert!(queued.insert(*pid), "{label}: {pid} is in two queues at {time}");
                let process = snapshot.process(*pid).unwrap();
                assert_eq!(process.queue, queue.level, "{label}: queue index of {pid} at {time}");
                assert_eq!(process.state, Ready, "{label}: state of queued {pid} at {time}");
            }
        }

        for process in &snapshot.processes {
            let pid = process.pid;
            assert_eq!(
                process.state == Terminated,
                process.remaining == 0,
                "{label}: {pid} terminated iff remaining is 0 at {time}"
            );
            match process.state {
                New => {
                    assert!(process.arrival >= time, "{label}: {pid} not admitted at {time}");
                    assert!(!queued.contains(&pid));
                }
                Ready | Running => {
                    assert!(queued.contains(&pid), "{label}: ready {pid} is not queued at {time}")
                }
                Terminated => {
                    assert!(!queued.contains(&pid), "{label}: terminated {pid} still queued");
                    let completion = process.completion.unwrap();
                    let turnaround = process.turnaround.unwrap();
                    assert_eq!(
                        completion - process.arrival,
                        turnaround,
                        "{label}: turnaround of {pid}"
                    );
                    assert_eq!(turnaround - process.burst, process.wait, "{label}: wait of {pid}");
                }
            }

            if let Some(before) = previous.get(&pid) {
                assert!(process.remaining <= before.remaining, "{label}: remaining of {pid} grew");
                assert!(process.wait >= before.wait, "{label}: wait of {pid} shrank");
                if before.response.is_some() {
                    assert_eq!(
                        process.response, before.response,
                        "{label}: response of {pid} changed"
                    );
                }
                if before.completion.is_some() {
                    assert_eq!(
                        process.completion, before.completion,
                        "{label}: completion of {pid} changed"
                    );
                }
            }
        }

        if let SchedulingDecision::Run { pid, .. } = log.decision {
            let process = snapshot.process(pid).unwrap();
            let tick = time - 1;
            match previous.get(&pid) {
                Some(before) => {
                    assert_eq!(
                        process.remaining + 1,
                        before.remaining,
                        "{label}: {pid} ran at {tick}"
                    );
                    if before.response.is_none() {
                        assert_eq!(process.response, Some(tick - process.arrival));
                    }
                }
                None => assert_eq!(process.response, Some(tick - process.arrival)),
            }
            if snapshot.boost.last_boost == Some(tick) {
                for queue in snapshot.queues.iter().skip(1) {
                    assert!(
                        queue.pids.iter().all(|queued| *queued == pid),
                        "{label}: boost at {tick} left {:?} in queue {}",
                        queue.pids,
                        queue.level
                    );
                }
            }
        }

        previous = snapshot
            .processes
            .iter()
            .map(|process| (process.pid, process.clone()))
            .collect();
    }
}
