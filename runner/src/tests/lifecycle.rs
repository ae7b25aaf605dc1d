use core::module_path;
use function_name::named;
use mlfq::ProcessState::New;
use mlfq::SchedulingDecision::{Done, Idle};
use mlfq::{Config, Mlfq, Preset, Scheduler, TieBreak, Workload};
use mlfq_processor::Processor;
use pretty_assertions::assert_eq;

use super::{run, scheduler};

fn standard() -> Mlfq {
    let mut scheduler = Mlfq::new(Config::preset(Preset::AggressiveBoost));
    scheduler.load_set(&Workload::Standard.specs()).unwrap();
    scheduler
}

#[test]
#[named]
pub fn step_after_completion_only_moves_the_clock() {
    let set = [(0, 2), (1, 3)];
    let mut scheduler = scheduler(&[1, 2], Some(3), TieBreak::RoundRobin, &set);
    let logs = Processor::run(&mut scheduler, 100);
    assert!(scheduler.is_complete());
    assert_eq!(scheduler.time(), 5);

    let finished = scheduler.snapshot();
    let timeline = scheduler.timeline().to_vec();
    for _ in 0..5 {
        assert_eq!(scheduler.step(), Done);
    }
    let after = scheduler.snapshot();
    assert_eq!(after.time, 10);
    assert_eq!(after.processes, finished.processes);
    assert_eq!(after.queues, finished.queues);
    assert_eq!(scheduler.timeline(), timeline.as_slice());
    assert_eq!(after.metrics.completed, finished.metrics.completed);
    assert_eq!(after.metrics.avg_wait, finished.metrics.avg_wait);
    assert_eq!(after.metrics.avg_turnaround, finished.metrics.avg_turnaround);
    // Spread over twice as many ticks.
    assert_eq!(after.metrics.cpu_utilization, 50.0);

    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &logs,
    );
}

#[test]
#[named]
pub fn empty_scheduler_idles() {
    let mut scheduler = Mlfq::default();
    let logs = Processor::run(&mut scheduler, 5);

    assert_eq!(logs.len(), 5);
    assert!(logs.iter().all(|log| log.decision == Idle));
    assert_eq!(scheduler.time(), 5);
    assert_eq!(scheduler.metrics().completed, 0);
    assert_eq!(scheduler.metrics().throughput, 0.0);

    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &logs,
    );
}

#[test]
#[named]
pub fn reset_matches_fresh_scheduler() {
    let fresh = standard();
    let mut scheduler = standard();
    let logs = Processor::run(&mut scheduler, 37);
    assert_eq!(scheduler.time(), 37);

    scheduler.reset();
    assert_eq!(scheduler.snapshot(), fresh.snapshot());
    assert!(scheduler.timeline().is_empty());
    assert!(scheduler.throughput_history().is_empty());
    assert!(scheduler.list().iter().all(|process| {
        process.state() == New
            && process.remaining() == process.burst()
            && process.response().is_none()
    }));

    scheduler.reset();
    assert_eq!(scheduler.snapshot(), fresh.snapshot());

    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &logs,
    );
}

#[test]
#[named]
pub fn rerun_after_reset_is_identical() {
    let mut scheduler = standard();
    let first = Processor::run(&mut scheduler, 10_000);
    let timeline = scheduler.timeline().to_vec();

    scheduler.reset();
    let second = Processor::run(&mut scheduler, 10_000);
    assert_eq!(first, second);
    assert_eq!(scheduler.timeline(), timeline.as_slice());

    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &second,
    );
}

#[test]
#[named]
pub fn independent_runs_are_identical() {
    let mut left = standard();
    let mut right = standard();

    for _ in 0..40 {
        assert_eq!(left.step(), right.step());
        assert_eq!(
            serde_json::to_string(&left.snapshot()).unwrap(),
            serde_json::to_string(&right.snapshot()).unwrap()
        );
    }

    let mut scheduler = standard();
    let logs = Processor::run(&mut scheduler, 10_000);
    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &logs,
    );
}

#[test]
#[named]
pub fn configure_keeps_processes() {
    let mut scheduler = standard();
    Processor::run(&mut scheduler, 12);

    let config = Config::preset(Preset::FineGrained).with_tie_break(TieBreak::LongestWaitFirst);
    scheduler.configure(config);
    assert_eq!(scheduler.time(), 0);
    assert_eq!(scheduler.queues().len(), 5);
    assert_eq!(scheduler.list().len(), Workload::Standard.specs().len());
    assert!(scheduler.list().iter().all(|process| process.state() == New));
    assert_eq!(scheduler.config().tie_break(), TieBreak::LongestWaitFirst);

    let logs = Processor::run(&mut scheduler, 10_000);
    assert!(scheduler.is_complete());

    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &logs,
    );
}

#[test]
#[named]
pub fn snapshot_serializes() {
    let mut scheduler = scheduler(&[1, 2], Some(4), TieBreak::RoundRobin, &[(0, 2)]);
    let logs = Processor::run(&mut scheduler, 1);

    let json: serde_json::Value = serde_json::to_value(&logs[0].snapshot).unwrap();
    assert_eq!(json["time"], 1);
    assert_eq!(json["running"], serde_json::Value::Null);
    assert_eq!(json["processes"][0]["pid"], 1);
    assert_eq!(json["processes"][0]["queue"], 1);
    assert_eq!(json["queues"][1]["pids"], serde_json::json!([1]));
    assert_eq!(json["boost"]["next_boost_in"], 3);

    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &logs,
    );
}

#[test]
#[named]
pub fn late_process_waits_since_arrival() {
    let mut scheduler = scheduler(&[1, 2], None, TieBreak::RoundRobin, &[(0, 2)]);
    Processor::run(&mut scheduler, 100);
    assert_eq!(scheduler.time(), 2);

    let late = scheduler.add_process(0, 3, None).unwrap();
    let logs = Processor::run(&mut scheduler, 100);
    let waits = logs
        .iter()
        .map(|log| log.snapshot.process(late).unwrap().wait)
        .collect::<Vec<_>>();
    assert_eq!(waits, vec![2, 2, 2]);

    let process = scheduler.process(late).unwrap();
    assert_eq!(process.response(), Some(2));
    assert_eq!(process.completion(), Some(5));

    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &logs,
    );
}
