use core::module_path;
use function_name::named;
use mlfq::{Pid, Scheduler, TieBreak};
use mlfq_processor::Processor;
use pretty_assertions::assert_eq;

use super::{pids, run, scheduler};

fn completions<S: Scheduler>(scheduler: &S) -> Vec<Option<usize>> {
    scheduler
        .list()
        .iter()
        .map(|process| process.completion())
        .collect()
}

#[test]
#[named]
pub fn shortest_job_first() {
    let set = [(0, 6), (0, 3), (0, 2)];
    let mut scheduler = scheduler(&[1, 2], None, TieBreak::ShortestJobFirst, &set);
    let logs = Processor::run(&mut scheduler, 100);

    assert_eq!(logs[2].snapshot.queues[1].pids, pids(&[3, 2, 1]));
    assert_eq!(completions(&scheduler), vec![Some(11), Some(6), Some(4)]);

    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &logs,
    );
}

#[test]
#[named]
pub fn round_robin_appends() {
    let set = [(0, 6), (0, 3), (0, 2)];
    let mut scheduler = scheduler(&[1, 2], None, TieBreak::RoundRobin, &set);
    let logs = Processor::run(&mut scheduler, 100);

    assert_eq!(logs[2].snapshot.queues[1].pids, pids(&[1, 2, 3]));

    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &logs,
    );
}

#[test]
#[named]
pub fn longest_wait_first() {
    let set = [(0, 3), (0, 3), (1, 3)];
    let mut scheduler = scheduler(&[1], None, TieBreak::LongestWaitFirst, &set);
    let logs = Processor::run(&mut scheduler, 100);

    assert_eq!(logs[1].snapshot.queues[0].pids, pids(&[2, 1, 3]));

    let mut scheduler = super::scheduler(&[1], None, TieBreak::RoundRobin, &set);
    let round_robin = Processor::run(&mut scheduler, 100);
    assert_eq!(round_robin[1].snapshot.queues[0].pids, pids(&[1, 3, 2]));

    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &logs,
    );
}

#[test]
#[named]
pub fn first_come_first_served() {
    // Inserted out of arrival order on purpose.
    let set = [(2, 3), (0, 3), (1, 3)];
    let mut scheduler = scheduler(&[1], None, TieBreak::FirstComeFirstServed, &set);
    let logs = Processor::run(&mut scheduler, 100);

    assert_eq!(completions(&scheduler), vec![Some(9), Some(3), Some(6)]);
    assert_eq!(
        scheduler.process(Pid::new(2)).unwrap().response(),
        Some(0)
    );

    let mut scheduler = super::scheduler(&[1], None, TieBreak::RoundRobin, &set);
    Processor::run(&mut scheduler, 100);
    assert_eq!(completions(&scheduler), vec![Some(9), Some(4), Some(8)]);

    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &logs,
    );
}

#[test]
#[named]
pub fn tie_break_skips_upper_queues() {
    // Demotions into a queue above the lowest one always append.
    let set = [(0, 6), (0, 3), (0, 2)];
    let mut scheduler = scheduler(&[1, 2, 4], None, TieBreak::ShortestJobFirst, &set);
    let logs = Processor::run(&mut scheduler, 100);

    assert_eq!(logs[2].snapshot.queues[1].pids, pids(&[1, 2, 3]));

    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &logs,
    );
}
