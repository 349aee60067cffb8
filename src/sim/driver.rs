use std::collections::VecDeque;

use average::{Estimate, Mean};
use log::{debug, info};
use rustc_hash::{FxHashMap, FxHashSet};

use super::job::{ProcessSpec, ProcessStats};
use crate::{
    core::{Process, ProcessId, SchedCore, SchedEvent, Ticks},
    error::{Result, SimError},
    scheduler::{Mlfq, MlfqConfig},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    // Nothing runnable yet, or waiting for the next arrival
    Idle,
    Running,
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub processes: usize,
    pub makespan: Ticks,
    pub avg_turnaround: f64,
    pub avg_response: f64,
    pub avg_waiting: f64,
}

pub struct Sim {
    pub core: SchedCore,
    // Not yet admitted, ordered by (arrival, id)
    pending: VecDeque<Process>,
    pending_work: Ticks,
    total_work: Ticks,
    stats: Vec<ProcessStats>,
    // ProcessId --> stats[index]
    stats_index: FxHashMap<ProcessId, usize>,
    phase: Phase,
}

impl Sim {
    pub fn new(specs: Vec<ProcessSpec>, config: MlfqConfig) -> Result<Self> {
        let policy = Mlfq::new(config)?;
        let mut processes = validate_specs(&specs)?;
        processes.sort_by(|a, b| {
            a.arrival_time()
                .cmp(&b.arrival_time())
                .then_with(|| a.id().cmp(&b.id()))
        });

        let stats: Vec<_> = processes
            .iter()
            .map(|p| ProcessStats {
                id: p.id(),
                arrival_time: p.arrival_time(),
                burst_time: p.remaining_time(),
                first_run: None,
                completion_time: None,
            })
            .collect();
        let stats_index = stats
            .iter()
            .enumerate()
            .map(|(index, s)| (s.id, index))
            .collect();
        let total_work = processes.iter().map(Process::remaining_time).sum();

        let mut sim = Self {
            core: SchedCore::new(policy),
            pending: processes.into(),
            pending_work: total_work,
            total_work,
            stats,
            stats_index,
            phase: Phase::Idle,
        };
        sim.update_phase();
        Ok(sim)
    }

    /// One driver iteration: admit arrivals, then run at most one process for
    /// one slice (or idle for one tick). Returns the events it produced.
    pub fn step(&mut self) -> Vec<SchedEvent> {
        if self.phase == Phase::Terminal {
            return Vec::new();
        }

        let mut events = self.handle_arrivals();
        events.push(self.core.snapshot());

        match self.core.run_next() {
            Some(ran) => {
                self.record(&ran);
                events.extend(ran);
                self.phase = Phase::Running;
            }
            None => {
                debug_assert!(
                    !self.pending.is_empty(),
                    "Driver selected nothing with no arrivals outstanding"
                );
                self.core.idle_tick();
                self.phase = Phase::Idle;
            }
        }

        debug_assert_eq!(
            self.pending_work + self.core.queues.queued_work() + self.core.delivered(),
            self.total_work,
            "Work not conserved at t={}",
            self.core.now()
        );
        self.update_phase();
        events
    }

    /// Steps until every process has completed.
    pub fn run(&mut self) -> Vec<SchedEvent> {
        let mut events = Vec::new();
        while !self.is_finished() {
            events.extend(self.step());
        }
        info!(
            "simulation finished at t={} after {} slices",
            self.core.now(),
            self.core.observer().steps()
        );
        events
    }

    fn handle_arrivals(&mut self) -> Vec<SchedEvent> {
        let now = self.core.now();
        let mut events = Vec::new();
        // Contiguous, since pending is sorted by arrival
        while self.pending.front().is_some_and(|p| p.arrival_time() <= now) {
            if let Some(process) = self.pending.pop_front() {
                self.pending_work -= process.remaining_time();
                events.push(self.core.admit(process));
            }
        }
        events
    }

    fn record(&mut self, events: &[SchedEvent]) {
        for event in events {
            let (id, first_run, completion) = match *event {
                SchedEvent::ProcessRunning { id, time, .. } => (id, Some(time), None),
                SchedEvent::ProcessCompleted { id, time } => (id, None, Some(time)),
                _ => continue,
            };
            let index = *self
                .stats_index
                .get(&id)
                .expect("Scheduled process missing from stats table");
            let stats = &mut self.stats[index];
            stats.first_run = stats.first_run.or(first_run);
            stats.completion_time = stats.completion_time.or(completion);
        }
    }

    fn update_phase(&mut self) {
        if self.pending.is_empty() && self.core.queues.is_empty() {
            self.phase = Phase::Terminal;
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Terminal
    }

    pub fn now(&self) -> Ticks {
        self.core.now()
    }

    pub fn delivered(&self) -> Ticks {
        self.core.delivered()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn stats(&self) -> &[ProcessStats] {
        &self.stats
    }

    pub fn process_stats(&self, id: ProcessId) -> Option<&ProcessStats> {
        self.stats_index.get(&id).map(|&index| &self.stats[index])
    }

    pub fn stats_map<F>(&self, f: F) -> impl Iterator<Item = f64> + '_
    where
        F: Fn(&ProcessStats) -> Option<Ticks> + 'static,
    {
        self.stats.iter().filter_map(move |s| f(s)).map(|t| t as f64)
    }

    pub fn summary(&self) -> Summary {
        Summary {
            processes: self.stats.len(),
            makespan: self.core.now(),
            avg_turnaround: avg(self.stats_map(ProcessStats::turnaround)),
            avg_response: avg(self.stats_map(ProcessStats::response)),
            avg_waiting: avg(self.stats_map(ProcessStats::waiting)),
        }
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}

fn validate_specs(specs: &[ProcessSpec]) -> Result<Vec<Process>> {
    let mut seen = FxHashSet::default();
    let mut processes = Vec::with_capacity(specs.len());
    // Bounds every work counter the core keeps
    let mut total_work: Ticks = 0;

    for spec in specs {
        let reject = |reason: &'static str| SimError::InvalidProcessSpec {
            id: spec.id,
            reason,
        };
        let id = ProcessId::try_from(spec.id).map_err(|_| reject("negative id"))?;
        let arrival =
            Ticks::try_from(spec.arrival_time).map_err(|_| reject("negative arrival time"))?;
        let burst = Ticks::try_from(spec.burst_time).map_err(|_| reject("negative burst time"))?;
        if burst == 0 {
            return Err(reject("zero burst time"));
        }
        if !seen.insert(id) {
            return Err(reject("duplicate id"));
        }
        total_work = total_work
            .checked_add(burst)
            .ok_or_else(|| reject("total burst time overflows"))?;

        debug!("P{id} arrives at {arrival} with burst {burst}");
        processes.push(Process::new(id, arrival, burst));
    }

    Ok(processes)
}
