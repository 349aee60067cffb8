use std::cmp;

use super::{LevelConfig, MlfqConfig, Outcome, ResetTrigger};
use crate::{
    core::{Level, Process, ProcessId, QueueSet, TOP_LEVEL, Ticks},
    error::Result,
};

/// Quantum, allotment, demotion and reset rules over a validated config.
#[derive(Debug, Clone)]
pub struct Mlfq {
    config: MlfqConfig,
}

impl Mlfq {
    pub fn new(config: MlfqConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MlfqConfig {
        &self.config
    }

    pub fn num_levels(&self) -> usize {
        self.config.levels.len()
    }

    pub fn bottom_level(&self) -> Level {
        self.config.bottom_level()
    }

    fn level(&self, level: Level) -> &LevelConfig {
        &self.config.levels[level]
    }

    pub fn quantum(&self, level: Level) -> Ticks {
        self.level(level).quantum
    }

    pub fn allotment(&self, level: Level) -> Option<Ticks> {
        self.level(level).allotment
    }

    // Allotment left at `level`; None when unbounded
    fn allotment_left(&self, process: &Process, level: Level) -> Option<Ticks> {
        self.allotment(level)
            .map(|allotment| allotment.saturating_sub(process.time_in_level))
    }

    pub fn execution_slice(&self, process: &Process, level: Level) -> Ticks {
        let slice = cmp::min(process.remaining_time, self.quantum(level));
        match self.allotment_left(process, level) {
            Some(left) => {
                debug_assert!(left > 0, "P{} left at exhausted level {level}", process.id());
                cmp::min(slice, left)
            }
            None => slice,
        }
    }

    pub fn apply_execution(
        &self,
        process: &mut Process,
        level: Level,
        slice: Ticks,
        now: Ticks,
    ) -> Outcome {
        debug_assert!(
            slice <= process.remaining_time,
            "Slice {slice} overruns P{}",
            process.id()
        );
        process.remaining_time -= slice;
        process.time_in_level += slice;
        process.last_run_time = cmp::max(process.last_run_time, now);

        if process.remaining_time == 0 {
            return Outcome::Completed;
        }

        let exhausted = self
            .allotment(level)
            .is_some_and(|allotment| process.time_in_level >= allotment);
        if !exhausted {
            return Outcome::Requeued;
        }

        process.time_in_level = 0;
        if level >= self.bottom_level() {
            // Nowhere lower to go
            return Outcome::Requeued;
        }

        let to = level + 1;
        process.current_level = to;
        Outcome::Demoted { from: level, to }
    }

    /// Promotes every process below the top level back to the top, lowest
    /// level first. Returns the promoted ids in insertion order.
    pub fn priority_reset(&self, queues: &mut QueueSet) -> Vec<ProcessId> {
        let drained = queues.drain_below(TOP_LEVEL);
        let mut promoted = Vec::with_capacity(drained.len());
        for mut process in drained {
            process.current_level = TOP_LEVEL;
            process.time_in_level = 0;
            promoted.push(process.id());
            queues.enqueue(TOP_LEVEL, process);
        }
        promoted
    }

    /// Whether a reset is due at `now`, given the number of reset periods
    /// already handled (`epoch`).
    pub fn should_reset(&self, now: Ticks, epoch: u64) -> bool {
        let period = self.config.reset_period;
        let boundary = now / period;
        if boundary <= epoch {
            return false;
        }
        match self.config.reset_trigger {
            ResetTrigger::Exact => now % period == 0,
            ResetTrigger::Crossed => true,
        }
    }
}
