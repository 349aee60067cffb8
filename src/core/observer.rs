use rustc_hash::FxHashSet;

use super::state::{QueueSet, Ticks};
use crate::scheduler::Mlfq;

/// Checks scheduler invariants after every slice in debug builds.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(
        &mut self,
        queues: &QueueSet,
        policy: &Mlfq,
        delivered: Ticks,
        admitted_work: Ticks,
    ) {
        self.step += 1;

        debug_assert_eq!(
            queues.queued_work() + delivered,
            admitted_work,
            "Work not conserved at step {}",
            self.step
        );

        let mut seen = FxHashSet::default();
        for level in 0..queues.num_levels() {
            for process in queues.iter_level(level) {
                let id = process.id();
                debug_assert!(seen.insert(id), "P{id} queued more than once");
                debug_assert_eq!(
                    process.current_level(),
                    level,
                    "P{id} sits in Q{level} but is tagged Q{}",
                    process.current_level()
                );
                debug_assert!(
                    !process.is_complete(),
                    "Completed P{id} still present in Q{level}"
                );
                if let Some(allotment) = policy.allotment(level) {
                    debug_assert!(
                        process.time_in_level() < allotment,
                        "P{id} waits in Q{level} with its allotment exhausted"
                    );
                }
            }
        }
    }
}
