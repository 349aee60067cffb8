use log::{debug, trace};

use super::{
    event::SchedEvent,
    observer::Observer,
    state::{Process, QueueSet, TOP_LEVEL, Ticks},
};
use crate::scheduler::{Mlfq, Outcome};

/// Clock, queues and policy for a single simulated CPU.
///
/// Runs at most one process per [`SchedCore::run_next`] call and advances the
/// clock by the slice it ran.
pub struct SchedCore {
    pub queues: QueueSet,
    pub policy: Mlfq,
    now: Ticks,
    // Number of reset periods already handled
    reset_epoch: u64,
    // Total CPU time handed out so far
    delivered: Ticks,
    // Total burst of every process ever admitted
    admitted_work: Ticks,
    observer: Observer,
}

impl SchedCore {
    pub fn new(policy: Mlfq) -> Self {
        Self {
            queues: QueueSet::new(policy.num_levels()),
            policy,
            now: 0,
            reset_epoch: 0,
            delivered: 0,
            admitted_work: 0,
            observer: Observer::new(),
        }
    }

    pub fn admit(&mut self, process: Process) -> SchedEvent {
        debug_assert!(
            process.arrival_time() <= self.now,
            "P{} admitted before its arrival",
            process.id()
        );
        debug!("t={} admitting P{}", self.now, process.id());

        let event = SchedEvent::ProcessArrived {
            id: process.id(),
            time: self.now,
        };
        self.admitted_work += process.remaining_time();
        self.queues.enqueue(TOP_LEVEL, process);
        event
    }

    pub fn snapshot(&self) -> SchedEvent {
        SchedEvent::QueueSnapshot {
            time: self.now,
            levels: self.queues.snapshot(),
        }
    }

    /// Selects the highest-priority ready process and runs it for one slice.
    /// Returns `None` without touching the clock when nothing is ready.
    pub fn run_next(&mut self) -> Option<Vec<SchedEvent>> {
        let mut process = self.queues.dequeue_highest_ready()?;
        let level = process.current_level();
        debug_assert!(
            !self.queues.contains(process.id()),
            "Running P{} is still queued",
            process.id()
        );
        debug_assert!(
            (TOP_LEVEL..level).all(|higher| self.queues.level_len(higher) == 0),
            "P{} selected from level {level} while a higher level was ready",
            process.id()
        );

        let start = self.now;
        let slice = self.policy.execution_slice(&process, level);
        trace!("t={start} running P{} from Q{level} for {slice}", process.id());

        let mut events = vec![SchedEvent::ProcessRunning {
            id: process.id(),
            level,
            time: start,
            duration: slice,
        }];

        let outcome = self.policy.apply_execution(&mut process, level, slice, start);
        self.advance_time(slice);
        self.delivered += slice;

        match outcome {
            Outcome::Completed => {
                debug!("t={} P{} completed", self.now, process.id());
                events.push(SchedEvent::ProcessCompleted {
                    id: process.id(),
                    time: self.now,
                });
                // Dropping the record retires it
            }
            Outcome::Demoted { from, to } => {
                debug!("t={} P{} demoted Q{from} -> Q{to}", self.now, process.id());
                events.push(SchedEvent::ProcessDemoted {
                    id: process.id(),
                    from,
                    to,
                    time: self.now,
                });
                self.queues.enqueue(to, process);
            }
            Outcome::Requeued => self.queues.enqueue(level, process),
        }

        if self.policy.should_reset(self.now, self.reset_epoch) {
            self.reset_epoch = self.now / self.policy.config().reset_period;
            let promoted = self.policy.priority_reset(&mut self.queues);
            debug!("t={} priority reset promoted {promoted:?}", self.now);
            events.push(SchedEvent::PriorityReset {
                time: self.now,
                promoted,
            });
        }

        self.observer.observe(
            &self.queues,
            &self.policy,
            self.delivered,
            self.admitted_work,
        );
        Some(events)
    }

    // Nothing ready; let the clock tick towards the next arrival
    pub fn idle_tick(&mut self) {
        self.advance_time(1);
    }

    fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn delivered(&self) -> Ticks {
        self.delivered
    }

    pub fn admitted_work(&self) -> Ticks {
        self.admitted_work
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{LevelConfig, MlfqConfig, ResetTrigger};

    fn core_with(config: MlfqConfig) -> SchedCore {
        SchedCore::new(Mlfq::new(config).unwrap())
    }

    // Queue a process directly at its level, keeping the work ledger balanced
    fn seed(core: &mut SchedCore, process: Process) {
        core.admitted_work += process.remaining_time();
        let level = process.current_level();
        core.queues.enqueue(level, process);
    }

    #[test]
    fn nothing_ready_leaves_clock_alone() {
        let mut core = core_with(MlfqConfig::default());
        assert!(core.run_next().is_none());
        assert_eq!(core.now(), 0);
        core.idle_tick();
        assert_eq!(core.now(), 1);
    }

    #[test]
    fn runs_one_slice_per_call() {
        let mut core = core_with(MlfqConfig::default());
        core.admit(Process::new(1, 0, 6));

        let events = core.run_next().unwrap();
        assert_eq!(
            events,
            vec![SchedEvent::ProcessRunning {
                id: 1,
                level: 0,
                time: 0,
                duration: 4
            }]
        );
        assert_eq!(core.now(), 4);

        let events = core.run_next().unwrap();
        assert_eq!(events[1], SchedEvent::ProcessCompleted { id: 1, time: 6 });
        assert!(core.queues.is_empty());
        assert_eq!(core.delivered(), 6);
    }

    #[test]
    fn demotion_is_reported_and_requeued_lower() {
        let mut core = core_with(MlfqConfig {
            levels: vec![LevelConfig::new(2, None), LevelConfig::new(3, Some(3))],
            ..Default::default()
        });
        let mut p = Process::new(1, 0, 20);
        p.current_level = 1;
        seed(&mut core, p);

        let events = core.run_next().unwrap();
        // Bottom level: exhausted allotment stays put
        assert_eq!(events.len(), 1);
        assert_eq!(core.queues.level_len(1), 1);

        let mut core = core_with(MlfqConfig {
            levels: vec![
                LevelConfig::new(2, None),
                LevelConfig::new(3, Some(3)),
                LevelConfig::new(5, Some(5)),
            ],
            ..Default::default()
        });
        let mut p = Process::new(1, 0, 20);
        p.current_level = 1;
        seed(&mut core, p);

        let events = core.run_next().unwrap();
        assert_eq!(
            events[1],
            SchedEvent::ProcessDemoted {
                id: 1,
                from: 1,
                to: 2,
                time: 3
            }
        );
        assert_eq!(core.queues.level_len(2), 1);
    }

    #[test]
    fn reset_fires_once_per_boundary() {
        let mut core = core_with(MlfqConfig {
            levels: vec![LevelConfig::new(5, None), LevelConfig::new(5, Some(100))],
            reset_period: 10,
            reset_trigger: ResetTrigger::Exact,
        });
        let mut p = Process::new(1, 0, 100);
        p.current_level = 1;
        seed(&mut core, p);

        let events = core.run_next().unwrap();
        assert!(!events.iter().any(|e| matches!(e, SchedEvent::PriorityReset { .. })));

        let events = core.run_next().unwrap();
        assert_eq!(
            events.last(),
            Some(&SchedEvent::PriorityReset {
                time: 10,
                promoted: vec![1]
            })
        );
        assert_eq!(core.queues.level_len(0), 1);
    }
}
