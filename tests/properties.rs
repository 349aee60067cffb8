use mlfq_model::{LevelConfig, MlfqConfig, ProcessSpec, ResetTrigger, SchedEvent, Sim};
use proptest::prelude::*;

fn level() -> impl Strategy<Value = LevelConfig> {
    (1u64..12, prop::option::of(1u64..30))
        .prop_map(|(quantum, allotment)| LevelConfig::new(quantum, allotment))
}

fn config() -> impl Strategy<Value = MlfqConfig> {
    (
        prop::collection::vec(level(), 1..5),
        1u64..60,
        prop_oneof![Just(ResetTrigger::Exact), Just(ResetTrigger::Crossed)],
    )
        .prop_map(|(levels, reset_period, reset_trigger)| MlfqConfig {
            levels,
            reset_period,
            reset_trigger,
        })
}

fn specs() -> impl Strategy<Value = Vec<ProcessSpec>> {
    prop::collection::vec((0i64..80, 1i64..40), 0..12).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(index, (arrival, burst))| ProcessSpec::new(index as i64 + 1, arrival, burst))
            .collect()
    })
}

proptest! {
    #[test]
    fn every_process_completes_exactly_once(specs in specs(), config in config()) {
        let total: i64 = specs.iter().map(|s| s.burst_time).sum();
        let mut sim = Sim::new(specs.clone(), config).unwrap();
        let events = sim.run();

        prop_assert!(sim.is_finished());
        prop_assert!(sim.core.queues.is_empty());
        prop_assert_eq!(sim.delivered() as i64, total);

        let mut completed: Vec<_> = events
            .iter()
            .filter_map(|e| match *e {
                SchedEvent::ProcessCompleted { id, .. } => Some(id as i64),
                _ => None,
            })
            .collect();
        completed.sort_unstable();
        let mut ids: Vec<_> = specs.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        prop_assert_eq!(completed, ids);
    }

    #[test]
    fn selection_respects_priority_and_bounds(specs in specs(), config in config()) {
        let mut sim = Sim::new(specs, config.clone()).unwrap();

        while !sim.is_finished() {
            let events = sim.step();
            let mut snapshot = None;
            for event in &events {
                match event {
                    SchedEvent::QueueSnapshot { levels, .. } => {
                        let mut seen: Vec<_> = levels.iter().flatten().map(|(id, _)| *id).collect();
                        let queued = seen.len();
                        seen.sort_unstable();
                        seen.dedup();
                        prop_assert_eq!(seen.len(), queued, "process queued twice");
                        snapshot = Some(levels.clone());
                    }
                    SchedEvent::ProcessRunning { id, level, duration, .. } => {
                        let levels = snapshot.as_ref().expect("snapshot precedes selection");
                        let highest = levels.iter().position(|q| !q.is_empty());
                        prop_assert_eq!(Some(*level), highest);
                        prop_assert_eq!(levels[*level].first().map(|(head, _)| *head), Some(*id));

                        let cfg = config.levels[*level];
                        prop_assert!(*duration >= 1);
                        prop_assert!(*duration <= cfg.quantum);
                        if let Some(allotment) = cfg.allotment {
                            prop_assert!(*duration <= allotment);
                        }
                    }
                    SchedEvent::ProcessDemoted { from, to, .. } => {
                        prop_assert_eq!(*to, from + 1);
                        prop_assert!(*to < config.levels.len());
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn resets_land_on_period_boundaries(specs in specs(), config in config()) {
        let period = config.reset_period;
        let trigger = config.reset_trigger;
        let mut sim = Sim::new(specs, config).unwrap();
        let events = sim.run();

        let times: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                SchedEvent::PriorityReset { time, .. } => Some(*time),
                _ => None,
            })
            .collect();
        for pair in times.windows(2) {
            prop_assert!(pair[0] / period < pair[1] / period, "two resets in one period");
        }
        if trigger == ResetTrigger::Exact {
            prop_assert!(times.iter().all(|t| *t > 0 && t % period == 0));
        }
    }
}
