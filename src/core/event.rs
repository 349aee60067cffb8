use std::fmt;

use crate::core::{Level, ProcessId, Ticks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedEvent {
    ProcessArrived {
        id: ProcessId,
        time: Ticks,
    },
    // Per-level (id, remaining) contents, highest priority first
    QueueSnapshot {
        time: Ticks,
        levels: Vec<Vec<(ProcessId, Ticks)>>,
    },
    ProcessRunning {
        id: ProcessId,
        level: Level,
        time: Ticks,
        duration: Ticks,
    },
    ProcessCompleted {
        id: ProcessId,
        time: Ticks,
    },
    ProcessDemoted {
        id: ProcessId,
        from: Level,
        to: Level,
        time: Ticks,
    },
    PriorityReset {
        time: Ticks,
        promoted: Vec<ProcessId>,
    },
}

impl fmt::Display for SchedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProcessArrived { id, time } => write!(f, "P{id} arrives at time {time}"),
            Self::QueueSnapshot { time, levels } => {
                write!(f, "queues at time {time}:")?;
                for (level, queue) in levels.iter().enumerate() {
                    write!(f, "\n  Q{level}:")?;
                    for (id, remaining) in queue {
                        write!(f, " [P{id} rem={remaining}]")?;
                    }
                }
                Ok(())
            }
            Self::ProcessRunning {
                id,
                level,
                time,
                duration,
            } => write!(f, "t={time} running P{id} from Q{level} for {duration}"),
            Self::ProcessCompleted { id, time } => write!(f, "P{id} completed at time {time}"),
            Self::ProcessDemoted { id, from, to, time } => {
                write!(f, "P{id} demoted Q{from} -> Q{to} at time {time}")
            }
            Self::PriorityReset { time, promoted } => {
                write!(f, "priority reset at time {time}, promoted {promoted:?}")
            }
        }
    }
}
