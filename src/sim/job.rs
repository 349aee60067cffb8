use serde::{Deserialize, Serialize};

use crate::core::{ProcessId, Ticks};

/// A process as supplied by the caller, before validation.
///
/// Fields are signed so malformed input can be reported instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub id: i64,
    pub arrival_time: i64,
    pub burst_time: i64,
}

impl ProcessSpec {
    pub const fn new(id: i64, arrival_time: i64, burst_time: i64) -> Self {
        Self {
            id,
            arrival_time,
            burst_time,
        }
    }
}

/// Per-process timing collected while the simulation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessStats {
    pub id: ProcessId,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub first_run: Option<Ticks>,
    pub completion_time: Option<Ticks>,
}

impl ProcessStats {
    pub fn turnaround(&self) -> Option<Ticks> {
        self.completion_time.map(|t| t - self.arrival_time)
    }

    pub fn response(&self) -> Option<Ticks> {
        self.first_run.map(|t| t - self.arrival_time)
    }

    pub fn waiting(&self) -> Option<Ticks> {
        self.turnaround().map(|t| t - self.burst_time)
    }
}
