use std::collections::VecDeque;

pub type ProcessId = u64;
pub type Ticks = u64;
// Index into the configured levels; 0 is the highest priority
pub type Level = usize;

pub const TOP_LEVEL: Level = 0;

#[derive(Debug, PartialEq, Eq)]
pub struct Process {
    id: ProcessId,
    arrival_time: Ticks,
    pub(crate) remaining_time: Ticks,
    pub(crate) current_level: Level,
    pub(crate) time_in_level: Ticks,
    pub(crate) last_run_time: Ticks,
}

impl Process {
    pub fn new(id: ProcessId, arrival_time: Ticks, burst_time: Ticks) -> Self {
        Self {
            id,
            arrival_time,
            remaining_time: burst_time,
            current_level: TOP_LEVEL,
            time_in_level: 0,
            last_run_time: 0,
        }
    }

    pub fn id(&self) -> ProcessId {
        self.id
    }

    pub fn arrival_time(&self) -> Ticks {
        self.arrival_time
    }

    pub fn remaining_time(&self) -> Ticks {
        self.remaining_time
    }

    pub fn current_level(&self) -> Level {
        self.current_level
    }

    pub fn time_in_level(&self) -> Ticks {
        self.time_in_level
    }

    pub fn last_run_time(&self) -> Ticks {
        self.last_run_time
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_time == 0
    }
}

/// One FIFO per priority level, highest priority first.
///
/// Queued processes are owned by value. A process taken out by
/// [`QueueSet::dequeue_highest_ready`] belongs to the caller until it is
/// enqueued again or dropped.
#[derive(Debug)]
pub struct QueueSet {
    queues: Vec<VecDeque<Process>>,
}

impl QueueSet {
    pub fn new(num_levels: usize) -> Self {
        assert!(num_levels > 0, "Queue set requires at least one level");
        Self {
            queues: (0..num_levels).map(|_| VecDeque::new()).collect(),
        }
    }

    pub fn num_levels(&self) -> usize {
        self.queues.len()
    }

    pub fn bottom_level(&self) -> Level {
        self.queues.len() - 1
    }

    pub fn enqueue(&mut self, level: Level, process: Process) {
        debug_assert_eq!(
            process.current_level, level,
            "P{} enqueued at level {level} but tagged with level {}",
            process.id, process.current_level
        );
        debug_assert!(
            !process.is_complete(),
            "Completed P{} must not be requeued",
            process.id
        );
        self.queues[level].push_back(process);
    }

    pub fn dequeue_highest_ready(&mut self) -> Option<Process> {
        self.queues.iter_mut().find_map(|queue| queue.pop_front())
    }

    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(VecDeque::is_empty)
    }

    pub fn len(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    pub fn level_len(&self, level: Level) -> usize {
        self.queues[level].len()
    }

    /// Removes every process queued strictly below `level`, lowest level
    /// first. Order within each level is preserved.
    pub fn drain_below(&mut self, level: Level) -> Vec<Process> {
        let mut drained = Vec::new();
        for queue in self.queues.iter_mut().skip(level + 1).rev() {
            drained.extend(queue.drain(..));
        }
        drained
    }

    pub fn iter_level(&self, level: Level) -> impl Iterator<Item = &Process> {
        self.queues[level].iter()
    }

    pub fn contains(&self, id: ProcessId) -> bool {
        self.queues.iter().flatten().any(|p| p.id == id)
    }

    pub fn queued_work(&self) -> Ticks {
        self.queues.iter().flatten().map(|p| p.remaining_time).sum()
    }

    // (id, remaining) per level, highest priority first
    pub fn snapshot(&self) -> Vec<Vec<(ProcessId, Ticks)>> {
        self.queues
            .iter()
            .map(|queue| queue.iter().map(|p| (p.id, p.remaining_time)).collect())
            .collect()
    }
}
