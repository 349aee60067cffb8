use rand::prelude::*;

use super::job::ProcessSpec;

/// Bernoulli arrivals over `ticks`: each tick spawns a process with
/// probability `p_arrival`, which is short with probability `p_short`.
pub fn bernoulli_processes(
    ticks: u64,
    p_arrival: f64,
    p_short: f64,
    short_ticks: u64,
    long_ticks: u64,
    seed: u64,
) -> Vec<ProcessSpec> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut processes = Vec::new();

    for t in 0..ticks {
        if rng.random::<f64>() < p_arrival {
            let burst = if rng.random::<f64>() < p_short {
                short_ticks
            } else {
                long_ticks
            };

            processes.push(ProcessSpec {
                id: processes.len() as i64 + 1,
                arrival_time: t as i64,
                burst_time: burst as i64,
            });
        }
    }

    processes
}
