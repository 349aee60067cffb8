use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use mlfq_model::{ResetTrigger, Scenario, SchedEvent, sim::bernoulli_processes};

#[derive(Debug, Parser)]
#[command(about = "Simulate a multi-level feedback queue CPU scheduler")]
struct Args {
    /// TOML scenario with a [config] table and [[process]] entries
    #[arg(long, conflicts_with = "random")]
    scenario: Option<PathBuf>,

    /// Generate a Bernoulli workload spanning this many ticks
    #[arg(long)]
    random: Option<u64>,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = 0.3)]
    p_arrival: f64,

    #[arg(long, default_value_t = 0.3)]
    p_short: f64,

    #[arg(long, default_value_t = 2)]
    short_ticks: u64,

    #[arg(long, default_value_t = 24)]
    long_ticks: u64,

    #[arg(long)]
    reset_period: Option<u64>,

    /// Reset at the first instant past each period boundary
    #[arg(long)]
    crossed_reset: bool,

    /// Only print the summary
    #[arg(long, short)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut scenario = match (&args.scenario, args.random) {
        (Some(path), _) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading scenario {}", path.display()))?;
            Scenario::from_toml_str(&text)
                .with_context(|| format!("parsing scenario {}", path.display()))?
        }
        (None, Some(ticks)) => Scenario {
            processes: bernoulli_processes(
                ticks,
                args.p_arrival,
                args.p_short,
                args.short_ticks,
                args.long_ticks,
                args.seed,
            ),
            ..Scenario::reference()
        },
        (None, None) => Scenario::reference(),
    };

    if let Some(period) = args.reset_period {
        scenario.config.reset_period = period;
    }
    if args.crossed_reset {
        scenario.config.reset_trigger = ResetTrigger::Crossed;
    }

    let mut sim = scenario.into_sim().context("setting up simulation")?;

    while !sim.is_finished() {
        for event in sim.step() {
            if args.quiet {
                continue;
            }
            match event {
                SchedEvent::QueueSnapshot { .. } => println!("\n{event}"),
                _ => println!("{event}"),
            }
        }
    }

    let summary = sim.summary();
    println!();
    println!("Processes: {}", summary.processes);
    println!("Makespan: {} ticks", summary.makespan);
    println!("Average turnaround time: {:.2} ticks", summary.avg_turnaround);
    println!("Average response time: {:.2} ticks", summary.avg_response);
    println!("Average waiting time: {:.2} ticks", summary.avg_waiting);

    Ok(())
}
