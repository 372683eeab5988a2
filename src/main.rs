//! # eqsim — EnSuRe schedule-and-simulate CLI
//!
//! `eqsim <k> <frame_ms> <file>`: loads a task set from `file`, builds a
//! feasibility-checked primary schedule for `k` faults tolerated per
//! window and a `frame_ms`-long frame, replays it against randomly
//! injected faults, and prints per-core active duration, energy
//! consumption, and total energy.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};

use ensure_sched::config::SchedulerConfig;
use ensure_sched::core_model::Core;
use ensure_sched::loader;
use ensure_sched::schedule::ScheduleBuilder;
use ensure_sched::simulator::Simulator;

/// Fault-tolerant, energy-aware offline scheduler and time-stepped
/// simulator for heterogeneous LP/HP core systems.
#[derive(Parser, Debug)]
#[command(name = "eqsim", version, about)]
struct Cli {
    /// Number of faults the system must tolerate per window.
    k: u32,

    /// Total frame length, in milliseconds.
    frame_ms: f64,

    /// Path to the task-set CSV file (`id, deadline_ms, weight` per row).
    file: PathBuf,

    /// Fidelity of each time step for the scheduler/simulator, in ms.
    #[arg(long, default_value_t = 0.01)]
    time_step: f64,

    /// Number of low-power primary cores.
    #[arg(long, default_value_t = 1)]
    m_pri: usize,

    /// LP:HP speed ratio (`t_HP / t_LP`), strictly in `(0, 1)`.
    #[arg(long, default_value_t = 0.8)]
    lp_hp_ratio: f64,

    /// Emit `tracing` debug events while scheduling/simulating.
    #[arg(long)]
    log_debug: bool,

    /// Seed for the deterministic fault-injection RNG.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.log_debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .without_time()
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("Error: {msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = SchedulerConfig::new(
        cli.k,
        cli.frame_ms,
        cli.time_step,
        cli.m_pri,
        cli.lp_hp_ratio,
        cli.log_debug,
    )
    .map_err(|e| e.to_string())?;

    info!(k = cli.k, frame_ms = cli.frame_ms, "scheduler parameters");

    let mut tasks = loader::load_tasks(&cli.file).map_err(|e| e.to_string())?;

    let mut schedule = ScheduleBuilder::build(&mut tasks, &config).map_err(|e| e.to_string())?;
    info!("schedule generated");

    let mut lp_cores: Vec<Core> = (0..config.m_pri())
        .map(|i| Core::lp(format!("LP_Core{i}"), 0.3, 0.03, 0.02))
        .collect();
    let mut hp_core = Core::hp("HP_Core", config.lp_hp_ratio(), 1.0, 0.1, 0.05);

    info!("start running simulation");
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let report = Simulator::run(
        &mut schedule,
        &mut tasks,
        &mut lp_cores,
        &mut hp_core,
        &config,
        &mut rng,
    );

    if !report.unresolved_tasks.is_empty() {
        eprintln!(
            "warning: {} task(s) did not complete their primary or backup copy: {:?}",
            report.unresolved_tasks.len(),
            report.unresolved_tasks
        );
    }

    println!("===RESULTS===");
    println!("Active Durations:");
    for (core, active_ms) in lp_cores.iter().zip(&report.lp_active_ms) {
        println!("  {}: {active_ms}", core.name);
    }
    println!("  {}: {}", hp_core.name, report.hp_active_ms);

    println!("Energy Consumption:");
    for (core, energy) in lp_cores.iter().zip(&report.lp_energy) {
        println!("  {}: {energy}", core.name);
    }
    println!("  {}: {}", hp_core.name, report.hp_energy);
    println!("Total energy: {}", report.total_energy);

    Ok(())
}
