//! Runs an ACC simulation and reports its safety record.
//!
//! Usage: `acc-sim [params.toml] [history.json]`

use acc_sim::logger::{level_from_env, logger_init, LevelFilter};
use acc_sim::{params, Simulation, SimulationParams};
use color_eyre::{eyre::WrapErr, Result};
use log::info;

fn main() -> Result<()> {
    color_eyre::install()?;

    let level = level_from_env(LevelFilter::Info)?;
    logger_init(level).wrap_err("Failed to initialise logging")?;

    let mut args = std::env::args().skip(1);
    let params = match args.next() {
        Some(path) => params::load(&path)
            .wrap_err_with(|| format!("Failed to load parameters from {}", path))?,
        None => SimulationParams::default(),
    };
    let history_path = args.next();

    let history = Simulation::new(params)
        .wrap_err("Invalid simulation parameters")?
        .run();

    let summary = history.summary();
    info!("Steps: {}", summary.steps);
    info!("Safety violations: {}", summary.violations);
    info!(
        "Distance: min {:.2} m, max {:.2} m",
        summary.min_distance, summary.max_distance
    );
    info!("Mode transitions: {}", summary.mode_transitions);
    for (mode, time) in &summary.time_in_mode {
        info!("  {:<15} {:>7.2} s", mode.as_str(), time);
    }

    if let Some(path) = history_path {
        std::fs::write(&path, history.to_json()?)
            .wrap_err_with(|| format!("Failed to write history to {}", path))?;
        info!("History written to {}", path);
    }

    Ok(())
}
