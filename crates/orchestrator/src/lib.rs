//! Orchestration Layer
//!
//! This crate assembles runnable simulations from configuration, including:
//! - Configuration parsing and validation
//! - Initial particle layout (grid or seeded random)
//! - Runner with lifecycle management and renderer snapshots

#![warn(missing_docs)]

pub mod config;
pub mod layout;
pub mod runner;

pub use config::SimulationConfig;
pub use runner::{RunnerState, SimulationRunner, Snapshot};

use kernel::FluidSim;

/// Build a `FluidSim` from a validated configuration.
///
/// Validation runs first so every kernel precondition (positive mass,
/// smoothing radius, particle count) is rejected here rather than surfacing
/// as a numeric fault mid-run.
pub fn build_simulation(config: &SimulationConfig) -> Result<FluidSim, String> {
    config.validate()?;
    let positions = layout::seed_positions(config);
    tracing::info!(
        "Seeding {} particles ({} layout)",
        positions.len(),
        match config.layout {
            config::InitialLayout::Grid => "grid",
            config::InitialLayout::Random { .. } => "random",
        }
    );
    FluidSim::new(config.sim_params(), positions)
}

/// Create a runner from an in-memory configuration.
pub fn create_runner(config: SimulationConfig) -> Result<SimulationRunner, String> {
    let sim = build_simulation(&config)?;
    tracing::info!("Simulation '{}' ready to start", config.name);
    Ok(SimulationRunner::new(
        sim,
        config.frame_dt,
        config.substeps_per_frame,
        config.max_timesteps,
        config.max_time,
    ))
}

/// Create a complete simulation from a configuration file
///
/// This function performs the full setup pipeline:
/// 1. Load and validate the configuration
/// 2. Seed the initial particle layout
/// 3. Build the fluid simulation kernel
/// 4. Wrap it in a `SimulationRunner` for lifecycle management
///
/// # Arguments
/// * `config_path` - Path to the JSON configuration file
///
/// # Returns
/// A `SimulationRunner` ready to be started, or an error if setup fails
///
/// # Example
/// ```no_run
/// use orchestrator::create_simulation;
///
/// let runner = create_simulation("configs/splash.json")?;
/// runner.start();
/// // ... query snapshots, pause, resume, etc.
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn create_simulation(config_path: &str) -> Result<SimulationRunner, Box<dyn std::error::Error>> {
    tracing::info!("Creating simulation from config: {}", config_path);

    let config = SimulationConfig::load(config_path)?;
    tracing::info!("Configuration loaded: {}", config.name);

    Ok(create_runner(config)?)
}
