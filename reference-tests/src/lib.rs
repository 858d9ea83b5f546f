//! Reference test framework for fluid simulation validation
//!
//! This crate provides scenario-level validation of the simulation's
//! physical behavior: a scenario is a full configuration run for a number of
//! frames, then checked against expected-result criteria.

pub mod analytical;


use glam::Vec2;
use orchestrator::{build_simulation, SimulationConfig};

/// Expected result criteria for a reference scenario
#[derive(Debug, Clone)]
pub struct ExpectedResult {
    /// All particles remain inside the bounds box
    pub containment: Option<ContainmentCheck>,
    /// Final particle speeds stay below a limit
    pub max_speed: Option<MaxSpeedCheck>,
    /// Final densities stay near the target density
    pub density: Option<DensityCheck>,
    /// Re-running the scenario reproduces identical final positions
    pub reproducible: bool,
}

/// Check that particles remain within the (deflated) bounds box
#[derive(Debug, Clone)]
pub struct ContainmentCheck {
    /// Allowed overshoot beyond the exact boundary
    pub margin: f32,
}

/// Check the maximum particle speed at the end of the run
#[derive(Debug, Clone)]
pub struct MaxSpeedCheck {
    /// Upper speed limit
    pub limit: f32,
}

/// Check the maximum relative density deviation at the end of the run
#[derive(Debug, Clone)]
pub struct DensityCheck {
    /// Allowed relative deviation from the target density
    pub max_relative_deviation: f32,
}

/// A complete reference scenario: configuration, duration, expectations
#[derive(Debug, Clone)]
pub struct ReferenceScenario {
    /// Scenario name for reporting
    pub name: String,
    /// Full simulation configuration
    pub config: SimulationConfig,
    /// Number of frames to simulate
    pub frames: u32,
    /// Pass/fail criteria
    pub expected: ExpectedResult,
}

/// Outcome of one scenario run
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Scenario name
    pub name: String,
    /// `true` when every criterion passed
    pub passed: bool,
    /// Human-readable description of each failed criterion
    pub failures: Vec<String>,
}

/// Run one scenario to completion and evaluate its criteria.
pub fn run_scenario(scenario: &ReferenceScenario) -> Result<TestResult, String> {
    tracing::info!(
        "Running scenario '{}': {} particles, {} frames",
        scenario.name,
        scenario.config.particle_count,
        scenario.frames
    );

    let mut failures = Vec::new();

    let mut sim = build_simulation(&scenario.config)?;
    let substeps = scenario.config.substeps_per_frame;
    let dt = scenario.config.frame_dt / substeps as f32;
    for _ in 0..scenario.frames * substeps {
        sim.step(dt);
    }
    let final_positions = sim.particles().positions.clone();

    if let Some(check) = &scenario.expected.containment {
        let limit = scenario.config.half_bounds()
            - Vec2::splat(scenario.config.particle_radius)
            + Vec2::splat(check.margin);
        let escaped = sim
            .particles()
            .positions
            .iter()
            .filter(|p| p.x.abs() > limit.x || p.y.abs() > limit.y)
            .count();
        if escaped > 0 {
            failures.push(format!("{escaped} particles escaped the bounds"));
        }
    }

    let metrics = sim.metrics();
    if let Some(check) = &scenario.expected.max_speed {
        if metrics.max_speed > check.limit {
            failures.push(format!(
                "max speed {:.3} exceeds limit {:.3}",
                metrics.max_speed, check.limit
            ));
        }
    }

    if let Some(check) = &scenario.expected.density {
        if metrics.max_density_variation > check.max_relative_deviation {
            failures.push(format!(
                "max density deviation {:.3} exceeds limit {:.3}",
                metrics.max_density_variation, check.max_relative_deviation
            ));
        }
    }

    if scenario.expected.reproducible {
        let rerun_positions = simulate(scenario)?;
        if rerun_positions != final_positions {
            failures.push("re-run did not reproduce identical final positions".to_string());
        }
    }

    Ok(TestResult {
        name: scenario.name.clone(),
        passed: failures.is_empty(),
        failures,
    })
}

/// Simulate the scenario and return the final particle positions.
fn simulate(scenario: &ReferenceScenario) -> Result<Vec<Vec2>, String> {
    let mut sim = build_simulation(&scenario.config)?;
    let substeps = scenario.config.substeps_per_frame;
    let dt = scenario.config.frame_dt / substeps as f32;
    for _ in 0..scenario.frames * substeps {
        sim.step(dt);
    }
    Ok(sim.particles().positions.clone())
}
