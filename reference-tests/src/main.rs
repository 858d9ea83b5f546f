//! Reference test binary entry point
//!
//! Runs the built-in reference scenarios and reports pass/fail.

use orchestrator::config::{InitialLayout, SimulationConfig};
use reference_tests::{
    run_scenario, ContainmentCheck, DensityCheck, ExpectedResult, MaxSpeedCheck,
    ReferenceScenario,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn base_config(name: &str) -> SimulationConfig {
    SimulationConfig {
        name: name.to_string(),
        particle_count: 400,
        smoothing_radius: 23.0,
        target_density: 0.007,
        pressure_multiplier: 2700.0,
        gravity: 8.0,
        collision_damping: 0.4,
        particle_mass: 1.0,
        particle_radius: 3.1,
        particle_spacing: 1.9,
        bounds_size: [640.0, 360.0],
        layout: InitialLayout::Grid,
        integration: kernel::IntegrationMode::Predicted,
        substeps_per_frame: 3,
        frame_dt: 1.0 / 60.0,
        pointer: None,
        max_timesteps: None,
        max_time: None,
    }
}

/// Water block released under gravity: must stay contained, come to rest,
/// and reproduce exactly on a re-run.
fn gravity_settling_scenario() -> ReferenceScenario {
    ReferenceScenario {
        name: "Gravity Settling".to_string(),
        config: base_config("gravity-settling"),
        frames: 600,
        expected: ExpectedResult {
            containment: Some(ContainmentCheck { margin: 1.0e-3 }),
            max_speed: Some(MaxSpeedCheck { limit: 1.0 }),
            density: Some(DensityCheck {
                max_relative_deviation: 2.0,
            }),
            reproducible: true,
        },
    }
}

/// Zero-gravity block relaxing outward under pressure alone: must stay
/// contained with bounded speeds.
fn pressure_relaxation_scenario() -> ReferenceScenario {
    let mut config = base_config("pressure-relaxation");
    config.particle_count = 256;
    config.gravity = 0.0;
    config.target_density = 0.001;
    config.pressure_multiplier = 1200.0;
    ReferenceScenario {
        name: "Pressure Relaxation".to_string(),
        config,
        frames: 300,
        expected: ExpectedResult {
            containment: Some(ContainmentCheck { margin: 1.0e-3 }),
            max_speed: Some(MaxSpeedCheck { limit: 5.0 }),
            density: None,
            reproducible: true,
        },
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reference_tests=info,orchestrator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let scenarios = vec![gravity_settling_scenario(), pressure_relaxation_scenario()];

    let mut all_passed = true;
    for scenario in &scenarios {
        match run_scenario(scenario) {
            Ok(result) => {
                if result.passed {
                    println!("PASS  {}", result.name);
                } else {
                    all_passed = false;
                    println!("FAIL  {}", result.name);
                    for failure in &result.failures {
                        println!("      - {failure}");
                    }
                }
            }
            Err(e) => {
                all_passed = false;
                println!("ERROR {}: {e}", scenario.name);
            }
        }
    }

    if !all_passed {
        std::process::exit(1);
    }
}
