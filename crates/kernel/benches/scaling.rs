//! Step throughput at increasing particle counts.
//!
//! Run with: cargo bench -p kernel --bench scaling

use std::time::Instant;

use glam::Vec2;
use kernel::{FluidSim, IntegrationMode, SimParams};

fn grid_positions(count: usize, spacing: f32) -> Vec<Vec2> {
    let per_row = (count as f32).sqrt() as usize;
    let per_col = (count - 1) / per_row + 1;
    (0..count)
        .map(|i| {
            Vec2::new(
                ((i % per_row) as f32 - per_row as f32 / 2.0 + 0.5) * spacing,
                ((i / per_row) as f32 - per_col as f32 / 2.0 + 0.5) * spacing,
            )
        })
        .collect()
}

fn main() {
    // (particle count, steps) -- fewer steps at larger counts
    let configs = [(1_024, 400), (4_096, 200), (16_384, 50), (65_536, 10)];

    println!(
        "{:>10} {:>8} {:>10} {:>12} {:>12}",
        "Particles", "Steps", "Time (s)", "steps/s", "ms/step"
    );

    for &(count, steps) in &configs {
        let params = SimParams {
            smoothing_radius: 23.0,
            target_density: 0.007,
            pressure_multiplier: 2700.0,
            gravity: 8.0,
            collision_damping: 0.4,
            particle_mass: 1.0,
            particle_radius: 3.1,
            half_bounds: Vec2::new(1280.0, 1280.0),
            integration: IntegrationMode::Predicted,
        };
        let mut sim = FluidSim::new(params, grid_positions(count, 8.1)).unwrap();

        let dt = 1.0 / 180.0;
        // Warmup
        for _ in 0..3 {
            sim.step(dt);
        }

        let start = Instant::now();
        for _ in 0..steps {
            sim.step(dt);
        }
        let elapsed = start.elapsed().as_secs_f64();

        println!(
            "{:>10} {:>8} {:>10.3} {:>12.1} {:>12.3}",
            count,
            steps,
            elapsed,
            steps as f64 / elapsed,
            1000.0 * elapsed / steps as f64,
        );
    }
}
