//! Initial particle placement.
//!
//! Particles start either on a centered square grid at rest spacing or
//! uniformly at random inside the bounds box. Velocities are zero in both
//! layouts; the fluid's initial motion comes entirely from the first ticks
//! of gravity and pressure.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{InitialLayout, SimulationConfig};

/// Produce initial positions for the configured layout.
pub fn seed_positions(config: &SimulationConfig) -> Vec<Vec2> {
    match config.layout {
        InitialLayout::Grid => grid_positions(config.particle_count, config.grid_spacing()),
        InitialLayout::Random { seed } => random_positions(
            config.particle_count,
            config.half_bounds(),
            config.particle_radius,
            seed,
        ),
    }
}

/// Square grid of `count` particles centered on the origin.
pub fn grid_positions(count: usize, spacing: f32) -> Vec<Vec2> {
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

/// Uniform random placement inside the bounds box deflated by the particle
/// radius, reproducible from the seed.
pub fn random_positions(count: usize, half_bounds: Vec2, particle_radius: f32, seed: u64) -> Vec<Vec2> {
    let limit = half_bounds - Vec2::splat(particle_radius);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Vec2::new(
                rng.gen_range(-limit.x..=limit.x),
                rng.gen_range(-limit.y..=limit.y),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_requested_count_and_is_centered() {
        let positions = grid_positions(64, 8.0);
        assert_eq!(positions.len(), 64);
        let mean: Vec2 = positions.iter().sum::<Vec2>() / 64.0;
        assert!(mean.length() < 1.0e-4, "grid should center on origin, mean={mean}");
    }

    #[test]
    fn non_square_count_fills_partial_last_row() {
        let positions = grid_positions(10, 8.0);
        assert_eq!(positions.len(), 10);
        // 3 per row, 4 rows, last row holds a single particle.
        let rows: std::collections::BTreeSet<_> =
            positions.iter().map(|p| (p.y * 10.0) as i64).collect();
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn grid_spacing_separates_neighbors() {
        let spacing = 8.1;
        let positions = grid_positions(16, spacing);
        assert!((positions[1].x - positions[0].x - spacing).abs() < 1.0e-4);
        assert!((positions[4].y - positions[0].y - spacing).abs() < 1.0e-4);
    }

    #[test]
    fn random_positions_stay_inside_deflated_bounds() {
        let half_bounds = Vec2::new(640.0, 360.0);
        let radius = 3.1;
        let positions = random_positions(500, half_bounds, radius, 7);
        let limit = half_bounds - Vec2::splat(radius);
        assert!(positions
            .iter()
            .all(|p| p.x.abs() <= limit.x && p.y.abs() <= limit.y));
    }

    #[test]
    fn random_layout_is_reproducible_by_seed() {
        let half_bounds = Vec2::new(640.0, 360.0);
        let a = random_positions(100, half_bounds, 3.1, 42);
        let b = random_positions(100, half_bounds, 3.1, 42);
        let c = random_positions(100, half_bounds, 3.1, 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
