//! Particle storage using parallel struct-of-arrays layout.

use glam::Vec2;

/// Struct-of-arrays particle storage.
///
/// All arrays are parallel: index `i` across every array refers to the same
/// particle. Insertion order is fixed at initialization and never reordered;
/// the simulation's per-pass loops write only their own slot in each array.
#[derive(Debug, Clone)]
pub struct ParticleArrays {
    /// Authoritative positions, mutated only by the integration pass.
    pub positions: Vec<Vec2>,
    /// Velocities, mutated by force integration and collision resolution.
    pub velocities: Vec<Vec2>,
    /// One-step-ahead position estimates used for neighbor queries in
    /// predictive mode.
    pub predicted: Vec<Vec2>,
    /// Densities, recomputed from scratch every tick.
    pub densities: Vec<f32>,
}

impl ParticleArrays {
    /// Create particle storage seeded from the given positions.
    ///
    /// Velocities and densities start at zero; predicted positions start
    /// equal to the real positions.
    pub fn from_positions(positions: Vec<Vec2>) -> Self {
        let n = positions.len();
        Self {
            predicted: positions.clone(),
            positions,
            velocities: vec![Vec2::ZERO; n],
            densities: vec![0.0; n],
        }
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// `true` if there are no particles.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Re-seed all state from a fresh set of positions.
    ///
    /// The particle count may change; velocities are zeroed and densities
    /// cleared, exactly as at construction.
    pub fn reset(&mut self, positions: Vec<Vec2>) {
        let n = positions.len();
        self.predicted.clear();
        self.predicted.extend_from_slice(&positions);
        self.positions = positions;
        self.velocities.clear();
        self.velocities.resize(n, Vec2::ZERO);
        self.densities.clear();
        self.densities.resize(n, 0.0);
    }
}
