//! 2D SPH Fluid Simulation Kernel
//!
//! This crate provides the compute core for a 2D Smoothed Particle
//! Hydrodynamics fluid simulation. It is designed to be separable and
//! compute-focused.
//!
//! # Modules
//! - [`particle`] -- Struct-of-arrays particle storage.
//! - [`spatial`] -- Uniform spatial hash lookup for radius queries.
//! - [`sph`] -- Smoothing kernel, gradient, and core SPH operators.
//! - [`eos`] -- Linear equation of state.
//! - [`boundary`] -- Axis-aligned boundary collision resolution.

#![warn(missing_docs)]

pub mod boundary;
pub mod eos;
pub mod particle;
pub mod spatial;
pub mod sph;

use glam::Vec2;
use rayon::prelude::*;

pub use eos::linear_eos;
pub use particle::ParticleArrays;
pub use spatial::SpatialLookup;
pub use sph::{smoothing_kernel, smoothing_kernel_derivative};

/// Lookahead factor for predictive integration: neighbor queries run against
/// `position + velocity * LOOKAHEAD` instead of the current position. Fixed,
/// independent of the step duration.
pub const PREDICTION_LOOKAHEAD: f32 = 0.75;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How neighbor queries relate to the integration state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum IntegrationMode {
    /// Index and query current positions directly.
    Direct,
    /// Index and query one-step-ahead predicted positions, which reduces
    /// visible lag and clumping. Position integration still advances the
    /// real positions.
    Predicted,
}

/// Fixed per-run simulation parameters.
///
/// Validated once at construction; the step loop assumes every precondition
/// holds and performs no further checking.
#[derive(Debug, Clone)]
pub struct SimParams {
    /// Kernel support radius; also the spatial lookup cell size.
    pub smoothing_radius: f32,
    /// Rest density the equation of state relaxes toward.
    pub target_density: f32,
    /// Stiffness of the equation of state.
    pub pressure_multiplier: f32,
    /// Downward gravity magnitude (applied to `velocity.y` each tick).
    pub gravity: f32,
    /// Velocity retention on wall impact, in `[0, 1]`.
    pub collision_damping: f32,
    /// Uniform particle mass.
    pub particle_mass: f32,
    /// Physical particle radius used for wall clearance.
    pub particle_radius: f32,
    /// Half extents of the axis-aligned bounds box centered at the origin.
    pub half_bounds: Vec2,
    /// Neighbor query mode.
    pub integration: IntegrationMode,
}

impl SimParams {
    /// Check every configuration precondition.
    ///
    /// The step loop divides by mass-derived densities and by the smoothing
    /// radius, so violations must be rejected here rather than surfacing as
    /// NaN mid-run.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.smoothing_radius > 0.0) {
            return Err("smoothing_radius must be positive".to_string());
        }
        if !(self.particle_mass > 0.0) {
            return Err("particle_mass must be positive".to_string());
        }
        if !(self.target_density > 0.0) {
            return Err("target_density must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.collision_damping) {
            return Err("collision_damping must be within [0, 1]".to_string());
        }
        if !(self.half_bounds.x > 0.0 && self.half_bounds.y > 0.0) {
            return Err("bounds half extents must be positive".to_string());
        }
        if self.particle_radius < 0.0 {
            return Err("particle_radius must be non-negative".to_string());
        }
        if self.particle_radius >= self.half_bounds.min_element() {
            return Err("particle_radius must be smaller than the bounds half extents".to_string());
        }
        Ok(())
    }
}

/// Pointer pull/push input for one or more ticks.
///
/// `strength` is signed: positive pulls particles toward `position`,
/// negative pushes them away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    /// Query point in simulation space.
    pub position: Vec2,
    /// Influence radius around the query point.
    pub radius: f32,
    /// Signed pull (+) / push (-) strength.
    pub strength: f32,
}

/// Aggregate diagnostics for a simulation snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SimMetrics {
    /// Maximum relative density deviation from the target density.
    pub max_density_variation: f32,
    /// Maximum particle speed (the quantity renderers map to color).
    pub max_speed: f32,
}

// ---------------------------------------------------------------------------
// FluidSim
// ---------------------------------------------------------------------------

/// A complete 2D SPH fluid simulation instance.
///
/// Owns the particle state, the spatial lookup, and the run parameters.
/// Each [`step`](Self::step) advances the state by one tick through four
/// phases:
///
/// 1. External forces and position prediction
/// 2. Spatial lookup rebuild
/// 3. Density summation
/// 4. Pressure forces + velocity integration, then position integration
///    with collision resolution
///
/// Phases 1, 3, and 4 are data-parallel loops over all particles; each
/// iteration writes only its own slot of each output array. The lookup is
/// rebuilt single-writer between the parallel phases and read-only inside
/// them.
pub struct FluidSim {
    params: SimParams,
    particles: ParticleArrays,
    lookup: SpatialLookup,
    pointer: Option<PointerInput>,
}

impl FluidSim {
    /// Create a simulation from validated parameters and initial positions.
    ///
    /// Velocities start at zero. The spatial lookup is built once from the
    /// initial positions so queries are valid before the first step.
    pub fn new(params: SimParams, initial_positions: Vec<Vec2>) -> Result<Self, String> {
        params.validate()?;
        if initial_positions.is_empty() {
            return Err("particle count must be positive".to_string());
        }

        let particles = ParticleArrays::from_positions(initial_positions);
        let mut lookup = SpatialLookup::new();
        lookup.rebuild(&particles.positions, params.smoothing_radius);

        tracing::debug!(
            "Fluid simulation created: {} particles, smoothing radius {}",
            particles.len(),
            params.smoothing_radius
        );

        Ok(Self {
            params,
            particles,
            lookup,
            pointer: None,
        })
    }

    /// Re-seed the simulation from a fresh set of positions, zeroing all
    /// dynamic state. The particle count may change.
    pub fn reset(&mut self, initial_positions: Vec<Vec2>) {
        self.particles.reset(initial_positions);
        self.lookup
            .rebuild(&self.particles.positions, self.params.smoothing_radius);
        self.pointer = None;
    }

    /// Set or clear the pointer force applied on subsequent steps.
    pub fn set_pointer(&mut self, pointer: Option<PointerInput>) {
        self.pointer = pointer;
    }

    /// The run parameters.
    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Read-only particle state.
    pub fn particles(&self) -> &ParticleArrays {
        &self.particles
    }

    /// Number of particles in the simulation.
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Advance the simulation by one tick of duration `dt`.
    ///
    /// `dt` scales the velocity updates only; the position update adds the
    /// velocity as-is, treating it as a per-tick displacement with `dt`
    /// already folded in.
    pub fn step(&mut self, dt: f32) {
        let params = &self.params;
        let mode = params.integration;

        // --- 1. External forces + prediction ---
        {
            let ParticleArrays {
                positions,
                velocities,
                predicted,
                ..
            } = &mut self.particles;
            let gravity = params.gravity;

            match mode {
                IntegrationMode::Predicted => {
                    predicted
                        .par_iter_mut()
                        .zip(velocities.par_iter_mut())
                        .zip(positions.par_iter())
                        .for_each(|((predicted, velocity), position)| {
                            velocity.y -= gravity * dt;
                            *predicted = *position + *velocity * PREDICTION_LOOKAHEAD;
                        });
                }
                IntegrationMode::Direct => {
                    velocities.par_iter_mut().for_each(|velocity| {
                        velocity.y -= gravity * dt;
                    });
                }
            }
        }

        // --- 2. Rebuild the spatial lookup from the active sample set ---
        {
            let sample = match mode {
                IntegrationMode::Predicted => &self.particles.predicted,
                IntegrationMode::Direct => &self.particles.positions,
            };
            self.lookup.rebuild(sample, params.smoothing_radius);
        }

        // --- 3. Density summation ---
        {
            let ParticleArrays {
                positions,
                predicted,
                densities,
                ..
            } = &mut self.particles;
            let sample: &[Vec2] = match mode {
                IntegrationMode::Predicted => predicted,
                IntegrationMode::Direct => positions,
            };
            sph::compute_densities(
                densities,
                sample,
                &self.lookup,
                params.particle_mass,
                params.smoothing_radius,
            );
        }

        // --- 4a. Pressure + pointer forces, velocity integration ---
        {
            let ParticleArrays {
                positions,
                velocities,
                predicted,
                densities,
            } = &mut self.particles;
            let positions: &[Vec2] = positions;
            let predicted: &[Vec2] = predicted;
            let densities: &[f32] = densities;
            let sample = match mode {
                IntegrationMode::Predicted => predicted,
                IntegrationMode::Direct => positions,
            };
            let lookup = &self.lookup;
            let pointer = self.pointer;

            velocities
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, velocity)| {
                    let force = sph::pressure_force(i, sample, densities, lookup, params);
                    let acceleration = force / densities[i];
                    if let Some(pointer) = &pointer {
                        *velocity += sph::pointer_force(positions[i], *velocity, pointer);
                    }
                    *velocity += acceleration * dt;
                });
        }

        // --- 4b. Position integration + collision resolution ---
        {
            let ParticleArrays {
                positions,
                velocities,
                ..
            } = &mut self.particles;

            positions
                .par_iter_mut()
                .zip(velocities.par_iter_mut())
                .for_each(|(position, velocity)| {
                    *position += *velocity;
                    boundary::resolve_collision(
                        position,
                        velocity,
                        params.half_bounds,
                        params.particle_radius,
                        params.collision_damping,
                    );
                });
        }
    }

    /// Compute aggregate diagnostics for the current snapshot.
    pub fn metrics(&self) -> SimMetrics {
        let target = self.params.target_density;
        let max_density_variation = self
            .particles
            .densities
            .iter()
            .map(|d| (d - target).abs() / target)
            .fold(0.0_f32, f32::max);
        let max_speed = self
            .particles
            .velocities
            .iter()
            .map(|v| v.length())
            .fold(0.0_f32, f32::max);
        SimMetrics {
            max_density_variation,
            max_speed,
        }
    }
}
