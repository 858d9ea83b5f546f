//! Smoothing kernel functions and the core SPH operators.
//!
//! The kernel is the quadratic spike `(R - d)^2`, normalized so its integral
//! over the 2D support disk is one. Its sharp peak at `d = 0` gives strong
//! short-range repulsion under the pressure gradient, which is what keeps
//! particles from clumping at this kernel's low neighbor counts.
//!
//! Also provides the core operators built on that kernel: density summation,
//! the pairwise pressure force, and the pointer pull/push force.

use std::f32::consts::PI;

use glam::Vec2;
use rayon::prelude::*;

use crate::eos::linear_eos;
use crate::spatial::SpatialLookup;
use crate::{PointerInput, SimParams};

/// Direction substituted when two interacting particles coincide exactly and
/// the true direction is undefined. A fixed axis keeps runs deterministic;
/// any unit vector satisfies the force model.
const COINCIDENT_DIRECTION: Vec2 = Vec2::X;

/// Quadratic smoothing kernel in 2D.
///
/// ```text
/// W(d) = (R - d)^2 / (pi R^4 / 6)   for d < R
/// W(d) = 0                          for d >= R
/// ```
///
/// Maximal at `d = 0`, monotonically decreasing, and normalized: the divisor
/// `pi R^4 / 6` is the closed-form integral of `(R - d)^2` over the support
/// disk, so the kernel integrates to one.
pub fn smoothing_kernel(distance: f32, radius: f32) -> f32 {
    if distance >= radius {
        return 0.0;
    }
    let volume = PI * radius.powi(4) / 6.0;
    let delta = radius - distance;
    delta * delta / volume
}

/// Derivative of [`smoothing_kernel`] with respect to distance.
///
/// ```text
/// W'(d) = 12 (d - R) / (pi R^4)   for d < R
/// W'(d) = 0                       for d >= R
/// ```
///
/// Negative everywhere inside the support (the kernel decays), and the
/// analytic derivative of the exact kernel above -- the pair must stay
/// consistent or pressure forces stop matching the density field they act on.
pub fn smoothing_kernel_derivative(distance: f32, radius: f32) -> f32 {
    if distance >= radius {
        return 0.0;
    }
    12.0 * (distance - radius) / (PI * radius.powi(4))
}

/// Compute density for all particles by kernel-weighted summation.
///
/// ```text
/// rho_i = sum_j m * W(|p_i - p_j|)
/// ```
///
/// Neighbors come from the lookup, which must have been rebuilt from
/// `sample_points` with the same smoothing radius. The sum includes the
/// particle itself (self-distance 0 contributes the kernel maximum), so with
/// positive mass no density is ever zero.
///
/// Data-parallel: iteration `i` writes only `densities[i]`.
pub fn compute_densities(
    densities: &mut [f32],
    sample_points: &[Vec2],
    lookup: &SpatialLookup,
    particle_mass: f32,
    smoothing_radius: f32,
) {
    densities.par_iter_mut().enumerate().for_each(|(i, density)| {
        let sample = sample_points[i];
        let mut sum = 0.0;
        lookup.for_each_within(sample, |j| {
            let distance = sample.distance(sample_points[j]);
            sum += particle_mass * smoothing_kernel(distance, smoothing_radius);
        });
        *density = sum;
    });
}

/// Net pressure force on one particle from all neighbors within the
/// smoothing radius.
///
/// Per neighbor `j`:
///
/// ```text
/// F += dir(i -> j) * W'(d) * m * (P_i + P_j) / 2 / rho_j
/// ```
///
/// Averaging the two particles' pressures makes the pairwise contribution
/// symmetric, so equal-density pairs obey Newton's third law exactly. When
/// the two positions coincide the direction is undefined and a fixed unit
/// axis is substituted; a NaN here would spread through the whole velocity
/// field within a tick.
pub fn pressure_force(
    particle: usize,
    sample_points: &[Vec2],
    densities: &[f32],
    lookup: &SpatialLookup,
    params: &SimParams,
) -> Vec2 {
    let sample = sample_points[particle];
    let own_pressure = linear_eos(
        densities[particle],
        params.target_density,
        params.pressure_multiplier,
    );

    let mut force = Vec2::ZERO;
    lookup.for_each_within(sample, |j| {
        if j == particle {
            return;
        }
        let difference = sample_points[j] - sample;
        let distance = difference.length();
        let direction = if distance == 0.0 {
            COINCIDENT_DIRECTION
        } else {
            difference / distance
        };
        let slope = smoothing_kernel_derivative(distance, params.smoothing_radius);
        let neighbor_pressure = linear_eos(
            densities[j],
            params.target_density,
            params.pressure_multiplier,
        );
        let shared_pressure = (own_pressure + neighbor_pressure) / 2.0;
        force += direction * (shared_pressure * slope * params.particle_mass / densities[j]);
    });
    force
}

/// Pointer-driven pull/push force on a single particle.
///
/// Inside the pointer radius the force is a spring toward (or away from,
/// by the sign of `strength`) the pointer position, with the particle's own
/// velocity subtracted as implicit drag, both scaled by the linear falloff
/// `1 - d / radius`:
///
/// ```text
/// F = (dir * strength - v) * (1 - d / radius)
/// ```
///
/// Zero outside the radius; zero direction when the particle sits on the
/// pointer itself.
pub fn pointer_force(position: Vec2, velocity: Vec2, pointer: &PointerInput) -> Vec2 {
    let offset = pointer.position - position;
    let distance = offset.length();
    if distance >= pointer.radius {
        return Vec2::ZERO;
    }
    let direction = if distance <= f32::EPSILON {
        Vec2::ZERO
    } else {
        offset / distance
    };
    let falloff = 1.0 - distance / pointer.radius;
    (direction * pointer.strength - velocity) * falloff
}
