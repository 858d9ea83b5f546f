//! Equation of state: the density-to-pressure relation.

/// Linear equation of state.
///
/// ```text
/// P = (rho - rho_target) * k
/// ```
///
/// Pressure is proportional to the local density error. It goes negative
/// when the neighborhood is sparser than the target, which turns the
/// pairwise pressure force attractive and pulls the fluid back together.
///
/// # Arguments
/// * `density` - Current local density.
/// * `target_density` - Rest density the fluid relaxes toward.
/// * `pressure_multiplier` - Stiffness constant `k`.
pub fn linear_eos(density: f32, target_density: f32, pressure_multiplier: f32) -> f32 {
    (density - target_density) * pressure_multiplier
}
