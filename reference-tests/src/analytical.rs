//! Analytical reference solutions for validating the simulation.
//!
//! Provides closed-form results against which simulated state can be
//! compared quantitatively.

/// Closed-form trajectory of a force-free particle under gravity with the
/// folded-timestep integration scheme.
///
/// The integrator updates velocity by `-g * dt` per tick and then adds the
/// velocity to the position as-is, so after `k` ticks from rest:
///
/// ```text
/// v_y(k) = -g * dt * k
/// y(k)   = -g * dt * k * (k + 1) / 2
/// ```
pub struct FreeFall {
    /// Downward gravity magnitude
    pub gravity: f32,
    /// Tick duration (seconds)
    pub dt: f32,
}

impl FreeFall {
    /// Vertical velocity after `k` ticks starting from rest.
    pub fn velocity_after(&self, ticks: u64) -> f32 {
        -(self.gravity * self.dt) * ticks as f32
    }

    /// Vertical displacement after `k` ticks starting from rest.
    pub fn displacement_after(&self, ticks: u64) -> f32 {
        let k = ticks as f32;
        -(self.gravity * self.dt) * k * (k + 1.0) / 2.0
    }
}

/// Numerically integrate the smoothing kernel over its 2D support disk.
///
/// A correctly normalized kernel integrates to one; density summation then
/// recovers the rest density on a uniform particle distribution.
pub fn kernel_disk_integral(smoothing_radius: f32, rings: u32) -> f32 {
    let dr = smoothing_radius / rings as f32;
    let mut integral = 0.0;
    for ring in 0..rings {
        let r = (ring as f32 + 0.5) * dr;
        integral +=
            kernel::smoothing_kernel(r, smoothing_radius) * 2.0 * std::f32::consts::PI * r * dr;
    }
    integral
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_fall_is_triangular_sum_of_velocities() {
        let reference = FreeFall { gravity: 10.0, dt: 0.1 };
        assert_eq!(reference.velocity_after(0), 0.0);
        assert!((reference.velocity_after(5) + 5.0).abs() < 1.0e-6);
        // Displacement is the sum 1 + 2 + ... + k of per-tick velocities.
        assert!((reference.displacement_after(5) + 15.0).abs() < 1.0e-5);
    }

    #[test]
    fn disk_integral_close_to_one() {
        let integral = kernel_disk_integral(23.0, 1000);
        assert!((integral - 1.0).abs() < 1.0e-3, "integral = {integral}");
    }
}
