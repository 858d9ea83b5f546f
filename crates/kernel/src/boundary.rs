//! Axis-aligned boundary collision resolution.

use glam::Vec2;

/// Clamp a particle back inside the bounds box and reflect its velocity.
///
/// The box is centered at the origin with the given half extents, deflated
/// by the particle radius so the particle's rim, not its center, touches the
/// wall. Each axis is resolved independently: on overshoot the position is
/// clamped to the signed boundary and that axis' velocity component is
/// inverted and scaled by `collision_damping`. A corner hit resolves both
/// axes in the same call.
pub fn resolve_collision(
    position: &mut Vec2,
    velocity: &mut Vec2,
    half_bounds: Vec2,
    particle_radius: f32,
    collision_damping: f32,
) {
    let limit = half_bounds - Vec2::splat(particle_radius);

    if position.x.abs() > limit.x {
        position.x = limit.x * boundary_sign(position.x);
        velocity.x *= -collision_damping;
    }
    if position.y.abs() > limit.y {
        position.y = limit.y * boundary_sign(position.y);
        velocity.y *= -collision_damping;
    }
}

/// Sign of the wall a coordinate escaped through; zero counts as positive.
#[inline]
fn boundary_sign(coordinate: f32) -> f32 {
    if coordinate >= 0.0 {
        1.0
    } else {
        -1.0
    }
}
