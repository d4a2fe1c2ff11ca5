//! Drag and gravity
//!
//! Both are applied as accelerations, so they are mass independent. Drag is
//! split relative to the current ground normal: the tangential part of the
//! velocity is damped by the horizontal coefficient and the part along the
//! normal by the vertical one.

use glam::Vec3;

/// Remove the component of `v` along `normal`.
/// A zero normal leaves `v` unchanged.
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    let n = normal.normalize_or_zero();
    v - n * v.dot(n)
}

/// Drag acceleration for velocity `v` against a surface with `normal`
pub fn drag_acceleration(v: Vec3, normal: Vec3, horizontal_drag: f32, vertical_drag: f32) -> Vec3 {
    let n = normal.normalize_or_zero();
    let horizontal = -horizontal_drag * project_on_plane(v, n);
    let vertical = -vertical_drag * v.dot(n) * n;
    horizontal + vertical
}

/// Gravity acceleration, always along world down
pub fn gravity_acceleration(gravity: f32) -> Vec3 {
    Vec3::NEG_Y * gravity
}
