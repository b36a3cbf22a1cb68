//! Math types and helpers
//!
//! Provides the fundamental math types used by the scene, animation, and
//! picking code. Everything is a thin alias over nalgebra so the rest of
//! the crate never names the backing library directly.

pub use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type (pointer coordinates in NDC)
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (homogeneous coordinates)
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Clamp a scalar into the unit interval `[0, 1]`.
///
/// Non-finite inputs collapse to `0.0` so a corrupt snapshot value can
/// never poison downstream animation math.
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Check whether every component of a vector is finite.
pub fn is_finite_vec(v: &Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}
