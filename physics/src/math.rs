// Vec3f/Quatf are bevy_math's glam types so a renderer can use them directly.
pub use bevy_math::{Quat as Quatf, Vec3 as Vec3f};

/// Body orientation for a pitch angle (positive = nose up).
///
/// Body axes follow the usual convention: +Z forward, +Y up, +X right, so a
/// nose-up pitch is a rotation about −X.
#[inline]
pub fn pitch_to_quat(angle: f32) -> Quatf {
    Quatf::from_rotation_x(-angle)
}

#[inline]
pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}
