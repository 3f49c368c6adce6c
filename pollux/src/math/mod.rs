mod bounds;
mod transform;

pub use bounds::Bounds3;
pub use glam::{EulerRot, Mat3, Mat4, UVec3, Vec2, Vec3, Vec4};
pub use transform::Transform;

/// Linear RGB radiance or reflectance.
pub type Spectrum = Vec3;

/// Hits closer than this along a ray are ignored to avoid self-intersection.
pub const EPSILON_T: f32 = 1e-4;
/// Distance new ray origins are pushed off the surface along the geometric normal.
pub const RAY_OFFSET: f32 = 1e-3;
/// Largest f32 below one.
pub const ONE_MINUS_EPSILON: f32 = 0.999_999_94;

pub const PI: f32 = std::f32::consts::PI;
pub const INV_PI: f32 = std::f32::consts::FRAC_1_PI;

#[inline]
pub fn is_black(s: Spectrum) -> bool {
    s.x == 0.0 && s.y == 0.0 && s.z == 0.0
}

/// Builds a right-handed orthonormal frame `(s, t)` around `n` with `s` as close to `dpdu` as
/// possible. Falls back to an arbitrary frame when `dpdu` is degenerate or parallel to `n`.
pub fn shading_frame(n: Vec3, dpdu: Vec3) -> (Vec3, Vec3) {
    let s = dpdu - n * n.dot(dpdu);
    let s_len_2 = s.length_squared();
    if s_len_2 > 1e-12 && s_len_2.is_finite() {
        let s = s / s_len_2.sqrt();
        (s, n.cross(s))
    } else {
        let (s, _) = n.any_orthonormal_pair();
        (s, n.cross(s))
    }
}
