use crate::math::{Vec2, Vec3, RAY_OFFSET};

/// Primitive id of a miss.
pub const NO_PRIMITIVE: u32 = u32::MAX;

/// Closest hit record for a ray. Both normals face away from the surface regardless of which
/// side the ray arrived from; `outside` tells the side.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intersection {
    pub point: Vec3,
    /// Interpolated normal used for shading
    pub normal: Vec3,
    pub geometric_normal: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub uv: Vec2,
    pub t: f32,
    pub material: u32,
    /// `true` if the ray arrived from the side the normals point to
    pub outside: bool,
    /// Index of the hit geometry, `NO_PRIMITIVE` on miss
    pub primitive: u32,
    /// Index of the hit triangle for meshes, `NO_PRIMITIVE` otherwise
    pub triangle: u32,
}

impl Default for Intersection {
    fn default() -> Self {
        Self::miss()
    }
}

impl Intersection {
    pub fn miss() -> Self {
        Self {
            point: Vec3::ZERO,
            normal: Vec3::Z,
            geometric_normal: Vec3::Z,
            tangent: Vec3::X,
            bitangent: Vec3::Y,
            uv: Vec2::ZERO,
            t: f32::INFINITY,
            material: 0,
            outside: true,
            primitive: NO_PRIMITIVE,
            triangle: NO_PRIMITIVE,
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.primitive != NO_PRIMITIVE
    }

    /// Origin for a ray leaving the surface in direction `w`, offset off the surface on the
    /// side `w` points to
    pub fn spawn_origin(&self, w: Vec3) -> Vec3 {
        if w.dot(self.geometric_normal) >= 0.0 {
            self.point + self.geometric_normal * RAY_OFFSET
        } else {
            self.point - self.geometric_normal * RAY_OFFSET
        }
    }

    /// Expresses world space `v` in the local shading frame where the normal is +z
    #[inline]
    pub fn world_to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.tangent), v.dot(self.bitangent), v.dot(self.normal))
    }

    #[inline]
    pub fn local_to_world(&self, v: Vec3) -> Vec3 {
        self.tangent * v.x + self.bitangent * v.y + self.normal * v.z
    }
}
