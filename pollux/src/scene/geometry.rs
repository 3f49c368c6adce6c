use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use crate::math::{Bounds3, Transform};

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Display, EnumString, EnumVariantNames,
)]
pub enum GeomType {
    Sphere,
    Cube,
    Plane,
    Mesh,
}

/// Contiguous range of world space triangles owned by a mesh geometry.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshDescriptor {
    pub first_triangle: u32,
    pub triangle_count: u32,
    pub bounds: Bounds3,
    /// Total world space surface area
    pub area: f32,
}

impl MeshDescriptor {
    pub fn triangle_range(&self) -> std::ops::Range<usize> {
        let first = self.first_triangle as usize;
        first..first + self.triangle_count as usize
    }
}

/// A placed scene object.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Geometry {
    pub kind: GeomType,
    pub material: u32,
    pub transform: Transform,
    /// Set iff `kind` is `GeomType::Mesh`
    pub mesh: Option<MeshDescriptor>,
}
