use crate::{
    error::{Error, Result},
    math::{Bounds3, Transform, Vec3},
};

/// Indexed triangle mesh input. Vertex normals are optional, flat face normals are used when
/// none are given.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            normals,
            indices,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Checks that the index buffer is well formed for `mesh_index`
    pub fn validate(&self, mesh_index: usize) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(Error::MalformedMesh {
                mesh: mesh_index,
                indices: self.indices.len(),
            });
        }
        let has_normals = !self.normals.is_empty();
        if has_normals && self.normals.len() != self.positions.len() {
            return Err(Error::NormalCountMismatch {
                mesh: mesh_index,
                normals: self.normals.len(),
                positions: self.positions.len(),
            });
        }
        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= self.positions.len())
        {
            return Err(Error::VertexOutOfRange {
                mesh: mesh_index,
                index,
                count: self.positions.len(),
            });
        }
        Ok(())
    }

    /// Returns the triangles of this mesh in world space. `validate` has to pass first.
    pub fn world_triangles(&self, transform: &Transform) -> Vec<CompactTriangle> {
        let positions: Vec<Vec3> = self.positions.iter().map(|&p| transform.point(p)).collect();
        let normals: Vec<Vec3> = self
            .normals
            .iter()
            .map(|&n| transform.normal(n).normalize_or_zero())
            .collect();

        self.indices
            .chunks_exact(3)
            .map(|tri| {
                let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
                if normals.is_empty() {
                    CompactTriangle::flat(positions[i0], positions[i1], positions[i2])
                } else {
                    CompactTriangle::new(
                        [positions[i0], positions[i1], positions[i2]],
                        [normals[i0], normals[i1], normals[i2]],
                    )
                }
            })
            .collect()
    }
}

/// World space triangle stored as its first vertex and two edges for the intersection test.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CompactTriangle {
    pub v0: Vec3,
    pub e1: Vec3,
    pub e2: Vec3,
    pub normals: [Vec3; 3],
}

impl CompactTriangle {
    /// Creates a new `CompactTriangle`. Zero vertex normals are replaced with the face normal.
    pub fn new(vertices: [Vec3; 3], normals: [Vec3; 3]) -> Self {
        let mut ret = Self::flat(vertices[0], vertices[1], vertices[2]);
        let ng = ret.geometric_normal();
        for (dst, n) in ret.normals.iter_mut().zip(normals) {
            if n != Vec3::ZERO {
                *dst = n;
            } else {
                *dst = ng;
            }
        }
        ret
    }

    pub fn flat(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let ng = e1.cross(e2).normalize_or_zero();
        Self {
            v0: p0,
            e1,
            e2,
            normals: [ng; 3],
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v0 + self.e1, self.v0 + self.e2]
    }

    pub fn bounds(&self) -> Bounds3 {
        let [p0, p1, p2] = self.vertices();
        Bounds3::new(p0, p1).union_p(p2)
    }

    pub fn area(&self) -> f32 {
        0.5 * self.e1.cross(self.e2).length()
    }

    /// Counter-clockwise winding faces outward
    pub fn geometric_normal(&self) -> Vec3 {
        self.e1.cross(self.e2).normalize_or_zero()
    }

    pub fn interpolated_normal(&self, b1: f32, b2: f32) -> Vec3 {
        let b0 = 1.0 - b1 - b2;
        let n = self.normals[0] * b0 + self.normals[1] * b1 + self.normals[2] * b2;
        let n = n.normalize_or_zero();
        if n == Vec3::ZERO {
            self.geometric_normal()
        } else {
            n
        }
    }
}
