use crate::{
    math::{Vec2, Vec3, EPSILON_T},
    sampling::uniform_sample_triangle,
    scene::CompactTriangle,
};

#[derive(Copy, Clone, Debug)]
pub struct TriangleHit {
    pub t: f32,
    /// Barycentric weight of the second vertex
    pub b1: f32,
    /// Barycentric weight of the third vertex
    pub b2: f32,
}

// Möller-Trumbore
pub fn intersect(tri: &CompactTriangle, o: Vec3, d: Vec3, t_max: f32) -> Option<TriangleHit> {
    let pvec = d.cross(tri.e2);
    let det = tri.e1.dot(pvec);
    if det.abs() < 1e-12 {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = o - tri.v0;
    let b1 = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&b1) {
        return None;
    }

    let qvec = tvec.cross(tri.e1);
    let b2 = d.dot(qvec) * inv_det;
    if b2 < 0.0 || b1 + b2 > 1.0 {
        return None;
    }

    let t = tri.e2.dot(qvec) * inv_det;
    if t <= EPSILON_T || t >= t_max {
        return None;
    }

    Some(TriangleHit { t, b1, b2 })
}

/// Samples a point uniformly on the triangle. Returns the point and the geometric normal.
pub fn sample(tri: &CompactTriangle, u: Vec2) -> (Vec3, Vec3) {
    let b = uniform_sample_triangle(u);
    (tri.v0 + tri.e1 * b.x + tri.e2 * b.y, tri.geometric_normal())
}
