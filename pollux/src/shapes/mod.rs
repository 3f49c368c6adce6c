//! Ray intersection and area sampling for the primitive shapes.
//!
//! Analytic shapes are unit sized in object space and intersected there with the ray mapped by
//! the inverse transform. The object space direction is not renormalized so hit distances stay
//! in world units. Mesh triangles are stored in world space.

pub mod cube;
pub mod plane;
pub mod sphere;
pub mod triangle;

use crate::{
    intersection::{Intersection, NO_PRIMITIVE},
    math::{shading_frame, Bounds3, Vec2, Vec3},
    scene::{CompactTriangle, GeomType, Geometry},
};

/// An object space hit on an analytic shape. `n` faces outward.
#[derive(Copy, Clone, Debug)]
pub struct LocalHit {
    pub t: f32,
    pub n: Vec3,
    pub dpdu: Vec3,
    pub uv: Vec2,
}

/// Object space bounds of an analytic shape
pub fn object_bounds(kind: GeomType) -> Bounds3 {
    match kind {
        GeomType::Plane => Bounds3::new(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 0.0, 0.5)),
        _ => Bounds3::new(Vec3::splat(-0.5), Vec3::splat(0.5)),
    }
}

/// Intersects the world space ray `o + t * d` with an analytic `geometry`, accepting hits in
/// `(EPSILON_T, t_max)`. Meshes never hit here, their triangles are tested individually.
pub fn intersect_geometry(
    geometry: &Geometry,
    geometry_index: u32,
    o: Vec3,
    d: Vec3,
    t_max: f32,
) -> Option<Intersection> {
    let o_obj = geometry.transform.inverse_point(o);
    let d_obj = geometry.transform.inverse_vector(d);
    let hit = match geometry.kind {
        GeomType::Sphere => sphere::intersect(o_obj, d_obj, t_max),
        GeomType::Cube => cube::intersect(o_obj, d_obj, t_max),
        GeomType::Plane => plane::intersect(o_obj, d_obj, t_max),
        GeomType::Mesh => None,
    }?;

    let n = geometry.transform.normal(hit.n).normalize();
    let (tangent, bitangent) = shading_frame(n, geometry.transform.vector(hit.dpdu));
    Some(Intersection {
        point: o + d * hit.t,
        normal: n,
        geometric_normal: n,
        tangent,
        bitangent,
        uv: hit.uv,
        t: hit.t,
        material: geometry.material,
        // The sign of d.n survives the transform since n goes through the inverse transpose
        outside: d_obj.dot(hit.n) < 0.0,
        primitive: geometry_index,
        triangle: NO_PRIMITIVE,
    })
}

/// Intersects the world space ray `o + t * d` with a mesh triangle
pub fn intersect_triangle(
    tri: &CompactTriangle,
    geometry: &Geometry,
    geometry_index: u32,
    triangle_index: u32,
    o: Vec3,
    d: Vec3,
    t_max: f32,
) -> Option<Intersection> {
    let hit = triangle::intersect(tri, o, d, t_max)?;

    let ng = tri.geometric_normal();
    let mut n = tri.interpolated_normal(hit.b1, hit.b2);
    // Keep the shading normal on the outward side of the face
    if n.dot(ng) < 0.0 {
        n = -n;
    }
    let (tangent, bitangent) = shading_frame(n, tri.e1);
    Some(Intersection {
        point: o + d * hit.t,
        normal: n,
        geometric_normal: ng,
        tangent,
        bitangent,
        uv: Vec2::new(hit.b1, hit.b2),
        t: hit.t,
        material: geometry.material,
        outside: d.dot(ng) < 0.0,
        primitive: geometry_index,
        triangle: triangle_index,
    })
}
