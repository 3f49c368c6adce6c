use super::{GeomType, Geometry, Scene};
use crate::{
    intersection::{Intersection, NO_PRIMITIVE},
    math::{Spectrum, Vec2, Vec3, ONE_MINUS_EPSILON},
    shapes::{cube, plane, sphere, triangle},
};

/// A point sampled on an emitter as seen from a reference point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightSample {
    pub point: Vec3,
    /// Outward surface normal at `point`
    pub normal: Vec3,
    /// Unit direction from the reference point towards `point`
    pub wi: Vec3,
    pub distance: f32,
    pub emittance: Spectrum,
    /// Solid angle pdf including the choice of emitter
    pub pdf: f32,
}

impl Scene {
    /// Picks an emitter uniformly with `u_light` and samples a point on it uniformly by area.
    /// Returns `None` if there are no emitters or the sample can't reach `reference`.
    pub fn sample_light(&self, reference: Vec3, u_light: f32, u: Vec2) -> Option<LightSample> {
        if self.lights.is_empty() {
            return None;
        }
        let light_count = self.lights.len();
        let scaled = u_light * light_count as f32;
        let light_index = (scaled as usize).min(light_count - 1);
        // Reuse the remainder for discrete choices on the emitter
        let u_remapped = (scaled - light_index as f32).clamp(0.0, ONE_MINUS_EPSILON);

        let geometry = self.geometry.get(self.lights[light_index] as usize)?;
        let (point, normal, area_pdf) = self.sample_area(geometry, u_remapped, u)?;

        let to_light = point - reference;
        let distance_2 = to_light.length_squared();
        if !(distance_2 > 0.0) {
            return None;
        }
        let distance = distance_2.sqrt();
        let wi = to_light / distance;
        // Emitters are two-sided
        let cos_light = normal.dot(wi).abs();
        if cos_light == 0.0 || !(area_pdf > 0.0) {
            return None;
        }

        let emittance = self.materials.get(geometry.material as usize)?.le();
        Some(LightSample {
            point,
            normal,
            wi,
            distance,
            emittance,
            pdf: area_pdf * distance_2 / cos_light / light_count as f32,
        })
    }

    /// Solid angle pdf of [`Scene::sample_light`] producing the point hit by a ray from
    /// `reference`. Zero if the hit surface isn't an emitter.
    pub fn light_pdf(&self, reference: Vec3, isect: &Intersection) -> f32 {
        if !isect.is_hit() || !self.lights.contains(&isect.primitive) {
            return 0.0;
        }
        let geometry = match self.geometry.get(isect.primitive as usize) {
            Some(g) => g,
            None => return 0.0,
        };

        let area_pdf = self.area_pdf(geometry, isect);
        let distance_2 = (isect.point - reference).length_squared();
        let wi = (isect.point - reference).normalize_or_zero();
        let cos_light = isect.geometric_normal.dot(wi).abs();
        if cos_light == 0.0 {
            return 0.0;
        }
        area_pdf * distance_2 / cos_light / self.lights.len() as f32
    }

    /// Samples a world space point on `geometry` uniformly by area. Returns the point, its
    /// normal and the area pdf. Meshes pick the triangle with `u_choice`.
    fn sample_area(
        &self,
        geometry: &Geometry,
        u_choice: f32,
        u: Vec2,
    ) -> Option<(Vec3, Vec3, f32)> {
        let (p_obj, n_obj, pdf_obj) = match geometry.kind {
            GeomType::Sphere => {
                let (p, n) = sphere::sample(u);
                (p, n, sphere::AREA_PDF)
            }
            GeomType::Cube => {
                let (p, n) = cube::sample(u_choice, u);
                (p, n, cube::AREA_PDF)
            }
            GeomType::Plane => {
                let (p, n) = plane::sample(u);
                (p, n, plane::AREA_PDF)
            }
            GeomType::Mesh => {
                let mesh = geometry.mesh?;
                if !(mesh.area > 0.0) {
                    return None;
                }
                // Triangle by area through the running sum of the mesh
                let cdf = self.triangle_area_cdf.get(mesh.triangle_range())?;
                let target = u_choice * mesh.area;
                let offset = cdf.partition_point(|&c| c <= target).min(cdf.len() - 1);
                let tri = self.triangles.get(mesh.first_triangle as usize + offset)?;
                let (p, n) = triangle::sample(tri, u);
                return Some((p, n, 1.0 / mesh.area));
            }
        };

        let (normal, jacobian) = area_jacobian(geometry, n_obj);
        if !(jacobian > 0.0) {
            return None;
        }
        Some((geometry.transform.point(p_obj), normal, pdf_obj / jacobian))
    }

    fn area_pdf(&self, geometry: &Geometry, isect: &Intersection) -> f32 {
        match geometry.kind {
            GeomType::Mesh => match geometry.mesh {
                Some(mesh) if isect.triangle != NO_PRIMITIVE && mesh.area > 0.0 => 1.0 / mesh.area,
                _ => 0.0,
            },
            kind => {
                let n_obj = geometry
                    .transform
                    .inverse_normal(isect.geometric_normal)
                    .normalize_or_zero();
                let (_, jacobian) = area_jacobian(geometry, n_obj);
                if !(jacobian > 0.0) {
                    return 0.0;
                }
                let pdf_obj = match kind {
                    GeomType::Sphere => sphere::AREA_PDF,
                    GeomType::Cube => cube::AREA_PDF,
                    _ => plane::AREA_PDF,
                };
                pdf_obj / jacobian
            }
        }
    }
}

/// Area scale of the local-to-world map at a surface point with object space unit normal
/// `n_obj`: dA_world = |det M| |M^-T n_obj| dA_obj. Also returns the world space unit normal.
fn area_jacobian(geometry: &Geometry, n_obj: Vec3) -> (Vec3, f32) {
    let n_world = geometry.transform.normal(n_obj);
    let len = n_world.length();
    let jacobian = geometry.transform.determinant().abs() * len;
    let normal = if len > 0.0 { n_world / len } else { Vec3::ZERO };
    (normal, jacobian)
}
