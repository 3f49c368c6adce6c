use super::{estimate_direct, sample_continuation, Integrator, ShadingContext};
use crate::{
    intersection::Intersection,
    materials::Material,
    ray::Ray,
    sampling::{power_heuristic, Sampler},
};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Light_Transport_I_Surface_Reflection/Path_Tracing

/// Next event estimation at every non-specular hit plus BSDF continuation. Emitters hit by the
/// continuation are weighted against the light sampling pdf.
pub struct Mis {}

impl Integrator for Mis {
    fn shade_surface(
        &self,
        ctx: &ShadingContext,
        ray: &mut Ray,
        isect: &Intersection,
        material: &Material,
        sampler: &mut Sampler,
    ) {
        if material.is_emissive() {
            let le = material.le();
            if ctx.depth(ray) == 0 || ray.specular_bounce {
                ray.color += ray.throughput * le;
            } else {
                // The ray still starts from the previous hit
                let light_pdf = ctx.scene.light_pdf(ray.origin, isect);
                let weight = power_heuristic(1, ray.bsdf_pdf, 1, light_pdf);
                ray.color += ray.throughput * le * weight;
            }
            ray.terminate();
            return;
        }

        let bsdf = material.compute_scattering_functions(isect, ctx.default_distribution);
        if bsdf.has_non_specular() {
            let wo = -ray.direction;
            ray.color += ray.throughput * estimate_direct(ctx, isect, &bsdf, wo, sampler, true);
        }

        sample_continuation(ctx, ray, isect, &bsdf, sampler);
    }
}
