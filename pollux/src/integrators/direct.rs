use super::{estimate_direct, sample_continuation, Integrator, ShadingContext};
use crate::{intersection::Intersection, materials::Material, ray::Ray, sampling::Sampler};

/// Direct lighting only. Specular chains are followed until the first surface with a
/// non-specular lobe, which gets a single light sample.
pub struct Direct {}

impl Integrator for Direct {
    fn shade_surface(
        &self,
        ctx: &ShadingContext,
        ray: &mut Ray,
        isect: &Intersection,
        material: &Material,
        sampler: &mut Sampler,
    ) {
        if material.is_emissive() {
            // Emitters seen through non-specular bounces are covered by the light samples
            if ctx.depth(ray) == 0 || ray.specular_bounce {
                ray.color += ray.throughput * material.le();
            }
            ray.terminate();
            return;
        }

        let bsdf = material.compute_scattering_functions(isect, ctx.default_distribution);
        if bsdf.is_specular() {
            sample_continuation(ctx, ray, isect, &bsdf, sampler);
            return;
        }

        let wo = -ray.direction;
        ray.color += ray.throughput * estimate_direct(ctx, isect, &bsdf, wo, sampler, false);
        ray.terminate();
    }
}
