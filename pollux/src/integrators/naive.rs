use super::{sample_continuation, Integrator, ShadingContext};
use crate::{intersection::Intersection, materials::Material, ray::Ray, sampling::Sampler};

/// Pure BSDF sampling. Light is only picked up when a path happens to hit an emitter.
pub struct Naive {}

impl Integrator for Naive {
    fn shade_surface(
        &self,
        ctx: &ShadingContext,
        ray: &mut Ray,
        isect: &Intersection,
        material: &Material,
        sampler: &mut Sampler,
    ) {
        if material.is_emissive() {
            ray.color += ray.throughput * material.le();
            ray.terminate();
            return;
        }

        let bsdf = material.compute_scattering_functions(isect, ctx.default_distribution);
        sample_continuation(ctx, ray, isect, &bsdf, sampler);
    }
}
