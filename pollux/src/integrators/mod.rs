mod direct;
mod mis;
mod naive;

pub use direct::Direct;
pub use mis::Mis;
pub use naive::Naive;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use crate::{
    error::Result,
    intersection::Intersection,
    materials::{
        bsdfs::{Bsdf, BxdfSample, BxdfType, MicrofacetDistributionType},
        Material,
    },
    math::{is_black, Spectrum, Vec3},
    ray::Ray,
    sampling::{power_heuristic, Sampler},
    scene::Scene,
};

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    Display,
    EnumString,
    EnumVariantNames,
)]
pub enum IntegratorType {
    /// BSDF sampling only
    Naive,
    /// One light sample at the first non-specular hit
    Direct,
    /// Light and BSDF sampling combined with the power heuristic
    #[default]
    Mis,
}

impl IntegratorType {
    pub fn instantiate(self) -> Box<dyn Integrator> {
        match self {
            IntegratorType::Naive => Box::new(Naive {}),
            IntegratorType::Direct => Box::new(Direct {}),
            IntegratorType::Mis => Box::new(Mis {}),
        }
    }
}

/// Shared, read-only inputs of the shading stage
pub struct ShadingContext<'a> {
    pub scene: &'a Scene,
    pub max_depth: u32,
    /// Russian roulette is applied to paths longer than this
    pub russian_roulette_depth: u32,
    pub default_distribution: MicrofacetDistributionType,
}

impl ShadingContext<'_> {
    /// Number of bounces `ray` has taken
    pub fn depth(&self, ray: &Ray) -> u32 {
        self.max_depth.saturating_sub(ray.remaining_bounces())
    }
}

// Public interface for the per-hit shading strategies.
pub trait Integrator: Send + Sync {
    /// Shades a surface hit of a live `ray`. Has to either terminate the ray or scatter it,
    /// consuming a bounce.
    fn shade_surface(
        &self,
        ctx: &ShadingContext,
        ray: &mut Ray,
        isect: &Intersection,
        material: &Material,
        sampler: &mut Sampler,
    );

    /// Accumulates the contribution at `isect` into `ray` and continues or terminates it.
    /// Rays with no bounces left are left untouched.
    fn shade(
        &self,
        ctx: &ShadingContext,
        ray: &mut Ray,
        isect: &Intersection,
        sampler: &mut Sampler,
    ) -> Result<()> {
        if !ray.is_alive() {
            return Ok(());
        }

        if !isect.is_hit() {
            ray.color += ray.throughput * ctx.scene.background;
            ray.terminate();
            return Ok(());
        }

        let material = ctx.scene.material(isect)?;
        self.shade_surface(ctx, ray, isect, material, sampler);
        Ok(())
    }
}

/// Continues `ray` in a direction sampled from `bsdf`, applying Russian roulette afterwards.
/// Returns `false` if the path ended.
pub fn sample_continuation(
    ctx: &ShadingContext,
    ray: &mut Ray,
    isect: &Intersection,
    bsdf: &Bsdf,
    sampler: &mut Sampler,
) -> bool {
    let wo = -ray.direction;
    let u_lobe = sampler.get_1d();
    let u = sampler.get_2d();
    let BxdfSample {
        wi,
        f,
        pdf,
        sample_type,
    } = bsdf.sample_f(wo, u_lobe, u);

    if !(pdf > 0.0) || !pdf.is_finite() || is_black(f) {
        ray.terminate();
        return false;
    }

    let weight = f * wi.dot(isect.normal).abs() / pdf;
    if !weight.is_finite() {
        ray.throughput = Spectrum::ZERO;
        ray.terminate();
        return false;
    }

    ray.throughput *= weight;
    ray.specular_bounce = sample_type.contains(BxdfType::SPECULAR);
    ray.bsdf_pdf = pdf;
    ray.scatter(isect.spawn_origin(wi), wi);

    if ray.is_alive() {
        russian_roulette(ctx, ray, sampler);
    }
    ray.is_alive()
}

/// Randomly ends low throughput paths past the configured depth, rescaling the survivors
pub fn russian_roulette(ctx: &ShadingContext, ray: &mut Ray, sampler: &mut Sampler) {
    if ctx.depth(ray) <= ctx.russian_roulette_depth {
        return;
    }
    let q = (1.0 - ray.throughput.max_element()).clamp(0.0, 0.95);
    if q > 0.0 {
        if sampler.get_1d() < q {
            ray.terminate();
        } else {
            ray.throughput /= 1.0 - q;
        }
    }
}

/// Estimates direct lighting at `isect` from a single emitter sample. With `mis` the sample is
/// weighted against the BSDF pdf using the power heuristic.
pub fn estimate_direct(
    ctx: &ShadingContext,
    isect: &Intersection,
    bsdf: &Bsdf,
    wo: Vec3,
    sampler: &mut Sampler,
    mis: bool,
) -> Spectrum {
    let u_light = sampler.get_1d();
    let u = sampler.get_2d();
    let light = match ctx.scene.sample_light(isect.point, u_light, u) {
        Some(light) => light,
        None => return Spectrum::ZERO,
    };
    if !(light.pdf > 0.0) || is_black(light.emittance) {
        return Spectrum::ZERO;
    }

    let f = bsdf.f(wo, light.wi) * light.wi.dot(isect.normal).abs();
    if is_black(f) {
        return Spectrum::ZERO;
    }
    if !ctx
        .scene
        .unoccluded(isect.spawn_origin(light.wi), light.point)
    {
        return Spectrum::ZERO;
    }

    let weight = if mis {
        power_heuristic(1, light.pdf, 1, bsdf.pdf(wo, light.wi))
    } else {
        1.0
    };
    f * light.emittance * weight / light.pdf
}
