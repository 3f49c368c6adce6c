mod fresnel;
mod lambertian;
mod microfacet;
mod specular;

pub use fresnel::fr_dielectric;
pub use lambertian::Lambertian;
pub use microfacet::{
    MicrofacetDielectric, MicrofacetDistribution, MicrofacetDistributionType,
    MicrofacetReflection,
};
pub use specular::{FresnelSpecular, SpecularReflection};

use bitflags::bitflags;

use crate::{
    intersection::Intersection,
    math::{Spectrum, Vec2, Vec3, ONE_MINUS_EPSILON},
};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Materials/BSDFs
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Basic_Interface#BxDF

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct BxdfType: u8 {
        const REFLECTION = 0b00001;
        const TRANSMISSION = 0b00010;
        const DIFFUSE = 0b00100;
        const GLOSSY = 0b01000;
        const SPECULAR = 0b10000;
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BxdfSample {
    pub wi: Vec3,
    pub f: Spectrum,
    pub pdf: f32,
    pub sample_type: BxdfType,
}

impl Default for BxdfSample {
    fn default() -> Self {
        Self {
            wi: Vec3::ZERO,
            f: Spectrum::ZERO,
            pdf: 0.0,
            sample_type: BxdfType::empty(),
        }
    }
}

/// One lobe of a [Bsdf]. Directions are in the local shading frame where the normal is +z.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Bxdf {
    Lambertian(Lambertian),
    SpecularReflection(SpecularReflection),
    FresnelSpecular(FresnelSpecular),
    MicrofacetReflection(MicrofacetReflection),
    MicrofacetDielectric(MicrofacetDielectric),
}

impl Bxdf {
    pub fn flags(&self) -> BxdfType {
        match self {
            Bxdf::Lambertian(_) => Lambertian::flags(),
            Bxdf::SpecularReflection(_) => SpecularReflection::flags(),
            Bxdf::FresnelSpecular(_) => FresnelSpecular::flags(),
            Bxdf::MicrofacetReflection(_) => MicrofacetReflection::flags(),
            Bxdf::MicrofacetDielectric(_) => MicrofacetDielectric::flags(),
        }
    }

    pub fn is_specular(&self) -> bool {
        self.flags().contains(BxdfType::SPECULAR)
    }

    /// Evaluate distribution function for the pair of directions. Zero for delta lobes.
    pub fn f(&self, wo: Vec3, wi: Vec3) -> Spectrum {
        match self {
            Bxdf::Lambertian(b) => b.f(wo, wi),
            Bxdf::MicrofacetReflection(b) => b.f(wo, wi),
            Bxdf::MicrofacetDielectric(b) => b.f(wo, wi),
            Bxdf::SpecularReflection(_) | Bxdf::FresnelSpecular(_) => Spectrum::ZERO,
        }
    }

    pub fn sample_f(&self, wo: Vec3, u_lobe: f32, u: Vec2) -> BxdfSample {
        match self {
            Bxdf::Lambertian(b) => b.sample_f(wo, u),
            Bxdf::SpecularReflection(b) => b.sample_f(wo),
            Bxdf::FresnelSpecular(b) => b.sample_f(wo, u_lobe),
            Bxdf::MicrofacetReflection(b) => b.sample_f(wo, u),
            Bxdf::MicrofacetDielectric(b) => b.sample_f(wo, u_lobe, u),
        }
    }

    /// Zero for delta lobes
    pub fn pdf(&self, wo: Vec3, wi: Vec3) -> f32 {
        match self {
            Bxdf::Lambertian(b) => b.pdf(wo, wi),
            Bxdf::MicrofacetReflection(b) => b.pdf(wo, wi),
            Bxdf::MicrofacetDielectric(b) => b.pdf(wo, wi),
            Bxdf::SpecularReflection(_) | Bxdf::FresnelSpecular(_) => 0.0,
        }
    }
}

const MAX_LOBES: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq)]
struct Lobe {
    bxdf: Bxdf,
    /// Scale of the lobe in the full distribution
    weight: f32,
    /// Probability of sampling the lobe
    selection: f32,
}

/// A weighted collection of lobes at a surface point.
///
/// The distribution is the weighted sum of the lobes. Sampling picks a single lobe by its
/// selection probability. Samples of non-delta lobes are then evaluated against all non-delta
/// lobes so that the pdf stays consistent with [`Bsdf::pdf`].
#[derive(Clone, Debug)]
pub struct Bsdf {
    lobes: [Option<Lobe>; MAX_LOBES],
    n_shading: Vec3,
    n_geom: Vec3,
    s_shading: Vec3,
    t_shading: Vec3,
}

impl Bsdf {
    pub fn new(isect: &Intersection) -> Self {
        Self {
            lobes: [None; MAX_LOBES],
            n_shading: isect.normal,
            n_geom: isect.geometric_normal,
            s_shading: isect.tangent,
            t_shading: isect.bitangent,
        }
    }

    /// Adds `bxdf` into this [`Bsdf`]. Lobes with a non-positive weight are dropped.
    pub fn add(&mut self, bxdf: Bxdf, weight: f32, selection: f32) {
        if !(weight > 0.0) || !(selection > 0.0) {
            return;
        }
        if let Some(slot) = self.lobes.iter_mut().find(|l| l.is_none()) {
            *slot = Some(Lobe {
                bxdf,
                weight,
                selection,
            });
        } else {
            debug_assert!(false, "Too many lobes in Bsdf");
        }
    }

    fn lobes(&self) -> impl Iterator<Item = &Lobe> {
        self.lobes.iter().flatten()
    }

    pub fn num_lobes(&self) -> usize {
        self.lobes().count()
    }

    /// `true` if every lobe is a delta distribution
    pub fn is_specular(&self) -> bool {
        self.lobes().all(|l| l.bxdf.is_specular())
    }

    pub fn has_non_specular(&self) -> bool {
        self.lobes().any(|l| !l.bxdf.is_specular())
    }

    /// Transform `v` from world space to surface local.
    pub fn world_to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            v.dot(self.s_shading),
            v.dot(self.t_shading),
            v.dot(self.n_shading),
        )
    }

    /// Transform `v` from surface local to world space.
    pub fn local_to_world(&self, v: Vec3) -> Vec3 {
        self.s_shading * v.x + self.t_shading * v.y + self.n_shading * v.z
    }

    /// Evaluate distribution function for the pair of world space directions. Delta lobes
    /// don't contribute.
    pub fn f(&self, wo_world: Vec3, wi_world: Vec3) -> Spectrum {
        let wo = self.world_to_local(wo_world);
        let wi = self.world_to_local(wi_world);
        if wo.z == 0.0 {
            return Spectrum::ZERO;
        }
        // Use the geometric normal to decide between reflection and transmission to avoid leaks
        let reflect = wi_world.dot(self.n_geom) * wo_world.dot(self.n_geom) > 0.0;

        self.lobes()
            .filter(|l| {
                let flags = l.bxdf.flags();
                (reflect && flags.contains(BxdfType::REFLECTION))
                    || (!reflect && flags.contains(BxdfType::TRANSMISSION))
            })
            .fold(Spectrum::ZERO, |f, l| f + l.bxdf.f(wo, wi) * l.weight)
    }

    /// Solid angle pdf of sampling `wi_world` from `wo_world` through [`Bsdf::sample_f`]
    pub fn pdf(&self, wo_world: Vec3, wi_world: Vec3) -> f32 {
        let wo = self.world_to_local(wo_world);
        let wi = self.world_to_local(wi_world);
        if wo.z == 0.0 {
            return 0.0;
        }
        let total_selection = self.total_selection();
        if total_selection <= 0.0 {
            return 0.0;
        }
        self.lobes()
            .map(|l| l.bxdf.pdf(wo, wi) * l.selection)
            .sum::<f32>()
            / total_selection
    }

    fn total_selection(&self) -> f32 {
        self.lobes().map(|l| l.selection).sum()
    }

    /// Samples an incident direction for `wo_world`. `u_lobe` picks the lobe and is then reused
    /// for lobes that need a discrete choice of their own. Returns a zero pdf on failure.
    pub fn sample_f(&self, wo_world: Vec3, u_lobe: f32, u: Vec2) -> BxdfSample {
        let wo = self.world_to_local(wo_world);
        if wo.z == 0.0 {
            return BxdfSample::default();
        }

        let total_selection = self.total_selection();
        if total_selection <= 0.0 {
            return BxdfSample::default();
        }

        // Pick the lobe and remap u_lobe into [0, 1) within it
        let target = u_lobe * total_selection;
        let mut cumulative = 0.0;
        let mut chosen = None;
        for lobe in self.lobes() {
            if target < cumulative + lobe.selection {
                let u_remapped = ((target - cumulative) / lobe.selection).min(ONE_MINUS_EPSILON);
                chosen = Some((lobe, u_remapped));
                break;
            }
            cumulative += lobe.selection;
        }
        let (lobe, u_remapped) = match chosen {
            Some(c) => c,
            // Rounding can push the target past the last lobe
            None => match self.lobes().last() {
                Some(l) => (l, ONE_MINUS_EPSILON),
                None => return BxdfSample::default(),
            },
        };

        let sample = lobe.bxdf.sample_f(wo, u_remapped, u);
        if sample.pdf == 0.0 {
            return BxdfSample::default();
        }
        let wi_world = self.local_to_world(sample.wi);

        if lobe.bxdf.is_specular() {
            return BxdfSample {
                wi: wi_world,
                f: sample.f * lobe.weight,
                pdf: sample.pdf * lobe.selection / total_selection,
                sample_type: sample.sample_type,
            };
        }

        let pdf = self.pdf(wo_world, wi_world);
        if pdf == 0.0 {
            return BxdfSample::default();
        }
        BxdfSample {
            wi: wi_world,
            f: self.f(wo_world, wi_world),
            pdf,
            sample_type: sample.sample_type,
        }
    }
}

// Shading frame trigonometry, see
// https://www.pbr-book.org/3ed-2018/Reflection_Models#ReflectionModels

#[inline]
pub fn cos_theta(w: Vec3) -> f32 {
    w.z
}

#[inline]
pub fn abs_cos_theta(w: Vec3) -> f32 {
    w.z.abs()
}

#[inline]
pub fn cos_2_theta(w: Vec3) -> f32 {
    w.z * w.z
}

#[inline]
pub fn sin_2_theta(w: Vec3) -> f32 {
    (1.0 - cos_2_theta(w)).max(0.0)
}

#[inline]
pub fn sin_theta(w: Vec3) -> f32 {
    sin_2_theta(w).sqrt()
}

#[inline]
pub fn tan_theta(w: Vec3) -> f32 {
    sin_theta(w) / cos_theta(w)
}

#[inline]
pub fn tan_2_theta(w: Vec3) -> f32 {
    sin_2_theta(w) / cos_2_theta(w)
}

#[inline]
pub fn same_hemisphere(w: Vec3, wp: Vec3) -> bool {
    w.z * wp.z > 0.0
}

/// Reflects `wo` around `n`
#[inline]
pub fn reflect(wo: Vec3, n: Vec3) -> Vec3 {
    -wo + n * 2.0 * wo.dot(n)
}

/// Refracts `wi` through the surface with normal `n` on the side of `wi`. `eta` is the ratio of
/// the index on the side of `wi` to the index on the other side. Returns `None` on total
/// internal reflection.
pub fn refract(wi: Vec3, n: Vec3, eta: f32) -> Option<Vec3> {
    let cos_theta_i = n.dot(wi);
    let sin_2_theta_i = (1.0 - cos_theta_i * cos_theta_i).max(0.0);
    let sin_2_theta_t = eta * eta * sin_2_theta_i;
    if sin_2_theta_t >= 1.0 {
        return None;
    }
    let cos_theta_t = (1.0 - sin_2_theta_t).sqrt();
    Some(-wi * eta + n * (eta * cos_theta_i - cos_theta_t))
}
