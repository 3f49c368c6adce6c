pub mod bsdfs;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use crate::{
    intersection::Intersection,
    math::{is_black, Spectrum},
};
use bsdfs::{
    Bsdf, Bxdf, FresnelSpecular, Lambertian, MicrofacetDielectric, MicrofacetDistribution,
    MicrofacetDistributionType, MicrofacetReflection, SpecularReflection,
};

/// Shading model of a [Material].
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
pub enum BsdfKind {
    #[default]
    Diffuse,
    /// Mirror or glossy reflection blended with a diffuse base by `reflective`
    Specular,
    /// Dielectric blended with a diffuse base by `refractive`
    Refractive,
    /// Area light, terminates paths
    Emissive,
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Material {
    pub color: Spectrum,
    /// Phong style exponent, zero means a perfectly smooth surface
    pub specular_exponent: f32,
    pub specular_color: Spectrum,
    /// Weight of the reflective lobe in [0, 1]
    pub reflective: f32,
    /// Weight of the refractive lobe in [0, 1]
    pub refractive: f32,
    pub index_of_refraction: f32,
    pub emittance: Spectrum,
    /// Overrides the renderer's default distribution for rough lobes
    pub distribution: Option<MicrofacetDistributionType>,
    pub bsdf: BsdfKind,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Spectrum::splat(0.2),
            specular_exponent: 0.0,
            specular_color: Spectrum::ZERO,
            reflective: 0.0,
            refractive: 0.0,
            index_of_refraction: 1.0,
            emittance: Spectrum::ZERO,
            distribution: None,
            bsdf: BsdfKind::Diffuse,
        }
    }
}

impl Material {
    pub fn diffuse(color: Spectrum) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn emissive(emittance: Spectrum) -> Self {
        Self {
            color: Spectrum::ONE,
            emittance,
            bsdf: BsdfKind::Emissive,
            ..Self::default()
        }
    }

    /// A pure reflector, glossy if `specular_exponent` is positive
    pub fn mirror(specular_color: Spectrum, specular_exponent: f32) -> Self {
        Self {
            specular_color,
            specular_exponent,
            reflective: 1.0,
            bsdf: BsdfKind::Specular,
            ..Self::default()
        }
    }

    /// A clear dielectric, frosted if `specular_exponent` is positive
    pub fn glass(index_of_refraction: f32, specular_exponent: f32) -> Self {
        Self {
            color: Spectrum::ONE,
            specular_color: Spectrum::ONE,
            specular_exponent,
            refractive: 1.0,
            index_of_refraction,
            bsdf: BsdfKind::Refractive,
            ..Self::default()
        }
    }

    /// Emissive surfaces end paths when hit
    pub fn is_emissive(&self) -> bool {
        self.bsdf == BsdfKind::Emissive
    }

    /// `true` if the surface actually emits and should be sampled as a light
    pub fn is_light(&self) -> bool {
        self.is_emissive() && !is_black(self.emittance)
    }

    /// Emitted radiance. Emitters are two-sided.
    pub fn le(&self) -> Spectrum {
        if self.bsdf == BsdfKind::Emissive {
            self.emittance
        } else {
            Spectrum::ZERO
        }
    }

    fn distribution(&self, default: MicrofacetDistributionType) -> Option<MicrofacetDistribution> {
        if self.specular_exponent > 0.0 {
            Some(MicrofacetDistribution::new(
                self.distribution.unwrap_or(default),
                MicrofacetDistribution::exponent_to_alpha(self.specular_exponent),
            ))
        } else {
            None
        }
    }

    /// Builds the scattering functions at `isect`. Emissive materials get an empty [Bsdf].
    pub fn compute_scattering_functions(
        &self,
        isect: &Intersection,
        default_distribution: MicrofacetDistributionType,
    ) -> Bsdf {
        let mut bsdf = Bsdf::new(isect);
        match self.bsdf {
            BsdfKind::Diffuse => {
                bsdf.add(Bxdf::Lambertian(Lambertian::new(self.color)), 1.0, 1.0);
            }
            BsdfKind::Specular => {
                let w = self.reflective.clamp(0.0, 1.0);
                let lobe = match self.distribution(default_distribution) {
                    Some(distribution) => Bxdf::MicrofacetReflection(MicrofacetReflection::new(
                        self.specular_color,
                        distribution,
                    )),
                    None => Bxdf::SpecularReflection(SpecularReflection::new(self.specular_color)),
                };
                bsdf.add(lobe, w, w);
                bsdf.add(Bxdf::Lambertian(Lambertian::new(self.color)), 1.0 - w, 1.0 - w);
            }
            BsdfKind::Refractive => {
                let w = self.refractive.clamp(0.0, 1.0);
                let ior = self.index_of_refraction.max(1e-3);
                // Indices on the side of the incoming ray and beyond the surface
                let (eta_i, eta_t) = if isect.outside { (1.0, ior) } else { (ior, 1.0) };
                let lobe = match self.distribution(default_distribution) {
                    Some(distribution) => Bxdf::MicrofacetDielectric(MicrofacetDielectric::new(
                        self.specular_color,
                        self.color,
                        distribution,
                        eta_i,
                        eta_t,
                    )),
                    None => Bxdf::FresnelSpecular(FresnelSpecular::new(
                        self.specular_color,
                        self.color,
                        eta_i,
                        eta_t,
                    )),
                };
                bsdf.add(lobe, w, w);
                bsdf.add(Bxdf::Lambertian(Lambertian::new(self.color)), 1.0 - w, 1.0 - w);
            }
            BsdfKind::Emissive => {}
        }
        bsdf
    }
}
