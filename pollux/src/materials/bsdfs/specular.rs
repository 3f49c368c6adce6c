use super::{abs_cos_theta, fresnel::fr_dielectric, refract};
use super::{BxdfSample, BxdfType};
use crate::math::{Spectrum, Vec3};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Specular_Reflection_and_Transmission

/// Perfect mirror reflection
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpecularReflection {
    r: Spectrum,
}

impl SpecularReflection {
    pub fn new(r: Spectrum) -> Self {
        Self { r }
    }

    pub fn sample_f(&self, wo: Vec3) -> BxdfSample {
        let wi = Vec3::new(-wo.x, -wo.y, wo.z);
        let cos_i = abs_cos_theta(wi);
        if cos_i == 0.0 {
            return BxdfSample::default();
        }
        BxdfSample {
            wi,
            f: self.r / cos_i,
            pdf: 1.0,
            sample_type: Self::flags(),
        }
    }

    pub fn flags() -> BxdfType {
        BxdfType::REFLECTION | BxdfType::SPECULAR
    }
}

/// Smooth dielectric that picks reflection or transmission by Fresnel reflectance
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FresnelSpecular {
    r: Spectrum,
    t: Spectrum,
    /// Index on the side the light leaves towards, i.e. the side of `wo`
    eta_i: f32,
    /// Index on the opposite side
    eta_t: f32,
}

impl FresnelSpecular {
    pub fn new(r: Spectrum, t: Spectrum, eta_i: f32, eta_t: f32) -> Self {
        Self { r, t, eta_i, eta_t }
    }

    /// `u` picks between the reflected and refracted direction
    pub fn sample_f(&self, wo: Vec3, u: f32) -> BxdfSample {
        let cos_o = abs_cos_theta(wo);
        if cos_o == 0.0 {
            return BxdfSample::default();
        }
        let f = fr_dielectric(cos_o, self.eta_i, self.eta_t);
        if u < f {
            let wi = Vec3::new(-wo.x, -wo.y, wo.z);
            BxdfSample {
                wi,
                f: self.r * f / cos_o,
                pdf: f,
                sample_type: BxdfType::REFLECTION | BxdfType::SPECULAR,
            }
        } else {
            let n = if wo.z > 0.0 { Vec3::Z } else { -Vec3::Z };
            let wi = match refract(wo, n, self.eta_i / self.eta_t) {
                Some(wi) => wi,
                None => return BxdfSample::default(),
            };
            let cos_i = abs_cos_theta(wi);
            if cos_i == 0.0 {
                return BxdfSample::default();
            }
            // No 1/eta^2 radiance scaling
            BxdfSample {
                wi,
                f: self.t * (1.0 - f) / cos_i,
                pdf: 1.0 - f,
                sample_type: BxdfType::TRANSMISSION | BxdfType::SPECULAR,
            }
        }
    }

    pub fn flags() -> BxdfType {
        BxdfType::REFLECTION | BxdfType::TRANSMISSION | BxdfType::SPECULAR
    }
}
