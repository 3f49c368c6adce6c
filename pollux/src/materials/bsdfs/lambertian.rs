use super::{abs_cos_theta, same_hemisphere, BxdfSample, BxdfType};
use crate::{
    math::{Spectrum, Vec2, Vec3, INV_PI},
    sampling::cosine_sample_hemisphere,
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Lambertian {
    r: Spectrum,
}

impl Lambertian {
    pub fn new(r: Spectrum) -> Self {
        Self { r }
    }

    pub fn f(&self, wo: Vec3, wi: Vec3) -> Spectrum {
        if same_hemisphere(wo, wi) {
            self.r * INV_PI
        } else {
            Spectrum::ZERO
        }
    }

    pub fn sample_f(&self, wo: Vec3, u: Vec2) -> BxdfSample {
        let mut wi = cosine_sample_hemisphere(u);
        if wo.z < 0.0 {
            wi.z = -wi.z;
        }
        BxdfSample {
            wi,
            f: self.f(wo, wi),
            pdf: self.pdf(wo, wi),
            sample_type: Self::flags(),
        }
    }

    pub fn pdf(&self, wo: Vec3, wi: Vec3) -> f32 {
        if same_hemisphere(wo, wi) {
            abs_cos_theta(wi) * INV_PI
        } else {
            0.0
        }
    }

    pub fn flags() -> BxdfType {
        BxdfType::REFLECTION | BxdfType::DIFFUSE
    }
}
