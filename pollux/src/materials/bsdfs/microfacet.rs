use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use super::{
    abs_cos_theta, cos_2_theta, cos_theta, fresnel::fr_dielectric, reflect, refract,
    same_hemisphere, sin_theta, tan_2_theta, tan_theta, BxdfSample, BxdfType,
};
use crate::math::{Spectrum, Vec2, Vec3, PI};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Microfacet_Models#MicrofacetDistributionFunctions
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Microfacet_Models#MaskingandShadowing
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Microfacet_Models#TheTorrancendashSparrowModel
// https://www.pbr-book.org/3ed-2018/Monte_Carlo_Integration/Sampling_Reflection_Functions#MicrofacetBxDFs
// Visible normal sampling for Trowbridge-Reitz from
// Heitz, Sampling the GGX Distribution of Visible Normals, JCGT 2018

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
pub enum MicrofacetDistributionType {
    Beckmann,
    #[default]
    TrowbridgeReitz,
}

/// Isotropic microfacet normal distribution
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MicrofacetDistribution {
    kind: MicrofacetDistributionType,
    alpha: f32,
}

impl MicrofacetDistribution {
    pub fn new(kind: MicrofacetDistributionType, alpha: f32) -> Self {
        Self {
            kind,
            alpha: alpha.max(0.001),
        }
    }

    /// Maps a Phong exponent to the matching Beckmann roughness
    pub fn exponent_to_alpha(exponent: f32) -> f32 {
        (2.0 / (exponent.max(0.0) + 2.0)).sqrt()
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Evaluates the distribution function for the given surface normal
    pub fn d(&self, wh: Vec3) -> f32 {
        let tan_2_theta = tan_2_theta(wh);
        if tan_2_theta.is_infinite() || tan_2_theta.is_nan() {
            return 0.0;
        }

        let alpha_2 = self.alpha * self.alpha;
        let cos_4_theta = cos_2_theta(wh) * cos_2_theta(wh);
        match self.kind {
            MicrofacetDistributionType::Beckmann => {
                (-tan_2_theta / alpha_2).exp() / (PI * alpha_2 * cos_4_theta)
            }
            MicrofacetDistributionType::TrowbridgeReitz => {
                let e = tan_2_theta / alpha_2;
                1.0 / (PI * alpha_2 * cos_4_theta * (1.0 + e) * (1.0 + e))
            }
        }
    }

    /// Evaluates the invisible masked microfacet area per visible microfacet area
    pub fn lambda(&self, w: Vec3) -> f32 {
        let abs_tan_theta = tan_theta(w).abs();
        if abs_tan_theta.is_infinite() || abs_tan_theta.is_nan() {
            return 0.0;
        }

        match self.kind {
            MicrofacetDistributionType::Beckmann => {
                let a = 1.0 / (self.alpha * abs_tan_theta);
                if a >= 1.6 {
                    0.0
                } else {
                    // The rational fit dips below zero just under 1.6
                    ((1.0 - 1.259 * a + 0.396 * a * a) / (3.535 * a + 2.181 * a * a)).max(0.0)
                }
            }
            MicrofacetDistributionType::TrowbridgeReitz => {
                let alpha_2_tan_2_theta = (self.alpha * abs_tan_theta) * (self.alpha * abs_tan_theta);
                (-1.0 + (1.0 + alpha_2_tan_2_theta).sqrt()) / 2.0
            }
        }
    }

    /// Evaluate Smith's masking-shadowing function for the given direction
    pub fn g1(&self, w: Vec3) -> f32 {
        1.0 / (1.0 + self.lambda(w))
    }

    /// Evaluate the fraction of microfacets that are visible from both wo and wi
    pub fn g(&self, wo: Vec3, wi: Vec3) -> f32 {
        1.0 / (1.0 + self.lambda(wo) + self.lambda(wi))
    }

    /// Samples a visible microfacet normal as seen from `wo`, on the side of `wo`
    pub fn sample_wh(&self, wo: Vec3, u: Vec2) -> Vec3 {
        let flip = wo.z < 0.0;
        let wo = if flip { -wo } else { wo };
        let wh = match self.kind {
            MicrofacetDistributionType::Beckmann => beckmann_sample(wo, self.alpha, u),
            MicrofacetDistributionType::TrowbridgeReitz => {
                trowbridge_reitz_sample(wo, self.alpha, u)
            }
        };
        if flip {
            -wh
        } else {
            wh
        }
    }

    /// Density of [`MicrofacetDistribution::sample_wh`] for `wh` on the side of `wo`
    pub fn pdf(&self, wo: Vec3, wh: Vec3) -> f32 {
        let cos_o = abs_cos_theta(wo);
        if cos_o == 0.0 {
            return 0.0;
        }
        self.d(wh) * self.g1(wo) * wo.dot(wh).max(0.0) / cos_o
    }
}

fn trowbridge_reitz_sample(wo: Vec3, alpha: f32, u: Vec2) -> Vec3 {
    // Hemisphere configuration
    let vh = Vec3::new(alpha * wo.x, alpha * wo.y, wo.z).normalize();

    let len_2 = vh.x * vh.x + vh.y * vh.y;
    let t1 = if len_2 > 0.0 {
        Vec3::new(-vh.y, vh.x, 0.0) / len_2.sqrt()
    } else {
        Vec3::X
    };
    let t2 = vh.cross(t1);

    // Projected area of the visible hemisphere
    let r = u.x.sqrt();
    let phi = 2.0 * PI * u.y;
    let t = r * phi.cos();
    let s = 0.5 * (1.0 + vh.z);
    let b = (1.0 - s) * (1.0 - t * t).max(0.0).sqrt() + s * r * phi.sin();

    let nh = t1 * t + t2 * b + vh * (1.0 - t * t - b * b).max(0.0).sqrt();
    Vec3::new(alpha * nh.x, alpha * nh.y, nh.z.max(1e-6)).normalize()
}

fn beckmann_sample(wo: Vec3, alpha: f32, u: Vec2) -> Vec3 {
    let stretched = Vec3::new(alpha * wo.x, alpha * wo.y, wo.z).normalize();

    let (slope_x, slope_y) = beckmann_sample_11(cos_theta(stretched), u);

    let sin_o = sin_theta(stretched);
    let (cos_phi, sin_phi) = if sin_o == 0.0 {
        (1.0, 0.0)
    } else {
        (
            (stretched.x / sin_o).clamp(-1.0, 1.0),
            (stretched.y / sin_o).clamp(-1.0, 1.0),
        )
    };
    let rotated_x = cos_phi * slope_x - sin_phi * slope_y;
    let rotated_y = sin_phi * slope_x + cos_phi * slope_y;

    Vec3::new(-alpha * rotated_x, -alpha * rotated_y, 1.0).normalize()
}

/// Samples the slopes of visible normals for unit roughness and incident angle `cos_theta_o`
fn beckmann_sample_11(cos_theta_o: f32, u: Vec2) -> (f32, f32) {
    if cos_theta_o > 0.9999 {
        let r = (-(1.0 - u.x).ln()).max(0.0).sqrt();
        let phi = 2.0 * PI * u.y;
        return (r * phi.cos(), r * phi.sin());
    }

    let sin_theta_o = (1.0 - cos_theta_o * cos_theta_o).max(0.0).sqrt();
    let tan_theta_o = sin_theta_o / cos_theta_o;
    let cot_theta_o = 1.0 / tan_theta_o;
    let inv_sqrt_pi = 1.0 / PI.sqrt();

    // Invert the slope x cdf with bisection-guarded Newton
    let mut a = -1.0;
    let mut c = erf(cot_theta_o);
    let sample_x = u.x.max(1e-6);
    let theta_o = cos_theta_o.acos();
    let fit = 1.0 + theta_o * (-0.876 + theta_o * (0.4265 - 0.0594 * theta_o));
    let mut b = c - (1.0 + c) * (1.0 - sample_x).powf(fit);
    let normalization =
        1.0 / (1.0 + c + inv_sqrt_pi * tan_theta_o * (-cot_theta_o * cot_theta_o).exp());

    for _ in 0..10 {
        if !(b >= a && b <= c) {
            b = 0.5 * (a + c);
        }
        let inv_erf = erf_inv(b);
        let value = normalization
            * (1.0 + b + inv_sqrt_pi * tan_theta_o * (-inv_erf * inv_erf).exp())
            - sample_x;
        if value.abs() < 1e-5 {
            break;
        }
        let derivative = normalization * (1.0 - inv_erf * tan_theta_o);
        if value > 0.0 {
            c = b;
        } else {
            a = b;
        }
        b -= value / derivative;
    }

    (erf_inv(b), erf_inv(2.0 * u.y.max(1e-6) - 1.0))
}

fn erf(x: f32) -> f32 {
    const A1: f32 = 0.254_829_6;
    const A2: f32 = -0.284_496_74;
    const A3: f32 = 1.421_413_8;
    const A4: f32 = -1.453_152;
    const A5: f32 = 1.061_405_4;
    const P: f32 = 0.327_591_1;

    let sign = x.signum();
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();
    sign * y
}

fn erf_inv(x: f32) -> f32 {
    let x = x.clamp(-0.99999, 0.99999);
    let w = -((1.0 - x) * (1.0 + x)).ln();
    let p = if w < 5.0 {
        let w = w - 2.5;
        [
            3.432_739_4e-7,
            -3.523_387_7e-6,
            -4.391_506_5e-6,
            0.000_218_580_87,
            -0.001_253_725,
            -0.004_177_681_6,
            0.246_640_73,
            1.501_409_4,
        ]
        .iter()
        .fold(2.810_226_4e-8, |p, c| c + p * w)
    } else {
        let w = w.sqrt() - 3.0;
        [
            0.000_100_950_56,
            0.001_349_343_2,
            -0.003_673_428_4,
            0.005_739_507_7,
            -0.007_622_461,
            0.009_438_870_5,
            1.001_674_1,
            2.832_976_8,
        ]
        .iter()
        .fold(-0.000_200_214_26, |p, c| c + p * w)
    };
    p * x
}

/// Rough conductor-like reflection with full reflectance
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MicrofacetReflection {
    r: Spectrum,
    distribution: MicrofacetDistribution,
}

impl MicrofacetReflection {
    pub fn new(r: Spectrum, distribution: MicrofacetDistribution) -> Self {
        Self { r, distribution }
    }

    pub fn f(&self, wo: Vec3, wi: Vec3) -> Spectrum {
        let cos_theta_o = abs_cos_theta(wo);
        let cos_theta_i = abs_cos_theta(wi);
        if cos_theta_i == 0.0 || cos_theta_o == 0.0 || !same_hemisphere(wo, wi) {
            return Spectrum::ZERO;
        }

        let wh = wi + wo;
        if wh == Vec3::ZERO {
            return Spectrum::ZERO;
        }
        let wh = wh.normalize();

        self.r * self.distribution.d(wh) * self.distribution.g(wo, wi)
            / (4.0 * cos_theta_i * cos_theta_o)
    }

    pub fn sample_f(&self, wo: Vec3, u: Vec2) -> BxdfSample {
        // Bsdf n = (0,0,1)
        if wo.z == 0.0 {
            return BxdfSample::default();
        }

        let wh = self.distribution.sample_wh(wo, u);
        if wo.dot(wh) <= 0.0 {
            return BxdfSample::default();
        }

        let wi = reflect(wo, wh);
        if !same_hemisphere(wo, wi) {
            return BxdfSample::default();
        }

        BxdfSample {
            wi,
            f: self.f(wo, wi),
            pdf: self.pdf(wo, wi),
            sample_type: Self::flags(),
        }
    }

    pub fn pdf(&self, wo: Vec3, wi: Vec3) -> f32 {
        if !same_hemisphere(wo, wi) {
            return 0.0;
        }
        let wh = (wo + wi).normalize_or_zero();
        let wo_dot_wh = wo.dot(wh);
        if wo_dot_wh <= 0.0 {
            return 0.0;
        }

        self.distribution.pdf(wo, wh) / (4.0 * wo_dot_wh)
    }

    pub fn flags() -> BxdfType {
        BxdfType::REFLECTION | BxdfType::GLOSSY
    }
}

/// Rough dielectric interface. A sampled microfacet reflects or refracts in proportion to its
/// Fresnel reflectance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MicrofacetDielectric {
    r: Spectrum,
    t: Spectrum,
    distribution: MicrofacetDistribution,
    /// Index on the side of `wo`
    eta_i: f32,
    /// Index on the opposite side
    eta_t: f32,
}

impl MicrofacetDielectric {
    pub fn new(
        r: Spectrum,
        t: Spectrum,
        distribution: MicrofacetDistribution,
        eta_i: f32,
        eta_t: f32,
    ) -> Self {
        Self {
            r,
            t,
            distribution,
            eta_i,
            eta_t,
        }
    }

    fn eta(&self) -> f32 {
        self.eta_t / self.eta_i
    }

    /// Microfacet normal that maps `wo` to `wi`, turned to the side of `wo`
    fn half_vector(&self, wo: Vec3, wi: Vec3) -> Option<Vec3> {
        let wh = if same_hemisphere(wo, wi) {
            wo + wi
        } else {
            wo + wi * self.eta()
        };
        let wh = wh.normalize_or_zero();
        if wh == Vec3::ZERO {
            return None;
        }
        let wh = if same_hemisphere(wo, wh) { wh } else { -wh };
        if wo.dot(wh) <= 0.0 {
            return None;
        }
        // Refraction has to cross the microfacet
        if !same_hemisphere(wo, wi) && wi.dot(wh) >= 0.0 {
            return None;
        }
        Some(wh)
    }

    pub fn f(&self, wo: Vec3, wi: Vec3) -> Spectrum {
        let cos_theta_o = abs_cos_theta(wo);
        let cos_theta_i = abs_cos_theta(wi);
        if cos_theta_i == 0.0 || cos_theta_o == 0.0 {
            return Spectrum::ZERO;
        }
        let wh = match self.half_vector(wo, wi) {
            Some(wh) => wh,
            None => return Spectrum::ZERO,
        };

        let fr = fr_dielectric(wo.dot(wh), self.eta_i, self.eta_t);
        let d = self.distribution.d(wh);
        let g = self.distribution.g(wo, wi);
        if same_hemisphere(wo, wi) {
            self.r * (d * g * fr / (4.0 * cos_theta_i * cos_theta_o))
        } else {
            let eta = self.eta();
            let denom = wo.dot(wh) + eta * wi.dot(wh);
            self.t
                * ((1.0 - fr) * d * g * eta * eta * wi.dot(wh).abs() * wo.dot(wh)
                    / (cos_theta_i * cos_theta_o * denom * denom))
        }
    }

    /// `u_choice` picks between reflection and refraction on the sampled microfacet
    pub fn sample_f(&self, wo: Vec3, u_choice: f32, u: Vec2) -> BxdfSample {
        if wo.z == 0.0 {
            return BxdfSample::default();
        }

        let wh = self.distribution.sample_wh(wo, u);
        let wo_dot_wh = wo.dot(wh);
        if wo_dot_wh <= 0.0 {
            return BxdfSample::default();
        }

        let fr = fr_dielectric(wo_dot_wh, self.eta_i, self.eta_t);
        let (wi, sample_type) = if u_choice < fr {
            let wi = reflect(wo, wh);
            if !same_hemisphere(wo, wi) {
                return BxdfSample::default();
            }
            (wi, BxdfType::REFLECTION | BxdfType::GLOSSY)
        } else {
            let wi = match refract(wo, wh, self.eta_i / self.eta_t) {
                Some(wi) => wi,
                None => return BxdfSample::default(),
            };
            if same_hemisphere(wo, wi) || wi.z == 0.0 {
                return BxdfSample::default();
            }
            (wi, BxdfType::TRANSMISSION | BxdfType::GLOSSY)
        };

        BxdfSample {
            wi,
            f: self.f(wo, wi),
            pdf: self.pdf(wo, wi),
            sample_type,
        }
    }

    pub fn pdf(&self, wo: Vec3, wi: Vec3) -> f32 {
        let wh = match self.half_vector(wo, wi) {
            Some(wh) => wh,
            None => return 0.0,
        };

        let fr = fr_dielectric(wo.dot(wh), self.eta_i, self.eta_t);
        let pdf_wh = self.distribution.pdf(wo, wh);
        if same_hemisphere(wo, wi) {
            pdf_wh * fr / (4.0 * wo.dot(wh))
        } else {
            let eta = self.eta();
            let denom = wo.dot(wh) + eta * wi.dot(wh);
            let dwh_dwi = (eta * eta * wi.dot(wh)).abs() / (denom * denom);
            pdf_wh * (1.0 - fr) * dwh_dwi
        }
    }

    pub fn flags() -> BxdfType {
        BxdfType::REFLECTION | BxdfType::TRANSMISSION | BxdfType::GLOSSY
    }
}
