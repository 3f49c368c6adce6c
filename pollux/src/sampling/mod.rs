use rand::{distributions::Standard, Rng};
use rand_pcg::Pcg32;

use crate::math::{Vec2, Vec3, ONE_MINUS_EPSILON, PI};

/// Deterministic per-ray sample source.
///
/// Each (pixel, bounce) pair gets its own pcg stream and the seed is mixed with the iteration
/// index, so results don't depend on how the work is scheduled across threads.
pub struct Sampler {
    rng: Pcg32,
}

impl Sampler {
    /// Creates the `Sampler` for `bounce_slot` of pixel `pixel_index`. Ray generation uses slot 0
    /// and the shading pass at path depth `d` uses slot `d + 1`.
    pub fn new(seed: u64, iteration: u32, pixel_index: u32, bounce_slot: u32) -> Self {
        let state = mix_bits(seed ^ mix_bits(iteration as u64 + 1));
        let stream = ((pixel_index as u64) << 16) | (bounce_slot as u64 & 0xFFFF);
        Self {
            rng: Pcg32::new(state, stream),
        }
    }

    /// Returns a sample in [0, 1)
    pub fn get_1d(&mut self) -> f32 {
        let v: f32 = self.rng.sample(Standard);
        v.min(ONE_MINUS_EPSILON)
    }

    pub fn get_2d(&mut self) -> Vec2 {
        let x = self.get_1d();
        let y = self.get_1d();
        Vec2::new(x, y)
    }
}

// SplitMix64 finalizer
fn mix_bits(mut v: u64) -> u64 {
    v ^= v >> 31;
    v = v.wrapping_mul(0x7fb5_d329_728e_a185);
    v ^= v >> 27;
    v = v.wrapping_mul(0x81da_def4_bc2d_d44d);
    v ^= v >> 33;
    v
}

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Monte_Carlo_Integration/2D_Sampling_with_Multidimensional_Transformations

pub fn cosine_sample_hemisphere(u: Vec2) -> Vec3 {
    let d = concentric_sample_disk(u);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    Vec3::new(d.x, d.y, z)
}

pub fn concentric_sample_disk(u: Vec2) -> Vec2 {
    let offset = u * 2.0 - Vec2::ONE;
    if offset == Vec2::ZERO {
        return Vec2::ZERO;
    }

    let (theta, r) = if offset.x.abs() > offset.y.abs() {
        (
            std::f32::consts::FRAC_PI_4 * (offset.y / offset.x),
            offset.x,
        )
    } else {
        (
            std::f32::consts::FRAC_PI_2 - std::f32::consts::FRAC_PI_4 * (offset.x / offset.y),
            offset.y,
        )
    };

    Vec2::new(theta.cos(), theta.sin()) * r
}

pub fn uniform_sample_sphere(u: Vec2) -> Vec3 {
    let z = 1.0 - 2.0 * u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the barycentric weights of the second and third vertex
pub fn uniform_sample_triangle(u: Vec2) -> Vec2 {
    let su0 = u.x.sqrt();
    Vec2::new(1.0 - su0, u.y * su0)
}

pub fn power_heuristic(nf: u32, f_pdf: f32, ng: u32, g_pdf: f32) -> f32 {
    let f = nf as f32 * f_pdf;
    let g = ng as f32 * g_pdf;
    let denom = f * f + g * g;
    if denom > 0.0 {
        (f * f) / denom
    } else {
        0.0
    }
}
