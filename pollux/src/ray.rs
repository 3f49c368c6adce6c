use crate::math::{Spectrum, UVec3, Vec3};

/// A path segment in flight through the wavefront.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length for camera and scattered rays
    pub direction: Vec3,
    /// Radiance accumulated along the path so far
    pub color: Spectrum,
    /// Product of the path's BSDF weights
    pub throughput: Spectrum,
    /// Pixel x, pixel y and the remaining bounce budget
    pub idx_bounces: UVec3,
    /// Set when the last scattering event sampled a delta lobe
    pub specular_bounce: bool,
    /// Solid angle pdf of the last scattering event
    pub bsdf_pdf: f32,
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
            color: Spectrum::ZERO,
            throughput: Spectrum::ONE,
            idx_bounces: UVec3::ZERO,
            specular_bounce: false,
            bsdf_pdf: 0.0,
        }
    }
}

impl Ray {
    /// Creates a new camera `Ray` for `pixel` with `bounces` left
    pub fn new(origin: Vec3, direction: Vec3, pixel: (u32, u32), bounces: u32) -> Self {
        Self {
            origin,
            direction,
            idx_bounces: UVec3::new(pixel.0, pixel.1, bounces),
            ..Self::default()
        }
    }

    #[inline]
    pub fn point(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    #[inline]
    pub fn pixel(&self) -> (u32, u32) {
        (self.idx_bounces.x, self.idx_bounces.y)
    }

    #[inline]
    pub fn remaining_bounces(&self) -> u32 {
        self.idx_bounces.z
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.idx_bounces.z > 0
    }

    /// Ends the path, keeping the accumulated color
    #[inline]
    pub fn terminate(&mut self) {
        self.idx_bounces.z = 0;
    }

    /// Continues the path from `origin` towards `direction`, consuming one bounce. Paths with a
    /// degenerate direction are terminated with zero throughput instead.
    pub fn scatter(&mut self, origin: Vec3, direction: Vec3) {
        let len_2 = direction.length_squared();
        if !(len_2 > 0.0) || !len_2.is_finite() || origin.is_nan() {
            self.throughput = Spectrum::ZERO;
            self.terminate();
            return;
        }
        self.origin = origin;
        self.direction = direction / len_2.sqrt();
        self.idx_bounces.z = self.idx_bounces.z.saturating_sub(1);
    }

    pub fn has_nans(&self) -> bool {
        self.origin.is_nan()
            || self.direction.is_nan()
            || self.color.is_nan()
            || self.throughput.is_nan()
    }
}
