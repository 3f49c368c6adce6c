use super::{Transform, Vec3};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Bounding_Boxes.html

/// Axis-aligned bounding box.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3 {
    /// The minimum extent of the bounds.
    pub p_min: Vec3,
    /// The maximum extent of the bounds.
    pub p_max: Vec3,
}

impl Default for Bounds3 {
    /// Creates empty bounds that any union will override
    fn default() -> Self {
        Self {
            p_min: Vec3::splat(f32::MAX),
            p_max: Vec3::splat(f32::MIN),
        }
    }
}

impl Bounds3 {
    /// Creates the tightest bounds that contain both points
    pub fn new(p0: Vec3, p1: Vec3) -> Self {
        Self {
            p_min: p0.min(p1),
            p_max: p0.max(p1),
        }
    }

    pub fn union_b(&self, other: Bounds3) -> Self {
        Self {
            p_min: self.p_min.min(other.p_min),
            p_max: self.p_max.max(other.p_max),
        }
    }

    pub fn union_p(&self, p: Vec3) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }

    #[inline]
    pub fn diagonal(&self) -> Vec3 {
        self.p_max - self.p_min
    }

    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.p_min + self.p_max) * 0.5
    }

    /// Calculates the surface area of this `Bounds3`
    pub fn surface_area(&self) -> f32 {
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.z * d.y + d.x * d.z)
    }

    /// Finds the maximum extent of this `Bounds3`
    #[inline]
    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    pub fn inside(&self, p: Vec3) -> bool {
        p.cmpge(self.p_min).all() && p.cmple(self.p_max).all()
    }

    /// Returns the corner `i` with bit 0 selecting x, bit 1 y and bit 2 z from `p_max`
    pub fn corner(&self, i: usize) -> Vec3 {
        Vec3::new(
            if i & 1 == 0 { self.p_min.x } else { self.p_max.x },
            if i & 2 == 0 { self.p_min.y } else { self.p_max.y },
            if i & 4 == 0 { self.p_min.z } else { self.p_max.z },
        )
    }

    /// Returns the world space bounds of these object space bounds
    pub fn transformed(&self, transform: &Transform) -> Self {
        (0..8).fold(Bounds3::default(), |b, i| {
            b.union_p(transform.point(self.corner(i)))
        })
    }

    /// Slab test for the ray `o + t * d` where `inv_dir` is the component-wise inverse of `d`.
    /// Returns the entry and exit distances if the ray overlaps the box within `[0, t_max)`. The
    /// entry distance is clamped to zero when the origin is inside.
    pub fn intersect(&self, o: Vec3, inv_dir: Vec3, t_max: f32) -> Option<(f32, f32)> {
        let mut t0 = 0.0f32;
        let mut t1 = t_max;
        for i in 0..3 {
            let mut t_near = (self.p_min[i] - o[i]) * inv_dir[i];
            let mut t_far = (self.p_max[i] - o[i]) * inv_dir[i];
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            // NaNs from zero direction components on the slab plane are skipped by min/max
            t0 = t0.max(t_near);
            t1 = t1.min(t_far);
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }
}
