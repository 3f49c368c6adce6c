use serde::{Deserialize, Serialize};

use crate::{
    math::{Vec2, Vec3, Vec4},
    ray::Ray,
    sampling::concentric_sample_disk,
};

/// Values needed to specify a camera ray
#[derive(Copy, Clone, Debug, Default)]
pub struct CameraSample {
    /// Offset from the pixel center in pixels
    pub p_film: Vec2,
    /// Lens sample in [0, 1)^2
    pub p_lens: Vec2,
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraParameters {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Zero for a pinhole camera
    pub lens_radius: f32,
    pub focal_distance: f32,
}

impl Default for CameraParameters {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 45.0,
            lens_radius: 0.0,
            focal_distance: 1.0,
        }
    }
}

/// A thin lens camera with an orthonormal view basis
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// Width, height, vertical fov in degrees and max path depth
    pub data: Vec4,
    pub position: Vec3,
    pub look_at: Vec3,
    pub view: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub lens_radius: f32,
    pub focal_distance: f32,
    /// World space extent of a pixel on the plane one unit along `view`
    pub pixel_length: Vec2,
}

impl Camera {
    /// Creates a new `Camera` for a `width` x `height` image
    pub fn new(params: CameraParameters, width: u32, height: u32, max_depth: u32) -> Self {
        let view = (params.target - params.position).normalize_or_zero();
        let view = if view == Vec3::ZERO { -Vec3::Z } else { view };
        let right = {
            let r = view.cross(params.up).normalize_or_zero();
            if r == Vec3::ZERO {
                view.any_orthonormal_vector()
            } else {
                r
            }
        };
        let up = right.cross(view);

        let w = width as f32;
        let h = height as f32;
        let y_scale = (params.fov.to_radians() / 2.0).tan();
        let x_scale = y_scale * w / h;
        Self {
            data: Vec4::new(w, h, params.fov, max_depth as f32),
            position: params.position,
            look_at: params.target,
            view,
            right,
            up,
            lens_radius: params.lens_radius.max(0.0),
            focal_distance: params.focal_distance,
            pixel_length: Vec2::new(2.0 * x_scale / w, 2.0 * y_scale / h),
        }
    }

    pub fn width(&self) -> u32 {
        self.data.x as u32
    }

    pub fn height(&self) -> u32 {
        self.data.y as u32
    }

    pub fn max_depth(&self) -> u32 {
        self.data.w as u32
    }

    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Generates the primary ray for pixel (`x`, `y`). Pixel rows go down the image.
    pub fn generate_ray(&self, x: u32, y: u32, sample: CameraSample) -> Ray {
        let px = x as f32 + 0.5 + sample.p_film.x - self.data.x * 0.5;
        let py = y as f32 + 0.5 + sample.p_film.y - self.data.y * 0.5;
        let mut direction = (self.view + self.right * (self.pixel_length.x * px)
            - self.up * (self.pixel_length.y * py))
            .normalize();
        let mut origin = self.position;

        if self.lens_radius > 0.0 {
            let p_lens = concentric_sample_disk(sample.p_lens) * self.lens_radius;
            // Point on the plane of focus
            let ft = self.focal_distance / direction.dot(self.view);
            let p_focus = self.position + direction * ft;
            origin = self.position + self.right * p_lens.x + self.up * p_lens.y;
            direction = (p_focus - origin).normalize();
        }

        Ray::new(origin, direction, (x, y), self.max_depth())
    }
}
