use std::path::Path;

use crate::{
    error::{Error, Result},
    math::Spectrum,
    pollux_info,
    ray::Ray,
};

/// Per-pixel running radiance sum and sample count. Pixels are stored row-major.
#[derive(Clone, Debug)]
pub struct Film {
    width: u32,
    height: u32,
    sums: Vec<Spectrum>,
    counts: Vec<u32>,
}

impl Film {
    /// Creates a new `Film`. Both dimensions have to be non-zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidResolution { width, height });
        }
        let pixel_count = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            sums: vec![Spectrum::ZERO; pixel_count],
            counts: vec![0; pixel_count],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self) {
        self.sums.fill(Spectrum::ZERO);
        self.counts.fill(0);
    }

    fn index(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::PixelOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    /// Accumulates one sample into pixel (`x`, `y`)
    pub fn add_sample(&mut self, x: u32, y: u32, color: Spectrum) -> Result<()> {
        let i = self.index(x, y)?;
        self.sums[i] += color;
        self.counts[i] += 1;
        Ok(())
    }

    /// Accumulates the colors of finished `rays` into their pixels
    pub fn commit(&mut self, rays: &[Ray]) -> Result<()> {
        for ray in rays {
            let (x, y) = ray.pixel();
            self.add_sample(x, y, ray.color)?;
        }
        Ok(())
    }

    pub fn sample_count(&self, x: u32, y: u32) -> Result<u32> {
        Ok(self.counts[self.index(x, y)?])
    }

    /// Average radiance of pixel (`x`, `y`), zero if it has no samples
    pub fn pixel(&self, x: u32, y: u32) -> Result<Spectrum> {
        let i = self.index(x, y)?;
        Ok(self.average(i))
    }

    fn average(&self, i: usize) -> Spectrum {
        match self.counts[i] {
            0 => Spectrum::ZERO,
            n => self.sums[i] / n as f32,
        }
    }

    /// Averaged pixels, row-major
    pub fn image(&self) -> Vec<Spectrum> {
        (0..self.sums.len()).map(|i| self.average(i)).collect()
    }

    pub fn write_exr(&self, path: &Path) -> Result<()> {
        pollux_info!("Writing out EXR");
        let pixels = self.image();
        let width = self.width as usize;
        exr::prelude::write_rgb_file(path, width, self.height as usize, |x, y| {
            let px = pixels[y * width + x];
            (px.x, px.y, px.z)
        })?;
        pollux_info!("EXR written to '{}'", path.to_string_lossy());
        Ok(())
    }
}
