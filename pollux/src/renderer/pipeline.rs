use std::sync::Arc;

use rayon::prelude::*;

use super::compaction::StreamCompactor;
use crate::{
    camera::{Camera, CameraSample},
    error::Result,
    film::Film,
    integrators::{Integrator, ShadingContext},
    intersection::Intersection,
    math::Vec2,
    pollux_trace,
    ray::Ray,
    sampling::Sampler,
    scene::Scene,
    settings::RenderSettings,
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IterationStats {
    /// Rays intersected against the scene
    pub rays_traced: usize,
    /// Intersect, shade and compact rounds
    pub waves: u32,
}

/// Drives the per-iteration stages over a pool holding one path per pixel.
///
/// Each iteration generates camera rays, then repeats intersect, shade and compact until no
/// path is alive, and finally gathers whatever is left in the pool into the film.
pub struct WavefrontPipeline {
    scene: Arc<Scene>,
    settings: RenderSettings,
    camera: Camera,
    integrator: Box<dyn Integrator>,
    film: Film,
    rays: Vec<Ray>,
    intersections: Vec<Intersection>,
    survivors: Vec<Ray>,
    terminated: Vec<Ray>,
    compactor: StreamCompactor,
    iteration: u32,
    ray_count: usize,
}

impl WavefrontPipeline {
    pub fn new(scene: Arc<Scene>, settings: RenderSettings) -> Result<Self> {
        let film = Film::new(settings.width, settings.height)?;
        let camera = Camera::new(
            scene.camera,
            settings.width,
            settings.height,
            settings.max_depth,
        );
        let pixel_count = camera.pixel_count();
        Ok(Self {
            scene,
            settings,
            camera,
            integrator: settings.integrator.instantiate(),
            film,
            rays: Vec::with_capacity(pixel_count),
            intersections: Vec::with_capacity(pixel_count),
            survivors: Vec::with_capacity(pixel_count),
            terminated: Vec::with_capacity(pixel_count),
            compactor: StreamCompactor::new(),
            iteration: 0,
            ray_count: 0,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn film(&self) -> &Film {
        &self.film
    }

    pub fn into_film(self) -> Film {
        self.film
    }

    /// The current ray pool
    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    /// Intersections of the last intersect stage, parallel to `rays()`
    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    /// Number of finished iterations
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Total rays intersected against the scene
    pub fn ray_count(&self) -> usize {
        self.ray_count
    }

    /// Fills the pool with one camera ray per pixel for the current iteration
    pub fn generate_rays(&mut self) {
        let camera = self.camera;
        let seed = self.settings.seed;
        let iteration = self.iteration;
        let jitter = self.settings.aa_jitter;
        let width = camera.width();

        self.rays.clear();
        self.rays
            .par_extend((0..camera.pixel_count() as u32).into_par_iter().map(|i| {
                let mut sampler = Sampler::new(seed, iteration, i, 0);
                let p_film = (sampler.get_2d() - Vec2::splat(0.5)) * jitter;
                let p_lens = sampler.get_2d();
                camera.generate_ray(i % width, i / width, CameraSample { p_film, p_lens })
            }));
    }

    /// Finds the closest hit for every live ray. Dead rays get the miss sentinel.
    pub fn intersect(&mut self) {
        let scene = &self.scene;
        self.intersections.clear();
        self.intersections
            .par_extend(self.rays.par_iter().map(|ray| {
                if ray.is_alive() {
                    scene.intersect(ray)
                } else {
                    Intersection::miss()
                }
            }));
        self.ray_count += self.rays.par_iter().filter(|r| r.is_alive()).count();
    }

    /// Shades every live ray against its intersection
    pub fn shade(&mut self) -> Result<()> {
        debug_assert_eq!(self.rays.len(), self.intersections.len());

        let ctx = ShadingContext {
            scene: &self.scene,
            max_depth: self.settings.max_depth,
            russian_roulette_depth: self.settings.russian_roulette_depth,
            default_distribution: self.settings.default_distribution,
        };
        let integrator = self.integrator.as_ref();
        let seed = self.settings.seed;
        let iteration = self.iteration;
        let width = self.camera.width();

        self.rays
            .par_iter_mut()
            .zip(self.intersections.par_iter())
            .try_for_each(|(ray, isect)| {
                if !ray.is_alive() {
                    return Ok(());
                }
                let (x, y) = ray.pixel();
                let bounce_slot = ctx.depth(ray) + 1;
                let mut sampler = Sampler::new(seed, iteration, y * width + x, bounce_slot);
                integrator.shade(&ctx, ray, isect, &mut sampler)
            })
    }

    /// Commits finished paths to the film and packs the live ones to the front of the pool.
    /// Without compaction the pool is left as is. Returns the number of live paths.
    pub fn compact(&mut self) -> Result<usize> {
        if !self.settings.compact_rays {
            return Ok(self.rays.par_iter().filter(|r| r.is_alive()).count());
        }

        let alive = self.compactor.compact(
            &self.rays,
            Ray::is_alive,
            &mut self.survivors,
            &mut self.terminated,
        );
        self.film.commit(&self.terminated)?;
        std::mem::swap(&mut self.rays, &mut self.survivors);
        Ok(alive)
    }

    /// Commits everything left in the pool and ends the iteration
    pub fn gather(&mut self) -> Result<()> {
        self.film.commit(&self.rays)?;
        self.rays.clear();
        self.intersections.clear();
        self.iteration += 1;
        Ok(())
    }

    /// Runs one full iteration, adding one sample to every pixel
    pub fn render_iteration(&mut self) -> Result<IterationStats> {
        let start_ray_count = self.ray_count;
        self.generate_rays();

        let mut waves = 0;
        let mut alive = self.rays.iter().filter(|r| r.is_alive()).count();
        // Every wave either consumes a bounce or ends the path
        while alive > 0 && waves <= self.settings.max_depth {
            self.intersect();
            self.shade()?;
            alive = self.compact()?;
            waves += 1;
        }
        self.gather()?;

        let stats = IterationStats {
            rays_traced: self.ray_count - start_ray_count,
            waves,
        };
        pollux_trace!(
            "Iteration {}: {} rays in {} waves",
            self.iteration,
            stats.rays_traced,
            stats.waves
        );
        Ok(stats)
    }
}

/// Renders all configured iterations of `scene` on the calling thread
pub fn render(scene: Arc<Scene>, settings: RenderSettings) -> Result<Film> {
    let mut pipeline = WavefrontPipeline::new(scene, settings)?;
    for _ in 0..settings.iterations {
        pipeline.render_iteration()?;
    }
    Ok(pipeline.into_film())
}
