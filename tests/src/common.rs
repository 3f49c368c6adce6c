use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use pollux::{
    bvh::BvhSettings,
    camera::CameraParameters,
    materials::Material,
    math::{Spectrum, Vec3},
    scene::{GeometryDesc, Mesh, Scene, SceneBuilder, Shape},
};

pub const FLOOR_ALBEDO: f32 = 0.5;
pub const LIGHT_RADIANCE: f32 = 4.0;

/// Irradiance factor at the point under the center of a unit square emitter one unit above
pub fn floor_form_factor() -> f32 {
    // Sum of the four corner rectangles with a = b = c / 2
    let x: f32 = 0.5;
    let s = (1.0 + x * x).sqrt();
    let corner = (2.0 * x / s * (x / s).atan()) / (2.0 * std::f32::consts::PI);
    4.0 * corner
}

/// A large diffuse floor at y = 0 under a downward facing unit square emitter at y = 1. The
/// camera sits between them, looking straight down with a narrow field of view.
pub fn floor_under_light() -> SceneBuilder {
    let mut builder = SceneBuilder::new("floor");
    builder.camera = CameraParameters {
        position: Vec3::new(0.0, 0.5, 0.0),
        target: Vec3::ZERO,
        up: Vec3::Z,
        fov: 2.0,
        lens_radius: 0.0,
        focal_distance: 0.5,
    };
    let light = builder.add_material(Material::emissive(Spectrum::splat(LIGHT_RADIANCE)));
    let floor = builder.add_material(Material::diffuse(Spectrum::splat(FLOOR_ALBEDO)));
    builder
        .add_geometry(
            GeometryDesc::new(Shape::Plane, light)
                .translated(Vec3::new(0.0, 1.0, 0.0))
                .rotated(Vec3::new(180.0, 0.0, 0.0)),
        )
        .add_geometry(GeometryDesc::new(Shape::Plane, floor).scaled(Vec3::new(1000.0, 1.0, 1000.0)));
    builder
}

pub fn tetrahedron() -> Mesh {
    Mesh::new(
        vec![
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
        ],
        Vec::new(),
        vec![0, 1, 2, 0, 3, 1, 0, 2, 3, 1, 3, 2],
    )
}

/// Randomly placed and oriented shapes of every kind inside [-10, 10]^3
pub fn random_scene(seed: u64, count: usize, bvh: BvhSettings) -> Scene {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut builder = SceneBuilder::new("random");
    let material = builder.add_material(Material::diffuse(Spectrum::splat(0.5)));
    let mesh = builder.add_mesh(tetrahedron());

    for i in 0..count {
        let shape = match i % 4 {
            0 => Shape::Sphere,
            1 => Shape::Cube,
            2 => Shape::Plane,
            _ => Shape::Mesh(mesh),
        };
        let translation = Vec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        );
        let rotation = Vec3::new(
            rng.gen_range(0.0..360.0),
            rng.gen_range(0.0..360.0),
            rng.gen_range(0.0..360.0),
        );
        let scale = Vec3::new(
            rng.gen_range(0.2..2.0),
            rng.gen_range(0.2..2.0),
            rng.gen_range(0.2..2.0),
        );
        builder.add_geometry(
            GeometryDesc::new(shape, material)
                .translated(translation)
                .rotated(rotation)
                .scaled(scale),
        );
    }

    builder.build(bvh).unwrap()
}

/// Random unit direction
pub fn random_direction(rng: &mut Pcg32) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let len_2 = v.length_squared();
        if len_2 > 1e-4 && len_2 <= 1.0 {
            return v / len_2.sqrt();
        }
    }
}
