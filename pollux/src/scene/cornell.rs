use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use super::{GeometryDesc, Mesh, Scene, SceneBuilder, Shape};
use crate::{
    bvh::BvhSettings,
    camera::CameraParameters,
    error::Result,
    materials::{bsdfs::MicrofacetDistributionType, Material},
    math::{Spectrum, Vec3},
};

/// Scenes that are constructed in code
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
pub enum BuiltinScene {
    /// Diffuse box with a diffuse sphere
    #[default]
    Cornell,
    /// Mirror sphere and a glossy block
    CornellReflect,
    /// Clear and frosted glass spheres
    CornellRefract,
    /// Smooth shaded triangle mesh under a quad light
    CornellMesh,
}

impl BuiltinScene {
    pub fn builder(self) -> SceneBuilder {
        match self {
            BuiltinScene::Cornell => {
                let (mut builder, m) = cornell_box("cornell", LightShape::Cube);
                builder.add_geometry(
                    GeometryDesc::new(Shape::Sphere, m.white)
                        .translated(Vec3::new(-1.0, 4.0, -1.0))
                        .scaled(Vec3::splat(3.0)),
                );
                builder
            }
            BuiltinScene::CornellReflect => {
                let (mut builder, _) = cornell_box("cornell-reflect", LightShape::Cube);
                let mirror = builder.add_material(Material::mirror(Spectrum::splat(0.98), 0.0));
                let glossy = builder.add_material(Material {
                    color: Spectrum::new(0.35, 0.35, 0.85),
                    reflective: 0.5,
                    ..Material::mirror(Spectrum::splat(0.9), 200.0)
                });
                builder
                    .add_geometry(
                        GeometryDesc::new(Shape::Sphere, mirror)
                            .translated(Vec3::new(-1.5, 3.0, -1.5))
                            .scaled(Vec3::splat(3.0)),
                    )
                    .add_geometry(
                        GeometryDesc::new(Shape::Cube, glossy)
                            .translated(Vec3::new(2.0, 1.5, 1.0))
                            .rotated(Vec3::new(0.0, 30.0, 0.0))
                            .scaled(Vec3::new(2.0, 3.0, 2.0)),
                    );
                builder
            }
            BuiltinScene::CornellRefract => {
                let (mut builder, _) = cornell_box("cornell-refract", LightShape::Cube);
                let glass = builder.add_material(Material::glass(1.5, 0.0));
                let frosted = builder.add_material(Material {
                    distribution: Some(MicrofacetDistributionType::Beckmann),
                    ..Material::glass(1.5, 100.0)
                });
                builder
                    .add_geometry(
                        GeometryDesc::new(Shape::Sphere, glass)
                            .translated(Vec3::new(-1.5, 2.0, 0.0))
                            .scaled(Vec3::splat(3.0)),
                    )
                    .add_geometry(
                        GeometryDesc::new(Shape::Sphere, frosted)
                            .translated(Vec3::new(2.0, 1.5, -1.5))
                            .scaled(Vec3::splat(2.5)),
                    );
                builder
            }
            BuiltinScene::CornellMesh => {
                let (mut builder, m) = cornell_box("cornell-mesh", LightShape::Quad);
                let mesh = builder.add_mesh(octahedron());
                builder.add_geometry(
                    GeometryDesc::new(Shape::Mesh(mesh), m.white)
                        .translated(Vec3::new(0.0, 3.0, -0.5))
                        .rotated(Vec3::new(0.0, 45.0, 0.0))
                        .scaled(Vec3::new(2.0, 3.0, 2.0)),
                );
                builder
            }
        }
    }

    pub fn build(self, bvh_settings: BvhSettings) -> Result<Scene> {
        self.builder().build(bvh_settings)
    }
}

struct CornellMaterials {
    white: u32,
}

enum LightShape {
    Cube,
    Quad,
}

/// A 10 unit box open towards +z, lit from the ceiling
fn cornell_box(name: &str, light: LightShape) -> (SceneBuilder, CornellMaterials) {
    let mut builder = SceneBuilder::new(name);
    builder.camera = CameraParameters {
        position: Vec3::new(0.0, 5.0, 10.5),
        target: Vec3::new(0.0, 5.0, 0.0),
        up: Vec3::Y,
        fov: 45.0,
        lens_radius: 0.0,
        focal_distance: 10.5,
    };

    let light_material = builder.add_material(Material::emissive(Spectrum::splat(5.0)));
    let white = builder.add_material(Material::diffuse(Spectrum::splat(0.98)));
    let red = builder.add_material(Material::diffuse(Spectrum::new(0.85, 0.35, 0.35)));
    let green = builder.add_material(Material::diffuse(Spectrum::new(0.35, 0.85, 0.35)));

    match light {
        LightShape::Cube => builder.add_geometry(
            GeometryDesc::new(Shape::Cube, light_material)
                .translated(Vec3::new(0.0, 10.0, 0.0))
                .scaled(Vec3::new(3.0, 0.3, 3.0)),
        ),
        LightShape::Quad => builder.add_geometry(
            GeometryDesc::new(Shape::Plane, light_material)
                .translated(Vec3::new(0.0, 9.99, 0.0))
                .rotated(Vec3::new(180.0, 0.0, 0.0))
                .scaled(Vec3::new(3.0, 1.0, 3.0)),
        ),
    };

    let walls = [
        // Floor, ceiling, back, left, right
        (Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.01, 10.0), white),
        (Vec3::new(0.0, 10.0, 0.0), Vec3::new(10.0, 0.01, 10.0), white),
        (Vec3::new(0.0, 5.0, -5.0), Vec3::new(10.0, 10.0, 0.01), white),
        (Vec3::new(-5.0, 5.0, 0.0), Vec3::new(0.01, 10.0, 10.0), red),
        (Vec3::new(5.0, 5.0, 0.0), Vec3::new(0.01, 10.0, 10.0), green),
    ];
    for (translation, scale, material) in walls {
        builder.add_geometry(
            GeometryDesc::new(Shape::Cube, material)
                .translated(translation)
                .scaled(scale),
        );
    }

    (builder, CornellMaterials { white })
}

/// Unit octahedron with smooth vertex normals
fn octahedron() -> Mesh {
    let positions = vec![
        Vec3::new(0.5, 0.0, 0.0),
        Vec3::new(-0.5, 0.0, 0.0),
        Vec3::new(0.0, 0.5, 0.0),
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(0.0, 0.0, 0.5),
        Vec3::new(0.0, 0.0, -0.5),
    ];
    let normals = positions.iter().map(|p| p.normalize()).collect();
    #[rustfmt::skip]
    let indices = vec![
        0, 2, 4,
        4, 2, 1,
        1, 2, 5,
        5, 2, 0,
        4, 3, 0,
        1, 3, 4,
        5, 3, 1,
        0, 3, 5,
    ];
    Mesh::new(positions, normals, indices)
}
