mod cornell;
mod geometry;
mod lights;
mod mesh;

pub use cornell::BuiltinScene;
pub use geometry::{GeomType, Geometry, MeshDescriptor};
pub use lights::LightSample;
pub use mesh::{CompactTriangle, Mesh};

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::{
    bvh::{BoundingVolumeHierarchy, BvhSettings, PrimitiveRef},
    camera::CameraParameters,
    error::{Error, Result},
    intersection::{Intersection, NO_PRIMITIVE},
    materials::Material,
    math::{Bounds3, Spectrum, Transform, Vec3, RAY_OFFSET},
    pollux_info,
    ray::Ray,
    shapes::{intersect_geometry, intersect_triangle, object_bounds},
};

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SceneLoadSettings {
    pub scene: BuiltinScene,
    pub bvh: BvhSettings,
}

impl Default for SceneLoadSettings {
    fn default() -> Self {
        Self {
            scene: BuiltinScene::Cornell,
            bvh: BvhSettings::default(),
        }
    }
}

/// What to place and how
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    Sphere,
    Cube,
    Plane,
    /// Index into the builder's meshes
    Mesh(u32),
}

/// Placement of a shape. Rotation is in degrees around x, y and z.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeometryDesc {
    pub shape: Shape,
    pub material: u32,
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl GeometryDesc {
    pub fn new(shape: Shape, material: u32) -> Self {
        Self {
            shape,
            material,
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    pub fn translated(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scaled(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}

/// Collects in-memory scene input for [`Scene::build`].
#[derive(Clone, Debug, Default)]
pub struct SceneBuilder {
    pub name: String,
    pub geometry: Vec<GeometryDesc>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub camera: CameraParameters,
    pub background: Spectrum,
}

impl SceneBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Adds `material`, returns its index
    pub fn add_material(&mut self, material: Material) -> u32 {
        self.materials.push(material);
        (self.materials.len() - 1) as u32
    }

    /// Adds `mesh`, returns its index
    pub fn add_mesh(&mut self, mesh: Mesh) -> u32 {
        self.meshes.push(mesh);
        (self.meshes.len() - 1) as u32
    }

    pub fn add_geometry(&mut self, desc: GeometryDesc) -> &mut Self {
        self.geometry.push(desc);
        self
    }

    pub fn build(self, bvh_settings: BvhSettings) -> Result<Scene> {
        Scene::build(self, bvh_settings)
    }
}

/// Immutable scene buffers, addressed by index.
pub struct Scene {
    pub name: String,
    pub geometry: Vec<Geometry>,
    pub triangles: Vec<CompactTriangle>,
    /// Running surface area of each mesh's triangles, parallel to `triangles`
    pub triangle_area_cdf: Vec<f32>,
    pub materials: Vec<Material>,
    /// Indices of emissive geometry
    pub lights: Vec<u32>,
    pub bvh: BoundingVolumeHierarchy,
    pub camera: CameraParameters,
    pub background: Spectrum,
}

impl Scene {
    /// Validates `builder` and builds the world space triangles, emitter list and BVH
    pub fn build(builder: SceneBuilder, bvh_settings: BvhSettings) -> Result<Self> {
        let build_start = Instant::now();

        for (i, mesh) in builder.meshes.iter().enumerate() {
            mesh.validate(i)?;
        }

        let mut geometry = Vec::with_capacity(builder.geometry.len());
        let mut triangles = Vec::new();
        let mut triangle_area_cdf = Vec::new();
        let mut primitives = Vec::new();
        for (i, desc) in builder.geometry.iter().enumerate() {
            if desc.material as usize >= builder.materials.len() {
                return Err(Error::MaterialOutOfRange {
                    geometry: i,
                    material: desc.material,
                    count: builder.materials.len(),
                });
            }
            let transform = Transform::from_trs(desc.translation, desc.rotation, desc.scale)
                .ok_or(Error::SingularTransform { geometry: i })?;

            let (kind, mesh) = match desc.shape {
                Shape::Sphere => (GeomType::Sphere, None),
                Shape::Cube => (GeomType::Cube, None),
                Shape::Plane => (GeomType::Plane, None),
                Shape::Mesh(mesh_index) => {
                    let mesh =
                        builder
                            .meshes
                            .get(mesh_index as usize)
                            .ok_or(Error::MeshOutOfRange {
                                geometry: i,
                                mesh: mesh_index,
                                count: builder.meshes.len(),
                            })?;
                    let world_triangles = mesh.world_triangles(&transform);
                    let mut area = 0.0;
                    for t in &world_triangles {
                        area += t.area();
                        triangle_area_cdf.push(area);
                    }
                    let descriptor = MeshDescriptor {
                        first_triangle: triangles.len() as u32,
                        triangle_count: world_triangles.len() as u32,
                        bounds: world_triangles
                            .iter()
                            .fold(Bounds3::default(), |b, t| b.union_b(t.bounds())),
                        area,
                    };
                    triangles.extend(world_triangles);
                    (GeomType::Mesh, Some(descriptor))
                }
            };

            match mesh {
                Some(descriptor) => {
                    for t in descriptor.triangle_range() {
                        primitives.push((
                            PrimitiveRef {
                                geometry: i as u32,
                                triangle: t as u32,
                            },
                            triangles[t].bounds(),
                        ));
                    }
                }
                None => primitives.push((
                    PrimitiveRef {
                        geometry: i as u32,
                        triangle: NO_PRIMITIVE,
                    },
                    object_bounds(kind).transformed(&transform),
                )),
            }

            geometry.push(Geometry {
                kind,
                material: desc.material,
                transform,
                mesh,
            });
        }

        let lights = geometry
            .iter()
            .enumerate()
            .filter(|(_, g)| {
                let has_area = g.mesh.map_or(true, |m| m.area > 0.0);
                builder.materials[g.material as usize].is_light() && has_area
            })
            .map(|(i, _)| i as u32)
            .collect::<Vec<_>>();

        let primitive_count = primitives.len();
        let bvh = BoundingVolumeHierarchy::new(primitives, bvh_settings);

        pollux_info!(
            "Scene '{}': {} geometry, {} triangles, {} lights, BVH with {} nodes and depth {} built in {:.2}s",
            builder.name,
            geometry.len(),
            triangles.len(),
            lights.len(),
            bvh.nodes().len(),
            bvh.depth(),
            build_start.elapsed().as_secs_f32()
        );
        debug_assert_eq!(bvh.primitives().len(), primitive_count);

        Ok(Self {
            name: builder.name,
            geometry,
            triangles,
            triangle_area_cdf,
            materials: builder.materials,
            lights,
            bvh,
            camera: builder.camera,
            background: builder.background,
        })
    }

    /// Returns the material of the surface at `isect`
    pub fn material(&self, isect: &Intersection) -> Result<&Material> {
        self.materials
            .get(isect.material as usize)
            .ok_or(Error::MaterialOutOfRange {
                geometry: isect.primitive as usize,
                material: isect.material,
                count: self.materials.len(),
            })
    }

    fn intersect_primitive(
        &self,
        primitive: PrimitiveRef,
        o: Vec3,
        d: Vec3,
        t_max: f32,
    ) -> Option<Intersection> {
        let geometry = self.geometry.get(primitive.geometry as usize)?;
        if primitive.triangle == NO_PRIMITIVE {
            intersect_geometry(geometry, primitive.geometry, o, d, t_max)
        } else {
            let tri = self.triangles.get(primitive.triangle as usize)?;
            intersect_triangle(
                tri,
                geometry,
                primitive.geometry,
                primitive.triangle,
                o,
                d,
                t_max,
            )
        }
    }

    /// Finds the closest hit for `ray` through the BVH. Returns the miss sentinel if nothing
    /// is hit.
    pub fn intersect(&self, ray: &Ray) -> Intersection {
        self.bvh
            .intersect(ray.origin, ray.direction, f32::INFINITY, |p, t_max| {
                self.intersect_primitive(p, ray.origin, ray.direction, t_max)
            })
            .unwrap_or_else(Intersection::miss)
    }

    /// Brute force reference for [`Scene::intersect`]
    pub fn intersect_linear(&self, ray: &Ray) -> Intersection {
        let mut hit = Intersection::miss();
        for &p in self.bvh.primitives() {
            if let Some(new_hit) = self.intersect_primitive(p, ray.origin, ray.direction, hit.t) {
                if new_hit.t < hit.t {
                    hit = new_hit;
                }
            }
        }
        hit
    }

    /// Checks if anything blocks `o + t * d` for `t` in `(EPSILON_T, t_max)`
    pub fn any_hit(&self, o: Vec3, d: Vec3, t_max: f32) -> bool {
        self.bvh.any_hit(o, d, t_max, |p, t_limit| {
            self.intersect_primitive(p, o, d, t_limit).is_some()
        })
    }

    /// Checks if the segment between `p0` and `p1` is free, ignoring a short stretch at `p1`
    pub fn unoccluded(&self, p0: Vec3, p1: Vec3) -> bool {
        let to = p1 - p0;
        let dist = to.length();
        if !(dist > RAY_OFFSET) {
            return true;
        }
        !self.any_hit(p0, to / dist, dist - RAY_OFFSET)
    }
}
