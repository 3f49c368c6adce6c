#[cfg(test)]
mod tests {
    use strum::VariantNames;

    use pollux::{
        bvh::BvhSettings,
        intersection::Intersection,
        materials::Material,
        math::{Spectrum, Vec3},
        scene::{BuiltinScene, GeomType, GeometryDesc, Mesh, SceneBuilder, Shape},
        Error,
    };

    use crate::common::tetrahedron;

    fn builder_with_material() -> SceneBuilder {
        let mut builder = SceneBuilder::new("test");
        builder.add_material(Material::diffuse(Spectrum::ONE));
        builder
    }

    #[test]
    fn material_out_of_range() {
        let mut builder = builder_with_material();
        builder
            .add_geometry(GeometryDesc::new(Shape::Sphere, 0))
            .add_geometry(GeometryDesc::new(Shape::Cube, 3));
        assert!(matches!(
            builder.build(BvhSettings::default()),
            Err(Error::MaterialOutOfRange {
                geometry: 1,
                material: 3,
                count: 1
            })
        ));
    }

    #[test]
    fn mesh_out_of_range() {
        let mut builder = builder_with_material();
        builder.add_geometry(GeometryDesc::new(Shape::Mesh(0), 0));
        assert!(matches!(
            builder.build(BvhSettings::default()),
            Err(Error::MeshOutOfRange {
                geometry: 0,
                mesh: 0,
                count: 0
            })
        ));
    }

    #[test]
    fn malformed_meshes() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];

        let mut builder = builder_with_material();
        builder.add_mesh(Mesh::new(positions.clone(), Vec::new(), vec![0, 1]));
        assert!(matches!(
            builder.build(BvhSettings::default()),
            Err(Error::MalformedMesh {
                mesh: 0,
                indices: 2
            })
        ));

        let mut builder = builder_with_material();
        builder.add_mesh(Mesh::new(positions.clone(), Vec::new(), vec![0, 1, 3]));
        assert!(matches!(
            builder.build(BvhSettings::default()),
            Err(Error::VertexOutOfRange {
                mesh: 0,
                index: 3,
                count: 3
            })
        ));

        let mut builder = builder_with_material();
        builder.add_mesh(Mesh::new(positions, vec![Vec3::Z], vec![0, 1, 2]));
        assert!(matches!(
            builder.build(BvhSettings::default()),
            Err(Error::NormalCountMismatch {
                mesh: 0,
                normals: 1,
                positions: 3
            })
        ));
    }

    #[test]
    fn singular_transform() {
        let mut builder = builder_with_material();
        builder.add_geometry(GeometryDesc::new(Shape::Sphere, 0).scaled(Vec3::new(1.0, 0.0, 1.0)));
        assert!(matches!(
            builder.build(BvhSettings::default()),
            Err(Error::SingularTransform { geometry: 0 })
        ));
    }

    #[test]
    fn build() {
        let mut builder = builder_with_material();
        let light = builder.add_material(Material::emissive(Spectrum::ONE));
        let mesh = builder.add_mesh(tetrahedron());
        builder
            .add_geometry(GeometryDesc::new(Shape::Mesh(mesh), 0))
            .add_geometry(GeometryDesc::new(Shape::Sphere, light).translated(Vec3::Y * 4.0))
            .add_geometry(
                GeometryDesc::new(Shape::Mesh(mesh), light).translated(Vec3::X * 4.0),
            );
        let scene = builder.build(BvhSettings::default()).unwrap();

        assert_eq!(scene.name, "test");
        assert_eq!(scene.geometry.len(), 3);
        assert_eq!(scene.triangles.len(), 8);
        assert_eq!(scene.lights, vec![1, 2]);
        // Two meshes of four triangles plus the sphere
        assert_eq!(scene.bvh.primitives().len(), 9);

        assert_eq!(scene.geometry[0].kind, GeomType::Mesh);
        let first = scene.geometry[0].mesh.unwrap();
        let second = scene.geometry[2].mesh.unwrap();
        assert_eq!(first.triangle_range(), 0..4);
        assert_eq!(second.triangle_range(), 4..8);
        assert!(scene.geometry[1].mesh.is_none());
        // World space triangles
        assert!(second.bounds.p_min.x >= 3.0 - 1e-5);
        assert!(scene.triangles[4..]
            .iter()
            .all(|t| t.vertices().iter().all(|v| v.x >= 3.0 - 1e-5)));
    }

    #[test]
    fn material_lookup() {
        let mut builder = builder_with_material();
        builder.add_geometry(GeometryDesc::new(Shape::Sphere, 0));
        let scene = builder.build(BvhSettings::default()).unwrap();

        let hit = Intersection {
            primitive: 0,
            material: 0,
            ..Intersection::miss()
        };
        assert!(scene.material(&hit).is_ok());
        let bad = Intersection {
            primitive: 0,
            material: 5,
            ..Intersection::miss()
        };
        assert!(matches!(
            scene.material(&bad),
            Err(Error::MaterialOutOfRange { material: 5, .. })
        ));
    }

    #[test]
    fn occlusion() {
        let mut builder = builder_with_material();
        builder.add_geometry(GeometryDesc::new(Shape::Sphere, 0));
        let scene = builder.build(BvhSettings::default()).unwrap();

        assert!(!scene.unoccluded(Vec3::new(0.0, 0.0, -2.0), Vec3::new(0.0, 0.0, 2.0)));
        assert!(scene.unoccluded(Vec3::new(1.0, 0.0, -2.0), Vec3::new(1.0, 0.0, 2.0)));
        // Ending on the surface doesn't count as blocked
        assert!(scene.unoccluded(Vec3::new(0.0, 0.0, -2.0), Vec3::new(0.0, 0.0, -0.5)));
        assert!(scene.any_hit(Vec3::new(0.0, 0.0, -2.0), Vec3::Z, 2.0));
        assert!(!scene.any_hit(Vec3::new(0.0, 0.0, -2.0), Vec3::Z, 1.0));
    }

    #[test]
    fn empty_scene() {
        let scene = SceneBuilder::new("empty")
            .build(BvhSettings::default())
            .unwrap();
        assert!(scene.bvh.is_empty());
        assert!(scene.lights.is_empty());
        let ray = pollux::ray::Ray::new(Vec3::ZERO, Vec3::Z, (0, 0), 1);
        assert!(!scene.intersect(&ray).is_hit());
        assert!(scene.unoccluded(Vec3::ZERO, Vec3::ONE));
    }

    #[test]
    fn builtin_scenes() {
        assert_eq!(BuiltinScene::VARIANTS.len(), 4);
        for name in BuiltinScene::VARIANTS {
            let kind: BuiltinScene = name.parse().unwrap();
            let scene = kind.build(BvhSettings::default()).unwrap();
            assert_eq!(scene.lights.len(), 1, "{}", name);
            assert!(!scene.bvh.is_empty());

            // Looking at the back wall through the box
            let ray = pollux::ray::Ray::new(scene.camera.position, -Vec3::Z, (0, 0), 1);
            let hit = scene.intersect(&ray);
            assert!(hit.is_hit(), "{}", name);
            assert!(hit.point.z > -5.1 && hit.point.z < 5.0, "{}", name);
        }
        let mesh_scene = BuiltinScene::CornellMesh
            .build(BvhSettings::default())
            .unwrap();
        assert_eq!(mesh_scene.triangles.len(), 8);
    }
}
