#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use pollux::{
        bvh::BvhSettings,
        materials::Material,
        math::{Spectrum, Vec2, Vec3},
        ray::Ray,
        sampling::Sampler,
        scene::{GeometryDesc, Mesh, SceneBuilder, Shape},
    };

    use crate::common::tetrahedron;

    #[test]
    fn no_lights() {
        let mut builder = SceneBuilder::new("dark");
        let m = builder.add_material(Material::diffuse(Spectrum::ONE));
        builder.add_geometry(GeometryDesc::new(Shape::Sphere, m));
        let scene = builder.build(BvhSettings::default()).unwrap();
        assert!(scene.lights.is_empty());
        assert!(scene
            .sample_light(Vec3::new(0.0, 0.0, 5.0), 0.5, Vec2::splat(0.5))
            .is_none());

        let hit = scene.intersect(&Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, (0, 0), 1));
        assert_eq!(scene.light_pdf(Vec3::new(0.0, 0.0, 5.0), &hit), 0.0);
    }

    #[test]
    fn quad_pdf() {
        let mut builder = SceneBuilder::new("quad");
        let light = builder.add_material(Material::emissive(Spectrum::splat(2.0)));
        builder.add_geometry(GeometryDesc::new(Shape::Plane, light).scaled(Vec3::new(2.0, 1.0, 3.0)));
        let scene = builder.build(BvhSettings::default()).unwrap();
        assert_eq!(scene.lights, vec![0]);

        // Seen from below, the back side emits too
        let reference = Vec3::new(0.0, -2.0, 0.0);
        let sample = scene
            .sample_light(reference, 0.3, Vec2::splat(0.5))
            .unwrap();
        assert_abs_diff_eq!(sample.point, Vec3::ZERO, epsilon = 1e-6);
        assert_abs_diff_eq!(sample.wi, Vec3::Y, epsilon = 1e-6);
        assert_abs_diff_eq!(sample.distance, 2.0, epsilon = 1e-6);
        assert_eq!(sample.emittance, Spectrum::splat(2.0));
        // Area 6 at distance 2, head on
        assert_abs_diff_eq!(sample.pdf, 4.0 / 6.0, epsilon = 1e-5);
    }

    #[test]
    fn dark_emitters_are_not_lights() {
        let mut builder = SceneBuilder::new("dark emitter");
        let dark = builder.add_material(Material::emissive(Spectrum::ZERO));
        let light = builder.add_material(Material::emissive(Spectrum::ONE));
        builder
            .add_geometry(GeometryDesc::new(Shape::Sphere, dark))
            .add_geometry(GeometryDesc::new(Shape::Cube, light).translated(Vec3::X * 3.0));
        let scene = builder.build(BvhSettings::default()).unwrap();
        assert_eq!(scene.lights, vec![1]);
    }

    #[test]
    fn sample_pdf_matches_hit_pdf() {
        let mut builder = SceneBuilder::new("lights");
        let light = builder.add_material(Material::emissive(Spectrum::ONE));
        let mesh = builder.add_mesh(tetrahedron());
        builder
            .add_geometry(
                GeometryDesc::new(Shape::Sphere, light)
                    .translated(Vec3::new(-3.0, 0.0, 0.0))
                    .rotated(Vec3::new(20.0, 40.0, 60.0))
                    .scaled(Vec3::new(1.0, 2.5, 0.5)),
            )
            .add_geometry(
                GeometryDesc::new(Shape::Cube, light)
                    .translated(Vec3::new(3.0, 0.0, 0.0))
                    .rotated(Vec3::new(0.0, 30.0, 10.0))
                    .scaled(Vec3::new(0.5, 1.5, 2.0)),
            )
            .add_geometry(
                GeometryDesc::new(Shape::Plane, light)
                    .translated(Vec3::new(0.0, 3.0, 0.0))
                    .rotated(Vec3::new(30.0, 0.0, 0.0))
                    .scaled(Vec3::new(2.0, 1.0, 1.0)),
            )
            .add_geometry(
                GeometryDesc::new(Shape::Mesh(mesh), light)
                    .translated(Vec3::new(0.0, -3.0, 0.0))
                    .scaled(Vec3::new(0.7, 0.5, 1.2)),
            );
        let scene = builder.build(BvhSettings::default()).unwrap();
        assert_eq!(scene.lights.len(), 4);

        let mut sampler = Sampler::new(9, 0, 0, 0);
        let mut checked = 0;
        for reference in [Vec3::new(0.0, 0.0, 6.0), Vec3::new(1.0, -1.0, -5.0)] {
            for _ in 0..2000 {
                let sample = match scene.sample_light(reference, sampler.get_1d(), sampler.get_2d())
                {
                    Some(s) => s,
                    None => continue,
                };
                assert!(sample.pdf > 0.0);
                assert_abs_diff_eq!(sample.normal.length(), 1.0, epsilon = 1e-5);
                assert_abs_diff_eq!(
                    reference + sample.wi * sample.distance,
                    sample.point,
                    epsilon = 1e-4
                );

                let hit = scene.intersect(&Ray::new(reference, sample.wi, (0, 0), 1));
                // Samples on the far side are hidden by the emitter itself
                if !hit.is_hit() || (hit.point - sample.point).length() > 1e-3 {
                    continue;
                }
                let pdf = scene.light_pdf(reference, &hit);
                assert_abs_diff_eq!(pdf, sample.pdf, epsilon = sample.pdf * 2e-3);
                checked += 1;
            }
        }
        assert!(checked > 1000);
    }

    #[test]
    fn mesh_sampled_by_area() {
        // Triangles of area 8 and 0.5 in the y = 0 plane
        let mesh = Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 4.0),
                Vec3::new(5.0, 0.0, 0.0),
                Vec3::new(6.0, 0.0, 0.0),
                Vec3::new(5.0, 0.0, 1.0),
            ],
            Vec::new(),
            vec![0, 1, 2, 3, 4, 5],
        );
        let mut builder = SceneBuilder::new("uneven mesh");
        let light = builder.add_material(Material::emissive(Spectrum::ONE));
        let mesh = builder.add_mesh(mesh);
        builder.add_geometry(GeometryDesc::new(Shape::Mesh(mesh), light));
        let scene = builder.build(BvhSettings::default()).unwrap();
        let area = scene.geometry[0].mesh.unwrap().area;
        assert_abs_diff_eq!(area, 8.5, epsilon = 1e-5);

        let reference = Vec3::new(2.0, 5.0, 2.0);
        let mut sampler = Sampler::new(4, 0, 0, 0);
        let n = 20_000;
        let mut small = 0;
        let mut hits = 0;
        for _ in 0..n {
            let sample = scene
                .sample_light(reference, sampler.get_1d(), sampler.get_2d())
                .unwrap();
            if sample.point.x > 4.5 {
                small += 1;
            }
            // Uniform density over the whole mesh
            let cos_light = sample.wi.y.abs();
            let expected = sample.distance * sample.distance / (cos_light * area);
            assert_abs_diff_eq!(sample.pdf, expected, epsilon = expected * 1e-3);

            let hit = scene.intersect(&Ray::new(reference, sample.wi, (0, 0), 1));
            if hit.is_hit() {
                let pdf = scene.light_pdf(reference, &hit);
                assert_abs_diff_eq!(pdf, sample.pdf, epsilon = sample.pdf * 2e-3);
                hits += 1;
            }
        }
        assert!(hits > n * 99 / 100);
        assert_abs_diff_eq!(small as f32 / n as f32, 0.5 / 8.5, epsilon = 0.01);
    }

    #[test]
    fn light_pdf_of_non_emitter() {
        let mut builder = SceneBuilder::new("mixed");
        let light = builder.add_material(Material::emissive(Spectrum::ONE));
        let diffuse = builder.add_material(Material::diffuse(Spectrum::ONE));
        builder
            .add_geometry(GeometryDesc::new(Shape::Sphere, light).translated(Vec3::Y * 3.0))
            .add_geometry(GeometryDesc::new(Shape::Sphere, diffuse));
        let scene = builder.build(BvhSettings::default()).unwrap();

        let reference = Vec3::new(0.0, 0.0, 5.0);
        let hit = scene.intersect(&Ray::new(reference, -Vec3::Z, (0, 0), 1));
        assert_eq!(hit.primitive, 1);
        assert_eq!(scene.light_pdf(reference, &hit), 0.0);
    }
}
