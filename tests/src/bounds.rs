#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use pollux::math::{Bounds3, Transform, Vec3};

    #[test]
    fn new() {
        let bb = Bounds3::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(bb.p_min, Vec3::ZERO);
        assert_eq!(bb.p_max, Vec3::ONE);
        let bb = Bounds3::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(bb.p_min, Vec3::ZERO);
        assert_eq!(bb.p_max, Vec3::ONE);
        let bb = Bounds3::new(Vec3::new(1.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(bb.p_min, Vec3::ZERO);
        assert_eq!(bb.p_max, Vec3::ONE);
    }

    #[test]
    fn default() {
        let bb = Bounds3::default();
        assert!(bb.is_empty());
        for i in 0..3 {
            assert_eq!(bb.p_max[i], f32::MIN);
            assert_eq!(bb.p_min[i], f32::MAX);
        }
        let p = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(bb.union_p(p), Bounds3::new(p, p));
    }

    #[test]
    fn union_p() {
        let bb = Bounds3::new(Vec3::ZERO, Vec3::splat(2.0));
        assert_eq!(bb.union_p(Vec3::ONE), bb);
        assert_eq!(
            bb.union_p(Vec3::new(3.0, 1.0, 1.0)),
            Bounds3::new(Vec3::ZERO, Vec3::new(3.0, 2.0, 2.0))
        );
        assert_eq!(
            bb.union_p(Vec3::new(-3.0, -4.0, -5.0)),
            Bounds3::new(Vec3::new(-3.0, -4.0, -5.0), Vec3::splat(2.0))
        );
    }

    #[test]
    fn union_b() {
        let bb = Bounds3::new(Vec3::ZERO, Vec3::splat(2.0));
        assert_eq!(bb.union_b(Bounds3::new(Vec3::ONE, Vec3::ONE)), bb);
        assert_eq!(
            bb.union_b(Bounds3::new(Vec3::splat(-1.0), Vec3::new(1.0, 3.0, 1.0))),
            Bounds3::new(Vec3::splat(-1.0), Vec3::new(2.0, 3.0, 2.0))
        );
        assert_eq!(bb.union_b(Bounds3::default()), bb);
    }

    #[test]
    fn measures() {
        let bb = Bounds3::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(bb.diagonal(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(bb.centroid(), Vec3::new(1.5, 3.0, 4.5));
        assert_eq!(bb.surface_area(), 2.0 * (2.0 + 6.0 + 3.0));
        assert_eq!(bb.maximum_extent(), 2);
        assert_eq!(
            Bounds3::new(Vec3::ZERO, Vec3::new(3.0, 2.0, 1.0)).maximum_extent(),
            0
        );
        assert_eq!(
            Bounds3::new(Vec3::ZERO, Vec3::new(1.0, 3.0, 2.0)).maximum_extent(),
            1
        );
    }

    #[test]
    fn inside() {
        let bb = Bounds3::new(Vec3::ZERO, Vec3::ONE);
        assert!(bb.inside(Vec3::splat(0.5)));
        assert!(bb.inside(Vec3::ZERO));
        assert!(bb.inside(Vec3::ONE));
        assert!(!bb.inside(Vec3::new(0.5, 1.5, 0.5)));
        assert!(!bb.inside(Vec3::new(-0.1, 0.5, 0.5)));
    }

    #[test]
    fn corner() {
        let bb = Bounds3::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(bb.corner(0), Vec3::ZERO);
        assert_eq!(bb.corner(1), Vec3::X);
        assert_eq!(bb.corner(2), Vec3::Y);
        assert_eq!(bb.corner(4), Vec3::Z);
        assert_eq!(bb.corner(7), Vec3::ONE);
    }

    #[test]
    fn transformed() {
        let bb = Bounds3::new(Vec3::splat(-0.5), Vec3::splat(0.5));
        let t = Transform::from_trs(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 90.0, 0.0),
            Vec3::new(2.0, 1.0, 4.0),
        )
        .unwrap();
        let tb = bb.transformed(&t);
        // x and z extents swap under the rotation
        assert_abs_diff_eq!(tb.p_min, Vec3::new(-1.0, 1.5, 2.0), epsilon = 1e-5);
        assert_abs_diff_eq!(tb.p_max, Vec3::new(3.0, 2.5, 4.0), epsilon = 1e-5);
    }

    #[test]
    fn intersect() {
        let bb = Bounds3::new(Vec3::splat(-1.0), Vec3::ONE);
        let o = Vec3::new(0.0, 0.0, -5.0);
        let d = Vec3::Z;
        let (t0, t1) = bb.intersect(o, d.recip(), f32::INFINITY).unwrap();
        assert_abs_diff_eq!(t0, 4.0);
        assert_abs_diff_eq!(t1, 6.0);

        // Limited by t_max
        assert!(bb.intersect(o, d.recip(), 3.0).is_none());
        let (_, t1) = bb.intersect(o, d.recip(), 5.0).unwrap();
        assert_abs_diff_eq!(t1, 5.0);

        // Behind the origin
        assert!(bb.intersect(o, (-d).recip(), f32::INFINITY).is_none());

        // Origin inside
        let (t0, t1) = bb.intersect(Vec3::ZERO, d.recip(), f32::INFINITY).unwrap();
        assert_eq!(t0, 0.0);
        assert_abs_diff_eq!(t1, 1.0);

        // Parallel to a slab, outside of it
        let o = Vec3::new(2.0, 0.0, -5.0);
        assert!(bb.intersect(o, d.recip(), f32::INFINITY).is_none());
    }
}
