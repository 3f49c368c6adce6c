#[cfg(test)]
mod tests {
    use pollux::{
        math::{Spectrum, Vec3},
        ray::Ray,
    };

    #[test]
    fn new() {
        let o = Vec3::new(1.0, 2.0, 3.0);
        let d = Vec3::new(0.0, 1.0, 0.0);
        let r = Ray::new(o, d, (3, 7), 5);
        assert_eq!(r.origin, o);
        assert_eq!(r.direction, d);
        assert_eq!(r.pixel(), (3, 7));
        assert_eq!(r.remaining_bounces(), 5);
        assert_eq!(r.color, Spectrum::ZERO);
        assert_eq!(r.throughput, Spectrum::ONE);
        assert!(r.is_alive());
        assert!(!r.specular_bounce);
    }

    #[test]
    fn default() {
        let r = Ray::default();
        assert_eq!(r.throughput, Spectrum::ONE);
        assert_eq!(r.remaining_bounces(), 0);
        assert!(!r.is_alive());
    }

    #[test]
    fn point() {
        let o = Vec3::new(1.0, 2.0, 3.0);
        let d = Vec3::new(4.0, 5.0, 6.0);
        let r = Ray::new(o, d, (0, 0), 1);
        assert_eq!(r.point(1.0), o + d);
        assert_eq!(r.point(2.0), o + d * 2.0);
    }

    #[test]
    fn terminate() {
        let mut r = Ray::new(Vec3::ZERO, Vec3::Z, (1, 2), 4);
        r.color = Spectrum::new(0.5, 0.25, 1.0);
        r.terminate();
        assert!(!r.is_alive());
        assert_eq!(r.pixel(), (1, 2));
        assert_eq!(r.color, Spectrum::new(0.5, 0.25, 1.0));
    }

    #[test]
    fn scatter() {
        let mut r = Ray::new(Vec3::ZERO, Vec3::Z, (0, 0), 2);
        r.scatter(Vec3::ONE, Vec3::new(0.0, 3.0, 4.0));
        assert_eq!(r.origin, Vec3::ONE);
        assert_eq!(r.direction, Vec3::new(0.0, 0.6, 0.8));
        assert_eq!(r.remaining_bounces(), 1);

        r.scatter(Vec3::ZERO, Vec3::X);
        assert!(!r.is_alive());

        // Never wraps around
        r.scatter(Vec3::ZERO, Vec3::X);
        assert_eq!(r.remaining_bounces(), 0);
    }

    #[test]
    fn scatter_degenerate() {
        let mut r = Ray::new(Vec3::ZERO, Vec3::Z, (0, 0), 3);
        r.color = Spectrum::ONE;
        r.scatter(Vec3::ONE, Vec3::ZERO);
        assert!(!r.is_alive());
        assert_eq!(r.throughput, Spectrum::ZERO);
        assert_eq!(r.color, Spectrum::ONE);

        let mut r = Ray::new(Vec3::ZERO, Vec3::Z, (0, 0), 3);
        r.scatter(Vec3::ONE, Vec3::new(f32::NAN, 0.0, 1.0));
        assert!(!r.is_alive());
        assert!(!r.has_nans());
    }

    #[test]
    fn has_nans() {
        let mut r = Ray::default();
        assert!(!r.has_nans());
        r.origin.x = f32::NAN;
        assert!(r.has_nans());
        r.origin.x = 0.0;
        r.direction.y = f32::NAN;
        assert!(r.has_nans());
        r.direction.y = 0.0;
        r.color.z = f32::NAN;
        assert!(r.has_nans());
        r.color.z = 0.0;
        r.throughput.x = f32::NAN;
        assert!(r.has_nans());
        r.throughput.x = 1.0;
        assert!(!r.has_nans());
    }
}
