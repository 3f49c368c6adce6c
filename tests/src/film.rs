#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use pollux::{
        film::Film,
        math::{Spectrum, Vec3},
        ray::Ray,
        Error,
    };

    #[test]
    fn new() {
        let film = Film::new(4, 3).unwrap();
        assert_eq!(film.width(), 4);
        assert_eq!(film.height(), 3);
        assert_eq!(film.image().len(), 12);
        assert!(film.image().iter().all(|&p| p == Spectrum::ZERO));

        assert!(matches!(
            Film::new(0, 3),
            Err(Error::InvalidResolution {
                width: 0,
                height: 3
            })
        ));
        assert!(Film::new(3, 0).is_err());
    }

    #[test]
    fn averages_samples() {
        let mut film = Film::new(2, 2).unwrap();
        film.add_sample(1, 0, Spectrum::new(1.0, 2.0, 3.0)).unwrap();
        film.add_sample(1, 0, Spectrum::new(3.0, 2.0, 1.0)).unwrap();
        film.add_sample(0, 1, Spectrum::ONE).unwrap();

        assert_eq!(film.sample_count(1, 0).unwrap(), 2);
        assert_eq!(film.sample_count(0, 0).unwrap(), 0);
        assert_abs_diff_eq!(film.pixel(1, 0).unwrap(), Spectrum::splat(2.0));
        assert_eq!(film.pixel(0, 0).unwrap(), Spectrum::ZERO);

        // Row-major
        let image = film.image();
        assert_abs_diff_eq!(image[1], Spectrum::splat(2.0));
        assert_abs_diff_eq!(image[2], Spectrum::ONE);

        film.clear();
        assert_eq!(film.sample_count(1, 0).unwrap(), 0);
        assert_eq!(film.pixel(1, 0).unwrap(), Spectrum::ZERO);
    }

    #[test]
    fn out_of_bounds() {
        let mut film = Film::new(2, 3).unwrap();
        assert!(matches!(
            film.add_sample(2, 0, Spectrum::ONE),
            Err(Error::PixelOutOfBounds {
                x: 2,
                y: 0,
                width: 2,
                height: 3
            })
        ));
        assert!(film.add_sample(0, 3, Spectrum::ONE).is_err());
        assert!(film.pixel(5, 5).is_err());
        assert!(film.sample_count(0, 3).is_err());
        // Nothing was accumulated
        assert!(film.image().iter().all(|&p| p == Spectrum::ZERO));
    }

    #[test]
    fn commit() {
        let mut film = Film::new(3, 1).unwrap();
        let mut rays = vec![
            Ray::new(Vec3::ZERO, Vec3::Z, (0, 0), 0),
            Ray::new(Vec3::ZERO, Vec3::Z, (2, 0), 0),
            Ray::new(Vec3::ZERO, Vec3::Z, (2, 0), 0),
        ];
        rays[0].color = Spectrum::new(0.5, 0.0, 0.0);
        rays[1].color = Spectrum::new(0.0, 1.0, 0.0);
        rays[2].color = Spectrum::new(0.0, 0.0, 1.0);
        film.commit(&rays).unwrap();

        assert_eq!(film.pixel(0, 0).unwrap(), Spectrum::new(0.5, 0.0, 0.0));
        assert_eq!(film.pixel(2, 0).unwrap(), Spectrum::new(0.0, 0.5, 0.5));
        assert_eq!(film.sample_count(1, 0).unwrap(), 0);

        let stray = Ray::new(Vec3::ZERO, Vec3::Z, (3, 0), 0);
        assert!(film.commit(&[stray]).is_err());
    }
}
