use super::LocalHit;
use crate::{
    math::{Vec2, Vec3, EPSILON_T, INV_PI, PI},
    sampling::uniform_sample_sphere,
};

pub const RADIUS: f32 = 0.5;
/// Area pdf of uniform samples on the object space sphere
pub const AREA_PDF: f32 = 1.0 / (4.0 * PI * RADIUS * RADIUS);

pub fn intersect(o: Vec3, d: Vec3, t_max: f32) -> Option<LocalHit> {
    let a = d.length_squared();
    let b = 2.0 * o.dot(d);
    let c = o.length_squared() - RADIUS * RADIUS;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 || a == 0.0 {
        return None;
    }
    let rd = discriminant.sqrt();

    let q = if b < 0.0 {
        -0.5 * (b - rd)
    } else {
        -0.5 * (b + rd)
    };
    if q == 0.0 {
        return None;
    }

    let mut t0 = q / a;
    let mut t1 = c / q;
    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }

    if t0 >= t_max || t1 <= EPSILON_T {
        return None;
    }
    let t = if t0 > EPSILON_T {
        t0
    } else if t1 < t_max {
        t1
    } else {
        return None;
    };

    let p = o + d * t;
    let n = p.normalize();
    let phi = {
        let phi = p.z.atan2(p.x);
        if phi < 0.0 {
            phi + 2.0 * PI
        } else {
            phi
        }
    };
    let theta = (p.y / RADIUS).clamp(-1.0, 1.0).acos();
    Some(LocalHit {
        t,
        n,
        dpdu: Vec3::new(-2.0 * PI * p.z, 0.0, 2.0 * PI * p.x),
        uv: Vec2::new(phi * 0.5 * INV_PI, theta * INV_PI),
    })
}

/// Samples a point uniformly on the object space sphere. Returns the point and outward normal.
pub fn sample(u: Vec2) -> (Vec3, Vec3) {
    let n = uniform_sample_sphere(u);
    (n * RADIUS, n)
}
