use super::LocalHit;
use crate::math::{Vec2, Vec3, EPSILON_T};

/// Area pdf of uniform samples on the object space unit quad
pub const AREA_PDF: f32 = 1.0;

/// Intersects the unit quad spanning [-0.5, 0.5] on x and z at y = 0. The normal is +y.
pub fn intersect(o: Vec3, d: Vec3, t_max: f32) -> Option<LocalHit> {
    if d.y.abs() < 1e-8 {
        return None;
    }
    let t = -o.y / d.y;
    if t <= EPSILON_T || t >= t_max {
        return None;
    }
    let p = o + d * t;
    if p.x.abs() > 0.5 || p.z.abs() > 0.5 {
        return None;
    }
    Some(LocalHit {
        t,
        n: Vec3::Y,
        dpdu: Vec3::X,
        uv: Vec2::new(p.x + 0.5, p.z + 0.5),
    })
}

pub fn sample(u: Vec2) -> (Vec3, Vec3) {
    (Vec3::new(u.x - 0.5, 0.0, u.y - 0.5), Vec3::Y)
}
