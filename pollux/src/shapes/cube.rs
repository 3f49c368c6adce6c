use super::LocalHit;
use crate::math::{Vec2, Vec3, EPSILON_T};

/// Area pdf of uniform samples on the object space unit cube
pub const AREA_PDF: f32 = 1.0 / 6.0;

// Tangent axes for faces perpendicular to x, y and z
const FACE_AXES: [(usize, usize); 3] = [(1, 2), (2, 0), (0, 1)];

pub fn intersect(o: Vec3, d: Vec3, t_max: f32) -> Option<LocalHit> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut near_axis = 0;
    let mut far_axis = 0;
    for axis in 0..3 {
        if d[axis] == 0.0 {
            if o[axis].abs() > 0.5 {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d[axis];
        let mut t0 = (-0.5 - o[axis]) * inv;
        let mut t1 = (0.5 - o[axis]) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_near {
            t_near = t0;
            near_axis = axis;
        }
        if t1 < t_far {
            t_far = t1;
            far_axis = axis;
        }
    }

    if t_near > t_far || t_far <= EPSILON_T || t_near >= t_max {
        return None;
    }

    // Entering hits take the normal against the ray, exiting ones along it. Both point outward.
    let (t, axis, sign) = if t_near > EPSILON_T {
        (t_near, near_axis, -d[near_axis].signum())
    } else if t_far < t_max {
        (t_far, far_axis, d[far_axis].signum())
    } else {
        return None;
    };

    let mut n = Vec3::ZERO;
    n[axis] = sign;
    let (ua, va) = FACE_AXES[axis];
    let mut dpdu = Vec3::ZERO;
    dpdu[ua] = 1.0;
    let p = o + d * t;
    Some(LocalHit {
        t,
        n,
        dpdu,
        uv: Vec2::new(p[ua] + 0.5, p[va] + 0.5),
    })
}

/// Samples a point uniformly on the object space cube using `u_face` to pick one of the six
/// equal area faces. Returns the point and outward normal.
pub fn sample(u_face: f32, u: Vec2) -> (Vec3, Vec3) {
    let face = ((u_face * 6.0) as usize).min(5);
    let axis = face / 2;
    let sign = if face % 2 == 0 { -1.0 } else { 1.0 };
    let (ua, va) = FACE_AXES[axis];

    let mut p = Vec3::ZERO;
    p[axis] = 0.5 * sign;
    p[ua] = u.x - 0.5;
    p[va] = u.y - 0.5;
    let mut n = Vec3::ZERO;
    n[axis] = sign;
    (p, n)
}
