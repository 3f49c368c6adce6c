use super::{EulerRot, Mat3, Mat4, Vec3};

/// An affine local-to-world transform with its inverse and inverse transpose cached.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    m: Mat4,
    m_inv: Mat4,
    m_inv_transpose: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            m: Mat4::IDENTITY,
            m_inv: Mat4::IDENTITY,
            m_inv_transpose: Mat4::IDENTITY,
        }
    }
}

impl Transform {
    /// Creates a new `Transform`. Returns `None` if `m` is not invertible.
    pub fn new(m: Mat4) -> Option<Self> {
        let det = m.determinant();
        if !det.is_finite() || det.abs() < 1e-12 {
            return None;
        }
        let m_inv = m.inverse();
        Some(Self {
            m,
            m_inv,
            m_inv_transpose: m_inv.transpose(),
        })
    }

    /// Composes translation * rotation * scale. Rotation is given as degrees around x, y and z,
    /// applied in that order.
    pub fn from_trs(translation: Vec3, rotation_deg: Vec3, scale: Vec3) -> Option<Self> {
        let rotation = Mat4::from_euler(
            EulerRot::ZYX,
            rotation_deg.z.to_radians(),
            rotation_deg.y.to_radians(),
            rotation_deg.x.to_radians(),
        );
        Self::new(Mat4::from_translation(translation) * rotation * Mat4::from_scale(scale))
    }

    pub fn m(&self) -> &Mat4 {
        &self.m
    }

    pub fn m_inv(&self) -> &Mat4 {
        &self.m_inv
    }

    pub fn m_inv_transpose(&self) -> &Mat4 {
        &self.m_inv_transpose
    }

    /// Determinant of the linear part
    pub fn determinant(&self) -> f32 {
        Mat3::from_mat4(self.m).determinant()
    }

    #[inline]
    pub fn point(&self, p: Vec3) -> Vec3 {
        self.m.transform_point3(p)
    }

    #[inline]
    pub fn vector(&self, v: Vec3) -> Vec3 {
        self.m.transform_vector3(v)
    }

    /// Transforms a normal. The result is not normalized.
    #[inline]
    pub fn normal(&self, n: Vec3) -> Vec3 {
        self.m_inv_transpose.transform_vector3(n)
    }

    #[inline]
    pub fn inverse_point(&self, p: Vec3) -> Vec3 {
        self.m_inv.transform_point3(p)
    }

    #[inline]
    pub fn inverse_vector(&self, v: Vec3) -> Vec3 {
        self.m_inv.transform_vector3(v)
    }

    /// Maps a world space normal back to object space. The result is not normalized.
    #[inline]
    pub fn inverse_normal(&self, n: Vec3) -> Vec3 {
        self.m.transpose().transform_vector3(n)
    }
}
