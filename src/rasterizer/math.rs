//! Vector and matrix math for the projection pipeline
//!
//! Matrices are row-major and act on column vectors: `m.apply(p)` computes
//! `m · [p, 1]`, and `a * b` applies `b` first.

use std::ops::Mul;

use crate::error::ViewerError;

/// 3D Vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[cfg(test)]
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Promote to homogeneous form with w = 1
    pub fn extend(self) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, 1.0)
    }
}

/// Homogeneous 4-vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Drop the w component without dividing
    pub fn truncate(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Perspective divide. A zero `w` leaves the coordinates undivided.
    pub fn perspective_divide(self) -> Vec4 {
        if self.w != 0.0 {
            Vec4::new(self.x / self.w, self.y / self.w, self.z / self.w, 1.0)
        } else {
            self
        }
    }

    fn as_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

/// 4x4 matrix in homogeneous coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub rows: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    /// Right-handed perspective projection (OpenGL clip-space convention).
    ///
    /// Requires `0 < fov_degrees < 180`, `aspect > 0`, `near > 0` and
    /// `far > near`; anything else is rejected rather than producing a
    /// matrix full of infinities.
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<Mat4, ViewerError> {
        if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
            return Err(ViewerError::invalid("fov_degrees", fov_degrees, "a value in (0, 180)"));
        }
        if !(aspect > 0.0 && aspect.is_finite()) {
            return Err(ViewerError::invalid("aspect", aspect, "a finite value > 0"));
        }
        if !(near > 0.0 && near.is_finite()) {
            return Err(ViewerError::invalid("near", near, "a finite value > 0"));
        }
        if !(far > near && far.is_finite()) {
            return Err(ViewerError::invalid("far", far, "a finite value > near"));
        }

        let f = 1.0 / (fov_degrees.to_radians() / 2.0).tan();
        Ok(Mat4::from_rows([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, (far + near) / (near - far), (2.0 * far * near) / (near - far)],
            [0.0, 0.0, -1.0, 0.0],
        ]))
    }

    /// Rotation about the Y axis (yaw)
    pub fn rotation_y(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the X axis (pitch)
    pub fn rotation_x(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn translation(tx: f32, ty: f32, tz: f32) -> Mat4 {
        Mat4::from_rows([
            [1.0, 0.0, 0.0, tx],
            [0.0, 1.0, 0.0, ty],
            [0.0, 0.0, 1.0, tz],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Matrix product `self · rhs`; `rhs` is applied to points first
    pub fn compose(self, rhs: Mat4) -> Mat4 {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.rows[i][k] * rhs.rows[k][j]).sum();
            }
        }
        Mat4 { rows }
    }

    /// Multiply a homogeneous vector
    pub fn transform(self, v: Vec4) -> Vec4 {
        let v = v.as_array();
        let dot = |row: &[f32; 4]| row.iter().zip(v.iter()).map(|(a, b)| a * b).sum::<f32>();
        Vec4::new(
            dot(&self.rows[0]),
            dot(&self.rows[1]),
            dot(&self.rows[2]),
            dot(&self.rows[3]),
        )
    }

    /// Apply to a point (w = 1); no perspective divide
    pub fn apply(self, p: Vec3) -> Vec4 {
        self.transform(p.extend())
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, rhs: Mat4) -> Mat4 {
        self.compose(rhs)
    }
}
