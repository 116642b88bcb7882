//! Geometry value types for the canvas recorder.
//!
//! All types are plain `f32` records with a stable memory layout so payload
//! arrays can be handed to the wire encoder as raw bytes. Poses are the
//! position+orientation form drawing code usually holds; the recorder only
//! ever consumes their matrix form.

use bytemuck::{Pod, Zeroable};

// ─────────────────────────────────────────────────────────────────────────────
// Vectors
// ─────────────────────────────────────────────────────────────────────────────

/// 2D vector / point
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// 3D vector / point
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Vec3 = Vec3 {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn dot(&self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }
}

/// One element of a colored point cloud: position plus an RGB color whose
/// channels share the position's scalar encoding.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ColoredPoint {
    pub position: Vec3,
    pub color: Vec3,
}

impl ColoredPoint {
    pub const fn new(position: Vec3, color: Vec3) -> Self {
        Self { position, color }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rectangle
// ─────────────────────────────────────────────────────────────────────────────

/// Axis-aligned 2D rectangle (top-left origin + extents)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle containing two corner points
    pub fn from_points(p1: Vec2, p2: Vec2) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        Self {
            x: min_x,
            y: min_y,
            width: p1.x.max(p2.x) - min_x,
            height: p1.y.max(p2.y) - min_y,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transforms
// ─────────────────────────────────────────────────────────────────────────────

/// 2D affine transformation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2D {
    /// Matrix elements [a, b, c, d, tx, ty]
    /// | a  c  tx |
    /// | b  d  ty |
    /// | 0  0   1 |
    pub elements: [f32; 6],
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2D {
    pub const IDENTITY: Affine2D = Affine2D {
        elements: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    pub fn translation(x: f32, y: f32) -> Self {
        Self {
            elements: [1.0, 0.0, 0.0, 1.0, x, y],
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            elements: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    pub fn rotation(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            elements: [c, s, -s, c, 0.0, 0.0],
        }
    }

    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        let [a, b, c, d, tx, ty] = self.elements;
        Vec2::new(a * p.x + c * p.y + tx, b * p.x + d * p.y + ty)
    }

    /// Concatenate this transform with another (self * other).
    /// The resulting transform first applies `other`, then `self`.
    pub fn then(&self, other: &Affine2D) -> Affine2D {
        let [a1, b1, c1, d1, tx1, ty1] = self.elements;
        let [a2, b2, c2, d2, tx2, ty2] = other.elements;
        Affine2D {
            elements: [
                a1 * a2 + c1 * b2,
                b1 * a2 + d1 * b2,
                a1 * c2 + c1 * d2,
                b1 * c2 + d1 * d2,
                a1 * tx2 + c1 * ty2 + tx1,
                b1 * tx2 + d1 * ty2 + ty1,
            ],
        }
    }
}

/// 4x4 transformation matrix (column-major)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self {
            cols: [
                [x, 0.0, 0.0, 0.0],
                [0.0, y, 0.0, 0.0],
                [0.0, 0.0, z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Element at (row, col)
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.cols[col][row]
    }

    /// Flatten row-by-row: [m00, m01, m02, m03, m10, ...]
    pub fn to_rows_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = self.cols[col][row];
            }
        }
        out
    }

    /// Multiply two matrices
    pub fn mul(&self, other: &Mat4) -> Mat4 {
        let mut result = [[0.0f32; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    result[i][j] += self.cols[k][j] * other.cols[i][k];
                }
            }
        }
        Mat4 { cols: result }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Poses
// ─────────────────────────────────────────────────────────────────────────────

/// 2D pose: position plus yaw (radians)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose2D {
    pub position: Vec2,
    pub yaw: f32,
}

impl Pose2D {
    pub const fn new(x: f32, y: f32, yaw: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            yaw,
        }
    }

    /// Affine matrix form: rotate by yaw, then translate to position
    pub fn to_matrix(&self) -> Affine2D {
        let c = self.yaw.cos();
        let s = self.yaw.sin();
        Affine2D {
            elements: [c, s, -s, c, self.position.x, self.position.y],
        }
    }
}

/// 3D pose: position plus roll/pitch/yaw (radians, applied in that order)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose3D {
    pub position: Vec3,
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl Pose3D {
    pub const fn new(x: f32, y: f32, z: f32, roll: f32, pitch: f32, yaw: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            roll,
            pitch,
            yaw,
        }
    }

    /// Homogeneous matrix form: R = Rz(yaw) * Ry(pitch) * Rx(roll), plus
    /// the position in the translation column.
    pub fn to_matrix(&self) -> Mat4 {
        let (sr, cr) = self.roll.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        let (sy, cy) = self.yaw.sin_cos();

        // Column-major: cols[c][r] is row r of column c.
        Mat4 {
            cols: [
                [cy * cp, sy * cp, -sp, 0.0],
                [
                    cy * sp * sr - sy * cr,
                    sy * sp * sr + cy * cr,
                    cp * sr,
                    0.0,
                ],
                [
                    cy * sp * cr + sy * sr,
                    sy * sp * cr - cy * sr,
                    cp * cr,
                    0.0,
                ],
                [self.position.x, self.position.y, self.position.z, 1.0],
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affine_identity_roundtrip() {
        let p = Vec2::new(3.0, -4.0);
        assert_eq!(Affine2D::IDENTITY.transform_point(p), p);
    }

    #[test]
    fn test_affine_then() {
        let t = Affine2D::translation(10.0, 0.0);
        let s = Affine2D::scale(2.0, 2.0);
        // Translate-then-scale differs from scale-then-translate
        let p = Vec2::new(1.0, 1.0);
        let a = t.then(&s).transform_point(p);
        let b = s.then(&t).transform_point(p);
        assert_eq!(a, Vec2::new(12.0, 2.0));
        assert_eq!(b, Vec2::new(22.0, 2.0));
    }

    #[test]
    fn test_pose2d_matrix() {
        let pose = Pose2D::new(5.0, 7.0, 0.0);
        let m = pose.to_matrix();
        assert_eq!(m.transform_point(Vec2::ZERO), Vec2::new(5.0, 7.0));

        let quarter = Pose2D::new(0.0, 0.0, std::f32::consts::FRAC_PI_2);
        let p = quarter.to_matrix().transform_point(Vec2::new(1.0, 0.0));
        assert!((p.x - 0.0).abs() < 1e-6);
        assert!((p.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pose3d_identity() {
        let m = Pose3D::new(1.0, 2.0, 3.0, 0.0, 0.0, 0.0).to_matrix();
        assert_eq!(m.at(0, 0), 1.0);
        assert_eq!(m.at(1, 1), 1.0);
        assert_eq!(m.at(0, 3), 1.0);
        assert_eq!(m.at(2, 3), 3.0);
    }

    #[test]
    fn test_mat4_rows_array() {
        let m = Mat4::translation(1.0, 2.0, 3.0);
        let rows = m.to_rows_array();
        // Row-major flattening puts the translation in m03/m13/m23.
        assert_eq!(rows[3], 1.0);
        assert_eq!(rows[7], 2.0);
        assert_eq!(rows[11], 3.0);
        assert_eq!(rows[15], 1.0);
    }

    #[test]
    fn test_rect_from_points() {
        let r = Rect::from_points(Vec2::new(4.0, 1.0), Vec2::new(1.0, 5.0));
        assert_eq!(r, Rect::new(1.0, 1.0, 3.0, 4.0));
        assert!(r.contains(r.center()));
    }
}
