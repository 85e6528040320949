use std::ops::Mul;

use super::approx_eq;
use super::vector::{Vec3, Vec4};

/// A row-major `N`x`N` matrix. Default is the identity.
#[derive(Debug, Clone, Copy)]
pub struct Matrix<const N: usize> {
    e: [[f32; N]; N],
}

pub type Mat3 = Matrix<3>;
pub type Mat4 = Matrix<4>;

impl<const N: usize> Default for Matrix<N> {
    fn default() -> Self {
        let mut e = [[0.0; N]; N];
        for i in 0..N {
            e[i][i] = 1.0;
        }
        Self { e }
    }
}

impl<const N: usize> Matrix<N> {
    pub const fn from_rows(e: [[f32; N]; N]) -> Self {
        Self { e }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.e[row][col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: f32) {
        self.e[row][col] = val;
    }

    pub fn transpose(&self) -> Self {
        let mut result = *self;
        for i in 0..N {
            for j in 0..N {
                result.e[i][j] = self.e[j][i];
            }
        }
        result
    }

    /// Gauss-Jordan elimination with partial pivoting. Returns the identity
    /// matrix if `self` is singular (under the shared epsilon comparator).
    pub fn inverse(&self) -> Self {
        let mut src = self.e;
        let mut dest = Self::default().e;

        for p in 0..N {
            let mut pivot_row = p;
            let mut pivot_val = src[p][p].abs();
            for k in (p + 1)..N {
                let candidate = src[k][p].abs();
                if candidate > pivot_val {
                    pivot_val = candidate;
                    pivot_row = k;
                }
            }

            if approx_eq(pivot_val, 0.0) {
                return Self::default();
            }

            if pivot_row != p {
                src.swap(p, pivot_row);
                dest.swap(p, pivot_row);
            }

            let pivot = src[p][p];
            for j in 0..N {
                src[p][j] /= pivot;
                dest[p][j] /= pivot;
            }

            for k in 0..N {
                if k == p {
                    continue;
                }
                let factor = src[k][p];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..N {
                    src[k][j] -= factor * src[p][j];
                    dest[k][j] -= factor * dest[p][j];
                }
            }
        }

        Self { e: dest }
    }
}

impl<const N: usize> Mul for Matrix<N> {
    type Output = Matrix<N>;

    fn mul(self, rhs: Self) -> Self {
        let mut result = [[0.0; N]; N];
        for i in 0..N {
            for j in 0..N {
                let mut acc = 0.0;
                for k in 0..N {
                    acc += self.e[i][k] * rhs.e[k][j];
                }
                result[i][j] = acc;
            }
        }
        Self { e: result }
    }
}

impl<const N: usize> PartialEq for Matrix<N> {
    fn eq(&self, other: &Self) -> bool {
        for i in 0..N {
            for j in 0..N {
                if !approx_eq(self.e[i][j], other.e[i][j]) {
                    return false;
                }
            }
        }
        true
    }
}

impl Mat4 {
    /// Post-multiply a row vector by this matrix: `result[j] = sum_i v[i] * M[i][j]`.
    pub fn mul_vec4(&self, v: Vec4) -> Vec4 {
        let src = [v.x, v.y, v.z, v.w];
        let mut out = [0.0_f32; 4];
        for j in 0..4 {
            let mut acc = 0.0;
            for i in 0..4 {
                acc += src[i] * self.e[i][j];
            }
            out[j] = acc;
        }
        Vec4::new(out[0], out[1], out[2], out[3])
    }

    /// Treats `v` as `(x, y, z, 1)`, multiplies, and divides the result by
    /// the homogeneous `w` (perspective divide).
    pub fn transform_point(&self, v: Vec3) -> Vec3 {
        let r = self.mul_vec4(v.to_vec4(1.0));
        Vec3::new(r.x / r.w, r.y / r.w, r.z / r.w)
    }

    /// Treats `v` as `(x, y, z, 1)`, multiplies, and drops the resulting `w`
    /// without dividing by it (used where `w` is tracked separately, e.g.
    /// the rasterizer's manual perspective divide by `-z`).
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.mul_vec4(v.to_vec4(1.0)).xyz()
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::default();
        m.set(3, 0, x);
        m.set(3, 1, y);
        m.set(3, 2, z);
        m
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::default();
        m.set(0, 0, x);
        m.set(1, 1, y);
        m.set(2, 2, z);
        m
    }

    /// Composes `Rx(pitch) * Ry(yaw) * Rz(roll)`; angles in radians.
    pub fn rotation(roll: f32, pitch: f32, yaw: f32) -> Self {
        let mut rx = Self::default();
        rx.set(1, 1, pitch.cos());
        rx.set(1, 2, pitch.sin());
        rx.set(2, 1, -pitch.sin());
        rx.set(2, 2, pitch.cos());

        let mut ry = Self::default();
        ry.set(0, 0, yaw.cos());
        ry.set(0, 2, -yaw.sin());
        ry.set(2, 0, yaw.sin());
        ry.set(2, 2, yaw.cos());

        let mut rz = Self::default();
        rz.set(0, 0, roll.cos());
        rz.set(0, 1, roll.sin());
        rz.set(1, 0, -roll.sin());
        rz.set(1, 1, roll.cos());

        rx * ry * rz
    }

    /// Maps a view-space point (camera looking down -Z) to clip space with
    /// `z` in `[0, 1]` (reverse of OpenGL).
    pub fn perspective(fov_y: f32, aspect: f32, n: f32, f: f32) -> Self {
        let mut m = Self {
            e: [[0.0; 4]; 4],
        };
        let tan_half_fov = (fov_y / 2.0).tan();
        m.set(0, 0, 1.0 / (tan_half_fov * aspect));
        m.set(1, 1, 1.0 / tan_half_fov);
        m.set(2, 2, -f / (f - n));
        m.set(3, 2, -f * n / (f - n));
        m.set(2, 3, -1.0);
        m
    }

    /// Builds a right-handed view matrix: `forward = normalize(eye - at)`,
    /// `right = normalize(up x forward)`, `up' = forward x right`.
    pub fn look_at(eye: Vec3, at: Vec3, up: Vec3) -> Self {
        let forward = (eye - at).normalize();
        let right = up.cross(forward).normalize();
        let up_prime = forward.cross(right);

        let mut m = Self::default();
        m.set(0, 0, right.x);
        m.set(0, 1, up_prime.x);
        m.set(0, 2, forward.x);
        m.set(1, 0, right.y);
        m.set(1, 1, up_prime.y);
        m.set(1, 2, forward.y);
        m.set(2, 0, right.z);
        m.set(2, 1, up_prime.z);
        m.set(2, 2, forward.z);
        m.set(3, 0, -right.dot(eye));
        m.set(3, 1, -up_prime.dot(eye));
        m.set(3, 2, -forward.dot(eye));
        m
    }
}

impl Mat3 {
    pub fn mul_vec3(&self, v: Vec3) -> Vec3 {
        let src = [v.x, v.y, v.z];
        let mut out = [0.0_f32; 3];
        for j in 0..3 {
            let mut acc = 0.0;
            for i in 0..3 {
                acc += src[i] * self.e[i][j];
            }
            out[j] = acc;
        }
        Vec3::new(out[0], out[1], out[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_identity() {
        let m = Mat4::default();
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_eq!(m.get(i, j), expected);
            }
        }
    }

    #[test]
    fn transpose_is_involutive() {
        let m = Mat4::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ]);
        assert_eq!(m.transpose().transpose(), m);
    }

    #[test]
    fn inverse_matches_reference_4x4() {
        let m = Mat3::from_rows([[5.0, 3.0, 1.0], [1.0, 0.0, -2.0], [1.0, 2.0, 5.0]]);
        let inv = m.inverse();
        let expected = Mat3::from_rows([
            [4.0, -13.0, -6.0],
            [-7.0, 24.0, 11.0],
            [2.0, -7.0, -3.0],
        ]);
        for i in 0..3 {
            for j in 0..3 {
                assert!((inv.get(i, j) - expected.get(i, j)).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn inverse_of_singular_matrix_is_identity() {
        let m = Mat3::from_rows([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 1.0]]);
        assert_eq!(m.inverse(), Mat3::default());
    }

    #[test]
    fn matrix_times_inverse_is_identity() {
        let m = Mat4::from_rows([
            [2.0, 0.0, 0.0, 0.0],
            [0.0, 3.0, 0.0, 0.0],
            [0.0, 0.0, 4.0, 0.0],
            [1.0, 2.0, 3.0, 1.0],
        ]);
        let product = m * m.inverse();
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((product.get(i, j) - expected).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn rotation_inverse_pair_returns_basis_to_itself() {
        let (roll, pitch, yaw) = (0.3_f32, 0.5_f32, -0.7_f32);
        let fwd = Mat4::rotation(roll, pitch, yaw);
        let back = Mat4::rotation(-yaw, -pitch, -roll);
        let combined = fwd * back;
        let identity = Mat4::default();
        for i in 0..4 {
            for j in 0..4 {
                assert!((combined.get(i, j) - identity.get(i, j)).abs() < 1e-4);
            }
        }
    }
}
