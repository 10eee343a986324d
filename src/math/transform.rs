use std::cmp::Ordering;
use std::fmt;
use std::ops::{Index, IndexMut, Mul};

use crate::error::{GeometryError, Result};
use crate::geometry::Plane;
use crate::math::point3::Point3;
use crate::math::scalar::{is_valid_double, EPSILON, SQRT_EPSILON, UNSET_VALUE};
use crate::math::vector2::Vector2;
use crate::math::vector3::Vector3;

/// A homogeneous 4x4 transformation matrix, row-major.
///
/// Euclidean transforms keep the bottom row at `(0, 0, 0, 1)`; projective
/// rows are permitted, and point application divides by the resulting
/// `w` when it is nonzero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    m: [[f64; 4]; 4],
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// The transform that maps every point to the origin.
    pub const ZERO_TRANSFORMATION: Self = Self {
        m: [
            [0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Transform with every entry set to the unset sentinel.
    pub const UNSET: Self = Self {
        m: [[UNSET_VALUE; 4]; 4],
    };

    /// Builds a transform from explicit rows.
    #[must_use]
    pub const fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self { m: rows }
    }

    /// Returns whether every entry is a usable double.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.m
            .iter()
            .all(|row| row.iter().copied().all(is_valid_double))
    }

    /// Returns whether this is exactly the identity matrix.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Returns whether the bottom row is `(0, 0, 0, 1)`.
    #[must_use]
    pub fn is_affine(&self) -> bool {
        self.m[3] == [0.0, 0.0, 0.0, 1.0]
    }

    /// Returns whether this is exactly the zero transformation.
    #[must_use]
    pub fn is_zero_transformation(&self) -> bool {
        *self == Self::ZERO_TRANSFORMATION
    }

    /// Translation by `motion`.
    #[must_use]
    pub fn translation(motion: Vector3) -> Self {
        let mut t = Self::IDENTITY;
        t.m[0][3] = motion.x;
        t.m[1][3] = motion.y;
        t.m[2][3] = motion.z;
        t
    }

    /// Uniform scale about `anchor`.
    #[must_use]
    pub fn scale(anchor: Point3, factor: f64) -> Self {
        let mut t = Self::IDENTITY;
        t.m[0][0] = factor;
        t.m[1][1] = factor;
        t.m[2][2] = factor;
        t.m[0][3] = anchor.x * (1.0 - factor);
        t.m[1][3] = anchor.y * (1.0 - factor);
        t.m[2][3] = anchor.z * (1.0 - factor);
        t
    }

    /// Non-uniform scale along the axes of `plane`, fixing its origin.
    #[must_use]
    pub fn scale_non_uniform(plane: &Plane, sx: f64, sy: f64, sz: f64) -> Self {
        let mut diag = Self::IDENTITY;
        diag.m[0][0] = sx;
        diag.m[1][1] = sy;
        diag.m[2][2] = sz;
        Self::plane_frame(plane) * diag * Self::world_to_plane_frame(plane)
    }

    /// Rotation by `angle` radians about the axis through `center`.
    ///
    /// # Errors
    ///
    /// Returns an error when `axis` is zero-length or `angle` is not a
    /// usable double.
    pub fn rotation(angle: f64, axis: Vector3, center: Point3) -> Result<Self> {
        Self::rotation_from_sin_cos(angle.sin(), angle.cos(), axis, center)
    }

    /// Rotation from an explicit (sin, cos) pair — the canonical
    /// low-level constructor.
    ///
    /// Near-degenerate pairs are snapped to exact 0/±1 inside
    /// `SQRT_EPSILON` bands so accumulated floating error cannot produce
    /// a matrix that is not quite a rotation; a drifted pair off the unit
    /// circle is renormalized before the Rodrigues matrix is built.
    ///
    /// # Errors
    ///
    /// Returns an error when the (sin, cos) pair cannot be normalized or
    /// the axis is zero-length.
    pub fn rotation_from_sin_cos(
        sin_angle: f64,
        cos_angle: f64,
        axis: Vector3,
        center: Point3,
    ) -> Result<Self> {
        let mut s = sin_angle;
        let mut c = cos_angle;

        if s.abs() >= 1.0 - SQRT_EPSILON && c.abs() <= SQRT_EPSILON {
            c = 0.0;
            s = if s < 0.0 { -1.0 } else { 1.0 };
        }
        if c.abs() >= 1.0 - SQRT_EPSILON && s.abs() <= SQRT_EPSILON {
            c = if c < 0.0 { -1.0 } else { 1.0 };
            s = 0.0;
        }
        if (s * s + c * c - 1.0).abs() > SQRT_EPSILON {
            let mut cs = Vector2::new(c, s);
            if cs.unitize() {
                c = cs.x;
                s = cs.y;
            } else {
                return Err(GeometryError::Degenerate(
                    "sine and cosine are both zero".into(),
                )
                .into());
            }
        }

        let mut a = axis;
        if (a.length_squared() - 1.0).abs() > EPSILON && !a.unitize() {
            return Err(GeometryError::ZeroVector.into());
        }

        let mut t = Self::IDENTITY;
        if s != 0.0 || c != 1.0 {
            let omc = 1.0 - c;
            t.m[0][0] = a.x * a.x * omc + c;
            t.m[0][1] = a.x * a.y * omc - a.z * s;
            t.m[0][2] = a.x * a.z * omc + a.y * s;
            t.m[1][0] = a.y * a.x * omc + a.z * s;
            t.m[1][1] = a.y * a.y * omc + c;
            t.m[1][2] = a.y * a.z * omc - a.x * s;
            t.m[2][0] = a.z * a.x * omc - a.y * s;
            t.m[2][1] = a.z * a.y * omc + a.x * s;
            t.m[2][2] = a.z * a.z * omc + c;
            if center.x != 0.0 || center.y != 0.0 || center.z != 0.0 {
                for i in 0..3 {
                    t.m[i][3] = center[i]
                        - (t.m[i][0] * center.x + t.m[i][1] * center.y + t.m[i][2] * center.z);
                }
            }
        }
        Ok(t)
    }

    /// Reflection across the plane through `point` with normal `normal`.
    ///
    /// # Errors
    ///
    /// Returns an error when `normal` is zero-length.
    pub fn mirror(point: Point3, normal: Vector3) -> Result<Self> {
        let mut n = normal;
        if !n.unitize() {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self::mirror_unit(point, n))
    }

    /// Reflection across `plane`. The plane's normal is already unit
    /// length, so this cannot fail.
    #[must_use]
    pub fn mirror_plane(plane: &Plane) -> Self {
        Self::mirror_unit(plane.origin(), plane.z_axis())
    }

    fn mirror_unit(point: Point3, n: Vector3) -> Self {
        let d = 2.0 * (n.x * point.x + n.y * point.y + n.z * point.z);
        let mut t = Self::IDENTITY;
        t.m[0][0] = 1.0 - 2.0 * n.x * n.x;
        t.m[0][1] = -2.0 * n.x * n.y;
        t.m[0][2] = -2.0 * n.x * n.z;
        t.m[0][3] = d * n.x;
        t.m[1][0] = -2.0 * n.y * n.x;
        t.m[1][1] = 1.0 - 2.0 * n.y * n.y;
        t.m[1][2] = -2.0 * n.y * n.z;
        t.m[1][3] = d * n.y;
        t.m[2][0] = -2.0 * n.z * n.x;
        t.m[2][1] = -2.0 * n.z * n.y;
        t.m[2][2] = 1.0 - 2.0 * n.z * n.z;
        t.m[2][3] = d * n.z;
        t
    }

    /// Orthogonal projection onto `plane`.
    #[must_use]
    pub fn planar_projection(plane: &Plane) -> Self {
        let x = plane.x_axis();
        let y = plane.y_axis();
        let o = plane.origin();
        let mut t = Self::IDENTITY;
        for i in 0..3 {
            for j in 0..3 {
                t.m[i][j] = x[i] * x[j] + y[i] * y[j];
            }
            let q = t.m[i][0] * o.x + t.m[i][1] * o.y + t.m[i][2] * o.z;
            t.m[i][3] = o[i] - q;
        }
        t
    }

    /// Shear fixing `plane.origin()` that maps the plane's axes to `x`,
    /// `y`, and `z` (given in world coordinates).
    #[must_use]
    pub fn shear(plane: &Plane, x: Vector3, y: Vector3, z: Vector3) -> Self {
        let o = plane.origin().to_vector();
        let back = Self::translation(o);
        let out = Self::translation(-o);
        // world coordinates -> plane frame coordinates
        let px = plane.x_axis();
        let py = plane.y_axis();
        let pz = plane.z_axis();
        let to_frame = Self::from_rows([
            [px.x, px.y, px.z, 0.0],
            [py.x, py.y, py.z, 0.0],
            [pz.x, pz.y, pz.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        // plane frame coordinates -> sheared world images
        let from_frame = Self::from_rows([
            [x.x, y.x, z.x, 0.0],
            [x.y, y.y, z.y, 0.0],
            [x.z, y.z, z.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        back * from_frame * to_frame * out
    }

    /// Maps plane-frame coordinates of `plane` to world coordinates.
    #[must_use]
    pub fn plane_frame(plane: &Plane) -> Self {
        let x = plane.x_axis();
        let y = plane.y_axis();
        let z = plane.z_axis();
        let o = plane.origin();
        Self::from_rows([
            [x.x, y.x, z.x, o.x],
            [x.y, y.y, z.y, o.y],
            [x.z, y.z, z.z, o.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Maps world coordinates to the frame coordinates of `plane` (the
    /// rigid inverse of [`Transform::plane_frame`]).
    #[must_use]
    pub fn world_to_plane_frame(plane: &Plane) -> Self {
        let x = plane.x_axis();
        let y = plane.y_axis();
        let z = plane.z_axis();
        let o = plane.origin().to_vector();
        Self::from_rows([
            [x.x, x.y, x.z, -x.dot(o)],
            [y.x, y.y, y.z, -y.dot(o)],
            [z.x, z.y, z.z, -z.dot(o)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rigid motion carrying `plane0` onto `plane1` (origin to origin,
    /// axes to axes).
    #[must_use]
    pub fn plane_to_plane(plane0: &Plane, plane1: &Plane) -> Self {
        Self::plane_frame(plane1) * Self::world_to_plane_frame(plane0)
    }

    /// Change of basis between two vector triples: the result maps the
    /// coordinates of a vector relative to `(x0, y0, z0)` to its
    /// coordinates relative to `(x1, y1, z1)`.
    ///
    /// Solves the 3x6 augmented projection system by Gauss-Jordan
    /// elimination, picking the largest remaining diagonal entry as the
    /// pivot at each of the three steps. Neither basis needs to be
    /// orthogonal. Returns `None` when a pivot is exactly zero.
    #[must_use]
    #[allow(clippy::similar_names, clippy::many_single_char_names)]
    pub fn change_basis_vectors(
        x0: Vector3,
        y0: Vector3,
        z0: Vector3,
        x1: Vector3,
        y1: Vector3,
        z1: Vector3,
    ) -> Option<Self> {
        let a = x1.dot(y1);
        let b = x1.dot(z1);
        let c = y1.dot(z1);
        let mut r: [[f64; 6]; 3] = [
            [x1.dot(x1), a, b, x1.dot(x0), x1.dot(y0), x1.dot(z0)],
            [a, y1.dot(y1), c, y1.dot(x0), y1.dot(y0), y1.dot(z0)],
            [b, c, z1.dot(z1), z1.dot(x0), z1.dot(y0), z1.dot(z0)],
        ];

        let mut i0 = usize::from(r[0][0] < r[1][1]);
        if r[2][2] > r[i0][i0] {
            i0 = 2;
        }
        let mut i1 = (i0 + 1) % 3;
        let mut i2 = (i1 + 1) % 3;

        if r[i0][i0] == 0.0 {
            return None;
        }
        let d = 1.0 / r[i0][i0];
        for col in 0..6 {
            r[i0][col] *= d;
        }
        if r[i1][i0] != 0.0 {
            let f = -r[i1][i0];
            for col in 0..6 {
                r[i1][col] += f * r[i0][col];
            }
        }
        if r[i2][i0] != 0.0 {
            let f = -r[i2][i0];
            for col in 0..6 {
                r[i2][col] += f * r[i0][col];
            }
        }

        if r[i1][i1].abs() < r[i2][i2].abs() {
            std::mem::swap(&mut i1, &mut i2);
        }
        if r[i1][i1] == 0.0 {
            return None;
        }
        let d = 1.0 / r[i1][i1];
        for col in 0..6 {
            r[i1][col] *= d;
        }
        if r[i0][i1] != 0.0 {
            let f = -r[i0][i1];
            for col in 0..6 {
                r[i0][col] += f * r[i1][col];
            }
        }
        if r[i2][i1] != 0.0 {
            let f = -r[i2][i1];
            for col in 0..6 {
                r[i2][col] += f * r[i1][col];
            }
        }

        if r[i2][i2] == 0.0 {
            return None;
        }
        let d = 1.0 / r[i2][i2];
        for col in 0..6 {
            r[i2][col] *= d;
        }
        if r[i0][i2] != 0.0 {
            let f = -r[i0][i2];
            for col in 0..6 {
                r[i0][col] += f * r[i2][col];
            }
        }
        if r[i1][i2] != 0.0 {
            let f = -r[i1][i2];
            for col in 0..6 {
                r[i1][col] += f * r[i2][col];
            }
        }

        let mut t = Self::IDENTITY;
        for i in 0..3 {
            for j in 0..3 {
                t.m[i][j] = r[i][3 + j];
            }
        }
        Some(t)
    }

    /// Change of basis between two plane frames: the result maps
    /// `plane0` coordinates of a point to its `plane1` coordinates.
    #[must_use]
    pub fn change_basis(plane0: &Plane, plane1: &Plane) -> Option<Self> {
        let f0 = Self::plane_frame(plane0);
        let t1 = Self::translation(Point3::ORIGIN - plane1.origin());
        let cb = Self::change_basis_vectors(
            Vector3::X_AXIS,
            Vector3::Y_AXIS,
            Vector3::Z_AXIS,
            plane1.x_axis(),
            plane1.y_axis(),
            plane1.z_axis(),
        )?;
        Some(cb * t1 * f0)
    }

    /// Determinant by cofactor expansion along the first row.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.m[0][0] * self.minor_determinant(0, 0) - self.m[0][1] * self.minor_determinant(0, 1)
            + self.m[0][2] * self.minor_determinant(0, 2)
            - self.m[0][3] * self.minor_determinant(0, 3)
    }

    /// Determinant of the 3x3 minor that omits `row` and `col`.
    fn minor_determinant(&self, row: usize, col: usize) -> f64 {
        let mut sub = [[0.0; 3]; 3];
        let mut si = 0;
        for i in 0..4 {
            if i == row {
                continue;
            }
            let mut sj = 0;
            for j in 0..4 {
                if j == col {
                    continue;
                }
                sub[si][sj] = self.m[i][j];
                sj += 1;
            }
            si += 1;
        }
        sub[0][0] * (sub[1][1] * sub[2][2] - sub[1][2] * sub[2][1])
            - sub[0][1] * (sub[1][0] * sub[2][2] - sub[1][2] * sub[2][0])
            + sub[0][2] * (sub[1][0] * sub[2][1] - sub[1][1] * sub[2][0])
    }

    /// Inverse via the adjugate (16 signed 3x3 cofactors), or `None`
    /// when `|determinant| <= EPSILON`.
    #[must_use]
    pub fn try_get_inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() <= EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let mut out = Self::IDENTITY;
        for i in 0..4 {
            for j in 0..4 {
                let sign = if (i + j) % 2 == 0 { 1.0 } else { -1.0 };
                out.m[j][i] = sign * self.minor_determinant(i, j) * inv_det;
            }
        }
        Some(out)
    }

    /// In-place inversion. On failure the receiver keeps the original
    /// (un-invertible) matrix and false is returned.
    pub fn invert(&mut self) -> bool {
        if let Some(inverse) = self.try_get_inverse() {
            *self = inverse;
            true
        } else {
            false
        }
    }

    /// Row/column swap.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut t = Self::IDENTITY;
        for i in 0..4 {
            for j in 0..4 {
                t.m[i][j] = self.m[j][i];
            }
        }
        t
    }

    /// Checked entry access.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::NumericError::IndexOutOfRange`] when
    /// either index is above 3.
    pub fn entry(&self, row: usize, col: usize) -> Result<f64> {
        if row > 3 || col > 3 {
            return Err(crate::error::NumericError::IndexOutOfRange {
                target: "Transform",
                index: row.max(col),
            }
            .into());
        }
        Ok(self.m[row][col])
    }

    /// Total lexicographic order over the 16 entries in row-major order.
    ///
    /// The source geometry kernels disagree on matrix ordering; this
    /// crate uses `f64::total_cmp` per entry, first difference wins.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        for i in 0..4 {
            for j in 0..4 {
                let ord = self.m[i][j].total_cmp(&other.m[i][j]);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
        Ordering::Equal
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Matrix product. The right factor acts first on points:
/// `(a * b) * p == a * (b * p)`.
impl Mul for Transform {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut out = Self::ZERO_TRANSFORMATION;
        for i in 0..4 {
            for j in 0..4 {
                out.m[i][j] = self.m[i][0] * rhs.m[0][j]
                    + self.m[i][1] * rhs.m[1][j]
                    + self.m[i][2] * rhs.m[2][j]
                    + self.m[i][3] * rhs.m[3][j];
            }
        }
        out
    }
}

/// Applies the full homogeneous map, dividing by `w` when it is nonzero.
impl Mul<Point3> for Transform {
    type Output = Point3;
    fn mul(self, p: Point3) -> Point3 {
        let m = &self.m;
        let mut w = m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3];
        if w != 0.0 {
            w = 1.0 / w;
        }
        Point3::new(
            w * (m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3]),
            w * (m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3]),
            w * (m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3]),
        )
    }
}

/// Applies the linear 3x3 part only; directions ignore translation.
impl Mul<Vector3> for Transform {
    type Output = Vector3;
    fn mul(self, v: Vector3) -> Vector3 {
        let m = &self.m;
        Vector3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }
}

impl Index<(usize, usize)> for Transform {
    type Output = f64;

    /// # Panics
    ///
    /// Panics when either index is above 3.
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(
            row < 4 && col < 4,
            "entry ({row},{col}) out of range for Transform"
        );
        &self.m[row][col]
    }
}

impl IndexMut<(usize, usize)> for Transform {
    /// # Panics
    ///
    /// Panics when either index is above 3.
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        assert!(
            row < 4 && col < 4,
            "entry ({row},{col}) out of range for Transform"
        );
        &mut self.m[row][col]
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.m.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{},{},{},{}", row[0], row[1], row[2], row[3])?;
        }
        Ok(())
    }
}
