use crate::error::{GeometryError, Result};
use crate::math::scalar::{
    epsilon_equals, is_valid_double, solve_3x3, POS_MIN_DBL, SQRT_EPSILON, UNSET_VALUE,
    ZERO_TOLERANCE,
};
use crate::math::vector3::is_right_hand_frame;
use crate::math::{Point3, Transform, Vector3};

use super::curve::Line;

/// Implicit plane representation `Ax + By + Cz + D = 0` with `(A, B, C)`
/// a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneEquation {
    /// X component of the unit normal.
    pub x: f64,
    /// Y component of the unit normal.
    pub y: f64,
    /// Z component of the unit normal.
    pub z: f64,
    /// Offset term.
    pub d: f64,
}

impl PlaneEquation {
    /// Creates an equation from raw coefficients, normalizing all four in
    /// place.
    ///
    /// # Errors
    ///
    /// Returns an error when `(a, b, c)` is zero-length.
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        let length = Vector3::new(a, b, c).length();
        if length <= POS_MIN_DBL {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            x: a / length,
            y: b / length,
            z: c / length,
            d: d / length,
        })
    }

    /// Equation of the plane through `origin` with normal `normal`.
    ///
    /// # Errors
    ///
    /// Returns an error when `normal` is zero-length.
    pub fn from_point_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let mut n = normal;
        if !n.unitize() {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            x: n.x,
            y: n.y,
            z: n.z,
            d: -(n.x * origin.x + n.y * origin.y + n.z * origin.z),
        })
    }

    /// Signed evaluation of the equation at `point`.
    #[must_use]
    pub fn value_at(&self, point: Point3) -> f64 {
        self.x * point.x + self.y * point.y + self.z * point.z + self.d
    }

    /// The normal `(A, B, C)` as a vector.
    #[must_use]
    pub fn unit_normal(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Returns whether the coefficients are usable and the normal is
    /// unit length.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_double(self.d) && self.unit_normal().is_unit_vector()
    }
}

/// An oriented plane: origin plus a right-handed orthonormal frame, with
/// the implicit equation cached alongside.
///
/// The equation is derived state. Every construction path and mutator
/// refreshes it, and [`Plane::is_valid`] cross-checks it against the
/// frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    origin: Point3,
    x_axis: Vector3,
    y_axis: Vector3,
    z_axis: Vector3,
    equation: PlaneEquation,
}

impl Plane {
    /// The world XY plane (normal +Z).
    #[must_use]
    pub fn world_xy() -> Self {
        Self {
            origin: Point3::ORIGIN,
            x_axis: Vector3::X_AXIS,
            y_axis: Vector3::Y_AXIS,
            z_axis: Vector3::Z_AXIS,
            equation: PlaneEquation {
                x: 0.0,
                y: 0.0,
                z: 1.0,
                d: 0.0,
            },
        }
    }

    /// The world YZ plane (normal +X).
    #[must_use]
    pub fn world_yz() -> Self {
        Self {
            origin: Point3::ORIGIN,
            x_axis: Vector3::Y_AXIS,
            y_axis: Vector3::Z_AXIS,
            z_axis: Vector3::X_AXIS,
            equation: PlaneEquation {
                x: 1.0,
                y: 0.0,
                z: 0.0,
                d: 0.0,
            },
        }
    }

    /// The world ZX plane (normal +Y).
    #[must_use]
    pub fn world_zx() -> Self {
        Self {
            origin: Point3::ORIGIN,
            x_axis: Vector3::Z_AXIS,
            y_axis: Vector3::X_AXIS,
            z_axis: Vector3::Y_AXIS,
            equation: PlaneEquation {
                x: 0.0,
                y: 1.0,
                z: 0.0,
                d: 0.0,
            },
        }
    }

    /// The invalid unset plane.
    #[must_use]
    pub fn unset() -> Self {
        Self {
            origin: Point3::UNSET,
            x_axis: Vector3::UNSET,
            y_axis: Vector3::UNSET,
            z_axis: Vector3::UNSET,
            equation: PlaneEquation {
                x: UNSET_VALUE,
                y: UNSET_VALUE,
                z: UNSET_VALUE,
                d: UNSET_VALUE,
            },
        }
    }

    /// Creates a plane from an origin and a normal direction.
    ///
    /// The X axis is an arbitrary well-conditioned perpendicular to the
    /// normal; Y completes the right-handed frame.
    ///
    /// # Errors
    ///
    /// Returns an error when `normal` is zero-length.
    pub fn new(origin: Point3, normal: Vector3) -> Result<Self> {
        let mut z_axis = normal;
        if !z_axis.unitize() {
            return Err(GeometryError::ZeroVector.into());
        }
        let mut x_axis = Vector3::ZERO;
        if !x_axis.perpendicular_to(z_axis) || !x_axis.unitize() {
            return Err(GeometryError::ZeroVector.into());
        }
        let mut y_axis = Vector3::cross(z_axis, x_axis);
        if !y_axis.unitize() {
            return Err(GeometryError::ZeroVector.into());
        }
        Self::from_axes(origin, x_axis, y_axis, z_axis)
    }

    /// Creates a plane from an origin and two in-plane directions.
    ///
    /// `x_dir` fixes the X axis; `y_dir` only picks the side of the
    /// plane. The stored Y axis is rebuilt from the normal so the frame
    /// is exactly orthonormal even when the inputs are not.
    ///
    /// # Errors
    ///
    /// Returns an error when either direction is zero-length or the
    /// directions are parallel.
    pub fn from_frame(origin: Point3, x_dir: Vector3, y_dir: Vector3) -> Result<Self> {
        let mut x_axis = x_dir;
        if !x_axis.unitize() {
            return Err(GeometryError::ZeroVector.into());
        }
        let mut z_axis = Vector3::cross(x_axis, y_dir);
        if !z_axis.unitize() {
            return Err(GeometryError::Degenerate(
                "plane directions are parallel".into(),
            )
            .into());
        }
        let y_axis = Vector3::cross(z_axis, x_axis);
        Self::from_axes(origin, x_axis, y_axis, z_axis)
    }

    /// Creates a plane through three points. The origin is `p1` and the
    /// X axis points from `p1` toward `p2`.
    ///
    /// # Errors
    ///
    /// Returns an error when the points are coincident or collinear.
    pub fn from_points(p1: Point3, p2: Point3, p3: Point3) -> Result<Self> {
        let z_axis = Vector3::perpendicular_to_points(p1, p2, p3).ok_or_else(|| {
            GeometryError::Degenerate("plane points are collinear".into())
        })?;
        let mut x_axis = p2 - p1;
        if !x_axis.unitize() {
            return Err(GeometryError::ZeroVector.into());
        }
        let mut y_axis = Vector3::cross(z_axis, x_axis);
        if !y_axis.unitize() {
            return Err(GeometryError::ZeroVector.into());
        }
        Self::from_axes(p1, x_axis, y_axis, z_axis)
    }

    /// Creates a plane from raw equation coefficients.
    ///
    /// # Errors
    ///
    /// Returns an error when `(a, b, c)` is zero-length.
    pub fn from_equation(a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        let equation = PlaneEquation::new(a, b, c, d)?;
        let z_axis = equation.unit_normal();
        let origin = Point3::from_vector(z_axis * -equation.d);
        let mut x_axis = Vector3::ZERO;
        if !x_axis.perpendicular_to(z_axis) || !x_axis.unitize() {
            return Err(GeometryError::ZeroVector.into());
        }
        let mut y_axis = Vector3::cross(z_axis, x_axis);
        if !y_axis.unitize() {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            origin,
            x_axis,
            y_axis,
            z_axis,
            equation,
        })
    }

    fn from_axes(
        origin: Point3,
        x_axis: Vector3,
        y_axis: Vector3,
        z_axis: Vector3,
    ) -> Result<Self> {
        let equation = PlaneEquation::from_point_normal(origin, z_axis)?;
        Ok(Self {
            origin,
            x_axis,
            y_axis,
            z_axis,
            equation,
        })
    }

    /// Origin of the frame.
    #[must_use]
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Unit X axis of the frame.
    #[must_use]
    pub fn x_axis(&self) -> Vector3 {
        self.x_axis
    }

    /// Unit Y axis of the frame.
    #[must_use]
    pub fn y_axis(&self) -> Vector3 {
        self.y_axis
    }

    /// Unit normal (the frame's Z axis).
    #[must_use]
    pub fn z_axis(&self) -> Vector3 {
        self.z_axis
    }

    /// Unit normal; alias of [`Plane::z_axis`].
    #[must_use]
    pub fn normal(&self) -> Vector3 {
        self.z_axis
    }

    /// The cached implicit equation.
    #[must_use]
    pub fn equation(&self) -> PlaneEquation {
        self.equation
    }

    /// Moves the origin, refreshing the cached equation.
    pub fn set_origin(&mut self, origin: Point3) -> bool {
        self.origin = origin;
        self.update_equation()
    }

    /// Recomputes the cached equation from the current origin and
    /// normal. Returns false when the normal is zero-length.
    pub fn update_equation(&mut self) -> bool {
        match PlaneEquation::from_point_normal(self.origin, self.z_axis) {
            Ok(equation) => {
                self.equation = equation;
                true
            }
            Err(_) => false,
        }
    }

    /// Full validity check: the cached equation must hold at the origin
    /// (the absolute test loosens by a relative factor once coordinates
    /// grow past 1000), the frame must be right-handed orthonormal, and
    /// the cached unit normal must agree with the Z axis.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if !self.origin.is_valid() || !self.equation.is_valid() {
            return false;
        }
        let x = self.equation.value_at(self.origin);
        if x.abs() > ZERO_TOLERANCE {
            let tol = self.origin.maximum_coordinate() + self.equation.d.abs();
            if !(tol > 1000.0 && x.abs() <= tol * SQRT_EPSILON) {
                return false;
            }
        }
        if !is_right_hand_frame(self.x_axis, self.y_axis, self.z_axis) {
            return false;
        }
        (self.equation.unit_normal().dot(self.z_axis) - 1.0).abs() <= SQRT_EPSILON
    }

    /// Point at frame coordinates `(u, v)`.
    #[must_use]
    pub fn point_at(&self, u: f64, v: f64) -> Point3 {
        self.origin + self.x_axis * u + self.y_axis * v
    }

    /// Frame coordinates of the projection of `point` onto the plane.
    #[must_use]
    pub fn closest_parameter(&self, point: Point3) -> (f64, f64) {
        let v = point - self.origin;
        (v.dot(self.x_axis), v.dot(self.y_axis))
    }

    /// Projection of `point` onto the plane.
    #[must_use]
    pub fn closest_point(&self, point: Point3) -> Point3 {
        let (u, v) = self.closest_parameter(point);
        self.point_at(u, v)
    }

    /// Signed distance from `point` to the plane; positive on the
    /// normal side.
    #[must_use]
    pub fn distance_to(&self, point: Point3) -> f64 {
        (point - self.origin).dot(self.z_axis)
    }

    /// Signed evaluation of the cached equation at `point`.
    #[must_use]
    pub fn value_at(&self, point: Point3) -> f64 {
        self.equation.value_at(point)
    }

    /// Point common to three planes, or `None` when the normal system is
    /// singular (two or more planes parallel or coincident).
    #[must_use]
    pub fn intersect_planes(a: &Self, b: &Self, c: &Self) -> Option<Point3> {
        let rows = [
            [a.equation.x, a.equation.y, a.equation.z],
            [b.equation.x, b.equation.y, b.equation.z],
            [c.equation.x, c.equation.y, c.equation.z],
        ];
        let rhs = [-a.equation.d, -b.equation.d, -c.equation.d];
        solve_3x3(rows, rhs)
            .ok()
            .map(|[x, y, z]| Point3::new(x, y, z))
    }

    /// Line of intersection with `other`, or `None` for parallel or
    /// coincident planes.
    ///
    /// An auxiliary third plane through the midpoint of the origins,
    /// normal to the cross of the two normals, reduces the problem to
    /// the three-plane point.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Line> {
        let direction = Vector3::cross(other.z_axis, self.z_axis);
        let midpoint = Point3::interpolate(self.origin, other.origin, 0.5);
        let auxiliary = Self::new(midpoint, direction).ok()?;
        let from = Self::intersect_planes(self, other, &auxiliary)?;
        Some(Line::new(from, from + direction))
    }

    /// Rotates the frame about an axis through the plane origin.
    ///
    /// Rotation about the plane's own normal stays in closed form in the
    /// plane (no matrix is built); any other axis goes through the full
    /// rotation transform.
    pub fn rotate(&mut self, sin_angle: f64, cos_angle: f64, axis: Vector3) -> bool {
        if axis == self.z_axis {
            let x = self.x_axis * cos_angle + self.y_axis * sin_angle;
            let y = self.y_axis * cos_angle - self.x_axis * sin_angle;
            self.x_axis = x;
            self.y_axis = y;
            self.update_equation()
        } else {
            match Transform::rotation_from_sin_cos(sin_angle, cos_angle, axis, self.origin) {
                Ok(rotation) => self.transform(rotation),
                Err(_) => false,
            }
        }
    }

    /// Rotates the frame about an axis through `center`.
    pub fn rotate_about_center(
        &mut self,
        sin_angle: f64,
        cos_angle: f64,
        axis: Vector3,
        center: Point3,
    ) -> bool {
        if center == self.origin {
            return self.rotate(sin_angle, cos_angle, axis);
        }
        match Transform::rotation_from_sin_cos(sin_angle, cos_angle, axis, center) {
            Ok(rotation) => self.transform(rotation),
            Err(_) => false,
        }
    }

    /// Moves the plane by `motion`.
    pub fn translate(&mut self, motion: Vector3) -> bool {
        if !motion.is_valid() {
            return false;
        }
        self.origin = self.origin + motion;
        self.update_equation()
    }

    /// Applies `xform` to the frame, rebuilding an exactly orthonormal
    /// frame from the transformed axes. Mirror transforms flip the
    /// normal correctly because the axes are transformed as point
    /// differences. Returns false (receiver unchanged) when the
    /// transformed frame is degenerate.
    pub fn transform(&mut self, xform: Transform) -> bool {
        if xform.is_identity() {
            return self.is_valid();
        }
        let origin = xform * self.origin;
        let x_dir = (xform * (self.origin + self.x_axis)) - origin;
        let y_dir = (xform * (self.origin + self.y_axis)) - origin;
        match Self::from_frame(origin, x_dir, y_dir) {
            Ok(plane) => {
                *self = plane;
                true
            }
            Err(_) => false,
        }
    }

    /// Reverses orientation: swaps the X and Y axes and negates the
    /// normal.
    pub fn flip(&mut self) -> bool {
        std::mem::swap(&mut self.x_axis, &mut self.y_axis);
        self.z_axis = -self.z_axis;
        self.update_equation()
    }

    /// Tolerant componentwise comparison of origin and frame.
    #[must_use]
    pub fn epsilon_equals(&self, other: &Self, epsilon: f64) -> bool {
        self.origin.epsilon_equals(other.origin, epsilon)
            && epsilon_equals(self.x_axis.x, other.x_axis.x, epsilon)
            && epsilon_equals(self.x_axis.y, other.x_axis.y, epsilon)
            && epsilon_equals(self.x_axis.z, other.x_axis.z, epsilon)
            && epsilon_equals(self.y_axis.x, other.y_axis.x, epsilon)
            && epsilon_equals(self.y_axis.y, other.y_axis.y, epsilon)
            && epsilon_equals(self.y_axis.z, other.y_axis.z, epsilon)
            && epsilon_equals(self.z_axis.x, other.z_axis.x, epsilon)
            && epsilon_equals(self.z_axis.y, other.z_axis.y, epsilon)
            && epsilon_equals(self.z_axis.z, other.z_axis.z, epsilon)
    }
}
