use std::f64::consts::{FRAC_PI_2, TAU};

use crate::error::{GeometryError, Result};
use crate::geometry::{BoundingBox, Plane};
use crate::math::scalar::{epsilon_equals, is_valid_double, SQRT_EPSILON};
use crate::math::{Interval, Point3, Transform, Vector3};

use super::{Circle, Curve};

/// A circular arc: a plane frame, a radius, and an angle interval in
/// radians.
///
/// Shares the trigonometric parameterization of [`Circle`] restricted to
/// the angle interval. Degenerate constructions produce an invalid arc
/// reported by [`Arc::is_valid`] rather than an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    plane: Plane,
    radius: f64,
    angle: Interval,
}

impl Arc {
    /// Creates an arc in `plane` around its origin, sweeping `angle`.
    #[must_use]
    pub fn new(plane: Plane, radius: f64, angle: Interval) -> Self {
        Self {
            plane,
            radius,
            angle,
        }
    }

    /// Restriction of `circle` to the angle interval `angle`.
    #[must_use]
    pub fn from_circle(circle: &Circle, angle: Interval) -> Self {
        Self {
            plane: *circle.plane(),
            radius: circle.radius(),
            angle,
        }
    }

    /// The invalid zero-radius fallback.
    #[must_use]
    pub fn unset() -> Self {
        Self {
            plane: Plane::world_xy(),
            radius: 0.0,
            angle: Interval::UNSET,
        }
    }

    /// Returns whether the plane is valid, the radius is a positive
    /// usable double, and the angle interval sweeps forward.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.plane.is_valid()
            && is_valid_double(self.radius)
            && self.radius > 0.0
            && self.angle.is_increasing()
    }

    /// The frame of the arc.
    #[must_use]
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Radius of the arc.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Center of the parent circle.
    #[must_use]
    pub fn center(&self) -> Point3 {
        self.plane.origin()
    }

    /// The angle interval in radians.
    #[must_use]
    pub fn angle_domain(&self) -> Interval {
        self.angle
    }

    /// Swept angle `t1 - t0`.
    #[must_use]
    pub fn angle_sweep(&self) -> f64 {
        self.angle.length()
    }

    /// Arc length: `radius * |sweep|`.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.angle.length().abs()
    }

    /// The full circle this arc lies on.
    #[must_use]
    pub fn circle(&self) -> Circle {
        Circle::new(self.plane, self.radius)
    }

    /// Point at angle `t` radians from the X axis of the frame.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        self.plane.origin()
            + self.plane.x_axis() * (self.radius * t.cos())
            + self.plane.y_axis() * (self.radius * t.sin())
    }

    /// Unit tangent at angle `t`, or `None` for a degenerate arc.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Option<Vector3> {
        (self.plane.y_axis() * t.cos() - self.plane.x_axis() * t.sin()).unitized()
    }

    /// Point at the start of the angle interval.
    #[must_use]
    pub fn start_point(&self) -> Point3 {
        self.point_at(self.angle.t0)
    }

    /// Point at the middle of the angle interval.
    #[must_use]
    pub fn mid_point(&self) -> Point3 {
        self.point_at(self.angle.mid())
    }

    /// Point at the end of the angle interval.
    #[must_use]
    pub fn end_point(&self) -> Point3 {
        self.point_at(self.angle.t1)
    }

    /// Axis-aligned bounds of the swept portion: the endpoints plus the
    /// circle's quadrant extremes that fall inside the angle interval. A
    /// sweep of a full turn or more bounds the whole circle.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        if !is_valid_double(self.radius) || !self.angle.is_valid() {
            return BoundingBox::UNSET;
        }
        if self.angle.length().abs() >= TAU {
            return self.circle().bounding_box();
        }
        let mut bbox = BoundingBox::from_points([self.start_point(), self.end_point()]);
        let mut quadrant = (self.angle.min() / FRAC_PI_2).ceil() * FRAC_PI_2;
        while quadrant <= self.angle.max() {
            bbox.union_point(self.point_at(quadrant));
            quadrant += FRAC_PI_2;
        }
        bbox
    }

    /// Applies `xform` to the frame, rescaling the radius the same way
    /// [`Circle::transform`] does. Returns false (receiver unchanged)
    /// when the transformed frame is degenerate.
    pub fn transform(&mut self, xform: Transform) -> bool {
        let scale = Circle::radius_scale(&self.plane, xform);
        if !self.plane.transform(xform) {
            return false;
        }
        self.radius *= scale;
        self.is_valid()
    }

    /// Tolerant comparison of frame, radius, and angle interval.
    #[must_use]
    pub fn epsilon_equals(&self, other: &Self, epsilon: f64) -> bool {
        self.plane.epsilon_equals(&other.plane, epsilon)
            && epsilon_equals(self.radius, other.radius, epsilon)
            && self.angle.epsilon_equals(other.angle, epsilon)
    }
}

impl Curve for Arc {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.point_at(t))
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        self.tangent_at(t)
            .ok_or_else(|| GeometryError::ZeroVector.into())
    }

    fn domain(&self) -> Interval {
        self.angle
    }

    fn is_closed(&self) -> bool {
        (self.angle.length().abs() - TAU).abs() <= SQRT_EPSILON
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn quarter_arc(radius: f64) -> Arc {
        Arc::new(Plane::world_xy(), radius, Interval::new(0.0, FRAC_PI_2))
    }

    #[test]
    fn endpoints_of_quarter_arc() {
        let arc = quarter_arc(2.0);
        assert!(arc.is_valid());
        assert!(arc.start_point().epsilon_equals(Point3::new(2.0, 0.0, 0.0), 1e-12));
        assert!(arc.end_point().epsilon_equals(Point3::new(0.0, 2.0, 0.0), 1e-9));
        let mid = arc.mid_point();
        let d = 2.0 / 2.0_f64.sqrt();
        assert!(mid.epsilon_equals(Point3::new(d, d, 0.0), 1e-9));
    }

    #[test]
    fn length_is_radius_times_sweep() {
        assert!((quarter_arc(2.0).length() - PI).abs() < 1e-12);
    }

    #[test]
    fn invalid_constructions_are_flagged() {
        assert!(!Arc::new(Plane::world_xy(), 0.0, Interval::new(0.0, 1.0)).is_valid());
        // A backwards interval is a degenerate sweep, not an error.
        assert!(!Arc::new(Plane::world_xy(), 1.0, Interval::new(1.0, 0.0)).is_valid());
        assert!(!Arc::unset().is_valid());
    }

    #[test]
    fn bounding_box_quarter_arc() {
        // First-quadrant arc: bounds are the unit square of the radius.
        let bbox = quarter_arc(1.0).bounding_box();
        assert!(bbox.min.epsilon_equals(Point3::ORIGIN, 1e-9));
        assert!(bbox.max.epsilon_equals(Point3::new(1.0, 1.0, 0.0), 1e-9));
    }

    #[test]
    fn bounding_box_crosses_quadrant_extreme() {
        // Sweep through the top of the circle: the Y extreme at PI/2
        // exceeds both endpoint Y values.
        let arc = Arc::new(
            Plane::world_xy(),
            1.0,
            Interval::new(FRAC_PI_2 - 0.5, FRAC_PI_2 + 0.5),
        );
        let bbox = arc.bounding_box();
        assert!((bbox.max.y - 1.0).abs() < 1e-9);
        assert!(bbox.max.x < 0.5 + 1e-9);
    }

    #[test]
    fn full_sweep_bounds_whole_circle() {
        let arc = Arc::new(Plane::world_xy(), 1.0, Interval::new(0.0, TAU));
        let bbox = arc.bounding_box();
        assert!(bbox.min.epsilon_equals(Point3::new(-1.0, -1.0, 0.0), 1e-9));
        assert!(bbox.max.epsilon_equals(Point3::new(1.0, 1.0, 0.0), 1e-9));
    }

    #[test]
    fn transform_scales_radius() {
        let mut arc = quarter_arc(1.0);
        assert!(arc.transform(Transform::scale(Point3::ORIGIN, 2.0)));
        assert!((arc.radius() - 2.0).abs() < 1e-12);
        assert!(arc.start_point().epsilon_equals(Point3::new(2.0, 0.0, 0.0), 1e-9));
    }

    #[test]
    fn curve_trait_domain_and_closure() {
        let arc = quarter_arc(1.0);
        let d = arc.domain();
        assert!(d.t0.abs() < 1e-15 && (d.t1 - FRAC_PI_2).abs() < 1e-15);
        assert!(!arc.is_closed());
        let full = Arc::new(Plane::world_xy(), 1.0, Interval::new(0.0, TAU));
        assert!(full.is_closed());
        let t = arc.tangent(0.0).unwrap();
        assert!((t.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn from_circle_keeps_frame() {
        let circle = Circle::from_center_radius(Point3::new(1.0, 2.0, 3.0), 5.0);
        let arc = Arc::from_circle(&circle, Interval::new(0.0, PI));
        assert!(arc.is_valid());
        assert!(arc.center().epsilon_equals(Point3::new(1.0, 2.0, 3.0), 0.0));
        assert!((arc.radius() - 5.0).abs() < 1e-15);
        assert!(arc.start_point().epsilon_equals(circle.point_at(0.0), 1e-12));
    }
}
