use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::geometry::{BoundingBox, Plane};
use crate::math::scalar::{epsilon_equals, is_valid_double, SQRT_EPSILON};
use crate::math::{Interval, Point3, Transform, Vector3};

use super::Curve;

/// A full circle: a plane frame plus a radius.
///
/// `point_at(t) = origin + radius * (cos(t) * x_axis + sin(t) * y_axis)`
/// over the domain `[0, 2*pi]`.
///
/// Degenerate constructions (zero radius, collinear points) produce an
/// invalid zero-radius circle reported by [`Circle::is_valid`] rather
/// than an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    plane: Plane,
    radius: f64,
}

impl Circle {
    /// Creates a circle in `plane` around its origin.
    #[must_use]
    pub fn new(plane: Plane, radius: f64) -> Self {
        Self { plane, radius }
    }

    /// Circle around `center` parallel to the world XY plane.
    #[must_use]
    pub fn from_center_radius(center: Point3, radius: f64) -> Self {
        let mut plane = Plane::world_xy();
        plane.set_origin(center);
        Self { plane, radius }
    }

    /// The invalid zero-radius fallback.
    #[must_use]
    pub fn unset() -> Self {
        Self {
            plane: Plane::world_xy(),
            radius: 0.0,
        }
    }

    /// Circle through three points.
    ///
    /// The center is the common point of the plane through the points
    /// and the two perpendicular-bisector planes of the first two point
    /// pairs; the X axis points from the center toward the first point.
    /// Collinear or coincident input yields the invalid zero-radius
    /// fallback.
    #[must_use]
    pub fn from_three_points(a: Point3, b: Point3, c: Point3) -> Self {
        let Ok(through) = Plane::from_points(a, b, c) else {
            return Self::unset();
        };
        let Ok(bisector_ab) = Plane::new(Point3::interpolate(a, b, 0.5), b - a) else {
            return Self::unset();
        };
        let Ok(bisector_bc) = Plane::new(Point3::interpolate(b, c, 0.5), c - b) else {
            return Self::unset();
        };
        let Some(center) = Plane::intersect_planes(&through, &bisector_ab, &bisector_bc) else {
            return Self::unset();
        };
        let x_dir = a - center;
        let Ok(plane) = Plane::from_frame(center, x_dir, Vector3::cross(through.normal(), x_dir))
        else {
            return Self::unset();
        };
        Self {
            plane,
            radius: center.distance_to(a),
        }
    }

    /// Returns whether the plane is valid and the radius is a positive
    /// usable double.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.plane.is_valid() && is_valid_double(self.radius) && self.radius > 0.0
    }

    /// The frame of the circle.
    #[must_use]
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Radius of the circle.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Center of the circle.
    #[must_use]
    pub fn center(&self) -> Point3 {
        self.plane.origin()
    }

    /// Unit normal of the circle plane.
    #[must_use]
    pub fn normal(&self) -> Vector3 {
        self.plane.normal()
    }

    /// Twice the radius.
    #[must_use]
    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }

    /// Perimeter length.
    #[must_use]
    pub fn circumference(&self) -> f64 {
        TAU * self.radius
    }

    /// Point at angle `t` radians from the X axis of the frame.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        self.plane.origin()
            + self.plane.x_axis() * (self.radius * t.cos())
            + self.plane.y_axis() * (self.radius * t.sin())
    }

    /// Unit tangent at angle `t`, or `None` for a degenerate circle.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Option<Vector3> {
        (self.plane.y_axis() * t.cos() - self.plane.x_axis() * t.sin()).unitized()
    }

    /// Angle of the point on the circle closest to `point`, in
    /// `[0, 2*pi)`. Returns 0 when `point` projects onto the center.
    #[must_use]
    pub fn closest_parameter(&self, point: Point3) -> f64 {
        let (u, v) = self.plane.closest_parameter(point);
        if u == 0.0 && v == 0.0 {
            return 0.0;
        }
        let t = v.atan2(u);
        if t < 0.0 {
            t + TAU
        } else {
            t
        }
    }

    /// Point on the circle closest to `point`.
    #[must_use]
    pub fn closest_point(&self, point: Point3) -> Point3 {
        self.point_at(self.closest_parameter(point))
    }

    /// Exact axis-aligned bounds: the circle extends along each world
    /// axis by `radius * hypot(x_axis_i, y_axis_i)`.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        let x = self.plane.x_axis();
        let y = self.plane.y_axis();
        let extent = Vector3::new(
            self.radius * x.x.hypot(y.x),
            self.radius * x.y.hypot(y.y),
            self.radius * x.z.hypot(y.z),
        );
        let center = self.center();
        BoundingBox::new(center - extent, center + extent)
    }

    /// Scale factor `xform` applies to a radius in this circle's plane:
    /// the common axis-image length for a uniform scale, otherwise the
    /// square root of the in-plane area factor.
    pub(crate) fn radius_scale(plane: &Plane, xform: Transform) -> f64 {
        let x_image = xform * plane.x_axis();
        let y_image = xform * plane.y_axis();
        let sx = x_image.length();
        let sy = y_image.length();
        if epsilon_equals(sx, sy, SQRT_EPSILON) {
            sx
        } else {
            Vector3::cross(x_image, y_image).length().sqrt()
        }
    }

    /// Applies `xform` to the frame and rescales the radius by the
    /// factor the transform applies in the circle's plane, so similarity
    /// transforms reproduce the scaled radius exactly. Returns false
    /// (receiver unchanged) when the transformed frame is degenerate.
    pub fn transform(&mut self, xform: Transform) -> bool {
        let scale = Self::radius_scale(&self.plane, xform);
        if !self.plane.transform(xform) {
            return false;
        }
        self.radius *= scale;
        self.is_valid()
    }

    /// Tolerant comparison of frame and radius.
    #[must_use]
    pub fn epsilon_equals(&self, other: &Self, epsilon: f64) -> bool {
        self.plane.epsilon_equals(&other.plane, epsilon)
            && epsilon_equals(self.radius, other.radius, epsilon)
    }
}

impl Curve for Circle {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.point_at(t))
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        self.tangent_at(t)
            .ok_or_else(|| GeometryError::ZeroVector.into())
    }

    fn domain(&self) -> Interval {
        Interval::new(0.0, TAU)
    }

    fn is_closed(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn xy_circle(radius: f64) -> Circle {
        Circle::new(Plane::world_xy(), radius)
    }

    #[test]
    fn evaluate_around_the_frame() {
        let c = xy_circle(2.0);
        assert!(c.point_at(0.0).epsilon_equals(Point3::new(2.0, 0.0, 0.0), 1e-12));
        assert!(c
            .point_at(FRAC_PI_2)
            .epsilon_equals(Point3::new(0.0, 2.0, 0.0), 1e-9));
    }

    #[test]
    fn tangent_is_perpendicular_to_radius() {
        let c = xy_circle(3.0);
        let t = c.tangent_at(0.0).unwrap();
        assert!((t.y - 1.0).abs() < 1e-12);
        let radial = c.point_at(1.234) - c.center();
        let tangent = c.tangent_at(1.234).unwrap();
        assert!(radial.dot(tangent).abs() < 1e-9);
    }

    #[test]
    fn zero_radius_is_invalid_not_error() {
        let c = xy_circle(0.0);
        assert!(!c.is_valid());
        assert!(!Circle::unset().is_valid());
        assert!(xy_circle(1.0).is_valid());
    }

    #[test]
    fn three_point_circle_centered() {
        // Points of the unit circle around (1, 1, 0).
        let c = Circle::from_three_points(
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert!(c.is_valid());
        assert!(c.center().epsilon_equals(Point3::new(1.0, 1.0, 0.0), 1e-9));
        assert!((c.radius() - 1.0).abs() < 1e-9);
        // The X axis aims at the first input point.
        assert!(c.point_at(0.0).epsilon_equals(Point3::new(2.0, 1.0, 0.0), 1e-9));
    }

    #[test]
    fn three_point_circle_out_of_plane() {
        let c = Circle::from_three_points(
            Point3::new(1.0, 0.0, 2.0),
            Point3::new(0.0, 1.0, 2.0),
            Point3::new(-1.0, 0.0, 2.0),
        );
        assert!(c.is_valid());
        assert!(c.center().epsilon_equals(Point3::new(0.0, 0.0, 2.0), 1e-9));
        assert!((c.normal().z.abs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn collinear_points_yield_invalid_circle() {
        let c = Circle::from_three_points(
            Point3::ORIGIN,
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        assert!(!c.is_valid());
        assert!((c.radius()).abs() < 1e-15);
    }

    #[test]
    fn closest_parameter_and_point() {
        let c = xy_circle(2.0);
        let t = c.closest_parameter(Point3::new(0.0, 5.0, 1.0));
        assert!((t - FRAC_PI_2).abs() < 1e-12);
        let p = c.closest_point(Point3::new(0.0, 5.0, 1.0));
        assert!(p.epsilon_equals(Point3::new(0.0, 2.0, 0.0), 1e-9));
    }

    #[test]
    fn bounding_box_tilted_plane() {
        let plane = Plane::new(Point3::ORIGIN, Vector3::new(0.0, 1.0, 1.0)).unwrap();
        let c = Circle::new(plane, 1.0);
        let bbox = c.bounding_box();
        assert!(bbox.is_valid());
        // The circle spans the full diameter along X but tilts away from
        // the YZ axes.
        assert!((bbox.max.x - 1.0).abs() < 1e-9);
        assert!(bbox.max.y < 1.0 - 1e-3);
        for t in [0.0, 0.7, 2.1, 4.4, 5.9] {
            assert!(bbox.contains(c.point_at(t), false));
        }
    }

    #[test]
    fn uniform_scale_scales_radius_exactly() {
        let mut c = xy_circle(2.0);
        assert!(c.transform(Transform::scale(Point3::ORIGIN, 3.0)));
        assert!((c.radius() - 6.0).abs() < 1e-12);
        assert!(c.is_valid());
    }

    #[test]
    fn rigid_motion_keeps_radius() {
        let mut c = xy_circle(2.0);
        let motion = Transform::rotation(1.1, Vector3::new(1.0, 2.0, 0.5), Point3::new(3.0, 0.0, 0.0))
            .unwrap()
            * Transform::translation(Vector3::new(0.0, 4.0, -1.0));
        assert!(c.transform(motion));
        assert!((c.radius() - 2.0).abs() < 1e-9);
        assert!(c.is_valid());
    }

    #[test]
    fn skew_falls_back_to_area_scale() {
        // Non-uniform in-plane scale: x doubles, y stays.
        let plane = Plane::world_xy();
        let mut c = Circle::new(plane, 1.0);
        let squash = Transform::scale_non_uniform(&plane, 2.0, 1.0, 1.0);
        assert!(c.transform(squash));
        // Area scales by 2, so the radius estimate is sqrt(2).
        assert_relative_eq!(c.radius(), 2.0_f64.sqrt(), max_relative = 1e-9);
    }

    #[test]
    fn curve_trait_closed_full_domain() {
        let c = xy_circle(1.0);
        assert!(c.is_closed());
        let d = c.domain();
        assert!(d.t0.abs() < 1e-15 && (d.t1 - TAU).abs() < 1e-15);
        assert!((c.circumference() - TAU).abs() < 1e-12);
        assert!((c.diameter() - 2.0).abs() < 1e-15);
    }

    #[test]
    fn epsilon_equals_compares_plane_and_radius() {
        let a = xy_circle(1.0);
        let mut b = xy_circle(1.0 + 1e-12);
        assert!(a.epsilon_equals(&b, 1e-9));
        b = xy_circle(1.1);
        assert!(!a.epsilon_equals(&b, 1e-9));
    }
}
