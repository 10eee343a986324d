use crate::error::{GeometryError, Result};
use crate::math::scalar::{EPSILON, SQRT_EPSILON};
use crate::math::{Interval, Point2, Point3, Transform, Vector2, Vector3};

use super::Curve;
use crate::geometry::BoundingBox;

/// A line segment (or the infinite line it spans) between two points.
///
/// The direction is always derived from the endpoints, never stored. A
/// degenerate line with coincident endpoints is constructible and
/// reported by [`Line::is_valid`], not rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Start point.
    pub from: Point3,
    /// End point.
    pub to: Point3,
}

impl Line {
    /// Creates a line between two points.
    #[must_use]
    pub const fn new(from: Point3, to: Point3) -> Self {
        Self { from, to }
    }

    /// Lifts a planar line into 3D at z = 0.
    #[must_use]
    pub fn from_line2(line: &Line2) -> Self {
        Self::new(line.from.to_point3(), line.to.to_point3())
    }

    /// Returns whether the endpoints are usable and distinct.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.from.is_valid() && self.to.is_valid() && self.from != self.to
    }

    /// Length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.from.distance_to(self.to)
    }

    /// Unit direction from start to end; the zero vector for a
    /// degenerate line.
    #[must_use]
    pub fn direction(&self) -> Vector3 {
        (self.to - self.from).unitized().unwrap_or(Vector3::ZERO)
    }

    /// The chord as a vector.
    #[must_use]
    pub fn to_vector(&self) -> Vector3 {
        self.to - self.from
    }

    /// Point at chord parameter `t` (0 at start, 1 at end).
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        Point3::interpolate(self.from, self.to, t)
    }

    /// Chord parameter of the point on the infinite line closest to
    /// `point`, or `None` for a degenerate line.
    ///
    /// The projection is measured from whichever endpoint is nearer the
    /// query point, which keeps the subtraction small and the parameter
    /// accurate far from the other end.
    #[must_use]
    pub fn closest_parameter(&self, point: Point3) -> Option<f64> {
        let d = self.to - self.from;
        let dod = d.length_squared();
        if dod > 0.0 {
            let t = if (point - self.from).length_squared()
                <= (point - self.to).length_squared()
            {
                (point - self.from).dot(d) / dod
            } else {
                1.0 + (point - self.to).dot(d) / dod
            };
            Some(t)
        } else {
            None
        }
    }

    /// Point on the line closest to `point`; with `limit_to_finite` the
    /// parameter is clamped to the segment. A degenerate line returns
    /// its start point.
    #[must_use]
    pub fn closest_point(&self, point: Point3, limit_to_finite: bool) -> Point3 {
        match self.closest_parameter(point) {
            Some(t) => {
                let t = if limit_to_finite { t.clamp(0.0, 1.0) } else { t };
                self.point_at(t)
            }
            None => self.from,
        }
    }

    /// Distance from `point` to the line (or segment).
    #[must_use]
    pub fn distance_to(&self, point: Point3, limit_to_finite: bool) -> f64 {
        self.closest_point(point, limit_to_finite).distance_to(point)
    }

    /// Chord parameters of the mutual closest-approach points of two
    /// infinite lines, or `None` when the lines are parallel or either
    /// is degenerate.
    #[must_use]
    pub fn closest_parameters(a: &Self, b: &Self) -> Option<(f64, f64)> {
        let da = a.to - a.from;
        let db = b.to - b.from;
        let dc = b.from - a.from;
        let aa = da.dot(da);
        let ab = da.dot(db);
        let bb = db.dot(db);
        let ac = da.dot(dc);
        let bc = db.dot(dc);
        let det = aa * bb - ab * ab;
        if det <= EPSILON * aa * bb {
            return None;
        }
        Some(((ac * bb - ab * bc) / det, (ab * ac - aa * bc) / det))
    }

    /// Smallest distance between two lines (infinite extents).
    #[must_use]
    pub fn minimum_distance_to(&self, other: &Self) -> f64 {
        if let Some((t, u)) = Self::closest_parameters(self, other) {
            self.point_at(t).distance_to(other.point_at(u))
        } else if self.closest_parameter(other.from).is_some() {
            self.distance_to(other.from, false)
        } else if other.closest_parameter(self.from).is_some() {
            other.distance_to(self.from, false)
        } else {
            self.from.distance_to(other.from)
        }
    }

    /// Intersection point of two lines.
    ///
    /// The closest-approach parameters are solved on each infinite line;
    /// the result exists only when the lines are not parallel and the
    /// two closest points coincide within `tolerance`. With `is_segment`
    /// both parameters must also lie in `[0, 1]` (with a small epsilon
    /// band for endpoint touches).
    #[must_use]
    pub fn intersect(&self, other: &Self, tolerance: f64, is_segment: bool) -> Option<Point3> {
        let (t, u) = Self::closest_parameters(self, other)?;
        if is_segment {
            let eps = SQRT_EPSILON;
            if t < -eps || t > 1.0 + eps || u < -eps || u > 1.0 + eps {
                return None;
            }
        }
        let p = self.point_at(t);
        let q = other.point_at(u);
        if p.distance_to(q) > tolerance {
            return None;
        }
        Some(Point3::interpolate(p, q, 0.5))
    }

    /// Axis-aligned bounds of the segment.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points([self.from, self.to])
    }

    /// Swaps the endpoints in place.
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    /// Applies `xform` to both endpoints. Returns the validity of the
    /// transformed line.
    pub fn transform(&mut self, xform: Transform) -> bool {
        self.from = xform * self.from;
        self.to = xform * self.to;
        self.is_valid()
    }

    /// Tolerant endpointwise comparison.
    #[must_use]
    pub fn epsilon_equals(&self, other: &Self, epsilon: f64) -> bool {
        self.from.epsilon_equals(other.from, epsilon) && self.to.epsilon_equals(other.to, epsilon)
    }
}

impl Curve for Line {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.point_at(t))
    }

    fn tangent(&self, _t: f64) -> Result<Vector3> {
        (self.to - self.from)
            .unitized()
            .ok_or_else(|| GeometryError::ZeroVector.into())
    }

    fn domain(&self) -> Interval {
        Interval::new(0.0, 1.0)
    }

    fn is_closed(&self) -> bool {
        false
    }
}

/// A planar line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2 {
    /// Start point.
    pub from: Point2,
    /// End point.
    pub to: Point2,
}

impl Line2 {
    /// Creates a planar line between two points.
    #[must_use]
    pub const fn new(from: Point2, to: Point2) -> Self {
        Self { from, to }
    }

    /// Returns whether the endpoints are usable and distinct.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.from.is_valid() && self.to.is_valid() && self.from != self.to
    }

    /// Length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.from.distance_to(self.to)
    }

    /// Unit direction from start to end; the zero vector for a
    /// degenerate line.
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        (self.to - self.from).unitized().unwrap_or(Vector2::ZERO)
    }

    /// Point at chord parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        Point2::interpolate(self.from, self.to, t)
    }

    /// Chord parameter of the closest point on the infinite line, or
    /// `None` for a degenerate line. Measured from the nearer endpoint,
    /// as in the 3D variant.
    #[must_use]
    pub fn closest_parameter(&self, point: Point2) -> Option<f64> {
        let d = self.to - self.from;
        let dod = d.length_squared();
        if dod > 0.0 {
            let t = if (point - self.from).length_squared()
                <= (point - self.to).length_squared()
            {
                (point - self.from).dot(d) / dod
            } else {
                1.0 + (point - self.to).dot(d) / dod
            };
            Some(t)
        } else {
            None
        }
    }

    /// Intersection point of two planar lines.
    ///
    /// Coplanar by construction, the lines either intersect exactly or
    /// are parallel, so only the cross-product denominator is tested.
    /// With `is_segment` both parameters must lie in `[0, 1]` within a
    /// small epsilon band.
    #[must_use]
    pub fn intersect(&self, other: &Self, is_segment: bool) -> Option<Point2> {
        let da = self.to - self.from;
        let db = other.to - other.from;
        let det = Vector2::cross(da, db);
        if det.abs() <= EPSILON * da.length() * db.length() {
            return None;
        }
        let dc = other.from - self.from;
        let t = Vector2::cross(dc, db) / det;
        let u = Vector2::cross(dc, da) / det;
        if is_segment {
            let eps = SQRT_EPSILON;
            if t < -eps || t > 1.0 + eps || u < -eps || u > 1.0 + eps {
                return None;
            }
        }
        Some(self.point_at(t))
    }

    /// Lifts the line into 3D at z = 0.
    #[must_use]
    pub fn to_line(&self) -> Line {
        Line::from_line2(self)
    }

    /// Swaps the endpoints in place.
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    /// Tolerant endpointwise comparison.
    #[must_use]
    pub fn epsilon_equals(&self, other: &Self, epsilon: f64) -> bool {
        self.from.epsilon_equals(other.from, epsilon) && self.to.epsilon_equals(other.to, epsilon)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_line_is_invalid_not_rejected() {
        let line = Line::new(Point3::new(1.0, 1.0, 1.0), Point3::new(1.0, 1.0, 1.0));
        assert!(!line.is_valid());
        assert!(line.closest_parameter(Point3::ORIGIN).is_none());
        assert!(line
            .closest_point(Point3::ORIGIN, false)
            .epsilon_equals(line.from, 0.0));
    }

    #[test]
    fn closest_parameter_interior() {
        let line = Line::new(Point3::ORIGIN, Point3::new(2.0, 0.0, 0.0));
        let t = line.closest_parameter(Point3::new(0.5, 3.0, 0.0)).unwrap();
        assert!((t - 0.25).abs() < 1e-12);
    }

    #[test]
    fn closest_parameter_measured_from_far_end() {
        let line = Line::new(Point3::ORIGIN, Point3::new(10.0, 0.0, 0.0));
        let t = line.closest_parameter(Point3::new(9.0, 1.0, 0.0)).unwrap();
        assert!((t - 0.9).abs() < 1e-12);
    }

    #[test]
    fn closest_point_clamped_to_segment() {
        let line = Line::new(Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0));
        let p = line.closest_point(Point3::new(5.0, 1.0, 0.0), true);
        assert!(p.epsilon_equals(Point3::new(1.0, 0.0, 0.0), 1e-12));
        let p = line.closest_point(Point3::new(5.0, 1.0, 0.0), false);
        assert!(p.epsilon_equals(Point3::new(5.0, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn perpendicular_lines_intersect() {
        let a = Line::new(Point3::ORIGIN, Point3::new(2.0, 0.0, 0.0));
        let b = Line::new(Point3::new(1.0, -1.0, 0.0), Point3::new(1.0, 1.0, 0.0));
        let p = a.intersect(&b, 1e-9, false).unwrap();
        assert!(p.epsilon_equals(Point3::new(1.0, 0.0, 0.0), 1e-9));
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let a = Line::new(Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0));
        let b = Line::new(Point3::new(0.0, 1.0, 0.0), Point3::new(1.0, 1.0, 0.0));
        assert!(a.intersect(&b, 1e-9, false).is_none());
    }

    #[test]
    fn skew_lines_do_not_intersect() {
        let a = Line::new(Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0));
        let b = Line::new(Point3::new(0.0, -1.0, 1.0), Point3::new(0.0, 1.0, 1.0));
        assert!(a.intersect(&b, 1e-9, false).is_none());
        assert!((a.minimum_distance_to(&b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn segment_mode_rejects_out_of_range() {
        let a = Line::new(Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0));
        let b = Line::new(Point3::new(3.0, -1.0, 0.0), Point3::new(3.0, 1.0, 0.0));
        // The infinite lines cross at (3, 0, 0), outside segment a.
        assert!(a.intersect(&b, 1e-9, false).is_some());
        assert!(a.intersect(&b, 1e-9, true).is_none());
    }

    #[test]
    fn segment_mode_accepts_endpoint_touch() {
        let a = Line::new(Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0));
        let b = Line::new(Point3::new(1.0, -1.0, 0.0), Point3::new(1.0, 1.0, 0.0));
        let p = a.intersect(&b, 1e-9, true).unwrap();
        assert!(p.epsilon_equals(Point3::new(1.0, 0.0, 0.0), 1e-9));
    }

    #[test]
    fn transform_translates_endpoints() {
        let mut line = Line::new(Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0));
        assert!(line.transform(Transform::translation(Vector3::new(0.0, 0.0, 4.0))));
        assert!(line.from.epsilon_equals(Point3::new(0.0, 0.0, 4.0), 1e-12));
        assert!(line.to.epsilon_equals(Point3::new(1.0, 0.0, 4.0), 1e-12));
    }

    #[test]
    fn flip_swaps_endpoints() {
        let mut line = Line::new(Point3::ORIGIN, Point3::new(1.0, 2.0, 3.0));
        line.flip();
        assert!(line.from.epsilon_equals(Point3::new(1.0, 2.0, 3.0), 0.0));
        assert!(line.to.epsilon_equals(Point3::ORIGIN, 0.0));
    }

    #[test]
    fn curve_trait_domain_and_tangent() {
        let line = Line::new(Point3::ORIGIN, Point3::new(0.0, 3.0, 0.0));
        let d = line.domain();
        assert!((d.t0).abs() < 1e-15 && (d.t1 - 1.0).abs() < 1e-15);
        let t = line.tangent(0.5).unwrap();
        assert!((t.y - 1.0).abs() < 1e-12);
        assert!(!line.is_closed());
        let degenerate = Line::new(Point3::ORIGIN, Point3::ORIGIN);
        assert!(degenerate.tangent(0.0).is_err());
    }

    #[test]
    fn line2_intersection() {
        let a = Line2::new(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0));
        let b = Line2::new(Point2::new(0.0, 2.0), Point2::new(2.0, 0.0));
        let p = a.intersect(&b, false).unwrap();
        assert!(p.epsilon_equals(Point2::new(1.0, 1.0), 1e-12));
    }

    #[test]
    fn line2_parallel_returns_none() {
        let a = Line2::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        let b = Line2::new(Point2::new(0.0, 1.0), Point2::new(1.0, 2.0));
        assert!(a.intersect(&b, false).is_none());
    }

    #[test]
    fn line2_segment_mode() {
        let a = Line2::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        let b = Line2::new(Point2::new(3.0, -1.0), Point2::new(3.0, 1.0));
        assert!(a.intersect(&b, false).is_some());
        assert!(a.intersect(&b, true).is_none());
    }

    #[test]
    fn line2_lifts_to_3d() {
        let line2 = Line2::new(Point2::new(1.0, 2.0), Point2::new(3.0, 4.0));
        let line = line2.to_line();
        assert!(line.from.epsilon_equals(Point3::new(1.0, 2.0, 0.0), 0.0));
        assert!(line.to.epsilon_equals(Point3::new(3.0, 4.0, 0.0), 0.0));
    }
}
