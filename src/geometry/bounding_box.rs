use crate::math::scalar::SQRT_EPSILON;
use crate::math::{Point3, Transform, Vector3};

/// An axis-aligned box given by its extreme corners.
///
/// A box is valid when `min <= max` holds componentwise. The inverted
/// [`BoundingBox::EMPTY`] sentinel (`min.x > max.x`) represents "no
/// extent" and acts as the identity for union accumulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Corner with the smallest coordinates.
    pub min: Point3,
    /// Corner with the largest coordinates.
    pub max: Point3,
}

impl BoundingBox {
    /// The inverted no-extent sentinel.
    pub const EMPTY: Self = Self {
        min: Point3::new(1.0, 1.0, 1.0),
        max: Point3::new(-1.0, -1.0, -1.0),
    };

    /// Box with both corners set to the unset point.
    pub const UNSET: Self = Self {
        min: Point3::UNSET,
        max: Point3::UNSET,
    };

    /// Creates a box from its corners. The corners are stored as given;
    /// an inverted pair yields an invalid box.
    #[must_use]
    pub const fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every valid point of `points`.
    /// [`BoundingBox::EMPTY`] when no valid point is supplied.
    #[must_use]
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point3>,
    {
        let mut bbox = Self::EMPTY;
        for point in points {
            bbox.union_point(point);
        }
        bbox
    }

    /// Returns whether both corners are usable and `min <= max`
    /// componentwise.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_valid()
            && self.max.is_valid()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.z <= self.max.z
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        Point3::interpolate(self.min, self.max, 0.5)
    }

    /// Diagonal vector from the min corner to the max corner.
    #[must_use]
    pub fn diagonal(&self) -> Vector3 {
        self.max - self.min
    }

    /// The eight corners, bottom face first, counterclockwise from the
    /// min corner as seen from +Z.
    #[must_use]
    pub fn corners(&self) -> [Point3; 8] {
        let (n, x) = (self.min, self.max);
        [
            Point3::new(n.x, n.y, n.z),
            Point3::new(x.x, n.y, n.z),
            Point3::new(x.x, x.y, n.z),
            Point3::new(n.x, x.y, n.z),
            Point3::new(n.x, n.y, x.z),
            Point3::new(x.x, n.y, x.z),
            Point3::new(x.x, x.y, x.z),
            Point3::new(n.x, x.y, x.z),
        ]
    }

    /// Returns whether `point` lies in the box. With `strict` the faces
    /// are excluded.
    #[must_use]
    pub fn contains(&self, point: Point3, strict: bool) -> bool {
        if !self.is_valid() || !point.is_valid() {
            return false;
        }
        if strict {
            point.x > self.min.x
                && point.x < self.max.x
                && point.y > self.min.y
                && point.y < self.max.y
                && point.z > self.min.z
                && point.z < self.max.z
        } else {
            point.x >= self.min.x
                && point.x <= self.max.x
                && point.y >= self.min.y
                && point.y <= self.max.y
                && point.z >= self.min.z
                && point.z <= self.max.z
        }
    }

    /// Point of the box closest to `point`.
    ///
    /// Exterior points clamp componentwise. A strictly interior query
    /// with `include_interior` is returned unchanged; without it the
    /// point is pushed to the nearest bounding face (clamping alone would
    /// leave it where it is). Face-distance ties resolve in X, Y, Z
    /// order.
    #[must_use]
    pub fn closest_point(&self, point: Point3, include_interior: bool) -> Point3 {
        if !self.is_valid() {
            return Point3::UNSET;
        }
        let clamped = Point3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        );
        if include_interior || !self.contains(point, true) {
            return clamped;
        }
        let mut best_axis = 0;
        let mut best_value = self.min.x;
        let mut best_distance = f64::MAX;
        for axis in 0..3 {
            let to_min = point[axis] - self.min[axis];
            let to_max = self.max[axis] - point[axis];
            let (distance, face) = if to_min <= to_max {
                (to_min, self.min[axis])
            } else {
                (to_max, self.max[axis])
            };
            if distance < best_distance {
                best_distance = distance;
                best_axis = axis;
                best_value = face;
            }
        }
        let mut projected = point;
        projected[best_axis] = best_value;
        projected
    }

    /// Grows the box to include `point`. Invalid points are ignored; an
    /// invalid box becomes the single-point box.
    pub fn union_point(&mut self, point: Point3) {
        if !point.is_valid() {
            return;
        }
        if !self.is_valid() {
            self.min = point;
            self.max = point;
            return;
        }
        self.min = Point3::new(
            self.min.x.min(point.x),
            self.min.y.min(point.y),
            self.min.z.min(point.z),
        );
        self.max = Point3::new(
            self.max.x.max(point.x),
            self.max.y.max(point.y),
            self.max.z.max(point.z),
        );
    }

    /// Smallest box covering both operands. An invalid operand is
    /// replaced entirely by the other.
    #[must_use]
    pub fn union(a: Self, b: Self) -> Self {
        match (a.is_valid(), b.is_valid()) {
            (true, true) => Self::new(
                Point3::new(
                    a.min.x.min(b.min.x),
                    a.min.y.min(b.min.y),
                    a.min.z.min(b.min.z),
                ),
                Point3::new(
                    a.max.x.max(b.max.x),
                    a.max.y.max(b.max.y),
                    a.max.z.max(b.max.z),
                ),
            ),
            (true, false) => a,
            (false, true) => b,
            (false, false) => Self::UNSET,
        }
    }

    /// Overlap of both operands; [`BoundingBox::UNSET`] when either
    /// operand is invalid or the operands are disjoint.
    #[must_use]
    pub fn intersection(a: Self, b: Self) -> Self {
        if !a.is_valid() || !b.is_valid() {
            return Self::UNSET;
        }
        let lo = Point3::new(
            a.min.x.max(b.min.x),
            a.min.y.max(b.min.y),
            a.min.z.max(b.min.z),
        );
        let hi = Point3::new(
            a.max.x.min(b.max.x),
            a.max.y.min(b.max.y),
            a.max.z.min(b.max.z),
        );
        let out = Self::new(lo, hi);
        if out.is_valid() {
            out
        } else {
            Self::UNSET
        }
    }

    /// Degeneracy grade: 0 a solid box, 1 flat, 2 a line, 3 a point,
    /// 4 invalid.
    ///
    /// A negative `tolerance` switches to a scale-relative tolerance
    /// derived from the diagonal's largest coordinate.
    #[must_use]
    pub fn is_degenerate(&self, tolerance: f64) -> i32 {
        if !self.is_valid() {
            return 4;
        }
        let diagonal = self.diagonal();
        let tolerance = if tolerance < 0.0 {
            diagonal.x.abs().max(diagonal.y.abs()).max(diagonal.z.abs()) * SQRT_EPSILON
        } else {
            tolerance
        };
        let mut collapsed = 0;
        if diagonal.x <= tolerance {
            collapsed += 1;
        }
        if diagonal.y <= tolerance {
            collapsed += 1;
        }
        if diagonal.z <= tolerance {
            collapsed += 1;
        }
        collapsed
    }

    /// Expands (or shrinks, for negative `amount`) every face by
    /// `amount`.
    pub fn inflate(&mut self, amount: f64) {
        self.inflate_xyz(amount, amount, amount);
    }

    /// Expands each axis pair of faces by its own amount.
    pub fn inflate_xyz(&mut self, x: f64, y: f64, z: f64) {
        if !self.is_valid() {
            return;
        }
        let motion = Vector3::new(x, y, z);
        self.min = self.min - motion;
        self.max = self.max + motion;
    }

    /// Replaces the box by the axis-aligned bounds of its eight
    /// transformed corners. Returns the validity of the result; the
    /// receiver is left unchanged when the transform produces an invalid
    /// box.
    pub fn transform(&mut self, xform: Transform) -> bool {
        if !self.is_valid() {
            return false;
        }
        let out = Self::from_points(self.corners().map(|corner| xform * corner));
        if out.is_valid() {
            *self = out;
            true
        } else {
            false
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(Point3::ORIGIN, Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn empty_and_unset_are_invalid() {
        assert!(!BoundingBox::EMPTY.is_valid());
        assert!(!BoundingBox::UNSET.is_valid());
        assert!(unit_box().is_valid());
    }

    #[test]
    fn from_points_accumulates() {
        let bbox = BoundingBox::from_points([
            Point3::new(1.0, -2.0, 0.0),
            Point3::new(-1.0, 3.0, 5.0),
            Point3::UNSET,
        ]);
        assert!(bbox.is_valid());
        assert!(bbox.min.epsilon_equals(Point3::new(-1.0, -2.0, 0.0), 1e-15));
        assert!(bbox.max.epsilon_equals(Point3::new(1.0, 3.0, 5.0), 1e-15));
        assert!(!BoundingBox::from_points([]).is_valid());
    }

    #[test]
    fn contains_strict_excludes_faces() {
        let bbox = unit_box();
        let on_face = Point3::new(1.0, 0.5, 0.5);
        assert!(bbox.contains(on_face, false));
        assert!(!bbox.contains(on_face, true));
        assert!(bbox.contains(Point3::new(0.5, 0.5, 0.5), true));
    }

    #[test]
    fn closest_point_clamps_exterior() {
        let p = unit_box().closest_point(Point3::new(3.0, 0.5, -2.0), false);
        assert!(p.epsilon_equals(Point3::new(1.0, 0.5, 0.0), 1e-15));
    }

    #[test]
    fn closest_point_interior_projects_to_nearest_face() {
        let bbox = unit_box();
        let q = Point3::new(0.5, 0.9, 0.5);
        // Clamping alone would return q itself.
        let p = bbox.closest_point(q, false);
        assert!(p.epsilon_equals(Point3::new(0.5, 1.0, 0.5), 1e-15));
        let p = bbox.closest_point(q, true);
        assert!(p.epsilon_equals(q, 0.0));
    }

    #[test]
    fn closest_point_interior_tie_prefers_x() {
        let p = unit_box().closest_point(Point3::new(0.1, 0.1, 0.5), false);
        assert!(p.epsilon_equals(Point3::new(0.0, 0.1, 0.5), 1e-15));
    }

    #[test]
    fn union_replaces_invalid_operand() {
        let a = unit_box();
        assert_eq!(BoundingBox::union(a, BoundingBox::EMPTY), a);
        assert_eq!(BoundingBox::union(BoundingBox::UNSET, a), a);
        assert!(!BoundingBox::union(BoundingBox::EMPTY, BoundingBox::UNSET).is_valid());
    }

    #[test]
    fn union_covers_both() {
        let a = unit_box();
        let b = BoundingBox::new(Point3::new(2.0, -1.0, 0.0), Point3::new(3.0, 0.5, 2.0));
        let u = BoundingBox::union(a, b);
        assert!(u.min.epsilon_equals(Point3::new(0.0, -1.0, 0.0), 1e-15));
        assert!(u.max.epsilon_equals(Point3::new(3.0, 1.0, 2.0), 1e-15));
    }

    #[test]
    fn intersection_of_invalid_is_unset() {
        assert!(!BoundingBox::intersection(unit_box(), BoundingBox::EMPTY).is_valid());
        assert!(!BoundingBox::intersection(BoundingBox::UNSET, unit_box()).is_valid());
    }

    #[test]
    fn intersection_overlap_and_disjoint() {
        let a = unit_box();
        let b = BoundingBox::new(Point3::new(0.5, 0.5, 0.5), Point3::new(2.0, 2.0, 2.0));
        let i = BoundingBox::intersection(a, b);
        assert!(i.min.epsilon_equals(Point3::new(0.5, 0.5, 0.5), 1e-15));
        assert!(i.max.epsilon_equals(Point3::new(1.0, 1.0, 1.0), 1e-15));
        let far = BoundingBox::new(Point3::new(5.0, 5.0, 5.0), Point3::new(6.0, 6.0, 6.0));
        assert!(!BoundingBox::intersection(a, far).is_valid());
    }

    #[test]
    fn degeneracy_grades() {
        assert_eq!(unit_box().is_degenerate(0.0), 0);
        let flat = BoundingBox::new(Point3::ORIGIN, Point3::new(1.0, 1.0, 0.0));
        assert_eq!(flat.is_degenerate(0.0), 1);
        let segment = BoundingBox::new(Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(segment.is_degenerate(0.0), 2);
        let point = BoundingBox::new(Point3::ORIGIN, Point3::ORIGIN);
        assert_eq!(point.is_degenerate(0.0), 3);
        assert_eq!(BoundingBox::EMPTY.is_degenerate(0.0), 4);
    }

    #[test]
    fn negative_tolerance_scales_with_diagonal() {
        // A 1e-4 slab is flat at the scale of a 1e8 box but solid at
        // absolute zero tolerance.
        let slab = BoundingBox::new(Point3::ORIGIN, Point3::new(1e8, 1e8, 1e-4));
        assert_eq!(slab.is_degenerate(0.0), 0);
        assert_eq!(slab.is_degenerate(-1.0), 1);
    }

    #[test]
    fn corners_enumeration_order() {
        let corners = unit_box().corners();
        assert!(corners[0].epsilon_equals(Point3::ORIGIN, 0.0));
        assert!(corners[1].epsilon_equals(Point3::new(1.0, 0.0, 0.0), 0.0));
        assert!(corners[2].epsilon_equals(Point3::new(1.0, 1.0, 0.0), 0.0));
        assert!(corners[6].epsilon_equals(Point3::new(1.0, 1.0, 1.0), 0.0));
    }

    #[test]
    fn inflate_grows_every_face() {
        let mut bbox = unit_box();
        bbox.inflate(0.5);
        assert!(bbox.min.epsilon_equals(Point3::new(-0.5, -0.5, -0.5), 1e-15));
        assert!(bbox.max.epsilon_equals(Point3::new(1.5, 1.5, 1.5), 1e-15));
    }

    #[test]
    fn transform_rebounds_rotated_corners() {
        let mut bbox = unit_box();
        let rotation = Transform::rotation(
            std::f64::consts::FRAC_PI_4,
            Vector3::Z_AXIS,
            Point3::ORIGIN,
        )
        .unwrap();
        assert!(bbox.transform(rotation));
        assert!(bbox.is_valid());
        // The rotated unit box spans sqrt(2) along X.
        let width = bbox.max.x - bbox.min.x;
        assert!((width - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn center_and_diagonal() {
        let bbox = BoundingBox::new(Point3::new(1.0, 2.0, 3.0), Point3::new(3.0, 6.0, 5.0));
        assert!(bbox.center().epsilon_equals(Point3::new(2.0, 4.0, 4.0), 1e-15));
        let d = bbox.diagonal();
        assert!((d.x - 2.0).abs() < 1e-15 && (d.y - 4.0).abs() < 1e-15 && (d.z - 2.0).abs() < 1e-15);
    }
}
