pub mod bounding_box;
pub mod curve;
pub mod plane;

pub use bounding_box::BoundingBox;
pub use curve::{Arc, Circle, Curve, Line, Line2};
pub use plane::{Plane, PlaneEquation};
