use nalgebra::Point2;

use crate::misc::FloatingPoint;

/// A point where two curves meet, as evaluated on each of them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveIntersection<T: FloatingPoint> {
    /// Point and parameter on the first curve.
    a: (Point2<T>, T),
    /// Point and parameter on the second curve.
    b: (Point2<T>, T),
}

impl<T: FloatingPoint> CurveIntersection<T> {
    pub fn new(a: (Point2<T>, T), b: (Point2<T>, T)) -> Self {
        Self { a, b }
    }

    pub fn a(&self) -> &(Point2<T>, T) {
        &self.a
    }

    pub fn b(&self) -> &(Point2<T>, T) {
        &self.b
    }

    pub fn a_parameter(&self) -> T {
        self.a.1
    }

    pub fn b_parameter(&self) -> T {
        self.b.1
    }

    /// Distance between the points evaluated on each curve.
    pub fn gap(&self) -> T {
        (self.a.0 - self.b.0).norm()
    }
}
