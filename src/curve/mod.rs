use std::cmp::Ordering;

use itertools::Itertools;
use nalgebra::{Matrix3, Point2, Vector2};

use crate::{
    bounding_box::BoundingBox,
    intersection::{find_intersections, CurveIntersection, Tolerance},
    misc::{solve_quadratic, FloatingPoint, Invertible, Transformable},
};


/// A planar Bézier curve of degree one, two or three.
///
/// Parameters run over `[0, 1]`; `position(0)` is the start point and
/// `position(1)` the end point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Curve<T: FloatingPoint> {
    Line([Point2<T>; 2]),
    Quadratic([Point2<T>; 3]),
    Cubic([Point2<T>; 4]),
}

impl<T: FloatingPoint> Curve<T> {
    pub fn line(p0: Point2<T>, p1: Point2<T>) -> Self {
        Self::Line([p0, p1])
    }

    pub fn quadratic(p0: Point2<T>, p1: Point2<T>, p2: Point2<T>) -> Self {
        Self::Quadratic([p0, p1, p2])
    }

    pub fn cubic(p0: Point2<T>, p1: Point2<T>, p2: Point2<T>, p3: Point2<T>) -> Self {
        Self::Cubic([p0, p1, p2, p3])
    }

    pub fn control_points(&self) -> &[Point2<T>] {
        match self {
            Curve::Line(p) => p,
            Curve::Quadratic(p) => p,
            Curve::Cubic(p) => p,
        }
    }

    fn control_points_mut(&mut self) -> &mut [Point2<T>] {
        match self {
            Curve::Line(p) => p,
            Curve::Quadratic(p) => p,
            Curve::Cubic(p) => p,
        }
    }

    pub fn degree(&self) -> usize {
        self.control_points().len() - 1
    }

    pub fn start(&self) -> Point2<T> {
        match *self {
            Curve::Line([p0, _]) | Curve::Quadratic([p0, _, _]) | Curve::Cubic([p0, _, _, _]) => p0,
        }
    }

    pub fn end(&self) -> Point2<T> {
        match *self {
            Curve::Line([_, p1]) => p1,
            Curve::Quadratic([_, _, p2]) => p2,
            Curve::Cubic([_, _, _, p3]) => p3,
        }
    }

    /// Evaluate the point at parameter `t`.
    /// The end parameters return the stored end points exactly.
    pub fn position(&self, t: T) -> Point2<T> {
        if t == T::zero() {
            return self.start();
        }
        if t == T::one() {
            return self.end();
        }

        let mt = T::one() - t;
        match *self {
            Curve::Line([p0, p1]) => p0 + (p1 - p0) * t,
            Curve::Quadratic([p0, p1, p2]) => {
                let two = T::from_f64(2.0).unwrap();
                Point2::from(p0.coords * (mt * mt) + p1.coords * (two * mt * t) + p2.coords * (t * t))
            }
            Curve::Cubic([p0, p1, p2, p3]) => {
                let three = T::from_f64(3.0).unwrap();
                Point2::from(
                    p0.coords * (mt * mt * mt)
                        + p1.coords * (three * mt * mt * t)
                        + p2.coords * (three * mt * t * t)
                        + p3.coords * (t * t * t),
                )
            }
        }
    }

    /// Evaluate the first derivative at parameter `t`.
    pub fn direction(&self, t: T) -> Vector2<T> {
        let mt = T::one() - t;
        let two = T::from_f64(2.0).unwrap();
        match *self {
            Curve::Line([p0, p1]) => p1 - p0,
            Curve::Quadratic([p0, p1, p2]) => ((p1 - p0) * mt + (p2 - p1) * t) * two,
            Curve::Cubic([p0, p1, p2, p3]) => {
                let three = T::from_f64(3.0).unwrap();
                ((p1 - p0) * (mt * mt) + (p2 - p1) * (two * mt * t) + (p3 - p2) * (t * t)) * three
            }
        }
    }

    /// The signed area between the curve and the origin.
    /// Summed over a closed ring it gives the enclosed area, positive for counter-clockwise rings.
    pub fn signed_area(&self) -> T {
        match *self {
            Curve::Line([p0, p1]) => (p0.x * p1.y - p1.x * p0.y) / T::from_f64(2.0).unwrap(),
            Curve::Quadratic([p0, p1, p2]) => {
                let two = T::from_f64(2.0).unwrap();
                (p2.x * (p0.y - two * p1.y)
                    + two * p1.x * (p2.y - p0.y)
                    + p0.x * (two * p1.y + p2.y))
                    / T::from_f64(6.0).unwrap()
            }
            Curve::Cubic([p0, p1, p2, p3]) => {
                let two = T::from_f64(2.0).unwrap();
                let three = T::from_f64(3.0).unwrap();
                let six = T::from_f64(6.0).unwrap();
                (p3.x * (-p0.y - three * p1.y - six * p2.y)
                    - three * p2.x * (p0.y + p1.y - two * p3.y)
                    + three * p1.x * (-two * p0.y + p2.y + p3.y)
                    + p0.x * (six * p1.y + three * p2.y + p3.y))
                    / T::from_f64(20.0).unwrap()
            }
        }
    }

    /// Distance between the end points.
    pub fn chord_length(&self) -> T {
        (self.end() - self.start()).norm()
    }

    /// The same curve traversed from end to start.
    pub fn reverse(&self) -> Self {
        self.inverse()
    }

    /// Check if every control point coincides.
    pub fn is_degenerate(&self) -> bool {
        let p0 = self.start();
        self.control_points().iter().all(|p| *p == p0)
    }

    /// Check if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.control_points()
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite())
    }

    /// Rewrite the curve so it runs from `start` to `end`, keeping the shape as close as possible.
    /// Returns `None` when the new end points coincide.
    pub fn endpoints(&self, start: Point2<T>, end: Point2<T>) -> Option<Self> {
        if start == end {
            return None;
        }
        if start == self.start() && end == self.end() {
            return Some(self.clone());
        }

        let rewritten = match *self {
            Curve::Line(_) => Curve::Line([start, end]),
            Curve::Quadratic([p0, p1, p2]) => {
                // keep the tangent directions at both ends
                let ad = p1 - p0;
                let bd = p1 - p2;
                let d = end - start;
                let det = bd.x * ad.y - bd.y * ad.x;
                let u = (d.y * bd.x - d.x * bd.y) / det;
                if det.abs() <= T::scalar_epsilon() || !u.is_finite() {
                    let half = T::from_f64(0.5).unwrap();
                    let shift = ((start - p0) + (end - p2)) * half;
                    Curve::Quadratic([start, p1 + shift, end])
                } else {
                    Curve::Quadratic([start, start + ad * u, end])
                }
            }
            Curve::Cubic([p0, p1, p2, p3]) => {
                Curve::Cubic([start, p1 + (start - p0), p2 + (end - p3), end])
            }
        };
        Some(rewritten)
    }

    /// Replace the first and last control points in place.
    fn pin_end_points(mut self, start: Point2<T>, end: Point2<T>) -> Self {
        let points = self.control_points_mut();
        let n = points.len();
        points[0] = start;
        points[n - 1] = end;
        self
    }

    /// Split the curve at parameter `t` with de Casteljau's algorithm.
    /// The two halves share the exact point `position(t)`.
    pub fn split_at(&self, t: T) -> (Self, Self) {
        let mid = self.position(t);
        match *self {
            Curve::Line([p0, p1]) => (Curve::Line([p0, mid]), Curve::Line([mid, p1])),
            Curve::Quadratic([p0, p1, p2]) => {
                let a = p0 + (p1 - p0) * t;
                let b = p1 + (p2 - p1) * t;
                (
                    Curve::Quadratic([p0, a, mid]),
                    Curve::Quadratic([mid, b, p2]),
                )
            }
            Curve::Cubic([p0, p1, p2, p3]) => {
                let a = p0 + (p1 - p0) * t;
                let b = p1 + (p2 - p1) * t;
                let c = p2 + (p3 - p2) * t;
                let ab = a + (b - a) * t;
                let bc = b + (c - b) * t;
                (
                    Curve::Cubic([p0, a, ab, mid]),
                    Curve::Cubic([mid, bc, c, p3]),
                )
            }
        }
    }

    /// The sub-curve over `[t0, t1]`, running from `position(t0)` to `position(t1)`.
    pub fn range(&self, t0: T, t1: T) -> Self {
        let (start, end) = (self.position(t0), self.position(t1));
        if t0 == T::zero() && t1 == T::one() {
            return self.clone();
        }
        if t0 > t1 {
            return self.range(t1, t0).reverse();
        }

        let piece = if t0 == T::zero() {
            self.split_at(t1).0
        } else if t1 == T::one() {
            self.split_at(t0).1
        } else {
            let (_, tail) = self.split_at(t0);
            tail.split_at((t1 - t0) / (T::one() - t0)).0
        };
        piece.pin_end_points(start, end)
    }

    /// Split the curve at every parameter strictly inside `(0, 1)`.
    /// Adjacent pieces share their end points exactly.
    pub fn split(&self, parameters: &[T]) -> Vec<Self> {
        let inner = parameters
            .iter()
            .copied()
            .filter(|t| *t > T::zero() && *t < T::one())
            .sorted_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .dedup()
            .collect_vec();

        if inner.is_empty() {
            return vec![self.clone()];
        }

        std::iter::once(T::zero())
            .chain(inner)
            .chain(std::iter::once(T::one()))
            .tuple_windows()
            .map(|(t0, t1)| self.range(t0, t1))
            .collect()
    }

    /// Parameters strictly inside the curve where either coordinate reaches a local extremum.
    /// Splitting at them leaves pieces monotone in both x and y.
    pub fn extrema(&self) -> Vec<T> {
        let eps = T::from_f64(1e-7).unwrap();
        let upper = T::one() - eps;
        let candidates = match *self {
            Curve::Line(_) => vec![],
            Curve::Quadratic([p0, p1, p2]) => {
                let num = p0 - p1;
                let den = p0.coords - p1.coords * T::from_f64(2.0).unwrap() + p2.coords;
                (0..2)
                    .filter(|i| den[*i] != T::zero())
                    .map(|i| num[i] / den[i])
                    .collect_vec()
            }
            Curve::Cubic([p0, p1, p2, p3]) => {
                let two = T::from_f64(2.0).unwrap();
                let three = T::from_f64(3.0).unwrap();
                let a0 = p1 - p0;
                let a1 = (p2 - p1 - a0) * two;
                let a2 = p3.coords - p2.coords * three + p1.coords * three - p0.coords;
                (0..2)
                    .flat_map(|i| solve_quadratic(a2[i], a1[i], a0[i]))
                    .collect_vec()
            }
        };

        candidates
            .into_iter()
            .filter(|t| *t > eps && *t < upper)
            .sorted_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .dedup_by(|a, b| (*a - *b).abs() <= eps)
            .collect()
    }

    /// Tight axis-aligned bounds, including interior extrema.
    pub fn bounds(&self) -> BoundingBox<T> {
        [self.start(), self.end()]
            .into_iter()
            .chain(self.extrema().into_iter().map(|t| self.position(t)))
            .collect()
    }

    /// Check if the curve deviates from its chord by less than `tolerance`.
    pub fn is_flat(&self, tolerance: T) -> bool {
        match *self {
            Curve::Line(_) => true,
            Curve::Quadratic([p0, p1, p2]) => {
                let d = signed_distance(&p1, &p0, &p2);
                (d / T::from_f64(2.0).unwrap()).abs() < tolerance
            }
            Curve::Cubic([p0, p1, p2, p3]) => {
                let d1 = signed_distance(&p1, &p0, &p3);
                let d2 = signed_distance(&p2, &p0, &p3);
                let k = if d1 * d2 < T::zero() {
                    T::from_f64(4.0 / 9.0).unwrap()
                } else {
                    T::from_f64(3.0 / 4.0).unwrap()
                };
                (d1.abs().max(d2.abs()) * k) < tolerance
            }
        }
    }

    /// Find the parameter of the point on the curve closest to `point`.
    /// For lines the result is the unclamped projection onto the infinite line.
    pub fn nearest_parameter(&self, point: &Point2<T>) -> T {
        match *self {
            Curve::Line([p0, p1]) => {
                let d = p1 - p0;
                let l = d.norm_squared();
                if l == T::zero() {
                    T::zero()
                } else {
                    (*point - p0).dot(&d) / l
                }
            }
            _ => {
                let samples = 16;
                let dist = |t: T| (self.position(t) - *point).norm_squared();
                let mut t = (0..=samples)
                    .map(|i| T::from_usize(i).unwrap() / T::from_usize(samples).unwrap())
                    .min_by(|a, b| dist(*a).partial_cmp(&dist(*b)).unwrap_or(Ordering::Equal))
                    .unwrap_or(T::zero());

                // newton iterations on the squared distance
                for _ in 0..8 {
                    let d = self.position(t) - *point;
                    let v = self.direction(t);
                    let dv = self.second_derivative(t);
                    let num = d.dot(&v);
                    let den = v.dot(&v) + d.dot(&dv);
                    if den.abs() <= T::scalar_epsilon() {
                        break;
                    }
                    let next = (t - num / den).max(T::zero()).min(T::one());
                    if (next - t).abs() <= T::scalar_epsilon() {
                        t = next;
                        break;
                    }
                    t = next;
                }
                t
            }
        }
    }

    fn second_derivative(&self, t: T) -> Vector2<T> {
        match *self {
            Curve::Line(_) => Vector2::zeros(),
            Curve::Quadratic([p0, p1, p2]) => {
                (p2.coords - p1.coords * T::from_f64(2.0).unwrap() + p0.coords)
                    * T::from_f64(2.0).unwrap()
            }
            Curve::Cubic([p0, p1, p2, p3]) => {
                let mt = T::one() - t;
                let two = T::from_f64(2.0).unwrap();
                let a = p2.coords - p1.coords * two + p0.coords;
                let b = p3.coords - p2.coords * two + p1.coords;
                (a * mt + b * t) * T::from_f64(6.0).unwrap()
            }
        }
    }

    /// Find the intersections with another curve.
    /// Parameters are snapped to the ends within the parametric tolerance and sorted along `self`.
    pub fn intersections(
        &self,
        other: &Self,
        tolerance: Option<Tolerance<T>>,
    ) -> Vec<CurveIntersection<T>> {
        find_intersections(self, other, &tolerance.unwrap_or_default())
    }
}

/// Signed distance of `p` from the line through `a` and `b`.
fn signed_distance<T: FloatingPoint>(p: &Point2<T>, a: &Point2<T>, b: &Point2<T>) -> T {
    let d = *b - *a;
    d.perp(&(*p - *a)) / d.norm()
}

impl<T: FloatingPoint> Invertible for Curve<T> {
    fn invert(&mut self) {
        self.control_points_mut().reverse();
    }
}

impl<'a, T: FloatingPoint> Transformable<&'a Matrix3<T>> for Curve<T> {
    fn transform(&mut self, transform: &'a Matrix3<T>) {
        self.control_points_mut()
            .iter_mut()
            .for_each(|p| *p = transform.transform_point(p));
    }
}
