use nalgebra::{Point2, Vector2};

use crate::{
    curve::Curve,
    misc::{solve_cubic, solve_quadratic, FloatingPoint},
};

use super::{collinear_intersection, Tolerance};

/// Raw parameter pairs between the line segment `line` and `curve`.
/// Only the end points of `line` are used.
/// Results are not rounded or filtered to the unit square.
pub fn line_curve<T: FloatingPoint>(
    line: &Curve<T>,
    curve: &Curve<T>,
    tolerance: &Tolerance<T>,
) -> Vec<(T, T)> {
    let (p0, p1) = (line.start(), line.end());
    match curve {
        Curve::Line(_) => line_line(p0, p1, curve.start(), curve.end(), tolerance),
        _ if curve.is_flat(tolerance.spatial) => {
            // intersect the chord, then recover the parameters on the curve itself
            line_line(p0, p1, curve.start(), curve.end(), tolerance)
                .into_iter()
                .map(|(s, t)| {
                    let chord = curve.start() + (curve.end() - curve.start()) * t;
                    (s, curve.nearest_parameter(&chord))
                })
                .collect()
        }
        Curve::Quadratic(q) => line_quadratic(p0, p1, q),
        Curve::Cubic(c) => line_cubic(p0, p1, c),
    }
}

/// Parameter pairs between the segments `a0 -> a1` and `b0 -> b1`.
/// Nearly parallel segments fall back to the collinear overlap when they lie on the same line.
pub fn line_line<T: FloatingPoint>(
    a0: Point2<T>,
    a1: Point2<T>,
    b0: Point2<T>,
    b1: Point2<T>,
    tolerance: &Tolerance<T>,
) -> Vec<(T, T)> {
    let av = a1 - a0;
    let bv = b1 - b0;
    let d = av.perp(&bv);

    // sine of the angle between the segments
    let scale = av.norm() * bv.norm();
    if d.abs() <= T::from_f64(1e-6).unwrap() * scale {
        let (a, b) = (Curve::line(a0, a1), Curve::line(b0, b1));
        let overlap = collinear_intersection(&a, &b, tolerance);
        if overlap
            .iter()
            .all(|(s, t)| (a.position(*s) - b.position(*t)).norm() <= tolerance.spatial)
        {
            return overlap;
        } else if d == T::zero() {
            return vec![];
        }
    }

    let asb = a0 - b0;
    let s = bv.perp(&asb) / d;
    let t = av.perp(&asb) / d;
    vec![(s, t)]
}

/// Parameter of `point` along the segment `p0 -> p1`, assuming it lies on the line.
fn parameter_on_line<T: FloatingPoint>(p0: &Point2<T>, dir: &Vector2<T>, point: &Point2<T>) -> T {
    (*point - *p0).dot(dir) / dir.norm_squared()
}

/// Implicit form of the line through `p0` and `p1`: zero on the line.
fn implicit<T: FloatingPoint>(p0: &Point2<T>, p1: &Point2<T>) -> (Vector2<T>, T) {
    let dir = *p1 - *p0;
    let n = Vector2::new(-dir.y, dir.x);
    (n, p0.coords.perp(&p1.coords))
}

pub fn line_quadratic<T: FloatingPoint>(
    p0: Point2<T>,
    p1: Point2<T>,
    q: &[Point2<T>; 3],
) -> Vec<(T, T)> {
    let two = T::from_f64(2.0).unwrap();
    // (q0 - 2q1 + q2) t^2 + (-2q0 + 2q1) t + q0
    let a = q[0].coords - q[1].coords * two + q[2].coords;
    let b = (q[1].coords - q[0].coords) * two;
    let c = q[0].coords;

    let (n, offset) = implicit(&p0, &p1);
    let dir = p1 - p0;
    let curve = Curve::Quadratic(*q);
    solve_quadratic(n.dot(&a), n.dot(&b), n.dot(&c) + offset)
        .into_iter()
        .map(|t| (parameter_on_line(&p0, &dir, &curve.position(t)), t))
        .collect()
}

pub fn line_cubic<T: FloatingPoint>(
    p0: Point2<T>,
    p1: Point2<T>,
    c: &[Point2<T>; 4],
) -> Vec<(T, T)> {
    let three = T::from_f64(3.0).unwrap();
    let six = T::from_f64(6.0).unwrap();
    // power basis of the cubic
    let a = -c[0].coords + c[1].coords * three - c[2].coords * three + c[3].coords;
    let b = c[0].coords * three - c[1].coords * six + c[2].coords * three;
    let cc = (c[1].coords - c[0].coords) * three;
    let d = c[0].coords;

    let (n, offset) = implicit(&p0, &p1);
    let dir = p1 - p0;
    let curve = Curve::Cubic(*c);
    solve_cubic(n.dot(&a), n.dot(&b), n.dot(&cc), n.dot(&d) + offset)
        .into_iter()
        .map(|t| (parameter_on_line(&p0, &dir, &curve.position(t)), t))
        .collect()
}
