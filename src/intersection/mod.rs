pub mod collinear;
pub mod curve_intersection;
pub mod line;
pub mod subdivision;
pub mod tolerance;

pub use collinear::*;
pub use curve_intersection::*;
pub use line::*;
pub use subdivision::*;
pub use tolerance::*;

use std::cmp::Ordering;

use crate::{curve::Curve, misc::FloatingPoint};

#[cfg(test)]
mod tests;

/// Snap a parameter onto 0 or 1 when it lies within `eps` of either.
pub fn round_parameter<T: FloatingPoint>(t: T, eps: T) -> T {
    if t.abs() <= eps {
        T::zero()
    } else if (t - T::one()).abs() <= eps {
        T::one()
    } else {
        t
    }
}

/// Round every parameter pair, keep the ones inside the unit square
/// and drop pairs repeating a parameter on either curve.
pub fn normalize<T: FloatingPoint>(
    intersections: Vec<(T, T)>,
    tolerance: &Tolerance<T>,
) -> Vec<(T, T)> {
    let unit = |t: T| t >= T::zero() && t <= T::one();
    let eps = tolerance.parametric;
    let mut normalized: Vec<(T, T)> = intersections
        .into_iter()
        .map(|(s, t)| (round_parameter(s, eps), round_parameter(t, eps)))
        .filter(|(s, t)| unit(*s) && unit(*t))
        .collect();

    let same = T::scalar_epsilon();

    // dedupe on b
    normalized.sort_by(|x, y| x.1.partial_cmp(&y.1).unwrap_or(Ordering::Equal));
    normalized.dedup_by(|x, y| (x.1 - y.1).abs() <= same);

    // dedupe on a
    normalized.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(Ordering::Equal));
    normalized.dedup_by(|x, y| (x.0 - y.0).abs() <= same);

    normalized
}

/// Find the intersections between two curves.
/// Lines are solved analytically, pairs of Bézier curves by subdivision.
pub fn find_intersections<T: FloatingPoint>(
    a: &Curve<T>,
    b: &Curve<T>,
    tolerance: &Tolerance<T>,
) -> Vec<CurveIntersection<T>> {
    let parameters = intersection_parameters(a, b, tolerance);
    parameters
        .into_iter()
        .map(|(s, t)| CurveIntersection::new((a.position(s), s), (b.position(t), t)))
        .collect()
}

/// Parameter pairs `(s, t)` with `a.position(s) ~ b.position(t)`, sorted by `s`.
pub fn intersection_parameters<T: FloatingPoint>(
    a: &Curve<T>,
    b: &Curve<T>,
    tolerance: &Tolerance<T>,
) -> Vec<(T, T)> {
    if !a.bounds().intersects(&b.bounds(), Some(tolerance.spatial)) {
        return vec![];
    }

    match (a, b) {
        (Curve::Line(_), _) => normalize(line_curve(a, b, tolerance), tolerance),
        (_, Curve::Line(_)) => {
            let mut swapped = normalize(line_curve(b, a, tolerance), tolerance)
                .into_iter()
                .map(|(s, t)| (t, s))
                .collect::<Vec<_>>();
            swapped.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(Ordering::Equal));
            swapped
        }
        _ => subdivision_intersections(a, b, tolerance),
    }
}
