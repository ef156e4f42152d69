use crate::{curve::Curve, misc::FloatingPoint};

use super::{round_parameter, Tolerance};

/// Overlap of two curves assumed to run along the same path.
///
/// Each end of `a` is projected onto `b`; ends overhanging `b` are replaced by
/// the projection of the matching end of `b` onto `a`.
/// Yields at most two parameter pairs.
pub fn collinear_intersection<T: FloatingPoint>(
    a: &Curve<T>,
    b: &Curve<T>,
    tolerance: &Tolerance<T>,
) -> Vec<(T, T)> {
    let unit = |t: T| t >= T::zero() && t <= T::one();
    let eps = tolerance.parametric;
    let mut result = vec![];

    for i in [T::zero(), T::one()] {
        let tb = b.nearest_parameter(&a.position(i));
        if tb <= T::zero() {
            // a overhangs the start of b
            let s = round_parameter(a.nearest_parameter(&b.start()), eps);
            if unit(s) {
                result.push((s, T::zero()));
            }
        } else if tb >= T::one() {
            // a overhangs the end of b
            let s = round_parameter(a.nearest_parameter(&b.end()), eps);
            if unit(s) {
                result.push((s, T::one()));
            }
        } else {
            result.push((i, tb));
        }
    }

    if let [(s0, t0), (s1, t1)] = result[..] {
        if (s0 - s1).abs() <= eps && (t0 - t1).abs() <= eps {
            result.pop();
        }
    }

    result
}

/// Check if two curves share the stretch between the given overlap parameters.
/// Samples of `a` across the overlap must lie on `b` within the spatial tolerance.
pub fn is_collinear<T: FloatingPoint>(
    a: &Curve<T>,
    b: &Curve<T>,
    overlap: &[(T, T)],
    tolerance: &Tolerance<T>,
) -> bool {
    let [(s0, _), (s1, _)] = overlap[..] else {
        return false;
    };
    let eps = tolerance.spatial;
    let samples = 8;
    (0..=samples).all(|i| {
        let u = T::from_usize(i).unwrap() / T::from_usize(samples).unwrap();
        let pa = a.position(s0 + (s1 - s0) * u);
        let tb = b.nearest_parameter(&pa).max(T::zero()).min(T::one());
        (pa - b.position(tb)).norm() <= eps
    })
}
