use std::cmp::Ordering;

use crate::misc::FloatingPoint;

/// Find the real root of `a * x + b = 0`.
/// Returns no root when `a` is (nearly) zero.
pub fn solve_linear<T: FloatingPoint>(a: T, b: T) -> Vec<T> {
    if a.abs() > T::scalar_epsilon() {
        vec![-b / a]
    } else {
        vec![]
    }
}

/// Find the real roots of `a * x^2 + b * x + c = 0` in ascending order.
/// Falls back to the linear equation when the leading coefficient vanishes.
///
/// # Examples
/// ```
/// use curvo_clip::prelude::solve_quadratic;
/// let roots: Vec<f64> = solve_quadratic(1., -3., 2.);
/// assert_eq!(roots.len(), 2);
/// assert!((roots[0] - 1.).abs() < 1e-12);
/// assert!((roots[1] - 2.).abs() < 1e-12);
/// ```
pub fn solve_quadratic<T: FloatingPoint>(a: T, b: T, c: T) -> Vec<T> {
    let Some([a, b, c]) = normalize_coefficients([a, b, c]) else {
        return vec![];
    };

    let eps = T::scalar_epsilon();
    if a.abs() <= eps {
        return solve_linear(b, c);
    }

    let two = T::from_f64(2.0).unwrap();
    let four = T::from_f64(4.0).unwrap();
    let discriminant = b * b - four * a * c;

    let mut roots = if discriminant.abs() <= eps {
        vec![-b / (two * a)]
    } else if discriminant > T::zero() {
        // avoid cancellation between -b and the root of the discriminant
        let q = if b < T::zero() {
            (-b + discriminant.sqrt()) / two
        } else {
            (-b - discriminant.sqrt()) / two
        };
        if q == T::zero() {
            vec![T::zero()]
        } else {
            vec![q / a, c / q]
        }
    } else {
        vec![]
    };

    sort_roots(&mut roots);
    roots
}

/// Find the real roots of `a * x^3 + b * x^2 + c * x + d = 0` in ascending order.
/// Degenerates to the quadratic (or linear) equation when the leading coefficients vanish.
///
/// # Examples
/// ```
/// use curvo_clip::prelude::solve_cubic;
/// // (x - 1)(x - 2)(x - 3)
/// let roots: Vec<f64> = solve_cubic(1., -6., 11., -6.);
/// assert_eq!(roots.len(), 3);
/// assert!((roots[0] - 1.).abs() < 1e-9);
/// assert!((roots[2] - 3.).abs() < 1e-9);
/// ```
pub fn solve_cubic<T: FloatingPoint>(a: T, b: T, c: T, d: T) -> Vec<T> {
    let Some([a, b, c, d]) = normalize_coefficients([a, b, c, d]) else {
        return vec![];
    };

    if a.abs() <= T::scalar_epsilon() {
        return solve_quadratic(b, c, d);
    }

    // https://momentsingraphics.de/CubicRoots.html
    let one_third = T::one() / T::from_f64(3.0).unwrap();
    let two = T::from_f64(2.0).unwrap();
    let half = T::from_f64(0.5).unwrap();

    let c2 = b * one_third / a;
    let c1 = c * one_third / a;
    let c0 = d / a;
    if !(c0.is_finite() && c1.is_finite() && c2.is_finite()) {
        return solve_quadratic(b, c, d);
    }

    let d0 = c1 - c2 * c2;
    let d1 = c0 - c1 * c2;
    let d2 = c2 * c0 - c1 * c1;
    let discriminant = T::from_f64(4.0).unwrap() * d0 * d2 - d1 * d1;
    let depressed = d1 - two * c2 * d0;

    let mut roots = if discriminant < T::zero() {
        let sq = (-discriminant / T::from_f64(4.0).unwrap()).sqrt();
        let r = -depressed * half;
        vec![(r + sq).cbrt() + (r - sq).cbrt() - c2]
    } else if discriminant == T::zero() {
        let t1 = (-d0).max(T::zero()).sqrt();
        let t1 = if depressed < T::zero() { -t1 } else { t1 };
        let r0 = t1 - c2;
        let r1 = -two * t1 - c2;
        if r0 == r1 {
            vec![r0]
        } else {
            vec![r0, r1]
        }
    } else {
        let theta = discriminant.sqrt().atan2(-depressed) * one_third;
        let (sin, cos) = theta.sin_cos();
        let ss3 = sin * T::from_f64(3.0).unwrap().sqrt();
        let t = two * (-d0).max(T::zero()).sqrt();
        vec![
            t * cos - c2,
            t * (half * (-cos + ss3)) - c2,
            t * (half * (-cos - ss3)) - c2,
        ]
    };

    // polish with a couple of newton steps against the original polynomial
    roots.iter_mut().for_each(|x| {
        for _ in 0..2 {
            let f = ((a * *x + b) * *x + c) * *x + d;
            let df = (T::from_f64(3.0).unwrap() * a * *x + two * b) * *x + c;
            if df.abs() <= T::scalar_epsilon() {
                break;
            }
            let next = *x - f / df;
            if !next.is_finite() {
                break;
            }
            *x = next;
        }
    });

    sort_roots(&mut roots);
    roots.dedup_by(|x, y| (*x - *y).abs() <= T::scalar_epsilon());
    roots
}

/// Scale coefficients so the largest magnitude is one.
/// Returns `None` when every coefficient is zero or any is not finite.
fn normalize_coefficients<T: FloatingPoint, const N: usize>(coefficients: [T; N]) -> Option<[T; N]> {
    if coefficients.iter().any(|c| !c.is_finite()) {
        return None;
    }
    let max = coefficients
        .iter()
        .fold(T::zero(), |max, c| max.max(c.abs()));
    if max == T::zero() {
        return None;
    }
    Some(coefficients.map(|c| c / max))
}

fn sort_roots<T: FloatingPoint>(roots: &mut [T]) {
    roots.sort_by(|x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal));
}
