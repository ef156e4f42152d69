use nalgebra::Point2;

use crate::{bounding_box::BoundingBox, curve::Curve, misc::FloatingPoint};

use super::{collinear_intersection, is_collinear, line_line, normalize, Tolerance};

/// Upper bound on interval pairs examined for a single pair of curves.
const MAX_INTERVAL_PAIRS: usize = 1 << 16;

/// Newton steps used to polish a chord crossing.
const REFINE_ITERATIONS: usize = 8;

/// A parameter interval of a curve that is monotone in x and y,
/// so the box spanned by its end points bounds it.
#[derive(Clone, Debug)]
struct CurveInterval<'a, T: FloatingPoint> {
    curve: &'a Curve<T>,
    t_lo: T,
    t_hi: T,
    p_lo: Point2<T>,
    p_hi: Point2<T>,
    flat: bool,
    tolerance: Tolerance<T>,
}

impl<'a, T: FloatingPoint> CurveInterval<'a, T> {
    fn new(
        curve: &'a Curve<T>,
        t_lo: T,
        t_hi: T,
        p_lo: Point2<T>,
        p_hi: Point2<T>,
        tolerance: Tolerance<T>,
    ) -> Self {
        let flat = (p_lo - p_hi).norm() <= tolerance.spatial
            || t_hi - t_lo < tolerance.parametric
            || curve.range(t_lo, t_hi).is_flat(tolerance.spatial);
        Self {
            curve,
            t_lo,
            t_hi,
            p_lo,
            p_hi,
            flat,
            tolerance,
        }
    }

    /// Intervals between the extrema of the curve.
    fn from_curve(curve: &'a Curve<T>, tolerance: &Tolerance<T>) -> Vec<Self> {
        let ts = std::iter::once(T::zero())
            .chain(curve.extrema())
            .chain(std::iter::once(T::one()))
            .collect::<Vec<_>>();
        ts.windows(2)
            .map(|w| {
                let (p_lo, p_hi) = (curve.position(w[0]), curve.position(w[1]));
                Self::new(curve, w[0], w[1], p_lo, p_hi, *tolerance)
            })
            .collect()
    }

    fn bounds(&self) -> BoundingBox<T> {
        BoundingBox::new_with_points([self.p_lo, self.p_hi])
    }

    fn intersects(&self, other: &Self) -> bool {
        self.bounds()
            .expand(self.tolerance.spatial)
            .intersects(&other.bounds(), Some(T::zero()))
    }

    fn split(self) -> Vec<Self> {
        if self.flat {
            vec![self]
        } else {
            let t_mid = (self.t_lo + self.t_hi) / T::from_f64(2.0).unwrap();
            let p_mid = self.curve.position(t_mid);
            vec![
                Self::new(self.curve, self.t_lo, t_mid, self.p_lo, p_mid, self.tolerance),
                Self::new(self.curve, t_mid, self.t_hi, p_mid, self.p_hi, self.tolerance),
            ]
        }
    }

    /// Intersect the chords of two flat intervals and map the result back onto the curves.
    /// A chord crossing is only as close as the flatness tolerance, so it is refined on the curves.
    fn chord_intersections(&self, other: &Self, acc: &mut Vec<(T, T)>) {
        let eps = self.tolerance.parametric;
        let lo = -eps;
        let hi = T::one() + eps;
        for (s, t) in line_line(self.p_lo, self.p_hi, other.p_lo, other.p_hi, &self.tolerance) {
            if s >= lo && s <= hi && t >= lo && t <= hi {
                let s = self.t_lo + (self.t_hi - self.t_lo) * s;
                let t = other.t_lo + (other.t_hi - other.t_lo) * t;
                acc.push(refine(self.curve, other.curve, s, t));
            }
        }
    }
}

/// Polish a parameter pair with Newton steps on `a(s) - b(t) = 0`.
/// Returns the input unchanged when the curves are close to tangent there
/// or when the steps do not bring the points closer.
pub fn refine<T: FloatingPoint>(a: &Curve<T>, b: &Curve<T>, s: T, t: T) -> (T, T) {
    let unit = |x: T| x.max(T::zero()).min(T::one());
    let gap = |s: T, t: T| (a.position(s) - b.position(t)).norm();

    let (mut rs, mut rt) = (s, t);
    for _ in 0..REFINE_ITERATIONS {
        let f = a.position(rs) - b.position(rt);
        if f.norm() <= T::scalar_epsilon() {
            break;
        }
        let (da, db) = (a.direction(rs), -b.direction(rt));
        let det = da.perp(&db);
        if det.abs() <= T::scalar_epsilon() * da.norm() * db.norm() {
            break;
        }
        let ds = -f.perp(&db) / det;
        let dt = da.perp(&-f) / det;
        rs = unit(rs + ds);
        rt = unit(rt + dt);
    }

    if rs.is_finite() && rt.is_finite() && gap(rs, rt) <= gap(s, t) {
        (rs, rt)
    } else {
        (s, t)
    }
}

/// Intersections between two curves by recursive subdivision into flat, monotone intervals.
/// Curves running along the same path report the end points of their shared stretch.
pub fn subdivision_intersections<T: FloatingPoint>(
    a: &Curve<T>,
    b: &Curve<T>,
    tolerance: &Tolerance<T>,
) -> Vec<(T, T)> {
    let overlap = normalize(collinear_intersection(a, b, tolerance), tolerance);
    if is_collinear(a, b, &overlap, tolerance) {
        return overlap;
    }

    let mut queue = vec![];
    for ia in CurveInterval::from_curve(a, tolerance) {
        for ib in CurveInterval::from_curve(b, tolerance) {
            queue.push((ia.clone(), ib));
        }
    }

    let mut acc = vec![];
    let mut examined = 0;
    while let Some((ia, ib)) = queue.pop() {
        examined += 1;
        if examined > MAX_INTERVAL_PAIRS {
            log::warn!("curve subdivision stopped after {} interval pairs", MAX_INTERVAL_PAIRS);
            break;
        }

        if !ia.intersects(&ib) {
            continue;
        }

        if ia.flat && ib.flat {
            ia.chord_intersections(&ib, &mut acc);
            continue;
        }

        let (sa, sb) = (ia.split(), ib.split());
        for xa in sa.iter() {
            for xb in sb.iter() {
                queue.push((xa.clone(), xb.clone()));
            }
        }
    }

    normalize(acc, tolerance)
}
