use std::f64::consts::FRAC_PI_2;

use itertools::Itertools;
use nalgebra::{Matrix3, Point2};

use crate::{
    bounding_box::BoundingBox,
    curve::Curve,
    intersection::{line_curve, round_parameter, Tolerance},
    misc::{orientation, FloatingPoint, Invertible, Orientation, Transformable},
};


/// Result of locating a point against a closed boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Containment<'a, T: FloatingPoint> {
    Outside,
    Inside,
    /// The point lies on the boundary, within the spatial tolerance, on the given curve.
    Boundary(&'a Curve<T>),
}

impl<T: FloatingPoint> Containment<'_, T> {
    pub fn is_inside(&self) -> bool {
        matches!(self, Containment::Inside)
    }

    pub fn is_outside(&self) -> bool {
        matches!(self, Containment::Outside)
    }
}

/// A closed loop of curves.
///
/// Every curve is monotone in x and y, and the end of each curve is
/// exactly the start of the next, the last wrapping around to the first.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ring<T: FloatingPoint> {
    curves: Vec<Curve<T>>,
    bounds: BoundingBox<T>,
    signed_area: T,
}

impl<T: FloatingPoint> Ring<T> {
    /// Create a ring from curves joined end to start.
    /// Gaps between consecutive curves up to the spatial epsilon are closed.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::Point2;
    /// use curvo_clip::prelude::*;
    ///
    /// let triangle = Ring::try_new(vec![
    ///     Curve::line(Point2::new(0., 0.), Point2::new(1., 0.)),
    ///     Curve::line(Point2::new(1., 0.), Point2::new(0., 1.)),
    ///     Curve::line(Point2::new(0., 1.), Point2::new(0., 0.)),
    /// ]).unwrap();
    /// assert_eq!(triangle.area(), 0.5);
    ///
    /// let open = Ring::try_new(vec![
    ///     Curve::line(Point2::new(0., 0.), Point2::new(1., 0.)),
    ///     Curve::line(Point2::new(1., 0.), Point2::new(0., 1.)),
    /// ]);
    /// assert!(open.is_err());
    /// ```
    pub fn try_new(curves: Vec<Curve<T>>) -> anyhow::Result<Self> {
        anyhow::ensure!(!curves.is_empty(), "Ring must have at least one curve");
        for (i, c) in curves.iter().enumerate() {
            anyhow::ensure!(c.is_finite(), "Curve {} has non-finite coordinates", i);
            anyhow::ensure!(!c.is_degenerate(), "Curve {} is degenerate", i);
        }

        let eps = T::spatial_epsilon();
        for (i, (c0, c1)) in curves.iter().circular_tuple_windows().enumerate() {
            let gap = (c0.end() - c1.start()).norm();
            anyhow::ensure!(
                gap <= eps,
                "Ring is not closed: curve {} ends {:?} away from the start of the next curve",
                i,
                gap.to_f64()
            );
        }

        Ok(Self::from_connected(curves))
    }

    /// Build a ring from curves already known to form a closed loop.
    /// Curves are split at their extrema and stitched so neighbours share exact end points.
    pub(crate) fn from_connected(curves: Vec<Curve<T>>) -> Self {
        let mut curves = curves
            .into_iter()
            .flat_map(|c| {
                let ts = c.extrema();
                c.split(&ts)
            })
            .collect_vec();

        let n = curves.len();
        for i in 0..n {
            let next = curves[(i + 1) % n].start();
            if let Some(stitched) = curves[i].endpoints(curves[i].start(), next) {
                curves[i] = stitched;
            }
        }

        let bounds = curves
            .iter()
            .map(|c| c.bounds())
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| BoundingBox::new_with_points(std::iter::empty()));
        let signed_area = curves
            .iter()
            .fold(T::zero(), |acc, c| acc + c.signed_area());

        Self {
            curves,
            bounds,
            signed_area,
        }
    }

    /// A closed polygon through the given points.
    pub fn polygon(points: &[Point2<T>]) -> anyhow::Result<Self> {
        anyhow::ensure!(
            points
                .iter()
                .circular_tuple_windows()
                .any(|(p, q, r)| orientation(p, q, r) != Orientation::Collinear),
            "Polygon must have at least three non-collinear points"
        );
        let curves = points
            .iter()
            .circular_tuple_windows()
            .filter(|(p0, p1)| p0 != p1)
            .map(|(p0, p1)| Curve::line(*p0, *p1))
            .collect_vec();
        Self::try_new(curves)
    }

    /// Axis-aligned counter-clockwise rectangle between two corners.
    pub fn rectangle(min: Point2<T>, max: Point2<T>) -> anyhow::Result<Self> {
        Self::polygon(&[
            min,
            Point2::new(max.x, min.y),
            max,
            Point2::new(min.x, max.y),
        ])
    }

    /// Counter-clockwise unit square over `[0, 1] x [0, 1]`.
    pub fn square() -> Self {
        let (o, x, y, xy) = (
            Point2::origin(),
            Point2::new(T::one(), T::zero()),
            Point2::new(T::zero(), T::one()),
            Point2::new(T::one(), T::one()),
        );
        Self::from_connected(vec![
            Curve::line(o, x),
            Curve::line(x, xy),
            Curve::line(xy, y),
            Curve::line(y, o),
        ])
    }

    /// Counter-clockwise circle approximated by four cubic curves.
    pub fn circle(center: Point2<T>, radius: T) -> anyhow::Result<Self> {
        anyhow::ensure!(
            radius > T::zero() && radius.is_finite(),
            "Radius must be positive and finite"
        );
        let k = T::from_f64(4.0 / 3.0 * (2f64.sqrt() - 1.0)).unwrap() * radius;
        let curves = (0..4)
            .map(|i| {
                let a0 = T::from_f64(FRAC_PI_2 * i as f64).unwrap();
                let a1 = T::from_f64(FRAC_PI_2 * (i + 1) as f64).unwrap();
                let (s0, c0) = a0.sin_cos();
                let (s1, c1) = a1.sin_cos();
                Curve::cubic(
                    Point2::new(center.x + c0 * radius, center.y + s0 * radius),
                    Point2::new(center.x + c0 * radius - s0 * k, center.y + s0 * radius + c0 * k),
                    Point2::new(center.x + c1 * radius + s1 * k, center.y + s1 * radius - c1 * k),
                    Point2::new(center.x + c1 * radius, center.y + s1 * radius),
                )
            })
            .collect_vec();
        Self::try_new(curves)
    }

    pub fn curves(&self) -> &[Curve<T>] {
        &self.curves
    }

    pub fn into_curves(self) -> Vec<Curve<T>> {
        self.curves
    }

    pub fn bounds(&self) -> &BoundingBox<T> {
        &self.bounds
    }

    /// Sum of the signed areas of the curves: positive when counter-clockwise.
    pub fn signed_area(&self) -> T {
        self.signed_area
    }

    pub fn area(&self) -> T {
        self.signed_area.abs()
    }

    pub fn is_clockwise(&self) -> bool {
        self.signed_area < T::zero()
    }

    /// The same ring traversed in the opposite direction.
    pub fn reverse(&self) -> Self {
        self.inverse()
    }

    /// Check the ring invariants: closed with exact joins and no degenerate curves.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.curves.is_empty(), "Ring must have at least one curve");
        for (i, (c0, c1)) in self.curves.iter().circular_tuple_windows().enumerate() {
            anyhow::ensure!(c0.is_finite(), "Curve {} has non-finite coordinates", i);
            anyhow::ensure!(!c0.is_degenerate(), "Curve {} is degenerate", i);
            anyhow::ensure!(c0.end() == c1.start(), "Ring is not closed at curve {}", i);
        }
        Ok(())
    }

    /// Locate a point against the ring with a horizontal ray cast towards +x.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::Point2;
    /// use curvo_clip::prelude::*;
    ///
    /// let square = Ring::<f64>::square();
    /// assert!(square.test(&Point2::new(0.5, 0.5)).is_inside());
    /// assert!(square.test(&Point2::new(1.5, 0.5)).is_outside());
    /// assert!(matches!(square.test(&Point2::new(1.0, 0.5)), Containment::Boundary(_)));
    /// ```
    pub fn test(&self, p: &Point2<T>) -> Containment<'_, T> {
        self.test_within(p, &Tolerance::default())
    }

    /// Locate a point treating anything within `tolerance` of a curve as on the boundary.
    pub fn test_within(&self, p: &Point2<T>, tolerance: &Tolerance<T>) -> Containment<'_, T> {
        let eps = tolerance.spatial;
        if !self.bounds.expand(eps).contains(p) {
            return Containment::Outside;
        }

        let ray = Curve::line(*p, Point2::new(self.bounds.max().x + T::one(), p.y));
        let mut count = 0;

        for c in self.curves.iter() {
            let b = c.bounds();
            let flat = b.height() == T::zero();

            if p.x < b.min().x {
                // the whole curve lies to the right and spans the ray height
                if p.y >= b.min().y && p.y < b.max().y {
                    count += 1;
                }
            } else if b.expand_xy(eps, T::zero()).contains(p) {
                let unit = |t: T| t >= T::zero() && t <= T::one();
                let peps = tolerance.parametric;
                let nearest = line_curve(&ray, c, tolerance)
                    .into_iter()
                    .map(|(s, t)| (round_parameter(s, peps), round_parameter(t, peps)))
                    .filter(|(s, t)| unit(*s) && unit(*t))
                    .min_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(std::cmp::Ordering::Equal));

                if let Some((s, _)) = nearest {
                    if s == T::zero() {
                        return Containment::Boundary(c);
                    } else if !flat && p.y < b.max().y {
                        count += 1;
                    }
                }
            }
        }

        if count % 2 == 1 {
            Containment::Inside
        } else {
            Containment::Outside
        }
    }
}

impl<T: FloatingPoint> Invertible for Ring<T> {
    fn invert(&mut self) {
        self.curves.reverse();
        self.curves.iter_mut().for_each(|c| c.invert());
        self.signed_area = -self.signed_area;
    }
}

impl<'a, T: FloatingPoint> Transformable<&'a Matrix3<T>> for Ring<T> {
    /// Transforms every curve, then re-splits at the new extrema.
    fn transform(&mut self, transform: &'a Matrix3<T>) {
        let curves = self
            .curves
            .iter()
            .map(|c| c.transformed(transform))
            .collect_vec();
        *self = Self::from_connected(curves);
    }
}
