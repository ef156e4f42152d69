use std::cmp::Ordering;

use itertools::Itertools;
use nalgebra::{Matrix3, Point2};

use crate::{
    bounding_box::BoundingBox,
    intersection::Tolerance,
    misc::{FloatingPoint, Transformable},
    ring::{Containment, Ring},
};

#[cfg(test)]
mod tests;

/// A planar area bounded by zero or more rings.
///
/// Counter-clockwise rings enclose area and clockwise rings cut holes.
/// An empty region encloses nothing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region<T: FloatingPoint> {
    rings: Vec<Ring<T>>,
}

impl<T: FloatingPoint> Default for Region<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: FloatingPoint> Region<T> {
    pub fn new(rings: Vec<Ring<T>>) -> Self {
        Self { rings }
    }

    pub fn empty() -> Self {
        Self { rings: vec![] }
    }

    /// Create a region from rings, checking each of them.
    pub fn try_from_rings(rings: Vec<Ring<T>>) -> anyhow::Result<Self> {
        let region = Self::new(rings);
        region.validate()?;
        Ok(region)
    }

    pub fn rings(&self) -> &[Ring<T>] {
        &self.rings
    }

    pub fn into_rings(self) -> Vec<Ring<T>> {
        self.rings
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Net enclosed area: holes subtract.
    pub fn signed_area(&self) -> T {
        self.rings
            .iter()
            .fold(T::zero(), |acc, r| acc + r.signed_area())
    }

    pub fn area(&self) -> T {
        self.signed_area().abs()
    }

    /// Union of the ring bounds, or `None` for an empty region.
    pub fn bounds(&self) -> Option<BoundingBox<T>> {
        self.rings
            .iter()
            .map(|r| r.bounds().clone())
            .reduce(|a, b| a.union(&b))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.rings
            .iter()
            .enumerate()
            .try_for_each(|(i, r)| {
                r.validate()
                    .map_err(|e| anyhow::anyhow!("Ring {} is invalid: {}", i, e))
            })
    }

    /// Locate a point against the region.
    ///
    /// Rings are tested from the smallest to the largest area; the first ring
    /// reporting the point inside or on its boundary decides.
    /// Being inside a clockwise ring means being inside a hole.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::Point2;
    /// use curvo_clip::prelude::*;
    ///
    /// let outer = Ring::rectangle(Point2::new(0., 0.), Point2::new(4., 4.)).unwrap();
    /// let hole = Ring::rectangle(Point2::new(1., 1.), Point2::new(3., 3.)).unwrap().reverse();
    /// let region = Region::new(vec![outer, hole]);
    /// assert!(region.test(&Point2::new(0.5, 0.5)).is_inside());
    /// assert!(region.test(&Point2::new(2., 2.)).is_outside());
    /// ```
    pub fn test(&self, p: &Point2<T>) -> Containment<'_, T> {
        self.test_within(p, &Tolerance::default())
    }

    /// Locate a point with the given tolerance for boundary hits.
    pub fn test_within(&self, p: &Point2<T>, tolerance: &Tolerance<T>) -> Containment<'_, T> {
        let sorted = self
            .rings
            .iter()
            .sorted_by(|a, b| a.area().partial_cmp(&b.area()).unwrap_or(Ordering::Equal));

        for ring in sorted {
            match ring.test_within(p, tolerance) {
                Containment::Outside => {}
                Containment::Inside => {
                    return if ring.is_clockwise() {
                        Containment::Outside
                    } else {
                        Containment::Inside
                    };
                }
                boundary => return boundary,
            }
        }

        Containment::Outside
    }
}

impl<T: FloatingPoint> From<Ring<T>> for Region<T> {
    fn from(ring: Ring<T>) -> Self {
        Self::new(vec![ring])
    }
}

impl<T: FloatingPoint> FromIterator<Ring<T>> for Region<T> {
    fn from_iter<I: IntoIterator<Item = Ring<T>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, T: FloatingPoint> Transformable<&'a Matrix3<T>> for Region<T> {
    fn transform(&mut self, transform: &'a Matrix3<T>) {
        self.rings.iter_mut().for_each(|r| r.transform(transform));
    }
}
