pub mod arc;
pub mod classification;
pub mod clip;
pub mod graph;
pub mod operation;
pub mod options;
pub mod repair;
pub mod split;
pub mod vertex_union;

pub use arc::*;
pub use classification::*;
pub use clip::*;
pub use graph::*;
pub use operation::*;
pub use options::*;
pub use repair::*;
pub use split::*;
pub use vertex_union::*;

use crate::{misc::FloatingPoint, region::Region, ring::Ring};


/// A trait for boolean operations.
pub trait Boolean<T> {
    type Output;
    type Option;

    fn union(&self, other: T, option: Self::Option) -> Self::Output;
    fn intersection(&self, other: T, option: Self::Option) -> Self::Output;
    fn difference(&self, other: T, option: Self::Option) -> Self::Output;
    fn boolean(&self, operation: BooleanOperation, other: T, option: Self::Option) -> Self::Output;
}

impl<'a, T: FloatingPoint> Boolean<&'a Region<T>> for Region<T> {
    type Output = anyhow::Result<Clip<T>>;
    type Option = Option<BooleanOptions<T>>;

    fn union(&self, other: &'a Region<T>, option: Self::Option) -> Self::Output {
        self.boolean(BooleanOperation::Union, other, option)
    }

    fn intersection(&self, other: &'a Region<T>, option: Self::Option) -> Self::Output {
        self.boolean(BooleanOperation::Intersection, other, option)
    }

    fn difference(&self, other: &'a Region<T>, option: Self::Option) -> Self::Output {
        self.boolean(BooleanOperation::Difference, other, option)
    }

    /// # Examples
    /// ```
    /// use nalgebra::Point2;
    /// use curvo_clip::prelude::*;
    ///
    /// let a = Region::from(Ring::<f64>::square());
    /// let b = Region::from(Ring::rectangle(Point2::new(0.5, 0.5), Point2::new(1.5, 1.5)).unwrap());
    ///
    /// let clip = a.boolean(BooleanOperation::Intersection, &b, None).unwrap();
    /// assert!(clip.is_complete());
    /// assert!((clip.region().area() - 0.25).abs() < 1e-8);
    /// ```
    fn boolean(
        &self,
        operation: BooleanOperation,
        other: &'a Region<T>,
        option: Self::Option,
    ) -> Self::Output {
        clip::clip(self, other, operation, &option.unwrap_or_default())
    }
}

impl<'a, T: FloatingPoint> Boolean<&'a Ring<T>> for Ring<T> {
    type Output = anyhow::Result<Clip<T>>;
    type Option = Option<BooleanOptions<T>>;

    fn union(&self, other: &'a Ring<T>, option: Self::Option) -> Self::Output {
        self.boolean(BooleanOperation::Union, other, option)
    }

    fn intersection(&self, other: &'a Ring<T>, option: Self::Option) -> Self::Output {
        self.boolean(BooleanOperation::Intersection, other, option)
    }

    fn difference(&self, other: &'a Ring<T>, option: Self::Option) -> Self::Output {
        self.boolean(BooleanOperation::Difference, other, option)
    }

    fn boolean(
        &self,
        operation: BooleanOperation,
        other: &'a Ring<T>,
        option: Self::Option,
    ) -> Self::Output {
        let (a, b) = (Region::from(self.clone()), Region::from(other.clone()));
        clip::clip(&a, &b, operation, &option.unwrap_or_default())
    }
}

/// Area covered by either region, with default options.
pub fn union<T: FloatingPoint>(a: &Region<T>, b: &Region<T>) -> anyhow::Result<Region<T>> {
    a.union(b, None).map(Clip::into_region)
}

/// Area covered by both regions, with default options.
pub fn intersection<T: FloatingPoint>(a: &Region<T>, b: &Region<T>) -> anyhow::Result<Region<T>> {
    a.intersection(b, None).map(Clip::into_region)
}

/// Area covered by `a` but not by `b`, with default options.
pub fn difference<T: FloatingPoint>(a: &Region<T>, b: &Region<T>) -> anyhow::Result<Region<T>> {
    a.difference(b, None).map(Clip::into_region)
}
