use nalgebra::{Point2, Vector2};

use crate::misc::FloatingPoint;

/// An axis-aligned bounding box in the plane.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox<T: FloatingPoint> {
    min: Vector2<T>,
    max: Vector2<T>,
}

impl<T: FloatingPoint> BoundingBox<T> {
    /// Create a new bounding box from two corners given in any order.
    pub fn new(min: Vector2<T>, max: Vector2<T>) -> Self {
        Self {
            min: componentwise_min(&min, &max),
            max: componentwise_max(&min, &max),
        }
    }

    /// Create a new bounding box from point iterator.
    pub fn new_with_points<I: IntoIterator<Item = Point2<T>>>(iter: I) -> Self {
        let mut min = Vector2::from_element(T::max_value().unwrap());
        let mut max = -min;

        for point in iter {
            min = componentwise_min(&min, &point.coords);
            max = componentwise_max(&max, &point.coords);
        }

        Self { min, max }
    }

    pub fn min(&self) -> &Vector2<T> {
        &self.min
    }

    pub fn max(&self) -> &Vector2<T> {
        &self.max
    }

    pub fn center(&self) -> Vector2<T> {
        (self.min + self.max) / T::from_usize(2).unwrap()
    }

    pub fn size(&self) -> Vector2<T> {
        self.max - self.min
    }

    pub fn width(&self) -> T {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> T {
        self.max.y - self.min.y
    }

    /// The smallest box enclosing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: componentwise_min(&self.min, &other.min),
            max: componentwise_max(&self.max, &other.max),
        }
    }

    /// Grow the box by `delta` on every side.
    pub fn expand(&self, delta: T) -> Self {
        self.expand_xy(delta, delta)
    }

    /// Grow the box by `dx` horizontally and `dy` vertically on every side.
    pub fn expand_xy(&self, dx: T, dy: T) -> Self {
        let delta = Vector2::new(dx, dy);
        Self {
            min: self.min - delta,
            max: self.max + delta,
        }
    }

    /// Check if the bounding box intersects with another bounding box.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::Vector2;
    /// use curvo_clip::prelude::BoundingBox;
    ///
    /// let b0 = BoundingBox::new(Vector2::from_element(0.), Vector2::from_element(1.));
    /// assert!(b0.intersects(&b0, None));
    ///
    /// let eps = 1e-6;
    /// let b1 = BoundingBox::new(Vector2::from_element(0.5), Vector2::from_element(1.5));
    /// assert!(b0.intersects(&b1, None));
    ///
    /// let b2 = BoundingBox::new(Vector2::from_element(1. + eps), Vector2::from_element(2. + eps));
    /// assert!(!b0.intersects(&b2, None));
    /// assert!(b0.intersects(&b2, Some(eps)));
    /// ```
    pub fn intersects(&self, other: &Self, tolerance: Option<T>) -> bool {
        let tolerance = tolerance.unwrap_or(T::default_epsilon());
        (0..2).all(|i| {
            self.min[i] - tolerance <= other.max[i] + tolerance
                && other.min[i] - tolerance <= self.max[i] + tolerance
        })
    }

    /// Check if the bounding box contains a point, boundary included.
    /// # Examples
    /// ```
    /// use nalgebra::{Point2, Vector2};
    /// use curvo_clip::prelude::BoundingBox;
    /// let bb = BoundingBox::new(Vector2::from_element(0.), Vector2::from_element(1.));
    /// assert!(bb.contains(&Point2::new(0.5, 0.5)));
    /// assert!(bb.contains(&Point2::new(0., 1.0)));
    /// assert!(!bb.contains(&Point2::new(-1e-8, 0.5)));
    /// ```
    pub fn contains(&self, point: &Point2<T>) -> bool {
        (0..2).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }
}

fn componentwise_min<T: FloatingPoint>(a: &Vector2<T>, b: &Vector2<T>) -> Vector2<T> {
    Vector2::new(a.x.min(b.x), a.y.min(b.y))
}

fn componentwise_max<T: FloatingPoint>(a: &Vector2<T>, b: &Vector2<T>) -> Vector2<T> {
    Vector2::new(a.x.max(b.x), a.y.max(b.y))
}

impl<T: FloatingPoint> FromIterator<Point2<T>> for BoundingBox<T> {
    fn from_iter<I: IntoIterator<Item = Point2<T>>>(iter: I) -> Self {
        Self::new_with_points(iter)
    }
}
