use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
};

use nalgebra::Point2;

use crate::{curve::Curve, misc::FloatingPoint};

/// A point ordered lexicographically by x, then y.
/// Equality is exact coordinate equality.
#[derive(Clone, Copy, Debug)]
pub struct VertexKey<T: FloatingPoint>(pub Point2<T>);

impl<T: FloatingPoint> VertexKey<T> {
    pub fn point(&self) -> Point2<T> {
        self.0
    }
}

impl<T: FloatingPoint> Ord for VertexKey<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .x
            .partial_cmp(&other.0.x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.0.y.partial_cmp(&other.0.y).unwrap_or(Ordering::Equal))
    }
}

impl<T: FloatingPoint> PartialOrd for VertexKey<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: FloatingPoint> PartialEq for VertexKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: FloatingPoint> Eq for VertexKey<T> {}

impl<T: FloatingPoint> From<Point2<T>> for VertexKey<T> {
    fn from(p: Point2<T>) -> Self {
        Self(p)
    }
}

/// Union-find over points.
///
/// Joined points collapse onto a single representative, the lexicographically smaller one,
/// so every curve end point that was merged can be snapped to the same exact coordinates.
#[derive(Clone, Debug)]
pub struct VertexUnion<T: FloatingPoint> {
    parent: BTreeMap<VertexKey<T>, VertexKey<T>>,
    roots: BTreeSet<VertexKey<T>>,
}

impl<T: FloatingPoint> Default for VertexUnion<T> {
    fn default() -> Self {
        Self {
            parent: BTreeMap::new(),
            roots: BTreeSet::new(),
        }
    }
}

impl<T: FloatingPoint> VertexUnion<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the sets containing `a` and `b`.
    /// A point joined with itself becomes a representative of its own.
    pub fn join(&mut self, a: Point2<T>, b: Point2<T>) {
        let a = VertexKey(self.adjust(a));
        let b = VertexKey(self.adjust(b));
        match a.cmp(&b) {
            Ordering::Less => {
                self.parent.insert(b, a);
                self.roots.insert(a);
            }
            Ordering::Greater => {
                self.parent.insert(a, b);
                self.roots.insert(b);
            }
            Ordering::Equal => {
                self.roots.insert(b);
            }
        }
    }

    /// The representative of `p`, compressing the path on the way.
    pub fn adjust(&mut self, p: Point2<T>) -> Point2<T> {
        let key = VertexKey(p);
        let mut root = key;
        let mut path = vec![];
        while let Some(next) = self.parent.get(&root) {
            path.push(root);
            root = *next;
        }
        // the last hop already points at the root
        path.pop();
        for k in path {
            self.parent.insert(k, root);
        }
        root.point()
    }

    /// Snap the end points of a curve onto their representatives.
    /// Returns `None` when both ends collapse onto the same point.
    pub fn adjust_curve(&mut self, curve: &Curve<T>) -> Option<Curve<T>> {
        let start = self.adjust(curve.start());
        let end = self.adjust(curve.end());
        curve.endpoints(start, end)
    }

    /// Representatives that have not been merged into another point.
    pub fn roots(&self) -> BTreeSet<VertexKey<T>> {
        self.roots
            .iter()
            .filter(|r| !self.parent.contains_key(r))
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use super::*;

    #[test]
    fn joins_to_the_smaller_point() {
        let mut union = VertexUnion::new();
        let (a, b, c) = (
            Point2::new(0., 1.),
            Point2::new(0., 2.),
            Point2::new(-1., 5.),
        );
        union.join(b, a);
        assert_eq!(union.adjust(b), a);
        union.join(b, c);
        assert_eq!(union.adjust(a), c);
        assert_eq!(union.adjust(b), c);
        assert_eq!(
            union.roots().into_iter().map(|k| k.point()).collect::<Vec<_>>(),
            vec![c]
        );

        // untouched points are their own representative
        let d = Point2::new(3., 3.);
        assert_eq!(union.adjust(d), d);
    }

    #[test]
    fn self_join_registers_a_root() {
        let mut union = VertexUnion::new();
        let p = Point2::new(0.5, 0.5);
        union.join(p, p);
        assert_eq!(union.roots().len(), 1);
        assert!(union.roots().contains(&VertexKey(p)));
    }

    #[test]
    fn adjusts_curves() {
        let mut union = VertexUnion::new();
        let start = Point2::new(0., 0.);
        let end = Point2::new(1., 0.);
        union.join(Point2::new(-1e-6, 0.), start);
        let line = Curve::line(start, end);
        assert_eq!(
            union.adjust_curve(&line),
            Some(Curve::line(Point2::new(-1e-6, 0.), end))
        );

        // both ends collapse
        union.join(end, start);
        assert_eq!(union.adjust_curve(&line), None);
    }
}
