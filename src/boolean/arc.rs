use std::{cell::OnceCell, collections::BTreeSet};

use nalgebra::Point2;

use crate::{curve::Curve, misc::FloatingPoint, region::Region};

use super::vertex_union::VertexKey;

/// A maximal run of connected curves between two split vertices.
#[derive(Clone, Debug)]
pub struct Arc<T: FloatingPoint> {
    curves: Vec<Curve<T>>,
    length: OnceCell<T>,
    signed_area: OnceCell<T>,
}

impl<T: FloatingPoint> Arc<T> {
    /// `curves` must be non-empty and connected end to start.
    pub(crate) fn new(curves: Vec<Curve<T>>) -> Self {
        debug_assert!(!curves.is_empty());
        Self {
            curves,
            length: OnceCell::new(),
            signed_area: OnceCell::new(),
        }
    }

    pub fn curves(&self) -> &[Curve<T>] {
        &self.curves
    }

    pub fn first(&self) -> &Curve<T> {
        &self.curves[0]
    }

    pub fn head(&self) -> Point2<T> {
        self.first().start()
    }

    pub fn tail(&self) -> Point2<T> {
        self.curves[self.curves.len() - 1].end()
    }

    /// Sum of the chord lengths of the curves.
    pub fn length(&self) -> T {
        *self.length.get_or_init(|| {
            self.curves
                .iter()
                .fold(T::zero(), |acc, c| acc + c.chord_length())
        })
    }

    pub fn signed_area(&self) -> T {
        *self.signed_area.get_or_init(|| {
            self.curves
                .iter()
                .fold(T::zero(), |acc, c| acc + c.signed_area())
        })
    }

    /// The point at fraction `t` of the arc, measured by cumulative chord length.
    pub fn position(&self, t: T) -> Point2<T> {
        let length = self.length();
        let threshold = length * t;
        let mut offset = T::zero();
        for c in self.curves.iter() {
            let l = c.chord_length();
            if l > T::zero() && threshold <= offset + l {
                return c.position((threshold - offset) / l);
            }
            offset += l;
        }
        self.tail()
    }

    pub fn reverse(&self) -> Self {
        Self::new(self.curves.iter().rev().map(|c| c.reverse()).collect())
    }

    /// Every curve start followed by the tail.
    pub fn vertices(&self) -> Vec<Point2<T>> {
        self.curves
            .iter()
            .map(|c| c.start())
            .chain(std::iter::once(self.tail()))
            .collect()
    }

    pub fn into_curves(self) -> Vec<Curve<T>> {
        self.curves
    }
}

/// Cut every ring of `region` into arcs that start and end at split vertices.
/// A ring touching no vertex becomes a single closed arc.
pub fn partition<T: FloatingPoint>(
    region: &Region<T>,
    vertices: &BTreeSet<VertexKey<T>>,
) -> Vec<Arc<T>> {
    let is_vertex = |c: &Curve<T>| vertices.contains(&VertexKey(c.start()));
    let mut arcs = vec![];

    for ring in region.rings() {
        let curves = ring.curves();
        let Some(offset) = curves.iter().position(is_vertex) else {
            arcs.push(Arc::new(curves.to_vec()));
            continue;
        };

        let mut acc: Vec<Curve<T>> = vec![];
        for c in curves[offset..].iter() {
            if is_vertex(c) && !acc.is_empty() {
                arcs.push(Arc::new(std::mem::take(&mut acc)));
            }
            acc.push(c.clone());
        }
        acc.extend(curves[..offset].iter().cloned());
        arcs.push(Arc::new(acc));
    }

    arcs
}
