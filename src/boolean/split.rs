use std::{cmp::Ordering, collections::BTreeSet};

use itertools::Itertools;

use crate::{
    curve::Curve,
    misc::FloatingPoint,
    region::Region,
    ring::Ring,
    sweep::SweepQueue,
};

use super::{
    options::BooleanOptions,
    vertex_union::{VertexKey, VertexUnion},
};

/// Both regions cut at their mutual intersections.
#[derive(Clone, Debug)]
pub struct Split<T: FloatingPoint> {
    pub a: Region<T>,
    pub b: Region<T>,
    /// Representative points where the boundaries meet.
    pub vertices: BTreeSet<VertexKey<T>>,
}

/// Position of a curve inside a region: ring index, then curve index.
type CurveKey = (usize, usize);

fn curve_at<T: FloatingPoint>(region: &Region<T>, (ring, curve): CurveKey) -> &Curve<T> {
    &region.rings()[ring].curves()[curve]
}

/// Cut every curve of `a` and `b` where it meets a curve of the other region.
///
/// Near-coincident intersection points are merged into one representative vertex,
/// and every cut curve has its end points snapped onto those representatives,
/// so both regions share exact coordinates wherever their boundaries touch.
pub fn split<T: FloatingPoint>(a: &Region<T>, b: &Region<T>, options: &BooleanOptions<T>) -> Split<T> {
    let regions = [a, b];
    let mut queues = [
        SweepQueue::new(options.spatial_epsilon),
        SweepQueue::new(options.spatial_epsilon),
    ];
    let mut parameters: [Vec<Vec<Vec<T>>>; 2] = [
        a.rings().iter().map(|r| vec![vec![]; r.curves().len()]).collect(),
        b.rings().iter().map(|r| vec![vec![]; r.curves().len()]).collect(),
    ];

    for (queue, region) in queues.iter_mut().zip(regions.iter()) {
        for (ri, ring) in region.rings().iter().enumerate() {
            for (ci, curve) in ring.curves().iter().enumerate() {
                let bounds = curve.bounds();
                queue.add((ri, ci), bounds.min().x, bounds.max().x);
            }
        }
    }

    let tolerance = options.tolerance();
    let mut union = VertexUnion::new();
    let mut intersections = 0;

    loop {
        let idx = SweepQueue::next_queue(&mut queues);
        let Some(key) = queues[idx].take() else {
            break;
        };
        let other = 1 - idx;
        let active = queues[other].active().copied().collect_vec();

        for other_key in active {
            let (ka, kb) = if idx == 0 {
                (key, other_key)
            } else {
                (other_key, key)
            };
            let (ca, cb) = (curve_at(a, ka), curve_at(b, kb));
            for it in ca.intersections(cb, Some(tolerance)) {
                parameters[0][ka.0][ka.1].push(it.a_parameter());
                parameters[1][kb.0][kb.1].push(it.b_parameter());
                union.join(it.a().0, it.b().0);
                intersections += 1;
            }
        }
    }

    log::debug!("found {} curve intersections", intersections);

    let [pa, pb] = parameters;
    let pa = dedupe_region(a, pa, &mut union, options);
    let pb = dedupe_region(b, pb, &mut union, options);

    let a = split_region(a, &pa, &mut union);
    let b = split_region(b, &pb, &mut union);

    Split {
        a,
        b,
        vertices: union.roots(),
    }
}

fn dedupe_region<T: FloatingPoint>(
    region: &Region<T>,
    parameters: Vec<Vec<Vec<T>>>,
    union: &mut VertexUnion<T>,
    options: &BooleanOptions<T>,
) -> Vec<Vec<Vec<T>>> {
    region
        .rings()
        .iter()
        .zip(parameters)
        .map(|(ring, ps)| {
            ring.curves()
                .iter()
                .zip(ps)
                .map(|(c, ts)| dedupe(c, ts, union, options))
                .collect()
        })
        .collect()
}

/// Drop cut parameters that would leave a sliver, joining their points instead.
///
/// A parameter too close to the previous kept one (or to the start) is merged into it,
/// and one too close to the end is merged into the end point.
pub fn dedupe<T: FloatingPoint>(
    curve: &Curve<T>,
    mut parameters: Vec<T>,
    union: &mut VertexUnion<T>,
    options: &BooleanOptions<T>,
) -> Vec<T> {
    parameters.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let (peps, seps) = (options.parametric_epsilon, options.spatial_epsilon);
    let mut kept: Vec<T> = vec![];
    for t1 in parameters {
        let t0 = kept.last().copied().unwrap_or(T::zero());
        let (p0, p1) = (curve.position(t0), curve.position(t1));
        if (t1 - t0).abs() <= peps || (p1 - p0).norm() <= seps {
            union.join(p0, p1);
        } else if (t1 - T::one()).abs() <= peps || (curve.end() - p1).norm() <= seps {
            union.join(p1, curve.end());
        } else {
            kept.push(t1);
        }
    }
    kept
}

fn split_region<T: FloatingPoint>(
    region: &Region<T>,
    parameters: &[Vec<Vec<T>>],
    union: &mut VertexUnion<T>,
) -> Region<T> {
    region
        .rings()
        .iter()
        .zip(parameters)
        .filter_map(|(ring, ps)| {
            let curves = ring
                .curves()
                .iter()
                .zip(ps)
                .flat_map(|(c, ts)| c.split(ts))
                .filter_map(|c| {
                    let adjusted = union.adjust_curve(&c);
                    if adjusted.is_none() {
                        log::trace!("dropped collapsed curve at {:?}", c.start());
                    }
                    adjusted
                })
                .collect_vec();
            if curves.is_empty() {
                log::trace!("dropped empty ring");
                None
            } else {
                Some(Ring::from_connected(curves))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Region<f64> {
        Region::from(Ring::rectangle(Point2::new(x0, y0), Point2::new(x1, y1)).unwrap())
    }

    #[test]
    fn dedupe_merges_close_parameters() {
        let options = BooleanOptions::default();
        let mut union = VertexUnion::new();
        let line = Curve::line(Point2::new(1., 0.), Point2::new(0., 0.));

        let kept = dedupe(&line, vec![0.999999, 0.300001, 0.3], &mut union, &options);
        assert_eq!(kept, vec![0.3]);
        assert_eq!(
            union.adjust(line.position(0.3)),
            union.adjust(line.position(0.300001))
        );
        // a cut next to the end is merged into the end point
        assert_eq!(union.adjust(line.position(0.999999)), line.end());

        // and one next to the start into the start point
        let kept = dedupe(&line, vec![1e-6], &mut union, &options);
        assert!(kept.is_empty());
        assert_eq!(
            union.adjust(line.position(1e-6)),
            union.adjust(line.start())
        );
    }

    #[test]
    fn dedupe_merges_close_positions() {
        let options = BooleanOptions::default();
        let mut union = VertexUnion::new();
        let short = Curve::line(Point2::new(0., 0.), Point2::new(0.1, 0.));

        // far apart in parameter, but only 5e-6 apart on the curve
        let kept = dedupe(&short, vec![0.5, 0.50005], &mut union, &options);
        assert_eq!(kept, vec![0.5]);
        assert_eq!(
            union.adjust(short.position(0.50005)),
            union.adjust(short.position(0.5))
        );
    }

    #[test]
    fn crossing_squares_share_vertices() {
        let a = square(0., 0., 1., 1.);
        let b = square(0.5, 0.5, 1.5, 1.5);
        let split = split(&a, &b, &BooleanOptions::default());

        let vertices = split.vertices.iter().map(|v| v.point()).collect::<Vec<_>>();
        assert_eq!(vertices, vec![Point2::new(0.5, 1.), Point2::new(1., 0.5)]);

        // each square gains one cut on two of its edges
        assert_eq!(split.a.rings()[0].curves().len(), 6);
        assert_eq!(split.b.rings()[0].curves().len(), 6);
        assert_relative_eq!(split.a.area(), 1., epsilon = 1e-12);
        assert_relative_eq!(split.b.area(), 1., epsilon = 1e-12);

        // both regions pass through every vertex with identical coordinates
        for v in vertices {
            for region in [&split.a, &split.b] {
                let curves = region.rings()[0].curves();
                assert!(curves.iter().any(|c| c.end() == v));
                assert!(curves.iter().any(|c| c.start() == v));
            }
        }
    }

    #[test]
    fn disjoint_squares_are_left_alone() {
        let a = square(0., 0., 1., 1.);
        let b = square(2., 0., 3., 1.);
        let split = split(&a, &b, &BooleanOptions::default());
        assert!(split.vertices.is_empty());
        assert_eq!(split.a, a);
        assert_eq!(split.b, b);
    }

    #[test]
    fn collapsed_curves_and_rings_are_dropped() {
        let region = square(0., 0., 1., 1.);
        let parameters = vec![vec![vec![]; 4]];

        // the bottom edge collapses onto its start
        let mut union = VertexUnion::new();
        union.join(Point2::new(0., 0.), Point2::new(1., 0.));
        let triangle = split_region(&region, &parameters, &mut union);
        assert_eq!(triangle.rings().len(), 1);
        assert_eq!(triangle.rings()[0].curves().len(), 3);
        assert_relative_eq!(triangle.area(), 0.5, epsilon = 1e-12);

        // every corner merged leaves nothing
        union.join(Point2::new(0., 0.), Point2::new(1., 1.));
        union.join(Point2::new(0., 0.), Point2::new(0., 1.));
        let collapsed = split_region(&region, &parameters, &mut union);
        assert!(collapsed.is_empty());
    }
}
