use approx::assert_relative_eq;
use nalgebra::Point2;

use crate::curve::Curve;

use super::*;

fn quarter_circle(from: f64, to: f64) -> Curve<f64> {
    // cubic approximation of the unit circle arc between two axis angles
    let k = 4. / 3. * (2f64.sqrt() - 1.);
    let (s0, c0) = from.sin_cos();
    let (s1, c1) = to.sin_cos();
    Curve::cubic(
        Point2::new(c0, s0),
        Point2::new(c0 - k * s0, s0 + k * c0),
        Point2::new(c1 + k * s1, s1 - k * c1),
        Point2::new(c1, s1),
    )
}

#[test]
fn round_snaps_to_the_ends() {
    assert_eq!(round_parameter(1e-7, 1e-5), 0.);
    assert_eq!(round_parameter(1. - 1e-7, 1e-5), 1.);
    assert_eq!(round_parameter(0.5, 1e-5), 0.5);
}

#[test]
fn normalize_filters_and_dedupes() {
    let normalized = normalize(
        vec![(0.5, 0.5), (0.5, 0.5), (1.2, 0.3), (1. + 1e-7, 0.25)],
        &Tolerance::default(),
    );
    assert_eq!(normalized, vec![(0.5, 0.5), (1., 0.25)]);
}

#[test]
fn crossing_lines() {
    let a = Curve::line(Point2::new(0., 0.), Point2::new(2., 2.));
    let b = Curve::line(Point2::new(0., 2.), Point2::new(2., 0.));
    let its = a.intersections(&b, None);
    assert_eq!(its.len(), 1);
    assert_relative_eq!(its[0].a().1, 0.5);
    assert_relative_eq!(its[0].b().1, 0.5);
    assert_relative_eq!(its[0].a().0, Point2::new(1., 1.));
}

#[test]
fn disjoint_lines() {
    let a = Curve::line(Point2::new(0., 0.), Point2::new(1., 0.));
    let b = Curve::line(Point2::new(0., 1.), Point2::new(1., 1.));
    assert!(a.intersections(&b, None).is_empty());

    let c = Curve::line(Point2::new(2., -1.), Point2::new(2., 1.));
    assert!(a.intersections(&c, None).is_empty());
}

#[test]
fn collinear_overlap() {
    let a = Curve::line(Point2::new(0., 0.), Point2::new(2., 0.));
    let b = Curve::line(Point2::new(1., 0.), Point2::new(3., 0.));
    let its = intersection_parameters(&a, &b, &Tolerance::default());
    assert_eq!(its.len(), 2);
    assert_relative_eq!(its[0].0, 0.5);
    assert_relative_eq!(its[0].1, 0.);
    assert_relative_eq!(its[1].0, 1.);
    assert_relative_eq!(its[1].1, 0.5);
}

#[test]
fn opposite_shared_edge() {
    let a = Curve::line(Point2::new(1., 0.), Point2::new(1., 1.));
    let b = Curve::line(Point2::new(1., 1.), Point2::new(1., 0.));
    let its = intersection_parameters(&a, &b, &Tolerance::default());
    assert_eq!(its, vec![(0., 1.), (1., 0.)]);
}

#[test]
fn touching_end_points() {
    let a = Curve::line(Point2::new(0., 0.), Point2::new(1., 0.));
    let b = Curve::line(Point2::new(1., 0.), Point2::new(1., 1.));
    let its = intersection_parameters(&a, &b, &Tolerance::default());
    assert_eq!(its, vec![(1., 0.)]);
}

#[test]
fn line_and_quadratic() {
    let line = Curve::line(Point2::new(-1., 0.5), Point2::new(3., 0.5));
    let q = Curve::quadratic(Point2::new(0., 0.), Point2::new(1., 2.), Point2::new(2., 0.));
    // y(t) = 2t(1 - t) * 2 = 4t - 4t^2 = 0.5
    let its = line.intersections(&q, None);
    assert_eq!(its.len(), 2);
    for it in its.iter() {
        assert_relative_eq!(it.a().0.y, 0.5, epsilon = 1e-9);
        assert_relative_eq!(it.b().0, it.a().0, epsilon = 1e-9);
    }
    let t0 = (1. - 0.5f64.sqrt()) / 2.;
    assert_relative_eq!(its[0].b().1, t0, epsilon = 1e-9);

    // the swapped call reports the same points with exchanged parameters
    let swapped = q.intersections(&line, None);
    assert_eq!(swapped.len(), 2);
    assert_relative_eq!(swapped[0].a_parameter(), t0, epsilon = 1e-9);
}

#[test]
fn line_and_cubic() {
    let arc = quarter_circle(0., std::f64::consts::FRAC_PI_2);
    let line = Curve::line(Point2::new(0., 0.), Point2::new(2., 2.));
    let its = line.intersections(&arc, None);
    assert_eq!(its.len(), 1);
    let p = its[0].b().0;
    assert_relative_eq!(p.x, p.y, epsilon = 1e-9);
    assert_relative_eq!(p.coords.norm(), 1., epsilon = 1e-3);
}

#[test]
fn cubic_and_cubic() {
    let a = quarter_circle(0., std::f64::consts::FRAC_PI_2);
    // the same arc mirrored about x = 1
    let b = Curve::cubic(
        Point2::new(0., 0.),
        Point2::new(0., 0.552),
        Point2::new(0.448, 1.),
        Point2::new(1., 1.),
    );
    let its = a.intersections(&b, None);
    assert_eq!(its.len(), 1);
    let it = &its[0];
    assert!(it.gap() < 1e-12);
    assert_relative_eq!(it.a().0.x, 0.5, epsilon = 1e-2);
}

#[test]
fn mirrored_cubics_meet_on_the_axis() {
    let a = quarter_circle(0., std::f64::consts::FRAC_PI_2);
    let mirror = |p: &Point2<f64>| Point2::new(1. - p.x, p.y);
    let pts = a.control_points().iter().map(mirror).collect::<Vec<_>>();
    let b = Curve::cubic(pts[0], pts[1], pts[2], pts[3]);

    let its = a.intersections(&b, None);
    assert_eq!(its.len(), 1);
    assert_relative_eq!(its[0].a().0.x, 0.5, epsilon = 1e-12);
    assert_relative_eq!(its[0].b().0.x, 0.5, epsilon = 1e-12);
    assert!(its[0].gap() < 1e-12);
}

#[test]
fn refine_polishes_a_rough_guess() {
    let a = quarter_circle(0., std::f64::consts::FRAC_PI_2);
    let b = Curve::line(Point2::new(0.5, 0.), Point2::new(0.5, 2.));
    let (s, t) = refine(&a, &b, 0.6, 0.4);
    assert_relative_eq!(a.position(s), b.position(t), epsilon = 1e-12);
    assert_relative_eq!(a.position(s).x, 0.5, epsilon = 1e-12);

    // parallel curves have nothing to converge to and keep the guess
    let c = Curve::line(Point2::new(0., 0.), Point2::new(1., 0.));
    let d = Curve::line(Point2::new(0., 1.), Point2::new(1., 1.));
    assert_eq!(refine(&c, &d, 0.25, 0.5), (0.25, 0.5));
}

#[test]
fn looser_tolerance_joins_nearby_lines() {
    let a = Curve::line(Point2::new(1., 0.), Point2::new(1., 1.));
    let b = Curve::line(Point2::new(1.0005, 1.), Point2::new(1.0005, 0.));
    assert!(a.intersections(&b, None).is_empty());

    let loose = Tolerance::default().with_spatial(1e-3).with_parametric(1e-3);
    let its = intersection_parameters(&a, &b, &loose);
    assert_eq!(its, vec![(0., 1.), (1., 0.)]);
}

#[test]
fn identical_cubics_overlap() {
    let a = quarter_circle(0., std::f64::consts::FRAC_PI_2);
    let its = intersection_parameters(&a, &a, &Tolerance::default());
    assert_eq!(its, vec![(0., 0.), (1., 1.)]);
}
