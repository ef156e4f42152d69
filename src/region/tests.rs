use approx::assert_relative_eq;
use nalgebra::{Matrix3, Point2, Vector2};

use crate::{
    misc::Transformable,
    ring::{Containment, Ring},
};

use super::Region;

fn annulus() -> Region<f64> {
    let outer = Ring::rectangle(Point2::new(0., 0.), Point2::new(4., 4.)).unwrap();
    let hole = Ring::rectangle(Point2::new(1., 1.), Point2::new(3., 3.))
        .unwrap()
        .reverse();
    Region::new(vec![outer, hole])
}

#[test]
fn empty_region() {
    let region = Region::<f64>::empty();
    assert!(region.is_empty());
    assert_eq!(region.area(), 0.);
    assert!(region.bounds().is_none());
    assert!(region.validate().is_ok());
    assert_eq!(region.test(&Point2::new(0., 0.)), Containment::Outside);
}

#[test]
fn area_with_hole() {
    let region = annulus();
    assert_relative_eq!(region.signed_area(), 12.);
    let bounds = region.bounds().unwrap();
    assert_eq!(bounds.min(), &Vector2::new(0., 0.));
    assert_eq!(bounds.max(), &Vector2::new(4., 4.));
}

#[test]
fn containment_with_hole() {
    let region = annulus();
    assert!(region.test(&Point2::new(0.5, 2.)).is_inside());
    assert!(region.test(&Point2::new(2., 2.)).is_outside());
    assert!(region.test(&Point2::new(5., 2.)).is_outside());

    // the hole boundary reports the hole's curve
    match region.test(&Point2::new(1., 2.)) {
        Containment::Boundary(c) => {
            assert!(region.rings()[1].curves().contains(c));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(
        region.test(&Point2::new(4., 2.)),
        Containment::Boundary(_)
    ));
}

#[test]
fn disjoint_rings() {
    let region: Region<f64> = [
        Ring::rectangle(Point2::new(0., 0.), Point2::new(1., 1.)).unwrap(),
        Ring::rectangle(Point2::new(2., 0.), Point2::new(3., 1.)).unwrap(),
    ]
    .into_iter()
    .collect();
    assert_relative_eq!(region.area(), 2.);
    assert!(region.test(&Point2::new(2.5, 0.5)).is_inside());
    assert!(region.test(&Point2::new(1.5, 0.5)).is_outside());
}

#[test]
fn transform_region() {
    let region = annulus();
    let m = Matrix3::new_translation(&Vector2::new(-2., -2.));
    let moved = region.transformed(&m);
    assert!(moved.test(&Point2::new(0., 0.)).is_outside());
    assert!(moved.test(&Point2::new(-1.5, 0.)).is_inside());
    assert_relative_eq!(moved.area(), 12.);
}
