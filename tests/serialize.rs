#![cfg(feature = "serde")]

use curvo_clip::prelude::*;
use nalgebra::Point2;

#[test]
fn region_roundtrip() {
    let a = Region::from(Ring::<f64>::square());
    let b = Region::from(Ring::circle(Point2::new(1., 1.), 0.5).unwrap());
    let clip = a.union(&b, None).unwrap();

    let json = serde_json::to_string_pretty(clip.region()).unwrap();
    let region: Region<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(region.rings().len(), clip.region().rings().len());
    assert!((region.area() - clip.region().area()).abs() < 1e-10);

    let info = serde_json::to_value(clip.info()).unwrap();
    assert_eq!(info["leftover_arcs"], 0);
}
