use crate::{
    curve::Curve,
    intersection::Tolerance,
    misc::FloatingPoint,
    region::Region,
    ring::Containment,
};

use super::arc::Arc;

/// Where an arc of one operand lies relative to the other operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Outside,
    Inside,
    /// On the other boundary, running in the same direction.
    SameEdge,
    /// On the other boundary, running in the opposite direction.
    DiffEdge,
}

/// Classify `arc` against `region` by sampling it at a fraction of `1/e` along its length,
/// which keeps the sample clear of the arc's end vertices.
pub fn classify<T: FloatingPoint>(
    region: &Region<T>,
    arc: &Arc<T>,
    tolerance: &Tolerance<T>,
) -> Classification {
    let t = T::one() / T::from_f64(std::f64::consts::E).unwrap();
    match region.test_within(&arc.position(t), tolerance) {
        Containment::Outside => Classification::Outside,
        Containment::Inside => Classification::Inside,
        Containment::Boundary(curve) => {
            if is_top(arc.first()) == is_top(curve) {
                Classification::SameEdge
            } else {
                Classification::DiffEdge
            }
        }
    }
}

/// Coarse direction of a curve: leftward, or straight up when vertical.
fn is_top<T: FloatingPoint>(curve: &Curve<T>) -> bool {
    let (start, end) = (curve.start(), curve.end());
    let delta = end.x - start.x;
    if delta == T::zero() {
        end.y > start.y
    } else {
        delta < T::zero()
    }
}
