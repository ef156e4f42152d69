use nalgebra::Point2;
use num_traits::NumCast;
use robust::{orient2d, Coord};

use super::FloatingPoint;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

fn coord<T: FloatingPoint>(p: &Point2<T>) -> Coord<f64> {
    Coord {
        x: <f64 as NumCast>::from(p.x).unwrap_or(f64::NAN),
        y: <f64 as NumCast>::from(p.y).unwrap_or(f64::NAN),
    }
}

/// Exact orientation of the turn `p -> q -> r`.
pub fn orientation<T: FloatingPoint>(p: &Point2<T>, q: &Point2<T>, r: &Point2<T>) -> Orientation {
    let det = orient2d(coord(p), coord(q), coord(r));
    if det < 0. {
        Orientation::Clockwise
    } else if det > 0. {
        Orientation::CounterClockwise
    } else {
        Orientation::Collinear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns() {
        let (p, q) = (Point2::new(0., 0.), Point2::new(1., 0.));
        assert_eq!(orientation(&p, &q, &Point2::new(1., 1.)), Orientation::CounterClockwise);
        assert_eq!(orientation(&p, &q, &Point2::new(1., -1.)), Orientation::Clockwise);
        assert_eq!(orientation(&p, &q, &Point2::new(3., 0.)), Orientation::Collinear);
    }
}
