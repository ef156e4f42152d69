#![allow(clippy::needless_range_loop)]

mod boolean;
mod bounding_box;
mod curve;
mod intersection;
mod misc;
mod region;
mod ring;
mod sweep;

pub mod prelude {
    pub use crate::boolean::*;
    pub use crate::bounding_box::*;
    pub use crate::curve::*;
    pub use crate::intersection::*;
    pub use crate::misc::*;
    pub use crate::region::*;
    pub use crate::ring::*;
    pub use crate::sweep::*;
}
