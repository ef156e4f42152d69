pub mod floating_point;
pub mod invertible;
pub mod orientation;
pub mod polynomial;
pub mod transformable;

pub use floating_point::*;
pub use invertible::*;
pub use orientation::*;
pub use polynomial::*;
pub use transformable::*;
