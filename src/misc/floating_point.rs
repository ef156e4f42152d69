use nalgebra::RealField;
use num_traits::ToPrimitive;

/// Trait for floating point types (f32, f64)
/// Mainly used to identify the type of the field in nalgebra
///
/// The tolerances below are shared by the intersection, containment and splitting routines.
pub trait FloatingPoint: RealField + ToPrimitive + Copy {
    /// Two curve parameters closer than this are treated as the same cut.
    fn parametric_epsilon() -> Self {
        Self::from_f64(1e-5).unwrap()
    }

    /// Two points closer than this are treated as coincident.
    fn spatial_epsilon() -> Self {
        Self::from_f64(1e-5).unwrap()
    }

    /// Tolerance for comparing raw scalars (polynomial coefficients, sorted parameters).
    fn scalar_epsilon() -> Self {
        Self::from_f64(1e-14).unwrap()
    }
}

impl FloatingPoint for f32 {
    fn scalar_epsilon() -> Self {
        1e-7
    }
}

impl FloatingPoint for f64 {}
