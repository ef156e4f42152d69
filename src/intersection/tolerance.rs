use crate::misc::FloatingPoint;

/// Distances under which intersection and containment queries treat values as equal.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerance<T: FloatingPoint> {
    /// Parameters this close to 0 or 1 are snapped onto the curve ends.
    pub parametric: T,
    /// Points this close are considered coincident.
    pub spatial: T,
}

impl<T: FloatingPoint> Default for Tolerance<T> {
    fn default() -> Self {
        Self {
            parametric: T::parametric_epsilon(),
            spatial: T::spatial_epsilon(),
        }
    }
}

impl<T: FloatingPoint> Tolerance<T> {
    pub fn with_parametric(mut self, parametric: T) -> Self {
        self.parametric = parametric;
        self
    }

    pub fn with_spatial(mut self, spatial: T) -> Self {
        self.spatial = spatial;
        self
    }
}
