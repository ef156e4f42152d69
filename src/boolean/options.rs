use crate::{intersection::Tolerance, misc::FloatingPoint};

/// Tolerances and limits for boolean operations.
#[derive(Clone, Debug, PartialEq)]
pub struct BooleanOptions<T: FloatingPoint> {
    /// Cut parameters on one curve closer than this are merged.
    pub parametric_epsilon: T,
    /// Points closer than this are merged into a single vertex.
    pub spatial_epsilon: T,
    /// Number of graph repair passes after the first cycle extraction,
    /// so at most `max_repair_attempts + 1` extraction passes run in total.
    pub max_repair_attempts: usize,
    /// Upper bound on vertex orderings tried when pairing dangling vertices during repair.
    /// Larger sets are sampled with a seeded shuffle instead of enumerated.
    pub max_permutations: usize,
    /// Upper bound on arc combinations expanded from a single graph cycle.
    pub max_cycle_combinations: usize,
}

impl<T: FloatingPoint> Default for BooleanOptions<T> {
    fn default() -> Self {
        Self {
            parametric_epsilon: T::parametric_epsilon(),
            spatial_epsilon: T::spatial_epsilon(),
            max_repair_attempts: 10,
            max_permutations: 720,
            max_cycle_combinations: 4096,
        }
    }
}

impl<T: FloatingPoint> BooleanOptions<T> {
    pub fn with_parametric_epsilon(mut self, parametric_epsilon: T) -> Self {
        self.parametric_epsilon = parametric_epsilon;
        self
    }

    pub fn with_spatial_epsilon(mut self, spatial_epsilon: T) -> Self {
        self.spatial_epsilon = spatial_epsilon;
        self
    }

    pub fn with_max_repair_attempts(mut self, max_repair_attempts: usize) -> Self {
        self.max_repair_attempts = max_repair_attempts;
        self
    }

    pub fn with_max_permutations(mut self, max_permutations: usize) -> Self {
        self.max_permutations = max_permutations;
        self
    }

    /// Tolerances handed to curve intersection and point containment.
    pub fn tolerance(&self) -> Tolerance<T> {
        Tolerance {
            parametric: self.parametric_epsilon,
            spatial: self.spatial_epsilon,
        }
    }

    pub fn with_max_cycle_combinations(mut self, max_cycle_combinations: usize) -> Self {
        self.max_cycle_combinations = max_cycle_combinations;
        self
    }

    pub(crate) fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.parametric_epsilon >= T::zero() && self.parametric_epsilon.is_finite(),
            "Parametric epsilon must be finite and non-negative"
        );
        anyhow::ensure!(
            self.spatial_epsilon >= T::zero() && self.spatial_epsilon.is_finite(),
            "Spatial epsilon must be finite and non-negative"
        );
        anyhow::ensure!(self.max_permutations > 0, "Max permutations must be positive");
        anyhow::ensure!(
            self.max_cycle_combinations > 0,
            "Max cycle combinations must be positive"
        );
        Ok(())
    }
}
