use std::fmt::Display;

use super::classification::Classification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperation {
    Union,
    Intersection,
    Difference,
}

impl BooleanOperation {
    /// Whether an arc of the first operand with the given classification belongs to the result.
    pub fn keeps_subject(&self, classification: Classification) -> bool {
        use Classification::*;
        match self {
            BooleanOperation::Union => matches!(classification, Outside | SameEdge),
            BooleanOperation::Intersection => matches!(classification, Inside | SameEdge),
            BooleanOperation::Difference => matches!(classification, Outside | DiffEdge),
        }
    }

    /// Whether an arc of the second operand with the given classification belongs to the result.
    /// For differences the arc is expected to be reversed already.
    pub fn keeps_clip(&self, classification: Classification) -> bool {
        match self {
            BooleanOperation::Union => classification == Classification::Outside,
            BooleanOperation::Intersection | BooleanOperation::Difference => {
                classification == Classification::Inside
            }
        }
    }
}

impl Display for BooleanOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BooleanOperation::Union => write!(f, "Union"),
            BooleanOperation::Intersection => write!(f, "Intersection"),
            BooleanOperation::Difference => write!(f, "Difference"),
        }
    }
}
