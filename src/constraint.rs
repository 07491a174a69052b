//! Distance constraints between constrained points.

use crate::arena::PointId;
use crate::error::{PhysicsError, Result};

/// How a constraint reacts to deviations from its rest length.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintKind {
    /// Pull or push back to exactly the rest length.
    #[default]
    Distance,
    /// Only correct when stretched past the rest length (slack rope).
    NotMoreThan,
    /// Only correct when compressed below the rest length.
    NotLessThan,
}

impl ConstraintKind {
    /// Whether a link of `current_length` violates this kind of constraint.
    pub fn is_violated(self, current_length: f32, rest_length: f32) -> bool {
        match self {
            ConstraintKind::Distance => true,
            ConstraintKind::NotMoreThan => current_length > rest_length,
            ConstraintKind::NotLessThan => current_length < rest_length,
        }
    }
}

/// A directed link from the owning point to `target`.
///
/// Direction only decides which point iterates the link; the correction is
/// applied to both endpoints.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    pub(crate) target: PointId,
    pub(crate) rest_length: f32,
    pub(crate) kind: ConstraintKind,
}

impl Constraint {
    pub fn new(target: PointId, rest_length: f32, kind: ConstraintKind) -> Result<Self> {
        if rest_length.is_nan() || rest_length < 0.0 {
            return Err(PhysicsError::NegativeRestLength { rest_length });
        }
        Ok(Constraint { target, rest_length, kind })
    }

    pub fn target(&self) -> PointId { self.target }
    pub fn rest_length(&self) -> f32 { self.rest_length }
    pub fn kind(&self) -> ConstraintKind { self.kind }
}
