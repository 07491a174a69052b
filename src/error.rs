//! Error types for simulation setup and structural edits.

use core::fmt;

/// Errors reported at the API boundary.
///
/// Degenerate geometry and pool exhaustion are absorbed silently and never
/// surface here.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Constraint rest length must be zero or positive.
    NegativeRestLength { rest_length: f32 },
    /// A point cannot be constrained to itself.
    SelfConstraint,
    /// Relaxation needs at least one pass per step.
    InvalidIterations { iterations: usize },
    /// Point index is out of bounds.
    PointOutOfBounds { index: usize, count: usize },
    /// Point handle is stale or belongs to another system.
    UnknownPoint,
    /// Mass must be positive and finite.
    InvalidMass,
    /// Particle index is out of bounds.
    ParticleOutOfBounds { index: usize, count: usize },
    /// Particle pool capacity must be at least one.
    InvalidCapacity,
    /// A configuration field is out of range.
    InvalidConfig(&'static str),
    /// Fixed timestep must be positive and finite.
    InvalidTimestep,
    /// A rope needs at least one segment.
    InvalidSegmentCount,
    /// Rope segment index is out of bounds.
    SegmentOutOfBounds { index: usize, count: usize },
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::NegativeRestLength { rest_length } => {
                write!(f, "rest length {} must not be negative", rest_length)
            }
            PhysicsError::SelfConstraint => write!(f, "a point cannot be constrained to itself"),
            PhysicsError::InvalidIterations { iterations } => {
                write!(f, "relaxation iterations must be at least 1 (got {})", iterations)
            }
            PhysicsError::PointOutOfBounds { index, count } => {
                write!(f, "point index {} out of bounds (count: {})", index, count)
            }
            PhysicsError::UnknownPoint => write!(f, "point handle does not refer to a live point"),
            PhysicsError::InvalidMass => write!(f, "mass must be positive and finite"),
            PhysicsError::ParticleOutOfBounds { index, count } => {
                write!(f, "particle index {} out of bounds (count: {})", index, count)
            }
            PhysicsError::InvalidCapacity => write!(f, "particle capacity must be at least 1"),
            PhysicsError::InvalidConfig(field) => {
                write!(f, "invalid configuration: {}", field)
            }
            PhysicsError::InvalidTimestep => write!(f, "timestep must be positive and finite"),
            PhysicsError::InvalidSegmentCount => write!(f, "rope needs at least 1 segment"),
            PhysicsError::SegmentOutOfBounds { index, count } => {
                write!(f, "segment index {} out of bounds (count: {})", index, count)
            }
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = core::result::Result<T, PhysicsError>;
