//! Verlet points with implicit velocity and outgoing distance constraints.

use alloc::vec::Vec as AllocVec;

use crate::arena::PointId;
use crate::constraint::{Constraint, ConstraintKind};
use crate::error::{PhysicsError, Result};
use crate::interpolate::Interpolated;
use crate::vec::Vec2;

/// A simulated mass linked to other points by distance constraints.
///
/// Velocity is never stored: it is `position - previous_position`, so any
/// external force must reach the point as an acceleration that
/// [`integrate`](Self::integrate) turns into a position delta.
#[derive(Clone, Debug)]
pub struct ConstrainedPoint {
    pub(crate) id: Option<PointId>,
    pub position: Vec2,
    pub previous_position: Vec2,
    acceleration: Vec2,
    mass: f32,
    inv_mass: f32,
    pinned: bool,
    pin_moved: bool,
    constraints: AllocVec<Constraint>,
}

impl ConstrainedPoint {
    pub fn new(position: Vec2) -> Self {
        ConstrainedPoint {
            id: None,
            position,
            previous_position: position,
            acceleration: Vec2::ZERO,
            mass: 1.0,
            inv_mass: 1.0,
            pinned: false,
            pin_moved: false,
            constraints: AllocVec::new(),
        }
    }

    pub fn with_mass(position: Vec2, mass: f32) -> Result<Self> {
        let mut point = Self::new(position);
        point.set_mass(mass)?;
        Ok(point)
    }

    /// A point that relaxation and integration never move.
    pub fn pinned(position: Vec2) -> Self {
        let mut point = Self::new(position);
        point.pin();
        point
    }

    /// Handle assigned when the point was added to a system.
    pub fn id(&self) -> Option<PointId> {
        self.id
    }

    pub fn mass(&self) -> f32 { self.mass }
    pub fn inv_mass(&self) -> f32 { self.inv_mass }
    pub fn is_pinned(&self) -> bool { self.pinned }
    pub fn constraints(&self) -> &[Constraint] { &self.constraints }

    pub fn set_mass(&mut self, mass: f32) -> Result<()> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidMass);
        }
        self.mass = mass;
        if !self.pinned {
            self.inv_mass = 1.0 / mass;
        }
        Ok(())
    }

    /// Accumulate an acceleration for the next [`integrate`](Self::integrate).
    pub fn apply_acceleration(&mut self, accel: Vec2) {
        if !self.pinned {
            self.acceleration += accel;
        }
    }

    /// Verlet step.
    ///
    /// `position += (position - previous_position) * damping + acceleration * delta²`,
    /// then `previous_position` takes the pre-update position. Accumulated
    /// acceleration is consumed. Constraints are left to relaxation.
    pub fn integrate(&mut self, delta: f32, damping: f32) {
        if self.pinned {
            // A pin moved since the last step already holds its snapshot.
            if !self.pin_moved {
                self.previous_position = self.position;
            }
            self.pin_moved = false;
            self.acceleration = Vec2::ZERO;
            return;
        }
        let velocity = (self.position - self.previous_position) * damping;
        let new_position = self.position + velocity + self.acceleration * (delta * delta);
        self.previous_position = self.position;
        self.position = new_position;
        self.acceleration = Vec2::ZERO;
    }

    /// Per-step displacement (implicit velocity).
    pub fn velocity_raw(&self) -> Vec2 {
        self.position - self.previous_position
    }

    /// Append a [`ConstraintKind::Distance`] link to `target`.
    pub fn add_constraint(&mut self, target: PointId, rest_length: f32) -> Result<()> {
        self.add_constraint_of_kind(target, rest_length, ConstraintKind::Distance)
    }

    pub fn add_constraint_of_kind(
        &mut self,
        target: PointId,
        rest_length: f32,
        kind: ConstraintKind,
    ) -> Result<()> {
        if self.id == Some(target) {
            return Err(PhysicsError::SelfConstraint);
        }
        self.constraints.push(Constraint::new(target, rest_length, kind)?);
        Ok(())
    }

    /// Drop every link to `target`. Returns how many were removed.
    pub fn remove_constraints_to(&mut self, target: PointId) -> usize {
        let before = self.constraints.len();
        self.constraints.retain(|c| c.target != target);
        before - self.constraints.len()
    }

    pub fn constraint_to(&self, target: PointId) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.target == target)
    }

    /// Explicitly change the rest length of the link to `target`.
    pub fn set_rest_length(&mut self, target: PointId, rest_length: f32) -> Result<()> {
        if rest_length.is_nan() || rest_length < 0.0 {
            return Err(PhysicsError::NegativeRestLength { rest_length });
        }
        let constraint = self
            .constraints
            .iter_mut()
            .find(|c| c.target == target)
            .ok_or(PhysicsError::UnknownPoint)?;
        constraint.rest_length = rest_length;
        Ok(())
    }

    pub fn clear_constraints(&mut self) {
        self.constraints.clear();
    }

    pub fn pin(&mut self) {
        self.pinned = true;
        self.pin_moved = false;
        self.inv_mass = 0.0;
        self.previous_position = self.position;
        self.acceleration = Vec2::ZERO;
    }

    /// Pin at a fixed world position, with no interpolation from the old one.
    pub fn pin_at(&mut self, position: Vec2) {
        self.position = position;
        self.pin();
    }

    pub fn unpin(&mut self, mass: f32) -> Result<()> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidMass);
        }
        self.pinned = false;
        self.pin_moved = false;
        self.set_mass(mass)
    }

    /// Move a pinned point. The position before the first move since the last
    /// step stays the interpolation snapshot, whether the move happens before
    /// or after the step. Unpinned points are left alone.
    pub fn move_pin(&mut self, position: Vec2) {
        if self.pinned {
            if !self.pin_moved {
                self.previous_position = self.position;
                self.pin_moved = true;
            }
            self.position = position;
        }
    }

    /// Place the point without any implied velocity.
    pub fn reset_position(&mut self, position: Vec2) {
        self.position = position;
        self.previous_position = position;
    }
}

impl Interpolated for ConstrainedPoint {
    fn current_position(&self) -> Vec2 { self.position }
    fn previous_position(&self) -> Vec2 { self.previous_position }
}
