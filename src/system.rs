//! Constraint system: ordered points, Verlet integration and relaxation.

use alloc::string::{String, ToString};
use alloc::vec::Vec as AllocVec;
use core::fmt;

use crate::arena::{Arena, PointId};
use crate::config::SolverConfig;
use crate::constraint::ConstraintKind;
use crate::error::{PhysicsError, Result};
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::point::ConstrainedPoint;
use crate::relax::{relax, RelaxReport};

/// Owns an ordered set of constrained points and steps them.
///
/// Order only decides iteration order and what the index-based structural
/// edits refer to. Points keep their [`PointId`] across edits.
///
/// Removing a point does not scan other points for links to it; whoever
/// manages the rope strips those (see [`ConstrainedPoint::remove_constraints_to`]).
/// Links to a removed point are skipped by relaxation until then.
pub struct ConstraintSystem {
    points: Arena<ConstrainedPoint>,
    order: AllocVec<PointId>,
    config: SolverConfig,
}

impl ConstraintSystem {
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(ConstraintSystem {
            points: Arena::new(),
            order: AllocVec::new(),
            config,
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn relaxation_iterations(&self) -> usize {
        self.config.relaxation_iterations
    }

    pub fn set_relaxation_iterations(&mut self, iterations: usize) -> Result<()> {
        if iterations == 0 {
            return Err(PhysicsError::InvalidIterations { iterations });
        }
        self.config.relaxation_iterations = iterations;
        Ok(())
    }

    pub fn set_config(&mut self, config: SolverConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Append a point at the end of the order.
    pub fn add_part(&mut self, point: ConstrainedPoint) -> PointId {
        let id = self.store(point);
        self.order.push(id);
        log::debug!("added point {} at index {}", id, self.order.len() - 1);
        id
    }

    /// Insert a point at `index`, shifting the points at and after it.
    /// `index == len()` appends.
    pub fn add_part_at_index(&mut self, point: ConstrainedPoint, index: usize) -> Result<PointId> {
        if index > self.order.len() {
            return Err(PhysicsError::PointOutOfBounds { index, count: self.order.len() });
        }
        let id = self.store(point);
        self.order.insert(index, id);
        log::debug!("inserted point {} at index {}", id, index);
        Ok(id)
    }

    /// Remove the point at `index` and hand it back.
    pub fn remove_part_at_index(&mut self, index: usize) -> Result<ConstrainedPoint> {
        if index >= self.order.len() {
            return Err(PhysicsError::PointOutOfBounds { index, count: self.order.len() });
        }
        let id = self.order.remove(index);
        let mut point = self.points.remove(id).ok_or(PhysicsError::UnknownPoint)?;
        point.id = None;
        log::debug!("removed point {} from index {}", id, index);
        Ok(point)
    }

    /// Remove a point by handle.
    pub fn remove_part(&mut self, id: PointId) -> Result<ConstrainedPoint> {
        let index = self.index_of(id).ok_or(PhysicsError::UnknownPoint)?;
        self.remove_part_at_index(index)
    }

    /// Remove several points at once with a single pass over the order.
    /// Returns how many were live and removed; stale handles are skipped.
    pub fn remove_parts(&mut self, ids: &[PointId]) -> usize {
        let mut removed = 0;
        for &id in ids {
            match self.points.remove(id) {
                Some(_) => removed += 1,
                None => log::debug!("skipped stale point {} in batch removal", id),
            }
        }
        let points = &self.points;
        self.order.retain(|id| points.contains(*id));
        log::debug!("removed {} points in one pass", removed);
        removed
    }

    /// Link `from` to `to`. Both must be live points of this system.
    pub fn add_constraint(
        &mut self,
        from: PointId,
        to: PointId,
        rest_length: f32,
        kind: ConstraintKind,
    ) -> Result<()> {
        if from == to {
            return Err(PhysicsError::SelfConstraint);
        }
        if !self.points.contains(to) {
            return Err(PhysicsError::UnknownPoint);
        }
        self.points
            .get_mut(from)
            .ok_or(PhysicsError::UnknownPoint)?
            .add_constraint_of_kind(to, rest_length, kind)
    }

    /// Link `from` to `to` using their current distance as rest length.
    pub fn link(&mut self, from: PointId, to: PointId, kind: ConstraintKind) -> Result<()> {
        let a = self.points.get(from).ok_or(PhysicsError::UnknownPoint)?.position;
        let b = self.points.get(to).ok_or(PhysicsError::UnknownPoint)?.position;
        self.add_constraint(from, to, a.distance(b), kind)
    }

    /// Advance one logical step.
    pub fn update(&mut self, delta: f32) -> RelaxReport {
        self.update_observed(delta, &mut NoOpStepObserver)
    }

    /// Advance one logical step: integrate every point, then relax.
    ///
    /// All integration happens before the first relaxation pass.
    pub fn update_observed<O: StepObserver>(&mut self, delta: f32, observer: &mut O) -> RelaxReport {
        let gravity = self.config.gravity;
        let damping = self.config.damping;

        for &id in &self.order {
            if let Some(point) = self.points.get_mut(id) {
                // Gravity enters as an acceleration; integrate turns it into
                // a position delta of gravity * delta².
                point.apply_acceleration(gravity);
                point.integrate(delta, damping);
            }
        }
        observer.on_integrate();

        let report = relax(&mut self.points, &self.order, self.config.relaxation_iterations, observer);
        observer.on_step_complete();
        report
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.points.contains(id)
    }

    pub fn point(&self, id: PointId) -> Option<&ConstrainedPoint> {
        self.points.get(id)
    }

    pub fn point_mut(&mut self, id: PointId) -> Option<&mut ConstrainedPoint> {
        self.points.get_mut(id)
    }

    pub fn point_at(&self, index: usize) -> Option<&ConstrainedPoint> {
        self.order.get(index).and_then(|id| self.points.get(*id))
    }

    pub fn id_at(&self, index: usize) -> Option<PointId> {
        self.order.get(index).copied()
    }

    pub fn index_of(&self, id: PointId) -> Option<usize> {
        self.order.iter().position(|other| *other == id)
    }

    /// Handles in iteration order.
    pub fn ids(&self) -> &[PointId] {
        &self.order
    }

    /// Points in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = &ConstrainedPoint> + '_ {
        self.order.iter().filter_map(move |id| self.points.get(*id))
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.order.clear();
    }

    /// Text dump of every point and its outgoing links.
    pub fn dump(&self) -> String {
        self.to_string()
    }

    /// Write the topology dump to the `debug` log.
    pub fn log(&self) {
        log::debug!("{}", self);
    }

    fn store(&mut self, mut point: ConstrainedPoint) -> PointId {
        point.id = Some(self.points.next_id());
        self.points.insert(point)
    }
}

impl fmt::Display for ConstraintSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ConstraintSystem: {} points, {} relaxation passes",
            self.order.len(),
            self.config.relaxation_iterations
        )?;
        for (index, id) in self.order.iter().enumerate() {
            let Some(point) = self.points.get(*id) else {
                writeln!(f, "  [{}] {} <missing>", index, id)?;
                continue;
            };
            writeln!(
                f,
                "  [{}] {} pos=({:.3}, {:.3}) prev=({:.3}, {:.3}){}",
                index,
                id,
                point.position.x,
                point.position.y,
                point.previous_position.x,
                point.previous_position.y,
                if point.is_pinned() { " pinned" } else { "" }
            )?;
            for c in point.constraints() {
                let state = match self.points.get(c.target()) {
                    Some(target) => {
                        let length = point.position.distance(target.position);
                        alloc::format!("len={:.3}", length)
                    }
                    None => String::from("dangling"),
                };
                writeln!(f, "      -> {} rest={:.3} {:?} {}", c.target(), c.rest_length(), c.kind(), state)?;
            }
        }
        Ok(())
    }
}
