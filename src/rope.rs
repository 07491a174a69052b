//! Ropes: chains of constrained points living in a shared [`ConstraintSystem`].
//!
//! A rope only records which points it is made of; the system owns them.
//! Each link is stored on the point nearer the start, so structural edits
//! only have to fix up the predecessor's constraint list.

use alloc::vec::Vec as AllocVec;

use crate::arena::PointId;
use crate::config::InterpolationConfig;
use crate::constraint::ConstraintKind;
use crate::error::{PhysicsError, Result};
use crate::interpolate::Interpolated;
use crate::point::ConstrainedPoint;
use crate::system::ConstraintSystem;
use crate::vec::Vec2;

/// Configuration for creating a rope.
#[derive(Clone, Debug, PartialEq)]
pub struct RopeConfig {
    pub segments: usize,
    pub point_mass: f32,
    pub kind: ConstraintKind,
    pub pin_start: bool,
    pub pin_end: bool,
}

impl Default for RopeConfig {
    fn default() -> Self {
        RopeConfig {
            segments: 10,
            point_mass: 1.0,
            kind: ConstraintKind::Distance,
            pin_start: true,
            pin_end: false,
        }
    }
}

impl RopeConfig {
    /// Set the number of segments.
    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    /// Set the constraint kind used for every link.
    pub fn with_kind(mut self, kind: ConstraintKind) -> Self {
        self.kind = kind;
        self
    }

    /// Choose which ends are pinned.
    pub fn with_pins(mut self, start: bool, end: bool) -> Self {
        self.pin_start = start;
        self.pin_end = end;
        self
    }

    /// Set the mass of each unpinned point.
    pub fn with_point_mass(mut self, mass: f32) -> Self {
        self.point_mass = mass;
        self
    }
}

/// A rope made of points in a [`ConstraintSystem`].
#[derive(Clone, Debug)]
pub struct Rope {
    ids: AllocVec<PointId>,
    segment_length: f32,
    kind: ConstraintKind,
    point_mass: f32,
}

impl Rope {
    /// Lay a straight rope from `start` to `end` and add it to `system`.
    pub fn build(system: &mut ConstraintSystem, start: Vec2, end: Vec2, config: &RopeConfig) -> Result<Self> {
        if config.segments == 0 {
            return Err(PhysicsError::InvalidSegmentCount);
        }
        let segment_length = start.distance(end) / config.segments as f32;

        let mut ids = AllocVec::with_capacity(config.segments + 1);
        for i in 0..=config.segments {
            let t = i as f32 / config.segments as f32;
            let mut point = ConstrainedPoint::with_mass(start.lerp(end, t), config.point_mass)?;
            if (i == 0 && config.pin_start) || (i == config.segments && config.pin_end) {
                point.pin();
            }
            ids.push(system.add_part(point));
        }
        for pair in ids.windows(2) {
            system.add_constraint(pair[0], pair[1], segment_length, config.kind)?;
        }

        log::debug!("built rope with {} segments of {:.3}", config.segments, segment_length);
        Ok(Rope {
            ids,
            segment_length,
            kind: config.kind,
            point_mass: config.point_mass,
        })
    }

    pub fn ids(&self) -> &[PointId] { &self.ids }
    pub fn len(&self) -> usize { self.ids.len() }
    pub fn is_empty(&self) -> bool { self.ids.is_empty() }
    pub fn segment_count(&self) -> usize { self.ids.len().saturating_sub(1) }
    pub fn segment_length(&self) -> f32 { self.segment_length }

    pub fn start(&self) -> Option<PointId> { self.ids.first().copied() }
    pub fn end(&self) -> Option<PointId> { self.ids.last().copied() }

    pub fn positions(&self, system: &ConstraintSystem) -> AllocVec<Vec2> {
        self.ids.iter().filter_map(|id| system.point(*id)).map(|p| p.position).collect()
    }

    pub fn interpolated_positions(
        &self,
        system: &ConstraintSystem,
        alpha: f32,
        config: &InterpolationConfig,
    ) -> AllocVec<Vec2> {
        self.ids
            .iter()
            .filter_map(|id| system.point(*id))
            .map(|p| p.draw_position(alpha, config))
            .collect()
    }

    /// Current length of the polyline through the rope's points.
    pub fn length(&self, system: &ConstraintSystem) -> f32 {
        let positions = self.positions(system);
        positions.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Sum of the rest lengths of the rope's links.
    pub fn rest_length(&self, system: &ConstraintSystem) -> f32 {
        self.ids
            .windows(2)
            .filter_map(|w| system.point(w[0]).and_then(|p| p.constraint_to(w[1])))
            .map(|c| c.rest_length())
            .sum()
    }

    /// Move the pinned start point (the rope's anchor).
    pub fn move_anchor(&self, system: &mut ConstraintSystem, position: Vec2) -> Result<()> {
        let id = self.start().ok_or(PhysicsError::InvalidSegmentCount)?;
        system.point_mut(id).ok_or(PhysicsError::UnknownPoint)?.move_pin(position);
        Ok(())
    }

    /// Cut the link after point `segment`. `self` keeps points
    /// `0..=segment`; the rest is returned as a free-hanging rope.
    pub fn cut(&mut self, system: &mut ConstraintSystem, segment: usize) -> Result<Rope> {
        let count = self.segment_count();
        if segment >= count {
            return Err(PhysicsError::SegmentOutOfBounds { index: segment, count });
        }
        let (from, to) = (self.ids[segment], self.ids[segment + 1]);
        if let Some(point) = system.point_mut(from) {
            point.remove_constraints_to(to);
        }
        if let Some(point) = system.point_mut(to) {
            point.remove_constraints_to(from);
        }

        let tail = self.ids.split_off(segment + 1);
        log::debug!("cut rope at segment {}: {} + {} points", segment, self.ids.len(), tail.len());
        Ok(Rope {
            ids: tail,
            segment_length: self.segment_length,
            kind: self.kind,
            point_mass: self.point_mass,
        })
    }

    /// Pay out one more segment next to the anchor.
    pub fn lengthen(&mut self, system: &mut ConstraintSystem) -> Result<PointId> {
        if self.ids.len() < 2 {
            return Err(PhysicsError::InvalidSegmentCount);
        }
        let (anchor, next) = (self.ids[0], self.ids[1]);
        let anchor_pos = system.point(anchor).ok_or(PhysicsError::UnknownPoint)?.position;
        let next_pos = system.point(next).ok_or(PhysicsError::UnknownPoint)?.position;
        let index = system.index_of(anchor).ok_or(PhysicsError::UnknownPoint)? + 1;

        let point = ConstrainedPoint::with_mass(anchor_pos.lerp(next_pos, 0.5), self.point_mass)?;
        let inserted = system.add_part_at_index(point, index)?;

        if let Some(point) = system.point_mut(anchor) {
            point.remove_constraints_to(next);
        }
        system.add_constraint(anchor, inserted, self.segment_length, self.kind)?;
        system.add_constraint(inserted, next, self.segment_length, self.kind)?;
        self.ids.insert(1, inserted);

        log::debug!("lengthened rope to {} segments", self.segment_count());
        Ok(inserted)
    }

    /// Reel in the segment next to the anchor.
    pub fn shorten(&mut self, system: &mut ConstraintSystem) -> Result<ConstrainedPoint> {
        if self.ids.len() < 3 {
            return Err(PhysicsError::InvalidSegmentCount);
        }
        let (anchor, removed, next) = (self.ids[0], self.ids[1], self.ids[2]);
        let index = system.index_of(removed).ok_or(PhysicsError::UnknownPoint)?;

        if let Some(point) = system.point_mut(anchor) {
            point.remove_constraints_to(removed);
        }
        let point = system.remove_part_at_index(index)?;
        system.add_constraint(anchor, next, self.segment_length, self.kind)?;
        self.ids.remove(1);

        log::debug!("shortened rope to {} segments", self.segment_count());
        Ok(point)
    }

    /// Remove every point of the rope from `system`. Returns how many of
    /// its points were still live.
    pub fn detach(self, system: &mut ConstraintSystem) -> usize {
        let removed = system.remove_parts(&self.ids);
        if removed < self.ids.len() {
            log::debug!("detached rope had {} stale points", self.ids.len() - removed);
        }
        removed
    }
}
