//! Render interpolation between the last two logical steps.
//!
//! Simulation runs at a fixed logical rate; the display may tick faster,
//! slower or irregularly. Every simulated entity keeps exactly one current
//! and one previous snapshot of its interpolated fields, and a renderer blends
//! them with an `alpha` in [0, 1]: 0 is the last completed step, 1 the next.
//! Drawing never mutates simulation state.

use crate::config::{InterpolationConfig, TimestepConfig};
use crate::error::Result;
use crate::vec::Vec2;

/// Blend `previous` toward `current`.
///
/// Returns `current` exactly when `alpha >= 1` or when the squared distance
/// between the snapshots exceeds `max_distance_sq` (a teleport or reset).
pub fn interpolated_position(previous: Vec2, current: Vec2, alpha: f32, max_distance_sq: f32) -> Vec2 {
    if alpha >= 1.0 || previous.distance_sq(current) > max_distance_sq {
        return current;
    }
    previous.lerp(current, alpha.max(0.0))
}

/// Blend two angles (radians). `alpha >= 1` returns `current` exactly.
pub fn interpolated_angle(previous: f32, current: f32, alpha: f32) -> f32 {
    if alpha >= 1.0 {
        return current;
    }
    previous + (current - previous) * alpha.max(0.0)
}

/// Something with a current and previous position (and optionally angle).
pub trait Interpolated {
    fn current_position(&self) -> Vec2;
    fn previous_position(&self) -> Vec2;

    fn current_angle(&self) -> f32 {
        0.0
    }

    fn previous_angle(&self) -> f32 {
        0.0
    }

    fn draw_position(&self, alpha: f32, config: &InterpolationConfig) -> Vec2 {
        interpolated_position(self.previous_position(), self.current_position(), alpha, config.max_distance_sq)
    }

    fn draw_angle(&self, alpha: f32) -> f32 {
        interpolated_angle(self.previous_angle(), self.current_angle(), alpha)
    }
}

/// Fixed-step clock that converts variable frame times into logical steps
/// plus a render alpha.
///
/// ```
/// use cordage::config::TimestepConfig;
/// use cordage::interpolate::FixedTimestep;
///
/// let mut clock = FixedTimestep::new(TimestepConfig::new(0.1)).unwrap();
/// assert_eq!(clock.advance(0.25), 2);
/// assert!((clock.alpha() - 0.5).abs() < 1e-4);
/// ```
#[derive(Clone, Debug)]
pub struct FixedTimestep {
    config: TimestepConfig,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(config: TimestepConfig) -> Result<Self> {
        config.validate()?;
        Ok(FixedTimestep { config, accumulator: 0.0 })
    }

    pub fn step(&self) -> f32 {
        self.config.step
    }

    /// Feed one display frame's elapsed time; returns how many logical steps
    /// to run now. A backlog beyond `max_steps_per_frame` is dropped.
    pub fn advance(&mut self, frame_delta: f32) -> usize {
        if frame_delta.is_finite() && frame_delta > 0.0 {
            self.accumulator += frame_delta;
        }
        let step = self.config.step;
        let mut steps = 0;
        while self.accumulator >= step && steps < self.config.max_steps_per_frame {
            self.accumulator -= step;
            steps += 1;
        }
        if self.accumulator >= step {
            log::warn!(
                "dropping {:.4}s of simulation backlog after {} steps",
                self.accumulator - self.accumulator % step,
                steps
            );
            self.accumulator %= step;
        }
        steps
    }

    /// Progress toward the next logical step, in [0, 1].
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.config.step).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
