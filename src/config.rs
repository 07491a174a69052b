//! Construction-time configuration for solvers, emitters and the render clock.
//!
//! All configs follow the same builder shape and are validated explicitly;
//! invalid values are rejected rather than clamped so authoring mistakes in
//! rope or effect definitions surface immediately.

use crate::color::Color;
use crate::error::{PhysicsError, Result};
use crate::vec::Vec2;

/// Configuration for a [`ConstraintSystem`](crate::system::ConstraintSystem).
///
/// # Builder Pattern
/// ```
/// use cordage::config::SolverConfig;
/// use cordage::vec::Vec2;
///
/// let config = SolverConfig::new()
///     .with_relaxation_iterations(20)
///     .with_gravity(Vec2::new(0.0, 784.0))
///     .with_damping(0.99);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Relaxation passes per logical step. More passes = stiffer ropes at
    /// linear cost. Default: 8.
    pub relaxation_iterations: usize,
    /// Acceleration applied to every unpinned point. Default: zero.
    pub gravity: Vec2,
    /// Factor applied to the implicit velocity, in [0, 1].
    /// 1.0 = no damping. Default: 1.0.
    pub damping: f32,
}

impl SolverConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SolverConfig {
            relaxation_iterations: 8,
            gravity: Vec2::ZERO,
            damping: 1.0,
        }
    }

    /// Set the number of relaxation passes per step.
    pub fn with_relaxation_iterations(mut self, iterations: usize) -> Self {
        self.relaxation_iterations = iterations;
        self
    }

    /// Set the gravity vector.
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the damping factor.
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.relaxation_iterations == 0 {
            return Err(PhysicsError::InvalidIterations { iterations: self.relaxation_iterations });
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(PhysicsError::InvalidConfig("damping must be in [0, 1]"));
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig("gravity must be finite"));
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Emitter parameters. Every `*_var` field is a symmetric variance: the
/// spawned value is drawn uniformly from `base ± var`.
///
/// Angles are in radians.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmitterConfig {
    pub angle: f32,
    pub angle_var: f32,
    pub life: f32,
    pub life_var: f32,
    pub speed: f32,
    pub speed_var: f32,
    pub size: f32,
    pub size_var: f32,
    pub start_color: Color,
    pub start_color_var: Color,
    pub end_color: Color,
    pub end_color_var: Color,
    /// Particles per second. Zero disables continuous emission (bursts only).
    pub emission_rate: f32,
    /// Seconds of emission. Negative = emit forever.
    pub duration: f32,
    /// Pool capacity.
    pub total_particles: usize,
    pub gravity: Vec2,
    /// Spawn jitter around the emitter origin.
    pub position_var: Vec2,
    /// Angular velocity (radians per second) for rotating effects.
    pub spin: f32,
    pub spin_var: f32,
}

impl EmitterConfig {
    /// Create an emitter config with a pool of `total_particles` and default values.
    pub fn new(total_particles: usize) -> Self {
        EmitterConfig {
            angle: 0.0,
            angle_var: 0.0,
            life: 1.0,
            life_var: 0.0,
            speed: 0.0,
            speed_var: 0.0,
            size: 1.0,
            size_var: 0.0,
            start_color: Color::WHITE,
            start_color_var: Color::TRANSPARENT,
            end_color: Color::WHITE,
            end_color_var: Color::TRANSPARENT,
            emission_rate: 0.0,
            duration: -1.0,
            total_particles,
            gravity: Vec2::ZERO,
            position_var: Vec2::ZERO,
            spin: 0.0,
            spin_var: 0.0,
        }
    }

    /// Set the emission direction and its variance.
    pub fn with_angle(mut self, angle: f32, angle_var: f32) -> Self {
        self.angle = angle;
        self.angle_var = angle_var;
        self
    }

    /// Set the particle lifetime and its variance.
    pub fn with_life(mut self, life: f32, life_var: f32) -> Self {
        self.life = life;
        self.life_var = life_var;
        self
    }

    /// Set the initial speed and its variance.
    pub fn with_speed(mut self, speed: f32, speed_var: f32) -> Self {
        self.speed = speed;
        self.speed_var = speed_var;
        self
    }

    /// Set the particle size and its variance.
    pub fn with_size(mut self, size: f32, size_var: f32) -> Self {
        self.size = size;
        self.size_var = size_var;
        self
    }

    /// Set the start and end colours.
    pub fn with_colors(mut self, start: Color, end: Color) -> Self {
        self.start_color = start;
        self.end_color = end;
        self
    }

    /// Set the start and end colour variances.
    pub fn with_color_variance(mut self, start_var: Color, end_var: Color) -> Self {
        self.start_color_var = start_var;
        self.end_color_var = end_var;
        self
    }

    /// Set the emission rate in particles per second.
    pub fn with_emission_rate(mut self, rate: f32) -> Self {
        self.emission_rate = rate;
        self
    }

    /// Set the emission duration. Negative emits forever.
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Set the gravity applied to live particles.
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the spawn jitter around the origin.
    pub fn with_position_var(mut self, position_var: Vec2) -> Self {
        self.position_var = position_var;
        self
    }

    /// Set the angular velocity and its variance.
    pub fn with_spin(mut self, spin: f32, spin_var: f32) -> Self {
        self.spin = spin;
        self.spin_var = spin_var;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_particles == 0 {
            return Err(PhysicsError::InvalidCapacity);
        }
        if !self.life.is_finite() || self.life < 0.0 {
            return Err(PhysicsError::InvalidConfig("life must be finite and non-negative"));
        }
        if !self.emission_rate.is_finite() || self.emission_rate < 0.0 {
            return Err(PhysicsError::InvalidConfig("emission rate must be finite and non-negative"));
        }
        if !self.size.is_finite() || self.size < 0.0 {
            return Err(PhysicsError::InvalidConfig("size must be finite and non-negative"));
        }
        if self.duration.is_nan() {
            return Err(PhysicsError::InvalidConfig("duration must not be NaN"));
        }
        if !self.angle.is_finite() || !self.speed.is_finite() || !self.spin.is_finite() {
            return Err(PhysicsError::InvalidConfig("angle, speed and spin must be finite"));
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig("gravity must be finite"));
        }
        let colors = [self.start_color, self.start_color_var, self.end_color, self.end_color_var];
        if colors.iter().any(|c| !c.is_finite()) {
            return Err(PhysicsError::InvalidConfig("colours must be finite"));
        }
        let variances = [
            self.angle_var,
            self.life_var,
            self.speed_var,
            self.size_var,
            self.spin_var,
            self.position_var.x,
            self.position_var.y,
        ];
        if variances.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(PhysicsError::InvalidConfig("variances must be finite and non-negative"));
        }
        Ok(())
    }
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Render-side interpolation settings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpolationConfig {
    /// Squared distance above which a position change is treated as a
    /// teleport and drawn without blending. Default: 100².
    pub max_distance_sq: f32,
}

impl InterpolationConfig {
    /// Create an interpolation config with the given teleport threshold.
    pub fn new(max_distance_sq: f32) -> Self {
        InterpolationConfig { max_distance_sq }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_distance_sq.is_nan() || self.max_distance_sq < 0.0 {
            return Err(PhysicsError::InvalidConfig("max_distance_sq must not be negative"));
        }
        Ok(())
    }
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self::new(100.0 * 100.0)
    }
}

/// Fixed logical step settings for [`FixedTimestep`](crate::interpolate::FixedTimestep).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimestepConfig {
    /// Seconds per logical step. Default: 1/60.
    pub step: f32,
    /// Upper bound on logical steps per display frame; the rest of the
    /// backlog is dropped. Default: 5.
    pub max_steps_per_frame: usize,
}

impl TimestepConfig {
    /// Create a timestep config with the given step length.
    pub fn new(step: f32) -> Self {
        TimestepConfig { step, max_steps_per_frame: 5 }
    }

    /// Set the cap on logical steps per display frame.
    pub fn with_max_steps_per_frame(mut self, max_steps: usize) -> Self {
        self.max_steps_per_frame = max_steps;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.step.is_finite() || self.step <= 0.0 || self.max_steps_per_frame == 0 {
            return Err(PhysicsError::InvalidTimestep);
        }
        Ok(())
    }
}

impl Default for TimestepConfig {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}
