//! Verlet ropes, particle emitters and render interpolation for 2D games.
//!
//! `cordage` is the position-based simulation layer of a 2D game: point
//! masses joined by distance constraints (ropes, bungees, soft chains)
//! stepped with Verlet integration and relaxed iteratively, particle emitters
//! with pluggable per-effect rules, and the interpolation contract that lets
//! rendering run at its own rate between fixed logical steps.
//!
//! # Features
//!
//! - **Verlet points**: implicit velocity, explicit acceleration-to-position step
//! - **Relaxation**: Gauss-Seidel distance constraints with pinning and slack links
//! - **Ropes**: build, cut, lengthen and shorten at runtime with stable handles
//! - **Particles**: pooled emitters, time-based emission, rotating and cloud effects
//! - **Interpolation**: one step of history per entity, teleport-safe blending
//! - **Observable**: monitor steps via the `StepObserver` trait
//! - **`no_std` compatible**: needs only `alloc`

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod arena;
pub mod camera;
pub mod color;
pub mod config;
pub mod constraint;
pub mod effects;
pub mod emitter;
pub mod error;
pub mod interpolate;
pub mod observer;
pub mod particle;
pub mod point;
pub mod relax;
pub mod rope;
pub mod system;
pub mod vec;

// Re-export primary API
pub use arena::PointId;
pub use camera::Camera2D;
pub use color::Color;
pub use config::{EmitterConfig, InterpolationConfig, SolverConfig, TimestepConfig};
pub use constraint::{Constraint, ConstraintKind};
pub use effects::{MorphingCloudBehavior, RotatingBehavior};
pub use emitter::{DefaultBehavior, EmitterContext, ParticleBehavior, ParticleEmitter};
pub use error::{PhysicsError, Result};
pub use interpolate::{interpolated_angle, interpolated_position, FixedTimestep, Interpolated};
pub use observer::{NoOpStepObserver, StepObserver};
pub use particle::{Particle, ParticlePool, Sprite};
pub use point::ConstrainedPoint;
pub use relax::RelaxReport;
pub use rope::{Rope, RopeConfig};
pub use system::ConstraintSystem;
pub use vec::Vec2;
