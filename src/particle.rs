//! Emitted particles and the fixed-capacity pool that owns them.

use alloc::vec::Vec as AllocVec;

use crate::color::Color;
use crate::config::InterpolationConfig;
use crate::error::{PhysicsError, Result};
use crate::interpolate::Interpolated;
use crate::vec::Vec2;

/// One emitted particle.
///
/// `position`/`previous_position` and `angle`/`previous_angle` are the
/// interpolation pairs; both previous values are written at the start of the
/// particle's location update in each tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub previous_position: Vec2,
    pub velocity_direction: Vec2,
    pub speed: f32,
    /// Seconds since spawn.
    pub age: f32,
    /// Seconds left before expiry. `<= 0` means dead.
    pub life: f32,
    pub size: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    /// Colour change per second.
    pub delta_color: Color,
    /// Opacity multiplier shaped by effects (fade windows).
    pub alpha: f32,
    pub angle: f32,
    pub previous_angle: f32,
    pub angular_velocity: f32,
}

impl Particle {
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Age as a fraction of total lifetime, in [0, 1].
    pub fn normalized_age(&self) -> f32 {
        let total = self.age + self.life.max(0.0);
        if total <= 0.0 {
            1.0
        } else {
            (self.age / total).clamp(0.0, 1.0)
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity_direction * self.speed
    }
}

impl Default for Particle {
    fn default() -> Self {
        Particle {
            position: Vec2::ZERO,
            previous_position: Vec2::ZERO,
            velocity_direction: Vec2::ZERO,
            speed: 0.0,
            age: 0.0,
            life: 0.0,
            size: 0.0,
            width: 0.0,
            height: 0.0,
            color: Color::WHITE,
            delta_color: Color::TRANSPARENT,
            alpha: 1.0,
            angle: 0.0,
            previous_angle: 0.0,
            angular_velocity: 0.0,
        }
    }
}

impl Interpolated for Particle {
    fn current_position(&self) -> Vec2 { self.position }
    fn previous_position(&self) -> Vec2 { self.previous_position }
    fn current_angle(&self) -> f32 { self.angle }
    fn previous_angle(&self) -> f32 { self.previous_angle }
}

/// Live particles plus the drawer-side arrays indexed alongside them.
///
/// `quads[i]` is the atlas quad particle `i` draws with;
/// `rotation_angles[i]` / `rotation_positions[i]` cache the interpolated
/// angle and position the drawer uses, refreshed by
/// [`refresh_draw_cache`](Self::refresh_draw_cache). Every structural change
/// goes through this type so the arrays stay the same length and aligned.
#[derive(Clone, Debug)]
pub struct ParticlePool {
    particles: AllocVec<Particle>,
    quads: AllocVec<usize>,
    rotation_angles: AllocVec<f32>,
    rotation_positions: AllocVec<Vec2>,
    capacity: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(PhysicsError::InvalidCapacity);
        }
        Ok(ParticlePool {
            particles: AllocVec::with_capacity(capacity),
            quads: AllocVec::with_capacity(capacity),
            rotation_angles: AllocVec::with_capacity(capacity),
            rotation_positions: AllocVec::with_capacity(capacity),
            capacity,
        })
    }

    pub fn len(&self) -> usize { self.particles.len() }
    pub fn is_empty(&self) -> bool { self.particles.is_empty() }
    pub fn is_full(&self) -> bool { self.particles.len() >= self.capacity }
    pub fn capacity(&self) -> usize { self.capacity }

    pub fn particles(&self) -> &[Particle] { &self.particles }
    pub fn particles_mut(&mut self) -> &mut [Particle] { &mut self.particles }
    pub fn quads(&self) -> &[usize] { &self.quads }
    pub fn rotation_angles(&self) -> &[f32] { &self.rotation_angles }
    pub fn rotation_positions(&self) -> &[Vec2] { &self.rotation_positions }

    /// Take a free slot. Returns `None` (the particle is dropped) when full.
    pub fn push(&mut self, particle: Particle, quad: usize) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        self.rotation_angles.push(particle.angle);
        self.rotation_positions.push(particle.position);
        self.quads.push(quad);
        self.particles.push(particle);
        Some(self.particles.len() - 1)
    }

    /// Swap-remove `index` from every array at once.
    pub fn remove(&mut self, index: usize) -> Result<Particle> {
        if index >= self.particles.len() {
            return Err(PhysicsError::ParticleOutOfBounds { index, count: self.particles.len() });
        }
        self.quads.swap_remove(index);
        self.rotation_angles.swap_remove(index);
        self.rotation_positions.swap_remove(index);
        Ok(self.particles.swap_remove(index))
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.quads.clear();
        self.rotation_angles.clear();
        self.rotation_positions.clear();
    }

    /// Fill the rotation caches with interpolated values. Reads particles,
    /// writes only the drawer-side arrays.
    pub fn refresh_draw_cache(&mut self, alpha: f32, config: &InterpolationConfig) {
        let caches = self.rotation_angles.iter_mut().zip(self.rotation_positions.iter_mut());
        for (particle, (angle, position)) in self.particles.iter().zip(caches) {
            *angle = particle.draw_angle(alpha);
            *position = particle.draw_position(alpha, config);
        }
    }

    /// Drawable view of every live particle, from the draw cache.
    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        (0..self.particles.len())
            .filter(move |i| self.particles[*i].is_alive())
            .map(move |i| {
                let particle = &self.particles[i];
                let mut color = particle.color.clamped();
                color.a *= particle.alpha.clamp(0.0, 1.0);
                Sprite {
                    quad: self.quads[i],
                    position: self.rotation_positions[i],
                    angle: self.rotation_angles[i],
                    width: particle.width,
                    height: particle.height,
                    color,
                }
            })
    }
}

/// What a drawing collaborator needs to render one particle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sprite {
    pub quad: usize,
    pub position: Vec2,
    pub angle: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
}
