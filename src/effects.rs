//! Effect behaviours built on the base particle rules.

use core::f32::consts::TAU;

use rand::rngs::SmallRng;
use rand::Rng;

use crate::emitter::{
    base_age_particle, base_init_particle, random_minus1_1, EmitterContext, ParticleBehavior,
};
use crate::error::{PhysicsError, Result};
use crate::particle::Particle;

fn pick_quad(quad_count: usize, rng: &mut SmallRng) -> usize {
    if quad_count <= 1 {
        0
    } else {
        rng.gen_range(0..quad_count)
    }
}

/// Spinning sprites (leaves, sparks, debris).
///
/// Spawns with a random starting angle, `spin ± spin_var` angular velocity and
/// a random quad out of `quad_count`, and fades out over the last
/// `fade_out` seconds of life.
#[derive(Clone, Debug)]
pub struct RotatingBehavior {
    pub quad_count: usize,
    pub fade_out: f32,
}

impl RotatingBehavior {
    pub fn new(quad_count: usize, fade_out: f32) -> Self {
        RotatingBehavior { quad_count, fade_out }
    }
}

impl ParticleBehavior for RotatingBehavior {
    fn validate(&self) -> Result<()> {
        if !self.fade_out.is_finite() || self.fade_out < 0.0 {
            return Err(PhysicsError::InvalidConfig("fade-out must be finite and non-negative"));
        }
        Ok(())
    }

    fn init_particle(&mut self, ctx: &EmitterContext<'_>, particle: &mut Particle, rng: &mut SmallRng) -> usize {
        base_init_particle(ctx, particle, rng);
        particle.angular_velocity = ctx.config.spin + ctx.config.spin_var * random_minus1_1(rng);
        particle.angle = rng.gen::<f32>() * TAU;
        particle.previous_angle = particle.angle;
        pick_quad(self.quad_count, rng)
    }

    fn update_particle(&mut self, ctx: &EmitterContext<'_>, particle: &mut Particle, _index: usize, delta: f32) {
        if !base_age_particle(particle, delta) {
            return;
        }
        self.update_particle_location(ctx, particle, delta);
        if self.fade_out > 0.0 {
            particle.alpha = (particle.life / self.fade_out).min(1.0);
        }
    }
}

/// Puffy cloud sprites that grow, then shrink, while drifting to a halt.
///
/// Quads are handed out round-robin so neighbouring puffs differ. Over the
/// particle's normalised age `t`, the drawn size goes `start_scale` →
/// `peak_scale` until `t = peak_at`, then → `end_scale`. Opacity ramps in over
/// the first `fade_in` and out over the last `fade_out` fraction of life.
/// Speed decays by `damping` per second.
#[derive(Clone, Debug)]
pub struct MorphingCloudBehavior {
    pub quad_count: usize,
    pub start_scale: f32,
    pub peak_scale: f32,
    pub end_scale: f32,
    pub peak_at: f32,
    pub fade_in: f32,
    pub fade_out: f32,
    pub damping: f32,
    next_quad: usize,
}

impl MorphingCloudBehavior {
    pub fn new(quad_count: usize) -> Self {
        MorphingCloudBehavior {
            quad_count,
            start_scale: 0.5,
            peak_scale: 1.2,
            end_scale: 0.3,
            peak_at: 0.4,
            fade_in: 0.2,
            fade_out: 0.3,
            damping: 0.5,
            next_quad: 0,
        }
    }

    /// Set the size curve. Checked by `validate`, not clamped.
    pub fn with_scales(mut self, start: f32, peak: f32, end: f32, peak_at: f32) -> Self {
        self.start_scale = start;
        self.peak_scale = peak;
        self.end_scale = end;
        self.peak_at = peak_at;
        self
    }

    /// Set the fade-in and fade-out fractions of life.
    pub fn with_fades(mut self, fade_in: f32, fade_out: f32) -> Self {
        self.fade_in = fade_in;
        self.fade_out = fade_out;
        self
    }

    /// Set the per-second speed retention factor.
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// Size multiplier at normalised age `t`.
    pub fn scale_at(&self, t: f32) -> f32 {
        if t < self.peak_at {
            let k = t / self.peak_at;
            self.start_scale + (self.peak_scale - self.start_scale) * k
        } else if self.peak_at >= 1.0 {
            self.peak_scale
        } else {
            let k = (t - self.peak_at) / (1.0 - self.peak_at);
            self.peak_scale + (self.end_scale - self.peak_scale) * k
        }
    }

    /// Opacity at normalised age `t`.
    pub fn opacity_at(&self, t: f32) -> f32 {
        let mut opacity: f32 = 1.0;
        if self.fade_in > 0.0 {
            opacity = opacity.min(t / self.fade_in);
        }
        if self.fade_out > 0.0 {
            opacity = opacity.min((1.0 - t) / self.fade_out);
        }
        opacity.clamp(0.0, 1.0)
    }
}

impl ParticleBehavior for MorphingCloudBehavior {
    fn validate(&self) -> Result<()> {
        let scales = [self.start_scale, self.peak_scale, self.end_scale];
        if scales.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(PhysicsError::InvalidConfig("cloud scales must be finite and non-negative"));
        }
        let fractions = [self.peak_at, self.fade_in, self.fade_out, self.damping];
        if fractions.iter().any(|f| !(0.0..=1.0).contains(f)) {
            return Err(PhysicsError::InvalidConfig("cloud peak, fades and damping must be in [0, 1]"));
        }
        Ok(())
    }

    fn init_particle(&mut self, ctx: &EmitterContext<'_>, particle: &mut Particle, rng: &mut SmallRng) -> usize {
        base_init_particle(ctx, particle, rng);
        particle.width = particle.size * self.start_scale;
        particle.height = particle.size * self.start_scale;
        particle.alpha = self.opacity_at(0.0);

        let quad = if self.quad_count == 0 { 0 } else { self.next_quad % self.quad_count };
        self.next_quad = self.next_quad.wrapping_add(1);
        quad
    }

    fn update_particle(&mut self, ctx: &EmitterContext<'_>, particle: &mut Particle, _index: usize, delta: f32) {
        if !base_age_particle(particle, delta) {
            return;
        }
        self.update_particle_location(ctx, particle, delta);
        particle.speed *= libm::powf(self.damping, delta);

        let t = particle.normalized_age();
        let scale = self.scale_at(t);
        particle.width = particle.size * scale;
        particle.height = particle.size * scale;
        particle.alpha = self.opacity_at(t);
    }
}
