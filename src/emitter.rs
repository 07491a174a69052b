//! Particle emitter: emission budget, pooled life cycle and the behaviour
//! hooks effects plug into.
//!
//! A particle goes Dead → Spawned → Aging → Dead. It spawns when the emitter
//! has budget and the pool a free slot, ages every tick, and is recycled in
//! the tick its life reaches zero.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::color::Color;
use crate::config::{EmitterConfig, InterpolationConfig};
use crate::error::Result;
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::particle::{Particle, ParticlePool, Sprite};
use crate::vec::Vec2;

const DEFAULT_SEED: u64 = 0x5eed_c0de;

/// Read-only emitter state handed to behaviour hooks.
#[derive(Copy, Clone, Debug)]
pub struct EmitterContext<'a> {
    pub config: &'a EmitterConfig,
    pub origin: Vec2,
    /// Seconds since the emitter started.
    pub elapsed: f32,
}

/// Per-effect particle rules.
///
/// Every hook has a default that applies the base rules; an effect overrides
/// only what it changes and can call the `base_*` functions before adjusting
/// derived fields.
pub trait ParticleBehavior {
    /// Reject effect parameters that are out of range.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Initialise a freshly spawned particle. Returns the atlas quad to draw
    /// it with.
    fn init_particle(&mut self, ctx: &EmitterContext<'_>, particle: &mut Particle, rng: &mut SmallRng) -> usize {
        base_init_particle(ctx, particle, rng);
        0
    }

    /// Advance one particle by `delta`.
    fn update_particle(&mut self, ctx: &EmitterContext<'_>, particle: &mut Particle, _index: usize, delta: f32) {
        if base_age_particle(particle, delta) {
            self.update_particle_location(ctx, particle, delta);
        }
    }

    /// Move one particle by `delta`.
    fn update_particle_location(&mut self, ctx: &EmitterContext<'_>, particle: &mut Particle, delta: f32) {
        base_update_particle_location(ctx, particle, delta);
    }
}

/// Base rules only.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultBehavior;

impl ParticleBehavior for DefaultBehavior {}

/// Uniform sample in `[-1, 1]`.
pub fn random_minus1_1(rng: &mut SmallRng) -> f32 {
    rng.gen::<f32>() * 2.0 - 1.0
}

fn vary_color(base: Color, var: Color, rng: &mut SmallRng) -> Color {
    Color::new(
        base.r + var.r * random_minus1_1(rng),
        base.g + var.g * random_minus1_1(rng),
        base.b + var.b * random_minus1_1(rng),
        base.a + var.a * random_minus1_1(rng),
    )
    .clamped()
}

/// Randomised spawn: position near the origin, direction `angle ± angle_var`,
/// `speed ± speed_var`, `life ± life_var`, `size ± size_var`, colour from
/// `start_color` fading to `end_color` over the particle's life.
pub fn base_init_particle(ctx: &EmitterContext<'_>, particle: &mut Particle, rng: &mut SmallRng) {
    let config = ctx.config;

    let offset = Vec2::new(
        config.position_var.x * random_minus1_1(rng),
        config.position_var.y * random_minus1_1(rng),
    );
    particle.position = ctx.origin + offset;
    particle.previous_position = particle.position;

    let direction = config.angle + config.angle_var * random_minus1_1(rng);
    particle.velocity_direction = Vec2::from_angle(direction);
    particle.speed = config.speed + config.speed_var * random_minus1_1(rng);

    particle.age = 0.0;
    particle.life = (config.life + config.life_var * random_minus1_1(rng)).max(0.0);

    particle.size = (config.size + config.size_var * random_minus1_1(rng)).max(0.0);
    particle.width = particle.size;
    particle.height = particle.size;

    let start = vary_color(config.start_color, config.start_color_var, rng);
    let end = vary_color(config.end_color, config.end_color_var, rng);
    particle.color = start;
    particle.delta_color = if particle.life > 0.0 {
        (end - start) * (1.0 / particle.life)
    } else {
        Color::TRANSPARENT
    };
    particle.alpha = 1.0;

    particle.angle = 0.0;
    particle.previous_angle = 0.0;
    particle.angular_velocity = 0.0;
}

/// Spend `delta` of the particle's life and advance its colour.
/// Returns whether it is still alive.
pub fn base_age_particle(particle: &mut Particle, delta: f32) -> bool {
    particle.life -= delta;
    particle.age += delta;
    if particle.life <= 0.0 {
        return false;
    }
    particle.color += particle.delta_color * delta;
    true
}

/// Snapshot the previous position and angle, fold gravity into the velocity,
/// then move along `velocity_direction * speed`.
pub fn base_update_particle_location(ctx: &EmitterContext<'_>, particle: &mut Particle, delta: f32) {
    particle.previous_position = particle.position;
    particle.previous_angle = particle.angle;

    let velocity = particle.velocity() + ctx.config.gravity * delta;
    let speed = velocity.length();
    if speed > 0.0 {
        particle.velocity_direction = velocity * (1.0 / speed);
    }
    particle.speed = speed;

    particle.position += velocity * delta;
    particle.angle += particle.angular_velocity * delta;
}

/// A particle emitter with pluggable per-effect behaviour.
pub struct ParticleEmitter<B: ParticleBehavior = DefaultBehavior> {
    config: EmitterConfig,
    behavior: B,
    pool: ParticlePool,
    origin: Vec2,
    rng: SmallRng,
    emit_counter: f32,
    elapsed: f32,
    active: bool,
}

impl ParticleEmitter<DefaultBehavior> {
    pub fn with_default_behavior(config: EmitterConfig) -> Result<Self> {
        Self::new(config, DefaultBehavior)
    }
}

impl<B: ParticleBehavior> ParticleEmitter<B> {
    pub fn new(config: EmitterConfig, behavior: B) -> Result<Self> {
        config.validate()?;
        behavior.validate()?;
        let pool = ParticlePool::new(config.total_particles)?;
        Ok(ParticleEmitter {
            config,
            behavior,
            pool,
            origin: Vec2::ZERO,
            rng: SmallRng::seed_from_u64(DEFAULT_SEED),
            emit_counter: 0.0,
            elapsed: 0.0,
            active: true,
        })
    }

    /// Reseed the emitter's random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn config(&self) -> &EmitterConfig { &self.config }
    pub fn behavior(&self) -> &B { &self.behavior }
    pub fn behavior_mut(&mut self) -> &mut B { &mut self.behavior }
    pub fn pool(&self) -> &ParticlePool { &self.pool }
    pub fn particles(&self) -> &[Particle] { self.pool.particles() }
    pub fn particle_count(&self) -> usize { self.pool.len() }
    pub fn capacity(&self) -> usize { self.pool.capacity() }
    pub fn origin(&self) -> Vec2 { self.origin }
    pub fn elapsed(&self) -> f32 { self.elapsed }
    pub fn is_active(&self) -> bool { self.active }

    /// Stopped and every particle has expired.
    pub fn is_finished(&self) -> bool {
        !self.active && self.pool.is_empty()
    }

    /// Moves where new particles spawn. Live particles are unaffected.
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    pub fn start(&mut self) {
        self.active = true;
    }

    /// Stop emitting; live particles keep ageing.
    pub fn stop(&mut self) {
        self.active = false;
        self.emit_counter = 0.0;
    }

    /// Kill every particle and restart emission from zero.
    pub fn reset(&mut self) {
        self.pool.clear();
        self.emit_counter = 0.0;
        self.elapsed = 0.0;
        self.active = true;
    }

    /// Spawn up to `count` particles at once. Returns how many fit.
    pub fn burst(&mut self, count: usize) -> usize {
        self.burst_observed(count, &mut NoOpStepObserver)
    }

    pub fn burst_observed<O: StepObserver>(&mut self, count: usize, observer: &mut O) -> usize {
        (0..count).filter(|_| self.spawn(observer)).count()
    }

    /// Remove the particle at `index` along with its drawer-side entries.
    pub fn remove_particle(&mut self, index: usize) -> Result<Particle> {
        self.pool.remove(index)
    }

    pub fn update(&mut self, delta: f32) {
        self.update_observed(delta, &mut NoOpStepObserver);
    }

    /// One logical tick: emit from the accumulated budget, then age every
    /// particle and recycle the ones that died.
    pub fn update_observed<O: StepObserver>(&mut self, delta: f32, observer: &mut O) {
        if self.active && self.config.emission_rate > 0.0 {
            // Only the part of the tick inside the emission window counts.
            let mut window = delta;
            if self.config.duration >= 0.0 {
                window = window.min((self.config.duration - self.elapsed).max(0.0));
            }
            // Fractional emissions carry over so the rate is independent of
            // the tick length.
            self.emit_counter += self.config.emission_rate * window;
            let due = libm::floorf(self.emit_counter);
            self.emit_counter -= due;
            for _ in 0..due as usize {
                self.spawn(observer);
            }
        }

        self.elapsed += delta;
        if self.active && self.config.duration >= 0.0 && self.elapsed >= self.config.duration {
            log::debug!("emitter finished its {:.3}s emission window", self.config.duration);
            self.stop();
        }

        let ctx = EmitterContext {
            config: &self.config,
            origin: self.origin,
            elapsed: self.elapsed,
        };
        let mut index = 0;
        while index < self.pool.len() {
            let particle = &mut self.pool.particles_mut()[index];
            self.behavior.update_particle(&ctx, particle, index, delta);
            if particle.is_alive() {
                index += 1;
            } else {
                observer.on_particle_expired(index);
                // The swapped-in particle lands at `index` and is updated next.
                if let Err(err) = self.pool.remove(index) {
                    log::warn!("failed to recycle expired particle: {}", err);
                    break;
                }
            }
        }
        observer.on_step_complete();
    }

    /// Refresh the drawer-side caches for this display frame.
    pub fn prepare_draw(&mut self, alpha: f32, config: &InterpolationConfig) {
        self.pool.refresh_draw_cache(alpha, config);
    }

    /// Live particles as drawn at the last [`prepare_draw`](Self::prepare_draw).
    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        self.pool.sprites()
    }

    fn spawn<O: StepObserver>(&mut self, observer: &mut O) -> bool {
        if self.pool.is_full() {
            log::trace!("particle pool full ({}), emission dropped", self.pool.capacity());
            observer.on_emission_dropped();
            return false;
        }
        let ctx = EmitterContext {
            config: &self.config,
            origin: self.origin,
            elapsed: self.elapsed,
        };
        let mut particle = Particle::default();
        let quad = self.behavior.init_particle(&ctx, &mut particle, &mut self.rng);
        match self.pool.push(particle, quad) {
            Some(index) => {
                observer.on_particle_spawned(index);
                true
            }
            None => false,
        }
    }
}
