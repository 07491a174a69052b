use approx::assert_abs_diff_eq;
use cordage::{
    Color, DefaultBehavior, EmitterConfig, InterpolationConfig, MorphingCloudBehavior, ParticleEmitter, PhysicsError,
    RotatingBehavior, StepObserver, Vec2,
};

#[derive(Default)]
struct Counter {
    spawned: usize,
    expired: usize,
    dropped: usize,
}

impl StepObserver for Counter {
    fn on_particle_spawned(&mut self, _index: usize) {
        self.spawned += 1;
    }
    fn on_particle_expired(&mut self, _index: usize) {
        self.expired += 1;
    }
    fn on_emission_dropped(&mut self) {
        self.dropped += 1;
    }
}

#[test]
fn life_counts_down_and_particle_expires() {
    let config = EmitterConfig::new(4).with_life(1.0, 0.0);
    let mut emitter = ParticleEmitter::with_default_behavior(config).unwrap();
    assert_eq!(emitter.burst(1), 1);

    emitter.update(0.25);
    assert_abs_diff_eq!(emitter.particles()[0].life, 0.75, epsilon = 1e-6);
    emitter.prepare_draw(1.0, &InterpolationConfig::default());
    assert_eq!(emitter.sprites().count(), 1);

    let mut counter = Counter::default();
    emitter.update_observed(0.75, &mut counter);
    assert_eq!(counter.expired, 1);
    assert_eq!(emitter.particle_count(), 0);
    assert_eq!(emitter.sprites().count(), 0);
}

#[test]
fn emission_is_frame_rate_independent() {
    let config = EmitterConfig::new(200).with_life(10.0, 0.0).with_emission_rate(50.0);

    let mut fine = ParticleEmitter::with_default_behavior(config.clone()).unwrap();
    for _ in 0..10 {
        fine.update(0.1);
    }
    let mut coarse = ParticleEmitter::with_default_behavior(config).unwrap();
    coarse.update(1.0);

    let (a, b) = (fine.particle_count() as i64, coarse.particle_count() as i64);
    assert!((a - b).abs() <= 1, "fine {} vs coarse {}", a, b);
    assert_eq!(b, 50);
}

#[test]
fn finite_duration_emission_is_frame_rate_independent() {
    let config = EmitterConfig::new(1000)
        .with_life(10.0, 0.0)
        .with_emission_rate(10.0)
        .with_duration(0.5);

    let mut fine = ParticleEmitter::with_default_behavior(config.clone()).unwrap();
    let mut fine_count = Counter::default();
    for _ in 0..10 {
        fine.update_observed(0.1, &mut fine_count);
    }
    let mut coarse = ParticleEmitter::with_default_behavior(config).unwrap();
    let mut coarse_count = Counter::default();
    coarse.update_observed(1.0, &mut coarse_count);

    let (a, b) = (fine_count.spawned as i64, coarse_count.spawned as i64);
    assert!((a - b).abs() <= 1, "fine {} vs coarse {}", a, b);
    assert_eq!(b, 5);
    assert!(!coarse.is_active());
}

#[test]
fn fractional_emissions_carry_over() {
    let config = EmitterConfig::new(16).with_life(10.0, 0.0).with_emission_rate(3.0);
    let mut emitter = ParticleEmitter::with_default_behavior(config).unwrap();
    emitter.update(0.1);
    assert_eq!(emitter.particle_count(), 0);
    for _ in 0..9 {
        emitter.update(0.1);
    }
    assert!((2..=3).contains(&emitter.particle_count()));
}

#[test]
fn full_pool_drops_emissions() {
    let config = EmitterConfig::new(5).with_life(10.0, 0.0).with_emission_rate(100.0);
    let mut emitter = ParticleEmitter::with_default_behavior(config).unwrap();
    let mut counter = Counter::default();

    assert_eq!(emitter.burst_observed(8, &mut counter), 5);
    assert_eq!(counter.spawned, 5);
    assert_eq!(counter.dropped, 3);

    emitter.update_observed(0.1, &mut counter);
    assert_eq!(emitter.particle_count(), 5);
    assert_eq!(counter.dropped, 13);
}

#[test]
fn removal_keeps_drawer_arrays_aligned() {
    let config = EmitterConfig::new(8).with_life(5.0, 1.0).with_speed(10.0, 5.0).with_angle(0.0, 3.0);
    let mut emitter = ParticleEmitter::new(config, RotatingBehavior::new(4, 0.0)).unwrap().with_seed(7);
    emitter.burst(6);
    emitter.update(0.1);

    let last = emitter.particles()[5].clone();
    let last_quad = emitter.pool().quads()[5];

    emitter.remove_particle(1).unwrap();
    emitter.prepare_draw(1.0, &InterpolationConfig::default());

    let pool = emitter.pool();
    assert_eq!(pool.len(), 5);
    assert_eq!(pool.quads().len(), 5);
    assert_eq!(pool.rotation_angles().len(), 5);
    assert_eq!(pool.rotation_positions().len(), 5);
    assert_eq!(pool.particles()[1], last);
    assert_eq!(pool.quads()[1], last_quad);
    for (i, particle) in pool.particles().iter().enumerate() {
        assert_eq!(pool.rotation_angles()[i], particle.angle);
        assert_eq!(pool.rotation_positions()[i], particle.position);
    }

    assert!(emitter.remove_particle(5).is_err());
}

#[test]
fn duration_stops_emission_then_finishes() {
    let config = EmitterConfig::new(64).with_life(0.2, 0.0).with_emission_rate(10.0).with_duration(0.5);
    let mut emitter = ParticleEmitter::with_default_behavior(config).unwrap();
    for _ in 0..6 {
        emitter.update(0.1);
    }
    assert!(!emitter.is_active());

    for _ in 0..5 {
        emitter.update(0.1);
    }
    assert_eq!(emitter.particle_count(), 0);
    assert!(emitter.is_finished());

    emitter.reset();
    assert!(emitter.is_active());
    assert_eq!(emitter.elapsed(), 0.0);
}

#[test]
fn infinite_duration_keeps_emitting() {
    let config = EmitterConfig::new(1000).with_life(0.5, 0.0).with_emission_rate(20.0);
    let mut emitter = ParticleEmitter::with_default_behavior(config).unwrap();
    for _ in 0..600 {
        emitter.update(1.0 / 60.0);
    }
    assert!(emitter.is_active());
    assert!(emitter.particle_count() > 0);
}

#[test]
fn stop_lets_live_particles_age_out() {
    let config = EmitterConfig::new(64).with_life(0.3, 0.0).with_emission_rate(30.0);
    let mut emitter = ParticleEmitter::with_default_behavior(config).unwrap();
    emitter.update(0.2);
    let live = emitter.particle_count();
    assert!(live > 0);

    emitter.stop();
    emitter.update(0.1);
    assert!(emitter.particle_count() <= live);
    emitter.update(0.5);
    assert!(emitter.is_finished());
}

#[test]
fn gravity_bends_trajectory_and_interpolates() {
    let config = EmitterConfig::new(4).with_life(10.0, 0.0).with_gravity(Vec2::new(0.0, -10.0));
    let mut emitter = ParticleEmitter::with_default_behavior(config)
        .unwrap()
        .with_origin(Vec2::new(0.0, 0.0));
    emitter.burst(1);
    emitter.update(0.1);

    let particle = &emitter.particles()[0];
    assert_abs_diff_eq!(particle.position.y, -0.1, epsilon = 1e-5);
    assert_eq!(particle.previous_position, Vec2::ZERO);

    emitter.prepare_draw(0.5, &InterpolationConfig::default());
    let sprite = emitter.sprites().next().unwrap();
    assert_abs_diff_eq!(sprite.position.y, -0.05, epsilon = 1e-5);
}

#[test]
fn rotating_effect_spins_and_fades() {
    let config = EmitterConfig::new(4).with_life(1.0, 0.0).with_spin(2.0, 0.0);
    let mut emitter = ParticleEmitter::new(config, RotatingBehavior::new(3, 0.5)).unwrap();
    emitter.burst(1);
    let start_angle = emitter.particles()[0].angle;
    assert!(emitter.pool().quads()[0] < 3);

    emitter.update(0.5);
    let particle = &emitter.particles()[0];
    assert_abs_diff_eq!(particle.angle, start_angle + 1.0, epsilon = 1e-5);

    emitter.prepare_draw(0.5, &InterpolationConfig::default());
    assert_abs_diff_eq!(emitter.pool().rotation_angles()[0], start_angle + 0.5, epsilon = 1e-5);

    emitter.update(0.25);
    assert_abs_diff_eq!(emitter.particles()[0].alpha, 0.5, epsilon = 1e-5);
}

#[test]
fn cloud_effect_round_robins_quads_and_scales() {
    let config = EmitterConfig::new(8).with_life(2.0, 0.0).with_size(4.0, 0.0).with_speed(10.0, 0.0);
    let cloud = MorphingCloudBehavior::new(3).with_scales(0.5, 1.0, 0.25, 0.5);
    let mut emitter = ParticleEmitter::new(config, cloud).unwrap();
    emitter.burst(6);

    assert_eq!(emitter.pool().quads(), &[0, 1, 2, 0, 1, 2]);
    assert_abs_diff_eq!(emitter.particles()[0].width, 2.0, epsilon = 1e-6);

    // Half way to the peak.
    emitter.update(0.5);
    let particle = &emitter.particles()[0];
    assert_abs_diff_eq!(particle.width, 4.0 * 0.75, epsilon = 1e-4);
    assert!(particle.speed < 10.0, "cloud puffs slow down, speed = {}", particle.speed);
}

#[test]
fn cloud_damping_applies_after_the_move() {
    let config = EmitterConfig::new(2).with_life(10.0, 0.0).with_speed(10.0, 0.0);

    let mut base = ParticleEmitter::new(config.clone(), DefaultBehavior).unwrap();
    base.burst(1);
    base.update(1.0);

    let cloud = MorphingCloudBehavior::new(1).with_damping(0.5);
    let mut clouds = ParticleEmitter::new(config, cloud).unwrap();
    clouds.burst(1);
    clouds.update(1.0);

    let (b, c) = (&base.particles()[0], &clouds.particles()[0]);
    assert_abs_diff_eq!(b.position.x, 10.0, epsilon = 1e-4);
    assert_abs_diff_eq!(c.position.x, b.position.x, epsilon = 1e-4);
    // The slowdown shows up from the next tick on.
    assert_abs_diff_eq!(c.speed, 5.0, epsilon = 1e-4);
}

#[test]
fn out_of_range_cloud_rejected_at_construction() {
    let cloud = MorphingCloudBehavior::new(2).with_scales(0.5, 1.0, 0.2, 1.5);
    assert!(matches!(
        ParticleEmitter::new(EmitterConfig::new(4), cloud),
        Err(PhysicsError::InvalidConfig(_))
    ));
}

#[test]
fn sprite_color_blends_toward_end_color() {
    let start = Color::new(1.0, 0.0, 0.0, 1.0);
    let end = Color::new(0.0, 0.0, 1.0, 0.0);
    let config = EmitterConfig::new(2).with_life(1.0, 0.0).with_colors(start, end);
    let mut emitter = ParticleEmitter::with_default_behavior(config).unwrap();
    emitter.burst(1);
    emitter.update(0.5);
    emitter.prepare_draw(1.0, &InterpolationConfig::default());

    let sprite = emitter.sprites().next().unwrap();
    assert_abs_diff_eq!(sprite.color.r, 0.5, epsilon = 1e-5);
    assert_abs_diff_eq!(sprite.color.b, 0.5, epsilon = 1e-5);
    assert_abs_diff_eq!(sprite.color.a, 0.5, epsilon = 1e-5);
}

#[test]
fn zero_capacity_rejected() {
    assert!(ParticleEmitter::with_default_behavior(EmitterConfig::new(0)).is_err());
}
