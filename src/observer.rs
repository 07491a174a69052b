//! Step observer trait for monitoring simulation progress.

/// Trait for observing simulation steps.
///
/// Implement this trait to monitor solver and emitter progress (e.g., for
/// debugging, visualization, or performance profiling). All methods have
/// default no-op implementations.
pub trait StepObserver {
    /// Called after every point has been integrated (Verlet step).
    fn on_integrate(&mut self) {}

    /// Called after each relaxation pass.
    fn on_relaxation_pass(&mut self, _iteration: usize) {}

    /// Called when a simulation step is fully complete.
    fn on_step_complete(&mut self) {}

    /// Called when a particle leaves the dead state.
    fn on_particle_spawned(&mut self, _index: usize) {}

    /// Called when a particle runs out of life, before its slot is recycled.
    fn on_particle_expired(&mut self, _index: usize) {}

    /// Called when an emission is lost because the pool is full.
    fn on_emission_dropped(&mut self) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
