//! Critically damped follow camera with interpolated view position.

use core::f32::consts::TAU;

use crate::config::InterpolationConfig;
use crate::interpolate::Interpolated;
use crate::vec::Vec2;

/// 2D camera that chases a target with a closed-form critically damped
/// spring, so the motion does not depend on the step length.
#[derive(Clone, Debug)]
pub struct Camera2D {
    position: Vec2,
    previous_position: Vec2,
    velocity: Vec2,
    target: Vec2,
    angular_freq: f32,
}

impl Camera2D {
    pub fn new(position: Vec2, frequency_hz: f32) -> Self {
        Camera2D {
            position,
            previous_position: position,
            velocity: Vec2::ZERO,
            target: position,
            angular_freq: TAU * frequency_hz,
        }
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    pub fn target(&self) -> Vec2 { self.target }
    pub fn position(&self) -> Vec2 { self.position }
    pub fn velocity(&self) -> Vec2 { self.velocity }

    /// One logical step toward the target.
    pub fn update(&mut self, delta: f32) {
        self.previous_position = self.position;

        let x0 = self.position - self.target;
        let v0 = self.velocity;
        let w = self.angular_freq;
        let exp_term = libm::expf(-w * delta);
        let c2 = v0 + x0 * w;

        self.position = self.target + (x0 + c2 * delta) * exp_term;
        self.velocity = (v0 - c2 * (w * delta)) * exp_term;
    }

    /// Jump to `position` with no blending from the old view.
    pub fn snap_to(&mut self, position: Vec2) {
        self.position = position;
        self.previous_position = position;
        self.target = position;
        self.velocity = Vec2::ZERO;
    }

    pub fn is_settled(&self, eps_pos: f32, eps_vel: f32) -> bool {
        (self.position - self.target).length_sq() < eps_pos * eps_pos
            && self.velocity.length_sq() < eps_vel * eps_vel
    }

    /// Where to draw the view for this display frame.
    pub fn view_position(&self, alpha: f32, config: &InterpolationConfig) -> Vec2 {
        self.draw_position(alpha, config)
    }
}

impl Interpolated for Camera2D {
    fn current_position(&self) -> Vec2 { self.position }
    fn previous_position(&self) -> Vec2 { self.previous_position }
}
