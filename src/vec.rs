//! 2D vector value type used by every simulated entity.

use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// 2D vector for planar physics (ropes, particles, camera).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Create a new 2D vector.
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    /// Unit vector pointing along `angle` (radians, counter-clockwise from +X).
    pub fn from_angle(angle: f32) -> Self {
        Vec2::new(libm::cosf(angle), libm::sinf(angle))
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product (returns scalar): self.x * other.y - self.y * other.x
    pub fn cross(self, other: Self) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Perpendicular vector (rotated 90 degrees counter-clockwise).
    pub fn perp(self) -> Self {
        Vec2::new(-self.y, self.x)
    }

    /// Squared length (avoids sqrt).
    pub fn length_sq(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        libm::sqrtf(self.length_sq())
    }

    /// Normalize to unit length. Returns zero vector if length is near zero.
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len < 1e-10 {
            Vec2::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    pub fn distance_sq(self, other: Self) -> f32 {
        (self - other).length_sq()
    }

    /// Linear interpolation: self + (other - self) * t
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    /// Rotate counter-clockwise around the origin.
    pub fn rotate(self, angle: f32) -> Self {
        let (sin, cos) = (libm::sinf(angle), libm::cosf(angle));
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Rotate counter-clockwise around `pivot`.
    pub fn rotate_around(self, pivot: Self, angle: f32) -> Self {
        pivot + (self - pivot).rotate(angle)
    }

    /// Angle of this vector in radians, in (-pi, pi].
    pub fn angle(self) -> f32 {
        libm::atan2f(self.y, self.x)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self { Vec2::new(self.x + rhs.x, self.y + rhs.y) }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self { Vec2::new(self.x - rhs.x, self.y - rhs.y) }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self { Vec2::new(-self.x, -self.y) }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, s: f32) -> Self { Vec2::new(self.x * s, self.y * s) }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}
