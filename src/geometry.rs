//! 3-D vector math for visibility and separation checks.
//!
//! Just enough geometry for the verifier: dot products, normalization,
//! and angles between directions. Angles are in degrees throughout,
//! matching the constraint thresholds.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point or direction in 3-D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn norm(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    /// Unit vector in this direction. Undefined for zero-length vectors;
    /// callers guarantee a nonzero input.
    pub fn unit(&self) -> Vector3 {
        self.scale(1.0 / self.norm())
    }

    pub fn scale(&self, factor: f64) -> Vector3 {
        Vector3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Angle in degrees between this direction and `other`.
    ///
    /// The cosine is clamped to [-1, 1] before `acos` so rounding on
    /// nearly-parallel unit vectors cannot push it out of domain.
    pub fn angle_deg(&self, other: Vector3) -> f64 {
        let cos = self.unit().dot(other.unit()).clamp(-1.0, 1.0);
        cos.acos().to_degrees()
    }

    /// Angle in degrees subtended at `self` between points `a` and `b`.
    pub fn angle_between(&self, a: Vector3, b: Vector3) -> f64 {
        (a - *self).angle_deg(b - *self)
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}
