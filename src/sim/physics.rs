//! Gravity integration for the player body

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A body that falls under gravity. Screen coordinates: +y is down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    /// Vertical velocity (px/s, positive = falling)
    pub vel_y: f32,
}

impl Body {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, vel_y: 0.0 }
    }

    /// Semi-implicit Euler: velocity first, then position with the new velocity
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        self.vel_y += gravity * dt;
        self.pos.y += self.vel_y * dt;
    }

    /// Replace the vertical velocity with an upward impulse.
    ///
    /// No accumulation: whatever the body was doing, it now moves up at
    /// exactly `impulse`.
    pub fn jump(&mut self, impulse: f32) {
        self.vel_y = -impulse.abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_exact_step() {
        let mut body = Body::new(Vec2::new(100.0, 300.0));
        body.vel_y = 20.0;
        body.integrate(800.0, 0.5);
        assert_eq!(body.vel_y, 20.0 + 800.0 * 0.5);
        assert_eq!(body.pos.y, 300.0 + 420.0 * 0.5);
        assert_eq!(body.pos.x, 100.0);
    }

    #[test]
    fn test_falls_monotonically_for_one_second() {
        let mut body = Body::new(Vec2::new(0.0, 300.0));
        let mut last_y = body.pos.y;
        for _ in 0..60 {
            body.integrate(800.0, 1.0 / 60.0);
            assert!(body.pos.y > last_y);
            last_y = body.pos.y;
        }
    }

    #[test]
    fn test_jump_overrides_velocity() {
        let mut falling = Body::new(Vec2::ZERO);
        falling.vel_y = 500.0;
        falling.jump(220.0);
        assert_eq!(falling.vel_y, -220.0);

        let mut rising = Body::new(Vec2::ZERO);
        rising.vel_y = -900.0;
        rising.jump(220.0);
        assert_eq!(rising.vel_y, -220.0);

        // Double jump doesn't stack
        rising.jump(220.0);
        assert_eq!(rising.vel_y, -220.0);
    }
}
