//! Scroll speed and the obstacle spawn interval that follows it

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Shared scroll rate for every moving entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Current scroll speed (px/s). Never decreases within a run.
    pub speed: f32,
    base_speed: f32,
}

impl Difficulty {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            speed: tuning.base_speed,
            base_speed: tuning.base_speed,
        }
    }

    /// Horizontal distance everything scrolls this tick
    pub fn scroll(&self, dt: f32) -> f32 {
        self.speed * dt
    }

    /// Seconds between obstacle spawns, inversely proportional to speed
    pub fn obstacle_interval(&self, tuning: &Tuning) -> f32 {
        if self.speed <= 0.0 {
            return tuning.base_obstacle_interval;
        }
        tuning.base_obstacle_interval * self.base_speed / self.speed
    }

    /// React to the score reaching `score`. Speeds up on every threshold-th point.
    pub fn on_point_scored(&mut self, score: u32, tuning: &Tuning) -> bool {
        let threshold = tuning.speed_increase_threshold;
        if threshold == 0 || score == 0 || score % threshold != 0 {
            return false;
        }
        self.speed += tuning.speed_increment.max(0.0);
        log::debug!("Score {} - speed now {:.0}", score, self.speed);
        true
    }

    pub fn rescale(&mut self, sx: f32) {
        self.speed *= sx;
        self.base_speed *= sx;
    }
}
