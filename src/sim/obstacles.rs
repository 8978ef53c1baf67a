//! Obstacle generation and the straight-line difficulty stage
//!
//! Each spawn draws a gap position and emits one obstacle pair at the right
//! edge. Periodically the gap is frozen for a run of consecutive spawns
//! (the straight-line stage) to vary pacing.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Obstacle, SafeGap};
use crate::tuning::Tuning;

/// Straight-line stage bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StraightLineStage {
    pub active: bool,
    /// Obstacles emitted since the stage started
    pub counter: u32,
    /// Gap top held for the whole stage
    pub gap_top: f32,
    /// Score the current or last stage triggered at
    pub triggered_at: Option<u32>,
}

impl StraightLineStage {
    /// Whether a stage should begin at this score
    pub fn should_trigger(&self, score: u32, tuning: &Tuning) -> bool {
        !self.active
            && tuning.stage_duration > 0
            && tuning.stage_milestone > 0
            && score >= tuning.stage_start_score
            && score % tuning.stage_milestone == 0
            && self.triggered_at != Some(score)
    }

    /// Spawns left before the stage ends
    pub fn remaining(&self, tuning: &Tuning) -> u32 {
        if self.active {
            tuning.stage_duration.saturating_sub(self.counter)
        } else {
            0
        }
    }
}

/// Stage transitions reported alongside a spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageChange {
    Started { gap_top: f32 },
    Ended,
}

/// Output of one spawn
#[derive(Debug, Clone)]
pub struct Spawned {
    pub obstacle: Obstacle,
    /// Gap handed to the collectible spawner
    pub gap: SafeGap,
    pub stage_changes: Vec<StageChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObstacleGenerator {
    /// Seconds since the last spawn
    pub spawn_timer: f32,
    pub stage: StraightLineStage,
}

/// Inclusive range for the gap top in normal play
pub fn gap_range(tuning: &Tuning) -> (f32, f32) {
    let lo = tuning.pipe_min;
    let hi = tuning.viewport.height - tuning.pipe_min - tuning.gap_size - tuning.ground_height;
    (lo, hi.max(lo))
}

/// Narrower range used to pick the frozen stage gap
pub fn stage_gap_range(tuning: &Tuning) -> (f32, f32) {
    let (lo, hi) = gap_range(tuning);
    let (s_lo, s_hi) = (lo + tuning.stage_inset, hi - tuning.stage_inset);
    if s_hi >= s_lo { (s_lo, s_hi) } else { (lo, hi) }
}

fn sample<R: Rng>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

impl ObstacleGenerator {
    /// Advance the spawn timer; true when the speed-scaled interval has elapsed
    pub fn advance_timer(&mut self, dt: f32, interval: f32) -> bool {
        self.spawn_timer += dt;
        if self.spawn_timer < interval {
            return false;
        }
        self.spawn_timer = 0.0;
        true
    }

    /// Draw a gap and build the obstacle pair at the right edge
    pub fn generate<R: Rng>(
        &mut self,
        score: u32,
        id: u32,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Spawned {
        let mut stage_changes = Vec::new();

        if self.stage.should_trigger(score, tuning) {
            self.stage.active = true;
            self.stage.counter = 0;
            self.stage.gap_top = sample(rng, stage_gap_range(tuning));
            self.stage.triggered_at = Some(score);
            log::debug!(
                "Straight-line stage at score {} (gap top {:.0})",
                score,
                self.stage.gap_top
            );
            stage_changes.push(StageChange::Started {
                gap_top: self.stage.gap_top,
            });
        }

        let gap_top = if self.stage.active {
            self.stage.counter += 1;
            if self.stage.counter >= tuning.stage_duration {
                self.stage.active = false;
                self.stage.counter = 0;
                log::debug!("Straight-line stage over");
                stage_changes.push(StageChange::Ended);
            }
            self.stage.gap_top
        } else {
            sample(rng, gap_range(tuning))
        };

        let gap_bottom = gap_top + tuning.gap_size;
        let obstacle = Obstacle {
            id,
            x: tuning.viewport.width,
            width: tuning.pipe_width,
            gap_top,
            gap_bottom,
            floor_y: tuning.ground_y(),
            passed: false,
        };

        // Bottom edge extends through the ground strip
        let gap = SafeGap {
            top: gap_top,
            bottom: gap_bottom + tuning.ground_height,
        };

        Spawned {
            obstacle,
            gap,
            stage_changes,
        }
    }

    pub fn rescale(&mut self, sy: f32) {
        self.stage.gap_top *= sy;
    }
}
