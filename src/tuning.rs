//! Game balance and playfield-relative constants
//!
//! Defaults are authored against the 800x600 reference playfield and are
//! rescaled to the real viewport with [`Tuning::scaled_to`].

use serde::{Deserialize, Serialize};

use crate::consts::{REFERENCE_HEIGHT, REFERENCE_WIDTH};
use crate::viewport_scale;

/// Playfield dimensions supplied by the viewport collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: REFERENCE_WIDTH,
            height: REFERENCE_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// All gameplay constants. Distances are in playfield pixels, times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Playfield these values are expressed in
    pub viewport: Viewport,

    // === Player ===
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Upward speed set by a jump (px/s, positive number)
    pub jump_impulse: f32,
    /// Player x as a fraction of playfield width
    pub player_x_fraction: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Death line above the top edge (negative = off-screen)
    pub ceiling_y: f32,
    /// Player opacity while the phase effect is active
    pub ghost_opacity: f32,

    // === Obstacles ===
    pub gap_size: f32,
    pub pipe_min: f32,
    pub pipe_width: f32,
    pub ground_height: f32,
    /// Spawn interval at base speed
    pub base_obstacle_interval: f32,
    /// Extra inset applied to the gap range during the straight-line stage
    pub stage_inset: f32,
    pub stage_start_score: u32,
    pub stage_milestone: u32,
    pub stage_duration: u32,

    // === Speed ===
    pub base_speed: f32,
    pub speed_increment: f32,
    pub speed_increase_threshold: u32,

    // === Collectibles ===
    pub coin_interval: f32,
    pub boost_interval: f32,
    pub boost_chance: f64,
    pub phase_interval: f32,
    pub phase_chance: f64,
    /// Delay between a spawner firing and the item being placed
    pub spawn_delay: f32,
    pub coin_margin: f32,
    pub item_margin: f32,
    /// Distance past the right edge where coins appear
    pub coin_spawn_offset: f32,
    /// Distance past the right edge where power-up items appear
    pub item_spawn_offset: f32,
    /// Fallback band is [margin, height - margin] when no gap is known
    pub fallback_band_margin: f32,
    pub coin_size: f32,
    pub boost_size: f32,
    pub phase_size: f32,

    // === Effects ===
    pub effect_duration: f32,

    // === Start scene ===
    pub bob_speed: f32,
    pub bob_low: f32,
    pub bob_high: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),

            gravity: 800.0,
            jump_impulse: 220.0,
            player_x_fraction: 0.25,
            player_width: 68.0,
            player_height: 48.0,
            ceiling_y: -100.0,
            ghost_opacity: 0.6,

            gap_size: 150.0,
            pipe_min: 80.0,
            pipe_width: 104.0,
            ground_height: 100.0,
            base_obstacle_interval: 1.5,
            stage_inset: 50.0,
            stage_start_score: 4,
            stage_milestone: 10,
            stage_duration: 5,

            base_speed: 240.0,
            speed_increment: 100.0,
            speed_increase_threshold: 2,

            coin_interval: 2.2,
            boost_interval: 5.0,
            boost_chance: 0.5,
            phase_interval: 6.0,
            phase_chance: 0.4,
            spawn_delay: 0.1,
            coin_margin: 40.0,
            item_margin: 50.0,
            coin_spawn_offset: 100.0,
            item_spawn_offset: 150.0,
            fallback_band_margin: 200.0,
            coin_size: 40.0,
            boost_size: 44.0,
            phase_size: 56.0,

            effect_duration: 5.0,

            bob_speed: 30.0,
            bob_low: 30.0,
            bob_high: 70.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; absent fields keep their defaults.
    ///
    /// Distances in the file are read against the 800x600 reference
    /// playfield and rescaled to the file's `viewport`. Fails if the
    /// resulting playfield cannot fit two obstacle segments and a gap.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut reference: Self = serde_json::from_str(json)?;
        let viewport = reference.viewport;
        reference.viewport = Viewport::default();
        let tuning = reference.scaled_to(viewport);
        tuning
            .check_playfield()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        log::info!(
            "Loaded tuning for {}x{} playfield",
            tuning.viewport.width,
            tuning.viewport.height
        );
        Ok(tuning)
    }

    /// Serialize with distances expressed against the reference playfield,
    /// the form [`Tuning::from_json`] reads back
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        let mut reference = self.scaled_to(Viewport::default());
        reference.viewport = self.viewport;
        serde_json::to_string_pretty(&reference)
    }

    /// Obstacle geometry must fit between the top edge and the ground
    fn check_playfield(&self) -> Result<(), String> {
        let Viewport { width, height } = self.viewport;
        if !(width > 0.0 && height > 0.0) {
            return Err(format!("viewport {}x{} is not positive", width, height));
        }
        let slack = height - 2.0 * self.pipe_min - self.gap_size - self.ground_height;
        if slack < 0.0 {
            return Err(format!(
                "playfield height {} leaves no room for the gap (short by {})",
                height, -slack
            ));
        }
        Ok(())
    }

    /// Rescale every distance-based constant to a new playfield.
    ///
    /// Horizontal quantities follow the width ratio, vertical quantities the
    /// height ratio. Times, counts and probabilities are left alone.
    pub fn scaled_to(&self, viewport: Viewport) -> Self {
        let from = viewport_scale(self.viewport.width, self.viewport.height);
        let to = viewport_scale(viewport.width, viewport.height);
        let sx = if from.x > 0.0 { to.x / from.x } else { 1.0 };
        let sy = if from.y > 0.0 { to.y / from.y } else { 1.0 };

        Self {
            viewport,

            gravity: self.gravity * sy,
            jump_impulse: self.jump_impulse * sy,
            player_width: self.player_width * sx,
            player_height: self.player_height * sy,
            ceiling_y: self.ceiling_y * sy,

            gap_size: self.gap_size * sy,
            pipe_min: self.pipe_min * sy,
            pipe_width: self.pipe_width * sx,
            ground_height: self.ground_height * sy,
            stage_inset: self.stage_inset * sy,

            base_speed: self.base_speed * sx,
            speed_increment: self.speed_increment * sx,

            coin_margin: self.coin_margin * sy,
            item_margin: self.item_margin * sy,
            coin_spawn_offset: self.coin_spawn_offset * sx,
            item_spawn_offset: self.item_spawn_offset * sx,
            fallback_band_margin: self.fallback_band_margin * sy,
            coin_size: self.coin_size * sy,
            boost_size: self.boost_size * sy,
            phase_size: self.phase_size * sy,

            bob_speed: self.bob_speed * sy,
            bob_low: self.bob_low * sy,
            bob_high: self.bob_high * sy,

            ..self.clone()
        }
    }

    /// Tuning for a viewport, starting from the reference defaults
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self::default().scaled_to(viewport)
    }

    /// Y of the ground line (top of the ground strip)
    pub fn ground_y(&self) -> f32 {
        self.viewport.height - self.ground_height
    }

    pub fn player_x(&self) -> f32 {
        self.viewport.width * self.player_x_fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ObstacleGenerator;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_default_matches_reference_playfield() {
        let t = Tuning::default();
        assert_eq!(t.viewport, Viewport::new(800.0, 600.0));
        assert_eq!(t.ground_y(), 500.0);
        assert_eq!(t.player_x(), 200.0);
    }

    #[test]
    fn test_scaled_to_rescales_distances() {
        let t = Tuning::for_viewport(Viewport::new(400.0, 1200.0));
        assert!((t.base_speed - 120.0).abs() < 1e-4);
        assert!((t.gap_size - 300.0).abs() < 1e-4);
        assert!((t.gravity - 1600.0).abs() < 1e-3);
        // Times and probabilities unchanged
        assert_eq!(t.coin_interval, 2.2);
        assert_eq!(t.boost_chance, 0.5);
        assert_eq!(t.stage_duration, 5);
    }

    #[test]
    fn test_scaled_round_trip_restores_values() {
        let t = Tuning::default()
            .scaled_to(Viewport::new(1024.0, 768.0))
            .scaled_to(Viewport::default());
        assert!((t.gap_size - 150.0).abs() < 1e-3);
        assert!((t.pipe_width - 104.0).abs() < 1e-3);
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let t = Tuning::from_json(r#"{ "gap_size": 200.0, "boost_chance": 1.0 }"#).unwrap();
        assert_eq!(t.gap_size, 200.0);
        assert_eq!(t.boost_chance, 1.0);
        assert_eq!(t.pipe_min, 80.0);
    }

    #[test]
    fn test_from_json_scales_distances_to_viewport() {
        let json = r#"{ "viewport": { "width": 400.0, "height": 300.0 } }"#;
        let t = Tuning::from_json(json).unwrap();
        let expected = Tuning::for_viewport(Viewport::new(400.0, 300.0));
        assert!((t.gap_size - 75.0).abs() < 1e-4);
        assert!((t.pipe_min - 40.0).abs() < 1e-4);
        assert!((t.ground_height - 50.0).abs() < 1e-4);
        assert!((t.pipe_width - expected.pipe_width).abs() < 1e-4);
        assert_eq!(t.player_x(), 100.0);

        // Segments plus gap fill the space above the ground
        let mut rng = Pcg32::seed_from_u64(3);
        let spawned = ObstacleGenerator::default().generate(0, 1, &t, &mut rng);
        let o = spawned.obstacle;
        let filled = o.top_height() + (o.gap_bottom - o.gap_top) + o.bottom_height();
        assert!((filled - t.ground_y()).abs() < 1e-3);
        assert!(o.bottom_height() >= t.pipe_min - 1e-3);
    }

    #[test]
    fn test_from_json_rejects_cramped_playfield() {
        // 600 - 2 * 80 - 360 - 100 < 0
        assert!(Tuning::from_json(r#"{ "gap_size": 360.0 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "viewport": { "width": 0.0, "height": 600.0 } }"#).is_err());
        assert!(Tuning::from_json(r#"{ "gap_size": 290.0 }"#).is_ok());
    }

    #[test]
    fn test_json_round_trip_keeps_scaled_values() {
        let t = Tuning::for_viewport(Viewport::new(1024.0, 768.0));
        let json = t.to_json_pretty().unwrap();
        let raw: serde_json::Value = serde_json::from_str(&json).unwrap();
        let stored_gap = raw["gap_size"].as_f64().unwrap();
        assert!((stored_gap - 150.0).abs() < 1e-3);
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.viewport, t.viewport);
        assert!((back.gap_size - t.gap_size).abs() < 1e-3);
        assert!((back.base_speed - t.base_speed).abs() < 1e-3);
        assert_eq!(back.stage_duration, t.stage_duration);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Tuning::from_json("{ not json").is_err());
    }
}
