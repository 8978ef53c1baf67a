//! Flappy Rush - a side-scrolling gap runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, scenes)
//! - `tuning`: Data-driven game balance, scaled to the viewport
//! - `render`: Draw requests handed to the rendering collaborator
//! - `audio`: Sound cues handed to the audio collaborator

pub mod audio;
pub mod render;
pub mod sim;
pub mod tuning;

pub use audio::SoundCue;
pub use render::{DrawRequest, FrameOutput};
pub use tuning::{Tuning, Viewport};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference playfield the default tuning is authored against
    pub const REFERENCE_WIDTH: f32 = 800.0;
    pub const REFERENCE_HEIGHT: f32 = 600.0;

    /// Largest frame delta the simulation accepts (prevents tunneling after a stall)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Frame rate the headless driver simulates
    pub const HEADLESS_FPS: f32 = 60.0;
}

/// Sanitize a frame delta: non-finite or negative becomes zero, large values clamp
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        0.0
    } else {
        dt.min(consts::MAX_FRAME_DT)
    }
}

/// Scale factors from the reference playfield to a viewport
#[inline]
pub fn viewport_scale(width: f32, height: f32) -> Vec2 {
    Vec2::new(
        width / consts::REFERENCE_WIDTH,
        height / consts::REFERENCE_HEIGHT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_dt() {
        assert_eq!(sanitize_dt(f32::NAN), 0.0);
        assert_eq!(sanitize_dt(-0.5), 0.0);
        assert_eq!(sanitize_dt(0.016), 0.016);
        assert_eq!(sanitize_dt(2.0), consts::MAX_FRAME_DT);
    }

    #[test]
    fn test_viewport_scale_reference_is_identity() {
        let s = viewport_scale(consts::REFERENCE_WIDTH, consts::REFERENCE_HEIGHT);
        assert_eq!(s, Vec2::ONE);
    }
}
