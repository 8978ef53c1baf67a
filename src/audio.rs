//! Sound cues
//!
//! The simulation never plays audio itself. It emits cues that the audio
//! collaborator plays fire-and-forget.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Player jumped
    Jump,
    /// Point scored or item collected
    Score,
    /// Run ended
    Hit,
}

impl SoundCue {
    /// Asset key the audio collaborator loads the cue under
    pub fn asset_name(self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::Score => "score",
            SoundCue::Hit => "hit",
        }
    }

    /// Cue for a simulation event, if it makes a sound
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundCue::Jump),
            GameEvent::Scored { .. } | GameEvent::PickupCollected { .. } => Some(SoundCue::Score),
            GameEvent::Lost(_) => Some(SoundCue::Hit),
            _ => None,
        }
    }
}

/// Anything that can play cues
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogAudio {
    pub played: u64,
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue) {
        self.played += 1;
        log::trace!("play {}", cue.asset_name());
    }
}
