//! Collectible spawning
//!
//! Three independent periodic timers (coin, boost item, phase item). Coins
//! always spawn when their timer fires; the power-up items roll a chance
//! first. A fired spawn waits a short delay so a just-emitted obstacle gap
//! is registered, then picks a y inside that gap shrunk by a margin.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{PickupKind, SafeGap};
use crate::tuning::Tuning;

/// Repeating timer. Fires every `interval` seconds, first firing after one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub interval: f32,
    pub elapsed: f32,
}

impl SpawnTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt`; returns how many times the timer fired
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.interval <= 0.0 {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }
}

/// A fired spawn waiting out its registration delay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSpawn {
    pub kind: PickupKind,
    pub delay: f32,
}

/// A collectible ready to be placed in the playfield
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub kind: PickupKind,
    /// Centre position
    pub pos: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupSpawner {
    pub coin: SpawnTimer,
    pub boost: SpawnTimer,
    pub phase: SpawnTimer,
    pub pending: Vec<PendingSpawn>,
}

impl PickupSpawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            coin: SpawnTimer::new(tuning.coin_interval),
            boost: SpawnTimer::new(tuning.boost_interval),
            phase: SpawnTimer::new(tuning.phase_interval),
            pending: Vec::new(),
        }
    }

    /// Advance timers and resolve delayed spawns against the latest gap
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        gap: Option<SafeGap>,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Vec<Placement> {
        let mut placements = Vec::new();

        // Resolve spawns fired on earlier ticks
        for spawn in &mut self.pending {
            spawn.delay -= dt;
        }
        let (ready, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.delay <= 0.0);
        self.pending = waiting;
        for spawn in ready {
            if let Some(y) = spawn_y(spawn.kind, gap, tuning, rng) {
                let x = tuning.viewport.width + spawn.kind.spawn_offset(tuning);
                placements.push(Placement {
                    kind: spawn.kind,
                    pos: Vec2::new(x, y),
                });
            } else {
                log::debug!("{:?} skipped: spawn zone degenerate", spawn.kind);
            }
        }

        // Fire timers
        for _ in 0..self.coin.advance(dt) {
            self.queue(PickupKind::Coin, tuning);
        }
        for _ in 0..self.boost.advance(dt) {
            if rng.random_bool(tuning.boost_chance.clamp(0.0, 1.0)) {
                self.queue(PickupKind::Boost, tuning);
            }
        }
        for _ in 0..self.phase.advance(dt) {
            if rng.random_bool(tuning.phase_chance.clamp(0.0, 1.0)) {
                self.queue(PickupKind::Phase, tuning);
            }
        }

        placements
    }

    fn queue(&mut self, kind: PickupKind, tuning: &Tuning) {
        self.pending.push(PendingSpawn {
            kind,
            delay: tuning.spawn_delay,
        });
    }
}

/// Vertical band a collectible of `kind` may be placed in.
///
/// Inside the recorded gap, inset by the kind's margin; without a gap, the
/// mid-playfield fallback band. `None` when the band is empty.
pub fn spawn_zone(kind: PickupKind, gap: Option<SafeGap>, tuning: &Tuning) -> Option<(f32, f32)> {
    match gap {
        Some(gap) => gap.inset(kind.margin(tuning)),
        None => {
            let start = tuning.fallback_band_margin;
            let end = tuning.viewport.height - tuning.fallback_band_margin;
            (end > start).then_some((start, end))
        }
    }
}

/// Sample a y position for `kind`, strictly inside its spawn zone
pub fn spawn_y<R: Rng>(
    kind: PickupKind,
    gap: Option<SafeGap>,
    tuning: &Tuning,
    rng: &mut R,
) -> Option<f32> {
    let (start, end) = spawn_zone(kind, gap, tuning)?;
    Some(rng.random_range(start..end))
}
