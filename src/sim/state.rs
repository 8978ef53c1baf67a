//! Game session state and core simulation types
//!
//! Everything a Playing run owns lives in [`GameSession`]. A fresh session is
//! built on every entry into Playing; only the [`RunSummary`] outlives it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::difficulty::Difficulty;
use super::effects::{ActiveEffects, EffectKind};
use super::obstacles::ObstacleGenerator;
use super::physics::Body;
use super::pickups::PickupSpawner;
use crate::tuning::Tuning;

/// The player-controlled body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner plus vertical velocity
    pub body: Body,
    pub size: Vec2,
    pub alive: bool,
    /// 1.0 normally, dimmed while phasing
    pub opacity: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            body: Body::new(Vec2::new(tuning.player_x(), tuning.viewport.height / 2.0)),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            alive: true,
            opacity: 1.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_top_left(self.body.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.body.pos + self.size * 0.5
    }
}

/// The vertical opening of the most recently generated obstacle.
///
/// Copied out of the generator each time it emits; collectible placement
/// only ever sees this value, never the obstacle list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafeGap {
    pub top: f32,
    pub bottom: f32,
}

impl SafeGap {
    /// The gap shrunk by `margin` on each side, or `None` if nothing is left
    pub fn inset(&self, margin: f32) -> Option<(f32, f32)> {
        let start = self.top + margin;
        let end = self.bottom - margin;
        (end > start).then_some((start, end))
    }
}

/// A gated obstacle: top segment from the ceiling to the gap, bottom segment
/// from the gap to the ground line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge, shared by both segments
    pub x: f32,
    pub width: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
    /// Ground line the bottom segment stands on
    pub floor_y: f32,
    /// Set once the player has cleared the trailing edge
    pub passed: bool,
}

impl Obstacle {
    pub fn top_height(&self) -> f32 {
        self.gap_top.max(0.0)
    }

    pub fn bottom_height(&self) -> f32 {
        (self.floor_y - self.gap_bottom).max(0.0)
    }

    pub fn top_rect(&self) -> Rect {
        Rect::from_top_left(
            Vec2::new(self.x, 0.0),
            Vec2::new(self.width, self.top_height()),
        )
    }

    pub fn bottom_rect(&self) -> Rect {
        Rect::from_top_left(
            Vec2::new(self.x, self.gap_bottom),
            Vec2::new(self.width, self.bottom_height()),
        )
    }

    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    pub fn overlaps(&self, rect: &Rect) -> bool {
        self.top_rect().overlaps(rect) || self.bottom_rect().overlaps(rect)
    }
}

/// Collectible kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Adds to the coin count
    Coin,
    /// Grants the double-score effect
    Boost,
    /// Grants the phase (ghost) effect
    Phase,
}

impl PickupKind {
    pub const ALL: [PickupKind; 3] = [PickupKind::Coin, PickupKind::Boost, PickupKind::Phase];

    /// Effect granted on collection, if any
    pub fn effect(self) -> Option<EffectKind> {
        match self {
            PickupKind::Coin => None,
            PickupKind::Boost => Some(EffectKind::DoubleScore),
            PickupKind::Phase => Some(EffectKind::Phase),
        }
    }

    pub fn size(self, tuning: &Tuning) -> f32 {
        match self {
            PickupKind::Coin => tuning.coin_size,
            PickupKind::Boost => tuning.boost_size,
            PickupKind::Phase => tuning.phase_size,
        }
    }

    /// Inset from the gap edges when placing this kind
    pub fn margin(self, tuning: &Tuning) -> f32 {
        match self {
            PickupKind::Coin => tuning.coin_margin,
            PickupKind::Boost | PickupKind::Phase => tuning.item_margin,
        }
    }

    /// How far past the right edge the item appears
    pub fn spawn_offset(self, tuning: &Tuning) -> f32 {
        match self {
            PickupKind::Coin => tuning.coin_spawn_offset,
            PickupKind::Boost | PickupKind::Phase => tuning.item_spawn_offset,
        }
    }
}

/// A collectible entity (centre-anchored)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Pickup {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    Obstacle,
    Ground,
    Ceiling,
}

/// Things that happened during a tick, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    ObstacleSpawned { id: u32, gap_top: f32 },
    PickupSpawned { id: u32, kind: PickupKind },
    PickupCollected { kind: PickupKind },
    EffectActivated(EffectKind),
    EffectExpired(EffectKind),
    Scored { score: u32 },
    SpeedIncreased { speed: f32 },
    StageStarted { gap_top: f32 },
    StageEnded,
    Lost(LossCause),
}

/// Immutable snapshot handed from Playing to Lost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u32,
    pub coins: u32,
    pub ticks: u64,
    pub elapsed_secs: f32,
    pub top_speed: f32,
    /// `None` while the run is still alive
    pub cause: Option<LossCause>,
}

/// Complete state of one Playing run
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Obstacle pairs passed
    pub score: u32,
    /// Collectible count (coins, doubled while boosted)
    pub coins: u32,
    pub player: Player,
    /// Live obstacles (ascending id)
    pub obstacles: Vec<Obstacle>,
    /// Live collectibles (ascending id)
    pub pickups: Vec<Pickup>,
    pub effects: ActiveEffects,
    pub difficulty: Difficulty,
    pub obstacle_gen: ObstacleGenerator,
    pub pickup_spawner: PickupSpawner,
    /// Last gap emitted by the obstacle generator
    pub last_gap: Option<SafeGap>,
    /// Scroll offset of the ground strip, wraps at one tile width
    pub ground_offset: f32,
    pub time_ticks: u64,
    pub elapsed: f32,
    pub rng: Pcg32,
    next_id: u32,
}

impl GameSession {
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        Self {
            score: 0,
            coins: 0,
            player: Player::new(tuning),
            obstacles: Vec::new(),
            pickups: Vec::new(),
            effects: ActiveEffects::default(),
            difficulty: Difficulty::new(tuning),
            obstacle_gen: ObstacleGenerator::default(),
            pickup_spawner: PickupSpawner::new(tuning),
            last_gap: None,
            ground_offset: 0.0,
            time_ticks: 0,
            elapsed: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn summary(&self, cause: Option<LossCause>) -> RunSummary {
        RunSummary {
            score: self.score,
            coins: self.coins,
            ticks: self.time_ticks,
            elapsed_secs: self.elapsed,
            top_speed: self.difficulty.speed,
            cause,
        }
    }

    /// Stretch the live run onto a resized playfield
    pub fn rescale(&mut self, sx: f32, sy: f32) {
        let s = Vec2::new(sx, sy);
        self.player.body.pos *= s;
        self.player.body.vel_y *= sy;
        self.player.size *= s;
        for o in &mut self.obstacles {
            o.x *= sx;
            o.width *= sx;
            o.gap_top *= sy;
            o.gap_bottom *= sy;
            o.floor_y *= sy;
        }
        for p in &mut self.pickups {
            p.pos *= s;
            p.size *= s;
        }
        if let Some(gap) = self.last_gap.as_mut() {
            gap.top *= sy;
            gap.bottom *= sy;
        }
        self.obstacle_gen.rescale(sy);
        self.difficulty.rescale(sx);
        self.ground_offset *= sx;
    }
}
