//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Fixed update order within a tick
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod effects;
pub mod obstacles;
pub mod physics;
pub mod pickups;
pub mod scene;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use difficulty::Difficulty;
pub use effects::{ActiveEffects, EffectKind};
pub use obstacles::{ObstacleGenerator, StraightLineStage};
pub use physics::Body;
pub use pickups::PickupSpawner;
pub use scene::{Game, Scene, SceneKind, StartScene};
pub use state::{
    GameEvent, GameSession, LossCause, Obstacle, Pickup, PickupKind, Player, RunSummary, SafeGap,
};
pub use tick::{TickInput, TickResult, tick};
