//! Draw requests for the rendering collaborator
//!
//! The core never touches a graphics API. Each frame it describes what to
//! draw (sprite or text, position, size, opacity, z-order) and the renderer
//! does the rest.

use glam::Vec2;
use serde::Serialize;

use crate::audio::SoundCue;
use crate::consts::REFERENCE_HEIGHT;
use crate::sim::{EffectKind, GameEvent, GameSession, PickupKind, RunSummary, Scene, StartScene};
use crate::tuning::Tuning;

/// Sprite assets the renderer knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sprite {
    Background,
    Ground,
    Bird,
    PipeTop,
    PipeBottom,
    Coin,
    Mushroom,
    Ghost,
    GameOver,
}

impl Sprite {
    fn for_pickup(kind: PickupKind) -> Self {
        match kind {
            PickupKind::Coin => Sprite::Coin,
            PickupKind::Boost => Sprite::Mushroom,
            PickupKind::Phase => Sprite::Ghost,
        }
    }
}

/// Which point of the item `pos` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Anchor {
    TopLeft,
    TopRight,
    Center,
}

/// Z-order layers
pub mod layer {
    pub const BACKGROUND: i32 = 0;
    pub const WORLD: i32 = 10;
    pub const GROUND: i32 = 20;
    pub const PLAYER: i32 = 30;
    pub const HUD: i32 = 100;
}

const WHITE: [u8; 3] = [255, 255, 255];
const GOLD: [u8; 3] = [255, 215, 0];
const PINK: [u8; 3] = [255, 100, 255];
const MINT: [u8; 3] = [150, 255, 150];
const YELLOW: [u8; 3] = [255, 255, 100];
const RED: [u8; 3] = [255, 100, 100];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawRequest {
    Sprite {
        sprite: Sprite,
        pos: Vec2,
        size: Vec2,
        anchor: Anchor,
        opacity: f32,
        z: i32,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        anchor: Anchor,
        color: [u8; 3],
        z: i32,
    },
}

impl DrawRequest {
    fn sprite(sprite: Sprite, pos: Vec2, size: Vec2, anchor: Anchor, z: i32) -> Self {
        DrawRequest::Sprite {
            sprite,
            pos,
            size,
            anchor,
            opacity: 1.0,
            z,
        }
    }

    fn text(text: impl Into<String>, pos: Vec2, size: f32, anchor: Anchor, color: [u8; 3]) -> Self {
        DrawRequest::Text {
            text: text.into(),
            pos,
            size,
            anchor,
            color,
            z: layer::HUD,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DrawRequest::Text { text, .. } => Some(text),
            DrawRequest::Sprite { .. } => None,
        }
    }

    pub fn as_sprite(&self) -> Option<Sprite> {
        match self {
            DrawRequest::Sprite { sprite, .. } => Some(*sprite),
            DrawRequest::Text { .. } => None,
        }
    }
}

/// Everything one frame asks of the outside world
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrameOutput {
    pub draws: Vec<DrawRequest>,
    pub sounds: Vec<SoundCue>,
    pub events: Vec<GameEvent>,
}

impl FrameOutput {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.draws.iter().filter_map(DrawRequest::as_text)
    }

    pub fn sprite_count(&self, sprite: Sprite) -> usize {
        self.draws
            .iter()
            .filter(|d| d.as_sprite() == Some(sprite))
            .count()
    }
}

/// Build the draw list for a scene
pub fn draw_scene(scene: &Scene, tuning: &Tuning) -> Vec<DrawRequest> {
    let mut draws = Vec::new();
    let ground_offset = match scene {
        Scene::Playing(session) => session.ground_offset,
        _ => 0.0,
    };
    draw_backdrop(&mut draws, tuning, ground_offset);
    match scene {
        Scene::Start(start) => draw_start(&mut draws, start, tuning),
        Scene::Playing(session) => draw_playing(&mut draws, session, tuning),
        Scene::Lost(summary) => draw_lost(&mut draws, summary, tuning),
    }
    draws
}

fn text_scale(tuning: &Tuning) -> f32 {
    tuning.viewport.height / REFERENCE_HEIGHT
}

/// Background plus two ground tiles, scrolled by `ground_offset`
fn draw_backdrop(draws: &mut Vec<DrawRequest>, tuning: &Tuning, ground_offset: f32) {
    let vp = tuning.viewport;
    draws.push(DrawRequest::sprite(
        Sprite::Background,
        Vec2::ZERO,
        Vec2::new(vp.width, vp.height),
        Anchor::TopLeft,
        layer::BACKGROUND,
    ));
    let tile = Vec2::new(vp.width, tuning.ground_height);
    for i in 0..2 {
        draws.push(DrawRequest::sprite(
            Sprite::Ground,
            Vec2::new(i as f32 * vp.width - ground_offset, tuning.ground_y()),
            tile,
            Anchor::TopLeft,
            layer::GROUND,
        ));
    }
}

fn draw_start(draws: &mut Vec<DrawRequest>, start: &StartScene, tuning: &Tuning) {
    let s = text_scale(tuning);
    let cx = tuning.viewport.width / 2.0;
    let cy = tuning.viewport.height / 2.0;
    draws.push(DrawRequest::text(
        "FLAPPY RUSH",
        Vec2::new(cx, cy - 100.0 * s),
        48.0 * s,
        Anchor::Center,
        WHITE,
    ));
    draws.push(DrawRequest::text(
        "Press SPACE or Click to Start",
        Vec2::new(cx, cy),
        24.0 * s,
        Anchor::Center,
        WHITE,
    ));
    draws.push(DrawRequest::sprite(
        Sprite::Bird,
        Vec2::new(cx, start.bird_y),
        Vec2::new(tuning.player_width, tuning.player_height) * 1.5,
        Anchor::Center,
        layer::PLAYER,
    ));
}

fn draw_playing(draws: &mut Vec<DrawRequest>, session: &GameSession, tuning: &Tuning) {
    for o in &session.obstacles {
        let top = o.top_rect();
        let bottom = o.bottom_rect();
        draws.push(DrawRequest::sprite(
            Sprite::PipeTop,
            top.min,
            Vec2::new(top.width(), top.height()),
            Anchor::TopLeft,
            layer::WORLD,
        ));
        draws.push(DrawRequest::sprite(
            Sprite::PipeBottom,
            bottom.min,
            Vec2::new(bottom.width(), bottom.height()),
            Anchor::TopLeft,
            layer::WORLD,
        ));
    }

    for p in &session.pickups {
        draws.push(DrawRequest::sprite(
            Sprite::for_pickup(p.kind),
            p.pos,
            p.size,
            Anchor::Center,
            layer::WORLD,
        ));
    }

    draws.push(DrawRequest::Sprite {
        sprite: Sprite::Bird,
        pos: session.player.body.pos,
        size: session.player.size,
        anchor: Anchor::TopLeft,
        opacity: session.player.opacity,
        z: layer::PLAYER,
    });

    // HUD
    let s = text_scale(tuning);
    let w = tuning.viewport.width;
    draws.push(DrawRequest::text(
        format!("Score: {}", session.score),
        Vec2::new(w - 20.0 * s, 20.0 * s),
        24.0 * s,
        Anchor::TopRight,
        WHITE,
    ));
    draws.push(DrawRequest::text(
        format!("Coins: {}", session.coins),
        Vec2::splat(20.0 * s),
        24.0 * s,
        Anchor::TopLeft,
        GOLD,
    ));
    for (row, (kind, color)) in [(EffectKind::DoubleScore, PINK), (EffectKind::Phase, MINT)]
        .into_iter()
        .enumerate()
    {
        if session.effects.is_active(kind) {
            draws.push(DrawRequest::text(
                format!("{}: {}s", kind.label(), session.effects.remaining(kind).ceil()),
                Vec2::new(20.0 * s, (50.0 + 30.0 * row as f32) * s),
                20.0 * s,
                Anchor::TopLeft,
                color,
            ));
        }
    }
    draws.push(DrawRequest::text(
        format!("Speed: {}", session.difficulty.speed.round()),
        Vec2::new(20.0 * s, 110.0 * s),
        18.0 * s,
        Anchor::TopLeft,
        YELLOW,
    ));
    let stage = &session.obstacle_gen.stage;
    if stage.active {
        draws.push(DrawRequest::text(
            format!("STRAIGHT LINE: {} left", stage.remaining(tuning)),
            Vec2::new(20.0 * s, 140.0 * s),
            16.0 * s,
            Anchor::TopLeft,
            RED,
        ));
    }
}

fn draw_lost(draws: &mut Vec<DrawRequest>, summary: &RunSummary, tuning: &Tuning) {
    let s = text_scale(tuning);
    let cx = tuning.viewport.width / 2.0;
    let cy = tuning.viewport.height / 2.0;
    draws.push(DrawRequest::sprite(
        Sprite::GameOver,
        Vec2::new(cx, cy - 100.0 * s),
        Vec2::new(384.0, 84.0) * s,
        Anchor::Center,
        layer::HUD,
    ));
    draws.push(DrawRequest::text(
        format!("Score: {}", summary.score),
        Vec2::new(cx, cy),
        32.0 * s,
        Anchor::Center,
        WHITE,
    ));
    draws.push(DrawRequest::text(
        format!("Coins: {}", summary.coins),
        Vec2::new(cx, cy + 40.0 * s),
        24.0 * s,
        Anchor::Center,
        GOLD,
    ));
    draws.push(DrawRequest::text(
        "Press SPACE or Click to Play Again",
        Vec2::new(cx, cy + 80.0 * s),
        20.0 * s,
        Anchor::Center,
        WHITE,
    ));
}
