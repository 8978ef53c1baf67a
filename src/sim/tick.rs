//! Per-frame simulation tick
//!
//! Order within a tick is fixed: input and physics, spawning, scrolling,
//! collision, scoring and effects, then speed. Collision assumes every
//! entity has already moved this tick and scoring reads `passed` flags
//! after movement.

use glam::Vec2;

use super::effects::EffectKind;
use super::obstacles::StageChange;
use super::state::{GameEvent, GameSession, LossCause, Pickup, PickupKind};
use crate::tuning::Tuning;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump pressed (key or pointer, coalesced)
    pub jump: bool,
    /// Idle/demo mode - autopilot flies the player
    pub idle_mode: bool,
}

/// What a tick produced
#[derive(Debug, Clone, Default)]
pub struct TickResult {
    pub events: Vec<GameEvent>,
    /// Set when the run ended this tick
    pub lost: Option<LossCause>,
}

/// Advance a Playing session by `dt` seconds
pub fn tick(session: &mut GameSession, input: &TickInput, tuning: &Tuning, dt: f32) -> TickResult {
    let mut events = Vec::new();
    session.time_ticks += 1;
    session.elapsed += dt;

    // --- INPUT + PHYSICS ---
    let jump = input.jump || (input.idle_mode && autopilot_wants_jump(session, tuning));
    if jump {
        session.player.body.jump(tuning.jump_impulse);
        events.push(GameEvent::Jumped);
    }
    session.player.body.integrate(tuning.gravity, dt);

    // --- SPAWNING ---
    spawn_obstacles(session, tuning, dt, &mut events);
    spawn_pickups(session, tuning, dt, &mut events);

    // --- SCROLLING ---
    scroll(session, tuning, dt);

    // --- COLLISION ---
    if let Some(cause) = lethal_collision(session, tuning) {
        session.player.alive = false;
        log::info!(
            "Run over ({:?}) - score {}, coins {}",
            cause,
            session.score,
            session.coins
        );
        events.push(GameEvent::Lost(cause));
        return TickResult {
            events,
            lost: Some(cause),
        };
    }
    let activations = collect_pickups(session, &mut events);

    // --- SCORING ---
    let scored = score_passed_obstacles(session, &mut events);

    // --- EFFECTS ---
    for kind in session.effects.update(dt) {
        log::debug!("{:?} expired", kind);
        events.push(GameEvent::EffectExpired(kind));
    }
    for kind in activations {
        session.effects.activate(kind, tuning.effect_duration);
        events.push(GameEvent::EffectActivated(kind));
    }
    session.player.opacity = if session.effects.is_active(EffectKind::Phase) {
        tuning.ghost_opacity
    } else {
        1.0
    };

    // --- SPEED ---
    for score in scored {
        if session.difficulty.on_point_scored(score, tuning) {
            events.push(GameEvent::SpeedIncreased {
                speed: session.difficulty.speed,
            });
        }
    }

    TickResult { events, lost: None }
}

fn spawn_obstacles(
    session: &mut GameSession,
    tuning: &Tuning,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    let interval = session.difficulty.obstacle_interval(tuning);
    if !session.obstacle_gen.advance_timer(dt, interval) {
        return;
    }

    let id = session.next_entity_id();
    let spawned = session
        .obstacle_gen
        .generate(session.score, id, tuning, &mut session.rng);

    for change in spawned.stage_changes {
        events.push(match change {
            StageChange::Started { gap_top } => GameEvent::StageStarted { gap_top },
            StageChange::Ended => GameEvent::StageEnded,
        });
    }
    events.push(GameEvent::ObstacleSpawned {
        id,
        gap_top: spawned.obstacle.gap_top,
    });

    session.last_gap = Some(spawned.gap);
    session.obstacles.push(spawned.obstacle);
}

fn spawn_pickups(
    session: &mut GameSession,
    tuning: &Tuning,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    let placements = session
        .pickup_spawner
        .update(dt, session.last_gap, tuning, &mut session.rng);

    for placement in placements {
        let id = session.next_entity_id();
        log::debug!("{:?} #{} at y {:.0}", placement.kind, id, placement.pos.y);
        session.pickups.push(Pickup {
            id,
            kind: placement.kind,
            pos: placement.pos,
            size: Vec2::splat(placement.kind.size(tuning)),
        });
        events.push(GameEvent::PickupSpawned {
            id,
            kind: placement.kind,
        });
    }
}

/// Translate every moving entity left at the shared speed, dropping what leaves the playfield
fn scroll(session: &mut GameSession, tuning: &Tuning, dt: f32) {
    let dx = session.difficulty.scroll(dt);

    for obstacle in &mut session.obstacles {
        obstacle.x -= dx;
    }
    session.obstacles.retain(|o| o.trailing_edge() >= 0.0);

    for pickup in &mut session.pickups {
        pickup.pos.x -= dx;
    }
    session.pickups.retain(|p| p.rect().max.x >= 0.0);

    let tile = tuning.viewport.width;
    if tile > 0.0 {
        session.ground_offset = (session.ground_offset + dx).rem_euclid(tile);
    }
}

/// Terminal conditions: ground, ceiling, or an obstacle while not phasing
fn lethal_collision(session: &GameSession, tuning: &Tuning) -> Option<LossCause> {
    let y = session.player.body.pos.y;
    if y >= tuning.ground_y() {
        return Some(LossCause::Ground);
    }
    if y <= tuning.ceiling_y {
        return Some(LossCause::Ceiling);
    }

    if session.effects.is_active(EffectKind::Phase) {
        return None;
    }
    let player = session.player.rect();
    session
        .obstacles
        .iter()
        .any(|o| o.overlaps(&player))
        .then_some(LossCause::Obstacle)
}

/// Remove touched pickups; coins count immediately, effects are returned for activation
fn collect_pickups(session: &mut GameSession, events: &mut Vec<GameEvent>) -> Vec<EffectKind> {
    let player = session.player.rect();
    let (touched, rest): (Vec<_>, Vec<_>) = session
        .pickups
        .drain(..)
        .partition(|p| p.rect().overlaps(&player));
    session.pickups = rest;

    let mut activations = Vec::new();
    for pickup in touched {
        match pickup.kind {
            PickupKind::Coin => session.coins += session.effects.coin_value(),
            kind => activations.extend(kind.effect()),
        }
        events.push(GameEvent::PickupCollected { kind: pickup.kind });
    }
    activations
}

/// Mark obstacles whose trailing edge is at or behind the player; returns each new score
fn score_passed_obstacles(session: &mut GameSession, events: &mut Vec<GameEvent>) -> Vec<u32> {
    let player_x = session.player.body.pos.x;
    let mut scored = Vec::new();
    for obstacle in &mut session.obstacles {
        if !obstacle.passed && obstacle.trailing_edge() <= player_x {
            obstacle.passed = true;
            session.score += 1;
            scored.push(session.score);
            events.push(GameEvent::Scored {
                score: session.score,
            });
        }
    }
    scored
}

/// Simple demo controller: hold the player near the centre of the next gap
fn autopilot_wants_jump(session: &GameSession, tuning: &Tuning) -> bool {
    let player = &session.player;
    let target_y = session
        .obstacles
        .iter()
        .filter(|o| o.trailing_edge() > player.body.pos.x)
        .min_by(|a, b| a.x.total_cmp(&b.x))
        .map(|o| (o.gap_top + o.gap_bottom) * 0.5)
        .unwrap_or(tuning.ground_y() * 0.5);

    player.center().y > target_y && player.body.vel_y >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;

    const DT: f32 = 1.0 / 60.0;

    /// Tuning with spawners effectively disabled
    fn quiet_tuning() -> Tuning {
        Tuning {
            base_obstacle_interval: 1.0e6,
            coin_interval: 1.0e6,
            boost_interval: 1.0e6,
            phase_interval: 1.0e6,
            ..Tuning::default()
        }
    }

    fn obstacle_at(session: &mut GameSession, x: f32, gap_top: f32) -> u32 {
        let id = session.next_entity_id();
        session.obstacles.push(Obstacle {
            id,
            x,
            width: 104.0,
            gap_top,
            gap_bottom: gap_top + 150.0,
            floor_y: 500.0,
            passed: false,
        });
        id
    }

    fn pickup_on_player(session: &mut GameSession, kind: PickupKind) {
        let id = session.next_entity_id();
        let pos = session.player.center();
        session.pickups.push(Pickup {
            id,
            kind,
            pos,
            size: Vec2::splat(40.0),
        });
    }

    #[test]
    fn test_jump_sets_impulse_before_gravity() {
        let t = quiet_tuning();
        let mut s = GameSession::new(&t, 1);
        s.player.body.vel_y = 300.0;
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        let r = tick(&mut s, &input, &t, DT);
        assert_eq!(r.events.first(), Some(&GameEvent::Jumped));
        assert!((s.player.body.vel_y - (-t.jump_impulse + t.gravity * DT)).abs() < 1e-3);
    }

    #[test]
    fn test_ground_is_lethal() {
        let t = quiet_tuning();
        let mut s = GameSession::new(&t, 1);
        s.player.body.pos.y = t.ground_y() - 1.0;
        s.player.body.vel_y = 100.0;
        let r = tick(&mut s, &TickInput::default(), &t, DT);
        assert_eq!(r.lost, Some(LossCause::Ground));
        assert!(!s.player.alive);
    }

    #[test]
    fn test_ceiling_is_lethal() {
        let t = quiet_tuning();
        let mut s = GameSession::new(&t, 1);
        s.player.body.pos.y = t.ceiling_y + 1.0;
        s.player.body.vel_y = -300.0;
        let r = tick(&mut s, &TickInput::default(), &t, DT);
        assert_eq!(r.lost, Some(LossCause::Ceiling));
    }

    #[test]
    fn test_obstacle_lethal_without_phase() {
        let t = quiet_tuning();
        let mut s = GameSession::new(&t, 1);
        s.score = 3;
        s.coins = 7;
        // Player (y 300..348) sits in the top segment
        obstacle_at(&mut s, 180.0, 400.0);
        let r = tick(&mut s, &TickInput::default(), &t, DT);
        assert_eq!(r.lost, Some(LossCause::Obstacle));
        let summary = s.summary(r.lost);
        assert_eq!(summary.cause, Some(LossCause::Obstacle));
        assert_eq!(summary.score, 3);
        assert_eq!(summary.coins, 7);
    }

    #[test]
    fn test_obstacle_reaching_player_this_tick_is_lethal() {
        let t = quiet_tuning();
        let mut s = GameSession::new(&t, 1);
        // Left edge half a tick of travel past the player's right edge (268)
        let right = s.player.rect().max.x;
        obstacle_at(&mut s, right + 0.5 * t.base_speed * DT, 400.0);
        assert!(!s.obstacles[0].overlaps(&s.player.rect()));
        let r = tick(&mut s, &TickInput::default(), &t, DT);
        assert_eq!(r.lost, Some(LossCause::Obstacle));
    }

    #[test]
    fn test_phase_passes_through_obstacles() {
        let t = quiet_tuning();
        let mut s = GameSession::new(&t, 1);
        s.effects.activate(EffectKind::Phase, t.effect_duration);
        obstacle_at(&mut s, 180.0, 400.0);
        let r = tick(&mut s, &TickInput::default(), &t, DT);
        assert_eq!(r.lost, None);
        assert!(s.player.alive);
        assert_eq!(s.player.opacity, t.ghost_opacity);
    }

    #[test]
    fn test_phase_does_not_save_from_ground() {
        let t = quiet_tuning();
        let mut s = GameSession::new(&t, 1);
        s.effects.activate(EffectKind::Phase, t.effect_duration);
        s.player.body.pos.y = t.ground_y();
        let r = tick(&mut s, &TickInput::default(), &t, DT);
        assert_eq!(r.lost, Some(LossCause::Ground));
    }

    #[test]
    fn test_passed_scores_once() {
        let t = quiet_tuning();
        let mut s = GameSession::new(&t, 1);
        // Trailing edge 90 + 104 = 194, behind player x 200
        obstacle_at(&mut s, 90.0, 250.0);
        tick(&mut s, &TickInput::default(), &t, DT);
        assert_eq!(s.score, 1);
        assert!(s.obstacles[0].passed);
        let flap = TickInput {
            jump: true,
            ..Default::default()
        };
        for _ in 0..5 {
            tick(&mut s, &flap, &t, DT);
        }
        assert_eq!(s.score, 1);
    }

    #[test]
    fn test_scores_when_trailing_edge_crosses_this_tick() {
        let t = quiet_tuning();
        let mut s = GameSession::new(&t, 1);
        // Trailing edge half a tick of travel ahead of the player's x
        let trailing = s.player.body.pos.x + 0.5 * t.base_speed * DT;
        obstacle_at(&mut s, trailing - 104.0, 250.0);
        let r = tick(&mut s, &TickInput::default(), &t, DT);
        assert_eq!(r.lost, None);
        assert_eq!(s.score, 1);
        assert!(r.events.contains(&GameEvent::Scored { score: 1 }));
    }

    #[test]
    fn test_speed_increases_once_at_threshold() {
        let t = quiet_tuning();
        let mut s = GameSession::new(&t, 1);
        s.score = t.speed_increase_threshold - 1;
        obstacle_at(&mut s, 90.0, 250.0);
        let r = tick(&mut s, &TickInput::default(), &t, DT);
        assert_eq!(s.score, t.speed_increase_threshold);
        assert_eq!(s.difficulty.speed, t.base_speed + t.speed_increment);
        assert!(
            r.events
                .iter()
                .any(|e| matches!(e, GameEvent::SpeedIncreased { .. }))
        );

        tick(&mut s, &TickInput::default(), &t, DT);
        assert_eq!(s.difficulty.speed, t.base_speed + t.speed_increment);
    }

    #[test]
    fn test_coin_value_doubles_with_boost() {
        let t = quiet_tuning();
        let mut s = GameSession::new(&t, 1);
        pickup_on_player(&mut s, PickupKind::Coin);
        tick(&mut s, &TickInput::default(), &t, DT);
        assert_eq!(s.coins, 1);
        assert!(s.pickups.is_empty());

        s.effects.activate(EffectKind::DoubleScore, t.effect_duration);
        pickup_on_player(&mut s, PickupKind::Coin);
        tick(&mut s, &TickInput::default(), &t, DT);
        assert_eq!(s.coins, 3);
    }

    #[test]
    fn test_item_grants_full_duration() {
        let t = quiet_tuning();
        let mut s = GameSession::new(&t, 1);
        pickup_on_player(&mut s, PickupKind::Boost);
        let r = tick(&mut s, &TickInput::default(), &t, DT);
        assert!(
            r.events
                .contains(&GameEvent::EffectActivated(EffectKind::DoubleScore))
        );
        assert_eq!(s.effects.remaining(EffectKind::DoubleScore), t.effect_duration);

        // Let it run down a bit, then refresh
        for _ in 0..30 {
            let input = TickInput {
                jump: s.player.body.vel_y > 0.0,
                ..Default::default()
            };
            tick(&mut s, &input, &t, DT);
        }
        assert!(s.effects.remaining(EffectKind::DoubleScore) < t.effect_duration);
        pickup_on_player(&mut s, PickupKind::Boost);
        tick(&mut s, &TickInput::default(), &t, DT);
        assert_eq!(s.effects.remaining(EffectKind::DoubleScore), t.effect_duration);
    }

    #[test]
    fn test_offscreen_entities_removed() {
        let t = quiet_tuning();
        let mut s = GameSession::new(&t, 1);
        obstacle_at(&mut s, -103.0, 250.0);
        s.pickups.push(Pickup {
            id: 99,
            kind: PickupKind::Coin,
            pos: Vec2::new(-19.0, 100.0),
            size: Vec2::splat(40.0),
        });
        tick(&mut s, &TickInput::default(), &t, DT);
        assert!(s.obstacles.is_empty());
        assert!(s.pickups.is_empty());
    }

    #[test]
    fn test_spawned_obstacle_moves_same_tick() {
        let t = Tuning {
            base_obstacle_interval: 0.0,
            ..quiet_tuning()
        };
        let mut s = GameSession::new(&t, 1);
        let r = tick(&mut s, &TickInput::default(), &t, DT);
        assert!(
            r.events
                .iter()
                .any(|e| matches!(e, GameEvent::ObstacleSpawned { .. }))
        );
        assert_eq!(s.obstacles.len(), 1);
        assert!((s.obstacles[0].x - (t.viewport.width - t.base_speed * DT)).abs() < 1e-3);
        assert!(s.last_gap.is_some());
    }

    #[test]
    fn test_determinism() {
        let t = Tuning::default();
        let mut a = GameSession::new(&t, 99999);
        let mut b = GameSession::new(&t, 99999);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            let ra = tick(&mut a, &input, &t, DT);
            let rb = tick(&mut b, &input, &t, DT);
            assert_eq!(ra.events, rb.events);
            if ra.lost.is_some() {
                break;
            }
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.coins, b.coins);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.player.body.pos, b.player.body.pos);
    }
}
