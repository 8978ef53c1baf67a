//! Scene state machine: Start -> Playing -> Lost -> Playing
//!
//! Each scene step consumes the current scene and returns the next one plus
//! the side effects it produced, so scene logic runs without a renderer.

use crate::audio::SoundCue;
use crate::render::{self, FrameOutput};
use crate::sanitize_dt;
use crate::tuning::{Tuning, Viewport};

use super::state::{GameEvent, GameSession, RunSummary};
use super::tick::{TickInput, tick};

/// Which scene is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Start,
    Playing,
    Lost,
}

/// Title screen with a bobbing bird
#[derive(Debug, Clone, PartialEq)]
pub struct StartScene {
    pub bird_y: f32,
    /// -1 moving up, +1 moving down
    pub bob_dir: f32,
}

impl StartScene {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            bird_y: tuning.viewport.height / 2.0 + (tuning.bob_low + tuning.bob_high) / 2.0,
            bob_dir: -1.0,
        }
    }

    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        let mid = tuning.viewport.height / 2.0;
        self.bird_y += self.bob_dir * tuning.bob_speed * dt;
        if self.bird_y <= mid + tuning.bob_low {
            self.bob_dir = 1.0;
        }
        if self.bird_y >= mid + tuning.bob_high {
            self.bob_dir = -1.0;
        }
    }
}

#[derive(Debug, Clone)]
pub enum Scene {
    Start(StartScene),
    Playing(Box<GameSession>),
    /// Carries the finished run's snapshot
    Lost(RunSummary),
}

/// Result of stepping a scene once
#[derive(Debug)]
pub struct Step {
    pub scene: Scene,
    pub events: Vec<GameEvent>,
    pub sounds: Vec<SoundCue>,
}

impl Scene {
    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Start(_) => SceneKind::Start,
            Scene::Playing(_) => SceneKind::Playing,
            Scene::Lost(_) => SceneKind::Lost,
        }
    }

    /// Advance one frame. `run_seed` seeds the session if this step starts a run.
    pub fn step(self, input: &TickInput, dt: f32, tuning: &Tuning, run_seed: u64) -> Step {
        match self {
            Scene::Start(mut start) => {
                if input.jump || input.idle_mode {
                    return Step::enter_playing(tuning, run_seed);
                }
                start.update(dt, tuning);
                Step::quiet(Scene::Start(start))
            }

            Scene::Playing(mut session) => {
                let result = tick(&mut session, input, tuning, dt);
                let sounds = result.events.iter().filter_map(SoundCue::for_event).collect();
                let scene = match result.lost {
                    Some(cause) => {
                        let summary = session.summary(Some(cause));
                        log::info!(
                            "Lost: score {} coins {} after {:.1}s",
                            summary.score,
                            summary.coins,
                            summary.elapsed_secs
                        );
                        Scene::Lost(summary)
                    }
                    None => Scene::Playing(session),
                };
                Step {
                    scene,
                    events: result.events,
                    sounds,
                }
            }

            Scene::Lost(summary) => {
                if input.jump {
                    return Step::enter_playing(tuning, run_seed);
                }
                Step::quiet(Scene::Lost(summary))
            }
        }
    }
}

impl Step {
    fn quiet(scene: Scene) -> Self {
        Self {
            scene,
            events: Vec::new(),
            sounds: Vec::new(),
        }
    }

    /// Fresh session; nothing carries over from an earlier run
    fn enter_playing(tuning: &Tuning, run_seed: u64) -> Self {
        log::info!("Playing (run seed {})", run_seed);
        Self::quiet(Scene::Playing(Box::new(GameSession::new(tuning, run_seed))))
    }
}

/// Top-level game: tuning, seed bookkeeping and the current scene
#[derive(Debug, Clone)]
pub struct Game {
    pub tuning: Tuning,
    seed: u64,
    /// Runs started so far
    runs: u32,
    scene: Scene,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let scene = Scene::Start(StartScene::new(&tuning));
        Self {
            tuning,
            seed,
            runs: 0,
            scene,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn kind(&self) -> SceneKind {
        self.scene.kind()
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Per-run seed so every run differs but replays identically
    fn run_seed(&self) -> u64 {
        self.seed
            .wrapping_add((self.runs as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Run one frame and collect its draw and sound requests
    pub fn frame(&mut self, input: &TickInput, dt: f32) -> FrameOutput {
        let clean_dt = sanitize_dt(dt);
        if clean_dt != dt {
            log::warn!("Frame dt {} adjusted to {}", dt, clean_dt);
        }

        let before = self.scene.kind();
        let placeholder = Scene::Start(StartScene::new(&self.tuning));
        let current = std::mem::replace(&mut self.scene, placeholder);
        let step = current.step(input, clean_dt, &self.tuning, self.run_seed());
        self.scene = step.scene;

        let after = self.scene.kind();
        if after == SceneKind::Playing && before != SceneKind::Playing {
            self.runs += 1;
        }

        FrameOutput {
            draws: render::draw_scene(&self.scene, &self.tuning),
            sounds: step.sounds,
            events: step.events,
        }
    }

    /// Adapt to a new playfield size, stretching any live run proportionally
    pub fn resize(&mut self, viewport: Viewport) {
        let old = self.tuning.viewport;
        if old == viewport || viewport.width <= 0.0 || viewport.height <= 0.0 {
            return;
        }
        let sx = viewport.width / old.width;
        let sy = viewport.height / old.height;
        log::info!(
            "Resize {}x{} -> {}x{}",
            old.width,
            old.height,
            viewport.width,
            viewport.height
        );
        self.tuning = self.tuning.scaled_to(viewport);
        match &mut self.scene {
            Scene::Start(start) => start.bird_y *= sy,
            Scene::Playing(session) => session.rescale(sx, sy),
            Scene::Lost(_) => {}
        }
    }
}
