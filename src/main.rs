//! Flappy Rush headless driver
//!
//! Runs the simulation on the autopilot at a fixed frame rate and prints the
//! run summary as JSON.
//!
//! Usage: `flappy-rush [--seed N] [--tuning FILE] [--seconds S]`

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

/// Fly the autopilot through one run and print its summary
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "flappy-rush", version)]
#[command(about = "Headless Flappy Rush: autopilot run with a JSON summary")]
struct Cli {
    /// RNG seed; the system clock when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Tuning JSON (distances relative to the 800x600 reference playfield)
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Seconds of play to simulate before giving up on the run
    #[arg(long, default_value_t = 60.0, value_parser = parse_seconds)]
    seconds: f32,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::CommandFactory;
    use clap::error::ErrorKind;
    use flappy_rush::audio::{AudioSink, LogAudio};
    use flappy_rush::consts::HEADLESS_FPS;
    use flappy_rush::sim::{Game, Scene, SceneKind, TickInput};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let tuning = match cli.tuning.as_deref().map(load_tuning).transpose() {
        Ok(tuning) => tuning.unwrap_or_default(),
        Err(msg) => Cli::command().error(ErrorKind::ValueValidation, msg).exit(),
    };
    let seed = cli.seed.unwrap_or_else(clock_seed);

    log::info!("Flappy Rush (headless) starting with seed {}", seed);

    let mut game = Game::new(seed, tuning);
    let mut audio = LogAudio::default();
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let dt = 1.0 / HEADLESS_FPS;
    let frames = (cli.seconds * HEADLESS_FPS).ceil() as u64;

    for _ in 0..frames {
        let out = game.frame(&input, dt);
        for cue in out.sounds {
            audio.play(cue);
        }
        if game.kind() == SceneKind::Lost {
            break;
        }
    }

    let summary = match game.scene() {
        Scene::Lost(summary) => Some(summary.clone()),
        Scene::Playing(session) => {
            log::info!("Time limit reached with the run still alive");
            Some(session.summary(None))
        }
        Scene::Start(_) => None,
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize summary: {}", e),
    }
    log::info!("{} sound cues played", audio.played);
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_seconds(s: &str) -> Result<f32, String> {
    let seconds: f32 = s.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err(format!("{} is not a positive number of seconds", s))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &std::path::Path) -> Result<flappy_rush::Tuning, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("can't read tuning {}: {}", path.display(), e))?;
    flappy_rush::Tuning::from_json(&text)
        .map_err(|e| format!("bad tuning {}: {}", path.display(), e))
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives `flappy_rush::sim::Game` directly
}
