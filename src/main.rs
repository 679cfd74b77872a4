//! Lava Runner entry point
//!
//! Headless native host: runs the simulation on a fixed timestep with a
//! simple autopilot standing in for the player, then records the result.
//!
//! Usage: `lava-runner [seed] [tuning.json]`

use std::time::{SystemTime, UNIX_EPOCH};

use lava_runner::consts::*;
use lava_runner::highscores::format_elapsed;
use lava_runner::sim::{Contact, GameEvent, GameState, Shape, TickInput, tick};
use lava_runner::{HighScores, Tuning};

/// Longest run the demo simulates before giving up (seconds)
const MAX_RUN_SECS: f32 = 300.0;
/// Simulated frame time fed to the accumulator
const FRAME_DT: f32 = 1.0 / 50.0;
const HIGH_SCORES_FILE: &str = "lava_runner_scores.json";

/// Host-side loop state
struct Game {
    state: GameState,
    accumulator: f32,
    input: TickInput,
}

impl Game {
    fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: GameState::with_tuning(seed, tuning),
            accumulator: 0.0,
            input: TickInput::default(),
        }
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        self.accumulator += dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.autopilot();
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.jump = false;
            self.input.shape = None;
            self.input.pause = false;
            self.input.restart = false;

            // Stand-in physics: the floor is always under us, hazards by overlap
            self.input.contacts = self.state.detect_contacts();
            self.input.contacts.push(Contact::Surface { normal: glam::Vec3::Y });
        }
    }

    /// Pick a shape for the nearest obstacle ahead and steer back to the lane
    fn autopilot(&mut self) {
        let character = &self.state.character;
        let nearest = self
            .state
            .obstacles
            .iter()
            .filter(|o| o.position.z > character.position.z)
            .min_by(|a, b| {
                a.position
                    .z
                    .partial_cmp(&b.position.z)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        let wanted = match nearest {
            Some(o) if o.position.z - character.position.z < 8.0 => match o.spec.template {
                1 if o.pendulum.is_none() => Shape::Cube,
                2 if o.pendulum.is_none() => Shape::Flat,
                _ => Shape::Sphere,
            },
            _ => Shape::Sphere,
        };
        if wanted != character.shape {
            self.input.shape = Some(wanted);
        }

        // Drift away from full-width walls, recentre otherwise
        let dodge = nearest.is_some_and(|o| o.pendulum.is_none() && o.spec.template == 0);
        let target_x = if dodge { -4.0 } else { 0.0 };
        self.input.horizontal = (target_x - character.position.x).clamp(-1.0, 1.0);
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn main() {
    env_logger::init();
    log::info!("Lava Runner (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(unix_now);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    log::info!("Game initialized with seed: {}", seed);
    let mut game = Game::new(seed, tuning);

    let mut final_score = None;
    let mut simulated = 0.0;
    while simulated < MAX_RUN_SECS {
        game.update(FRAME_DT);
        simulated += FRAME_DT;

        for event in game.state.drain_events() {
            match event {
                GameEvent::Damaged { health, .. } => log::info!("Hit! health {}", health),
                GameEvent::GameOver { final_score: score } => final_score = Some(score),
                _ => {}
            }
        }
        if final_score.is_some() {
            break;
        }
    }

    let score = game.state.score.points();
    let elapsed = game.state.difficulty.elapsed;
    match final_score {
        Some(_) => println!("Game over: {} points in {}", score, format_elapsed(elapsed)),
        None => println!("Survived {}: {} points", format_elapsed(elapsed), score),
    }

    let mut scores = match HighScores::load(HIGH_SCORES_FILE) {
        Ok(scores) => scores,
        Err(e) => {
            log::warn!("Ignoring unreadable high scores: {}", e);
            HighScores::new()
        }
    };
    if let Some(rank) = scores.add_score(score, elapsed, unix_now()) {
        println!("New high score! Rank #{}", rank);
        if let Err(e) = scores.save(HIGH_SCORES_FILE) {
            log::warn!("Failed to save high scores: {}", e);
        }
    }
}
