//! Session controller: running, paused, over
//!
//! Over is entered when the character dies (observed once) and left only by
//! an explicit reset.

use serde::{Deserialize, Serialize};

use super::character::Character;
use super::difficulty::DifficultyState;
use super::state::{GameEvent, GameState, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Running,
    Paused,
    Over,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub state: SessionState,
    /// Multiplier on simulation dt; 0 while paused or over
    pub time_scale: f32,
    /// Score at the moment the session ended
    pub final_score: Option<f32>,
    death_observed: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Running,
            time_scale: 1.0,
            final_score: None,
            death_observed: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn is_over(&self) -> bool {
        self.state == SessionState::Over
    }
}

impl GameState {
    pub fn pause(&mut self) {
        if self.session.state != SessionState::Running {
            return;
        }
        self.session.state = SessionState::Paused;
        self.session.time_scale = 0.0;
        self.events.push(GameEvent::Paused);
        log::info!("Game paused");
    }

    pub fn resume(&mut self) {
        if self.session.state != SessionState::Paused {
            return;
        }
        self.session.state = SessionState::Running;
        self.session.time_scale = 1.0;
        self.events.push(GameEvent::Resumed);
        log::info!("Game resumed");
    }

    pub fn toggle_pause(&mut self) {
        match self.session.state {
            SessionState::Running => self.pause(),
            SessionState::Paused => self.resume(),
            SessionState::Over => {}
        }
    }

    /// End the session: freeze time, disable spawner and character, surface the score
    pub fn game_over(&mut self) {
        if self.session.is_over() {
            return;
        }
        let final_score = self.score.value;
        self.session.state = SessionState::Over;
        self.session.time_scale = 0.0;
        self.session.final_score = Some(final_score);
        self.spawner.enabled = false;
        self.character.enabled = false;
        self.events.push(GameEvent::GameOver { final_score });
        log::info!(
            "Game over after {:.1}s with score {}",
            self.difficulty.elapsed,
            self.score.points()
        );
    }

    /// Edge-triggered reaction to the character's death
    pub fn observe_character(&mut self) {
        if self.character.dead && !self.session.death_observed {
            self.session.death_observed = true;
            self.game_over();
        }
    }

    /// Reinitialize every component for a fresh run
    pub fn reset(&mut self) {
        let destroyed = self.obstacles.clear();
        self.difficulty = DifficultyState::new(&self.tuning.difficulty);
        self.score = Score::default();
        self.spawner.reset(&self.tuning.spawn);
        self.character = Character::new(&self.tuning.character);
        self.touching.clear();
        self.session = Session::new();
        log::info!("Session reset ({} obstacles destroyed)", destroyed);
    }

    /// Reset and ask the scene host to reload
    pub fn restart_game(&mut self) {
        self.reset();
        self.events.push(GameEvent::Restarted);
    }
}
