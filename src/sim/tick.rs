//! Fixed timestep simulation tick
//!
//! Order within a tick: session input, difficulty, spawn, obstacle
//! advance/evict, pendulums, character, score, death observation.

use super::character::{DamageOutcome, Shape};
use super::session::SessionState;
use super::state::{Contact, GameEvent, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal axis in [-1, 1]
    pub horizontal: f32,
    /// Jump pressed this tick
    pub jump: bool,
    /// Shape selected this tick
    pub shape: Option<Shape>,
    /// Pause toggle
    pub pause: bool,
    /// Restart (honoured once the session is over)
    pub restart: bool,
    /// Contacts reported by the physics host since the last tick
    pub contacts: Vec<Contact>,
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.restart && state.session.state == SessionState::Over {
        state.restart_game();
        return;
    }

    if input.pause {
        state.toggle_pause();
    }

    // Paused and over freeze every accumulator
    if !state.session.is_running() {
        return;
    }

    let dt = dt.max(0.0) * state.session.time_scale;
    state.time_ticks += 1;

    state.difficulty.tick(dt, &state.tuning.difficulty);

    spawn_and_scroll(state, dt);

    state.obstacles.update_pendulums(dt);

    update_character(state, input, dt);

    state
        .score
        .advance(state.difficulty.scroll_speed * dt, state.difficulty.elapsed, &state.tuning.score);

    state.observe_character();
}

/// Spawn decision, then obstacle advancement. Evictions reach the spawner
/// before anything else reads its cursor.
fn spawn_and_scroll(state: &mut GameState, dt: f32) {
    let GameState {
        tuning,
        rng,
        difficulty,
        spawner,
        obstacles,
        events,
        next_id,
        ..
    } = state;

    let spawned = spawner.maybe_spawn(dt, difficulty, &tuning.spawn, obstacles, rng, || {
        let id = *next_id;
        *next_id += 1;
        id
    });
    if let Some(obstacle) = spawned.and_then(|id| obstacles.get(id)) {
        events.push(GameEvent::ObstacleSpawned {
            id: obstacle.id,
            archetype: obstacle.spec.archetype,
        });
    }

    for id in obstacles.advance(dt, difficulty.scroll_speed) {
        spawner.on_evicted(id);
        events.push(GameEvent::ObstacleEvicted { id });
    }
}

fn update_character(state: &mut GameState, input: &TickInput, dt: f32) {
    let GameState {
        character,
        obstacles,
        events,
        ..
    } = state;

    character.move_horizontal(input.horizontal, dt);

    if input.jump {
        if let Some(impulse) = character.jump() {
            events.push(GameEvent::Jumped { impulse });
        }
    }

    if let Some(shape) = input.shape {
        if shape != character.shape && character.change_shape(shape) {
            events.push(GameEvent::ShapeChanged { shape });
        }
    }

    for contact in &input.contacts {
        // Disabled colliders generate no contacts
        if !character.collider_enabled {
            break;
        }
        match *contact {
            Contact::Surface { normal } => character.on_contact(normal),
            Contact::Hazard { obstacle } => {
                // Already evicted: nothing to hit
                let Some(hazard) = obstacles.get(obstacle) else {
                    continue;
                };
                let (amount, outcome) = if hazard.deadly {
                    (character.health, character.die())
                } else {
                    (hazard.damage, character.take_damage(hazard.damage))
                };
                match outcome {
                    DamageOutcome::Hurt => events.push(GameEvent::Damaged {
                        amount,
                        health: character.health,
                    }),
                    DamageOutcome::Died => events.push(GameEvent::Died),
                    DamageOutcome::Ignored => {}
                }
            }
        }
    }
}
