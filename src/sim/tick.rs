//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use rand::Rng;

use super::collision::{blocks_spawn, obstacle_hits_player, past_despawn};
use super::state::{GamePhase, GameState, NeonColor, Obstacle, ObstacleKind};
use crate::consts::*;
use crate::lerp_toward;

/// Input commands for a single tick (edge-triggered; the shell clears them
/// after each substep so a held key steers once per press)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Steer one lane left
    pub steer_left: bool,
    /// Steer one lane right
    pub steer_right: bool,
    /// Start or restart a run
    pub start: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    match state.phase {
        GamePhase::Menu => {
            // The car idles center lane on the title screen, engine running
            update_car_pose(state, dt);
            if input.start {
                state.start_run();
            }
        }

        GamePhase::Playing => {
            if input.steer_left {
                state.lane = (state.lane - 1).max(LANE_MIN);
            }
            if input.steer_right {
                state.lane = (state.lane + 1).min(LANE_MAX);
            }

            state.speed += SPEED_RAMP * dt;
            state.grid_offset = (state.grid_offset + state.speed * dt) % GRID_WRAP;
            update_car_pose(state, dt);

            // Advance the road and look for contact
            let speed = state.speed;
            let mut crashed = false;
            for obstacle in &mut state.obstacles {
                obstacle.z += speed * dt;
                if obstacle_hits_player(obstacle, state.lane) {
                    crashed = true;
                }
            }
            state.obstacles.retain(|o| !past_despawn(o.z));

            maybe_spawn_obstacle(state, dt);
            state.score += SCORE_RATE * dt;

            // A crash lands at the end of the frame, so the final tick still
            // spawns and scores like any other
            if crashed {
                log::info!("crashed at {} points", state.score_points());
                state.transition(GamePhase::GameOver);
            }
        }

        GamePhase::GameOver => {
            if input.start {
                state.start_run();
                return;
            }
            // The wreck tumbles while still drifting onto its lane center;
            // bob and tilt freeze, and the road and score hold still
            state.car.x = lerp_toward(state.car.x, state.target_x(), STEER_LERP_RATE, dt);
            state.car.yaw += CRASH_YAW_RATE * dt;
            state.car.pitch += CRASH_PITCH_RATE * dt;
        }
    }
}

/// Chase the lane target and apply the engine bob. The tilt leans the car
/// into whatever lateral distance it still has to cover.
fn update_car_pose(state: &mut GameState, dt: f32) {
    let target = state.target_x();
    state.car.x = lerp_toward(state.car.x, target, STEER_LERP_RATE, dt);
    state.car.tilt = (state.car.x - target) * CAR_TILT_FACTOR;
    state.car.y = CAR_RIDE_HEIGHT + (state.time_secs() * CAR_BOB_RATE).sin() * CAR_BOB_AMPLITUDE;
}

/// Roll for a new obstacle this tick. The chance scales with speed so road
/// density keeps up as the run accelerates.
fn maybe_spawn_obstacle(state: &mut GameState, dt: f32) {
    let chance = dt * state.speed / SPAWN_RATE_DIVISOR;
    if state.rng.random::<f32>() >= chance {
        return;
    }

    let lane = state.rng.random_range(LANE_MIN..=LANE_MAX);

    // A lane still occupied near the spawn plane swallows the roll entirely.
    // No reroll: the tick simply goes without, which thins out clusters.
    if state.obstacles.iter().any(|o| blocks_spawn(o, lane)) {
        return;
    }

    let kind = roll_kind(state.rng.random::<f32>());
    let color = if state.rng.random::<bool>() {
        NeonColor::Cyan
    } else {
        NeonColor::Magenta
    };
    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        lane,
        z: SPAWN_Z,
        kind,
        color,
    });
}

/// Pyramids half the time, the rest split between pillars and blocks
fn roll_kind(roll: f32) -> ObstacleKind {
    if roll < 0.5 {
        ObstacleKind::Pyramid
    } else if roll < 0.75 {
        ObstacleKind::Pillar
    } else {
        ObstacleKind::Block
    }
}
