//! Property tests for the driving simulation.
//!
//! The unit tests in `src/sim/` pin down exact behaviors; these hammer the
//! tick with arbitrary seeds and input streams to check the invariants that
//! should hold no matter what the driver does.

use proptest::prelude::*;

use neon_horizon::consts::*;
use neon_horizon::sim::{
    GamePhase, GameState, NeonColor, Obstacle, ObstacleKind, TickInput, obstacle_hits_player,
    tick,
};

fn steer_input() -> impl Strategy<Value = TickInput> {
    (any::<bool>(), any::<bool>()).prop_map(|(left, right)| TickInput {
        steer_left: left,
        steer_right: right,
        start: false,
    })
}

/// A state one start press into a fresh run
fn playing_state(seed: u64) -> GameState {
    let mut state = GameState::new(seed);
    let start = TickInput {
        start: true,
        ..TickInput::default()
    };
    tick(&mut state, &start, SIM_DT);
    state
}

proptest! {
    #[test]
    fn score_never_decreases(seed: u64, inputs in prop::collection::vec(steer_input(), 1..400)) {
        let mut state = playing_state(seed);
        let mut last = state.score;
        for input in &inputs {
            if state.phase != GamePhase::Playing {
                break;
            }
            tick(&mut state, input, SIM_DT);
            prop_assert!(state.score >= last);
            last = state.score;
        }
    }

    #[test]
    fn lane_stays_on_the_road(seed: u64, inputs in prop::collection::vec(steer_input(), 1..400)) {
        let mut state = playing_state(seed);
        for input in &inputs {
            tick(&mut state, input, SIM_DT);
            prop_assert!((LANE_MIN..=LANE_MAX).contains(&state.lane));
        }
    }

    #[test]
    fn obstacles_only_move_toward_the_player(seed: u64, ticks in 1usize..600) {
        let mut state = playing_state(seed);
        let cruise = TickInput::default();
        for _ in 0..ticks {
            if state.phase != GamePhase::Playing {
                break;
            }
            let before: Vec<(u32, f32)> = state.obstacles.iter().map(|o| (o.id, o.z)).collect();
            tick(&mut state, &cruise, SIM_DT);
            for (id, old_z) in before {
                if let Some(now) = state.obstacles.iter().find(|o| o.id == id) {
                    prop_assert!(now.z > old_z);
                }
            }
        }
    }

    #[test]
    fn nothing_outlives_the_despawn_plane(seed: u64, ticks in 1usize..600) {
        let mut state = playing_state(seed);
        let cruise = TickInput::default();
        for _ in 0..ticks {
            if state.phase != GamePhase::Playing {
                break;
            }
            tick(&mut state, &cruise, SIM_DT);
            for o in &state.obstacles {
                prop_assert!(o.z < DESPAWN_Z);
            }
        }
    }

    #[test]
    fn collision_needs_both_axes(lane in -1i8..=1, player_lane in -1i8..=1, z in -150.0f32..30.0) {
        let obstacle = Obstacle {
            id: 0,
            lane,
            z,
            kind: ObstacleKind::Block,
            color: NeonColor::Cyan,
        };
        // Lanes sit three units apart, so lateral overlap means the same lane
        let longitudinal = (z - PLAYER_Z).abs() < HIT_TOLERANCE_Z;
        let expected = longitudinal && lane == player_lane;
        prop_assert_eq!(obstacle_hits_player(&obstacle, player_lane), expected);
    }

    #[test]
    fn restart_always_resets_the_run(seed: u64, warmup in 1usize..300) {
        let mut state = playing_state(seed);
        let cruise = TickInput::default();
        for _ in 0..warmup {
            tick(&mut state, &cruise, SIM_DT);
        }
        // Force the wreck rather than waiting for one
        if state.phase == GamePhase::Playing {
            state.transition(GamePhase::GameOver);
        }
        let start = TickInput {
            start: true,
            ..TickInput::default()
        };
        tick(&mut state, &start, SIM_DT);

        prop_assert_eq!(state.phase, GamePhase::Playing);
        prop_assert_eq!(state.lane, 0);
        prop_assert_eq!(state.score, 0.0);
        prop_assert_eq!(state.speed, WORLD_SPEED_BASE);
        prop_assert!(state.obstacles.is_empty());
    }

    #[test]
    fn same_seed_same_road(seed: u64, inputs in prop::collection::vec(steer_input(), 1..200)) {
        let mut a = playing_state(seed);
        let mut b = playing_state(seed);
        for input in &inputs {
            tick(&mut a, input, SIM_DT);
            tick(&mut b, input, SIM_DT);
        }
        prop_assert_eq!(a.phase, b.phase);
        prop_assert_eq!(a.lane, b.lane);
        prop_assert_eq!(a.score.to_bits(), b.score.to_bits());
        prop_assert_eq!(a.obstacles.len(), b.obstacles.len());
        for (oa, ob) in a.obstacles.iter().zip(&b.obstacles) {
            prop_assert_eq!(oa.id, ob.id);
            prop_assert_eq!(oa.lane, ob.lane);
            prop_assert_eq!(oa.z.to_bits(), ob.z.to_bits());
        }
    }
}
