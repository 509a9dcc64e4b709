//! Game state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::lane_to_x;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for the player to start a run
    Menu,
    /// Active driving
    Playing,
    /// Crashed, waiting for a restart
    GameOver,
}

impl GamePhase {
    /// Whether a change from `self` to `to` is legal
    pub fn can_transition(self, to: GamePhase) -> bool {
        matches!(
            (self, to),
            (GamePhase::Menu, GamePhase::Playing)
                | (GamePhase::Playing, GamePhase::GameOver)
                | (GamePhase::GameOver, GamePhase::Playing)
        )
    }
}

/// Obstacle shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Pyramid,
    Pillar,
    Block,
}

/// Neon accent palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeonColor {
    Cyan,
    Magenta,
}

/// A hazard scrolling toward the player along +z
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub id: u32,
    pub lane: i8,
    pub z: f32,
    pub kind: ObstacleKind,
    pub color: NeonColor,
}

impl Obstacle {
    /// Lateral world position
    #[inline]
    pub fn x(&self) -> f32 {
        lane_to_x(self.lane)
    }
}

/// Render-side car pose. Collision logic never reads this; it tracks the
/// logical lane with a lag so steering reads as a swerve instead of a snap.
#[derive(Debug, Clone, Copy)]
pub struct CarVisual {
    /// Interpolated x chasing `lane * LANE_WIDTH`
    pub x: f32,
    /// Ride height with engine bob applied
    pub y: f32,
    /// Lean into the swerve, frozen at the moment of a crash
    pub tilt: f32,
    /// Tumble accumulated while crashed
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for CarVisual {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: CAR_RIDE_HEIGHT,
            tilt: 0.0,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

/// Complete game state (deterministic)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn RNG, advanced only inside the tick
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Player lane (LANE_MIN..=LANE_MAX)
    pub lane: i8,
    /// World scroll speed (units/s)
    pub speed: f32,
    /// Score accumulator, floored for display
    pub score: f32,
    /// Live obstacles (sorted by id)
    pub obstacles: Vec<Obstacle>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ground grid scroll, wraps at GRID_WRAP
    pub grid_offset: f32,
    /// Car pose for the renderer
    pub car: CarVisual,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed, sitting at the menu
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            lane: 0,
            speed: WORLD_SPEED_BASE,
            score: 0.0,
            obstacles: Vec::new(),
            time_ticks: 0,
            grid_offset: 0.0,
            car: CarVisual::default(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Apply a phase change if legal. Illegal requests are logged and dropped.
    pub fn transition(&mut self, to: GamePhase) -> bool {
        if !self.phase.can_transition(to) {
            log::warn!("rejected phase transition {:?} -> {:?}", self.phase, to);
            return false;
        }
        self.phase = to;
        true
    }

    /// Begin a run. Legal from Menu or GameOver; the road resets, the RNG
    /// stream continues.
    pub fn start_run(&mut self) -> bool {
        if !self.transition(GamePhase::Playing) {
            return false;
        }
        self.lane = 0;
        self.speed = WORLD_SPEED_BASE;
        self.score = 0.0;
        self.obstacles.clear();
        self.car = CarVisual::default();
        true
    }

    /// Displayed score (whole points)
    pub fn score_points(&self) -> u32 {
        self.score as u32
    }

    /// Seconds of simulation time elapsed
    pub fn time_secs(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    /// Lateral world position the car steers toward
    pub fn target_x(&self) -> f32 {
        lane_to_x(self.lane)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_transitions() {
        assert!(GamePhase::Menu.can_transition(GamePhase::Playing));
        assert!(GamePhase::Playing.can_transition(GamePhase::GameOver));
        assert!(GamePhase::GameOver.can_transition(GamePhase::Playing));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!GamePhase::Menu.can_transition(GamePhase::GameOver));
        assert!(!GamePhase::Playing.can_transition(GamePhase::Menu));
        assert!(!GamePhase::GameOver.can_transition(GamePhase::Menu));
        assert!(!GamePhase::Menu.can_transition(GamePhase::Menu));
        assert!(!GamePhase::Playing.can_transition(GamePhase::Playing));
    }

    #[test]
    fn test_rejected_transition_leaves_state_alone() {
        let mut state = GameState::new(1);
        assert!(!state.transition(GamePhase::GameOver));
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_start_run_resets_the_road() {
        let mut state = GameState::new(2);
        assert!(state.start_run());
        state.lane = 1;
        state.speed = 90.0;
        state.score = 123.4;
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            lane: 0,
            z: -30.0,
            kind: ObstacleKind::Pillar,
            color: NeonColor::Cyan,
        });

        assert!(state.transition(GamePhase::GameOver));
        assert!(state.start_run());

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lane, 0);
        assert_eq!(state.speed, WORLD_SPEED_BASE);
        assert_eq!(state.score, 0.0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.car.x, 0.0);
        assert_eq!(state.car.yaw, 0.0);
    }

    #[test]
    fn test_start_run_rejected_while_playing() {
        let mut state = GameState::new(3);
        assert!(state.start_run());
        state.score = 55.0;
        assert!(!state.start_run());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 55.0);
    }

    #[test]
    fn test_score_points_floors() {
        let mut state = GameState::new(4);
        state.score = 41.97;
        assert_eq!(state.score_points(), 41);
    }

    #[test]
    fn test_entity_ids_monotonic() {
        let mut state = GameState::new(5);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }
}
