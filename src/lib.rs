//! Neon Horizon - A synthwave lane-dodging driving game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, obstacles, collisions, scoring)
//! - `render`: WebGPU rendering pipeline
//! - `vibe`: AI DJ quote adapter (Gemini flavor text)

pub mod render;
pub mod sim;
pub mod vibe;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz so steering lands between frames)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Cap on catch-up substeps when a frame runs long
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Lateral distance between adjacent lanes (world units)
    pub const LANE_WIDTH: f32 = 3.0;
    /// Leftmost / rightmost lane index
    pub const LANE_MIN: i8 = -1;
    pub const LANE_MAX: i8 = 1;

    /// World scroll speed at the start of a run (units/s)
    pub const WORLD_SPEED_BASE: f32 = 40.0;
    /// Speed gain per second of driving
    pub const SPEED_RAMP: f32 = 0.5;

    /// Score gain per second of driving
    pub const SCORE_RATE: f32 = 10.0;

    /// Obstacles enter the world here and travel toward +z
    pub const SPAWN_Z: f32 = -120.0;
    /// Obstacles past this plane are recycled
    pub const DESPAWN_Z: f32 = 20.0;
    /// The player car sits at this z
    pub const PLAYER_Z: f32 = 0.0;

    /// Collision half-extents around the player (world units)
    pub const HIT_TOLERANCE_Z: f32 = 1.5;
    pub const HIT_TOLERANCE_X: f32 = 1.5;

    /// Spawn roll: chance per tick is `dt * speed / SPAWN_RATE_DIVISOR`
    pub const SPAWN_RATE_DIVISOR: f32 = 20.0;
    /// A fresh spawn is skipped while another obstacle is still this deep
    pub const SPAWN_GUARD_Z: f32 = -100.0;
    /// ...and within this lateral distance of the rolled lane
    pub const SPAWN_GUARD_X: f32 = 0.1;

    /// Render-side lane interpolation factor (per second)
    pub const STEER_LERP_RATE: f32 = 10.0;
    /// Ground grid repeats every this many units of scroll
    pub const GRID_WRAP: f32 = 20.0;

    /// Resting height of the car body group
    pub const CAR_RIDE_HEIGHT: f32 = 0.5;
    /// Engine bob: `y = CAR_RIDE_HEIGHT + sin(t * RATE) * AMPLITUDE`
    pub const CAR_BOB_RATE: f32 = 20.0;
    pub const CAR_BOB_AMPLITUDE: f32 = 0.02;
    /// Lean applied per unit of lateral catch-up distance
    pub const CAR_TILT_FACTOR: f32 = 0.1;
    /// Tumble rates while crashed (rad/s)
    pub const CRASH_YAW_RATE: f32 = 5.0;
    pub const CRASH_PITCH_RATE: f32 = 2.0;
}

/// Lateral world position of a lane
#[inline]
pub fn lane_to_x(lane: i8) -> f32 {
    lane as f32 * consts::LANE_WIDTH
}

/// Frame-rate-independent exponential approach of `current` toward `target`
#[inline]
pub fn lerp_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * (rate * dt).min(1.0)
}
