//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{blocks_spawn, obstacle_hits_player, past_despawn};
pub use state::{CarVisual, GamePhase, GameState, NeonColor, Obstacle, ObstacleKind};
pub use tick::{TickInput, tick};
