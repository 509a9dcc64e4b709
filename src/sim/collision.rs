//! Collision and culling predicates
//!
//! All functions here are pure: they read positions and return booleans,
//! never mutating state. The tick decides what to do with the answers.

use crate::consts::*;
use crate::lane_to_x;
use crate::sim::state::Obstacle;

/// Check whether an obstacle overlaps the player's hit window this tick
///
/// Both axes must overlap: close enough along the road AND in (or leaning
/// into) the player's lane. The check uses the logical lane, not the
/// render-side car pose, so a swerve in progress already counts as committed.
pub fn obstacle_hits_player(obstacle: &Obstacle, player_lane: i8) -> bool {
    within_longitudinal(obstacle.z) && within_lateral(obstacle.x(), lane_to_x(player_lane))
}

/// Whether `z` is inside the player's hit window along the road
#[inline]
pub fn within_longitudinal(z: f32) -> bool {
    (z - PLAYER_Z).abs() < HIT_TOLERANCE_Z
}

/// Whether two lateral positions overlap within the hit tolerance
#[inline]
pub fn within_lateral(x: f32, player_x: f32) -> bool {
    (x - player_x).abs() < HIT_TOLERANCE_X
}

/// Whether an obstacle has scrolled behind the camera and can be dropped
#[inline]
pub fn past_despawn(z: f32) -> bool {
    z >= DESPAWN_Z
}

/// Check whether an existing obstacle vetoes a spawn in `lane`
///
/// Only obstacles still deep in the spawn zone count; anything that has
/// advanced past SPAWN_GUARD_Z leaves the lane open again.
pub fn blocks_spawn(obstacle: &Obstacle, lane: i8) -> bool {
    obstacle.z < SPAWN_GUARD_Z && (obstacle.x() - lane_to_x(lane)).abs() < SPAWN_GUARD_X
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{NeonColor, ObstacleKind};

    fn obstacle(lane: i8, z: f32) -> Obstacle {
        Obstacle {
            id: 1,
            lane,
            z,
            kind: ObstacleKind::Block,
            color: NeonColor::Cyan,
        }
    }

    #[test]
    fn test_same_lane_contact_hits() {
        assert!(obstacle_hits_player(&obstacle(0, 0.0), 0));
        assert!(obstacle_hits_player(&obstacle(-1, -1.0), -1));
        assert!(obstacle_hits_player(&obstacle(1, 1.4), 1));
    }

    #[test]
    fn test_adjacent_lane_never_hits() {
        // Lane centers are 3 apart, twice the lateral tolerance
        assert!(!obstacle_hits_player(&obstacle(1, 0.0), 0));
        assert!(!obstacle_hits_player(&obstacle(-1, 0.0), 0));
        assert!(!obstacle_hits_player(&obstacle(0, 0.0), 1));
    }

    #[test]
    fn test_hit_window_is_open_interval() {
        assert!(!within_longitudinal(HIT_TOLERANCE_Z));
        assert!(!within_longitudinal(-HIT_TOLERANCE_Z));
        assert!(within_longitudinal(HIT_TOLERANCE_Z - 0.01));
        assert!(!within_lateral(HIT_TOLERANCE_X, 0.0));
        assert!(within_lateral(HIT_TOLERANCE_X - 0.01, 0.0));
    }

    #[test]
    fn test_despawn_boundary() {
        assert!(past_despawn(DESPAWN_Z));
        assert!(past_despawn(DESPAWN_Z + 5.0));
        assert!(!past_despawn(DESPAWN_Z - 0.1));
    }

    #[test]
    fn test_spawn_guard_window() {
        // Deep in the spawn zone, same lane: vetoes
        assert!(blocks_spawn(&obstacle(0, -119.0), 0));
        // Advanced past the guard plane: lane is open again
        assert!(!blocks_spawn(&obstacle(0, -100.0), 0));
        assert!(!blocks_spawn(&obstacle(0, -50.0), 0));
        // Different lane: no veto even when deep
        assert!(!blocks_spawn(&obstacle(1, -119.0), 0));
    }
}
