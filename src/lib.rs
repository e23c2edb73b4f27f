//! Hollow Run - hero vs. zombies on a bounded ground plane
//!
//! Core modules:
//! - `sim`: Simulation core (agents, collisions, fall model, game state machine)
//! - `settings`: Physical constants and difficulty presets as a configuration surface
//!
//! Rendering, windowing and input devices live outside this crate. A host feeds
//! [`sim::TickInput`] once per frame and reads back a [`sim::Snapshot`].

pub mod settings;
pub mod sim;

pub use settings::{ConfigError, Difficulty, SimConfig};

use glam::{Vec2, Vec3};

/// Compiled-in defaults for the configuration surface
pub mod consts {
    /// Fixed simulation timestep used by the headless host (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Half-extent of the square play area
    pub const WORLD_SIZE: f32 = 55.0;

    /// Hero defaults
    pub const HERO_LIVES_INITIAL: u32 = 5;
    pub const HERO_DAMAGE_DURATION: f32 = 2.0;
    pub const HERO_RADIUS: f32 = 2.0;
    pub const HERO_MOVE_SPEED: f32 = 6.0;
    pub const HERO_TURN_SPEED: f32 = std::f32::consts::FRAC_PI_2;
    /// Per-step velocity retention for knockback
    pub const HERO_FRICTION: f32 = 0.98;
    /// Knockback impulse on a zombie hit
    pub const PUSH_STRENGTH: f32 = 80.0;

    /// Zombie defaults
    pub const ZOMBIE_RADIUS: f32 = 1.5;
    pub const ZOMBIE_BASE_SPEED: f32 = 4.0;
    pub const SLOW_ZOMBIE_MULTIPLIER: f32 = 0.7;
    pub const SLOW_ZOMBIE_EVERY: usize = 3;
    /// Negative margin widens the zombie boundary
    pub const ZOMBIE_BOUNDARY_MARGIN: f32 = -1.0;

    /// Zombie-zombie impulse response
    pub const RESTITUTION: f32 = 0.5;
    pub const IMPULSE_SCALE: f32 = 80.0;

    /// Fall sequence
    pub const FALL_ROTATION_SPEED: f32 = 2.0;
    pub const FALL_DESCENT_SPEED: f32 = 5.0;
    pub const FALL_DEATH_DEPTH: f32 = -60.0;

    /// Coins
    pub const COLLECT_DISTANCE: f32 = 2.5;
    pub const COIN_HEIGHT: f32 = 1.2;

    /// Spawn layout
    pub const ZOMBIE_COUNT: usize = 10;
    pub const ZOMBIE_HEIGHT: f32 = 1.5;
    pub const SPAWN_CORNER_INSET: f32 = 8.0;
    pub const ZOMBIE_PAIR_SPACING: f32 = 2.0;
    /// Inset of the edge-guard zombies and the first-person clamp
    pub const EDGE_INSET: f32 = 3.0;
}

/// Normalize a heading to [0, 2π)
#[inline]
pub fn normalize_heading(heading: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = heading.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Unit direction vector for a heading: (sin h, 0, cos h)
#[inline]
pub fn heading_direction(heading: f32) -> Vec3 {
    Vec3::new(heading.sin(), 0.0, heading.cos())
}

/// Heading that faces along `velocity`, the inverse of moving by `-heading_direction`.
///
/// Returns `None` for a velocity with no horizontal component.
#[inline]
pub fn facing_heading(velocity: Vec3) -> Option<f32> {
    if xz(velocity).length_squared() <= f32::EPSILON {
        return None;
    }
    Some(normalize_heading((-velocity.x).atan2(-velocity.z)))
}

/// Project onto the ground plane
#[inline]
pub fn xz(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_normalize_heading_wraps() {
        assert!((normalize_heading(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((normalize_heading(-0.5) - (TAU - 0.5)).abs() < 1e-5);
        assert_eq!(normalize_heading(TAU), 0.0);
        assert_eq!(normalize_heading(-1e-9), 0.0);
    }

    #[test]
    fn test_facing_heading_matches_travel() {
        // Moving toward -Z means heading 0 (direction (0,0,1) negated)
        let h = facing_heading(Vec3::new(0.0, 0.0, -3.0)).unwrap();
        assert!(h.abs() < 1e-5);
        let h = facing_heading(Vec3::new(0.0, 0.0, 3.0)).unwrap();
        assert!((h - PI).abs() < 1e-5);
        assert!(facing_heading(Vec3::new(0.0, 5.0, 0.0)).is_none());
    }

    proptest! {
        #[test]
        fn prop_heading_in_range(h in -1000.0f32..1000.0) {
            let n = normalize_heading(h);
            prop_assert!((0.0..TAU).contains(&n));
        }

        #[test]
        fn prop_facing_heading_inverts_direction(h in 0.0f32..TAU) {
            let travel = -heading_direction(h) * 3.0;
            let back = facing_heading(travel).unwrap();
            let diff = (back - h).abs();
            prop_assert!(diff < 1e-3 || (TAU - diff) < 1e-3);
        }
    }
}
