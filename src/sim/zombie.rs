//! Zombie steering
//!
//! Grounded zombies chase the hero on the XZ plane. Falling zombies stop
//! steering and play the same fall sequence as the hero.

use glam::Vec3;

use super::boundary::advance_fall;
use super::state::Agent;
use crate::settings::SimConfig;
use crate::{facing_heading, xz};

/// Fixed speed pattern: every Nth zombie by spawn index is slow
pub fn speed_multiplier_for(index: usize, config: &SimConfig) -> f32 {
    if index.checked_rem(config.slow_zombie_every) == Some(0) {
        config.slow_zombie_multiplier
    } else {
        1.0
    }
}

/// Velocity a zombie wants in order to close on `target`
pub fn desired_velocity(zombie: &Agent, target: Vec3, config: &SimConfig) -> Vec3 {
    let to_target = xz(target - zombie.position).normalize_or_zero();
    Vec3::new(to_target.x, 0.0, to_target.y) * config.zombie_base_speed * zombie.speed_multiplier
}

/// Steer toward `target` and integrate one step.
///
/// Velocity is replaced by the steering velocity every step, so a collision
/// impulse only lasts until the next step. Heading follows the direction of travel.
pub fn steer_toward(zombie: &mut Agent, target: Vec3, dt: f32, config: &SimConfig) {
    let velocity = desired_velocity(zombie, target, config);
    zombie.velocity = velocity;
    zombie.position += velocity * dt;

    if let Some(heading) = facing_heading(velocity) {
        zombie.set_heading(heading);
    }
}

/// Advance one zombie for a step.
///
/// Returns true if the zombie fell past the death depth and was deactivated.
pub fn update_zombie(zombie: &mut Agent, hero_position: Vec3, dt: f32, config: &SimConfig) -> bool {
    if !zombie.active {
        return false;
    }
    if zombie.is_falling() {
        if advance_fall(zombie, dt, config) {
            zombie.active = false;
            zombie.velocity = Vec3::ZERO;
            return true;
        }
        return false;
    }
    steer_toward(zombie, hero_position, dt, config);
    false
}
