//! Play-area boundary and the falling-through-the-world sequence

use glam::Vec3;

use super::state::Agent;
use crate::settings::SimConfig;

/// True if `position` lies outside the square `world_size - margin` in X or Z.
///
/// Y is ignored. A negative margin widens the boundary.
#[inline]
pub fn is_out_of_bounds(position: Vec3, world_size: f32, margin: f32) -> bool {
    let boundary = world_size - margin;
    position.x.abs() > boundary || position.z.abs() > boundary
}

/// Start the fall sequence if the agent has left the play area.
///
/// Returns true only when the agent starts falling on this call.
pub fn check_boundary(agent: &mut Agent, world_size: f32, margin: f32) -> bool {
    if agent.is_falling() || !is_out_of_bounds(agent.position, world_size, margin) {
        return false;
    }
    agent.start_falling()
}

/// Animate one step of the fall: spin and descend.
///
/// Returns true once the agent is at or below the death depth.
pub fn advance_fall(agent: &mut Agent, dt: f32, config: &SimConfig) -> bool {
    if !agent.is_falling() {
        return false;
    }
    agent.fall_rotation += dt * config.fall_rotation_speed;
    agent.position.y -= dt * config.fall_descent_speed;
    agent.position.y <= config.fall_death_depth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_symmetric() {
        assert!(!is_out_of_bounds(Vec3::new(54.9, 0.0, -54.9), 55.0, 0.0));
        assert!(is_out_of_bounds(Vec3::new(55.1, 0.0, 0.0), 55.0, 0.0));
        assert!(is_out_of_bounds(Vec3::new(0.0, 0.0, -55.1), 55.0, 0.0));
        // Y never matters
        assert!(!is_out_of_bounds(Vec3::new(0.0, -500.0, 0.0), 55.0, 0.0));
    }

    #[test]
    fn test_negative_margin_is_more_tolerant() {
        let pos = Vec3::new(55.5, 0.0, 0.0);
        assert!(is_out_of_bounds(pos, 55.0, 0.0));
        assert!(!is_out_of_bounds(pos, 55.0, -1.0));
    }

    #[test]
    fn test_check_boundary_fires_once() {
        let mut agent = Agent::new(Vec3::new(60.0, 0.0, 0.0), 1.0);
        assert!(check_boundary(&mut agent, 55.0, 0.0));
        assert!(!check_boundary(&mut agent, 55.0, 0.0));

        // Walking back inside does not clear the flag
        agent.position = Vec3::ZERO;
        assert!(!check_boundary(&mut agent, 55.0, 0.0));
        assert!(agent.is_falling());
    }

    #[test]
    fn test_fall_descends_until_death_depth() {
        let config = SimConfig::default();
        let mut agent = Agent::new(Vec3::new(60.0, 0.0, 0.0), 1.0);
        assert!(!advance_fall(&mut agent, 0.1, &config));
        assert_eq!(agent.position.y, 0.0);

        agent.start_falling();
        let mut last_y = agent.position.y;
        let mut steps = 0;
        while !advance_fall(&mut agent, 0.1, &config) {
            assert!(agent.position.y < last_y);
            last_y = agent.position.y;
            steps += 1;
            assert!(steps < 1000);
        }
        assert!(agent.position.y <= config.fall_death_depth);
        assert!(agent.fall_rotation > 0.0);
    }
}
