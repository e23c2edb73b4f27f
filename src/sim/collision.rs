//! Collision detection and response between agents
//!
//! All agent tests are circles on the XZ plane. Coin pickup is a plain 3D
//! distance check with no physical response.

use glam::Vec3;

use super::state::{Agent, Coin};
use crate::xz;

/// Distances below this are treated as coincident; no normal can be derived.
const COINCIDENT_EPSILON: f32 = 1e-5;

/// Result of an overlap test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the second circle toward the first (Y = 0)
    pub normal: Vec3,
    /// Center distance on the XZ plane
    pub distance: f32,
    /// Overlap depth (sum of radii minus distance)
    pub penetration: f32,
}

/// Circle-circle overlap on the XZ plane.
///
/// Returns `None` when the circles do not overlap, or when their centers
/// coincide so that no contact normal exists.
pub fn circle_contact(a_pos: Vec3, a_radius: f32, b_pos: Vec3, b_radius: f32) -> Option<Contact> {
    let delta = xz(a_pos - b_pos);
    let distance = delta.length();
    let sum_radius = a_radius + b_radius;

    if distance >= sum_radius || distance < COINCIDENT_EPSILON {
        return None;
    }

    let n = delta / distance;
    Some(Contact {
        normal: Vec3::new(n.x, 0.0, n.y),
        distance,
        penetration: sum_radius - distance,
    })
}

/// Resolve one zombie pair with a restitution impulse (equal masses).
///
/// Separating pairs are left alone. Overlapping pairs get `±j * normal * impulse_scale`
/// added to their velocities, are pushed apart by half the overlap each, and turn
/// to face their new direction of travel. Returns true if the pair was resolved.
pub fn resolve_pair(a: &mut Agent, b: &mut Agent, restitution: f32, impulse_scale: f32) -> bool {
    let Some(contact) = circle_contact(a.position, a.radius(), b.position, b.radius()) else {
        return false;
    };

    let relative = a.velocity - b.velocity;
    let velocity_along_normal = relative.dot(contact.normal);
    if velocity_along_normal > 0.0 {
        return false;
    }

    let j = -(1.0 + restitution) * velocity_along_normal / 2.0;
    let impulse = contact.normal * j * impulse_scale;
    a.velocity += impulse;
    b.velocity -= impulse;

    let correction = contact.normal * (contact.penetration / 2.0);
    a.position += correction;
    b.position -= correction;

    if let Some(heading) = crate::facing_heading(a.velocity) {
        a.set_heading(heading);
    }
    if let Some(heading) = crate::facing_heading(b.velocity) {
        b.set_heading(heading);
    }
    true
}

/// Resolve every overlapping pair of grounded zombies, in index order.
///
/// Returns the number of pairs resolved.
pub fn collide_zombies(zombies: &mut [Agent], restitution: f32, impulse_scale: f32) -> usize {
    let mut resolved = 0;
    for j in 1..zombies.len() {
        let (head, tail) = zombies.split_at_mut(j);
        let second = &mut tail[0];
        if !second.is_grounded() {
            continue;
        }
        for first in head.iter_mut() {
            if !first.is_grounded() {
                continue;
            }
            if resolve_pair(first, second, restitution, impulse_scale) {
                resolved += 1;
            }
        }
    }
    resolved
}

/// First grounded zombie touching the hero, with the unit push direction
/// (zombie toward hero).
///
/// Coincident centers still count as a hit; the push is zero in that case.
pub fn hero_zombie_contact(hero: &Agent, zombies: &[Agent]) -> Option<(usize, Vec3)> {
    zombies.iter().enumerate().find_map(|(i, zombie)| {
        if !zombie.is_grounded() {
            return None;
        }
        let delta = xz(hero.position - zombie.position);
        if delta.length() >= hero.radius() + zombie.radius() {
            return None;
        }
        let push = delta.normalize_or_zero();
        Some((i, Vec3::new(push.x, 0.0, push.y)))
    })
}

/// Deactivate every active coin within `collect_distance` of the hero.
///
/// Returns the indices collected this call.
pub fn collect_coins(hero_position: Vec3, coins: &mut [Coin], collect_distance: f32) -> Vec<usize> {
    let mut collected = Vec::new();
    for (i, coin) in coins.iter_mut().enumerate() {
        if coin.active && coin.position.distance(hero_position) < collect_distance {
            coin.active = false;
            collected.push(i);
        }
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn moving(x: f32, z: f32, vx: f32, vz: f32) -> Agent {
        let mut agent = Agent::new(Vec3::new(x, 1.5, z), 1.5);
        agent.velocity = Vec3::new(vx, 0.0, vz);
        agent
    }

    #[test]
    fn test_circle_contact() {
        let hit = circle_contact(Vec3::new(2.0, 0.0, 0.0), 1.5, Vec3::ZERO, 1.5).unwrap();
        assert!((hit.normal - Vec3::X).length() < 1e-6);
        assert!((hit.penetration - 1.0).abs() < 1e-6);

        assert!(circle_contact(Vec3::new(3.0, 0.0, 0.0), 1.5, Vec3::ZERO, 1.5).is_none());
        // Height difference is ignored
        assert!(circle_contact(Vec3::new(2.0, 10.0, 0.0), 1.5, Vec3::ZERO, 1.5).is_some());
    }

    #[test]
    fn test_coincident_agents_are_skipped() {
        assert!(circle_contact(Vec3::ZERO, 1.0, Vec3::ZERO, 1.0).is_none());

        let mut a = moving(0.0, 0.0, 1.0, 0.0);
        let mut b = moving(0.0, 0.0, -1.0, 0.0);
        assert!(!resolve_pair(&mut a, &mut b, 0.5, 80.0));
        assert!(a.velocity.is_finite() && b.velocity.is_finite());
        assert_eq!(a.velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_approaching_pair_bounces_apart() {
        let mut a = moving(-1.0, 0.0, 2.0, 0.0);
        let mut b = moving(1.0, 0.0, -2.0, 0.0);
        assert!(resolve_pair(&mut a, &mut b, 0.5, 1.0));

        assert!(a.velocity.x < 0.0);
        assert!(b.velocity.x > 0.0);
        // De-penetrated to exactly touching
        let gap = (a.position - b.position).length();
        assert!((gap - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_separating_pair_untouched() {
        let mut a = moving(-1.0, 0.0, -2.0, 0.0);
        let mut b = moving(1.0, 0.0, 2.0, 0.0);
        let (a0, b0) = (a.clone(), b.clone());
        assert!(!resolve_pair(&mut a, &mut b, 0.5, 80.0));
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_collide_zombies_skips_falling_and_inactive() {
        let mut zombies = vec![moving(-1.0, 0.0, 2.0, 0.0), moving(1.0, 0.0, -2.0, 0.0)];
        zombies[1].start_falling();
        assert_eq!(collide_zombies(&mut zombies, 0.5, 80.0), 0);

        let mut zombies = vec![moving(-1.0, 0.0, 2.0, 0.0), moving(1.0, 0.0, -2.0, 0.0)];
        zombies[0].active = false;
        assert_eq!(collide_zombies(&mut zombies, 0.5, 80.0), 0);

        let mut zombies = vec![moving(-1.0, 0.0, 2.0, 0.0), moving(1.0, 0.0, -2.0, 0.0)];
        assert_eq!(collide_zombies(&mut zombies, 0.5, 80.0), 1);
    }

    #[test]
    fn test_hero_contact_push_direction() {
        let hero = Agent::new(Vec3::new(0.0, 0.0, 2.0), 2.0);
        let zombies = vec![moving(30.0, 0.0, 0.0, 0.0), moving(0.0, 0.0, 0.0, 0.0)];
        let (index, push) = hero_zombie_contact(&hero, &zombies).unwrap();
        assert_eq!(index, 1);
        assert!((push - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_hero_contact_counts_coincident_zombie() {
        let hero = Agent::new(Vec3::new(5.0, 0.0, 5.0), 2.0);
        let zombies = vec![moving(5.0, 5.0, 0.0, 0.0)];
        let (index, push) = hero_zombie_contact(&hero, &zombies).unwrap();
        assert_eq!(index, 0);
        assert_eq!(push, Vec3::ZERO);
    }

    #[test]
    fn test_collect_coins_one_shot() {
        let mut coins = vec![
            Coin::new(Vec3::new(0.0, 1.2, 0.0)),
            Coin::new(Vec3::new(20.0, 1.2, 0.0)),
        ];
        assert_eq!(collect_coins(Vec3::ZERO, &mut coins, 2.5), vec![0]);
        assert!(!coins[0].active && coins[1].active);
        assert!(collect_coins(Vec3::ZERO, &mut coins, 2.5).is_empty());
    }

    proptest! {
        #[test]
        fn prop_elastic_collision_conserves_momentum(
            ax in -1.4f32..0.0, az in -1.0f32..1.0,
            bx in 0.0f32..1.4, bz in -1.0f32..1.0,
            avx in -5.0f32..5.0, avz in -5.0f32..5.0,
            bvx in -5.0f32..5.0, bvz in -5.0f32..5.0,
            scale in 0.1f32..80.0,
        ) {
            let mut a = moving(ax, az, avx, avz);
            let mut b = moving(bx, bz, bvx, bvz);
            let before = a.velocity + b.velocity;
            resolve_pair(&mut a, &mut b, 1.0, scale);
            let after = a.velocity + b.velocity;
            let tolerance = 1e-3 * (1.0 + before.length() + scale);
            prop_assert!((after - before).length() < tolerance);
        }

        #[test]
        fn prop_resolution_never_produces_nan(
            x in -3.0f32..3.0, z in -3.0f32..3.0,
            vx in -5.0f32..5.0, vz in -5.0f32..5.0,
        ) {
            let mut a = moving(x, z, vx, vz);
            let mut b = moving(0.0, 0.0, -vx, -vz);
            resolve_pair(&mut a, &mut b, 0.5, 80.0);
            prop_assert!(a.position.is_finite() && a.velocity.is_finite());
            prop_assert!(b.position.is_finite() && b.velocity.is_finite());
        }
    }
}
