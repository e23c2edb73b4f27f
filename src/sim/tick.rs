//! Per-frame simulation step
//!
//! [`tick`] runs one step to completion. The order inside a PLAYING step is part
//! of the public contract:
//!
//! 1. Hero input: turn, then move (clamped in first-person, unclamped in arcball)
//! 2. Coin pickup; the last coin wins the game and ends the step
//! 3. Hero knockback integration, boundary check, ground pin, friction
//! 4. Zombie boundary checks
//! 5. Zombie steering / fall animation
//! 6. Zombie-zombie collisions
//! 7. Hero-zombie collisions (damage, knockback, possible loss)
//! 8. Damage cooldown
//! 9. Hero fall animation (possible loss)
//!
//! Zombie-zombie resolution always runs before hero-zombie resolution. A step
//! that honors a reset request does nothing else.

use glam::Vec3;

use super::boundary::{advance_fall, check_boundary};
use super::collision::{collect_coins, collide_zombies, hero_zombie_contact};
use super::state::{AgentId, GameState, LossCause, SimEvent};
use super::zombie::update_zombie;
use crate::heading_direction;
use crate::settings::SimConfig;

/// How hero movement interacts with the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementPolicy {
    /// Free camera: no clamping, so the hero can walk off the edge and fall
    #[default]
    Arcball,
    /// Hero camera: position clamped inside the world, falling is impossible
    FirstPerson,
}

/// Input for a single step, summarized by the host from its devices
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Selected by the host from the active camera mode
    pub policy: MovementPolicy,
    /// Only honored once the session is WON or LOST
    pub reset: bool,
}

/// Advance the game by `dt` seconds. Returns what happened, in order.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<SimEvent> {
    let mut events = Vec::new();

    // A honored reset consumes the step
    if input.reset && state.request_reset(&mut events) {
        return events;
    }

    // Nothing moves once the session is over
    if state.phase.is_finished() {
        return events;
    }

    state.steps += 1;
    state.elapsed += dt;

    // 1. Hero input
    move_hero(state, input, dt, &mut events);

    // 2. Coins
    for index in collect_coins(
        state.hero.position,
        &mut state.coins,
        state.config.collect_distance,
    ) {
        log::info!("Coin {} collected", index);
        events.push(SimEvent::CoinCollected { index });
    }
    if state.all_coins_collected() {
        state.win(&mut events);
        return events;
    }

    // 3. Knockback
    integrate_hero_velocity(state, dt, &mut events);

    // 4. Zombie boundary
    let world_size = state.config.world_size;
    let margin = state.config.zombie_boundary_margin;
    for (i, zombie) in state.zombies.iter_mut().enumerate() {
        if zombie.active && check_boundary(zombie, world_size, margin) {
            log::debug!("Zombie {} walked off the edge", i);
            events.push(SimEvent::StartedFalling(AgentId::Zombie(i)));
        }
    }

    // 5. Zombie behavior
    let hero_position = state.hero.position;
    for (i, zombie) in state.zombies.iter_mut().enumerate() {
        if update_zombie(zombie, hero_position, dt, &state.config) {
            log::debug!("Zombie {} left the simulation", i);
            events.push(SimEvent::ZombieDeactivated { index: i });
        }
    }

    // 6. Zombie-zombie
    collide_zombies(
        &mut state.zombies,
        state.config.restitution,
        state.config.impulse_scale,
    );

    // 7. Hero-zombie (a falling hero is out of reach)
    if !state.hero_damaged && !state.hero.is_falling() {
        if let Some((zombie, push)) = hero_zombie_contact(&state.hero, &state.zombies) {
            if state.damage_hero(zombie, &mut events) {
                state.hero.velocity += push * state.config.push_strength;
            }
        }
    }

    // 8. Cooldown
    state.tick_damage_cooldown(dt);

    // 9. Hero fall
    if advance_fall(&mut state.hero, dt, &state.config) {
        state.lose(LossCause::FellOffWorld, &mut events);
    }

    events
}

/// Apply turn and move intents to the hero
fn move_hero(state: &mut GameState, input: &TickInput, dt: f32, events: &mut Vec<SimEvent>) {
    let config = &state.config;
    let hero = &mut state.hero;

    let mut heading = hero.heading();
    if input.turn_left {
        heading += config.hero_turn_speed * dt;
    }
    if input.turn_right {
        heading -= config.hero_turn_speed * dt;
    }
    hero.set_heading(heading);

    // Forward walks against the heading vector, the way the model faces
    let step = config.hero_move_speed * dt;
    let mut delta = Vec3::ZERO;
    if input.forward {
        delta -= heading_direction(hero.heading()) * step;
    }
    if input.backward {
        delta += heading_direction(hero.heading()) * step;
    }
    if delta == Vec3::ZERO {
        return;
    }

    let candidate = hero.position + delta;
    hero.position = match input.policy {
        MovementPolicy::FirstPerson => clamp_to_world(candidate, config),
        MovementPolicy::Arcball => candidate,
    };

    if input.policy == MovementPolicy::Arcball
        && check_boundary(hero, config.world_size, 0.0)
    {
        log::info!("Hero walked off the edge of the world");
        events.push(SimEvent::StartedFalling(AgentId::Hero));
    }
}

/// Keep X/Z inside the first-person margin
fn clamp_to_world(position: Vec3, config: &SimConfig) -> Vec3 {
    let limit = config.world_size - config.first_person_margin;
    Vec3::new(
        position.x.clamp(-limit, limit),
        position.y,
        position.z.clamp(-limit, limit),
    )
}

/// Move the hero by its knockback velocity, then apply friction
fn integrate_hero_velocity(state: &mut GameState, dt: f32, events: &mut Vec<SimEvent>) {
    let config = &state.config;
    let hero = &mut state.hero;

    hero.position += hero.velocity * dt;
    if check_boundary(hero, config.world_size, 0.0) {
        log::info!("Hero knocked off the edge of the world");
        events.push(SimEvent::StartedFalling(AgentId::Hero));
    }
    if !hero.is_falling() {
        hero.position.y = 0.0;
    }

    hero.velocity *= config.hero_friction;
    hero.velocity.y = 0.0;
}
