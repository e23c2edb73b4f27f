//! Game state and core simulation types
//!
//! Everything the renderer reads after a step lives here, along with the
//! lifecycle transitions (PLAYING -> WON / LOST, reset back to PLAYING).

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::zombie::speed_multiplier_for;
use crate::consts::{COIN_HEIGHT, EDGE_INSET, ZOMBIE_HEIGHT};
use crate::normalize_heading;
use crate::settings::{ConfigError, SimConfig};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Every coin collected
    Won,
    /// Out of lives or fell off the world
    Lost,
}

impl GamePhase {
    /// WON and LOST hold until an explicit reset
    pub fn is_finished(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Identifies an agent in events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentId {
    Hero,
    Zombie(usize),
}

/// Why a session was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    OutOfLives,
    FellOffWorld,
}

/// Things that happened during a step, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    CoinCollected { index: usize },
    HeroDamaged { zombie: usize, lives_left: u32 },
    StartedFalling(AgentId),
    /// A falling zombie reached the death depth and left the simulation
    ZombieDeactivated { index: usize },
    Won,
    Lost(LossCause),
    Reset,
}

/// A mobile actor (hero or zombie)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Radians, kept in [0, 2π)
    heading: f32,
    /// Collision radius, fixed at creation
    radius: f32,
    /// Liveness flag for the slot; inactive agents are skipped entirely
    pub active: bool,
    /// One-way until reset
    falling: bool,
    pub fall_rotation: f32,
    pub speed_multiplier: f32,
}

impl Agent {
    pub fn new(position: Vec3, radius: f32) -> Self {
        debug_assert!(radius > 0.0);
        Self {
            position,
            velocity: Vec3::ZERO,
            heading: 0.0,
            radius,
            active: true,
            falling: false,
            fall_rotation: 0.0,
            speed_multiplier: 1.0,
        }
    }

    pub fn with_speed_multiplier(mut self, multiplier: f32) -> Self {
        self.speed_multiplier = multiplier;
        self
    }

    #[inline]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Set heading, wrapping into [0, 2π)
    #[inline]
    pub fn set_heading(&mut self, heading: f32) {
        self.heading = normalize_heading(heading);
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.falling
    }

    /// Begin the fall sequence. Returns true only on the first call since reset.
    pub fn start_falling(&mut self) -> bool {
        if self.falling {
            return false;
        }
        self.falling = true;
        self.fall_rotation = 0.0;
        true
    }

    /// Active and on the ground: eligible for steering and collisions
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.active && !self.falling
    }

    /// Return to a spawn point with zeroed motion and flags
    pub fn respawn(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.heading = 0.0;
        self.active = true;
        self.falling = false;
        self.fall_rotation = 0.0;
    }
}

/// A collectible coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub position: Vec3,
    pub active: bool,
}

impl Coin {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            active: true,
        }
    }
}

/// Spawn coordinates for one session; reset returns everything here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub hero: Vec3,
    pub zombies: Vec<Vec3>,
    pub coins: Vec<Vec3>,
}

impl Layout {
    /// Four corner coins, a zombie pair at each corner and two edge guards
    pub fn standard(config: &SimConfig) -> Self {
        let corner = config.world_size - config.spawn_corner_inset;
        let spacing = config.zombie_pair_spacing;
        let edge = config.world_size - EDGE_INSET;

        let coins = vec![
            Vec3::new(-corner, COIN_HEIGHT, -corner),
            Vec3::new(corner, COIN_HEIGHT, -corner),
            Vec3::new(-corner, COIN_HEIGHT, corner),
            Vec3::new(corner, COIN_HEIGHT, corner),
        ];

        let y = ZOMBIE_HEIGHT;
        let zombies = vec![
            Vec3::new(-corner - spacing, y, -corner - spacing),
            Vec3::new(-corner + spacing, y, -corner + spacing),
            Vec3::new(corner - spacing, y, -corner - spacing),
            Vec3::new(corner + spacing, y, -corner + spacing),
            Vec3::new(-corner - spacing, y, corner - spacing),
            Vec3::new(-corner + spacing, y, corner + spacing),
            Vec3::new(corner - spacing, y, corner - spacing),
            Vec3::new(corner + spacing, y, corner + spacing),
            Vec3::new(0.0, y, -edge),
            Vec3::new(0.0, y, edge),
        ];

        Self {
            hero: Vec3::ZERO,
            zombies,
            coins,
        }
    }
}

/// Read-only view of one agent for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub position: Vec3,
    pub heading: f32,
    pub fall_rotation: f32,
    pub active: bool,
    pub falling: bool,
}

impl From<&Agent> for AgentView {
    fn from(agent: &Agent) -> Self {
        Self {
            position: agent.position,
            heading: agent.heading,
            fall_rotation: agent.fall_rotation,
            active: agent.active,
            falling: agent.falling,
        }
    }
}

/// Read-only view of one coin for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinView {
    pub position: Vec3,
    pub active: bool,
}

/// Everything a renderer needs after a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub hero: AgentView,
    pub zombies: Vec<AgentView>,
    pub coins: Vec<CoinView>,
    pub hero_lives: u32,
    pub hero_damaged: bool,
    pub coins_collected: usize,
    pub elapsed: f32,
}

/// Complete session state, owned by the simulation driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: SimConfig,
    pub phase: GamePhase,
    pub hero: Agent,
    pub hero_lives: u32,
    /// Inside the post-hit cooldown window
    pub hero_damaged: bool,
    /// Seconds since the last hit, while `hero_damaged`
    pub damage_timer: f32,
    /// Zombie slots addressed by stable index
    pub zombies: Vec<Agent>,
    pub coins: Vec<Coin>,
    /// Simulated seconds since the last reset
    pub elapsed: f32,
    /// Steps since the last reset
    pub steps: u64,
    layout: Layout,
}

impl GameState {
    /// New session with the standard spawn layout
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let layout = Layout::standard(&config);
        Self::with_layout(config, layout)
    }

    /// New session with custom spawn coordinates.
    ///
    /// Rejects a config that fails [`SimConfig::validate`].
    pub fn with_layout(config: SimConfig, layout: Layout) -> Result<Self, ConfigError> {
        config.validate()?;
        let hero = Agent::new(layout.hero, config.hero_radius);
        let zombies = layout
            .zombies
            .iter()
            .enumerate()
            .map(|(i, &pos)| {
                Agent::new(pos, config.zombie_radius)
                    .with_speed_multiplier(speed_multiplier_for(i, &config))
            })
            .collect();
        let coins = layout.coins.iter().copied().map(Coin::new).collect();

        Ok(Self {
            hero_lives: config.hero_lives_initial,
            config,
            phase: GamePhase::Playing,
            hero,
            hero_damaged: false,
            damage_timer: 0.0,
            zombies,
            coins,
            elapsed: 0.0,
            steps: 0,
            layout,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Bounds-checked zombie lookup
    pub fn zombie(&self, index: usize) -> Option<&Agent> {
        self.zombies.get(index)
    }

    pub fn zombie_mut(&mut self, index: usize) -> Option<&mut Agent> {
        self.zombies.get_mut(index)
    }

    pub fn coins_collected(&self) -> usize {
        self.coins.iter().filter(|c| !c.active).count()
    }

    /// True once every coin is gone. A layout without coins can never be won.
    pub fn all_coins_collected(&self) -> bool {
        !self.coins.is_empty() && self.coins.iter().all(|c| !c.active)
    }

    // === Lifecycle ===

    /// PLAYING -> WON. Returns false if the session already ended.
    pub fn win(&mut self, events: &mut Vec<SimEvent>) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Won;
        log::info!("All {} coins collected, game won", self.coins.len());
        events.push(SimEvent::Won);
        true
    }

    /// PLAYING -> LOST. Returns false if the session already ended.
    pub fn lose(&mut self, cause: LossCause, events: &mut Vec<SimEvent>) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Lost;
        match cause {
            LossCause::OutOfLives => log::info!("Hero ran out of lives, game lost"),
            LossCause::FellOffWorld => log::info!("Hero fell off the world, game lost"),
        }
        events.push(SimEvent::Lost(cause));
        true
    }

    /// Record a zombie hit unless the cooldown is running.
    ///
    /// Returns true if the hit counted; the caller applies the knockback.
    pub fn damage_hero(&mut self, zombie: usize, events: &mut Vec<SimEvent>) -> bool {
        if self.hero_damaged {
            return false;
        }
        self.hero_damaged = true;
        self.damage_timer = 0.0;
        self.hero_lives = self.hero_lives.saturating_sub(1);
        log::info!(
            "Hero hit by zombie {} ({} lives left)",
            zombie,
            self.hero_lives
        );
        events.push(SimEvent::HeroDamaged {
            zombie,
            lives_left: self.hero_lives,
        });
        if self.hero_lives == 0 {
            self.lose(LossCause::OutOfLives, events);
        }
        true
    }

    /// Advance the post-hit cooldown; clears once the duration is reached
    pub fn tick_damage_cooldown(&mut self, dt: f32) {
        if !self.hero_damaged {
            return;
        }
        self.damage_timer += dt;
        if self.damage_timer >= self.config.hero_damage_duration {
            self.hero_damaged = false;
            self.damage_timer = 0.0;
            log::debug!("Hero damage cooldown cleared");
        }
    }

    /// Honor a reset request. Only WON and LOST sessions can be reset.
    pub fn request_reset(&mut self, events: &mut Vec<SimEvent>) -> bool {
        if !self.phase.is_finished() {
            log::debug!("Reset ignored while {:?}", self.phase);
            return false;
        }
        self.reset();
        events.push(SimEvent::Reset);
        true
    }

    /// Reinitialize every agent, coin and counter in place
    pub fn reset(&mut self) {
        self.phase = GamePhase::Playing;
        self.hero.respawn(self.layout.hero);
        self.hero_lives = self.config.hero_lives_initial;
        self.hero_damaged = false;
        self.damage_timer = 0.0;

        for (i, (zombie, &spawn)) in self
            .zombies
            .iter_mut()
            .zip(self.layout.zombies.iter())
            .enumerate()
        {
            zombie.respawn(spawn);
            zombie.speed_multiplier = speed_multiplier_for(i, &self.config);
        }

        for (coin, &spawn) in self.coins.iter_mut().zip(self.layout.coins.iter()) {
            coin.position = spawn;
            coin.active = true;
        }

        self.elapsed = 0.0;
        self.steps = 0;
        log::info!("Session reset");
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            hero: AgentView::from(&self.hero),
            zombies: self.zombies.iter().map(AgentView::from).collect(),
            coins: self
                .coins
                .iter()
                .map(|c| CoinView {
                    position: c.position,
                    active: c.active,
                })
                .collect(),
            hero_lives: self.hero_lives,
            hero_damaged: self.hero_damaged,
            coins_collected: self.coins_collected(),
            elapsed: self.elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout() {
        let state = GameState::new(SimConfig::default()).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.coins.len(), 4);
        assert_eq!(state.zombies.len(), 10);
        assert_eq!(state.hero_lives, 5);

        // Every third zombie is slow
        for (i, zombie) in state.zombies.iter().enumerate() {
            let expected = if i % 3 == 0 { 0.7 } else { 1.0 };
            assert_eq!(zombie.speed_multiplier, expected);
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let zero_modulus = SimConfig {
            slow_zombie_every: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            GameState::new(zero_modulus),
            Err(ConfigError::Invalid {
                field: "slow_zombie_every",
                ..
            })
        ));

        let zero_radius = SimConfig {
            zombie_radius: 0.0,
            ..SimConfig::default()
        };
        let layout = Layout::standard(&SimConfig::default());
        assert!(GameState::with_layout(zero_radius, layout).is_err());
    }

    #[test]
    fn test_zombie_lookup_is_bounds_checked() {
        let state = GameState::new(SimConfig::default()).unwrap();
        assert!(state.zombie(9).is_some());
        assert!(state.zombie(10).is_none());
    }

    #[test]
    fn test_start_falling_is_one_way() {
        let mut agent = Agent::new(Vec3::ZERO, 1.0);
        assert!(agent.start_falling());
        agent.fall_rotation = 1.0;
        assert!(!agent.start_falling());
        assert!(agent.is_falling());
        assert_eq!(agent.fall_rotation, 1.0);
    }

    #[test]
    fn test_transitions_only_leave_playing_once() {
        let mut state = GameState::new(SimConfig::default()).unwrap();
        let mut events = Vec::new();
        assert!(state.win(&mut events));
        assert!(!state.lose(LossCause::OutOfLives, &mut events));
        assert!(!state.win(&mut events));
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(events, vec![SimEvent::Won]);
    }

    #[test]
    fn test_reset_ignored_while_playing() {
        let mut state = GameState::new(SimConfig::default()).unwrap();
        state.hero_lives = 2;
        let mut events = Vec::new();
        assert!(!state.request_reset(&mut events));
        assert_eq!(state.hero_lives, 2);
        assert!(events.is_empty());
    }

    #[test]
    fn test_damage_cooldown_gates_hits() {
        let mut state = GameState::new(SimConfig::default()).unwrap();
        let mut events = Vec::new();
        assert!(state.damage_hero(0, &mut events));
        assert!(!state.damage_hero(1, &mut events));
        assert_eq!(state.hero_lives, 4);

        // Cooldown clears after the configured duration
        for _ in 0..200 {
            state.tick_damage_cooldown(1.0 / 60.0);
        }
        assert!(!state.hero_damaged);
        assert!(state.damage_hero(1, &mut events));
        assert_eq!(state.hero_lives, 3);
    }

    #[test]
    fn test_heading_is_normalized_on_set() {
        let mut agent = Agent::new(Vec3::ZERO, 1.0);
        agent.set_heading(-0.25);
        assert!(agent.heading() > 6.0 && agent.heading() < std::f32::consts::TAU);
    }
}
