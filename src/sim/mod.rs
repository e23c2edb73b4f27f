//! Real-time simulation core
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform concerns:
//! - Elapsed time is passed in by the host; no clocks are read
//! - Single owner, single thread, one step runs to completion
//! - Stable iteration order (by slot index)

pub mod boundary;
pub mod collision;
pub mod state;
pub mod tick;
pub mod zombie;

pub use boundary::{advance_fall, check_boundary, is_out_of_bounds};
pub use collision::{Contact, circle_contact, collect_coins, collide_zombies, resolve_pair};
pub use state::{
    Agent, AgentId, AgentView, Coin, CoinView, GamePhase, GameState, Layout, LossCause, SimEvent,
    Snapshot,
};
pub use tick::{MovementPolicy, TickInput, tick};
pub use zombie::{speed_multiplier_for, update_zombie};
