//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use state::{Car, GameEvent, GamePhase, GameState, Obstacle, ObstaclePool, SimConfig};
pub use tick::{TickInput, tick};
