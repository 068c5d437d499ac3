//! Magma Rise - steer a blob of magma up through the crust to the crater
//!
//! Core modules:
//! - `sim`: Deterministic simulation (composition, physics, hazards, game state)
//! - `config`: Data-driven game balance
//! - `frame`: Wall-clock to timestep conversion
//! - `leaderboard`: Top-10 run records with JSON persistence

pub mod config;
pub mod frame;
pub mod leaderboard;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use frame::FrameClock;
pub use leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardError};

/// Engine constants that are not balance tuning
pub mod consts {
    /// Nominal frame timestep (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest timestep a single frame may simulate
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;
}
