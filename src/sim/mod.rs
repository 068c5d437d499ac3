//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit timestep only (no clocks)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Configuration passed in, never global
//! - No rendering or platform dependencies

pub mod collision;
pub mod composition;
pub mod hazard;
pub mod layers;
pub mod level;
pub mod magma;
pub mod state;
pub mod tick;

pub use collision::{Rect, circles_overlap, clamp_speed};
pub use composition::{Composition, TemperatureBand};
pub use hazard::{Fault, GasPocket, Hazard, HazardKind, Impact, ResistantRock, Rock, WaterPocket};
pub use layers::{LayerKind, layer_for, layer_kind_at};
pub use level::generate_level;
pub use magma::{ControlIntent, MagmaBody};
pub use state::{
    Camera, DefeatReason, EruptionPhase, GameEvent, GamePhase, GameState, Outcome, PendingEnd,
    RunSummary, Volcano, score_run,
};
pub use tick::{TickInput, tick};
