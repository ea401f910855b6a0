//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable object order (sorted by x)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::resolve;
pub use level::{Level, LevelError, PatternGen};
pub use player::advance;
pub use state::{GameState, InputIntent, Mode, ObjectKind, Player, RunMode, WorldObject};
pub use tick::Session;
