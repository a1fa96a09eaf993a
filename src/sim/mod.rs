//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per frame
//! - Randomness only through an injected `JitterSource`
//! - Stable iteration order (hazards in level order)
//! - No rendering or platform dependencies

pub mod error;
pub mod hazard;
pub mod level;
pub mod motion;
pub mod state;
pub mod suck;
pub mod tick;

#[cfg(test)]
pub(crate) mod testing;

pub use error::LevelError;
pub use hazard::{Appliance, Hazard, HazardKind, parse_hazards};
pub use level::{
    ColliderSet, Entity, Level, LevelData, LevelProject, LevelProvider, LoadedLevel, Tile, load_level,
};
pub use motion::{JitterSource, NoJitter, RandomJitter, SequenceJitter, Step, motion_vector};
pub use state::{ActiveLevel, Phase, Player, Score, Session};
pub use suck::{SuckOutcome, suck};
pub use tick::{TickContext, tick};
