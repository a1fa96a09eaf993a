//! Lightning Ball - a top-down arcade game about draining electronics
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level load, hazards, movement, state machine)
//! - `input`: Held / just-pressed key capability consumed by the simulation
//! - `audio`: Fire-and-forget audio triggers and background loops
//! - `renderer`: Per-frame draw list and HUD snapshot for an external renderer
//! - `settings`: Runtime configuration and policies

pub mod audio;
pub mod highscores;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{DeathPolicy, Settings};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Tile edge in pixels; level data is authored in pixels
    pub const TILE_SIZE: i32 = 16;

    /// Player movement per tick (tiles)
    pub const PLAYER_SPEED: f64 = 0.05;
    /// Per-axis random wobble added to every step (tiles)
    pub const PLAYER_JITTER: f64 = 0.06;

    /// Stamina lost every Play tick
    pub const BASE_DRAIN: f64 = 0.01;
    /// Extra stamina lost when a move is rejected
    pub const COLLISION_PENALTY: f64 = 0.1;

    /// Stamina cost per hazard in range per tick
    pub const SUCK_COST: f64 = 0.05;
    /// Durability removed per hazard in range per tick
    pub const SUCK_DAMAGE: f64 = 0.05;
    /// Score awarded per hazard in range per tick
    pub const SUCK_SCORE: u64 = 5;
    /// Target bonus is floor(stamina * this)
    pub const STAMINA_BONUS_MULTIPLIER: f64 = 10.0;
    /// Durability per footprint tile for appliances
    pub const UNIT_PRICE: f64 = 0.25;
    /// Interaction radius = sqrt(area / PI) * scale
    pub const SUCK_RADIUS_SCALE: f64 = 1.2;
    /// Fixed interaction radius of the level target
    pub const TARGET_RADIUS: f64 = 0.7;
    /// Durability at or below this counts as depleted (absorbs float drift)
    pub const DURABILITY_EPSILON: f64 = 1e-9;

    /// Intro screen length
    pub const INTRO_TICKS: u32 = 90;
    /// Ticks before a key press leaves the Clear screen
    pub const CLEAR_DELAY_TICKS: u32 = 60;
    /// Ticks before a key press leaves the Dead screen
    pub const DEATH_DELAY_TICKS: u32 = 60;

    /// Shake counter value set when a hazard blows up
    pub const SHAKE_PEAK: u32 = 60;
    /// Maximum shake offset in pixels at peak
    pub const SHAKE_AMOUNT: f64 = 30.0;

    /// Explosion animation: frames x ticks per frame
    pub const EXPLOSION_FRAMES: u32 = 12;
    pub const EXPLOSION_FRAME_TICKS: u32 = 4;
    /// Player sprite cycle
    pub const PLAYER_FRAMES: u32 = 6;
    pub const PLAYER_FRAME_TICKS: u32 = 3;
    /// Menu and prompt blink period
    pub const BLINK_TICKS: u32 = 30;

    /// Clear screen starts counting the score up at this tick
    pub const SCORE_REVEAL_START: u32 = 90;
    /// Ticks per revealed point
    pub const SCORE_REVEAL_SPEED: f64 = 0.5;
}

/// Length of the explosion animation in ticks
#[inline]
pub const fn explosion_ticks() -> u32 {
    consts::EXPLOSION_FRAMES * consts::EXPLOSION_FRAME_TICKS
}

/// Convert a pixel position to fractional tile coordinates
#[inline]
pub fn px_to_tiles(px: [i32; 2]) -> DVec2 {
    DVec2::new(
        f64::from(px[0]) / f64::from(consts::TILE_SIZE),
        f64::from(px[1]) / f64::from(consts::TILE_SIZE),
    )
}
