//! Render snapshot
//!
//! The simulation does not draw. Once per frame, after the tick, a
//! `FrameBuilder` turns the session into a `Frame`: a camera-relative draw
//! list plus HUD values. Backends consume frames read-only.

pub mod camera;
pub mod frame;

pub use camera::{Camera, VIEW_HEIGHT, VIEW_WIDTH};
pub use frame::{
    ExplosionSprite, Frame, FrameBuilder, Overlay, Playfield, SpriteLayer, TileSprite, revealed_score,
};
