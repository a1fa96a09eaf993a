//! Player-centred camera

use glam::{DVec2, Vec2};

use crate::consts::TILE_SIZE;

/// Logical screen size in pixels
pub const VIEW_WIDTH: f32 = 200.0;
pub const VIEW_HEIGHT: f32 = 160.0;

/// Maps tile coordinates to screen pixels, keeping the player centred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Player position (tiles)
    pub focus: DVec2,
    pub view: Vec2,
}

impl Camera {
    pub fn new(focus: DVec2) -> Self {
        Self {
            focus,
            view: Vec2::new(VIEW_WIDTH, VIEW_HEIGHT),
        }
    }

    fn tile_px() -> f32 {
        TILE_SIZE as f32
    }

    /// Screen position of a tile-space point.
    /// The player stands one tile above the vertical centre.
    pub fn to_screen(&self, world: DVec2) -> Vec2 {
        let rel = (world - self.focus).as_vec2() * Self::tile_px();
        Vec2::new(
            rel.x + self.view.x / 2.0,
            rel.y + (self.view.y - 2.0 * Self::tile_px()) / 2.0,
        )
    }

    /// Top-left of the player sprite
    pub fn player_screen(&self) -> Vec2 {
        let ts = Self::tile_px();
        Vec2::new((self.view.x - ts) / 2.0, (self.view.y - 3.0 * ts) / 2.0)
    }

    /// Whether a sprite of `size` pixels at `pos` touches the view
    pub fn visible(&self, pos: Vec2, size: f32) -> bool {
        pos.x + size > 0.0 && pos.y + size > 0.0 && pos.x < self.view.x && pos.y < self.view.y
    }
}
