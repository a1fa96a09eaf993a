//! Per-frame draw list and HUD values

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::camera::Camera;
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{Phase, Session, Tile};

/// Explosion sprites are two tiles wide
const EXPLOSION_PX: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteLayer {
    Floor,
    Walls,
    Decoration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSprite {
    pub layer: SpriteLayer,
    pub tile_id: u32,
    /// Top-left, screen pixels
    pub pos: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionSprite {
    pub frame: u32,
    pub pos: Vec2,
}

/// The level as seen around the player
#[derive(Debug, Clone, PartialEq)]
pub struct Playfield {
    /// Floor, then walls, then decoration
    pub tiles: Vec<TileSprite>,
    pub player_frame: u32,
    pub player_pos: Vec2,
    pub explosions: Vec<ExplosionSprite>,
}

/// HUD values
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// 0..=1, width of the stamina bar
    pub stamina_ratio: f32,
    pub score_text: String,
    /// Whole-view offset in pixels
    pub shake_offset: Vec2,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub phase: Phase,
    pub tick: u32,
    /// Present while the level is on screen
    pub playfield: Option<Playfield>,
    pub overlay: Overlay,
    /// Blinking "press any of wasd"
    pub prompt_visible: bool,
    /// Clear screen score counter, once it has started
    pub revealed_score: Option<u64>,
}

/// Score shown on the Clear screen at `tick`
///
/// Nothing before the reveal starts, then counts up two points per tick.
pub fn revealed_score(tick: u32, earned: u64) -> Option<u64> {
    if tick < SCORE_REVEAL_START {
        return None;
    }
    let counted = (f64::from(tick - SCORE_REVEAL_START) / SCORE_REVEAL_SPEED) as u64;
    Some(counted.min(earned))
}

/// Tick at which the Clear counter reaches `earned`
fn reveal_done_tick(earned: u64) -> f64 {
    f64::from(SCORE_REVEAL_START) + earned as f64 * SCORE_REVEAL_SPEED
}

fn blink_on(tick: u32) -> bool {
    (tick / BLINK_TICKS) % 2 == 0
}

/// Builds frames; owns the noise used for screen shake so that drawing
/// never touches simulation randomness
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    rng: Pcg32,
}

impl FrameBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn build(&mut self, session: &Session, settings: &Settings) -> Frame {
        let tick = session.tick;
        let show_level = match session.phase {
            Phase::Play | Phase::Dead => true,
            Phase::Clear => tick < CLEAR_DELAY_TICKS,
            _ => false,
        };

        let (prompt_visible, revealed) = match session.phase {
            Phase::MenuPrimary | Phase::MenuSecondary => (blink_on(tick), None),
            Phase::Clear => {
                let earned = session.score.pending;
                let prompt = f64::from(tick) >= reveal_done_tick(earned) + f64::from(BLINK_TICKS)
                    && blink_on(tick);
                (prompt, revealed_score(tick, earned))
            }
            _ => (false, None),
        };

        let score_text = match session.phase {
            Phase::Outro => format!("your score is {}", session.score.committed),
            _ => session.score.total().to_string(),
        };

        Frame {
            phase: session.phase,
            tick,
            playfield: show_level.then(|| playfield(session)),
            overlay: Overlay {
                stamina_ratio: session.player.stamina_ratio() as f32,
                score_text,
                shake_offset: self.shake_offset(session.shake, settings),
            },
            prompt_visible,
            revealed_score: revealed,
        }
    }

    fn shake_offset(&mut self, shake: u32, settings: &Settings) -> Vec2 {
        if shake == 0 || !settings.effective_screen_shake() {
            return Vec2::ZERO;
        }
        let amount = (SHAKE_AMOUNT * f64::from(shake) / f64::from(SHAKE_PEAK)) as f32;
        Vec2::new(self.rng.random::<f32>() * amount, self.rng.random::<f32>() * amount)
    }
}

fn playfield(session: &Session) -> Playfield {
    let camera = Camera::new(session.player.pos);
    let ts = TILE_SIZE as f32;

    let mut tiles = Vec::new();
    if let Some(active) = session.active() {
        let layers: [(SpriteLayer, &[Tile]); 3] = [
            (SpriteLayer::Floor, active.level.floor()),
            (SpriteLayer::Walls, active.level.walls()),
            (SpriteLayer::Decoration, active.level.decoration()),
        ];
        for (layer, layer_tiles) in layers {
            for tile in layer_tiles {
                let pos = camera.to_screen(tile.cell().as_dvec2());
                if camera.visible(pos, ts) {
                    tiles.push(TileSprite {
                        layer,
                        tile_id: tile.id,
                        pos,
                    });
                }
            }
        }
    }

    // Explosion timers only run while playing
    let exploding = session.phase == Phase::Play;
    let explosions = session
        .hazards()
        .iter()
        .filter(|_| exploding)
        .filter_map(|h| {
            let frame = h.explosion_frame()?;
            let pos = camera.to_screen(h.center()) - Vec2::splat(EXPLOSION_PX / 2.0);
            Some(ExplosionSprite { frame, pos })
        })
        .collect();

    Playfield {
        tiles,
        player_frame: (session.tick / PLAYER_FRAME_TICKS) % PLAYER_FRAMES,
        player_pos: camera.player_screen(),
        explosions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::load_level;
    use crate::sim::testing::{FLOOR_ID, WALL_ID, player, project, room, thing};
    use glam::DVec2;

    fn playing(w: i32, h: i32) -> Session {
        let provider = project(vec![room(w, h, vec![player(2, 2, 4.0), thing("Toaster", 3, 2)])]);
        let mut session = Session::new();
        session.apply_level(load_level(&provider, 0).unwrap());
        session.phase = Phase::Play;
        session
    }

    #[test]
    fn test_reveal_counts_up() {
        assert_eq!(revealed_score(0, 100), None);
        assert_eq!(revealed_score(89, 100), None);
        assert_eq!(revealed_score(90, 100), Some(0));
        assert_eq!(revealed_score(100, 100), Some(20));
        assert_eq!(revealed_score(500, 100), Some(100));
    }

    #[test]
    fn test_playfield_layers_in_order() {
        let session = playing(6, 6);
        let frame = FrameBuilder::new(1).build(&session, &Settings::default());
        let field = frame.playfield.unwrap();
        let first_wall = field.tiles.iter().position(|t| t.layer == SpriteLayer::Walls).unwrap();
        assert!(field.tiles[..first_wall].iter().all(|t| t.layer == SpriteLayer::Floor));
        assert!(field.tiles.iter().any(|t| t.tile_id == FLOOR_ID));
        assert!(field.tiles.iter().any(|t| t.tile_id == WALL_ID));
        assert_eq!(field.player_pos, Vec2::new(92.0, 56.0));
        assert!(field.explosions.is_empty());
    }

    #[test]
    fn test_far_tiles_are_culled() {
        let session = playing(60, 60);
        let frame = FrameBuilder::new(1).build(&session, &Settings::default());
        let field = frame.playfield.unwrap();
        assert!(field.tiles.len() < 60 * 60 / 4);
    }

    #[test]
    fn test_explosion_sprite_follows_hazard() {
        let mut session = playing(8, 8);
        session.active.as_mut().unwrap().hazards[0].damage(1.0);
        let frame = FrameBuilder::new(1).build(&session, &Settings::default());
        let explosions = frame.playfield.unwrap().explosions;
        assert_eq!(explosions.len(), 1);
        assert_eq!(explosions[0].frame, 0);
        let camera = Camera::new(DVec2::new(2.0, 2.0));
        assert_eq!(explosions[0].pos, camera.to_screen(DVec2::new(3.5, 2.5)) - Vec2::splat(16.0));
    }

    #[test]
    fn test_no_explosions_outside_play() {
        let mut session = playing(8, 8);
        session.active.as_mut().unwrap().hazards[0].damage(1.0);
        let mut builder = FrameBuilder::new(1);

        for phase in [Phase::Dead, Phase::Clear] {
            session.phase = phase;
            let field = builder.build(&session, &Settings::default()).playfield.unwrap();
            assert!(field.explosions.is_empty(), "{phase:?}");
            assert!(!field.tiles.is_empty());
        }
    }

    #[test]
    fn test_shake_respects_settings() {
        let mut session = playing(6, 6);
        session.shake = SHAKE_PEAK;
        let mut builder = FrameBuilder::new(9);

        let frame = builder.build(&session, &Settings::default());
        let offset = frame.overlay.shake_offset;
        assert!(offset.x >= 0.0 && offset.x <= SHAKE_AMOUNT as f32);
        assert!(offset.y >= 0.0 && offset.y <= SHAKE_AMOUNT as f32);

        let calm = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert_eq!(builder.build(&session, &calm).overlay.shake_offset, Vec2::ZERO);

        session.shake = 0;
        assert_eq!(builder.build(&session, &Settings::default()).overlay.shake_offset, Vec2::ZERO);
    }

    #[test]
    fn test_hud_values() {
        let mut session = playing(6, 6);
        session.player.stamina = 1.0;
        session.score.committed = 100;
        session.score.award(15);
        let frame = FrameBuilder::new(1).build(&session, &Settings::default());
        assert_eq!(frame.overlay.stamina_ratio, 0.25);
        assert_eq!(frame.overlay.score_text, "115");

        session.phase = Phase::Outro;
        let frame = FrameBuilder::new(1).build(&session, &Settings::default());
        assert!(frame.playfield.is_none());
        assert_eq!(frame.overlay.score_text, "your score is 100");
    }

    #[test]
    fn test_clear_screen_prompt_waits_for_reveal() {
        let mut session = playing(6, 6);
        session.phase = Phase::Clear;
        session.score.award(20);
        let mut builder = FrameBuilder::new(1);

        session.tick = 30;
        let frame = builder.build(&session, &Settings::default());
        assert!(frame.playfield.is_some());
        assert!(!frame.prompt_visible);

        // Reveal ends at 90 + 20 * 0.5 = 100, prompt may show from 130
        session.tick = 120;
        let frame = builder.build(&session, &Settings::default());
        assert!(frame.playfield.is_none());
        assert_eq!(frame.revealed_score, Some(20));
        assert!(!frame.prompt_visible);

        session.tick = 150;
        assert!(!builder.build(&session, &Settings::default()).prompt_visible);
        session.tick = 180;
        assert!(builder.build(&session, &Settings::default()).prompt_visible);
    }
}
