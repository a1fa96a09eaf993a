//! Tile levels and the level-load step
//!
//! A project is a list of levels authored in pixels. Each level has three tile
//! layers (floor, walls, decoration) and an entity layer. Levels are immutable
//! once loaded; the simulation only ever swaps a whole level in.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};

use super::error::LevelError;
use super::hazard::{Hazard, parse_hazards};
use crate::consts::TILE_SIZE;

/// Identifier of the entity that marks the player spawn
pub const PLAYER_ENTITY: &str = "Player";
/// Entity field holding the starting stamina
pub const STAMINA_FIELD: &str = "Stamina";

/// A placed tile. `id` indexes the shared tile sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: u32,
    /// Top-left corner in pixels
    pub px: [i32; 2],
}

impl Tile {
    /// Grid cell covered by this tile
    pub fn cell(&self) -> IVec2 {
        IVec2::new(
            self.px[0].div_euclid(TILE_SIZE),
            self.px[1].div_euclid(TILE_SIZE),
        )
    }
}

/// An entity marker with free-form typed fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub identifier: String,
    /// Top-left corner in pixels
    pub px: [i32; 2],
    /// Size in pixels (0 = use the kind's default)
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl Entity {
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name)
    }
}

/// On-disk shape of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub identifier: String,
    pub px_width: i32,
    pub px_height: i32,
    #[serde(default)]
    pub floor: Vec<Tile>,
    #[serde(default)]
    pub walls: Vec<Tile>,
    #[serde(default)]
    pub decoration: Vec<Tile>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// A loaded level with its wall layer indexed by cell
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "LevelData")]
pub struct Level {
    data: LevelData,
    wall_index: HashMap<IVec2, u32>,
}

impl From<LevelData> for Level {
    fn from(data: LevelData) -> Self {
        let wall_index = data.walls.iter().map(|t| (t.cell(), t.id)).collect();
        Self { data, wall_index }
    }
}

impl Level {
    pub fn identifier(&self) -> &str {
        &self.data.identifier
    }

    pub fn px_width(&self) -> i32 {
        self.data.px_width
    }

    pub fn px_height(&self) -> i32 {
        self.data.px_height
    }

    /// Width in tiles
    pub fn width_tiles(&self) -> f64 {
        f64::from(self.data.px_width) / f64::from(TILE_SIZE)
    }

    /// Height in tiles
    pub fn height_tiles(&self) -> f64 {
        f64::from(self.data.px_height) / f64::from(TILE_SIZE)
    }

    /// Whether a tile-space position lies inside `[0, w) x [0, h)`
    pub fn in_bounds(&self, pos: DVec2) -> bool {
        pos.x >= 0.0 && pos.x < self.width_tiles() && pos.y >= 0.0 && pos.y < self.height_tiles()
    }

    /// Resolved wall tile at a cell, if any
    pub fn wall_tile_at(&self, cell: IVec2) -> Option<u32> {
        self.wall_index.get(&cell).copied()
    }

    pub fn floor(&self) -> &[Tile] {
        &self.data.floor
    }

    pub fn walls(&self) -> &[Tile] {
        &self.data.walls
    }

    pub fn decoration(&self) -> &[Tile] {
        &self.data.decoration
    }

    pub fn entities(&self) -> &[Entity] {
        &self.data.entities
    }

    /// First entity with the given identifier
    pub fn entity(&self, identifier: &str) -> Option<&Entity> {
        self.data.entities.iter().find(|e| e.identifier == identifier)
    }
}

/// Tile ids that block movement
///
/// Built once at startup and handed to the simulation by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColliderSet(BTreeSet<u32>);

impl Default for ColliderSet {
    fn default() -> Self {
        Self((1..=255).collect())
    }
}

impl ColliderSet {
    pub fn new(ids: impl IntoIterator<Item = u32>) -> Self {
        Self(ids.into_iter().collect())
    }

    pub fn contains(&self, id: u32) -> bool {
        self.0.contains(&id)
    }
}

/// Source of levels by index
pub trait LevelProvider {
    fn level_count(&self) -> usize;

    fn level(&self, index: usize) -> Result<Arc<Level>, LevelError>;
}

#[derive(Deserialize)]
struct ProjectData {
    levels: Vec<Level>,
}

/// All levels of a game, read from JSON
#[derive(Debug, Clone)]
pub struct LevelProject {
    levels: Vec<Arc<Level>>,
}

impl LevelProject {
    pub fn from_levels(levels: Vec<Level>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::EmptyProject);
        }
        Ok(Self {
            levels: levels.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let data: ProjectData = serde_json::from_str(json)?;
        Self::from_levels(data.levels)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl LevelProvider for LevelProject {
    fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn level(&self, index: usize) -> Result<Arc<Level>, LevelError> {
        self.levels.get(index).cloned().ok_or(LevelError::NoSuchLevel {
            index,
            count: self.levels.len(),
        })
    }
}

/// Everything a level entry needs, produced in one piece
#[derive(Debug, Clone)]
pub struct LoadedLevel {
    pub index: usize,
    pub level: Arc<Level>,
    pub hazards: Vec<Hazard>,
    pub spawn: DVec2,
    pub stamina: f64,
}

/// Load level `index` and derive its hazards and player start
///
/// Fails if the level has no Player entity or the Player has no stamina.
pub fn load_level(provider: &dyn LevelProvider, index: usize) -> Result<LoadedLevel, LevelError> {
    let level = provider.level(index)?;

    let player = level
        .entity(PLAYER_ENTITY)
        .ok_or(LevelError::MissingPlayer { level: index })?;

    let stamina = player
        .field(STAMINA_FIELD)
        .ok_or_else(|| LevelError::MissingField {
            level: index,
            entity: player.identifier.clone(),
            field: STAMINA_FIELD,
        })?
        .as_f64()
        .ok_or_else(|| LevelError::InvalidField {
            level: index,
            entity: player.identifier.clone(),
            field: STAMINA_FIELD,
        })?;

    // Spawn snaps to the tile grid
    let spawn = DVec2::new(
        f64::from(player.px[0] / TILE_SIZE),
        f64::from(player.px[1] / TILE_SIZE),
    );

    let hazards = parse_hazards(level.entities());

    log::info!(
        "Loaded level {} '{}': {}x{} tiles, {} hazards, stamina {}",
        index,
        level.identifier(),
        level.width_tiles(),
        level.height_tiles(),
        hazards.len(),
        stamina
    );

    Ok(LoadedLevel {
        index,
        level,
        hazards,
        spawn,
        stamina,
    })
}
