//! Level fixtures for unit tests

use serde_json::{Value, json};

use super::level::{Level, LevelData, LevelProject};
use crate::consts::TILE_SIZE;

/// Wall tile id used by `room`
pub const WALL_ID: u32 = 1;
/// Floor tile id used by `room`
pub const FLOOR_ID: u32 = 300;

/// A `w` x `h` tile room ringed by walls, floored inside
pub fn room(w: i32, h: i32, entities: Vec<Value>) -> Level {
    let mut walls = Vec::new();
    let mut floor = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let tile = json!({"px": [x * TILE_SIZE, y * TILE_SIZE]});
            if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                walls.push(json!({"id": WALL_ID, "px": tile["px"]}));
            } else {
                floor.push(json!({"id": FLOOR_ID, "px": tile["px"]}));
            }
        }
    }
    let data: LevelData = serde_json::from_value(json!({
        "identifier": format!("Room{w}x{h}"),
        "px_width": w * TILE_SIZE,
        "px_height": h * TILE_SIZE,
        "floor": floor,
        "walls": walls,
        "entities": entities,
    }))
    .unwrap();
    Level::from(data)
}

pub fn project(levels: Vec<Level>) -> LevelProject {
    LevelProject::from_levels(levels).unwrap()
}

/// Player entity at a tile with the given stamina
pub fn player(x: i32, y: i32, stamina: f64) -> Value {
    json!({"identifier": "Player", "px": [x * TILE_SIZE, y * TILE_SIZE], "fields": {"Stamina": stamina}})
}

/// Any other entity at a tile
pub fn thing(identifier: &str, x: i32, y: i32) -> Value {
    json!({"identifier": identifier, "px": [x * TILE_SIZE, y * TILE_SIZE]})
}
