//! Flammable hazards and their parsing from level entities

use glam::{DVec2, UVec2};
use serde::{Deserialize, Serialize};

use super::level::Entity;
use crate::consts::*;
use crate::{explosion_ticks, px_to_tiles};

/// Entity field holding quarter turns for appliances
pub const ROTATION_FIELD: &str = "Rotation";

/// Household electronics the player drains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Appliance {
    Toaster,
    Tv,
    Microwave,
    Wash,
}

impl Appliance {
    pub fn from_identifier(s: &str) -> Option<Self> {
        match s {
            "Toaster" => Some(Appliance::Toaster),
            "Tv" => Some(Appliance::Tv),
            "Microwave" => Some(Appliance::Microwave),
            "Wash" => Some(Appliance::Wash),
            _ => None,
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            Appliance::Toaster => "Toaster",
            Appliance::Tv => "Tv",
            Appliance::Microwave => "Microwave",
            Appliance::Wash => "Wash",
        }
    }

    /// Footprint in tiles before rotation
    pub fn default_footprint(&self) -> UVec2 {
        match self {
            Appliance::Toaster => UVec2::new(1, 1),
            Appliance::Tv => UVec2::new(2, 2),
            Appliance::Microwave => UVec2::new(2, 1),
            Appliance::Wash => UVec2::new(2, 2),
        }
    }
}

/// What a hazard is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// The level goal. Starts depleted, so any contact finishes it.
    Target,
    /// Drained over time; durability scales with footprint
    Appliance { appliance: Appliance, rotation: u8 },
}

/// A flammable object in the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub kind: HazardKind,
    /// Top-left corner (tiles)
    pub pos: DVec2,
    /// Footprint (tiles)
    pub size: UVec2,
    pub durability: f64,
    pub destroyed: bool,
    /// Drives the explosion animation; stops at its length
    pub ticks_since_destroyed: u32,
}

impl Hazard {
    pub fn target(pos: DVec2) -> Self {
        Self {
            kind: HazardKind::Target,
            pos,
            size: UVec2::ONE,
            durability: 0.0,
            destroyed: false,
            ticks_since_destroyed: 0,
        }
    }

    pub fn appliance(appliance: Appliance, pos: DVec2, size: UVec2, rotation: u8) -> Self {
        let area = f64::from(size.x) * f64::from(size.y);
        Self {
            kind: HazardKind::Appliance { appliance, rotation },
            pos,
            size,
            durability: area * UNIT_PRICE,
            destroyed: false,
            ticks_since_destroyed: 0,
        }
    }

    pub fn is_target(&self) -> bool {
        matches!(self.kind, HazardKind::Target)
    }

    /// Footprint area in tiles
    pub fn area(&self) -> f64 {
        f64::from(self.size.x) * f64::from(self.size.y)
    }

    /// Visual center (tiles)
    pub fn center(&self) -> DVec2 {
        self.pos + self.size.as_dvec2() / 2.0
    }

    /// Interaction radius (tiles)
    pub fn radius(&self) -> f64 {
        match self.kind {
            HazardKind::Target => TARGET_RADIUS,
            HazardKind::Appliance { .. } => (self.area() / std::f64::consts::PI).sqrt() * SUCK_RADIUS_SCALE,
        }
    }

    /// Remove durability; returns true on the tick the hazard is destroyed
    pub fn damage(&mut self, amount: f64) -> bool {
        if self.destroyed {
            return false;
        }
        self.durability -= amount;
        if self.durability <= DURABILITY_EPSILON {
            self.durability = 0.0;
            self.destroyed = true;
            self.ticks_since_destroyed = 0;
            return true;
        }
        false
    }

    /// Advance the explosion timer of a destroyed hazard
    pub fn advance_explosion(&mut self) {
        if self.destroyed && self.ticks_since_destroyed < explosion_ticks() {
            self.ticks_since_destroyed += 1;
        }
    }

    /// Current explosion sprite, or None when not exploding
    pub fn explosion_frame(&self) -> Option<u32> {
        (self.destroyed && self.ticks_since_destroyed < explosion_ticks())
            .then(|| self.ticks_since_destroyed / EXPLOSION_FRAME_TICKS)
    }
}

/// Footprint of an appliance entity
///
/// Authored sizes that are whole tiles win; otherwise the kind's default,
/// turned sideways on odd rotations.
fn footprint(entity: &Entity, appliance: Appliance, rotation: u8) -> UVec2 {
    let whole = |px: i32| px > 0 && px % TILE_SIZE == 0;
    if whole(entity.width) && whole(entity.height) {
        return UVec2::new((entity.width / TILE_SIZE) as u32, (entity.height / TILE_SIZE) as u32);
    }
    let size = appliance.default_footprint();
    if rotation % 2 == 1 { UVec2::new(size.y, size.x) } else { size }
}

/// Build hazards from an entity layer, in layer order
///
/// The Player and anything unrecognised are skipped.
pub fn parse_hazards(entities: &[Entity]) -> Vec<Hazard> {
    let mut hazards = Vec::with_capacity(entities.len());
    for entity in entities {
        let pos = px_to_tiles(entity.px);
        if entity.identifier == "Target" {
            hazards.push(Hazard::target(pos));
        } else if let Some(appliance) = Appliance::from_identifier(&entity.identifier) {
            let rotation = entity
                .field(ROTATION_FIELD)
                .and_then(|v| v.as_u64())
                .map_or(0, |r| (r % 4) as u8);
            let size = footprint(entity, appliance, rotation);
            hazards.push(Hazard::appliance(appliance, pos, size, rotation));
        } else {
            log::trace!("Skipping entity '{}'", entity.identifier);
        }
    }
    hazards
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity(value: serde_json::Value) -> Entity {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_durability_from_footprint() {
        let tv = Hazard::appliance(Appliance::Tv, DVec2::ZERO, UVec2::new(2, 2), 0);
        assert_eq!(tv.durability, 1.0);
        let toaster = Hazard::appliance(Appliance::Toaster, DVec2::ZERO, UVec2::ONE, 0);
        assert_eq!(toaster.durability, 0.25);
        assert_eq!(Hazard::target(DVec2::ZERO).durability, 0.0);
    }

    #[test]
    fn test_destroyed_on_twentieth_hit() {
        let mut tv = Hazard::appliance(Appliance::Tv, DVec2::ZERO, UVec2::new(2, 2), 0);
        for _ in 0..19 {
            assert!(!tv.damage(SUCK_DAMAGE));
        }
        assert!(!tv.destroyed);
        assert!(tv.damage(SUCK_DAMAGE));
        assert!(tv.destroyed);
        assert_eq!(tv.durability, 0.0);

        // Further damage is a no-op
        assert!(!tv.damage(SUCK_DAMAGE));
        assert!(tv.destroyed);
        assert_eq!(tv.durability, 0.0);
    }

    #[test]
    fn test_target_dies_on_first_contact() {
        let mut target = Hazard::target(DVec2::new(3.0, 3.0));
        assert!(target.damage(SUCK_DAMAGE));
        assert!(target.destroyed);
    }

    #[test]
    fn test_center_and_radius() {
        let tv = Hazard::appliance(Appliance::Tv, DVec2::new(4.0, 2.0), UVec2::new(2, 2), 0);
        assert_eq!(tv.center(), DVec2::new(5.0, 3.0));
        let expected = (4.0 / std::f64::consts::PI).sqrt() * SUCK_RADIUS_SCALE;
        assert!((tv.radius() - expected).abs() < 1e-12);

        let target = Hazard::target(DVec2::new(1.0, 1.0));
        assert_eq!(target.center(), DVec2::new(1.5, 1.5));
        assert_eq!(target.radius(), TARGET_RADIUS);
    }

    #[test]
    fn test_explosion_timer_caps() {
        let mut toaster = Hazard::appliance(Appliance::Toaster, DVec2::ZERO, UVec2::ONE, 0);
        toaster.advance_explosion();
        assert_eq!(toaster.ticks_since_destroyed, 0);
        assert_eq!(toaster.explosion_frame(), None);

        toaster.damage(1.0);
        assert_eq!(toaster.explosion_frame(), Some(0));
        for _ in 0..200 {
            toaster.advance_explosion();
        }
        assert_eq!(toaster.ticks_since_destroyed, explosion_ticks());
        assert_eq!(toaster.explosion_frame(), None);
    }

    #[test]
    fn test_huge_footprint_does_not_overflow() {
        let side = 70_000 * TILE_SIZE;
        let hazards = parse_hazards(&[entity(
            json!({"identifier": "Wash", "px": [0, 0], "width": side, "height": side}),
        )]);
        assert_eq!(hazards[0].size, UVec2::new(70_000, 70_000));
        assert_eq!(hazards[0].area(), 4.9e9);
        assert_eq!(hazards[0].durability, 4.9e9 * UNIT_PRICE);
        assert!(hazards[0].radius().is_finite());
    }

    #[test]
    fn test_parse_dispatches_on_identifier() {
        let entities = vec![
            entity(json!({"identifier": "Player", "px": [0, 0], "fields": {"Stamina": 2.0}})),
            entity(json!({"identifier": "Toaster", "px": [16, 32]})),
            entity(json!({"identifier": "Sofa", "px": [48, 48]})),
            entity(json!({"identifier": "Tv", "px": [64, 8]})),
            entity(json!({"identifier": "Target", "px": [96, 96]})),
        ];
        let hazards = parse_hazards(&entities);
        assert_eq!(hazards.len(), 3);
        assert_eq!(
            hazards[0].kind,
            HazardKind::Appliance { appliance: Appliance::Toaster, rotation: 0 }
        );
        assert_eq!(hazards[0].pos, DVec2::new(1.0, 2.0));
        assert_eq!(hazards[1].pos, DVec2::new(4.0, 0.5));
        assert_eq!(hazards[1].size, UVec2::new(2, 2));
        assert!(hazards[2].is_target());
    }

    #[test]
    fn test_parse_footprint_and_rotation() {
        let entities = vec![
            entity(json!({"identifier": "Microwave", "px": [0, 0], "fields": {"Rotation": 1}})),
            entity(json!({"identifier": "Microwave", "px": [0, 0], "fields": {"Rotation": 2}})),
            entity(json!({"identifier": "Wash", "px": [0, 0], "width": 48, "height": 32})),
            entity(json!({"identifier": "Wash", "px": [0, 0], "width": 20, "height": 32})),
        ];
        let hazards = parse_hazards(&entities);
        assert_eq!(hazards[0].size, UVec2::new(1, 2));
        assert_eq!(
            hazards[0].kind,
            HazardKind::Appliance { appliance: Appliance::Microwave, rotation: 1 }
        );
        assert_eq!(hazards[1].size, UVec2::new(2, 1));
        assert_eq!(hazards[2].size, UVec2::new(3, 2));
        assert_eq!(hazards[2].durability, 6.0 * UNIT_PRICE);
        assert_eq!(hazards[3].size, UVec2::new(2, 2));
    }
}
