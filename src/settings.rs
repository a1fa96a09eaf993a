//! Game settings and policies
//!
//! Loaded once at startup from an optional JSON file and passed by reference
//! into the simulation. Missing keys fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::ColliderSet;

/// Where the player goes after dying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeathPolicy {
    /// Retry the same level
    #[default]
    ReloadLevel,
    /// Back to the title menu
    ReturnToMenu,
}

impl DeathPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathPolicy::ReloadLevel => "reload",
            DeathPolicy::ReturnToMenu => "menu",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reload" | "retry" => Some(DeathPolicy::ReloadLevel),
            "menu" => Some(DeathPolicy::ReturnToMenu),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub death_policy: DeathPolicy,
    /// Show the how-to-play screen between the title and the first level
    pub instructions_screen: bool,
    /// Wall tile ids that block movement
    pub colliders: ColliderSet,
    /// Seed for movement jitter and visual noise
    pub seed: u64,

    // === Visual Effects ===
    /// Screen shake on explosions
    pub screen_shake: bool,
    /// Reduced motion (disables shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            death_policy: DeathPolicy::default(),
            instructions_screen: true,
            colliders: ColliderSet::default(),
            seed: 0x4c44_3439,
            screen_shake: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("No settings at {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
