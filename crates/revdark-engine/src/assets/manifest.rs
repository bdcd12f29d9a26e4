use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::sprite::SpriteId;
use crate::error::EngineError;

const BUILTIN_SHEET: &str = include_str!("../../assets/sprites.json");

/// Sprite-sheet layout: where each named sprite sits in the sheet image, plus
/// the tileable background image path. Loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteSheet {
    /// Relative path to the sheet image (e.g. "sprites.png").
    pub path: String,
    /// Relative path to the tileable stage background (e.g. "bg.jpg").
    pub background: String,
    /// Sprite name → source rectangle in the sheet.
    #[serde(default)]
    pub sprites: HashMap<String, SpriteRect>,
}

/// Source rectangle of one sprite, in sheet pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl SpriteRect {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w as f32, self.h as f32)
    }
}

impl SpriteSheet {
    /// Parse a sheet from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The sheet shipped with the game.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_SHEET).unwrap_or_else(|e| {
            log::warn!("built-in sprite sheet unreadable: {}", e);
            Self {
                path: String::new(),
                background: String::new(),
                sprites: HashMap::new(),
            }
        })
    }

    pub fn rect(&self, sprite: SpriteId) -> Option<&SpriteRect> {
        self.sprites.get(sprite.name())
    }

    /// Unscaled sprite size; zero when the sheet lacks the sprite.
    pub fn size(&self, sprite: SpriteId) -> Vec2 {
        self.rect(sprite).map(SpriteRect::size).unwrap_or(Vec2::ZERO)
    }

    /// Names of sprites the engine needs but the sheet does not define.
    pub fn missing(&self) -> Vec<&'static str> {
        SpriteId::ALL
            .iter()
            .map(|id| id.name())
            .filter(|name| !self.sprites.contains_key(*name))
            .collect()
    }
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self::builtin()
    }
}
