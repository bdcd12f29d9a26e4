use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Vertical distance (stage units) from a lamp's light point to the top of its sprite.
pub const POST_ANCHOR_Y: f32 = 15.0;

/// Visual family of a light. Decides sprite pair, anchoring and hit radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteKind {
    /// Street lamp on a post.
    #[default]
    Lamp,
    /// Hovering lamp, usually attached to a moving behavior.
    Floater,
    /// The end-of-level orb.
    Orb,
}

impl SpriteKind {
    /// Tap radius in stage units. Floaters move, so they get a larger target.
    pub fn hit_radius(self) -> f32 {
        match self {
            SpriteKind::Floater => 20.0,
            SpriteKind::Lamp | SpriteKind::Orb => 15.0,
        }
    }

    pub fn sprite(self, lit: bool) -> SpriteId {
        match (self, lit) {
            (SpriteKind::Lamp, false) => SpriteId::LampOff,
            (SpriteKind::Lamp, true) => SpriteId::LampOn,
            (SpriteKind::Floater, false) => SpriteId::FloaterOff,
            (SpriteKind::Floater, true) => SpriteId::FloaterOn,
            (SpriteKind::Orb, false) => SpriteId::OrbOff,
            (SpriteKind::Orb, true) => SpriteId::OrbOn,
        }
    }

    /// Offset from the light point to the sprite's top-left corner, in
    /// unscaled sprite pixels.
    pub fn anchor(self, size: Vec2) -> Vec2 {
        match self {
            SpriteKind::Orb => -size * 0.5,
            SpriteKind::Lamp | SpriteKind::Floater => Vec2::new(-size.x * 0.5, -POST_ANCHOR_Y),
        }
    }
}

/// One of the six pre-sliced sprite images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    LampOff,
    LampOn,
    FloaterOff,
    FloaterOn,
    OrbOff,
    OrbOn,
}

impl SpriteId {
    pub const ALL: [SpriteId; 6] = [
        SpriteId::LampOff,
        SpriteId::LampOn,
        SpriteId::FloaterOff,
        SpriteId::FloaterOn,
        SpriteId::OrbOff,
        SpriteId::OrbOn,
    ];

    /// Name used as the key in the sprite-sheet manifest.
    pub fn name(self) -> &'static str {
        match self {
            SpriteId::LampOff => "lamp_off",
            SpriteId::LampOn => "lamp_on",
            SpriteId::FloaterOff => "floater_off",
            SpriteId::FloaterOn => "floater_on",
            SpriteId::OrbOff => "orb_off",
            SpriteId::OrbOn => "orb_on",
        }
    }

    pub fn kind(self) -> SpriteKind {
        match self {
            SpriteId::LampOff | SpriteId::LampOn => SpriteKind::Lamp,
            SpriteId::FloaterOff | SpriteId::FloaterOn => SpriteKind::Floater,
            SpriteId::OrbOff | SpriteId::OrbOn => SpriteKind::Orb,
        }
    }
}
