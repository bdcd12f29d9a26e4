use std::fmt;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::cues::Cues;
use super::script::LevelScript;
use super::session::Session;
use crate::components::behavior::Behavior;
use crate::components::color::Rgb;
use crate::components::light::Light;
use crate::components::sprite::SpriteKind;
use crate::error::EngineError;

const BUILTIN_LEVELS: &str = include_str!("../../assets/levels.json");

fn default_start_zoom() -> f32 {
    1.0
}

fn default_drain() -> f32 {
    0.9
}

/// Authored light as it appears in a level file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightDef {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub interactive: bool,
    #[serde(default)]
    pub lit: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub behaviors: Vec<Behavior>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    #[serde(default)]
    pub sprite: SpriteKind,
}

impl LightDef {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            interactive: false,
            lit: false,
            behaviors: Vec::new(),
            color: None,
            sprite: SpriteKind::Lamp,
        }
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_lit(mut self, lit: bool) -> Self {
        self.lit = lit;
        self
    }

    pub fn with_sprite(mut self, sprite: SpriteKind) -> Self {
        self.sprite = sprite;
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behaviors.push(behavior);
        self
    }

    /// Fresh runtime light at full power.
    pub fn build(&self) -> Light {
        let mut light = Light::new(Vec2::new(self.x, self.y))
            .with_interactive(self.interactive)
            .with_lit(self.lit)
            .with_kind(self.sprite)
            .with_color(self.color.unwrap_or(Rgb::WARM_WHITE));
        light.behaviors = self.behaviors.clone();
        light
    }
}

/// Optional per-level code run at start, every frame and at the end.
///
/// All methods default to doing nothing.
pub trait LevelHooks {
    /// Runs once when the level starts, before the loop is enabled.
    fn on_init(&self, _session: &mut Session, _cues: &mut Cues) {}

    /// Runs every frame after the failure check.
    fn on_tick(&self, _session: &mut Session, _cues: &mut Cues, _elapsed_ms: f32) {}

    /// Runs when the level ends, on success or failure.
    fn on_end(&self, _session: &mut Session, _cues: &mut Cues, _success: bool) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl LevelHooks for NoHooks {}

/// Static description of one level. Index 0 is the tutorial; the first light
/// is the start light and the last is the end light.
#[derive(Clone, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub stage_width: f32,
    pub stage_height: f32,
    pub start_x: f32,
    pub start_y: f32,
    #[serde(default = "default_start_zoom")]
    pub start_zoom: f32,
    /// Illumination radius of a light at full power, in stage units.
    pub light_radius: f32,
    /// Base of the per-lit-light power drain.
    #[serde(default = "default_drain")]
    pub drain_multiplier: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<LevelScript>,
    /// Code-supplied hooks; take precedence over `script`.
    #[serde(skip)]
    pub hooks: Option<Rc<dyn LevelHooks>>,
    pub lights: Vec<LightDef>,
}

impl fmt::Debug for LevelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelDescriptor")
            .field("stage_width", &self.stage_width)
            .field("stage_height", &self.stage_height)
            .field("start", &(self.start_x, self.start_y, self.start_zoom))
            .field("light_radius", &self.light_radius)
            .field("drain_multiplier", &self.drain_multiplier)
            .field("script", &self.script)
            .field("hooks", &self.hooks.is_some())
            .field("lights", &self.lights.len())
            .finish()
    }
}

impl LevelDescriptor {
    pub fn new(stage_width: f32, stage_height: f32) -> Self {
        Self {
            stage_width,
            stage_height,
            start_x: stage_width * 0.5,
            start_y: stage_height * 0.5,
            start_zoom: default_start_zoom(),
            light_radius: 150.0,
            drain_multiplier: default_drain(),
            script: None,
            hooks: None,
            lights: Vec::new(),
        }
    }

    pub fn with_start(mut self, x: f32, y: f32, zoom: f32) -> Self {
        self.start_x = x;
        self.start_y = y;
        self.start_zoom = zoom;
        self
    }

    pub fn with_light_radius(mut self, radius: f32) -> Self {
        self.light_radius = radius;
        self
    }

    pub fn with_drain(mut self, drain: f32) -> Self {
        self.drain_multiplier = drain;
        self
    }

    pub fn with_light(mut self, light: LightDef) -> Self {
        self.lights.push(light);
        self
    }

    pub fn with_script(mut self, script: LevelScript) -> Self {
        self.script = Some(script);
        self
    }

    pub fn with_hooks(mut self, hooks: Rc<dyn LevelHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn stage_size(&self) -> Vec2 {
        Vec2::new(self.stage_width, self.stage_height)
    }

    pub fn start_point(&self) -> Vec2 {
        Vec2::new(self.start_x, self.start_y)
    }

    /// The hooks this level runs: explicit hooks, else its script, else none.
    pub fn resolve_hooks(&self) -> Rc<dyn LevelHooks> {
        if let Some(hooks) = &self.hooks {
            return Rc::clone(hooks);
        }
        match &self.script {
            Some(script) => Rc::new(script.clone()),
            None => Rc::new(NoHooks),
        }
    }
}

/// The ordered campaign.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelSet {
    pub levels: Vec<LevelDescriptor>,
}

impl LevelSet {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let set: LevelSet = serde_json::from_str(json)?;
        for (index, level) in set.levels.iter().enumerate() {
            if level.lights.is_empty() {
                return Err(EngineError::InvalidLevel(index, "level has no lights".into()));
            }
        }
        Ok(set)
    }

    /// The eight levels shipped with the game.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_LEVELS).unwrap_or_else(|e| {
            log::warn!("built-in levels unreadable: {}", e);
            Self::default()
        })
    }

    pub fn get(&self, index: usize) -> Result<&LevelDescriptor, EngineError> {
        self.levels.get(index).ok_or(EngineError::UnknownLevel(index))
    }

    pub fn has(&self, index: usize) -> bool {
        index < self.levels.len()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn push(&mut self, level: LevelDescriptor) {
        self.levels.push(level);
    }
}
