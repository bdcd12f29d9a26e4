pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod assets;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig};
pub use api::types::{GameEvent, TipText};
pub use components::behavior::{Behavior, Signal, TickContext};
pub use components::color::Rgb;
pub use components::light::Light;
pub use components::sprite::{SpriteId, SpriteKind};
pub use core::cues::{Continuation, Cue, Cues, TimedTip};
pub use core::level::{LevelDescriptor, LevelHooks, LevelSet, LightDef, NoHooks};
pub use core::rng::{FlickerSource, NoFlicker, Rng};
pub use core::script::LevelScript;
pub use core::session::Session;
pub use core::storage::{MemoryStore, ProgressStore};
pub use renderer::{CompositeMode, Image, PixelSurface, RadialGradient, Surface, Viewport};
pub use input::gesture::{GestureTracker, PointerEvent};
pub use input::queue::{InputEvent, InputQueue};
pub use assets::manifest::{SpriteRect, SpriteSheet};
pub use error::EngineError;
