pub mod behavior;
pub mod color;
pub mod light;
pub mod sprite;
