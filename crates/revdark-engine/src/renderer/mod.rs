pub mod software;
pub mod surface;
pub mod viewport;

// Re-export key types for convenient access
pub use software::PixelSurface;
pub use surface::{CompositeMode, Image, RadialGradient, Surface};
pub use viewport::Viewport;
