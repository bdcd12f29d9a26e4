use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// An opaque 8-bit RGB colour.
///
/// Serialized as a CSS string (`"rgb(230, 230, 220)"`) so level files read the
/// same way a canvas fill style does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    /// Default lamp colour. Slightly off-white so overlapping discs still read.
    pub const WARM_WHITE: Rgb = Rgb::new(230, 230, 220);
    /// Colour forced onto the end light every tick.
    pub const END_RED: Rgb = Rgb::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB` packing, the value the tap threshold is compared against.
    pub fn packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Linear interpolation per channel, `t` clamped to [0, 1].
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Saturating per-channel sum ("lighter" compositing).
    pub fn add(self, other: Rgb) -> Rgb {
        Rgb::new(
            self.r.saturating_add(other.r),
            self.g.saturating_add(other.g),
            self.b.saturating_add(other.b),
        )
    }

    /// Per-channel product normalised to 255 (multiply compositing).
    pub fn multiply(self, other: Rgb) -> Rgb {
        let mul = |a: u8, b: u8| ((a as u16 * b as u16 + 127) / 255) as u8;
        Rgb::new(mul(self.r, other.r), mul(self.g, other.g), mul(self.b, other.b))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WARM_WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || EngineError::Color(s.to_string());
        let trimmed = s.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 {
                return Err(bad());
            }
            let value = u32::from_str_radix(hex, 16).map_err(|_| bad())?;
            return Ok(Rgb::new((value >> 16) as u8, (value >> 8) as u8, value as u8));
        }

        let inner = trimmed
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(bad)?;
        let mut channels = inner.split(',').map(|c| c.trim().parse::<u8>());
        let mut next = || channels.next().ok_or_else(bad)?.map_err(|_| bad());
        let rgb = Rgb::new(next()?, next()?, next()?);
        if channels.next().is_some() {
            return Err(bad());
        }
        Ok(rgb)
    }
}

impl TryFrom<String> for Rgb {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}
