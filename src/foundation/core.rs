use std::{fmt, time::Duration};

use crate::foundation::error::{RectAnimError, RectAnimResult};

/// Integer surface coordinate. The unit of animatable vertex state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn set(&mut self, other: Point) {
        self.x = other.x;
        self.y = other.y;
    }

    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(f64::from(self.x), f64::from(self.y))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Drawable extent of the rendering surface in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A surface with no extent in either direction has no meaningful geometry.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn center(self) -> Point {
        Point::new(half(self.width), half(self.height))
    }
}

fn half(v: u32) -> i32 {
    i32::try_from(v / 2).unwrap_or(i32::MAX)
}

/// Straight (non-premultiplied) RGBA8 colour.
///
/// Serialized as `#RRGGBB` when opaque and `#AARRGGBB` otherwise, the notation layout
/// attributes use for colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const BLUE: Self = Self::opaque(0, 0, 255);
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Replace the alpha channel, keeping the colour.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn parse_hex(s: &str) -> RectAnimResult<Self> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| RectAnimError::validation(format!("colour '{s}' must start with '#'")))?;
        let channel = |i: usize| -> RectAnimResult<u8> {
            digits
                .get(i..i + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| RectAnimError::validation(format!("colour '{s}' is not valid hex")))
        };
        match digits.len() {
            6 => Ok(Self::opaque(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self {
                a: channel(0)?,
                r: channel(2)?,
                g: channel(4)?,
                b: channel(6)?,
            }),
            _ => Err(RectAnimError::validation(format!(
                "colour '{s}' must be #RRGGBB or #AARRGGBB"
            ))),
        }
    }

    /// Premultiplied RGBA8 bytes.
    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }
        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02X}{:02X}{:02X}{:02X}",
                self.a, self.r, self.g, self.b
            )
        }
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = RectAnimError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgba8> for String {
    fn from(value: Rgba8) -> Self {
        value.to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> RectAnimResult<Self> {
        if den == 0 {
            return Err(RectAnimError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(RectAnimError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Number of whole frames that fit in `span`.
    pub fn frames_in(self, span: Duration) -> u64 {
        (span.as_secs_f64() * self.as_f64()).floor().max(0.0) as u64
    }
}

/// Animation speed multiplier. One phase lasts `1000 ms / speed`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Speed(f64);

impl Speed {
    pub const NORMAL: Self = Self(1.0);

    /// Rejects non-finite, zero, negative and vanishingly small speeds whose phase
    /// duration would not be representable.
    pub fn new(value: f64) -> RectAnimResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(RectAnimError::validation(format!(
                "speed must be a positive finite number, got {value}"
            )));
        }
        Duration::try_from_secs_f64(1.0 / value).map_err(|_| {
            RectAnimError::validation(format!("speed {value} yields an unrepresentable duration"))
        })?;
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Length of one geometric phase.
    pub fn phase_duration(self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.0).unwrap_or(Duration::MAX)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl TryFrom<f64> for Speed {
    type Error = RectAnimError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Speed> for f64 {
    fn from(value: Speed) -> Self {
        value.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
