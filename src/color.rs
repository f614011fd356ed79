use std::fmt;

/// A single RGBA color value, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorFormatError {
    BadLength { input: String, len: usize },
    BadDigit { input: String },
}

impl fmt::Display for ColorFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadLength { input, len } => {
                write!(f, "color '{input}' has {len} hex digits, expected 6 (#RRGGBB)")
            }
            Self::BadDigit { input } => {
                write!(f, "color '{input}' contains non-hex digits, expected #RRGGBB")
            }
        }
    }
}

impl std::error::Error for ColorFormatError {}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#RRGGBB` (leading `#` optional) into an opaque color.
    pub fn from_hex(s: &str) -> Result<Self, ColorFormatError> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if body.len() != 6 {
            return Err(ColorFormatError::BadLength {
                input: s.to_string(),
                len: body.len(),
            });
        }
        if !body.is_ascii() {
            return Err(ColorFormatError::BadDigit {
                input: s.to_string(),
            });
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&body[range], 16).map_err(|_| ColorFormatError::BadDigit {
                input: s.to_string(),
            })
        };
        Ok(Self::opaque(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Per-channel linear interpolation, rounded; `t == 0` returns `a`
    /// exactly.
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        let mix = |x: u8, y: u8| (x as f64 * (1.0 - t) + y as f64 * t).round() as u8;
        Self::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), mix(a.a, b.a))
    }
}

/// Fixed colors the renderer falls back to when no texture drives a pixel.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub even: Rgba,
    pub odd: Rgba,
    pub nonconvergent: Rgba,
    pub escaped: Rgba,
    pub background: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            even: Rgba::opaque(0xFF, 0x33, 0x33),
            odd: Rgba::opaque(0x00, 0x00, 0x00),
            nonconvergent: Rgba::opaque(0, 255, 0),
            escaped: Rgba::opaque(255, 0, 255),
            background: Rgba::opaque(255, 255, 255),
        }
    }
}
