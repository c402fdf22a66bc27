use crate::{Error, Result};

/// Parses `#rgb`, `#rrggbb` and `#rrggbbaa` hex colors (alpha ignored).
pub fn parse_hex(text: &str) -> Result<[u8; 3]> {
    let s = text.trim();
    let err = || Error::InvalidColor {
        color: text.to_string(),
    };
    let hex = s.strip_prefix('#').ok_or_else(err)?;

    fn hex2(b: &[u8]) -> Option<u8> {
        let hi = (*b.first()? as char).to_digit(16)? as u8;
        let lo = (*b.get(1)? as char).to_digit(16)? as u8;
        Some((hi << 4) | lo)
    }
    fn hex1(c: u8) -> Option<u8> {
        let v = (c as char).to_digit(16)? as u8;
        Some((v << 4) | v)
    }

    let channels = |bytes: &[u8]| -> Option<[u8; 3]> {
        match bytes.len() {
            3 | 4 => Some([hex1(bytes[0])?, hex1(bytes[1])?, hex1(bytes[2])?]),
            6 | 8 => Some([hex2(&bytes[0..2])?, hex2(&bytes[2..4])?, hex2(&bytes[4..6])?]),
            _ => None,
        }
    };
    channels(hex.as_bytes()).ok_or_else(err)
}

pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Two-stop ramp interpolated linearly in RGB. Monotonic by construction:
/// each channel moves one way along the ramp.
#[derive(Debug, Clone, Copy)]
pub struct ColorRamp {
    start: [u8; 3],
    end: [u8; 3],
}

impl ColorRamp {
    pub fn new(start: [u8; 3], end: [u8; 3]) -> Self {
        Self { start, end }
    }

    /// Default ramp: light green to dark green (the sequential greens ramp
    /// the hosted variant used).
    pub fn greens() -> Self {
        Self::new([0xe5, 0xf5, 0xe0], [0x00, 0x44, 0x1b])
    }

    pub fn at(&self, t: f64) -> [u8; 3] {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| -> u8 {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
        };
        [
            lerp(self.start[0], self.end[0]),
            lerp(self.start[1], self.end[1]),
            lerp(self.start[2], self.end[2]),
        ]
    }
}

/// Continuous `[min, max] -> color` scale over a ramp.
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    min: f64,
    max: f64,
    ramp: ColorRamp,
}

impl ColorScale {
    pub fn new(min: f64, max: f64, ramp: ColorRamp) -> Self {
        Self { min, max, ramp }
    }

    pub fn color(&self, value: f64) -> String {
        let t = if self.max > self.min {
            (value - self.min) / (self.max - self.min)
        } else {
            // Degenerate domain (single value): everything maps to the top.
            1.0
        };
        to_hex(self.ramp.at(t))
    }
}
