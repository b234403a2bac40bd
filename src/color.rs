use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 24-bit color. Parses from `#rrggbb` or `rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Linear interpolation towards `other`, `t` in `[0,1]`.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    /// Moves the color towards white by `amount`.
    pub fn lighten(self, amount: f32) -> Rgb {
        self.lerp(Rgb::WHITE, amount)
    }

    pub fn to_f32(self) -> (f32, f32, f32) {
        (self.0 as f32, self.1 as f32, self.2 as f32)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

impl FromStr for Rgb {
    type Err = EngineError;

    fn from_str(hex: &str) -> Result<Self, Self::Err> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(EngineError::InvalidColor(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| EngineError::InvalidColor(hex.to_string()))
        };

        Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!("#1a1b26".parse::<Rgb>().unwrap(), Rgb(0x1a, 0x1b, 0x26));
        assert_eq!("FFFFFF".parse::<Rgb>().unwrap(), Rgb::WHITE);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!("#fff".parse::<Rgb>().is_err());
        assert!("zz0000".parse::<Rgb>().is_err());
        assert!("#ééé".parse::<Rgb>().is_err());
        assert!("+f+f+f".parse::<Rgb>().is_err());
    }

    #[test]
    fn accepts_at_most_one_hash() {
        assert!("##ffffff".parse::<Rgb>().is_err());
        assert!("##fffff".parse::<Rgb>().is_err());
        assert!(matches!("##ffffff".parse::<Rgb>(), Err(EngineError::InvalidColor(_))));
    }

    #[test]
    fn display_matches_parse() {
        let color = Rgb(255, 128, 0);
        assert_eq!(color.to_string(), "#ff8000");
        assert_eq!(color.to_string().parse::<Rgb>().unwrap(), color);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 0.0), Rgb::BLACK);
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 1.0), Rgb::WHITE);
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 7.0), Rgb::WHITE);
    }
}
