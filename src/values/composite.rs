use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Fraction, Length, ValueError, format_double, parse, parse_double};

/// A point written as `(x, y)` or `(x, y, z)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }
}

impl FromStr for Coordinate {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse::tuple(s).as_deref() {
            Some([x, y]) => Ok(Self::new(*x, *y)),
            Some([x, y, z]) => Ok(Self::with_z(*x, *y, *z)),
            _ => Err(ValueError::InvalidCoordinate(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}", format_double(self.x), format_double(self.y))?;
        if let Some(z) = self.z {
            write!(f, ", {}", format_double(z))?;
        }
        f.write_str(")")
    }
}

super::impl_schema_value!(Coordinate);

/// An RGB color. Accepts `#RRGGBB`, `RGB(r, g, b)` and the AWT color names;
/// always written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    fn named(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        let color = match key.as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 255, 0),
            "blue" => Self::rgb(0, 0, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "cyan" => Self::rgb(0, 255, 255),
            "magenta" => Self::rgb(255, 0, 255),
            "orange" => Self::rgb(255, 200, 0),
            "pink" => Self::rgb(255, 175, 175),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "darkgray" | "darkgrey" => Self::rgb(64, 64, 64),
            "lightgray" | "lightgrey" => Self::rgb(192, 192, 192),
            _ => return None,
        };
        Some(color)
    }
}

impl FromStr for Color {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || ValueError::InvalidColor(text.to_string());

        if let Some(hex) = text.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            return Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        if text.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("rgb")) {
            let channels = parse::tuple(&text[3..]).ok_or_else(invalid)?;
            let to_u8 = |v: f64| {
                if (0.0..=255.0).contains(&v) && v.fract() == 0.0 {
                    Ok(v as u8)
                } else {
                    Err(invalid())
                }
            };
            return match channels.as_slice() {
                [r, g, b] => Ok(Self::rgb(to_u8(*r)?, to_u8(*g)?, to_u8(*b)?)),
                _ => Err(invalid()),
            };
        }

        Self::named(text).ok_or_else(invalid)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

super::impl_schema_value!(Color);

/// A longitudinal position on a lane.
///
/// Text forms: `BEGIN`, `END`, `END-<length>` (distance before the end),
/// `<percent>%` or a plain number in `[0, 1]` (fraction of the lane length),
/// and `<length>` (distance from the start).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LengthBeginEnd {
    Begin,
    End,
    BeforeEnd(Length),
    Fraction(Fraction),
    FromBegin(Length),
}

impl FromStr for LengthBeginEnd {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = |_| ValueError::InvalidPosition(text.to_string());
        match text {
            "" => Err(ValueError::Empty),
            "BEGIN" => Ok(LengthBeginEnd::Begin),
            "END" => Ok(LengthBeginEnd::End),
            _ => {
                if let Some(length) = parse::before_end(text) {
                    return length.parse().map(LengthBeginEnd::BeforeEnd).map_err(invalid);
                }
                if let Some(percent) = text.strip_suffix('%') {
                    let value = parse_double(percent).map_err(invalid)?;
                    return Fraction::new(value / 100.0).map(LengthBeginEnd::Fraction);
                }
                if let Ok(value) = parse_double(text) {
                    return Fraction::new(value).map(LengthBeginEnd::Fraction);
                }
                text.parse().map(LengthBeginEnd::FromBegin).map_err(invalid)
            }
        }
    }
}

impl fmt::Display for LengthBeginEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthBeginEnd::Begin => f.write_str("BEGIN"),
            LengthBeginEnd::End => f.write_str("END"),
            LengthBeginEnd::BeforeEnd(length) => write!(f, "END-{}", length),
            LengthBeginEnd::Fraction(fraction) => fraction.fmt(f),
            LengthBeginEnd::FromBegin(length) => length.fmt(f),
        }
    }
}

super::impl_schema_value!(LengthBeginEnd);
