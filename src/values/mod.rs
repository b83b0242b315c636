//! Scalar and composite values used in OTS attributes and text content.
//!
//! Every value type converts from and to the text form used in XML documents.
//! Bounded types (`DoublePositive`, `Fraction`, `NonNegative<Length>`, ...)
//! enforce their bound on construction, so a value that exists is always in
//! range. Most schema types also accept an expression `{...}` instead of a
//! literal; those are wrapped in [`ExprValue`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub mod composite;
pub mod enums;
pub mod expr;
pub mod numeric;
pub(crate) mod parse;
pub mod quantity;

pub use composite::{Color, Coordinate, LengthBeginEnd};
pub use enums::{
    Anticipation, ArcDirection, CompatibilityDirection, Cooperation, EncodingType, Estimation,
    GapAcceptance, GraphicsType, HeadwayDistribution, Interpolation, LaneKeepingPolicy,
    LateralSync, Priority, RoomChecker, Space, Synchronization, Tailgating, TaskManager,
};
pub use expr::{ExprValue, Expression};
pub use numeric::{ClassName, DoublePositive, DoublePositiveInclusive, Fraction, PositiveInteger};
pub use quantity::{
    Acceleration, AccelerationUnit, Angle, AngleUnit, Duration, DurationUnit, Frequency,
    FrequencyUnit, Length, LengthUnit, LinearDensity, LinearDensityUnit, NonNegative, Quantity,
    Speed, SpeedUnit, Unit,
};

/// Errors raised when converting text into a value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("empty value")]
    Empty,

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("invalid boolean '{0}' (expected true, false, 1 or 0)")]
    InvalidBoolean(String),

    #[error("value {value} is out of bounds (must be {bound})")]
    OutOfBounds { value: String, bound: &'static str },

    #[error("missing unit in '{0}'")]
    MissingUnit(String),

    #[error("unknown {kind} unit '{unit}'")]
    UnknownUnit { kind: &'static str, unit: String },

    #[error("unknown {kind} value '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("invalid expression '{0}'")]
    InvalidExpression(String),

    #[error("invalid coordinate '{0}'")]
    InvalidCoordinate(String),

    #[error("invalid color '{0}'")]
    InvalidColor(String),

    #[error("invalid position '{0}'")]
    InvalidPosition(String),
}

/// A value with a text form in OTS documents.
///
/// Implemented for the primitive types and for every value type in this
/// module, so that [`ExprValue<T>`] can be read and written for all of them.
pub trait SchemaValue: Sized {
    fn parse_value(text: &str) -> Result<Self, ValueError>;
    fn format_value(&self) -> String;
}

macro_rules! impl_schema_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::values::SchemaValue for $ty {
                fn parse_value(text: &str) -> Result<Self, $crate::values::ValueError> {
                    text.parse()
                }

                fn format_value(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}
pub(crate) use impl_schema_value;

impl SchemaValue for f64 {
    fn parse_value(text: &str) -> Result<Self, ValueError> {
        parse_double(text)
    }

    fn format_value(&self) -> String {
        format_double(*self)
    }
}

impl SchemaValue for i32 {
    fn parse_value(text: &str) -> Result<Self, ValueError> {
        parse_integer(text)
    }

    fn format_value(&self) -> String {
        self.to_string()
    }
}

impl SchemaValue for i64 {
    fn parse_value(text: &str) -> Result<Self, ValueError> {
        parse_integer(text)
    }

    fn format_value(&self) -> String {
        self.to_string()
    }
}

impl SchemaValue for bool {
    fn parse_value(text: &str) -> Result<Self, ValueError> {
        parse_boolean(text)
    }

    fn format_value(&self) -> String {
        self.to_string()
    }
}

impl SchemaValue for String {
    fn parse_value(text: &str) -> Result<Self, ValueError> {
        Ok(text.to_string())
    }

    fn format_value(&self) -> String {
        self.clone()
    }
}

/// Parses an `xs:double`, including the `INF`, `-INF` and `NaN` spellings.
pub fn parse_double(text: &str) -> Result<f64, ValueError> {
    let trimmed = text.trim();
    match trimmed {
        "" => Err(ValueError::Empty),
        "INF" | "+INF" => Ok(f64::INFINITY),
        "-INF" => Ok(f64::NEG_INFINITY),
        "NaN" => Ok(f64::NAN),
        _ => trimmed
            .parse::<f64>()
            .map_err(|_| ValueError::InvalidNumber(trimmed.to_string())),
    }
}

/// Formats an `f64` the way `xs:double` spells it.
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "INF" } else { "-INF" }.to_string()
    } else {
        value.to_string()
    }
}

fn parse_integer<T: FromStr>(text: &str) -> Result<T, ValueError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValueError::Empty);
    }
    trimmed
        .strip_prefix('+')
        .unwrap_or(trimmed)
        .parse::<T>()
        .map_err(|_| ValueError::InvalidNumber(trimmed.to_string()))
}

/// Parses an `xs:boolean`.
pub fn parse_boolean(text: &str) -> Result<bool, ValueError> {
    match text.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(ValueError::InvalidBoolean(other.to_string())),
    }
}

pub(crate) fn write_double(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    f.write_str(&format_double(value))
}

// Aliases named after the schema's simple types. Each accepts a literal or an
// expression.
pub type LengthType = ExprValue<Length>;
pub type PositiveLengthType = ExprValue<NonNegative<Length>>;
pub type DurationType = ExprValue<Duration>;
pub type PositiveDurationType = ExprValue<NonNegative<Duration>>;
pub type SpeedType = ExprValue<Speed>;
pub type PositiveSpeedType = ExprValue<NonNegative<Speed>>;
pub type AccelerationType = ExprValue<Acceleration>;
pub type PositiveAccelerationType = ExprValue<NonNegative<Acceleration>>;
pub type LinearDensityType = ExprValue<LinearDensity>;
pub type FrequencyType = ExprValue<Frequency>;
pub type AngleType = ExprValue<Angle>;
pub type DoubleType = ExprValue<f64>;
pub type DoublePositiveType = ExprValue<DoublePositive>;
pub type DoublePositiveInclusiveType = ExprValue<DoublePositiveInclusive>;
pub type FractionType = ExprValue<Fraction>;
pub type IntegerType = ExprValue<i32>;
pub type LongType = ExprValue<i64>;
pub type PositiveIntegerType = ExprValue<PositiveInteger>;
pub type BooleanType = ExprValue<bool>;
pub type StringType = ExprValue<String>;
pub type ClassNameType = ExprValue<ClassName>;
pub type CoordinateType = ExprValue<Coordinate>;
pub type ColorType = ExprValue<Color>;
pub type LengthBeginEndType = ExprValue<LengthBeginEnd>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_specials() {
        assert_eq!(parse_double("INF").unwrap(), f64::INFINITY);
        assert_eq!(parse_double(" -INF ").unwrap(), f64::NEG_INFINITY);
        assert!(parse_double("NaN").unwrap().is_nan());
        assert_eq!(format_double(f64::NEG_INFINITY), "-INF");
        assert_eq!(format_double(2.5), "2.5");
    }

    #[test]
    fn test_double_errors() {
        assert_eq!(parse_double("  "), Err(ValueError::Empty));
        assert!(matches!(parse_double("abc"), Err(ValueError::InvalidNumber(_))));
    }

    #[test]
    fn test_boolean() {
        assert!(parse_boolean("1").unwrap());
        assert!(!parse_boolean("false").unwrap());
        assert!(matches!(parse_boolean("yes"), Err(ValueError::InvalidBoolean(_))));
    }

    #[test]
    fn test_integer_with_sign() {
        assert_eq!(i32::parse_value("+42").unwrap(), 42);
        assert_eq!(i64::parse_value("-7").unwrap(), -7);
        assert!(i32::parse_value("4.2").is_err());
    }
}
