//! Physical quantities with units.
//!
//! A quantity keeps the unit it was written in, so `"90 km/h"` is read back
//! and written out as `90 km/h`. [`Quantity::si_value`] converts to SI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ValueError, format_double, parse};

/// A unit of one physical dimension.
pub trait Unit: Copy + fmt::Display + FromStr<Err = ValueError> {
    /// The SI (or SI-coherent) unit of the dimension.
    const SI: Self;
    /// Name of the attribute that holds this unit on distribution elements.
    const ATTRIBUTE: &'static str;

    fn symbol(&self) -> &'static str;
    fn si_factor(&self) -> f64;
}

/// A value in a unit.
pub trait Quantity: Copy {
    type Unit: Unit;

    fn new(value: f64, unit: Self::Unit) -> Self;
    fn value(&self) -> f64;
    fn unit(&self) -> Self::Unit;

    fn si_value(&self) -> f64 {
        self.value() * self.unit().si_factor()
    }
}

macro_rules! unit_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, $attribute:literal, si = $si:ident,
        { $($variant:ident => $symbol:literal $(| $alias:literal)*, $factor:expr;)+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl Unit for $name {
            const SI: Self = $name::$si;
            const ATTRIBUTE: &'static str = $attribute;

            fn symbol(&self) -> &'static str {
                match self {
                    $($name::$variant => $symbol),+
                }
            }

            fn si_factor(&self) -> f64 {
                match self {
                    $($name::$variant => $factor),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($symbol $(| $alias)* => Ok($name::$variant),)+
                    "" => Err(ValueError::MissingUnit(s.to_string())),
                    other => Err(ValueError::UnknownUnit {
                        kind: $kind,
                        unit: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.symbol())
            }
        }

        super::impl_schema_value!($name);
    };
}

macro_rules! quantity {
    ($(#[$meta:meta])* $name:ident, $unit:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            value: f64,
            unit: $unit,
        }

        impl $name {
            pub const fn new(value: f64, unit: $unit) -> Self {
                Self { value, unit }
            }

            /// A value in the SI unit.
            pub const fn si(value: f64) -> Self {
                Self::new(value, <$unit as Unit>::SI)
            }

            pub fn value(&self) -> f64 {
                self.value
            }

            pub fn unit(&self) -> $unit {
                self.unit
            }

            pub fn si_value(&self) -> f64 {
                self.value * self.unit.si_factor()
            }

            /// The same amount expressed in another unit.
            pub fn to_unit(&self, unit: $unit) -> Self {
                Self::new(self.si_value() / unit.si_factor(), unit)
            }
        }

        impl Quantity for $name {
            type Unit = $unit;

            fn new(value: f64, unit: $unit) -> Self {
                $name::new(value, unit)
            }

            fn value(&self) -> f64 {
                self.value
            }

            fn unit(&self) -> $unit {
                self.unit
            }
        }

        impl FromStr for $name {
            type Err = ValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.trim().is_empty() {
                    return Err(ValueError::Empty);
                }
                let (value, unit) = parse::split_quantity(s)
                    .ok_or_else(|| ValueError::InvalidNumber(s.trim().to_string()))?;
                if unit.is_empty() {
                    return Err(ValueError::MissingUnit(s.trim().to_string()));
                }
                Ok(Self::new(value, unit.parse()?))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", format_double(self.value), self.unit.symbol())
            }
        }

        super::impl_schema_value!($name);
    };
}

const MILE: f64 = 1609.344;
const NAUTICAL_MILE: f64 = 1852.0;
const FOOT: f64 = 0.3048;
const HOUR: f64 = 3600.0;

unit_enum!(
    LengthUnit, "length", "LengthUnit", si = Meter,
    {
        Meter => "m", 1.0;
        Kilometer => "km", 1000.0;
        Hectometer => "hm", 100.0;
        Decameter => "dam", 10.0;
        Decimeter => "dm", 0.1;
        Centimeter => "cm", 0.01;
        Millimeter => "mm", 0.001;
        Micrometer => "um" | "μm", 1e-6;
        Mile => "mi", MILE;
        NauticalMile => "NM", NAUTICAL_MILE;
        Yard => "yd", 0.9144;
        Foot => "ft", FOOT;
        Inch => "in", 0.0254;
    }
);

unit_enum!(
    DurationUnit, "duration", "DurationUnit", si = Second,
    {
        Second => "s" | "sec", 1.0;
        Millisecond => "ms", 1e-3;
        Microsecond => "us" | "μs", 1e-6;
        Minute => "min", 60.0;
        Hour => "h" | "hr", HOUR;
        Day => "day", 86_400.0;
        Week => "wk", 604_800.0;
    }
);

unit_enum!(
    SpeedUnit, "speed", "SpeedUnit", si = MeterPerSecond,
    {
        MeterPerSecond => "m/s", 1.0;
        KilometerPerHour => "km/h", 1000.0 / HOUR;
        MilePerHour => "mi/h" | "mph", MILE / HOUR;
        FootPerSecond => "ft/s", FOOT;
        Knot => "kt", NAUTICAL_MILE / HOUR;
    }
);

unit_enum!(
    AccelerationUnit, "acceleration", "AccelerationUnit", si = MeterPerSecond2,
    {
        MeterPerSecond2 => "m/s2" | "m/s^2", 1.0;
        KilometerPerHour2 => "km/h2" | "km/h^2", 1000.0 / (HOUR * HOUR);
        FootPerSecond2 => "ft/s2" | "ft/s^2", FOOT;
        MilePerHour2 => "mi/h2" | "mi/h^2", MILE / (HOUR * HOUR);
        KnotPerSecond => "kt/s", NAUTICAL_MILE / HOUR;
        StandardGravity => "g", 9.80665;
    }
);

unit_enum!(
    LinearDensityUnit, "linear density", "LinearDensityUnit", si = PerMeter,
    {
        PerMeter => "/m" | "1/m", 1.0;
        PerKilometer => "/km" | "1/km", 1e-3;
        PerCentimeter => "/cm" | "1/cm", 100.0;
        PerMillimeter => "/mm" | "1/mm", 1000.0;
        PerMile => "/mi" | "1/mi", 1.0 / MILE;
        PerFoot => "/ft" | "1/ft", 1.0 / FOOT;
    }
);

unit_enum!(
    FrequencyUnit, "frequency", "FrequencyUnit", si = PerSecond,
    {
        PerSecond => "/s" | "1/s", 1.0;
        Hertz => "Hz", 1.0;
        Kilohertz => "kHz", 1000.0;
        PerMinute => "/min" | "1/min", 1.0 / 60.0;
        PerHour => "/h" | "1/h", 1.0 / HOUR;
        PerDay => "/day" | "1/day", 1.0 / 86_400.0;
    }
);

unit_enum!(
    AngleUnit, "angle", "AngleUnit", si = Radian,
    {
        Radian => "rad", 1.0;
        Degree => "deg" | "°", std::f64::consts::PI / 180.0;
    }
);

quantity!(Length, LengthUnit);
quantity!(Duration, DurationUnit);
quantity!(Speed, SpeedUnit);
quantity!(Acceleration, AccelerationUnit);
quantity!(LinearDensity, LinearDensityUnit);
quantity!(Frequency, FrequencyUnit);
quantity!(Angle, AngleUnit);

/// A quantity that may not be negative (the schema's `Positive*Type`s,
/// which include zero).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NonNegative<Q>(Q);

impl<Q: Quantity> NonNegative<Q> {
    pub fn new(quantity: Q) -> Result<Self, ValueError> {
        if quantity.si_value() >= 0.0 {
            Ok(Self(quantity))
        } else {
            Err(ValueError::OutOfBounds {
                value: format_double(quantity.value()),
                bound: ">= 0",
            })
        }
    }

    pub fn get(&self) -> Q {
        self.0
    }
}

impl<Q: Quantity + FromStr<Err = ValueError>> FromStr for NonNegative<Q> {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.parse()?)
    }
}

impl<Q: fmt::Display> fmt::Display for NonNegative<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<Q: Quantity + FromStr<Err = ValueError> + fmt::Display> super::SchemaValue for NonNegative<Q> {
    fn parse_value(text: &str) -> Result<Self, ValueError> {
        text.parse()
    }

    fn format_value(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length() {
        let length: Length = "5 m".parse().unwrap();
        assert_eq!(length, Length::new(5.0, LengthUnit::Meter));
        assert_eq!("2.5km".parse::<Length>().unwrap().si_value(), 2500.0);
        assert_eq!(length.to_string(), "5 m");
    }

    #[test]
    fn test_unit_errors() {
        assert_eq!(
            "5".parse::<Length>(),
            Err(ValueError::MissingUnit("5".to_string()))
        );
        assert!(matches!(
            "5 parsec".parse::<Length>(),
            Err(ValueError::UnknownUnit { kind: "length", .. })
        ));
        assert!(matches!("fast".parse::<Speed>(), Err(ValueError::InvalidNumber(_))));
    }

    #[test]
    fn test_speed_conversion() {
        let speed: Speed = "36 km/h".parse().unwrap();
        assert!((speed.si_value() - 10.0).abs() < 1e-12);
        let converted = speed.to_unit(SpeedUnit::MeterPerSecond);
        assert!((converted.value() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_frequency_aliases() {
        let per_hour: Frequency = "1200 1/h".parse().unwrap();
        assert_eq!(per_hour.unit(), FrequencyUnit::PerHour);
        assert_eq!(per_hour.to_string(), "1200 /h");
        let hz: Frequency = "2Hz".parse().unwrap();
        assert_eq!(hz.si_value(), 2.0);
    }

    #[test]
    fn test_duration_units() {
        let d: Duration = "1.5 min".parse().unwrap();
        assert_eq!(d.si_value(), 90.0);
        assert_eq!(DurationUnit::ATTRIBUTE, "DurationUnit");
    }

    #[test]
    fn test_non_negative() {
        let zero: NonNegative<Length> = "0.0 m".parse().unwrap();
        assert_eq!(zero.get().value(), 0.0);
        assert!(matches!(
            "-1 s".parse::<NonNegative<Duration>>(),
            Err(ValueError::OutOfBounds { bound: ">= 0", .. })
        ));
    }

    #[test]
    fn test_angle_degrees() {
        let angle: Angle = "180 deg".parse().unwrap();
        assert!((angle.si_value() - std::f64::consts::PI).abs() < 1e-12);
    }
}
