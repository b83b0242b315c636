//! Bounded numeric scalars.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ValueError, parse_double, write_double};

macro_rules! bounded_double {
    ($(#[$meta:meta])* $name:ident, $bound:literal, |$v:ident| $check:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
        #[serde(try_from = "f64", into = "f64")]
        pub struct $name(f64);

        impl $name {
            pub fn new($v: f64) -> Result<Self, ValueError> {
                if $check {
                    Ok(Self($v))
                } else {
                    Err(ValueError::OutOfBounds {
                        value: $v.to_string(),
                        bound: $bound,
                    })
                }
            }

            pub fn get(self) -> f64 {
                self.0
            }
        }

        impl TryFrom<f64> for $name {
            type Error = ValueError;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = ValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(parse_double(s)?)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_double(f, self.0)
            }
        }

        super::impl_schema_value!($name);
    };
}

bounded_double!(
    /// A double strictly greater than zero.
    DoublePositive, "> 0", |v| v > 0.0
);

bounded_double!(
    /// A double greater than or equal to zero.
    DoublePositiveInclusive, ">= 0", |v| v >= 0.0
);

bounded_double!(
    /// A double in `[0, 1]`.
    Fraction, "in [0, 1]", |v| (0.0..=1.0).contains(&v)
);

impl Fraction {
    pub const ZERO: Fraction = Fraction(0.0);
    pub const ONE: Fraction = Fraction(1.0);
}

impl DoublePositive {
    pub const ONE: DoublePositive = DoublePositive(1.0);
}

impl DoublePositiveInclusive {
    pub const ZERO: DoublePositiveInclusive = DoublePositiveInclusive(0.0);
    pub const ONE: DoublePositiveInclusive = DoublePositiveInclusive(1.0);
}

/// An integer of at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PositiveInteger(i64);

impl PositiveInteger {
    pub fn new(value: i64) -> Result<Self, ValueError> {
        if value >= 1 {
            Ok(Self(value))
        } else {
            Err(ValueError::OutOfBounds {
                value: value.to_string(),
                bound: ">= 1",
            })
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for PositiveInteger {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PositiveInteger> for i64 {
    fn from(value: PositiveInteger) -> Self {
        value.0
    }
}

impl FromStr for PositiveInteger {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = <i64 as super::SchemaValue>::parse_value(s)?;
        Self::new(value)
    }
}

impl fmt::Display for PositiveInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

super::impl_schema_value!(PositiveInteger);

/// A fully qualified class name, e.g. `org.example.MyTask`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassName(String);

impl ClassName {
    pub fn new(name: impl Into<String>) -> Result<Self, ValueError> {
        let name = name.into();
        let valid = !name.is_empty()
            && name.split('.').all(|part| {
                let mut chars = part.chars();
                matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
                    && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
            });
        if valid {
            Ok(Self(name))
        } else {
            Err(ValueError::UnknownVariant {
                kind: "class name",
                value: name,
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The class name without its package.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl TryFrom<String> for ClassName {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClassName> for String {
    fn from(value: ClassName) -> Self {
        value.0
    }
}

impl FromStr for ClassName {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

super::impl_schema_value!(ClassName);
