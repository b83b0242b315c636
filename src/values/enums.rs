//! Enumerated attribute values, spelled exactly as in the schema.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValueError;

macro_rules! schema_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text => Ok($name::$variant),)+
                    other => Err(ValueError::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        super::impl_schema_value!($name);
    };
}

schema_enum!(
    /// Which lane a vehicle returns to when it has no reason to be elsewhere.
    LaneKeepingPolicy, "lane keeping policy" {
        KeepRight => "KEEPRIGHT",
        KeepLeft => "KEEPLEFT",
        KeepLane => "KEEPLANE",
    }
);

schema_enum!(
    /// Priority of a link at the conflicts it enters.
    Priority, "priority" {
        AllStop => "ALL_STOP",
        BusStop => "BUS_STOP",
        None => "NONE",
        Priority => "PRIORITY",
        Stop => "STOP",
        Yield => "YIELD",
    }
);

schema_enum!(
    ArcDirection, "arc direction" {
        Left => "LEFT",
        Right => "RIGHT",
    }
);

schema_enum!(
    /// How stripe dashes line up across link boundaries.
    LateralSync, "lateral sync" {
        None => "NONE",
        Link => "LINK",
        Snap => "SNAP",
    }
);

schema_enum!(
    CompatibilityDirection, "compatibility direction" {
        Left => "LEFT",
        Right => "RIGHT",
        Both => "BOTH",
        None => "NONE",
    }
);

schema_enum!(
    /// Whitespace handling of a text block.
    Space, "space" {
        Preserve => "preserve",
        Default => "default",
    }
);

schema_enum!(
    GraphicsType, "graphics type" {
        Png => "PNG",
        Jpg => "JPG",
        Gif => "GIF",
        Bmp => "BMP",
    }
);

schema_enum!(
    EncodingType, "encoding" {
        Base64 => "base64",
        Hex => "hex",
    }
);

schema_enum!(
    /// Interpolation of demand between time slices.
    Interpolation, "interpolation" {
        Linear => "LINEAR",
        Stepwise => "STEPWISE",
    }
);

schema_enum!(
    /// Headway distribution used by OD generators.
    HeadwayDistribution, "headway distribution" {
        Constant => "CONSTANT",
        Exponential => "EXPONENTIAL",
        Uniform => "UNIFORM",
        Triangular => "TRIANGULAR",
        TriExp => "TRI_EXP",
        LogNormal => "LOGNORMAL",
    }
);

schema_enum!(
    /// Check for room at a generator before a vehicle is placed.
    RoomChecker, "room checker" {
        /// Car-following based.
        Cf => "CF",
        /// Car-following based, with a bounded acceleration.
        CfBa => "CF_BA",
        /// Time-to-collision based.
        Ttc => "TTC",
    }
);

schema_enum!(
    Estimation, "estimation" {
        None => "NONE",
        Underestimation => "UNDERESTIMATION",
        Overestimation => "OVERESTIMATION",
    }
);

schema_enum!(
    Anticipation, "anticipation" {
        None => "NONE",
        ConstantSpeed => "CONSTANT_SPEED",
        ConstantAcceleration => "CONSTANT_ACCELERATION",
    }
);

schema_enum!(
    /// How the Fuller model combines task demands.
    TaskManager, "task manager" {
        Summative => "SUMMATIVE",
        AnticipationReliance => "ANTICIPATION_RELIANCE",
    }
);

schema_enum!(
    Synchronization, "synchronization" {
        DeadEnd => "DEADEND",
        Passive => "PASSIVE",
        PassiveMoving => "PASSIVE_MOVING",
        AlignGap => "ALIGN_GAP",
        Active => "ACTIVE",
    }
);

schema_enum!(
    Cooperation, "cooperation" {
        Passive => "PASSIVE",
        PassiveMoving => "PASSIVE_MOVING",
        Active => "ACTIVE",
    }
);

schema_enum!(
    GapAcceptance, "gap acceptance" {
        Informed => "INFORMED",
        EgoHeadway => "EGO_HEADWAY",
    }
);

schema_enum!(
    Tailgating, "tailgating" {
        None => "NONE",
        RhoOnly => "RHO_ONLY",
        Pressure => "PRESSURE",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_spelling() {
        assert_eq!("KEEPRIGHT".parse::<LaneKeepingPolicy>().unwrap(), LaneKeepingPolicy::KeepRight);
        assert!("keepright".parse::<LaneKeepingPolicy>().is_err());
        assert_eq!(Synchronization::PassiveMoving.to_string(), "PASSIVE_MOVING");
    }

    #[test]
    fn test_every_variant_reads_back() {
        for variant in HeadwayDistribution::ALL {
            assert_eq!(variant.as_str().parse::<HeadwayDistribution>().unwrap(), *variant);
        }
        for variant in Priority::ALL {
            assert_eq!(variant.as_str().parse::<Priority>().unwrap(), *variant);
        }
    }

    #[test]
    fn test_unknown_variant_names_kind() {
        let err = "SIDEWAYS".parse::<ArcDirection>().unwrap_err();
        assert_eq!(err.to_string(), "unknown arc direction value 'SIDEWAYS'");
    }
}
