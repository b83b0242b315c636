//! Link geometry: the reference line a link's lanes are laid out along.

use serde::{Deserialize, Serialize};

use crate::types::{Validate, ValidationResult};
use crate::validation_utils::validate_non_empty;
use crate::values::{
    AngleType, ArcDirection, BooleanType, CoordinateType, DoublePositive, DoublePositiveType,
    ExprValue, LengthType, LinearDensityType, PositiveIntegerType, PositiveLengthType,
};

/// The shape of a link between its start and end node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum LinkGeometry {
    #[default]
    Straight,
    Bezier(Bezier),
    Clothoid(Clothoid),
    Arc(Arc),
    Polyline(Polyline),
}

impl LinkGeometry {
    pub fn kind(&self) -> &'static str {
        match self {
            LinkGeometry::Straight => "Straight",
            LinkGeometry::Bezier(_) => "Bezier",
            LinkGeometry::Clothoid(_) => "Clothoid",
            LinkGeometry::Arc(_) => "Arc",
            LinkGeometry::Polyline(_) => "Polyline",
        }
    }

    pub fn flattener(&self) -> Option<&Flattener> {
        match self {
            LinkGeometry::Bezier(bezier) => bezier.flattener.as_ref(),
            LinkGeometry::Clothoid(clothoid) => clothoid.flattener.as_ref(),
            LinkGeometry::Arc(arc) => arc.flattener.as_ref(),
            LinkGeometry::Straight | LinkGeometry::Polyline(_) => None,
        }
    }
}

impl Validate for LinkGeometry {
    fn validate(&self) -> ValidationResult {
        match self {
            LinkGeometry::Polyline(polyline) => {
                validate_non_empty(&polyline.coordinates, "polyline coordinates")
            }
            _ => ValidationResult::Valid(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bezier {
    pub flattener: Option<Flattener>,
    pub shape: Option<DoublePositiveType>,
    pub weighted: Option<BooleanType>,
}

impl Bezier {
    pub fn effective_shape(&self) -> DoublePositiveType {
        self.shape
            .clone()
            .unwrap_or(ExprValue::Value(DoublePositive::ONE))
    }

    pub fn effective_weighted(&self) -> BooleanType {
        self.weighted.clone().unwrap_or(ExprValue::Value(false))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clothoid {
    pub shape: ClothoidShape,
    pub flattener: Option<Flattener>,
    pub end_elevation: Option<PositiveLengthType>,
}

/// How a clothoid is determined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum ClothoidShape {
    /// Fitted between the start and end node directions.
    #[default]
    Interpolated,
    Length {
        length: LengthType,
        start_curvature: LinearDensityType,
        end_curvature: LinearDensityType,
    },
    A {
        a: LengthType,
        start_curvature: LinearDensityType,
        end_curvature: LinearDensityType,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub flattener: Option<Flattener>,
    pub radius: PositiveLengthType,
    pub direction: ExprValue<ArcDirection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub coordinates: Vec<CoordinateType>,
}

/// How a curved line is turned into segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Flattener {
    NumSegments(PositiveIntegerType),
    DeviationAndAngle {
        max_deviation: Option<PositiveLengthType>,
        max_angle: Option<AngleType>,
    },
}
