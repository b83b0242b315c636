use serde::{Deserialize, Serialize};

use super::geometry::LinkGeometry;
use super::layout::{LaneOverride, RoadLayout, StripeOverride};
use crate::types::{Validate, ValidationResult};
use crate::validation_utils::{_chain, _return, validate_unique_ids};
use crate::values::{
    ExprValue, LaneKeepingPolicy, Length, LengthBeginEndType, LengthType, LengthUnit, Priority,
};

/// A directed road segment between two nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub link_type: String,
    pub node_start: String,
    pub node_end: String,
    pub offset_start: Option<LengthType>,
    pub offset_end: Option<LengthType>,
    pub lane_keeping: Option<ExprValue<LaneKeepingPolicy>>,
    pub priority: Option<ExprValue<Priority>>,
    pub conflict_id: Option<String>,
    pub geometry: LinkGeometry,
    pub layout: LinkLayout,
    pub traffic_lights: Vec<TrafficLight>,
    pub traffic_light_sensors: Vec<TrafficLightSensor>,
}

const ZERO_LENGTH: Length = Length::new(0.0, LengthUnit::Meter);

impl Link {
    pub fn new(
        id: impl Into<String>,
        link_type: impl Into<String>,
        node_start: impl Into<String>,
        node_end: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            link_type: link_type.into(),
            node_start: node_start.into(),
            node_end: node_end.into(),
            ..Self::default()
        }
    }

    /// Lateral offset at the start node, `0.0 m` when not given.
    pub fn effective_offset_start(&self) -> LengthType {
        self.offset_start.clone().unwrap_or(ExprValue::Value(ZERO_LENGTH))
    }

    /// Lateral offset at the end node, `0.0 m` when not given.
    pub fn effective_offset_end(&self) -> LengthType {
        self.offset_end.clone().unwrap_or(ExprValue::Value(ZERO_LENGTH))
    }

    pub fn effective_lane_keeping(&self) -> ExprValue<LaneKeepingPolicy> {
        self.lane_keeping
            .clone()
            .unwrap_or(ExprValue::Value(LaneKeepingPolicy::KeepRight))
    }
}

impl Validate for Link {
    fn validate(&self) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        _chain(self.geometry.validate(), &mut warnings, &mut errors);
        _chain(
            validate_unique_ids("traffic light", self.traffic_lights.iter().map(|t| t.id.as_str())),
            &mut warnings,
            &mut errors,
        );
        if let LinkLayout::Custom(layout) = &self.layout {
            _chain(
                validate_unique_ids("lane", layout.lanes().map(|lane| lane.id.as_str())),
                &mut warnings,
                &mut errors,
            );
            if layout.lanes().next().is_none() {
                warnings.push("road layout has no lanes".to_string());
            }
        }

        _return(warnings, errors)
    }
}

/// The cross section of a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkLayout {
    Custom(RoadLayout),
    /// A road layout from the definitions, with link-specific overrides.
    Defined {
        layout: String,
        lane_overrides: Vec<LaneOverride>,
        stripe_overrides: Vec<StripeOverride>,
    },
}

impl Default for LinkLayout {
    fn default() -> Self {
        LinkLayout::Custom(RoadLayout::default())
    }
}

impl LinkLayout {
    pub fn defined(layout: impl Into<String>) -> Self {
        LinkLayout::Defined {
            layout: layout.into(),
            lane_overrides: Vec::new(),
            stripe_overrides: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficLight {
    pub id: String,
    pub lane: String,
    pub position: LengthBeginEndType,
    /// Node ids towards which turning on red is allowed.
    pub turn_on_red: Vec<String>,
}

/// A detector on a lane that reports to traffic control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficLightSensor {
    pub id: String,
    pub sensor_type: String,
    pub lane: String,
    pub entry_position: LengthBeginEndType,
    pub exit_position: LengthBeginEndType,
}
