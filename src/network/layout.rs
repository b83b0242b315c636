//! Cross sections: lanes, stripes and shoulders placed across a link.

use serde::{Deserialize, Serialize};

use crate::values::{
    BooleanType, ColorType, CompatibilityDirection, ExprValue, LateralSync, LengthType,
    PositiveLengthType, SpeedType,
};

/// A legal speed limit for one GTU type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedLimit {
    pub gtu_type: String,
    pub legal_speed_limit: SpeedType,
}

/// A road layout written out in full on a link or in the definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadLayout {
    pub speed_limits: Vec<SpeedLimit>,
    /// Cross-section elements in document order, left to right.
    pub elements: Vec<CrossSectionElement>,
}

impl RoadLayout {
    pub fn lanes(&self) -> impl Iterator<Item = &CseLane> {
        self.elements.iter().filter_map(|element| match element {
            CrossSectionElement::Lane(lane) => Some(lane),
            _ => None,
        })
    }

    pub fn stripes(&self) -> impl Iterator<Item = &CseStripe> {
        self.elements.iter().filter_map(|element| match element {
            CrossSectionElement::Stripe(stripe) => Some(stripe),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CrossSectionElement {
    Stripe(CseStripe),
    Lane(CseLane),
    Shoulder(CseShoulder),
    NoTrafficLane(CseNoTrafficLane),
}

impl CrossSectionElement {
    pub fn id(&self) -> Option<&str> {
        match self {
            CrossSectionElement::Stripe(stripe) => stripe.id.as_deref(),
            CrossSectionElement::Lane(lane) => Some(&lane.id),
            CrossSectionElement::Shoulder(shoulder) => shoulder.id.as_deref(),
            CrossSectionElement::NoTrafficLane(lane) => lane.id.as_deref(),
        }
    }
}

/// Lateral position of an element relative to the link's reference line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LateralOffset {
    Center(LengthType),
    Left(LengthType),
    Right(LengthType),
    CenterStartEnd { start: LengthType, end: LengthType },
    LeftStartEnd { start: LengthType, end: LengthType },
    RightStartEnd { start: LengthType, end: LengthType },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementWidth {
    Constant(PositiveLengthType),
    StartEnd {
        start: PositiveLengthType,
        end: PositiveLengthType,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CseLane {
    pub id: String,
    pub lane_type: String,
    /// Derived from neighbouring elements when absent.
    pub offset: Option<LateralOffset>,
    pub width: ElementWidth,
    pub speed_limits: Vec<SpeedLimit>,
}

impl CseLane {
    pub fn new(id: impl Into<String>, lane_type: impl Into<String>, width: ElementWidth) -> Self {
        Self {
            id: id.into(),
            lane_type: lane_type.into(),
            offset: None,
            width,
            speed_limits: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CseShoulder {
    pub id: Option<String>,
    pub lane_type: Option<String>,
    pub offset: Option<LateralOffset>,
    pub width: ElementWidth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CseNoTrafficLane {
    pub id: Option<String>,
    pub offset: Option<LateralOffset>,
    pub width: ElementWidth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CseStripe {
    pub id: Option<String>,
    pub offset: Option<LateralOffset>,
    pub stripe: StripeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StripeKind {
    /// Reference to a stripe type in the definitions.
    Defined(String),
    Custom(StripeData),
}

/// Appearance and lane-change rules of a stripe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StripeData {
    pub elements: Option<StripeElements>,
    pub dash_offset: Option<DashOffset>,
    pub compatibilities: Vec<StripeCompatibility>,
    pub left_change_lane: Option<BooleanType>,
    pub right_change_lane: Option<BooleanType>,
    pub lateral_sync: Option<ExprValue<LateralSync>>,
}

impl StripeData {
    pub fn effective_lateral_sync(&self) -> ExprValue<LateralSync> {
        self.lateral_sync
            .clone()
            .unwrap_or(ExprValue::Value(LateralSync::None))
    }
}

/// Lines and gaps of a stripe, left to right.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StripeElements {
    pub elements: Vec<StripeElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StripeElement {
    Line(StripeLine),
    Gap { width: PositiveLengthType },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripeLine {
    pub width: PositiveLengthType,
    pub color: ColorType,
    /// Alternating gaps and dashes; a continuous line when empty.
    pub dashes: Vec<DashSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DashSegment {
    Gap(PositiveLengthType),
    Dash(PositiveLengthType),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DashOffset {
    Fixed { offset: LengthType },
    SyncUpstream,
    SyncDownstream,
}

/// Whether a GTU type may cross the stripe, and in which direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripeCompatibility {
    pub gtu_type: String,
    pub direction: ExprValue<CompatibilityDirection>,
}

/// Link-specific speed limits for a lane of a defined layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaneOverride {
    pub lane: String,
    pub speed_limits: Vec<SpeedLimit>,
}

/// Link-specific stripe properties for a stripe of a defined layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StripeOverride {
    pub stripe: String,
    pub data: StripeData,
}
