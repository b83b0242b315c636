//! The road network: nodes, links and their cross sections.

use serde::{Deserialize, Serialize};

pub mod geometry;
pub mod layout;
pub mod link;

pub use geometry::{Arc, Bezier, Clothoid, ClothoidShape, Flattener, LinkGeometry, Polyline};
pub use layout::{
    CrossSectionElement, CseLane, CseNoTrafficLane, CseShoulder, CseStripe, DashOffset,
    DashSegment, ElementWidth, LaneOverride, LateralOffset, RoadLayout, SpeedLimit,
    StripeCompatibility, StripeData, StripeElement, StripeElements, StripeKind, StripeLine,
    StripeOverride,
};
pub use link::{Link, LinkLayout, TrafficLight, TrafficLightSensor};

use crate::types::{Validate, ValidationResult};
use crate::validation_utils::{_chain, _chain_all, _return, validate_unique_ids};
use crate::values::{AngleType, CoordinateType, DoublePositiveType, LengthBeginEndType, PositiveLengthType};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    /// Default flattener for curved links.
    pub flattener: Option<Flattener>,
    pub conflicts: Option<Conflicts>,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Network {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.id == id)
    }
}

impl Validate for Network {
    fn validate(&self) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        _chain(
            validate_unique_ids("node", self.nodes.iter().map(|n| n.id.as_str())),
            &mut warnings,
            &mut errors,
        );
        _chain(
            validate_unique_ids("link", self.links.iter().map(|l| l.id.as_str())),
            &mut warnings,
            &mut errors,
        );
        for link in &self.links {
            _chain_all([link], &format!("link '{}'", link.id), &mut warnings, &mut errors);
        }

        _return(warnings, errors)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub coordinate: CoordinateType,
    pub direction: Option<AngleType>,
}

/// How conflict areas between crossing lanes are sized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Conflicts {
    /// No conflicts are generated.
    None,
    #[default]
    DefaultWidth,
    FixedWidth(PositiveLengthType),
    RelativeWidth(DoublePositiveType),
}

/// A lane identified by its link and lane id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneLink {
    pub link: String,
    pub lane: String,
}

impl LaneLink {
    pub fn new(link: impl Into<String>, lane: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            lane: lane.into(),
        }
    }
}

/// A position on a lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanePosition {
    pub link: String,
    pub lane: String,
    pub position: LengthBeginEndType,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{Coordinate, ExprValue};

    fn node(id: &str) -> Node {
        Node {
            id: id.to_string(),
            coordinate: ExprValue::Value(Coordinate::new(0.0, 0.0)),
            direction: None,
        }
    }

    #[test]
    fn test_duplicate_ids_are_reported() {
        let mut network = Network::default();
        network.nodes.extend([node("A"), node("A")]);
        network.links.push(Link::new("AB", "URBAN", "A", "B"));
        network.links.push(Link::new("AB", "URBAN", "A", "B"));

        let result = network.validate();
        assert_eq!(
            result.errors(),
            [
                "duplicate node id 'A'".to_string(),
                "duplicate link id 'AB'".to_string()
            ]
        );
    }

    #[test]
    fn test_lookup() {
        let mut network = Network::default();
        network.nodes.push(node("N1"));
        assert!(network.node("N1").is_some());
        assert!(network.link("missing").is_none());
    }
}
