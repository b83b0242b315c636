//! Injection generators: GTUs created from an explicit list of arrivals.

use serde::{Deserialize, Serialize};

use crate::distributions::RandomStreamSource;
use crate::network::LanePosition;
use crate::types::{Validate, ValidationResult};
use crate::validation_utils::_return;
use crate::values::{
    ExprValue, PositiveAccelerationType, PositiveDurationType, PositiveLengthType,
    PositiveSpeedType, RoomChecker,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjectionGenerator {
    pub no_lane_change_distance: Option<PositiveLengthType>,
    /// Where GTUs are placed when arrivals do not say.
    pub position: Option<LanePosition>,
    pub gtu_characteristics: Option<GtuCharacteristics>,
    pub room: Option<InjectionRoom>,
    pub random_stream: Option<RandomStreamSource>,
    pub arrivals: Arrivals,
}

impl Validate for InjectionGenerator {
    fn validate(&self) -> ValidationResult {
        let warnings = Vec::new();
        let mut errors = Vec::new();

        let times: Vec<f64> = self
            .arrivals
            .arrivals
            .iter()
            .filter_map(|arrival| arrival.time.value().map(|t| t.get().si_value()))
            .collect();
        if times.windows(2).any(|pair| pair[1] < pair[0]) {
            errors.push("arrivals are not in chronological order".to_string());
        }
        if self.arrivals.uri.is_some() && !self.arrivals.arrivals.is_empty() {
            errors.push("arrivals are given both inline and by uri".to_string());
        }

        _return(warnings, errors)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GtuCharacteristics {
    pub template: TemplateSource,
    pub route: Option<RouteSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateSource {
    GtuTemplate(String),
    GtuTemplateMix(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteSource {
    Route(String),
    RouteMix(String),
    ShortestRoute(String),
    ShortestRouteMix(String),
}

/// How the generator decides there is room to place a GTU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InjectionRoom {
    RoomChecker(ExprValue<RoomChecker>),
    TimeToCollision(PositiveDurationType),
}

/// Arrivals, listed inline or loaded from `uri`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arrivals {
    pub uri: Option<String>,
    pub arrivals: Vec<Arrival>,
}

/// A single GTU arrival. Unset fields come from the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrival {
    pub time: PositiveDurationType,
    pub id: Option<String>,
    pub gtu_type: Option<String>,
    pub speed: Option<PositiveSpeedType>,
    pub link: Option<String>,
    pub lane: Option<String>,
    pub position: Option<PositiveLengthType>,
    pub length: Option<PositiveLengthType>,
    pub width: Option<PositiveLengthType>,
    pub front: Option<PositiveLengthType>,
    pub max_speed: Option<PositiveSpeedType>,
    pub max_acceleration: Option<PositiveAccelerationType>,
    pub max_deceleration: Option<PositiveAccelerationType>,
    pub route: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
}

impl Arrival {
    pub fn at(time: PositiveDurationType) -> Self {
        Self {
            time,
            id: None,
            gtu_type: None,
            speed: None,
            link: None,
            lane: None,
            position: None,
            length: None,
            width: None,
            front: None,
            max_speed: None,
            max_acceleration: None,
            max_deceleration: None,
            route: None,
            origin: None,
            destination: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{Duration, DurationUnit, NonNegative};

    fn arrival(seconds: f64) -> Arrival {
        Arrival::at(ExprValue::Value(
            NonNegative::new(Duration::new(seconds, DurationUnit::Second)).unwrap(),
        ))
    }

    #[test]
    fn test_arrivals_must_be_chronological() {
        let mut generator = InjectionGenerator::default();
        generator.arrivals.arrivals.extend([arrival(1.0), arrival(3.0)]);
        assert!(generator.validate().is_valid());

        generator.arrivals.arrivals.push(arrival(2.0));
        assert!(!generator.validate().is_valid());
    }
}
