//! GTU models: parameters, planners and perception.

use serde::{Deserialize, Serialize};

pub mod parameters;
pub mod perception;

pub use parameters::{
    Correlation, CorrelationParameter, InputParameter, InputParameters, ModelParameter,
    ModelParameterEntry, ModelParameters, ParameterValue, ScalarValue,
};
pub use perception::{
    BehavioralAdaptations, Fuller, HeadwayGtuType, Mental, PerceptionCategories, PerceptionType,
};

use crate::types::{Validate, ValidationResult};
use crate::validation_utils::{_chain, _return};
use crate::values::{
    ClassNameType, Cooperation, ExprValue, GapAcceptance, Synchronization, Tailgating,
};

/// A model for one GTU type, optionally inheriting from a parent model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelType {
    pub id: Option<String>,
    pub parent: Option<String>,
    pub gtu_type: Option<String>,
    pub parameters: Option<ModelParameters>,
    pub strategical_planner: Option<StrategicalPlanner>,
    pub tactical_planner: Option<TacticalPlanner>,
}

impl Validate for ModelType {
    fn validate(&self) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        if let Some(parameters) = &self.parameters {
            _chain(parameters.validate(), &mut warnings, &mut errors);
        }
        if let Some(id) = self.id.as_deref().filter(|id| self.parent.as_deref() == Some(*id)) {
            errors.push(format!("model '{}' is its own parent", id));
        }

        _return(warnings, errors)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategicalPlanner {
    pub route: Option<RouteSystem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteSystem {
    /// No route; GTUs follow their current link.
    None,
    Shortest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TacticalPlanner {
    Lmrs(Lmrs),
}

/// Lane-change Model with Relaxation and Synchronization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lmrs {
    pub car_following_model: Option<CarFollowingModel>,
    pub synchronization: Option<ExprValue<Synchronization>>,
    pub cooperation: Option<ExprValue<Cooperation>>,
    pub gap_acceptance: Option<ExprValue<GapAcceptance>>,
    pub tailgating: Option<ExprValue<Tailgating>>,
    pub mandatory_incentives: Vec<MandatoryIncentive>,
    pub voluntary_incentives: Vec<VoluntaryIncentive>,
    pub acceleration_incentives: Vec<AccelerationIncentive>,
    pub perception: Option<PerceptionType>,
}

impl Lmrs {
    pub fn effective_synchronization(&self) -> ExprValue<Synchronization> {
        self.synchronization
            .clone()
            .unwrap_or(ExprValue::Value(Synchronization::Passive))
    }

    pub fn effective_cooperation(&self) -> ExprValue<Cooperation> {
        self.cooperation
            .clone()
            .unwrap_or(ExprValue::Value(Cooperation::Passive))
    }

    pub fn effective_gap_acceptance(&self) -> ExprValue<GapAcceptance> {
        self.gap_acceptance
            .clone()
            .unwrap_or(ExprValue::Value(GapAcceptance::Informed))
    }

    pub fn effective_tailgating(&self) -> ExprValue<Tailgating> {
        self.tailgating
            .clone()
            .unwrap_or(ExprValue::Value(Tailgating::None))
    }
}

macro_rules! incentive_enum {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn element_name(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            pub fn from_element(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

incentive_enum!(MandatoryIncentive { Route, GetInLane, BusStop });
incentive_enum!(VoluntaryIncentive { Keep, SpeedWithCourtesy, Courtesy, SocioSpeed, StayRight });
incentive_enum!(AccelerationIncentive {
    TrafficLights,
    Conflicts,
    SpeedLimitTransitions,
    NoRightOvertake,
    BusStop,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CarFollowingModel {
    Idm(CarFollowingComponents),
    IdmPlus(CarFollowingComponents),
}

impl CarFollowingModel {
    pub fn components(&self) -> &CarFollowingComponents {
        match self {
            CarFollowingModel::Idm(components) | CarFollowingModel::IdmPlus(components) => components,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarFollowingComponents {
    pub desired_headway_model: Option<ComponentModel>,
    pub desired_speed_model: Option<ComponentModel>,
}

/// A built-in sub-model, or a class implementing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentModel {
    Idm,
    Socio,
    Class(ClassNameType),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lmrs_defaults() {
        let mut lmrs = Lmrs::default();
        assert_eq!(
            lmrs.effective_synchronization(),
            ExprValue::Value(Synchronization::Passive)
        );
        assert_eq!(lmrs.effective_tailgating(), ExprValue::Value(Tailgating::None));
        lmrs.synchronization = Some(ExprValue::Value(Synchronization::AlignGap));
        assert_eq!(
            lmrs.effective_synchronization(),
            ExprValue::Value(Synchronization::AlignGap)
        );
        assert!(lmrs.mandatory_incentives.is_empty());
    }

    #[test]
    fn test_incentive_element_names() {
        assert_eq!(VoluntaryIncentive::SpeedWithCourtesy.element_name(), "SpeedWithCourtesy");
        assert_eq!(
            AccelerationIncentive::from_element("NoRightOvertake"),
            Some(AccelerationIncentive::NoRightOvertake)
        );
        assert_eq!(MandatoryIncentive::from_element("Keep"), None);
    }

    #[test]
    fn test_model_cannot_be_own_parent() {
        let model = ModelType {
            id: Some("car".to_string()),
            parent: Some("car".to_string()),
            ..ModelType::default()
        };
        assert!(!model.validate().is_valid());
    }
}
