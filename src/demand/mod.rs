//! Traffic demand: OD matrices, OD options and injection generators.

use serde::{Deserialize, Serialize};

pub mod injection;
pub mod od;

pub use injection::{
    Arrival, Arrivals, GtuCharacteristics, InjectionGenerator, InjectionRoom, RouteSource,
    TemplateSource,
};
pub use od::{Category, Cell, Level, Od};

use crate::network::LaneLink;
use crate::types::{Validate, ValidationResult};
use crate::validation_utils::{_chain, _chain_all, _return, validate_non_empty, validate_unique_ids};
use crate::values::{
    DoublePositiveInclusiveType, DoubleType, ExprValue, HeadwayDistribution, PositiveIntegerType,
    PositiveLengthType, RoomChecker, SpeedType,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    pub od_options: Vec<OdOptions>,
    pub ods: Vec<Od>,
    pub injection_generators: Vec<InjectionGenerator>,
}

impl Validate for Demand {
    fn validate(&self) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        _chain(
            validate_unique_ids("OD", self.ods.iter().map(|od| od.id.as_str())),
            &mut warnings,
            &mut errors,
        );
        _chain(
            validate_unique_ids(
                "OD options",
                self.od_options.iter().filter_map(|options| options.id.as_deref()),
            ),
            &mut warnings,
            &mut errors,
        );
        for od in &self.ods {
            _chain_all([od], &format!("OD '{}'", od.id), &mut warnings, &mut errors);
        }
        _chain_all(&self.od_options, "OD options", &mut warnings, &mut errors);
        _chain_all(&self.injection_generators, "injection generator", &mut warnings, &mut errors);

        _return(warnings, errors)
    }
}

/// Generation options for an OD, per scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OdOptions {
    pub id: Option<String>,
    pub items: Vec<OdOptionsItem>,
}

impl Validate for OdOptions {
    fn validate(&self) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        _chain(validate_non_empty(&self.items, "OD options items"), &mut warnings, &mut errors);
        for item in &self.items {
            if let Some(markov) = &item.markov {
                _chain(validate_non_empty(&markov.states, "Markov states"), &mut warnings, &mut errors);
            }
        }

        _return(warnings, errors)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OdOptionsItem {
    pub scope: OdOptionsScope,
    pub default_model: Option<ModelReference>,
    pub models: Vec<GtuTypeModel>,
    pub no_lane_change: Option<PositiveLengthType>,
    pub room_checker: Option<ExprValue<RoomChecker>>,
    pub headway_dist: Option<ExprValue<HeadwayDistribution>>,
    pub markov: Option<Markov>,
    pub lane_biases: Vec<LaneBiasEntry>,
}

/// The part of the network an options item applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OdOptionsScope {
    #[default]
    Global,
    LinkType(String),
    Origin(String),
    Lane(LaneLink),
}

/// A model given by id, or through a scenario's model id referral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelReference {
    Id(String),
    Referral(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GtuTypeModel {
    pub gtu_type: String,
    pub model: ModelReference,
}

/// Markov chain of GTU types, used to form platoons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Markov {
    pub states: Vec<MarkovState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkovState {
    pub gtu_type: String,
    pub parent: Option<String>,
    pub correlation: DoubleType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LaneBiasEntry {
    Bias(LaneBias),
    /// The predefined bias for a GTU type.
    Defined { gtu_type: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneBias {
    pub gtu_type: String,
    pub from: LaneBiasSide,
    pub left_speed: SpeedType,
    pub right_speed: SpeedType,
    pub bias: DoublePositiveInclusiveType,
    pub sticky_lanes: Option<PositiveIntegerType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneBiasSide {
    FromLeft,
    FromRight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_need_items_and_states() {
        let mut options = OdOptions::default();
        assert!(!options.validate().is_valid());

        options.items.push(OdOptionsItem {
            markov: Some(Markov::default()),
            ..OdOptionsItem::default()
        });
        assert_eq!(options.validate().errors(), ["Markov states cannot be empty".to_string()]);
    }

    #[test]
    fn test_default_scope_is_global() {
        assert_eq!(OdOptionsItem::default().scope, OdOptionsScope::Global);
    }
}
