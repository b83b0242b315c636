//! Reusable definitions referenced by id from the rest of a document.

use serde::{Deserialize, Serialize};

use crate::distributions::{AccelerationDist, LengthDist, SpeedDist};
use crate::network::{RoadLayout, StripeData};
use crate::types::{Validate, ValidationResult};
use crate::validation_utils::{_chain, _chain_all, _return, validate_unique_ids};
use crate::values::{BooleanType, ExprValue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definitions {
    pub gtu_types: Vec<GtuType>,
    pub gtu_templates: Vec<GtuTemplate>,
    pub stripe_types: Vec<StripeType>,
    pub road_layouts: Vec<DefinedRoadLayout>,
}

impl Validate for Definitions {
    fn validate(&self) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        _chain(
            validate_unique_ids("GTU type", self.gtu_types.iter().map(|t| t.id.as_str())),
            &mut warnings,
            &mut errors,
        );
        _chain(
            validate_unique_ids("GTU template", self.gtu_templates.iter().map(|t| t.id.as_str())),
            &mut warnings,
            &mut errors,
        );
        _chain(
            validate_unique_ids("stripe type", self.stripe_types.iter().map(|t| t.id.as_str())),
            &mut warnings,
            &mut errors,
        );
        _chain(
            validate_unique_ids("road layout", self.road_layouts.iter().map(|l| l.id.as_str())),
            &mut warnings,
            &mut errors,
        );
        for template in &self.gtu_templates {
            _chain_all(
                [template],
                &format!("GTU template '{}'", template.id),
                &mut warnings,
                &mut errors,
            );
        }

        _return(warnings, errors)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GtuType {
    pub id: String,
    pub parent: Option<String>,
    pub default: Option<BooleanType>,
}

impl GtuType {
    pub fn effective_default(&self) -> BooleanType {
        self.default.clone().unwrap_or(ExprValue::Value(false))
    }
}

/// Distributions of the physical properties of generated GTUs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GtuTemplate {
    pub id: String,
    pub gtu_type: String,
    pub default: Option<BooleanType>,
    pub length_dist: LengthDist,
    pub width_dist: LengthDist,
    pub max_speed_dist: SpeedDist,
    pub max_acceleration_dist: Option<AccelerationDist>,
    pub max_deceleration_dist: Option<AccelerationDist>,
}

impl GtuTemplate {
    pub fn effective_default(&self) -> BooleanType {
        self.default.clone().unwrap_or(ExprValue::Value(false))
    }
}

impl Validate for GtuTemplate {
    fn validate(&self) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        _chain(self.length_dist.validate(), &mut warnings, &mut errors);
        _chain(self.width_dist.validate(), &mut warnings, &mut errors);
        _chain(self.max_speed_dist.validate(), &mut warnings, &mut errors);
        for dist in [&self.max_acceleration_dist, &self.max_deceleration_dist]
            .into_iter()
            .flatten()
        {
            _chain(dist.validate(), &mut warnings, &mut errors);
        }

        _return(warnings, errors)
    }
}

/// A named stripe appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StripeType {
    pub id: String,
    pub default: Option<BooleanType>,
    pub data: StripeData,
}

impl StripeType {
    pub fn effective_default(&self) -> BooleanType {
        self.default.clone().unwrap_or(ExprValue::Value(false))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefinedRoadLayout {
    pub id: String,
    pub layout: RoadLayout,
}
