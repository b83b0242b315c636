use serde::{Deserialize, Serialize};

use crate::model::InputParameters;
use crate::types::{Validate, ValidationResult};
use crate::validation_utils::{_chain, _return, validate_unique_ids};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenarios {
    pub default_input_parameters: Option<InputParameters>,
    pub scenarios: Vec<Scenario>,
}

impl Validate for Scenarios {
    fn validate(&self) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        if let Some(defaults) = &self.default_input_parameters {
            _chain(defaults.validate(), &mut warnings, &mut errors);
        }
        _chain(
            validate_unique_ids("scenario", self.scenarios.iter().map(|s| s.id.as_str())),
            &mut warnings,
            &mut errors,
        );
        for scenario in &self.scenarios {
            if let Some(inputs) = &scenario.input_parameters {
                _chain(inputs.validate(), &mut warnings, &mut errors);
            }
        }

        _return(warnings, errors)
    }
}

/// A named variant of the document's input parameters and model choices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub input_parameters: Option<InputParameters>,
    pub model_id_referrals: Vec<ModelIdReferral>,
}

impl Scenario {
    /// Model id a referral resolves to in this scenario.
    pub fn referred_model(&self, referral: &str) -> Option<&str> {
        self.model_id_referrals
            .iter()
            .find(|r| r.id == referral)
            .map(|r| r.model_id.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelIdReferral {
    pub id: String,
    pub model_id: String,
}
