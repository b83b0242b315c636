use serde::{Deserialize, Serialize};

use crate::control::Control;
use crate::definitions::Definitions;
use crate::demand::Demand;
use crate::model::ModelType;
use crate::network::Network;
use crate::scenario::Scenarios;
use crate::types::{Validate, ValidationResult};
use crate::validation_utils::{_chain, _chain_all, _return, validate_unique_ids};

/// Namespace of OTS documents.
pub const OTS_NAMESPACE: &str = "http://www.opentrafficsim.org/ots";

/// The root `Ots` element of a scenario file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtsDocument {
    pub definitions: Option<Definitions>,
    pub network: Option<Network>,
    pub demand: Option<Demand>,
    pub models: Vec<ModelType>,
    pub scenarios: Option<Scenarios>,
    pub control: Option<Control>,
}

impl OtsDocument {
    pub fn model(&self, id: &str) -> Option<&ModelType> {
        self.models.iter().find(|model| model.id.as_deref() == Some(id))
    }
}

impl Validate for OtsDocument {
    fn validate(&self) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        if let Some(definitions) = &self.definitions {
            _chain(definitions.validate(), &mut warnings, &mut errors);
        }
        if let Some(network) = &self.network {
            _chain(network.validate(), &mut warnings, &mut errors);
        }
        if let Some(demand) = &self.demand {
            _chain(demand.validate(), &mut warnings, &mut errors);
        }
        _chain(
            validate_unique_ids("model", self.models.iter().filter_map(|m| m.id.as_deref())),
            &mut warnings,
            &mut errors,
        );
        for (index, model) in self.models.iter().enumerate() {
            let context = match &model.id {
                Some(id) => format!("model '{}'", id),
                None => format!("model #{}", index + 1),
            };
            _chain_all([model], &context, &mut warnings, &mut errors);
        }
        if let Some(scenarios) = &self.scenarios {
            _chain(scenarios.validate(), &mut warnings, &mut errors);
        }
        if let Some(control) = &self.control {
            _chain(control.validate(), &mut warnings, &mut errors);
        }

        _return(warnings, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_valid() {
        let document = OtsDocument::default();
        assert!(document.models.is_empty());
        assert_eq!(document.validate(), ValidationResult::Valid(()));
    }

    #[test]
    fn test_duplicate_models() {
        let model = ModelType {
            id: Some("m".to_string()),
            ..ModelType::default()
        };
        let document = OtsDocument {
            models: vec![model.clone(), model],
            ..OtsDocument::default()
        };
        assert_eq!(document.validate().errors(), ["duplicate model id 'm'".to_string()]);
        assert!(document.model("m").is_some());
    }
}
