//! Model parameters and scenario input parameters.

use serde::{Deserialize, Serialize};

use crate::distributions::{
    AccelerationDist, ConstantDist, DiscreteDist, DurationDist, FrequencyDist, LengthDist,
    LinearDensityDist, SpeedDist,
};
use crate::types::{Validate, ValidationResult};
use crate::validation_utils::{_chain, _return, validate_unique_ids};
use crate::values::{
    AccelerationType, BooleanType, ClassNameType, DoubleType, DurationType, FractionType,
    Expression, FrequencyType, LengthType, LinearDensityType, LongType, SpeedType, StringType,
};

/// A fixed parameter value, one variant per parameter element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    Duration(DurationType),
    Length(LengthType),
    Speed(SpeedType),
    Acceleration(AccelerationType),
    LinearDensity(LinearDensityType),
    Frequency(FrequencyType),
    Double(DoubleType),
    Fraction(FractionType),
    Integer(LongType),
    Boolean(BooleanType),
    String(StringType),
    Class(ClassNameType),
}

impl ScalarValue {
    pub const ELEMENTS: &'static [&'static str] = &[
        "Duration",
        "Length",
        "Speed",
        "Acceleration",
        "LinearDensity",
        "Frequency",
        "Double",
        "Fraction",
        "Integer",
        "Boolean",
        "String",
        "Class",
    ];

    pub fn element_name(&self) -> &'static str {
        match self {
            ScalarValue::Duration(_) => "Duration",
            ScalarValue::Length(_) => "Length",
            ScalarValue::Speed(_) => "Speed",
            ScalarValue::Acceleration(_) => "Acceleration",
            ScalarValue::LinearDensity(_) => "LinearDensity",
            ScalarValue::Frequency(_) => "Frequency",
            ScalarValue::Double(_) => "Double",
            ScalarValue::Fraction(_) => "Fraction",
            ScalarValue::Integer(_) => "Integer",
            ScalarValue::Boolean(_) => "Boolean",
            ScalarValue::String(_) => "String",
            ScalarValue::Class(_) => "Class",
        }
    }
}

/// The value of a model parameter: a scalar or a distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    Scalar(ScalarValue),
    DurationDist(DurationDist),
    LengthDist(LengthDist),
    SpeedDist(SpeedDist),
    AccelerationDist(AccelerationDist),
    LinearDensityDist(LinearDensityDist),
    FrequencyDist(FrequencyDist),
    DoubleDist(ConstantDist),
    IntegerDist(DiscreteDist),
}

impl ParameterValue {
    pub const DIST_ELEMENTS: &'static [&'static str] = &[
        "DurationDist",
        "LengthDist",
        "SpeedDist",
        "AccelerationDist",
        "LinearDensityDist",
        "FrequencyDist",
        "DoubleDist",
        "IntegerDist",
    ];

    pub fn element_name(&self) -> &'static str {
        match self {
            ParameterValue::Scalar(scalar) => scalar.element_name(),
            ParameterValue::DurationDist(_) => "DurationDist",
            ParameterValue::LengthDist(_) => "LengthDist",
            ParameterValue::SpeedDist(_) => "SpeedDist",
            ParameterValue::AccelerationDist(_) => "AccelerationDist",
            ParameterValue::LinearDensityDist(_) => "LinearDensityDist",
            ParameterValue::FrequencyDist(_) => "FrequencyDist",
            ParameterValue::DoubleDist(_) => "DoubleDist",
            ParameterValue::IntegerDist(_) => "IntegerDist",
        }
    }
}

impl Validate for ParameterValue {
    fn validate(&self) -> ValidationResult {
        match self {
            ParameterValue::Scalar(_) => ValidationResult::Valid(()),
            ParameterValue::DurationDist(dist) => dist.validate(),
            ParameterValue::LengthDist(dist) => dist.validate(),
            ParameterValue::SpeedDist(dist) => dist.validate(),
            ParameterValue::AccelerationDist(dist) => dist.validate(),
            ParameterValue::LinearDensityDist(dist) => dist.validate(),
            ParameterValue::FrequencyDist(dist) => dist.validate(),
            ParameterValue::DoubleDist(dist) => dist.validate(),
            ParameterValue::IntegerDist(dist) => dist.validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameter {
    pub id: String,
    pub value: ParameterValue,
}

/// A parameter referenced by a correlation, by kind and id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationParameter {
    Acceleration(String),
    Double(String),
    Duration(String),
    Fraction(String),
    Frequency(String),
    Integer(String),
    Length(String),
    LinearDensity(String),
    Speed(String),
}

impl CorrelationParameter {
    pub fn element_name(&self) -> &'static str {
        match self {
            CorrelationParameter::Acceleration(_) => "Acceleration",
            CorrelationParameter::Double(_) => "Double",
            CorrelationParameter::Duration(_) => "Duration",
            CorrelationParameter::Fraction(_) => "Fraction",
            CorrelationParameter::Frequency(_) => "Frequency",
            CorrelationParameter::Integer(_) => "Integer",
            CorrelationParameter::Length(_) => "Length",
            CorrelationParameter::LinearDensity(_) => "LinearDensity",
            CorrelationParameter::Speed(_) => "Speed",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            CorrelationParameter::Acceleration(id)
            | CorrelationParameter::Double(id)
            | CorrelationParameter::Duration(id)
            | CorrelationParameter::Fraction(id)
            | CorrelationParameter::Frequency(id)
            | CorrelationParameter::Integer(id)
            | CorrelationParameter::Length(id)
            | CorrelationParameter::LinearDensity(id)
            | CorrelationParameter::Speed(id) => id,
        }
    }
}

/// Makes `then` depend on `first` (or on its own drawn value when `first`
/// is absent), through `expression`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub first: Option<CorrelationParameter>,
    pub then: CorrelationParameter,
    /// Written without braces, e.g. `0.5 * then`.
    pub expression: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelParameterEntry {
    Parameter(ModelParameter),
    Correlation(Correlation),
}

/// Parameters of a model, in document order.
///
/// A correlation applies to the parameters that precede it, so parameters
/// and correlations share one ordered list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub entries: Vec<ModelParameterEntry>,
}

impl ModelParameters {
    pub fn parameters(&self) -> impl Iterator<Item = &ModelParameter> {
        self.entries.iter().filter_map(|entry| match entry {
            ModelParameterEntry::Parameter(parameter) => Some(parameter),
            ModelParameterEntry::Correlation(_) => None,
        })
    }

    pub fn correlations(&self) -> impl Iterator<Item = &Correlation> {
        self.entries.iter().filter_map(|entry| match entry {
            ModelParameterEntry::Correlation(correlation) => Some(correlation),
            ModelParameterEntry::Parameter(_) => None,
        })
    }

    pub fn parameter(&self, id: &str) -> Option<&ModelParameter> {
        self.parameters().find(|parameter| parameter.id == id)
    }
}

impl Validate for ModelParameters {
    fn validate(&self) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        if matches!(self.entries.first(), Some(ModelParameterEntry::Correlation(_))) {
            errors.push("a correlation must follow at least one parameter".to_string());
        }
        for parameter in self.parameters() {
            _chain(parameter.value.validate(), &mut warnings, &mut errors);
        }

        _return(warnings, errors)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputParameter {
    pub id: String,
    pub value: ScalarValue,
}

/// Named values that expressions elsewhere in the document refer to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputParameters {
    pub parameters: Vec<InputParameter>,
}

impl InputParameters {
    pub fn get(&self, id: &str) -> Option<&ScalarValue> {
        self.parameters
            .iter()
            .find(|parameter| parameter.id == id)
            .map(|parameter| &parameter.value)
    }
}

impl Validate for InputParameters {
    fn validate(&self) -> ValidationResult {
        validate_unique_ids("input parameter", self.parameters.iter().map(|p| p.id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::ExprValue;

    fn double(id: &str, value: f64) -> ModelParameterEntry {
        ModelParameterEntry::Parameter(ModelParameter {
            id: id.to_string(),
            value: ParameterValue::Scalar(ScalarValue::Double(ExprValue::Value(value))),
        })
    }

    fn correlation(then: &str) -> ModelParameterEntry {
        ModelParameterEntry::Correlation(Correlation {
            first: None,
            then: CorrelationParameter::Double(then.to_string()),
            expression: Expression::new("0.5 * then").ok(),
        })
    }

    #[test]
    fn test_entries_keep_order() {
        let mut params = ModelParameters::default();
        assert!(params.entries.is_empty());
        params.entries.push(double("a", 1.0));
        params.entries.push(correlation("a"));
        params.entries.push(double("b", 2.0));

        let ids: Vec<_> = params.parameters().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(params.correlations().count(), 1);
        assert!(matches!(params.entries[1], ModelParameterEntry::Correlation(_)));
        assert!(params.validate().is_valid());
    }

    #[test]
    fn test_leading_correlation_is_invalid() {
        let params = ModelParameters {
            entries: vec![correlation("a"), double("a", 1.0)],
        };
        assert!(!params.validate().is_valid());
    }

    #[test]
    fn test_input_parameter_lookup_and_duplicates() {
        let mut inputs = InputParameters::default();
        for id in ["speed", "speed"] {
            inputs.parameters.push(InputParameter {
                id: id.to_string(),
                value: ScalarValue::Boolean(ExprValue::Value(true)),
            });
        }
        assert!(inputs.get("speed").is_some());
        assert_eq!(
            inputs.validate().errors(),
            ["duplicate input parameter id 'speed'".to_string()]
        );
    }
}
