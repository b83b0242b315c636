//! Probability distributions used by GTU templates and model parameters.
//!
//! These describe a distribution; sampling is done by the simulator.

use serde::{Deserialize, Serialize};

use crate::types::{Validate, ValidationResult};
use crate::validation_utils::{_chain, _return, validate_ordered};
use crate::values::{
    AccelerationUnit, DoublePositiveInclusiveType, DoublePositiveType, DoubleType, DurationUnit,
    FractionType, FrequencyUnit, IntegerType, LengthUnit, LinearDensityUnit, LongType,
    PositiveIntegerType, SpeedUnit, Unit,
};

/// A continuous distribution, one variant per kind in the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContinuousDistribution {
    Constant {
        c: DoubleType,
    },
    Exponential {
        lambda: DoublePositiveType,
    },
    Triangular {
        min: DoubleType,
        mode: DoubleType,
        max: DoubleType,
    },
    Normal {
        mu: DoubleType,
        sigma: DoublePositiveInclusiveType,
    },
    NormalTrunc {
        mu: DoubleType,
        sigma: DoublePositiveInclusiveType,
        min: DoubleType,
        max: DoubleType,
    },
    Beta {
        alpha1: DoublePositiveType,
        alpha2: DoublePositiveType,
    },
    Erlang {
        mean: DoubleType,
        k: PositiveIntegerType,
    },
    Gamma {
        alpha: DoubleType,
        beta: DoubleType,
    },
    LogNormal {
        mu: DoubleType,
        sigma: DoublePositiveType,
    },
    LogNormalTrunc {
        mu: DoubleType,
        sigma: DoublePositiveType,
        min: DoubleType,
        max: DoubleType,
    },
    Pearson5 {
        alpha: DoublePositiveType,
        beta: DoublePositiveType,
    },
    Pearson6 {
        alpha1: DoublePositiveType,
        alpha2: DoublePositiveType,
        beta: DoublePositiveType,
    },
    Uniform {
        min: DoubleType,
        max: DoubleType,
    },
    Weibull {
        alpha: DoublePositiveType,
        beta: DoublePositiveType,
    },
}

impl ContinuousDistribution {
    /// The element name of this kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ContinuousDistribution::Constant { .. } => "Constant",
            ContinuousDistribution::Exponential { .. } => "Exponential",
            ContinuousDistribution::Triangular { .. } => "Triangular",
            ContinuousDistribution::Normal { .. } => "Normal",
            ContinuousDistribution::NormalTrunc { .. } => "NormalTrunc",
            ContinuousDistribution::Beta { .. } => "Beta",
            ContinuousDistribution::Erlang { .. } => "Erlang",
            ContinuousDistribution::Gamma { .. } => "Gamma",
            ContinuousDistribution::LogNormal { .. } => "LogNormal",
            ContinuousDistribution::LogNormalTrunc { .. } => "LogNormalTrunc",
            ContinuousDistribution::Pearson5 { .. } => "Pearson5",
            ContinuousDistribution::Pearson6 { .. } => "Pearson6",
            ContinuousDistribution::Uniform { .. } => "Uniform",
            ContinuousDistribution::Weibull { .. } => "Weibull",
        }
    }
}

impl Validate for ContinuousDistribution {
    fn validate(&self) -> ValidationResult {
        match self {
            ContinuousDistribution::Triangular { min, mode, max } => {
                validate_ordered(&["Min", "Mode", "Max"], &[min, mode, max])
            }
            ContinuousDistribution::NormalTrunc { min, max, .. }
            | ContinuousDistribution::LogNormalTrunc { min, max, .. }
            | ContinuousDistribution::Uniform { min, max } => {
                validate_ordered(&["Min", "Max"], &[min, max])
            }
            _ => ValidationResult::Valid(()),
        }
    }
}

/// A discrete distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DiscreteDistribution {
    Constant {
        c: LongType,
    },
    BernoulliI {
        p: FractionType,
    },
    Binomial {
        n: PositiveIntegerType,
        p: FractionType,
    },
    Uniform {
        min: IntegerType,
        max: IntegerType,
    },
    Geometric {
        p: FractionType,
    },
    NegBinomial {
        n: PositiveIntegerType,
        p: FractionType,
    },
    Poisson {
        lambda: DoublePositiveType,
    },
}

impl DiscreteDistribution {
    pub fn kind(&self) -> &'static str {
        match self {
            DiscreteDistribution::Constant { .. } => "Constant",
            DiscreteDistribution::BernoulliI { .. } => "BernoulliI",
            DiscreteDistribution::Binomial { .. } => "Binomial",
            DiscreteDistribution::Uniform { .. } => "Uniform",
            DiscreteDistribution::Geometric { .. } => "Geometric",
            DiscreteDistribution::NegBinomial { .. } => "NegBinomial",
            DiscreteDistribution::Poisson { .. } => "Poisson",
        }
    }
}

impl Validate for DiscreteDistribution {
    fn validate(&self) -> ValidationResult {
        match self {
            DiscreteDistribution::Uniform { min, max } => validate_ordered(&["Min", "Max"], &[min, max]),
            _ => ValidationResult::Valid(()),
        }
    }
}

/// Where a distribution draws its random numbers from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RandomStreamSource {
    #[default]
    Default,
    /// A stream defined by id elsewhere in the document.
    Defined(String),
}

/// A continuous distribution with an optional random stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantDist {
    pub distribution: ContinuousDistribution,
    pub random_stream: Option<RandomStreamSource>,
}

impl ConstantDist {
    pub fn new(distribution: ContinuousDistribution) -> Self {
        Self {
            distribution,
            random_stream: None,
        }
    }

    pub fn effective_random_stream(&self) -> RandomStreamSource {
        self.random_stream.clone().unwrap_or_default()
    }
}

impl Validate for ConstantDist {
    fn validate(&self) -> ValidationResult {
        self.distribution.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteDist {
    pub distribution: DiscreteDistribution,
    pub random_stream: Option<RandomStreamSource>,
}

impl DiscreteDist {
    pub fn new(distribution: DiscreteDistribution) -> Self {
        Self {
            distribution,
            random_stream: None,
        }
    }
}

impl Validate for DiscreteDist {
    fn validate(&self) -> ValidationResult {
        self.distribution.validate()
    }
}

/// A continuous distribution whose samples are in `unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDist<U> {
    pub unit: U,
    pub dist: ConstantDist,
}

impl<U: Unit> UnitDist<U> {
    pub fn new(unit: U, distribution: ContinuousDistribution) -> Self {
        Self {
            unit,
            dist: ConstantDist::new(distribution),
        }
    }
}

impl<U> Validate for UnitDist<U> {
    fn validate(&self) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();
        _chain(self.dist.validate(), &mut warnings, &mut errors);
        _return(warnings, errors)
    }
}

pub type DurationDist = UnitDist<DurationUnit>;
pub type LengthDist = UnitDist<LengthUnit>;
pub type SpeedDist = UnitDist<SpeedUnit>;
pub type AccelerationDist = UnitDist<AccelerationUnit>;
pub type LinearDensityDist = UnitDist<LinearDensityUnit>;
pub type FrequencyDist = UnitDist<FrequencyUnit>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::ExprValue;

    #[test]
    fn test_triangular_order() {
        let ok = ContinuousDistribution::Triangular {
            min: ExprValue::Value(1.0),
            mode: ExprValue::Value(2.0),
            max: ExprValue::Value(3.0),
        };
        assert!(ok.validate().is_valid());

        let bad = ContinuousDistribution::Triangular {
            min: ExprValue::Value(1.0),
            mode: ExprValue::Value(4.0),
            max: ExprValue::Value(3.0),
        };
        assert_eq!(bad.validate().errors().len(), 1);
    }

    #[test]
    fn test_discrete_uniform_order() {
        let bad = DiscreteDistribution::Uniform {
            min: ExprValue::Value(5),
            max: ExprValue::Value(2),
        };
        assert!(!bad.validate().is_valid());
    }

    #[test]
    fn test_random_stream_default() {
        let dist = ConstantDist::new(ContinuousDistribution::Constant {
            c: ExprValue::Value(1.0),
        });
        assert_eq!(dist.effective_random_stream(), RandomStreamSource::Default);
        assert_eq!(dist.distribution.kind(), "Constant");
    }
}
