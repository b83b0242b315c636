//! Origin-destination matrices.

use serde::{Deserialize, Serialize};

use crate::network::LaneLink;
use crate::types::{Validate, ValidationResult};
use crate::validation_utils::{_chain, _return, validate_unique_ids};
use crate::values::{
    DoublePositiveInclusive, DoublePositiveInclusiveType, DurationType, ExprValue, FrequencyType,
    Interpolation,
};

/// Demand between origins and destinations over time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Od {
    pub id: String,
    /// Id of the OD options to apply.
    pub options: Option<String>,
    pub sink_type: Option<String>,
    pub global_time: Vec<DurationType>,
    pub global_interpolation: Option<ExprValue<Interpolation>>,
    pub global_factor: Option<DoublePositiveInclusiveType>,
    pub categories: Vec<Category>,
    pub cells: Vec<Cell>,
}

fn unit_factor() -> DoublePositiveInclusiveType {
    ExprValue::Value(DoublePositiveInclusive::ONE)
}

impl Od {
    pub fn effective_global_interpolation(&self) -> ExprValue<Interpolation> {
        self.global_interpolation
            .clone()
            .unwrap_or(ExprValue::Value(Interpolation::Linear))
    }

    pub fn effective_global_factor(&self) -> DoublePositiveInclusiveType {
        self.global_factor.clone().unwrap_or_else(unit_factor)
    }

    /// Interpolation of a cell, falling back to the global interpolation.
    pub fn cell_interpolation(&self, cell: &Cell) -> ExprValue<Interpolation> {
        cell.interpolation
            .clone()
            .unwrap_or_else(|| self.effective_global_interpolation())
    }
}

impl Validate for Od {
    fn validate(&self) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        _chain(
            validate_unique_ids("category", self.categories.iter().map(|c| c.id.as_str())),
            &mut warnings,
            &mut errors,
        );
        for cell in &self.cells {
            if cell.levels.iter().any(|level| level.time.is_none()) && self.global_time.is_empty() {
                errors.push(format!(
                    "cell {} -> {} has levels without time and there is no global time",
                    cell.origin, cell.destination
                ));
            }
            if !self.global_time.is_empty()
                && cell.levels.iter().all(|level| level.time.is_none())
                && cell.levels.len() != self.global_time.len()
            {
                warnings.push(format!(
                    "cell {} -> {} has {} levels for {} global time slices",
                    cell.origin,
                    cell.destination,
                    cell.levels.len(),
                    self.global_time.len()
                ));
            }
        }

        _return(warnings, errors)
    }
}

/// A demand category, e.g. a GTU type on a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub gtu_type: Option<String>,
    pub route: Option<String>,
    pub lane: Option<LaneLink>,
    pub factor: Option<DoublePositiveInclusiveType>,
}

impl Category {
    pub fn effective_factor(&self) -> DoublePositiveInclusiveType {
        self.factor.clone().unwrap_or_else(unit_factor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub origin: String,
    pub destination: String,
    pub category: Option<String>,
    pub interpolation: Option<ExprValue<Interpolation>>,
    pub factor: Option<DoublePositiveInclusiveType>,
    pub levels: Vec<Level>,
}

impl Cell {
    pub fn effective_factor(&self) -> DoublePositiveInclusiveType {
        self.factor.clone().unwrap_or_else(unit_factor)
    }
}

/// Demand level, at an explicit time or at the matching global time slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub time: Option<DurationType>,
    pub value: FrequencyType,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{Duration, DurationUnit, Frequency, FrequencyUnit};

    fn level(time: Option<f64>, per_hour: f64) -> Level {
        Level {
            time: time.map(|t| ExprValue::Value(Duration::new(t, DurationUnit::Second))),
            value: ExprValue::Value(Frequency::new(per_hour, FrequencyUnit::PerHour)),
        }
    }

    #[test]
    fn test_defaults() {
        let od = Od::default();
        assert_eq!(od.effective_global_interpolation(), ExprValue::Value(Interpolation::Linear));
        assert_eq!(od.effective_global_factor().value().map(|f| f.get()), Some(1.0));
        assert_eq!(Category::default().effective_factor(), unit_factor());
    }

    #[test]
    fn test_cell_interpolation_falls_back_to_global() {
        let mut od = Od {
            global_interpolation: Some(ExprValue::Value(Interpolation::Stepwise)),
            ..Od::default()
        };
        let mut cell = Cell::default();
        assert_eq!(od.cell_interpolation(&cell), ExprValue::Value(Interpolation::Stepwise));
        cell.interpolation = Some(ExprValue::Value(Interpolation::Linear));
        assert_eq!(od.cell_interpolation(&cell), ExprValue::Value(Interpolation::Linear));
        od.global_interpolation = None;
        assert_eq!(od.cell_interpolation(&Cell::default()), ExprValue::Value(Interpolation::Linear));
    }

    #[test]
    fn test_levels_need_time() {
        let od = Od {
            cells: vec![Cell {
                origin: "A".to_string(),
                destination: "B".to_string(),
                levels: vec![level(None, 1000.0)],
                ..Cell::default()
            }],
            ..Od::default()
        };
        assert!(!od.validate().is_valid());
    }
}
