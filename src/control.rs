//! Traffic-light control programs.

use serde::{Deserialize, Serialize};

use crate::network::LaneLink;
use crate::types::{Validate, ValidationResult};
use crate::validation_utils::{_chain, _chain_all, _return, validate_non_empty, validate_unique_ids};
use crate::values::{
    DurationType, EncodingType, ExprValue, GraphicsType, LengthBeginEndType, Space,
};

/// Control programs in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub programs: Vec<ControlProgram>,
}

impl Validate for Control {
    fn validate(&self) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        _chain(
            validate_unique_ids("control", self.programs.iter().map(|p| p.id())),
            &mut warnings,
            &mut errors,
        );
        for program in &self.programs {
            let context = format!("control '{}'", program.id());
            _chain_all(std::iter::once(program), &context, &mut warnings, &mut errors);
        }

        _return(warnings, errors)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControlProgram {
    FixedTime(FixedTime),
    TrafCod(TrafCod),
}

impl ControlProgram {
    pub fn id(&self) -> &str {
        match self {
            ControlProgram::FixedTime(program) => &program.id,
            ControlProgram::TrafCod(program) => &program.id,
        }
    }

    pub fn signal_groups(&self) -> &[SignalGroup] {
        match self {
            ControlProgram::FixedTime(program) => &program.signal_groups,
            ControlProgram::TrafCod(program) => &program.signal_groups,
        }
    }
}

impl Validate for ControlProgram {
    fn validate(&self) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        _chain(
            validate_unique_ids("signal group", self.signal_groups().iter().map(|g| g.id.as_str())),
            &mut warnings,
            &mut errors,
        );
        match self {
            ControlProgram::FixedTime(program) => {
                _chain(validate_non_empty(&program.cycles, "cycles"), &mut warnings, &mut errors);
                for cycle in &program.cycles {
                    if !program.signal_groups.iter().any(|g| g.id == cycle.signal_group_id) {
                        warnings.push(format!(
                            "cycle refers to signal group '{}' which this program does not define",
                            cycle.signal_group_id
                        ));
                    }
                }
            }
            ControlProgram::TrafCod(program) => {
                _chain(validate_non_empty(&program.detectors, "detectors"), &mut warnings, &mut errors);
                _chain(
                    validate_unique_ids("detector", program.detectors.iter().map(|d| d.id.as_str())),
                    &mut warnings,
                    &mut errors,
                );
            }
        }

        _return(warnings, errors)
    }
}

/// A set of traffic lights that always show the same color.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalGroup {
    pub id: String,
    pub traffic_lights: Vec<SignalGroupTrafficLight>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalGroupTrafficLight {
    pub link: String,
    pub traffic_light_id: String,
}

/// A fixed-time program with a repeating cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedTime {
    pub id: String,
    pub signal_groups: Vec<SignalGroup>,
    pub cycle_time: DurationType,
    pub offset: Option<DurationType>,
    pub cycles: Vec<Cycle>,
}

impl FixedTime {
    pub fn new(id: impl Into<String>, cycle_time: DurationType) -> Self {
        Self {
            id: id.into(),
            signal_groups: Vec::new(),
            cycle_time,
            offset: None,
            cycles: Vec::new(),
        }
    }

    pub fn effective_offset(&self) -> DurationType {
        self.offset
            .clone()
            .unwrap_or(ExprValue::Value(crate::values::Duration::si(0.0)))
    }
}

/// Timing of one signal group within the cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cycle {
    pub signal_group_id: String,
    pub offset: DurationType,
    pub pre_green: Option<DurationType>,
    pub green: DurationType,
    pub yellow: DurationType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    pub id: String,
    pub detector_type: String,
    pub placement: DetectorPlacement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DetectorPlacement {
    MultipleLane(MultipleLaneDetector),
    SingleLane(SingleLaneDetector),
}

/// A detector spanning consecutive lanes, possibly across links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipleLaneDetector {
    pub entry_link: String,
    pub entry_lane: String,
    pub entry_position: LengthBeginEndType,
    pub intermediate_lanes: Vec<LaneLink>,
    pub exit_link: String,
    pub exit_lane: String,
    pub exit_position: LengthBeginEndType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleLaneDetector {
    pub link: String,
    pub lane: String,
    pub entry_position: LengthBeginEndType,
    pub exit_position: LengthBeginEndType,
}

/// A TrafCod program, given inline or by file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafCod {
    pub id: String,
    pub signal_groups: Vec<SignalGroup>,
    pub detectors: Vec<Detector>,
    pub program: TrafCodProgram,
    pub console: TrafCodConsole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrafCodProgram {
    Inline(TextBlock),
    File(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafCodConsole {
    pub map: ConsoleMap,
    pub coordinates: ConsoleCoordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConsoleMap {
    Inline {
        graphics_type: Option<ExprValue<GraphicsType>>,
        encoding: Option<ExprValue<EncodingType>>,
        data: TextBlock,
    },
    File(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConsoleCoordinates {
    Inline(TextBlock),
    File(String),
}

/// A block of text with its whitespace handling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    pub space: Option<ExprValue<Space>>,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            space: None,
        }
    }

    pub fn effective_space(&self) -> ExprValue<Space> {
        self.space.clone().unwrap_or(ExprValue::Value(Space::Preserve))
    }

    /// The text as it should be used: verbatim when whitespace is preserved,
    /// otherwise with each line trimmed.
    pub fn effective_text(&self) -> String {
        match self.effective_space() {
            ExprValue::Value(Space::Default) => self
                .text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            _ => self.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{Duration, DurationUnit};

    fn seconds(value: f64) -> DurationType {
        ExprValue::Value(Duration::new(value, DurationUnit::Second))
    }

    #[test]
    fn test_fixed_time_offset_default() {
        let mut program = FixedTime::new("TL1", seconds(90.0));
        assert_eq!(program.effective_offset(), seconds(0.0));
        program.offset = Some(seconds(12.0));
        assert_eq!(program.effective_offset(), seconds(12.0));
    }

    #[test]
    fn test_text_block_space() {
        let mut block = TextBlock::new("  a\n\n  b  \n");
        assert_eq!(block.effective_space(), ExprValue::Value(Space::Preserve));
        assert_eq!(block.effective_text(), "  a\n\n  b  \n");
        block.space = Some(ExprValue::Value(Space::Default));
        assert_eq!(block.effective_text(), "a\nb");
    }

    #[test]
    fn test_fixed_time_without_cycles_is_invalid() {
        let control = Control {
            programs: vec![ControlProgram::FixedTime(FixedTime::new("TL1", seconds(60.0)))],
        };
        let result = control.validate();
        assert_eq!(result.errors(), ["control 'TL1': cycles cannot be empty".to_string()]);
    }

    #[test]
    fn test_program_problems_name_their_program() {
        let control = Control {
            programs: vec![
                ControlProgram::FixedTime(FixedTime::new("TL1", seconds(60.0))),
                ControlProgram::FixedTime(FixedTime::new("TL2", seconds(60.0))),
            ],
        };
        let result = control.validate();
        assert_eq!(
            result.errors(),
            [
                "control 'TL1': cycles cannot be empty".to_string(),
                "control 'TL2': cycles cannot be empty".to_string(),
            ]
        );
    }
}
