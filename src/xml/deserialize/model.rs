//! Model types, their parameters and the LMRS tactical planner.

use std::io::BufRead;

use crate::model::{
    AccelerationIncentive, BehavioralAdaptations, CarFollowingComponents, CarFollowingModel,
    ComponentModel, Correlation, CorrelationParameter, Fuller, HeadwayGtuType, InputParameter,
    InputParameters, Lmrs, MandatoryIncentive, Mental, ModelParameter, ModelParameterEntry,
    ModelParameters, ModelType, ParameterValue, PerceptionType, RouteSystem, ScalarValue,
    StrategicalPlanner, TacticalPlanner, VoluntaryIncentive,
};
use crate::values::{
    AccelerationUnit, DurationUnit, Expression, FrequencyUnit, LengthUnit, LinearDensityUnit,
    SpeedUnit,
};
use crate::xml::deserialize::distributions::{
    read_constant_dist, read_discrete_dist, read_unit_dist,
};
use crate::xml::deserialize::{
    DeserializeError, finish, impl_from_xml, read_choice, read_marker, read_once, required,
};
use crate::xml::quick::de::{ChildElement, XmlCursor};

pub(crate) fn read_model<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<ModelType, DeserializeError> {
    let mut model = ModelType {
        id: element.attrs.get_opt_string("Id"),
        parent: element.attrs.get_opt_string("Parent"),
        gtu_type: element.attrs.get_opt_string("GtuType"),
        ..ModelType::default()
    };

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "ModelParameters" => model.parameters = Some(read_model_parameters(cursor, &child)?),
            "StrategicalPlanner" => {
                let mut planner = StrategicalPlanner::default();
                while let Some(part) = cursor.next_child(&child)? {
                    match part.name.as_str() {
                        "Route" => {
                            let choice = read_choice(cursor, &part, &["None", "Shortest"])?;
                            planner.route = Some(match choice.name.as_str() {
                                "None" => RouteSystem::None,
                                _ => RouteSystem::Shortest,
                            });
                            read_marker(cursor, &choice)?;
                            finish(cursor, &part)?;
                        }
                        _ => cursor.unexpected(&part)?,
                    }
                }
                model.strategical_planner = Some(planner);
            }
            "TacticalPlanner" => {
                let choice = read_choice(cursor, &child, &["Lmrs"])?;
                model.tactical_planner = Some(TacticalPlanner::Lmrs(read_lmrs(cursor, &choice)?));
                finish(cursor, &child)?;
            }
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(model)
}

/// Read the text of a scalar parameter element into the variant it names.
pub(crate) fn read_scalar_value<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<ScalarValue, DeserializeError> {
    let value = match element.name.as_str() {
        "Duration" => ScalarValue::Duration(cursor.read_parsed(element)?),
        "Length" => ScalarValue::Length(cursor.read_parsed(element)?),
        "Speed" => ScalarValue::Speed(cursor.read_parsed(element)?),
        "Acceleration" => ScalarValue::Acceleration(cursor.read_parsed(element)?),
        "LinearDensity" => ScalarValue::LinearDensity(cursor.read_parsed(element)?),
        "Frequency" => ScalarValue::Frequency(cursor.read_parsed(element)?),
        "Double" => ScalarValue::Double(cursor.read_parsed(element)?),
        "Fraction" => ScalarValue::Fraction(cursor.read_parsed(element)?),
        "Integer" => ScalarValue::Integer(cursor.read_parsed(element)?),
        "Boolean" => ScalarValue::Boolean(cursor.read_parsed(element)?),
        // Strings keep their whitespace
        "String" => ScalarValue::String(cursor.read_text(element)?.parse().map_err(
            |e| cursor.error(format!("Invalid value for String: {e}")),
        )?),
        "Class" => ScalarValue::Class(cursor.read_parsed(element)?),
        other => {
            return Err(DeserializeError::UnexpectedElement {
                expected: ScalarValue::ELEMENTS.join("|"),
                found: other.to_string(),
            });
        }
    };
    Ok(value)
}

fn read_parameter_value<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<ParameterValue, DeserializeError> {
    let value = match element.name.as_str() {
        "DurationDist" => ParameterValue::DurationDist(read_unit_dist::<_, DurationUnit>(cursor, element)?),
        "LengthDist" => ParameterValue::LengthDist(read_unit_dist::<_, LengthUnit>(cursor, element)?),
        "SpeedDist" => ParameterValue::SpeedDist(read_unit_dist::<_, SpeedUnit>(cursor, element)?),
        "AccelerationDist" => {
            ParameterValue::AccelerationDist(read_unit_dist::<_, AccelerationUnit>(cursor, element)?)
        }
        "LinearDensityDist" => {
            ParameterValue::LinearDensityDist(read_unit_dist::<_, LinearDensityUnit>(cursor, element)?)
        }
        "FrequencyDist" => {
            ParameterValue::FrequencyDist(read_unit_dist::<_, FrequencyUnit>(cursor, element)?)
        }
        "DoubleDist" => ParameterValue::DoubleDist(read_constant_dist(cursor, element)?),
        "IntegerDist" => ParameterValue::IntegerDist(read_discrete_dist(cursor, element)?),
        _ => ParameterValue::Scalar(read_scalar_value(cursor, element)?),
    };
    Ok(value)
}

pub(crate) fn read_model_parameters<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<ModelParameters, DeserializeError> {
    let mut parameters = ModelParameters::default();

    while let Some(child) = cursor.next_child(element)? {
        let name = child.name.as_str();
        if name == "Correlation" {
            let correlation = read_correlation(cursor, &child)?;
            parameters
                .entries
                .push(ModelParameterEntry::Correlation(correlation));
        } else if ScalarValue::ELEMENTS.contains(&name)
            || ParameterValue::DIST_ELEMENTS.contains(&name)
        {
            let id = child.attrs.get_req_string("Id")?;
            let value = read_parameter_value(cursor, &child)?;
            parameters
                .entries
                .push(ModelParameterEntry::Parameter(ModelParameter { id, value }));
        } else {
            cursor.unexpected(&child)?;
        }
    }

    Ok(parameters)
}

fn read_correlation_parameter<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<CorrelationParameter, DeserializeError> {
    const KINDS: &[&str] = &[
        "Acceleration",
        "Double",
        "Duration",
        "Fraction",
        "Frequency",
        "Integer",
        "Length",
        "LinearDensity",
        "Speed",
    ];
    let choice = read_choice(cursor, element, KINDS)?;
    let id = cursor.read_string(&choice)?;
    let parameter = match choice.name.as_str() {
        "Acceleration" => CorrelationParameter::Acceleration(id),
        "Double" => CorrelationParameter::Double(id),
        "Duration" => CorrelationParameter::Duration(id),
        "Fraction" => CorrelationParameter::Fraction(id),
        "Frequency" => CorrelationParameter::Frequency(id),
        "Integer" => CorrelationParameter::Integer(id),
        "Length" => CorrelationParameter::Length(id),
        "LinearDensity" => CorrelationParameter::LinearDensity(id),
        _ => CorrelationParameter::Speed(id),
    };
    finish(cursor, element)?;
    Ok(parameter)
}

fn read_correlation<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Correlation, DeserializeError> {
    let mut first = None;
    let mut then = None;

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "First" => first = Some(read_correlation_parameter(cursor, &child)?),
            "Then" => then = Some(read_correlation_parameter(cursor, &child)?),
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(Correlation {
        first,
        then: required(cursor, then, "Then")?,
        expression: element
            .attrs
            .get_opt_with("Expression", |text| Expression::new(text))?,
    })
}

/// Read the content of `InputParameters` or `DefaultInputParameters`.
pub(crate) fn read_input_parameters<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<InputParameters, DeserializeError> {
    let mut inputs = InputParameters::default();
    while let Some(child) = cursor.next_child(element)? {
        if ScalarValue::ELEMENTS.contains(&child.name.as_str()) {
            let id = child.attrs.get_req_string("Id")?;
            let value = read_scalar_value(cursor, &child)?;
            inputs.parameters.push(InputParameter { id, value });
        } else {
            cursor.unexpected(&child)?;
        }
    }
    Ok(inputs)
}

pub(crate) fn read_lmrs<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Lmrs, DeserializeError> {
    let mut lmrs = Lmrs::default();

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "CarFollowingModel" => {
                lmrs.car_following_model = Some(read_car_following_model(cursor, &child)?)
            }
            "Synchronization" => read_once(cursor, &child, &mut lmrs.synchronization)?,
            "Cooperation" => read_once(cursor, &child, &mut lmrs.cooperation)?,
            "GapAcceptance" => read_once(cursor, &child, &mut lmrs.gap_acceptance)?,
            "Tailgating" => read_once(cursor, &child, &mut lmrs.tailgating)?,
            "MandatoryIncentives" => {
                lmrs.mandatory_incentives =
                    read_incentives(cursor, &child, MandatoryIncentive::from_element)?
            }
            "VoluntaryIncentives" => {
                lmrs.voluntary_incentives =
                    read_incentives(cursor, &child, VoluntaryIncentive::from_element)?
            }
            "AccelerationIncentives" => {
                lmrs.acceleration_incentives =
                    read_incentives(cursor, &child, AccelerationIncentive::from_element)?
            }
            "Perception" => lmrs.perception = Some(read_perception(cursor, &child)?),
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(lmrs)
}

fn read_incentives<R: BufRead, T>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
    from_element: fn(&str) -> Option<T>,
) -> Result<Vec<T>, DeserializeError> {
    let mut incentives = Vec::new();
    for name in cursor.read_markers(element)? {
        match from_element(&name) {
            Some(incentive) => incentives.push(incentive),
            None => log::warn!("ignoring unknown incentive <{}> in <{}>", name, element.name),
        }
    }
    Ok(incentives)
}

fn read_car_following_model<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<CarFollowingModel, DeserializeError> {
    let choice = read_choice(cursor, element, &["Idm", "IdmPlus"])?;
    let mut components = CarFollowingComponents::default();
    while let Some(child) = cursor.next_child(&choice)? {
        match child.name.as_str() {
            "DesiredHeadwayModel" => {
                components.desired_headway_model = Some(read_component_model(cursor, &child)?)
            }
            "DesiredSpeedModel" => {
                components.desired_speed_model = Some(read_component_model(cursor, &child)?)
            }
            _ => cursor.unexpected(&child)?,
        }
    }
    finish(cursor, element)?;

    Ok(match choice.name.as_str() {
        "Idm" => CarFollowingModel::Idm(components),
        _ => CarFollowingModel::IdmPlus(components),
    })
}

fn read_component_model<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<ComponentModel, DeserializeError> {
    let choice = read_choice(cursor, element, &["Idm", "Socio", "Class"])?;
    let model = match choice.name.as_str() {
        "Idm" => {
            cursor.skip(&choice)?;
            ComponentModel::Idm
        }
        "Socio" => {
            cursor.skip(&choice)?;
            ComponentModel::Socio
        }
        _ => ComponentModel::Class(cursor.read_parsed(&choice)?),
    };
    finish(cursor, element)?;
    Ok(model)
}

fn read_perception<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<PerceptionType, DeserializeError> {
    let mut perception = PerceptionType::default();

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "Categories" => {
                for name in cursor.read_markers(&child)? {
                    if !perception.categories.enable(&name) {
                        log::warn!("ignoring unknown perception category <{}>", name);
                    }
                }
            }
            "HeadwayGtuType" => {
                let choice = read_choice(cursor, &child, &["Wrap", "Perceived"])?;
                let headway = if choice.name == "Wrap" {
                    cursor.skip(&choice)?;
                    HeadwayGtuType::Wrap
                } else {
                    let mut estimation = None;
                    let mut anticipation = None;
                    while let Some(part) = cursor.next_child(&choice)? {
                        match part.name.as_str() {
                            "Estimation" => read_once(cursor, &part, &mut estimation)?,
                            "Anticipation" => read_once(cursor, &part, &mut anticipation)?,
                            _ => cursor.unexpected(&part)?,
                        }
                    }
                    HeadwayGtuType::Perceived {
                        estimation: required(cursor, estimation, "Estimation")?,
                        anticipation: required(cursor, anticipation, "Anticipation")?,
                    }
                };
                finish(cursor, &child)?;
                perception.headway_gtu_type = Some(headway);
            }
            "Mental" => {
                let choice = read_choice(cursor, &child, &["Fuller", "Class"])?;
                let mental = if choice.name == "Fuller" {
                    Mental::Fuller(read_fuller(cursor, &choice)?)
                } else {
                    Mental::Class(cursor.read_parsed(&choice)?)
                };
                perception.mental = Some(mental);
                finish(cursor, &child)?;
            }
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(perception)
}

fn read_fuller<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Fuller, DeserializeError> {
    let mut fuller = Fuller::default();

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "Task" => fuller.tasks.push(cursor.read_parsed(&child)?),
            "BehavioralAdaptations" => {
                let mut adaptations = BehavioralAdaptations::default();
                for name in cursor.read_markers(&child)? {
                    match name.as_str() {
                        "SituationalAwareness" => adaptations.situational_awareness = true,
                        "Headway" => adaptations.headway = true,
                        "Speed" => adaptations.speed = true,
                        other => log::warn!("ignoring unknown behavioral adaptation <{}>", other),
                    }
                }
                fuller.behavioral_adaptations = adaptations;
            }
            "TaskManager" => read_once(cursor, &child, &mut fuller.task_manager)?,
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(fuller)
}

impl_from_xml! {
    ModelType => "Model", read_model;
    ModelParameters => "ModelParameters", read_model_parameters;
    InputParameters => "InputParameters", read_input_parameters;
    Lmrs => "Lmrs", read_lmrs;
}
