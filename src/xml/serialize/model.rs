use std::io::Write;

use crate::model::{
    CarFollowingModel, ComponentModel, Correlation, CorrelationParameter, HeadwayGtuType,
    InputParameters, Lmrs, Mental, ModelParameterEntry, ModelParameters, ModelType,
    ParameterValue, PerceptionCategories, PerceptionType, RouteSystem, ScalarValue,
    TacticalPlanner,
};
use crate::values::Expression;
use crate::xml::quick::ser::{AttrList, XmlEmitter};
use crate::xml::serialize::distributions::{
    write_constant_dist, write_discrete_dist, write_unit_dist,
};
use crate::xml::serialize::{SerializeError, impl_to_xml};

pub(crate) fn write_model<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    model: &ModelType,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs
        .add_opt("Id", model.id.as_deref())
        .add_opt("Parent", model.parent.as_deref())
        .add_opt("GtuType", model.gtu_type.as_deref());

    let has_children = model.parameters.is_some()
        || model.strategical_planner.is_some()
        || model.tactical_planner.is_some();
    emit.elem_or_empty("Model", &attrs, has_children, |emit| {
        if let Some(parameters) = &model.parameters {
            write_model_parameters(emit, parameters)?;
        }
        if let Some(planner) = &model.strategical_planner {
            emit.elem_or_empty(
                "StrategicalPlanner",
                &AttrList::new(),
                planner.route.is_some(),
                |emit| match planner.route {
                    Some(route) => emit.elem("Route", &AttrList::new(), |emit| match route {
                        RouteSystem::None => emit.empty_elem("None"),
                        RouteSystem::Shortest => emit.empty_elem("Shortest"),
                    }),
                    None => Ok(()),
                },
            )?;
        }
        if let Some(TacticalPlanner::Lmrs(lmrs)) = &model.tactical_planner {
            emit.elem("TacticalPlanner", &AttrList::new(), |emit| write_lmrs(emit, lmrs))?;
        }
        Ok(())
    })
}

/// Write a scalar value as `<Kind attrs>text</Kind>`.
pub(crate) fn write_scalar_value<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    attrs: &AttrList,
    value: &ScalarValue,
) -> Result<(), SerializeError> {
    let text = match value {
        ScalarValue::Duration(v) => v.to_string(),
        ScalarValue::Length(v) => v.to_string(),
        ScalarValue::Speed(v) => v.to_string(),
        ScalarValue::Acceleration(v) => v.to_string(),
        ScalarValue::LinearDensity(v) => v.to_string(),
        ScalarValue::Frequency(v) => v.to_string(),
        ScalarValue::Double(v) => v.to_string(),
        ScalarValue::Fraction(v) => v.to_string(),
        ScalarValue::Integer(v) => v.to_string(),
        ScalarValue::Boolean(v) => v.to_string(),
        ScalarValue::String(v) => v.to_string(),
        ScalarValue::Class(v) => v.to_string(),
    };
    emit.text_elem_with_attrs(value.element_name(), attrs, &text)
}

pub(crate) fn write_model_parameters<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    parameters: &ModelParameters,
) -> Result<(), SerializeError> {
    emit.elem_or_empty(
        "ModelParameters",
        &AttrList::new(),
        !parameters.entries.is_empty(),
        |emit| {
            for entry in &parameters.entries {
                match entry {
                    ModelParameterEntry::Parameter(parameter) => {
                        let mut attrs = AttrList::new();
                        attrs.add("Id", &parameter.id);
                        write_parameter_value(emit, attrs, &parameter.value)?;
                    }
                    ModelParameterEntry::Correlation(correlation) => {
                        write_correlation(emit, correlation)?
                    }
                }
            }
            Ok(())
        },
    )
}

fn write_parameter_value<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    attrs: AttrList,
    value: &ParameterValue,
) -> Result<(), SerializeError> {
    let name = value.element_name();
    match value {
        ParameterValue::Scalar(scalar) => write_scalar_value(emit, &attrs, scalar),
        ParameterValue::DurationDist(dist) => write_unit_dist(emit, name, attrs, dist),
        ParameterValue::LengthDist(dist) => write_unit_dist(emit, name, attrs, dist),
        ParameterValue::SpeedDist(dist) => write_unit_dist(emit, name, attrs, dist),
        ParameterValue::AccelerationDist(dist) => write_unit_dist(emit, name, attrs, dist),
        ParameterValue::LinearDensityDist(dist) => write_unit_dist(emit, name, attrs, dist),
        ParameterValue::FrequencyDist(dist) => write_unit_dist(emit, name, attrs, dist),
        ParameterValue::DoubleDist(dist) => write_constant_dist(emit, name, &attrs, dist),
        ParameterValue::IntegerDist(dist) => write_discrete_dist(emit, name, &attrs, dist),
    }
}

fn write_correlation<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    correlation: &Correlation,
) -> Result<(), SerializeError> {
    fn parameter<W: Write>(
        emit: &mut XmlEmitter<'_, W>,
        name: &str,
        parameter: &CorrelationParameter,
    ) -> Result<(), SerializeError> {
        emit.elem(name, &AttrList::new(), |emit| {
            emit.text_elem(parameter.element_name(), parameter.id())
        })
    }

    let mut attrs = AttrList::new();
    attrs.add_opt("Expression", correlation.expression.as_ref().map(Expression::as_str));
    emit.elem("Correlation", &attrs, |emit| {
        if let Some(first) = &correlation.first {
            parameter(emit, "First", first)?;
        }
        parameter(emit, "Then", &correlation.then)
    })
}

/// Write input parameters under the element name `name`.
pub(crate) fn write_input_parameters<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    name: &str,
    inputs: &InputParameters,
) -> Result<(), SerializeError> {
    emit.elem_or_empty(name, &AttrList::new(), !inputs.parameters.is_empty(), |emit| {
        for input in &inputs.parameters {
            let mut attrs = AttrList::new();
            attrs.add("Id", &input.id);
            write_scalar_value(emit, &attrs, &input.value)?;
        }
        Ok(())
    })
}

fn write_markers<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    name: &str,
    markers: &[&str],
) -> Result<(), SerializeError> {
    if markers.is_empty() {
        return Ok(());
    }
    emit.elem(name, &AttrList::new(), |emit| {
        for marker in markers {
            emit.empty_elem(marker)?;
        }
        Ok(())
    })
}

pub(crate) fn write_lmrs<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    lmrs: &Lmrs,
) -> Result<(), SerializeError> {
    emit.elem("Lmrs", &AttrList::new(), |emit| {
        if let Some(model) = &lmrs.car_following_model {
            emit.elem("CarFollowingModel", &AttrList::new(), |emit| {
                let name = match model {
                    CarFollowingModel::Idm(_) => "Idm",
                    CarFollowingModel::IdmPlus(_) => "IdmPlus",
                };
                let components = model.components();
                let has_children = components.desired_headway_model.is_some()
                    || components.desired_speed_model.is_some();
                emit.elem_or_empty(name, &AttrList::new(), has_children, |emit| {
                    if let Some(component) = &components.desired_headway_model {
                        write_component_model(emit, "DesiredHeadwayModel", component)?;
                    }
                    if let Some(component) = &components.desired_speed_model {
                        write_component_model(emit, "DesiredSpeedModel", component)?;
                    }
                    Ok(())
                })
            })?;
        }
        emit.opt_value_elem("Synchronization", lmrs.synchronization.as_ref())?;
        emit.opt_value_elem("Cooperation", lmrs.cooperation.as_ref())?;
        emit.opt_value_elem("GapAcceptance", lmrs.gap_acceptance.as_ref())?;
        emit.opt_value_elem("Tailgating", lmrs.tailgating.as_ref())?;

        let mandatory: Vec<_> = lmrs
            .mandatory_incentives
            .iter()
            .map(|i| i.element_name())
            .collect();
        write_markers(emit, "MandatoryIncentives", &mandatory)?;
        let voluntary: Vec<_> = lmrs
            .voluntary_incentives
            .iter()
            .map(|i| i.element_name())
            .collect();
        write_markers(emit, "VoluntaryIncentives", &voluntary)?;
        let acceleration: Vec<_> = lmrs
            .acceleration_incentives
            .iter()
            .map(|i| i.element_name())
            .collect();
        write_markers(emit, "AccelerationIncentives", &acceleration)?;

        if let Some(perception) = &lmrs.perception {
            write_perception(emit, perception)?;
        }
        Ok(())
    })
}

fn write_component_model<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    name: &str,
    component: &ComponentModel,
) -> Result<(), SerializeError> {
    emit.elem(name, &AttrList::new(), |emit| match component {
        ComponentModel::Idm => emit.empty_elem("Idm"),
        ComponentModel::Socio => emit.empty_elem("Socio"),
        ComponentModel::Class(class) => emit.value_elem("Class", class),
    })
}

fn write_perception<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    perception: &PerceptionType,
) -> Result<(), SerializeError> {
    emit.elem("Perception", &AttrList::new(), |emit| {
        let categories: Vec<_> = PerceptionCategories::ELEMENTS
            .iter()
            .zip(perception.categories.flags())
            .filter(|(_, enabled)| *enabled)
            .map(|(name, _)| *name)
            .collect();
        emit.elem_or_empty("Categories", &AttrList::new(), !categories.is_empty(), |emit| {
            for category in &categories {
                emit.empty_elem(category)?;
            }
            Ok(())
        })?;

        if let Some(headway) = &perception.headway_gtu_type {
            emit.elem("HeadwayGtuType", &AttrList::new(), |emit| match headway {
                HeadwayGtuType::Wrap => emit.empty_elem("Wrap"),
                HeadwayGtuType::Perceived {
                    estimation,
                    anticipation,
                } => emit.elem("Perceived", &AttrList::new(), |emit| {
                    emit.value_elem("Estimation", estimation)?;
                    emit.value_elem("Anticipation", anticipation)
                }),
            })?;
        }

        match &perception.mental {
            Some(Mental::Class(class)) => {
                emit.elem("Mental", &AttrList::new(), |emit| emit.value_elem("Class", class))?
            }
            Some(Mental::Fuller(fuller)) => emit.elem("Mental", &AttrList::new(), |emit| {
                emit.elem("Fuller", &AttrList::new(), |emit| {
                    for task in &fuller.tasks {
                        emit.value_elem("Task", task)?;
                    }
                    let adaptations = fuller.behavioral_adaptations;
                    let markers: Vec<_> = [
                        ("SituationalAwareness", adaptations.situational_awareness),
                        ("Headway", adaptations.headway),
                        ("Speed", adaptations.speed),
                    ]
                    .into_iter()
                    .filter(|(_, enabled)| *enabled)
                    .map(|(name, _)| name)
                    .collect();
                    emit.elem_or_empty(
                        "BehavioralAdaptations",
                        &AttrList::new(),
                        !markers.is_empty(),
                        |emit| {
                            for marker in &markers {
                                emit.empty_elem(marker)?;
                            }
                            Ok(())
                        },
                    )?;
                    emit.opt_value_elem("TaskManager", fuller.task_manager.as_ref())
                })
            })?,
            None => {}
        }
        Ok(())
    })
}

fn write_input_parameters_element<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    inputs: &InputParameters,
) -> Result<(), SerializeError> {
    write_input_parameters(emit, "InputParameters", inputs)
}

impl_to_xml! {
    ModelType => "Model", write_model;
    ModelParameters => "ModelParameters", write_model_parameters;
    InputParameters => "InputParameters", write_input_parameters_element;
    Lmrs => "Lmrs", write_lmrs;
}
