//! The document root and scenarios.

use std::io::BufRead;

use crate::document::OtsDocument;
use crate::scenario::{ModelIdReferral, Scenario, Scenarios};
use crate::xml::deserialize::control::read_control;
use crate::xml::deserialize::definitions::read_definitions;
use crate::xml::deserialize::demand::read_demand;
use crate::xml::deserialize::model::{read_input_parameters, read_model};
use crate::xml::deserialize::network::read_network;
use crate::xml::deserialize::{DeserializeError, impl_from_xml, read_marker};
use crate::xml::quick::de::{ChildElement, XmlCursor};

pub(crate) fn read_document<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<OtsDocument, DeserializeError> {
    if element.name != "Ots" {
        return Err(DeserializeError::UnexpectedElement {
            expected: "Ots".to_string(),
            found: element.name.clone(),
        });
    }

    let mut document = OtsDocument::default();

    while let Some(child) = cursor.next_child(element)? {
        log::trace!("reading <{}>", child.name);
        match child.name.as_str() {
            "Definitions" => document.definitions = Some(read_definitions(cursor, &child)?),
            "Network" => document.network = Some(read_network(cursor, &child)?),
            "Demand" => document.demand = Some(read_demand(cursor, &child)?),
            "Models" => {
                while let Some(model) = cursor.next_child(&child)? {
                    match model.name.as_str() {
                        "Model" => document.models.push(read_model(cursor, &model)?),
                        _ => cursor.unexpected(&model)?,
                    }
                }
            }
            "Scenarios" => document.scenarios = Some(read_scenarios(cursor, &child)?),
            "Control" => document.control = Some(read_control(cursor, &child)?),
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(document)
}

pub(crate) fn read_scenarios<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Scenarios, DeserializeError> {
    let mut scenarios = Scenarios::default();
    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "DefaultInputParameters" => {
                scenarios.default_input_parameters = Some(read_input_parameters(cursor, &child)?)
            }
            "Scenario" => scenarios.scenarios.push(read_scenario(cursor, &child)?),
            _ => cursor.unexpected(&child)?,
        }
    }
    Ok(scenarios)
}

fn read_scenario<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Scenario, DeserializeError> {
    let mut scenario = Scenario {
        id: element.attrs.get_req_string("Id")?,
        ..Scenario::default()
    };
    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "InputParameters" => {
                scenario.input_parameters = Some(read_input_parameters(cursor, &child)?)
            }
            "ModelIdReferral" => {
                scenario.model_id_referrals.push(ModelIdReferral {
                    id: child.attrs.get_req_string("Id")?,
                    model_id: child.attrs.get_req_string("ModelId")?,
                });
                read_marker(cursor, &child)?;
            }
            _ => cursor.unexpected(&child)?,
        }
    }
    Ok(scenario)
}

impl_from_xml! {
    OtsDocument => "Ots", read_document;
    Scenarios => "Scenarios", read_scenarios;
    Scenario => "Scenario", read_scenario;
}
