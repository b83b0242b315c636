use std::io::Write;

use crate::document::{OTS_NAMESPACE, OtsDocument};
use crate::scenario::{Scenario, Scenarios};
use crate::xml::quick::ser::{AttrList, XmlEmitter};
use crate::xml::serialize::control::write_control;
use crate::xml::serialize::definitions::write_definitions;
use crate::xml::serialize::demand::write_demand;
use crate::xml::serialize::model::{write_input_parameters, write_model};
use crate::xml::serialize::network::write_network;
use crate::xml::serialize::{SerializeError, impl_to_xml};

/// Write the `Ots` root element with the OTS default namespace.
pub(crate) fn write_document<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    document: &OtsDocument,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs.add("xmlns", OTS_NAMESPACE);

    emit.elem("Ots", &attrs, |emit| {
        if let Some(definitions) = &document.definitions {
            write_definitions(emit, definitions)?;
        }
        if let Some(network) = &document.network {
            write_network(emit, network)?;
        }
        if let Some(demand) = &document.demand {
            write_demand(emit, demand)?;
        }
        if !document.models.is_empty() {
            emit.elem("Models", &AttrList::new(), |emit| {
                for model in &document.models {
                    write_model(emit, model)?;
                }
                Ok(())
            })?;
        }
        if let Some(scenarios) = &document.scenarios {
            write_scenarios(emit, scenarios)?;
        }
        if let Some(control) = &document.control {
            write_control(emit, control)?;
        }
        Ok(())
    })
}

pub(crate) fn write_scenarios<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    scenarios: &Scenarios,
) -> Result<(), SerializeError> {
    let has_children =
        scenarios.default_input_parameters.is_some() || !scenarios.scenarios.is_empty();
    emit.elem_or_empty("Scenarios", &AttrList::new(), has_children, |emit| {
        if let Some(defaults) = &scenarios.default_input_parameters {
            write_input_parameters(emit, "DefaultInputParameters", defaults)?;
        }
        for scenario in &scenarios.scenarios {
            write_scenario(emit, scenario)?;
        }
        Ok(())
    })
}

fn write_scenario<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    scenario: &Scenario,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs.add("Id", &scenario.id);

    let has_children =
        scenario.input_parameters.is_some() || !scenario.model_id_referrals.is_empty();
    emit.elem_or_empty("Scenario", &attrs, has_children, |emit| {
        if let Some(inputs) = &scenario.input_parameters {
            write_input_parameters(emit, "InputParameters", inputs)?;
        }
        for referral in &scenario.model_id_referrals {
            let mut attrs = AttrList::new();
            attrs.add("Id", &referral.id).add("ModelId", &referral.model_id);
            emit.empty_elem_with_attrs("ModelIdReferral", &attrs)?;
        }
        Ok(())
    })
}

impl_to_xml! {
    OtsDocument => "Ots", write_document;
    Scenarios => "Scenarios", write_scenarios;
    Scenario => "Scenario", write_scenario;
}
