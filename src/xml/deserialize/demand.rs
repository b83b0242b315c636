//! Demand: OD options, OD matrices and injection generators.

use std::io::BufRead;

use crate::demand::{
    Arrival, Arrivals, Category, Cell, Demand, GtuCharacteristics, GtuTypeModel,
    InjectionGenerator, InjectionRoom, LaneBias, LaneBiasEntry, LaneBiasSide, Level, Markov,
    MarkovState, ModelReference, Od, OdOptions, OdOptionsItem, OdOptionsScope, RouteSource,
    TemplateSource,
};
use crate::xml::deserialize::distributions::read_random_stream;
use crate::xml::deserialize::network::{read_lane_link, read_lane_position};
use crate::xml::deserialize::{
    DeserializeError, finish, impl_from_xml, read_choice, read_marker, read_once, required,
};
use crate::xml::quick::de::{ChildElement, XmlCursor};

pub(crate) fn read_demand<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Demand, DeserializeError> {
    let mut demand = Demand::default();

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "OdOptions" => demand.od_options.push(read_od_options(cursor, &child)?),
            "Od" => demand.ods.push(read_od(cursor, &child)?),
            "InjectionGenerator" => demand
                .injection_generators
                .push(read_injection_generator(cursor, &child)?),
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(demand)
}

pub(crate) fn read_od_options<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<OdOptions, DeserializeError> {
    let mut options = OdOptions {
        id: element.attrs.get_opt_string("Id"),
        items: Vec::new(),
    };
    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "OdOptionsItem" => options.items.push(read_od_options_item(cursor, &child)?),
            _ => cursor.unexpected(&child)?,
        }
    }
    Ok(options)
}

fn read_od_options_item<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<OdOptionsItem, DeserializeError> {
    let mut item = OdOptionsItem::default();
    let mut scope = None;

    while let Some(child) = cursor.next_child(element)? {
        let name = child.name.as_str();
        let next_scope = match name {
            "Global" => {
                cursor.skip(&child)?;
                Some(OdOptionsScope::Global)
            }
            "LinkType" => Some(OdOptionsScope::LinkType(cursor.read_string(&child)?)),
            "Origin" => Some(OdOptionsScope::Origin(cursor.read_string(&child)?)),
            "Lane" => Some(OdOptionsScope::Lane(read_lane_link(cursor, &child)?)),
            _ => None,
        };
        if let Some(next_scope) = next_scope {
            if scope.is_some() {
                return Err(cursor.error("OdOptionsItem has more than one scope"));
            }
            scope = Some(next_scope);
            continue;
        }

        match name {
            "DefaultModel" => item.default_model = Some(read_model_reference(cursor, &child)?),
            "Model" => {
                let gtu_type = child.attrs.get_req_string("GtuType")?;
                let model = read_model_reference(cursor, &child)?;
                item.models.push(GtuTypeModel { gtu_type, model });
            }
            "NoLaneChange" => read_once(cursor, &child, &mut item.no_lane_change)?,
            "RoomChecker" => read_once(cursor, &child, &mut item.room_checker)?,
            "HeadwayDist" => read_once(cursor, &child, &mut item.headway_dist)?,
            "Markov" => {
                let mut markov = Markov::default();
                while let Some(state) = cursor.next_child(&child)? {
                    match state.name.as_str() {
                        "State" => {
                            markov.states.push(MarkovState {
                                gtu_type: state.attrs.get_req_string("GtuType")?,
                                parent: state.attrs.get_opt_string("Parent"),
                                correlation: state.attrs.get_req_parsed("Correlation")?,
                            });
                            read_marker(cursor, &state)?;
                        }
                        _ => cursor.unexpected(&state)?,
                    }
                }
                item.markov = Some(markov);
            }
            "LaneBiases" => {
                while let Some(bias) = cursor.next_child(&child)? {
                    match bias.name.as_str() {
                        "LaneBias" => item
                            .lane_biases
                            .push(LaneBiasEntry::Bias(read_lane_bias(cursor, &bias)?)),
                        "DefinedLaneBias" => {
                            let gtu_type = bias.attrs.get_req_string("GtuType")?;
                            read_marker(cursor, &bias)?;
                            item.lane_biases.push(LaneBiasEntry::Defined { gtu_type });
                        }
                        _ => cursor.unexpected(&bias)?,
                    }
                }
            }
            _ => cursor.unexpected(&child)?,
        }
    }

    item.scope = required(cursor, scope, "Global|LinkType|Origin|Lane")?;
    Ok(item)
}

fn read_model_reference<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<ModelReference, DeserializeError> {
    let choice = read_choice(cursor, element, &["Id", "ModelIdReferral"])?;
    let id = cursor.read_string(&choice)?;
    finish(cursor, element)?;
    Ok(match choice.name.as_str() {
        "Id" => ModelReference::Id(id),
        _ => ModelReference::Referral(id),
    })
}

fn read_lane_bias<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<LaneBias, DeserializeError> {
    let mut from = None;
    let mut left_speed = None;
    let mut right_speed = None;
    let mut bias = None;
    let mut sticky_lanes = None;

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "FromLeft" => {
                cursor.skip(&child)?;
                from = Some(LaneBiasSide::FromLeft);
            }
            "FromRight" => {
                cursor.skip(&child)?;
                from = Some(LaneBiasSide::FromRight);
            }
            "LeftSpeed" => read_once(cursor, &child, &mut left_speed)?,
            "RightSpeed" => read_once(cursor, &child, &mut right_speed)?,
            "Bias" => read_once(cursor, &child, &mut bias)?,
            "StickyLanes" => read_once(cursor, &child, &mut sticky_lanes)?,
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(LaneBias {
        gtu_type: element.attrs.get_req_string("GtuType")?,
        from: required(cursor, from, "FromLeft|FromRight")?,
        left_speed: required(cursor, left_speed, "LeftSpeed")?,
        right_speed: required(cursor, right_speed, "RightSpeed")?,
        bias: required(cursor, bias, "Bias")?,
        sticky_lanes,
    })
}

pub(crate) fn read_od<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Od, DeserializeError> {
    let mut od = Od {
        id: element.attrs.get_req_string("Id")?,
        options: element.attrs.get_opt_string("Options"),
        sink_type: element.attrs.get_opt_string("SinkType"),
        ..Od::default()
    };

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "GlobalTime" => {
                while let Some(time) = cursor.next_child(&child)? {
                    match time.name.as_str() {
                        "Time" => od.global_time.push(cursor.read_parsed(&time)?),
                        _ => cursor.unexpected(&time)?,
                    }
                }
            }
            "GlobalInterpolation" => read_once(cursor, &child, &mut od.global_interpolation)?,
            "GlobalFactor" => read_once(cursor, &child, &mut od.global_factor)?,
            "Category" => od.categories.push(read_category(cursor, &child)?),
            "Cell" => od.cells.push(read_cell(cursor, &child)?),
            _ => cursor.unexpected(&child)?,
        }
    }

    log::debug!("read OD '{}' with {} cells", od.id, od.cells.len());
    Ok(od)
}

fn read_category<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Category, DeserializeError> {
    let a = &element.attrs;
    let mut category = Category {
        id: a.get_req_string("Id")?,
        gtu_type: a.get_opt_string("GtuType"),
        route: a.get_opt_string("Route"),
        lane: None,
        factor: a.get_opt_parsed("Factor")?,
    };
    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "Lane" => category.lane = Some(read_lane_link(cursor, &child)?),
            _ => cursor.unexpected(&child)?,
        }
    }
    Ok(category)
}

fn read_cell<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Cell, DeserializeError> {
    let a = &element.attrs;
    let mut cell = Cell {
        origin: a.get_req_string("Origin")?,
        destination: a.get_req_string("Destination")?,
        category: a.get_opt_string("Category"),
        interpolation: a.get_opt_parsed("Interpolation")?,
        factor: a.get_opt_parsed("Factor")?,
        levels: Vec::new(),
    };
    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "Level" => {
                let time = child.attrs.get_opt_parsed("Time")?;
                let value = cursor.read_parsed(&child)?;
                cell.levels.push(Level { time, value });
            }
            _ => cursor.unexpected(&child)?,
        }
    }
    Ok(cell)
}

pub(crate) fn read_injection_generator<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<InjectionGenerator, DeserializeError> {
    let mut generator = InjectionGenerator {
        no_lane_change_distance: element.attrs.get_opt_parsed("NoLaneChangeDistance")?,
        ..InjectionGenerator::default()
    };

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "Position" => generator.position = Some(read_lane_position(cursor, &child)?),
            "GtuCharacteristics" => {
                generator.gtu_characteristics = Some(read_gtu_characteristics(cursor, &child)?)
            }
            "RoomChecker" => {
                generator.room = Some(InjectionRoom::RoomChecker(cursor.read_parsed(&child)?))
            }
            "TimeToCollision" => {
                generator.room = Some(InjectionRoom::TimeToCollision(cursor.read_parsed(&child)?))
            }
            "RandomStream" => generator.random_stream = Some(read_random_stream(cursor, &child)?),
            "Arrivals" => generator.arrivals = read_arrivals(cursor, &child)?,
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(generator)
}

fn read_gtu_characteristics<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<GtuCharacteristics, DeserializeError> {
    let mut template = None;
    let mut route = None;

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "GtuTemplate" => template = Some(TemplateSource::GtuTemplate(cursor.read_string(&child)?)),
            "GtuTemplateMix" => {
                template = Some(TemplateSource::GtuTemplateMix(cursor.read_string(&child)?))
            }
            "Route" => route = Some(RouteSource::Route(cursor.read_string(&child)?)),
            "RouteMix" => route = Some(RouteSource::RouteMix(cursor.read_string(&child)?)),
            "ShortestRoute" => route = Some(RouteSource::ShortestRoute(cursor.read_string(&child)?)),
            "ShortestRouteMix" => {
                route = Some(RouteSource::ShortestRouteMix(cursor.read_string(&child)?))
            }
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(GtuCharacteristics {
        template: required(cursor, template, "GtuTemplate|GtuTemplateMix")?,
        route,
    })
}

fn read_arrivals<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Arrivals, DeserializeError> {
    let mut arrivals = Arrivals {
        uri: element.attrs.get_opt_string("Uri"),
        arrivals: Vec::new(),
    };
    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "Arrival" => arrivals.arrivals.push(read_arrival(cursor, &child)?),
            _ => cursor.unexpected(&child)?,
        }
    }
    Ok(arrivals)
}

fn read_arrival<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Arrival, DeserializeError> {
    let a = &element.attrs;
    let mut arrival = Arrival::at(cursor.read_parsed(element)?);
    arrival.id = a.get_opt_string("Id");
    arrival.gtu_type = a.get_opt_string("GtuType");
    arrival.speed = a.get_opt_parsed("Speed")?;
    arrival.link = a.get_opt_string("Link");
    arrival.lane = a.get_opt_string("Lane");
    arrival.position = a.get_opt_parsed("Position")?;
    arrival.length = a.get_opt_parsed("Length")?;
    arrival.width = a.get_opt_parsed("Width")?;
    arrival.front = a.get_opt_parsed("Front")?;
    arrival.max_speed = a.get_opt_parsed("MaxSpeed")?;
    arrival.max_acceleration = a.get_opt_parsed("MaxAcceleration")?;
    arrival.max_deceleration = a.get_opt_parsed("MaxDeceleration")?;
    arrival.route = a.get_opt_string("Route");
    arrival.origin = a.get_opt_string("Origin");
    arrival.destination = a.get_opt_string("Destination");
    Ok(arrival)
}

impl_from_xml! {
    Demand => "Demand", read_demand;
    OdOptions => "OdOptions", read_od_options;
    Od => "Od", read_od;
    InjectionGenerator => "InjectionGenerator", read_injection_generator;
}
