use std::io::Write;

use crate::demand::{
    Arrival, Arrivals, Category, Cell, Demand, GtuCharacteristics, InjectionGenerator,
    InjectionRoom, LaneBiasEntry, LaneBiasSide, ModelReference, Od, OdOptions, OdOptionsItem,
    OdOptionsScope, RouteSource, TemplateSource,
};
use crate::xml::quick::ser::{AttrList, XmlEmitter};
use crate::xml::serialize::distributions::write_random_stream;
use crate::xml::serialize::network::{write_lane_link, write_lane_position};
use crate::xml::serialize::{SerializeError, impl_to_xml};

pub(crate) fn write_demand<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    demand: &Demand,
) -> Result<(), SerializeError> {
    let has_children = !demand.od_options.is_empty()
        || !demand.ods.is_empty()
        || !demand.injection_generators.is_empty();
    emit.elem_or_empty("Demand", &AttrList::new(), has_children, |emit| {
        for options in &demand.od_options {
            write_od_options(emit, options)?;
        }
        for od in &demand.ods {
            write_od(emit, od)?;
        }
        for generator in &demand.injection_generators {
            write_injection_generator(emit, generator)?;
        }
        Ok(())
    })
}

pub(crate) fn write_od_options<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    options: &OdOptions,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs.add_opt("Id", options.id.as_deref());
    emit.elem_or_empty("OdOptions", &attrs, !options.items.is_empty(), |emit| {
        for item in &options.items {
            write_od_options_item(emit, item)?;
        }
        Ok(())
    })
}

fn write_model_reference<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    name: &str,
    attrs: &AttrList,
    reference: &ModelReference,
) -> Result<(), SerializeError> {
    emit.elem(name, attrs, |emit| match reference {
        ModelReference::Id(id) => emit.text_elem("Id", id),
        ModelReference::Referral(id) => emit.text_elem("ModelIdReferral", id),
    })
}

fn write_od_options_item<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    item: &OdOptionsItem,
) -> Result<(), SerializeError> {
    emit.elem("OdOptionsItem", &AttrList::new(), |emit| {
        match &item.scope {
            OdOptionsScope::Global => emit.empty_elem("Global")?,
            OdOptionsScope::LinkType(link_type) => emit.text_elem("LinkType", link_type)?,
            OdOptionsScope::Origin(origin) => emit.text_elem("Origin", origin)?,
            OdOptionsScope::Lane(lane) => write_lane_link(emit, "Lane", lane)?,
        }

        if let Some(reference) = &item.default_model {
            write_model_reference(emit, "DefaultModel", &AttrList::new(), reference)?;
        }
        for model in &item.models {
            let mut attrs = AttrList::new();
            attrs.add("GtuType", &model.gtu_type);
            write_model_reference(emit, "Model", &attrs, &model.model)?;
        }
        emit.opt_value_elem("NoLaneChange", item.no_lane_change.as_ref())?;
        emit.opt_value_elem("RoomChecker", item.room_checker.as_ref())?;
        emit.opt_value_elem("HeadwayDist", item.headway_dist.as_ref())?;

        if let Some(markov) = &item.markov {
            emit.elem_or_empty("Markov", &AttrList::new(), !markov.states.is_empty(), |emit| {
                for state in &markov.states {
                    let mut attrs = AttrList::new();
                    attrs
                        .add("GtuType", &state.gtu_type)
                        .add_opt("Parent", state.parent.as_deref())
                        .add_value("Correlation", &state.correlation);
                    emit.empty_elem_with_attrs("State", &attrs)?;
                }
                Ok(())
            })?;
        }

        if !item.lane_biases.is_empty() {
            emit.elem("LaneBiases", &AttrList::new(), |emit| {
                for entry in &item.lane_biases {
                    match entry {
                        LaneBiasEntry::Bias(bias) => {
                            let mut attrs = AttrList::new();
                            attrs.add("GtuType", &bias.gtu_type);
                            emit.elem("LaneBias", &attrs, |emit| {
                                emit.empty_elem(match bias.from {
                                    LaneBiasSide::FromLeft => "FromLeft",
                                    LaneBiasSide::FromRight => "FromRight",
                                })?;
                                emit.value_elem("LeftSpeed", &bias.left_speed)?;
                                emit.value_elem("RightSpeed", &bias.right_speed)?;
                                emit.value_elem("Bias", &bias.bias)?;
                                emit.opt_value_elem("StickyLanes", bias.sticky_lanes.as_ref())
                            })?;
                        }
                        LaneBiasEntry::Defined { gtu_type } => {
                            let mut attrs = AttrList::new();
                            attrs.add("GtuType", gtu_type);
                            emit.empty_elem_with_attrs("DefinedLaneBias", &attrs)?;
                        }
                    }
                }
                Ok(())
            })?;
        }
        Ok(())
    })
}

pub(crate) fn write_od<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    od: &Od,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs
        .add("Id", &od.id)
        .add_opt("Options", od.options.as_deref())
        .add_opt("SinkType", od.sink_type.as_deref());

    emit.elem("Od", &attrs, |emit| {
        if !od.global_time.is_empty() {
            emit.elem("GlobalTime", &AttrList::new(), |emit| {
                for time in &od.global_time {
                    emit.value_elem("Time", time)?;
                }
                Ok(())
            })?;
        }
        emit.opt_value_elem("GlobalInterpolation", od.global_interpolation.as_ref())?;
        emit.opt_value_elem("GlobalFactor", od.global_factor.as_ref())?;
        for category in &od.categories {
            write_category(emit, category)?;
        }
        for cell in &od.cells {
            write_cell(emit, cell)?;
        }
        Ok(())
    })
}

fn write_category<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    category: &Category,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs
        .add("Id", &category.id)
        .add_opt("GtuType", category.gtu_type.as_deref())
        .add_opt("Route", category.route.as_deref())
        .add_opt_value("Factor", category.factor.as_ref());
    emit.elem_or_empty("Category", &attrs, category.lane.is_some(), |emit| {
        match &category.lane {
            Some(lane) => write_lane_link(emit, "Lane", lane),
            None => Ok(()),
        }
    })
}

fn write_cell<W: Write>(emit: &mut XmlEmitter<'_, W>, cell: &Cell) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs
        .add("Origin", &cell.origin)
        .add("Destination", &cell.destination)
        .add_opt("Category", cell.category.as_deref())
        .add_opt_value("Interpolation", cell.interpolation.as_ref())
        .add_opt_value("Factor", cell.factor.as_ref());
    emit.elem_or_empty("Cell", &attrs, !cell.levels.is_empty(), |emit| {
        for level in &cell.levels {
            let mut attrs = AttrList::new();
            attrs.add_opt_value("Time", level.time.as_ref());
            emit.text_elem_with_attrs("Level", &attrs, &level.value.to_string())?;
        }
        Ok(())
    })
}

pub(crate) fn write_injection_generator<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    generator: &InjectionGenerator,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs.add_opt_value("NoLaneChangeDistance", generator.no_lane_change_distance.as_ref());

    emit.elem("InjectionGenerator", &attrs, |emit| {
        if let Some(position) = &generator.position {
            write_lane_position(emit, "Position", position)?;
        }
        if let Some(characteristics) = &generator.gtu_characteristics {
            write_gtu_characteristics(emit, characteristics)?;
        }
        match &generator.room {
            Some(InjectionRoom::RoomChecker(checker)) => emit.value_elem("RoomChecker", checker)?,
            Some(InjectionRoom::TimeToCollision(ttc)) => emit.value_elem("TimeToCollision", ttc)?,
            None => {}
        }
        if let Some(stream) = &generator.random_stream {
            write_random_stream(emit, stream)?;
        }
        write_arrivals(emit, &generator.arrivals)
    })
}

fn write_gtu_characteristics<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    characteristics: &GtuCharacteristics,
) -> Result<(), SerializeError> {
    emit.elem("GtuCharacteristics", &AttrList::new(), |emit| {
        match &characteristics.template {
            TemplateSource::GtuTemplate(id) => emit.text_elem("GtuTemplate", id)?,
            TemplateSource::GtuTemplateMix(id) => emit.text_elem("GtuTemplateMix", id)?,
        }
        match &characteristics.route {
            Some(RouteSource::Route(id)) => emit.text_elem("Route", id),
            Some(RouteSource::RouteMix(id)) => emit.text_elem("RouteMix", id),
            Some(RouteSource::ShortestRoute(id)) => emit.text_elem("ShortestRoute", id),
            Some(RouteSource::ShortestRouteMix(id)) => emit.text_elem("ShortestRouteMix", id),
            None => Ok(()),
        }
    })
}

fn write_arrivals<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    arrivals: &Arrivals,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs.add_opt("Uri", arrivals.uri.as_deref());
    emit.elem_or_empty("Arrivals", &attrs, !arrivals.arrivals.is_empty(), |emit| {
        for arrival in &arrivals.arrivals {
            write_arrival(emit, arrival)?;
        }
        Ok(())
    })
}

fn write_arrival<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    arrival: &Arrival,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs
        .add_opt("Id", arrival.id.as_deref())
        .add_opt("GtuType", arrival.gtu_type.as_deref())
        .add_opt_value("Speed", arrival.speed.as_ref())
        .add_opt("Link", arrival.link.as_deref())
        .add_opt("Lane", arrival.lane.as_deref())
        .add_opt_value("Position", arrival.position.as_ref())
        .add_opt_value("Length", arrival.length.as_ref())
        .add_opt_value("Width", arrival.width.as_ref())
        .add_opt_value("Front", arrival.front.as_ref())
        .add_opt_value("MaxSpeed", arrival.max_speed.as_ref())
        .add_opt_value("MaxAcceleration", arrival.max_acceleration.as_ref())
        .add_opt_value("MaxDeceleration", arrival.max_deceleration.as_ref())
        .add_opt("Route", arrival.route.as_deref())
        .add_opt("Origin", arrival.origin.as_deref())
        .add_opt("Destination", arrival.destination.as_deref());
    emit.text_elem_with_attrs("Arrival", &attrs, &arrival.time.to_string())
}

impl_to_xml! {
    Demand => "Demand", write_demand;
    OdOptions => "OdOptions", write_od_options;
    Od => "Od", write_od;
    InjectionGenerator => "InjectionGenerator", write_injection_generator;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::Level;
    use crate::values::{ExprValue, Frequency, FrequencyUnit, Interpolation};
    use quick_xml::Writer;

    fn written(
        write: impl FnOnce(&mut XmlEmitter<'_, Vec<u8>>) -> Result<(), SerializeError>,
    ) -> String {
        let mut writer = Writer::new(Vec::new());
        write(&mut XmlEmitter::new(&mut writer)).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_write_od_options_item_scope_first() {
        let options = OdOptions {
            id: None,
            items: vec![OdOptionsItem {
                default_model: Some(ModelReference::Id("CAR_MODEL".to_string())),
                ..OdOptionsItem::default()
            }],
        };
        assert_eq!(
            written(|emit| write_od_options(emit, &options)),
            "<OdOptions><OdOptionsItem><Global/><DefaultModel><Id>CAR_MODEL</Id></DefaultModel></OdOptionsItem></OdOptions>"
        );
    }

    #[test]
    fn test_write_cell_levels() {
        let od = Od {
            id: "OD1".to_string(),
            global_interpolation: Some(ExprValue::Value(Interpolation::Stepwise)),
            cells: vec![Cell {
                origin: "A".to_string(),
                destination: "B".to_string(),
                levels: vec![Level {
                    time: None,
                    value: ExprValue::Value(Frequency::new(1000.0, FrequencyUnit::PerHour)),
                }],
                ..Cell::default()
            }],
            ..Od::default()
        };
        assert_eq!(
            written(|emit| write_od(emit, &od)),
            r#"<Od Id="OD1"><GlobalInterpolation>STEPWISE</GlobalInterpolation><Cell Origin="A" Destination="B"><Level>1000 /h</Level></Cell></Od>"#
        );
    }
}
