use std::io::Write;

use crate::control::{
    ConsoleCoordinates, ConsoleMap, Control, ControlProgram, Detector, DetectorPlacement,
    FixedTime, SignalGroup, TextBlock, TrafCod, TrafCodProgram,
};
use crate::xml::quick::ser::{AttrList, XmlEmitter};
use crate::xml::serialize::network::write_lane_link;
use crate::xml::serialize::{SerializeError, impl_to_xml};

pub(crate) fn write_control<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    control: &Control,
) -> Result<(), SerializeError> {
    emit.elem_or_empty("Control", &AttrList::new(), !control.programs.is_empty(), |emit| {
        for program in &control.programs {
            match program {
                ControlProgram::FixedTime(program) => write_fixed_time(emit, program)?,
                ControlProgram::TrafCod(program) => write_traf_cod(emit, program)?,
            }
        }
        Ok(())
    })
}

fn write_signal_group<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    group: &SignalGroup,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs.add("Id", &group.id);
    emit.elem_or_empty("SignalGroup", &attrs, !group.traffic_lights.is_empty(), |emit| {
        for light in &group.traffic_lights {
            let mut attrs = AttrList::new();
            attrs
                .add("Link", &light.link)
                .add("TrafficLightId", &light.traffic_light_id);
            emit.empty_elem_with_attrs("TrafficLight", &attrs)?;
        }
        Ok(())
    })
}

pub(crate) fn write_fixed_time<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    program: &FixedTime,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs
        .add("Id", &program.id)
        .add_value("CycleTime", &program.cycle_time)
        .add_opt_value("Offset", program.offset.as_ref());

    let has_children = !program.signal_groups.is_empty() || !program.cycles.is_empty();
    emit.elem_or_empty("FixedTime", &attrs, has_children, |emit| {
        for group in &program.signal_groups {
            write_signal_group(emit, group)?;
        }
        for cycle in &program.cycles {
            let mut attrs = AttrList::new();
            attrs
                .add("SignalGroupId", &cycle.signal_group_id)
                .add_value("Offset", &cycle.offset)
                .add_opt_value("PreGreen", cycle.pre_green.as_ref())
                .add_value("Green", &cycle.green)
                .add_value("Yellow", &cycle.yellow);
            emit.empty_elem_with_attrs("Cycle", &attrs)?;
        }
        Ok(())
    })
}

/// Write a text block with its text unchanged, after any attributes in `attrs`.
fn write_text_block<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    name: &str,
    mut attrs: AttrList,
    block: &TextBlock,
) -> Result<(), SerializeError> {
    attrs.add_opt_value("Space", block.space.as_ref());
    emit.text_elem_with_attrs(name, &attrs, &block.text)
}

pub(crate) fn write_traf_cod<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    program: &TrafCod,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs.add("Id", &program.id);

    emit.elem("TrafCod", &attrs, |emit| {
        for group in &program.signal_groups {
            write_signal_group(emit, group)?;
        }
        for detector in &program.detectors {
            write_detector(emit, detector)?;
        }
        match &program.program {
            TrafCodProgram::Inline(block) => {
                write_text_block(emit, "Program", AttrList::new(), block)?
            }
            TrafCodProgram::File(uri) => emit.text_elem("ProgramFile", uri)?,
        }

        emit.elem("Console", &AttrList::new(), |emit| {
            match &program.console.map {
                ConsoleMap::Inline {
                    graphics_type,
                    encoding,
                    data,
                } => {
                    let mut attrs = AttrList::new();
                    attrs
                        .add_opt_value("Type", graphics_type.as_ref())
                        .add_opt_value("Encoding", encoding.as_ref());
                    write_text_block(emit, "Map", attrs, data)?;
                }
                ConsoleMap::File(uri) => emit.text_elem("MapFile", uri)?,
            }
            match &program.console.coordinates {
                ConsoleCoordinates::Inline(block) => {
                    write_text_block(emit, "Coordinates", AttrList::new(), block)
                }
                ConsoleCoordinates::File(uri) => emit.text_elem("CoordinatesFile", uri),
            }
        })
    })
}

fn write_detector<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    detector: &Detector,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs
        .add("Id", &detector.id)
        .add("Type", &detector.detector_type);

    emit.elem("Detector", &attrs, |emit| match &detector.placement {
        DetectorPlacement::MultipleLane(placement) => {
            emit.elem("MultipleLane", &AttrList::new(), |emit| {
                emit.text_elem("EntryLink", &placement.entry_link)?;
                emit.text_elem("EntryLane", &placement.entry_lane)?;
                emit.value_elem("EntryPosition", &placement.entry_position)?;
                if !placement.intermediate_lanes.is_empty() {
                    emit.elem("IntermediateLanes", &AttrList::new(), |emit| {
                        for lane in &placement.intermediate_lanes {
                            write_lane_link(emit, "LaneLink", lane)?;
                        }
                        Ok(())
                    })?;
                }
                emit.text_elem("ExitLink", &placement.exit_link)?;
                emit.text_elem("ExitLane", &placement.exit_lane)?;
                emit.value_elem("ExitPosition", &placement.exit_position)
            })
        }
        DetectorPlacement::SingleLane(placement) => {
            emit.elem("SingleLane", &AttrList::new(), |emit| {
                emit.text_elem("Link", &placement.link)?;
                emit.text_elem("Lane", &placement.lane)?;
                emit.value_elem("EntryPosition", &placement.entry_position)?;
                emit.value_elem("ExitPosition", &placement.exit_position)
            })
        }
    })
}

impl_to_xml! {
    Control => "Control", write_control;
    FixedTime => "FixedTime", write_fixed_time;
    TrafCod => "TrafCod", write_traf_cod;
}
