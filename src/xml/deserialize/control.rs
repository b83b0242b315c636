//! Traffic light controllers.

use std::io::BufRead;

use crate::control::{
    ConsoleCoordinates, ConsoleMap, Control, ControlProgram, Cycle, Detector, DetectorPlacement,
    FixedTime, MultipleLaneDetector, SignalGroup, SignalGroupTrafficLight, SingleLaneDetector,
    TextBlock, TrafCod, TrafCodConsole, TrafCodProgram,
};
use crate::xml::deserialize::network::read_lane_link;
use crate::xml::deserialize::{
    DeserializeError, impl_from_xml, read_marker, read_once, required,
};
use crate::xml::quick::de::{ChildElement, XmlCursor};

pub(crate) fn read_control<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Control, DeserializeError> {
    let mut control = Control::default();
    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "FixedTime" => control
                .programs
                .push(ControlProgram::FixedTime(read_fixed_time(cursor, &child)?)),
            "TrafCod" => control
                .programs
                .push(ControlProgram::TrafCod(read_traf_cod(cursor, &child)?)),
            _ => cursor.unexpected(&child)?,
        }
    }
    Ok(control)
}

fn read_signal_group<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<SignalGroup, DeserializeError> {
    let mut group = SignalGroup {
        id: element.attrs.get_req_string("Id")?,
        traffic_lights: Vec::new(),
    };
    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "TrafficLight" => {
                group.traffic_lights.push(SignalGroupTrafficLight {
                    link: child.attrs.get_req_string("Link")?,
                    traffic_light_id: child.attrs.get_req_string("TrafficLightId")?,
                });
                read_marker(cursor, &child)?;
            }
            _ => cursor.unexpected(&child)?,
        }
    }
    Ok(group)
}

pub(crate) fn read_fixed_time<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<FixedTime, DeserializeError> {
    let mut program = FixedTime::new(
        element.attrs.get_req_string("Id")?,
        element.attrs.get_req_parsed("CycleTime")?,
    );
    program.offset = element.attrs.get_opt_parsed("Offset")?;

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "SignalGroup" => program.signal_groups.push(read_signal_group(cursor, &child)?),
            "Cycle" => {
                let a = &child.attrs;
                program.cycles.push(Cycle {
                    signal_group_id: a.get_req_string("SignalGroupId")?,
                    offset: a.get_req_parsed("Offset")?,
                    pre_green: a.get_opt_parsed("PreGreen")?,
                    green: a.get_req_parsed("Green")?,
                    yellow: a.get_req_parsed("Yellow")?,
                });
                read_marker(cursor, &child)?;
            }
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(program)
}

/// Read a text block, keeping its text exactly as written.
fn read_text_block<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<TextBlock, DeserializeError> {
    let space = element.attrs.get_opt_parsed("Space")?;
    let text = cursor.read_text(element)?;
    Ok(TextBlock { text, space })
}

pub(crate) fn read_traf_cod<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<TrafCod, DeserializeError> {
    let mut signal_groups = Vec::new();
    let mut detectors = Vec::new();
    let mut program = None;
    let mut console = None;

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "SignalGroup" => signal_groups.push(read_signal_group(cursor, &child)?),
            "Detector" => detectors.push(read_detector(cursor, &child)?),
            "Program" => program = Some(TrafCodProgram::Inline(read_text_block(cursor, &child)?)),
            "ProgramFile" => program = Some(TrafCodProgram::File(cursor.read_string(&child)?)),
            "Console" => console = Some(read_console(cursor, &child)?),
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(TrafCod {
        id: element.attrs.get_req_string("Id")?,
        signal_groups,
        detectors,
        program: required(cursor, program, "Program|ProgramFile")?,
        console: required(cursor, console, "Console")?,
    })
}

fn read_detector<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Detector, DeserializeError> {
    let mut placement = None;

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "MultipleLane" => {
                placement = Some(DetectorPlacement::MultipleLane(read_multiple_lane(
                    cursor, &child,
                )?))
            }
            "SingleLane" => {
                let mut link = None;
                let mut lane = None;
                let mut entry_position = None;
                let mut exit_position = None;
                while let Some(part) = cursor.next_child(&child)? {
                    match part.name.as_str() {
                        "Link" => read_once(cursor, &part, &mut link)?,
                        "Lane" => read_once(cursor, &part, &mut lane)?,
                        "EntryPosition" => read_once(cursor, &part, &mut entry_position)?,
                        "ExitPosition" => read_once(cursor, &part, &mut exit_position)?,
                        _ => cursor.unexpected(&part)?,
                    }
                }
                placement = Some(DetectorPlacement::SingleLane(SingleLaneDetector {
                    link: required(cursor, link, "Link")?,
                    lane: required(cursor, lane, "Lane")?,
                    entry_position: required(cursor, entry_position, "EntryPosition")?,
                    exit_position: required(cursor, exit_position, "ExitPosition")?,
                }));
            }
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(Detector {
        id: element.attrs.get_req_string("Id")?,
        detector_type: element.attrs.get_req_string("Type")?,
        placement: required(cursor, placement, "MultipleLane|SingleLane")?,
    })
}

fn read_multiple_lane<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<MultipleLaneDetector, DeserializeError> {
    let mut entry_link = None;
    let mut entry_lane = None;
    let mut entry_position = None;
    let mut intermediate_lanes = Vec::new();
    let mut exit_link = None;
    let mut exit_lane = None;
    let mut exit_position = None;

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "EntryLink" => read_once(cursor, &child, &mut entry_link)?,
            "EntryLane" => read_once(cursor, &child, &mut entry_lane)?,
            "EntryPosition" => read_once(cursor, &child, &mut entry_position)?,
            "IntermediateLanes" => {
                while let Some(lane) = cursor.next_child(&child)? {
                    match lane.name.as_str() {
                        "LaneLink" => intermediate_lanes.push(read_lane_link(cursor, &lane)?),
                        _ => cursor.unexpected(&lane)?,
                    }
                }
            }
            "ExitLink" => read_once(cursor, &child, &mut exit_link)?,
            "ExitLane" => read_once(cursor, &child, &mut exit_lane)?,
            "ExitPosition" => read_once(cursor, &child, &mut exit_position)?,
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(MultipleLaneDetector {
        entry_link: required(cursor, entry_link, "EntryLink")?,
        entry_lane: required(cursor, entry_lane, "EntryLane")?,
        entry_position: required(cursor, entry_position, "EntryPosition")?,
        intermediate_lanes,
        exit_link: required(cursor, exit_link, "ExitLink")?,
        exit_lane: required(cursor, exit_lane, "ExitLane")?,
        exit_position: required(cursor, exit_position, "ExitPosition")?,
    })
}

fn read_console<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<TrafCodConsole, DeserializeError> {
    let mut map = None;
    let mut coordinates = None;

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "Map" => {
                let graphics_type = child.attrs.get_opt_parsed("Type")?;
                let encoding = child.attrs.get_opt_parsed("Encoding")?;
                let data = read_text_block(cursor, &child)?;
                map = Some(ConsoleMap::Inline {
                    graphics_type,
                    encoding,
                    data,
                });
            }
            "MapFile" => map = Some(ConsoleMap::File(cursor.read_string(&child)?)),
            "Coordinates" => {
                coordinates = Some(ConsoleCoordinates::Inline(read_text_block(cursor, &child)?))
            }
            "CoordinatesFile" => {
                coordinates = Some(ConsoleCoordinates::File(cursor.read_string(&child)?))
            }
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(TrafCodConsole {
        map: required(cursor, map, "Map|MapFile")?,
        coordinates: required(cursor, coordinates, "Coordinates|CoordinatesFile")?,
    })
}

impl_from_xml! {
    Control => "Control", read_control;
    FixedTime => "FixedTime", read_fixed_time;
    TrafCod => "TrafCod", read_traf_cod;
}
