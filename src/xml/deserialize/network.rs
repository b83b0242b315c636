//! Network elements: nodes, links, geometry and cross sections.

use std::io::BufRead;

use crate::network::{
    Arc, Bezier, Clothoid, ClothoidShape, Conflicts, CrossSectionElement, CseLane,
    CseNoTrafficLane, CseShoulder, CseStripe, DashOffset, DashSegment, ElementWidth, Flattener,
    LaneLink, LaneOverride, LanePosition, LateralOffset, Link, LinkGeometry, LinkLayout, Network,
    Node, Polyline, RoadLayout, SpeedLimit, StripeCompatibility, StripeData, StripeElement,
    StripeElements, StripeKind, StripeLine, StripeOverride, TrafficLight, TrafficLightSensor,
};
use crate::values::{LengthType, PositiveLengthType};
use crate::xml::deserialize::{
    DeserializeError, finish, impl_from_xml, read_choice, read_marker, read_once, required,
};
use crate::xml::quick::de::{Attrs, ChildElement, XmlCursor};

pub(crate) fn read_network<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Network, DeserializeError> {
    let mut network = Network::default();

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "Flattener" => network.flattener = Some(read_flattener(cursor, &child)?),
            "Conflicts" => network.conflicts = Some(read_conflicts(cursor, &child)?),
            "Node" => network.nodes.push(read_node(cursor, &child)?),
            "Link" => network.links.push(read_link(cursor, &child)?),
            _ => cursor.unexpected(&child)?,
        }
    }

    log::debug!(
        "read network with {} nodes and {} links",
        network.nodes.len(),
        network.links.len()
    );
    Ok(network)
}

pub(crate) fn read_node<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Node, DeserializeError> {
    let a = &element.attrs;
    let node = Node {
        id: a.get_req_string("Id")?,
        coordinate: a.get_req_parsed("Coordinate")?,
        direction: a.get_opt_parsed("Direction")?,
    };
    read_marker(cursor, element)?;
    Ok(node)
}

pub(crate) fn read_flattener<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Flattener, DeserializeError> {
    let mut num_segments = None;
    let mut max_deviation = None;
    let mut max_angle = None;

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "NumSegments" => read_once(cursor, &child, &mut num_segments)?,
            "MaxDeviation" => read_once(cursor, &child, &mut max_deviation)?,
            "MaxAngle" => read_once(cursor, &child, &mut max_angle)?,
            _ => cursor.unexpected(&child)?,
        }
    }

    match num_segments {
        Some(_) if max_deviation.is_some() || max_angle.is_some() => Err(cursor.error(
            "Flattener takes either NumSegments or MaxDeviation/MaxAngle, not both",
        )),
        Some(n) => Ok(Flattener::NumSegments(n)),
        None => Ok(Flattener::DeviationAndAngle {
            max_deviation,
            max_angle,
        }),
    }
}

fn read_conflicts<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Conflicts, DeserializeError> {
    let choice = read_choice(
        cursor,
        element,
        &["None", "DefaultWidth", "FixedWidth", "RelativeWidth"],
    )?;
    let conflicts = match choice.name.as_str() {
        "None" => {
            cursor.skip(&choice)?;
            Conflicts::None
        }
        "DefaultWidth" => {
            cursor.skip(&choice)?;
            Conflicts::DefaultWidth
        }
        "FixedWidth" => Conflicts::FixedWidth(cursor.read_parsed(&choice)?),
        _ => Conflicts::RelativeWidth(cursor.read_parsed(&choice)?),
    };
    finish(cursor, element)?;
    Ok(conflicts)
}

pub(crate) fn read_link<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Link, DeserializeError> {
    let a = &element.attrs;
    let mut link = Link {
        id: a.get_req_string("Id")?,
        link_type: a.get_req_string("Type")?,
        node_start: a.get_req_string("NodeStart")?,
        node_end: a.get_req_string("NodeEnd")?,
        offset_start: a.get_opt_parsed("OffsetStart")?,
        offset_end: a.get_opt_parsed("OffsetEnd")?,
        lane_keeping: a.get_opt_parsed("LaneKeeping")?,
        priority: a.get_opt_parsed("Priority")?,
        conflict_id: a.get_opt_string("ConflictId"),
        ..Link::default()
    };

    let mut geometry = None;
    let mut layout = None;
    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "Straight" | "Bezier" | "Clothoid" | "Arc" | "Polyline" => {
                if geometry.is_some() {
                    return Err(cursor.error(format!("duplicate link geometry <{}>", child.name)));
                }
                geometry = Some(read_link_geometry(cursor, &child)?);
            }
            "RoadLayout" | "DefinedLayout" => {
                if layout.is_some() {
                    return Err(cursor.error(format!("duplicate link layout <{}>", child.name)));
                }
                layout = Some(match child.name.as_str() {
                    "RoadLayout" => LinkLayout::Custom(read_road_layout(cursor, &child)?),
                    _ => LinkLayout::defined(cursor.read_string(&child)?),
                });
            }
            "LaneOverride" => {
                let lane_override = read_lane_override(cursor, &child)?;
                match &mut layout {
                    Some(LinkLayout::Defined { lane_overrides, .. }) => {
                        lane_overrides.push(lane_override)
                    }
                    _ => return Err(cursor.error("LaneOverride must follow a DefinedLayout")),
                }
            }
            "StripeOverride" => {
                let stripe_override = read_stripe_override(cursor, &child)?;
                match &mut layout {
                    Some(LinkLayout::Defined {
                        stripe_overrides, ..
                    }) => stripe_overrides.push(stripe_override),
                    _ => return Err(cursor.error("StripeOverride must follow a DefinedLayout")),
                }
            }
            "TrafficLight" => link.traffic_lights.push(read_traffic_light(cursor, &child)?),
            "TrafficLightSensor" => {
                let a = &child.attrs;
                let sensor = TrafficLightSensor {
                    id: a.get_req_string("Id")?,
                    sensor_type: a.get_req_string("Type")?,
                    lane: a.get_req_string("Lane")?,
                    entry_position: a.get_req_parsed("EntryPosition")?,
                    exit_position: a.get_req_parsed("ExitPosition")?,
                };
                read_marker(cursor, &child)?;
                link.traffic_light_sensors.push(sensor);
            }
            _ => cursor.unexpected(&child)?,
        }
    }
    link.geometry = required(cursor, geometry, "Straight|Bezier|Clothoid|Arc|Polyline")?;
    link.layout = required(cursor, layout, "RoadLayout|DefinedLayout")?;

    log::trace!("read link '{}' ({})", link.id, link.geometry.kind());
    Ok(link)
}

fn read_link_geometry<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<LinkGeometry, DeserializeError> {
    Ok(match element.name.as_str() {
        "Straight" => {
            cursor.skip(element)?;
            LinkGeometry::Straight
        }
        "Bezier" => LinkGeometry::Bezier(read_bezier(cursor, element)?),
        "Clothoid" => LinkGeometry::Clothoid(read_clothoid(cursor, element)?),
        "Arc" => LinkGeometry::Arc(read_arc(cursor, element)?),
        _ => LinkGeometry::Polyline(read_polyline(cursor, element)?),
    })
}

fn read_bezier<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Bezier, DeserializeError> {
    let mut bezier = Bezier {
        flattener: None,
        shape: element.attrs.get_opt_parsed("Shape")?,
        weighted: element.attrs.get_opt_parsed("Weighted")?,
    };
    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "Flattener" => bezier.flattener = Some(read_flattener(cursor, &child)?),
            _ => cursor.unexpected(&child)?,
        }
    }
    Ok(bezier)
}

fn read_clothoid<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Clothoid, DeserializeError> {
    let mut interpolated = false;
    let mut length: Option<LengthType> = None;
    let mut a: Option<LengthType> = None;
    let mut start_curvature = None;
    let mut end_curvature = None;
    let mut flattener = None;

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "Interpolated" => {
                cursor.skip(&child)?;
                interpolated = true;
            }
            "Length" => read_once(cursor, &child, &mut length)?,
            "A" => read_once(cursor, &child, &mut a)?,
            "StartCurvature" => read_once(cursor, &child, &mut start_curvature)?,
            "EndCurvature" => read_once(cursor, &child, &mut end_curvature)?,
            "Flattener" => flattener = Some(read_flattener(cursor, &child)?),
            _ => cursor.unexpected(&child)?,
        }
    }

    let shape = match (length, a) {
        (Some(_), Some(_)) => {
            return Err(cursor.error("Clothoid takes either Length or A, not both"));
        }
        (Some(length), None) => ClothoidShape::Length {
            length,
            start_curvature: required(cursor, start_curvature, "StartCurvature")?,
            end_curvature: required(cursor, end_curvature, "EndCurvature")?,
        },
        (None, Some(a)) => ClothoidShape::A {
            a,
            start_curvature: required(cursor, start_curvature, "StartCurvature")?,
            end_curvature: required(cursor, end_curvature, "EndCurvature")?,
        },
        (None, None) => {
            if !interpolated {
                log::warn!(
                    "clothoid without Interpolated, Length or A at {}; assuming Interpolated",
                    cursor.path_str()
                );
            }
            ClothoidShape::Interpolated
        }
    };

    Ok(Clothoid {
        shape,
        flattener,
        end_elevation: element.attrs.get_opt_parsed("EndElevation")?,
    })
}

fn read_arc<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Arc, DeserializeError> {
    let mut arc = Arc {
        flattener: None,
        radius: element.attrs.get_req_parsed("Radius")?,
        direction: element.attrs.get_req_parsed("Direction")?,
    };
    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "Flattener" => arc.flattener = Some(read_flattener(cursor, &child)?),
            _ => cursor.unexpected(&child)?,
        }
    }
    Ok(arc)
}

fn read_polyline<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Polyline, DeserializeError> {
    let mut polyline = Polyline::default();
    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "Coordinate" => polyline.coordinates.push(cursor.read_parsed(&child)?),
            _ => cursor.unexpected(&child)?,
        }
    }
    Ok(polyline)
}

pub(crate) fn read_speed_limit<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<SpeedLimit, DeserializeError> {
    let limit = SpeedLimit {
        gtu_type: element.attrs.get_req_string("GtuType")?,
        legal_speed_limit: element.attrs.get_req_parsed("LegalSpeedLimit")?,
    };
    read_marker(cursor, element)?;
    Ok(limit)
}

/// Read the content of a road layout, on a link or in the definitions.
pub(crate) fn read_road_layout<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<RoadLayout, DeserializeError> {
    let mut layout = RoadLayout::default();

    while let Some(child) = cursor.next_child(element)? {
        let cse = match child.name.as_str() {
            "SpeedLimit" => {
                layout.speed_limits.push(read_speed_limit(cursor, &child)?);
                continue;
            }
            "Stripe" => CrossSectionElement::Stripe(read_stripe(cursor, &child)?),
            "Lane" => {
                let mut geometry = CseGeometry::default();
                let mut speed_limits = Vec::new();
                while let Some(part) = cursor.next_child(&child)? {
                    if part.name == "SpeedLimit" {
                        speed_limits.push(read_speed_limit(cursor, &part)?);
                    } else if !geometry.read(cursor, &part)? {
                        cursor.unexpected(&part)?;
                    }
                }
                CrossSectionElement::Lane(CseLane {
                    id: child.attrs.get_req_string("Id")?,
                    lane_type: child.attrs.get_req_string("LaneType")?,
                    offset: geometry.offset(cursor)?,
                    width: geometry.width(cursor)?,
                    speed_limits,
                })
            }
            "Shoulder" => {
                let geometry = CseGeometry::read_all(cursor, &child)?;
                CrossSectionElement::Shoulder(CseShoulder {
                    id: child.attrs.get_opt_string("Id"),
                    lane_type: child.attrs.get_opt_string("LaneType"),
                    offset: geometry.offset(cursor)?,
                    width: geometry.width(cursor)?,
                })
            }
            "NoTrafficLane" => {
                let geometry = CseGeometry::read_all(cursor, &child)?;
                CrossSectionElement::NoTrafficLane(CseNoTrafficLane {
                    id: child.attrs.get_opt_string("Id"),
                    offset: geometry.offset(cursor)?,
                    width: geometry.width(cursor)?,
                })
            }
            _ => {
                cursor.unexpected(&child)?;
                continue;
            }
        };
        layout.elements.push(cse);
    }

    Ok(layout)
}

/// Offset and width children shared by all cross-section elements.
#[derive(Default)]
struct CseGeometry {
    center: Option<LengthType>,
    left: Option<LengthType>,
    right: Option<LengthType>,
    center_start: Option<LengthType>,
    center_end: Option<LengthType>,
    left_start: Option<LengthType>,
    left_end: Option<LengthType>,
    right_start: Option<LengthType>,
    right_end: Option<LengthType>,
    width: Option<PositiveLengthType>,
    width_start: Option<PositiveLengthType>,
    width_end: Option<PositiveLengthType>,
}

impl CseGeometry {
    fn read_all<R: BufRead>(
        cursor: &mut XmlCursor<'_, R>,
        element: &ChildElement,
    ) -> Result<Self, DeserializeError> {
        let mut geometry = Self::default();
        while let Some(child) = cursor.next_child(element)? {
            if !geometry.read(cursor, &child)? {
                cursor.unexpected(&child)?;
            }
        }
        Ok(geometry)
    }

    /// Read `child` if it is an offset or width element.
    fn read<R: BufRead>(
        &mut self,
        cursor: &mut XmlCursor<'_, R>,
        child: &ChildElement,
    ) -> Result<bool, DeserializeError> {
        match child.name.as_str() {
            "CenterOffset" => read_once(cursor, child, &mut self.center)?,
            "LeftOffset" => read_once(cursor, child, &mut self.left)?,
            "RightOffset" => read_once(cursor, child, &mut self.right)?,
            "CenterOffsetStart" => read_once(cursor, child, &mut self.center_start)?,
            "CenterOffsetEnd" => read_once(cursor, child, &mut self.center_end)?,
            "LeftOffsetStart" => read_once(cursor, child, &mut self.left_start)?,
            "LeftOffsetEnd" => read_once(cursor, child, &mut self.left_end)?,
            "RightOffsetStart" => read_once(cursor, child, &mut self.right_start)?,
            "RightOffsetEnd" => read_once(cursor, child, &mut self.right_end)?,
            "Width" => read_once(cursor, child, &mut self.width)?,
            "WidthStart" => read_once(cursor, child, &mut self.width_start)?,
            "WidthEnd" => read_once(cursor, child, &mut self.width_end)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn offset<R: BufRead>(
        &self,
        cursor: &XmlCursor<'_, R>,
    ) -> Result<Option<LateralOffset>, DeserializeError> {
        let start_end = |start: &Option<LengthType>, end: &Option<LengthType>, name: &str| {
            match (start, end) {
                (Some(start), Some(end)) => Ok(Some((start.clone(), end.clone()))),
                (None, None) => Ok(None),
                _ => Err(cursor.error(format!("{name}OffsetStart and {name}OffsetEnd go together"))),
            }
        };

        let mut offsets = Vec::new();
        if let Some(offset) = &self.center {
            offsets.push(LateralOffset::Center(offset.clone()));
        }
        if let Some(offset) = &self.left {
            offsets.push(LateralOffset::Left(offset.clone()));
        }
        if let Some(offset) = &self.right {
            offsets.push(LateralOffset::Right(offset.clone()));
        }
        if let Some((start, end)) = start_end(&self.center_start, &self.center_end, "Center")? {
            offsets.push(LateralOffset::CenterStartEnd { start, end });
        }
        if let Some((start, end)) = start_end(&self.left_start, &self.left_end, "Left")? {
            offsets.push(LateralOffset::LeftStartEnd { start, end });
        }
        if let Some((start, end)) = start_end(&self.right_start, &self.right_end, "Right")? {
            offsets.push(LateralOffset::RightStartEnd { start, end });
        }

        if offsets.len() > 1 {
            return Err(cursor.error("cross-section element has more than one offset"));
        }
        Ok(offsets.pop())
    }

    fn width<R: BufRead>(&self, cursor: &XmlCursor<'_, R>) -> Result<ElementWidth, DeserializeError> {
        match (&self.width, &self.width_start, &self.width_end) {
            (Some(width), None, None) => Ok(ElementWidth::Constant(width.clone())),
            (None, Some(start), Some(end)) => Ok(ElementWidth::StartEnd {
                start: start.clone(),
                end: end.clone(),
            }),
            (None, None, None) => Err(cursor.missing_field("Width")),
            _ => Err(cursor.error("cross-section element takes Width or WidthStart and WidthEnd")),
        }
    }
}

fn read_stripe<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<CseStripe, DeserializeError> {
    let mut geometry = CseGeometry::default();
    let mut defined = None;
    let mut data = stripe_data_attrs(&element.attrs)?;

    while let Some(child) = cursor.next_child(element)? {
        if child.name == "DefinedStripe" {
            defined = Some(cursor.read_string(&child)?);
        } else if !read_stripe_data_child(cursor, &child, &mut data)? && !geometry.read(cursor, &child)? {
            cursor.unexpected(&child)?;
        }
    }

    let stripe = match defined {
        Some(id) => {
            if data != StripeData::default() {
                log::warn!(
                    "ignoring stripe properties on defined stripe '{}' at {}",
                    id,
                    cursor.path_str()
                );
            }
            StripeKind::Defined(id)
        }
        None => StripeKind::Custom(data),
    };

    Ok(CseStripe {
        id: element.attrs.get_opt_string("Id"),
        offset: geometry.offset(cursor)?,
        stripe,
    })
}

/// The attribute half of stripe properties.
pub(crate) fn stripe_data_attrs(a: &Attrs) -> Result<StripeData, DeserializeError> {
    Ok(StripeData {
        left_change_lane: a.get_opt_parsed("LeftChangeLane")?,
        right_change_lane: a.get_opt_parsed("RightChangeLane")?,
        lateral_sync: a.get_opt_parsed("LateralSync")?,
        ..StripeData::default()
    })
}

/// Read `child` into `data` if it is one of the stripe property elements.
pub(crate) fn read_stripe_data_child<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    child: &ChildElement,
    data: &mut StripeData,
) -> Result<bool, DeserializeError> {
    match child.name.as_str() {
        "Elements" => data.elements = Some(read_stripe_elements(cursor, child)?),
        "DashOffset" => data.dash_offset = Some(read_dash_offset(cursor, child)?),
        "Compatibility" => {
            data.compatibilities.push(StripeCompatibility {
                gtu_type: child.attrs.get_req_string("GtuType")?,
                direction: child.attrs.get_req_parsed("Direction")?,
            });
            read_marker(cursor, child)?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn read_stripe_elements<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<StripeElements, DeserializeError> {
    let mut elements = StripeElements::default();

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "Line" => {
                let mut line = StripeLine {
                    width: child.attrs.get_req_parsed("Width")?,
                    color: child.attrs.get_req_parsed("Color")?,
                    dashes: Vec::new(),
                };
                while let Some(kind) = cursor.next_child(&child)? {
                    match kind.name.as_str() {
                        "Continuous" => cursor.skip(&kind)?,
                        "Dashed" => {
                            while let Some(dash) = cursor.next_child(&kind)? {
                                match dash.name.as_str() {
                                    "Gap" => line.dashes.push(DashSegment::Gap(cursor.read_parsed(&dash)?)),
                                    "Dash" => line.dashes.push(DashSegment::Dash(cursor.read_parsed(&dash)?)),
                                    _ => cursor.unexpected(&dash)?,
                                }
                            }
                        }
                        _ => cursor.unexpected(&kind)?,
                    }
                }
                elements.elements.push(StripeElement::Line(line));
            }
            "Gap" => {
                let width = child.attrs.get_req_parsed("Width")?;
                read_marker(cursor, &child)?;
                elements.elements.push(StripeElement::Gap { width });
            }
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(elements)
}

fn read_dash_offset<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<DashOffset, DeserializeError> {
    let choice = read_choice(cursor, element, &["Fixed", "SyncUpstream", "SyncDownstream"])?;
    let offset = match choice.name.as_str() {
        "Fixed" => DashOffset::Fixed {
            offset: choice.attrs.get_req_parsed("Offset")?,
        },
        "SyncUpstream" => DashOffset::SyncUpstream,
        _ => DashOffset::SyncDownstream,
    };
    read_marker(cursor, &choice)?;
    finish(cursor, element)?;
    Ok(offset)
}

fn read_lane_override<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<LaneOverride, DeserializeError> {
    let mut lane_override = LaneOverride {
        lane: element.attrs.get_req_string("Lane")?,
        speed_limits: Vec::new(),
    };
    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "SpeedLimit" => lane_override.speed_limits.push(read_speed_limit(cursor, &child)?),
            _ => cursor.unexpected(&child)?,
        }
    }
    Ok(lane_override)
}

fn read_stripe_override<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<StripeOverride, DeserializeError> {
    let mut data = stripe_data_attrs(&element.attrs)?;
    while let Some(child) = cursor.next_child(element)? {
        if !read_stripe_data_child(cursor, &child, &mut data)? {
            cursor.unexpected(&child)?;
        }
    }
    Ok(StripeOverride {
        stripe: element.attrs.get_req_string("Stripe")?,
        data,
    })
}

fn read_traffic_light<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<TrafficLight, DeserializeError> {
    let a = &element.attrs;
    let mut light = TrafficLight {
        id: a.get_req_string("Id")?,
        lane: a.get_req_string("Lane")?,
        position: a.get_req_parsed("Position")?,
        turn_on_red: Vec::new(),
    };
    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "TurnOnRed" => light.turn_on_red.push(cursor.read_string(&child)?),
            _ => cursor.unexpected(&child)?,
        }
    }
    Ok(light)
}

/// Read a `Link`/`Lane` attribute pair from an element such as `<Lane Link=".." Lane=".."/>`.
pub(crate) fn read_lane_link<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<LaneLink, DeserializeError> {
    let lane = LaneLink {
        link: element.attrs.get_req_string("Link")?,
        lane: element.attrs.get_req_string("Lane")?,
    };
    read_marker(cursor, element)?;
    Ok(lane)
}

pub(crate) fn read_lane_position<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<LanePosition, DeserializeError> {
    let position = LanePosition {
        link: element.attrs.get_req_string("Link")?,
        lane: element.attrs.get_req_string("Lane")?,
        position: element.attrs.get_req_parsed("Position")?,
    };
    read_marker(cursor, element)?;
    Ok(position)
}

impl_from_xml! {
    Network => "Network", read_network;
    Node => "Node", read_node;
    Link => "Link", read_link;
    Flattener => "Flattener", read_flattener;
    RoadLayout => "RoadLayout", read_road_layout;
    TrafficLight => "TrafficLight", read_traffic_light;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::with_cursor;
    use crate::values::{ExprValue, LengthBeginEnd, LengthUnit};

    #[test]
    fn test_link_with_defined_layout() {
        let link = with_cursor(
            r#"<Link Id="AB" Type="FREEWAY" NodeStart="A" NodeEnd="B">
                <Straight/>
                <DefinedLayout>HIGHWAY</DefinedLayout>
                <LaneOverride Lane="L1"><SpeedLimit GtuType="CAR" LegalSpeedLimit="80 km/h"/></LaneOverride>
                <StripeOverride Stripe="S1" LeftChangeLane="false"/>
            </Link>"#,
            read_link,
        )
        .unwrap();

        match &link.layout {
            LinkLayout::Defined {
                layout,
                lane_overrides,
                stripe_overrides,
            } => {
                assert_eq!(layout, "HIGHWAY");
                assert_eq!(lane_overrides[0].speed_limits.len(), 1);
                assert_eq!(
                    stripe_overrides[0].data.left_change_lane,
                    Some(ExprValue::Value(false))
                );
            }
            other => panic!("expected defined layout, got {:?}", other),
        }
    }

    #[test]
    fn test_lane_override_without_defined_layout() {
        let err = with_cursor(
            r#"<Link Id="AB" Type="FREEWAY" NodeStart="A" NodeEnd="B"><LaneOverride Lane="L1"/></Link>"#,
            read_link,
        )
        .unwrap_err();
        assert!(err.to_string().contains("LaneOverride must follow a DefinedLayout"));
    }

    #[test]
    fn test_cross_section_offsets() {
        let layout = with_cursor(
            r#"<RoadLayout>
                <Stripe><DefinedStripe>SOLID</DefinedStripe><CenterOffset>3.5 m</CenterOffset></Stripe>
                <Lane Id="L1" LaneType="FREEWAY"><CenterOffset>1.75 m</CenterOffset><Width>3.5 m</Width></Lane>
                <Shoulder><LeftOffsetStart>0 m</LeftOffsetStart><LeftOffsetEnd>1 m</LeftOffsetEnd><WidthStart>2 m</WidthStart><WidthEnd>3 m</WidthEnd></Shoulder>
            </RoadLayout>"#,
            read_road_layout,
        )
        .unwrap();

        assert_eq!(layout.elements.len(), 3);
        match &layout.elements[1] {
            CrossSectionElement::Lane(lane) => {
                assert_eq!(
                    lane.offset,
                    Some(LateralOffset::Center(ExprValue::Value(
                        crate::values::Length::new(1.75, LengthUnit::Meter)
                    )))
                );
            }
            other => panic!("expected lane, got {:?}", other),
        }
        match &layout.elements[2] {
            CrossSectionElement::Shoulder(shoulder) => {
                assert!(matches!(shoulder.offset, Some(LateralOffset::LeftStartEnd { .. })));
                assert!(matches!(shoulder.width, ElementWidth::StartEnd { .. }));
            }
            other => panic!("expected shoulder, got {:?}", other),
        }
    }

    #[test]
    fn test_lane_without_width() {
        let err = with_cursor(
            r#"<RoadLayout><Lane Id="L1" LaneType="FREEWAY"/></RoadLayout>"#,
            read_road_layout,
        )
        .unwrap_err();
        assert!(matches!(err, DeserializeError::MissingField(field) if field.ends_with("Width")));
    }

    #[test]
    fn test_dashed_line() {
        let layout = with_cursor(
            r##"<RoadLayout><Stripe>
                <Elements>
                    <Line Width="0.2 m" Color="WHITE"><Dashed><Gap>9 m</Gap><Dash>3 m</Dash></Dashed></Line>
                    <Gap Width="0.1 m"/>
                    <Line Width="0.2 m" Color="#FFFF00"><Continuous/></Line>
                </Elements>
                <DashOffset><SyncUpstream/></DashOffset>
                <Compatibility GtuType="CAR" Direction="LEFT"/>
            </Stripe></RoadLayout>"##,
            read_road_layout,
        )
        .unwrap();

        let stripe = layout.stripes().next().unwrap();
        let StripeKind::Custom(data) = &stripe.stripe else {
            panic!("expected custom stripe");
        };
        let elements = &data.elements.as_ref().unwrap().elements;
        assert_eq!(elements.len(), 3);
        match &elements[0] {
            StripeElement::Line(line) => assert_eq!(line.dashes.len(), 2),
            other => panic!("expected line, got {:?}", other),
        }
        assert_eq!(data.dash_offset, Some(DashOffset::SyncUpstream));
        assert_eq!(data.compatibilities.len(), 1);
    }

    #[test]
    fn test_traffic_light() {
        let light = with_cursor(
            r#"<TrafficLight Id="TL1" Lane="L1" Position="END-10 m"><TurnOnRed>N1</TurnOnRed></TrafficLight>"#,
            read_traffic_light,
        )
        .unwrap();
        assert_eq!(
            light.position,
            ExprValue::Value(LengthBeginEnd::BeforeEnd(crate::values::Length::new(
                10.0,
                LengthUnit::Meter
            )))
        );
        assert_eq!(light.turn_on_red, ["N1"]);
    }

    #[test]
    fn test_flattener_variants() {
        let flattener = with_cursor(
            r#"<Flattener><NumSegments>64</NumSegments></Flattener>"#,
            read_flattener,
        )
        .unwrap();
        assert!(matches!(flattener, Flattener::NumSegments(_)));

        let flattener = with_cursor(
            r#"<Flattener><MaxAngle>1 deg</MaxAngle></Flattener>"#,
            read_flattener,
        )
        .unwrap();
        assert!(matches!(
            flattener,
            Flattener::DeviationAndAngle {
                max_deviation: None,
                max_angle: Some(_)
            }
        ));
    }
}
