use std::io::Write;

use crate::network::{
    ClothoidShape, Conflicts, CrossSectionElement, CseStripe, DashOffset, DashSegment,
    ElementWidth, Flattener, LaneLink, LanePosition, LateralOffset, Link, LinkGeometry, LinkLayout,
    Network, Node, RoadLayout, SpeedLimit, StripeData, StripeElement, StripeKind, TrafficLight,
};
use crate::xml::quick::ser::{AttrList, XmlEmitter};
use crate::xml::serialize::{SerializeError, impl_to_xml};

pub(crate) fn write_network<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    network: &Network,
) -> Result<(), SerializeError> {
    emit.elem("Network", &AttrList::new(), |emit| {
        if let Some(flattener) = &network.flattener {
            write_flattener(emit, flattener)?;
        }
        if let Some(conflicts) = &network.conflicts {
            emit.elem("Conflicts", &AttrList::new(), |emit| match conflicts {
                Conflicts::None => emit.empty_elem("None"),
                Conflicts::DefaultWidth => emit.empty_elem("DefaultWidth"),
                Conflicts::FixedWidth(width) => emit.value_elem("FixedWidth", width),
                Conflicts::RelativeWidth(width) => emit.value_elem("RelativeWidth", width),
            })?;
        }
        for node in &network.nodes {
            write_node(emit, node)?;
        }
        for link in &network.links {
            write_link(emit, link)?;
        }
        Ok(())
    })
}

pub(crate) fn write_node<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    node: &Node,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs
        .add("Id", &node.id)
        .add_value("Coordinate", &node.coordinate)
        .add_opt_value("Direction", node.direction.as_ref());
    emit.empty_elem_with_attrs("Node", &attrs)
}

pub(crate) fn write_flattener<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    flattener: &Flattener,
) -> Result<(), SerializeError> {
    match flattener {
        Flattener::NumSegments(n) => emit.elem("Flattener", &AttrList::new(), |emit| {
            emit.value_elem("NumSegments", n)
        }),
        Flattener::DeviationAndAngle {
            max_deviation,
            max_angle,
        } => emit.elem_or_empty(
            "Flattener",
            &AttrList::new(),
            max_deviation.is_some() || max_angle.is_some(),
            |emit| {
                emit.opt_value_elem("MaxDeviation", max_deviation.as_ref())?;
                emit.opt_value_elem("MaxAngle", max_angle.as_ref())
            },
        ),
    }
}

pub(crate) fn write_link<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    link: &Link,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs
        .add("Id", &link.id)
        .add("Type", &link.link_type)
        .add("NodeStart", &link.node_start)
        .add("NodeEnd", &link.node_end)
        .add_opt_value("OffsetStart", link.offset_start.as_ref())
        .add_opt_value("OffsetEnd", link.offset_end.as_ref())
        .add_opt_value("LaneKeeping", link.lane_keeping.as_ref())
        .add_opt_value("Priority", link.priority.as_ref())
        .add_opt("ConflictId", link.conflict_id.as_deref());

    emit.elem("Link", &attrs, |emit| {
        write_geometry(emit, &link.geometry)?;
        match &link.layout {
            LinkLayout::Custom(layout) => write_road_layout(emit, &AttrList::new(), layout)?,
            LinkLayout::Defined {
                layout,
                lane_overrides,
                stripe_overrides,
            } => {
                emit.text_elem("DefinedLayout", layout)?;
                for lane_override in lane_overrides {
                    let mut attrs = AttrList::new();
                    attrs.add("Lane", &lane_override.lane);
                    emit.elem_or_empty(
                        "LaneOverride",
                        &attrs,
                        !lane_override.speed_limits.is_empty(),
                        |emit| write_speed_limits(emit, &lane_override.speed_limits),
                    )?;
                }
                for stripe_override in stripe_overrides {
                    let mut attrs = AttrList::new();
                    attrs.add("Stripe", &stripe_override.stripe);
                    write_stripe_data(emit, "StripeOverride", attrs, &stripe_override.data)?;
                }
            }
        }
        for light in &link.traffic_lights {
            write_traffic_light(emit, light)?;
        }
        for sensor in &link.traffic_light_sensors {
            let mut attrs = AttrList::new();
            attrs
                .add("Id", &sensor.id)
                .add("Type", &sensor.sensor_type)
                .add("Lane", &sensor.lane)
                .add_value("EntryPosition", &sensor.entry_position)
                .add_value("ExitPosition", &sensor.exit_position);
            emit.empty_elem_with_attrs("TrafficLightSensor", &attrs)?;
        }
        Ok(())
    })
}

fn write_geometry<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    geometry: &LinkGeometry,
) -> Result<(), SerializeError> {
    match geometry {
        LinkGeometry::Straight => emit.empty_elem("Straight"),
        LinkGeometry::Bezier(bezier) => {
            let mut attrs = AttrList::new();
            attrs
                .add_opt_value("Shape", bezier.shape.as_ref())
                .add_opt_value("Weighted", bezier.weighted.as_ref());
            emit.elem_or_empty("Bezier", &attrs, bezier.flattener.is_some(), |emit| {
                bezier
                    .flattener
                    .as_ref()
                    .map_or(Ok(()), |flattener| write_flattener(emit, flattener))
            })
        }
        LinkGeometry::Clothoid(clothoid) => {
            let mut attrs = AttrList::new();
            attrs.add_opt_value("EndElevation", clothoid.end_elevation.as_ref());
            emit.elem("Clothoid", &attrs, |emit| {
                match &clothoid.shape {
                    ClothoidShape::Interpolated => emit.empty_elem("Interpolated")?,
                    ClothoidShape::Length {
                        length,
                        start_curvature,
                        end_curvature,
                    } => {
                        emit.value_elem("Length", length)?;
                        emit.value_elem("StartCurvature", start_curvature)?;
                        emit.value_elem("EndCurvature", end_curvature)?;
                    }
                    ClothoidShape::A {
                        a,
                        start_curvature,
                        end_curvature,
                    } => {
                        emit.value_elem("A", a)?;
                        emit.value_elem("StartCurvature", start_curvature)?;
                        emit.value_elem("EndCurvature", end_curvature)?;
                    }
                }
                if let Some(flattener) = &clothoid.flattener {
                    write_flattener(emit, flattener)?;
                }
                Ok(())
            })
        }
        LinkGeometry::Arc(arc) => {
            let mut attrs = AttrList::new();
            attrs
                .add_value("Radius", &arc.radius)
                .add_value("Direction", &arc.direction);
            emit.elem_or_empty("Arc", &attrs, arc.flattener.is_some(), |emit| {
                arc.flattener
                    .as_ref()
                    .map_or(Ok(()), |flattener| write_flattener(emit, flattener))
            })
        }
        LinkGeometry::Polyline(polyline) => {
            emit.elem("Polyline", &AttrList::new(), |emit| {
                for coordinate in &polyline.coordinates {
                    emit.value_elem("Coordinate", coordinate)?;
                }
                Ok(())
            })
        }
    }
}

fn write_speed_limits<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    limits: &[SpeedLimit],
) -> Result<(), SerializeError> {
    for limit in limits {
        let mut attrs = AttrList::new();
        attrs
            .add("GtuType", &limit.gtu_type)
            .add_value("LegalSpeedLimit", &limit.legal_speed_limit);
        emit.empty_elem_with_attrs("SpeedLimit", &attrs)?;
    }
    Ok(())
}

/// Write a `RoadLayout` element; `attrs` carries the id of a defined layout.
pub(crate) fn write_road_layout<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    attrs: &AttrList,
    layout: &RoadLayout,
) -> Result<(), SerializeError> {
    let has_children = !layout.speed_limits.is_empty() || !layout.elements.is_empty();
    emit.elem_or_empty("RoadLayout", attrs, has_children, |emit| {
        write_speed_limits(emit, &layout.speed_limits)?;
        for element in &layout.elements {
            match element {
                CrossSectionElement::Stripe(stripe) => write_stripe(emit, stripe)?,
                CrossSectionElement::Lane(lane) => {
                    let mut attrs = AttrList::new();
                    attrs.add("Id", &lane.id).add("LaneType", &lane.lane_type);
                    emit.elem("Lane", &attrs, |emit| {
                        write_offset(emit, lane.offset.as_ref())?;
                        write_width(emit, &lane.width)?;
                        write_speed_limits(emit, &lane.speed_limits)
                    })?;
                }
                CrossSectionElement::Shoulder(shoulder) => {
                    let mut attrs = AttrList::new();
                    attrs
                        .add_opt("Id", shoulder.id.as_deref())
                        .add_opt("LaneType", shoulder.lane_type.as_deref());
                    emit.elem("Shoulder", &attrs, |emit| {
                        write_offset(emit, shoulder.offset.as_ref())?;
                        write_width(emit, &shoulder.width)
                    })?;
                }
                CrossSectionElement::NoTrafficLane(lane) => {
                    let mut attrs = AttrList::new();
                    attrs.add_opt("Id", lane.id.as_deref());
                    emit.elem("NoTrafficLane", &attrs, |emit| {
                        write_offset(emit, lane.offset.as_ref())?;
                        write_width(emit, &lane.width)
                    })?;
                }
            }
        }
        Ok(())
    })
}

fn write_offset<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    offset: Option<&LateralOffset>,
) -> Result<(), SerializeError> {
    let Some(offset) = offset else {
        return Ok(());
    };
    match offset {
        LateralOffset::Center(offset) => emit.value_elem("CenterOffset", offset),
        LateralOffset::Left(offset) => emit.value_elem("LeftOffset", offset),
        LateralOffset::Right(offset) => emit.value_elem("RightOffset", offset),
        LateralOffset::CenterStartEnd { start, end } => {
            emit.value_elem("CenterOffsetStart", start)?;
            emit.value_elem("CenterOffsetEnd", end)
        }
        LateralOffset::LeftStartEnd { start, end } => {
            emit.value_elem("LeftOffsetStart", start)?;
            emit.value_elem("LeftOffsetEnd", end)
        }
        LateralOffset::RightStartEnd { start, end } => {
            emit.value_elem("RightOffsetStart", start)?;
            emit.value_elem("RightOffsetEnd", end)
        }
    }
}

fn write_width<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    width: &ElementWidth,
) -> Result<(), SerializeError> {
    match width {
        ElementWidth::Constant(width) => emit.value_elem("Width", width),
        ElementWidth::StartEnd { start, end } => {
            emit.value_elem("WidthStart", start)?;
            emit.value_elem("WidthEnd", end)
        }
    }
}

fn write_stripe<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    stripe: &CseStripe,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs.add_opt("Id", stripe.id.as_deref());
    match &stripe.stripe {
        StripeKind::Defined(id) => emit.elem("Stripe", &attrs, |emit| {
            emit.text_elem("DefinedStripe", id)?;
            write_offset(emit, stripe.offset.as_ref())
        }),
        StripeKind::Custom(data) => {
            add_stripe_data_attrs(&mut attrs, data);
            emit.elem_or_empty(
                "Stripe",
                &attrs,
                stripe_data_has_children(data) || stripe.offset.is_some(),
                |emit| {
                    write_stripe_data_children(emit, data)?;
                    write_offset(emit, stripe.offset.as_ref())
                },
            )
        }
    }
}

fn add_stripe_data_attrs(attrs: &mut AttrList, data: &StripeData) {
    attrs
        .add_opt_value("LeftChangeLane", data.left_change_lane.as_ref())
        .add_opt_value("RightChangeLane", data.right_change_lane.as_ref())
        .add_opt_value("LateralSync", data.lateral_sync.as_ref());
}

fn stripe_data_has_children(data: &StripeData) -> bool {
    data.elements.is_some() || data.dash_offset.is_some() || !data.compatibilities.is_empty()
}

fn write_stripe_data_children<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    data: &StripeData,
) -> Result<(), SerializeError> {
    if let Some(elements) = &data.elements {
        emit.elem_or_empty(
            "Elements",
            &AttrList::new(),
            !elements.elements.is_empty(),
            |emit| {
                for element in &elements.elements {
                    match element {
                        StripeElement::Line(line) => {
                            let mut attrs = AttrList::new();
                            attrs
                                .add_value("Width", &line.width)
                                .add_value("Color", &line.color);
                            emit.elem("Line", &attrs, |emit| {
                                if line.dashes.is_empty() {
                                    return emit.empty_elem("Continuous");
                                }
                                emit.elem("Dashed", &AttrList::new(), |emit| {
                                    for dash in &line.dashes {
                                        match dash {
                                            DashSegment::Gap(length) => emit.value_elem("Gap", length)?,
                                            DashSegment::Dash(length) => emit.value_elem("Dash", length)?,
                                        }
                                    }
                                    Ok(())
                                })
                            })?;
                        }
                        StripeElement::Gap { width } => {
                            let mut attrs = AttrList::new();
                            attrs.add_value("Width", width);
                            emit.empty_elem_with_attrs("Gap", &attrs)?;
                        }
                    }
                }
                Ok(())
            },
        )?;
    }
    if let Some(dash_offset) = &data.dash_offset {
        emit.elem("DashOffset", &AttrList::new(), |emit| match dash_offset {
            DashOffset::Fixed { offset } => {
                let mut attrs = AttrList::new();
                attrs.add_value("Offset", offset);
                emit.empty_elem_with_attrs("Fixed", &attrs)
            }
            DashOffset::SyncUpstream => emit.empty_elem("SyncUpstream"),
            DashOffset::SyncDownstream => emit.empty_elem("SyncDownstream"),
        })?;
    }
    for compatibility in &data.compatibilities {
        let mut attrs = AttrList::new();
        attrs
            .add("GtuType", &compatibility.gtu_type)
            .add_value("Direction", &compatibility.direction);
        emit.empty_elem_with_attrs("Compatibility", &attrs)?;
    }
    Ok(())
}

/// Write stripe properties as element `name`, after the attributes in `attrs`.
pub(crate) fn write_stripe_data<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    name: &str,
    mut attrs: AttrList,
    data: &StripeData,
) -> Result<(), SerializeError> {
    add_stripe_data_attrs(&mut attrs, data);
    emit.elem_or_empty(name, &attrs, stripe_data_has_children(data), |emit| {
        write_stripe_data_children(emit, data)
    })
}

fn write_traffic_light<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    light: &TrafficLight,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs
        .add("Id", &light.id)
        .add("Lane", &light.lane)
        .add_value("Position", &light.position);
    emit.elem_or_empty("TrafficLight", &attrs, !light.turn_on_red.is_empty(), |emit| {
        for node in &light.turn_on_red {
            emit.text_elem("TurnOnRed", node)?;
        }
        Ok(())
    })
}

/// Write a lane reference as `<name Link=".." Lane=".."/>`.
pub(crate) fn write_lane_link<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    name: &str,
    lane: &LaneLink,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs.add("Link", &lane.link).add("Lane", &lane.lane);
    emit.empty_elem_with_attrs(name, &attrs)
}

pub(crate) fn write_lane_position<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    name: &str,
    position: &LanePosition,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs
        .add("Link", &position.link)
        .add("Lane", &position.lane)
        .add_value("Position", &position.position);
    emit.empty_elem_with_attrs(name, &attrs)
}

fn write_custom_road_layout<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    layout: &RoadLayout,
) -> Result<(), SerializeError> {
    write_road_layout(emit, &AttrList::new(), layout)
}

impl_to_xml! {
    Network => "Network", write_network;
    Node => "Node", write_node;
    Link => "Link", write_link;
    Flattener => "Flattener", write_flattener;
    RoadLayout => "RoadLayout", write_custom_road_layout;
    TrafficLight => "TrafficLight", write_traffic_light;
}
