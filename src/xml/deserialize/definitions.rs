use std::io::BufRead;

use crate::definitions::{DefinedRoadLayout, Definitions, GtuTemplate, GtuType, StripeType};
use crate::values::{AccelerationUnit, LengthUnit, SpeedUnit};
use crate::xml::deserialize::distributions::read_unit_dist;
use crate::xml::deserialize::network::{read_road_layout, read_stripe_data_child, stripe_data_attrs};
use crate::xml::deserialize::{DeserializeError, impl_from_xml, read_marker, required};
use crate::xml::quick::de::{ChildElement, XmlCursor};

pub(crate) fn read_definitions<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<Definitions, DeserializeError> {
    let mut definitions = Definitions::default();

    while let Some(group) = cursor.next_child(element)? {
        match group.name.as_str() {
            "GtuTypes" => {
                while let Some(child) = cursor.next_child(&group)? {
                    match child.name.as_str() {
                        "GtuType" => definitions.gtu_types.push(read_gtu_type(cursor, &child)?),
                        _ => cursor.unexpected(&child)?,
                    }
                }
            }
            "GtuTemplates" => {
                while let Some(child) = cursor.next_child(&group)? {
                    match child.name.as_str() {
                        "GtuTemplate" => definitions
                            .gtu_templates
                            .push(read_gtu_template(cursor, &child)?),
                        _ => cursor.unexpected(&child)?,
                    }
                }
            }
            "StripeTypes" => {
                while let Some(child) = cursor.next_child(&group)? {
                    match child.name.as_str() {
                        "StripeType" => definitions
                            .stripe_types
                            .push(read_stripe_type(cursor, &child)?),
                        _ => cursor.unexpected(&child)?,
                    }
                }
            }
            "RoadLayouts" => {
                while let Some(child) = cursor.next_child(&group)? {
                    match child.name.as_str() {
                        "RoadLayout" => {
                            let id = child.attrs.get_req_string("Id")?;
                            let layout = read_road_layout(cursor, &child)?;
                            definitions.road_layouts.push(DefinedRoadLayout { id, layout });
                        }
                        _ => cursor.unexpected(&child)?,
                    }
                }
            }
            _ => cursor.unexpected(&group)?,
        }
    }

    Ok(definitions)
}

pub(crate) fn read_gtu_type<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<GtuType, DeserializeError> {
    let gtu_type = GtuType {
        id: element.attrs.get_req_string("Id")?,
        parent: element.attrs.get_opt_string("Parent"),
        default: element.attrs.get_opt_parsed("Default")?,
    };
    read_marker(cursor, element)?;
    Ok(gtu_type)
}

pub(crate) fn read_gtu_template<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<GtuTemplate, DeserializeError> {
    let mut length_dist = None;
    let mut width_dist = None;
    let mut max_speed_dist = None;
    let mut max_acceleration_dist = None;
    let mut max_deceleration_dist = None;

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "LengthDist" => length_dist = Some(read_unit_dist::<_, LengthUnit>(cursor, &child)?),
            "WidthDist" => width_dist = Some(read_unit_dist::<_, LengthUnit>(cursor, &child)?),
            "MaxSpeedDist" => {
                max_speed_dist = Some(read_unit_dist::<_, SpeedUnit>(cursor, &child)?)
            }
            "MaxAccelerationDist" => {
                max_acceleration_dist = Some(read_unit_dist::<_, AccelerationUnit>(cursor, &child)?)
            }
            "MaxDecelerationDist" => {
                max_deceleration_dist = Some(read_unit_dist::<_, AccelerationUnit>(cursor, &child)?)
            }
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(GtuTemplate {
        id: element.attrs.get_req_string("Id")?,
        gtu_type: element.attrs.get_req_string("GtuType")?,
        default: element.attrs.get_opt_parsed("Default")?,
        length_dist: required(cursor, length_dist, "LengthDist")?,
        width_dist: required(cursor, width_dist, "WidthDist")?,
        max_speed_dist: required(cursor, max_speed_dist, "MaxSpeedDist")?,
        max_acceleration_dist,
        max_deceleration_dist,
    })
}

pub(crate) fn read_stripe_type<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<StripeType, DeserializeError> {
    let mut data = stripe_data_attrs(&element.attrs)?;
    while let Some(child) = cursor.next_child(element)? {
        if !read_stripe_data_child(cursor, &child, &mut data)? {
            cursor.unexpected(&child)?;
        }
    }
    Ok(StripeType {
        id: element.attrs.get_req_string("Id")?,
        default: element.attrs.get_opt_parsed("Default")?,
        data,
    })
}

impl_from_xml! {
    Definitions => "Definitions", read_definitions;
    GtuType => "GtuType", read_gtu_type;
    GtuTemplate => "GtuTemplate", read_gtu_template;
    StripeType => "StripeType", read_stripe_type;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::ContinuousDistribution;
    use crate::network::CrossSectionElement;
    use crate::test_utils::with_cursor;
    use crate::values::ExprValue;

    #[test]
    fn test_definitions_groups() {
        let definitions = with_cursor(
            r#"<Definitions>
                <GtuTypes>
                    <GtuType Id="NL.VEHICLE" Default="true"/>
                    <GtuType Id="NL.CAR" Parent="NL.VEHICLE"/>
                </GtuTypes>
                <StripeTypes>
                    <StripeType Id="DASHED" LateralSync="LINEAR">
                        <Elements><Line Width="0.2 m" Color="WHITE"><Continuous/></Line></Elements>
                    </StripeType>
                </StripeTypes>
                <RoadLayouts>
                    <RoadLayout Id="TWO_LANES">
                        <Lane Id="L1" LaneType="FREEWAY"><CenterOffset>1.75 m</CenterOffset><Width>3.5 m</Width></Lane>
                    </RoadLayout>
                </RoadLayouts>
            </Definitions>"#,
            read_definitions,
        )
        .unwrap();

        assert_eq!(definitions.gtu_types.len(), 2);
        assert_eq!(definitions.gtu_types[1].parent.as_deref(), Some("NL.VEHICLE"));
        assert_eq!(definitions.gtu_types[0].effective_default(), ExprValue::Value(true));
        assert!(definitions.stripe_types[0].data.elements.is_some());
        assert!(matches!(
            definitions.road_layouts[0].layout.elements[0],
            CrossSectionElement::Lane(_)
        ));
    }

    #[test]
    fn test_gtu_template() {
        let template = with_cursor(
            r#"<GtuTemplate Id="CAR" GtuType="NL.CAR">
                <LengthDist LengthUnit="m"><Constant C="4.19"/></LengthDist>
                <WidthDist LengthUnit="m"><Constant C="1.7"/></WidthDist>
                <MaxSpeedDist SpeedUnit="km/h"><Uniform Min="150" Max="200"/></MaxSpeedDist>
            </GtuTemplate>"#,
            read_gtu_template,
        )
        .unwrap();

        assert_eq!(template.gtu_type, "NL.CAR");
        assert!(matches!(
            template.max_speed_dist.dist.distribution,
            ContinuousDistribution::Uniform { .. }
        ));
        assert!(template.max_acceleration_dist.is_none());
    }

    #[test]
    fn test_gtu_template_requires_length() {
        let err = with_cursor(
            r#"<GtuTemplate Id="CAR" GtuType="NL.CAR">
                <WidthDist LengthUnit="m"><Constant C="1.7"/></WidthDist>
                <MaxSpeedDist SpeedUnit="km/h"><Constant C="180"/></MaxSpeedDist>
            </GtuTemplate>"#,
            read_gtu_template,
        )
        .unwrap_err();
        assert!(matches!(err, DeserializeError::MissingField(field) if field.ends_with("LengthDist")));
    }
}
