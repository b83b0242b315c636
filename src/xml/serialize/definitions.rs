use std::io::Write;

use crate::definitions::{Definitions, GtuTemplate, GtuType, StripeType};
use crate::xml::quick::ser::{AttrList, XmlEmitter};
use crate::xml::serialize::distributions::write_unit_dist;
use crate::xml::serialize::network::{write_road_layout, write_stripe_data};
use crate::xml::serialize::{SerializeError, impl_to_xml};

pub(crate) fn write_definitions<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    definitions: &Definitions,
) -> Result<(), SerializeError> {
    emit.elem("Definitions", &AttrList::new(), |emit| {
        if !definitions.gtu_types.is_empty() {
            emit.elem("GtuTypes", &AttrList::new(), |emit| {
                for gtu_type in &definitions.gtu_types {
                    write_gtu_type(emit, gtu_type)?;
                }
                Ok(())
            })?;
        }
        if !definitions.gtu_templates.is_empty() {
            emit.elem("GtuTemplates", &AttrList::new(), |emit| {
                for template in &definitions.gtu_templates {
                    write_gtu_template(emit, template)?;
                }
                Ok(())
            })?;
        }
        if !definitions.stripe_types.is_empty() {
            emit.elem("StripeTypes", &AttrList::new(), |emit| {
                for stripe_type in &definitions.stripe_types {
                    write_stripe_type(emit, stripe_type)?;
                }
                Ok(())
            })?;
        }
        if !definitions.road_layouts.is_empty() {
            emit.elem("RoadLayouts", &AttrList::new(), |emit| {
                for defined in &definitions.road_layouts {
                    let mut attrs = AttrList::new();
                    attrs.add("Id", &defined.id);
                    write_road_layout(emit, &attrs, &defined.layout)?;
                }
                Ok(())
            })?;
        }
        Ok(())
    })
}

pub(crate) fn write_gtu_type<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    gtu_type: &GtuType,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs
        .add("Id", &gtu_type.id)
        .add_opt("Parent", gtu_type.parent.as_deref())
        .add_opt_value("Default", gtu_type.default.as_ref());
    emit.empty_elem_with_attrs("GtuType", &attrs)
}

pub(crate) fn write_gtu_template<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    template: &GtuTemplate,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs
        .add("Id", &template.id)
        .add("GtuType", &template.gtu_type)
        .add_opt_value("Default", template.default.as_ref());
    emit.elem("GtuTemplate", &attrs, |emit| {
        write_unit_dist(emit, "LengthDist", AttrList::new(), &template.length_dist)?;
        write_unit_dist(emit, "WidthDist", AttrList::new(), &template.width_dist)?;
        write_unit_dist(emit, "MaxSpeedDist", AttrList::new(), &template.max_speed_dist)?;
        if let Some(dist) = &template.max_acceleration_dist {
            write_unit_dist(emit, "MaxAccelerationDist", AttrList::new(), dist)?;
        }
        if let Some(dist) = &template.max_deceleration_dist {
            write_unit_dist(emit, "MaxDecelerationDist", AttrList::new(), dist)?;
        }
        Ok(())
    })
}

pub(crate) fn write_stripe_type<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    stripe_type: &StripeType,
) -> Result<(), SerializeError> {
    let mut attrs = AttrList::new();
    attrs
        .add("Id", &stripe_type.id)
        .add_opt_value("Default", stripe_type.default.as_ref());
    write_stripe_data(emit, "StripeType", attrs, &stripe_type.data)
}

impl_to_xml! {
    Definitions => "Definitions", write_definitions;
    GtuType => "GtuType", write_gtu_type;
    GtuTemplate => "GtuTemplate", write_gtu_template;
    StripeType => "StripeType", write_stripe_type;
}
