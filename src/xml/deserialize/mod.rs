//! XML deserialization module.
//!
//! This module reads OTS documents with quick-xml's event API. Each schema
//! node has a `read_*` function that is handed the already-opened element and
//! consumes everything up to and including its end tag. Elements that are not
//! part of the model are skipped with a warning.

pub mod control;
pub mod definitions;
pub mod demand;
pub mod distributions;
pub mod document;
pub mod model;
pub mod network;

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use thiserror::Error;

use crate::xml::quick::de::{ChildElement, XmlCursor};

/// Errors that can occur during XML deserialization.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Deserialization error: {0}")]
    Custom(String),
    #[error("Unexpected end of XML")]
    UnexpectedEof,
    #[error("Unexpected element: expected {expected}, found {found}")]
    UnexpectedElement { expected: String, found: String },
    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// A schema node that is read from an element with a fixed name.
pub trait FromXml: Sized {
    /// Local name of the element.
    const ELEMENT: &'static str;

    /// Read the node from `element`, which the cursor has just opened.
    fn from_xml<R: BufRead>(
        cursor: &mut XmlCursor<'_, R>,
        element: &ChildElement,
    ) -> Result<Self, DeserializeError>;
}

macro_rules! impl_from_xml {
    ($($ty:ty => $element:literal, $read:path;)+) => {
        $(
            impl $crate::xml::deserialize::FromXml for $ty {
                const ELEMENT: &'static str = $element;

                fn from_xml<R: std::io::BufRead>(
                    cursor: &mut $crate::xml::quick::de::XmlCursor<'_, R>,
                    element: &$crate::xml::quick::de::ChildElement,
                ) -> Result<Self, $crate::xml::deserialize::DeserializeError> {
                    $read(cursor, element)
                }
            }
        )+
    };
}
pub(crate) use impl_from_xml;

/// Read the text of `child` into `slot`, rejecting a second occurrence.
pub(crate) fn read_once<R: BufRead, T: FromStr>(
    cursor: &mut XmlCursor<'_, R>,
    child: &ChildElement,
    slot: &mut Option<T>,
) -> Result<(), DeserializeError>
where
    T::Err: fmt::Display,
{
    if slot.is_some() {
        return Err(cursor.error(format!("duplicate element <{}>", child.name)));
    }
    *slot = Some(cursor.read_parsed(child)?);
    Ok(())
}

/// Unwrap a required child that was collected while iterating.
pub(crate) fn required<R: BufRead, T>(
    cursor: &XmlCursor<'_, R>,
    value: Option<T>,
    name: &str,
) -> Result<T, DeserializeError> {
    value.ok_or_else(|| cursor.missing_field(name))
}

/// Read an element that has no content of interest, warning about anything
/// inside it.
pub(crate) fn read_marker<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<(), DeserializeError> {
    while let Some(child) = cursor.next_child(element)? {
        cursor.unexpected(&child)?;
    }
    Ok(())
}

/// Read an element whose only content is a single choice of child element,
/// returning that child's name. The child itself is left open.
pub(crate) fn read_choice<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
    choices: &[&str],
) -> Result<ChildElement, DeserializeError> {
    while let Some(child) = cursor.next_child(element)? {
        if choices.contains(&child.name.as_str()) {
            return Ok(child);
        }
        cursor.unexpected(&child)?;
    }
    Err(cursor.missing_field(&choices.join("|")))
}

/// Consume the rest of `element` after a choice has been read.
pub(crate) fn finish<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<(), DeserializeError> {
    read_marker(cursor, element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;

    #[test]
    fn test_read_choice_skips_unknown() {
        let xml = r#"<Route><Comment/><Shortest/></Route>"#;
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        let mut cursor = XmlCursor::new(&mut reader, &mut buf);

        let root = cursor.root().unwrap();
        let choice = read_choice(&mut cursor, &root, &["None", "Shortest"]).unwrap();
        assert_eq!(choice.name, "Shortest");
        read_marker(&mut cursor, &choice).unwrap();
        finish(&mut cursor, &root).unwrap();
        assert_eq!(cursor.path_str(), "");
    }

    #[test]
    fn test_read_choice_missing() {
        let xml = r#"<Route></Route>"#;
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        let mut cursor = XmlCursor::new(&mut reader, &mut buf);

        let root = cursor.root().unwrap();
        let err = read_choice(&mut cursor, &root, &["None", "Shortest"]).unwrap_err();
        assert!(matches!(err, DeserializeError::MissingField(field) if field == "None|Shortest"));
    }

    #[test]
    fn test_read_once_rejects_duplicates() {
        let xml = r#"<Flattener><NumSegments>8</NumSegments><NumSegments>9</NumSegments></Flattener>"#;
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        let mut cursor = XmlCursor::new(&mut reader, &mut buf);

        let root = cursor.root().unwrap();
        let mut slot: Option<i32> = None;
        let first = cursor.next_child(&root).unwrap().unwrap();
        read_once(&mut cursor, &first, &mut slot).unwrap();
        assert_eq!(slot, Some(8));
        let second = cursor.next_child(&root).unwrap().unwrap();
        let err = read_once(&mut cursor, &second, &mut slot).unwrap_err();
        assert!(err.to_string().contains("duplicate element <NumSegments>"));
    }
}
