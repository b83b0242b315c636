//! XML serialization using quick-xml.
//!
//! Every schema node has a `write_*` function that mirrors its reader in
//! [`crate::xml::deserialize`]. Optional attributes and elements are written
//! only when set, so a document that was read and written back keeps the
//! difference between an absent value and a value equal to its default.

pub mod control;
pub mod definitions;
pub mod demand;
pub mod distributions;
pub mod document;
pub mod model;
pub mod network;

use std::io::Write;

use thiserror::Error;

use crate::xml::quick::ser::XmlEmitter;

/// Errors that can occur during XML serialization.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("XML serialization error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Serialization error: {0}")]
    Custom(String),
}

/// A schema node that writes itself as one element.
pub trait ToXml {
    /// Local name of the element.
    const ELEMENT: &'static str;

    fn write_xml<W: Write>(&self, emit: &mut XmlEmitter<'_, W>) -> Result<(), SerializeError>;
}

macro_rules! impl_to_xml {
    ($($ty:ty => $element:literal, $write:path;)+) => {
        $(
            impl $crate::xml::serialize::ToXml for $ty {
                const ELEMENT: &'static str = $element;

                fn write_xml<W: std::io::Write>(
                    &self,
                    emit: &mut $crate::xml::quick::ser::XmlEmitter<'_, W>,
                ) -> Result<(), $crate::xml::serialize::SerializeError> {
                    $write(emit, self)
                }
            }
        )+
    };
}
pub(crate) use impl_to_xml;
