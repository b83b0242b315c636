//! Thin helpers over quick-xml's event API.
//!
//! [`XmlCursor`] walks an element tree and tracks the element path for error
//! messages; [`XmlEmitter`] writes elements and attributes.

pub mod de;
pub mod ser;

pub use de::{Attrs, ChildElement, XmlCursor, skip_element};
pub use ser::{AttrList, XmlEmitter};
