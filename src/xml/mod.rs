//! Reading and writing OTS documents as XML.
//!
//! Reading walks the element tree with [`quick::XmlCursor`]; writing goes
//! through [`quick::XmlEmitter`]. Element names are matched by local name, so
//! documents with or without the `ots:` prefix read the same way. Output always
//! uses the OTS namespace as the default namespace.
//!
//! ```rust
//! use ots_schema::document::OtsDocument;
//!
//! let xml = r#"<Ots xmlns="http://www.opentrafficsim.org/ots">
//!     <Network><Node Id="A" Coordinate="(0, 0)"/></Network>
//! </Ots>"#;
//! let document: OtsDocument = xml.parse().unwrap();
//! assert_eq!(document.network.as_ref().unwrap().nodes[0].id, "A");
//!
//! let written = document.to_xml().unwrap();
//! assert_eq!(written.parse::<OtsDocument>().unwrap(), document);
//! ```

pub mod deserialize;
pub mod errors;
pub mod quick;
pub mod serialize;

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use std::str::FromStr;

use quick_xml::{Reader, Writer};

pub use deserialize::{DeserializeError, FromXml};
pub use errors::{ErrorCollection, ErrorContext, OtsError, ToOtsError};
pub use serialize::{SerializeError, ToXml};

use crate::document::OtsDocument;
use quick::{XmlCursor, XmlEmitter};

/// Output formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level; `0` writes everything on one line.
    pub indent: usize,
    /// Write `<?xml version="1.0" encoding="UTF-8"?>` first.
    pub declaration: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            declaration: true,
        }
    }
}

impl WriteOptions {
    /// No declaration and no indentation.
    pub fn compact() -> Self {
        Self {
            indent: 0,
            declaration: false,
        }
    }
}

fn read_str<T: FromXml>(xml: &str, context: ErrorContext) -> Result<T, OtsError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut cursor = XmlCursor::new(&mut reader, &mut buf);

    let result = match cursor.root() {
        Ok(root) if root.name != T::ELEMENT => Err(DeserializeError::UnexpectedElement {
            expected: T::ELEMENT.to_string(),
            found: root.name,
        }),
        Ok(root) => T::from_xml(&mut cursor, &root),
        Err(e) => Err(e),
    };

    result.map_err(|e| {
        let context = context.at_offset(xml, cursor.position());
        log::debug!("failed to read <{}>{}: {}", T::ELEMENT, context, e);
        OtsError::from_deserialize(e, context)
    })
}

fn write_with<W: Write, T: ToXml>(
    out: W,
    value: &T,
    options: &WriteOptions,
) -> Result<W, SerializeError> {
    let mut writer = if options.indent > 0 {
        Writer::new_with_indent(out, b' ', options.indent)
    } else {
        Writer::new(out)
    };
    let mut emit = XmlEmitter::new(&mut writer);
    if options.declaration {
        emit.xml_decl()?;
    }
    value.write_xml(&mut emit)?;
    Ok(writer.into_inner())
}

/// Read a single schema element, such as a `<Link>`, from `xml`.
///
/// The outermost element must be `T::ELEMENT`.
pub fn from_fragment<T: FromXml>(xml: &str) -> Result<T, OtsError> {
    read_str(xml, ErrorContext::new())
}

/// Write a single schema element without a declaration or indentation.
pub fn to_fragment<T: ToXml>(value: &T) -> Result<String, OtsError> {
    let bytes = write_with(Vec::new(), value, &WriteOptions::compact())?;
    Ok(String::from_utf8(bytes).map_err(SerializeError::from)?)
}

impl FromStr for OtsDocument {
    type Err = OtsError;

    fn from_str(xml: &str) -> Result<Self, Self::Err> {
        read_str(xml, ErrorContext::new())
    }
}

impl OtsDocument {
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, OtsError> {
        let mut xml = String::new();
        reader.read_to_string(&mut xml)?;
        read_str(&xml, ErrorContext::new())
    }

    /// Read a document from a file; errors carry the file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OtsError> {
        let path = path.as_ref();
        log::debug!("reading OTS document from {}", path.display());
        let mut xml = String::new();
        BufReader::new(File::open(path)?).read_to_string(&mut xml)?;
        let document: Self = read_str(&xml, ErrorContext::with_file_path(path))?;
        log::trace!(
            "read {} models and {} links from {}",
            document.models.len(),
            document.network.as_ref().map_or(0, |network| network.links.len()),
            path.display()
        );
        Ok(document)
    }

    /// Write the document with [`WriteOptions::default`].
    pub fn to_xml(&self) -> Result<String, OtsError> {
        self.to_xml_with(&WriteOptions::default())
    }

    pub fn to_xml_with(&self, options: &WriteOptions) -> Result<String, OtsError> {
        let bytes = write_with(Vec::new(), self, options)?;
        Ok(String::from_utf8(bytes).map_err(SerializeError::from)?)
    }

    pub fn write_to<W: Write>(&self, out: W, options: &WriteOptions) -> Result<(), OtsError> {
        let mut out = write_with(out, self, options)?;
        out.flush()?;
        Ok(())
    }
}
