#![cfg(test)]

use quick_xml::Reader;

use crate::xml::deserialize::DeserializeError;
use crate::xml::quick::de::{ChildElement, XmlCursor};

// Helper function to assert floating point equality with tolerance
pub fn assert_float_eq(a: f64, b: f64, tolerance: f64) {
    assert!(
        (a - b).abs() < tolerance,
        "Expected {} to be approximately equal to {} (tolerance: {})",
        a,
        b,
        tolerance
    );
}

/// Open the root element of `xml` and hand it to `read`.
pub fn with_cursor<'x, T>(
    xml: &'x str,
    read: impl FnOnce(&mut XmlCursor<'_, &'x [u8]>, &ChildElement) -> Result<T, DeserializeError>,
) -> Result<T, DeserializeError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut cursor = XmlCursor::new(&mut reader, &mut buf);
    let root = cursor.root()?;
    read(&mut cursor, &root)
}

/// Wrap a network snippet in a minimal OTS document.
pub fn wrap_network_xml(network_xml: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Ots xmlns="http://www.opentrafficsim.org/ots">
    <Network>
        {}
    </Network>
</Ots>"#,
        network_xml
    )
}

/// Parse a link from an XML snippet placed inside a network.
pub fn parse_link(link_xml: &str) -> crate::network::Link {
    let document: crate::document::OtsDocument = wrap_network_xml(link_xml)
        .parse()
        .expect("Failed to parse OTS document");

    document
        .network
        .expect("No network found")
        .links
        .into_iter()
        .next()
        .expect("No links found in network")
}
