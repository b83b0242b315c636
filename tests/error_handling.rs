use std::io::Write;

use ots_schema::document::OtsDocument;
use ots_schema::network::Node;
use ots_schema::xml::{OtsError, from_fragment};
use pretty_assertions::assert_eq;

fn parse_error(xml: &str) -> OtsError {
    match xml.parse::<OtsDocument>() {
        Ok(document) => panic!("expected an error, got {:?}", document),
        Err(e) => e,
    }
}

#[test]
fn test_missing_attribute_names_element_and_attribute() {
    let err = parse_error(
        r#"<Ots>
    <Network>
        <Node Id="A" Coordinate="(0, 0)"/>
        <Link Id="AB" Type="FREEWAY" NodeStart="A"><Straight/></Link>
    </Network>
</Ots>"#,
    );

    assert!(matches!(err, OtsError::Deserialize { .. }));
    assert!(err.to_string().contains("Missing required field: Link@NodeEnd"));
    assert_eq!(err.context().and_then(|context| context.line), Some(4));
}

#[test]
fn test_bound_violation_is_rejected() {
    let err = parse_error(
        r#"<Ots><Definitions><GtuTemplates>
            <GtuTemplate Id="CAR" GtuType="NL.CAR">
                <LengthDist LengthUnit="m"><Exponential Lambda="-1"/></LengthDist>
                <WidthDist LengthUnit="m"><Constant C="1.7"/></WidthDist>
                <MaxSpeedDist SpeedUnit="km/h"><Constant C="180"/></MaxSpeedDist>
            </GtuTemplate>
        </GtuTemplates></Definitions></Ots>"#,
    );
    assert!(err.to_string().contains("Invalid value for Exponential@Lambda"));
}

#[test]
fn test_position_fraction_out_of_range() {
    let err = parse_error(
        r#"<Ots><Network>
            <Link Id="AB" Type="FREEWAY" NodeStart="A" NodeEnd="B">
                <Straight/>
                <RoadLayout/>
                <TrafficLight Id="TL" Lane="L1" Position="150%"/>
            </Link>
        </Network></Ots>"#,
    );
    assert!(err.to_string().contains("TrafficLight@Position"));
}

#[test]
fn test_quantity_requires_unit() {
    let err = from_fragment::<Node>(r#"<Node Id="A" Coordinate="(0, 0)" Direction="90"/>"#)
        .unwrap_err();
    assert!(err.to_string().contains("Node@Direction"));
}

#[test]
fn test_wrong_root() {
    let err = parse_error(r#"<Network><Node Id="A" Coordinate="(0, 0)"/></Network>"#);
    assert!(err.to_string().contains("expected Ots, found Network"));
}

#[test]
fn test_malformed_xml() {
    let err = parse_error("<Ots>\n<Network>\n</Ots>");
    assert!(matches!(err, OtsError::Xml { .. }));
}

#[test]
fn test_empty_input() {
    let err = parse_error("");
    assert!(err.to_string().contains("Unexpected end of XML"));
}

#[test]
fn test_unknown_elements_are_skipped() {
    let document: OtsDocument = r#"<Ots>
        <Network>
            <Node Id="A" Coordinate="(0, 0)"><Decoration Kind="tree"/></Node>
            <Landmark Id="church"><Coordinate>(5, 5)</Coordinate></Landmark>
        </Network>
        <Run><RunLength>1 h</RunLength></Run>
        <Animation/>
    </Ots>"#
        .parse()
        .unwrap();

    let network = document.network.unwrap();
    assert_eq!(network.nodes.len(), 1);
    assert!(network.links.is_empty());
}

#[test]
fn test_expression_accepted_where_value_is_bounded() {
    let node: Node =
        from_fragment(r#"<Node Id="A" Coordinate="{origin}" Direction="{heading}"/>"#).unwrap();
    assert!(node.coordinate.is_expression());
    assert!(node.direction.unwrap().is_expression());
}

#[test]
fn test_from_file_error_has_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "<Ots>\n  <Network>\n    <Node Id=\"A\"/>\n  </Network>\n</Ots>").unwrap();

    let err = OtsDocument::from_file(file.path()).unwrap_err();
    let context = err.context().unwrap();
    assert_eq!(context.file_path.as_deref(), Some(file.path()));
    assert_eq!(context.line, Some(3));
    assert!(err.to_string().contains("Node@Coordinate"));
}

#[test]
fn test_from_file_reads_document() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Ots xmlns="http://www.opentrafficsim.org/ots"><Network><Node Id="A" Coordinate="(1, 2)"/></Network></Ots>"#
    )
    .unwrap();

    let document = OtsDocument::from_file(file.path()).unwrap();
    assert_eq!(document.network.unwrap().nodes[0].id, "A");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = OtsDocument::from_file(dir.path().join("missing.xml")).unwrap_err();
    assert!(matches!(err, OtsError::Io(_)));
}
