//! Round-trip tests for OTS parsing and serialization.
//!
//! A document is parsed, written back to XML and parsed again; both parses
//! must produce the same document.

use ots_schema::document::OtsDocument;
use ots_schema::model::{ModelType, ParameterValue, ScalarValue};
use ots_schema::network::{LinkGeometry, LinkLayout};
use ots_schema::xml::{WriteOptions, from_fragment, to_fragment};
use ots_schema::network::Link;
use pretty_assertions::assert_eq;

const FULL_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Ots xmlns="http://www.opentrafficsim.org/ots">
    <Definitions>
        <GtuTypes>
            <GtuType Id="NL.VEHICLE" Default="true"/>
            <GtuType Id="NL.CAR" Parent="NL.VEHICLE"/>
            <GtuType Id="NL.TRUCK" Parent="NL.VEHICLE"/>
        </GtuTypes>
        <GtuTemplates>
            <GtuTemplate Id="CAR" GtuType="NL.CAR">
                <LengthDist LengthUnit="m"><Constant C="4.19"/></LengthDist>
                <WidthDist LengthUnit="m"><Constant C="1.7"/></WidthDist>
                <MaxSpeedDist SpeedUnit="km/h"><Uniform Min="150" Max="200"/></MaxSpeedDist>
                <MaxAccelerationDist AccelerationUnit="m/s2"><Normal Mu="3" Sigma="0.5"/></MaxAccelerationDist>
            </GtuTemplate>
        </GtuTemplates>
        <StripeTypes>
            <StripeType Id="DASHED" LateralSync="LINEAR">
                <Elements>
                    <Line Width="0.2 m" Color="WHITE"><Dashed><Gap>9 m</Gap><Dash>3 m</Dash></Dashed></Line>
                </Elements>
                <DashOffset><SyncUpstream/></DashOffset>
            </StripeType>
        </StripeTypes>
        <RoadLayouts>
            <RoadLayout Id="TWO_LANES">
                <Stripe><DefinedStripe>DASHED</DefinedStripe><CenterOffset>0 m</CenterOffset></Stripe>
                <Lane Id="L1" LaneType="FREEWAY"><CenterOffset>1.75 m</CenterOffset><Width>3.5 m</Width></Lane>
                <Lane Id="L2" LaneType="FREEWAY"><CenterOffset>-1.75 m</CenterOffset><Width>3.5 m</Width></Lane>
            </RoadLayout>
        </RoadLayouts>
    </Definitions>
    <Network>
        <Flattener><NumSegments>64</NumSegments></Flattener>
        <Conflicts><DefaultWidth/></Conflicts>
        <Node Id="A" Coordinate="(0, 0)" Direction="0 deg"/>
        <Node Id="B" Coordinate="(500, 0)" Direction="0 deg"/>
        <Node Id="C" Coordinate="(900, 200, 5)"/>
        <Node Id="D" Coordinate="(1200, 300)"/>
        <Node Id="E" Coordinate="(1500, 300)"/>
        <Link Id="AB" Type="FREEWAY" NodeStart="A" NodeEnd="B" OffsetStart="0.5 m" LaneKeeping="KEEPLANE" Priority="PRIORITY">
            <Straight/>
            <RoadLayout>
                <SpeedLimit GtuType="NL.VEHICLE" LegalSpeedLimit="100 km/h"/>
                <Stripe LeftChangeLane="true" RightChangeLane="false">
                    <Elements>
                        <Line Width="0.2 m" Color="#FFFF00"><Continuous/></Line>
                        <Gap Width="0.1 m"/>
                        <Line Width="0.2 m" Color="WHITE"><Dashed><Gap>9 m</Gap><Dash>3 m</Dash></Dashed></Line>
                    </Elements>
                    <DashOffset><Fixed Offset="1 m"/></DashOffset>
                    <Compatibility GtuType="NL.TRUCK" Direction="LEFT"/>
                    <LeftOffset>3.5 m</LeftOffset>
                </Stripe>
                <Lane Id="L1" LaneType="FREEWAY">
                    <CenterOffsetStart>1.75 m</CenterOffsetStart>
                    <CenterOffsetEnd>2 m</CenterOffsetEnd>
                    <WidthStart>3.5 m</WidthStart>
                    <WidthEnd>3.25 m</WidthEnd>
                    <SpeedLimit GtuType="NL.TRUCK" LegalSpeedLimit="80 km/h"/>
                </Lane>
                <Shoulder><RightOffset>-1 m</RightOffset><Width>2 m</Width></Shoulder>
                <NoTrafficLane Id="median"><Width>1 m</Width></NoTrafficLane>
            </RoadLayout>
            <TrafficLight Id="TL1" Lane="L1" Position="END-10 m"><TurnOnRed>C</TurnOnRed></TrafficLight>
            <TrafficLightSensor Id="S1" Type="TRAFFIC_LIGHT" Lane="L1" EntryPosition="END-50 m" ExitPosition="END-45 m"/>
        </Link>
        <Link Id="BC" Type="FREEWAY" NodeStart="B" NodeEnd="C">
            <Bezier Shape="0.8" Weighted="true"><Flattener><MaxDeviation>0.1 m</MaxDeviation><MaxAngle>1 deg</MaxAngle></Flattener></Bezier>
            <DefinedLayout>TWO_LANES</DefinedLayout>
            <LaneOverride Lane="L1"><SpeedLimit GtuType="NL.CAR" LegalSpeedLimit="80 km/h"/></LaneOverride>
            <StripeOverride Stripe="S1" LeftChangeLane="false"/>
        </Link>
        <Link Id="CD" Type="FREEWAY" NodeStart="C" NodeEnd="D">
            <Clothoid EndElevation="2 m"><Length>320 m</Length><StartCurvature>0 /m</StartCurvature><EndCurvature>0.002 /m</EndCurvature></Clothoid>
            <DefinedLayout>TWO_LANES</DefinedLayout>
        </Link>
        <Link Id="DE" Type="FREEWAY" NodeStart="D" NodeEnd="E">
            <Arc Radius="400 m" Direction="LEFT"/>
            <DefinedLayout>TWO_LANES</DefinedLayout>
        </Link>
        <Link Id="EA" Type="URBAN" NodeStart="E" NodeEnd="A">
            <Polyline><Coordinate>(1500, 300)</Coordinate><Coordinate>(0, 300)</Coordinate><Coordinate>(0, 0)</Coordinate></Polyline>
            <RoadLayout>
                <Lane Id="L1" LaneType="URBAN"><Width>{laneWidth}</Width></Lane>
            </RoadLayout>
        </Link>
    </Network>
    <Demand>
        <OdOptions Id="OPTIONS">
            <OdOptionsItem>
                <Global/>
                <DefaultModel><Id>CAR_MODEL</Id></DefaultModel>
                <Model GtuType="NL.TRUCK"><ModelIdReferral>truckModel</ModelIdReferral></Model>
                <NoLaneChange>10 m</NoLaneChange>
                <RoomChecker>CF_BA</RoomChecker>
                <HeadwayDist>EXPONENTIAL</HeadwayDist>
                <Markov><State GtuType="NL.TRUCK" Correlation="0.4"/></Markov>
            </OdOptionsItem>
            <OdOptionsItem>
                <Lane Link="AB" Lane="L1"/>
                <LaneBiases>
                    <LaneBias GtuType="NL.TRUCK"><FromRight/><LeftSpeed>50 km/h</LeftSpeed><RightSpeed>80 km/h</RightSpeed><Bias>0.5</Bias><StickyLanes>2</StickyLanes></LaneBias>
                    <DefinedLaneBias GtuType="NL.CAR"/>
                </LaneBiases>
            </OdOptionsItem>
        </OdOptions>
        <Od Id="OD1" Options="OPTIONS">
            <GlobalTime><Time>0 s</Time><Time>1 h</Time></GlobalTime>
            <GlobalInterpolation>STEPWISE</GlobalInterpolation>
            <GlobalFactor>1.25</GlobalFactor>
            <Category Id="CAR" GtuType="NL.CAR"><Lane Link="AB" Lane="L1"/></Category>
            <Cell Origin="A" Destination="E" Category="CAR">
                <Level>1000/h</Level>
                <Level>1500/h</Level>
            </Cell>
        </Od>
        <InjectionGenerator NoLaneChangeDistance="20 m">
            <Position Link="AB" Lane="L1" Position="0 m"/>
            <GtuCharacteristics><GtuTemplate>CAR</GtuTemplate><ShortestRoute>A-E</ShortestRoute></GtuCharacteristics>
            <TimeToCollision>1.5 s</TimeToCollision>
            <RandomStream><Defined>generation</Defined></RandomStream>
            <Arrivals>
                <Arrival Id="1" Speed="100 km/h">0 s</Arrival>
                <Arrival Id="2" Lane="L1" Length="12 m">4.5 s</Arrival>
            </Arrivals>
        </InjectionGenerator>
    </Demand>
    <Models>
        <Model Id="CAR_MODEL" GtuType="NL.CAR">
            <ModelParameters>
                <Duration Id="Tmax">1.2 s</Duration>
                <DoubleDist Id="fSpeed"><Normal Mu="1" Sigma="0.1"/></DoubleDist>
                <SpeedDist Id="vGain" SpeedUnit="km/h"><LogNormal Mu="3.3789" Sigma="0.4"/></SpeedDist>
                <Correlation Expression="0.5 * then">
                    <First><Duration>Tmax</Duration></First>
                    <Then><Double>fSpeed</Double></Then>
                </Correlation>
                <IntegerDist Id="n"><Poisson Lambda="2"/></IntegerDist>
            </ModelParameters>
            <StrategicalPlanner><Route><Shortest/></Route></StrategicalPlanner>
            <TacticalPlanner><Lmrs>
                <CarFollowingModel><IdmPlus>
                    <DesiredHeadwayModel><Idm/></DesiredHeadwayModel>
                    <DesiredSpeedModel><Class>org.example.Speed</Class></DesiredSpeedModel>
                </IdmPlus></CarFollowingModel>
                <Synchronization>ALIGN_GAP</Synchronization>
                <Cooperation>{coop}</Cooperation>
                <GapAcceptance>EGO_HEADWAY</GapAcceptance>
                <Tailgating>PRESSURE</Tailgating>
                <MandatoryIncentives><Route/><GetInLane/></MandatoryIncentives>
                <VoluntaryIncentives><Keep/></VoluntaryIncentives>
                <Perception>
                    <Categories><Ego/><Neighbors/></Categories>
                    <HeadwayGtuType><Perceived><Estimation>UNDERESTIMATION</Estimation><Anticipation>CONSTANT_SPEED</Anticipation></Perceived></HeadwayGtuType>
                    <Mental><Fuller>
                        <Task>org.example.Task</Task>
                        <BehavioralAdaptations><Headway/></BehavioralAdaptations>
                        <TaskManager>ANTICIPATION_RELIANCE</TaskManager>
                    </Fuller></Mental>
                </Perception>
            </Lmrs></TacticalPlanner>
        </Model>
        <Model Id="TRUCK_MODEL" Parent="CAR_MODEL" GtuType="NL.TRUCK">
            <StrategicalPlanner><Route><None/></Route></StrategicalPlanner>
        </Model>
    </Models>
    <Scenarios>
        <DefaultInputParameters>
            <Double Id="factor">1</Double>
            <Length Id="laneWidth">3.5 m</Length>
            <Double Id="coop">0.5</Double>
        </DefaultInputParameters>
        <Scenario Id="busy">
            <InputParameters><Double Id="factor">1.5</Double></InputParameters>
            <ModelIdReferral Id="truckModel" ModelId="TRUCK_MODEL"/>
        </Scenario>
    </Scenarios>
    <Control>
        <FixedTime Id="FT1" CycleTime="90 s" Offset="5 s">
            <SignalGroup Id="SG1"><TrafficLight Link="AB" TrafficLightId="TL1"/></SignalGroup>
            <Cycle SignalGroupId="SG1" Offset="0 s" PreGreen="2 s" Green="30 s" Yellow="3 s"/>
        </FixedTime>
        <TrafCod Id="TC1">
            <SignalGroup Id="SG1"><TrafficLight Link="AB" TrafficLightId="TL1"/></SignalGroup>
            <Detector Id="D1" Type="TRAFCOD">
                <SingleLane><Link>AB</Link><Lane>L1</Lane><EntryPosition>END-50 m</EntryPosition><ExitPosition>END-45 m</ExitPosition></SingleLane>
            </Detector>
            <Program Space="preserve">
  rule 1
  rule 2
</Program>
            <Console>
                <Map Type="PNG" Encoding="base64">iVBORw0K</Map>
                <CoordinatesFile>coords.txt</CoordinatesFile>
            </Console>
        </TrafCod>
    </Control>
</Ots>"#;

/// Parse → write → parse, and check both parses agree.
fn round_trip(xml: &str, options: &WriteOptions) -> OtsDocument {
    let first: OtsDocument = xml
        .parse()
        .unwrap_or_else(|e| panic!("Failed to parse document: {}", e));
    let written = first
        .to_xml_with(options)
        .unwrap_or_else(|e| panic!("Failed to write document: {}", e));
    let second: OtsDocument = written
        .parse()
        .unwrap_or_else(|e| panic!("Failed to re-parse written document: {}\n{}", e, written));
    assert_eq!(first, second);
    second
}

#[test]
fn test_round_trip_full_document() {
    let document = round_trip(FULL_DOCUMENT, &WriteOptions::default());

    assert_eq!(document.definitions.as_ref().unwrap().gtu_types.len(), 3);
    let network = document.network.as_ref().unwrap();
    assert_eq!(network.nodes.len(), 5);
    let kinds: Vec<_> = network.links.iter().map(|link| link.geometry.kind()).collect();
    assert_eq!(kinds, ["Straight", "Bezier", "Clothoid", "Arc", "Polyline"]);
    assert_eq!(document.models.len(), 2);
    assert_eq!(document.control.as_ref().unwrap().programs.len(), 2);
}

#[test]
fn test_round_trip_compact() {
    round_trip(FULL_DOCUMENT, &WriteOptions::compact());
}

#[test]
fn test_written_document_is_stable() {
    let document: OtsDocument = FULL_DOCUMENT.parse().unwrap();
    let once = document.to_xml().unwrap();
    let twice = once.parse::<OtsDocument>().unwrap().to_xml().unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_round_trip_keeps_section_order() {
    let written = FULL_DOCUMENT
        .parse::<OtsDocument>()
        .unwrap()
        .to_xml()
        .unwrap();
    let positions: Vec<usize> = [
        "<Definitions>",
        "<Network>",
        "<Demand>",
        "<Models>",
        "<Scenarios>",
        "<Control>",
    ]
    .iter()
    .map(|tag| written.find(tag).unwrap_or_else(|| panic!("{} not written", tag)))
    .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_round_trip_program_text() {
    let document: OtsDocument = FULL_DOCUMENT.parse().unwrap();
    let written = document.to_xml().unwrap();
    assert!(written.contains("<Program Space=\"preserve\">\n  rule 1\n  rule 2\n</Program>"));
}

#[test]
fn test_round_trip_through_json() {
    let document: OtsDocument = FULL_DOCUMENT.parse().unwrap();
    let json = serde_json::to_string(&document).unwrap();
    let restored: OtsDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(document, restored);
}

#[test]
fn test_fragment_round_trip() {
    let xml = r#"<Link Id="BC" Type="FREEWAY" NodeStart="B" NodeEnd="C"><Bezier Shape="0.8"/><DefinedLayout>TWO_LANES</DefinedLayout><LaneOverride Lane="L1"/></Link>"#;
    let link: Link = from_fragment(xml).unwrap();
    assert!(matches!(link.geometry, LinkGeometry::Bezier(_)));
    assert!(matches!(&link.layout, LinkLayout::Defined { lane_overrides, .. } if lane_overrides.len() == 1));
    assert_eq!(to_fragment(&link).unwrap(), xml);
}

#[test]
fn test_model_fragment_without_id_round_trips() {
    let xml = r#"<Model GtuType="NL.CAR"><ModelParameters><Integer Id="seed">3000000000</Integer></ModelParameters></Model>"#;
    let model: ModelType = from_fragment(xml).unwrap();
    assert!(model.id.is_none());
    let seed = model.parameters.as_ref().and_then(|p| p.parameter("seed"));
    assert!(matches!(
        seed.map(|p| &p.value),
        Some(ParameterValue::Scalar(ScalarValue::Integer(_)))
    ));
    assert_eq!(to_fragment(&model).unwrap(), xml);
}

#[test]
fn test_round_trip_through_file() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let document: OtsDocument = FULL_DOCUMENT.parse()?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("scenario.xml");
    document.write_to(std::fs::File::create(&path)?, &WriteOptions::default())?;

    assert_eq!(OtsDocument::from_file(&path)?, document);
    Ok(())
}
