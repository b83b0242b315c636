use ots_schema::distributions::{ContinuousDistribution, DiscreteDistribution, RandomStreamSource};
use ots_schema::model::{ModelParameterEntry, ModelParameters, ParameterValue};
use ots_schema::types::Validate;
use ots_schema::values::{ExprValue, LengthUnit};
use ots_schema::xml::{from_fragment, to_fragment};
use pretty_assertions::assert_eq;

fn parameters(body: &str) -> ModelParameters {
    let xml = format!("<ModelParameters>{}</ModelParameters>", body);
    from_fragment(&xml).unwrap_or_else(|e| panic!("Failed to parse {}: {}", body, e))
}

fn values(parameters: &ModelParameters) -> Vec<&ParameterValue> {
    parameters
        .entries
        .iter()
        .filter_map(|entry| match entry {
            ModelParameterEntry::Parameter(parameter) => Some(&parameter.value),
            ModelParameterEntry::Correlation(_) => None,
        })
        .collect()
}

#[test]
fn test_continuous_kinds() {
    let cases = [
        (r#"<Constant C="1.5"/>"#, "Constant"),
        (r#"<Exponential Lambda="0.5"/>"#, "Exponential"),
        (r#"<Triangular Min="1" Mode="2" Max="4"/>"#, "Triangular"),
        (r#"<Normal Mu="0" Sigma="1"/>"#, "Normal"),
        (r#"<NormalTrunc Mu="0" Sigma="1" Min="-2" Max="2"/>"#, "NormalTrunc"),
        (r#"<Beta Alpha1="2" Alpha2="5"/>"#, "Beta"),
        (r#"<Erlang Mean="3" K="2"/>"#, "Erlang"),
        (r#"<Gamma Alpha="2" Beta="0.5"/>"#, "Gamma"),
        (r#"<LogNormal Mu="1" Sigma="0.25"/>"#, "LogNormal"),
        (r#"<LogNormalTrunc Mu="1" Sigma="0.25" Min="1" Max="5"/>"#, "LogNormalTrunc"),
        (r#"<Pearson5 Alpha="3" Beta="2"/>"#, "Pearson5"),
        (r#"<Pearson6 Alpha1="2" Alpha2="3" Beta="1"/>"#, "Pearson6"),
        (r#"<Uniform Min="0" Max="10"/>"#, "Uniform"),
        (r#"<Weibull Alpha="1.5" Beta="2"/>"#, "Weibull"),
    ];

    let body: String = cases
        .iter()
        .enumerate()
        .map(|(i, (dist, _))| format!(r#"<DoubleDist Id="p{}">{}</DoubleDist>"#, i, dist))
        .collect();
    let parameters = parameters(&body);

    let kinds: Vec<_> = values(&parameters)
        .into_iter()
        .map(|value| match value {
            ParameterValue::DoubleDist(dist) => {
                assert!(dist.validate().is_valid());
                dist.distribution.kind()
            }
            other => panic!("expected DoubleDist, got {:?}", other),
        })
        .collect();
    let expected: Vec<_> = cases.iter().map(|(_, kind)| *kind).collect();
    assert_eq!(kinds, expected);

    let written = to_fragment(&parameters).unwrap();
    assert_eq!(from_fragment::<ModelParameters>(&written).unwrap(), parameters);
}

#[test]
fn test_discrete_kinds() {
    let parameters = parameters(
        r#"<IntegerDist Id="a"><Constant C="3"/></IntegerDist>
        <IntegerDist Id="b"><BernoulliI P="0.5"/></IntegerDist>
        <IntegerDist Id="c"><Binomial N="4" P="0.5"/></IntegerDist>
        <IntegerDist Id="d"><Uniform Min="1" Max="6"/></IntegerDist>
        <IntegerDist Id="e"><Geometric P="0.1"/></IntegerDist>
        <IntegerDist Id="f"><NegBinomial N="2" P="0.3"/></IntegerDist>
        <IntegerDist Id="g"><Poisson Lambda="1.5"/></IntegerDist>"#,
    );

    let kinds: Vec<_> = values(&parameters)
        .into_iter()
        .map(|value| match value {
            ParameterValue::IntegerDist(dist) => dist.distribution.kind(),
            other => panic!("expected IntegerDist, got {:?}", other),
        })
        .collect();
    assert_eq!(
        kinds,
        ["Constant", "BernoulliI", "Binomial", "Uniform", "Geometric", "NegBinomial", "Poisson"]
    );
}

#[test]
fn test_unit_distribution() {
    let parameters = parameters(
        r#"<LengthDist Id="s0" LengthUnit="m">
            <Triangular Min="1" Mode="{mode}" Max="4"/>
            <RandomStream><Defined>parameters</Defined></RandomStream>
        </LengthDist>"#,
    );

    let ParameterValue::LengthDist(dist) = values(&parameters)[0] else {
        panic!("expected LengthDist");
    };
    assert_eq!(dist.unit, LengthUnit::Meter);
    assert_eq!(
        dist.dist.effective_random_stream(),
        RandomStreamSource::Defined("parameters".to_string())
    );
    match &dist.dist.distribution {
        ContinuousDistribution::Triangular { min, mode, max } => {
            assert_eq!(*min, ExprValue::Value(1.0));
            assert!(mode.is_expression());
            assert_eq!(*max, ExprValue::Value(4.0));
        }
        other => panic!("expected Triangular, got {:?}", other),
    }
    // Order checks skip expressions.
    assert!(dist.validate().is_valid());
}

#[test]
fn test_bounds_are_checked_while_reading() {
    for dist in [
        r#"<DoubleDist Id="x"><Exponential Lambda="0"/></DoubleDist>"#,
        r#"<DoubleDist Id="x"><Normal Mu="0" Sigma="-1"/></DoubleDist>"#,
        r#"<IntegerDist Id="x"><BernoulliI P="1.5"/></IntegerDist>"#,
        r#"<IntegerDist Id="x"><Binomial N="0" P="0.5"/></IntegerDist>"#,
    ] {
        let xml = format!("<ModelParameters>{}</ModelParameters>", dist);
        assert!(
            from_fragment::<ModelParameters>(&xml).is_err(),
            "{} should be rejected",
            dist
        );
    }
}

#[test]
fn test_order_is_checked_by_validation() {
    let parameters = parameters(r#"<DoubleDist Id="x"><Uniform Min="5" Max="1"/></DoubleDist>"#);
    let ParameterValue::DoubleDist(dist) = values(&parameters)[0] else {
        panic!("expected DoubleDist");
    };
    assert!(!dist.validate().is_valid());

    let discrete = DiscreteDistribution::Uniform {
        min: ExprValue::Value(6),
        max: ExprValue::Value(1),
    };
    assert_eq!(discrete.validate().errors().len(), 1);
}
