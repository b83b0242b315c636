use std::io::Write;

use crate::distributions::{
    ConstantDist, ContinuousDistribution, DiscreteDist, DiscreteDistribution, RandomStreamSource,
    UnitDist,
};
use crate::values::Unit;
use crate::xml::quick::ser::{AttrList, XmlEmitter};
use crate::xml::serialize::SerializeError;

fn continuous_attrs(dist: &ContinuousDistribution) -> AttrList {
    let mut a = AttrList::new();
    match dist {
        ContinuousDistribution::Constant { c } => {
            a.add_value("C", c);
        }
        ContinuousDistribution::Exponential { lambda } => {
            a.add_value("Lambda", lambda);
        }
        ContinuousDistribution::Triangular { min, mode, max } => {
            a.add_value("Min", min).add_value("Mode", mode).add_value("Max", max);
        }
        ContinuousDistribution::Normal { mu, sigma } => {
            a.add_value("Mu", mu).add_value("Sigma", sigma);
        }
        ContinuousDistribution::LogNormal { mu, sigma } => {
            a.add_value("Mu", mu).add_value("Sigma", sigma);
        }
        ContinuousDistribution::NormalTrunc { mu, sigma, min, max } => {
            a.add_value("Mu", mu)
                .add_value("Sigma", sigma)
                .add_value("Min", min)
                .add_value("Max", max);
        }
        ContinuousDistribution::LogNormalTrunc { mu, sigma, min, max } => {
            a.add_value("Mu", mu)
                .add_value("Sigma", sigma)
                .add_value("Min", min)
                .add_value("Max", max);
        }
        ContinuousDistribution::Beta { alpha1, alpha2 } => {
            a.add_value("Alpha1", alpha1).add_value("Alpha2", alpha2);
        }
        ContinuousDistribution::Erlang { mean, k } => {
            a.add_value("Mean", mean).add_value("K", k);
        }
        ContinuousDistribution::Gamma { alpha, beta } => {
            a.add_value("Alpha", alpha).add_value("Beta", beta);
        }
        ContinuousDistribution::Pearson5 { alpha, beta }
        | ContinuousDistribution::Weibull { alpha, beta } => {
            a.add_value("Alpha", alpha).add_value("Beta", beta);
        }
        ContinuousDistribution::Pearson6 {
            alpha1,
            alpha2,
            beta,
        } => {
            a.add_value("Alpha1", alpha1)
                .add_value("Alpha2", alpha2)
                .add_value("Beta", beta);
        }
        ContinuousDistribution::Uniform { min, max } => {
            a.add_value("Min", min).add_value("Max", max);
        }
    }
    a
}

fn discrete_attrs(dist: &DiscreteDistribution) -> AttrList {
    let mut a = AttrList::new();
    match dist {
        DiscreteDistribution::Constant { c } => {
            a.add_value("C", c);
        }
        DiscreteDistribution::BernoulliI { p } | DiscreteDistribution::Geometric { p } => {
            a.add_value("P", p);
        }
        DiscreteDistribution::Binomial { n, p } | DiscreteDistribution::NegBinomial { n, p } => {
            a.add_value("N", n).add_value("P", p);
        }
        DiscreteDistribution::Uniform { min, max } => {
            a.add_value("Min", min).add_value("Max", max);
        }
        DiscreteDistribution::Poisson { lambda } => {
            a.add_value("Lambda", lambda);
        }
    }
    a
}

pub(crate) fn write_random_stream<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    source: &RandomStreamSource,
) -> Result<(), SerializeError> {
    emit.elem("RandomStream", &AttrList::new(), |emit| match source {
        RandomStreamSource::Default => emit.empty_elem("Default"),
        RandomStreamSource::Defined(name) => emit.text_elem("Defined", name),
    })
}

fn write_dist_body<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    distribution: &ContinuousDistribution,
    random_stream: Option<&RandomStreamSource>,
) -> Result<(), SerializeError> {
    emit.empty_elem_with_attrs(distribution.kind(), &continuous_attrs(distribution))?;
    if let Some(stream) = random_stream {
        write_random_stream(emit, stream)?;
    }
    Ok(())
}

/// Write a continuous distribution under the element name `name`.
pub(crate) fn write_constant_dist<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    name: &str,
    attrs: &AttrList,
    dist: &ConstantDist,
) -> Result<(), SerializeError> {
    emit.elem(name, attrs, |emit| {
        write_dist_body(emit, &dist.distribution, dist.random_stream.as_ref())
    })
}

pub(crate) fn write_discrete_dist<W: Write>(
    emit: &mut XmlEmitter<'_, W>,
    name: &str,
    attrs: &AttrList,
    dist: &DiscreteDist,
) -> Result<(), SerializeError> {
    emit.elem(name, attrs, |emit| {
        let kind = dist.distribution.kind();
        emit.empty_elem_with_attrs(kind, &discrete_attrs(&dist.distribution))?;
        if let Some(stream) = &dist.random_stream {
            write_random_stream(emit, stream)?;
        }
        Ok(())
    })
}

/// Write a distribution with its unit attribute, after any attributes in `attrs`.
pub(crate) fn write_unit_dist<W: Write, U: Unit>(
    emit: &mut XmlEmitter<'_, W>,
    name: &str,
    mut attrs: AttrList,
    dist: &UnitDist<U>,
) -> Result<(), SerializeError> {
    attrs.add_value(U::ATTRIBUTE, &dist.unit);
    write_constant_dist(emit, name, &attrs, &dist.dist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{DoublePositive, ExprValue, SpeedUnit};
    use quick_xml::Writer;

    #[test]
    fn test_write_unit_dist() {
        let dist = UnitDist::new(
            SpeedUnit::KilometerPerHour,
            ContinuousDistribution::Uniform {
                min: ExprValue::Value(150.0),
                max: ExprValue::Value(200.0),
            },
        );
        let mut output = Vec::new();
        let mut writer = Writer::new(&mut output);
        let mut emit = XmlEmitter::new(&mut writer);
        write_unit_dist(&mut emit, "MaxSpeedDist", AttrList::new(), &dist).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            r#"<MaxSpeedDist SpeedUnit="km/h"><Uniform Min="150" Max="200"/></MaxSpeedDist>"#
        );
    }

    #[test]
    fn test_write_discrete_with_stream() {
        let dist = DiscreteDist {
            distribution: DiscreteDistribution::Poisson {
                lambda: ExprValue::Value(DoublePositive::new(2.0).unwrap()),
            },
            random_stream: Some(RandomStreamSource::Defined("generation".to_string())),
        };
        let mut output = Vec::new();
        let mut writer = Writer::new(&mut output);
        let mut emit = XmlEmitter::new(&mut writer);
        write_discrete_dist(&mut emit, "IntegerDist", &AttrList::new(), &dist).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            r#"<IntegerDist><Poisson Lambda="2"/><RandomStream><Defined>generation</Defined></RandomStream></IntegerDist>"#
        );
    }
}
