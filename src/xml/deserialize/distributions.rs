//! Distribution elements: `<LengthDist LengthUnit="m"><Normal Mu=".." Sigma=".."/></LengthDist>`.

use std::io::BufRead;

use crate::distributions::{
    ConstantDist, ContinuousDistribution, DiscreteDist, DiscreteDistribution, RandomStreamSource,
    UnitDist,
};
use crate::values::Unit;
use crate::xml::deserialize::{DeserializeError, finish, read_choice, required};
use crate::xml::quick::de::{Attrs, ChildElement, XmlCursor};

pub(crate) const CONTINUOUS: &[&str] = &[
    "Constant",
    "Exponential",
    "Triangular",
    "Normal",
    "NormalTrunc",
    "Beta",
    "Erlang",
    "Gamma",
    "LogNormal",
    "LogNormalTrunc",
    "Pearson5",
    "Pearson6",
    "Uniform",
    "Weibull",
];

pub(crate) const DISCRETE: &[&str] = &[
    "Constant",
    "BernoulliI",
    "Binomial",
    "Uniform",
    "Geometric",
    "NegBinomial",
    "Poisson",
];

fn continuous_from_attrs(
    name: &str,
    a: &Attrs,
) -> Result<ContinuousDistribution, DeserializeError> {
    let dist = match name {
        "Constant" => ContinuousDistribution::Constant {
            c: a.get_req_parsed("C")?,
        },
        "Exponential" => ContinuousDistribution::Exponential {
            lambda: a.get_req_parsed("Lambda")?,
        },
        "Triangular" => ContinuousDistribution::Triangular {
            min: a.get_req_parsed("Min")?,
            mode: a.get_req_parsed("Mode")?,
            max: a.get_req_parsed("Max")?,
        },
        "Normal" => ContinuousDistribution::Normal {
            mu: a.get_req_parsed("Mu")?,
            sigma: a.get_req_parsed("Sigma")?,
        },
        "NormalTrunc" => ContinuousDistribution::NormalTrunc {
            mu: a.get_req_parsed("Mu")?,
            sigma: a.get_req_parsed("Sigma")?,
            min: a.get_req_parsed("Min")?,
            max: a.get_req_parsed("Max")?,
        },
        "Beta" => ContinuousDistribution::Beta {
            alpha1: a.get_req_parsed("Alpha1")?,
            alpha2: a.get_req_parsed("Alpha2")?,
        },
        "Erlang" => ContinuousDistribution::Erlang {
            mean: a.get_req_parsed("Mean")?,
            k: a.get_req_parsed("K")?,
        },
        "Gamma" => ContinuousDistribution::Gamma {
            alpha: a.get_req_parsed("Alpha")?,
            beta: a.get_req_parsed("Beta")?,
        },
        "LogNormal" => ContinuousDistribution::LogNormal {
            mu: a.get_req_parsed("Mu")?,
            sigma: a.get_req_parsed("Sigma")?,
        },
        "LogNormalTrunc" => ContinuousDistribution::LogNormalTrunc {
            mu: a.get_req_parsed("Mu")?,
            sigma: a.get_req_parsed("Sigma")?,
            min: a.get_req_parsed("Min")?,
            max: a.get_req_parsed("Max")?,
        },
        "Pearson5" => ContinuousDistribution::Pearson5 {
            alpha: a.get_req_parsed("Alpha")?,
            beta: a.get_req_parsed("Beta")?,
        },
        "Pearson6" => ContinuousDistribution::Pearson6 {
            alpha1: a.get_req_parsed("Alpha1")?,
            alpha2: a.get_req_parsed("Alpha2")?,
            beta: a.get_req_parsed("Beta")?,
        },
        "Uniform" => ContinuousDistribution::Uniform {
            min: a.get_req_parsed("Min")?,
            max: a.get_req_parsed("Max")?,
        },
        "Weibull" => ContinuousDistribution::Weibull {
            alpha: a.get_req_parsed("Alpha")?,
            beta: a.get_req_parsed("Beta")?,
        },
        other => {
            return Err(DeserializeError::UnexpectedElement {
                expected: "a continuous distribution".to_string(),
                found: other.to_string(),
            });
        }
    };
    Ok(dist)
}

fn discrete_from_attrs(name: &str, a: &Attrs) -> Result<DiscreteDistribution, DeserializeError> {
    let dist = match name {
        "Constant" => DiscreteDistribution::Constant {
            c: a.get_req_parsed("C")?,
        },
        "BernoulliI" => DiscreteDistribution::BernoulliI {
            p: a.get_req_parsed("P")?,
        },
        "Binomial" => DiscreteDistribution::Binomial {
            n: a.get_req_parsed("N")?,
            p: a.get_req_parsed("P")?,
        },
        "Uniform" => DiscreteDistribution::Uniform {
            min: a.get_req_parsed("Min")?,
            max: a.get_req_parsed("Max")?,
        },
        "Geometric" => DiscreteDistribution::Geometric {
            p: a.get_req_parsed("P")?,
        },
        "NegBinomial" => DiscreteDistribution::NegBinomial {
            n: a.get_req_parsed("N")?,
            p: a.get_req_parsed("P")?,
        },
        "Poisson" => DiscreteDistribution::Poisson {
            lambda: a.get_req_parsed("Lambda")?,
        },
        other => {
            return Err(DeserializeError::UnexpectedElement {
                expected: "a discrete distribution".to_string(),
                found: other.to_string(),
            });
        }
    };
    Ok(dist)
}

/// Read `<RandomStream><Default/></RandomStream>` or
/// `<RandomStream><Defined>name</Defined></RandomStream>`.
pub(crate) fn read_random_stream<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<RandomStreamSource, DeserializeError> {
    let choice = read_choice(cursor, element, &["Default", "Defined"])?;
    let source = match choice.name.as_str() {
        "Default" => {
            cursor.skip(&choice)?;
            RandomStreamSource::Default
        }
        _ => RandomStreamSource::Defined(cursor.read_string(&choice)?),
    };
    finish(cursor, element)?;
    Ok(source)
}

/// Read the content of a continuous distribution element such as
/// `DoubleDist`, `HeadwayDist` or the body of a unit distribution.
pub(crate) fn read_constant_dist<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<ConstantDist, DeserializeError> {
    let mut distribution = None;
    let mut random_stream = None;

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "RandomStream" => random_stream = Some(read_random_stream(cursor, &child)?),
            name if CONTINUOUS.contains(&name) => {
                if distribution.is_some() {
                    return Err(cursor.error(format!(
                        "{} holds more than one distribution",
                        element.name
                    )));
                }
                distribution = Some(continuous_from_attrs(name, &child.attrs)?);
                cursor.skip(&child)?;
            }
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(ConstantDist {
        distribution: required(cursor, distribution, "distribution")?,
        random_stream,
    })
}

pub(crate) fn read_discrete_dist<R: BufRead>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<DiscreteDist, DeserializeError> {
    let mut distribution = None;
    let mut random_stream = None;

    while let Some(child) = cursor.next_child(element)? {
        match child.name.as_str() {
            "RandomStream" => random_stream = Some(read_random_stream(cursor, &child)?),
            name if DISCRETE.contains(&name) => {
                if distribution.is_some() {
                    return Err(cursor.error(format!(
                        "{} holds more than one distribution",
                        element.name
                    )));
                }
                distribution = Some(discrete_from_attrs(name, &child.attrs)?);
                cursor.skip(&child)?;
            }
            _ => cursor.unexpected(&child)?,
        }
    }

    Ok(DiscreteDist {
        distribution: required(cursor, distribution, "distribution")?,
        random_stream,
    })
}

/// Read a distribution with a unit attribute, e.g. `LengthDist` with `LengthUnit`.
pub(crate) fn read_unit_dist<R: BufRead, U: Unit>(
    cursor: &mut XmlCursor<'_, R>,
    element: &ChildElement,
) -> Result<UnitDist<U>, DeserializeError> {
    let unit: U = element.attrs.get_req_parsed(U::ATTRIBUTE)?;
    let dist = read_constant_dist(cursor, element)?;
    Ok(UnitDist { unit, dist })
}
