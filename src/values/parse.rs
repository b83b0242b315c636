//! nom parsers for the structured text forms of OTS values.

use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, rest},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, pair, preceded},
};

/// Parse whitespace around an inner parser.
fn ws<'a, P, O>(inner: P) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse a number followed by (optionally space separated) unit text.
fn number_and_unit(input: &str) -> IResult<&str, (f64, &str)> {
    pair(preceded(multispace0, double), preceded(multispace0, rest)).parse(input)
}

/// Split `"12.5 km/h"` into `(12.5, "km/h")`. The unit may be empty.
pub fn split_quantity(text: &str) -> Option<(f64, &str)> {
    number_and_unit(text)
        .ok()
        .map(|(_, (value, unit))| (value, unit.trim()))
}

/// Parse `{expression}` and return the inner text.
fn braced(input: &str) -> IResult<&str, &str> {
    delimited(
        char('{'),
        take_while1(|c: char| c != '{' && c != '}'),
        char('}'),
    )
    .parse(input)
}

/// Extract the body of an expression written as `{...}`.
pub fn expression_body(text: &str) -> Option<&str> {
    all_consuming(ws(braced))
        .parse(text)
        .ok()
        .map(|(_, body)| body)
}

/// Parse a parenthesised, comma separated list of numbers: `(1, 2.5, -3)`.
fn number_tuple(input: &str) -> IResult<&str, Vec<f64>> {
    delimited(
        ws(char('(')),
        separated_list1(ws(char(',')), ws(double)),
        ws(char(')')),
    )
    .parse(input)
}

pub fn tuple(text: &str) -> Option<Vec<f64>> {
    all_consuming(number_tuple)
        .parse(text)
        .ok()
        .map(|(_, values)| values)
}

/// Parse `END-<length>` with optional spaces around the `-`.
fn end_offset(input: &str) -> IResult<&str, &str> {
    preceded(
        (multispace0, tag("END"), multispace0, char('-'), multispace0),
        rest,
    )
    .parse(input)
}

/// The length text of a position written as `END-<length>`.
pub fn before_end(text: &str) -> Option<&str> {
    end_offset(text).ok().map(|(_, length)| length.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_quantity() {
        assert_eq!(split_quantity("12.5 km/h"), Some((12.5, "km/h")));
        assert_eq!(split_quantity("3m"), Some((3.0, "m")));
        assert_eq!(split_quantity("-1e2 s"), Some((-100.0, "s")));
        assert_eq!(split_quantity("7"), Some((7.0, "")));
        assert_eq!(split_quantity("m"), None);
    }

    #[test]
    fn test_expression_body() {
        assert_eq!(expression_body("{a + b}"), Some("a + b"));
        assert_eq!(expression_body("  {x} "), Some("x"));
        assert_eq!(expression_body("{}"), None);
        assert_eq!(expression_body("{a}{b}"), None);
        assert_eq!(expression_body("a"), None);
    }

    #[test]
    fn test_before_end() {
        assert_eq!(before_end("END-20 m"), Some("20 m"));
        assert_eq!(before_end("END - 5 m "), Some("5 m"));
        assert_eq!(before_end("END"), None);
        assert_eq!(before_end("BEGIN-5 m"), None);
    }

    #[test]
    fn test_tuple() {
        assert_eq!(tuple("(1, 2)"), Some(vec![1.0, 2.0]));
        assert_eq!(tuple(" ( 1.5 ,-2,3 ) "), Some(vec![1.5, -2.0, 3.0]));
        assert_eq!(tuple("(1, 2"), None);
        assert_eq!(tuple("()"), None);
    }
}
