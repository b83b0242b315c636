use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{SchemaValue, ValueError, parse};

/// The body of an expression value, stored without its braces.
///
/// Expressions are evaluated by the consuming simulator; here they are opaque
/// text. The body is non-empty and contains no `{` or `}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Expression(String);

impl Expression {
    pub fn new(body: impl Into<String>) -> Result<Self, ValueError> {
        let body = body.into();
        if body.trim().is_empty() || body.contains(['{', '}']) {
            return Err(ValueError::InvalidExpression(body));
        }
        Ok(Self(body))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Expression {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Expression> for String {
    fn from(value: Expression) -> Self {
        value.0
    }
}

impl FromStr for Expression {
    type Err = ValueError;

    /// Parses the braced form `{...}`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::expression_body(s)
            .ok_or_else(|| ValueError::InvalidExpression(s.to_string()))
            .and_then(Self::new)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0)
    }
}

/// A literal value or an expression that produces one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprValue<T> {
    Value(T),
    Expression(Expression),
}

impl<T> ExprValue<T> {
    /// The literal value, if this is not an expression.
    pub fn value(&self) -> Option<&T> {
        match self {
            ExprValue::Value(value) => Some(value),
            ExprValue::Expression(_) => None,
        }
    }

    pub fn expression(&self) -> Option<&Expression> {
        match self {
            ExprValue::Value(_) => None,
            ExprValue::Expression(expression) => Some(expression),
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, ExprValue::Expression(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExprValue<U> {
        match self {
            ExprValue::Value(value) => ExprValue::Value(f(value)),
            ExprValue::Expression(expression) => ExprValue::Expression(expression),
        }
    }
}

impl<T> From<T> for ExprValue<T> {
    fn from(value: T) -> Self {
        ExprValue::Value(value)
    }
}

impl<T: SchemaValue> FromStr for ExprValue<T> {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim_start().starts_with('{') {
            return s.parse().map(ExprValue::Expression);
        }
        T::parse_value(s).map(ExprValue::Value)
    }
}

impl<T: SchemaValue> fmt::Display for ExprValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprValue::Value(value) => f.write_str(&value.format_value()),
            ExprValue::Expression(expression) => expression.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{Length, LengthUnit};

    #[test]
    fn test_literal_and_expression() {
        let literal: ExprValue<f64> = "2.5".parse().unwrap();
        assert_eq!(literal, ExprValue::Value(2.5));

        let expr: ExprValue<f64> = "{ speedFactor * 2 }".parse().unwrap();
        assert_eq!(expr.expression().unwrap().as_str(), " speedFactor * 2 ");
        assert_eq!(expr.to_string(), "{ speedFactor * 2 }");
    }

    #[test]
    fn test_invalid_expression() {
        assert!("{}".parse::<ExprValue<f64>>().is_err());
        assert!("{  }".parse::<ExprValue<f64>>().is_err());
        assert!("{a}}".parse::<ExprValue<f64>>().is_err());
        assert!(Expression::new("a{b").is_err());
    }

    #[test]
    fn test_quantity_expression() {
        let value: ExprValue<Length> = "12 km".parse().unwrap();
        assert_eq!(
            value.value().copied(),
            Some(Length::new(12.0, LengthUnit::Kilometer))
        );
        let expr: ExprValue<Length> = "{laneWidth}".parse().unwrap();
        assert!(expr.is_expression());
    }

    #[test]
    fn test_string_value_is_verbatim() {
        let value: ExprValue<String> = " A B ".parse().unwrap();
        assert_eq!(value, ExprValue::Value(" A B ".to_string()));
    }
}
