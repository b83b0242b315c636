use std::fmt;

use itertools::Itertools;

use crate::types::{Validate, ValidationResult};
use crate::values::ExprValue;

pub fn _chain<T>(
    result: ValidationResult<T>,
    warnings: &mut Vec<String>,
    errors: &mut Vec<String>,
) {
    match result {
        ValidationResult::Valid(_) => {}
        ValidationResult::Warnings(_, warns) => {
            warnings.extend(warns);
        }
        ValidationResult::Invalid(warns, errs) => {
            warnings.extend(warns);
            errors.extend(errs);
        }
    }
}

/// Validate every item and collect the findings, prefixed with `context`.
pub fn _chain_all<'a, V: Validate + 'a>(
    items: impl IntoIterator<Item = &'a V>,
    context: &str,
    warnings: &mut Vec<String>,
    errors: &mut Vec<String>,
) {
    for item in items {
        match item.validate() {
            ValidationResult::Valid(_) => {}
            ValidationResult::Warnings(_, warns) => {
                warnings.extend(warns.into_iter().map(|w| format!("{context}: {w}")));
            }
            ValidationResult::Invalid(warns, errs) => {
                warnings.extend(warns.into_iter().map(|w| format!("{context}: {w}")));
                errors.extend(errs.into_iter().map(|e| format!("{context}: {e}")));
            }
        }
    }
}

pub fn _return(warnings: Vec<String>, errors: Vec<String>) -> ValidationResult {
    if !errors.is_empty() {
        ValidationResult::Invalid(warnings, errors)
    } else if !warnings.is_empty() {
        ValidationResult::Warnings((), warnings)
    } else {
        ValidationResult::Valid(())
    }
}

/// Report every id that occurs more than once.
pub fn validate_unique_ids<'a>(kind: &str, ids: impl IntoIterator<Item = &'a str>) -> ValidationResult {
    let errors = ids
        .into_iter()
        .duplicates()
        .map(|id| format!("duplicate {} id '{}'", kind, id))
        .collect();

    _return(Vec::new(), errors)
}

/// Check that literal values are in non-decreasing order. Expressions are
/// skipped.
pub fn validate_ordered<V: PartialOrd + fmt::Display>(
    names: &[&str],
    values: &[&ExprValue<V>],
) -> ValidationResult {
    let mut errors = Vec::new();
    let literals: Vec<(&str, &V)> = names
        .iter()
        .zip(values)
        .filter_map(|(name, value)| value.value().map(|v| (*name, v)))
        .collect();

    for pair in literals.windows(2) {
        let (first_name, first) = pair[0];
        let (second_name, second) = pair[1];
        if first > second {
            errors.push(format!(
                "{} ({}) must not exceed {} ({})",
                first_name, first, second_name, second
            ));
        }
    }

    _return(Vec::new(), errors)
}

pub fn validate_non_empty<V>(items: &[V], what: &str) -> ValidationResult {
    let mut errors = Vec::new();

    if items.is_empty() {
        errors.push(format!("{} cannot be empty", what));
    }

    _return(Vec::new(), errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_ids_reports_each_duplicate_once() {
        let result = validate_unique_ids("link", ["A", "B", "A", "A"]);
        assert_eq!(result.errors(), ["duplicate link id 'A'".to_string()]);
    }

    #[test]
    fn test_ordered_skips_expressions() {
        let low = ExprValue::Value(1.0);
        let expr: ExprValue<f64> = "{x}".parse().unwrap();
        let high = ExprValue::Value(0.5);
        let result = validate_ordered(&["Min", "Mode", "Max"], &[&low, &expr, &high]);
        assert_eq!(result.errors(), ["Min (1) must not exceed Max (0.5)".to_string()]);
    }

    #[test]
    fn test_return_with_warnings_only() {
        let result = _return(vec!["w".to_string()], Vec::new());
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
    }
}
