/// The outcome of a validation pass.
///
/// Validation never fails early: every problem found is collected, so a
/// caller can report all of them at once. Warnings do not make a document
/// invalid.
///
/// # Examples
///
/// ```rust
/// use ots_schema::types::ValidationResult;
///
/// let result: ValidationResult = ValidationResult::Warnings((), vec!["unused".to_string()]);
/// assert!(result.is_valid());
/// assert_eq!(result.warnings(), ["unused".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult<T = ()> {
    /// No problems.
    Valid(T),
    /// Usable, with warnings.
    Warnings(T, Vec<String>),
    /// Not usable: warnings, then errors.
    Invalid(Vec<String>, Vec<String>),
}

impl<T> ValidationResult<T> {
    pub fn is_valid(&self) -> bool {
        !matches!(self, ValidationResult::Invalid(_, _))
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            ValidationResult::Valid(_) => &[],
            ValidationResult::Warnings(_, warnings) => warnings,
            ValidationResult::Invalid(warnings, _) => warnings,
        }
    }

    pub fn errors(&self) -> &[String] {
        match self {
            ValidationResult::Invalid(_, errors) => errors,
            _ => &[],
        }
    }
}

/// Structural checks the type system does not express.
pub trait Validate {
    fn validate(&self) -> ValidationResult;
}
