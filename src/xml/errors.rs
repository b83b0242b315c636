//! Error types for reading, writing and validating OTS documents.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::ValidationResult;
use crate::xml::deserialize::DeserializeError;
use crate::xml::serialize::SerializeError;

/// The error returned by the document-level read and write operations.
#[derive(Debug, Error)]
pub enum OtsError {
    /// IO error occurred while reading or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not well-formed XML.
    #[error("XML parsing error{context}: {message}")]
    Xml {
        message: String,
        context: ErrorContext,
    },

    /// The XML is well-formed but does not match the OTS schema.
    #[error("Deserialization error{context}: {message}")]
    Deserialize {
        message: String,
        context: ErrorContext,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] SerializeError),

    /// The document was read but violates a structural rule.
    #[error("Validation error{context}: {message}")]
    Validation {
        message: String,
        context: ErrorContext,
        warnings: Vec<String>,
        errors: Vec<String>,
    },

    #[error("Multiple errors occurred:\n{}", format_errors(.0))]
    Multiple(Vec<OtsError>),
}

fn format_errors(errors: &[OtsError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(idx, error)| format!("  {}. {}", idx + 1, error))
        .collect::<Vec<_>>()
        .join("\n")
}

impl OtsError {
    /// Attach a location to a reader error.
    pub fn from_deserialize(error: DeserializeError, context: ErrorContext) -> Self {
        match error {
            DeserializeError::Xml(e) => OtsError::Xml {
                message: e.to_string(),
                context,
            },
            DeserializeError::Attr(e) => OtsError::Xml {
                message: e.to_string(),
                context,
            },
            DeserializeError::Io(e) => OtsError::Io(e),
            other => OtsError::Deserialize {
                message: other.to_string(),
                context,
            },
        }
    }

    /// The location attached to this error, if any.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            OtsError::Xml { context, .. }
            | OtsError::Deserialize { context, .. }
            | OtsError::Validation { context, .. } => Some(context),
            _ => None,
        }
    }
}

impl From<DeserializeError> for OtsError {
    fn from(error: DeserializeError) -> Self {
        OtsError::from_deserialize(error, ErrorContext::new())
    }
}

/// Where an error occurred.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    pub file_path: Option<PathBuf>,
    /// 1-based line.
    pub line: Option<usize>,
    /// 1-based column, counted in characters.
    pub column: Option<usize>,
    /// What was being read, e.g. an element name.
    pub parsing: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            file_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn with_line(line: usize) -> Self {
        Self {
            line: Some(line),
            ..Self::default()
        }
    }

    pub fn with_parsing<S: Into<String>>(mut self, parsing: S) -> Self {
        self.parsing = Some(parsing.into());
        self
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Set line and column from a byte offset into `text`.
    pub fn at_offset(mut self, text: &str, offset: usize) -> Self {
        let mut end = offset.min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let before = &text[..end];
        let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
        self.line = Some(before.matches('\n').count() + 1);
        self.column = Some(before[line_start..].chars().count() + 1);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if let Some(ref path) = self.file_path {
            parts.push(format!(" in file '{}'", path.display()));
        }

        if let Some(line) = self.line {
            if let Some(column) = self.column {
                parts.push(format!(" at line {}, column {}", line, column));
            } else {
                parts.push(format!(" at line {}", line));
            }
        }

        if let Some(ref parsing) = self.parsing {
            parts.push(format!(" while parsing {}", parsing));
        }

        write!(f, "{}", parts.join(","))
    }
}

/// Errors gathered over several independent operations.
#[derive(Debug, Default)]
pub struct ErrorCollection {
    errors: Vec<OtsError>,
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: OtsError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[OtsError] {
        &self.errors
    }

    /// A single error stays as is; several become [`OtsError::Multiple`].
    pub fn into_error(mut self) -> Option<OtsError> {
        match self.errors.len() {
            0 => None,
            1 => self.errors.pop(),
            _ => Some(OtsError::Multiple(self.errors)),
        }
    }
}

impl From<Vec<OtsError>> for ErrorCollection {
    fn from(errors: Vec<OtsError>) -> Self {
        Self { errors }
    }
}

/// Turn a validation outcome into a `Result`.
pub trait ToOtsError {
    /// Returns the warnings when usable, or an [`OtsError::Validation`].
    fn into_ots_result(self, context: ErrorContext) -> Result<Vec<String>, OtsError>;
}

impl ToOtsError for ValidationResult {
    fn into_ots_result(self, context: ErrorContext) -> Result<Vec<String>, OtsError> {
        match self {
            ValidationResult::Valid(_) => Ok(Vec::new()),
            ValidationResult::Warnings(_, warnings) => Ok(warnings),
            ValidationResult::Invalid(warnings, errors) => {
                let message = match errors.as_slice() {
                    [single] => single.clone(),
                    _ => format!("{} validation errors", errors.len()),
                };
                Err(OtsError::Validation {
                    message,
                    context,
                    warnings,
                    errors,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_offset() {
        let text = "<Ots>\n  <Network>\n    <Bad/>";
        let offset = text.find("<Bad").unwrap();
        let context = ErrorContext::new().at_offset(text, offset);
        assert_eq!(context.line, Some(3));
        assert_eq!(context.column, Some(5));
        assert_eq!(context.to_string(), " at line 3, column 5");
    }

    #[test]
    fn test_context_display() {
        let context = ErrorContext::with_file_path("scenario.xml")
            .with_parsing("Link")
            .at_offset("abc", 1);
        assert_eq!(
            context.to_string(),
            " in file 'scenario.xml', at line 1, column 2, while parsing Link"
        );
        assert_eq!(ErrorContext::new().to_string(), "");
    }

    #[test]
    fn test_collection_into_error() {
        assert!(ErrorCollection::new().into_error().is_none());

        let single = ErrorCollection::from(vec![OtsError::Deserialize {
            message: "bad".to_string(),
            context: ErrorContext::new(),
        }]);
        assert!(matches!(single.into_error(), Some(OtsError::Deserialize { .. })));

        let mut several = ErrorCollection::new();
        for line in [1, 2] {
            several.push(OtsError::Deserialize {
                message: "bad".to_string(),
                context: ErrorContext::with_line(line),
            });
        }
        assert_eq!(several.len(), 2);
        assert!(matches!(several.into_error(), Some(OtsError::Multiple(errors)) if errors.len() == 2));
    }

    #[test]
    fn test_validation_into_result() {
        let warnings = ValidationResult::Warnings((), vec!["unused".to_string()])
            .into_ots_result(ErrorContext::new())
            .unwrap();
        assert_eq!(warnings, ["unused".to_string()]);

        let err = ValidationResult::Invalid(Vec::new(), vec!["duplicate node id 'A'".to_string()])
            .into_ots_result(ErrorContext::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Validation error: duplicate node id 'A'");
    }
}
