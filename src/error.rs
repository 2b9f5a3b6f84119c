//! Error types for the filter engine
//!
//! Two kinds per the engine's contract: `ValidationError` is always a
//! client-input fault, `CompileError` is a defensive trip-wire that should be
//! unreachable once a filter has been validated. Both are synchronous, never
//! retried, never swallowed; `FilterError` unifies them for the facade so a
//! calling layer can map each kind to the right response class.

use thiserror::Error;

use crate::filters::Operator;
use crate::schema::FieldType;

/// Client-input validation failure
///
/// Carries a human-readable message and, for failures inside a group, the
/// index path where the offending node sits (e.g. `and[2]`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid filter structure: {0}")]
    InvalidStructure(String),

    #[error("{kind} group must have a non-empty \"{kind}\" array")]
    EmptyGroup { kind: &'static str },

    #[error("condition must have a valid field name")]
    MissingFieldName,

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error(
        "operator \"{operator}\" is not allowed for field \"{field}\" of type \"{field_type}\". Allowed operators: {allowed}"
    )]
    OperatorNotAllowed {
        operator: Operator,
        field: String,
        field_type: FieldType,
        allowed: String,
    },

    #[error("operator \"{0}\" should not have a value")]
    UnexpectedValue(Operator),

    #[error("operator \"{0}\" requires a non-empty array value")]
    ExpectedArray(Operator),

    #[error("operator \"{0}\" requires exactly 2 values")]
    ExpectedTwoValues(Operator),

    #[error("operator \"{0}\" requires a value")]
    MissingValue(Operator),

    #[error("invalid value for field type \"{0}\"")]
    InvalidValue(FieldType),

    #[error("invalid value at index {index} for field type \"{field_type}\"")]
    InvalidValueAt { index: usize, field_type: FieldType },

    #[error("invalid filter at {path}: {source}")]
    Nested {
        path: String,
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Wrap a child failure with the group index it occurred under.
    pub(crate) fn at(self, kind: &'static str, index: usize) -> Self {
        Self::Nested {
            path: format!("{kind}[{index}]"),
            source: Box::new(self),
        }
    }

    /// Outermost `group[index]` path segment, if the failure was nested.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Nested { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Defensive trip-wire for malformed nodes reached despite validation
///
/// Signals a server-side fault: a condition shape that validation would have
/// rejected made it into the compiler, and failing is safer than emitting a
/// structurally wrong clause.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("invalid condition: field name is required")]
    MissingField,

    #[error("operator \"{0}\" reached the compiler without a value")]
    MissingValue(Operator),

    #[error("operator \"{0}\" requires an array value")]
    ExpectedArray(Operator),

    #[error("operator \"{0}\" requires a string value")]
    ExpectedString(Operator),

    #[error("operator \"between\" requires an array with exactly 2 values")]
    ExpectedTwoValues,

    #[error("unsupported operator: {0}")]
    UnsupportedOperator(Operator),
}

/// Unified error for the facade
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("filter compilation failed: {0}")]
    Compile(#[from] CompileError),
}

impl FilterError {
    /// Whether the failure maps to a client-fault response (as opposed to a
    /// server-fault compile trip-wire).
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_error_display_carries_path() {
        let err = ValidationError::UnknownField("password".into())
            .at("or", 1)
            .at("and", 2);
        assert_eq!(
            err.to_string(),
            "invalid filter at and[2]: invalid filter at or[1]: unknown field: password"
        );
        assert_eq!(err.path(), Some("and[2]"));
    }

    #[test]
    fn operator_not_allowed_display() {
        let err = ValidationError::OperatorNotAllowed {
            operator: Operator::Contains,
            field: "age".into(),
            field_type: FieldType::Number,
            allowed: "eq, neq".into(),
        };
        assert_eq!(
            err.to_string(),
            "operator \"contains\" is not allowed for field \"age\" of type \"number\". Allowed operators: eq, neq"
        );
    }

    #[test]
    fn empty_group_display() {
        let err = ValidationError::EmptyGroup { kind: "and" };
        assert_eq!(err.to_string(), "and group must have a non-empty \"and\" array");
    }

    #[test]
    fn fault_classification() {
        let client: FilterError = ValidationError::MissingFieldName.into();
        assert!(client.is_client_fault());
        let server: FilterError = CompileError::MissingField.into();
        assert!(!server.is_client_fault());
    }
}
