//! Filter validation
//!
//! Walks a filter tree against an entity schema, rejecting anything that is
//! not safely representable: unknown fields, operators outside a field's
//! allowed set, and values of the wrong arity or type. Fail-fast, depth-first,
//! left-to-right over group children; the first failure wins and is annotated
//! with the index path of the group it occurred under.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::schema::{EntitySchema, FieldSchema, FieldType};

use super::types::{FilterCondition, FilterNode, FilterValue, OperatorClass};

/// Validate a filter tree against an entity schema.
///
/// A single invalid node anywhere fails the whole filter; there are no
/// partial results.
pub fn validate(filter: &FilterNode, schema: &EntitySchema) -> Result<(), ValidationError> {
    match filter {
        FilterNode::Condition(condition) => validate_condition(condition, schema),
        FilterNode::And(group) => validate_group("and", &group.and, schema),
        FilterNode::Or(group) => validate_group("or", &group.or, schema),
    }
}

fn validate_group(
    kind: &'static str,
    children: &[FilterNode],
    schema: &EntitySchema,
) -> Result<(), ValidationError> {
    if children.is_empty() {
        return Err(ValidationError::EmptyGroup { kind });
    }
    for (index, child) in children.iter().enumerate() {
        validate(child, schema).map_err(|e| e.at(kind, index))?;
    }
    Ok(())
}

fn validate_condition(
    condition: &FilterCondition,
    schema: &EntitySchema,
) -> Result<(), ValidationError> {
    if condition.field.is_empty() {
        return Err(ValidationError::MissingFieldName);
    }

    let field = schema
        .resolve(&condition.field)
        .ok_or_else(|| ValidationError::UnknownField(condition.field.clone()))?;

    let allowed = field.effective_operators();
    if !allowed.contains(&condition.operator) {
        return Err(ValidationError::OperatorNotAllowed {
            operator: condition.operator,
            field: condition.field.clone(),
            field_type: field.field_type(),
            allowed: allowed
                .iter()
                .map(|op| op.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    validate_value(condition, field)
}

fn validate_value(
    condition: &FilterCondition,
    field: &FieldSchema,
) -> Result<(), ValidationError> {
    let operator = condition.operator;
    let value = condition.value.as_ref();

    match operator.class() {
        OperatorClass::NoValue => match value {
            Some(_) => Err(ValidationError::UnexpectedValue(operator)),
            None => Ok(()),
        },
        OperatorClass::Array => {
            let Some(FilterValue::List(items)) = value else {
                return Err(ValidationError::ExpectedArray(operator));
            };
            if items.is_empty() {
                return Err(ValidationError::ExpectedArray(operator));
            }
            check_elements(items, field)
        }
        OperatorClass::Dual => {
            let Some(FilterValue::List(items)) = value else {
                return Err(ValidationError::ExpectedTwoValues(operator));
            };
            if items.len() != 2 {
                return Err(ValidationError::ExpectedTwoValues(operator));
            }
            check_elements(items, field)
        }
        OperatorClass::Single => {
            let Some(value) = value else {
                return Err(ValidationError::MissingValue(operator));
            };
            if !matches_type(value, field) {
                return Err(ValidationError::InvalidValue(field.field_type()));
            }
            Ok(())
        }
    }
}

fn check_elements(items: &[FilterValue], field: &FieldSchema) -> Result<(), ValidationError> {
    for (index, item) in items.iter().enumerate() {
        if !matches_type(item, field) {
            return Err(ValidationError::InvalidValueAt {
                index,
                field_type: field.field_type(),
            });
        }
    }
    Ok(())
}

fn matches_type(value: &FilterValue, field: &FieldSchema) -> bool {
    match field.field_type() {
        FieldType::String => matches!(value, FilterValue::String(_)),
        FieldType::Number => matches!(value, FilterValue::Number(n) if !n.is_nan()),
        FieldType::Boolean => matches!(value, FilterValue::Bool(_)),
        FieldType::Date => matches!(value, FilterValue::String(s) if is_iso_date(s)),
        // Fails closed: an enum field without a declared domain accepts nothing.
        FieldType::Enum => match (value, field.enum_values()) {
            (FilterValue::String(s), Some(domain)) => domain.iter().any(|v| v == s),
            _ => false,
        },
        FieldType::Uuid => matches!(value, FilterValue::String(s) if Uuid::parse_str(s).is_ok()),
    }
}

fn is_iso_date(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}
